//! End-to-end runs with the real image backend.

use gallery_forge::config::{self, ResolvedConfig};
use gallery_forge::imaging::RustBackend;
use gallery_forge::process;
use image::{GenericImageView, RgbImage};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_png(path: &Path, width: u32, height: u32) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
    .save(path)
    .unwrap();
}

/// Resolve `extra` with `from`/`to` pointing into `root`.
fn resolve(root: &Path, extra: &str) -> ResolvedConfig {
    let source = format!(
        "from = \"{}/img/\"\nto = \"{}/out/\"\nverbose = false\n{extra}",
        root.display(),
        root.display()
    );
    let table: toml::Table = toml::from_str(&source).unwrap();
    config::resolve(&toml::Value::Table(table)).unwrap()
}

fn output_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap())
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn renders_only_widths_narrower_than_source() {
    let tmp = TempDir::new().unwrap();
    write_png(&tmp.path().join("img/harbour.png"), 4000, 3000);
    let config = resolve(
        tmp.path(),
        "widths = [2000, 4000]\nmaxHeight = 3200\nformats = \"jpg\"",
    );

    let summary = process::run(&config, &RustBackend::new(), None).unwrap();

    assert!(summary.is_success());
    assert_eq!(summary.stats.encoded, 1);
    let out = tmp.path().join("out");
    assert_eq!(output_files(&out), vec!["harbour_2000_1500.jpg"]);
    let decoded = image::open(out.join("harbour_2000_1500.jpg")).unwrap();
    assert_eq!(decoded.dimensions(), (2000, 1500));
}

#[test]
fn second_run_leaves_outputs_untouched() {
    let tmp = TempDir::new().unwrap();
    write_png(&tmp.path().join("img/harbour.png"), 4000, 3000);
    let config = resolve(
        tmp.path(),
        "widths = [2000, 4000]\nmaxHeight = 3200\nformats = \"jpg\"",
    );
    let file = tmp.path().join("out/harbour_2000_1500.jpg");

    process::run(&config, &RustBackend::new(), None).unwrap();
    let bytes = fs::read(&file).unwrap();
    let modified = fs::metadata(&file).unwrap().modified().unwrap();

    let summary = process::run(&config, &RustBackend::new(), None).unwrap();

    assert_eq!(summary.stats.encoded, 0);
    assert_eq!(summary.stats.existing, 1);
    assert_eq!(fs::read(&file).unwrap(), bytes);
    assert_eq!(fs::metadata(&file).unwrap().modified().unwrap(), modified);
}

#[test]
fn decoded_heights_match_file_names() {
    let tmp = TempDir::new().unwrap();
    // 300 · 487 / 401 = 364.3
    write_png(&tmp.path().join("img/odd.png"), 401, 487);
    let config = resolve(tmp.path(), "widths = [100, 300]\nformats = [\"webp\", \"jpg\"]");

    process::run(&config, &RustBackend::new(), None).unwrap();

    let out = tmp.path().join("out");
    let files = output_files(&out);
    assert_eq!(
        files,
        vec![
            "odd_100_121.jpg",
            "odd_100_121.webp",
            "odd_300_364.jpg",
            "odd_300_364.webp"
        ]
    );
    for file in files {
        let stem = file.split('.').next().unwrap();
        let mut parts = stem.rsplit('_');
        let height: u32 = parts.next().unwrap().parse().unwrap();
        let width: u32 = parts.next().unwrap().parse().unwrap();
        let decoded = image::open(out.join(&file)).unwrap();
        assert_eq!(decoded.dimensions(), (width, height), "{file}");
    }
}

#[test]
fn gallery_with_thumbnails() {
    let tmp = TempDir::new().unwrap();
    write_png(&tmp.path().join("img/beta.png"), 800, 600);
    write_png(&tmp.path().join("img/alpha.png"), 600, 800);
    let config = resolve(
        tmp.path(),
        r#"
widths = [200, 400]
formats = "webp"
html = true

[thumbnails]
widths = [60, 120]
queries = [700]
"#,
    );
    // html forces a trailing jpeg
    assert_eq!(config.formats.last().map(|f| f.extension()), Some("jpg"));

    let summary = process::run(&config, &RustBackend::new(), None).unwrap();
    assert!(summary.is_success(), "{summary:?}");

    let gallery = summary.gallery.unwrap().unwrap();
    assert_eq!(gallery.images, 2);
    let markup = fs::read_to_string(&gallery.path).unwrap();
    let alpha = markup.find("alpha_400_533.jpg").unwrap();
    let beta = markup.find("beta_400_300.jpg").unwrap();
    assert!(alpha < beta);
    assert!(markup.contains("thumbs/beta_120.webp\" media=\"(min-width: 700px)\""));

    let thumb = image::open(tmp.path().join("out/thumbs/alpha_60.jpg")).unwrap();
    assert_eq!(thumb.dimensions(), (60, 60));
}

#[test]
fn missing_input_folder_is_reported() {
    let tmp = TempDir::new().unwrap();
    let config = resolve(tmp.path(), "");

    let err = process::run(&config, &RustBackend::new(), None).unwrap_err();
    assert!(err.to_string().contains("img"), "{err}");
    assert!(!tmp.path().join("out").exists());
}
