use clap::{Parser, Subcommand};
use gallery_forge::config::{self, ResolvedConfig};
use gallery_forge::imaging::RustBackend;
use gallery_forge::{output, process};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "gallery-forge")]
#[command(about = "Batch-resize a folder of images into responsive variants")]
#[command(long_about = "\
Batch-resize a folder of images into responsive variants

Every image in the input folder is rendered at each configured width
(capped by its own size and the maximum height) in every output format.
Files that already exist are left alone unless --force is given.

  img/dusk.jpg  →  imgProcessed/dusk_400_267.avif
                   imgProcessed/dusk_400_267.webp
                   imgProcessed/dusk_400_267.jpg
                   ...
                   imgProcessed/thumbs/dusk_100.jpg     (thumbnails)
                   imgProcessed/gallery.html            (html)

Title, creator and description are read from the embedded XMP metadata
and can be used in output names and in the generated markup.

Run 'gallery-forge gen-config' to generate a documented config file.")]
#[command(version = version_string())]
struct Cli {
    /// Configuration file (TOML); built-in defaults when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Re-encode files that already exist
    #[arg(long, global = true)]
    force: bool,

    /// Only report failures
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Maximum number of worker threads
    #[arg(short, long, global = true)]
    jobs: Option<usize>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Render every image and write the gallery markup (default)
    Build,
    /// Print the resampling plan of every image without encoding
    Check,
    /// Print a stock config file with all options documented
    GenConfig,
}

impl Cli {
    /// Flags merged over the configuration file before it is resolved.
    fn overrides(&self) -> toml::Value {
        let mut table = toml::Table::new();
        if self.force {
            table.insert("force".into(), true.into());
        }
        if self.quiet {
            table.insert("verbose".into(), false.into());
        }
        if let Some(jobs) = self.jobs {
            table.insert("maxProcesses".into(), (jobs as i64).into());
        }
        toml::Value::Table(table)
    }

    fn load(&self) -> Result<ResolvedConfig, config::ConfigError> {
        config::load_config(self.config.as_deref(), Some(self.overrides()))
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command.as_ref().unwrap_or(&Command::Build) {
        Command::Build => build(&cli),
        Command::Check => check(&cli),
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            ExitCode::SUCCESS
        }
    }
}

fn build(cli: &Cli) -> ExitCode {
    let config = match cli.load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let verbose = config.verbose;
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_process_event(&event, verbose) {
                println!("{}", line);
            }
        }
    });
    let result = process::run(&config, &RustBackend::new(), Some(tx));
    printer.join().ok();

    match result {
        Ok(summary) => {
            println!();
            output::print_summary(&summary);
            if summary.is_success() {
                if verbose {
                    println!("==> All done");
                }
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn check(cli: &Cli) -> ExitCode {
    let result = cli
        .load()
        .map_err(process::ProcessError::from)
        .and_then(|config| process::plan(&config, &RustBackend::new()));
    match result {
        Ok(plans) => {
            output::print_plan(&plans);
            if plans.iter().all(|p| p.dimensions.is_ok()) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
