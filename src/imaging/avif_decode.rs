//! AVIF input support.
//!
//! The `image` crate's `avif` feature only ships the rav1e encoder; reading
//! AVIF would need the C dav1d library. Sources are instead unpacked with
//! `avif-parse` and the AV1 payload decoded by `rav1d`, a pure Rust port of
//! dav1d driven through its C-style API.
//!
//! The decoded planes are copied into owned buffers before the picture is
//! released, so the YUV → RGB conversion runs on plain slices.

use super::backend::{BackendError, Dimensions};
use image::{DynamicImage, RgbImage};
use std::path::Path;

fn parse_container(path: &Path) -> Result<avif_parse::AvifData, BackendError> {
    let file_data = std::fs::read(path)?;
    avif_parse::read_avif(&mut std::io::Cursor::new(&file_data)).map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to parse AVIF {}: {e:?}", path.display()))
    })
}

/// Dimensions from the container metadata, without decoding.
pub fn identify_avif(path: &Path) -> Result<Dimensions, BackendError> {
    let avif = parse_container(path)?;
    let meta = avif.primary_item_metadata().map_err(|e| {
        BackendError::ProcessingFailed(format!(
            "Failed to read AVIF metadata {}: {e:?}",
            path.display()
        ))
    })?;
    Ok(Dimensions {
        width: meta.max_frame_width.get(),
        height: meta.max_frame_height.get(),
    })
}

/// Decode the primary image of an AVIF file to 8-bit RGB.
pub fn decode_avif(path: &Path) -> Result<DynamicImage, BackendError> {
    let avif = parse_container(path)?;
    let frame = decode_av1(&avif.primary_item)?;
    tracing::debug!(
        path = %path.display(),
        width = frame.width,
        height = frame.height,
        bpc = frame.bpc,
        "decoded AVIF"
    );
    let rgb = frame.to_rgb();
    RgbImage::from_raw(frame.width as u32, frame.height as u32, rgb)
        .map(DynamicImage::ImageRgb8)
        .ok_or_else(|| {
            BackendError::ProcessingFailed("Failed to create image from decoded AVIF data".into())
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChromaLayout {
    Monochrome,
    I420,
    I422,
    I444,
}

impl ChromaLayout {
    /// Horizontal and vertical chroma subsampling.
    fn subsampling(self) -> (bool, bool) {
        match self {
            Self::I420 => (true, true),
            Self::I422 => (true, false),
            Self::Monochrome | Self::I444 => (false, false),
        }
    }
}

/// One plane of samples, row-major, `width` samples per row.
struct Plane {
    samples: Vec<u16>,
    width: usize,
}

impl Plane {
    fn at(&self, x: usize, y: usize) -> f32 {
        self.samples[y * self.width + x] as f32
    }
}

/// A decoded frame with owned planes.
struct Frame {
    width: usize,
    height: usize,
    bpc: u32,
    layout: ChromaLayout,
    y: Plane,
    /// Cb and Cr; absent for monochrome.
    chroma: Option<(Plane, Plane)>,
}

/// Copy a plane out of decoder memory.
///
/// # Safety
/// `ptr` must point to `height` rows of at least `width` samples, each row
/// `stride` bytes after the previous one, with 16-bit samples when
/// `high_bitdepth` is set.
unsafe fn copy_plane(
    ptr: *const u8,
    stride: isize,
    width: usize,
    height: usize,
    high_bitdepth: bool,
) -> Plane {
    let mut samples = Vec::with_capacity(width * height);
    for row in 0..height {
        let row_ptr = unsafe { ptr.offset(row as isize * stride) };
        if high_bitdepth {
            let row = unsafe { std::slice::from_raw_parts(row_ptr as *const u16, width) };
            samples.extend_from_slice(row);
        } else {
            let row = unsafe { std::slice::from_raw_parts(row_ptr, width) };
            samples.extend(row.iter().map(|&s| s as u16));
        }
    }
    Plane { samples, width }
}

fn decode_av1(av1_bytes: &[u8]) -> Result<Frame, BackendError> {
    use rav1d::include::dav1d::dav1d::Dav1dSettings;
    use std::mem::MaybeUninit;
    use std::ptr::NonNull;

    let mut settings = MaybeUninit::<Dav1dSettings>::uninit();
    unsafe {
        rav1d::src::lib::dav1d_default_settings(NonNull::from(&mut settings).cast());
    }
    let mut settings = unsafe { settings.assume_init() };
    settings.n_threads = 1;
    settings.max_frame_delay = 1;

    let mut ctx = None;
    let rc =
        unsafe { rav1d::src::lib::dav1d_open(NonNull::new(&mut ctx), NonNull::new(&mut settings)) };
    if rc.0 != 0 {
        return Err(BackendError::ProcessingFailed(format!(
            "rav1d open failed ({})",
            rc.0
        )));
    }

    let frame = (|| -> Result<Frame, BackendError> {
        use rav1d::include::dav1d::data::Dav1dData;
        use rav1d::include::dav1d::headers::{
            DAV1D_PIXEL_LAYOUT_I400, DAV1D_PIXEL_LAYOUT_I420, DAV1D_PIXEL_LAYOUT_I422,
            DAV1D_PIXEL_LAYOUT_I444,
        };
        use rav1d::include::dav1d::picture::Dav1dPicture;

        let mut data = Dav1dData::default();
        let buf_ptr = unsafe {
            rav1d::src::lib::dav1d_data_create(NonNull::new(&mut data), av1_bytes.len())
        };
        if buf_ptr.is_null() {
            return Err(BackendError::ProcessingFailed(
                "rav1d data_create failed".into(),
            ));
        }
        unsafe { std::ptr::copy_nonoverlapping(av1_bytes.as_ptr(), buf_ptr, av1_bytes.len()) };

        let rc = unsafe { rav1d::src::lib::dav1d_send_data(ctx, NonNull::new(&mut data)) };
        if rc.0 != 0 {
            unsafe { rav1d::src::lib::dav1d_data_unref(NonNull::new(&mut data)) };
            return Err(BackendError::ProcessingFailed(format!(
                "rav1d send_data failed ({})",
                rc.0
            )));
        }

        let mut pic: Dav1dPicture = unsafe { std::mem::zeroed() };
        let rc = unsafe { rav1d::src::lib::dav1d_get_picture(ctx, NonNull::new(&mut pic)) };
        if rc.0 != 0 {
            return Err(BackendError::ProcessingFailed(format!(
                "rav1d get_picture failed ({})",
                rc.0
            )));
        }

        let width = pic.p.w as usize;
        let height = pic.p.h as usize;
        let bpc = pic.p.bpc as u32;
        let high_bitdepth = bpc > 8;
        let layout = match pic.p.layout {
            DAV1D_PIXEL_LAYOUT_I400 => Some(ChromaLayout::Monochrome),
            DAV1D_PIXEL_LAYOUT_I420 => Some(ChromaLayout::I420),
            DAV1D_PIXEL_LAYOUT_I422 => Some(ChromaLayout::I422),
            DAV1D_PIXEL_LAYOUT_I444 => Some(ChromaLayout::I444),
            _ => None,
        };

        let planes = match (layout, pic.data[0], pic.data[1], pic.data[2]) {
            (Some(ChromaLayout::Monochrome), Some(y), _, _) => {
                let y = unsafe {
                    copy_plane(y.as_ptr() as *const u8, pic.stride[0], width, height, high_bitdepth)
                };
                Ok((ChromaLayout::Monochrome, y, None))
            }
            (Some(layout), Some(y), Some(u), Some(v)) => {
                let (ss_x, ss_y) = layout.subsampling();
                let chroma_w = if ss_x { width.div_ceil(2) } else { width };
                let chroma_h = if ss_y { height.div_ceil(2) } else { height };
                let planes = unsafe {
                    (
                        copy_plane(y.as_ptr() as *const u8, pic.stride[0], width, height, high_bitdepth),
                        copy_plane(
                            u.as_ptr() as *const u8,
                            pic.stride[1],
                            chroma_w,
                            chroma_h,
                            high_bitdepth,
                        ),
                        copy_plane(
                            v.as_ptr() as *const u8,
                            pic.stride[1],
                            chroma_w,
                            chroma_h,
                            high_bitdepth,
                        ),
                    )
                };
                Ok((layout, planes.0, Some((planes.1, planes.2))))
            }
            (None, ..) => Err(BackendError::ProcessingFailed(format!(
                "Unsupported AVIF pixel layout: {}",
                pic.p.layout
            ))),
            _ => Err(BackendError::ProcessingFailed(
                "rav1d returned a picture without plane data".into(),
            )),
        };

        unsafe { rav1d::src::lib::dav1d_picture_unref(NonNull::new(&mut pic)) };

        let (layout, y, chroma) = planes?;
        Ok(Frame {
            width,
            height,
            bpc,
            layout,
            y,
            chroma,
        })
    })();

    unsafe { rav1d::src::lib::dav1d_close(NonNull::new(&mut ctx)) };
    frame
}

impl Frame {
    /// Interleaved 8-bit RGB using BT.601 coefficients.
    fn to_rgb(&self) -> Vec<u8> {
        let max_val = ((1u32 << self.bpc) - 1) as f32;
        let center = (1u32 << (self.bpc - 1)) as f32;
        let scale = 255.0 / max_val;
        let (ss_x, ss_y) = self.layout.subsampling();

        let mut rgb = Vec::with_capacity(self.width * self.height * 3);
        for row in 0..self.height {
            for col in 0..self.width {
                let luma = self.y.at(col, row);
                let pixel = match &self.chroma {
                    None => {
                        let v = (luma * scale).clamp(0.0, 255.0) as u8;
                        [v, v, v]
                    }
                    Some((cb_plane, cr_plane)) => {
                        let cx = if ss_x { col / 2 } else { col };
                        let cy = if ss_y { row / 2 } else { row };
                        let cb = cb_plane.at(cx, cy) - center;
                        let cr = cr_plane.at(cx, cy) - center;
                        [
                            ((luma + 1.402 * cr) * scale).clamp(0.0, 255.0) as u8,
                            ((luma - 0.344136 * cb - 0.714136 * cr) * scale).clamp(0.0, 255.0)
                                as u8,
                            ((luma + 1.772 * cb) * scale).clamp(0.0, 255.0) as u8,
                        ]
                    }
                };
                rgb.extend_from_slice(&pixel);
            }
        }
        rgb
    }
}
