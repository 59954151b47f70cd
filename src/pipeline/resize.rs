use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::ColorType;

use crate::error::AppResult;

/// Uploads larger than this are downscaled before being sent to recognition.
pub const RESIZE_THRESHOLD_BYTES: u64 = 15 * 1024 * 1024;
pub const MAX_DIMENSION: u32 = 1920;
pub const JPEG_QUALITY: u8 = 90;

pub fn needs_downscale(size_bytes: u64, threshold: u64) -> bool {
    size_bytes > threshold
}

/// Decode `src`, shrink it so its longest side is at most `max_dim` (never enlarging),
/// and write it to `dst` as a JPEG. Returns the written dimensions.
pub fn downscale_to_jpeg(src: &Path, dst: &Path, max_dim: u32, quality: u8) -> AppResult<(u32, u32)> {
    let img = image::io::Reader::open(src)?.with_guessed_format()?.decode()?;
    let img = if img.width() > max_dim || img.height() > max_dim {
        img.thumbnail(max_dim, max_dim)
    } else {
        img
    };

    // JPEG has no alpha channel
    let rgb = img.to_rgb8();
    let mut out = BufWriter::new(std::fs::File::create(dst)?);
    JpegEncoder::new_with_quality(&mut out, quality).encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)?;
    out.flush()?;
    Ok((rgb.width(), rgb.height()))
}
