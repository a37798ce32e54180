use std::borrow::Cow;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbImage};
use ndarray::Array2;

use crate::consts::{CANONICAL_HEIGHT, CANONICAL_WIDTH, UPLOAD_JPEG_QUALITY};
use crate::error::{MelonError, Result};
use crate::frame::{ImageBuffer, RgbPlanes};

/// Read an image file into an encoded buffer. Decoding is deferred.
pub fn load_image(path: &Path) -> Result<ImageBuffer> {
    let bytes = std::fs::read(path)?;
    Ok(ImageBuffer::Encoded(bytes))
}

/// Identify the raster format of encoded bytes. Only JPEG and PNG are accepted.
pub fn sniff_format(bytes: &[u8]) -> Result<ImageFormat> {
    let format = image::guess_format(bytes)
        .map_err(|_| MelonError::Decode("unrecognised image data".into()))?;
    match format {
        ImageFormat::Jpeg | ImageFormat::Png => Ok(format),
        other => Err(MelonError::UnsupportedFormat(format!("{other:?}"))),
    }
}

/// Decode a buffer into an 8-bit RGB grid, borrowing when already decoded.
pub fn decode_rgb(buffer: &ImageBuffer) -> Result<Cow<'_, RgbImage>> {
    let rgb = match buffer {
        ImageBuffer::Encoded(bytes) => {
            let format = sniff_format(bytes)?;
            let dynamic = image::load_from_memory_with_format(bytes, format)?;
            Cow::Owned(dynamic.to_rgb8())
        }
        ImageBuffer::Decoded(img) => Cow::Borrowed(img),
    };

    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(MelonError::InvalidDimensions { width, height });
    }
    Ok(rgb)
}

/// Bytes suitable for an inline upload, plus their MIME type.
///
/// Encoded buffers are passed through untouched; decoded grids are encoded as JPEG.
pub fn upload_bytes(buffer: &ImageBuffer) -> Result<(Cow<'_, [u8]>, &'static str)> {
    match buffer {
        ImageBuffer::Encoded(bytes) => {
            let mime = sniff_format(bytes)?.to_mime_type();
            Ok((Cow::Borrowed(bytes.as_slice()), mime))
        }
        ImageBuffer::Decoded(img) => {
            let mut buf = Vec::new();
            JpegEncoder::new_with_quality(&mut buf, UPLOAD_JPEG_QUALITY).encode_image(img)?;
            Ok((Cow::Owned(buf), ImageFormat::Jpeg.to_mime_type()))
        }
    }
}

/// Bilinear resize to the canonical 800x600 frame. No-op when already that size.
pub fn resize_canonical(img: &RgbImage) -> Cow<'_, RgbImage> {
    if img.dimensions() == (CANONICAL_WIDTH, CANONICAL_HEIGHT) {
        return Cow::Borrowed(img);
    }
    Cow::Owned(imageops::resize(
        img,
        CANONICAL_WIDTH,
        CANONICAL_HEIGHT,
        FilterType::Triangle,
    ))
}

/// Split an interleaved RGB image into separate planes.
pub fn split_planes(img: &RgbImage) -> RgbPlanes {
    let (w, h) = img.dimensions();
    let (w, h) = (w as usize, h as usize);

    let mut red = Array2::<u8>::zeros((h, w));
    let mut green = Array2::<u8>::zeros((h, w));
    let mut blue = Array2::<u8>::zeros((h, w));

    for (x, y, pixel) in img.enumerate_pixels() {
        let (row, col) = (y as usize, x as usize);
        red[[row, col]] = pixel.0[0];
        green[[row, col]] = pixel.0[1];
        blue[[row, col]] = pixel.0[2];
    }

    RgbPlanes { red, green, blue }
}
