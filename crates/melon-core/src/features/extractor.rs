use std::time::Instant;

use image::RgbImage;
use ndarray::{Array2, Axis, Zip};
use rayon::prelude::*;
use tracing::debug;

use crate::color::hsv::{hsv_to_rgb, rgb_to_hsv};
use crate::consts::{
    GREEN_INTENSITY_EPSILON, LEAF_HUE_RANGE, LEAF_SATURATION_RANGE, LEAF_VALUE_RANGE,
    SMOOTHING_KERNEL, YELLOW_BLUE_RANGE, YELLOW_GREEN_RANGE, YELLOW_RED_RANGE,
};
use crate::error::Result;
use crate::filters::gaussian_blur::blur_hsv;
use crate::frame::{HsvPlanes, ImageBuffer, RgbPlanes};
use crate::io::image_io::{decode_rgb, resize_canonical, split_planes};

use super::FeatureVector;

/// Decode an image and compute its feature vector.
///
/// Fails with `Decode` or `UnsupportedFormat` when the bytes are not a
/// readable JPEG/PNG. Otherwise a pure function of the pixels.
pub fn extract_features(image: &ImageBuffer) -> Result<FeatureVector> {
    let rgb = decode_rgb(image)?;
    Ok(extract_from_rgb(&rgb))
}

/// Compute the feature vector of a decoded RGB image.
pub fn extract_from_rgb(img: &RgbImage) -> FeatureVector {
    let start = Instant::now();

    let resized = resize_canonical(img);
    let hsv = rgb_to_hsv(&split_planes(&resized));
    let smoothed = blur_hsv(&hsv, &SMOOTHING_KERNEL);
    let rgb = hsv_to_rgb(&smoothed);

    let features = FeatureVector {
        green_intensity: green_intensity(&rgb),
        yellow_brown_ratio: yellow_brown_ratio(&rgb),
        leaf_area_estimate: leaf_area(&smoothed),
    };

    debug!(
        width = img.width(),
        height = img.height(),
        green_intensity = features.green_intensity,
        yellow_brown_ratio = features.yellow_brown_ratio,
        leaf_area = features.leaf_area_estimate,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Extracted plant features"
    );

    features
}

/// Exact integer sum of a plane, row-parallel and reduced in row order.
fn plane_sum(plane: &Array2<u8>) -> u64 {
    let row_sums: Vec<u64> = plane
        .axis_iter(Axis(0))
        .into_par_iter()
        .map(|row| row.iter().map(|&v| v as u64).sum())
        .collect();
    row_sums.into_iter().sum()
}

fn plane_mean(plane: &Array2<u8>) -> f64 {
    if plane.is_empty() {
        return 0.0;
    }
    plane_sum(plane) as f64 / plane.len() as f64
}

/// mean(G) / (mean(R) + mean(B) + epsilon).
pub fn green_intensity(rgb: &RgbPlanes) -> f64 {
    let r = plane_mean(&rgb.red);
    let g = plane_mean(&rgb.green);
    let b = plane_mean(&rgb.blue);
    g / (r + b + GREEN_INTENSITY_EPSILON)
}

fn in_band(v: u8, band: (u8, u8)) -> bool {
    v >= band.0 && v <= band.1
}

/// Fraction of pixels with high red and green but little blue.
pub fn yellow_brown_ratio(rgb: &RgbPlanes) -> f64 {
    let total = rgb.pixel_count();
    if total == 0 {
        return 0.0;
    }

    let mut count = 0u64;
    Zip::from(&rgb.red)
        .and(&rgb.green)
        .and(&rgb.blue)
        .for_each(|&r, &g, &b| {
            if in_band(r, YELLOW_RED_RANGE)
                && in_band(g, YELLOW_GREEN_RANGE)
                && in_band(b, YELLOW_BLUE_RANGE)
            {
                count += 1;
            }
        });

    count as f64 / total as f64
}

/// Number of pixels inside the leaf-green HSV band.
pub fn leaf_area(hsv: &HsvPlanes) -> u64 {
    let mut count = 0u64;
    Zip::from(&hsv.hue)
        .and(&hsv.saturation)
        .and(&hsv.value)
        .for_each(|&h, &s, &v| {
            if in_band(h, LEAF_HUE_RANGE)
                && in_band(s, LEAF_SATURATION_RANGE)
                && in_band(v, LEAF_VALUE_RANGE)
            {
                count += 1;
            }
        });
    count
}
