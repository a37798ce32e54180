use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
#[cfg(test)]
use crate::consts::SMOOTHING_KERNEL;
use crate::frame::HsvPlanes;

/// Smooth every HSV plane with the same separable kernel.
pub fn blur_hsv(hsv: &HsvPlanes, kernel: &[f32]) -> HsvPlanes {
    HsvPlanes {
        hue: gaussian_blur_u8(&hsv.hue, kernel),
        saturation: gaussian_blur_u8(&hsv.saturation, kernel),
        value: gaussian_blur_u8(&hsv.value, kernel),
    }
}

/// Separable blur of an 8-bit plane with an odd-length normalised kernel,
/// rounded back to 8 bits.
///
/// Borders are mirrored without repeating the edge pixel (reflect-101).
pub fn gaussian_blur_u8(data: &Array2<u8>, kernel: &[f32]) -> Array2<u8> {
    let float = data.mapv(f32::from);
    let row_pass = convolve(&float, kernel, Axis::Row);
    let col_pass = convolve(&row_pass, kernel, Axis::Col);
    col_pass.mapv(|v| v.round().clamp(0.0, 255.0) as u8)
}

#[derive(Clone, Copy)]
enum Axis {
    Row,
    Col,
}

fn reflect_101(i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    let mut i = i;
    while i < 0 || i > last {
        if i < 0 {
            i = -i;
        }
        if i > last {
            i = 2 * last - i;
        }
    }
    i as usize
}

fn convolve(data: &Array2<f32>, kernel: &[f32], axis: Axis) -> Array2<f32> {
    let (h, w) = data.dim();
    let radius = kernel.len() as isize / 2;

    let sample = |row: usize, col: usize| -> f32 {
        let mut sum = 0.0f32;
        for (ki, &kv) in kernel.iter().enumerate() {
            let offset = ki as isize - radius;
            let v = match axis {
                Axis::Row => data[[row, reflect_101(col as isize + offset, w)]],
                Axis::Col => data[[reflect_101(row as isize + offset, h), col]],
            };
            sum += v * kv;
        }
        sum
    };

    let mut result = Array2::<f32>::zeros((h, w));
    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        let rows: Vec<Vec<f32>> = (0..h)
            .into_par_iter()
            .map(|row| (0..w).map(|col| sample(row, col)).collect())
            .collect();

        for (row, row_data) in rows.into_iter().enumerate() {
            for (col, val) in row_data.into_iter().enumerate() {
                result[[row, col]] = val;
            }
        }
    } else {
        for row in 0..h {
            for col in 0..w {
                result[[row, col]] = sample(row, col);
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflect_101_mirrors_without_repeating_edge() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(-2, 5), 2);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(6, 5), 2);
        assert_eq!(reflect_101(3, 1), 0);
    }

    #[test]
    fn smoothing_kernel_is_binomial_table() {
        assert_eq!(SMOOTHING_KERNEL, [0.0625, 0.25, 0.375, 0.25, 0.0625]);
        assert!((SMOOTHING_KERNEL.iter().sum::<f32>() - 1.0).abs() < 1e-7);
    }

    #[test]
    fn spike_spreads_with_binomial_weights() {
        let mut plane = Array2::<u8>::zeros((9, 9));
        plane[[4, 4]] = 160;
        let blurred = gaussian_blur_u8(&plane, &SMOOTHING_KERNEL);

        // 160 * w[i] * w[j] with w = [1, 4, 6, 4, 1] / 16
        assert_eq!(blurred[[4, 4]], 23);
        assert_eq!(blurred[[4, 5]], 15);
        assert_eq!(blurred[[3, 3]], 10);
        assert_eq!(blurred[[4, 6]], 4);
        assert_eq!(blurred[[2, 2]], 1);
        assert_eq!(blurred[[0, 0]], 0);
    }

    #[test]
    fn edge_spike_is_reflected_back() {
        let mut plane = Array2::<u8>::zeros((5, 5));
        plane[[2, 2]] = 160;
        let blurred = gaussian_blur_u8(&plane, &SMOOTHING_KERNEL);

        // Taps past the border mirror onto the spike, doubling the outer weight.
        assert_eq!(blurred[[2, 4]], 8);
        assert_eq!(blurred[[2, 0]], blurred[[2, 4]]);
    }
}
