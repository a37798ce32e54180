use ndarray::{Array2, Zip};

use crate::frame::{HsvPlanes, RgbPlanes};

/// Convert one 8-bit RGB pixel to 8-bit HSV.
///
/// Hue is halved onto 0..180 so it fits a byte; saturation and value use 0..255.
/// Achromatic pixels get hue 0.
pub fn rgb_to_hsv_pixel(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = (v - min) as f32;

    let s = if v == 0 {
        0.0
    } else {
        (255.0 * diff / v as f32).round()
    };

    let h = if diff == 0.0 {
        0.0
    } else {
        let sector_offset = if v == r {
            (gf - bf) / diff
        } else if v == g {
            2.0 + (bf - rf) / diff
        } else {
            4.0 + (rf - gf) / diff
        };
        let mut h = (30.0 * sector_offset).round();
        if h < 0.0 {
            h += 180.0;
        }
        if h >= 180.0 {
            h -= 180.0;
        }
        h
    };

    (h as u8, s as u8, v)
}

/// Convert one 8-bit HSV pixel (hue on 0..180) back to 8-bit RGB.
pub fn hsv_to_rgb_pixel(h: u8, s: u8, v: u8) -> (u8, u8, u8) {
    let s = s as f32 / 255.0;
    let v = v as f32 / 255.0;

    let (r, g, b) = if s == 0.0 {
        (v, v, v)
    } else {
        let mut h = h as f32 * (6.0 / 180.0);
        while h >= 6.0 {
            h -= 6.0;
        }
        let sector = h.floor();
        let f = h - sector;

        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        match sector as u8 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        }
    };

    (to_byte(r), to_byte(g), to_byte(b))
}

fn to_byte(unit: f32) -> u8 {
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Convert RGB planes to HSV planes.
pub fn rgb_to_hsv(rgb: &RgbPlanes) -> HsvPlanes {
    let dim = rgb.red.dim();
    let mut hue = Array2::<u8>::zeros(dim);
    let mut saturation = Array2::<u8>::zeros(dim);
    let mut value = Array2::<u8>::zeros(dim);

    Zip::from(&mut hue)
        .and(&mut saturation)
        .and(&mut value)
        .and(&rgb.red)
        .and(&rgb.green)
        .and(&rgb.blue)
        .for_each(|h, s, v, &r, &g, &b| {
            (*h, *s, *v) = rgb_to_hsv_pixel(r, g, b);
        });

    HsvPlanes {
        hue,
        saturation,
        value,
    }
}

/// Convert HSV planes back to RGB planes.
pub fn hsv_to_rgb(hsv: &HsvPlanes) -> RgbPlanes {
    let dim = hsv.hue.dim();
    let mut red = Array2::<u8>::zeros(dim);
    let mut green = Array2::<u8>::zeros(dim);
    let mut blue = Array2::<u8>::zeros(dim);

    Zip::from(&mut red)
        .and(&mut green)
        .and(&mut blue)
        .and(&hsv.hue)
        .and(&hsv.saturation)
        .and(&hsv.value)
        .for_each(|r, g, b, &h, &s, &v| {
            (*r, *g, *b) = hsv_to_rgb_pixel(h, s, v);
        });

    RgbPlanes { red, green, blue }
}
