use image::RgbImage;
use ndarray::Array2;

/// Image handed to the analyser by the caller.
///
/// Either the raw bytes of an encoded file (JPEG/PNG) or an already decoded
/// 8-bit RGB grid. Consumers only ever borrow it.
#[derive(Clone, Debug)]
pub enum ImageBuffer {
    Encoded(Vec<u8>),
    Decoded(RgbImage),
}

impl From<Vec<u8>> for ImageBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Encoded(bytes)
    }
}

impl From<RgbImage> for ImageBuffer {
    fn from(img: RgbImage) -> Self {
        Self::Decoded(img)
    }
}

/// Three 8-bit planes of an RGB image, each shaped (height, width).
#[derive(Clone, Debug)]
pub struct RgbPlanes {
    pub red: Array2<u8>,
    pub green: Array2<u8>,
    pub blue: Array2<u8>,
}

impl RgbPlanes {
    pub fn width(&self) -> usize {
        self.red.ncols()
    }

    pub fn height(&self) -> usize {
        self.red.nrows()
    }

    pub fn pixel_count(&self) -> usize {
        self.red.len()
    }
}

/// Three 8-bit HSV planes. Hue is stored on the 0..180 scale so it fits a byte.
#[derive(Clone, Debug)]
pub struct HsvPlanes {
    pub hue: Array2<u8>,
    pub saturation: Array2<u8>,
    pub value: Array2<u8>,
}

impl HsvPlanes {
    pub fn width(&self) -> usize {
        self.hue.ncols()
    }

    pub fn height(&self) -> usize {
        self.hue.nrows()
    }
}
