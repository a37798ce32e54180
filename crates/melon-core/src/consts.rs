/// Canonical width every image is resized to before feature extraction.
pub const CANONICAL_WIDTH: u32 = 800;

/// Canonical height every image is resized to before feature extraction.
pub const CANONICAL_HEIGHT: u32 = 600;

/// Pixel count of the canonical frame (800 x 600).
pub const CANONICAL_PIXEL_COUNT: u64 = CANONICAL_WIDTH as u64 * CANONICAL_HEIGHT as u64;

/// Added to the red + blue denominator of the green intensity ratio.
pub const GREEN_INTENSITY_EPSILON: f64 = 1e-5;

/// Separable 5-tap binomial kernel [1, 4, 6, 4, 1] / 16. This is the fixed
/// table vision libraries use for a 5x5 Gaussian when sigma is left at zero.
pub const SMOOTHING_KERNEL: [f32; 5] = [1.0 / 16.0, 4.0 / 16.0, 6.0 / 16.0, 4.0 / 16.0, 1.0 / 16.0];

/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Leaf band, hue on the 0..180 scale.
pub const LEAF_HUE_RANGE: (u8, u8) = (35, 85);

/// Leaf band, saturation.
pub const LEAF_SATURATION_RANGE: (u8, u8) = (40, 255);

/// Leaf band, value.
pub const LEAF_VALUE_RANGE: (u8, u8) = (40, 255);

/// Yellow/brown band, red channel.
pub const YELLOW_RED_RANGE: (u8, u8) = (100, 255);

/// Yellow/brown band, green channel.
pub const YELLOW_GREEN_RANGE: (u8, u8) = (100, 255);

/// Yellow/brown band, blue channel.
pub const YELLOW_BLUE_RANGE: (u8, u8) = (0, 50);

/// Default timeout for a single provider request.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// JPEG quality used when a decoded image must be re-encoded for upload.
pub const UPLOAD_JPEG_QUALITY: u8 = 90;
