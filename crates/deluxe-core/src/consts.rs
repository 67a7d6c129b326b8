/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Small epsilon to avoid division by zero in floating-point comparisons.
pub const EPSILON: f32 = 1e-10;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Number of channels in a color frame (R, G, B).
pub const COLOR_CHANNEL_COUNT: usize = 3;

/// Gaussian kernel half-width in standard deviations.
pub const GAUSSIAN_KERNEL_SIGMAS: f32 = 3.0;

/// Grain extract/merge pivot: the value a zero difference maps to.
pub const GRAIN_PIVOT: f32 = 0.5;

/// DCT denoise works on 8-bit scale sigmas; hard threshold is this many sigmas.
pub const DCT_THRESHOLD_SIGMAS: f32 = 3.0;

/// Explicit time step for mean-curvature flow (stable for a 4-neighbour stencil).
pub const MEAN_CURVATURE_TIME_STEP: f32 = 0.25;
