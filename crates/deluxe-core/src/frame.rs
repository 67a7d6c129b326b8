use ndarray::Array2;

use crate::consts::{COLOR_CHANNEL_COUNT, LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};
use crate::error::{DeluxeError, Result};

/// A single image channel.
/// Pixel values are f32, nominally in [0.0, 1.0].
#[derive(Clone, Debug)]
pub struct Frame {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<f32>,
    /// Original bit depth before conversion (8 or 16)
    pub original_bit_depth: u8,
}

impl Frame {
    pub fn new(data: Array2<f32>, bit_depth: u8) -> Self {
        Self {
            data,
            original_bit_depth: bit_depth,
        }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// Same bit depth, new pixels.
    pub fn with_data(&self, data: Array2<f32>) -> Self {
        Self::new(data, self.original_bit_depth)
    }
}

/// Color image composed of separate channel frames.
#[derive(Clone, Debug)]
pub struct ColorFrame {
    pub red: Frame,
    pub green: Frame,
    pub blue: Frame,
}

/// An image flowing along a graph edge, either mono or RGB.
#[derive(Clone, Debug)]
#[allow(clippy::large_enum_variant)]
pub enum Image {
    Mono(Frame),
    Color(ColorFrame),
}

impl Image {
    pub fn width(&self) -> usize {
        self.first().width()
    }

    pub fn height(&self) -> usize {
        self.first().height()
    }

    pub fn dim(&self) -> (usize, usize) {
        self.first().data.dim()
    }

    pub fn channel_count(&self) -> usize {
        match self {
            Self::Mono(_) => 1,
            Self::Color(_) => COLOR_CHANNEL_COUNT,
        }
    }

    pub fn bit_depth(&self) -> u8 {
        self.first().original_bit_depth
    }

    /// Borrow the channel arrays in R, G, B order (one entry for mono).
    pub fn channels(&self) -> Vec<&Array2<f32>> {
        match self {
            Self::Mono(f) => vec![&f.data],
            Self::Color(cf) => vec![&cf.red.data, &cf.green.data, &cf.blue.data],
        }
    }

    /// Apply `f` to every channel independently. Color channels run in parallel.
    pub fn map_channels<F>(&self, f: F) -> Image
    where
        F: Fn(&Array2<f32>) -> Array2<f32> + Sync,
    {
        match self {
            Self::Mono(frame) => Self::Mono(frame.with_data(f(&frame.data))),
            Self::Color(cf) => {
                let (r, (g, b)) = rayon::join(
                    || f(&cf.red.data),
                    || rayon::join(|| f(&cf.green.data), || f(&cf.blue.data)),
                );
                Self::Color(ColorFrame {
                    red: cf.red.with_data(r),
                    green: cf.green.with_data(g),
                    blue: cf.blue.with_data(b),
                })
            }
        }
    }

    /// Combine two images channel by channel.
    pub fn zip_channels<F>(&self, other: &Image, f: F) -> Result<Image>
    where
        F: Fn(&Array2<f32>, &Array2<f32>) -> Array2<f32> + Sync,
    {
        if self.dim() != other.dim() {
            let (height, width) = other.dim();
            return Err(DeluxeError::InvalidDimensions { width, height });
        }
        match (self, other) {
            (Self::Mono(a), Self::Mono(b)) => Ok(Self::Mono(a.with_data(f(&a.data, &b.data)))),
            (Self::Color(a), Self::Color(b)) => {
                let (r, (g, bl)) = rayon::join(
                    || f(&a.red.data, &b.red.data),
                    || {
                        rayon::join(
                            || f(&a.green.data, &b.green.data),
                            || f(&a.blue.data, &b.blue.data),
                        )
                    },
                );
                Ok(Self::Color(ColorFrame {
                    red: a.red.with_data(r),
                    green: a.green.with_data(g),
                    blue: a.blue.with_data(bl),
                }))
            }
            _ => Err(DeluxeError::ChannelMismatch {
                main: self.channel_count(),
                aux: other.channel_count(),
            }),
        }
    }

    /// Rebuild an image of the same kind from per-channel arrays.
    pub fn from_channels_like(&self, mut channels: Vec<Array2<f32>>) -> Image {
        let depth = self.bit_depth();
        match self {
            Self::Mono(_) => Self::Mono(Frame::new(channels.remove(0), depth)),
            Self::Color(_) => {
                let blue = channels.remove(2);
                let green = channels.remove(1);
                let red = channels.remove(0);
                Self::Color(ColorFrame {
                    red: Frame::new(red, depth),
                    green: Frame::new(green, depth),
                    blue: Frame::new(blue, depth),
                })
            }
        }
    }

    /// Get a mono frame. Color is converted to luminance.
    pub fn to_mono(&self) -> Frame {
        match self {
            Self::Mono(f) => f.clone(),
            Self::Color(cf) => luminance(cf),
        }
    }

    fn first(&self) -> &Frame {
        match self {
            Self::Mono(f) => f,
            Self::Color(cf) => &cf.red,
        }
    }
}

impl From<Frame> for Image {
    fn from(frame: Frame) -> Self {
        Self::Mono(frame)
    }
}

impl From<ColorFrame> for Image {
    fn from(color: ColorFrame) -> Self {
        Self::Color(color)
    }
}

/// Compute luminance from a `ColorFrame` using ITU-R BT.601 weights.
pub fn luminance(color: &ColorFrame) -> Frame {
    let data = ndarray::Zip::from(&color.red.data)
        .and(&color.green.data)
        .and(&color.blue.data)
        .map_collect(|&r, &g, &b| LUMINANCE_R * r + LUMINANCE_G * g + LUMINANCE_B * b);
    color.red.with_data(data)
}
