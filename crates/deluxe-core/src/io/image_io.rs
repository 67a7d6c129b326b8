use std::path::Path;

use image::{DynamicImage, ImageBuffer, ImageFormat, Luma, Rgb};
use ndarray::Array2;
use tracing::debug;

use crate::error::{DeluxeError, Result};
use crate::frame::{ColorFrame, Frame, Image};

const U8_MAX: f32 = 255.0;
const U16_MAX: f32 = 65535.0;

/// Output encoding, chosen from the file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// 16-bit TIFF.
    Tiff,
    /// 8-bit PNG.
    Png,
}

impl OutputFormat {
    /// TIFF unless the extension says PNG.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("png") => Self::Png,
            _ => Self::Tiff,
        }
    }
}

#[inline]
fn quantize(value: f32, max: f32) -> f32 {
    (value.clamp(0.0, 1.0) * max).round()
}

fn gray_buffer<P>(frame: &Frame, max: f32) -> Vec<P>
where
    P: TryFrom<u32> + Default,
{
    frame
        .data
        .iter()
        .map(|&v| P::try_from(quantize(v, max) as u32).unwrap_or_default())
        .collect()
}

fn rgb_buffer<P>(color: &ColorFrame, max: f32) -> Vec<P>
where
    P: TryFrom<u32> + Default,
{
    let mut pixels = Vec::with_capacity(color.red.data.len() * 3);
    for ((&r, &g), &b) in color
        .red
        .data
        .iter()
        .zip(color.green.data.iter())
        .zip(color.blue.data.iter())
    {
        for v in [r, g, b] {
            pixels.push(P::try_from(quantize(v, max) as u32).unwrap_or_default());
        }
    }
    pixels
}

fn dimensions(image: &Image) -> Result<(u32, u32)> {
    let (h, w) = image.dim();
    match (u32::try_from(w), u32::try_from(h)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => Err(DeluxeError::InvalidDimensions {
            width: w,
            height: h,
        }),
    }
}

fn encode(image: &Image, format: OutputFormat) -> Result<DynamicImage> {
    let (w, h) = dimensions(image)?;
    let too_small = || DeluxeError::InvalidDimensions {
        width: w as usize,
        height: h as usize,
    };

    // Array iteration order is row-major, which is what the buffers expect.
    let dynamic = match (image, format) {
        (Image::Mono(frame), OutputFormat::Tiff) => DynamicImage::ImageLuma16(
            ImageBuffer::<Luma<u16>, _>::from_raw(w, h, gray_buffer::<u16>(frame, U16_MAX))
                .ok_or_else(too_small)?,
        ),
        (Image::Mono(frame), OutputFormat::Png) => DynamicImage::ImageLuma8(
            ImageBuffer::<Luma<u8>, _>::from_raw(w, h, gray_buffer::<u8>(frame, U8_MAX))
                .ok_or_else(too_small)?,
        ),
        (Image::Color(color), OutputFormat::Tiff) => DynamicImage::ImageRgb16(
            ImageBuffer::<Rgb<u16>, _>::from_raw(w, h, rgb_buffer::<u16>(color, U16_MAX))
                .ok_or_else(too_small)?,
        ),
        (Image::Color(color), OutputFormat::Png) => DynamicImage::ImageRgb8(
            ImageBuffer::<Rgb<u8>, _>::from_raw(w, h, rgb_buffer::<u8>(color, U8_MAX))
                .ok_or_else(too_small)?,
        ),
    };
    Ok(dynamic)
}

/// Save an image, 16-bit TIFF or 8-bit PNG depending on the extension.
/// Values are clamped to [0, 1] on the way out.
pub fn save_image(image: &Image, path: &Path) -> Result<()> {
    let format = OutputFormat::from_path(path);
    let encoded = encode(image, format)?;
    let image_format = match format {
        OutputFormat::Tiff => ImageFormat::Tiff,
        OutputFormat::Png => ImageFormat::Png,
    };
    encoded.save_with_format(path, image_format)?;
    debug!(path = %path.display(), ?format, "Image saved");
    Ok(())
}

/// Load an image file. Files with colour become [`Image::Color`], everything
/// else [`Image::Mono`]; alpha is discarded.
pub fn load_image(path: &Path) -> Result<Image> {
    let img = image::open(path)?;
    let color_type = img.color();
    let bit_depth: u8 = if color_type.bytes_per_pixel() / color_type.channel_count() > 1 {
        16
    } else {
        8
    };
    let (w, h) = (img.width() as usize, img.height() as usize);

    let image = if color_type.has_color() {
        let rgb = img.to_rgb16();
        let channel = |c: usize| {
            Array2::from_shape_fn((h, w), |(row, col)| {
                rgb.get_pixel(col as u32, row as u32).0[c] as f32 / U16_MAX
            })
        };
        Image::Color(ColorFrame {
            red: Frame::new(channel(0), bit_depth),
            green: Frame::new(channel(1), bit_depth),
            blue: Frame::new(channel(2), bit_depth),
        })
    } else {
        let gray = img.to_luma16();
        let data = Array2::from_shape_fn((h, w), |(row, col)| {
            gray.get_pixel(col as u32, row as u32).0[0] as f32 / U16_MAX
        });
        Image::Mono(Frame::new(data, bit_depth))
    };

    debug!(
        path = %path.display(),
        width = w,
        height = h,
        channels = image.channel_count(),
        bit_depth,
        "Image loaded"
    );
    Ok(image)
}
