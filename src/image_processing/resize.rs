use anyhow::Result;
use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::RgbaImage;

use crate::cli::ResizeMode;

impl ResizeMode {
    fn filter(&self) -> FilterType {
        match self {
            ResizeMode::Fast => FilterType::Bilinear,
            ResizeMode::Standard => FilterType::CatmullRom,
        }
    }
}

/// Resize an RGBA image to exact dimensions without keeping the aspect ratio
///
/// Alpha is premultiplied during convolution so transparent pixels do not
/// bleed their color into opaque neighbours.
pub fn resize_exact(img: &RgbaImage, width: u32, height: u32, mode: ResizeMode) -> Result<RgbaImage> {
    let (src_width, src_height) = img.dimensions();

    if src_width == 0 || src_height == 0 {
        return Err(anyhow::anyhow!("Source image has zero size"));
    }
    if width == 0 || height == 0 {
        return Err(anyhow::anyhow!("Target size {}x{} is empty", width, height));
    }

    if src_width == width && src_height == height {
        return Ok(img.clone());
    }

    let src_image = Image::from_vec_u8(src_width, src_height, img.as_raw().clone(), PixelType::U8x4)?;
    let mut dst_image = Image::new(width, height, PixelType::U8x4);

    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(mode.filter()));
    let mut resizer = Resizer::new();
    resizer.resize(&src_image, &mut dst_image, &options)?;

    RgbaImage::from_raw(width, height, dst_image.buffer().to_vec())
        .ok_or_else(|| anyhow::anyhow!("Resized buffer does not match {}x{}", width, height))
}
