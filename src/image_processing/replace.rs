use anyhow::{Context, Result};
use image::{imageops, DynamicImage, ImageFormat, ImageReader, RgbaImage};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::pairing::ReplaceJob;
use super::resize::resize_exact;
use super::ReplaceOptions;

/// Why a target was left untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Target carries an alpha channel or a transparency marker
    Transparent,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Transparent => "transparent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    Replaced,
    Skipped(SkipReason),
}

/// Replace one target image with its assigned source
///
/// On error the target may be left unchanged or partially written, depending
/// on which step failed.
pub fn replace_image(job: &ReplaceJob, options: &ReplaceOptions, dry_run: bool) -> Result<ReplaceOutcome> {
    let (target, target_format) = open_image(&job.target, "target")?;
    let (source, _) = open_image(&job.source, "source")?;

    if options.skip_transparency && !options.preserve_transparency {
        let transparent = match target_format {
            Some(ImageFormat::Gif) => gif_declares_transparency(&job.target)?,
            _ => has_transparency(&target),
        };
        if transparent {
            return Ok(ReplaceOutcome::Skipped(SkipReason::Transparent));
        }
    }

    let target = target.into_rgba8();
    let mut source = source.into_rgba8();

    if options.flip_images {
        source = imageops::flip_vertical(&source);
    }

    let (width, height) = target.dimensions();
    let mut replacement = resize_exact(&source, width, height, options.resize_mode)
        .with_context(|| format!("Failed to resize {} to {}x{}", job.source.display(), width, height))?;

    if options.preserve_transparency {
        copy_alpha(&target, &mut replacement);
    }

    if !dry_run {
        save_replacement(replacement, &job.target)?;
    }

    Ok(ReplaceOutcome::Replaced)
}

/// Decode an image, detecting the format from its content
///
/// Returns the detected format alongside the pixels. The extension is only a
/// fallback when the content signature is not recognized.
fn open_image(path: &Path, role: &str) -> Result<(DynamicImage, Option<ImageFormat>)> {
    let reader = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .with_context(|| format!("Failed to open {} image {}", role, path.display()))?;
    let format = reader.format();
    let img = reader
        .decode()
        .with_context(|| format!("Failed to decode {} image {}", role, path.display()))?;

    Ok((img, format))
}

/// Whether a decoded image carries transparency
///
/// PNG tRNS chunks are expanded into an alpha channel by the decoder, so the
/// color type covers them.
pub fn has_transparency(img: &DynamicImage) -> bool {
    img.color().has_alpha()
}

/// Whether the first GIF frame declares a transparent palette index
///
/// GIF frames always decode as RGBA, so the marker is read from the graphic
/// control extension instead. A declared index counts even if no pixel uses it.
pub fn gif_declares_transparency(path: &Path) -> Result<bool> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut decoder = gif::DecodeOptions::new()
        .read_info(BufReader::new(file))
        .with_context(|| format!("Failed to read GIF header of {}", path.display()))?;
    let frame = decoder
        .next_frame_info()
        .with_context(|| format!("Failed to read GIF frame of {}", path.display()))?;

    Ok(frame.is_some_and(|frame| frame.transparent.is_some()))
}

/// Overwrite the alpha channel of `dst` with the alpha channel of `src`
pub fn copy_alpha(src: &RgbaImage, dst: &mut RgbaImage) {
    debug_assert_eq!(src.dimensions(), dst.dimensions());
    for (dst_pixel, src_pixel) in dst.pixels_mut().zip(src.pixels()) {
        dst_pixel[3] = src_pixel[3];
    }
}

/// Write the replacement over the target, format taken from the extension
fn save_replacement(img: RgbaImage, path: &Path) -> Result<()> {
    let format = ImageFormat::from_path(path)
        .with_context(|| format!("Cannot infer image format for {}", path.display()))?;

    let result = match format {
        // JPEG has no alpha channel
        ImageFormat::Jpeg => DynamicImage::ImageRgba8(img).into_rgb8().save_with_format(path, format),
        _ => img.save_with_format(path, format),
    };

    result.with_context(|| format!("Failed to save {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ResizeMode;
    use image::{ImageBuffer, Rgb, RgbImage, Rgba};
    use std::borrow::Cow;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn options() -> ReplaceOptions {
        ReplaceOptions {
            flip_images: false,
            skip_transparency: false,
            preserve_transparency: false,
            resize_mode: ResizeMode::Standard,
        }
    }

    fn job(target: PathBuf, source: PathBuf) -> ReplaceJob {
        ReplaceJob {
            index: 1,
            total: 1,
            target,
            source,
        }
    }

    fn write_rgb(dir: &TempDir, name: &str, width: u32, height: u32, color: [u8; 3]) -> PathBuf {
        let path = dir.path().join(name);
        let img: RgbImage = ImageBuffer::from_pixel(width, height, Rgb(color));
        img.save(&path).unwrap();
        path
    }

    fn write_gradient_alpha(dir: &TempDir, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.path().join(name);
        let img: RgbaImage =
            ImageBuffer::from_fn(width, height, |x, y| Rgba([10, 20, 30, ((x * 17 + y * 5) % 256) as u8]));
        img.save(&path).unwrap();
        path
    }

    /// 4x4 GIF painted with palette index 0 only
    fn write_gif(dir: &TempDir, name: &str, transparent: Option<u8>) -> PathBuf {
        let path = dir.path().join(name);
        let palette = [0, 0, 0, 255, 255, 255];
        let file = fs::File::create(&path).unwrap();
        let mut encoder = gif::Encoder::new(file, 4, 4, &palette).unwrap();
        let frame = gif::Frame {
            width: 4,
            height: 4,
            buffer: Cow::Owned(vec![0; 16]),
            transparent,
            ..gif::Frame::default()
        };
        encoder.write_frame(&frame).unwrap();
        path
    }

    #[test]
    fn test_replace_keeps_target_dimensions() {
        let dir = TempDir::new().unwrap();
        let target = write_rgb(&dir, "target.png", 13, 7, [0, 0, 0]);
        let source = write_rgb(&dir, "source.png", 40, 40, [250, 5, 5]);

        let outcome = replace_image(&job(target.clone(), source), &options(), false).unwrap();
        assert_eq!(outcome, ReplaceOutcome::Replaced);

        let result = image::open(&target).unwrap().into_rgba8();
        assert_eq!(result.dimensions(), (13, 7));
        let pixel = result.get_pixel(6, 3);
        assert!(pixel[0] >= 249 && pixel[1] <= 6);
    }

    #[test]
    fn test_skip_transparent_target_untouched() {
        let dir = TempDir::new().unwrap();
        let target = write_gradient_alpha(&dir, "alpha.png", 8, 8);
        let source = write_rgb(&dir, "source.png", 4, 4, [1, 2, 3]);
        let before = fs::read(&target).unwrap();

        let opts = ReplaceOptions {
            skip_transparency: true,
            ..options()
        };
        let outcome = replace_image(&job(target.clone(), source), &opts, false).unwrap();

        assert_eq!(outcome, ReplaceOutcome::Skipped(SkipReason::Transparent));
        assert_eq!(fs::read(&target).unwrap(), before);
    }

    #[test]
    fn test_preserve_overrides_skip() {
        let dir = TempDir::new().unwrap();
        let target = write_gradient_alpha(&dir, "alpha.png", 8, 8);
        let source = write_rgb(&dir, "source.png", 4, 4, [1, 2, 3]);

        let opts = ReplaceOptions {
            skip_transparency: true,
            preserve_transparency: true,
            ..options()
        };
        let outcome = replace_image(&job(target, source), &opts, false).unwrap();
        assert_eq!(outcome, ReplaceOutcome::Replaced);
    }

    #[test]
    fn test_preserve_transparency_keeps_alpha_mask() {
        let dir = TempDir::new().unwrap();
        let target = write_gradient_alpha(&dir, "alpha.png", 9, 6);
        let original_alpha: Vec<u8> = image::open(&target)
            .unwrap()
            .into_rgba8()
            .pixels()
            .map(|p| p[3])
            .collect();
        let source = write_rgb(&dir, "source.png", 30, 30, [0, 255, 0]);

        let opts = ReplaceOptions {
            preserve_transparency: true,
            ..options()
        };
        replace_image(&job(target.clone(), source), &opts, false).unwrap();

        let result = image::open(&target).unwrap().into_rgba8();
        let alpha: Vec<u8> = result.pixels().map(|p| p[3]).collect();
        assert_eq!(alpha, original_alpha);

        // Color comes from the source wherever it is visible
        for pixel in result.pixels().filter(|p| p[3] > 0) {
            assert!(pixel[1] >= 254);
            assert!(pixel[0] <= 1);
        }
    }

    #[test]
    fn test_flip_mirrors_source_vertically() {
        let dir = TempDir::new().unwrap();
        let target = write_rgb(&dir, "target.png", 4, 4, [0, 0, 0]);
        let source = dir.path().join("source.png");
        let source_img: RgbImage =
            ImageBuffer::from_fn(6, 16, |_, y| if y < 8 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) });
        source_img.save(&source).unwrap();

        let opts = ReplaceOptions {
            flip_images: true,
            ..options()
        };
        replace_image(&job(target.clone(), source.clone()), &opts, false).unwrap();

        let result = image::open(&target).unwrap().into_rgba8();
        assert_eq!(result.dimensions(), (4, 4));

        // Flipped first, then resized
        let flipped = imageops::flip_vertical(&image::open(&source).unwrap().into_rgba8());
        let expected = resize_exact(&flipped, 4, 4, ResizeMode::Standard).unwrap();
        assert_eq!(result, expected);

        let top = result.get_pixel(1, 0);
        let bottom = result.get_pixel(1, 3);
        assert!(top[2] >= 250 && top[0] <= 5);
        assert!(bottom[0] >= 250 && bottom[2] <= 5);
    }

    #[test]
    fn test_mislabelled_target_is_replaced() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("photo.jpg");
        let png_bytes: RgbImage = ImageBuffer::from_pixel(10, 6, Rgb([20, 40, 60]));
        png_bytes.save_with_format(&target, ImageFormat::Png).unwrap();
        let source = write_rgb(&dir, "source.png", 5, 5, [200, 10, 10]);

        let outcome = replace_image(&job(target.clone(), source), &options(), false).unwrap();
        assert_eq!(outcome, ReplaceOutcome::Replaced);

        // Written back in the format the extension names
        assert_eq!(ImageFormat::from_path(&target).unwrap(), ImageFormat::Jpeg);
        let written = ImageReader::open(&target).unwrap().with_guessed_format().unwrap();
        assert_eq!(written.format(), Some(ImageFormat::Jpeg));
        let written = written.decode().unwrap();
        assert_eq!((written.width(), written.height()), (10, 6));
    }

    #[test]
    fn test_gif_with_unused_transparent_index_is_skipped() {
        let dir = TempDir::new().unwrap();
        let target = write_gif(&dir, "marked.gif", Some(1));
        let source = write_rgb(&dir, "source.png", 4, 4, [1, 2, 3]);
        let before = fs::read(&target).unwrap();

        // Every pixel decodes opaque
        let decoded = image::open(&target).unwrap().into_rgba8();
        assert!(decoded.pixels().all(|p| p[3] == u8::MAX));

        let opts = ReplaceOptions {
            skip_transparency: true,
            ..options()
        };
        let outcome = replace_image(&job(target.clone(), source), &opts, false).unwrap();

        assert_eq!(outcome, ReplaceOutcome::Skipped(SkipReason::Transparent));
        assert_eq!(fs::read(&target).unwrap(), before);
    }

    #[test]
    fn test_gif_without_transparent_index_is_replaced() {
        let dir = TempDir::new().unwrap();
        let target = write_gif(&dir, "plain.gif", None);
        let source = write_rgb(&dir, "source.png", 4, 4, [1, 2, 3]);
        let before = fs::read(&target).unwrap();

        let opts = ReplaceOptions {
            skip_transparency: true,
            ..options()
        };
        let outcome = replace_image(&job(target.clone(), source), &opts, false).unwrap();

        assert_eq!(outcome, ReplaceOutcome::Replaced);
        assert_ne!(fs::read(&target).unwrap(), before);
        let written = image::open(&target).unwrap();
        assert_eq!((written.width(), written.height()), (4, 4));
    }

    #[test]
    fn test_jpeg_target_written_without_alpha() {
        let dir = TempDir::new().unwrap();
        let target = write_rgb(&dir, "photo.jpg", 16, 16, [128, 128, 128]);
        let source = write_gradient_alpha(&dir, "source.png", 8, 8);

        let outcome = replace_image(&job(target.clone(), source), &options(), false).unwrap();
        assert_eq!(outcome, ReplaceOutcome::Replaced);
        let written = image::open(&target).unwrap();
        assert_eq!((written.width(), written.height()), (16, 16));
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let dir = TempDir::new().unwrap();
        let target = write_rgb(&dir, "target.png", 5, 5, [9, 9, 9]);
        let source = write_rgb(&dir, "source.png", 5, 5, [200, 200, 200]);
        let before = fs::read(&target).unwrap();

        let outcome = replace_image(&job(target.clone(), source), &options(), true).unwrap();
        assert_eq!(outcome, ReplaceOutcome::Replaced);
        assert_eq!(fs::read(&target).unwrap(), before);
    }

    #[test]
    fn test_corrupt_target_is_error() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("broken.png");
        fs::write(&target, b"definitely not a png").unwrap();
        let source = write_rgb(&dir, "source.png", 5, 5, [1, 1, 1]);

        let err = replace_image(&job(target.clone(), source), &options(), false).unwrap_err();
        assert!(format!("{:#}", err).contains("broken.png"));
    }

    #[test]
    fn test_has_transparency() {
        let opaque = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(2, 2, Rgb([0, 0, 0])));
        assert!(!has_transparency(&opaque));

        let rgba_opaque = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(2, 2, Rgba([0, 0, 0, 255])));
        assert!(has_transparency(&rgba_opaque));
    }

    #[test]
    fn test_gif_declares_transparency() {
        let dir = TempDir::new().unwrap();
        assert!(gif_declares_transparency(&write_gif(&dir, "marked.gif", Some(0))).unwrap());
        assert!(!gif_declares_transparency(&write_gif(&dir, "plain.gif", None)).unwrap());

        let broken = dir.path().join("broken.gif");
        fs::write(&broken, b"GIF89a").unwrap();
        assert!(gif_declares_transparency(&broken).is_err());
    }

    #[test]
    fn test_copy_alpha() {
        let src: RgbaImage = ImageBuffer::from_fn(3, 3, |x, _| Rgba([0, 0, 0, (x * 100) as u8]));
        let mut dst: RgbaImage = ImageBuffer::from_pixel(3, 3, Rgba([7, 8, 9, 255]));
        copy_alpha(&src, &mut dst);

        assert_eq!(*dst.get_pixel(0, 1), Rgba([7, 8, 9, 0]));
        assert_eq!(*dst.get_pixel(2, 2), Rgba([7, 8, 9, 200]));
    }
}
