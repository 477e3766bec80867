//! Image transformation capabilities
//!
//! Preparing an image for upload is behind the [`ImageTransform`] trait so
//! the survey builder doesn't care whether it is resizing, linking or
//! copying. [`Downscale`] uses the `image` crate; [`LinkOrCopy`] leaves the
//! pixels alone.

use crate::domain::{Result, TaggerError};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Produces an output image file from an input image file
pub trait ImageTransform: Send + Sync {
    /// Write the transformed `input` to `output`
    ///
    /// The parent directory of `output` already exists.
    fn transform(&self, input: &Path, output: &Path) -> Result<()>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Downsample images wider than `max_width`, preserving aspect ratio
///
/// Images already within bounds are re-encoded at their original size.
#[derive(Debug, Clone, Copy)]
pub struct Downscale {
    max_width: u32,
}

impl Downscale {
    /// Create a downscaler; `max_width` must be non-zero
    pub fn new(max_width: u32) -> Result<Self> {
        if max_width == 0 {
            return Err(TaggerError::Validation(
                "max image width must be > 0".to_string(),
            ));
        }
        Ok(Self { max_width })
    }

    /// Configured maximum width
    pub fn max_width(&self) -> u32 {
        self.max_width
    }
}

impl ImageTransform for Downscale {
    fn transform(&self, input: &Path, output: &Path) -> Result<()> {
        let img = image::open(input)
            .map_err(|e| TaggerError::Image(format!("{}: {}", input.display(), e)))?;
        let (width, height) = img.dimensions();
        let (new_width, new_height) = clamp_size(width, height, Some(self.max_width), None);

        let resized = if (new_width, new_height) == (width, height) {
            img
        } else {
            tracing::debug!(
                input = %input.display(),
                from = ?(width, height),
                to = ?(new_width, new_height),
                "Downscaling image"
            );
            img.resize_exact(new_width, new_height, FilterType::CatmullRom)
        };

        // JPEG has no alpha channel.
        let resized = if is_jpeg(output) {
            DynamicImage::ImageRgb8(resized.to_rgb8())
        } else {
            resized
        };

        resized
            .save(output)
            .map_err(|e| TaggerError::Image(format!("{}: {}", output.display(), e)))
    }

    fn name(&self) -> &'static str {
        "downscale"
    }
}

/// Reuse the source image unchanged
///
/// Creates a relative symlink where the platform allows it and falls back
/// to copying the file.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkOrCopy;

impl ImageTransform for LinkOrCopy {
    fn transform(&self, input: &Path, output: &Path) -> Result<()> {
        match link(input, output) {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::debug!(
                    input = %input.display(),
                    error = %e,
                    "Symlink failed, copying instead"
                );
                fs::copy(input, output).map_err(|e| {
                    TaggerError::Io(format!(
                        "Failed to copy {} to {}: {}",
                        input.display(),
                        output.display(),
                        e
                    ))
                })?;
                Ok(())
            }
        }
    }

    fn name(&self) -> &'static str {
        "link-or-copy"
    }
}

#[cfg(unix)]
fn link(input: &Path, output: &Path) -> std::io::Result<()> {
    let target = fs::canonicalize(input)?;
    let base = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::canonicalize(parent)?,
        _ => std::env::current_dir()?,
    };
    std::os::unix::fs::symlink(relative_path(&base, &target), output)
}

#[cfg(not(unix))]
fn link(_input: &Path, _output: &Path) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "symlinks not used on this platform",
    ))
}

/// Path of `target` relative to the directory `base`; both must be absolute
pub fn relative_path(base: &Path, target: &Path) -> PathBuf {
    let base: Vec<Component<'_>> = base.components().collect();
    let target: Vec<Component<'_>> = target.components().collect();
    let common = base
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &target[common..] {
        relative.push(component.as_os_str());
    }
    relative
}

/// Scale `(width, height)` down to fit the given bounds, never up
///
/// Missing bounds impose no constraint. Results are rounded and at least 1.
pub fn clamp_size(
    width: u32,
    height: u32,
    max_width: Option<u32>,
    max_height: Option<u32>,
) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }

    let scale_w = max_width.map_or(1.0, |max| f64::from(max) / f64::from(width));
    let scale_h = max_height.map_or(1.0, |max| f64::from(max) / f64::from(height));
    let scale = scale_w.min(scale_h).min(1.0);

    let scaled = |dim: u32| ((f64::from(dim) * scale).round() as u32).max(1);
    (scaled(width), scaled(height))
}

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            ext == "jpg" || ext == "jpeg"
        })
        .unwrap_or(false)
}
