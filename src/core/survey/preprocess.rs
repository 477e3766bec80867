//! Preparing images in the work directory before upload
//!
//! Outputs mirror the layout of the images directory. An output that
//! already exists is never regenerated, even if its source changed; delete
//! the work directory to force a rebuild.

use crate::adapters::imaging::{Downscale, ImageTransform, LinkOrCopy};
use crate::domain::{ImageRef, Result, TaggerError};
use std::fs;
use std::path::Path;

/// What happened to a single image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrepareOutcome {
    /// Output already present; nothing was done
    Skipped,
    /// Output was produced by the transform
    Transformed,
}

/// Counts for a preprocessing run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreprocessSummary {
    /// Images transformed this run
    pub processed: usize,
    /// Images whose output already existed
    pub skipped: usize,
}

/// Applies an [`ImageTransform`] to each image, skipping finished outputs
pub struct ImagePreprocessor {
    transform: Box<dyn ImageTransform>,
}

impl ImagePreprocessor {
    /// Downscale to `max_width` when given, otherwise link or copy
    pub fn for_max_width(max_width: Option<u32>) -> Result<Self> {
        let transform: Box<dyn ImageTransform> = match max_width {
            Some(width) => Box::new(Downscale::new(width)?),
            None => Box::new(LinkOrCopy),
        };
        Ok(Self::with_transform(transform))
    }

    /// Use a specific transform
    pub fn with_transform(transform: Box<dyn ImageTransform>) -> Self {
        Self { transform }
    }

    /// Name of the active transform
    pub fn transform_name(&self) -> &'static str {
        self.transform.name()
    }

    /// Produce `output` from `input` unless `output` already exists
    ///
    /// A dangling symlink at `output` counts as existing.
    pub fn prepare(&self, input: &Path, output: &Path) -> Result<PrepareOutcome> {
        if fs::symlink_metadata(output).is_ok() {
            tracing::trace!(output = %output.display(), "Output exists, skipping");
            return Ok(PrepareOutcome::Skipped);
        }

        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                TaggerError::Io(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        self.transform.transform(input, output)?;
        Ok(PrepareOutcome::Transformed)
    }

    /// Prepare every image from `images_dir` into the same place under `work_dir`
    pub fn prepare_all(
        &self,
        images_dir: &Path,
        work_dir: &Path,
        images: &[ImageRef],
    ) -> Result<PreprocessSummary> {
        let mut summary = PreprocessSummary::default();
        for image in images {
            let input = images_dir.join(image.relative_path());
            let output = work_dir.join(image.relative_path());
            match self.prepare(&input, &output)? {
                PrepareOutcome::Skipped => summary.skipped += 1,
                PrepareOutcome::Transformed => summary.processed += 1,
            }
        }

        tracing::info!(
            transform = self.transform.name(),
            processed = summary.processed,
            skipped = summary.skipped,
            "Images prepared"
        );
        Ok(summary)
    }
}
