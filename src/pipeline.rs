use std::fs;
use std::path::PathBuf;

use image::GenericImageView;
use log::{debug, error, info};
use serde_json::Value;

use crate::codec::ImageCodec;
use crate::crop::{plan_crop, ImageDimensions};
use crate::detector::FaceDetector;
use crate::error::RecordError;
use crate::fetch::Fetcher;
use crate::input::{entry_label, InputRecord};
use crate::naming::output_filename;

/// Expected negative outcomes that are not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoFace,
}

/// Result of processing one record.
#[derive(Debug)]
pub enum RecordOutcome {
    Saved { filename: String, size: u32 },
    Skipped(SkipReason),
    Failed(RecordError),
}

/// Counts of record outcomes for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub saved: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.saved + self.skipped + self.failed
    }
}

/// Fetch, detect, crop and save, one record at a time.
pub struct RecordPipeline<F, C, D> {
    fetcher: F,
    codec: C,
    detector: D,
    output_dir: PathBuf,
    expand_factor: f64,
}

impl<F, C, D> RecordPipeline<F, C, D>
where
    F: Fetcher,
    C: ImageCodec,
    D: FaceDetector,
{
    pub fn new(fetcher: F, codec: C, detector: D, output_dir: impl Into<PathBuf>, expand_factor: f64) -> Self {
        Self {
            fetcher,
            codec,
            detector,
            output_dir: output_dir.into(),
            expand_factor,
        }
    }

    /// Process a single record. Nothing is written unless every step succeeds.
    pub fn process(&self, record: &InputRecord) -> RecordOutcome {
        match self.try_process(record) {
            Ok(Some((filename, size))) => RecordOutcome::Saved { filename, size },
            Ok(None) => RecordOutcome::Skipped(SkipReason::NoFace),
            Err(err) => RecordOutcome::Failed(err),
        }
    }

    fn try_process(&self, record: &InputRecord) -> Result<Option<(String, u32)>, RecordError> {
        let bytes = self.fetcher.fetch(&record.url)?;

        let image = self.codec.decode(&bytes).map_err(RecordError::Decode)?;
        let (width, height) = image.dimensions();
        let dimensions = ImageDimensions { width, height };

        let detection = match self
            .detector
            .detect_single_face(&image)
            .map_err(RecordError::Detection)?
        {
            Some(detection) => detection,
            None => return Ok(None),
        };
        debug!(
            "Face for {} at {:?} (score {:.2}) in {}x{} image",
            record.name, detection.face, detection.score, width, height
        );

        let region = plan_crop(&detection.face, dimensions, self.expand_factor);
        if region.is_empty() {
            return Err(RecordError::EmptyCrop {
                x: detection.face.x,
                y: detection.face.y,
                width,
                height,
            });
        }

        // Extract from the fetched bytes, never from a re-encoded copy
        let cropped = self
            .codec
            .extract(&bytes, region)
            .map_err(RecordError::Extract)?;

        let filename = output_filename(&record.name, region.size);
        let path = self.output_dir.join(&filename);
        if path.exists() {
            debug!("Overwriting existing {}", path.display());
        }
        fs::write(&path, cropped).map_err(|source| RecordError::Write { path, source })?;

        Ok(Some((filename, region.size)))
    }

    /// Process every entry in order, logging each outcome.
    ///
    /// A failing entry never stops the batch.
    pub fn run_batch(&self, entries: &[Value]) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for (index, entry) in entries.iter().enumerate() {
            let outcome = match InputRecord::from_entry(entry) {
                Ok(record) => self.process(&record),
                Err(err) => RecordOutcome::Failed(err),
            };
            let label = entry_label(entry, index);

            match outcome {
                RecordOutcome::Saved { filename, .. } => {
                    info!("Processed: {}", filename);
                    summary.saved += 1;
                }
                RecordOutcome::Skipped(SkipReason::NoFace) => {
                    info!("No face detected for {}", label);
                    summary.skipped += 1;
                }
                RecordOutcome::Failed(err) => {
                    error!("Error processing {}: {}", label, err);
                    summary.failed += 1;
                }
            }
        }

        summary
    }
}
