pub mod codec;
pub mod crop;
pub mod detector;
pub mod error;
pub mod fetch;
pub mod input;
pub mod naming;
pub mod pipeline;

// Re-export commonly used items
pub use codec::{ImageCodec, JpegCodec};
pub use crop::{plan_crop, CropRegion, ImageDimensions, EXPAND_FACTOR};
pub use detector::{load_detector, Detection, FaceBox, FaceDetector, RustFaceDetector};
pub use error::{FetchError, ModelError, RecordError};
pub use fetch::{Fetcher, HttpFetcher};
pub use input::InputRecord;
pub use pipeline::{BatchSummary, RecordOutcome, RecordPipeline, SkipReason};
