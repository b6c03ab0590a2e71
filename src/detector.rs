use anyhow::Result;
use image::DynamicImage;
use log::{info, warn};
use rustface::{ImageData, Model};
use std::fs::File;
use std::path::Path;

use crate::error::ModelError;

/// File name of the SeetaFace frontal detector inside the models directory.
pub const MODEL_FILE: &str = "seeta_fd_frontal_v1.0.bin";

/// Mirrors tried in order when the model has to be downloaded.
const MODEL_URLS: [&str; 2] = [
    "https://github.com/atomashpolskiy/rustface/raw/master/model/seeta_fd_frontal_v1.0.bin",
    "https://raw.githubusercontent.com/atomashpolskiy/rustface/master/model/seeta_fd_frontal_v1.0.bin",
];

/// Axis-aligned face bounding box in source image pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceBox {
    pub x: f64,      // Left coordinate
    pub y: f64,      // Top coordinate
    pub width: f64,  // Width of bounding box
    pub height: f64, // Height of bounding box
}

/// A detected face and the detector's score for it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub face: FaceBox,
    pub score: f64,
}

/// Trait for face detector implementations
pub trait FaceDetector {
    /// Detect all faces in an image
    fn detect_faces(&self, image: &DynamicImage) -> Result<Vec<Detection>>;

    /// Single-face mode: the best scoring face, if any
    fn detect_single_face(&self, image: &DynamicImage) -> Result<Option<Detection>> {
        let faces = self.detect_faces(image)?;
        Ok(faces.into_iter().reduce(|best, candidate| {
            if candidate.score > best.score {
                candidate
            } else {
                best
            }
        }))
    }
}

/// RustFace (SeetaFace) detector implementation.
///
/// Holds the parsed model and builds a fresh scanning detector per image, so
/// the handle itself is never mutated after loading.
pub struct RustFaceDetector {
    model: Model,
}

impl RustFaceDetector {
    /// Load the model from `path`.
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let file = File::open(path).map_err(|source| ModelError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        let model = rustface::read_model(file).map_err(|source| ModelError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { model })
    }
}

impl FaceDetector for RustFaceDetector {
    fn detect_faces(&self, image: &DynamicImage) -> Result<Vec<Detection>> {
        let gray_image = image.to_luma8();

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(20);
        detector.set_score_thresh(2.0);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        // Convert to rustface ImageData format
        let (width, height) = gray_image.dimensions();
        let mut image_data = ImageData::new(gray_image.as_raw(), width, height);

        let faces = detector.detect(&mut image_data);

        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                Detection {
                    face: FaceBox {
                        x: f64::from(bbox.x()),
                        y: f64::from(bbox.y()),
                        width: f64::from(bbox.width()),
                        height: f64::from(bbox.height()),
                    },
                    score: face.score(),
                }
            })
            .collect())
    }
}

/// Load the face detector from `models_dir`.
///
/// This is the one-time initialization step; any failure here aborts the run
/// before a single record is touched. A missing model is only downloaded when
/// `fetch_missing` is set.
pub fn load_detector(models_dir: &Path, fetch_missing: bool) -> Result<RustFaceDetector, ModelError> {
    let model_path = models_dir.join(MODEL_FILE);

    if !model_path.exists() {
        if !fetch_missing {
            return Err(ModelError::Missing { path: model_path });
        }
        download_model(&model_path)?;
    }

    info!("Loading face detection model from {}", model_path.display());
    RustFaceDetector::from_path(&model_path)
}

fn download_model(model_path: &Path) -> Result<(), ModelError> {
    info!("Downloading face detection model...");

    if let Some(dir) = model_path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ModelError::Load {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let mut last_error = String::from("no sources tried");

    for url in &MODEL_URLS {
        info!("Trying to download from: {}", url);

        match fetch_to_file(url, model_path) {
            Ok(()) => {
                info!("Model downloaded successfully from {}", url);
                return Ok(());
            }
            Err(err) => {
                warn!("Failed to download from {}: {}", url, err);
                // Never leave a truncated model behind
                let _ = std::fs::remove_file(model_path);
                last_error = err;
            }
        }
    }

    Err(ModelError::Download {
        path: model_path.to_path_buf(),
        last_error,
    })
}

fn fetch_to_file(url: &str, path: &Path) -> Result<(), String> {
    let response = ureq::get(url).call().map_err(|err| err.to_string())?;
    let mut reader = response.into_reader();
    let mut file = File::create(path).map_err(|err| err.to_string())?;
    std::io::copy(&mut reader, &mut file).map_err(|err| err.to_string())?;
    Ok(())
}
