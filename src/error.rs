//! Error types shared by the record pipeline and its collaborators.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to download a record's image.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Server answered 403, usually a hotlink-protected or mistyped URL
    #[error("Access forbidden (403). The image might be protected or the URL might be incorrect.")]
    Forbidden,

    /// Any other non-2xx answer
    #[error("request failed with status code {code}")]
    Status { code: u16 },

    /// DNS, connect, TLS or malformed URL
    #[error("{0}")]
    Transport(String),

    /// Connection dropped while reading the body
    #[error("failed to read response body: {0}")]
    Body(#[source] std::io::Error),
}

/// Why a single record produced no output file.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("malformed input entry: {0}")]
    MalformedRecord(#[source] serde_json::Error),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("face detection failed: {0:#}")]
    Detection(anyhow::Error),

    #[error("crop region is empty (face at {x:.0},{y:.0} in a {width}x{height} image)")]
    EmptyCrop {
        x: f64,
        y: f64,
        width: u32,
        height: u32,
    },

    #[error("failed to extract crop: {0}")]
    Extract(#[source] image::ImageError),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Detector model could not be made available. Always fatal.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("face detection model not found at {} (run with --fetch-model or place it there manually)", .path.display())]
    Missing { path: PathBuf },

    #[error("failed to load face detection model from {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "failed to download model from all sources. Last error: {last_error}\n\
         Please download the model manually from:\n\
         https://github.com/atomashpolskiy/rustface/tree/master/model\n\
         and place it at: {}",
        .path.display()
    )]
    Download { path: PathBuf, last_error: String },
}
