#![deny(warnings)]

//! Adapter for results produced by the external agent backend.

pub mod payload;
pub mod transform;
pub mod vocab;

pub use payload::{AdkPayload, PersonaSeries, RawResponse};
pub use transform::{resolve_response, transform_adk_response, transform_adk_str};
pub use vocab::{map_decision, map_location, map_sentiment};

use thiserror::Error;
use ttx_core::ValidationError;

#[derive(Debug, Error)]
pub enum AdkError {
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload matches no known agent backend shape")]
    UnrecognizedShape,
    #[error("payload contains no persona data")]
    NoPersonaData,
    #[error("invalid configuration: {0}")]
    Config(#[from] ValidationError),
}
