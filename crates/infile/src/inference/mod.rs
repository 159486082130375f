//! Inference engine for column width and type detection.

mod inferencer;
mod profile;

pub use inferencer::{InferredSchema, LENGTH_CLASSIFIED_COLUMNS, SchemaInferencer, classify};
pub use profile::FieldProfile;
