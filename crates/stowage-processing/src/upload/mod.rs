//! Upload handling: request types and the storage pipeline.

pub mod pipeline;
pub mod types;

pub use pipeline::UploadPipeline;
pub use types::{split_filename, UploadRequest, UploadSource};
