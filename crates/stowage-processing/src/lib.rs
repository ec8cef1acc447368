//! Stowage Processing Library
//!
//! Everything between an incoming upload and the storage write: extension
//! classification, filename sanitization, path templates, byte-size formatting,
//! image dimension probing and the [`UploadPipeline`] that ties them together.

pub mod classifier;
pub mod dimensions;
pub mod humanize;
pub mod path;
pub mod sanitizer;
pub mod units;
pub mod upload;

pub use classifier::{classify, icon_reference, mime_type_for_filename, InferSniffer, MimeSniffer};
pub use dimensions::{probe_dimensions, ImageInput};
pub use humanize::{diff_for_humans, diff_for_humans_now};
pub use path::resolve_path;
pub use sanitizer::{sanitize, sanitize_extension};
pub use units::{format_bytes, from_bytes, to_bytes, ByteUnit, ToBytes};
pub use upload::{split_filename, UploadPipeline, UploadRequest, UploadSource};
