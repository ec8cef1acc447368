pub mod file_type;
pub mod image_size;
pub mod options;
pub mod stored_file;
pub mod visibility;

pub use file_type::FileType;
pub use image_size::ImageSize;
pub use options::{ResolvedOptions, UploadOptions};
pub use stored_file::{FileMeta, StoredFile};
pub use visibility::Visibility;
