pub mod file_access;
pub mod file_uploader;
