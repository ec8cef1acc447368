//! Defaults shared by configuration and the upload pipeline.

/// Default path template for stored uploads.
pub const DEFAULT_PATH_TEMPLATE: &str = "uploads/{user_id}/{type}/{filename}";

/// Default disk used when neither the call nor the environment names one.
pub const DEFAULT_DISK: &str = "local";

/// Files are grouped under this user when no user is given.
pub const DEFAULT_USER_ID: i64 = 1;

/// Fallback MIME type when nothing more specific is known.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// MIME type for which dimension probing is skipped.
pub const SVG_MIME: &str = "image/svg+xml";

/// Placeholder tokens understood by the path template.
pub const PLACEHOLDER_USER_ID: &str = "{user_id}";
pub const PLACEHOLDER_TYPE: &str = "{type}";
pub const PLACEHOLDER_FILENAME: &str = "{filename}";
