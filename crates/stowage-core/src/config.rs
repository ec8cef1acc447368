//! Configuration module
//!
//! Uploader defaults and disk definitions. The configuration is built once at
//! process start (usually with [`UploaderConfig::from_env`]) and handed to the
//! pipeline and facade constructors.

use std::env;

use crate::constants::{DEFAULT_DISK, DEFAULT_PATH_TEMPLATE, DEFAULT_USER_ID};
use crate::models::Visibility;
use crate::storage_types::StorageBackend;

const LOCAL_STORAGE_PATH: &str = "storage/app";
const LOCAL_STORAGE_BASE_URL: &str = "http://localhost:3000/storage";
const PUBLIC_STORAGE_PATH: &str = "storage/app/public";
const PUBLIC_STORAGE_BASE_URL: &str = "http://localhost:3000/storage/public";

/// A named storage location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiskConfig {
    pub name: String,
    pub backend: StorageBackend,
    /// Root directory for filesystem backends.
    pub root: String,
    /// Base URL that stored paths are appended to.
    pub base_url: String,
}

impl DiskConfig {
    pub fn new(
        name: impl Into<String>,
        backend: StorageBackend,
        root: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            backend,
            root: root.into(),
            base_url: base_url.into(),
        }
    }
}

/// Uploader configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploaderConfig {
    pub default_disk: String,
    pub visibility: Visibility,
    pub path_template: String,
    pub user_id: i64,
    /// Use hashed names and content-detected extensions instead of the client's.
    pub safe: bool,
    pub disks: Vec<DiskConfig>,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            default_disk: DEFAULT_DISK.to_string(),
            visibility: Visibility::Public,
            path_template: DEFAULT_PATH_TEMPLATE.to_string(),
            user_id: DEFAULT_USER_ID,
            safe: false,
            disks: vec![
                DiskConfig::new(
                    "local",
                    StorageBackend::Local,
                    LOCAL_STORAGE_PATH,
                    LOCAL_STORAGE_BASE_URL,
                ),
                DiskConfig::new(
                    "public",
                    StorageBackend::Local,
                    PUBLIC_STORAGE_PATH,
                    PUBLIC_STORAGE_BASE_URL,
                ),
            ],
        }
    }
}

impl UploaderConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse::<StorageBackend>()?,
            Err(_) => StorageBackend::Local,
        };

        let disks = vec![
            DiskConfig::new(
                "local",
                backend,
                env::var("LOCAL_STORAGE_PATH").unwrap_or_else(|_| LOCAL_STORAGE_PATH.to_string()),
                env::var("LOCAL_STORAGE_BASE_URL")
                    .unwrap_or_else(|_| LOCAL_STORAGE_BASE_URL.to_string()),
            ),
            DiskConfig::new(
                "public",
                backend,
                env::var("PUBLIC_STORAGE_PATH")
                    .unwrap_or_else(|_| PUBLIC_STORAGE_PATH.to_string()),
                env::var("PUBLIC_STORAGE_BASE_URL")
                    .unwrap_or_else(|_| PUBLIC_STORAGE_BASE_URL.to_string()),
            ),
        ];

        let config = UploaderConfig {
            default_disk: env::var("FILESYSTEM_DISK").unwrap_or_else(|_| DEFAULT_DISK.to_string()),
            visibility: env::var("UPLOAD_VISIBILITY")
                .map(|v| Visibility::parse_or_public(v.trim()))
                .unwrap_or_default(),
            path_template: env::var("UPLOAD_PATH")
                .unwrap_or_else(|_| DEFAULT_PATH_TEMPLATE.to_string()),
            user_id: env::var("UPLOAD_USER_ID")
                .unwrap_or_else(|_| DEFAULT_USER_ID.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("UPLOAD_USER_ID must be a valid integer"))?,
            safe: env::var("UPLOAD_SAFE")
                .unwrap_or_else(|_| "false".to_string())
                .to_lowercase()
                .parse()
                .unwrap_or(false),
            disks,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.default_disk.trim().is_empty() {
            return Err(anyhow::anyhow!("FILESYSTEM_DISK cannot be empty"));
        }

        if self.disk(&self.default_disk).is_none() {
            return Err(anyhow::anyhow!(
                "Default disk [{}] is not configured",
                self.default_disk
            ));
        }

        if self.path_template.trim().is_empty() {
            return Err(anyhow::anyhow!("UPLOAD_PATH cannot be empty"));
        }

        Ok(())
    }

    /// Look up a configured disk by name.
    pub fn disk(&self, name: &str) -> Option<&DiskConfig> {
        self.disks.iter().find(|d| d.name == name)
    }
}
