//! Per-call upload options and their merge over the configured defaults.

use serde::{Deserialize, Serialize};

use crate::config::UploaderConfig;
use crate::models::visibility::Visibility;

/// Options supplied with a single upload. Unset fields fall back to the configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadOptions {
    pub disk: Option<String>,
    pub visibility: Option<Visibility>,
    pub user_id: Option<i64>,
    pub path: Option<String>,
    pub safe: Option<bool>,
}

impl UploadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disk(mut self, disk: impl Into<String>) -> Self {
        self.disk = Some(disk.into());
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Set the visibility from untrusted text; unknown values become public.
    pub fn visibility_str(mut self, visibility: &str) -> Self {
        self.visibility = Some(Visibility::parse_or_public(visibility));
        self
    }

    pub fn user_id(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn path(mut self, template: impl Into<String>) -> Self {
        self.path = Some(template.into());
        self
    }

    pub fn safe(mut self, safe: bool) -> Self {
        self.safe = Some(safe);
        self
    }

    /// Merge these options over the configured defaults. Per-call values win.
    pub fn resolve(&self, config: &UploaderConfig) -> ResolvedOptions {
        ResolvedOptions {
            disk: self
                .disk
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| config.default_disk.clone()),
            visibility: self.visibility.unwrap_or(config.visibility),
            user_id: self.user_id.unwrap_or(config.user_id),
            path: self
                .path
                .clone()
                .unwrap_or_else(|| config.path_template.clone()),
            safe: self.safe.unwrap_or(config.safe),
        }
    }
}

/// Fully merged options for one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub disk: String,
    pub visibility: Visibility,
    pub user_id: i64,
    pub path: String,
    pub safe: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_PATH_TEMPLATE;

    #[test]
    fn test_defaults_come_from_config() {
        let config = UploaderConfig::default();
        let resolved = UploadOptions::new().resolve(&config);

        assert_eq!(resolved.disk, "local");
        assert_eq!(resolved.visibility, Visibility::Public);
        assert_eq!(resolved.user_id, 1);
        assert_eq!(resolved.path, DEFAULT_PATH_TEMPLATE);
        assert!(!resolved.safe);
    }

    #[test]
    fn test_per_call_values_win() {
        let config = UploaderConfig::default();
        let resolved = UploadOptions::new()
            .disk("public")
            .visibility(Visibility::Private)
            .user_id(42)
            .path("{type}/{filename}")
            .safe(true)
            .resolve(&config);

        assert_eq!(resolved.disk, "public");
        assert_eq!(resolved.visibility, Visibility::Private);
        assert_eq!(resolved.user_id, 42);
        assert_eq!(resolved.path, "{type}/{filename}");
        assert!(resolved.safe);
    }

    #[test]
    fn test_invalid_visibility_text_resets_to_public() {
        let config = UploaderConfig {
            visibility: Visibility::Private,
            ..UploaderConfig::default()
        };
        let resolved = UploadOptions::new().visibility_str("hidden").resolve(&config);
        assert_eq!(resolved.visibility, Visibility::Public);
    }
}
