use serde::{Deserialize, Serialize};

/// Named image size presets and their pixel widths.
///
/// Only the vocabulary lives here; nothing in Stowage resizes images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    Thumb,
    #[serde(rename = "xs")]
    XSmall,
    #[serde(rename = "sm")]
    Small,
    #[serde(rename = "md")]
    Medium,
    #[serde(rename = "lg")]
    Large,
    #[serde(rename = "xl")]
    XLarge,
}

impl ImageSize {
    pub const ALL: [ImageSize; 6] = [
        ImageSize::Thumb,
        ImageSize::XSmall,
        ImageSize::Small,
        ImageSize::Medium,
        ImageSize::Large,
        ImageSize::XLarge,
    ];

    pub fn width(&self) -> u32 {
        match self {
            ImageSize::Thumb => 60,
            ImageSize::XSmall => 150,
            ImageSize::Small => 300,
            ImageSize::Medium => 768,
            ImageSize::Large => 1024,
            ImageSize::XLarge => 2048,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            ImageSize::Thumb => "thumb",
            ImageSize::XSmall => "xs",
            ImageSize::Small => "sm",
            ImageSize::Medium => "md",
            ImageSize::Large => "lg",
            ImageSize::XLarge => "xl",
        }
    }
}
