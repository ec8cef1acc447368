use anyhow::Context;
use serde::Serialize;
use stowage_core::ImageSize;
use stowage_processing::classifier::{all_extensions, documents, images};

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

/// Known extensions and image size presets.
pub fn catalog() -> serde_json::Value {
    let sizes: serde_json::Map<String, serde_json::Value> = ImageSize::ALL
        .iter()
        .map(|size| (size.key().to_string(), size.width().into()))
        .collect();

    serde_json::json!({
        "extensions": all_extensions(),
        "images": images(),
        "documents": documents(),
        "image_sizes": sizes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lists_extensions_and_sizes() {
        let catalog = catalog();

        let extensions = catalog["extensions"].as_array().unwrap();
        assert!(extensions.iter().any(|e| e == "jpg"));
        assert!(extensions.iter().any(|e| e == "woff2"));
        assert_eq!(catalog["images"][0], "jpg");
        assert!(catalog["documents"]
            .as_array()
            .unwrap()
            .iter()
            .any(|e| e == "pdf"));
        assert_eq!(catalog["image_sizes"]["thumb"], 60);
        assert_eq!(catalog["image_sizes"]["xl"], 2048);
    }
}
