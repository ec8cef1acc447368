use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Semantic category of a stored file, derived from its extension.
///
/// `Spreadsheets` is part of the vocabulary but classification never produces it:
/// spreadsheet extensions are classified as documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Image,
    Audio,
    Video,
    File,
    Font,
    Archive,
    Document,
    Spreadsheets,
}

impl FileType {
    pub const ALL: [FileType; 8] = [
        FileType::Image,
        FileType::Audio,
        FileType::Video,
        FileType::File,
        FileType::Font,
        FileType::Archive,
        FileType::Document,
        FileType::Spreadsheets,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Image => "image",
            FileType::Audio => "audio",
            FileType::Video => "video",
            FileType::File => "file",
            FileType::Font => "font",
            FileType::Archive => "archive",
            FileType::Document => "document",
            FileType::Spreadsheets => "spreadsheets",
        }
    }
}

impl Display for FileType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FileType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow::anyhow!("Invalid file type: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_round_trip_through_str() {
        for t in FileType::ALL {
            assert_eq!(t.to_string().parse::<FileType>().unwrap(), t);
        }
        assert!("folder".parse::<FileType>().is_err());
    }

    #[test]
    fn test_file_type_serializes_lowercase() {
        let json = serde_json::to_string(&FileType::Document).unwrap();
        assert_eq!(json, "\"document\"");
    }
}
