//! Extension classification, MIME lookup and file-type icons.

use std::path::MAIN_SEPARATOR_STR;
use stowage_core::constants::OCTET_STREAM;
use stowage_core::FileType;

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "pjpg", "jpe", "jpeg", "png", "bmp", "gif", "svg", "svgz", "tiff", "tif", "webp",
    "ico", "avif",
];

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "m4a", "ogg", "mpga", "wav"];

const VIDEO_EXTENSIONS: &[&str] = &[
    "smv", "movie", "mov", "wvx", "wmx", "wm", "mp4", "mp4v", "mpg4", "mpeg", "mpg", "mpe",
    "wmv", "avi", "ogv", "3gp", "3g2",
];

const DOCUMENT_EXTENSIONS: &[&str] = &[
    "css", "csv", "html", "htm", "conf", "log", "txt", "text", "pdf", "doc", "docx", "ppt",
    "pptx", "pps", "ppsx", "odt", "xls", "xlsx",
];

const FONT_EXTENSIONS: &[&str] = &["ttc", "otf", "ttf", "woff", "woff2"];

const ARCHIVE_EXTENSIONS: &[&str] = &["gzip", "rar", "tar", "zip", "7z"];

/// Checked in order; the first list containing the extension decides the type.
const CLASSIFICATION_ORDER: &[(FileType, &[&str])] = &[
    (FileType::Image, IMAGE_EXTENSIONS),
    (FileType::Audio, AUDIO_EXTENSIONS),
    (FileType::Video, VIDEO_EXTENSIONS),
    (FileType::Document, DOCUMENT_EXTENSIONS),
    (FileType::Font, FONT_EXTENSIONS),
    (FileType::Archive, ARCHIVE_EXTENSIONS),
];

const ICON_DIRECTORY: [&str; 2] = ["img", "file-type-icons"];

/// Map an extension (without the dot) to its file type. Case-insensitive.
pub fn classify(extension: &str) -> FileType {
    CLASSIFICATION_ORDER
        .iter()
        .find(|(_, list)| list.iter().any(|ext| ext.eq_ignore_ascii_case(extension)))
        .map(|(file_type, _)| *file_type)
        .unwrap_or(FileType::File)
}

/// Every known extension: images, audio, video, documents, archives, fonts.
pub fn all_extensions() -> Vec<&'static str> {
    [
        IMAGE_EXTENSIONS,
        AUDIO_EXTENSIONS,
        VIDEO_EXTENSIONS,
        DOCUMENT_EXTENSIONS,
        ARCHIVE_EXTENSIONS,
        FONT_EXTENSIONS,
    ]
    .concat()
}

pub fn images() -> &'static [&'static str] {
    IMAGE_EXTENSIONS
}

pub fn documents() -> &'static [&'static str] {
    DOCUMENT_EXTENSIONS
}

/// Content-based MIME detection, consulted when the extension table has no entry.
pub trait MimeSniffer: Send + Sync {
    fn sniff(&self, filename: &str) -> Option<String>;
}

/// Sniffs the named file's magic bytes from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct InferSniffer;

impl MimeSniffer for InferSniffer {
    fn sniff(&self, filename: &str) -> Option<String> {
        match infer::get_from_path(filename) {
            Ok(Some(kind)) => Some(kind.mime_type().to_string()),
            Ok(None) => None,
            Err(e) => {
                tracing::debug!(filename = %filename, error = %e, "MIME sniffing skipped");
                None
            }
        }
    }
}

fn mime_for_extension(extension: &str) -> Option<&'static str> {
    let mime = match extension {
        "txt" => "text/plain",
        "htm" | "html" | "php" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "swf" => "application/x-shockwave-flash",
        "flv" => "video/x-flv",
        // images
        "png" => "image/png",
        "jpe" | "jpeg" | "jpg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "ico" => "image/vnd.microsoft.icon",
        "tiff" | "tif" => "image/tiff",
        "svg" | "svgz" => "image/svg+xml",
        // archives
        "zip" => "application/zip",
        "rar" => "application/x-rar-compressed",
        "exe" | "msi" => "application/x-msdownload",
        "cab" => "application/vnd.ms-cab-compressed",
        // audio/video
        "mp3" => "audio/mpeg",
        "qt" | "mov" => "video/quicktime",
        // adobe
        "pdf" => "application/pdf",
        "psd" => "image/vnd.adobe.photoshop",
        "ai" | "eps" | "ps" => "application/postscript",
        // ms-office
        "doc" => "application/msword",
        "rtf" => "application/rtf",
        "xls" => "application/vnd.ms-excel",
        "ppt" => "application/vnd.ms-powerpoint",
        // open office
        "odt" => "application/vnd.oasis.opendocument.text",
        "ods" => "application/vnd.oasis.opendocument.spreadsheet",
        _ => return None,
    };
    Some(mime)
}

/// MIME type for a filename.
///
/// Looks up the text after the final `.` in a fixed table, then asks the sniffer,
/// then falls back to `application/octet-stream`.
pub fn mime_type_for_filename(filename: &str, sniffer: Option<&dyn MimeSniffer>) -> String {
    let extension = filename
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_lowercase();

    if let Some(mime) = mime_for_extension(&extension) {
        return mime.to_string();
    }

    sniffer
        .and_then(|s| s.sniff(filename))
        .unwrap_or_else(|| OCTET_STREAM.to_string())
}

fn icon_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" | "image/pjpeg" | "image/x-jps" => "jpeg.png",
        "image/png" => "png.png",
        "image/gif" => "gif.png",
        "image/bmp" | "image/x-windows-bmp" => "bmp.png",
        "text/html" | "text/asp" | "text/javascript" | "text/ecmascript"
        | "application/x-javascript" | "application/javascript" | "application/ecmascript" => {
            "html.png"
        }
        "text/plain" => "conf.png",
        "text/css" => "css.png",
        "audio/aiff" | "audio/x-aiff" | "audio/midi" => "midi.png",
        "application/x-troff-msvideo" | "video/avi" | "video/msvideo" | "video/x-msvideo"
        | "video/avs-video" => "avi.png",
        "video/animaflex" => "fla.png",
        "application/msword"
        | "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        | "application/vnd.ms-word.document.macroEnabled.12"
        | "application/vnd.ms-word.template.macroEnabled.12"
        | "application/vnd.oasis.opendocument.text"
        | "application/vnd.apple.pages"
        | "application/vnd.ms-xpsdocument"
        | "application/oxps"
        | "application/rtf"
        | "application/wordperfect"
        | "application/octet-stream" => "docx.png",
        "application/x-compressed" | "application/x-7z-compressed" | "application/x-gzip"
        | "application/zip" | "multipart/x-gzip" | "multipart/x-zip" => "zip.png",
        "application/x-gtar" | "application/rar" | "application/x-tar" => "rar.png",
        "video/mpeg" | "audio/mpeg" => "mpeg.png",
        "application/pdf" => "pdf.png",
        "application/mspowerpoint" | "application/vnd.ms-powerpoint" | "application/powerpoint" => {
            "ms-pptx.png"
        }
        "application/excel"
        | "application/x-excel"
        | "application/x-msexcel"
        | "application/vnd.apple.numbers"
        | "application/vnd.oasis.opendocument.spreadsheet"
        | "application/vnd.ms-excel.sheet.macroEnabled.12"
        | "application/vnd.ms-excel.sheet.binary.macroEnabled.12"
        | "application/vnd.ms-excel"
        | "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => "ms-xlsx.png",
        "image/vnd.adobe.photoshop" => "psd.png",
        "not-found" => "not-found.png",
        _ => "unknown.png",
    }
}

/// Icon path (`img/file-type-icons/<icon>`) for a MIME type.
///
/// Unknown types get `unknown.png`; the sentinel `not-found` gets `not-found.png`.
pub fn icon_reference(mime_type: &str) -> String {
    let mut path = ICON_DIRECTORY.join(MAIN_SEPARATOR_STR);
    path.push_str(MAIN_SEPARATOR_STR);
    path.push_str(icon_for_mime(mime_type));
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct FixedSniffer(Option<&'static str>);

    impl MimeSniffer for FixedSniffer {
        fn sniff(&self, _filename: &str) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    #[test]
    fn test_classify_every_listed_extension() {
        for (expected, list) in CLASSIFICATION_ORDER {
            for ext in list.iter() {
                assert_eq!(classify(ext), *expected, "extension {ext}");
                assert_eq!(classify(&ext.to_uppercase()), *expected, "extension {ext}");
            }
        }
    }

    #[test]
    fn test_classify_unknown_is_file() {
        assert_eq!(classify(""), FileType::File);
        assert_eq!(classify("exe"), FileType::File);
        assert_eq!(classify("jpg "), FileType::File);
        assert_eq!(classify(".jpg"), FileType::File);
    }

    #[test]
    fn test_spreadsheets_are_documents() {
        assert_eq!(classify("xlsx"), FileType::Document);
        assert_eq!(classify("XLS"), FileType::Document);
        assert_eq!(classify("csv"), FileType::Document);
    }

    #[test]
    fn test_extension_lists_are_disjoint() {
        let all = all_extensions();
        let mut unique = all.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(all.len(), unique.len());
    }

    #[test]
    fn test_catalogue_queries() {
        assert!(images().contains(&"avif"));
        assert!(documents().contains(&"pdf"));
        assert_eq!(all_extensions().first(), Some(&"jpg"));
        assert_eq!(all_extensions().last(), Some(&"woff2"));
    }

    #[test]
    fn test_mime_type_from_table() {
        assert_eq!(mime_type_for_filename("photo.JPG", None), "image/jpeg");
        assert_eq!(mime_type_for_filename("archive.tar.zip", None), "application/zip");
        assert_eq!(mime_type_for_filename("icon.svgz", None), "image/svg+xml");
        assert_eq!(
            mime_type_for_filename("sheet.ods", Some(&FixedSniffer(Some("text/plain")))),
            "application/vnd.oasis.opendocument.spreadsheet"
        );
    }

    #[test]
    fn test_mime_type_falls_back_to_sniffer_then_octet_stream() {
        assert_eq!(
            mime_type_for_filename("movie.mkv", Some(&FixedSniffer(Some("video/x-matroska")))),
            "video/x-matroska"
        );
        assert_eq!(
            mime_type_for_filename("movie.mkv", Some(&FixedSniffer(None))),
            "application/octet-stream"
        );
        assert_eq!(mime_type_for_filename("README", None), "application/octet-stream");
    }

    #[test]
    fn test_infer_sniffer_reads_magic_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.unknown");
        std::fs::write(&path, [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0]).unwrap();

        let name = path.display().to_string();
        assert_eq!(mime_type_for_filename(&name, Some(&InferSniffer)), "image/png");
        assert_eq!(InferSniffer.sniff("/definitely/not/here.bin"), None);
    }

    #[test]
    fn test_icon_reference() {
        let sep = MAIN_SEPARATOR_STR;
        assert_eq!(
            icon_reference("image/png"),
            format!("img{sep}file-type-icons{sep}png.png")
        );
        assert!(icon_reference("application/pdf").ends_with("pdf.png"));
        assert!(icon_reference("application/octet-stream").ends_with("docx.png"));
        assert!(icon_reference("not-found").ends_with("not-found.png"));
        assert!(icon_reference("chemical/x-pdb").ends_with("unknown.png"));
        assert!(icon_reference("audio/mpeg").ends_with("mpeg.png"));
    }

    fn random_case(ext: &str, mask: u64) -> String {
        ext.chars()
            .enumerate()
            .map(|(i, c)| {
                if mask >> (i % 64) & 1 == 1 {
                    c.to_ascii_uppercase()
                } else {
                    c
                }
            })
            .collect()
    }

    proptest! {
        #[test]
        fn prop_unlisted_extensions_are_files(ext in any::<String>()) {
            let folded = ext.to_ascii_lowercase();
            prop_assume!(!all_extensions().contains(&folded.as_str()));
            prop_assert_eq!(classify(&ext), FileType::File);
        }

        #[test]
        fn prop_unlisted_ascii_extensions_are_files(ext in "[a-zA-Z0-9]{0,6}") {
            let folded = ext.to_ascii_lowercase();
            prop_assume!(!all_extensions().contains(&folded.as_str()));
            prop_assert_eq!(classify(&ext), FileType::File);
        }

        #[test]
        fn prop_classification_ignores_case(
            index in 0..all_extensions().len(),
            mask in any::<u64>(),
        ) {
            let ext = all_extensions()[index];
            prop_assert_eq!(classify(&random_case(ext, mask)), classify(ext));
        }
    }
}
