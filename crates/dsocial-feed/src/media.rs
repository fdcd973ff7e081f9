//! Image preparation for posts.
//!
//! Posts carry their image inline as a `data:` URL. Files are checked for
//! size and sniffed by magic bytes before encoding, so a post never embeds
//! something that is not a recognisable image.

use std::fmt;
use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

/// Largest image accepted by default (1 MiB).
pub const MAX_IMAGE_BYTES: u64 = 1_048_576;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("You must select an image under {}.", format_size(.limit))]
    TooLarge { size: u64, limit: u64 },

    #[error("Failed to load image")]
    Unsupported,

    #[error("invalid data URL: {0}")]
    InvalidDataUrl(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type MediaResult<T> = Result<T, MediaError>;

fn format_size(bytes: &u64) -> String {
    let bytes = *bytes;
    const MB: u64 = 1_048_576;
    const KB: u64 = 1024;
    if bytes >= MB && bytes % MB == 0 {
        format!("{}MB", bytes / MB)
    } else if bytes >= KB && bytes % KB == 0 {
        format!("{}KB", bytes / KB)
    } else {
        format!("{bytes} bytes")
    }
}

/// Image formats recognised by their leading bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageKind {
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(Self::Png)
        } else if data.starts_with(&[0xff, 0xd8, 0xff]) {
            Some(Self::Jpeg)
        } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else if data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            Some(Self::Webp)
        } else {
            None
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }
}

/// A decoded `data:` URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    pub data: Vec<u8>,
}

impl DataUrl {
    /// Parse `data:[<mime>][;base64],<payload>`.
    ///
    /// Payloads without `;base64` are taken as literal text.
    pub fn parse(input: &str) -> MediaResult<Self> {
        let rest = input
            .strip_prefix("data:")
            .ok_or_else(|| MediaError::InvalidDataUrl("missing data: prefix".into()))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| MediaError::InvalidDataUrl("missing ','".into()))?;

        let (mime, is_base64) = match meta.strip_suffix(";base64") {
            Some(mime) => (mime, true),
            None => (meta, false),
        };
        let mime = if mime.is_empty() { "text/plain" } else { mime };

        let data = if is_base64 {
            STANDARD
                .decode(payload)
                .map_err(|e| MediaError::InvalidDataUrl(e.to_string()))?
        } else {
            payload.as_bytes().to_vec()
        };

        Ok(Self {
            mime: mime.to_string(),
            data,
        })
    }

    /// The image format named by the MIME type, if it is one.
    pub fn image_kind(&self) -> Option<ImageKind> {
        ImageKind::from_mime(&self.mime)
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime, STANDARD.encode(&self.data))
    }
}

/// Check and encode image bytes as a `data:` URL.
pub fn prepare_image(data: &[u8], max_bytes: u64) -> MediaResult<String> {
    let size = data.len() as u64;
    if size > max_bytes {
        return Err(MediaError::TooLarge {
            size,
            limit: max_bytes,
        });
    }
    let kind = ImageKind::sniff(data).ok_or(MediaError::Unsupported)?;
    let url = DataUrl {
        mime: kind.mime().to_string(),
        data: data.to_vec(),
    };
    Ok(url.to_string())
}

/// Read an image file and encode it as a `data:` URL.
///
/// The size limit is checked against file metadata before reading.
pub fn read_image_file(path: impl AsRef<Path>, max_bytes: u64) -> MediaResult<String> {
    let path = path.as_ref();
    let size = fs::metadata(path)?.len();
    if size > max_bytes {
        return Err(MediaError::TooLarge {
            size,
            limit: max_bytes,
        });
    }
    let data = fs::read(path)?;
    prepare_image(&data, max_bytes)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";

    #[test]
    fn sniffs_known_formats() {
        assert_eq!(ImageKind::sniff(PNG_HEADER), Some(ImageKind::Png));
        assert_eq!(ImageKind::sniff(&[0xff, 0xd8, 0xff, 0xe0]), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::sniff(b"GIF89a...."), Some(ImageKind::Gif));
        assert_eq!(ImageKind::sniff(b"RIFF\x00\x00\x00\x00WEBPVP8 "), Some(ImageKind::Webp));
        assert_eq!(ImageKind::sniff(b"%PDF-1.7"), None);
        assert_eq!(ImageKind::sniff(b""), None);
    }

    #[test]
    fn prepares_png_data_url() {
        let url = prepare_image(PNG_HEADER, MAX_IMAGE_BYTES).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));

        let parsed = DataUrl::parse(&url).unwrap();
        assert_eq!(parsed.data, PNG_HEADER);
        assert_eq!(parsed.image_kind(), Some(ImageKind::Png));
    }

    #[test]
    fn oversize_image_gets_user_message() {
        let big = vec![0u8; (MAX_IMAGE_BYTES + 1) as usize];
        let err = prepare_image(&big, MAX_IMAGE_BYTES).unwrap_err();
        assert_eq!(err.to_string(), "You must select an image under 1MB.");
    }

    #[test]
    fn non_image_is_rejected() {
        let err = prepare_image(b"plain text", MAX_IMAGE_BYTES).unwrap_err();
        assert!(matches!(err, MediaError::Unsupported));
        assert_eq!(err.to_string(), "Failed to load image");
    }

    #[test]
    fn size_formatting() {
        assert_eq!(format_size(&(2 * 1_048_576)), "2MB");
        assert_eq!(format_size(&(512 * 1024)), "512KB");
        assert_eq!(format_size(&100), "100 bytes");
    }

    #[test]
    fn parses_plain_data_url() {
        let url = DataUrl::parse("data:,hello").unwrap();
        assert_eq!(url.mime, "text/plain");
        assert_eq!(url.data, b"hello");
        assert_eq!(url.image_kind(), None);
    }

    #[test]
    fn rejects_malformed_data_urls() {
        assert!(DataUrl::parse("http://x/y.png").is_err());
        assert!(DataUrl::parse("data:image/png;base64").is_err());
        assert!(DataUrl::parse("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn reads_image_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xd8, 0xff, 0xdb, 0x00]).unwrap();
        let url = read_image_file(file.path(), MAX_IMAGE_BYTES).unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn file_limit_checked_before_reading() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 64]).unwrap();
        let err = read_image_file(file.path(), 32).unwrap_err();
        assert!(matches!(err, MediaError::TooLarge { size: 64, limit: 32 }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_image_file("/nonexistent/dsocial/image.png", MAX_IMAGE_BYTES).unwrap_err();
        assert!(matches!(err, MediaError::Io(_)));
    }
}
