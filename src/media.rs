// Local image handles and MIME helpers.
//
// An `ImageRef` is the terminal equivalent of a browser object URL: a
// handle to bytes that live in this process only. Clones share the same
// buffer, and the bytes are freed once the last handle is dropped.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// MIME type used when the extension tells us nothing.
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// The reference backend always answers with PNG.
pub const DEFAULT_RESULT_MIME: &str = "image/png";

const IMAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
];

/// Image MIME type for a path, judged by its extension only.
pub fn image_mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// Whether the picker should offer this path.
pub fn is_image_path(path: &Path) -> bool {
    image_mime_for_path(path).is_some()
}

/// File extension to use when saving bytes of the given MIME type.
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/bmp" => "bmp",
        "image/webp" => "webp",
        "image/tiff" => "tiff",
        _ => "png",
    }
}

/// Work out the MIME type of a response body. A `Content-Type` header
/// wins when it names an image; otherwise the bytes are sniffed.
pub fn result_mime(content_type: Option<&str>, bytes: &[u8]) -> String {
    if let Some(ct) = content_type {
        let essence = ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        if essence.starts_with("image/") {
            return essence;
        }
    }
    image::guess_format(bytes)
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| DEFAULT_RESULT_MIME.to_string())
}

/// Shared, in-memory handle to image bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageRef {
    name: String,
    mime: String,
    bytes: Arc<[u8]>,
}

impl ImageRef {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Arc<[u8]>) -> Self {
        ImageRef {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when both handles point at the very same buffer.
    pub fn shares_buffer(&self, other: &ImageRef) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes)
    }

    /// Resolve the handle to a self-contained `data:` URI.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    /// Pixel dimensions, if the bytes decode as a known image format.
    /// Only the header is read.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        image::ImageReader::new(Cursor::new(&self.bytes[..]))
            .with_guessed_format()
            .ok()?
            .into_dimensions()
            .ok()
    }

    /// Write the bytes into `dir` as `<stem>.<ext>`, creating `dir` if needed.
    pub fn save_into(&self, dir: &Path, stem: &str) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.{}", stem, extension_for_mime(&self.mime)));
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

impl fmt::Debug for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageRef")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.mime, human_size(self.len()))?;
        if let Some((w, h)) = self.dimensions() {
            write!(f, " {}x{}", w, h)?;
        }
        Ok(())
    }
}

fn human_size(len: usize) -> String {
    const KIB: f64 = 1024.0;
    let len_f = len as f64;
    if len_f < KIB {
        format!("{} B", len)
    } else if len_f < KIB * KIB {
        format!("{:.1} KiB", len_f / KIB)
    } else {
        format!("{:.1} MiB", len_f / (KIB * KIB))
    }
}
