//! Attachment media sniffing: magic bytes first, extension as fallback.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Pdf,
    Image,
    Other,
}

impl AttachmentKind {
    fn from_mime(mime_str: &str) -> Self {
        match mime_str.parse::<mime::Mime>() {
            Ok(m) if m.type_() == mime::IMAGE => AttachmentKind::Image,
            Ok(m) if m.type_() == mime::APPLICATION && m.subtype() == "pdf" => AttachmentKind::Pdf,
            _ => AttachmentKind::Other,
        }
    }
}

#[must_use]
pub fn detect_mime(data: &[u8]) -> Option<String> {
    infer::get(data).map(|info| info.mime_type().to_string())
}

#[must_use]
pub fn detect_mime_from_extension(filename: &str) -> Option<String> {
    let ext = filename.rsplit('.').next()?;
    match ext.to_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg".into()),
        "png" => Some("image/png".into()),
        "gif" => Some("image/gif".into()),
        "webp" => Some("image/webp".into()),
        "bmp" => Some("image/bmp".into()),
        "tif" | "tiff" => Some("image/tiff".into()),
        "pdf" => Some("application/pdf".into()),
        _ => None,
    }
}

/// Resolve an attachment's MIME type and coarse kind.
#[must_use]
pub fn classify(data: &[u8], filename: Option<&str>) -> (String, AttachmentKind) {
    let mime = detect_mime(data)
        .or_else(|| filename.and_then(detect_mime_from_extension))
        .unwrap_or_else(|| "application/octet-stream".into());
    let kind = AttachmentKind::from_mime(&mime);
    (mime, kind)
}
