//! Inline-vs-download policy for stored files.

/// MIME types a browser may render directly. Matching is exact; there is no
/// wildcard or prefix handling, so each subtype has to be listed.
pub const RENDERABLE_TYPES: [&str; 14] = [
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/svg+xml",
    "image/webp",
    "application/pdf",
    "text/plain",
    "text/html",
    "text/css",
    "text/javascript",
    "application/json",
    "video/mp4",
    "audio/mpeg",
    "audio/wav",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Inline,
    Attachment,
}

impl Disposition {
    /// Classify a client-reported MIME type.
    pub fn classify(content_type: &str) -> Self {
        if RENDERABLE_TYPES.contains(&content_type) {
            Disposition::Inline
        } else {
            Disposition::Attachment
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Disposition::Inline => "inline",
            Disposition::Attachment => "attachment",
        }
    }

    /// Render a `Content-Disposition` value for `original_name`.
    pub fn header_value(self, original_name: &str) -> String {
        format!(
            "{}; filename=\"{}\"",
            self.as_str(),
            sanitize_filename(original_name)
        )
    }
}

/// Strip characters that could break out of a quoted header parameter.
///
/// Quotes, backslashes and control characters (CR/LF included) are removed.
/// An empty result falls back to `file`.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|&c| !matches!(c, '"' | '\\') && !c.is_control())
        .collect();

    if cleaned.trim().is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowlisted_types_render_inline() {
        for ty in RENDERABLE_TYPES {
            assert_eq!(Disposition::classify(ty), Disposition::Inline, "{ty}");
        }
    }

    #[test]
    fn unknown_types_download() {
        for ty in [
            "application/zip",
            "application/octet-stream",
            "image/*",
            "image/png; charset=binary",
            "IMAGE/PNG",
            "text",
            "",
        ] {
            assert_eq!(Disposition::classify(ty), Disposition::Attachment, "{ty}");
        }
    }

    #[test]
    fn header_value_quotes_filename() {
        assert_eq!(
            Disposition::Inline.header_value("cat.png"),
            "inline; filename=\"cat.png\""
        );
        assert_eq!(
            Disposition::Attachment.header_value("my report.zip"),
            "attachment; filename=\"my report.zip\""
        );
    }

    #[test]
    fn header_value_cannot_be_injected() {
        let value = Disposition::Attachment.header_value("a\"b\r\nSet-Cookie: x=1\\.txt");
        assert_eq!(value, "attachment; filename=\"abSet-Cookie: x=1.txt\"");
        assert!(axum::http::HeaderValue::from_str(&value).is_ok());
    }

    #[test]
    fn empty_names_get_a_placeholder() {
        assert_eq!(sanitize_filename(""), "file");
        assert_eq!(sanitize_filename("\"\""), "file");
        assert_eq!(sanitize_filename("ünïcode.txt"), "ünïcode.txt");
    }
}
