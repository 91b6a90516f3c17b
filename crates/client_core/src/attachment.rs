//! Receipt attachment checks performed before any upload.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentCheck {
    Accepted(ImageFormat),
    Rejected,
}

impl AttachmentCheck {
    pub fn is_accepted(self) -> bool {
        matches!(self, AttachmentCheck::Accepted(_))
    }
}

/// Accepts `jpg`, `jpeg` and `png` extensions, case-insensitively.
pub fn validate_attachment(file_name: &str) -> AttachmentCheck {
    let Some((_, ext)) = file_name.rsplit_once('.') else {
        return AttachmentCheck::Rejected;
    };

    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => AttachmentCheck::Accepted(ImageFormat::Jpeg),
        "png" => AttachmentCheck::Accepted(ImageFormat::Png),
        _ => AttachmentCheck::Rejected,
    }
}

/// Strips any directory prefix a file input reports (`C:\fakepath\x.png`).
pub fn base_file_name(input_value: &str) -> &str {
    input_value
        .rsplit(['\\', '/'])
        .next()
        .unwrap_or(input_value)
}

/// File picked in the attachment input.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(input_value: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: base_file_name(input_value).to_string(),
            bytes,
        }
    }
}
