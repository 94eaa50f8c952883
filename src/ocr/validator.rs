//! Upload filename validation

/// Extensions accepted for OCR, lowercase
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "pdf"];

/// Check whether an uploaded filename carries an allowed extension.
///
/// Only the text after the last `.` is considered, case-insensitively.
/// File contents are never inspected.
pub fn is_allowed(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_extension_is_rejected() {
        for name in ["", "photo", "README", "png"] {
            assert!(!is_allowed(name), "{name:?} should be rejected");
        }
    }

    #[test]
    fn test_allowed_extensions_any_case() {
        for name in ["a.png", "b.JPG", "c.Jpeg", "scan.PDF", "archive.tar.png", ".png"] {
            assert!(is_allowed(name), "{name:?} should be accepted");
        }
    }

    #[test]
    fn test_other_extensions_rejected() {
        for name in ["doc.txt", "image.gif", "photo.png.exe", "trailing.", "x.pdfx"] {
            assert!(!is_allowed(name), "{name:?} should be rejected");
        }
    }
}
