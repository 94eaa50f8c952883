//! Upload naming
//!
//! Filename sanitization and request id generation.

use chrono::{DateTime, Local};
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

/// Name used when sanitization leaves nothing behind
const FALLBACK_NAME: &str = "upload";

/// Make a client-supplied filename safe to use as a path component.
///
/// Accented characters are folded to ASCII (NFKD, then non-ASCII dropped).
/// `/` is treated as whitespace, whitespace runs collapse to `_`, and only
/// ASCII alphanumerics, `.`, `_` and `-` survive, so a backslash is removed
/// rather than split on. Leading and trailing `.`/`_` are stripped, so the
/// result can never climb out of the upload directory or be hidden.
pub fn sanitize_filename(filename: &str) -> String {
    let folded: String = filename.nfkd().filter(char::is_ascii).collect();
    let spaced = folded.replace('/', " ");

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    let trimmed = kept.trim_matches(|c| c == '.' || c == '_');

    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Generate a request id: `YYYYMMDD_HHMMSS_xxxxxxxx`.
///
/// The random suffix keeps two uploads in the same second apart. The id names
/// both the stored upload and the request's output directory.
pub fn new_request_id() -> String {
    request_id_at(Local::now())
}

fn request_id_at(now: DateTime<Local>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}_{}", now.format("%Y%m%d_%H%M%S"), &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sanitize_plain_names() {
        assert_eq!(sanitize_filename("photo.PNG"), "photo.PNG");
        assert_eq!(sanitize_filename("my scan 01.pdf"), "my_scan_01.pdf");
        assert_eq!(sanitize_filename("report-final_v2.jpeg"), "report-final_v2.jpeg");
    }

    #[test]
    fn test_sanitize_strips_paths() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\scan.png"), "CUsersmescan.png");
        assert_eq!(sanitize_filename(".hidden.png"), "hidden.png");
    }

    #[test]
    fn test_sanitize_folds_accents_and_drops_non_ascii() {
        assert_eq!(sanitize_filename("résumé.pdf"), "resume.pdf");
        assert_eq!(sanitize_filename("Ångström ﬁle.png"), "Angstrom_file.png");
        assert_eq!(sanitize_filename("文档.png"), "png");
        assert_eq!(sanitize_filename("..."), FALLBACK_NAME);
        assert_eq!(sanitize_filename(""), FALLBACK_NAME);
    }

    #[test]
    fn test_request_id_shape() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let id = request_id_at(now);

        assert!(id.starts_with("20240309_140507_"), "{id}");
        assert_eq!(id.len(), "20240309_140507_".len() + 8);
        assert!(id[16..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_request_ids_differ_within_a_second() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_ne!(request_id_at(now), request_id_at(now));
    }
}
