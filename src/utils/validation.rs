use regex::Regex;
use std::sync::LazyLock;

pub const ACCEPTED_EXTENSIONS: [&str; 3] = [".jpg", ".jpeg", ".png"];

static SESSION_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,128}$").unwrap());

// No leading dot: in-flight `.partial` files must never be addressable.
static FILENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,200}\.[A-Za-z0-9]{1,16}$").unwrap());

/// Whether a declared upload name carries one of the accepted image extensions.
/// The comparison ignores case; the extension is otherwise discarded.
pub fn has_accepted_extension(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    ACCEPTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

pub fn is_valid_session_id(id: &str) -> bool {
    SESSION_ID_RE.is_match(id)
}

pub fn is_valid_filename(name: &str) -> bool {
    FILENAME_RE.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_image_extensions_in_any_case() {
        assert!(has_accepted_extension("cat.jpg"));
        assert!(has_accepted_extension("CAT.JPEG"));
        assert!(has_accepted_extension("scan.Png"));
        assert!(!has_accepted_extension("notes.txt"));
        assert!(!has_accepted_extension("archive.png.zip"));
        assert!(!has_accepted_extension("png"));
        assert!(!has_accepted_extension(""));
    }

    #[test]
    fn session_ids_are_single_safe_segments() {
        assert!(is_valid_session_id("0f3c2a9be1d94c7f8a6b5d4e3c2b1a09"));
        assert!(!is_valid_session_id(""));
        assert!(!is_valid_session_id(".."));
        assert!(!is_valid_session_id("a/b"));
        assert!(!is_valid_session_id("/etc"));
        assert!(!is_valid_session_id("a\\b"));
    }

    #[test]
    fn filenames_reject_traversal_and_hidden_files() {
        assert!(is_valid_filename("5b8e0c1e9f2d4a7b.png"));
        assert!(!is_valid_filename("../passwd"));
        assert!(!is_valid_filename(".."));
        assert!(!is_valid_filename("/etc/passwd"));
        assert!(!is_valid_filename(".abc.png.partial"));
        assert!(!is_valid_filename("noext"));
        assert!(!is_valid_filename("a/b.png"));
    }
}
