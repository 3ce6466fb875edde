//! Text canonicalization for slug and substring matching.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalize free text into a lowercase, hyphen-joined form.
///
/// Steps: NFD-decompose and drop combining marks ("é" -> "e"); keep ASCII
/// letters and digits; treat runs of whitespace, underscores and hyphens as a
/// single hyphen; drop everything else; lowercase. Hyphens count as
/// separators rather than punctuation so "Häagen-Dazs" -> "haagen-dazs" and
/// the function is idempotent.
pub fn normalize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_sep = false;

    for ch in s.nfd().filter(|c| !is_combining_mark(*c)) {
        if ch.is_ascii_alphanumeric() {
            if pending_sep {
                out.push('-');
                pending_sep = false;
            }
            out.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() || ch == '_' || ch == '-' {
            pending_sep = true;
        }
        // Any other character is stripped without acting as a separator.
    }

    if pending_sep {
        out.push('-');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accent_folding() {
        assert_eq!(normalize("Häagen-Dazs"), "haagen-dazs");
        assert_eq!(normalize("Nestlé Materna"), "nestle-materna");
        assert_eq!(normalize("iÖGO"), "iogo");
    }

    #[test]
    fn test_separator_collapsing() {
        assert_eq!(normalize("Kit Kat"), "kit-kat");
        assert_eq!(normalize("Kit   Kat"), "kit-kat");
        assert_eq!(normalize("kit_kat"), "kit-kat");
        assert_eq!(normalize("Quality Street"), "quality-street");
    }

    #[test]
    fn test_punctuation_stripped() {
        assert_eq!(normalize("Kit Kat!"), "kit-kat");
        assert_eq!(normalize("what's up?"), "whats-up");
        assert_eq!(normalize("..."), "");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_idempotence() {
        let samples = [
            "Häagen-Dazs",
            "Kit Kat",
            "  leading and trailing  ",
            "mixed_CASE and-hyphens",
            "déjà vu!",
            "",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", s);
        }
    }
}
