//! Markup heuristics for the collection loop.
//!
//! Both predicates are brittle by nature: they encode what Google's image
//! results markup looks like today. They live here, away from the loop's
//! control structure, so a markup change means editing one function rather
//! than the loop.

use super::types::{SHOW_MORE_LABELS, SRC_LENGTH_THRESHOLD};

/// Whether a `src` value plausibly points at real image content.
///
/// Short URLs on a results page are almost always icons, sprites, or
/// tracking pixels; real payloads (including data URIs for thumbnails)
/// run long. False positives and negatives are acceptable.
pub fn is_probable_image(src: &str) -> bool {
    src.len() > SRC_LENGTH_THRESHOLD
}

/// Whether a control's visible text marks it as the "show more results"
/// pagination button. Case-sensitive on purpose: the page locale is pinned
/// to English, so the label variants are fixed.
pub fn is_show_more_label(text: &str) -> bool {
    SHOW_MORE_LABELS.iter().any(|label| text.contains(label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn src_length_boundary_is_exact() {
        let at_threshold = "x".repeat(100);
        let over_threshold = "x".repeat(101);

        assert!(!is_probable_image(&at_threshold));
        assert!(is_probable_image(&over_threshold));
        assert!(!is_probable_image(""));
    }

    #[test]
    fn show_more_labels_match_as_substrings() {
        assert!(is_show_more_label("Show more results"));
        assert!(is_show_more_label("顯示更多結果"));
        assert!(!is_show_more_label("show more results")); // case-sensitive
        assert!(!is_show_more_label("Next page"));
    }
}
