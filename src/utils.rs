use once_cell::sync::Lazy;
use regex::Regex;

/// CJK Unified Ideographs block, `U+4E00..=U+9FFF`.
static CJK_UNIFIED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x{4E00}-\x{9FFF}]").expect("valid CJK block pattern"));

/// Tests whether `c` lies in the CJK Unified Ideographs block.
#[inline]
pub fn is_cjk_unified(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

/// Cheap pre-filter: `true` when `text` holds at least one CJK ideograph.
///
/// Every built-in term contains one, so text without any can skip scanning.
/// Custom dictionaries may not, in which case `Converter` scans anyway.
///
/// ```
/// use zhtw::utils::contains_chinese;
///
/// assert!(contains_chinese("fn main() { // 用户 }"));
/// assert!(!contains_chinese("plain ASCII, ½ and ☃"));
/// ```
pub fn contains_chinese(text: &str) -> bool {
    CJK_UNIFIED.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_ideographs() {
        assert!(contains_chinese("一"));
        assert!(contains_chinese("abc\n鿿"));
        assert!(!contains_chinese(""));
        assert!(!contains_chinese("ひらがな and 한국어"));
    }

    #[test]
    fn regex_and_char_check_agree() {
        for text in ["中文", "ascii", "〇", "𠀀", "混合 text"] {
            assert_eq!(contains_chinese(text), text.chars().any(is_cjk_unified));
        }
    }
}
