use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Normalize raw OCR or file text before pattern matching.
///
/// Folds full-width ASCII (`０-９`, `Ａ-Ｚ`, `：`, `，`, ...) to its half-width form, turns the
/// ideographic space into a plain space, widens half-width katakana, composes dakuten with NFC
/// and converts CRLF/CR line endings to LF. Unit glyphs such as `㎡` and `²` are preserved.
///
/// The function is idempotent: normalizing normalized text is a no-op.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .chars()
        .flat_map(fold_char)
        .collect();

    folded.nfc().collect()
}

fn fold_char(c: char) -> Vec<char> {
    match c {
        '\u{FF01}'..='\u{FF5E}' => {
            // Full-width forms sit at a fixed offset from ASCII.
            char::from_u32(c as u32 - 0xFEE0)
                .map(|ascii| vec![ascii])
                .unwrap_or_else(|| vec![c])
        }
        '\u{3000}' => vec![' '],
        '\u{FF61}'..='\u{FF9F}' => std::iter::once(c).nfkc().collect(),
        _ => vec![c],
    }
}

/// Whether the text contains any CJK punctuation, kana, full-width form or ideograph.
///
/// This is the signal used to decide whether a text is a Japanese listing at all.
pub fn has_cjk(text: &str) -> bool {
    static RE_CJK: OnceLock<Regex> = OnceLock::new();
    let re_cjk = RE_CJK.get_or_init(|| {
        Regex::new(r"[\x{3000}-\x{303F}\x{3040}-\x{309F}\x{30A0}-\x{30FF}\x{FF00}-\x{FF9F}\x{4E00}-\x{9FAF}]")
            .unwrap()
    });
    re_cjk.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_width_digits_fold() {
        assert_eq!(normalize("３，７８０万円"), "3,780万円");
    }

    #[test]
    fn test_full_width_colon_and_hyphen_fold() {
        assert_eq!(normalize("住所：駒込１－１６－８"), "住所:駒込1-16-8");
    }

    #[test]
    fn test_ideographic_space_folds() {
        assert_eq!(normalize("JR山手線\u{3000}駒込駅"), "JR山手線 駒込駅");
    }

    #[test]
    fn test_half_width_katakana_widens() {
        assert_eq!(normalize("ﾏﾝｼｮﾝ"), "マンション");
        assert_eq!(normalize("ﾊﾞｽ"), "バス");
    }

    #[test]
    fn test_unit_glyphs_preserved() {
        assert_eq!(normalize("30.31㎡"), "30.31㎡");
        assert_eq!(normalize("30.31m²"), "30.31m²");
    }

    #[test]
    fn test_crlf_normalized() {
        assert_eq!(normalize("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize("物件名：ＡＸＡＳ駒込\r\n価格：３，７８０万円");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_has_cjk() {
        assert!(has_cjk("東京都"));
        assert!(has_cjk("マンション"));
        assert!(has_cjk("ＡＢＣ"));
        assert!(!has_cjk("123 Main Street, Springfield, IL 62701"));
        assert!(!has_cjk(""));
    }
}
