use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;

/// Folds a string for matching: trimmed, lowercased, diacritics stripped and
/// the Vietnamese `đ` mapped to `d`.
pub fn fold(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .map(|c| if c == 'đ' { 'd' } else { c })
        .collect()
}

/// Folded form with all whitespace, hyphens and underscores removed.
/// "Đối kháng", "doi-khang" and "doikhang" all compact to "doikhang".
pub fn compact(s: &str) -> String {
    fold(s)
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .collect()
}

/// Case/diacritic-insensitive ordering with the verbatim string as a
/// deterministic final tie-break.
pub fn collate(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

/// Lenient decimal parse used for judge scores. Comma is accepted as decimal
/// separator; anything negative, non-finite or unparseable is absent.
pub fn parse_score(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let value: f64 = s.replace(',', ".").parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        None
    }
}

/// Integer hundredths, the comparison unit for totals.
pub fn hundredths(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

pub fn format_two_decimals(value: f64) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_strips_vietnamese_marks() {
        assert_eq!(fold("  Đối Kháng "), "doi khang");
        assert_eq!(fold("Song luyện"), "song luyen");
        assert_eq!(fold("Nguyễn Văn Á"), "nguyen van a");
    }

    #[test]
    fn test_compact_ignores_separators() {
        assert_eq!(compact("Đối-kháng"), "doikhang");
        assert_eq!(compact("doi  khang"), "doikhang");
    }

    #[test]
    fn test_parse_score_accepts_comma_and_rejects_negative() {
        assert_eq!(parse_score("8,5"), Some(8.5));
        assert_eq!(parse_score(" 9 "), Some(9.0));
        assert_eq!(parse_score("-1"), None);
        assert_eq!(parse_score("abc"), None);
        assert_eq!(parse_score(""), None);
        assert_eq!(parse_score("NaN"), None);
    }

    #[test]
    fn test_collate_is_case_and_mark_insensitive() {
        assert_eq!(fold("an"), fold("Ân"));
        assert_eq!(collate("an", "Ân"), Ordering::Less);
        assert_eq!(collate("Bình", "an"), Ordering::Greater);
    }
}
