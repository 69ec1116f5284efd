use unicode_normalization::UnicodeNormalization;

/// Normalize scraped text to NFC and collapse runs of whitespace.
///
/// Song pages mix non-breaking spaces and decomposed accents into the
/// lyric text; the parser compares lines against labels and titles, so
/// every string leaving this crate goes through here first.
pub fn normalize_text(input: &str) -> String {
    let nfc: String = input.nfc().collect();
    nfc.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize each line of a paragraph, dropping lines that end up empty.
pub fn normalize_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    lines
        .into_iter()
        .map(normalize_text)
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_nfc() {
        // e + combining acute accent -> é (precomposed)
        let decomposed = "e\u{0301}";
        assert_eq!(normalize_text(decomposed), "é");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize_text("  Praise\u{00a0}\u{00a0}Him \n"), "Praise Him");
    }

    #[test]
    fn test_normalize_lines_drops_blank() {
        let lines = normalize_lines(["  one ", "\u{00a0}", "", "two"]);
        assert_eq!(lines, vec!["one", "two"]);
    }
}
