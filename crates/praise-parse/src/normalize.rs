// Cleanup rules for author names and copyright notices.

use once_cell::sync::Lazy;
use praise_model::PUBLIC_DOMAIN;
use regex::Regex;

/// Author entries naming a role ("Words: …", "Music arr. …") rather than a person.
static AUTHOR_ROLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:words|music)\b").expect("valid regex"));

/// Life dates after a name: "1725-1807", "1950-", "1940".
static AUTHOR_DATES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\d+(?:\s*[-–]\s*\d*)?$").expect("valid regex"));

static COPYRIGHT_FLUFF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)copyright|©|all rights reserved|used by permission|\([^)]*\)")
        .expect("valid regex")
});

static COPYRIGHT_YEARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{4}(?:\s*[-–/]\s*\d{2,4})?\b").expect("valid regex"));

/// Normalize one author entry.
///
/// Returns `None` for entries that describe a role rather than name a person;
/// those still occupy an author slot in the output. Otherwise life dates are
/// removed and "Surname, Forename" becomes "Forename Surname".
pub fn normalize_author(raw: &str) -> Option<String> {
    if AUTHOR_ROLE.is_match(raw) {
        return None;
    }

    let name = AUTHOR_DATES.replace(raw.trim(), "");
    let name = match name.split_once(',') {
        Some((surname, forename)) if !forename.contains(',') => {
            format!("{} {}", forename.trim(), surname.trim())
        }
        _ => name.into_owned(),
    };
    // Reordering can move a number to the end ("1990, John").
    let name = AUTHOR_DATES.replace(name.trim(), "");

    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Normalize a copyright notice down to the rights holder, title-cased.
///
/// `None` (no notice on the page) and notices with nothing left after
/// cleanup both become "Public Domain".
pub fn normalize_copyright(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return PUBLIC_DOMAIN.to_string();
    };

    let text = COPYRIGHT_FLUFF.replace_all(raw, " ");
    // Periods go without a gap: "worshiptogether.com" stays one word.
    let text = text.replace('.', "");
    let text = COPYRIGHT_YEARS.replace_all(&text, " ");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let text = text.trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '-'));

    if text.is_empty() {
        PUBLIC_DOMAIN.to_string()
    } else {
        title_case(text)
    }
}

/// Capitalize the first letter of every word and lowercase the rest.
/// Apostrophes do not start a new word ("kingsway's" → "Kingsway's").
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            if !matches!(c, '\'' | '’') {
                in_word = false;
            }
        }
    }
    out
}
