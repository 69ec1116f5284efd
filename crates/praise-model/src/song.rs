use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Copyright text used when the source page carries no copyright notice.
pub const PUBLIC_DOMAIN: &str = "Public Domain";

/// A normalized song: metadata plus its lyric sections in performance order.
///
/// This is what the parser produces and what the OpenLyrics writer consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongRecord {
    /// Song-book number the song was requested by (e.g., "123").
    pub number: String,
    pub title: String,
    /// Normalized author names. `None` keeps an empty author slot for
    /// entries that described a role ("Words and music") rather than a name.
    pub authors: Vec<Option<String>>,
    pub themes: Vec<String>,
    pub copyright: String,
    pub songbook: SongbookEntry,
    /// Sections in the order they were first created.
    pub sections: Vec<Section>,
    /// Section names in the order they are sung. Chorus names may repeat.
    pub performance_order: Vec<String>,
}

/// The song's entry in a named song book.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SongbookEntry {
    /// Song-book name (e.g., "Praise!").
    pub name: String,
    /// Entry within the song book (e.g., "123").
    pub entry: String,
}

/// One named block of lyrics: a verse, chorus, or bridge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Section {
    /// Section name as used in the verse order (e.g., "v1", "c2", "b1").
    pub name: String,
    pub kind: SectionKind,
    /// Display lines. Every line after the first is preceded by a line break.
    pub lines: Vec<String>,
    /// Full choruses are displayed in italics.
    pub italic: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Verse,
    Chorus,
    Bridge,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SectionNameError {
    #[error("section name is empty")]
    Empty,

    #[error("unknown section prefix in '{0}'")]
    UnknownPrefix(String),

    #[error("section name '{0}' has no valid number")]
    BadNumber(String),
}

impl SectionKind {
    /// Single-letter prefix used in OpenLyrics section names.
    pub fn prefix(self) -> char {
        match self {
            SectionKind::Verse => 'v',
            SectionKind::Chorus => 'c',
            SectionKind::Bridge => 'b',
        }
    }

    fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            'v' => Some(SectionKind::Verse),
            'c' => Some(SectionKind::Chorus),
            'b' => Some(SectionKind::Bridge),
            _ => None,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SectionKind::Verse => "verse",
            SectionKind::Chorus => "chorus",
            SectionKind::Bridge => "bridge",
        };
        f.write_str(label)
    }
}

/// Build a section name from its kind and number (e.g., Chorus, 2 → "c2").
pub fn section_name(kind: SectionKind, number: u32) -> String {
    format!("{}{number}", kind.prefix())
}

/// Split a section name back into its kind and number.
pub fn parse_section_name(name: &str) -> Result<(SectionKind, u32), SectionNameError> {
    let mut chars = name.chars();
    let prefix = chars.next().ok_or(SectionNameError::Empty)?;
    let kind = SectionKind::from_prefix(prefix)
        .ok_or_else(|| SectionNameError::UnknownPrefix(name.to_string()))?;
    let number = chars
        .as_str()
        .parse::<u32>()
        .map_err(|_| SectionNameError::BadNumber(name.to_string()))?;
    Ok((kind, number))
}

impl Section {
    pub fn new(kind: SectionKind, number: u32, lines: Vec<String>) -> Self {
        Self {
            name: section_name(kind, number),
            kind,
            lines,
            italic: kind == SectionKind::Chorus,
        }
    }
}

impl SongRecord {
    /// Look up a section by name.
    pub fn find_section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// The performance order as written in an OpenLyrics `verseOrder` element.
    pub fn verse_order(&self) -> String {
        self.performance_order.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_song() -> SongRecord {
        SongRecord {
            number: "12".to_string(),
            title: "Amazing Grace".to_string(),
            authors: vec![Some("John Newton".to_string()), None],
            themes: vec!["Grace".to_string()],
            copyright: PUBLIC_DOMAIN.to_string(),
            songbook: SongbookEntry {
                name: "Praise!".to_string(),
                entry: "12".to_string(),
            },
            sections: vec![
                Section::new(SectionKind::Verse, 1, vec!["Amazing grace".to_string()]),
                Section::new(SectionKind::Chorus, 1, vec!["My chains are gone".to_string()]),
            ],
            performance_order: vec!["v1".to_string(), "c1".to_string(), "c1".to_string()],
        }
    }

    #[test]
    fn test_section_new_names_and_italics() {
        let verse = Section::new(SectionKind::Verse, 3, vec![]);
        assert_eq!(verse.name, "v3");
        assert!(!verse.italic);

        let chorus = Section::new(SectionKind::Chorus, 2, vec![]);
        assert_eq!(chorus.name, "c2");
        assert!(chorus.italic);

        let bridge = Section::new(SectionKind::Bridge, 1, vec![]);
        assert_eq!(bridge.name, "b1");
        assert!(!bridge.italic);
    }

    #[test]
    fn test_parse_section_name() {
        assert_eq!(parse_section_name("v12"), Ok((SectionKind::Verse, 12)));
        assert_eq!(parse_section_name("b1"), Ok((SectionKind::Bridge, 1)));
        assert_eq!(parse_section_name(""), Err(SectionNameError::Empty));
        assert_eq!(
            parse_section_name("x1"),
            Err(SectionNameError::UnknownPrefix("x1".to_string()))
        );
        assert_eq!(
            parse_section_name("c"),
            Err(SectionNameError::BadNumber("c".to_string()))
        );
    }

    #[test]
    fn test_verse_order_and_lookup() {
        let song = sample_song();
        assert_eq!(song.verse_order(), "v1 c1 c1");
        assert_eq!(song.find_section("c1").unwrap().kind, SectionKind::Chorus);
        assert!(song.find_section("b1").is_none());
    }

    #[test]
    fn test_json_roundtrip_keeps_author_placeholders() {
        let song = sample_song();
        let json = serde_json::to_string(&song).unwrap();
        let parsed: SongRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.authors, vec![Some("John Newton".to_string()), None]);
        assert_eq!(parsed.sections.len(), 2);
        assert_eq!(parsed.sections[1].kind, SectionKind::Chorus);
    }
}
