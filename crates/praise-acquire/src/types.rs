use serde::{Deserialize, Serialize};

/// Raw song data scraped from a song page, before parsing into a `SongRecord`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AcquiredSong {
    pub source: SourceInfo,
    /// Song-book number the song was requested by.
    pub number: String,
    /// Title exactly as shown on the page.
    pub title: String,
    /// Lyric paragraphs in page order, each as its trimmed non-empty lines.
    pub paragraphs: Vec<Vec<String>>,
    /// Raw author strings, one per author.
    pub authors: Vec<String>,
    pub themes: Vec<String>,
    /// Raw copyright notice. `None` when the page has no copyright entry.
    pub copyright: Option<String>,
}

/// Provenance information about the acquisition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceInfo {
    pub url: String,
    pub site: String,
    pub fetched_at: String,
}

impl AcquiredSong {
    /// Plain text of the lyrics, one blank line between paragraphs.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.join("\n"))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Generate a source.md provenance file.
    pub fn source_md(&self) -> String {
        format!(
            "# Source\n\n\
             - **Site:** {}\n\
             - **URL:** {}\n\
             - **Song:** {} {}\n\
             - **Fetched:** {}\n\
             - **Paragraphs:** {}\n",
            self.source.site,
            self.source.url,
            self.number,
            self.title,
            self.source.fetched_at,
            self.paragraphs.len(),
        )
    }
}
