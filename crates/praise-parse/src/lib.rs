use praise_acquire::types::AcquiredSong;
use praise_model::{SongRecord, SongbookEntry};

pub mod markup;
pub mod normalize;
pub mod segment;
pub mod split;

pub use markup::{render, Markup};
pub use segment::{segment, Segmentation, Segmenter};

/// Build a song record from acquired page data.
///
/// Authors and copyright are normalized, the lyric paragraphs are segmented
/// into sections, and the song is filed under `songbook_name` with its
/// song-book number as the entry.
pub fn build_song(acquired: &AcquiredSong, songbook_name: &str) -> SongRecord {
    let authors: Vec<Option<String>> = acquired
        .authors
        .iter()
        .map(|a| normalize::normalize_author(a))
        .collect();
    let copyright = normalize::normalize_copyright(acquired.copyright.as_deref());
    let Segmentation {
        sections,
        performance_order,
    } = segment(&acquired.title, &acquired.paragraphs);

    tracing::info!(
        number = %acquired.number,
        title = %acquired.title,
        sections = sections.len(),
        order = performance_order.len(),
        authors = authors.len(),
        "Parsed song"
    );

    SongRecord {
        number: acquired.number.clone(),
        title: acquired.title.clone(),
        authors,
        themes: acquired.themes.clone(),
        copyright,
        songbook: SongbookEntry {
            name: songbook_name.to_string(),
            entry: acquired.number.clone(),
        },
        sections,
        performance_order,
    }
}
