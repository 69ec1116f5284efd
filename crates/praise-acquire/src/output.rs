use crate::types::AcquiredSong;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Write the acquisition output files for one song to the given directory.
///
/// Creates the directory if it doesn't exist, then writes:
/// - `{number}.song.json`: structured song data (parser input)
/// - `{number}.txt`: lyric text, human convenience
/// - `{number}.source.md`: provenance info
///
/// Returns the path of the JSON file.
pub fn write_acquired(song: &AcquiredSong, output_dir: &str) -> Result<PathBuf> {
    let dir = Path::new(output_dir);
    fs::create_dir_all(dir)?;

    let json_path = dir.join(format!("{}.song.json", song.number));
    let json = serde_json::to_string_pretty(song)?;
    fs::write(&json_path, &json)?;
    tracing::info!(path = %json_path.display(), paragraphs = song.paragraphs.len(), "Wrote song JSON");

    let text_path = dir.join(format!("{}.txt", song.number));
    let text = song.plain_text();
    fs::write(&text_path, &text)?;
    tracing::info!(path = %text_path.display(), lines = text.lines().count(), "Wrote lyric text");

    let source_path = dir.join(format!("{}.source.md", song.number));
    fs::write(&source_path, song.source_md())?;
    tracing::debug!(path = %source_path.display(), "Wrote source provenance");

    Ok(json_path)
}

/// Read a song previously written by `write_acquired`.
pub fn read_acquired(path: &Path) -> Result<AcquiredSong> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Cache raw HTML to the output directory for archival/debugging.
pub fn cache_html(output_dir: &str, filename: &str, html: &str) -> Result<()> {
    let dir = Path::new(output_dir);
    fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    fs::write(&path, html)?;
    tracing::info!(path = %path.display(), bytes = html.len(), "Cached raw HTML");
    Ok(())
}
