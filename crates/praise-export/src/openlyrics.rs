// OpenLyrics 0.8 document output.
//
// Elements are written one per line without indentation: the <lines>
// element holds mixed content (text and <br/>), where indentation would
// leak into the lyric text.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use praise_model::SongRecord;
use praise_parse::render;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use regex::Regex;
use thiserror::Error;

pub const OPENLYRICS_NAMESPACE: &str = "http://openlyrics.info/namespace/2009/song";
pub const OPENLYRICS_VERSION: &str = "0.8";
/// `createdIn` value, shared with files written by earlier versions of the tool.
pub const CREATED_IN: &str = "PraiseOpenLyrics";

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W").expect("valid regex"));

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("XML write failed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("IO error at {path:?}: {source}")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },
}

/// Document-level attributes of the `<song>` element.
#[derive(Debug, Clone)]
pub struct DocumentMeta {
    /// Name of the program that wrote the file.
    pub created_in: String,
    /// Local creation time, ISO 8601 to the second.
    pub created_date: String,
}

impl DocumentMeta {
    pub fn now() -> Self {
        Self {
            created_in: CREATED_IN.to_string(),
            created_date: chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }
}

/// Output file name: `<number>_<title>.xml`, with every non-word character
/// of the title replaced by an underscore.
pub fn output_filename(song: &SongRecord) -> String {
    format!("{}_{}.xml", song.number, NON_WORD.replace_all(&song.title, "_"))
}

/// Serialize a song as an OpenLyrics XML document.
pub fn to_openlyrics(song: &SongRecord, meta: &DocumentMeta) -> Result<String, ExportError> {
    let mut xml = XmlOut::new();

    xml.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    xml.newline()?;
    xml.open(BytesStart::new("song").with_attributes([
        ("xmlns", OPENLYRICS_NAMESPACE),
        ("version", OPENLYRICS_VERSION),
        ("createdIn", meta.created_in.as_str()),
        ("createdDate", meta.created_date.as_str()),
    ]))?;

    xml.open(BytesStart::new("properties"))?;

    xml.open(BytesStart::new("titles"))?;
    xml.text_element("title", &song.title)?;
    xml.close("titles")?;

    xml.text_element("copyright", &song.copyright)?;
    xml.text_element("verseOrder", &song.verse_order())?;

    xml.open(BytesStart::new("authors"))?;
    for author in &song.authors {
        match author {
            Some(name) => xml.text_element("author", name)?,
            None => xml.empty(BytesStart::new("author"))?,
        }
    }
    xml.close("authors")?;

    if !song.themes.is_empty() {
        xml.open(BytesStart::new("themes"))?;
        for theme in &song.themes {
            xml.text_element("theme", theme)?;
        }
        xml.close("themes")?;
    }

    xml.open(BytesStart::new("songbooks"))?;
    xml.empty(BytesStart::new("songbook").with_attributes([
        ("name", song.songbook.name.as_str()),
        ("entry", song.songbook.entry.as_str()),
    ]))?;
    xml.close("songbooks")?;

    xml.close("properties")?;

    xml.open(BytesStart::new("lyrics"))?;
    for section in &song.sections {
        xml.open(BytesStart::new("verse").with_attributes([("name", section.name.as_str())]))?;

        let markup = render(section);
        xml.event(Event::Start(BytesStart::new("lines")))?;
        for (i, run) in markup.segments().enumerate() {
            if i > 0 {
                xml.event(Event::Empty(BytesStart::new("br")))?;
            }
            if !run.is_empty() {
                xml.text(run)?;
            }
        }
        xml.event(Event::End(BytesEnd::new("lines")))?;
        xml.newline()?;

        xml.close("verse")?;
    }
    xml.close("lyrics")?;

    xml.close("song")?;

    xml.finish()
}

/// Write a song to `<output_dir>/<output_filename>` and return the path.
pub fn write_song(
    song: &SongRecord,
    output_dir: &Path,
    meta: &DocumentMeta,
) -> Result<PathBuf, ExportError> {
    let xml = to_openlyrics(song, meta)?;

    fs::create_dir_all(output_dir).map_err(|source| ExportError::Io {
        source,
        path: output_dir.to_path_buf(),
    })?;
    let path = output_dir.join(output_filename(song));
    fs::write(&path, &xml).map_err(|source| ExportError::Io {
        source,
        path: path.clone(),
    })?;

    tracing::info!(
        path = %path.display(),
        sections = song.sections.len(),
        bytes = xml.len(),
        "Wrote OpenLyrics file"
    );
    Ok(path)
}

/// Thin wrapper over the quick-xml writer that puts each element on its
/// own line.
struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), ExportError> {
        self.writer.write_event(event)?;
        Ok(())
    }

    fn newline(&mut self) -> Result<(), ExportError> {
        self.event(Event::Text(BytesText::new("\n")))
    }

    /// Text content. Only `<`, `>` and `&` are escaped so lyrics keep
    /// their apostrophes readable.
    fn text(&mut self, text: &str) -> Result<(), ExportError> {
        self.event(Event::Text(BytesText::from_escaped(partial_escape(text))))
    }

    fn open(&mut self, start: BytesStart<'_>) -> Result<(), ExportError> {
        self.event(Event::Start(start))?;
        self.newline()
    }

    fn close(&mut self, name: &str) -> Result<(), ExportError> {
        self.event(Event::End(BytesEnd::new(name)))?;
        self.newline()
    }

    fn empty(&mut self, start: BytesStart<'_>) -> Result<(), ExportError> {
        self.event(Event::Empty(start))?;
        self.newline()
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<(), ExportError> {
        self.event(Event::Start(BytesStart::new(name)))?;
        self.text(text)?;
        self.close(name)
    }

    fn finish(self) -> Result<String, ExportError> {
        Ok(String::from_utf8(self.writer.into_inner())?)
    }
}
