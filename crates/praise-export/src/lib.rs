pub mod openlyrics;

pub use openlyrics::{output_filename, to_openlyrics, write_song, DocumentMeta, ExportError, CREATED_IN};
