use praise_model::{parse_section_name, SectionKind, SongRecord};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("duplicate section name: {0}")]
    DuplicateSection(String),

    #[error("malformed section name '{name}': {reason}")]
    BadSectionName { name: String, reason: String },

    #[error("section '{name}' is named like a {named} but is a {actual}")]
    KindMismatch {
        name: String,
        named: SectionKind,
        actual: SectionKind,
    },

    #[error("section '{0}' is italic but is not a chorus")]
    ItalicNonChorus(String),

    #[error("verse order references unknown section: {0}")]
    UnknownSection(String),

    #[error("section '{0}' is repeated in the verse order but is not a chorus")]
    NonChorusRepeat(String),
}

/// Check a song record for internal consistency.
///
/// Returns every problem found; an empty list means the record is valid.
pub fn validate_song(song: &SongRecord) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if song.title.trim().is_empty() {
        errors.push(ValidationError::MissingField("title".into()));
    }
    if song.songbook.entry.trim().is_empty() {
        errors.push(ValidationError::MissingField("songbook.entry".into()));
    }

    let mut names = HashSet::new();
    for section in &song.sections {
        if !names.insert(section.name.as_str()) {
            errors.push(ValidationError::DuplicateSection(section.name.clone()));
        }

        match parse_section_name(&section.name) {
            Ok((named, _)) if named != section.kind => {
                errors.push(ValidationError::KindMismatch {
                    name: section.name.clone(),
                    named,
                    actual: section.kind,
                });
            }
            Ok(_) => {}
            Err(e) => errors.push(ValidationError::BadSectionName {
                name: section.name.clone(),
                reason: e.to_string(),
            }),
        }

        if section.italic && section.kind != SectionKind::Chorus {
            errors.push(ValidationError::ItalicNonChorus(section.name.clone()));
        }
    }

    let mut performed = HashSet::new();
    for name in &song.performance_order {
        match song.find_section(name) {
            None => errors.push(ValidationError::UnknownSection(name.clone())),
            Some(section) => {
                if !performed.insert(name.as_str()) && section.kind != SectionKind::Chorus {
                    errors.push(ValidationError::NonChorusRepeat(name.clone()));
                }
            }
        }
    }

    for e in &errors {
        tracing::warn!(number = %song.number, "{e}");
    }

    errors
}
