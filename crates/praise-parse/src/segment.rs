// Section segmentation of lyric paragraphs.
//
// Turns the page's paragraphs into verses, choruses and bridges and records
// the order they are sung in. The page numbers every verse except the first,
// labels bridges with "Bridge:", and marks a repeated chorus with a single
// line ending in an ellipsis (the chorus's first words followed by "…").
// Anything else unlabelled is a chorus.

use std::collections::{HashSet, VecDeque};

use praise_model::{section_name, Section, SectionKind};

use crate::split::split_number;

const BRIDGE_LABEL: &str = "bridge:";
const CHORUS_LABEL: &str = "chorus:";

/// The sections of one song and the order they are performed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    pub sections: Vec<Section>,
    pub performance_order: Vec<String>,
}

/// Lines waiting to be classified. `ordinal` is the leading verse number
/// already split off the first line, if there was one.
#[derive(Debug)]
struct LineGroup {
    ordinal: Option<u32>,
    lines: Vec<String>,
}

/// Segmentation state for a single song.
///
/// Counters and the performance order belong to one document; create a new
/// `Segmenter` (or call [`segment`]) for each song.
#[derive(Debug)]
pub struct Segmenter<'t> {
    title: &'t str,
    bridge_count: u32,
    chorus_count: u32,
    seen_paragraph: bool,
    names: HashSet<String>,
    result: Segmentation,
}

/// Segment a song's paragraphs into sections.
pub fn segment(title: &str, paragraphs: &[Vec<String>]) -> Segmentation {
    let mut segmenter = Segmenter::new(title);
    for paragraph in paragraphs {
        segmenter.push_paragraph(paragraph);
    }
    segmenter.finish()
}

impl<'t> Segmenter<'t> {
    pub fn new(title: &'t str) -> Self {
        Self {
            title,
            bridge_count: 0,
            chorus_count: 0,
            seen_paragraph: false,
            names: HashSet::new(),
            result: Segmentation::default(),
        }
    }

    /// Classify one paragraph, given as its lines in page order.
    pub fn push_paragraph(&mut self, paragraph: &[String]) {
        let mut lines: Vec<String> = paragraph
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        if lines.is_empty() {
            return;
        }

        let ordinal = if !self.seen_paragraph {
            // The opening verse is never numbered, and its first line is
            // printed in capitals.
            self.seen_paragraph = true;
            if let Some(rest) = strip_prefix_ignore_case(&lines[0], self.title) {
                lines[0] = format!("{}{rest}", self.title);
            }
            Some(1)
        } else {
            let parsed = split_number(&lines[0]);
            lines[0] = parsed.text;
            parsed.ordinal
        };

        let mut pending = VecDeque::from([LineGroup { ordinal, lines }]);
        while let Some(group) = pending.pop_front() {
            if let Some(continuation) = self.classify(group) {
                pending.push_back(continuation);
            }
        }
    }

    pub fn finish(self) -> Segmentation {
        tracing::debug!(
            sections = self.result.sections.len(),
            order = %self.result.performance_order.join(" "),
            "Segmented lyrics"
        );
        self.result
    }

    /// Create at most one section from `group`. Returns the lines after an
    /// embedded verse number, which start a new verse.
    fn classify(&mut self, group: LineGroup) -> Option<LineGroup> {
        let LineGroup { ordinal, mut lines } = group;

        let (kind, number) = match ordinal {
            Some(n) => (SectionKind::Verse, n),
            None if is_label(&lines[0], BRIDGE_LABEL) => {
                lines.remove(0);
                (SectionKind::Bridge, self.next_bridge())
            }
            None if is_reprise(&lines[0]) && self.chorus_count > 0 => {
                let chorus = section_name(SectionKind::Chorus, self.chorus_count);
                tracing::trace!(chorus = %chorus, "Chorus repeat");
                self.result.performance_order.push(chorus);

                lines.remove(0);
                if lines.is_empty() {
                    return None;
                }
                let parsed = split_number(&lines[0]);
                lines[0] = parsed.text;
                match parsed.ordinal {
                    Some(n) => (SectionKind::Verse, n),
                    None if is_label(&lines[0], BRIDGE_LABEL) => {
                        lines.remove(0);
                        (SectionKind::Bridge, self.next_bridge())
                    }
                    None => {
                        // Neither a verse nor a bridge: not part of the song.
                        tracing::debug!(
                            line = %lines[0],
                            dropped = lines.len(),
                            "Dropping unrecognized lines after chorus repeat"
                        );
                        return None;
                    }
                }
            }
            None => {
                if is_label(&lines[0], CHORUS_LABEL) {
                    lines.remove(0);
                }
                self.chorus_count += 1;
                (SectionKind::Chorus, self.chorus_count)
            }
        };

        let continuation = split_embedded_verse(&mut lines);
        self.create(kind, number, lines);
        continuation
    }

    fn next_bridge(&mut self) -> u32 {
        self.bridge_count += 1;
        self.bridge_count
    }

    fn create(&mut self, kind: SectionKind, number: u32, lines: Vec<String>) {
        let section = Section::new(kind, number, lines);
        if !self.names.insert(section.name.clone()) {
            // Only verses can collide: chorus and bridge numbers are counters.
            tracing::warn!(name = %section.name, "Duplicate verse number; dropping section");
            return;
        }
        tracing::trace!(name = %section.name, lines = section.lines.len(), "New section");
        self.result.performance_order.push(section.name.clone());
        self.result.sections.push(section);
    }
}

/// Cut `lines` at the first line after the opening one that starts with a
/// verse number. The cut-off lines are returned with that number split off.
fn split_embedded_verse(lines: &mut Vec<String>) -> Option<LineGroup> {
    let (index, parsed) = lines
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, line)| (i, split_number(line)))
        .find(|(_, parsed)| parsed.ordinal.is_some())?;

    let mut rest = lines.split_off(index);
    rest[0] = parsed.text;
    Some(LineGroup {
        ordinal: parsed.ordinal,
        lines: rest,
    })
}

fn is_label(line: &str, label: &str) -> bool {
    line.trim().eq_ignore_ascii_case(label)
}

/// A chorus repeat is written as the chorus's opening words and a `…`.
/// Three ASCII dots are ordinary lyric punctuation.
fn is_reprise(line: &str) -> bool {
    line.trim_end().ends_with('…')
}

/// Case-insensitive `strip_prefix`, comparing character by character so that
/// the byte offset into `text` stays valid whatever the case mapping does.
fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return None;
    }
    let mut text_chars = text.char_indices();
    for p in prefix.chars() {
        let (_, t) = text_chars.next()?;
        if !t.to_lowercase().eq(p.to_lowercase()) {
            return None;
        }
    }
    let rest = match text_chars.next() {
        Some((i, _)) => &text[i..],
        None => "",
    };
    Some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    fn names(seg: &Segmentation) -> Vec<&str> {
        seg.sections.iter().map(|s| s.name.as_str()).collect()
    }

    fn order(seg: &Segmentation) -> Vec<&str> {
        seg.performance_order.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_first_paragraph_title_casing() {
        let seg = segment(
            "Amazing Grace",
            &[para(&["Amazing grace, how sweet the sound", "that saved a wretch like me!"])],
        );
        assert_eq!(names(&seg), vec!["v1"]);
        assert_eq!(
            seg.sections[0].lines,
            vec!["Amazing Grace, how sweet the sound", "that saved a wretch like me!"]
        );
    }

    #[test]
    fn test_first_paragraph_uppercase_line() {
        let seg = segment("Amazing Grace", &[para(&["AMAZING GRACE! how sweet"])]);
        assert_eq!(seg.sections[0].lines, vec!["Amazing Grace! how sweet"]);
    }

    #[test]
    fn test_first_paragraph_ignores_leading_digits() {
        let seg = segment("Ten Thousand", &[para(&["3 times I called"])]);
        assert_eq!(names(&seg), vec!["v1"]);
        assert_eq!(seg.sections[0].lines, vec!["3 times I called"]);
    }

    #[test]
    fn test_title_not_a_prefix_leaves_line_alone() {
        let seg = segment("Amazing Grace", &[para(&["How sweet the sound"])]);
        assert_eq!(seg.sections[0].lines, vec!["How sweet the sound"]);
    }

    #[test]
    fn test_verses_chorus_and_reprise() {
        let seg = segment(
            "Song",
            &[
                para(&["Song of praise", "line two"]),
                para(&["Chorus:", "Praise Him", "praise Him"]),
                para(&["2 Second verse", "more"]),
                para(&["Praise Him…"]),
            ],
        );
        assert_eq!(names(&seg), vec!["v1", "c1", "v2"]);
        assert_eq!(order(&seg), vec!["v1", "c1", "v2", "c1"]);

        let chorus = &seg.sections[1];
        assert_eq!(chorus.kind, SectionKind::Chorus);
        assert!(chorus.italic);
        assert_eq!(chorus.lines, vec!["Praise Him", "praise Him"]);
        assert_eq!(seg.sections[2].lines, vec!["Second verse", "more"]);
    }

    #[test]
    fn test_reprise_only_paragraph_creates_no_section() {
        // The first paragraph is always verse 1, so the chorus comes second.
        let seg = segment(
            "Song",
            &[
                para(&["Opening"]),
                para(&["Chorus:", "Praise Him"]),
                para(&["Praise Him…"]),
            ],
        );
        assert_eq!(names(&seg), vec!["v1", "c1"]);
        assert_eq!(order(&seg), vec!["v1", "c1", "c1"]);
    }

    #[test]
    fn test_ellipsis_before_any_chorus_is_a_chorus() {
        let seg = segment("Song", &[para(&["Opening"]), para(&["Wait for it…", "then sing"])]);
        assert_eq!(names(&seg), vec!["v1", "c1"]);
        assert_eq!(seg.sections[1].lines, vec!["Wait for it…", "then sing"]);
    }

    #[test]
    fn test_reprise_followed_by_verse() {
        let seg = segment(
            "Song",
            &[
                para(&["Opening"]),
                para(&["Refrain line", "second"]),
                para(&["Refrain line…", "3. Third verse", "ends here"]),
            ],
        );
        assert_eq!(names(&seg), vec!["v1", "c1", "v3"]);
        assert_eq!(order(&seg), vec!["v1", "c1", "c1", "v3"]);
        assert_eq!(seg.sections[2].lines, vec!["Third verse", "ends here"]);
    }

    #[test]
    fn test_reprise_followed_by_bridge() {
        let seg = segment(
            "Song",
            &[
                para(&["Opening"]),
                para(&["Chorus:", "Refrain"]),
                para(&["Refrain…", "BRIDGE:", "Bridge words"]),
            ],
        );
        assert_eq!(names(&seg), vec!["v1", "c1", "b1"]);
        assert_eq!(order(&seg), vec!["v1", "c1", "c1", "b1"]);
        assert_eq!(seg.sections[2].kind, SectionKind::Bridge);
        assert_eq!(seg.sections[2].lines, vec!["Bridge words"]);
    }

    #[test]
    fn test_reprise_followed_by_unrecognized_text_is_dropped() {
        let seg = segment(
            "Song",
            &[
                para(&["Opening"]),
                para(&["Chorus:", "Refrain"]),
                para(&["Refrain…", "Some trailing words", "and more"]),
            ],
        );
        assert_eq!(names(&seg), vec!["v1", "c1"]);
        assert_eq!(order(&seg), vec!["v1", "c1", "c1"]);
    }

    #[test]
    fn test_bridges_are_counted() {
        let seg = segment(
            "Song",
            &[
                para(&["Opening"]),
                para(&["Bridge:", "First bridge"]),
                para(&["2 Verse two"]),
                para(&["bridge:", "Second bridge"]),
            ],
        );
        assert_eq!(names(&seg), vec!["v1", "b1", "v2", "b2"]);
        let rendered: Vec<&String> = seg.sections.iter().flat_map(|s| &s.lines).collect();
        assert!(rendered.iter().all(|l| !l.eq_ignore_ascii_case("bridge:")));
    }

    #[test]
    fn test_label_only_paragraphs_create_empty_sections() {
        let seg = segment("Song", &[para(&["Opening"]), para(&["Bridge:"]), para(&["Chorus:"])]);
        assert_eq!(names(&seg), vec!["v1", "b1", "c1"]);
        assert!(seg.sections[1].lines.is_empty());
        assert!(seg.sections[2].lines.is_empty());
    }

    #[test]
    fn test_embedded_verse_number_starts_new_verse() {
        let seg = segment(
            "Song",
            &[
                para(&["Opening", "2 Second verse", "more", "3. Third verse"]),
                para(&["Chorus:", "Refrain"]),
            ],
        );
        assert_eq!(names(&seg), vec!["v1", "v2", "v3", "c1"]);
        assert_eq!(order(&seg), vec!["v1", "v2", "v3", "c1"]);
        assert_eq!(seg.sections[0].lines, vec!["Opening"]);
        assert_eq!(seg.sections[1].lines, vec!["Second verse", "more"]);
        assert_eq!(seg.sections[2].lines, vec!["Third verse"]);
    }

    #[test]
    fn test_embedded_verse_inside_chorus() {
        let seg = segment(
            "Song",
            &[para(&["Opening"]), para(&["Chorus:", "Refrain", "4 Fourth verse"])],
        );
        assert_eq!(names(&seg), vec!["v1", "c1", "v4"]);
        assert_eq!(seg.sections[1].lines, vec!["Refrain"]);
        assert_eq!(seg.sections[2].lines, vec!["Fourth verse"]);
    }

    #[test]
    fn test_empty_paragraphs_are_skipped() {
        let seg = segment(
            "Song",
            &[para(&[]), para(&["", "  "]), para(&["SONG begins"]), para(&[])],
        );
        assert_eq!(names(&seg), vec!["v1"]);
        assert_eq!(seg.sections[0].lines, vec!["Song begins"]);
    }

    #[test]
    fn test_duplicate_verse_number_is_dropped() {
        let seg = segment(
            "Song",
            &[para(&["Opening"]), para(&["2 Two"]), para(&["2 Two again"])],
        );
        assert_eq!(names(&seg), vec!["v1", "v2"]);
        assert_eq!(order(&seg), vec!["v1", "v2"]);
        assert_eq!(seg.sections[1].lines, vec!["Two"]);
    }

    #[test]
    fn test_order_only_names_existing_sections() {
        let seg = segment(
            "Song",
            &[
                para(&["Opening"]),
                para(&["Chorus:", "One"]),
                para(&["2 Two", "One…"]),
                para(&["One…"]),
                para(&["Chorus:", "Other"]),
                para(&["Other…", "Bridge:", "Span"]),
            ],
        );
        let created: HashSet<&str> = names(&seg).into_iter().collect();
        assert!(seg.performance_order.iter().all(|n| created.contains(n.as_str())));
        assert_eq!(order(&seg), vec!["v1", "c1", "v2", "c1", "c2", "c2", "b1"]);
    }

    #[test]
    fn test_state_does_not_leak_between_songs() {
        let paragraphs = [para(&["Opening"]), para(&["Chorus:", "Refrain"])];
        let first = segment("Song", &paragraphs);
        let second = segment("Song", &paragraphs);
        assert_eq!(first, second);
        assert_eq!(names(&second), vec!["v1", "c1"]);
    }

    #[test]
    fn test_three_dots_start_a_new_chorus() {
        let seg = segment(
            "Song",
            &[
                para(&["Opening"]),
                para(&["Chorus:", "Praise Him"]),
                para(&["Hallelujah...", "sing to the King", "forever"]),
            ],
        );
        assert_eq!(names(&seg), vec!["v1", "c1", "c2"]);
        assert_eq!(order(&seg), vec!["v1", "c1", "c2"]);
        assert_eq!(
            seg.sections[2].lines,
            vec!["Hallelujah...", "sing to the King", "forever"]
        );
    }

    #[test]
    fn test_is_reprise() {
        assert!(is_reprise("Praise Him…"));
        assert!(is_reprise("Praise Him… "));
        assert!(!is_reprise("Praise Him..."));
        assert!(!is_reprise("…Praise Him"));
        assert!(!is_reprise("Praise Him."));
    }

    #[test]
    fn test_strip_prefix_ignore_case() {
        assert_eq!(strip_prefix_ignore_case("ÉTÉ long", "été"), Some(" long"));
        assert_eq!(strip_prefix_ignore_case("Abc", "abc"), Some(""));
        assert_eq!(strip_prefix_ignore_case("Ab", "abc"), None);
        assert_eq!(strip_prefix_ignore_case("xyz", ""), None);
    }
}
