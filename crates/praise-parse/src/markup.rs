// Display markup for section text.

use praise_model::Section;

/// OpenLyrics formatting tags for italic text.
pub const ITALIC_START: &str = "{it}";
pub const ITALIC_END: &str = "{/it}";

/// A section's rendered text with the byte offsets where line breaks go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    text: String,
    breaks: Vec<usize>,
}

impl Markup {
    /// The rendered text without line breaks.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte offsets into `text()` at which a line break precedes the text.
    pub fn breaks(&self) -> &[usize] {
        &self.breaks
    }

    /// The runs of text between line breaks. Always yields at least one run.
    pub fn segments(&self) -> impl Iterator<Item = &str> + '_ {
        let starts = std::iter::once(0).chain(self.breaks.iter().copied());
        let ends = self
            .breaks
            .iter()
            .copied()
            .chain(std::iter::once(self.text.len()));
        starts.zip(ends).map(move |(start, end)| &self.text[start..end])
    }

    /// Plain text with newlines at the break points.
    pub fn to_display(&self) -> String {
        self.segments().collect::<Vec<_>>().join("\n")
    }
}

/// Render a section's lines: every line after the first is preceded by a
/// break, and italic sections are wrapped in `{it}` … `{/it}`.
pub fn render(section: &Section) -> Markup {
    let mut markup = Markup::default();
    if section.italic {
        markup.text.push_str(ITALIC_START);
    }
    for (i, line) in section.lines.iter().enumerate() {
        if i > 0 {
            markup.breaks.push(markup.text.len());
        }
        markup.text.push_str(line);
    }
    if section.italic {
        markup.text.push_str(ITALIC_END);
    }
    markup
}
