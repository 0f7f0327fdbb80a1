//! Pulling the code to run out of the active editor

use std::ops::Range;

/// A half-open byte range into the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Read access to an open editor
pub trait TextEditor: Send + Sync {
    fn document_text(&self) -> &str;

    fn selection(&self) -> Selection;

    /// Text covered by the selection, clamped to the document and to
    /// character boundaries
    fn selected_text(&self) -> &str {
        let text = self.document_text();
        let range = clamp(text, self.selection());
        &text[range]
    }
}

/// An in-memory document with an optional selection
#[derive(Debug, Clone, Default)]
pub struct TextDocument {
    text: String,
    selection: Selection,
}

impl TextDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            selection: Selection::default(),
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Select whole lines, 1-based and inclusive. Lines past the end of the
    /// document are ignored; an inverted range selects nothing.
    pub fn with_line_selection(mut self, first: usize, last: usize) -> Self {
        self.selection = line_range(&self.text, first, last);
        self
    }
}

impl TextEditor for TextDocument {
    fn document_text(&self) -> &str {
        &self.text
    }

    fn selection(&self) -> Selection {
        self.selection
    }
}

/// Selected text if the selection is non-empty, otherwise the whole
/// document; trimmed. `None` when there is no editor or nothing to run.
pub fn retrieve_content(editor: Option<&dyn TextEditor>) -> Option<String> {
    let editor = editor?;

    let code = if editor.selection().is_empty() {
        editor.document_text()
    } else {
        editor.selected_text()
    };

    let code = code.trim();
    (!code.is_empty()).then(|| code.to_string())
}

fn clamp(text: &str, selection: Selection) -> Range<usize> {
    let mut start = selection.start.min(text.len());
    let mut end = selection.end.min(text.len()).max(start);
    while !text.is_char_boundary(start) {
        start -= 1;
    }
    while !text.is_char_boundary(end) {
        end += 1;
    }
    start..end
}

fn line_range(text: &str, first: usize, last: usize) -> Selection {
    if first == 0 || last < first {
        return Selection::default();
    }

    let mut start = None;
    let mut end = text.len();
    let mut offset = 0;
    for (index, line) in text.split_inclusive('\n').enumerate() {
        let number = index + 1;
        if number == first {
            start = Some(offset);
        }
        offset += line.len();
        if number == last {
            end = offset;
            break;
        }
    }

    match start {
        Some(start) => Selection::new(start, end),
        None => Selection::default(),
    }
}
