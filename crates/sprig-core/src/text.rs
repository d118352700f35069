//! Byte spans and their LSP (UTF-16) projections.

use serde::Serialize;
pub use text_size::{TextRange, TextSize};

/// Half-open byte range into a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` when `offset` lies inside the span; the end offset counts as inside so a cursor
    /// placed right after a token still hits it.
    #[inline]
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    pub fn text_range(&self) -> TextRange {
        TextRange::new(
            TextSize::from(self.start as u32),
            TextSize::from(self.end as u32),
        )
    }
}

/// LSP-compatible position (UTF-16 code units).
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    #[inline]
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// LSP-compatible range (UTF-16 code units).
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    #[inline]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// Line start table for one text snapshot.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
    text_len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![TextSize::from(0)];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    line_starts.push(TextSize::from((i + 2) as u32));
                    i += 2;
                }
                b'\n' | b'\r' => {
                    line_starts.push(TextSize::from((i + 1) as u32));
                    i += 1;
                }
                _ => i += 1,
            }
        }

        Self {
            line_starts,
            text_len: TextSize::from(text.len() as u32),
        }
    }

    #[inline]
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    fn line_of(&self, offset: TextSize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(insert) => insert.saturating_sub(1),
        }
    }

    /// Convert a byte offset to a UTF-16 position. Offsets past the end clamp to EOF.
    ///
    /// `text` must be the snapshot this index was built from.
    pub fn position(&self, text: &str, offset: usize) -> Position {
        let offset = TextSize::from(offset as u32).min(self.text_len);
        let line = self.line_of(offset);
        let start = u32::from(self.line_starts[line]) as usize;
        let end = u32::from(offset) as usize;
        let character = text
            .get(start..end)
            .map(|prefix| prefix.chars().map(|c| c.len_utf16() as u32).sum())
            .unwrap_or(0);
        Position::new(line as u32, character)
    }

    pub fn range(&self, text: &str, span: Span) -> Range {
        Range::new(self.position(text, span.start), self.position(text, span.end))
    }

    /// Convert a UTF-16 position back to a byte offset; `None` when it is out of bounds or
    /// lands inside a surrogate pair.
    pub fn offset(&self, text: &str, position: Position) -> Option<usize> {
        let start = u32::from(*self.line_starts.get(position.line as usize)?) as usize;
        let end = self
            .line_starts
            .get(position.line as usize + 1)
            .map(|s| u32::from(*s) as usize)
            .unwrap_or(text.len());
        let line = text.get(start..end)?;

        let mut utf16 = 0u32;
        for (idx, ch) in line.char_indices() {
            if utf16 == position.character {
                return Some(start + idx);
            }
            utf16 += ch.len_utf16() as u32;
            if utf16 > position.character {
                return None;
            }
        }
        (utf16 == position.character).then_some(end)
    }
}
