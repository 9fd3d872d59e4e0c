use std::fmt;

use internment::ArcIntern;

/// A byte range of a notation string, kept alongside the whole string so errors can point into it
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Span {
    source: ArcIntern<str>,
    start: usize,
    end: usize,
}

impl Span {
    /// Clamps the range to the source and to character boundaries.
    pub fn new(source: ArcIntern<str>, start: usize, end: usize) -> Span {
        let boundary = |mut offset: usize| {
            offset = offset.min(source.len());
            while !source.is_char_boundary(offset) {
                offset -= 1;
            }
            offset
        };

        let start = boundary(start);
        let end = boundary(end).max(start);

        Span { source, start, end }
    }

    /// An empty span at `offset`, for errors that point between two characters
    pub fn at(source: ArcIntern<str>, offset: usize) -> Span {
        Span::new(source, offset, offset)
    }

    pub fn from_span(span: pest::Span) -> Span {
        Span::new(ArcIntern::from(span.get_input()), span.start(), span.end())
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn text(&self) -> &str {
        &self.source[self.start..self.end]
    }

    pub fn source(&self) -> ArcIntern<str> {
        ArcIntern::clone(&self.source)
    }

    /// The line the span starts on and how many characters precede the span on that line.
    fn line_and_column(&self) -> (&str, usize) {
        let line_start = self.source[..self.start].rfind('\n').map_or(0, |newline| newline + 1);
        let line_end = self.source[self.start..]
            .find('\n')
            .map_or(self.source.len(), |newline| self.start + newline);

        (
            &self.source[line_start..line_end],
            self.source[line_start..self.start].chars().count(),
        )
    }
}

impl From<pest::Span<'_>> for Span {
    fn from(span: pest::Span) -> Self {
        Span::from_span(span)
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{}..{}", self.text(), self.start, self.end)
    }
}

/// The line of the span with a caret under its first character.
impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (line, column) = self.line_and_column();

        writeln!(f, "  {line}")?;
        write!(f, "  {}^", " ".repeat(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(source: &str, start: usize, end: usize) -> Span {
        Span::new(ArcIntern::from(source), start, end)
    }

    #[test_log::test]
    fn caret_under_the_start() {
        assert_eq!(span("R U' F", 2, 4).to_string(), "  R U' F\n    ^");
        assert_eq!(span("R U' F", 6, 6).to_string(), "  R U' F\n        ^");
        assert_eq!(span("R\nU ? F", 4, 5).to_string(), "  U ? F\n    ^");
    }

    #[test_log::test]
    fn ranges_are_clamped() {
        assert_eq!(span("R U", 1, 10).end(), 3);
        assert_eq!(span("R U", 3, 1).text(), "");
        assert_eq!(span("Ré", 2, 3).start(), 1);
        assert_eq!(span("R U' F", 2, 4).text(), "U'");
    }
}
