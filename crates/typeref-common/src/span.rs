/// A half-open byte range `[start, stop)` within an annotation string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Start offset (inclusive).
    pub start: usize,
    /// Stop offset (exclusive).
    pub stop: usize,
}

impl Span {
    pub fn new(start: usize, stop: usize) -> Self {
        debug_assert!(start <= stop, "span start {start} after stop {stop}");
        Self { start, stop }
    }

    /// A one-byte span covering the character at `index`.
    pub fn at(index: usize) -> Self {
        Self {
            start: index,
            stop: index + 1,
        }
    }

    /// The text covered by this span.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.stop]
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.stop)
    }
}
