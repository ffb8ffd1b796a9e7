mod atoms;
pub mod ranges;
pub mod split;

use std::cell::Cell;

use tracing::{debug, trace};

use crate::ast::{ParsedType, TypeArgs, UNION_NAME};
use crate::error::{ParseError, TypeError, Window};

pub use ranges::{find_outside_ranges, outer_bracket_ranges};
pub use split::split_at;

/// Parse a textual type annotation into a [`ParsedType`] tree.
pub fn parse_type(annotation: &str) -> Result<ParsedType, ParseError> {
    Parser::new(annotation).parse()
}

/// Deepest argument nesting accepted before parsing gives up.
pub const MAX_DEPTH: usize = 128;

/// Recursive descent parser over a single annotation string.
///
/// Each production works on a `[start, stop)` window of the annotation and only
/// recognizes separators outside nested brackets.
pub struct Parser<'a> {
    annotation: &'a str,
    depth: Cell<usize>,
}

impl<'a> Parser<'a> {
    pub fn new(annotation: &'a str) -> Self {
        Self {
            annotation,
            depth: Cell::new(0),
        }
    }

    /// Parse the whole annotation as one type.
    pub fn parse(&self) -> Result<ParsedType, ParseError> {
        debug!(annotation = self.annotation, "parsing type annotation");
        self.parse_type(0, self.annotation.len())
            .map_err(|source| ParseError {
                annotation: self.annotation.to_string(),
                source,
            })
    }

    /// `Type := UnionMember ('|' UnionMember)*`
    fn parse_type(&self, start: usize, stop: usize) -> Result<ParsedType, TypeError> {
        trace!(start, stop, text = &self.annotation[start..stop], "parse type");
        let brackets = outer_bracket_ranges(self.annotation, start, stop)?;
        let bars: Vec<usize> =
            find_outside_ranges('|', self.annotation, &brackets, start, stop).collect();
        if bars.is_empty() {
            return self.parse_atom(start, stop);
        }
        self.check_segments(&bars, start, stop)?;
        let members = split_at(&bars, start, stop)
            .into_iter()
            .map(|r| {
                self.parse_atom(r.start, r.end)
                    .map_err(|e| e.within(self.trimmed_window(r.start, r.end)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.build(start, stop, UNION_NAME, TypeArgs::Types(members), false)
    }

    /// Report blank segments between separators, which the splitter would drop.
    fn check_segments(
        &self,
        separators: &[usize],
        start: usize,
        stop: usize,
    ) -> Result<(), TypeError> {
        let mut current = start;
        for &idx in separators.iter().chain(std::iter::once(&stop)) {
            if self.annotation[current..idx].trim().is_empty() {
                return Err(TypeError::EmptyTypeName {
                    window: self.window(current, idx),
                });
            }
            current = idx + 1;
        }
        Ok(())
    }

    fn window(&self, start: usize, stop: usize) -> Window {
        Window::new(self.annotation, start, stop)
    }

    /// The window with surrounding whitespace removed.
    fn trimmed_window(&self, start: usize, stop: usize) -> Window {
        let (start, stop) = self.trim(start, stop);
        self.window(start, stop)
    }

    fn trim(&self, mut start: usize, mut stop: usize) -> (usize, usize) {
        let text = &self.annotation[start..stop];
        let leading = text.len() - text.trim_start().len();
        let trailing = text.len() - text.trim_end().len();
        if leading == text.len() {
            return (start, start);
        }
        start += leading;
        stop -= trailing;
        (start, stop)
    }

    /// Build a node, reporting invariant violations against the window.
    fn build(
        &self,
        start: usize,
        stop: usize,
        name: &str,
        args: TypeArgs,
        variadic: bool,
    ) -> Result<ParsedType, TypeError> {
        ParsedType::new(name, args, variadic).map_err(|reason| TypeError::MalformedType {
            window: self.window(start, stop),
            reason,
        })
    }
}
