use std::collections::VecDeque;
use std::ops::Range;

use crate::error::TypeError;

fn closing_for(open: char) -> char {
    match open {
        '[' => ']',
        _ => ')',
    }
}

/// Find the maximal top-level bracketed spans of `text[start..stop]`.
///
/// Each range includes both its opening and closing bracket. Square and round
/// brackets are tracked together and must nest properly. Brackets inside
/// quoted strings (`'...'` or `"..."`, with backslash escapes) are ignored.
pub fn outer_bracket_ranges(
    text: &str,
    start: usize,
    stop: usize,
) -> Result<Vec<Range<usize>>, TypeError> {
    let mut ranges = Vec::new();
    let mut open: Vec<(char, usize)> = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (offset, c) in text[start..stop].char_indices() {
        let index = start + offset;
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '[' | '(' => open.push((c, index)),
            ']' | ')' => match open.pop() {
                Some((opener, at)) if closing_for(opener) == c => {
                    if open.is_empty() {
                        ranges.push(at..index + 1);
                    }
                }
                _ => {
                    return Err(TypeError::UnbalancedBracket { bracket: c, index });
                }
            },
            _ => {}
        }
    }
    if let Some(&(bracket, index)) = open.first() {
        return Err(TypeError::UnbalancedBracket { bracket, index });
    }
    Ok(ranges)
}

/// Lazily yields indices of `target` in `text[start..stop]` lying outside all `ranges`.
pub struct FindOutside<'a> {
    text: &'a str,
    target: char,
    ranges: VecDeque<Range<usize>>,
    pos: usize,
    stop: usize,
}

impl Iterator for FindOutside<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.pos >= self.stop {
                return None;
            }
            let index = self.pos + self.text[self.pos..self.stop].find(self.target)?;
            while self.ranges.front().is_some_and(|r| r.end <= self.pos) {
                self.ranges.pop_front();
            }
            match self.ranges.front() {
                Some(r) if r.contains(&index) => {
                    // Jump past the range instead of scanning its interior.
                    self.pos = r.end;
                    self.ranges.pop_front();
                }
                _ => {
                    self.pos = index + self.target.len_utf8();
                    return Some(index);
                }
            }
        }
    }
}

/// Indices of `target` in `text[start..stop]`, in ascending order, skipping any
/// occurrence inside one of `ranges`.
pub fn find_outside_ranges<'a>(
    target: char,
    text: &'a str,
    ranges: &[Range<usize>],
    start: usize,
    stop: usize,
) -> FindOutside<'a> {
    let mut sorted = ranges.to_vec();
    sorted.sort_by_key(|r| r.start);
    FindOutside {
        text,
        target,
        ranges: sorted.into(),
        pos: start,
        stop,
    }
}
