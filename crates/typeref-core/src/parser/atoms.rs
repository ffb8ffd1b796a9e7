use tracing::trace;

use super::{find_outside_ranges, outer_bracket_ranges, split_at, Parser, MAX_DEPTH};
use crate::ast::{ParsedType, TypeArgs, LITERAL_NAMES};
use crate::error::{MalformedType, TypeError};

const ELLIPSIS: &str = "...";

impl Parser<'_> {
    /// `AtomType := Name | Name '[' ArgList ']' | Name '[' '()' ']'`
    pub(super) fn parse_atom(&self, start: usize, stop: usize) -> Result<ParsedType, TypeError> {
        let (start, stop) = {
            let (s, e) = self.trim(start, stop);
            if s == e {
                return Err(TypeError::EmptyTypeName {
                    window: self.window(start, stop),
                });
            }
            (s, e)
        };
        let brackets = outer_bracket_ranges(self.annotation, start, stop)?;
        let bracket = match brackets.as_slice() {
            [] => {
                let name = &self.annotation[start..stop];
                return self.build(start, stop, name, TypeArgs::None, false);
            }
            [bracket] => bracket.clone(),
            _ => {
                return Err(TypeError::MultipleBracketGroups {
                    window: self.window(start, stop),
                });
            }
        };
        if bracket.end < stop {
            return Err(TypeError::TrailingText {
                window: self.window(start, stop),
            });
        }
        if self.annotation[bracket.start..].starts_with('(') {
            return Err(TypeError::MalformedType {
                window: self.window(start, stop),
                reason: MalformedType::RoundBrackets,
            });
        }
        let name = self.annotation[start..bracket.start].trim();
        let (inner_start, inner_stop) = (bracket.start + 1, bracket.end - 1);
        if LITERAL_NAMES.contains(&name) {
            let body = self.annotation[inner_start..inner_stop].to_string();
            return self.build(start, stop, name, TypeArgs::Literal(body), false);
        }
        if name.is_empty() {
            return Err(TypeError::EmptyTypeName {
                window: self.window(start, stop),
            });
        }
        let (args, variadic) = self.parse_args(inner_start, inner_stop)?;
        self.build(start, stop, name, TypeArgs::Types(args), variadic)
    }

    /// `ArgList := Type (',' Type)* (',' '...')?`, or the literal `()` for no arguments.
    fn parse_args(&self, start: usize, stop: usize) -> Result<(Vec<ParsedType>, bool), TypeError> {
        trace!(start, stop, text = &self.annotation[start..stop], "parse args");
        if self.annotation[start..stop].trim() == "()" {
            return Ok((Vec::new(), false));
        }
        let brackets = outer_bracket_ranges(self.annotation, start, stop)?;
        let commas: Vec<usize> =
            find_outside_ranges(',', self.annotation, &brackets, start, stop).collect();
        if commas.is_empty() {
            return Ok((vec![self.parse_arg(start, stop)?], false));
        }
        self.check_segments(&commas, start, stop)?;
        let ranges = split_at(&commas, start, stop);
        let last = ranges.len() - 1;
        let mut args = Vec::with_capacity(ranges.len());
        let mut variadic = false;
        for (i, r) in ranges.into_iter().enumerate() {
            let arg = self.parse_arg(r.start, r.end)?;
            if arg.name() == ELLIPSIS {
                if i < last {
                    return Err(TypeError::EllipsisNotLast {
                        window: self.window(start, stop),
                    });
                }
                variadic = true;
                break;
            }
            args.push(arg);
        }
        Ok((args, variadic))
    }

    fn parse_arg(&self, start: usize, stop: usize) -> Result<ParsedType, TypeError> {
        let depth = self.depth.get() + 1;
        if depth > MAX_DEPTH {
            return Err(TypeError::TooDeep {
                window: self.trimmed_window(start, stop),
                limit: MAX_DEPTH,
            });
        }
        self.depth.set(depth);
        let result = self
            .parse_type(start, stop)
            .map_err(|e| e.within(self.trimmed_window(start, stop)));
        self.depth.set(depth - 1);
        result
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{ParsedType, TypeArgs};
    use crate::error::{TypeError, TypeErrorKind};
    use crate::parser::parse_type;
    use rstest::rstest;

    fn named(name: &str) -> ParsedType {
        ParsedType::named(name).unwrap()
    }

    #[test]
    fn variadic_tuple() {
        let t = parse_type("Tuple[int, ...]").unwrap();
        assert!(t.variadic());
        assert_eq!(t.args(), &TypeArgs::Types(vec![named("int")]));
    }

    #[test]
    fn single_ellipsis_is_an_argument() {
        let t = parse_type("Tuple[...]").unwrap();
        assert!(!t.variadic());
        assert_eq!(t.args(), &TypeArgs::Types(vec![named("...")]));
    }

    #[test]
    fn literal_body_is_raw() {
        let t = parse_type("Literal[1, 2, 3]").unwrap();
        assert_eq!(t.name(), "Literal");
        assert_eq!(t.args(), &TypeArgs::Literal("1, 2, 3".to_string()));
        let t = parse_type("typing.Literal['a|b', 'c']").unwrap();
        assert_eq!(t.args(), &TypeArgs::Literal("'a|b', 'c'".to_string()));
    }

    #[rstest]
    #[case("Literal[')']", "')'")]
    #[case("Literal['(']", "'('")]
    #[case("Literal['a (b)', 'c)']", "'a (b)', 'c)'")]
    #[case("typing.Literal[':)']", "':)'")]
    #[case("Literal[']', \"[\"]", "']', \"[\"")]
    #[case("Literal['x, y', 2]", "'x, y', 2")]
    #[case(r"Literal['it\'s )']", r"'it\'s )'")]
    fn literal_body_with_brackets_in_strings(#[case] annotation: &str, #[case] body: &str) {
        let t = parse_type(annotation).unwrap();
        assert_eq!(t.args(), &TypeArgs::Literal(body.to_string()));
    }

    #[test]
    fn literal_with_bracket_string_inside_union() {
        let t = parse_type("Literal[']'] | list[int]").unwrap();
        let names: Vec<&str> = match t.args() {
            TypeArgs::Types(args) => args.iter().map(|a| a.name()).collect(),
            other => panic!("expected union members, got {other:?}"),
        };
        assert_eq!(names, vec!["Literal", "list"]);
    }

    #[test]
    fn empty_literal_is_malformed() {
        let err = parse_type("Literal[]").unwrap_err();
        assert_eq!(err.kind(), TypeErrorKind::MalformedType);
    }

    #[test]
    fn empty_argument_list() {
        let t = parse_type("tuple[ () ]").unwrap();
        assert_eq!(t.args(), &TypeArgs::Types(vec![]));
        assert!(!t.variadic());
    }

    #[test]
    fn whitespace_around_name_and_args() {
        let t = parse_type("  dict [ str ,  int ]  ").unwrap();
        assert_eq!(t.name(), "dict");
        assert_eq!(t.args(), &TypeArgs::Types(vec![named("str"), named("int")]));
    }

    #[test]
    fn unbalanced_open_reports_index() {
        let err = parse_type("A[(]").unwrap_err();
        assert_eq!(
            err.root(),
            &TypeError::UnbalancedBracket {
                bracket: ']',
                index: 3
            }
        );
    }

    #[test]
    fn unbalanced_close_reports_index() {
        let err = parse_type("A]").unwrap_err();
        assert_eq!(
            err.root(),
            &TypeError::UnbalancedBracket {
                bracket: ']',
                index: 1
            }
        );
    }

    #[rstest]
    #[case("A[B][C]", TypeErrorKind::MultipleBracketGroups)]
    #[case("A[B]extra", TypeErrorKind::TrailingText)]
    #[case("[B]", TypeErrorKind::EmptyTypeName)]
    #[case("A[..., B]", TypeErrorKind::EllipsisNotLast)]
    #[case("A[]", TypeErrorKind::EmptyTypeName)]
    #[case("A[B,]", TypeErrorKind::EmptyTypeName)]
    #[case("A[, B]", TypeErrorKind::EmptyTypeName)]
    #[case("A[(B)]", TypeErrorKind::MalformedType)]
    #[case("A[B[C]", TypeErrorKind::UnbalancedBracket)]
    fn grammar_violations(#[case] annotation: &str, #[case] kind: TypeErrorKind) {
        let err = parse_type(annotation).unwrap_err();
        assert_eq!(err.kind(), kind, "{annotation}: {err}");
        assert_eq!(err.annotation, annotation);
    }

    #[test]
    fn nested_failure_keeps_enclosing_windows() {
        let annotation = "dict[str, list[A[B]x]]";
        let err = parse_type(annotation).unwrap_err();
        assert_eq!(err.kind(), TypeErrorKind::TrailingText);
        let root_window = err.root().window().unwrap();
        assert_eq!(root_window.text, "A[B]x");
        let contexts: Vec<&str> = err
            .source
            .contexts()
            .iter()
            .map(|w| w.text.as_str())
            .collect();
        assert_eq!(contexts, vec!["list[A[B]x]"]);
        let message = err.to_string();
        assert!(message.contains(annotation), "got: {message}");
        assert!(message.contains("A[B]x"), "got: {message}");
    }

    #[test]
    fn ellipsis_error_reports_argument_window() {
        let err = parse_type("Callable[..., int, ...]").unwrap_err();
        assert_eq!(err.kind(), TypeErrorKind::EllipsisNotLast);
        assert_eq!(err.root().window().unwrap().text, "..., int, ...");
    }
}
