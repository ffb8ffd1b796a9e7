use std::fmt;

use typeref_common::{Diagnostic, Span};

use crate::literal::LiteralError;

/// A window of the annotation being parsed when an error was detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub span: Span,
    pub text: String,
}

impl Window {
    pub fn new(annotation: &str, start: usize, stop: usize) -> Self {
        let span = Span::new(start, stop);
        Self {
            span,
            text: span.slice(annotation).to_string(),
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "start = {}, stop = {}, text = {:?}",
            self.span.start, self.span.stop, self.text
        )
    }
}

/// Invariant violations detected when building a [`crate::ParsedType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MalformedType {
    #[error(
        "round brackets in type annotations are only supported for empty type argument lists, \
         in the form TypeName[()]"
    )]
    RoundBrackets,

    #[error("Literal type must include at least one value")]
    EmptyLiteral,

    #[error("only type argument lists can be variadic")]
    VariadicWithoutArgs,
}

/// Errors raised while parsing a type annotation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("unbalanced '{bracket}' at index {index}")]
    UnbalancedBracket { bracket: char, index: usize },

    #[error(
        "non-union type must take the form 'TypeName' or 'TypeName[Args]', \
         found multiple outer bracket pairs at {window}"
    )]
    MultipleBracketGroups { window: Window },

    #[error(
        "non-union type must take the form 'TypeName' or 'TypeName[Args]', \
         found text after bracket pair at {window}"
    )]
    TrailingText { window: Window },

    #[error("found empty type name at {window}")]
    EmptyTypeName { window: Window },

    #[error("ellipsis found in args, but not in last position, at {window}")]
    EllipsisNotLast { window: Window },

    #[error("malformed type at {window}: {reason}")]
    MalformedType {
        window: Window,
        reason: MalformedType,
    },

    #[error("type arguments nested deeper than {limit} levels at {window}")]
    TooDeep { window: Window, limit: usize },

    /// An inner failure, annotated with the window of an enclosing type.
    #[error("error parsing type at {window}")]
    Context {
        window: Window,
        #[source]
        source: Box<TypeError>,
    },
}

/// Fieldless discriminant of [`TypeError`], for matching on the failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeErrorKind {
    UnbalancedBracket,
    MultipleBracketGroups,
    TrailingText,
    EmptyTypeName,
    EllipsisNotLast,
    MalformedType,
    TooDeep,
    Context,
}

impl TypeError {
    pub fn kind(&self) -> TypeErrorKind {
        match self {
            TypeError::UnbalancedBracket { .. } => TypeErrorKind::UnbalancedBracket,
            TypeError::MultipleBracketGroups { .. } => TypeErrorKind::MultipleBracketGroups,
            TypeError::TrailingText { .. } => TypeErrorKind::TrailingText,
            TypeError::EmptyTypeName { .. } => TypeErrorKind::EmptyTypeName,
            TypeError::EllipsisNotLast { .. } => TypeErrorKind::EllipsisNotLast,
            TypeError::MalformedType { .. } => TypeErrorKind::MalformedType,
            TypeError::TooDeep { .. } => TypeErrorKind::TooDeep,
            TypeError::Context { .. } => TypeErrorKind::Context,
        }
    }

    /// The window this error is reported against, if any.
    pub fn window(&self) -> Option<&Window> {
        match self {
            TypeError::UnbalancedBracket { .. } => None,
            TypeError::MultipleBracketGroups { window }
            | TypeError::TrailingText { window }
            | TypeError::EmptyTypeName { window }
            | TypeError::EllipsisNotLast { window }
            | TypeError::MalformedType { window, .. }
            | TypeError::TooDeep { window, .. }
            | TypeError::Context { window, .. } => Some(window),
        }
    }

    /// The source span this error points at.
    pub fn span(&self) -> Span {
        match self {
            TypeError::UnbalancedBracket { index, .. } => Span::at(*index),
            _ => self.window().map(|w| w.span).unwrap_or_default(),
        }
    }

    /// Wrap this error with the window of an enclosing type.
    ///
    /// Windows identical to the one already reported are not repeated.
    pub fn within(self, window: Window) -> TypeError {
        if self.window() == Some(&window) {
            return self;
        }
        TypeError::Context {
            window,
            source: Box::new(self),
        }
    }

    /// The innermost error of a context chain.
    pub fn root(&self) -> &TypeError {
        let mut current = self;
        while let TypeError::Context { source, .. } = current {
            current = source;
        }
        current
    }

    /// Enclosing windows from the outermost to the innermost.
    pub fn contexts(&self) -> Vec<&Window> {
        let mut windows = Vec::new();
        let mut current = self;
        while let TypeError::Context { window, source } = current {
            windows.push(window);
            current = source;
        }
        windows
    }
}

/// A failed parse of a complete annotation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to parse type annotation {annotation:?}: {}", .source.root())]
pub struct ParseError {
    pub annotation: String,
    #[source]
    pub source: TypeError,
}

impl ParseError {
    pub fn root(&self) -> &TypeError {
        self.source.root()
    }

    /// Kind of the innermost failure.
    pub fn kind(&self) -> TypeErrorKind {
        self.root().kind()
    }

    /// Convert into a diagnostic over the annotation text: the primary span is the
    /// innermost failure, related spans are the enclosing windows.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let root = self.root();
        let mut diag = Diagnostic::error(root.to_string()).with_span(root.span());
        for window in self.source.contexts().into_iter().rev() {
            diag = diag.with_related(window.span, format!("while parsing {:?}", window.text));
        }
        if let TypeError::MalformedType {
            reason: MalformedType::RoundBrackets,
            ..
        } = root
        {
            diag = diag.with_help("write an empty argument list as TypeName[()]");
        }
        diag
    }
}

/// Errors raised while rendering a parsed type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("invalid Literal arguments {body:?}: {source}")]
    LiteralEval {
        body: String,
        #[source]
        source: LiteralError,
    },
}

/// Any failure of the parse/render pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_skips_identical_window() {
        let window = Window::new("A[B]x", 0, 5);
        let err = TypeError::TrailingText {
            window: window.clone(),
        };
        assert_eq!(err.clone().within(window), err);
    }

    #[test]
    fn root_and_contexts_walk_the_chain() {
        let annotation = "A[B, C[D]x]";
        let inner = TypeError::TrailingText {
            window: Window::new(annotation, 5, 10),
        };
        let err = inner
            .clone()
            .within(Window::new(annotation, 2, 10))
            .within(Window::new(annotation, 0, 11));
        assert_eq!(err.root(), &inner);
        assert_eq!(err.kind(), TypeErrorKind::Context);
        let spans: Vec<Span> = err.contexts().iter().map(|w| w.span).collect();
        assert_eq!(spans, vec![Span::new(0, 11), Span::new(2, 10)]);
    }

    #[test]
    fn parse_error_display_shows_annotation_and_root() {
        let err = ParseError {
            annotation: "A]".to_string(),
            source: TypeError::UnbalancedBracket {
                bracket: ']',
                index: 1,
            },
        };
        assert_eq!(
            err.to_string(),
            "failed to parse type annotation \"A]\": unbalanced ']' at index 1"
        );
    }

    #[test]
    fn diagnostic_points_at_innermost_span() {
        let annotation = "list[A[B]x]";
        let err = ParseError {
            annotation: annotation.to_string(),
            source: TypeError::TrailingText {
                window: Window::new(annotation, 5, 10),
            }
            .within(Window::new(annotation, 0, 11)),
        };
        let diag = err.to_diagnostic();
        assert_eq!(diag.span, Some(Span::new(5, 10)));
        assert_eq!(diag.related.len(), 1);
        assert_eq!(diag.related[0].span, Span::new(0, 11));
    }
}
