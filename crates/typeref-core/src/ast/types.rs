use serde::Serialize;

use crate::error::MalformedType;
use crate::literal::str_repr;

/// Synthetic head name given to union nodes by the parser.
pub const UNION_NAME: &str = "UnionType";

/// Head names rendered with infix `|` notation.
pub const UNION_NAMES: [&str; 2] = [UNION_NAME, "types.UnionType"];

/// Head names whose arguments are kept as raw literal text.
pub const LITERAL_NAMES: [&str; 2] = ["Literal", "typing.Literal"];

/// Type arguments of a [`ParsedType`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TypeArgs {
    /// Bare name, no brackets.
    None,
    /// Raw body of a `Literal[...]` annotation, never parsed as types.
    Literal(String),
    /// Parsed sub-arguments. Empty for the `TypeName[()]` form.
    Types(Vec<ParsedType>),
}

impl TypeArgs {
    pub fn is_none(&self) -> bool {
        matches!(self, TypeArgs::None)
    }
}

/// A node of a parsed type-expression tree.
///
/// Nodes are validated on construction and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ParsedType {
    name: String,
    args: TypeArgs,
    variadic: bool,
}

impl ParsedType {
    pub fn new(
        name: impl Into<String>,
        args: TypeArgs,
        variadic: bool,
    ) -> Result<Self, MalformedType> {
        let name = name.into();
        if name.contains('(') || name.contains(')') {
            return Err(MalformedType::RoundBrackets);
        }
        if variadic && !matches!(args, TypeArgs::Types(_)) {
            return Err(MalformedType::VariadicWithoutArgs);
        }
        if matches!(&args, TypeArgs::Literal(body) if body.is_empty()) {
            return Err(MalformedType::EmptyLiteral);
        }
        Ok(Self {
            name,
            args,
            variadic,
        })
    }

    /// A bare name without arguments.
    pub fn named(name: impl Into<String>) -> Result<Self, MalformedType> {
        Self::new(name, TypeArgs::None, false)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &TypeArgs {
        &self.args
    }

    pub fn variadic(&self) -> bool {
        self.variadic
    }

    pub fn is_union(&self) -> bool {
        UNION_NAMES.contains(&self.name.as_str())
    }

    /// Structured multi-line representation of the tree.
    pub fn pretty(&self) -> String {
        let mut lines = Vec::new();
        self.pretty_lines(0, &mut lines);
        lines.join("\n")
    }

    fn pretty_lines(&self, level: usize, lines: &mut Vec<String>) {
        let indent = "  ".repeat(level);
        let next_indent = "  ".repeat(level + 1);
        let args = match &self.args {
            TypeArgs::None => {
                lines.push(format!("{indent}ParsedType({})", str_repr(&self.name)));
                return;
            }
            args => args,
        };
        lines.push(format!("{indent}ParsedType("));
        lines.push(format!("{next_indent}name = {},", str_repr(&self.name)));
        match args {
            TypeArgs::Literal(body) => {
                lines.push(format!("{next_indent}args = {}", str_repr(body)));
            }
            TypeArgs::Types(types) if types.is_empty() => {
                lines.push(format!("{next_indent}args = ()"));
            }
            TypeArgs::Types(types) => {
                lines.push(format!("{next_indent}args = ("));
                for (i, arg) in types.iter().enumerate() {
                    arg.pretty_lines(level + 2, lines);
                    // One-element tuples keep their trailing comma.
                    if i + 1 < types.len() || types.len() == 1 {
                        if let Some(last) = lines.last_mut() {
                            last.push(',');
                        }
                    }
                }
                lines.push(format!("{next_indent})"));
            }
            TypeArgs::None => {}
        }
        if self.variadic {
            if let Some(last) = lines.last_mut() {
                last.push(',');
            }
            lines.push(format!("{next_indent}variadic = True"));
        }
        lines.push(format!("{indent})"));
    }
}

impl std::fmt::Display for ParsedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.args {
            TypeArgs::None => write!(f, "{}", self.name),
            TypeArgs::Literal(body) => write!(f, "{}[{}]", self.name, body),
            TypeArgs::Types(types) if self.is_union() => {
                for (i, arg) in types.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                Ok(())
            }
            TypeArgs::Types(types) if types.is_empty() => write!(f, "{}[()]", self.name),
            TypeArgs::Types(types) => {
                write!(f, "{}[", self.name)?;
                for (i, arg) in types.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                if self.variadic {
                    write!(f, ", ...")?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> ParsedType {
        ParsedType::named(name).unwrap()
    }

    #[test]
    fn rejects_round_brackets_in_name() {
        assert_eq!(
            ParsedType::named("f()"),
            Err(MalformedType::RoundBrackets)
        );
    }

    #[test]
    fn rejects_variadic_without_sequence() {
        assert_eq!(
            ParsedType::new("Tuple", TypeArgs::None, true),
            Err(MalformedType::VariadicWithoutArgs)
        );
        assert_eq!(
            ParsedType::new("Literal", TypeArgs::Literal("1".into()), true),
            Err(MalformedType::VariadicWithoutArgs)
        );
    }

    #[test]
    fn rejects_empty_literal_body() {
        assert_eq!(
            ParsedType::new("Literal", TypeArgs::Literal(String::new()), false),
            Err(MalformedType::EmptyLiteral)
        );
    }

    #[test]
    fn pretty_bare_name() {
        assert_eq!(named("int").pretty(), "ParsedType('int')");
    }

    #[test]
    fn pretty_nested_variadic() {
        let t = ParsedType::new("Tuple", TypeArgs::Types(vec![named("int")]), true).unwrap();
        let expected = "\
ParsedType(
  name = 'Tuple',
  args = (
    ParsedType('int'),
  ),
  variadic = True
)";
        assert_eq!(t.pretty(), expected);
    }

    #[test]
    fn pretty_multiple_args_and_literal() {
        let lit = ParsedType::new("Literal", TypeArgs::Literal("1, 2".into()), false).unwrap();
        let t = ParsedType::new("dict", TypeArgs::Types(vec![named("str"), lit]), false).unwrap();
        let expected = "\
ParsedType(
  name = 'dict',
  args = (
    ParsedType('str'),
    ParsedType(
      name = 'Literal',
      args = '1, 2'
    )
  )
)";
        assert_eq!(t.pretty(), expected);
    }

    #[test]
    fn pretty_empty_args() {
        let t = ParsedType::new("tuple", TypeArgs::Types(vec![]), false).unwrap();
        assert_eq!(t.pretty(), "ParsedType(\n  name = 'tuple',\n  args = ()\n)");
    }

    #[test]
    fn display_normalizes_spacing() {
        let union = ParsedType::new(
            UNION_NAME,
            TypeArgs::Types(vec![named("int"), named("None")]),
            false,
        )
        .unwrap();
        let t = ParsedType::new("list", TypeArgs::Types(vec![union]), true).unwrap();
        assert_eq!(t.to_string(), "list[int | None, ...]");
    }
}
