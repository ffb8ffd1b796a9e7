//! Rendering of parsed types as reStructuredText cross-references.

use tracing::trace;

use crate::ast::{ParsedType, TypeArgs};
use crate::error::RenderError;
use crate::literal::parse_literal_tuple;
use crate::symbols::SymbolTable;

/// Render `node` as a cross-reference string, choosing roles from `symbols`.
///
/// Unknown names never fail and fall back to the generic `obj` role.
pub fn render(node: &ParsedType, symbols: &SymbolTable) -> Result<String, RenderError> {
    Renderer::new(symbols).render(node)
}

/// Walks a [`ParsedType`] tree against a symbol table.
pub struct Renderer<'a> {
    symbols: &'a SymbolTable,
}

impl<'a> Renderer<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self { symbols }
    }

    /// The role-qualified reference to a single name.
    pub fn name_ref(&self, name: &str) -> String {
        format!(":{}:`{}`", self.symbols.role_of(name), name)
    }

    pub fn render(&self, node: &ParsedType) -> Result<String, RenderError> {
        trace!(name = node.name(), "render type");
        let name_ref = self.name_ref(node.name());
        let mut args = match node.args() {
            TypeArgs::None => return Ok(name_ref),
            TypeArgs::Types(types) if node.is_union() => {
                let members = types
                    .iter()
                    .map(|t| self.render(t))
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(members.join(" | "));
            }
            TypeArgs::Literal(body) => {
                let values = parse_literal_tuple(body).map_err(|source| RenderError::LiteralEval {
                    body: body.clone(),
                    source,
                })?;
                values
                    .iter()
                    .map(|v| format!("``{}``", v.repr()))
                    .collect::<Vec<_>>()
                    .join(", ")
            }
            TypeArgs::Types(types) if types.is_empty() => "()".to_string(),
            TypeArgs::Types(types) => types
                .iter()
                .map(|t| self.render(t))
                .collect::<Result<Vec<_>, _>>()?
                .join(", "),
        };
        if node.variadic() {
            args.push_str(", ...");
        }
        // The escaped space keeps the bracket glued to the reference in reST.
        Ok(format!("{name_ref}\\ [{args}]"))
    }
}
