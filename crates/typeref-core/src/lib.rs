pub mod ast;
pub mod docs;
pub mod error;
pub mod literal;
pub mod parser;
pub mod render;
pub mod symbols;

pub use ast::{ParsedType, TypeArgs};
pub use error::{Error, ParseError, RenderError, TypeError, TypeErrorKind};
pub use parser::parse_type;
pub use render::render;
pub use symbols::{Role, SymbolTable};

/// Parse an annotation and render it as a cross-reference in one step.
pub fn crossref(annotation: &str, symbols: &SymbolTable) -> Result<String, Error> {
    let parsed = parse_type(annotation)?;
    Ok(render(&parsed, symbols)?)
}
