pub mod errors;
pub mod manifest;
pub mod span;

pub use errors::{Diagnostic, RelatedSpan};
pub use manifest::{ManifestError, SymbolKind, TyperefManifest};
pub use span::Span;
