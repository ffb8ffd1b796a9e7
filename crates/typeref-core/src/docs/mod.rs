//! Docstring helpers built on the parser and renderer: generated type lines for
//! signatures and attributes, and qualification of short cross-references.

pub mod qualify;
pub mod signature;

pub use qualify::Qualifier;
pub use signature::{document_attribute, document_signature, DocError, Param, ParamKind, Signature};
