pub mod types;

pub use types::{ParsedType, TypeArgs, LITERAL_NAMES, UNION_NAME, UNION_NAMES};
