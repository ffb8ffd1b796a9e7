use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::crossref;
use crate::symbols::SymbolTable;

/// How a parameter binds its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    #[default]
    Positional,
    VarPositional,
    VarKeyword,
}

/// A documented function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Param {
    pub name: String,
    /// Type annotation text, if annotated.
    #[serde(default)]
    pub annotation: Option<String>,
    #[serde(default)]
    pub kind: ParamKind,
    /// Display form of the default value.
    #[serde(default)]
    pub default: Option<String>,
}

impl Param {
    pub fn new(name: impl Into<String>, annotation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: Some(annotation.into()),
            kind: ParamKind::Positional,
            default: None,
        }
    }

    pub fn with_kind(mut self, kind: ParamKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    fn extra_info(&self) -> Option<String> {
        match (self.kind, &self.default) {
            (ParamKind::VarPositional, _) => Some("variadic positional".to_string()),
            (ParamKind::VarKeyword, _) => Some("variadic keyword".to_string()),
            (ParamKind::Positional, Some(default)) => Some(format!("default = ``{default}``")),
            (ParamKind::Positional, None) => None,
        }
    }
}

/// A documented function signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub params: Vec<Param>,
    /// Return annotation text, if annotated.
    #[serde(default)]
    pub returns: Option<String>,
}

impl Signature {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Error)]
pub enum DocError {
    #[error("parameter '{param}': {source}")]
    Param {
        param: String,
        #[source]
        source: crate::Error,
    },

    #[error("return annotation: {0}")]
    Return(#[source] crate::Error),

    #[error("attribute annotation: {0}")]
    Attribute(#[source] crate::Error),
}

/// Append `:param:`, `:type:` and `:rtype:` lines for a signature.
///
/// Fields already documented in `lines` are left alone. Nothing is appended
/// if any annotation fails to parse or render.
pub fn document_signature(
    signature: &Signature,
    symbols: &SymbolTable,
    lines: &mut Vec<String>,
) -> Result<(), DocError> {
    let doc = lines.join("\n");
    let mut additions = vec![String::new()];
    for param in &signature.params {
        let Some(annotation) = &param.annotation else {
            continue;
        };
        let xref = crossref(annotation, symbols).map_err(|source| DocError::Param {
            param: param.name.clone(),
            source,
        })?;
        let type_line = match param.extra_info() {
            Some(extra) => format!(":type {}: {}; {}", param.name, xref, extra),
            None => format!(":type {}: {}", param.name, xref),
        };
        if !doc.contains(&format!(":param {}:", param.name)) {
            additions.push(format!(":param {}:", param.name));
        }
        if !doc.contains(&format!(":type {}:", param.name)) {
            additions.push(type_line);
        }
    }
    if let Some(returns) = &signature.returns {
        let xref = crossref(returns, symbols).map_err(DocError::Return)?;
        if !doc.contains(":rtype:") {
            additions.push(format!(":rtype: {xref}"));
        }
    }
    debug!(added = additions.len() - 1, "documented signature");
    lines.extend(additions);
    Ok(())
}

/// Append an `:rtype:` line for an attribute's type annotation, unless one exists.
pub fn document_attribute(
    annotation: &str,
    symbols: &SymbolTable,
    lines: &mut Vec<String>,
) -> Result<(), DocError> {
    let xref = crossref(annotation, symbols).map_err(DocError::Attribute)?;
    if !lines.iter().any(|line| line.contains(":rtype:")) {
        lines.push(format!(":rtype: {xref}"));
    }
    Ok(())
}
