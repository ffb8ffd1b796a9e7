use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// File name searched for by [`find_manifest`].
pub const MANIFEST_FILE: &str = "Typeref.toml";

/// What a short name resolves to in the documented scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Module,
    Property,
    Class,
    Function,
    Other,
}

/// The parsed Typeref.toml manifest.
#[derive(Debug, Clone)]
pub struct TyperefManifest {
    pub symbols: HashMap<String, SymbolKind>,
    pub aliases: HashMap<String, String>,
    pub render: RenderSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderSection {
    /// Names that never receive the class role, even when declared as classes.
    #[serde(default = "default_any_names")]
    pub any_names: Vec<String>,
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            any_names: default_any_names(),
        }
    }
}

fn default_any_names() -> Vec<String> {
    vec!["Any".to_string(), "typing.Any".to_string()]
}

/// Raw TOML structure for deserialization.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    #[serde(default)]
    symbols: HashMap<String, SymbolKind>,
    #[serde(default)]
    aliases: HashMap<String, String>,
    #[serde(default)]
    render: RenderSection,
}

/// Errors that can occur when loading a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("no Typeref.toml found (searched from {0})")]
    NotFound(String),
    #[error("failed to read Typeref.toml: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("invalid Typeref.toml: {0}")]
    ParseError(String),
    #[error("invalid Typeref.toml: empty name in [{0}]")]
    EmptyName(&'static str),
    #[error("invalid Typeref.toml: alias '{0}' has target '{1}' which is not a dotted name")]
    InvalidAliasTarget(String, String),
}

/// Walk up from `start_dir` looking for `Typeref.toml`.
/// Returns the path to the manifest file if found.
pub fn find_manifest(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    loop {
        let candidate = current.join(MANIFEST_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load and validate a Typeref.toml manifest from a file path.
pub fn load_manifest(path: &Path) -> Result<TyperefManifest, ManifestError> {
    let content = std::fs::read_to_string(path)?;
    parse_manifest(&content)
}

/// Parse and validate a Typeref.toml manifest from a string.
pub fn parse_manifest(content: &str) -> Result<TyperefManifest, ManifestError> {
    let raw: RawManifest =
        toml::from_str(content).map_err(|e| ManifestError::ParseError(e.to_string()))?;

    if raw.symbols.keys().any(|name| name.trim().is_empty()) {
        return Err(ManifestError::EmptyName("symbols"));
    }
    for (name, target) in &raw.aliases {
        if name.trim().is_empty() {
            return Err(ManifestError::EmptyName("aliases"));
        }
        if !is_dotted_name(target) {
            return Err(ManifestError::InvalidAliasTarget(
                name.clone(),
                target.clone(),
            ));
        }
    }

    Ok(TyperefManifest {
        symbols: raw.symbols,
        aliases: raw.aliases,
        render: raw.render,
    })
}

/// Find and load the manifest starting from a directory (walks up).
pub fn find_and_load_manifest(start_dir: &Path) -> Result<TyperefManifest, ManifestError> {
    let manifest_path = find_manifest(start_dir)
        .ok_or_else(|| ManifestError::NotFound(start_dir.display().to_string()))?;
    load_manifest(&manifest_path)
}

fn is_dotted_name(s: &str) -> bool {
    !s.is_empty()
        && s.split('.').all(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(c) if c.is_alphabetic() || c == '_' => {
                    chars.all(|c| c.is_alphanumeric() || c == '_')
                }
                _ => false,
            }
        })
}
