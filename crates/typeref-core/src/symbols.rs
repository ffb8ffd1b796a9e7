use std::collections::HashMap;
use std::fmt;

pub use typeref_common::SymbolKind;
use typeref_common::TyperefManifest;

/// Cross-reference role used when rendering a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Mod,
    Attr,
    Class,
    Func,
    Obj,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Mod => "mod",
            Role::Attr => "attr",
            Role::Class => "class",
            Role::Func => "func",
            Role::Obj => "obj",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only mapping from short names to what they resolve to in the
/// documented scope. Only used to pick display roles.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: HashMap<String, SymbolKind>,
    any_names: Vec<String>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            symbols: HashMap::new(),
            any_names: vec!["Any".to_string(), "typing.Any".to_string()],
        }
    }

    pub fn from_manifest(manifest: &TyperefManifest) -> Self {
        Self {
            symbols: manifest.symbols.clone(),
            any_names: manifest.render.any_names.clone(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, kind: SymbolKind) -> Self {
        self.insert(name, kind);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, kind: SymbolKind) {
        self.symbols.insert(name.into(), kind);
    }

    pub fn get(&self, name: &str) -> Option<SymbolKind> {
        self.symbols.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Role for `name`: unknown names and the "any" placeholder get [`Role::Obj`].
    pub fn role_of(&self, name: &str) -> Role {
        match self.get(name) {
            Some(SymbolKind::Module) => Role::Mod,
            Some(SymbolKind::Property) => Role::Attr,
            Some(SymbolKind::Class) if !self.any_names.iter().any(|n| n == name) => Role::Class,
            Some(SymbolKind::Function) => Role::Func,
            _ => Role::Obj,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_by_kind() {
        let table = SymbolTable::new()
            .with("os", SymbolKind::Module)
            .with("size", SymbolKind::Property)
            .with("Path", SymbolKind::Class)
            .with("helper", SymbolKind::Function)
            .with("CONST", SymbolKind::Other);
        assert_eq!(table.role_of("os"), Role::Mod);
        assert_eq!(table.role_of("size"), Role::Attr);
        assert_eq!(table.role_of("Path"), Role::Class);
        assert_eq!(table.role_of("helper"), Role::Func);
        assert_eq!(table.role_of("CONST"), Role::Obj);
        assert_eq!(table.role_of("missing"), Role::Obj);
    }

    #[test]
    fn any_is_never_a_class() {
        let table = SymbolTable::new()
            .with("Any", SymbolKind::Class)
            .with("typing.Any", SymbolKind::Class);
        assert_eq!(table.role_of("Any"), Role::Obj);
        assert_eq!(table.role_of("typing.Any"), Role::Obj);
    }

    #[test]
    fn from_manifest_uses_configured_any_names() {
        let toml = r#"
[symbols]
Any = "class"
Object = "class"

[render]
any_names = ["Object"]
"#;
        let manifest = typeref_common::manifest::parse_manifest(toml).unwrap();
        let table = SymbolTable::from_manifest(&manifest);
        assert_eq!(table.len(), 2);
        assert_eq!(table.role_of("Any"), Role::Class);
        assert_eq!(table.role_of("Object"), Role::Obj);
    }
}
