use regex::{Captures, Regex};
use typeref_common::TyperefManifest;

/// Name pattern for the tail of a dotted reference such as `.attr.sub`.
const TAIL: &str = r"(\.[\.a-zA-Z0-9_]+)?";

struct Rule {
    name: String,
    fullname: String,
    /// `:role:`name``, `:role:`~name``, with an optional tail.
    simple: Regex,
    /// `:role:`label<name>``, with an optional tail.
    labelled: Regex,
}

impl Rule {
    fn new(name: String, fullname: String) -> Result<Self, regex::Error> {
        let escaped = regex::escape(&name);
        let simple = Regex::new(&format!(r":([a-z]+):`(~)?{escaped}{TAIL}`"))?;
        let labelled = Regex::new(&format!(r":([a-z]+):`([\.a-zA-Z0-9_]+)<{escaped}{TAIL}>`"))?;
        Ok(Self {
            name,
            fullname,
            simple,
            labelled,
        })
    }

    fn apply(&self, line: &str) -> String {
        let line = self.simple.replace_all(line, |caps: &Captures| {
            let role = &caps[1];
            let short = caps.get(2).is_some();
            match caps.get(3).map(|m| m.as_str()) {
                None => format!(":{role}:`~{}`", self.fullname),
                Some(tail) if short => format!(":{role}:`~{}{tail}`", self.fullname),
                Some(tail) => format!(":{role}:`{}{tail}<{}{tail}>`", self.name, self.fullname),
            }
        });
        self.labelled
            .replace_all(&line, |caps: &Captures| {
                let tail = caps.get(3).map_or("", |m| m.as_str());
                format!(":{}:`{}<{}{tail}>`", &caps[1], &caps[2], self.fullname)
            })
            .into_owned()
    }
}

/// Rewrites cross-references to short names into fully qualified ones.
pub struct Qualifier {
    rules: Vec<Rule>,
}

impl Qualifier {
    /// Build from `(short name, fully qualified name)` pairs. Rules apply in
    /// name order.
    pub fn new<I, K, V>(fullnames: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut pairs: Vec<(String, String)> = fullnames
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        pairs.sort();
        let rules = pairs
            .into_iter()
            .map(|(name, fullname)| Rule::new(name, fullname))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Qualify the type aliases declared in a manifest.
    pub fn from_manifest(manifest: &TyperefManifest) -> Result<Self, regex::Error> {
        Self::new(manifest.aliases.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn qualify(&self, line: &str) -> String {
        self.rules
            .iter()
            .fold(line.to_string(), |line, rule| rule.apply(&line))
    }

    pub fn qualify_lines(&self, lines: &mut [String]) {
        for line in lines.iter_mut() {
            *line = self.qualify(line);
        }
    }
}
