//! address model
//!
//! An [Address] is a [ModulePath] (outer-most module first) followed by a [ResourceSpec].
//! Every type renders its canonical text form through [std::fmt::Display]:
//!
//! | **text**                           | **type**       |
//! |------------------------------------|----------------|
//! | `module.a["x"]`                    | [Module]       |
//! | `module.a["x"].module.b`           | [ModulePath]   |
//! | `data.foo.bar[0]`                  | [ResourceSpec] |
//! | `module.a["x"].module.b.foo.bar[0]`| [Address]      |
//!
//! Parsing the rendered text of an address yields an equal address.
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter, Write};
use std::ops::{Deref, DerefMut};

/// A parsed resource address
///
/// Plain data. Derive a modified address by cloning it and changing the clone:
/// ```
/// let original: tfaddr::Address = "module.a[0].foo.bar".parse().unwrap();
///
/// let mut renamed = original.clone();
/// renamed.resource.name = "baz".to_string();
/// renamed.module_path[0].index = tfaddr::Index::String("x".to_string());
///
/// assert_eq!(renamed.to_string(), r#"module.a["x"].foo.baz"#);
/// assert_eq!(original.to_string(), "module.a[0].foo.bar");
/// ```
#[derive(derive_new::new, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    pub module_path: ModulePath,
    pub resource: ResourceSpec,
}

impl Address {
    pub fn is_data(&self) -> bool {
        self.resource.mode == ResourceMode::Data
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if !self.module_path.is_root() {
            write!(f, "{}.", self.module_path)?;
        }
        self.resource.fmt(f)
    }
}

impl std::str::FromStr for Address {
    type Err = crate::SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse(s)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Modules enclosing a resource, outer-most first
///
/// An empty path is the root module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ModulePath(Vec<Module>);

impl ModulePath {
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl Deref for ModulePath {
    type Target = Vec<Module>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ModulePath {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<Module>> for ModulePath {
    fn from(value: Vec<Module>) -> Self {
        Self(value)
    }
}

impl FromIterator<Module> for ModulePath {
    fn from_iter<T: IntoIterator<Item = Module>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Display for ModulePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (position, module) in self.0.iter().enumerate() {
            if position > 0 {
                f.write_char('.')?;
            }
            module.fmt(f)?;
        }
        Ok(())
    }
}

/// One level of module nesting: `module.<name>[<index>]`
#[derive(derive_new::new, Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Module {
    pub name: String,
    #[new(default)]
    pub index: Index,
}

impl Module {
    pub fn indexed(name: String, index: Index) -> Self {
        Self { name, index }
    }
}

impl Display for Module {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "module.{}{}", self.name, self.index)
    }
}

/// Terminal resource of an address: `[data.]<type>.<name>[<index>]`
#[derive(derive_new::new, Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResourceSpec {
    pub mode: ResourceMode,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    #[new(default)]
    pub index: Index,
}

impl Display for ResourceSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.mode == ResourceMode::Data {
            f.write_str("data.")?;
        }
        write!(f, "{}.{}{}", self.resource_type, self.name, self.index)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceMode {
    #[default]
    Managed,
    /// Read-only resource, written with a leading `data.`
    Data,
}

impl Display for ResourceMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceMode::Managed => f.write_str("managed"),
            ResourceMode::Data => f.write_str("data"),
        }
    }
}

/// Instance key of a module or resource
///
/// Displays in its bracketed form, `[0]` or `["key"]`. [Index::Absent] displays as nothing.
///
/// Only the value is kept, not how it was written: `[007]`, `[-0]` and `["\a"]` parse fine but
/// display as `[7]`, `[0]` and `["a"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Index {
    #[default]
    Absent,
    Int(i64),
    String(String),
}

impl Index {
    pub fn is_absent(&self) -> bool {
        matches!(self, Index::Absent)
    }
}

impl Display for Index {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Index::Absent => Ok(()),
            Index::Int(value) => write!(f, "[{value}]"),
            Index::String(value) => {
                f.write_char('[')?;
                write_quoted(f, value)?;
                f.write_char(']')
            }
        }
    }
}

/// Parses the payload between the brackets: `0`, `-1` or `"key"`
///
/// An empty string is [Index::Absent].
impl std::str::FromStr for Index {
    type Err = crate::SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parser::parse_index_payload(s)
    }
}

impl Serialize for Index {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Index::Absent => serializer.serialize_none(),
            Index::Int(value) => serializer.serialize_i64(*value),
            Index::String(value) => serializer.serialize_str(value),
        }
    }
}

/// Writes `value` in double quotes, escaping `"` and `\` with a backslash
///
/// Everything else, including control characters and non-ascii text, is written as is.
fn write_quoted(f: &mut impl Write, value: &str) -> std::fmt::Result {
    f.write_char('"')?;
    for c in value.chars() {
        if c == '"' || c == '\\' {
            f.write_char('\\')?;
        }
        f.write_char(c)?;
    }
    f.write_char('"')
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn address() -> Address {
        Address::new(
            vec![
                Module::indexed("a".into(), Index::String("xyz".into())),
                Module::new("b".into()),
            ]
            .into(),
            ResourceSpec::new(ResourceMode::Managed, "foo".into(), "bar".into()),
        )
    }

    #[test]
    fn render() {
        assert_eq!(address().to_string(), r#"module.a["xyz"].module.b.foo.bar"#);
    }

    #[test]
    fn render_root_module() {
        let mut address = address();
        address.module_path.clear();
        address.resource.mode = ResourceMode::Data;
        address.resource.index = Index::Int(-3);

        assert_eq!(address.module_path.to_string(), "");
        assert_eq!(address.to_string(), "data.foo.bar[-3]");
    }

    #[test]
    fn render_escaped_string_index() {
        let index = Index::String(r#"a"b\c"#.into());
        assert_eq!(index.to_string(), r#"["a\"b\\c"]"#);
        assert_eq!(Index::String("ÔA\n".into()).to_string(), "[\"ÔA\n\"]");
        assert_eq!(Index::Absent.to_string(), "");
    }

    #[test]
    fn clone_is_independent() {
        let original = address();
        let mut clone = original.clone();

        clone.module_path[0] = Module::new("c".into());
        clone.module_path[1].index = Index::String("abc".into());
        clone.resource.name = "baz".into();
        clone.resource.index = Index::Int(1);

        assert_eq!(clone.to_string(), r#"module.c.module.b["abc"].foo.baz[1]"#);
        assert_eq!(original, address());
    }

    #[test]
    fn serialize_structure() {
        let value = serde_json::to_value(&address().module_path).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                { "name": "a", "index": "xyz" },
                { "name": "b", "index": null },
            ])
        );

        let value = serde_json::to_value(&address().resource).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "mode": "managed", "type": "foo", "name": "bar", "index": null })
        );
    }

    #[test]
    fn serde_as_string() {
        let json = serde_json::to_string(&address()).unwrap();
        assert_eq!(json, r#""module.a[\"xyz\"].module.b.foo.bar""#);

        let parsed: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, address());

        let error = serde_json::from_str::<Address>(r#""module.foo.bar""#).unwrap_err();
        assert!(error.to_string().contains("syntax error"));
    }
}
