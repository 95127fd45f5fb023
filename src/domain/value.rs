use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// Opaque identity used for targeting elements and for naming validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(Arc<str>);

impl Key {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(Arc::from(raw.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl From<&String> for Key {
    fn from(value: &String) -> Self {
        Self::new(value)
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Error-key to message mapping, in the order the state reported them.
pub type ErrorMap = IndexMap<Key, String>;

/// Membership structure built once per targeted cascade call.
pub type KeySet = HashSet<Key>;

pub fn key_set<I, K>(keys: I) -> KeySet
where
    I: IntoIterator<Item = K>,
    K: Into<Key>,
{
    keys.into_iter().map(Into::into).collect()
}

/// Result of one validation cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ErrorReport {
    pub all: ErrorMap,
    pub unbound: ErrorMap,
}

impl ErrorReport {
    pub fn partition(all: ErrorMap, bound: &KeySet) -> Self {
        let unbound = all
            .iter()
            .filter(|(key, _)| !bound.contains(*key))
            .map(|(key, message)| (key.clone(), message.clone()))
            .collect();
        Self { all, unbound }
    }

    pub fn is_clean(&self) -> bool {
        self.all.is_empty()
    }
}

/// Dynamic value representation every editor works on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DialogValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    List(Vec<DialogValue>),
    /// Enum or flag set, carried as its unsigned representation.
    Enum(u64),
    Type(Option<String>),
    Reference(Option<u64>),
    Struct(IndexMap<String, DialogValue>),
}

impl DialogValue {
    pub fn as_bits(&self) -> Option<u64> {
        match self {
            DialogValue::Enum(bits) | DialogValue::UInt(bits) => Some(*bits),
            DialogValue::Int(value) => u64::try_from(*value).ok(),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DialogValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&DialogValue> {
        match self {
            DialogValue::Struct(fields) => fields.get(name),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            DialogValue::Bool(_) => "bool",
            DialogValue::Int(_) => "int",
            DialogValue::UInt(_) => "uint",
            DialogValue::Float(_) => "float",
            DialogValue::Text(_) => "text",
            DialogValue::List(_) => "list",
            DialogValue::Enum(_) => "enum",
            DialogValue::Type(_) => "type",
            DialogValue::Reference(_) => "reference",
            DialogValue::Struct(_) => "struct",
        }
    }
}

impl fmt::Display for DialogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialogValue::Bool(value) => write!(f, "{value}"),
            DialogValue::Int(value) => write!(f, "{value}"),
            DialogValue::UInt(value) => write!(f, "{value}"),
            DialogValue::Float(value) => write!(f, "{value}"),
            DialogValue::Text(text) => f.write_str(text),
            DialogValue::List(items) => {
                f.write_str("[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            DialogValue::Enum(bits) => write!(f, "#{bits}"),
            DialogValue::Type(name) => f.write_str(name.as_deref().unwrap_or("<none>")),
            DialogValue::Reference(target) => match target {
                Some(id) => write!(f, "@{id}"),
                None => f.write_str("<null>"),
            },
            DialogValue::Struct(fields) => {
                f.write_str("{")?;
                for (idx, (name, value)) in fields.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_removes_bound_keys_only() {
        let mut all = ErrorMap::new();
        all.insert(Key::from("text"), "Missing text".to_string());
        all.insert(Key::from("special"), "lowercase".to_string());
        let report = ErrorReport::partition(all, &key_set(["text"]));
        assert_eq!(report.all.len(), 2);
        assert_eq!(report.unbound.len(), 1);
        assert_eq!(report.unbound.get(&Key::from("special")).map(String::as_str), Some("lowercase"));
    }

    #[test]
    fn struct_values_display_in_declaration_order() {
        let mut fields = IndexMap::new();
        fields.insert("b".to_string(), DialogValue::Int(2));
        fields.insert("a".to_string(), DialogValue::Text("x".into()));
        assert_eq!(DialogValue::Struct(fields).to_string(), "{b: 2, a: x}");
    }
}
