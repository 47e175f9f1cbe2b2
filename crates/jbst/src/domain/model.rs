//! Domain models for binding descriptors and rendered output.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::errors::BindingError;
use crate::domain::identifier::ensure_valid_identifier;

/// Where the binding statement ends up once rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum ScriptPlacement {
    /// A `<script>` block written directly after the container.
    #[default]
    Inline,
    /// Handed to a page-level startup script registry.
    Deferred,
}

impl ScriptPlacement {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptPlacement::Inline => "inline",
            ScriptPlacement::Deferred => "deferred",
        }
    }
}

impl fmt::Display for ScriptPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScriptPlacement {
    type Err = PlacementParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "inline" => Ok(ScriptPlacement::Inline),
            "deferred" | "startup" | "registered" => Ok(ScriptPlacement::Deferred),
            other => Err(PlacementParseError::UnknownPlacement(other.to_string())),
        }
    }
}

/// Error returned when parsing a [`ScriptPlacement`] fails.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum PlacementParseError {
    #[error("unknown script placement '{0}'")]
    UnknownPlacement(String),
}

/// Named values emitted as script variables alongside a binding.
///
/// Keys keep their insertion order; re-inserting a key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataItems {
    entries: Vec<(String, Value)>,
}

impl DataItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value under a (possibly dotted) script variable name.
    pub fn insert(&mut self, key: &str, value: Value) -> Result<(), BindingError> {
        let key = ensure_valid_identifier(key, true)?;
        if key.is_empty() {
            return Err(BindingError::InvalidIdentifier(String::new()));
        }

        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

/// Everything needed to bind a named JBST template to data on the client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingDescriptor {
    name: String,
    pub data: Option<String>,
    pub inline_data: Option<Value>,
    index: Option<u64>,
    /// Overrides the renderer's pretty-print default when set.
    pub pretty: Option<bool>,
    pub data_items: DataItems,
}

impl BindingDescriptor {
    /// Create a descriptor for the template variable `name`.
    ///
    /// Malformed names are rejected immediately. An empty name is accepted here and reported
    /// as [`BindingError::EmptyName`] when rendering.
    pub fn new(name: &str) -> Result<Self, BindingError> {
        let mut descriptor = Self::default();
        descriptor.set_name(name)?;
        Ok(descriptor)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), BindingError> {
        self.name = ensure_valid_identifier(name, true)?;
        Ok(())
    }

    pub fn index(&self) -> Option<u64> {
        self.index
    }

    pub fn set_index(&mut self, index: Option<u64>) {
        self.index = index;
    }

    /// Set the index from a signed value; negative values clear it.
    pub fn set_signed_index(&mut self, index: i64) {
        self.index = u64::try_from(index).ok();
    }

    /// Raw script expression (literal or variable reference) used as the bound data.
    pub fn with_data(mut self, expression: impl Into<String>) -> Self {
        self.data = Some(expression.into());
        self
    }

    /// Serialize `value` and bind it inline; takes precedence over [`Self::with_data`].
    ///
    /// A value serializing to `null` counts as no inline data.
    pub fn with_inline_data<T: Serialize>(mut self, value: &T) -> Result<Self, BindingError> {
        self.inline_data = Some(serde_json::to_value(value)?).filter(|value| !value.is_null());
        Ok(self)
    }

    pub fn with_index(mut self, index: u64) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_signed_index(mut self, index: i64) -> Self {
        self.set_signed_index(index);
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = Some(pretty);
        self
    }

    pub fn with_item(mut self, key: &str, value: Value) -> Result<Self, BindingError> {
        self.data_items.insert(key, value)?;
        Ok(self)
    }
}

/// Output of a single render: container markup plus the binding statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBinding {
    /// Container fragment; includes the `<script>` block for inline placement.
    pub markup: String,
    /// Bare binding statement, e.g. `JsonFx.Bindings.replace("#id",Name,{});`.
    pub script: String,
    pub placement: ScriptPlacement,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn negative_signed_index_clears_value() {
        let descriptor = BindingDescriptor::new("Foo")
            .unwrap()
            .with_index(3)
            .with_signed_index(-1);
        assert_eq!(descriptor.index(), None);

        let descriptor = descriptor.with_signed_index(0);
        assert_eq!(descriptor.index(), Some(0));
    }

    #[test]
    fn null_inline_data_is_not_stored() -> Result<(), BindingError> {
        let descriptor = BindingDescriptor::new("Foo")?.with_inline_data(&None::<String>)?;
        assert_eq!(descriptor.inline_data, None);

        let descriptor = descriptor.with_inline_data(&Some(1))?;
        assert_eq!(descriptor.inline_data, Some(json!(1)));
        Ok(())
    }

    #[test]
    fn new_rejects_invalid_name_but_allows_empty() {
        assert!(BindingDescriptor::new("bad name").is_err());
        assert_eq!(BindingDescriptor::new("").unwrap().name(), "");
    }

    #[test]
    fn data_items_replace_in_place() -> Result<(), BindingError> {
        let mut items = DataItems::new();
        items.insert("App.first", json!(1))?;
        items.insert("second", json!(2))?;
        items.insert("App.first", json!(3))?;

        let keys: Vec<&str> = items.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, ["App.first", "second"]);
        assert_eq!(items.get("App.first"), Some(&json!(3)));
        Ok(())
    }

    #[test]
    fn data_items_reject_empty_and_invalid_keys() {
        let mut items = DataItems::new();
        assert!(items.insert("", json!(null)).is_err());
        assert!(items.insert("a b", json!(null)).is_err());
        assert!(items.is_empty());
    }

    #[test]
    fn placement_parses_aliases() {
        assert_eq!("Startup".parse::<ScriptPlacement>(), Ok(ScriptPlacement::Deferred));
        assert_eq!(" inline ".parse::<ScriptPlacement>(), Ok(ScriptPlacement::Inline));
        assert!("later".parse::<ScriptPlacement>().is_err());
    }
}
