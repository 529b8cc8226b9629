use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// One decoded row: field name to scalar text.
///
/// Numbers and dates stay in their wire form (`"3"`, `"07/03/2025"`);
/// interpreting them is the entity mapper's job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GatewayRecord {
    fields: BTreeMap<String, String>,
}

impl GatewayRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Field value, or `""` when the row omitted it.
    #[must_use]
    pub fn text(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for GatewayRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Ordered field names; position `i` is what `f{i}` or `values["i"]` refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldLayout(Vec<String>);

impl FieldLayout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn name(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Layout taken as-is from gateway metadata. Repeated names keep every
    /// slot so later positions do not shift.
    pub(crate) fn from_metadata(names: Vec<String>) -> Self {
        Self(names)
    }

    /// Position of `name`, if present.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|f| f == name)
    }

    /// Append `name` and return its index. An existing name keeps its slot.
    pub fn push(&mut self, name: impl Into<String>) -> usize {
        let name = name.into();
        if let Some(index) = self.position(&name) {
            return index;
        }
        self.0.push(name);
        self.0.len() - 1
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.0.iter().map(String::as_str).enumerate()
    }

    /// Comma-separated list for the `fieldset.list` query member.
    #[must_use]
    pub fn to_fieldset(&self) -> String {
        self.0.join(", ")
    }
}

impl<S: Into<String>> FromIterator<S> for FieldLayout {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut layout = Self::new();
        for name in iter {
            layout.push(name);
        }
        layout
    }
}

/// Sparse index to value map, serialized as `{"0": "...", "3": "..."}`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PositionalValues(BTreeMap<usize, String>);

impl PositionalValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, index: usize, value: impl Into<String>) {
        self.0.insert(index, value.into());
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(&index).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for PositionalValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

impl Serialize for PositionalValues {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Keys are stringified indices; serde_json turns integer map keys into
        // strings, other formats may not.
        serializer.collect_map(self.0.iter().map(|(i, v)| (i.to_string(), v)))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn layout_keeps_first_slot_for_duplicates() {
        let mut layout = FieldLayout::new();
        assert_eq!(layout.push("NOME"), 0);
        assert_eq!(layout.push("COR"), 1);
        assert_eq!(layout.push("NOME"), 0);
        assert_eq!(layout.len(), 2);
        assert_eq!(layout.to_fieldset(), "NOME, COR");
    }

    #[test]
    fn metadata_layout_keeps_repeated_names() {
        let layout = FieldLayout::from_metadata(vec!["NOME".into(), "COR".into(), "NOME".into()]);
        assert_eq!(layout.len(), 3);
        assert_eq!(layout.name(2), Some("NOME"));
    }

    #[test]
    fn positional_values_use_string_keys() {
        let mut values = PositionalValues::new();
        values.set(10, "x");
        values.set(2, "y");
        let json = serde_json::to_value(&values).unwrap();
        assert_eq!(json, json!({"2": "y", "10": "x"}));
    }

    #[test]
    fn record_text_defaults_to_empty() {
        let record: GatewayRecord = [("NOME", "Vendas")].into_iter().collect();
        assert_eq!(record.text("NOME"), "Vendas");
        assert_eq!(record.text("COR"), "");
        assert!(!record.contains("COR"));
    }
}
