use serde::Deserialize;
use serde_json::Value;

use super::record::{FieldLayout, GatewayRecord};

/// `loadRecords` envelope (`responseBody.entities`).
#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    metadata: Option<Metadata>,
    #[serde(default)]
    entity: Option<OneOrMany<Value>>,
}

#[derive(Deserialize)]
struct Metadata {
    #[serde(default)]
    fields: Option<FieldList>,
}

#[derive(Deserialize)]
struct FieldList {
    #[serde(default)]
    field: Option<OneOrMany<FieldDescriptor>>,
}

#[derive(Deserialize)]
struct FieldDescriptor {
    name: String,
}

/// The gateway collapses single-element arrays into a bare object.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

/// Rows of one envelope, decoded on demand in gateway order.
struct Rows<'a> {
    layout: FieldLayout,
    primary_key: &'a str,
    items: std::vec::IntoIter<Value>,
}

impl Iterator for Rows<'_> {
    type Item = GatewayRecord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let item = self.items.next()?;
            if item.is_object() {
                return Some(self.decode_row(&item));
            }
            tracing::warn!(kind = json_kind(&item), "skipping non-object entity row");
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.items.len()))
    }
}

impl Rows<'_> {
    fn decode_row(&self, item: &Value) -> GatewayRecord {
        let mut record = GatewayRecord::new();

        if let Some(carrier) = item.get("$") {
            let id = carrier
                .get(self.primary_key)
                .and_then(scalar_text)
                .unwrap_or_default();
            record.insert(self.primary_key, id);
        }

        for (index, name) in self.layout.iter() {
            if let Some(value) = item
                .get(format!("f{index}"))
                .and_then(|cell| cell.get("$"))
                .and_then(scalar_text)
            {
                record.insert(name, value);
            }
        }

        record
    }
}

/// Scalar as wire text. Null, arrays and objects are treated as absent.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Decode a `loadRecords` entities envelope into records.
///
/// Each row's `f{i}` value lands under the name at position `i` of
/// `metadata.fields.field`; missing cells are omitted. When the row carries a
/// `$` object, `primary_key` is set from it (`""` if the key is absent).
///
/// Never fails: a missing envelope or `entity` yields no rows, and a
/// malformed envelope is logged and treated the same way.
#[must_use]
pub fn decode_entities(entities: Option<&Value>, primary_key: &str) -> Vec<GatewayRecord> {
    let Some(raw) = entities.filter(|v| !v.is_null()) else {
        return Vec::new();
    };

    let envelope = match Envelope::deserialize(raw) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!(error = %e, "unrecognised entities envelope; treating as empty");
            return Vec::new();
        }
    };

    let Some(entity) = envelope.entity else {
        return Vec::new();
    };

    let layout: FieldLayout = envelope
        .metadata
        .and_then(|m| m.fields)
        .and_then(|f| f.field)
        .map(|fields| {
            FieldLayout::from_metadata(fields.into_vec().into_iter().map(|d| d.name).collect())
        })
        .unwrap_or_default();

    if layout.is_empty() {
        tracing::debug!("entities envelope has no field metadata");
    }

    Rows {
        layout,
        primary_key,
        items: entity.into_vec().into_iter(),
    }
    .collect()
}
