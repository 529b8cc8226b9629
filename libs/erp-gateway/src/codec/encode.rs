use serde::{Serialize, Serializer};

use super::record::{FieldLayout, PositionalValues};

const SAVE_SERVICE: &str = "DatasetSP.save";

/// Primary key of an update write, serialized as `{ "<name>": "<value>" }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKey {
    name: String,
    value: String,
}

impl PrimaryKey {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Serialize for PrimaryKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(std::iter::once((&self.name, &self.value)))
    }
}

/// A sparse single-record write.
///
/// The presence of a primary key is the only thing that distinguishes an
/// update from a create; callers pick which fields each mode writes.
///
/// ```
/// use erp_gateway::{PrimaryKey, SaveRequest};
///
/// let req = SaveRequest::update("AD_FUNIS_ESTAGIOS", PrimaryKey::new("CODESTAGIO", "55"))
///     .set("ATIVO", "N");
/// assert!(req.is_update());
/// assert_eq!(req.fields().to_fieldset(), "ATIVO");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    entity_name: String,
    primary_key: Option<PrimaryKey>,
    fields: FieldLayout,
    values: PositionalValues,
}

impl SaveRequest {
    #[must_use]
    pub fn create(entity_name: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            primary_key: None,
            fields: FieldLayout::new(),
            values: PositionalValues::new(),
        }
    }

    #[must_use]
    pub fn update(entity_name: impl Into<String>, primary_key: PrimaryKey) -> Self {
        Self {
            primary_key: Some(primary_key),
            ..Self::create(entity_name)
        }
    }

    /// Write `value` to `name`. Setting the same field twice keeps its
    /// position and replaces the value.
    #[must_use]
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let index = self.fields.push(name);
        self.values.set(index, value);
        self
    }

    /// [`set`](Self::set) only when `value` is `Some`.
    #[must_use]
    pub fn set_opt(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.set(name, value),
            None => self,
        }
    }

    #[must_use]
    pub fn is_update(&self) -> bool {
        self.primary_key.is_some()
    }

    #[must_use]
    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    #[must_use]
    pub fn primary_key(&self) -> Option<&PrimaryKey> {
        self.primary_key.as_ref()
    }

    #[must_use]
    pub fn fields(&self) -> &FieldLayout {
        &self.fields
    }

    #[must_use]
    pub fn values(&self) -> &PositionalValues {
        &self.values
    }

    /// Value written to `name`, if any.
    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.fields
            .position(name)
            .and_then(|i| self.values.get(i))
    }

    /// The `DatasetSP.save` request body.
    #[must_use]
    pub fn envelope(&self) -> impl Serialize + '_ {
        SaveEnvelope {
            service_name: SAVE_SERVICE,
            request_body: SaveBody {
                entity_name: &self.entity_name,
                stand_alone: false,
                fields: &self.fields,
                records: [SaveRecord {
                    pk: self.primary_key.as_ref(),
                    values: &self.values,
                }],
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveEnvelope<'a> {
    service_name: &'static str,
    request_body: SaveBody<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveBody<'a> {
    entity_name: &'a str,
    stand_alone: bool,
    fields: &'a FieldLayout,
    records: [SaveRecord<'a>; 1],
}

#[derive(Serialize)]
struct SaveRecord<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pk: Option<&'a PrimaryKey>,
    values: &'a PositionalValues,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn to_json(req: &SaveRequest) -> Value {
        serde_json::to_value(req.envelope()).unwrap()
    }

    #[test]
    fn update_envelope_carries_pk() {
        let req = SaveRequest::update("AD_FUNIS", PrimaryKey::new("CODFUNIL", "7"))
            .set("NOME", "Vendas")
            .set("COR", "#3b82f6");

        assert_eq!(
            to_json(&req),
            json!({
                "serviceName": "DatasetSP.save",
                "requestBody": {
                    "entityName": "AD_FUNIS",
                    "standAlone": false,
                    "fields": ["NOME", "COR"],
                    "records": [{
                        "pk": {"CODFUNIL": "7"},
                        "values": {"0": "Vendas", "1": "#3b82f6"}
                    }]
                }
            })
        );
    }

    #[test]
    fn create_envelope_has_no_pk_member() {
        let req = SaveRequest::create("AD_FUNIS").set("NOME", "Novo").set("ATIVO", "S");

        let json = to_json(&req);
        let record = &json["requestBody"]["records"][0];
        assert!(record.get("pk").is_none());
        assert_eq!(record["values"], json!({"0": "Novo", "1": "S"}));
        assert!(!req.is_update());
    }

    #[test]
    fn resetting_a_field_replaces_value_in_place() {
        let req = SaveRequest::create("AD_LEADS")
            .set("NOME", "a")
            .set("VALOR", "1")
            .set("NOME", "b");

        assert_eq!(req.fields().to_fieldset(), "NOME, VALOR");
        assert_eq!(req.value_of("NOME"), Some("b"));
        assert_eq!(req.values().len(), 2);
    }

    #[test]
    fn set_opt_skips_none() {
        let req = SaveRequest::create("AD_LEADS")
            .set_opt("CODPARC", None::<String>)
            .set_opt("NOME", Some("x"));

        assert_eq!(req.fields().to_fieldset(), "NOME");
        assert_eq!(req.value_of("NOME"), Some("x"));
        assert_eq!(req.value_of("CODPARC"), None);
    }
}
