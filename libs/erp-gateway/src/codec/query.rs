use std::fmt;

use serde::{Serialize, Serializer};

use super::record::FieldLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `loadRecords` query: root entity, projected fields, filter and order.
///
/// The primary key is returned in each row's `$` carrier and does not need
/// to appear in the field list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    root_entity: String,
    fields: FieldLayout,
    criteria: Option<String>,
    order_by: Option<(String, SortOrder)>,
}

impl LoadRequest {
    #[must_use]
    pub fn new(root_entity: impl Into<String>) -> Self {
        Self {
            root_entity: root_entity.into(),
            fields: FieldLayout::new(),
            criteria: None,
            order_by: None,
        }
    }

    #[must_use]
    pub fn fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.fields.push(name);
        }
        self
    }

    /// Filter expression, passed through verbatim.
    #[must_use]
    pub fn criteria(mut self, expression: impl Into<String>) -> Self {
        self.criteria = Some(expression.into());
        self
    }

    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.order_by = Some((field.into(), order));
        self
    }

    #[must_use]
    pub fn root_entity(&self) -> &str {
        &self.root_entity
    }

    #[must_use]
    pub fn field_layout(&self) -> &FieldLayout {
        &self.fields
    }

    #[must_use]
    pub fn criteria_expression(&self) -> Option<&str> {
        self.criteria.as_deref()
    }

    #[must_use]
    pub fn ordering(&self) -> Option<(&str, SortOrder)> {
        self.order_by.as_ref().map(|(f, o)| (f.as_str(), *o))
    }

    /// The `loadRecords` request body.
    #[must_use]
    pub fn envelope(&self) -> impl Serialize + '_ {
        LoadEnvelope {
            request_body: LoadBody {
                data_set: DataSet {
                    root_entity: &self.root_entity,
                    include_presentation_fields: "S",
                    offset_page: "0",
                    entity: EntitySelection {
                        fieldset: FieldSet {
                            list: self.fields.to_fieldset(),
                        },
                    },
                    criteria: self.criteria.as_deref().map(|expr| Criteria {
                        expression: Expression { text: expr },
                    }),
                    order_by: self.order_by.as_ref().map(|(field, order)| OrderBy {
                        field,
                        order: *order,
                    }),
                },
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoadEnvelope<'a> {
    request_body: LoadBody<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoadBody<'a> {
    data_set: DataSet<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DataSet<'a> {
    root_entity: &'a str,
    include_presentation_fields: &'static str,
    offset_page: &'static str,
    entity: EntitySelection,
    #[serde(skip_serializing_if = "Option::is_none")]
    criteria: Option<Criteria<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    order_by: Option<OrderBy<'a>>,
}

#[derive(Serialize)]
struct EntitySelection {
    fieldset: FieldSet,
}

#[derive(Serialize)]
struct FieldSet {
    list: String,
}

#[derive(Serialize)]
struct Criteria<'a> {
    expression: Expression<'a>,
}

#[derive(Serialize)]
struct Expression<'a> {
    #[serde(rename = "$")]
    text: &'a str,
}

/// Serialized as `{ "<field>": "ASC" }`.
struct OrderBy<'a> {
    field: &'a str,
    order: SortOrder,
}

impl Serialize for OrderBy<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(std::iter::once((self.field, self.order.as_str())))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_query_envelope() {
        let req = LoadRequest::new("AD_FUNIS_ESTAGIOS")
            .fields(["CODFUNIL", "NOME", "ORDEM", "COR", "ATIVO"])
            .criteria("CODFUNIL = 100 AND ATIVO = 'S'")
            .order_by("ORDEM", SortOrder::Asc);

        assert_eq!(
            serde_json::to_value(req.envelope()).unwrap(),
            json!({
                "requestBody": {
                    "dataSet": {
                        "rootEntity": "AD_FUNIS_ESTAGIOS",
                        "includePresentationFields": "S",
                        "offsetPage": "0",
                        "entity": {"fieldset": {"list": "CODFUNIL, NOME, ORDEM, COR, ATIVO"}},
                        "criteria": {"expression": {"$": "CODFUNIL = 100 AND ATIVO = 'S'"}},
                        "orderBy": {"ORDEM": "ASC"}
                    }
                }
            })
        );
    }

    #[test]
    fn optional_members_are_omitted() {
        let req = LoadRequest::new("AD_FUNIS").fields(["NOME"]);
        let json = serde_json::to_value(req.envelope()).unwrap();
        let data_set = &json["requestBody"]["dataSet"];

        assert!(data_set.get("criteria").is_none());
        assert!(data_set.get("orderBy").is_none());
        assert_eq!(req.ordering(), None);
    }

    #[test]
    fn sort_order_renders_upper_case() {
        assert_eq!(SortOrder::Desc.to_string(), "DESC");
        assert_eq!(SortOrder::default(), SortOrder::Asc);
    }
}
