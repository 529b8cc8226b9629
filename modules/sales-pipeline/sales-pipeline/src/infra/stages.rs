use erp_gateway::{GatewayRecord, LoadRequest, PrimaryKey, SaveRequest, SortOrder};
use sales_pipeline_sdk::{Stage, StageDraft};

use super::wire;

pub(crate) const ENTITY: &str = "AD_FUNIS_ESTAGIOS";
pub(crate) const PRIMARY_KEY: &str = "CODESTAGIO";

const FIELDS: [&str; 5] = ["CODFUNIL", "NOME", "ORDEM", "COR", "ATIVO"];

/// Active stages of one funnel in pipeline order.
///
/// The id goes into the expression as given.
pub(crate) fn list_request(funnel_id: &str) -> LoadRequest {
    LoadRequest::new(ENTITY)
        .fields(FIELDS)
        .criteria(format!("CODFUNIL = {funnel_id} AND {}", wire::ONLY_ACTIVE))
        .order_by("ORDEM", SortOrder::Asc)
}

pub(crate) fn save_request(draft: &StageDraft, default_color: &str) -> SaveRequest {
    let position = draft.position.unwrap_or(0).to_string();
    let color = draft.color.as_deref().unwrap_or(default_color);

    match draft.existing_id() {
        Some(id) => SaveRequest::update(ENTITY, PrimaryKey::new(PRIMARY_KEY, id))
            .set("NOME", draft.name.as_str())
            .set("ORDEM", position)
            .set("COR", color),
        None => SaveRequest::create(ENTITY)
            .set("CODFUNIL", draft.funnel_id.as_str())
            .set("NOME", draft.name.as_str())
            .set("ORDEM", position)
            .set("COR", color)
            .set("ATIVO", wire::ACTIVE),
    }
}

pub(crate) fn delete_request(stage_id: &str) -> SaveRequest {
    SaveRequest::update(ENTITY, PrimaryKey::new(PRIMARY_KEY, stage_id)).set("ATIVO", wire::INACTIVE)
}

pub(crate) fn from_record(record: &GatewayRecord) -> Stage {
    Stage {
        id: wire::owned(record, PRIMARY_KEY),
        funnel_id: wire::owned(record, "CODFUNIL"),
        name: wire::owned(record, "NOME"),
        position: wire::parse_int(record, "ORDEM"),
        color: wire::owned(record, "COR"),
        active: wire::is_active(record),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn list_scopes_to_funnel_and_orders_by_position() {
        let req = list_request("100");

        assert_eq!(req.root_entity(), "AD_FUNIS_ESTAGIOS");
        assert_eq!(req.criteria_expression(), Some("CODFUNIL = 100 AND ATIVO = 'S'"));
        assert_eq!(req.ordering(), Some(("ORDEM", SortOrder::Asc)));
    }

    #[test]
    fn create_includes_funnel_and_active_flag() {
        let draft = StageDraft {
            funnel_id: "100".into(),
            name: "Proposta".into(),
            position: Some(2),
            ..StageDraft::default()
        };

        let req = save_request(&draft, "#3b82f6");

        assert!(!req.is_update());
        assert_eq!(req.fields().to_fieldset(), "CODFUNIL, NOME, ORDEM, COR, ATIVO");
        assert_eq!(req.value_of("CODFUNIL"), Some("100"));
        assert_eq!(req.value_of("ORDEM"), Some("2"));
        assert_eq!(req.value_of("ATIVO"), Some("S"));
    }

    #[test]
    fn update_writes_name_position_color() {
        let draft = StageDraft {
            id: Some("55".into()),
            funnel_id: "100".into(),
            name: "Fechado".into(),
            color: Some("#00ff00".into()),
            ..StageDraft::default()
        };

        let req = save_request(&draft, "#3b82f6");

        assert_eq!(req.fields().to_fieldset(), "NOME, ORDEM, COR");
        assert_eq!(req.value_of("ORDEM"), Some("0"));
        assert_eq!(req.value_of("COR"), Some("#00ff00"));
    }

    #[test]
    fn delete_touches_only_active_flag() {
        let req = delete_request("55");

        assert_eq!(req.primary_key(), Some(&PrimaryKey::new("CODESTAGIO", "55")));
        assert_eq!(req.fields().to_fieldset(), "ATIVO");
        assert_eq!(req.value_of("ATIVO"), Some("N"));
    }

    #[test]
    fn duplicate_positions_pass_through() {
        let a: GatewayRecord = [("CODESTAGIO", "1"), ("ORDEM", "2")].into_iter().collect();
        let b: GatewayRecord = [("CODESTAGIO", "2"), ("ORDEM", "2")].into_iter().collect();

        assert_eq!(from_record(&a).position, 2);
        assert_eq!(from_record(&b).position, 2);
    }
}
