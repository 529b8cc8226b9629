use erp_gateway::{GatewayRecord, LoadRequest, PrimaryKey, SaveRequest};
use sales_pipeline_sdk::{Funnel, FunnelDraft};
use time::Date;

use super::wire;

pub(crate) const ENTITY: &str = "AD_FUNIS";
pub(crate) const PRIMARY_KEY: &str = "CODFUNIL";

const FIELDS: [&str; 6] = [
    "NOME",
    "DESCRICAO",
    "COR",
    "ATIVO",
    "DATA_CRIACAO",
    "DATA_ATUALIZACAO",
];

pub(crate) fn list_request() -> LoadRequest {
    LoadRequest::new(ENTITY)
        .fields(FIELDS)
        .criteria(wire::ONLY_ACTIVE)
}

/// Update writes name, description, color and update date; create adds the
/// active flag and creation date.
pub(crate) fn save_request(draft: &FunnelDraft, today: Date, default_color: &str) -> SaveRequest {
    let today = wire::format_date(today);
    let color = draft.color.as_deref().unwrap_or(default_color);

    match draft.existing_id() {
        Some(id) => SaveRequest::update(ENTITY, PrimaryKey::new(PRIMARY_KEY, id))
            .set("NOME", draft.name.as_str())
            .set("DESCRICAO", draft.description.as_str())
            .set("COR", color)
            .set("DATA_ATUALIZACAO", today),
        None => SaveRequest::create(ENTITY)
            .set("NOME", draft.name.as_str())
            .set("DESCRICAO", draft.description.as_str())
            .set("COR", color)
            .set("ATIVO", wire::ACTIVE)
            .set("DATA_CRIACAO", today.as_str())
            .set("DATA_ATUALIZACAO", today),
    }
}

pub(crate) fn delete_request(funnel_id: &str, today: Date) -> SaveRequest {
    SaveRequest::update(ENTITY, PrimaryKey::new(PRIMARY_KEY, funnel_id))
        .set("ATIVO", wire::INACTIVE)
        .set("DATA_ATUALIZACAO", wire::format_date(today))
}

pub(crate) fn from_record(record: &GatewayRecord) -> Funnel {
    Funnel {
        id: wire::owned(record, PRIMARY_KEY),
        name: wire::owned(record, "NOME"),
        description: wire::owned(record, "DESCRICAO"),
        color: wire::owned(record, "COR"),
        active: wire::is_active(record),
        created_on: wire::parse_date(record, "DATA_CRIACAO"),
        updated_on: wire::parse_date(record, "DATA_ATUALIZACAO"),
    }
}
