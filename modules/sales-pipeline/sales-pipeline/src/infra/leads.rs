use erp_gateway::{GatewayRecord, LoadRequest, PrimaryKey, SaveRequest};
use sales_pipeline_sdk::{Lead, LeadDraft};
use time::Date;

use super::wire;

pub(crate) const ENTITY: &str = "AD_LEADS";
pub(crate) const PRIMARY_KEY: &str = "CODLEAD";

const FIELDS: [&str; 12] = [
    "NOME",
    "DESCRICAO",
    "VALOR",
    "CODESTAGIO",
    "CODFUNIL",
    "DATA_VENCIMENTO",
    "TIPO_TAG",
    "COR_TAG",
    "CODPARC",
    "ATIVO",
    "DATA_CRIACAO",
    "DATA_ATUALIZACAO",
];

pub(crate) fn list_request() -> LoadRequest {
    LoadRequest::new(ENTITY)
        .fields(FIELDS)
        .criteria(wire::ONLY_ACTIVE)
}

/// Both modes write the editable fields; create also sets the active flag
/// and creation date. Absent due date and partner are left untouched.
pub(crate) fn save_request(draft: &LeadDraft, today: Date) -> SaveRequest {
    let today = wire::format_date(today);
    let request = match draft.existing_id() {
        Some(id) => SaveRequest::update(ENTITY, PrimaryKey::new(PRIMARY_KEY, id)),
        None => SaveRequest::create(ENTITY),
    };
    let creating = !request.is_update();

    let request = request
        .set("NOME", draft.name.as_str())
        .set("DESCRICAO", draft.description.as_str())
        .set("VALOR", draft.value.to_string())
        .set("CODESTAGIO", draft.stage_id.as_str())
        .set("CODFUNIL", draft.funnel_id.as_str())
        .set_opt("DATA_VENCIMENTO", draft.due_on.map(wire::format_date))
        .set("TIPO_TAG", draft.tag.as_str())
        .set("COR_TAG", draft.tag_color.as_str())
        .set_opt(
            "CODPARC",
            draft
                .partner_id
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty()),
        );

    let request = if creating {
        request
            .set("ATIVO", wire::ACTIVE)
            .set("DATA_CRIACAO", today.as_str())
    } else {
        request
    };
    request.set("DATA_ATUALIZACAO", today)
}

pub(crate) fn move_request(lead_id: &str, stage_id: &str, today: Date) -> SaveRequest {
    SaveRequest::update(ENTITY, PrimaryKey::new(PRIMARY_KEY, lead_id))
        .set("CODESTAGIO", stage_id)
        .set("DATA_ATUALIZACAO", wire::format_date(today))
}

pub(crate) fn from_record(record: &GatewayRecord) -> Lead {
    Lead {
        id: wire::owned(record, PRIMARY_KEY),
        name: wire::owned(record, "NOME"),
        description: wire::owned(record, "DESCRICAO"),
        value: wire::parse_decimal(record, "VALOR"),
        stage_id: wire::owned(record, "CODESTAGIO"),
        funnel_id: wire::owned(record, "CODFUNIL"),
        due_on: wire::parse_date(record, "DATA_VENCIMENTO"),
        tag: wire::owned(record, "TIPO_TAG"),
        tag_color: wire::owned(record, "COR_TAG"),
        partner_id: wire::optional(record, "CODPARC"),
        active: wire::is_active(record),
        created_on: wire::parse_date(record, "DATA_CRIACAO"),
        updated_on: wire::parse_date(record, "DATA_ATUALIZACAO"),
    }
}
