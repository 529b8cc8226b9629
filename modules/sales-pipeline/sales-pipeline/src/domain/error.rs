use erp_gateway::GatewayError;
use sales_pipeline_sdk::PipelineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(
        "saved {entity} record {} was not found on re-read",
        .id.as_deref().unwrap_or("<new>")
    )]
    NotFoundAfterSave {
        entity: &'static str,
        id: Option<String>,
    },
}

impl DomainError {
    pub fn not_found_after_save(entity: &'static str, id: Option<&str>) -> Self {
        Self::NotFoundAfterSave {
            entity,
            id: id.map(str::to_owned),
        }
    }
}

impl From<DomainError> for PipelineError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Gateway(e) => match e {
                GatewayError::AuthFailed(details) => Self::AuthFailed(details),
                GatewayError::AuthResponseInvalid => Self::AuthResponseInvalid,
                GatewayError::SessionExpired => Self::SessionExpired,
                GatewayError::GatewayRequestFailed(details) => Self::GatewayRequestFailed(details),
                GatewayError::Config(details) => Self::Config(details),
                other => Self::GatewayRequestFailed(other.to_string()),
            },
            DomainError::NotFoundAfterSave { entity, id } => {
                Self::not_found_after_save(entity, id.as_deref())
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn gateway_kinds_map_one_to_one() {
        let cases = [
            (GatewayError::AuthFailed("x".into()), PipelineError::AuthFailed("x".into())),
            (GatewayError::AuthResponseInvalid, PipelineError::AuthResponseInvalid),
            (GatewayError::SessionExpired, PipelineError::SessionExpired),
            (
                GatewayError::GatewayRequestFailed("boom".into()),
                PipelineError::GatewayRequestFailed("boom".into()),
            ),
            (GatewayError::Config("bad".into()), PipelineError::Config("bad".into())),
        ];

        for (gateway, expected) in cases {
            assert_eq!(PipelineError::from(DomainError::from(gateway)), expected);
        }
    }

    #[test]
    fn not_found_keeps_entity_and_id() {
        let e = DomainError::not_found_after_save("AD_FUNIS_ESTAGIOS", Some("55"));
        assert_eq!(
            PipelineError::from(e),
            PipelineError::RecordNotFoundAfterSave {
                entity: "AD_FUNIS_ESTAGIOS".into(),
                id: Some("55".into()),
            }
        );
    }
}
