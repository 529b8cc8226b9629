#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::super::*;
    use async_trait::async_trait;
    use erp_gateway::{GatewayError, GatewayRecord, LoadRequest, RecordStore, SaveRequest};
    use sales_pipeline_sdk::{FunnelDraft, LeadDraft, PipelineClient, PipelineError, StageDraft};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use time::macros::date;

    // In-memory store that records every request
    #[derive(Default)]
    struct RecordingStore {
        rows: Mutex<HashMap<String, Vec<GatewayRecord>>>,
        loads: Mutex<Vec<LoadRequest>>,
        saves: Mutex<Vec<SaveRequest>>,
        fail_loads: AtomicBool,
        fail_saves: AtomicBool,
    }

    impl RecordingStore {
        fn with_rows(entity: &str, rows: Vec<GatewayRecord>) -> Self {
            let store = Self::default();
            store.rows.lock().unwrap().insert(entity.to_owned(), rows);
            store
        }

        fn loads(&self) -> Vec<LoadRequest> {
            self.loads.lock().unwrap().clone()
        }

        fn saves(&self) -> Vec<SaveRequest> {
            self.saves.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RecordStore for RecordingStore {
        async fn load(
            &self,
            request: &LoadRequest,
            _primary_key: &str,
        ) -> Result<Vec<GatewayRecord>, GatewayError> {
            self.loads.lock().unwrap().push(request.clone());
            if self.fail_loads.load(Ordering::SeqCst) {
                return Err(GatewayError::GatewayRequestFailed("HTTP 500".into()));
            }
            Ok(self
                .rows
                .lock()
                .unwrap()
                .get(request.root_entity())
                .cloned()
                .unwrap_or_default())
        }

        async fn save(&self, request: &SaveRequest) -> Result<(), GatewayError> {
            self.saves.lock().unwrap().push(request.clone());
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(GatewayError::SessionExpired);
            }
            Ok(())
        }
    }

    fn record(pairs: &[(&str, &str)]) -> GatewayRecord {
        pairs.iter().copied().collect()
    }

    fn make_service(store: &Arc<RecordingStore>) -> service::Service<RecordingStore> {
        service::Service::new(
            Arc::clone(store),
            Arc::new(clock::FixedClock(date!(2025 - 03 - 07))),
            service::ServiceConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_create_funnel_stamps_both_dates() {
        let store = Arc::new(RecordingStore::with_rows(
            "AD_FUNIS",
            vec![
                record(&[("CODFUNIL", "1"), ("NOME", "Antigo")]),
                record(&[("CODFUNIL", "2"), ("NOME", "Novo funil")]),
            ],
        ));

        let created = make_service(&store)
            .save_funnel(FunnelDraft {
                name: "Novo funil".into(),
                ..FunnelDraft::default()
            })
            .await
            .unwrap();

        let saves = store.saves();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].value_of("DATA_CRIACAO"), Some("07/03/2025"));
        assert_eq!(saves[0].value_of("DATA_ATUALIZACAO"), Some("07/03/2025"));
        assert_eq!(saves[0].value_of("COR"), Some("#3b82f6"));
        assert_eq!(created.id, "2");
        assert_eq!(store.loads().len(), 1);
    }

    #[tokio::test]
    async fn test_update_funnel_returns_matching_row() {
        let store = Arc::new(RecordingStore::with_rows(
            "AD_FUNIS",
            vec![
                record(&[("CODFUNIL", "1"), ("NOME", "Vendas")]),
                record(&[("CODFUNIL", "2"), ("NOME", "Outro")]),
            ],
        ));

        let updated = make_service(&store)
            .save_funnel(FunnelDraft {
                id: Some("1".into()),
                name: "Vendas".into(),
                ..FunnelDraft::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.id, "1");
        assert!(store.saves()[0].is_update());
    }

    #[tokio::test]
    async fn test_update_missing_after_save_is_an_error() {
        let store = Arc::new(RecordingStore::with_rows(
            "AD_FUNIS",
            vec![record(&[("CODFUNIL", "2")])],
        ));

        let err = make_service(&store)
            .save_funnel(FunnelDraft {
                id: Some("7".into()),
                ..FunnelDraft::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            error::DomainError::NotFoundAfterSave { entity: "AD_FUNIS", id: Some(ref id) } if id == "7"
        ));
    }

    #[tokio::test]
    async fn test_create_into_empty_list_is_an_error() {
        let store = Arc::new(RecordingStore::default());

        let err = make_service(&store)
            .save_stage(StageDraft {
                funnel_id: "100".into(),
                name: "Novo".into(),
                ..StageDraft::default()
            })
            .await
            .unwrap_err();

        assert_eq!(
            PipelineError::from(err),
            PipelineError::RecordNotFoundAfterSave {
                entity: "AD_FUNIS_ESTAGIOS".into(),
                id: None,
            }
        );
    }

    #[tokio::test]
    async fn test_list_stages_filters_and_orders() {
        let store = Arc::new(RecordingStore::with_rows(
            "AD_FUNIS_ESTAGIOS",
            vec![
                record(&[("CODESTAGIO", "1"), ("CODFUNIL", "100"), ("ORDEM", "1")]),
                record(&[("CODESTAGIO", "2"), ("CODFUNIL", "100"), ("ORDEM", "2")]),
            ],
        ));

        let stages = make_service(&store).list_stages("100").await.into_rows();

        assert_eq!(stages.len(), 2);
        assert_eq!(stages[1].position, 2);
        let loads = store.loads();
        assert_eq!(
            loads[0].criteria_expression(),
            Some("CODFUNIL = 100 AND ATIVO = 'S'")
        );
        assert_eq!(loads[0].ordering(), Some(("ORDEM", erp_gateway::SortOrder::Asc)));
    }

    #[tokio::test]
    async fn test_save_stage_rereads_its_funnel() {
        let store = Arc::new(RecordingStore::with_rows(
            "AD_FUNIS_ESTAGIOS",
            vec![record(&[("CODESTAGIO", "55"), ("CODFUNIL", "100"), ("NOME", "Fechado")])],
        ));

        let stage = make_service(&store)
            .save_stage(StageDraft {
                id: Some("55".into()),
                funnel_id: "100".into(),
                name: "Fechado".into(),
                ..StageDraft::default()
            })
            .await
            .unwrap();

        assert_eq!(stage.name, "Fechado");
        assert_eq!(
            store.loads()[0].criteria_expression(),
            Some("CODFUNIL = 100 AND ATIVO = 'S'")
        );
    }

    #[tokio::test]
    async fn test_delete_stage_writes_once_without_reading() {
        let store = Arc::new(RecordingStore::default());

        make_service(&store).delete_stage("55").await.unwrap();

        let saves = store.saves();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].entity_name(), "AD_FUNIS_ESTAGIOS");
        assert_eq!(saves[0].primary_key().map(|pk| (pk.name(), pk.value())), Some(("CODESTAGIO", "55")));
        assert_eq!(saves[0].fields().to_fieldset(), "ATIVO");
        assert_eq!(saves[0].value_of("ATIVO"), Some("N"));
        assert!(store.loads().is_empty());
    }

    #[tokio::test]
    async fn test_delete_funnel_stamps_update_date() {
        let store = Arc::new(RecordingStore::default());

        make_service(&store).delete_funnel("7").await.unwrap();

        let saves = store.saves();
        assert_eq!(saves[0].value_of("ATIVO"), Some("N"));
        assert_eq!(saves[0].value_of("DATA_ATUALIZACAO"), Some("07/03/2025"));
        assert!(store.loads().is_empty());
    }

    #[tokio::test]
    async fn test_failed_list_degrades_to_empty() {
        let store = Arc::new(RecordingStore::with_rows(
            "AD_FUNIS",
            vec![record(&[("CODFUNIL", "1")])],
        ));
        store.fail_loads.store(true, Ordering::SeqCst);
        let service = Arc::new(make_service(&store));

        assert!(service.list_funnels().await.is_degraded());

        let client = local_client::LocalClient::new(Arc::clone(&service));
        assert!(client.list_funnels().await.is_empty());
        assert!(client.list_stages("1").await.is_empty());
        assert!(client.list_leads().await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_save_propagates_without_reread() {
        let store = Arc::new(RecordingStore::default());
        store.fail_saves.store(true, Ordering::SeqCst);
        let client = local_client::LocalClient::new(Arc::new(make_service(&store)));

        let err = client
            .save_funnel(FunnelDraft {
                name: "x".into(),
                ..FunnelDraft::default()
            })
            .await
            .unwrap_err();

        assert_eq!(err, PipelineError::SessionExpired);
        assert!(store.loads().is_empty());
    }

    #[tokio::test]
    async fn test_move_lead_writes_stage_only() {
        let store = Arc::new(RecordingStore::default());

        make_service(&store).move_lead("42", "5").await.unwrap();

        let saves = store.saves();
        assert_eq!(saves[0].entity_name(), "AD_LEADS");
        assert_eq!(saves[0].fields().to_fieldset(), "CODESTAGIO, DATA_ATUALIZACAO");
        assert!(store.loads().is_empty());
    }

    #[tokio::test]
    async fn test_save_lead_create_returns_last_lead() {
        let store = Arc::new(RecordingStore::with_rows(
            "AD_LEADS",
            vec![
                record(&[("CODLEAD", "41"), ("NOME", "Antigo")]),
                record(&[("CODLEAD", "42"), ("NOME", "ACME"), ("VALOR", "10")]),
            ],
        ));

        let lead = make_service(&store)
            .save_lead(LeadDraft {
                name: "ACME".into(),
                value: 10.0,
                stage_id: "3".into(),
                funnel_id: "1".into(),
                ..LeadDraft::default()
            })
            .await
            .unwrap();

        assert_eq!(lead.id, "42");
        let saves = store.saves();
        assert_eq!(saves[0].value_of("ATIVO"), Some("S"));
        assert_eq!(saves[0].value_of("VALOR"), Some("10"));
        assert_eq!(saves[0].value_of("DATA_VENCIMENTO"), None);
    }
}
