//! Integration tests for sources, view handles and configuration loading

mod view_harness;

use ranch_view::prelude::*;
use std::io::Write;
use std::sync::Arc;
use view_harness::*;

// =============================================================================
// Reload behaviour
// =============================================================================

mod reload_tests {
    use super::*;

    #[tokio::test]
    async fn test_overlapping_reloads_keep_the_latest_request() {
        let older = vec![ranch(1, "old", 1.0), ranch(2, "old", 2.0), ranch(3, "old", 3.0)];
        let newer = vec![ranch(9, "new", 9.0)];
        let source = GatedSource::new(older, newer);
        let view = CollectionView::new(collections::ranch::config()).unwrap();
        let handle = ViewHandle::from_arc(source.clone(), view);

        let first = handle.refresh();
        let second = async {
            source.started.notified().await;
            let outcome = handle.refresh().await;
            source.release();
            outcome
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first.unwrap(), RefreshOutcome::Stale { generation: 1 });
        assert_eq!(second.unwrap(), RefreshOutcome::Applied { count: 1 });
        assert_eq!(ids(handle.read().await.filtered_records()), vec!["9"]);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_last_good_data() {
        let view = CollectionView::with_records(
            collections::ranch::config(),
            vec![ranch(1, "Rancho Norte", 50.0)],
        )
        .unwrap();
        let handle = ViewHandle::new(FailingSource, view);
        let mut rx = handle.subscribe();

        let err = handle.refresh().await.unwrap_err();
        assert_eq!(err.error_code(), "SOURCE_FETCH_FAILED");
        assert!(err.to_string().contains("503"));

        let view = handle.read().await;
        assert_eq!(view.filtered_records().len(), 1);
        assert_eq!(view.error(), Some("503 Service Unavailable"));

        let envelope = rx.recv().await.unwrap();
        assert!(envelope.event.is_failure());
    }

    #[tokio::test]
    async fn test_undecodable_payload_is_a_decode_error() {
        let view = CollectionView::with_records(
            collections::ranch::config(),
            vec![ranch(1, "Rancho Norte", 50.0)],
        )
        .unwrap();
        let handle = ViewHandle::new(MalformedSource, view);

        let err = handle.refresh().await.unwrap_err();
        assert_eq!(err.error_code(), "SOURCE_DECODE_FAILED");
        assert!(matches!(err, ViewError::Source(SourceError::Decode { .. })));

        let view = handle.read().await;
        assert_eq!(view.filtered_records().len(), 1);
        assert_eq!(view.error(), Some("expected a sequence"));
    }

    #[tokio::test]
    async fn test_failed_update_is_reported() {
        let view = CollectionView::new(collections::event::config()).unwrap();
        let handle = ViewHandle::new(FailingSource, view);

        let err = handle.update("7", json!({ "status": "completed" })).await.unwrap_err();
        assert!(matches!(
            err,
            ViewError::Source(SourceError::Mutation { ref operation, .. }) if operation == "update"
        ));
        assert_eq!(handle.read().await.error(), Some("cannot update 7"));
    }

    #[tokio::test]
    async fn test_mutation_triggers_full_reload_and_resets_page() {
        let records: Vec<Record> = events(25);
        let source = InMemorySource::with_records("events", records);
        let view = CollectionView::new(collections::event::config()).unwrap();
        let handle = ViewHandle::new(source.clone(), view);
        handle.refresh().await.unwrap();

        handle.write().await.set_page(3);
        handle.write().await.select("4");

        handle.delete("4").await.unwrap();

        let view = handle.read().await;
        assert_eq!(view.filtered_records().len(), 24);
        assert_eq!(view.current_page(), 1);
        assert!(!view.is_selected("4"));
        assert_eq!(source.len(), 24);
    }

    #[tokio::test]
    async fn test_handles_share_source_state() {
        let source = Arc::new(InMemorySource::with_records(
            "ranches",
            vec![ranch(1, "A", 1.0)],
        ));
        let a = ViewHandle::from_arc(
            source.clone(),
            CollectionView::new(collections::ranch::config()).unwrap(),
        );
        let b = ViewHandle::from_arc(
            source.clone(),
            CollectionView::new(collections::ranch::config()).unwrap(),
        );

        source.insert(ranch(2, "B", 2.0)).unwrap();
        a.refresh().await.unwrap();
        b.refresh().await.unwrap();

        assert_eq!(a.read().await.filtered_records().len(), 2);
        assert_eq!(b.read().await.filtered_records().len(), 2);
    }
}

// =============================================================================
// Configuration
// =============================================================================

mod config_tests {
    use super::*;

    #[test]
    fn test_load_views_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
api_base: http://localhost:3000/api
collections:
  - name: paddocks
    endpoint: land/paddocks
    id_field: paddockId
    search_fields: [name]
    filters:
      - {{ key: areaMin, field: areaHectares, kind: min }}
      - {{ key: grazing, field: status, kind: equals }}
    sort_types:
      areaHectares: number
    default_sort: {{ key: areaHectares, direction: desc }}
    items_per_page: 2
"#
        )
        .unwrap();

        let config = ViewsConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.api_base.as_deref(), Some("http://localhost:3000/api"));

        let paddocks = config.collection("paddocks").unwrap().clone();
        assert_eq!(paddocks.endpoint(), "land/paddocks");

        let records = vec![
            record(json!({ "paddockId": "p1", "name": "Loma", "areaHectares": 12, "status": "grazing" })),
            record(json!({ "paddockId": "p2", "name": "Bajío", "areaHectares": 40, "status": "resting" })),
            record(json!({ "paddockId": "p3", "name": "Arroyo", "areaHectares": 25, "status": "grazing" })),
        ];
        let mut view = CollectionView::with_records(paddocks, records).unwrap();
        assert_eq!(ids_of(&view, "paddockId"), vec!["p2", "p3"]);

        view.set_filter("grazing", json!("grazing"));
        assert_eq!(ids_of(&view, "paddockId"), vec!["p3", "p1"]);
        assert!(view.select("p1"));
    }

    fn ids_of(view: &CollectionView, id_field: &str) -> Vec<String> {
        view.paged_records()
            .iter()
            .filter_map(|r| r.id(id_field))
            .collect()
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = ViewsConfig::from_yaml_file("/definitely/not/here.yaml").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_IO_ERROR");
    }

    #[test]
    fn test_malformed_yaml_is_a_parse_error() {
        let err = ViewsConfig::from_yaml_str("collections: [ {name: ").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_PARSE_ERROR");

        let err = ViewsConfig::from_yaml_str(
            "collections:\n  - name: x\n    filters:\n      - { key: a, field: a, kind: fuzzy }\n",
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_PARSE_ERROR");
    }
}
