//! End-to-End Tests for Semantica Provenance
//!
//! Exercises the manager over both backends the way a pipeline would:
//! document ingestion, chunking, extraction, then lineage queries.

use semantica_domain::{Metadata, SourceReference};
use semantica_provenance::{
    create_translation_chain, trace_translation_chain, BridgeAxiom, ChainInput, ChunkRecord,
    ChunkSpan, EntityRecord, ProvenanceConfig, ProvenanceManager, TrackOptions,
};
use serde_json::json;
use tempfile::TempDir;

fn ingest_document_chunk_entity(manager: &mut ProvenanceManager) {
    manager
        .track_entity(
            "doc_1",
            "file.pdf",
            TrackOptions::new().entity_type("document").activity("ingestion"),
        )
        .unwrap();
    manager
        .track_chunk(
            "chunk_1",
            "doc_1",
            ChunkSpan::new(0, 512).with_parent("doc_1"),
            TrackOptions::new(),
        )
        .unwrap();
    manager
        .track_entity(
            "entity_1",
            "chunk_1",
            TrackOptions::new()
                .entity_type("person")
                .activity("ner_extraction")
                .confidence(0.88)
                .metadata_value("text", "Ada Lovelace"),
        )
        .unwrap();
}

#[test]
fn test_document_chunk_entity_lineage() {
    let mut manager = ProvenanceManager::in_memory();
    ingest_document_chunk_entity(&mut manager);

    let lineage = manager.get_lineage("entity_1").unwrap();

    assert_eq!(lineage.entity_id, "entity_1");
    assert_eq!(lineage.depth, 3);
    for id in ["doc_1", "chunk_1", "entity_1"] {
        assert!(lineage.contains(id), "Lineage should reach {}", id);
    }
    assert!(lineage.source_documents.contains(&"doc_1".to_string()));
    assert!(lineage.source_documents.contains(&"file.pdf".to_string()));
    assert_eq!(
        lineage.activities,
        vec!["ner_extraction", "chunking", "ingestion"]
    );
    assert_eq!(lineage.min_confidence, Some(0.88));
}

#[test]
fn test_absent_lineage_serializes_empty() {
    let manager = ProvenanceManager::in_memory();
    let lineage = manager.get_lineage("nope").unwrap();
    assert!(lineage.is_empty());
    assert_eq!(serde_json::to_string(&lineage).unwrap(), "{}");
    assert!(manager.get_provenance("nope").unwrap().is_none());
}

#[test]
fn test_retracking_keeps_single_entry() {
    let mut manager = ProvenanceManager::in_memory();
    manager
        .track_entity("e1", "a.pdf", TrackOptions::new().confidence(0.2))
        .unwrap();
    manager
        .track_entity("e1", "a.pdf", TrackOptions::new().confidence(0.9))
        .unwrap();

    let entries = manager.list_entries(None).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].confidence, 0.9);
    assert!(manager.verify_all().unwrap().is_clean());
}

#[test]
fn test_sqlite_manager_persists_across_instances() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("provenance.db");

    {
        let mut manager = ProvenanceManager::new(ProvenanceConfig::persistent(&db_path)).unwrap();
        ingest_document_chunk_entity(&mut manager);
    }

    assert!(db_path.exists());

    let manager = ProvenanceManager::new(ProvenanceConfig::persistent(&db_path)).unwrap();
    let entity = manager.get_provenance("entity_1").unwrap().unwrap();
    assert_eq!(entity.metadata["text"], json!("Ada Lovelace"));
    assert_eq!(entity.parent_entity_id.as_deref(), Some("chunk_1"));
    assert_eq!(manager.verify_entry("entity_1").unwrap(), Some(true));

    let lineage = manager.get_lineage("entity_1").unwrap();
    assert_eq!(lineage.depth, 3);

    let chunk = manager.get_provenance("chunk_1").unwrap().unwrap();
    assert_eq!(chunk.start_index, Some(0));
    assert_eq!(chunk.end_index, Some(512));
}

#[test]
fn test_sqlite_first_seen_survives_upsert() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("provenance.db");
    let mut manager = ProvenanceManager::new(ProvenanceConfig::persistent(&db_path)).unwrap();

    let first = manager.track_entity("e1", "a.pdf", TrackOptions::new()).unwrap();
    std::thread::sleep(std::time::Duration::from_millis(2));
    manager.track_entity("e1", "b.pdf", TrackOptions::new()).unwrap();

    let stored = manager.get_provenance("e1").unwrap().unwrap();
    assert_eq!(stored.first_seen, Some(first.timestamp));
    assert_eq!(stored.source_document.as_deref(), Some("b.pdf"));
}

#[test]
fn test_batches_feed_statistics() {
    let mut manager = ProvenanceManager::in_memory();
    manager
        .track_entity("doc_1", "file.pdf", TrackOptions::new().entity_type("document"))
        .unwrap();

    let chunks = vec![
        ChunkRecord::new("c1", ChunkSpan::new(0, 100).with_parent("doc_1")),
        ChunkRecord::new("c2", ChunkSpan::new(100, 200).with_parent("doc_1")),
    ];
    assert_eq!(manager.track_chunks_batch(&chunks, "doc_1").unwrap(), 2);

    let mut ada = EntityRecord::new("ada");
    ada.entity_type = Some("person".to_string());
    ada.text = Some("Ada".to_string());
    let entities = vec![ada, EntityRecord::new("babbage")];
    assert_eq!(manager.track_entities_batch(&entities, "c1").unwrap(), 2);

    let stats = manager.get_statistics().unwrap();
    assert_eq!(stats.total_entries, 5);
    assert_eq!(stats.entity_types.get("chunk"), Some(&2));
    assert_eq!(stats.entity_types.get("person"), Some(&1));
    assert_eq!(stats.entity_types.get("entity"), Some(&1));

    let lineage = manager.get_lineage("ada").unwrap();
    assert_eq!(lineage.depth, 3, "ada -> c1 -> doc_1");
}

#[test]
fn test_property_conflicts_round_trip_through_sqlite() {
    let dir = TempDir::new().unwrap();
    let mut manager =
        ProvenanceManager::new(ProvenanceConfig::persistent(dir.path().join("p.db"))).unwrap();

    let census = SourceReference::new("census_2020.csv")
        .with_section("Table 3")
        .with_timestamp("2020-04-01T00:00:00Z")
        .with_confidence(0.99);
    let wiki = SourceReference::new("wiki.html").with_confidence(0.5);

    manager
        .track_property_source("springfield", "population", json!(30720), &census, Metadata::new())
        .unwrap();
    manager
        .track_property_source("springfield", "population", json!(31000), &wiki, Metadata::new())
        .unwrap();

    let entry = manager
        .get_provenance("springfield:population:census_2020.csv")
        .unwrap()
        .unwrap();
    assert_eq!(entry.first_seen.as_deref(), Some("2020-04-01T00:00:00Z"));
    assert_eq!(entry.source_location.as_deref(), Some("section Table 3"));

    let sources = manager.get_property_sources("springfield").unwrap();
    assert_eq!(sources.len(), 2);
    let best = sources
        .iter()
        .max_by(|a, b| a.aggregate_confidence().total_cmp(&b.aggregate_confidence()))
        .unwrap();
    assert_eq!(best.value, json!(30720));
    assert_eq!(best.sources[0], census);
}

#[test]
fn test_bridge_chain_lineage_reaches_measurement() {
    let mut manager = ProvenanceManager::in_memory();
    manager
        .track_entity("plot_7", "survey_2024.csv", TrackOptions::new().entity_type("measurement"))
        .unwrap();

    let axioms = vec![
        BridgeAxiom::new("BA-C", "Biomass to carbon", 0.346)
            .with_source("10.1000/carbon", Some("3"))
            .with_confidence(0.9),
        BridgeAxiom::new("BA-CO2", "Carbon to CO2e", 3.67)
            .with_source("10.1000/co2", None)
            .with_confidence(0.95),
    ];
    for axiom in &axioms {
        axiom.register(&mut manager).unwrap();
    }

    let chain = create_translation_chain(
        &ChainInput::new("plot_7", 463.0).with_source("survey_2024.csv"),
        &axioms,
        Some(&mut manager),
    );
    assert_eq!(chain.confidence(), 0.9);
    let expected = 463.0 * 0.346 * 3.67;
    assert!((chain.final_value().unwrap() - expected).abs() < 1e-9);

    let final_entity = chain.final_entity().unwrap().to_string();
    let lineage = manager.get_lineage(&final_entity).unwrap();
    for id in ["plot_7", "BA-C", "BA-CO2", "plot_7_transformed_BA-C"] {
        assert!(lineage.contains(id), "Lineage should reach {}", id);
    }

    let trace = trace_translation_chain(&chain, &manager).unwrap();
    assert_eq!(trace.chain_id, chain.chain_id());
    for doc in ["survey_2024.csv", "10.1000/carbon", "10.1000/co2"] {
        assert!(trace.source_documents.contains(&doc.to_string()));
    }
}

#[test]
fn test_clear_empties_sqlite_backend() {
    let dir = TempDir::new().unwrap();
    let mut manager =
        ProvenanceManager::new(ProvenanceConfig::persistent(dir.path().join("p.db"))).unwrap();
    ingest_document_chunk_entity(&mut manager);

    assert_eq!(manager.clear().unwrap(), 3);
    assert_eq!(manager.get_statistics().unwrap().total_entries, 0);
    assert!(manager.get_lineage("entity_1").unwrap().is_empty());
}
