//! End-to-end tests for the extraction pipeline
//!
//! These tests run the full HTTP pipeline against a local mock API:
//! - Multi-page catalog traversal
//! - Detail ordering under uneven latency
//! - Dropped details and fatal page failures
//! - Artifact contents and run-to-run idempotence

use pokedex_common::checksum::{compute_file_checksum, ChecksumAlgorithm};
use pokedex_ingest::{ExtractConfig, ExtractError, ExtractionPipeline, RecordClass};
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Helper to mount one catalog page
async fn mount_page(server: &MockServer, page_path: &str, count: u64, next: Option<&str>, entries: &[(&str, &str)]) {
    let results: Vec<Value> = entries
        .iter()
        .map(|(name, detail_path)| json!({ "name": name, "url": format!("{}{}", server.uri(), detail_path) }))
        .collect();
    let next = next.map(|p| format!("{}{}", server.uri(), p));

    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": count,
            "next": next,
            "previous": null,
            "results": results
        })))
        .mount(server)
        .await;
}

/// Helper to mount one detail payload
async fn mount_detail(server: &MockServer, detail_path: &str, body: Value, delay_ms: u64) {
    Mock::given(method("GET"))
        .and(path(detail_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(body)
                .set_delay(Duration::from_millis(delay_ms)),
        )
        .mount(server)
        .await;
}

fn config(server: &MockServer, output_dir: &Path) -> ExtractConfig {
    ExtractConfig::new()
        .with_base_url(format!("{}/api/v2/", server.uri()))
        .with_output_dir(output_dir)
        .with_timeout(5)
}

fn read_artifact(path: &Path) -> Vec<Value> {
    let body = std::fs::read_to_string(path).expect("artifact should exist");
    serde_json::from_str(&body).expect("artifact should be a JSON array")
}

/// Two pages of pokemon, served from species stubs
async fn mount_pokemon_catalog(server: &MockServer) {
    mount_page(
        server,
        "/api/v2/pokemon-species/",
        2,
        Some("/api/v2/pokemon-species-page-2/"),
        &[("bulbasaur", "/api/v2/pokemon-species/1/")],
    )
    .await;
    mount_page(
        server,
        "/api/v2/pokemon-species-page-2/",
        2,
        None,
        &[("ivysaur", "/api/v2/pokemon-species/2/")],
    )
    .await;

    mount_detail(
        server,
        "/api/v2/pokemon/1/",
        json!({
            "id": 1,
            "order": 1,
            "name": "bulbasaur",
            "height": 7,
            "weight": 69,
            "forms": [{ "name": "bulbasaur" }],
            "species": { "name": "bulbasaur" },
            "stats": [{ "base_stat": 45, "stat": { "name": "hp" } }],
            "types": [
                { "slot": 1, "type": { "name": "grass" } },
                { "slot": 2, "type": { "name": "poison" } }
            ],
            "moves": [{ "move": { "name": "razor-wind" } }],
            "game_indices": [{ "version": { "name": "red" } }]
        }),
        0,
    )
    .await;
    mount_detail(
        server,
        "/api/v2/pokemon/2/",
        json!({
            "id": 2,
            "order": 2,
            "name": "ivysaur",
            "height": 10,
            "weight": 130,
            "forms": [{ "name": "ivysaur" }],
            "species": { "name": "ivysaur" }
        }),
        0,
    )
    .await;
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_two_page_catalog_writes_one_artifact() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_pokemon_catalog(&server).await;

    let pipeline = ExtractionPipeline::with_http(config(&server, dir.path())).unwrap();
    let report = pipeline.run(RecordClass::Pokemon).await.unwrap();

    assert_eq!(report.metadata.extracted, 2);
    assert_eq!(report.metadata.expected, Some(2));
    assert_eq!(report.metadata.pages, 2);
    assert!(report.is_complete());

    let records = read_artifact(&dir.path().join("pokemon.json"));
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["name"], "bulbasaur");
    assert_eq!(records[1]["name"], "ivysaur");

    let bulbasaur = &records[0];
    assert_eq!(bulbasaur["height"], 0.7);
    assert_eq!(bulbasaur["weight"], 6.9);
    assert_eq!(bulbasaur["types"], json!(["grass", "poison"]));
    assert_eq!(bulbasaur["stats"], json!({ "hp": 45 }));
    assert_eq!(bulbasaur["species"], "bulbasaur");

    // Missing optional collections degrade to empty values
    assert_eq!(records[1]["moves"], json!([]));
    assert_eq!(records[1]["stats"], json!({}));
}

#[tokio::test]
async fn test_detail_order_survives_uneven_latency() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let entries: Vec<(String, String)> = (1..=12)
        .map(|i| (format!("move-{}", i), format!("/api/v2/move/{}/", i)))
        .collect();
    let entry_refs: Vec<(&str, &str)> = entries.iter().map(|(n, p)| (n.as_str(), p.as_str())).collect();
    mount_page(&server, "/api/v2/move/", 12, None, &entry_refs).await;

    for (i, (name, detail_path)) in entries.iter().enumerate() {
        // Earlier entries answer last
        let delay = (12 - i as u64) * 15;
        mount_detail(&server, detail_path, json!({ "id": i + 1, "name": name, "pp": 10 }), delay).await;
    }

    let pipeline =
        ExtractionPipeline::with_http(config(&server, dir.path()).with_concurrency(4)).unwrap();
    pipeline.run(RecordClass::Move).await.unwrap();

    let records = read_artifact(&dir.path().join("move.json"));
    let ids: Vec<i64> = records.iter().map(|r| r["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, (1..=12).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_flat_type_catalog_single_request() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    mount_page(
        &server,
        "/api/v2/type/",
        2,
        None,
        &[("normal", "/api/v2/type/1/"), ("fighting", "/api/v2/type/2/")],
    )
    .await;
    mount_detail(
        &server,
        "/api/v2/type/1/",
        json!({
            "id": 1,
            "name": "normal",
            "damage_relations": {
                "half_damage_to": [{ "name": "rock" }, { "name": "steel" }],
                "no_damage_to": [{ "name": "ghost" }],
                "double_damage_from": [{ "name": "fighting" }],
                "no_damage_from": [{ "name": "ghost" }]
            }
        }),
        0,
    )
    .await;
    mount_detail(&server, "/api/v2/type/2/", json!({ "id": 2, "name": "fighting" }), 0).await;

    let pipeline = ExtractionPipeline::with_http(config(&server, dir.path())).unwrap();
    let report = pipeline.run(RecordClass::Type).await.unwrap();
    assert_eq!(report.metadata.pages, 1);

    let records = read_artifact(&dir.path().join("type.json"));
    assert_eq!(records[0]["damage_relations"]["half_damage_to"], json!(["rock", "steel"]));
    assert_eq!(records[0]["damage_relations"]["double_damage_to"], json!([]));
    assert_eq!(records[1]["damage_relations"]["no_damage_from"], json!([]));
}

// ============================================================================
// Failure handling
// ============================================================================

#[tokio::test]
async fn test_failed_details_are_dropped() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    mount_page(
        &server,
        "/api/v2/item/",
        3,
        None,
        &[
            ("master-ball", "/api/v2/item/1/"),
            ("ultra-ball", "/api/v2/item/2/"),
            ("great-ball", "/api/v2/item/3/"),
        ],
    )
    .await;
    mount_detail(&server, "/api/v2/item/1/", json!({ "id": 1, "name": "master-ball", "category": { "name": "standard-balls" } }), 0).await;
    Mock::given(method("GET"))
        .and(path("/api/v2/item/2/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/item/3/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let pipeline = ExtractionPipeline::with_http(config(&server, dir.path())).unwrap();
    let report = pipeline.run(RecordClass::Item).await.unwrap();

    assert_eq!(report.metadata.extracted, 1);
    assert_eq!(report.metadata.expected, Some(3));
    assert!(!report.is_complete());

    let records = read_artifact(&dir.path().join("item.json"));
    assert_eq!(records, vec![json!({ "id": 1, "name": "master-ball", "category": "standard-balls" })]);
}

#[tokio::test]
async fn test_first_page_failure_writes_nothing() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v2/ability/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let pipeline = ExtractionPipeline::with_http(config(&server, dir.path())).unwrap();
    let err = pipeline.run(RecordClass::Ability).await.unwrap_err();

    assert!(matches!(err, ExtractError::PageFetch { class: RecordClass::Ability, .. }));
    assert!(!dir.path().join("ability.json").exists());
}

#[tokio::test]
async fn test_sibling_classes_are_independent() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    mount_page(&server, "/api/v2/ability/", 1, None, &[("static", "/api/v2/ability/9/")]).await;
    mount_detail(
        &server,
        "/api/v2/ability/9/",
        json!({ "id": 9, "name": "static", "pokemon": [{ "pokemon": { "name": "pikachu" } }] }),
        0,
    )
    .await;
    // No move catalog mounted: wiremock answers 404

    let pipeline = ExtractionPipeline::with_http(config(&server, dir.path())).unwrap();
    let results = pipeline.run_all(&[RecordClass::Move, RecordClass::Ability]).await;

    assert!(results[0].1.as_ref().is_err_and(|e| e.is_fetch_failure()));
    assert!(results[1].1.is_ok());
    assert!(!dir.path().join("move.json").exists());

    let abilities = read_artifact(&dir.path().join("ability.json"));
    assert_eq!(abilities[0]["pokemon"], json!(["pikachu"]));
}

#[tokio::test]
async fn test_write_failure_fails_run() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let blocked = dir.path().join("not-a-dir");
    std::fs::write(&blocked, b"file in the way").unwrap();

    mount_page(&server, "/api/v2/item/", 1, None, &[("potion", "/api/v2/item/17/")]).await;
    mount_detail(&server, "/api/v2/item/17/", json!({ "id": 17, "name": "potion" }), 0).await;

    let pipeline = ExtractionPipeline::with_http(config(&server, &blocked)).unwrap();
    let err = pipeline.run(RecordClass::Item).await.unwrap_err();

    assert!(matches!(err, ExtractError::Write { .. }));
}

// ============================================================================
// Idempotence
// ============================================================================

#[tokio::test]
async fn test_repeated_runs_produce_identical_artifacts() {
    let server = MockServer::start().await;
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();

    mount_pokemon_catalog(&server).await;

    let report_a = ExtractionPipeline::with_http(config(&server, first.path()))
        .unwrap()
        .run(RecordClass::Pokemon)
        .await
        .unwrap();
    let report_b = ExtractionPipeline::with_http(config(&server, second.path()))
        .unwrap()
        .run(RecordClass::Pokemon)
        .await
        .unwrap();

    let bytes_a = std::fs::read(first.path().join("pokemon.json")).unwrap();
    let bytes_b = std::fs::read(second.path().join("pokemon.json")).unwrap();
    assert_eq!(bytes_a, bytes_b);
    assert_eq!(report_a.artifact.checksum, report_b.artifact.checksum);
    assert_eq!(
        compute_file_checksum(first.path().join("pokemon.json"), ChecksumAlgorithm::Sha256).unwrap(),
        report_a.artifact.checksum
    );
}
