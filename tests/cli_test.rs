//! End-to-end tests of the `smartwaste` binary against a scratch database

use smartwaste_core::{ContainerDetails, ContainerService, Point, SqliteStore, Status};
use std::path::Path;
use std::process::{Command, Output};
use std::sync::Arc;
use tempfile::TempDir;

fn smartwaste(db: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_smartwaste"))
        .arg("--database")
        .arg(db)
        .arg("--log-level")
        .arg("error")
        .args(args)
        .env_remove("SMARTWASTE_DATABASE")
        .env_remove("SMARTWASTE_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run smartwaste binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

async fn open_service(db: &Path) -> (SqliteStore, ContainerService) {
    let store = SqliteStore::open(db.to_str().unwrap()).await.unwrap();
    let service = ContainerService::new(Arc::new(store.clone()));
    (store, service)
}

#[tokio::test]
async fn test_add_and_list_containers() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("waste.db");

    let out = smartwaste(
        &db,
        &["containers", "add", "--lat", "-33.9", "--lon", "18.4", "--capacity", "240"],
    );
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(stdout(&out).contains("Registered container"));

    let (store, service) = open_service(&db).await;
    let containers = service.list().await.unwrap();
    store.close().await;
    assert_eq!(containers.len(), 1);
    assert_eq!(containers[0].location, Point::new(-33.9, 18.4));
    assert_eq!(containers[0].capacity_liters, 240);

    let out = smartwaste(&db, &["containers", "list"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains(&containers[0].id));
}

#[tokio::test]
async fn test_ingest_updates_status() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("waste.db");

    let (store, service) = open_service(&db).await;
    let c = service
        .register(ContainerDetails::new(Point::new(0.0, 0.0), 120))
        .await
        .unwrap();
    store.close().await;

    let out = smartwaste(
        &db,
        &["ingest", "--container", &c.id, "--fill", "85", "--at", "2024-05-01T08:00:00Z"],
    );
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(stdout(&out).contains("high"));

    let (store, service) = open_service(&db).await;
    let updated = service.get(&c.id).await.unwrap();
    let readings = service.readings(&c.id, None).await.unwrap();
    store.close().await;

    assert_eq!(updated.current_status, Some(Status::High));
    assert_eq!(updated.last_fill_level, Some(85));
    assert_eq!(readings.len(), 1);
}

#[tokio::test]
async fn test_invalid_reading_fails_without_changes() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("waste.db");

    let (store, service) = open_service(&db).await;
    let c = service
        .register(ContainerDetails::new(Point::new(0.0, 0.0), 120))
        .await
        .unwrap();
    store.close().await;

    let out = smartwaste(&db, &["ingest", "--container", &c.id, "--fill", "150"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("fill"));

    let (store, service) = open_service(&db).await;
    let after = service.get(&c.id).await.unwrap();
    store.close().await;
    assert_eq!(after.current_status, None);
}

#[test]
fn test_unknown_container_exit_code() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("waste.db");

    let out = smartwaste(&db, &["ingest", "--container", "nope", "--fill", "50"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("containers list"));
}

#[test]
fn test_usage_errors_exit_2() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("waste.db");

    // Rejected by clap
    let out = smartwaste(&db, &["route", "--lat", "0", "--lon", "0", "--status", "full"]);
    assert_eq!(out.status.code(), Some(2));

    // Missing config file
    let out = smartwaste(
        &db,
        &["--config", tmp.path().join("missing.toml").to_str().unwrap(), "containers", "list"],
    );
    assert_eq!(out.status.code(), Some(2));
}

#[tokio::test]
async fn test_route_visits_nearest_first() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("waste.db");

    let (store, service) = open_service(&db).await;
    let far = service
        .register(ContainerDetails::new(Point::new(0.0, 2.0), 120))
        .await
        .unwrap();
    let near = service
        .register(ContainerDetails::new(Point::new(0.0, 1.0), 120))
        .await
        .unwrap();
    let quiet = service
        .register(ContainerDetails::new(Point::new(0.0, 0.5), 120))
        .await
        .unwrap();
    store.close().await;

    for (id, fill) in [(&far.id, "90"), (&near.id, "95"), (&quiet.id, "10")] {
        let out = smartwaste(&db, &["ingest", "--container", id, "--fill", fill]);
        assert!(out.status.success());
    }

    let out = smartwaste(&db, &["route", "--lat", "0", "--lon", "0"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let text = stdout(&out);
    let near_at = text.find(&near.id).expect("near container listed");
    let far_at = text.find(&far.id).expect("far container listed");
    assert!(near_at < far_at);
    assert!(!text.contains(&quiet.id));
    assert!(text.contains("2 stops"));
}

#[test]
fn test_out_of_range_route_start_fails() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("waste.db");

    let out = smartwaste(&db, &["route", "--lat", "95", "--lon", "0"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("latitude"));
}

#[test]
fn test_log_file_failure_warns_and_continues() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("waste.db");
    let log = tmp.path().join("no-such-dir").join("smartwaste.log");

    let out = smartwaste(
        &db,
        &["--log", log.to_str().unwrap(), "containers", "list"],
    );
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Failed to initialize logging"));
}
