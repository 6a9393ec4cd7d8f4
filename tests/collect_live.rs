//! Live Dataset Client Tests
//!
//! Run against a PostgreSQL server with the pglearned extension installed.
//! They are ignored by default. Run them with
//! `PGL_TEST_DATABASE_URL=... cargo test --test collect_live -- --ignored`.
//!
//! Each test works on its own dataset so they can run in parallel.

use pgl::client::{ClientError, CollectRequest, DatasetClient};

// =============================================================================
// Helper Functions
// =============================================================================

fn live_client() -> DatasetClient {
    let url = std::env::var("PGL_TEST_DATABASE_URL")
        .expect("PGL_TEST_DATABASE_URL must point at a database with pglearned installed");
    DatasetClient::new(url).with_fetch_size(2)
}

/// Fresh dataset holding `queries` trivial queries
fn setup_dataset(client: &DatasetClient, name: &str, queries: usize) {
    let _ = client.delete_dataset(name);
    client.create_dataset(name).unwrap();
    for i in 0..queries {
        client
            .insert_query(name, &format!("SELECT {} AS n", i))
            .unwrap();
    }
}

// =============================================================================
// Collect Tests
// =============================================================================

#[test]
#[ignore = "needs PostgreSQL with pglearned (PGL_TEST_DATABASE_URL)"]
fn test_collect_exact_limit() {
    let client = live_client();
    setup_dataset(&client, "pgl_test_limit", 5);

    let request = CollectRequest::new("pgl_test_limit")
        .with_offset(0)
        .with_limit(2)
        .with_method("default")
        .with_arm(-1);
    let records: Vec<_> = client
        .collect(&request)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_ne!(records[0].id, records[1].id);
    for record in &records {
        assert!(record.plan.is_array() || record.plan.is_object());
    }

    client.delete_dataset("pgl_test_limit").unwrap();
}

#[test]
#[ignore = "needs PostgreSQL with pglearned (PGL_TEST_DATABASE_URL)"]
fn test_collect_zero_limit_is_empty() {
    let client = live_client();
    setup_dataset(&client, "pgl_test_zero", 3);

    let request = CollectRequest::new("pgl_test_zero").with_offset(0).with_limit(0);
    let mut records = client.collect(&request).unwrap();

    assert!(records.next().is_none());
    assert!(records.is_released());

    client.delete_dataset("pgl_test_zero").unwrap();
}

#[test]
#[ignore = "needs PostgreSQL with pglearned (PGL_TEST_DATABASE_URL)"]
fn test_unknown_dataset_is_query_error() {
    let client = live_client();

    let request = CollectRequest::new("pgl_test_does_not_exist").with_offset(0);
    // the function runs on the first fetch, so the error may surface there
    let first_error = match client.collect(&request) {
        Err(e) => Some(e),
        Ok(mut records) => records.next().and_then(Result::err),
    };

    assert!(matches!(first_error, Some(ClientError::Query(_))));
}

#[test]
#[ignore = "needs PostgreSQL with pglearned (PGL_TEST_DATABASE_URL)"]
fn test_unknown_method_is_query_error() {
    let client = live_client();
    setup_dataset(&client, "pgl_test_method", 1);

    let request = CollectRequest::new("pgl_test_method")
        .with_offset(0)
        .with_method("no_such_method");
    let failed = match client.collect(&request) {
        Err(ClientError::Query(_)) => true,
        Err(_) => false,
        Ok(mut records) => matches!(records.next(), Some(Err(ClientError::Query(_)))),
    };
    assert!(failed);

    client.delete_dataset("pgl_test_method").unwrap();
}

#[test]
#[ignore = "needs PostgreSQL with pglearned (PGL_TEST_DATABASE_URL)"]
fn test_repeated_partial_iteration_releases_connections() {
    let client = live_client();
    setup_dataset(&client, "pgl_test_partial", 6);

    // More rounds than a default max_connections would allow if leaked
    for _ in 0..150 {
        let request = CollectRequest::new("pgl_test_partial")
            .with_offset(0)
            .with_limit(6);
        let mut records = client.collect(&request).unwrap();
        assert!(records.next().unwrap().is_ok());
    }

    client.delete_dataset("pgl_test_partial").unwrap();
}

#[test]
#[ignore = "needs PostgreSQL with pglearned (PGL_TEST_DATABASE_URL)"]
fn test_resume_advances_server_position() {
    let client = live_client();
    setup_dataset(&client, "pgl_test_resume", 4);

    let before = position(&client, "pgl_test_resume");
    let request = CollectRequest::new("pgl_test_resume").with_limit(3);
    let count = client.collect(&request).unwrap().count();
    let after = position(&client, "pgl_test_resume");

    assert_eq!(count, 3);
    assert_eq!(after, before + 3);

    client.delete_dataset("pgl_test_resume").unwrap();
}

#[test]
#[ignore = "needs PostgreSQL with pglearned (PGL_TEST_DATABASE_URL)"]
fn test_drain_whole_dataset() {
    let client = live_client();
    setup_dataset(&client, "pgl_test_drain", 5);

    let plans = client
        .drain("pgl_test_drain", false, 2, "default", -1)
        .unwrap();
    assert_eq!(plans.len(), 5);

    client.delete_dataset("pgl_test_drain").unwrap();
}

fn position(client: &DatasetClient, name: &str) -> i64 {
    client
        .list_datasets()
        .unwrap()
        .into_iter()
        .find(|d| d.name == name)
        .map(|d| d.current_pos)
        .unwrap()
}
