/// End-to-End tests for client access tiers
///
/// ViewOnly clients may read everything and change nothing; the server state
/// must be untouched by every refused call.

use confproto_shared::{json, ErrorCode, GlobalId, Value};
use confproto_test::{
    assert_mirror_synced, assert_remote_error, init_logging, TestClient, TestServer, TestTree,
};

fn server() -> TestServer {
    init_logging();
    TestServer::new(TestTree::new("root"))
}

/// A ViewOnly write is refused and the server value stays as it was.
#[test]
fn view_only_write_is_denied() {
    let server = server();
    let mut viewer = TestClient::view_only(&server, "viewer");
    let root = GlobalId::new("/root");

    assert_remote_error!(
        viewer.set_property_value(&root, "Location", json!("lab")),
        ErrorCode::AccessDenied
    );
    assert_eq!(server.property(&root, "Location"), json!(""));

    viewer.sync();
    assert_mirror_synced!(server, viewer);
}

/// Every mutating call is refused for ViewOnly clients.
#[test]
fn view_only_mutations_are_all_denied() {
    let server = server();
    let mut viewer = TestClient::view_only(&server, "viewer");
    let root = GlobalId::new("/root");

    assert_remote_error!(viewer.lock(&root), ErrorCode::AccessDenied);
    assert_remote_error!(viewer.begin_update(&root), ErrorCode::AccessDenied);
    assert_remote_error!(
        viewer.add_function_block(&root, "mockfb1", Value::Null),
        ErrorCode::AccessDenied
    );
    assert_remote_error!(
        viewer.set_attribute_value(&root, "Description", json!("bench rig")),
        ErrorCode::AccessDenied
    );
    assert_remote_error!(
        viewer.call_property(&root, "Sum", json!([1, 2])),
        ErrorCode::AccessDenied
    );
    assert_remote_error!(viewer.force_unlock(&root), ErrorCode::AccessDenied);

    assert_eq!(server.function_block_count(&root), 0);
    assert!(!server.is_locked(&root));
}

/// Reads work for ViewOnly clients.
#[test]
fn view_only_reads_are_allowed() {
    let server = server();
    let mut viewer = TestClient::view_only(&server, "viewer");
    let root = GlobalId::new("/root");

    assert_eq!(
        viewer.get_property_value(&root, "SampleRate").unwrap(),
        json!(1000)
    );
    assert_eq!(viewer.is_locked(&root).unwrap(), false);
    assert!(viewer.get_log_file_infos(&root).unwrap().is_array());
}

/// A ViewOnly client still observes changes made by Control clients.
#[test]
fn view_only_client_observes_changes() {
    let server = server();
    let mut viewer = TestClient::view_only(&server, "viewer");
    let mut controller = TestClient::control(&server, "alice");
    let root = GlobalId::new("/root");

    controller
        .set_property_value(&root, "Location", json!("lab"))
        .unwrap();
    viewer.sync();

    assert_eq!(
        viewer.mirrored_property(&root, "Location"),
        Some(json!("lab"))
    );
}

/// Read-only properties need a protected write, which Control clients may
/// issue.
#[test]
fn read_only_property_needs_protected_write() {
    let server = server();
    let mut client = TestClient::control(&server, "alice");
    let root = GlobalId::new("/root");

    assert_remote_error!(
        client.set_property_value(&root, "SerialNumber", json!("SN-9")),
        ErrorCode::AccessDenied
    );
    client
        .set_protected_property_value(&root, "SerialNumber", json!("SN-9"))
        .unwrap();
    assert_eq!(server.property(&root, "SerialNumber"), json!("SN-9"));
}
