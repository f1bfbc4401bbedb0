/// End-to-End tests for adding and removing function blocks

use confproto_client::mirror::{MirroredFunctionBlock, MirroredObject};
use confproto_shared::{json, ComponentKind, CoreEventId, ErrorCode, GlobalId};
use confproto_test::{
    assert_mirror_synced, assert_remote_error, init_logging, TestClient, TestServer, TestTree,
};

fn root() -> GlobalId {
    GlobalId::new("/root")
}

fn sub_device() -> GlobalId {
    GlobalId::new("/root/Dev/sub")
}

fn server() -> TestServer {
    init_logging();
    TestServer::new(TestTree::new("root").with_sub_device(&root(), "sub"))
}

/// Adding a function block on a sub-device grows the server tree by one and
/// mirrors the new block below the client's root.
#[test]
fn add_function_block_on_sub_device() {
    let server = server();
    let mut alice = TestClient::control(&server, "alice");
    let folder = sub_device().child("FB");

    assert_eq!(server.function_block_count(&sub_device()), 0);
    assert_eq!(alice.mirrored_children(&folder), 0);

    let local = alice
        .add_function_block(&sub_device(), "mockfb1", json!({}))
        .unwrap();

    assert_eq!(local, GlobalId::new("/client/root/Dev/sub/FB/mockfb1_0"));
    assert_eq!(server.function_block_count(&sub_device()), 1);
    assert_eq!(alice.mirrored_children(&folder), 1);

    let remote = GlobalId::new("/root/Dev/sub/FB/mockfb1_0");
    let mirror = alice.find(&local).expect("function block is not mirrored");
    assert_eq!(mirror.remote_global_id(), &remote);
    assert_eq!(mirror.kind(), &ComponentKind::FunctionBlock);
    let block = mirror
        .as_any()
        .downcast_ref::<MirroredFunctionBlock>()
        .expect("mirror is not a function block");
    assert_eq!(block.type_id(), Some("mockfb1"));

    alice.sync();
    assert_mirror_synced!(server, alice);
}

/// Each added block gets the next free local id.
#[test]
fn added_blocks_get_distinct_ids() {
    let server = server();
    let mut alice = TestClient::control(&server, "alice");

    let first = alice.add_function_block(&root(), "mockfb1", json!({})).unwrap();
    let second = alice.add_function_block(&root(), "mockfb1", json!({})).unwrap();
    let other = alice.add_function_block(&root(), "mockfb2", json!({})).unwrap();

    assert_eq!(first.local_id(), "mockfb1_0");
    assert_eq!(second.local_id(), "mockfb1_1");
    assert_eq!(other.local_id(), "mockfb2_0");
    assert_eq!(server.function_block_count(&root()), 3);
}

/// Removal reaches the mirror through its ComponentRemoved notification.
#[test]
fn remove_function_block() {
    let server = server();
    let mut alice = TestClient::control(&server, "alice");
    let folder = sub_device().child("FB");

    alice
        .add_function_block(&sub_device(), "mockfb1", json!({}))
        .unwrap();
    alice.sync();

    alice.remove_function_block(&sub_device(), "mockfb1_0").unwrap();
    assert_eq!(server.function_block_count(&sub_device()), 0);

    let events = alice.sync_core_events();
    assert!(events
        .iter()
        .any(|event| event.id == CoreEventId::ComponentRemoved));
    assert_eq!(alice.mirrored_children(&folder), 0);
    assert_mirror_synced!(server, alice);
}

/// Every other connected client sees exactly one ComponentAdded.
#[test]
fn added_block_fans_out_to_all_clients() {
    let server = server();
    let mut alice = TestClient::control(&server, "alice");
    let mut bob = TestClient::control(&server, "bob");
    let mut carol = TestClient::view_only(&server, "carol");

    alice
        .add_function_block(&sub_device(), "mockfb2", json!({}))
        .unwrap();

    for observer in [&mut bob, &mut carol] {
        let added = observer
            .sync_core_events()
            .into_iter()
            .filter(|event| event.id == CoreEventId::ComponentAdded)
            .count();
        assert_eq!(added, 1, "{} saw {} additions", observer.config().user, added);
        assert!(observer
            .mirrored(&GlobalId::new("/root/Dev/sub/FB/mockfb2_0"))
            .is_some());
        assert_mirror_synced!(server, observer);
    }
}

/// Unknown types and unknown blocks are refused.
#[test]
fn unknown_function_blocks_are_refused() {
    let server = server();
    let mut alice = TestClient::control(&server, "alice");

    assert_remote_error!(
        alice.add_function_block(&root(), "nosuchfb", json!({})),
        ErrorCode::InvalidParameter
    );
    assert_remote_error!(
        alice.remove_function_block(&root(), "mockfb1_9"),
        ErrorCode::NotFound
    );
    assert_eq!(server.function_block_count(&root()), 0);
}

/// The available types are listed by id.
#[test]
fn available_function_block_types_are_listed() {
    let server = server();
    let mut alice = TestClient::control(&server, "alice");

    let types = alice.get_available_function_block_types(&root()).unwrap();
    let types = types.as_object().expect("types are an object");
    assert!(types.contains_key("mockfb1"));
    assert!(types.contains_key("mockfb2"));
}
