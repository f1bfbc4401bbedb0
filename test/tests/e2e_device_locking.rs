/// End-to-End tests for device locking
///
/// Locks are per user and cover the locked device's whole subtree. Lock state
/// changes are mirrored on every client.

use confproto_client::mirror::{MirroredDevice, MirroredObject};
use confproto_shared::{json, ErrorCode, GlobalId};
use confproto_test::{
    assert_mirror_synced, assert_remote_error, init_logging, TestClient, TestServer, TestTree,
};

fn sub_device() -> GlobalId {
    GlobalId::new("/root/Dev/sub")
}

fn server() -> TestServer {
    init_logging();
    let root = GlobalId::new("/root");
    TestServer::new(TestTree::new("root").with_sub_device(&root, "sub"))
}

fn mirrored_lock(client: &TestClient, device: &GlobalId) -> bool {
    client
        .mirrored(device)
        .and_then(|mirror| mirror.as_any().downcast_ref::<MirroredDevice>())
        .map(MirroredDevice::is_locked)
        .expect("device should be mirrored as a MirroredDevice")
}

/// Unlock by a non-owner is denied and the lock stays; ForceUnlock clears it.
#[test]
fn unlock_by_other_user_is_denied_until_forced() {
    let server = server();
    let mut alice = TestClient::control(&server, "alice");
    let mut bob = TestClient::control(&server, "bob");

    alice.lock(&sub_device()).unwrap();
    assert!(server.is_locked(&sub_device()));

    assert_remote_error!(bob.unlock(&sub_device()), ErrorCode::AccessDenied);
    assert!(server.is_locked(&sub_device()));

    bob.force_unlock(&sub_device()).unwrap();
    assert!(!server.is_locked(&sub_device()));
}

/// Writes below a device locked by someone else fail with DeviceLocked.
#[test]
fn locked_device_refuses_other_users() {
    let server = server();
    let mut alice = TestClient::control(&server, "alice");
    let mut bob = TestClient::control(&server, "bob");

    alice.lock(&sub_device()).unwrap();

    assert_remote_error!(
        bob.set_property_value(&sub_device(), "Location", json!("bob's desk")),
        ErrorCode::DeviceLocked
    );
    assert_eq!(server.property(&sub_device(), "Location"), json!(""));

    alice
        .set_property_value(&sub_device(), "Location", json!("alice's desk"))
        .unwrap();
    assert_eq!(server.property(&sub_device(), "Location"), json!("alice's desk"));

    // the root is not covered by a lock on its child
    bob.set_property_value(&GlobalId::new("/root"), "Location", json!("lab"))
        .unwrap();
}

/// Locking a parent fails while a child device is held by someone else.
#[test]
fn parent_lock_conflicts_with_child_lock() {
    let server = server();
    let mut alice = TestClient::control(&server, "alice");
    let mut bob = TestClient::control(&server, "bob");

    alice.lock(&sub_device()).unwrap();
    assert_remote_error!(bob.lock(&GlobalId::new("/root")), ErrorCode::DeviceLocked);
    assert!(!server.is_locked(&GlobalId::new("/root")));
}

/// A lock on a parent device is effective on its sub-devices but can only be
/// released on the parent.
#[test]
fn parent_lock_covers_sub_devices() {
    let server = server();
    let mut alice = TestClient::control(&server, "alice");

    alice.lock(&GlobalId::new("/root")).unwrap();
    assert!(alice.is_locked(&sub_device()).unwrap());
    assert_remote_error!(alice.unlock(&sub_device()), ErrorCode::InvalidState);

    alice.unlock(&GlobalId::new("/root")).unwrap();
    assert!(!alice.is_locked(&sub_device()).unwrap());
}

/// ForceUnlock on a device locked through its parent clears the parent lock.
#[test]
fn force_unlock_below_parent_lock_clears_it() {
    let server = server();
    let mut alice = TestClient::control(&server, "alice");
    let mut bob = TestClient::control(&server, "bob");

    alice.lock(&GlobalId::new("/root")).unwrap();
    bob.force_unlock(&sub_device()).unwrap();

    assert!(!server.is_locked(&sub_device()));
    assert!(!server.is_locked(&GlobalId::new("/root")));

    alice.sync();
    bob.sync();
    assert!(!mirrored_lock(&bob, &GlobalId::new("/root")));
    assert!(!mirrored_lock(&bob, &sub_device()));
    assert_mirror_synced!(server, bob);
}

/// Every client mirrors the lock state of every affected device.
#[test]
fn lock_state_is_mirrored() {
    let server = server();
    let mut alice = TestClient::control(&server, "alice");
    let mut bob = TestClient::control(&server, "bob");

    alice.lock(&GlobalId::new("/root")).unwrap();
    alice.sync();
    bob.sync();

    assert!(mirrored_lock(&bob, &GlobalId::new("/root")));
    assert!(mirrored_lock(&bob, &sub_device()));
    assert_mirror_synced!(server, alice);
    assert_mirror_synced!(server, bob);

    bob.force_unlock(&GlobalId::new("/root")).unwrap();
    alice.sync();
    bob.sync();

    assert!(!mirrored_lock(&alice, &sub_device()));
    assert_mirror_synced!(server, alice);
    assert_mirror_synced!(server, bob);
}

/// Locking a non-device component locks its owning device.
#[test]
fn locking_a_component_locks_its_device() {
    let server = server();
    let mut alice = TestClient::control(&server, "alice");

    alice.lock(&GlobalId::new("/root/IO/ch0")).unwrap();
    assert!(server.is_locked(&GlobalId::new("/root")));
}

/// Removing a locked sub-device drops its lock.
#[test]
fn removed_device_loses_its_lock() {
    let server = server();
    let mut alice = TestClient::control(&server, "alice");

    alice.lock(&sub_device()).unwrap();
    alice.remove_device(&GlobalId::new("/root"), "sub").unwrap();

    assert!(!server.is_locked(&sub_device()));
    alice.sync();
    assert_mirror_synced!(server, alice);
}
