/// End-to-End tests for the connect sequence
///
/// Covers the version handshake, the initial tree sync and the Control
/// connection limit, exchanging real frames through a LocalTransport.

use confproto_client::{mirror::MirroredObject, ClientConfig, ConfigClientError};
use confproto_server::ServerConfig;
use confproto_shared::{
    ClientType, ComponentKind, GlobalId, ProtocolConfig, ProtocolError, RejectReason,
    CURRENT_PROTOCOL_VERSION,
};
use confproto_test::{assert_mirror_synced, init_logging, TestClient, TestServer, TestTree};

fn server() -> TestServer {
    init_logging();
    let root = GlobalId::new("/root");
    TestServer::new(TestTree::new("root").with_sub_device(&root, "sub"))
}

/// The mirror built on connect serializes exactly like the server's tree.
#[test]
fn mirror_matches_server_after_connect() {
    let server = server();
    let client = TestClient::control(&server, "alice");

    assert_mirror_synced!(server, client);

    let root = client.mirrored_root().expect("client should mirror the root");
    assert_eq!(root.global_id(), &GlobalId::new("/client/root"));
    assert_eq!(root.remote_global_id(), &GlobalId::new("/root"));
}

/// Mirrors carry both their local id and the id of the server component.
#[test]
fn mirrors_map_between_local_and_remote_ids() {
    let server = server();
    let client = TestClient::control(&server, "alice");

    let remote = GlobalId::new("/root/Dev/sub");
    let mirror = client.mirrored(&remote).expect("sub-device should be mirrored");
    assert_eq!(mirror.kind(), &ComponentKind::Device);
    assert_eq!(mirror.global_id(), &GlobalId::new("/client/root/Dev/sub"));
    assert_eq!(client.local_id(&remote), GlobalId::new("/client/root/Dev/sub"));
    assert!(client.find(&GlobalId::new("/client/root/IO/ch0/Sig/ai")).is_some());
}

/// The type registry arrives with the tree in the same round trip.
#[test]
fn type_manager_is_loaded_on_connect() {
    let server = server();
    let client = TestClient::control(&server, "alice");

    assert!(client.type_manager().contains("Range"));
    assert_eq!(client.type_manager().len(), 1);
}

/// Without a request the highest common version is negotiated.
#[test]
fn negotiates_highest_common_version() {
    let server = server();
    let client = TestClient::control(&server, "alice");
    assert_eq!(client.protocol_version(), Some(CURRENT_PROTOCOL_VERSION));

    init_logging();
    let old_server = TestServer::with_config(
        ServerConfig {
            protocol: ProtocolConfig::with_versions(&[0, 1]),
            ..ServerConfig::default()
        },
        TestTree::new("root"),
    );
    let client = TestClient::control(&old_server, "alice");
    assert_eq!(client.protocol_version(), Some(1));
}

/// A requested version is used as long as both peers support it.
#[test]
fn requested_version_is_honored() {
    let server = server();
    let mut client = server.connect(ClientConfig {
        requested_protocol_version: Some(2),
        ..ClientConfig::default()
    });

    assert_eq!(client.protocol_version(), Some(2));

    // locking arrived in version 3
    let result = client.lock(&GlobalId::new("/root"));
    assert!(
        matches!(
            result,
            Err(ConfigClientError::Protocol(ProtocolError::MethodNotSupported { .. }))
        ),
        "Lock should be refused locally on a version 2 connection, got {:?}",
        result
    );
}

/// Peers without a common version never reach the Connect call.
#[test]
fn connect_fails_without_common_version() {
    init_logging();
    let server = TestServer::with_config(
        ServerConfig {
            protocol: ProtocolConfig::with_versions(&[7, 8]),
            ..ServerConfig::default()
        },
        TestTree::new("root"),
    );

    let result = TestClient::connect(&server, ClientConfig::default());
    assert!(matches!(
        result,
        Err(ConfigClientError::Protocol(ProtocolError::NoCommonVersion { .. }))
    ));
}

/// A requested version the server lacks is an error, not a silent fallback.
#[test]
fn unsupported_requested_version_fails() {
    let server = server();
    let result = TestClient::connect(
        &server,
        ClientConfig {
            requested_protocol_version: Some(CURRENT_PROTOCOL_VERSION + 1),
            ..ClientConfig::default()
        },
    );
    assert!(matches!(
        result,
        Err(ConfigClientError::Protocol(ProtocolError::UnsupportedVersion { .. }))
    ));
}

/// Control clients over the limit are rejected; ViewOnly clients are not
/// counted.
#[test]
fn control_connection_limit_rejects_extra_clients() {
    init_logging();
    let server = TestServer::with_config(
        ServerConfig {
            max_control_connections: Some(1),
            ..ServerConfig::default()
        },
        TestTree::new("root"),
    );

    let _first = TestClient::control(&server, "alice");

    let second = TestClient::connect(
        &server,
        ClientConfig {
            user: "bob".to_string(),
            ..ClientConfig::default()
        },
    );
    match second {
        Err(ConfigClientError::Protocol(ProtocolError::ConnectionRejected { reason })) => {
            assert_eq!(reason, RejectReason::ControlConnectionLimit { limit: 1 });
        }
        Err(other) => panic!("Expected ConnectionRejected, got {:?}", other),
        Ok(_) => panic!("Second control client should have been rejected"),
    }

    let viewer = TestClient::connect(
        &server,
        ClientConfig {
            user: "carol".to_string(),
            client_type: ClientType::ViewOnly,
            ..ClientConfig::default()
        },
    );
    assert!(viewer.is_ok(), "ViewOnly clients are not limited");
}

/// Dropping a client releases its server-side connection.
#[test]
fn dropped_client_releases_connection() {
    let server = server();
    {
        let _client = TestClient::control(&server, "alice");
        assert_eq!(server.connection_count(), 1);
    }
    assert_eq!(server.connection_count(), 0);
}

/// GetSerializedRootDevice returns what Connect mirrored.
#[test]
fn serialized_root_device_matches_mirror() {
    let server = server();
    let mut client = TestClient::control(&server, "alice");

    let root = client
        .get_serialized_root_device()
        .expect("GetSerializedRootDevice should succeed");
    assert_eq!(root, client.snapshot());
}
