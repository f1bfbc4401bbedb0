use std::sync::{Arc, Mutex, MutexGuard};

use confproto_client::ClientConfig;
use confproto_server::{tree::ComponentTree, ConfigServer, ServerConfig, StreamingSignal};
use confproto_shared::{GlobalId, SerializedComponent, SignalNumericId, Value};

use crate::{local_transport::SharedServer, TestClient, TestTree};

/// Test harness for ConfigServer
///
/// Owns a ConfigServer over a [`TestTree`] behind a mutex so any number of
/// [`TestClient`]s can reach it through their own local transports.
#[derive(Clone)]
pub struct TestServer {
    server: SharedServer,
}

impl TestServer {
    pub fn new(tree: TestTree) -> Self {
        Self::with_config(ServerConfig::default(), tree)
    }

    pub fn with_config(config: ServerConfig, tree: TestTree) -> Self {
        Self {
            server: Arc::new(Mutex::new(ConfigServer::new(config, tree))),
        }
    }

    pub fn shared(&self) -> &SharedServer {
        &self.server
    }

    pub fn lock(&self) -> MutexGuard<'_, ConfigServer<TestTree>> {
        self.server.lock().expect("server mutex poisoned")
    }

    /// Runs `change` against the tree, then relays every event it raised.
    pub fn change<R>(&self, change: impl FnOnce(&mut TestTree) -> R) -> R {
        let mut server = self.lock();
        let output = change(server.tree_mut());
        server.relay_events();
        output
    }

    /// Opens a client connection and syncs its mirror below `/client`.
    pub fn connect(&self, config: ClientConfig) -> TestClient {
        TestClient::connect(self, config).expect("client failed to connect")
    }

    // Tree

    pub fn root_id(&self) -> GlobalId {
        self.lock().tree().root_id()
    }

    pub fn serialize(&self, id: &GlobalId) -> SerializedComponent {
        self.lock().tree().serialize(id).expect("component not found")
    }

    /// The root snapshot as clients receive it, lock states included.
    pub fn annotated_root(&self) -> SerializedComponent {
        let server = self.lock();
        let mut root = server
            .tree()
            .serialize(&server.tree().root_id())
            .expect("root not found");
        server.locks().annotate(&mut root);
        root
    }

    pub fn property(&self, id: &GlobalId, name: &str) -> Value {
        self.lock()
            .tree()
            .get_property_value(id, name)
            .expect("property not found")
    }

    pub fn function_block_count(&self, device: &GlobalId) -> usize {
        self.lock().tree().function_block_count(device)
    }

    pub fn is_locked(&self, device: &GlobalId) -> bool {
        self.lock().locks().is_locked(device)
    }

    pub fn connection_count(&self) -> usize {
        self.lock().connection_count()
    }

    // Streaming

    pub fn register_signal(&self, signal: &StreamingSignal) -> SignalNumericId {
        self.lock().register_signal(signal)
    }

    pub fn stream_data(&self, signal: &GlobalId, payload: &[u8]) -> bool {
        self.lock().stream_data(signal, payload.to_vec())
    }
}
