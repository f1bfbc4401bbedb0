use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{GlobalId, ParamMap, RemoteError, RequestId};

/// A remote call issued by a client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub id: RequestId,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<GlobalId>,
    #[serde(default)]
    pub params: ParamMap,
}

impl RpcRequest {
    pub fn new(id: RequestId, method: &str) -> Self {
        Self {
            id,
            method: method.to_string(),
            target: None,
            params: ParamMap::new(),
        }
    }

    pub fn with_target(mut self, target: &GlobalId) -> Self {
        self.target = Some(target.clone());
        self
    }

    pub fn with_param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RpcOutcome {
    Ok(Value),
    Err(RemoteError),
}

/// The answer to an [`RpcRequest`], correlated through `id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RpcReply {
    pub id: RequestId,
    pub outcome: RpcOutcome,
}

impl RpcReply {
    pub fn ok(id: RequestId, value: Value) -> Self {
        Self {
            id,
            outcome: RpcOutcome::Ok(value),
        }
    }

    pub fn err(id: RequestId, error: RemoteError) -> Self {
        Self {
            id,
            outcome: RpcOutcome::Err(error),
        }
    }

    pub fn from_result(id: RequestId, result: Result<Value, RemoteError>) -> Self {
        match result {
            Ok(value) => Self::ok(id, value),
            Err(error) => Self::err(id, error),
        }
    }

    pub fn into_result(self) -> Result<Value, RemoteError> {
        match self.outcome {
            RpcOutcome::Ok(value) => Ok(value),
            RpcOutcome::Err(error) => Err(error),
        }
    }
}
