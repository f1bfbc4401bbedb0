mod error;
mod message;
mod method;

pub mod params;

pub use error::{ErrorCode, RemoteError};
pub use message::{RpcOutcome, RpcReply, RpcRequest};
pub use method::{MethodScope, RpcMethod};
