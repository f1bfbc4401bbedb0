mod context;
mod dispatcher;
mod handlers;

pub use context::RpcContext;
pub use dispatcher::Dispatcher;
