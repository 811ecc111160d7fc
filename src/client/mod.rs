//! Client-side functionality for CivicAlert
//!
//! Talks to a running server over a Unix domain socket using the same
//! framing as the server.

pub mod transport;

pub use transport::{ConnectionState, JsonRpcClient};

pub use crate::jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
