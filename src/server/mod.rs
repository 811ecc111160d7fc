pub mod server;

pub use server::{bind_socket, build_context, start_server};
pub use crate::jsonrpc::TransportConfig;
