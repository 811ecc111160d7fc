//! Staff authentication: a fixed credential table and expiring session tokens.

pub mod credentials;
pub mod sessions;

pub use credentials::CredentialTable;
pub use sessions::{AuthSession, SessionManager};
