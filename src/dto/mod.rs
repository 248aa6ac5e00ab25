//! Request and response payloads exposed by the store node routes.

pub mod health;
pub mod session;
pub mod sse;
pub mod validation;
