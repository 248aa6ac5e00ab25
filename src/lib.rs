//! Library crate for the odd-one-out backend: the client-side game engine
//! (catalog, identity, state machine, views) and the session store it runs
//! against, exposed for binaries and integration tests.

pub mod catalog;
pub mod config;
pub mod dao;
pub mod dto;
pub mod error;
pub mod identity;
pub mod routes;
pub mod services;
pub mod state;
