//! Library crate for the game catalog, exposing modules for the server and tool binaries.

pub mod config;
/// Persistence: store trait, entities and the SQLite backend.
pub mod dao;
/// Data transfer objects shared by routes and services.
pub mod dto;
/// Service and HTTP error types.
pub mod error;
/// HTTP routes, session middleware and forgery protection.
pub mod routes;
/// Catalog operations behind the routes.
pub mod services;
/// Shared application state.
pub mod state;
