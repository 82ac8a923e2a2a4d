/// OpenAPI documentation generation.
pub mod documentation;
/// Catalog operations on games and their platform associations.
pub mod game_service;
/// Health check service.
pub mod health_service;
