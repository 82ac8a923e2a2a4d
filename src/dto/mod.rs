/// Game forms, inputs and summaries.
pub mod game;
/// Health check payloads.
pub mod health;
/// Drop-down selector entries.
pub mod options;
/// Field validation helpers.
pub mod validation;
/// View models returned by the game routes.
pub mod views;
