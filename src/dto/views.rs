//! View models returned by the game routes. Each form view carries the
//! forgery token the client must echo back when submitting.

use indexmap::IndexMap;
use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::{
    game::{GameDetails, GameForm, GameSummary, PlatformSummary},
    options::SelectOption,
};

/// Create or edit form, either blank or re-rendered after a rejected submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameFormView {
    /// Forgery token to echo back on submit.
    pub csrf_token: String,
    /// Game being shown.
    pub game: GameForm,
    /// Genre selector.
    pub genres: Vec<SelectOption>,
    /// Diagnostics keyed by form field; empty on a fresh form.
    #[schema(value_type = Object)]
    pub errors: IndexMap<String, Vec<String>>,
}

/// Edit form of an existing game.
#[derive(Debug, Serialize, ToSchema)]
pub struct EditGameView {
    /// Forgery token to echo back on submit.
    pub csrf_token: String,
    /// Game being shown.
    pub game: GameSummary,
    /// Platforms currently associated.
    pub platforms: Vec<PlatformSummary>,
    /// Platforms not yet associated, for the "add platform" selector.
    pub available_platforms: Vec<SelectOption>,
    /// Genre selector.
    pub genres: Vec<SelectOption>,
}

/// Delete confirmation page.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteGameView {
    /// Forgery token to echo back on submit.
    pub csrf_token: String,
    /// Game being shown.
    pub game: GameDetails,
}
