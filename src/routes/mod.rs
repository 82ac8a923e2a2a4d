use axum::{Router, middleware};

use crate::{error::AppError, state::SharedState};

/// Swagger UI and OpenAPI document.
pub mod docs;
/// Game catalog pages and form submissions.
pub mod games;
/// Health check route.
pub mod health;
pub mod protection;

/// Compose all route trees, wiring in shared state, sessions and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    health::router()
        .merge(games::router())
        .merge(docs::router())
        .fallback(unknown_route)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            protection::attach_session,
        ))
        .with_state(state)
}

async fn unknown_route() -> AppError {
    AppError::NotFound("no such route".into())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{Body, to_bytes},
        http::{Request, Response, StatusCode, header},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::{
        dao::catalog_store::{
            CatalogStore,
            sqlite::{SqliteCatalogStore, SqliteConfig},
        },
        routes::protection::{CSRF_HEADER, SESSION_COOKIE},
        state::AppState,
    };

    async fn test_state() -> SharedState {
        let store = SqliteCatalogStore::connect(SqliteConfig::in_memory().unwrap())
            .await
            .unwrap();
        CatalogStore::seed_reference_data(
            &store,
            vec!["RPG".into(), "Action".into()],
            vec!["SNES".into(), "PC".into()],
        )
        .await
        .unwrap();
        AppState::new(Arc::new(store))
    }

    async fn json_body(response: Response<Body>) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Open a session through the create form and return `(cookie, token)`.
    async fn open_session(state: &SharedState) -> (String, String) {
        let response = router(state.clone())
            .oneshot(
                Request::get("/games/create")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();
        assert!(cookie.starts_with(SESSION_COOKIE));

        let view = json_body(response).await;
        let token = view["csrf_token"].as_str().unwrap().to_string();
        (cookie, token)
    }

    fn form_post(uri: &str, cookie: Option<&str>, body: String) -> Request<Body> {
        let mut builder = Request::post(uri).header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        );
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body)).unwrap()
    }

    async fn rpg_id(state: &SharedState) -> i64 {
        state
            .store()
            .list_genres()
            .await
            .unwrap()
            .into_iter()
            .find(|genre| genre.name == "RPG")
            .unwrap()
            .id
    }

    async fn snes_id(state: &SharedState) -> i64 {
        state
            .store()
            .list_platforms()
            .await
            .unwrap()
            .into_iter()
            .find(|platform| platform.name == "SNES")
            .unwrap()
            .id
    }

    async fn create_chrono_trigger(state: &SharedState, cookie: &str, token: &str) -> i64 {
        let genre = rpg_id(state).await;
        let body = format!(
            "csrf_token={token}&Name=Chrono+Trigger&Image=ct.png&ReleaseYear=1995&GenreId={genre}"
        );
        let response = router(state.clone())
            .oneshot(form_post("/games/create", Some(cookie), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        state.store().list_games().await.unwrap()[0].game.id
    }

    #[tokio::test]
    async fn create_without_token_is_forbidden_and_persists_nothing() {
        let state = test_state().await;
        let (cookie, _token) = open_session(&state).await;

        let response = router(state.clone())
            .oneshot(form_post(
                "/games/create",
                Some(&cookie),
                "Name=Chrono+Trigger&ReleaseYear=1995&GenreId=1".into(),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(state.store().list_games().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn token_from_another_session_is_rejected() {
        let state = test_state().await;
        let (cookie, _) = open_session(&state).await;
        let (_, foreign_token) = open_session(&state).await;

        let response = router(state.clone())
            .oneshot(form_post(
                "/games/create",
                Some(&cookie),
                format!("csrf_token={foreign_token}&Name=Chrono+Trigger&ReleaseYear=1995&GenreId=1"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(state.store().list_games().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn valid_create_redirects_to_list() {
        let state = test_state().await;
        let (cookie, token) = open_session(&state).await;
        let id = create_chrono_trigger(&state, &cookie, &token).await;

        let response = router(state.clone())
            .oneshot(Request::get("/games").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let games = json_body(response).await;
        assert_eq!(games[0]["id"], id);
        assert_eq!(games[0]["name"], "Chrono Trigger");
        assert_eq!(games[0]["genre"]["name"], "RPG");
    }

    #[tokio::test]
    async fn token_header_is_accepted() {
        let state = test_state().await;
        let (cookie, token) = open_session(&state).await;
        let id = create_chrono_trigger(&state, &cookie, &token).await;

        let request = Request::post(format!("/games/delete/{id}"))
            .header(header::COOKIE, &cookie)
            .header(CSRF_HEADER, &token)
            .body(Body::empty())
            .unwrap();
        let response = router(state.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/games");
        assert!(state.store().list_games().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_form_is_rendered_back_with_errors() {
        let state = test_state().await;
        let (cookie, token) = open_session(&state).await;

        let response = router(state.clone())
            .oneshot(form_post(
                "/games/create",
                Some(&cookie),
                format!("csrf_token={token}&Name=&Image=x.png&ReleaseYear=soon&GenreId=1"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let view = json_body(response).await;
        assert_eq!(view["csrf_token"], token.as_str());
        assert_eq!(view["game"]["ReleaseYear"], "soon");
        assert_eq!(view["game"]["Image"], "x.png");
        assert!(view["errors"]["Name"].is_array());
        assert!(view["errors"]["ReleaseYear"].is_array());
        assert_eq!(view["genres"].as_array().unwrap().len(), 2);
        assert!(state.store().list_games().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unparsable_or_unknown_ids_are_not_found() {
        let state = test_state().await;

        for uri in ["/games/abc", "/games/999", "/games/edit/abc", "/games/delete/42"] {
            let response = router(state.clone())
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn edit_with_mismatched_body_id_is_not_found() {
        let state = test_state().await;
        let (cookie, token) = open_session(&state).await;
        let id = create_chrono_trigger(&state, &cookie, &token).await;
        let genre = rpg_id(&state).await;

        let response = router(state.clone())
            .oneshot(form_post(
                &format!("/games/edit/{id}"),
                Some(&cookie),
                format!(
                    "csrf_token={token}&Id={}&Name=Renamed&ReleaseYear=1995&GenreId={genre}",
                    id + 1
                ),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let games = state.store().list_games().await.unwrap();
        assert_eq!(games[0].game.name, "Chrono Trigger");
    }

    #[tokio::test]
    async fn platform_round_trip_through_edit_form() {
        let state = test_state().await;
        let (cookie, token) = open_session(&state).await;
        let id = create_chrono_trigger(&state, &cookie, &token).await;
        let snes = snes_id(&state).await;

        let response = router(state.clone())
            .oneshot(form_post(
                &format!("/games/{id}/platforms/add"),
                Some(&cookie),
                format!("csrf_token={token}&platformId={snes}"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            format!("/games/edit/{id}").as_str()
        );

        let request = Request::get(format!("/games/edit/{id}"))
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap();
        let response = router(state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        let view = json_body(response).await;
        assert_eq!(view["platforms"][0]["name"], "SNES");
        let available = view["available_platforms"].as_array().unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0]["text"], "PC");
    }

    #[tokio::test]
    async fn healthcheck_reports_ok_without_opening_a_session() {
        let state = test_state().await;
        let response = router(state.clone())
            .oneshot(Request::get("/healthcheck").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert!(body.get("storage_error").is_none());
        assert_eq!(state.sessions().len(), 0);
    }

    #[tokio::test]
    async fn cookieless_reads_do_not_grow_the_session_registry() {
        let state = test_state().await;

        for _ in 0..200 {
            for uri in ["/healthcheck", "/games", "/api-doc/openapi.json"] {
                let response = router(state.clone())
                    .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                    .await
                    .unwrap();
                assert_eq!(response.status(), StatusCode::OK, "{uri}");
                assert!(response.headers().get(header::SET_COOKIE).is_none());
            }
        }

        assert_eq!(state.sessions().len(), 0);
    }

    #[tokio::test]
    async fn post_without_session_is_forbidden_and_opens_none() {
        let state = test_state().await;

        let response = router(state.clone())
            .oneshot(form_post(
                "/games/create",
                None,
                "csrf_token=whatever&Name=Chrono+Trigger&ReleaseYear=1995&GenreId=1".into(),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(state.sessions().len(), 0);
        assert!(state.store().list_games().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn mutations_without_token_are_forbidden_and_change_nothing() {
        let state = test_state().await;
        let (cookie, token) = open_session(&state).await;
        let id = create_chrono_trigger(&state, &cookie, &token).await;
        let snes = snes_id(&state).await;
        state.store().add_platform(id, snes).await.unwrap();

        for (uri, body) in [
            (format!("/games/{id}/platforms/add"), "platformId=2".to_string()),
            (format!("/games/{id}/platforms/remove"), format!("platformId={snes}")),
            (format!("/games/delete/{id}"), String::new()),
        ] {
            let response = router(state.clone())
                .oneshot(form_post(&uri, Some(&cookie), body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
        }

        assert!(state.store().game_exists(id).await.unwrap());
        let platforms = state.store().game_platforms(id).await.unwrap();
        assert_eq!(platforms.len(), 1);
        assert_eq!(platforms[0].id, snes);
    }

    #[tokio::test]
    async fn non_numeric_platform_id_is_bad_request() {
        let state = test_state().await;
        let (cookie, token) = open_session(&state).await;
        let id = create_chrono_trigger(&state, &cookie, &token).await;

        let response = router(state.clone())
            .oneshot(form_post(
                &format!("/games/{id}/platforms/add"),
                Some(&cookie),
                format!("csrf_token={token}&platformId=snes"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(state.store().game_platforms(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_edit_is_rendered_back_and_changes_nothing() {
        let state = test_state().await;
        let (cookie, token) = open_session(&state).await;
        let id = create_chrono_trigger(&state, &cookie, &token).await;
        let genre = rpg_id(&state).await;

        let response = router(state.clone())
            .oneshot(form_post(
                &format!("/games/edit/{id}"),
                Some(&cookie),
                format!("csrf_token={token}&Id={id}&Name=&ReleaseYear=19x5&GenreId={genre}"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let view = json_body(response).await;
        assert_eq!(view["game"]["Id"], id.to_string().as_str());
        assert_eq!(view["game"]["ReleaseYear"], "19x5");
        assert!(view["errors"]["Name"].is_array());
        assert!(view["errors"]["ReleaseYear"].is_array());
        let selected: Vec<&Value> = view["genres"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|option| option["selected"] == true)
            .collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0]["value"], genre);

        let stored = state.store().find_game(id).await.unwrap().unwrap();
        assert_eq!(stored.game.name, "Chrono Trigger");
        assert_eq!(stored.game.release_year, 1995);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let state = test_state().await;
        let response = router(state)
            .oneshot(
                Request::get("/api-doc/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let doc = json_body(response).await;
        assert!(doc["paths"]["/games/edit/{id}"]["post"].is_object());
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let state = test_state().await;
        let response = router(state)
            .oneshot(Request::get("/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
