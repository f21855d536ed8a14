use std::sync::Arc;

use axum::{
    Json, Router, debug_handler,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pokedex_lookup::{
    ApiClient, LookupCache, SearchOutcome, Session, Suggester, Theme, ThemeStore, load_config,
};

struct AppState {
    session: Session,
    suggester: Suggester,
    themes: ThemeStore,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the `axum::rejection`
                // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
                format!(
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let cache = Arc::new(LookupCache::new());
    let client = match ApiClient::new(&config.api, cache) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to build API client: {}", e);
            std::process::exit(1);
        }
    };

    let suggester = Suggester::preload(&client, &config.suggest).await;

    let themes = ThemeStore::new(&config.theme.store_path);
    tracing::info!("Theme preference at startup: {}", themes.load().as_str());

    let state = AppState {
        session: Session::new(client, &config),
        suggester,
        themes,
    };
    let app_state = Arc::new(state);

    let app = Router::new()
        .route("/card/{name}", get(get_card_handler))
        .route("/current", get(get_current_handler))
        .route("/suggest/{prefix}", get(get_suggest_handler))
        .route("/theme", get(get_theme_handler).put(set_theme_handler))
        .with_state(app_state);

    let listener = match tokio::net::TcpListener::bind("0.0.0.0:3000").await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind to address 0.0.0.0:3000: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

#[debug_handler]
async fn get_card_handler(
    State(app_state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> (StatusCode, Json<Value>) {
    match app_state.session.search(&name).await {
        Ok(outcome) => {
            if matches!(outcome, SearchOutcome::Superseded(_)) {
                tracing::debug!("Returning superseded card for {}", name);
            }
            match serde_json::to_value(outcome.card()) {
                Ok(card) => (StatusCode::OK, Json(card)),
                Err(e) => {
                    tracing::error!("Failed to serialize card for {}: {}", name, e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({ "error": "Internal error" })),
                    )
                }
            }
        }
        Err(e) => {
            // Transient upstream failures are deliberately indistinguishable
            // from a true not-found here; the cause is already logged.
            tracing::debug!("Lookup failed for {}: {}", name, e);
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Pokémon not found" })),
            )
        }
    }
}

#[debug_handler]
async fn get_current_handler(State(app_state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    match app_state.session.current() {
        Some(card) => match serde_json::to_value(&card) {
            Ok(card) => (StatusCode::OK, Json(card)),
            Err(e) => {
                tracing::error!("Failed to serialize current card: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal error" })),
                )
            }
        },
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "No Pokémon resolved yet" })),
        ),
    }
}

#[debug_handler]
async fn get_suggest_handler(
    State(app_state): State<Arc<AppState>>,
    Path(prefix): Path<String>,
) -> Json<Vec<String>> {
    Json(app_state.suggester.suggest(&prefix))
}

#[derive(Deserialize)]
struct ThemePayload {
    theme: Theme,
}

#[debug_handler]
async fn get_theme_handler(State(app_state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "theme": app_state.themes.load().as_str() }))
}

#[debug_handler]
async fn set_theme_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<ThemePayload>,
) -> (StatusCode, Json<Value>) {
    match app_state.themes.store(payload.theme) {
        Ok(()) => (StatusCode::OK, Json(json!({ "theme": payload.theme.as_str() }))),
        Err(e) => {
            tracing::error!("Failed to store theme preference: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to store theme" })),
            )
        }
    }
}
