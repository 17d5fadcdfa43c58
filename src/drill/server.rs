// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_DISPOSITION;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::signal::ctrl_c;
use tokio::time::sleep;

use crate::config::Config;
use crate::drill::get::get_handler;
use crate::drill::post::post_handler;
use crate::drill::state::MutableState;
use crate::drill::state::Selection;
use crate::drill::state::ServerState;
use crate::error::Fallible;
use crate::export::export_session;
use crate::generator::generate_batch;
use crate::session::Session;
use crate::types::category::Category;
use crate::types::timestamp::Timestamp;

pub struct ServerOptions {
    pub port: u16,
    /// Seed for problem generation. Random when absent.
    pub seed: Option<u64>,
    pub open_browser: bool,
}

pub async fn start_server(config: Config, options: ServerOptions) -> Fallible<()> {
    config.validate()?;
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let batch = generate_batch(&mut rng, &Category::ALL, config.count, &config)?;
    let session = Session::new(batch, Timestamp::now());

    let state = ServerState {
        mutable: Arc::new(Mutex::new(MutableState {
            rng,
            session,
            count: config.count,
            selection: Selection::All,
            page: 0,
            errors: BTreeMap::new(),
            drafts: BTreeMap::new(),
            notice: None,
        })),
        config,
    };
    let app = Router::new();
    let app = app.route("/", get(get_handler));
    let app = app.route("/", post(post_handler));
    let app = app.route("/export.json", get(export_handler));
    let app = app.route("/style.css", get(stylesheet));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state);
    let bind = format!("127.0.0.1:{}", options.port);

    // Start a separate task to open the browser.
    if options.open_browser {
        let url = format!("http://{bind}/");
        let bind = bind.clone();
        tokio::spawn(async move {
            loop {
                if let Ok(stream) = TcpStream::connect(&bind).await {
                    drop(stream);
                    break;
                }
                sleep(Duration::from_millis(1)).await;
            }
            let _ = open::that(url);
        });
    }

    // Start the server.
    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(&bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::debug!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    match ctrl_c().await {
        Ok(_) => log::debug!("Received Ctrl-C, shutting down."),
        Err(e) => log::error!("Failed to listen for Ctrl-C: {e}"),
    }
}

async fn export_handler(State(state): State<ServerState>) -> Response {
    let json: Fallible<String> = state.lock().and_then(|mutable| {
        let export = export_session(&mutable.session, Timestamp::now());
        Ok(serde_json::to_string_pretty(&export)?)
    });
    match json {
        Ok(json) => (
            StatusCode::OK,
            [
                (CONTENT_TYPE, "application/json"),
                (
                    CONTENT_DISPOSITION,
                    "attachment; filename=\"math_session.json\"",
                ),
            ],
            json,
        )
            .into_response(),
        Err(e) => {
            log::error!("{e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn stylesheet() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, "public, max-age=604800, immutable"),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}
