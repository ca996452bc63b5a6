use crate::connection::Connection;
use anyhow::Result;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        ConnectInfo, Request, State,
    },
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use codeheist_engine::SessionStore;
use codeheist_protocol::{parse_envelope, serialize_json, Envelope, HealthReport};
use std::net::SocketAddr;
use std::sync::Arc;

pub const SERVICE_NAME: &str = "codeheist";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SessionStore>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(ws_upgrade))
        .route("/health", get(health))
        .layer(middleware::from_fn(cors))
        .with_state(state)
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport::ok(SERVICE_NAME, state.store.len()))
}

async fn ws_upgrade(
    ws: WebSocketUpgrade,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
) -> Response {
    let origin = addr.ip().to_string();
    ws.on_upgrade(move |socket| serve_socket(socket, state.store, origin))
}

async fn serve_socket(mut socket: WebSocket, store: Arc<SessionStore>, origin: String) {
    let (connection, greeting) = Connection::open(store, &origin);
    if let Err(err) = send_all(&mut socket, greeting).await {
        log::warn!("WebSocket write error: {err:#}");
        return;
    }

    while let Some(frame) = socket.recv().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(err) => {
                log::warn!("WebSocket read error: {err}");
                break;
            }
        };
        let envelope = match parse_envelope(&text) {
            Ok(envelope) => envelope,
            Err(err) => {
                log::warn!("WebSocket read error: {err:#}");
                break;
            }
        };
        if let Err(err) = send_all(&mut socket, connection.handle(envelope)).await {
            log::warn!("WebSocket write error: {err:#}");
            break;
        }
    }
    log::info!("WebSocket closed for session {}", connection.session_id());
}

async fn send_all(socket: &mut WebSocket, frames: Vec<Envelope>) -> Result<()> {
    for frame in frames {
        socket.send(Message::Text(serialize_json(&frame)?)).await?;
    }
    Ok(())
}

async fn cors(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        allow_any_origin(response.headers_mut());
        return response;
    }
    let mut response = next.run(request).await;
    allow_any_origin(response.headers_mut());
    response
}

fn allow_any_origin(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeheist_engine::{Catalog, EngineConfig};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn health_reports_live_session_count() {
        let store = Arc::new(SessionStore::new(Catalog::builtin(), EngineConfig::default()));
        store.create("127.0.0.1");
        store.create("127.0.0.2");
        let Json(report) = health(State(AppState { store })).await;
        assert_eq!(report, HealthReport::ok(SERVICE_NAME, 2));
    }

    #[test]
    fn cors_headers_allow_any_origin() {
        let mut headers = HeaderMap::new();
        allow_any_origin(&mut headers);
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(headers[ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap()
            .contains("OPTIONS"));
    }
}
