//! In-process notes API used by the client tests.
//!
//! Mirrors the backend's status codes: ids are UUIDs, an id that does not
//! parse as one is a 500 with the operation's message, an unknown one a 404.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use chrono::Utc;
use notes_types::{
    CreateNoteRequest, NOTE_DELETED, NOTE_NOT_FOUND, Note, TITLE_REQUIRED, UpdateNoteRequest,
};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use uuid::Uuid;

#[derive(Default)]
pub struct StubStore {
    pub notes: Mutex<Vec<Note>>,
    pub update_calls: AtomicUsize,
    pub fail_updates: AtomicBool,
}

impl StubStore {
    pub fn insert(&self, title: &str, content: &str) -> Note {
        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.notes.lock().push(note.clone());
        note
    }

    pub fn get(&self, id: &str) -> Option<Note> {
        self.notes.lock().iter().find(|n| n.id == id).cloned()
    }
}

type Reply = (StatusCode, Json<Value>);

fn reply(status: StatusCode, body: impl serde::Serialize) -> Reply {
    (status, Json(serde_json::to_value(body).unwrap_or(Value::Null)))
}

fn error(status: StatusCode, message: &str) -> Reply {
    (status, Json(json!({ "error": message })))
}

fn not_found() -> Reply {
    error(StatusCode::NOT_FOUND, NOTE_NOT_FOUND)
}

/// Canonical id, or the 500 the backend answers for a malformed one
fn parse_id(id: &str, failure: &str) -> Result<String, Reply> {
    Uuid::parse_str(id.trim())
        .map(|uuid| uuid.to_string())
        .map_err(|_| error(StatusCode::INTERNAL_SERVER_ERROR, failure))
}

async fn list(State(store): State<Arc<StubStore>>) -> Reply {
    let notes = store.notes.lock().clone();
    reply(StatusCode::OK, notes)
}

async fn create(
    State(store): State<Arc<StubStore>>,
    Json(req): Json<CreateNoteRequest>,
) -> Reply {
    let title = req.title.as_deref().map(str::trim).unwrap_or_default();
    if title.is_empty() {
        return error(StatusCode::BAD_REQUEST, TITLE_REQUIRED);
    }
    let note = store.insert(title, req.content.as_deref().unwrap_or_default());
    reply(StatusCode::CREATED, note)
}

async fn get_one(State(store): State<Arc<StubStore>>, Path(id): Path<String>) -> Reply {
    let id = match parse_id(&id, "Failed to fetch note") {
        Ok(id) => id,
        Err(reply) => return reply,
    };
    match store.get(&id) {
        Some(note) => reply(StatusCode::OK, note),
        None => not_found(),
    }
}

async fn update(
    State(store): State<Arc<StubStore>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateNoteRequest>,
) -> Reply {
    const UPDATE_FAILED: &str = "Failed to update note";

    store.update_calls.fetch_add(1, Ordering::SeqCst);
    if store.fail_updates.load(Ordering::SeqCst) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, UPDATE_FAILED);
    }
    let id = match parse_id(&id, UPDATE_FAILED) {
        Ok(id) => id,
        Err(reply) => return reply,
    };

    let mut notes = store.notes.lock();
    let Some(note) = notes.iter_mut().find(|n| n.id == id) else {
        return not_found();
    };
    let title = match req.title {
        None => None,
        Some(title) => match title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => Some(t.to_string()),
            // null or blank fails the title check and changes nothing
            _ => return error(StatusCode::INTERNAL_SERVER_ERROR, UPDATE_FAILED),
        },
    };
    if let Some(title) = title {
        note.title = title;
    }
    if let Some(content) = req.content {
        note.content = content;
    }
    note.updated_at = Utc::now().max(note.created_at);
    reply(StatusCode::OK, note.clone())
}

async fn remove(State(store): State<Arc<StubStore>>, Path(id): Path<String>) -> Reply {
    let id = match parse_id(&id, "Failed to delete note") {
        Ok(id) => id,
        Err(reply) => return reply,
    };
    let mut notes = store.notes.lock();
    let before = notes.len();
    notes.retain(|n| n.id != id);
    if notes.len() == before {
        return not_found();
    }
    (StatusCode::OK, Json(json!({ "message": NOTE_DELETED })))
}

async fn health() -> Reply {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// Serve `store` on an ephemeral port and return its base URL.
pub async fn spawn_stub(store: Arc<StubStore>) -> String {
    let app = axum::Router::new()
        .route("/api/health", get(health))
        .route("/api/notes", get(list).post(create))
        .route("/api/notes/:id", get(get_one).put(update).delete(remove))
        .with_state(store);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().expect("stub server address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Stub server error");
    });

    format!("http://{}", addr)
}
