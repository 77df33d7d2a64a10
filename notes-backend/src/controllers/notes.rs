//! Notes REST API: collection and single-note endpoints.
//!
//! Storage failures are logged and reported with a fixed per-operation
//! message; nothing from the storage layer leaks into a response body.

use actix_web::error::InternalError;
use actix_web::{HttpResponse, Responder, web};
use notes_types::{
    CreateNoteRequest, ErrorResponse, MessageResponse, NOTE_DELETED, NOTE_NOT_FOUND,
    UpdateNoteRequest,
};

use crate::AppState;
use crate::error::NoteError;
use crate::models::{NewNote, NoteChanges};

const FETCH_ALL_FAILED: &str = "Failed to fetch notes";
const CREATE_FAILED: &str = "Failed to create note";
const FETCH_FAILED: &str = "Failed to fetch note";
const UPDATE_FAILED: &str = "Failed to update note";
const DELETE_FAILED: &str = "Failed to delete note";

/// Map a store error to its response. Only a missing note escapes the generic 500.
fn error_response(err: NoteError, failure: &str) -> HttpResponse {
    if let NoteError::NotFound = err {
        return HttpResponse::NotFound().json(ErrorResponse::new(NOTE_NOT_FOUND));
    }

    if err.is_internal() {
        log::error!("[NOTES] {}: {}", failure, err);
    } else {
        log::warn!("[NOTES] {}: {}", failure, err);
    }
    HttpResponse::InternalServerError().json(ErrorResponse::new(failure))
}

/// Unreadable request bodies fail the operation like any other internal error.
fn json_config(failure: &'static str) -> web::JsonConfig {
    web::JsonConfig::default().error_handler(move |err, _req| {
        log::error!("[NOTES] {}: invalid request body: {}", failure, err);
        InternalError::from_response(
            err,
            HttpResponse::InternalServerError().json(ErrorResponse::new(failure)),
        )
        .into()
    })
}

// --- Collection ---

/// GET /api/notes
async fn list_notes(data: web::Data<AppState>) -> impl Responder {
    let result = data.connector.connect().and_then(|db| db.list_notes());
    match result {
        Ok(notes) => HttpResponse::Ok().json(notes),
        Err(e) => error_response(e, FETCH_ALL_FAILED),
    }
}

/// POST /api/notes
async fn create_note(
    data: web::Data<AppState>,
    body: web::Json<CreateNoteRequest>,
) -> impl Responder {
    let new_note = match NewNote::try_from(body.into_inner()) {
        Ok(note) => note,
        Err(NoteError::Validation(msg)) => {
            return HttpResponse::BadRequest().json(ErrorResponse::new(msg));
        }
        Err(e) => return error_response(e, CREATE_FAILED),
    };

    let result = data
        .connector
        .connect()
        .and_then(|db| db.create_note(new_note));
    match result {
        Ok(note) => {
            log::info!("[NOTES] Created note {}", note.id);
            HttpResponse::Created().json(note)
        }
        Err(e) => error_response(e, CREATE_FAILED),
    }
}

// --- Single note ---

/// GET /api/notes/{id}
async fn get_note(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let result = data.connector.connect().and_then(|db| db.get_note(&id));
    match result {
        Ok(note) => HttpResponse::Ok().json(note),
        Err(e) => error_response(e, FETCH_FAILED),
    }
}

/// PUT /api/notes/{id}
///
/// The title is not pre-checked here; a blank or null title is rejected by the store
/// and reported as a failed update.
async fn update_note(
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateNoteRequest>,
) -> impl Responder {
    let id = path.into_inner();
    let changes = NoteChanges::from(body.into_inner());

    let result = data
        .connector
        .connect()
        .and_then(|db| db.update_note(&id, changes));
    match result {
        Ok(note) => HttpResponse::Ok().json(note),
        Err(e) => error_response(e, UPDATE_FAILED),
    }
}

/// DELETE /api/notes/{id}
async fn delete_note(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let result = data.connector.connect().and_then(|db| db.delete_note(&id));
    match result {
        Ok(()) => {
            log::info!("[NOTES] Deleted note {}", id);
            HttpResponse::Ok().json(MessageResponse::new(NOTE_DELETED))
        }
        Err(e) => error_response(e, DELETE_FAILED),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/notes")
            .service(
                web::resource("")
                    .app_data(json_config(CREATE_FAILED))
                    .route(web::get().to(list_notes))
                    .route(web::post().to(create_note)),
            )
            .service(
                web::resource("/{id}")
                    .app_data(json_config(UPDATE_FAILED))
                    .route(web::get().to(get_note))
                    .route(web::put().to(update_note))
                    .route(web::delete().to(delete_note)),
            ),
    );
}
