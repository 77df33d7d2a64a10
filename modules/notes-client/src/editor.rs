//! Form state for creating and editing a note.

use chrono::{DateTime, Utc};
use notes_types::{CreateNoteRequest, Note, TITLE_REQUIRED, UpdateNoteRequest};

use crate::client::NotesClient;
use crate::error::ClientError;

pub const CREATE_FAILED: &str = "Failed to create note. Please try again.";
pub const LOAD_FAILED: &str = "Failed to load note.";
pub const UPDATE_FAILED: &str = "Failed to update note. Please try again.";
pub const DELETE_FAILED: &str = "Failed to delete note. Please try again.";

/// Why a submit did not reach the server, or what it failed with.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("{0}")]
    Invalid(&'static str),
    #[error("a save is already in progress")]
    Busy,
    #[error(transparent)]
    Client(#[from] ClientError),
}

// =====================================================
// New note
// =====================================================

#[derive(Debug, Default)]
pub struct NewNoteForm {
    pub title: String,
    pub content: String,
    error: Option<String>,
}

impl NewNoteForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Leaving a form with any typed text should be confirmed first
    pub fn needs_confirm_on_cancel(&self) -> bool {
        !self.title.trim().is_empty() || !self.content.trim().is_empty()
    }

    pub fn request(&self) -> Result<CreateNoteRequest, SubmitError> {
        if self.title.trim().is_empty() {
            return Err(SubmitError::Invalid(TITLE_REQUIRED));
        }
        Ok(CreateNoteRequest::new(self.title.clone(), Some(self.content.clone())))
    }

    pub async fn submit(&mut self, client: &NotesClient) -> Result<Note, SubmitError> {
        let req = match self.request() {
            Ok(req) => req,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e);
            }
        };
        self.error = None;

        match client.create_note(&req).await {
            Ok(note) => Ok(note),
            Err(e) => {
                log::error!("Error creating note: {}", e);
                self.error = Some(CREATE_FAILED.to_string());
                Err(e.into())
            }
        }
    }
}

// =====================================================
// Edit existing note
// =====================================================

/// Edit state for one note: current values, the last values known to be
/// stored, and save bookkeeping.
#[derive(Debug, Clone)]
pub struct NoteEditor {
    id: String,
    pub title: String,
    pub content: String,
    saved_title: String,
    saved_content: String,
    saving: bool,
    error: Option<String>,
    last_saved: Option<DateTime<Utc>>,
}

impl NoteEditor {
    pub fn from_note(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            title: note.title.clone(),
            content: note.content.clone(),
            saved_title: note.title.clone(),
            saved_content: note.content.clone(),
            saving: false,
            error: None,
            last_saved: Some(note.updated_at),
        }
    }

    pub async fn load(client: &NotesClient, id: &str) -> Result<Self, String> {
        match client.get_note(id).await {
            Ok(note) => Ok(Self::from_note(&note)),
            Err(e) => {
                log::error!("Error fetching note: {}", e);
                Err(LOAD_FAILED.to_string())
            }
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.title != self.saved_title || self.content != self.saved_content
    }

    /// Autosave only has something to do when there are changes, the title
    /// would pass validation, and no manual save is in flight.
    pub fn should_autosave(&self) -> bool {
        self.has_unsaved_changes() && !self.title.trim().is_empty() && !self.saving
    }

    pub fn needs_confirm_on_cancel(&self) -> bool {
        self.has_unsaved_changes()
    }

    /// Current values as an update body
    pub fn snapshot(&self) -> UpdateNoteRequest {
        UpdateNoteRequest::new(self.title.clone(), self.content.clone())
    }

    /// Validate and enter the saving state. Returns the body to send.
    pub fn begin_save(&mut self) -> Result<UpdateNoteRequest, SubmitError> {
        if self.title.trim().is_empty() {
            self.error = Some(TITLE_REQUIRED.to_string());
            return Err(SubmitError::Invalid(TITLE_REQUIRED));
        }
        if self.saving {
            return Err(SubmitError::Busy);
        }
        self.saving = true;
        self.error = None;
        Ok(self.snapshot())
    }

    /// Leave the saving state with the outcome of the request `sent`.
    pub fn finish_save(&mut self, sent: &UpdateNoteRequest, result: &Result<Note, ClientError>) {
        self.saving = false;
        match result {
            Ok(note) => self.mark_saved(sent, note.updated_at),
            Err(e) => {
                log::error!("Error updating note: {}", e);
                self.error = Some(UPDATE_FAILED.to_string());
            }
        }
    }

    /// Record `sent` as stored. Edits made while the request was in flight
    /// remain unsaved.
    pub fn mark_saved(&mut self, sent: &UpdateNoteRequest, at: DateTime<Utc>) {
        if let Some(title) = sent.title() {
            self.saved_title = title.to_string();
        }
        if let Some(content) = &sent.content {
            self.saved_content = content.clone();
        }
        self.last_saved = Some(at);
    }

    pub async fn save(&mut self, client: &NotesClient) -> Result<Note, SubmitError> {
        let req = self.begin_save()?;
        let result = client.update_note(&self.id, &req).await;
        self.finish_save(&req, &result);
        Ok(result?)
    }

    pub async fn delete(&mut self, client: &NotesClient) -> Result<(), SubmitError> {
        let result = client.delete_note(&self.id).await;
        self.finish_delete(&result);
        result.map(|_| ()).map_err(SubmitError::from)
    }

    pub fn finish_delete(&mut self, result: &Result<String, ClientError>) {
        if let Err(e) = result {
            log::error!("Error deleting note: {}", e);
            self.error = Some(DELETE_FAILED.to_string());
        }
    }
}
