//! Debounced autosave for the note editor.
//!
//! Every edit (re)schedules a save `delay` after the edit. A newer edit,
//! an explicit cancel, or dropping the session cancels the pending save, so
//! at most one save fires per quiet period.

use notes_types::Note;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::client::NotesClient;
use crate::editor::{NoteEditor, SubmitError};

pub const AUTOSAVE_DELAY: Duration = Duration::from_secs(3);

/// Runs the most recently scheduled task once `delay` passes without a
/// newer schedule.
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<CancellationToken>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Replace any pending task with `task`. Must be called inside a Tokio runtime.
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        if let Some(previous) = self.pending.lock().replace(token.clone()) {
            previous.cancel();
        }

        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    // consumed: later cancels are no-ops and is_pending reports false
                    token.cancel();
                    task.await;
                }
            }
        });
    }

    pub fn cancel(&self) {
        if let Some(token) = self.pending.lock().take() {
            token.cancel();
        }
    }

    /// True while a scheduled task is still waiting out its delay
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|token| !token.is_cancelled())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// A note editor wired to the API with debounced autosave.
pub struct AutosaveSession {
    editor: Arc<Mutex<NoteEditor>>,
    client: Arc<NotesClient>,
    debouncer: Debouncer,
}

impl AutosaveSession {
    pub fn new(editor: NoteEditor, client: Arc<NotesClient>, delay: Duration) -> Self {
        Self {
            editor: Arc::new(Mutex::new(editor)),
            client,
            debouncer: Debouncer::new(delay),
        }
    }

    /// Read the editor state
    pub fn with_editor<R>(&self, f: impl FnOnce(&NoteEditor) -> R) -> R {
        f(&self.editor.lock())
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.editor.lock().title = title.into();
        self.reschedule();
    }

    pub fn set_content(&self, content: impl Into<String>) {
        self.editor.lock().content = content.into();
        self.reschedule();
    }

    pub fn append_line(&self, line: &str) {
        {
            let mut editor = self.editor.lock();
            if !editor.content.is_empty() {
                editor.content.push('\n');
            }
            editor.content.push_str(line);
        }
        self.reschedule();
    }

    pub fn is_autosave_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Cancel any pending autosave, then save immediately.
    pub async fn save(&self) -> Result<Note, SubmitError> {
        self.debouncer.cancel();

        let (id, req) = {
            let mut editor = self.editor.lock();
            let req = editor.begin_save()?;
            (editor.id().to_string(), req)
        };

        let result = self.client.update_note(&id, &req).await;
        self.editor.lock().finish_save(&req, &result);
        Ok(result?)
    }

    /// Cancel any pending autosave, then delete the note on the server.
    pub async fn delete(&self) -> Result<(), SubmitError> {
        self.debouncer.cancel();

        let id = self.editor.lock().id().to_string();
        let result = self.client.delete_note(&id).await;
        self.editor.lock().finish_delete(&result);
        result.map(|_| ()).map_err(SubmitError::from)
    }

    /// Stop autosaving without touching the editor state
    pub fn cancel(&self) {
        self.debouncer.cancel();
    }

    fn reschedule(&self) {
        if !self.editor.lock().should_autosave() {
            self.debouncer.cancel();
            return;
        }
        self.debouncer
            .schedule(autosave(Arc::clone(&self.editor), Arc::clone(&self.client)));
    }
}

/// One autosave attempt. Failures are logged, never surfaced in the editor.
async fn autosave(editor: Arc<Mutex<NoteEditor>>, client: Arc<NotesClient>) {
    let (id, req) = {
        let editor = editor.lock();
        if !editor.should_autosave() {
            return;
        }
        (editor.id().to_string(), editor.snapshot())
    };

    match client.update_note(&id, &req).await {
        Ok(note) => {
            log::debug!("Auto-saved note {}", note.id);
            editor.lock().mark_saved(&req, note.updated_at);
        }
        Err(e) => log::error!("Auto-save failed: {}", e),
    }
}
