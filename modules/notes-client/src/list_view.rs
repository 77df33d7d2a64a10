//! Note list: fetch, filter by search text, order by creation time, delete.

use notes_types::{Note, SortOrder};

use crate::client::NotesClient;
use crate::error::ClientError;

pub const LOAD_FAILED: &str = "Failed to load notes.";
pub const DELETE_FAILED: &str = "Failed to delete note. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// Case-insensitive substring match on title or content. An empty query
/// matches everything.
pub fn matches_search(note: &Note, query: &str) -> bool {
    let query = query.to_lowercase();
    note.title.to_lowercase().contains(&query) || note.content.to_lowercase().contains(&query)
}

/// Filter `notes` by `query` and order the survivors by `created_at`.
/// Notes created at the same instant keep their storage order.
pub fn filter_and_sort<'a>(notes: &'a [Note], query: &str, sort: SortOrder) -> Vec<&'a Note> {
    let mut visible: Vec<&Note> = notes.iter().filter(|n| matches_search(n, query)).collect();
    match sort {
        SortOrder::Latest => visible.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::Oldest => visible.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
    }
    visible
}

#[derive(Debug)]
pub struct NoteListView {
    state: LoadState<Vec<Note>>,
    pub search: String,
    pub sort: SortOrder,
    banner: Option<String>,
}

impl Default for NoteListView {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteListView {
    pub fn new() -> Self {
        Self {
            state: LoadState::Loading,
            search: String::new(),
            sort: SortOrder::default(),
            banner: None,
        }
    }

    pub fn state(&self) -> &LoadState<Vec<Note>> {
        &self.state
    }

    /// Inline error text, if the last operation failed
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn set_notes(&mut self, notes: Vec<Note>) {
        self.state = LoadState::Loaded(notes);
        self.banner = None;
    }

    pub async fn load(&mut self, client: &NotesClient) {
        self.state = LoadState::Loading;
        match client.list_notes().await {
            Ok(notes) => self.set_notes(notes),
            Err(e) => {
                log::error!("Error fetching notes: {}", e);
                self.state = LoadState::Failed(LOAD_FAILED.to_string());
                self.banner = Some(LOAD_FAILED.to_string());
            }
        }
    }

    /// Notes matching the current search, in the current order
    pub fn visible(&self) -> Vec<&Note> {
        match &self.state {
            LoadState::Loaded(notes) => filter_and_sort(notes, &self.search, self.sort),
            _ => Vec::new(),
        }
    }

    /// Total number of loaded notes, ignoring the search
    pub fn total(&self) -> usize {
        match &self.state {
            LoadState::Loaded(notes) => notes.len(),
            _ => 0,
        }
    }

    /// Delete on the server, then drop the note locally.
    pub async fn delete(&mut self, client: &NotesClient, id: &str) -> Result<(), ClientError> {
        if let Err(e) = client.delete_note(id).await {
            log::error!("Error deleting note: {}", e);
            self.banner = Some(DELETE_FAILED.to_string());
            return Err(e);
        }
        self.remove(id);
        Ok(())
    }

    pub fn remove(&mut self, id: &str) {
        if let LoadState::Loaded(notes) = &mut self.state {
            notes.retain(|n| n.id != id);
        }
    }
}
