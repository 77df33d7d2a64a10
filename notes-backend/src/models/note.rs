use notes_types::{CreateNoteRequest, UpdateNoteRequest, TITLE_REQUIRED};

use crate::error::NoteError;

pub use notes_types::Note;

/// A validated note ready to be inserted.
///
/// The title is trimmed and known to be non-empty; `content` defaults to the
/// empty string when the request omitted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub title: String,
    pub content: String,
}

impl NewNote {
    pub fn new(title: Option<&str>, content: Option<&str>) -> Result<Self, NoteError> {
        Ok(Self {
            title: normalize_title(title)?,
            content: content.unwrap_or_default().to_string(),
        })
    }
}

impl TryFrom<CreateNoteRequest> for NewNote {
    type Error = NoteError;

    fn try_from(req: CreateNoteRequest) -> Result<Self, Self::Error> {
        Self::new(req.title.as_deref(), req.content.as_deref())
    }
}

/// Overwrite of an existing note. `None` leaves the stored field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteChanges {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NoteChanges {
    /// Apply the same title rule as creation to a supplied title.
    pub fn validated(self) -> Result<Self, NoteError> {
        let title = match self.title {
            Some(title) => Some(normalize_title(Some(&title))?),
            None => None,
        };
        Ok(Self {
            title,
            content: self.content,
        })
    }
}

impl From<UpdateNoteRequest> for NoteChanges {
    /// An explicit `null` title becomes an empty one, so `validated` rejects it
    /// the same way it rejects a blank title.
    fn from(req: UpdateNoteRequest) -> Self {
        Self {
            title: req.title.map(Option::unwrap_or_default),
            content: req.content,
        }
    }
}

/// Trim a title, rejecting it when nothing is left.
pub fn normalize_title(title: Option<&str>) -> Result<String, NoteError> {
    let trimmed = title.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(NoteError::Validation(TITLE_REQUIRED.to_string()));
    }
    Ok(trimmed.to_string())
}
