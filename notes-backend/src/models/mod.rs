pub mod note;

pub use note::{NewNote, Note, NoteChanges};
