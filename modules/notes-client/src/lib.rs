//! Client side of the notes service: a typed API client plus the list,
//! create and edit view state that front-ends drive.

pub mod autosave;
pub mod client;
pub mod editor;
pub mod error;
pub mod list_view;

#[cfg(test)]
mod stub_server;

pub use client::NotesClient;
pub use error::ClientError;
