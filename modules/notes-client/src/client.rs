//! Typed HTTP client for the notes REST API.

use notes_types::{
    CreateNoteRequest, ErrorResponse, MessageResponse, Note, UpdateNoteRequest,
};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;

use crate::error::ClientError;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";

#[derive(Debug, Clone)]
pub struct NotesClient {
    base_url: String,
    client: reqwest::Client,
}

impl NotesClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn notes_url(&self) -> String {
        format!("{}/api/notes", self.base_url)
    }

    /// URL of a single note, with the id escaped as one path segment
    fn note_url(&self, id: &str) -> Result<Url, ClientError> {
        let invalid = || ClientError::InvalidUrl(self.base_url.clone());
        let mut url = Url::parse(&self.notes_url()).map_err(|_| invalid())?;
        url.path_segments_mut().map_err(|_| invalid())?.push(id);
        Ok(url)
    }

    /// Check if the notes API is up
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .client
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await?;

        Ok(resp.status().is_success())
    }

    /// Fetch every note, in storage order
    pub async fn list_notes(&self) -> Result<Vec<Note>, ClientError> {
        let resp = self.client.get(self.notes_url()).send().await?;
        decode(resp).await
    }

    pub async fn create_note(&self, req: &CreateNoteRequest) -> Result<Note, ClientError> {
        let resp = self.client.post(self.notes_url()).json(req).send().await?;
        decode(resp).await
    }

    pub async fn get_note(&self, id: &str) -> Result<Note, ClientError> {
        let resp = self.client.get(self.note_url(id)?).send().await?;
        decode(resp).await
    }

    pub async fn update_note(
        &self,
        id: &str,
        req: &UpdateNoteRequest,
    ) -> Result<Note, ClientError> {
        let resp = self.client.put(self.note_url(id)?).json(req).send().await?;
        decode(resp).await
    }

    /// Delete a note, returning the server's confirmation message
    pub async fn delete_note(&self, id: &str) -> Result<String, ClientError> {
        let resp = self.client.delete(self.note_url(id)?).send().await?;
        let body: MessageResponse = decode(resp).await?;
        Ok(body.message)
    }
}

/// Turn a response into `T`, or into `ClientError::Api` carrying the
/// server's `{error}` text when the status is not a success.
async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error)
            .unwrap_or_else(|_| {
                if body.is_empty() {
                    status.canonical_reason().unwrap_or("Request failed").to_string()
                } else {
                    body
                }
            });
        return Err(ClientError::Api { status, message });
    }

    resp.json::<T>()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}
