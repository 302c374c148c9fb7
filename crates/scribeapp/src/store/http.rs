use super::NoteStore;
use crate::auth::AuthToken;
use crate::error::{Result, ScribeError};
use crate::model::{Note, NoteDraft, NoteId, TrashedId, TrashedNote};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Blocking client for the notes service.
///
/// `base_url` is the service mount point (`http://host:3002/api/notes`);
/// routes such as `/notes/{id}` are appended to it.
pub struct HttpNoteStore {
    client: Client,
    base_url: String,
    token: AuthToken,
}

impl HttpNoteStore {
    pub fn new(base_url: &str, token: AuthToken, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.bearer_auth(self.token.as_str()).send()?;
        check_status(response)
    }
}

impl NoteStore for HttpNoteStore {
    fn create(&mut self, title: &str, content: &str) -> Result<Note> {
        info!(%title, "creating note");
        let body = NoteDraft::new(title, content);
        let response = self.send(self.client.post(self.url("/notes")).json(&body))?;
        read_json(response)
    }

    fn update(&mut self, id: NoteId, title: &str, content: &str) -> Result<Note> {
        info!(%id, %title, "updating note");
        let body = NoteDraft::new(title, content);
        let url = self.url(&format!("/notes/{}", id));
        let response = self.send(self.client.put(url).json(&body))?;
        read_json(response)
    }

    fn soft_delete(&mut self, id: NoteId) -> Result<()> {
        info!(%id, "moving note to trash");
        let url = self.url(&format!("/notes/{}", id));
        self.send(self.client.delete(url))?;
        Ok(())
    }

    fn list_active(&self) -> Result<Vec<Note>> {
        debug!("fetching notes");
        let response = self.send(self.client.get(self.url("/notes")))?;
        read_json(response)
    }

    fn list_trashed(&self) -> Result<Vec<TrashedNote>> {
        debug!("fetching trashed notes");
        let response = self.send(self.client.get(self.url("/trashed-notes")))?;
        read_json(response)
    }

    fn restore(&mut self, id: TrashedId) -> Result<Note> {
        info!(%id, "restoring trashed note");
        let url = self.url(&format!("/trashed-notes/{}/restore", id));
        let response = self.send(self.client.post(url))?;
        read_json(response)
    }

    fn hard_delete(&mut self, id: TrashedId) -> Result<()> {
        info!(%id, "permanently deleting trashed note");
        let url = self.url(&format!("/trashed-notes/{}", id));
        self.send(self.client.delete(url))?;
        Ok(())
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text()?;
    Ok(serde_json::from_str(&body)?)
}

/// Passes 2xx responses through and turns everything else into an error kind.
pub(crate) fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    let message = error_message(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
    let err = classify(status.as_u16(), message);
    warn!(status = status.as_u16(), error = %err, "request failed");
    Err(err)
}

pub(crate) fn classify(status: u16, message: String) -> ScribeError {
    match status {
        400 => ScribeError::Validation(message),
        401 | 403 => ScribeError::Auth(message),
        404 => ScribeError::NotFound(message),
        _ => ScribeError::Transport(format!("HTTP {}: {}", status, message)),
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Vec<FieldError>,
}

#[derive(Deserialize)]
struct FieldError {
    msg: String,
}

/// Extracts the message from `{"error": ".."}` or `{"errors": [{"msg": ".."}]}`.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    if !parsed.errors.is_empty() {
        let msgs: Vec<String> = parsed.errors.into_iter().map(|e| e.msg).collect();
        return Some(msgs.join("; "));
    }
    parsed.error
}
