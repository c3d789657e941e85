//! Single-record view-model: fetch, edit (full replace) and delete.

use crate::views::api::ClientsApi;
use crate::views::error::{ApiError, SubmitError};
use crate::views::form::ClientForm;
use crate::views::model::Client;

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Loaded(Client),
    /// Fetch failed; no retry.
    Failed(String),
    Deleted,
}

/// Where the caller should go after a delete attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    ToList,
}

#[derive(Debug)]
pub struct DetailView {
    id: String,
    state: DetailState,
    form: ClientForm,
    form_error: Option<String>,
}

impl DetailView {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: DetailState::Loading,
            form: ClientForm::default(),
            form_error: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn client(&self) -> Option<&Client> {
        match &self.state {
            DetailState::Loaded(client) => Some(client),
            _ => None,
        }
    }

    pub fn form(&self) -> &ClientForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ClientForm {
        &mut self.form
    }

    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    fn show(&mut self, client: Client) {
        self.form = ClientForm::from_client(&client);
        self.state = DetailState::Loaded(client);
    }

    /// Fetch the record and fill the form from it.
    pub async fn load<A: ClientsApi>(&mut self, api: &A) -> Result<Client, ApiError> {
        self.state = DetailState::Loading;
        self.form_error = None;

        match api.get_client(&self.id).await {
            Ok(client) => {
                self.show(client.clone());
                Ok(client)
            }
            Err(e) => {
                tracing::debug!(id = %self.id, error = %e, "Client fetch failed");
                self.state = DetailState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Validate and PUT the whole form. On success the record and the form
    /// both take the server's representation.
    pub async fn save<A: ClientsApi>(&mut self, api: &A) -> Result<Client, SubmitError> {
        if self.client().is_none() {
            return Err(SubmitError::NotLoaded);
        }
        self.form_error = None;

        let payload = match self.form.check() {
            Ok(payload) => payload,
            Err(e) => {
                self.form_error = Some(e.to_string());
                return Err(e.into());
            }
        };

        match api.replace_client(&self.id, &payload).await {
            Ok(updated) => {
                tracing::info!(id = %self.id, "Client updated");
                self.show(updated.clone());
                Ok(updated)
            }
            Err(e) => {
                self.form_error = Some(e.form_message());
                Err(e.into())
            }
        }
    }

    /// DELETE the record. Failure leaves the loaded record alone and shows
    /// the status inline.
    pub async fn delete<A: ClientsApi>(&mut self, api: &A) -> Navigation {
        self.form_error = None;

        match api.delete_client(&self.id).await {
            Ok(()) => {
                tracing::info!(id = %self.id, "Client deleted");
                self.state = DetailState::Deleted;
                Navigation::ToList
            }
            Err(e) => {
                tracing::warn!(id = %self.id, error = %e, "Client delete failed");
                self.form_error = Some(e.to_string());
                Navigation::Stay
            }
        }
    }
}
