//! List / search / paginate view-model, with the create form beside it.
//!
//! Every parameter change yields a [`QueryTicket`] carrying the snapshot
//! that produced it. A result is applied only if its ticket still matches
//! the latest snapshot; anything older is dropped, so overlapping requests
//! can finish in any order without the view flickering back.
//!
//! Create submission: `Idle → Saving → Success | Error → Idle` once
//! [`SUBMIT_FEEDBACK_DELAY`] has passed.

use std::time::{Duration, Instant};

use crate::views::api::ClientsApi;
use crate::views::error::{ApiError, SubmitError};
use crate::views::form::ClientForm;
use crate::views::model::Client;
use crate::views::page::{ListResponse, PageDescriptor};
use crate::views::query::{ListQuery, SortOrder};

/// How long `Success` / `Error` stay visible before the form returns to idle.
pub const SUBMIT_FEEDBACK_DELAY: Duration = Duration::from_millis(1800);

/// The parameter snapshot a query was issued with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    query: ListQuery,
}

impl QueryTicket {
    pub fn query(&self) -> &ListQuery {
        &self.query
    }
}

/// What the result area shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    Loading,
    Loaded,
    Failed(String),
}

/// Create-form submission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Saving,
    Success,
    Error,
}

#[derive(Debug)]
pub struct ListView {
    query: ListQuery,
    search_draft: String,
    state: ListState,
    page: PageDescriptor,
    form: ClientForm,
    form_error: Option<String>,
    submit: SubmitState,
    settles_at: Option<Instant>,
}

impl Default for ListView {
    fn default() -> Self {
        Self::new()
    }
}

impl ListView {
    pub fn new() -> Self {
        let query = ListQuery::default();
        Self {
            page: PageDescriptor {
                size: query.size,
                ..PageDescriptor::default()
            },
            query,
            search_draft: String::new(),
            state: ListState::Loading,
            form: ClientForm::default(),
            form_error: None,
            submit: SubmitState::Idle,
            settles_at: None,
        }
    }

    /// Latest requested parameters.
    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// Last applied page.
    pub fn page(&self) -> &PageDescriptor {
        &self.page
    }

    pub fn clients(&self) -> &[Client] {
        &self.page.items
    }

    pub fn search_draft(&self) -> &str {
        &self.search_draft
    }

    pub fn set_search_draft(&mut self, draft: impl Into<String>) {
        self.search_draft = draft.into();
    }

    /// Ticket for the current parameters; marks the view as loading.
    pub fn begin_query(&mut self) -> QueryTicket {
        self.state = ListState::Loading;
        QueryTicket {
            query: self.query.clone(),
        }
    }

    /// Change parameters; a ticket comes back only if something changed.
    fn transition(&mut self, change: impl FnOnce(&mut ListQuery)) -> Option<QueryTicket> {
        let mut next = self.query.clone();
        change(&mut next);
        if next == self.query {
            return None;
        }
        self.query = next;
        Some(self.begin_query())
    }

    /// Apply the draft as the search term and go back to the first page.
    pub fn submit_search(&mut self) -> Option<QueryTicket> {
        let search = self.search_draft.clone();
        self.transition(|q| {
            q.search = search;
            q.page = 0;
        })
    }

    /// Drop the search term (draft included) and go back to the first page.
    pub fn clear_search(&mut self) -> Option<QueryTicket> {
        self.search_draft.clear();
        self.transition(|q| {
            q.search.clear();
            q.page = 0;
        })
    }

    pub fn set_sort(&mut self, sort: SortOrder) -> Option<QueryTicket> {
        self.transition(|q| q.sort = sort)
    }

    /// New page size; back to the first page.
    pub fn set_page_size(&mut self, size: u32) -> Option<QueryTicket> {
        self.transition(|q| {
            q.size = size.max(1);
            q.page = 0;
        })
    }

    /// Jump to a page, clamped to `[0, totalPages - 1]`.
    pub fn go_to_page(&mut self, page: u32) -> Option<QueryTicket> {
        let page = page.min(self.page.last_page());
        self.transition(|q| q.page = page)
    }

    pub fn next_page(&mut self) -> Option<QueryTicket> {
        self.go_to_page(self.query.page.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> Option<QueryTicket> {
        self.go_to_page(self.query.page.saturating_sub(1))
    }

    /// Apply a finished query. Returns false when the ticket is stale and
    /// the result was dropped.
    pub fn apply(&mut self, ticket: QueryTicket, result: Result<ListResponse, ApiError>) -> bool {
        if ticket.query != self.query {
            tracing::debug!(stale = ?ticket.query, latest = ?self.query, "Dropping stale list result");
            return false;
        }

        match result {
            Ok(response) => {
                self.page = PageDescriptor::normalize(response, &ticket.query);
                self.state = ListState::Loaded;
            }
            Err(e) => {
                self.state = ListState::Failed(e.to_string());
            }
        }
        true
    }

    /// Run a ticket against the API and apply the result.
    pub async fn fetch<A: ClientsApi>(&mut self, api: &A, ticket: QueryTicket) -> bool {
        let result = api.list_clients(ticket.query()).await;
        self.apply(ticket, result)
    }

    /// Issue a query for the current parameters.
    pub async fn refresh<A: ClientsApi>(&mut self, api: &A) -> bool {
        let ticket = self.begin_query();
        self.fetch(api, ticket).await
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

    pub fn submit_state(&self) -> SubmitState {
        self.submit_state_at(Instant::now())
    }

    /// Submission state as of `now`.
    pub fn submit_state_at(&self, now: Instant) -> SubmitState {
        match (self.submit, self.settles_at) {
            (SubmitState::Success | SubmitState::Error, Some(at)) if now >= at => SubmitState::Idle,
            (state, _) => state,
        }
    }

    /// Validate and POST the create form.
    ///
    /// Invalid input never reaches the network. On success the form is
    /// reset and the list is re-queried at page 0; on failure the form
    /// keeps its input and shows the upstream message.
    pub async fn create<A: ClientsApi>(&mut self, api: &A) -> Result<Client, SubmitError> {
        self.form_error = None;

        let payload = match self.form.check() {
            Ok(payload) => payload,
            Err(e) => {
                self.form_error = Some(e.to_string());
                return Err(e.into());
            }
        };

        self.submit = SubmitState::Saving;
        self.settles_at = None;

        let result = api.create_client(&payload).await;
        self.settles_at = Some(Instant::now() + SUBMIT_FEEDBACK_DELAY);

        match result {
            Ok(client) => {
                tracing::info!(id = %client.id, "Client created");
                self.submit = SubmitState::Success;
                self.form.clear();
                self.query.page = 0;
                self.refresh(api).await;
                Ok(client)
            }
            Err(e) => {
                self.submit = SubmitState::Error;
                self.form_error = Some(e.form_message());
                Err(e.into())
            }
        }
    }
}
