//! View-models for the client screens.
//!
//! # Data Flow
//! ```text
//! user input
//!     → list.rs / detail.rs (parameters, form, submission state)
//!     → form.rs (local validation, nothing sent on failure)
//!     → api.rs (ClientsApi over the gateway's /api surface)
//!     → page.rs (bare array | paged envelope → PageDescriptor)
//!     → rendered by a front-end (see clients-cli)
//! ```

pub mod api;
pub mod detail;
pub mod error;
pub mod form;
pub mod list;
pub mod model;
pub mod page;
pub mod query;

pub use api::{ClientsApi, ProxyClient};
pub use detail::{DetailState, DetailView, Navigation};
pub use error::{ApiError, SubmitError};
pub use form::{ClientForm, FormError};
pub use list::{ListState, ListView, QueryTicket, SubmitState, SUBMIT_FEEDBACK_DELAY};
pub use model::{Client, ClientPayload};
pub use page::{ListResponse, PageDescriptor, PagedEnvelope};
pub use query::{ListQuery, SortOrder, DEFAULT_PAGE_SIZE, PAGE_SIZES};
