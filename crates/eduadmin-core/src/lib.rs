//! Client side of the educational platform: admin moderation actions, intercepted
//! form submissions, transient feedback banners and the small helpers around them.
//!
//! All business rules live on the server. This crate issues the requests, reads
//! the `{ success, message, detail }` answers and drives a `Page` accordingly.

pub mod actions;
pub mod admin;
pub mod api;
pub mod clipboard;
pub mod config;
pub mod connectivity;
pub mod debounce;
pub mod dispatcher;
pub mod feedback;
pub mod form;
pub mod format;
pub mod page;
pub mod profile;
pub mod selection;
pub mod stats;
pub mod submission;
pub mod table;
pub mod tracing_setup;

pub use actions::{FormKind, ResourceAction};
pub use admin::AdminPanel;
pub use api::{ActionOutcome, ApiError, ApiTransport, DashboardStats, HttpTransport};
pub use config::ClientConfig;
pub use dispatcher::{ActionDispatcher, DispatchReport};
pub use feedback::{FeedbackEvent, FeedbackSurface, Notification, Severity};
pub use page::{Dialog, Page};
pub use profile::ProfileView;
pub use submission::{FormController, SubmitReport, SubmitTrigger};
