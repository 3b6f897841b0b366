//! Boundary with the platform server.

pub mod error;
pub mod response;
pub mod transport;

#[cfg(test)]
pub(crate) mod fake;

pub use error::{ApiError, TransportError};
pub use response::{ActionOutcome, DashboardStats, RawResponse};
pub use transport::{ApiTransport, HttpTransport};
