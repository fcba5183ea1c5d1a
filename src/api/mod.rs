//! HTTP API for the claim service.
//!
//! `GET /claims?since=..&until=..` generates claims for the configured
//! schedule; the PagerDuty key travels in the `x-pagerduty-auth-token`
//! header.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{AUTH_TOKEN_HEADER, ClaimQueryParams, ClaimWindow};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
