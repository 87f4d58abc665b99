//! SecHub Server Library
//!
//! Administrative backend for academic planning, built around a cross-cutting
//! audit log of service-layer write operations.
//!
//! # Overview
//!
//! - **Audit**: Interception of business-service calls, classification of
//!   operation names into `CREATE`/`UPDATE`/`DELETE`, fire-and-forget
//!   persistence and an admin-only NDJSON read API
//! - **Features**: Teacher management, email notifications and monitor
//!   requests, all audited
//! - **Configuration**: Environment-based configuration with validation
//! - **Middleware**: CORS and request tracing
//!
//! # Audit Logging
//!
//! Services implement [`audit::ServiceLayer`] and are wrapped once at startup
//! with [`audit::AuditInterceptor`]. Each service method has an
//! [`audit::Operation`] value naming it, and handlers run those operations
//! through the resulting [`audit::Audited`] decorator together with the
//! request's [`audit::CallContext`]:
//!
//! - Operations named `create*`, `save*`, `add*`, `insert*` are `CREATE`
//! - `update*`, `modify*`, `edit*`, `approve*`, `reject*` are `UPDATE`
//! - `delete*`, `remove*` are `DELETE`
//! - Anything else is not audited
//!
//! Audit writes never delay or fail the business operation.
//!
//! # Example
//!
//! ```no_run
//! use secchub_server::{api, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     api::serve(config).await
//! }
//! ```

pub mod api;
pub mod audit;
pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod middleware;

// Re-export commonly used types
pub use error::{ApiResult, AppError};
