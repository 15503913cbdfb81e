//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, client address)
//!     → auth.rs (session user)
//!     → handlers.rs (build headers / echo headers)
//!     → response.rs (error mapping)
//!     → Send to client
//! ```

pub mod auth;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use auth::SessionUser;
pub use request::{ClientAddr, X_REQUEST_ID};
pub use server::{build_router, AppState, HttpServer};
