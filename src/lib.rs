//! HMRC fraud prevention header service.
//!
//! Builds the `Gov-Client-*` / `Gov-Vendor-*` headers that must accompany
//! every call to the HMRC Making Tax Digital API from a web application.

pub mod config;
pub mod fraud;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use fraud::{FraudHeaderError, FraudHeaders, HeaderBuilder, RequestContext};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
