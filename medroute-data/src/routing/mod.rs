//! HTTP adapter for the routing server.
//!
//! [`HttpRouteService`] implements [`medroute_core::RouteService`] by posting
//! `{"marker": {"lat", "lng"}, "hospital"}` to `{base_url}/api/route` and
//! reading back `{"path": [[x, y], ...]}`.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use medroute_data::routing::{HttpRouteService, HttpRouteServiceConfig};
//!
//! let config = HttpRouteServiceConfig::new("http://localhost:5000")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("my-app/1.0");
//! let service = HttpRouteService::with_config(config)?;
//! println!("posting to {}", service.endpoint());
//! # Ok::<(), medroute_data::routing::ProviderBuildError>(())
//! ```

mod provider;
mod wire;

pub use provider::{
    DEFAULT_BASE_URL, DEFAULT_USER_AGENT, HttpRouteService, HttpRouteServiceConfig,
    ProviderBuildError,
};
