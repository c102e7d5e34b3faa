//! Adapters connecting `medroute-core` to external services.
//!
//! Currently this is the HTTP routing service client in [`routing`].

#![forbid(unsafe_code)]

pub mod routing;

pub use routing::{HttpRouteService, HttpRouteServiceConfig, ProviderBuildError};
