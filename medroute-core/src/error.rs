//! Error types raised during an interaction.

use thiserror::Error;

use crate::controller::InteractionId;

/// Local validation failures detected before any request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No destination is selected in the selection control.
    #[error("no destination selected for interaction {interaction}")]
    MissingDestination {
        /// Interaction that was abandoned.
        interaction: InteractionId,
    },
}

/// Failures while fetching a route from the routing service.
///
/// Transport failures and malformed responses are handled identically by the
/// controller; the split exists for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The request could not be delivered or the connection failed.
    #[error("request to {url} failed: {message}")]
    Network {
        /// Requested URL.
        url: String,
        /// Description of the transport failure.
        message: String,
    },
    /// The routing service did not answer in time.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The routing service answered with a non-success status.
    #[error("routing service at {url} returned HTTP {status}: {message}")]
    Http {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error reported by the service, or the status text.
        message: String,
    },
    /// A success response did not carry a usable route path.
    #[error("invalid route data received: {message}")]
    Protocol {
        /// Description of what was wrong with the response.
        message: String,
    },
}

impl RouteError {
    /// Whether the failure happened at the transport or HTTP level.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::Timeout { .. } | Self::Http { .. }
        )
    }
}
