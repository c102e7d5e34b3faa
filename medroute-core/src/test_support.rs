//! Test doubles for the controller's ports.
//!
//! [`StubRouteService`] answers route requests from a script without any
//! network access. [`SharedNotifier`] and [`SharedDiagnostics`] record what
//! the controller reports while the test keeps a handle to inspect it.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use geo::Coord;

use crate::controller::InteractionId;
use crate::coords::SelectionPoint;
use crate::error::RouteError;
use crate::ports::{DiagnosticSink, Notifier, RouteService};
use crate::route::{RoutePath, RouteRequest};

/// Build a route result from `[x, y]` pairs as the service would send them.
///
/// # Errors
///
/// Returns [`RouteError::Protocol`] when `pairs` is empty.
pub fn route_from_pairs(pairs: &[[f64; 2]]) -> Result<RoutePath, RouteError> {
    RoutePath::new(pairs.iter().map(|&[x, y]| Coord { x, y }).collect())
}

/// One scripted answer.
#[derive(Debug, Clone)]
struct ScriptedResponse {
    delay: Duration,
    result: Result<RoutePath, RouteError>,
}

#[derive(Debug, Clone)]
enum Script {
    Always(ScriptedResponse),
    Queue(RefCell<VecDeque<ScriptedResponse>>),
    ByMarker(Vec<(SelectionPoint, ScriptedResponse)>),
}

/// Stub [`RouteService`] returning pre-configured results.
///
/// # Example
///
/// ```
/// use medroute_core::test_support::{StubRouteService, route_from_pairs};
///
/// let service = StubRouteService::always(route_from_pairs(&[[74.35, 31.56]]));
/// assert_eq!(service.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct StubRouteService {
    script: Script,
    requests: RefCell<Vec<RouteRequest>>,
}

impl StubRouteService {
    /// Answer every request with `result`.
    #[must_use]
    pub fn always(result: Result<RoutePath, RouteError>) -> Self {
        Self {
            script: Script::Always(ScriptedResponse {
                delay: Duration::ZERO,
                result,
            }),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Answer requests in order, each after its delay.
    ///
    /// Requests beyond the script fail with [`RouteError::Network`].
    #[must_use]
    pub fn scripted(
        responses: impl IntoIterator<Item = (Duration, Result<RoutePath, RouteError>)>,
    ) -> Self {
        let queue = responses
            .into_iter()
            .map(|(delay, result)| ScriptedResponse { delay, result })
            .collect();
        Self {
            script: Script::Queue(RefCell::new(queue)),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Answer each request according to its start point, after the paired
    /// delay.
    ///
    /// Requests for unlisted points fail with [`RouteError::Network`].
    #[must_use]
    pub fn by_marker(
        responses: impl IntoIterator<
            Item = (SelectionPoint, Duration, Result<RoutePath, RouteError>),
        >,
    ) -> Self {
        let table = responses
            .into_iter()
            .map(|(marker, delay, result)| (marker, ScriptedResponse { delay, result }))
            .collect();
        Self {
            script: Script::ByMarker(table),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RouteRequest> {
        self.requests.borrow().clone()
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.borrow().len()
    }

    fn next_response(&self, request: &RouteRequest) -> ScriptedResponse {
        let scripted = match &self.script {
            Script::Always(response) => Some(response.clone()),
            Script::Queue(queue) => queue.borrow_mut().pop_front(),
            Script::ByMarker(table) => table
                .iter()
                .find(|(marker, _)| *marker == request.marker)
                .map(|(_, response)| response.clone()),
        };
        scripted.unwrap_or_else(|| ScriptedResponse {
            delay: Duration::ZERO,
            result: Err(RouteError::Network {
                url: "stub://route".to_owned(),
                message: "no scripted response".to_owned(),
            }),
        })
    }
}

#[async_trait(?Send)]
impl RouteService for StubRouteService {
    async fn route(&self, request: &RouteRequest) -> Result<RoutePath, RouteError> {
        self.requests.borrow_mut().push(request.clone());
        let response = self.next_response(request);
        if !response.delay.is_zero() {
            tokio::time::sleep(response.delay).await;
        }
        response.result
    }
}

/// [`Notifier`] recording every notice into a shared buffer.
#[derive(Debug, Clone, Default)]
pub struct SharedNotifier {
    notices: Rc<RefCell<Vec<String>>>,
}

impl SharedNotifier {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices raised so far.
    #[must_use]
    pub fn notices(&self) -> Vec<String> {
        self.notices.borrow().clone()
    }
}

impl Notifier for SharedNotifier {
    fn alert(&mut self, message: &str) {
        self.notices.borrow_mut().push(message.to_owned());
    }
}

/// [`DiagnosticSink`] recording every failure into a shared buffer.
#[derive(Debug, Clone, Default)]
pub struct SharedDiagnostics {
    failures: Rc<RefCell<Vec<(InteractionId, RouteError)>>>,
}

impl SharedDiagnostics {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Failures recorded so far.
    #[must_use]
    pub fn failures(&self) -> Vec<(InteractionId, RouteError)> {
        self.failures.borrow().clone()
    }
}

impl DiagnosticSink for SharedDiagnostics {
    fn record_failure(&mut self, interaction: InteractionId, error: &RouteError) {
        self.failures.borrow_mut().push((interaction, error.clone()));
    }
}
