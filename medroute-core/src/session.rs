//! Async driver pairing a controller with a routing service.
//!
//! Everything runs on the caller's task. [`Session::run`] keeps accepting
//! point selections while earlier requests are in flight and completes each
//! request in the order its response arrives.

use std::pin::pin;

use futures_util::future::{FutureExt, LocalBoxFuture};
use futures_util::stream::{FuturesUnordered, Stream, StreamExt};

use crate::controller::{InteractionController, InteractionOutcome, PendingRoute};
use crate::coords::SelectionPoint;
use crate::error::RouteError;
use crate::ports::{DestinationSource, MapSurface, RouteService};
use crate::route::RoutePath;

type Settled = (PendingRoute, Result<RoutePath, RouteError>);

/// A controller wired to the routing service it sends requests to.
#[derive(Debug)]
pub struct Session<M, D, S> {
    controller: InteractionController<M, D>,
    service: S,
}

impl<M, D, S> Session<M, D, S>
where
    M: MapSurface,
    D: DestinationSource,
    S: RouteService,
{
    /// Pair `controller` with `service`.
    pub const fn new(controller: InteractionController<M, D>, service: S) -> Self {
        Self {
            controller,
            service,
        }
    }

    /// The wrapped controller.
    pub const fn controller(&self) -> &InteractionController<M, D> {
        &self.controller
    }

    /// Mutable access to the wrapped controller.
    pub const fn controller_mut(&mut self) -> &mut InteractionController<M, D> {
        &mut self.controller
    }

    /// The routing service.
    pub const fn service(&self) -> &S {
        &self.service
    }

    /// Split the session into its controller and service.
    pub fn into_parts(self) -> (InteractionController<M, D>, S) {
        (self.controller, self.service)
    }

    /// Run one interaction to completion.
    pub async fn select_point(&mut self, point: SelectionPoint) -> InteractionOutcome {
        match self.controller.begin(point) {
            Ok(pending) => {
                let result = self.service.route(pending.request()).await;
                self.controller.complete(pending, result)
            }
            Err(error) => error.into(),
        }
    }

    /// Handle every selection from `selections`, overlapping requests.
    ///
    /// Returns once `selections` is exhausted and every request has settled.
    /// Outcomes are listed in completion order.
    pub async fn run<E>(&mut self, selections: E) -> Vec<InteractionOutcome>
    where
        E: Stream<Item = SelectionPoint>,
    {
        let Self {
            controller,
            service,
        } = self;
        let mut selections = pin!(selections.fuse());
        let mut in_flight: FuturesUnordered<LocalBoxFuture<'_, Settled>> = FuturesUnordered::new();
        let mut outcomes: Vec<InteractionOutcome> = Vec::new();

        loop {
            tokio::select! {
                Some(point) = selections.next() => match controller.begin(point) {
                    Ok(pending) => in_flight.push(dispatch(&*service, pending)),
                    Err(error) => outcomes.push(error.into()),
                },
                Some((pending, result)) = in_flight.next(), if !in_flight.is_empty() => {
                    outcomes.push(controller.complete(pending, result));
                }
                else => break,
            }
        }
        outcomes
    }
}

fn dispatch<S: RouteService>(service: &S, pending: PendingRoute) -> LocalBoxFuture<'_, Settled> {
    async move {
        let result = service.route(pending.request()).await;
        (pending, result)
    }
    .boxed_local()
}
