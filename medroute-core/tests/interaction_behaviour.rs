//! Behavioural tests for the interaction controller and session.
//!
//! Scenarios run against [`MemoryMap`] and [`StubRouteService`] so no map
//! widget or routing server is needed.

use std::cell::RefCell;

use medroute_core::test_support::{
    SharedDiagnostics, SharedNotifier, StubRouteService, route_from_pairs,
};
use medroute_core::{
    Bounds, FixedDestination, InteractionController, InteractionOutcome, LatLng,
    MISSING_DESTINATION_NOTICE, MapView, MemoryMap, PendingRoute, RouteError, RoutePath, Session,
    StalePolicy,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

type TestSession = Session<MemoryMap, FixedDestination, StubRouteService>;

const EXAMPLE_POINT: LatLng = LatLng::new(31.55, 74.34);
const OTHER_POINT: LatLng = LatLng::new(31.50, 74.30);

fn example_route() -> Result<RoutePath, RouteError> {
    route_from_pairs(&[[74.35, 31.56], [74.34, 31.55]])
}

fn other_route() -> Result<RoutePath, RouteError> {
    route_from_pairs(&[[74.31, 31.51], [74.30, 31.50]])
}

fn example_map_path() -> Vec<LatLng> {
    vec![LatLng::new(31.56, 74.35), LatLng::new(31.55, 74.34)]
}

struct World {
    destination: RefCell<FixedDestination>,
    service: RefCell<Option<StubRouteService>>,
    policy: RefCell<StalePolicy>,
    session: RefCell<Option<TestSession>>,
    notifier: SharedNotifier,
    diagnostics: SharedDiagnostics,
    pending: RefCell<Option<PendingRoute>>,
    outcomes: RefCell<Vec<InteractionOutcome>>,
}

impl World {
    fn new() -> Self {
        Self {
            destination: RefCell::new(FixedDestination::none()),
            service: RefCell::new(None),
            policy: RefCell::new(StalePolicy::ArrivalOrder),
            session: RefCell::new(None),
            notifier: SharedNotifier::new(),
            diagnostics: SharedDiagnostics::new(),
            pending: RefCell::new(None),
            outcomes: RefCell::new(Vec::new()),
        }
    }

    fn with_session<T>(&self, f: impl FnOnce(&mut TestSession) -> T) -> T {
        let mut slot = self.session.borrow_mut();
        let session = slot.get_or_insert_with(|| {
            let controller =
                InteractionController::new(MemoryMap::new(), self.destination.borrow().clone())
                    .with_notifier(self.notifier.clone())
                    .with_diagnostics(self.diagnostics.clone())
                    .with_stale_policy(*self.policy.borrow());
            let service = self
                .service
                .borrow_mut()
                .take()
                .unwrap_or_else(|| StubRouteService::always(other_route()));
            Session::new(controller, service)
        });
        f(session)
    }

    fn select_point(&self, point: LatLng) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .expect("build runtime");
        let outcome = self.with_session(|session| runtime.block_on(session.select_point(point)));
        self.outcomes.borrow_mut().push(outcome);
    }

    fn map(&self) -> MemoryMap {
        self.with_session(|session| session.controller().map().clone())
    }
}

#[fixture]
fn world() -> World {
    World::new()
}

// --- Given steps ---

#[given("no hospital is selected")]
fn no_hospital(#[from(world)] world: &World) {
    *world.destination.borrow_mut() = FixedDestination::none();
}

#[given("hospital H12 is selected")]
fn hospital_selected(#[from(world)] world: &World) {
    *world.destination.borrow_mut() = FixedDestination::new("H12");
}

#[given("a routing service returning the example route")]
fn service_example(#[from(world)] world: &World) {
    *world.service.borrow_mut() = Some(StubRouteService::always(example_route()));
}

#[given("a routing service whose response has no path")]
fn service_missing_path(#[from(world)] world: &World) {
    *world.service.borrow_mut() = Some(StubRouteService::always(Err(RouteError::Protocol {
        message: "response missing path".to_owned(),
    })));
}

#[given("a routing service failing with HTTP 500")]
fn service_http_500(#[from(world)] world: &World) {
    *world.service.borrow_mut() = Some(StubRouteService::always(Err(RouteError::Http {
        url: "http://localhost:5000/api/route".to_owned(),
        status: 500,
        message: "Internal Server Error".to_owned(),
    })));
}

#[given("stale responses are discarded")]
fn latest_start(#[from(world)] world: &World) {
    *world.policy.borrow_mut() = StalePolicy::LatestStart;
}

// --- When steps ---

#[when("I select the example point")]
fn select_example(#[from(world)] world: &World) {
    world.select_point(EXAMPLE_POINT);
}

#[when("I select the example point again")]
fn select_example_again(#[from(world)] world: &World) {
    world.select_point(EXAMPLE_POINT);
}

#[when("interaction A starts at the example point")]
fn start_a(#[from(world)] world: &World) {
    let pending = world.with_session(|session| session.controller_mut().begin(EXAMPLE_POINT));
    *world.pending.borrow_mut() = Some(pending.expect("destination is selected"));
}

#[when("interaction B starts and renders its own route")]
fn run_b(#[from(world)] world: &World) {
    let outcome = world.with_session(|session| {
        let controller = session.controller_mut();
        let pending = controller.begin(OTHER_POINT).expect("destination is selected");
        controller.complete(pending, other_route())
    });
    assert!(outcome.is_rendered(), "interaction B should render");
    world.outcomes.borrow_mut().push(outcome);
}

#[when("the response for interaction A arrives")]
fn complete_a(#[from(world)] world: &World) {
    let pending = world
        .pending
        .borrow_mut()
        .take()
        .expect("interaction A must be in flight");
    let outcome =
        world.with_session(|session| session.controller_mut().complete(pending, example_route()));
    world.outcomes.borrow_mut().push(outcome);
}

// --- Then steps ---

#[then("the map shows only the point marker")]
fn only_point_marker(#[from(world)] world: &World) {
    let map = world.map();
    assert_eq!(map.markers(), vec![EXAMPLE_POINT]);
    assert!(map.polylines().is_empty(), "no route should be drawn");
    assert!(
        matches!(map.view(), MapView::Centered { .. }),
        "viewport should be unchanged"
    );
}

#[then("a validation notice is raised")]
fn validation_notice(#[from(world)] world: &World) {
    assert_eq!(
        world.notifier.notices(),
        vec![MISSING_DESTINATION_NOTICE.to_owned()]
    );
    assert!(matches!(
        world.outcomes.borrow().last(),
        Some(InteractionOutcome::DestinationMissing { .. })
    ));
}

#[then("no route request is sent")]
fn no_request(#[from(world)] world: &World) {
    let calls = world.with_session(|session| session.service().call_count());
    assert_eq!(calls, 0);
}

#[then("the destination marker is drawn at the first path coordinate")]
fn destination_marker(#[from(world)] world: &World) {
    assert!(world.map().markers().contains(&LatLng::new(31.56, 74.35)));
}

#[then("the route polyline follows the path with axes swapped")]
fn route_polyline(#[from(world)] world: &World) {
    let map = world.map();
    let expected = example_map_path();
    assert_eq!(map.polylines(), vec![expected.as_slice()]);
}

#[then("the viewport is fitted to the route")]
fn viewport_fitted(#[from(world)] world: &World) {
    let expected = Bounds::of(&example_map_path()).expect("route has bounds");
    assert_eq!(world.map().view(), MapView::Fitted { bounds: expected });
}

#[then("the request carries the example point and hospital")]
fn request_contents(#[from(world)] world: &World) {
    let requests = world.with_session(|session| session.service().requests());
    assert_eq!(requests.len(), 1);
    let request = requests.first().expect("one request");
    assert_eq!(request.marker, EXAMPLE_POINT);
    assert_eq!(request.hospital.as_str(), "H12");
}

#[then("a failure is recorded on the diagnostic channel")]
fn failure_recorded(#[from(world)] world: &World) {
    assert_eq!(world.diagnostics.failures().len(), 1);
    assert!(world.notifier.notices().is_empty(), "failures are not shown");
    assert!(matches!(
        world.outcomes.borrow().last(),
        Some(InteractionOutcome::RequestFailed { .. })
    ));
}

#[then("the map holds a single overlay")]
fn single_overlay(#[from(world)] world: &World) {
    let map = world.map();
    assert_eq!(map.len(), 3, "point marker, destination marker and route");
    assert_eq!(
        map.markers(),
        vec![EXAMPLE_POINT, LatLng::new(31.56, 74.35)]
    );
    let outcomes = world.outcomes.borrow();
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(InteractionOutcome::is_rendered));
}

#[then("the route of interaction B remains")]
fn route_b_remains(#[from(world)] world: &World) {
    let map = world.map();
    let expected = vec![LatLng::new(31.51, 74.31), LatLng::new(31.50, 74.30)];
    assert_eq!(map.polylines(), vec![expected.as_slice()]);
    assert!(matches!(
        world.outcomes.borrow().last(),
        Some(InteractionOutcome::Discarded { .. })
    ));
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/interaction.feature", name = $title)]
        fn $fn_name(world: World) {
            let _ = world;
        }
    };
}

register_scenario!(
    selecting_without_destination,
    "selecting a point without a destination"
);
register_scenario!(rendering_example_route, "rendering the example route");
register_scenario!(
    handling_missing_path,
    "handling a response without a path"
);
register_scenario!(handling_server_error, "handling a server error");
register_scenario!(repeating_interaction, "repeating an interaction");
register_scenario!(stale_response_last, "a stale response arriving last");
register_scenario!(discarding_stale_response, "discarding a stale response");
