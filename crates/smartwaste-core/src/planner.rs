//! Collection route planning
//!
//! Routes are built greedily: starting from the depot (or wherever the truck
//! is), repeatedly drive to the closest container not yet visited. This is
//! the classic nearest-neighbor heuristic for the travelling salesman
//! problem. It is not optimal but is O(n²) and predictable.
//!
//! Ties are broken by candidate order, which the store guarantees to be
//! ascending container id. The same input therefore always yields the same
//! route.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::geo::haversine_km;
use crate::model::{ContainerLocation, Point, Status};
use crate::{ContainerStore, Result};

/// One visit in a planned route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct RouteStop {
    pub container: ContainerLocation,
    /// Distance from the previous stop (or the start point), in km
    pub leg_km: f64,
}

/// An ordered sequence of container visits
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Route {
    pub stops: Vec<RouteStop>,
    pub total_distance_km: f64,
}

impl Route {
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Container ids in visit order
    pub fn container_ids(&self) -> Vec<&str> {
        self.stops.iter().map(|s| s.container.id.as_str()).collect()
    }
}

/// Order `candidates` by repeatedly taking the nearest remaining one.
///
/// Only a strictly shorter distance displaces the current best, so among
/// equidistant candidates the earliest in input order wins.
pub fn nearest_neighbor(start: Point, candidates: Vec<ContainerLocation>) -> Route {
    let mut remaining = candidates;
    let mut route = Route {
        stops: Vec::with_capacity(remaining.len()),
        total_distance_km: 0.0,
    };
    let mut current = start;

    while !remaining.is_empty() {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;

        for (idx, candidate) in remaining.iter().enumerate() {
            let distance = haversine_km(current, candidate.location);
            if distance < best_distance {
                best = idx;
                best_distance = distance;
            }
        }

        // `remove` rather than `swap_remove`: the tie-break depends on order
        let next = remaining.remove(best);
        current = next.location;
        route.total_distance_km += best_distance;
        route.stops.push(RouteStop {
            container: next,
            leg_km: best_distance,
        });
    }

    route
}

/// Plans collection routes over containers selected by status
#[derive(Clone)]
pub struct RoutePlanner {
    store: Arc<dyn ContainerStore>,
}

impl RoutePlanner {
    pub fn new(store: Arc<dyn ContainerStore>) -> Self {
        Self { store }
    }

    /// Visit order for every container whose status is in `statuses`.
    ///
    /// No matching containers is an empty route, not an error. A store
    /// failure fails the whole call and is the only failure path; callers
    /// range-check `start` themselves.
    pub async fn plan_route(&self, start: Point, statuses: &[Status]) -> Result<Route> {
        if statuses.is_empty() {
            return Ok(Route::default());
        }

        let candidates = self
            .store
            .find_containers_by_status(statuses)
            .await
            .map_err(|err| {
                warn!(error = %err, "Failed to fetch route candidates");
                err.context("plan route")
            })?;

        let route = nearest_neighbor(start, candidates);

        debug!(
            start = %start,
            stops = route.len(),
            total_km = route.total_distance_km,
            "Planned route"
        );
        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedStore;
    use crate::Error;

    fn loc(id: &str, lat: f64, lon: f64) -> ContainerLocation {
        ContainerLocation {
            id: id.to_string(),
            location: Point::new(lat, lon),
        }
    }

    #[test]
    fn test_empty_candidates() {
        let route = nearest_neighbor(Point::new(0.0, 0.0), Vec::new());
        assert!(route.is_empty());
        assert_eq!(route.total_distance_km, 0.0);
    }

    #[test]
    fn test_nearest_first_then_onward() {
        // Start at (0,1): (0,0) is 1° away, (0,10) is 9° away
        let route = nearest_neighbor(
            Point::new(0.0, 1.0),
            vec![loc("far", 0.0, 10.0), loc("near", 0.0, 0.0)],
        );
        assert_eq!(route.container_ids(), vec!["near", "far"]);

        let one_degree = haversine_km(Point::new(0.0, 0.0), Point::new(0.0, 1.0));
        assert!((route.stops[0].leg_km - one_degree).abs() < 1e-9);
        assert!((route.stops[1].leg_km - 10.0 * one_degree).abs() < 1e-6);
        assert!((route.total_distance_km - 11.0 * one_degree).abs() < 1e-6);
    }

    #[test]
    fn test_tie_resolved_by_input_order() {
        // Both are exactly 1° of longitude from the start
        let start = Point::new(0.0, 0.0);
        let route = nearest_neighbor(start, vec![loc("a", 0.0, 1.0), loc("b", 0.0, -1.0)]);
        assert_eq!(route.container_ids()[0], "a");

        let route = nearest_neighbor(start, vec![loc("b", 0.0, -1.0), loc("a", 0.0, 1.0)]);
        assert_eq!(route.container_ids()[0], "b");
    }

    #[test]
    fn test_route_is_permutation_of_candidates() {
        let candidates = vec![
            loc("c1", 40.4168, -3.7038),
            loc("c2", 40.4200, -3.7000),
            loc("c3", 40.4100, -3.7100),
            loc("c4", 40.4300, -3.6900),
            loc("c5", 40.4168, -3.7038),
        ];
        let route = nearest_neighbor(Point::new(40.40, -3.72), candidates.clone());

        let mut got: Vec<&str> = route.container_ids();
        got.sort();
        let mut expected: Vec<&str> = candidates.iter().map(|c| c.id.as_str()).collect();
        expected.sort();
        assert_eq!(got, expected);

        let leg_sum: f64 = route.stops.iter().map(|s| s.leg_km).sum();
        assert!((leg_sum - route.total_distance_km).abs() < 1e-9);
    }

    #[test]
    fn test_colocated_containers_follow_each_other() {
        let route = nearest_neighbor(
            Point::new(0.0, 0.0),
            vec![loc("x", 0.0, 5.0), loc("y", 0.0, 2.0), loc("z", 0.0, 2.0)],
        );
        assert_eq!(route.container_ids(), vec!["y", "z", "x"]);
        assert_eq!(route.stops[1].leg_km, 0.0);
    }

    #[tokio::test]
    async fn test_plan_route_uses_store_candidates() {
        let store = Arc::new(ScriptedStore::with_candidates(vec![
            loc("a", 0.0, 0.0),
            loc("b", 0.0, 10.0),
        ]));
        let planner = RoutePlanner::new(store);

        let route = planner
            .plan_route(Point::new(0.0, 1.0), &[Status::High])
            .await
            .unwrap();
        assert_eq!(route.container_ids(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_plan_route_empty_status_set() {
        let store = Arc::new(ScriptedStore::with_candidates(vec![loc("a", 0.0, 0.0)]));
        let planner = RoutePlanner::new(store);

        let route = planner.plan_route(Point::new(0.0, 1.0), &[]).await.unwrap();
        assert!(route.is_empty());
    }

    #[tokio::test]
    async fn test_plan_route_store_failure() {
        let store = Arc::new(ScriptedStore::failing(Error::Persistence(
            "connection refused".to_string(),
        )));
        let planner = RoutePlanner::new(store);

        let err = planner
            .plan_route(Point::new(0.0, 0.0), &[Status::High])
            .await
            .unwrap_err();
        assert_eq!(
            err,
            Error::Persistence("plan route: connection refused".to_string())
        );
    }

    #[tokio::test]
    async fn test_plan_route_accepts_any_start() {
        let store = Arc::new(ScriptedStore::with_candidates(vec![loc("a", 0.0, 0.0)]));
        let planner = RoutePlanner::new(store);

        let route = planner
            .plan_route(Point::new(95.0, 0.0), &[Status::High])
            .await
            .unwrap();
        assert_eq!(route.container_ids(), vec!["a"]);
    }
}
