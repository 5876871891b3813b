//! Tests of distance ranking around the intersection centre.

mod common;

use assert_approx_eq::assert_approx_eq;
use common::{east_of_centre, north_of_centre, ScriptedPort};
use rand::{Rng, SeedableRng};
use traffic_leader::math::Point2d;
use traffic_leader::{
    ActivePopulation, Axis, AxisOf, PortError, ProximityRanker, RankError, RouteNameAxis,
    SimulationPort, VehicleId,
};

fn ranker() -> ProximityRanker<RouteNameAxis> {
    ProximityRanker::new(Point2d::new(510.0, 510.0), RouteNameAxis)
}

fn population(ids: &[&str]) -> ActivePopulation {
    let ids: Vec<VehicleId> = ids.iter().map(|id| VehicleId::from(*id)).collect();
    let mut population = ActivePopulation::new();
    population.update(&ids, &[]);
    population
}

#[test]
fn nearest_first() {
    let mut port = ScriptedPort::with_vehicles(&[
        ("right_0", east_of_centre(90.0)),
        ("up_1", north_of_centre(-30.0)),
        ("left_2", east_of_centre(-250.0)),
    ]);
    let active = population(&["right_0", "up_1", "left_2"]);

    let ranked = ranker().rank(&mut port, &active, None).unwrap();
    let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["up_1", "right_0", "left_2"]);
    assert_approx_eq!(ranked[0].dist, 30.0);
    assert_approx_eq!(ranked[1].dist, 90.0);
    assert_approx_eq!(ranked[2].dist, 250.0);
}

#[test]
fn axis_filter_returns_nearest_on_axis() {
    let mut port = ScriptedPort::with_vehicles(&[
        ("right_0", east_of_centre(10.0)),
        ("up_1", north_of_centre(60.0)),
        ("down_2", north_of_centre(40.0)),
    ]);
    let active = population(&["right_0", "up_1", "down_2"]);

    let nearest = ranker()
        .nearest(&mut port, &active, Some(Axis::NorthSouth))
        .unwrap();
    assert_eq!(nearest.id.as_str(), "down_2");
    assert_approx_eq!(nearest.dist, 40.0);

    let nearest = ranker()
        .nearest(&mut port, &active, Some(Axis::EastWest))
        .unwrap();
    assert_eq!(nearest.id.as_str(), "right_0");
}

#[test]
fn equal_distances_order_by_id() {
    let mut port = ScriptedPort::with_vehicles(&[
        ("right_b", east_of_centre(100.0)),
        ("left_a", east_of_centre(-100.0)),
        ("up_c", north_of_centre(100.0)),
    ]);
    let active = population(&["right_b", "left_a", "up_c"]);

    let ranked = ranker().rank(&mut port, &active, None).unwrap();
    let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["left_a", "right_b", "up_c"]);
}

#[test]
fn no_candidate() {
    let mut port = ScriptedPort::with_vehicles(&[("right_0", east_of_centre(10.0))]);

    let empty = ActivePopulation::new();
    assert!(matches!(
        ranker().nearest(&mut port, &empty, None),
        Err(RankError::NoCandidate)
    ));

    let active = population(&["right_0"]);
    assert!(matches!(
        ranker().nearest(&mut port, &active, Some(Axis::NorthSouth)),
        Err(RankError::NoCandidate)
    ));
}

#[test]
fn unresolvable_vehicles_are_skipped() {
    let mut port = ScriptedPort::with_vehicles(&[
        ("right_0", east_of_centre(90.0)),
        ("up_1", north_of_centre(5.0)),
    ]);
    port.stale.insert("up_1".into());
    let active = population(&["right_0", "up_1", "down_9"]);

    let ranked = ranker().rank(&mut port, &active, None).unwrap();
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].id.as_str(), "right_0");

    assert!(matches!(
        ranker().nearest(&mut port, &active, Some(Axis::NorthSouth)),
        Err(RankError::NoCandidate)
    ));
}

/// A port whose connection has dropped.
struct Unreachable;

impl SimulationPort for Unreachable {
    fn step(&mut self) -> Result<(), PortError> {
        Err(PortError::Disconnected("gone".to_owned()))
    }

    fn departed_ids(&mut self) -> Result<std::collections::BTreeSet<VehicleId>, PortError> {
        Err(PortError::Disconnected("gone".to_owned()))
    }

    fn arrived_ids(&mut self) -> Result<std::collections::BTreeSet<VehicleId>, PortError> {
        Err(PortError::Disconnected("gone".to_owned()))
    }

    fn position_of(&mut self, _id: &VehicleId) -> Result<Point2d, PortError> {
        Err(PortError::Disconnected("gone".to_owned()))
    }

    fn set_phase(&mut self, _intersection: &str, _phase: usize) -> Result<(), PortError> {
        Err(PortError::Disconnected("gone".to_owned()))
    }

    fn expected_count(&mut self) -> Result<usize, PortError> {
        Err(PortError::Disconnected("gone".to_owned()))
    }

    fn close(&mut self) -> Result<(), PortError> {
        Ok(())
    }
}

#[test]
fn connection_failures_propagate() {
    let active = population(&["right_0"]);
    assert!(matches!(
        ranker().rank(&mut Unreachable, &active, None),
        Err(RankError::Port(PortError::Disconnected(_)))
    ));
}

/// Test that rankings are sorted and respect the axis filter
/// for randomly placed vehicles.
#[test]
fn random_rankings_are_sorted_and_filtered() {
    let mut rng = rand::rngs::StdRng::from_seed(*b"Vegemite sandwhich is not fun...");
    let routes = ["up", "down", "left", "right"];
    for _ in 0..50 {
        let mut port = ScriptedPort::default();
        let mut ids = vec![];
        for i in 0..rng.gen_range(1..40) {
            let id = format!("{}_{}", routes[rng.gen_range(0..4)], i);
            let pos = Point2d::new(rng.gen_range(0.0..1020.0), rng.gen_range(0.0..1020.0));
            port.place(&id, pos);
            ids.push(VehicleId::from(id));
        }
        let mut active = ActivePopulation::new();
        active.update(&ids, &[]);

        let ranked = ranker().rank(&mut port, &active, None).unwrap();
        assert_eq!(ranked.len(), ids.len());
        assert!(ranked.windows(2).all(|w| w[0].dist <= w[1].dist));

        for axis in Axis::ALL {
            match ranker().rank(&mut port, &active, Some(axis)) {
                Ok(ranked) => {
                    assert!(ranked.iter().all(|r| RouteNameAxis.axis_of(&r.id) == axis));
                    assert!(ranked.windows(2).all(|w| w[0].dist <= w[1].dist));
                    let nearest = ranker().nearest(&mut port, &active, Some(axis)).unwrap();
                    assert_eq!(nearest, ranked[0]);
                }
                Err(RankError::NoCandidate) => {
                    assert!(ids.iter().all(|id| RouteNameAxis.axis_of(id) != axis));
                }
                Err(err) => panic!("unexpected error: {err}"),
            }
        }
    }
}
