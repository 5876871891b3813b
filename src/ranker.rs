use crate::error::{PortError, RankError, RankResult};
use crate::math::{distance, Point2d};
use crate::{Axis, AxisOf, SimulationPort, VehicleId};
use itertools::Itertools;
use log::warn;

/// A vehicle and its distance from the intersection centre.
#[derive(Clone, Debug, PartialEq)]
pub struct Ranked {
    pub id: VehicleId,
    /// Distance from the intersection centre in m.
    pub dist: f64,
}

/// Orders vehicles by their distance to the intersection centre.
pub struct ProximityRanker<A> {
    /// The centre of the intersection.
    centre: Point2d,
    /// The rule mapping vehicles onto travel axes.
    axis_of: A,
}

impl<A: AxisOf> ProximityRanker<A> {
    /// Creates a ranker around the given intersection centre.
    pub fn new(centre: Point2d, axis_of: A) -> Self {
        Self { centre, axis_of }
    }

    pub fn centre(&self) -> Point2d {
        self.centre
    }

    /// The travel axis of a vehicle.
    pub fn axis_of(&self, id: &VehicleId) -> Axis {
        self.axis_of.axis_of(id)
    }

    /// Ranks `vehicles` nearest first, optionally keeping only those travelling along `filter`.
    ///
    /// Positions are fetched fresh from the port. Vehicles whose position cannot be
    /// resolved are skipped. Vehicles at exactly the same distance are ordered by ID.
    pub fn rank<'a, P: SimulationPort + ?Sized>(
        &self,
        port: &mut P,
        vehicles: impl IntoIterator<Item = &'a VehicleId>,
        filter: Option<Axis>,
    ) -> RankResult<Vec<Ranked>> {
        let mut ranked = vec![];
        for id in vehicles {
            if filter.map_or(false, |axis| self.axis_of(id) != axis) {
                continue;
            }
            match port.position_of(id) {
                Ok(pos) => ranked.push(Ranked {
                    id: id.clone(),
                    dist: distance(pos, self.centre),
                }),
                Err(PortError::Unresolvable(_)) => {
                    warn!("skipping vehicle {} while ranking: position unavailable", id);
                }
                Err(err) => return Err(err.into()),
            }
        }

        if ranked.is_empty() {
            return Err(RankError::NoCandidate);
        }

        Ok(ranked
            .into_iter()
            .sorted_by(|a, b| a.dist.total_cmp(&b.dist).then_with(|| a.id.cmp(&b.id)))
            .collect())
    }

    /// The single nearest vehicle, optionally restricted to those travelling along `filter`.
    pub fn nearest<'a, P: SimulationPort + ?Sized>(
        &self,
        port: &mut P,
        vehicles: impl IntoIterator<Item = &'a VehicleId>,
        filter: Option<Axis>,
    ) -> RankResult<Ranked> {
        self.rank(port, vehicles, filter)?
            .into_iter()
            .next()
            .ok_or(RankError::NoCandidate)
    }
}
