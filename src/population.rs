use crate::VehicleId;
use log::trace;
use std::collections::BTreeSet;

/// The set of vehicles currently present in the simulation.
///
/// Kept ordered so that iteration, and therefore ranking, is deterministic.
#[derive(Clone, Debug, Default)]
pub struct ActivePopulation {
    ids: BTreeSet<VehicleId>,
}

impl ActivePopulation {
    /// Creates an empty population.
    pub fn new() -> Self {
        Default::default()
    }

    /// Applies one tick's worth of population changes: every `appeared` vehicle
    /// is added, then every `disappeared` vehicle is removed.
    /// Vehicles which disappear without being tracked are ignored.
    pub fn update<'a>(
        &mut self,
        appeared: impl IntoIterator<Item = &'a VehicleId>,
        disappeared: impl IntoIterator<Item = &'a VehicleId>,
    ) -> &BTreeSet<VehicleId> {
        for id in appeared {
            if self.ids.insert(id.clone()) {
                trace!("vehicle {} appeared", id);
            }
        }
        for id in disappeared {
            if self.ids.remove(id) {
                trace!("vehicle {} disappeared", id);
            }
        }
        &self.ids
    }

    /// Whether the vehicle is currently tracked.
    pub fn contains(&self, id: &VehicleId) -> bool {
        self.ids.contains(id)
    }

    /// Stops tracking a vehicle, returning whether it was tracked.
    pub fn remove(&mut self, id: &VehicleId) -> bool {
        self.ids.remove(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterates over the tracked vehicles in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &VehicleId> {
        self.ids.iter()
    }

    pub fn as_set(&self) -> &BTreeSet<VehicleId> {
        &self.ids
    }
}

impl<'a> IntoIterator for &'a ActivePopulation {
    type Item = &'a VehicleId;
    type IntoIter = std::collections::btree_set::Iter<'a, VehicleId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}
