//! Cumulative capacity dimension.
//!
//! A dimension accumulates a quantity along each vehicle's path:
//!
//! ```text
//! cum(start)     = 0
//! cum(next(i))   = cum(i) + transit(i, next(i)) + slack(i),   0 <= slack(i) <= slack_max
//! cum(i)        <= capacity(vehicle)                            for every node on the path
//! ```
//!
//! Capacity is an upper bound and transits are non-negative, so the smallest
//! cumul (`slack = 0` everywhere, start at 0) is feasible whenever any choice
//! is. All loads and cumuls reported here use that choice.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::models::{Demands, DEPOT};

use super::{Violation, ViolationType};

/// Which end of an arc pays the demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandCharge {
    /// `transit(a, b) = demand(b)`: the load grows when a location is reached.
    #[default]
    OnArrival,
    /// `transit(a, b) = demand(a)`: the load grows when a location is left.
    OnDeparture,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Capacity {
    Uniform(i64),
    PerVehicle(Vec<i64>),
}

/// A named capacity constraint over per-location demands.
///
/// # Examples
///
/// ```
/// use u_fleet::constraints::CapacityDimension;
/// use u_fleet::models::Demands;
///
/// let dim = CapacityDimension::new("Demand", Demands::new(vec![0, 100, 20, 60]), 100);
/// assert_eq!(dim.route_load(&[2, 3]), 80);
/// assert_eq!(dim.cumuls(&[2, 3]), vec![0, 20, 80, 80]);
/// assert!(dim.check_route(0, &[2, 3]).is_ok());
/// assert!(dim.check_route(0, &[1, 2]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityDimension {
    name: String,
    demands: Demands,
    capacity: Capacity,
    slack_max: i64,
    fix_start_cumul_to_zero: bool,
    charge: DemandCharge,
}

impl CapacityDimension {
    /// Creates a dimension where every vehicle has the same capacity.
    ///
    /// Defaults: `slack_max = 0`, start cumul fixed to zero, demand charged
    /// on arrival.
    pub fn new(name: impl Into<String>, demands: Demands, capacity: i64) -> Self {
        Self {
            name: name.into(),
            demands,
            capacity: Capacity::Uniform(capacity),
            slack_max: 0,
            fix_start_cumul_to_zero: true,
            charge: DemandCharge::OnArrival,
        }
    }

    /// Creates a dimension with one capacity per vehicle.
    pub fn with_vehicle_capacities(
        name: impl Into<String>,
        demands: Demands,
        capacities: Vec<i64>,
    ) -> Self {
        Self {
            capacity: Capacity::PerVehicle(capacities),
            ..Self::new(name, demands, 0)
        }
    }

    /// Sets the upper bound on slack added at each node.
    pub fn with_slack_max(mut self, slack_max: i64) -> Self {
        self.slack_max = slack_max;
        self
    }

    /// Sets whether each vehicle's start cumul is pinned to zero.
    pub fn with_fix_start_cumul_to_zero(mut self, fix: bool) -> Self {
        self.fix_start_cumul_to_zero = fix;
        self
    }

    /// Sets the demand charging convention.
    pub fn with_charge(mut self, charge: DemandCharge) -> Self {
        self.charge = charge;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn demands(&self) -> &Demands {
        &self.demands
    }

    pub fn slack_max(&self) -> i64 {
        self.slack_max
    }

    pub fn fix_start_cumul_to_zero(&self) -> bool {
        self.fix_start_cumul_to_zero
    }

    pub fn charge(&self) -> DemandCharge {
        self.charge
    }

    /// Demand of a single location.
    pub fn demand(&self, location: usize) -> i64 {
        self.demands.get(location)
    }

    /// Capacity of `vehicle`.
    ///
    /// # Panics
    ///
    /// Panics if per-vehicle capacities were given and `vehicle` is out of range.
    pub fn capacity(&self, vehicle: usize) -> i64 {
        match &self.capacity {
            Capacity::Uniform(capacity) => *capacity,
            Capacity::PerVehicle(capacities) => capacities[vehicle],
        }
    }

    /// Sum of all vehicles' capacities, saturating at `i64::MAX`.
    pub fn total_capacity(&self, num_vehicles: usize) -> i64 {
        (0..num_vehicles).fold(0, |acc: i64, v| acc.saturating_add(self.capacity(v)))
    }

    /// Largest capacity in the fleet.
    pub fn max_capacity(&self, num_vehicles: usize) -> i64 {
        (0..num_vehicles)
            .map(|v| self.capacity(v))
            .max()
            .unwrap_or(0)
    }

    /// Quantity added when traversing `from → to`.
    pub fn transit(&self, from: usize, to: usize) -> i64 {
        match self.charge {
            DemandCharge::OnArrival => self.demands.get(to),
            DemandCharge::OnDeparture => self.demands.get(from),
        }
    }

    /// Cumul at the end of `depot → stops… → depot`.
    pub fn route_load(&self, stops: &[usize]) -> i64 {
        self.cumuls_iter(stops).last().unwrap_or(0)
    }

    /// Cumul at every node of the path: start, each stop, then end.
    pub fn cumuls(&self, stops: &[usize]) -> Vec<i64> {
        self.cumuls_iter(stops).collect()
    }

    /// Checks `cum(node) <= capacity(vehicle)` along the path.
    pub fn check_route(&self, vehicle: usize, stops: &[usize]) -> Result<(), Violation> {
        let capacity = self.capacity(vehicle);
        match self.cumuls_iter(stops).find(|&cumul| cumul > capacity) {
            Some(load) => Err(Violation::new(ViolationType::CapacityExceeded {
                vehicle,
                dimension: self.name.clone(),
                load,
                capacity,
            })),
            None => Ok(()),
        }
    }

    fn cumuls_iter<'a>(&'a self, stops: &'a [usize]) -> impl Iterator<Item = i64> + 'a {
        let arcs = std::iter::once(DEPOT)
            .chain(stops.iter().copied())
            .zip(stops.iter().copied().chain(std::iter::once(DEPOT)));
        std::iter::once(0).chain(arcs.scan(0, move |cumul, (from, to)| {
            *cumul = self.transit(from, to).saturating_add(*cumul);
            Some(*cumul)
        }))
    }

    pub(crate) fn validate(
        &self,
        num_locations: usize,
        num_vehicles: usize,
    ) -> Result<(), ModelError> {
        let dimension = || self.name.clone();

        if self.demands.len() != num_locations {
            return Err(ModelError::DemandLength {
                dimension: dimension(),
                expected: num_locations,
                actual: self.demands.len(),
            });
        }
        if let Some((location, &demand)) = self
            .demands
            .as_slice()
            .iter()
            .enumerate()
            .find(|(_, &d)| d < 0)
        {
            return Err(ModelError::NegativeDemand {
                dimension: dimension(),
                location,
                demand,
            });
        }
        let depot_demand = self.demands.get(DEPOT);
        if depot_demand != 0 {
            return Err(ModelError::NonZeroDepotDemand {
                dimension: dimension(),
                demand: depot_demand,
            });
        }
        if let Capacity::PerVehicle(capacities) = &self.capacity {
            if capacities.len() != num_vehicles {
                return Err(ModelError::CapacityLength {
                    dimension: dimension(),
                    expected: num_vehicles,
                    actual: capacities.len(),
                });
            }
        }
        if let Some(vehicle) = (0..num_vehicles).find(|&v| self.capacity(v) <= 0) {
            return Err(ModelError::NonPositiveCapacity {
                dimension: dimension(),
                vehicle,
                capacity: self.capacity(vehicle),
            });
        }
        if self.slack_max < 0 {
            return Err(ModelError::NegativeSlack {
                dimension: dimension(),
                slack_max: self.slack_max,
            });
        }
        // loads and packing bounds never exceed these totals
        let demand_total = self
            .demands
            .as_slice()
            .iter()
            .try_fold(0i64, |acc, &d| acc.checked_add(d));
        if demand_total.is_none() {
            return Err(ModelError::QuantityOverflow {
                dimension: dimension(),
                quantity: "demand",
            });
        }
        let capacity_total =
            (0..num_vehicles).try_fold(0i64, |acc, v| acc.checked_add(self.capacity(v)));
        if capacity_total.is_none() {
            return Err(ModelError::QuantityOverflow {
                dimension: dimension(),
                quantity: "capacity",
            });
        }
        Ok(())
    }
}
