//! Per-vehicle traversal costs.

use crate::error::ModelError;

use super::DEPOT;

/// Supplies the integer cost of traversing `from → to` with a given vehicle.
///
/// Implemented for plain closures so callers can hand in any lookup:
///
/// ```
/// use u_fleet::models::CostProvider;
///
/// let provider = |from: usize, to: usize, vehicle: usize| {
///     (from as i64 - to as i64).abs() * (vehicle as i64 + 1)
/// };
/// assert_eq!(provider.cost(1, 3, 1), 4);
/// ```
pub trait CostProvider {
    /// Cost of the arc `from → to` for `vehicle`.
    fn cost(&self, from: usize, to: usize, vehicle: usize) -> i64;
}

impl<F> CostProvider for F
where
    F: Fn(usize, usize, usize) -> i64,
{
    fn cost(&self, from: usize, to: usize, vehicle: usize) -> i64 {
        self(from, to, vehicle)
    }
}

/// A dense cost table indexed by `(vehicle, from, to)`.
///
/// Stored vehicle-major so each vehicle's costs form one contiguous
/// `size × size` block, exposed through [`VehicleCost`].
///
/// # Examples
///
/// ```
/// use u_fleet::models::CostMatrix;
///
/// // [from][to][vehicle], as in a hand-written table
/// let matrix = CostMatrix::from_nested(&[
///     vec![vec![0, 0], vec![5, 10]],
///     vec![vec![5, 10], vec![0, 0]],
/// ])
/// .unwrap();
/// assert_eq!(matrix.get(0, 1, 0), 5);
/// assert_eq!(matrix.get(0, 1, 1), 10);
/// assert_eq!(matrix.for_vehicle(1).get(1, 0), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    data: Vec<i64>,
    size: usize,
    num_vehicles: usize,
}

impl CostMatrix {
    /// Creates a zero-cost matrix for `size` locations and `num_vehicles` vehicles.
    pub fn new(size: usize, num_vehicles: usize) -> Self {
        Self {
            data: vec![0; size * size * num_vehicles],
            size,
            num_vehicles,
        }
    }

    /// Materializes a provider into a dense table, querying every triple once.
    ///
    /// Rejects negative costs and non-zero costs on self-pairs.
    pub fn from_provider<P>(
        size: usize,
        num_vehicles: usize,
        provider: &P,
    ) -> Result<Self, ModelError>
    where
        P: CostProvider + ?Sized,
    {
        let mut matrix = Self::new(size, num_vehicles);
        for vehicle in 0..num_vehicles {
            for from in 0..size {
                for to in 0..size {
                    let cost = provider.cost(from, to, vehicle);
                    check_cost(from, to, vehicle, cost)?;
                    matrix.set(from, to, vehicle, cost);
                }
            }
        }
        Ok(matrix)
    }

    /// Builds a matrix from a `[from][to][vehicle]` nested table.
    ///
    /// Every row must have the same length as the outer table and every cell
    /// the same number of vehicles.
    pub fn from_nested(table: &[Vec<Vec<i64>>]) -> Result<Self, ModelError> {
        let size = table.len();
        let num_vehicles = table
            .first()
            .and_then(|row| row.first())
            .map_or(0, |cell| cell.len());

        for (from, row) in table.iter().enumerate() {
            if row.len() != size {
                return Err(ModelError::CostShape(format!(
                    "row {from} has {} columns, expected {size}",
                    row.len()
                )));
            }
            if let Some(to) = row.iter().position(|cell| cell.len() != num_vehicles) {
                return Err(ModelError::CostShape(format!(
                    "cell ({from}, {to}) has {} vehicle costs, expected {num_vehicles}",
                    row[to].len()
                )));
            }
        }

        Self::from_provider(size, num_vehicles, &|from: usize, to: usize, vehicle: usize| {
            table[from][to][vehicle]
        })
    }

    /// Returns the cost of `from → to` for `vehicle`.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    pub fn get(&self, from: usize, to: usize, vehicle: usize) -> i64 {
        self.data[self.offset(from, to, vehicle)]
    }

    /// Overwrites the cost of `from → to` for `vehicle`.
    pub fn set(&mut self, from: usize, to: usize, vehicle: usize, cost: i64) {
        let offset = self.offset(from, to, vehicle);
        self.data[offset] = cost;
    }

    /// Number of locations.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of vehicles.
    pub fn num_vehicles(&self) -> usize {
        self.num_vehicles
    }

    /// Largest cost over every arc and vehicle (0 when empty).
    pub fn max_cost(&self) -> i64 {
        self.data.iter().copied().max().unwrap_or(0)
    }

    /// Returns `true` if `vehicle`'s costs are the same in both directions.
    pub fn is_symmetric(&self, vehicle: usize) -> bool {
        let costs = self.for_vehicle(vehicle);
        (0..self.size).all(|i| ((i + 1)..self.size).all(|j| costs.get(i, j) == costs.get(j, i)))
    }

    /// The cost function of a single vehicle.
    ///
    /// # Panics
    ///
    /// Panics if `vehicle` is out of range.
    pub fn for_vehicle(&self, vehicle: usize) -> VehicleCost<'_> {
        let block = self.size * self.size;
        VehicleCost {
            costs: &self.data[vehicle * block..(vehicle + 1) * block],
            size: self.size,
            vehicle,
        }
    }

    fn offset(&self, from: usize, to: usize, vehicle: usize) -> usize {
        (vehicle * self.size + from) * self.size + to
    }
}

impl CostProvider for CostMatrix {
    fn cost(&self, from: usize, to: usize, vehicle: usize) -> i64 {
        self.get(from, to, vehicle)
    }
}

fn check_cost(from: usize, to: usize, vehicle: usize, cost: i64) -> Result<(), ModelError> {
    if cost < 0 {
        return Err(ModelError::NegativeCost {
            from,
            to,
            vehicle,
            cost,
        });
    }
    if from == to && cost != 0 {
        return Err(ModelError::NonZeroSelfCost {
            location: from,
            vehicle,
            cost,
        });
    }
    Ok(())
}

/// One vehicle's slice of a [`CostMatrix`].
#[derive(Debug, Clone, Copy)]
pub struct VehicleCost<'a> {
    costs: &'a [i64],
    size: usize,
    vehicle: usize,
}

impl VehicleCost<'_> {
    /// Cost of `from → to`.
    pub fn get(&self, from: usize, to: usize) -> i64 {
        self.costs[from * self.size + to]
    }

    /// The vehicle these costs belong to.
    pub fn vehicle(&self) -> usize {
        self.vehicle
    }

    /// Cost of `depot → stops[0] → … → stops[n-1] → depot`.
    ///
    /// An empty route never leaves the depot and costs nothing.
    pub fn route_cost(&self, stops: &[usize]) -> i64 {
        self.path_cost(stops.iter().copied())
    }

    /// Like [`route_cost`](Self::route_cost) for any ordered sequence of stops.
    pub fn path_cost<I>(&self, stops: I) -> i64
    where
        I: IntoIterator<Item = usize>,
    {
        let mut prev = DEPOT;
        let mut total: i64 = 0;
        for stop in stops {
            total = total.saturating_add(self.get(prev, stop));
            prev = stop;
        }
        total.saturating_add(self.get(prev, DEPOT))
    }

    /// Cheapest candidate to reach from `from`; ties go to the earlier candidate.
    pub fn nearest(&self, from: usize, candidates: &[usize]) -> Option<usize> {
        candidates
            .iter()
            .copied()
            .min_by_key(|&to| self.get(from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The A/B/C/D table: salaried driver (vehicle 0) and special driver (vehicle 1).
    fn abcd() -> CostMatrix {
        CostMatrix::from_nested(&[
            vec![vec![0, 0], vec![5, 10], vec![3, 6], vec![10, 2]],
            vec![vec![5, 10], vec![0, 0], vec![2, 4], vec![7, 14]],
            vec![vec![3, 6], vec![2, 4], vec![0, 0], vec![1, 2]],
            vec![vec![10, 2], vec![7, 14], vec![1, 2], vec![0, 0]],
        ])
        .expect("valid table")
    }

    #[test]
    fn test_from_nested_layout() {
        let m = abcd();
        assert_eq!(m.size(), 4);
        assert_eq!(m.num_vehicles(), 2);
        assert_eq!(m.get(0, 3, 0), 10);
        assert_eq!(m.get(0, 3, 1), 2);
        assert_eq!(m.get(2, 1, 1), 4);
    }

    #[test]
    fn test_from_provider_rejects_negative() {
        let err = CostMatrix::from_provider(2, 1, &|from: usize, to: usize, _v: usize| -> i64 {
            if from == 1 && to == 0 {
                -1
            } else {
                0
            }
        })
        .unwrap_err();
        assert_eq!(
            err,
            ModelError::NegativeCost {
                from: 1,
                to: 0,
                vehicle: 0,
                cost: -1
            }
        );
    }

    #[test]
    fn test_from_provider_rejects_self_cost() {
        let err = CostMatrix::from_provider(2, 2, &|_f: usize, _t: usize, v: usize| v as i64)
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::NonZeroSelfCost {
                location: 0,
                vehicle: 1,
                cost: 1
            }
        ));
    }

    #[test]
    fn test_from_nested_ragged() {
        let err = CostMatrix::from_nested(&[vec![vec![0], vec![1]], vec![vec![1]]]).unwrap_err();
        assert!(matches!(err, ModelError::CostShape(_)));

        let err =
            CostMatrix::from_nested(&[vec![vec![0], vec![1, 2]], vec![vec![1], vec![0]]])
                .unwrap_err();
        assert!(matches!(err, ModelError::CostShape(_)));
    }

    #[test]
    fn test_vehicle_cost_route() {
        let m = abcd();
        // 0 -> 2 -> 3 -> 0 with vehicle 1: 6 + 2 + 2
        assert_eq!(m.for_vehicle(1).route_cost(&[2, 3]), 10);
        assert_eq!(m.for_vehicle(0).route_cost(&[2, 3]), 14);
        assert_eq!(m.for_vehicle(0).route_cost(&[]), 0);
    }

    #[test]
    fn test_max_cost_and_saturating_route() {
        let mut m = abcd();
        assert_eq!(m.max_cost(), 14);
        m.set(0, 1, 0, i64::MAX);
        assert_eq!(m.for_vehicle(0).route_cost(&[1, 2]), i64::MAX);
    }

    #[test]
    fn test_nearest() {
        let m = abcd();
        assert_eq!(m.for_vehicle(0).nearest(0, &[1, 2, 3]), Some(2));
        assert_eq!(m.for_vehicle(1).nearest(0, &[1, 2, 3]), Some(3));
        assert_eq!(m.for_vehicle(1).nearest(0, &[]), None);
    }

    #[test]
    fn test_symmetry() {
        let mut m = abcd();
        assert!(m.is_symmetric(0));
        m.set(1, 2, 0, 9);
        assert!(!m.is_symmetric(0));
        assert!(m.is_symmetric(1));
    }

    #[test]
    fn test_matrix_as_provider() {
        let m = abcd();
        let copy = CostMatrix::from_provider(4, 2, &m).expect("valid");
        assert_eq!(copy, m);
    }
}
