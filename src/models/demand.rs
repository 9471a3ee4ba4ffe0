//! Per-location demand quantities.

/// Supplies the demand of a location.
///
/// ```
/// use u_fleet::models::DemandProvider;
///
/// let demands = [0_i64, 100, 20, 60];
/// let provider = |location: usize| demands[location];
/// assert_eq!(provider.demand(2), 20);
/// ```
pub trait DemandProvider {
    /// Demand at `location`.
    fn demand(&self, location: usize) -> i64;
}

impl<F> DemandProvider for F
where
    F: Fn(usize) -> i64,
{
    fn demand(&self, location: usize) -> i64 {
        self(location)
    }
}

/// A demand table indexed by location (index 0 = depot).
///
/// Values are validated when the owning
/// [`CapacityDimension`](crate::constraints::CapacityDimension) is added to a
/// model.
///
/// # Examples
///
/// ```
/// use u_fleet::models::Demands;
///
/// let demands = Demands::new(vec![0, 100, 20, 60]);
/// assert_eq!(demands.get(1), 100);
/// assert_eq!(demands.total(), 180);
/// assert_eq!(demands.max(), 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Demands {
    values: Vec<i64>,
}

impl Demands {
    /// Wraps a demand vector.
    pub fn new(values: Vec<i64>) -> Self {
        Self { values }
    }

    /// Materializes a provider over `size` locations.
    pub fn from_provider<P>(size: usize, provider: &P) -> Self
    where
        P: DemandProvider + ?Sized,
    {
        Self::new((0..size).map(|location| provider.demand(location)).collect())
    }

    /// Demand at `location`.
    ///
    /// # Panics
    ///
    /// Panics if `location` is out of bounds.
    pub fn get(&self, location: usize) -> i64 {
        self.values[location]
    }

    /// Number of locations covered.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sum of all demands, saturating at `i64::MAX`.
    pub fn total(&self) -> i64 {
        self.values.iter().fold(0, |acc: i64, &d| acc.saturating_add(d))
    }

    /// Largest single demand (0 when empty).
    pub fn max(&self) -> i64 {
        self.values.iter().copied().max().unwrap_or(0)
    }

    /// The raw values.
    pub fn as_slice(&self) -> &[i64] {
        &self.values
    }
}

impl DemandProvider for Demands {
    fn demand(&self, location: usize) -> i64 {
        self.get(location)
    }
}
