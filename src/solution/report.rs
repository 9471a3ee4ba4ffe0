//! Plain-text rendering of a solution.

use std::fmt;

use super::{SearchStatus, Solution};

/// Formats a [`Solution`] as a route listing.
///
/// ```text
/// Total cost: 20
/// Vehicle 0: A -> B -> A (cost 10, demand 100)
/// Vehicle 1: A -> C -> D -> A (cost 10, demand 80)
/// ```
///
/// Locations without a name are printed by index.
pub struct SolutionReport<'a, S> {
    solution: &'a Solution,
    names: &'a [S],
}

impl<'a, S: AsRef<str>> SolutionReport<'a, S> {
    pub fn new(solution: &'a Solution, names: &'a [S]) -> Self {
        Self { solution, names }
    }

    fn write_location(&self, f: &mut fmt::Formatter<'_>, location: usize) -> fmt::Result {
        match self.names.get(location) {
            Some(name) => f.write_str(name.as_ref()),
            None => write!(f, "{location}"),
        }
    }
}

impl<S: AsRef<str>> fmt::Display for SolutionReport<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Total cost: {}", self.solution.objective())?;
        if self.solution.status() == SearchStatus::BudgetExhausted {
            f.write_str(" (search budget exhausted)")?;
        }
        writeln!(f)?;

        for route in self.solution.routes() {
            write!(f, "Vehicle {}: ", route.vehicle())?;
            for &location in route.locations() {
                self.write_location(f, location)?;
                f.write_str(" -> ")?;
            }
            self.write_location(f, route.locations()[0])?;
            writeln!(f, " (cost {}, demand {})", route.cost(), route.demand())?;
        }
        Ok(())
    }
}
