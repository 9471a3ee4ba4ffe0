use crate::local_search::Move;
use crate::models::RoutingModel;

/// Working copy of the routes with cached per-vehicle cost and loads.
///
/// `routes[v]` lists the locations vehicle `v` visits, depot excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteState {
    routes: Vec<Vec<usize>>,
    costs: Vec<i64>,
    /// `loads[v][d]`: end load of vehicle `v` in dimension `d`.
    loads: Vec<Vec<i64>>,
}

impl RouteState {
    pub(crate) fn new(model: &RoutingModel, routes: Vec<Vec<usize>>) -> Self {
        debug_assert_eq!(routes.len(), model.num_vehicles());
        let mut state = Self {
            costs: vec![0; routes.len()],
            loads: vec![Vec::new(); routes.len()],
            routes,
        };
        for vehicle in 0..state.routes.len() {
            state.refresh(model, vehicle);
        }
        state
    }

    pub fn num_vehicles(&self) -> usize {
        self.routes.len()
    }

    pub fn routes(&self) -> &[Vec<usize>] {
        &self.routes
    }

    pub fn route(&self, vehicle: usize) -> &[usize] {
        &self.routes[vehicle]
    }

    pub fn cost(&self, vehicle: usize) -> i64 {
        self.costs[vehicle]
    }

    pub fn total_cost(&self) -> i64 {
        self.costs.iter().sum()
    }

    #[cfg(test)]
    pub fn load(&self, vehicle: usize, dimension: usize) -> i64 {
        self.loads[vehicle][dimension]
    }

    /// Whether `vehicle` stays within every capacity after dropping
    /// `removed` and taking on `added`.
    ///
    /// A route's peak load is its end load since demands are non-negative.
    pub(crate) fn fits_exchange(
        &self,
        model: &RoutingModel,
        vehicle: usize,
        removed: &[usize],
        added: &[usize],
    ) -> bool {
        model.dimensions().iter().enumerate().all(|(d, dim)| {
            let out: i64 = removed.iter().map(|&loc| dim.demand(loc)).sum();
            let inc: i64 = added.iter().map(|&loc| dim.demand(loc)).sum();
            self.loads[vehicle][d] - out + inc <= dim.capacity(vehicle)
        })
    }

    pub(crate) fn apply(&mut self, model: &RoutingModel, mv: &Move) {
        mv.apply(&mut self.routes);
        let (first, second) = mv.vehicles();
        self.refresh(model, first);
        if second != first {
            self.refresh(model, second);
        }
    }

    fn refresh(&mut self, model: &RoutingModel, vehicle: usize) {
        let stops = &self.routes[vehicle];
        self.costs[vehicle] = model.route_cost(vehicle, stops);
        self.loads[vehicle] = model
            .dimensions()
            .iter()
            .map(|dim| dim.route_load(stops))
            .collect();
        debug_assert!(model.fits(vehicle, stops), "vehicle {vehicle} overloaded");
    }
}
