//! Fruchterman-Reingold spring layout engine
//!
//! Nodes repel each other with a force of `k² / d` and adjacent nodes attract
//! with `d² / k`, where `k` is the optimal distance. Each step moves a node by
//! at most the current temperature, which cools linearly to zero over the
//! configured number of iterations. The result is centered on its mean and
//! scaled so that its larger half-extent equals the configured scale.

use log::{debug, trace};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    config::LayoutConfig,
    error::LodestarError,
    geometry::Position,
    graph::NodeGraph,
    layout::{Layout, LayoutEngine},
};

/// Distances below this are clamped to avoid division by zero
const MIN_DISTANCE: f64 = 0.01;

/// Step length used when a node's displacement is close to zero
const MIN_STEP_LENGTH: f64 = 0.1;

/// Share of the initial extent used as starting temperature
const INITIAL_TEMPERATURE_RATIO: f64 = 0.1;

/// Spring layout engine
///
/// Runs a fixed-budget Fruchterman-Reingold simulation over a
/// [`NodeGraph`], starting from uniformly random positions in the unit square.
#[derive(Debug, Clone)]
pub struct Engine {
    // Simulation parameters
    k: Option<f64>,
    iterations: usize,
    threshold: f64,
    // Output transform
    scale: f64,
    center: Position,
    seed: Option<u64>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create a new spring layout engine with default parameters
    pub fn new() -> Self {
        Self::from_config(&LayoutConfig::default())
    }

    /// Create an engine from a [`LayoutConfig`]
    pub fn from_config(config: &LayoutConfig) -> Self {
        let (center_x, center_y) = config.center();
        Self {
            k: config.k(),
            iterations: config.iterations(),
            threshold: config.threshold(),
            scale: config.scale(),
            center: Position::new(center_x, center_y),
            seed: config.seed(),
        }
    }

    /// Set the optimal distance between nodes
    pub fn set_k(&mut self, k: Option<f64>) -> &mut Self {
        self.k = k;
        self
    }

    /// Set the number of iterations for the simulation
    pub fn set_iterations(&mut self, iterations: usize) -> &mut Self {
        self.iterations = iterations;
        self
    }

    /// Set the early-stop threshold
    pub fn set_threshold(&mut self, threshold: f64) -> &mut Self {
        self.threshold = threshold;
        self
    }

    /// Set the scale of the final layout
    pub fn set_scale(&mut self, scale: f64) -> &mut Self {
        self.scale = scale;
        self
    }

    /// Set the center of the final layout
    pub fn set_center(&mut self, center: Position) -> &mut Self {
        self.center = center;
        self
    }

    /// Set the seed of the initial placement
    pub fn set_seed(&mut self, seed: Option<u64>) -> &mut Self {
        self.seed = seed;
        self
    }

    fn validate(&self) -> Result<(), LodestarError> {
        if let Some(k) = self.k {
            if !(k.is_finite() && k > 0.0) {
                return Err(LodestarError::Layout(format!(
                    "optimal distance k must be positive and finite, got {k}"
                )));
            }
        }
        if !self.scale.is_finite() {
            return Err(LodestarError::Layout(format!(
                "scale must be finite, got {}",
                self.scale
            )));
        }
        if !self.center.is_finite() {
            return Err(LodestarError::Layout("center must be finite".to_string()));
        }
        Ok(())
    }

    /// Place nodes uniformly at random in the unit square
    fn initialize_positions(&self, node_count: usize, seed: u64) -> Vec<Position> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..node_count)
            .map(|_| Position::new(rng.random::<f64>(), rng.random::<f64>()))
            .collect()
    }

    /// Run the force simulation in place
    fn run_force_simulation(&self, positions: &mut [Position], adjacency: &Adjacency) {
        let node_count = positions.len();
        let k = self
            .k
            .unwrap_or_else(|| (1.0 / node_count as f64).sqrt());

        let mut temperature = initial_extent(positions) * INITIAL_TEMPERATURE_RATIO;
        let cooling = temperature / (self.iterations as f64 + 1.0);
        let mut displacements = vec![Position::default(); node_count];

        for iteration in 0..self.iterations {
            // Forces are computed from the positions at the start of the step
            for (i, displacement) in displacements.iter_mut().enumerate() {
                let mut total = Position::default();
                for j in 0..node_count {
                    if i == j {
                        continue;
                    }

                    let delta = positions[i].sub_point(positions[j]);
                    let distance = delta.hypot().max(MIN_DISTANCE);

                    let attraction = if adjacency.contains(i, j) {
                        distance / k
                    } else {
                        0.0
                    };
                    let factor = k * k / (distance * distance) - attraction;

                    total = total.add_point(delta.scale(factor));
                }
                *displacement = total;
            }

            // Limit every step to the current temperature
            for displacement in displacements.iter_mut() {
                let mut length = displacement.hypot();
                if length < MIN_DISTANCE {
                    length = MIN_STEP_LENGTH;
                }
                *displacement = displacement.scale(temperature / length);
            }
            for (position, step) in positions.iter_mut().zip(&displacements) {
                *position = position.add_point(*step);
            }

            temperature -= cooling;

            let mean_step = step_norm(&displacements) / node_count as f64;
            trace!(
                iteration = iteration,
                temperature = temperature,
                mean_step = mean_step;
                "Spring layout step"
            );

            if mean_step < self.threshold {
                debug!(iteration = iteration; "Spring layout converged early");
                break;
            }
        }
    }

    /// Center the layout on `center` and scale it to `scale`
    fn rescale(&self, positions: &mut [Position]) {
        let mean = positions
            .iter()
            .fold(Position::default(), |acc, &pos| acc.add_point(pos))
            .scale(1.0 / positions.len() as f64);

        for pos in positions.iter_mut() {
            *pos = pos.sub_point(mean);
        }

        let limit = positions
            .iter()
            .map(|pos| pos.x().abs().max(pos.y().abs()))
            .fold(0.0, f64::max);

        if limit > 0.0 {
            let factor = self.scale / limit;
            for pos in positions.iter_mut() {
                *pos = pos.scale(factor);
            }
        }

        for pos in positions.iter_mut() {
            *pos = pos.add_point(self.center);
        }
    }
}

impl LayoutEngine for Engine {
    fn calculate(&self, graph: &NodeGraph) -> Result<Layout, LodestarError> {
        self.validate()?;

        let node_count = graph.node_count();
        match node_count {
            0 => return Ok(Layout::default()),
            1 => return Ok(Layout::new(vec![self.center])),
            _ => {}
        }

        let seed = self.seed.unwrap_or_else(|| rand::rng().random());
        debug!(
            seed = seed,
            nodes = node_count,
            iterations = self.iterations;
            "Running spring layout"
        );

        let adjacency = Adjacency::from_graph(graph);
        let mut positions = self.initialize_positions(node_count, seed);
        self.run_force_simulation(&mut positions, &adjacency);
        self.rescale(&mut positions);

        if let Some((index, _)) = positions
            .iter()
            .enumerate()
            .find(|(_, pos)| !pos.is_finite())
        {
            let id = graph
                .node_indices()
                .nth(index)
                .and_then(|node| graph.id(node))
                .unwrap_or_default();
            return Err(LodestarError::Layout(format!(
                "spring layout produced a non-finite position for node `{id}`"
            )));
        }

        Ok(Layout::new(positions))
    }
}

/// Dense symmetric adjacency matrix
struct Adjacency {
    size: usize,
    cells: Vec<bool>,
}

impl Adjacency {
    fn from_graph(graph: &NodeGraph) -> Self {
        let size = graph.node_count();
        let mut cells = vec![false; size * size];
        for (a, b) in graph.edges() {
            let (a, b) = (a.index(), b.index());
            cells[a * size + b] = true;
            cells[b * size + a] = true;
        }
        Self { size, cells }
    }

    fn contains(&self, a: usize, b: usize) -> bool {
        self.cells[a * self.size + b]
    }
}

/// Euclidean norm of all step components taken together
fn step_norm(steps: &[Position]) -> f64 {
    steps
        .iter()
        .map(|step| step.x() * step.x() + step.y() * step.y())
        .sum::<f64>()
        .sqrt()
}

/// Larger side of the bounding box of `positions`
fn initial_extent(positions: &[Position]) -> f64 {
    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::MIN;
    let mut max_y = f64::MIN;

    for pos in positions {
        min_x = min_x.min(pos.x());
        min_y = min_y.min(pos.y());
        max_x = max_x.max(pos.x());
        max_y = max_y.max(pos.y());
    }

    (max_x - min_x).max(max_y - min_y)
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::record::NodeRecord;

    fn graph(edges: &[(&str, &str)], ids: &[&str]) -> NodeGraph {
        let records: Vec<NodeRecord> = ids
            .iter()
            .map(|id| {
                let connections = edges
                    .iter()
                    .filter(|(source, _)| source == id)
                    .map(|(_, target)| target.to_string())
                    .collect();
                NodeRecord::new(*id, connections)
            })
            .collect();
        NodeGraph::from_records(&records)
    }

    fn seeded(seed: u64) -> Engine {
        let mut engine = Engine::new();
        engine.set_seed(Some(seed));
        engine
    }

    #[test]
    fn test_empty_graph() {
        let layout = seeded(1).calculate(&NodeGraph::default()).unwrap();
        assert!(layout.is_empty());
    }

    #[test]
    fn test_single_node_sits_on_center() {
        let mut engine = seeded(1);
        engine.set_center(Position::new(3.0, -2.0));

        let layout = engine.calculate(&graph(&[], &["A"])).unwrap();

        assert_eq!(layout.positions(), [Position::new(3.0, -2.0)]);
    }

    #[test]
    fn test_two_nodes_are_symmetric_and_scaled() {
        let g = graph(&[("A", "B")], &["A", "B"]);
        let layout = seeded(7).calculate(&g).unwrap();

        let a = layout.position(g.index_of("A").unwrap()).unwrap();
        let b = layout.position(g.index_of("B").unwrap()).unwrap();

        assert!(approx_eq!(f64, a.x(), -b.x(), epsilon = 1e-9));
        assert!(approx_eq!(f64, a.y(), -b.y(), epsilon = 1e-9));
        let extent = a.x().abs().max(a.y().abs());
        assert!(approx_eq!(f64, extent, 1.0, epsilon = 1e-9));
    }

    #[test]
    fn test_same_seed_same_layout() {
        let g = graph(
            &[("A", "B"), ("B", "C"), ("C", "A"), ("C", "D")],
            &["A", "B", "C", "D", "E"],
        );

        let first = seeded(42).calculate(&g).unwrap();
        let second = seeded(42).calculate(&g).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_threshold_stops_after_first_step() {
        let g = graph(&[("A", "B"), ("B", "C")], &["A", "B", "C"]);

        let mut eager = seeded(3);
        eager.set_threshold(f64::INFINITY);
        let mut single = seeded(3);
        single.set_iterations(1);

        assert_eq!(
            eager.calculate(&g).unwrap(),
            single.calculate(&g).unwrap()
        );
    }

    #[test]
    fn test_step_norm_combines_all_steps() {
        let steps = [Position::new(3.0, 0.0), Position::new(0.0, 4.0)];
        assert!(approx_eq!(f64, step_norm(&steps), 5.0, epsilon = 1e-12));
        assert!(approx_eq!(f64, step_norm(&[]), 0.0, epsilon = 1e-12));
    }

    #[test]
    fn test_threshold_compares_norm_per_node() {
        // Every node of an edgeless graph moves a full temperature `t` in the
        // first step, so the per-node norm is `t * sqrt(n) / n = t / 2`.
        let g = graph(&[], &["A", "B", "C", "D"]);
        let engine = seeded(13);
        let initial = engine.initialize_positions(4, 13);
        let temperature = initial_extent(&initial) * INITIAL_TEMPERATURE_RATIO;

        let mut eager = seeded(13);
        eager.set_threshold(temperature * 0.75);
        let mut single = seeded(13);
        single.set_iterations(1);

        assert_eq!(eager.calculate(&g).unwrap(), single.calculate(&g).unwrap());
    }

    #[test]
    fn test_scale_and_center_are_applied() {
        let g = graph(&[("A", "B"), ("B", "C")], &["A", "B", "C", "D"]);
        let mut engine = seeded(11);
        engine
            .set_scale(50.0)
            .set_center(Position::new(100.0, 100.0));

        let layout = engine.calculate(&g).unwrap();

        let extent = layout
            .positions()
            .iter()
            .map(|pos| (pos.x() - 100.0).abs().max((pos.y() - 100.0).abs()))
            .fold(0.0, f64::max);
        assert!(approx_eq!(f64, extent, 50.0, epsilon = 1e-9));
    }

    #[test]
    fn test_invalid_k_is_rejected() {
        let mut engine = seeded(1);
        engine.set_k(Some(0.0));

        let result = engine.calculate(&graph(&[], &["A", "B"]));
        assert!(matches!(result, Err(LodestarError::Layout(_))));
    }

    #[test]
    fn test_self_loop_does_not_break_layout() {
        let g = graph(&[("A", "A"), ("A", "B")], &["A", "B"]);
        let layout = seeded(5).calculate(&g).unwrap();
        assert!(layout.positions().iter().all(|pos| pos.is_finite()));
    }

    #[test]
    fn test_zero_iterations_still_rescales() {
        let g = graph(&[], &["A", "B", "C"]);
        let mut engine = seeded(9);
        engine.set_iterations(0);

        let layout = engine.calculate(&g).unwrap();
        let extent = layout
            .positions()
            .iter()
            .map(|pos| pos.x().abs().max(pos.y().abs()))
            .fold(0.0, f64::max);
        assert!(approx_eq!(f64, extent, 1.0, epsilon = 1e-9));
    }

    fn edges_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
        (2usize..24).prop_flat_map(|count| {
            (
                Just(count),
                prop::collection::vec((0..count, 0..count), 0..count * 2),
            )
        })
    }

    fn check_positions_are_finite_and_bounded(
        count: usize,
        edges: Vec<(usize, usize)>,
        seed: u64,
    ) -> Result<(), TestCaseError> {
        let ids: Vec<String> = (0..count).map(|i| format!("n{i}")).collect();
        let records: Vec<NodeRecord> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let connections = edges
                    .iter()
                    .filter(|(source, _)| *source == i)
                    .map(|(_, target)| ids[*target].clone())
                    .collect();
                NodeRecord::new(id.clone(), connections)
            })
            .collect();
        let g = NodeGraph::from_records(&records);

        let layout = seeded(seed).calculate(&g).unwrap();

        prop_assert_eq!(layout.len(), count);
        for pos in layout.positions() {
            prop_assert!(pos.is_finite());
            prop_assert!(pos.x().abs() <= 1.0 + 1e-9);
            prop_assert!(pos.y().abs() <= 1.0 + 1e-9);
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn positions_are_finite_and_bounded(
            (count, edges) in edges_strategy(),
            seed in any::<u64>(),
        ) {
            check_positions_are_finite_and_bounded(count, edges, seed)?;
        }
    }
}
