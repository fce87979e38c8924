use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use crate::algorithms::Error;
use crate::graph::{Edge, Graph};

/// Parameters of a randomly generated problem instance.
#[derive(Debug, Clone, Copy)]
pub struct InstanceParams {
    /// Seed for the generator. A fresh entropy seed is used when `None`.
    pub seed: Option<u64>,

    /// Happiness, stress and the stress budget are drawn from `[0, max_weight)`.
    pub max_weight: f64,
}

impl Default for InstanceParams {
    fn default() -> Self {
        InstanceParams {
            seed: None,
            max_weight: 100.0,
        }
    }
}

// Keep at most three decimals so instances survive a round trip through a file.
fn round_to_thousandths(value: f64) -> f64 {
    (value * 1000.0).floor() / 1000.0
}

/// Generate a complete graph with random weights, together with its stress budget.
pub fn gen_random_instance(num_of_vertices: usize, params: &InstanceParams) -> Result<(Graph, f64), Error> {
    if !params.max_weight.is_finite() {
        return Err(Error::NonFiniteValues);
    }
    if params.max_weight <= 0.0 {
        return Err(Error::NegativeValues);
    }

    let mut rng = match params.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy()
    };

    let mut edges = Vec::with_capacity(num_of_vertices * num_of_vertices.saturating_sub(1) / 2);
    for vertex1 in 0..num_of_vertices {
        for vertex2 in vertex1 + 1..num_of_vertices {
            let happiness = round_to_thousandths(rng.gen_range(0.0..params.max_weight));
            let stress = round_to_thousandths(rng.gen_range(0.0..params.max_weight));
            edges.push(Edge::new(vertex1, vertex2, happiness, stress));
        }
    }
    let stress_budget = round_to_thousandths(rng.gen_range(0.0..params.max_weight));

    Ok((Graph::from_edges(num_of_vertices, edges)?, stress_budget))
}
