// Greedy pair seating. Edges are visited by decreasing happiness per unit of
// stress and both ends of an edge are seated together in the room currently
// being filled, as long as the room stays under its stress threshold.

use std::cmp::Ordering;
use nalgebra::DMatrix;
use num_traits::ToPrimitive;
use rustc_hash::FxHashSet;
use tracing::trace;
use crate::algorithms::Error;
use crate::graph::Graph;
use crate::Partition;

/// Dense N x N copies of the edge weights, zero where there is no edge.
#[derive(Debug, Clone)]
pub(crate) struct WeightMatrices {
    pub(crate) happiness: DMatrix<f64>,
    pub(crate) stress: DMatrix<f64>,
}

impl WeightMatrices {
    pub(crate) fn from_graph(graph: &Graph) -> Self {
        let num_of_vertices = graph.len();
        let mut happiness = DMatrix::zeros(num_of_vertices, num_of_vertices);
        let mut stress = DMatrix::zeros(num_of_vertices, num_of_vertices);

        for edge in graph.edges() {
            happiness[(edge.vertex1, edge.vertex2)] = edge.happiness;
            happiness[(edge.vertex2, edge.vertex1)] = edge.happiness;
            stress[(edge.vertex1, edge.vertex2)] = edge.stress;
            stress[(edge.vertex2, edge.vertex1)] = edge.stress;
        }

        Self { happiness, stress }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct RatioScore {
    vertex1: usize,
    vertex2: usize,

    // happiness / stress, or plain happiness for stress-free edges.
    ratio: f64,
}

// One score per edge, best ratio first. The sort is stable so edges with equal
// ratios keep the order in which they were supplied.
fn ratio_scores(graph: &Graph) -> Vec<RatioScore> {
    let mut scores: Vec<RatioScore> = graph
        .edges()
        .iter()
        .map(|edge| RatioScore {
            vertex1: edge.vertex1,
            vertex2: edge.vertex2,
            ratio: if edge.stress == 0.0 { edge.happiness } else { edge.happiness / edge.stress },
        })
        .collect();

    scores.sort_by(|a, b| b.ratio.partial_cmp(&a.ratio).unwrap_or(Ordering::Equal));
    scores
}

// State of the room currently being filled.
#[derive(Debug, Default)]
struct RoomState {
    current_room: usize,
    current_room_stress: f64,
    inhabitants: Vec<usize>,
}

impl RoomState {
    fn seat_pair(&mut self, part_ids: &mut [Option<usize>], matrices: &WeightMatrices, vertex1: usize, vertex2: usize) {
        trace!(vertex1, vertex2, room = self.current_room, happiness = matrices.happiness[(vertex1, vertex2)], "pair seated");
        part_ids[vertex1] = Some(self.current_room);
        part_ids[vertex2] = Some(self.current_room);
        self.inhabitants.extend([vertex1, vertex2]);
    }

    // Seal the current room and start filling the next one.
    fn close(&mut self) {
        self.current_room_stress = 0.0;
        self.inhabitants.clear();
        self.current_room += 1;
    }

    fn stress_to_inhabitants(&self, stress: &DMatrix<f64>, vertex: usize) -> f64 {
        self.inhabitants.iter().map(|&inhabitant| stress[(vertex, inhabitant)]).sum()
    }
}

fn greedy_pairing(
    part_ids: &mut [Option<usize>],
    graph: &Graph,
    stress_budget: f64,
    magic: usize,
) -> usize {
    debug_assert_eq!(part_ids.len(), graph.len());

    let matrices = WeightMatrices::from_graph(graph);
    let scores = ratio_scores(graph);
    let threshold = stress_budget / magic.to_f64().unwrap_or(1.0);

    part_ids.fill(None);
    let mut room = RoomState::default();

    for score in &scores {
        if room.current_room > magic {
            trace!(magic, current_room = room.current_room, "opened more rooms than allowed");
            part_ids.fill(None);
            return 0;
        }

        let (u, v) = (score.vertex1, score.vertex2);

        // Seated vertices never move.
        if part_ids[u].is_some() || part_ids[v].is_some() {
            continue;
        }

        // Stress of the current room if both u and v joined it.
        let pair_stress = matrices.stress[(u, v)];
        let mut potential_stress = room.current_room_stress + pair_stress;
        for &inhabitant in &room.inhabitants {
            potential_stress += matrices.stress[(u, inhabitant)];
            potential_stress += matrices.stress[(v, inhabitant)];
        }

        if potential_stress < threshold {
            room.current_room_stress = potential_stress;
            room.seat_pair(part_ids, &matrices, u, v);
        } else if potential_stress == threshold {
            // The room is exactly full.
            room.seat_pair(part_ids, &matrices, u, v);
            room.close();
        } else if pair_stress > threshold {
            let u_stress = room.stress_to_inhabitants(&matrices.stress, u);
            let v_stress = room.stress_to_inhabitants(&matrices.stress, v);
            let smaller = u_stress.min(v_stress);

            if room.current_room_stress + smaller > threshold {
                // Neither fits anywhere near the others: one room each, and the
                // unfinished room is abandoned.
                part_ids[u] = Some(room.current_room + 1);
                part_ids[v] = Some(room.current_room + 2);
                room.current_room += 3;
                room.current_room_stress = 0.0;
                room.inhabitants.clear();
            } else {
                // Dropped for good, later edges may still seat u or v.
                trace!(u, v, "pair left unseated");
            }
        } else {
            // The pair fits on its own but not with the current inhabitants.
            room.close();
            room.current_room_stress = pair_stress;
            room.seat_pair(part_ids, &matrices, u, v);
        }
    }

    part_ids.iter().flatten().collect::<FxHashSet<_>>().len() + 1
}

/// Greedy Pairing
///
/// Seats students two at a time, best happiness-to-stress ratio first, into a
/// sequence of rooms that each hold at most `stress_budget / magic` stress.
///
/// The returned metadata is the number of rooms: one plus the number of
/// distinct room IDs used. The run is abandoned, with every vertex left
/// unassigned and zero rooms reported, as soon as more than `magic` rooms have
/// been opened. Vertices whose pair could not be seated are left as `None`;
/// callers must check coverage before using the result.
///
/// # Example
///
/// ```rust
/// use BreakoutRooms::algorithms::GreedyPairing;
/// use BreakoutRooms::graph::{Edge, Graph};
/// use BreakoutRooms::Partition;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
///
///     let graph = Graph::from_edges(2, vec![Edge::new(0, 1, 10.0, 5.0)])?;
///     let mut rooms = vec![None; graph.len()];
///
///     let room_count = GreedyPairing { magic: 2 }.partition(&mut rooms, (&graph, 10.0))?;
///
///     assert_eq!(rooms, vec![Some(0), Some(0)]);
///     assert_eq!(room_count, 2);
///     Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GreedyPairing {
    /// Target number of rooms. Each room may hold `stress_budget / magic` stress.
    pub magic: usize,
}

impl Default for GreedyPairing {
    fn default() -> Self {
        GreedyPairing { magic: 1 }
    }
}

impl<'a> Partition<(&'a Graph, f64)> for GreedyPairing {
    type Metadata = usize;
    type Error = Error;

    fn partition(
        &mut self,
        part_ids: &mut [Option<usize>],
        (graph, stress_budget): (&'a Graph, f64),
    ) -> Result<Self::Metadata, Self::Error> {
        if self.magic == 0 {
            return Err(Error::ZeroRoomTarget);
        }
        if part_ids.len() != graph.len() {
            return Err(Error::InputLenMismatch {
                expected: part_ids.len(),
                actual: graph.len(),
            });
        }
        if !stress_budget.is_finite() {
            return Err(Error::NonFiniteValues);
        }
        if stress_budget < 0.0 {
            return Err(Error::NegativeValues);
        }

        Ok(greedy_pairing(part_ids, graph, stress_budget, self.magic))
    }
}
