use tracing::{debug, warn};
use crate::algorithms::{Error, GreedyPairing};
use crate::graph::Graph;
use crate::validation::is_valid_solution;
use crate::Partition;

/// Diagnostic data about the assignment chosen by [`RoomSearch`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOutcome {
    /// Target room count of the winning greedy run, `None` when every run
    /// failed and each student was given a room of their own.
    pub magic: Option<usize>,

    /// Number of rooms the assignment is validated against.
    pub room_count: usize,

    /// Total happiness of the assignment.
    pub happiness: f64,
}

impl SearchOutcome {
    pub fn is_fallback(&self) -> bool {
        self.magic.is_none()
    }
}

fn room_search(
    part_ids: &mut [Option<usize>],
    graph: &Graph,
    stress_budget: f64,
    min_rooms: usize,
    max_rooms: usize,
) -> Result<SearchOutcome, Error> {
    let mut best: Option<(Vec<Option<usize>>, SearchOutcome)> = None;
    let mut trial = vec![None; graph.len()];

    for magic in min_rooms..=max_rooms {
        let room_count = GreedyPairing { magic }.partition(&mut trial, (graph, stress_budget))?;

        if !is_valid_solution(&trial, graph, stress_budget, room_count) {
            debug!(magic, room_count, "no valid assignment");
            continue;
        }

        let rooms: Vec<usize> = trial.iter().flatten().copied().collect();
        let happiness = graph.total_happiness(&rooms);
        debug!(magic, room_count, happiness, "valid assignment");

        // Strictly better only, so the smallest target wins ties.
        if best.as_ref().map_or(true, |(_, outcome)| happiness > outcome.happiness) {
            best = Some((trial.clone(), SearchOutcome { magic: Some(magic), room_count, happiness }));
        }
    }

    match best {
        Some((rooms, outcome)) => {
            part_ids.copy_from_slice(&rooms);
            Ok(outcome)
        }
        None => {
            if !graph.is_empty() {
                warn!(vertices = graph.len(), "no target room count worked, one room per student");
            }
            for (vertex, room) in part_ids.iter_mut().enumerate() {
                *room = Some(vertex);
            }
            Ok(SearchOutcome { magic: None, room_count: graph.len(), happiness: 0.0 })
        }
    }
}

/// Room Search
///
/// Runs [`GreedyPairing`] for every target room count in
/// `min_rooms..=max_rooms` and keeps the valid assignment with the greatest
/// total happiness. An assignment is valid when every student is seated and no
/// room holds more than `stress_budget / room_count` stress. When no target
/// yields a valid assignment, every student gets a room of their own.
///
/// Targets are tried one after the other, smallest first.
#[derive(Debug, Clone, Copy)]
pub struct RoomSearch {
    /// Smallest target room count to try.
    pub min_rooms: usize,

    /// Largest target room count to try. Defaults to, and is capped at, the
    /// number of students.
    pub max_rooms: Option<usize>,
}

impl Default for RoomSearch {
    fn default() -> Self {
        RoomSearch {
            min_rooms: 1,
            max_rooms: None,
        }
    }
}

impl<'a> Partition<(&'a Graph, f64)> for RoomSearch {
    type Metadata = SearchOutcome;
    type Error = Error;

    fn partition(
        &mut self,
        part_ids: &mut [Option<usize>],
        (graph, stress_budget): (&'a Graph, f64),
    ) -> Result<Self::Metadata, Self::Error> {
        if self.min_rooms == 0 {
            return Err(Error::ZeroRoomTarget);
        }
        if let Some(max_rooms) = self.max_rooms {
            if max_rooms < self.min_rooms {
                return Err(Error::InvalidRoomRange { min: self.min_rooms, max: max_rooms });
            }
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

        let max_rooms = self.max_rooms.unwrap_or(graph.len()).min(graph.len());
        room_search(part_ids, graph, stress_budget, self.min_rooms, max_rooms)
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_ulps_eq};
    use crate::gen_instance::{gen_random_instance, InstanceParams};
    use crate::graph::Edge;
    use super::*;

    fn search(graph: &Graph, stress_budget: f64) -> (Vec<Option<usize>>, SearchOutcome) {
        let mut rooms = vec![None; graph.len()];
        let outcome = RoomSearch::default().partition(&mut rooms, (graph, stress_budget)).unwrap();
        (rooms, outcome)
    }

    #[test]
    fn test_room_search_keeps_happiest_assignment() {
        // Arrange
        let graph = Graph::from_edges(4, vec![
            Edge::new(0, 1, 8.0, 2.0),
            Edge::new(2, 3, 1.0, 1.0),
        ]).unwrap();

        // Act
        let (rooms, outcome) = search(&graph, 10.0);

        // Assert
        assert_eq!(rooms, vec![Some(0); 4]);
        assert_eq!(outcome, SearchOutcome { magic: Some(1), room_count: 2, happiness: 9.0 });
    }

    #[test]
    fn test_room_search_falls_back_to_one_room_each() {
        // Arrange
        let graph = Graph::from_edges(3, vec![Edge::new(0, 1, 5.0, 1.0)]).unwrap();

        // Act
        let (rooms, outcome) = search(&graph, 10.0);

        // Assert
        assert_eq!(rooms, vec![Some(0), Some(1), Some(2)]);
        assert!(outcome.is_fallback());
        assert_eq!(outcome.room_count, 3);
        assert_eq!(outcome.happiness, 0.0);
        assert!(is_valid_solution(&rooms, &graph, 10.0, outcome.room_count));
    }

    #[test]
    fn test_room_search_respects_range() {
        // Arrange
        let graph = Graph::from_edges(4, vec![
            Edge::new(0, 1, 8.0, 2.0),
            Edge::new(2, 3, 1.0, 1.0),
        ]).unwrap();
        let mut rooms = vec![None; 4];

        // Act
        let outcome = RoomSearch { min_rooms: 2, max_rooms: Some(2) }
            .partition(&mut rooms, (&graph, 10.0))
            .unwrap();

        // Assert
        assert_eq!(outcome.magic, Some(2));
        assert_ulps_eq!(outcome.happiness, 9.0);
    }

    #[test]
    fn test_room_search_result_is_valid() {
        for seed in 0..5 {
            // Arrange
            let params = InstanceParams { seed: Some(seed), ..Default::default() };
            let (graph, stress_budget) = gen_random_instance(10, &params).unwrap();

            // Act
            let (rooms, outcome) = search(&graph, stress_budget);

            // Assert
            assert!(is_valid_solution(&rooms, &graph, stress_budget, outcome.room_count));
            let rooms: Vec<usize> = rooms.into_iter().flatten().collect();
            assert_abs_diff_eq!(graph.total_happiness(&rooms), outcome.happiness, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_room_search_empty_graph() {
        let graph = Graph::new();
        let (rooms, outcome) = search(&graph, 1.0);
        assert!(rooms.is_empty());
        assert_eq!(outcome, SearchOutcome { magic: None, room_count: 0, happiness: 0.0 });
    }

    #[test]
    fn test_room_search_invalid_input() {
        let graph = Graph::from_edges(2, vec![Edge::new(0, 1, 1.0, 1.0)]).unwrap();
        let mut rooms = vec![None; 2];

        assert_eq!(
            RoomSearch { min_rooms: 0, max_rooms: None }.partition(&mut rooms, (&graph, 1.0)),
            Err(Error::ZeroRoomTarget)
        );
        assert_eq!(
            RoomSearch { min_rooms: 3, max_rooms: Some(2) }.partition(&mut rooms, (&graph, 1.0)),
            Err(Error::InvalidRoomRange { min: 3, max: 2 })
        );
        assert_eq!(
            RoomSearch::default().partition(&mut rooms, (&graph, f64::NAN)),
            Err(Error::NonFiniteValues)
        );
    }
}
