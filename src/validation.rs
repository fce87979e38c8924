use num_traits::ToPrimitive;
use rustc_hash::FxHashMap;
use crate::graph::Graph;

/// Calculates the total internal stress of every room of a given assignment.
///
/// Each edge whose two ends share a room adds its stress to that room. Rooms
/// whose students share no edge still show up, with zero stress.
pub fn compute_rooms_stress(graph: &Graph, rooms: &[usize]) -> FxHashMap<usize, f64> {
    debug_assert_eq!(graph.len(), rooms.len());

    let mut rooms_stress = FxHashMap::default();

    for (vertex, &room) in rooms.iter().enumerate() {
        let room_stress = rooms_stress.entry(room).or_insert(0.0);
        // Each undirected edge is stored twice, only count it from its larger end.
        for (neighbor, stress) in graph.stress_neighbors(vertex).take_while(|(neighbor, _)| *neighbor < vertex) {
            if rooms[neighbor] == room {
                *room_stress += stress;
            }
        }
    }

    rooms_stress
}

/// Check whether an assignment is a valid solution for `room_count` rooms.
///
/// Every vertex must be assigned and the stress inside every room must not
/// exceed `stress_budget / room_count`.
pub fn is_valid_solution(rooms: &[Option<usize>], graph: &Graph, stress_budget: f64, room_count: usize) -> bool {
    if rooms.len() != graph.len() || room_count == 0 {
        return false;
    }

    let Some(rooms) = rooms.iter().copied().collect::<Option<Vec<usize>>>() else {
        return false;
    };

    let threshold = stress_budget / room_count.to_f64().unwrap_or(1.0);

    compute_rooms_stress(graph, &rooms)
        .values()
        .all(|&room_stress| room_stress <= threshold)
}
