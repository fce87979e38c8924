// This file has code from https://github.com/LIHPC-Computational-Geometry/coupe
use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator};
use rayon::iter::ParallelIterator as _;
use rustc_hash::FxHashSet;
use sprs::{CsMat, TriMat};
use crate::algorithms::Error;

/// An undirected edge between two students.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub vertex1: usize,
    pub vertex2: usize,

    /// Happiness gained when both ends share a room.
    pub happiness: f64,

    /// Stress incurred when both ends share a room.
    pub stress: f64,
}

impl Edge {
    pub fn new(vertex1: usize, vertex2: usize, happiness: f64, stress: f64) -> Self {
        Self { vertex1, vertex2, happiness, stress }
    }
}

/// Struct that represents a graph of students
pub struct Graph {
    /// Symmetric happiness weights stored as a sparse matrix in CSR format
    pub happiness_csr: CsMat<f64>,

    /// Symmetric stress weights, same sparsity pattern as `happiness_csr`
    pub stress_csr: CsMat<f64>,

    // Edges in the order they were supplied.
    edges: Vec<Edge>,
}

impl Graph {

    /// Create a new graph without any vertices.
    pub fn new() -> Self {
        Self {
            happiness_csr: CsMat::empty(sprs::CSR, 0),
            stress_csr: CsMat::empty(sprs::CSR, 0),
            edges: Vec::new(),
        }
    }

    /// Build a graph with `num_of_vertices` vertices from a list of undirected edges.
    ///
    /// Endpoints must be in range and distinct, every pair may appear only
    /// once (in either orientation) and both weights must be finite and
    /// non-negative.
    pub fn from_edges(num_of_vertices: usize, edges: Vec<Edge>) -> Result<Self, Error> {
        let mut seen_pairs = FxHashSet::with_capacity_and_hasher(edges.len(), Default::default());

        for edge in &edges {
            for vertex in [edge.vertex1, edge.vertex2] {
                if vertex >= num_of_vertices {
                    return Err(Error::VertexOutOfRange { vertex, len: num_of_vertices });
                }
            }
            if edge.vertex1 == edge.vertex2 {
                return Err(Error::SelfLoop { vertex: edge.vertex1 });
            }
            if !edge.happiness.is_finite() || !edge.stress.is_finite() {
                return Err(Error::NonFiniteValues);
            }
            if edge.happiness < 0.0 || edge.stress < 0.0 {
                return Err(Error::NegativeValues);
            }
            let key = (edge.vertex1.min(edge.vertex2), edge.vertex1.max(edge.vertex2));
            if !seen_pairs.insert(key) {
                return Err(Error::DuplicateEdge { vertex1: key.0, vertex2: key.1 });
            }
        }

        // Construct TriMats first and then convert them to CSR format.
        let shape = (num_of_vertices, num_of_vertices);
        let mut happiness_triplets = TriMat::with_capacity(shape, 2 * edges.len());
        let mut stress_triplets = TriMat::with_capacity(shape, 2 * edges.len());

        for edge in &edges {
            happiness_triplets.add_triplet(edge.vertex1, edge.vertex2, edge.happiness);
            happiness_triplets.add_triplet(edge.vertex2, edge.vertex1, edge.happiness);
            stress_triplets.add_triplet(edge.vertex1, edge.vertex2, edge.stress);
            stress_triplets.add_triplet(edge.vertex2, edge.vertex1, edge.stress);
        }

        Ok(Self {
            happiness_csr: happiness_triplets.to_csr(),
            stress_csr: stress_triplets.to_csr(),
            edges,
        })
    }

    /// The number of vertices in the graph.
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.stress_csr.rows(), self.stress_csr.cols());
        self.stress_csr.rows()
    }

    /// Whether the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The edges of the graph, in the order they were supplied.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// An iterator over the neighbors of the given vertex and the stress towards each of them.
    pub fn stress_neighbors(&self, vertex: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let (indices, data) = self.stress_csr
            .outer_view(vertex)
            .map(|view| view.into_raw_storage())
            .unwrap_or_default();
        indices.iter().cloned().zip(data.iter().cloned())
    }

    /// Get happiness for a pair of vertices.
    pub fn get_happiness(&self, vertex1: usize, vertex2: usize) -> Option<f64> {
        self.happiness_csr.get(vertex1, vertex2).cloned()
    }

    /// Get stress for a pair of vertices.
    pub fn get_stress(&self, vertex1: usize, vertex2: usize) -> Option<f64> {
        self.stress_csr.get(vertex1, vertex2).cloned()
    }

    /// The total happiness of a room assignment.
    ///
    /// Given a room ID for every vertex, the total happiness is the sum of the
    /// happiness of the edges whose two ends were placed in the same room.
    ///
    /// # Example
    ///
    /// Two rooms (0 and 1)
    /// ```text,ignore
    ///    0*----*0        h=2 between the two 0s, h=5 between the two 1s
    ///     |    :         the dotted edge (h=4) crosses rooms and is lost
    ///    1*----*1        total happiness = 2 + 5 = 7
    /// ```
    pub fn total_happiness(&self, rooms: &[usize]) -> f64 {
        debug_assert_eq!(self.len(), rooms.len());

        let indptr = self.happiness_csr.indptr().into_raw_storage();
        let indices = self.happiness_csr.indices();
        let data = self.happiness_csr.data();
        indptr
            .par_iter()
            .zip(&indptr[1..])
            .enumerate()
            .map(|(vertex, (start, end))| {
                let neighbors = &indices[*start..*end];
                let happiness = &data[*start..*end];
                let vertex_room = rooms[vertex];
                neighbors
                    .iter()
                    .zip(happiness)
                    .take_while(|(neighbor, _happiness)| **neighbor < vertex)
                    .filter(|(neighbor, _happiness)| vertex_room == rooms[**neighbor])
                    .map(|(_neighbor, happiness)| *happiness)
                    .sum::<f64>()
            })
            .sum()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_ulps_eq;
    use super::*;

    fn square_graph() -> Graph {
        Graph::from_edges(4, vec![
            Edge::new(0, 1, 2.0, 1.0),
            Edge::new(1, 3, 4.0, 3.0),
            Edge::new(3, 2, 5.0, 2.0),
            Edge::new(2, 0, 1.5, 0.5),
        ]).unwrap()
    }

    #[test]
    fn test_from_edges_is_symmetric() {
        // Arrange and Act
        let graph = square_graph();

        // Assert
        assert_eq!(graph.len(), 4);
        assert_eq!(graph.edges().len(), 4);
        for edge in graph.edges() {
            assert_eq!(graph.get_happiness(edge.vertex1, edge.vertex2), Some(edge.happiness));
            assert_eq!(graph.get_happiness(edge.vertex2, edge.vertex1), Some(edge.happiness));
            assert_eq!(graph.get_stress(edge.vertex1, edge.vertex2), Some(edge.stress));
            assert_eq!(graph.get_stress(edge.vertex2, edge.vertex1), Some(edge.stress));
        }
        assert!(graph.get_stress(0, 3).is_none());
    }

    #[test]
    fn test_from_edges_rejects_bad_edges() {
        assert!(matches!(
            Graph::from_edges(2, vec![Edge::new(0, 2, 1.0, 1.0)]),
            Err(Error::VertexOutOfRange { vertex: 2, len: 2 })
        ));
        assert!(matches!(
            Graph::from_edges(2, vec![Edge::new(1, 1, 1.0, 1.0)]),
            Err(Error::SelfLoop { vertex: 1 })
        ));
        assert!(matches!(
            Graph::from_edges(2, vec![Edge::new(0, 1, -1.0, 1.0)]),
            Err(Error::NegativeValues)
        ));
        assert!(matches!(
            Graph::from_edges(2, vec![Edge::new(0, 1, 1.0, f64::NAN)]),
            Err(Error::NonFiniteValues)
        ));
        assert!(matches!(
            Graph::from_edges(3, vec![Edge::new(0, 1, 1.0, 1.0), Edge::new(1, 0, 2.0, 2.0)]),
            Err(Error::DuplicateEdge { vertex1: 0, vertex2: 1 })
        ));
    }

    #[test]
    fn test_stress_neighbors() {
        // Arrange
        let graph = square_graph();

        // Act
        let neighbors: Vec<(usize, f64)> = graph.stress_neighbors(1).collect();

        // Assert
        assert_eq!(neighbors, vec![(0, 1.0), (3, 3.0)]);
        assert_eq!(graph.stress_neighbors(7).count(), 0);
    }

    #[test]
    fn test_total_happiness() {
        // Arrange
        let graph = square_graph();
        let rooms = [0, 0, 1, 1];

        // Act
        let happiness = graph.total_happiness(&rooms);

        // Assert
        assert_ulps_eq!(happiness, 7.0);
    }

    #[test]
    fn test_total_happiness_is_idempotent() {
        // Arrange
        let graph = square_graph();
        let rooms = [0, 1, 0, 1];

        // Act
        let first = graph.total_happiness(&rooms);
        let second = graph.total_happiness(&rooms);

        // Assert
        assert_eq!(first, second);
        assert_ulps_eq!(first, 5.5);
    }

    #[test]
    fn test_empty_graph() {
        let graph = Graph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.total_happiness(&[]), 0.0);
    }
}
