// This file has code from https://github.com/LIHPC-Computational-Geometry/coupe
use std::fmt;

mod greedy_pairing;
mod room_search;

pub use greedy_pairing::GreedyPairing;
pub use room_search::{RoomSearch, SearchOutcome};


/// Common errors thrown by algorithms and graph construction.
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Input sets don't have matching lengths.
    InputLenMismatch { expected: usize, actual: usize },

    /// Input contains negative values and such values are not supported.
    NegativeValues,

    /// Input contains NaN or infinite values.
    NonFiniteValues,

    /// The target number of rooms must be at least one.
    ZeroRoomTarget,

    /// An edge references a vertex that is not part of the graph.
    VertexOutOfRange { vertex: usize, len: usize },

    /// An edge connects a vertex to itself.
    SelfLoop { vertex: usize },

    /// The same pair of vertices appears more than once.
    DuplicateEdge { vertex1: usize, vertex2: usize },

    /// The lower bound of a room count range is above its upper bound.
    InvalidRoomRange { min: usize, max: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InputLenMismatch { expected, actual } => write!(
                f,
                "input sets don't have the same length (expected {expected} items, got {actual})",
            ),
            Error::NegativeValues => write!(f, "input contains negative values"),
            Error::NonFiniteValues => write!(f, "input contains non-finite values"),
            Error::ZeroRoomTarget => write!(f, "target room count must be positive"),
            Error::VertexOutOfRange { vertex, len } => write!(
                f,
                "vertex {vertex} is out of range for a graph of {len} vertices",
            ),
            Error::SelfLoop { vertex } => write!(f, "vertex {vertex} has an edge to itself"),
            Error::DuplicateEdge { vertex1, vertex2 } => write!(
                f,
                "edge ({vertex1}, {vertex2}) is listed more than once",
            ),
            Error::InvalidRoomRange { min, max } => write!(
                f,
                "invalid room count range {min}..={max}",
            ),
        }
    }
}

impl std::error::Error for Error {}
