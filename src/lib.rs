// This file has code from https://github.com/LIHPC-Computational-Geometry/coupe
pub mod graph;
pub mod gen_instance;
pub mod validation;
pub mod io;
pub mod algorithms;

// The `Partition` trait allows for splitting the vertices of a graph into rooms.
// Room assignment algorithms implement this trait.
// The generic argument `M` defines the input of the algorithms (e.g. a graph
// together with its stress budget).
// The input slice must have one entry per vertex. Its contents are overwritten.
pub trait Partition<M> {
    // Diagnostic data returned for a specific run of the algorithm.
    type Metadata;

    // Error details, should the algorithm fail to run.
    type Error;

    // Assign the given data to rooms and output the room ID of each vertex in
    // `part_ids`.
    //
    // `None` means the vertex could not be seated. Room IDs need not be
    // contiguous: an algorithm may skip IDs for rooms it opened and abandoned.
    fn partition(&mut self, part_ids: &mut [Option<usize>], data: M)
                 -> Result<Self::Metadata, Self::Error>;
}
