//! Resident chunk storage

mod chunk;
mod chunk_lookup;

pub use chunk::Chunk;
pub use chunk_lookup::ChunkLookup;
