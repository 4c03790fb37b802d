//! Procedural generation for the terrain: the river noise grid and prop placement.

pub mod noise_grid;
pub mod terrain;

pub use noise_grid::*;
pub use terrain::*;
