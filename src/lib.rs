//! Monte Carlo percolation on a square lattice, driven by a disjoint-set forest.

pub mod disjoint_set;
pub mod error;
pub mod monte_carlo_results;
pub mod parameter_reader;
pub mod percolation;
pub mod square_lattice;

pub use disjoint_set::DisjointSet;
pub use error::{ParameterError, PercolationError};
pub use monte_carlo_results::{arange, PercolationResults};
pub use parameter_reader::Parameters;
pub use percolation::Percolation;
pub use square_lattice::SquareLattice;
