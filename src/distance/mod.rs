//! Distance matrices.
//!
//! Provides a dense, validated distance matrix in which NaN or `+inf`
//! marks a missing (disconnected) edge.

mod matrix;

pub use matrix::DistanceMatrix;
