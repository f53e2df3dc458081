//! Solver implementations.

pub mod coolprop;
