//! General-purpose utilities.

pub mod sem;
