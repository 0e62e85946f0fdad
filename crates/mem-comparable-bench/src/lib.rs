//! Value graphs shared by the timing binary and the criterion benches.

pub mod fixtures;
