//! Property-based tests.

pub mod tests_depth;
pub mod tests_naming;
pub mod tests_origin;
