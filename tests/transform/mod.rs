//! End-to-end transformation through the `Stylable` facade.

pub mod tests_compose;
pub mod tests_imports;
pub mod tests_modes;
pub mod tests_scoping;
pub mod tests_values;
