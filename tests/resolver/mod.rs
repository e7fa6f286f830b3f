//! File cache, module resolution, symbol origins and style depth.

pub mod tests_cache;
pub mod tests_depth;
pub mod tests_disk;
pub mod tests_origin;
