//! Shared helpers for the integration suites.
#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
pub mod project;
