//! Test fixtures for tour-planner.
//!
//! Provides:
//! - Real Southern California locations
//! - A scripted leg provider that counts requests and can fail on demand

#![allow(dead_code)]

pub mod socal_locations;
pub mod stub_provider;

pub use socal_locations::*;
pub use stub_provider::*;
