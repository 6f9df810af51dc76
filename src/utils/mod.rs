//! # Utilities Module
//!
//! Geometry helpers shared by the layout generator and its consumers, plus
//! the seeded RNG constructor.

pub mod math;

pub use crate::generation::utils::create_rng;
pub use math::*;
