//! Adaptive Intersection Simulation Library
//!
//! A single-intersection traffic simulation with an adaptive signal-timing
//! controller. The simulation can run independently or with a Bevy UI.

pub mod simulation;

#[cfg(feature = "ui")]
pub mod ui;
