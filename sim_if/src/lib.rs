//! # Simulator interface crate.
//!
//! Provides the data exchanged with the vehicle simulator bridge: agent samples polled during a
//! run and the scene records the simulator loads before a run.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Agent (vehicle) state samples
pub mod agent;

/// Scene records describing a road to the simulator
pub mod scene;
