//! # Communications interface crate.
//!
//! Provides the common communications interfaces for the software: the
//! network abstractions shared by both executables and the joint trajectory
//! wire format exchanged between them.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Network module
pub mod net;

/// Joint trajectory goal and result definitions
pub mod traj;
