//! # Vivarium
//!
//! A terminal vivarium housing one century-lifespan virtual creature.
//! The simulation itself lives in `vivarium_core`; this crate wires it to
//! the outside world: device dispatch, persistence, skin rendering and the
//! interactive shell.

/// Tablet and net devices
pub mod devices;
/// Dispatch kernel
pub mod kernel;
/// Interactive command loop
pub mod shell;
/// ASCII skin rendering
pub mod skin;

pub use kernel::{Kernel, KernelError, Observation};
