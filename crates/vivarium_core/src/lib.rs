//! # Vivarium Core
//!
//! The deterministic simulation core for a century-lifespan virtual
//! creature. This crate contains:
//! - A virtual clock mapping logical hour ticks onto a fixed lifespan
//! - A three-channel bounded memory lattice with imprinting and decay
//! - The agent state machine tying vitals, clock and lattice together
//! - The persisted-state mapping and the runtime settings object
//!
//! The core is single-threaded and performs no I/O; persistence, dispatch
//! and rendering live in the crates layered on top.
//!
//! ## Example
//!
//! ```
//! use vivarium_core::{Agent, CenturyClock, Channel, Lattice, VitalsConfig};
//!
//! let clock = CenturyClock::new(2_592_000.0).unwrap();
//! let lattice = Lattice::new(5).unwrap();
//! let mut agent = Agent::new(clock, lattice, VitalsConfig::default());
//!
//! agent.advance_time(1).unwrap();
//! let outcome = agent.feed(Channel::Mirror, 0.5, "palindrome").unwrap();
//! assert!(outcome.delivered <= 1.0);
//! ```

/// Agent state machine: vitals, interactions and derived views
pub mod agent;
/// Century clock and life stages
pub mod clock;
/// Runtime settings value objects
pub mod config;
/// Core error type
pub mod error;
/// Bounded decaying memory grid
pub mod lattice;
/// Persisted-state mapping
pub mod state;

pub use agent::{Agent, Aura, ConceptOutcome, FeedOutcome, KnowledgeEntry, Summary, TeachOutcome};
pub use clock::{CenturyClock, LifeStage, HOURS_PER_YEAR};
pub use config::{Settings, VitalsConfig, DEFAULT_CENTURY_REAL_SECONDS};
pub use error::CoreError;
pub use lattice::{Channel, Lattice, LatticeSnapshot};
pub use state::{AgentState, ClockState};
