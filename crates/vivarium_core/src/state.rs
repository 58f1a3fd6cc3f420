//! Persisted agent state and its documented defaults.
//!
//! The live [`Agent`] is never serialised directly; it converts to and from
//! this plain mapping so the persistence layer can stay a dumb JSON store.
//! Every optional field falls back to the documented default, while lattice
//! grids with inconsistent shapes are rejected outright.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::agent::{Agent, KnowledgeEntry, DEFAULT_ENERGY, DEFAULT_HUNGER, DEFAULT_MOOD};
use crate::clock::CenturyClock;
use crate::config::{VitalsConfig, DEFAULT_CENTURY_REAL_SECONDS};
use crate::error::Result;
use crate::lattice::Lattice;

/// Persisted clock fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockState {
    #[serde(default = "default_century_real_seconds")]
    pub century_real_seconds: f64,
    #[serde(default)]
    pub total_hours: u64,
}

impl Default for ClockState {
    fn default() -> Self {
        Self {
            century_real_seconds: DEFAULT_CENTURY_REAL_SECONDS,
            total_hours: 0,
        }
    }
}

fn default_century_real_seconds() -> f64 {
    DEFAULT_CENTURY_REAL_SECONDS
}

fn default_hunger() -> f64 {
    DEFAULT_HUNGER
}

fn default_energy() -> f64 {
    DEFAULT_ENERGY
}

fn default_mood() -> f64 {
    DEFAULT_MOOD
}

/// The full persisted agent mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentState {
    #[serde(default)]
    pub clock: ClockState,
    /// Channel name to `size x size` grid. Empty means a fresh lattice.
    #[serde(default)]
    pub lattice: BTreeMap<String, Vec<Vec<f64>>>,
    #[serde(default = "default_hunger")]
    pub hunger: f64,
    #[serde(default = "default_energy")]
    pub energy: f64,
    #[serde(default = "default_mood")]
    pub mood: f64,
    #[serde(default)]
    pub stasis: f64,
    #[serde(default)]
    pub feed_window: BTreeMap<u64, f64>,
    #[serde(default)]
    pub knowledge: Vec<KnowledgeEntry>,
}

impl Agent {
    /// Exports everything the persistence layer needs to rebuild this agent.
    #[must_use]
    pub fn to_state(&self) -> AgentState {
        AgentState {
            clock: ClockState {
                century_real_seconds: self.clock.century_real_seconds(),
                total_hours: self.clock.total_hours(),
            },
            lattice: self.lattice.as_grids(),
            hunger: self.hunger,
            energy: self.energy,
            mood: self.mood,
            stasis: self.stasis,
            feed_window: self.feed_window.clone(),
            knowledge: self.knowledge.clone(),
        }
    }

    /// Rebuilds an agent from a persisted mapping.
    ///
    /// Vitals are restored exactly as stored. Lattice shape errors are
    /// hard failures; everything else falls back to defaults upstream via
    /// the serde field defaults on [`AgentState`].
    pub fn from_state(state: AgentState, vitals: VitalsConfig) -> Result<Self> {
        let clock =
            CenturyClock::with_hours(state.clock.century_real_seconds, state.clock.total_hours)?;
        let lattice = if state.lattice.is_empty() {
            Lattice::default()
        } else {
            Lattice::from_grids(&state.lattice)?
        };
        Ok(Self {
            clock,
            lattice,
            hunger: state.hunger,
            energy: state.energy,
            mood: state.mood,
            stasis: state.stasis,
            feed_window: state.feed_window,
            knowledge: state.knowledge,
            vitals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::lattice::Channel;

    fn fresh_agent() -> Agent {
        let clock = CenturyClock::new(2_592_000.0).unwrap();
        let lattice = Lattice::new(5).unwrap();
        Agent::new(clock, lattice, VitalsConfig::default())
    }

    #[test]
    fn test_state_round_trip_is_lossless() {
        let mut agent = fresh_agent();
        agent.advance_time(3).unwrap();
        agent.feed(Channel::Shard, 0.7, "sequence").unwrap();
        agent.teach("prism", Channel::Mirror);

        let state = agent.to_state();
        let restored = Agent::from_state(state, VitalsConfig::default()).unwrap();

        assert_eq!(restored.clock().total_hours(), agent.clock().total_hours());
        assert!((restored.hunger() - agent.hunger()).abs() < f64::EPSILON);
        assert!((restored.energy() - agent.energy()).abs() < f64::EPSILON);
        assert!((restored.mood() - agent.mood()).abs() < f64::EPSILON);
        assert!((restored.stasis() - agent.stasis()).abs() < f64::EPSILON);
        assert_eq!(restored.feed_window(), agent.feed_window());
        assert_eq!(restored.knowledge().len(), agent.knowledge().len());
        assert_eq!(
            restored.lattice_snapshot().averages,
            agent.lattice_snapshot().averages
        );
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let state: AgentState = serde_json::from_str("{}").unwrap();
        let agent = Agent::from_state(state, VitalsConfig::default()).unwrap();
        assert!((agent.hunger() - 35.0).abs() < f64::EPSILON);
        assert!((agent.energy() - 65.0).abs() < f64::EPSILON);
        assert!((agent.mood() - 50.0).abs() < f64::EPSILON);
        assert!((agent.stasis()).abs() < f64::EPSILON);
        assert!(agent.feed_window().is_empty());
        assert!(agent.knowledge().is_empty());
        assert_eq!(agent.clock().total_hours(), 0);
    }

    #[test]
    fn test_mismatched_lattice_shapes_are_rejected() {
        let mut state: AgentState = serde_json::from_str("{}").unwrap();
        state
            .lattice
            .insert("mirror".to_string(), vec![vec![0.0; 5]; 5]);
        state
            .lattice
            .insert("shard".to_string(), vec![vec![0.0; 3]; 3]);
        assert!(matches!(
            Agent::from_state(state, VitalsConfig::default()),
            Err(CoreError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_json_window_keys_round_trip() {
        let mut agent = fresh_agent();
        agent.advance_time(2).unwrap();
        agent.feed(Channel::Flux, 0.3, "sequence").unwrap();
        let json = serde_json::to_string(&agent.to_state()).unwrap();
        let state: AgentState = serde_json::from_str(&json).unwrap();
        assert_eq!(state.feed_window.get(&2).copied(), Some(0.3));
    }
}
