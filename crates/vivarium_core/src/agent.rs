//! The creature itself: vitals, tick stepping and interactions.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::clock::{CenturyClock, LifeStage};
use crate::config::VitalsConfig;
use crate::error::{CoreError, Result};
use crate::lattice::{Channel, Lattice, LatticeSnapshot};

pub const DEFAULT_HUNGER: f64 = 35.0;
pub const DEFAULT_ENERGY: f64 = 65.0;
pub const DEFAULT_MOOD: f64 = 50.0;

/// Structured record of one interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    #[serde(default = "unknown_source")]
    pub source: String,
    #[serde(default = "empty_payload")]
    pub payload: Value,
}

fn unknown_source() -> String {
    "unknown".to_string()
}

fn empty_payload() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Result of a `feed` interaction, echoed back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct FeedOutcome {
    pub message: String,
    pub channel: Channel,
    pub descriptor: String,
    pub requested: f64,
    pub delivered: f64,
}

/// Result of a `teach` interaction.
#[derive(Debug, Clone, Serialize)]
pub struct TeachOutcome {
    pub message: String,
    pub token: String,
    pub channel: Channel,
}

/// Result of an `add_concept` interaction.
#[derive(Debug, Clone, Serialize)]
pub struct ConceptOutcome {
    pub message: String,
    pub channel: Channel,
    pub richness: f64,
    pub knowledge_size: usize,
}

/// Rounded, render-ready view of the whole agent.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub age_years: f64,
    pub age_hours: u64,
    pub stage: LifeStage,
    pub century_progress: f64,
    pub hunger: f64,
    pub energy: f64,
    pub mood: f64,
    pub stasis: f64,
    pub knowledge_entries: usize,
    pub lattice: BTreeMap<Channel, f64>,
    pub dominant_channel: Channel,
}

/// Qualitative presentation labels for the rendering layer.
#[derive(Debug, Clone, Serialize)]
pub struct Aura {
    pub descriptor: String,
    pub mood: String,
    pub hunger: String,
    pub energy: String,
}

/// Stateful century-lifespan creature.
///
/// Owns its clock and lattice exclusively; all mutation happens through
/// tick advancement and the three interaction operations. Behaviour is a
/// pure function of current state plus arguments, so the dispatch layer
/// above is responsible for serialising access.
#[derive(Debug, Clone)]
pub struct Agent {
    pub(crate) clock: CenturyClock,
    pub(crate) lattice: Lattice,
    pub(crate) hunger: f64,
    pub(crate) energy: f64,
    pub(crate) mood: f64,
    pub(crate) stasis: f64,
    pub(crate) feed_window: BTreeMap<u64, f64>,
    pub(crate) knowledge: Vec<KnowledgeEntry>,
    pub(crate) vitals: VitalsConfig,
}

impl Agent {
    pub fn new(clock: CenturyClock, lattice: Lattice, vitals: VitalsConfig) -> Self {
        Self {
            clock,
            lattice,
            hunger: DEFAULT_HUNGER,
            energy: DEFAULT_ENERGY,
            mood: DEFAULT_MOOD,
            stasis: 0.0,
            feed_window: BTreeMap::new(),
            knowledge: Vec::new(),
            vitals,
        }
    }

    #[must_use]
    pub fn clock(&self) -> &CenturyClock {
        &self.clock
    }

    #[must_use]
    pub fn hunger(&self) -> f64 {
        self.hunger
    }

    #[must_use]
    pub fn energy(&self) -> f64 {
        self.energy
    }

    #[must_use]
    pub fn mood(&self) -> f64 {
        self.mood
    }

    #[must_use]
    pub fn stasis(&self) -> f64 {
        self.stasis
    }

    #[must_use]
    pub fn feed_window(&self) -> &BTreeMap<u64, f64> {
        &self.feed_window
    }

    #[must_use]
    pub fn knowledge(&self) -> &[KnowledgeEntry] {
        &self.knowledge
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Advances the creature by `hours` sequential one-hour steps.
    ///
    /// The mood drift depends on the absolute hour index, so the steps
    /// cannot be collapsed into one closed-form jump.
    pub fn advance_time(&mut self, hours: i64) -> Result<()> {
        if hours < 0 {
            return Err(CoreError::invalid_argument("hours must be non-negative"));
        }
        for _ in 0..hours {
            self.clock.advance_hours(1)?;
            self.step_hour();
        }
        Ok(())
    }

    fn step_hour(&mut self) {
        let hour_index = self.clock.total_hours();
        self.hunger = (self.hunger + 1.1).clamp(0.0, 100.0);
        self.energy = (self.energy - 0.9).clamp(0.0, 100.0);
        let mood_shift = -0.4 + 0.2 * (hour_index as f64 / 12.0).sin();
        self.mood = (self.mood + mood_shift).clamp(0.0, 100.0);
        self.stasis =
            (self.stasis + self.vitals.stasis_fill_rate).clamp(0.0, self.vitals.stasis_max_hours);
        self.lattice.decay(0.012);
        let cutoff = hour_index.saturating_sub(24);
        self.feed_window.retain(|&hour, _| hour >= cutoff);
    }

    // ------------------------------------------------------------------
    // Interactions
    // ------------------------------------------------------------------

    /// Feeds the creature, limited by the hourly burst cap.
    pub fn feed(&mut self, channel: Channel, amount: f64, descriptor: &str) -> Result<FeedOutcome> {
        let hour = self.clock.total_hours();
        let already = self.feed_window.get(&hour).copied().unwrap_or(0.0);
        let available = (self.vitals.burst_cap_per_hour - already).max(0.0);
        if available <= 0.0 {
            return Err(CoreError::BurstCapExceeded);
        }
        let delivered = amount.min(available);
        self.feed_window.insert(hour, already + delivered);
        self.hunger = (self.hunger - delivered * 6.0).clamp(0.0, 100.0);
        self.energy = (self.energy + delivered * 2.5).clamp(0.0, 100.0);
        self.mood = (self.mood + delivered * 1.2).clamp(0.0, 100.0);
        let focus = if descriptor == "palindrome" { 0.1 } else { 0.0 };
        self.lattice.imprint(channel, delivered * 1.5, focus);
        self.knowledge.push(KnowledgeEntry {
            source: "tablet.feed".to_string(),
            payload: json!({
                "channel": channel,
                "descriptor": descriptor,
                "requested": amount,
                "delivered": delivered,
            }),
        });
        Ok(FeedOutcome {
            message: format!("Tablet nourishes through {descriptor} channel {channel}"),
            channel,
            descriptor: descriptor.to_string(),
            requested: amount,
            delivered,
        })
    }

    /// Etches a token into the lattice. Not burst limited.
    pub fn teach(&mut self, token: &str, channel: Channel) -> TeachOutcome {
        let impact = 0.8 + 0.2 * token.chars().count().min(12) as f64;
        self.mood = (self.mood + impact).clamp(0.0, 100.0);
        self.energy = (self.energy - 0.2 * impact).clamp(0.0, 100.0);
        self.lattice.imprint(channel, impact * 0.6, 0.2);
        self.knowledge.push(KnowledgeEntry {
            source: "tablet.teach".to_string(),
            payload: json!({ "token": token, "channel": channel }),
        });
        TeachOutcome {
            message: format!("Knowledge etched via {channel}"),
            token: token.to_string(),
            channel,
        }
    }

    /// Integrates a free-form concept, filing it by tag affinity.
    pub fn add_concept(&mut self, text: &str, tags: &[String]) -> ConceptOutcome {
        let channel = channel_for_tags(tags);
        let words = text.split_whitespace().count();
        let richness = (1.0 + words as f64 / 4.0).min(5.0);
        self.mood = (self.mood + richness * 0.6).clamp(0.0, 100.0);
        self.energy = (self.energy - 0.3 * richness).clamp(0.0, 100.0);
        self.hunger = (self.hunger + 0.2 * richness).clamp(0.0, 100.0);
        self.lattice.imprint(channel, richness, 0.3);
        self.knowledge.push(KnowledgeEntry {
            source: "net.add".to_string(),
            payload: json!({ "text": text, "tags": tags, "channel": channel }),
        });
        ConceptOutcome {
            message: "Concept integrated".to_string(),
            channel,
            richness,
            knowledge_size: self.knowledge.len(),
        }
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    #[must_use]
    pub fn lattice_snapshot(&self) -> LatticeSnapshot {
        self.lattice.snapshot()
    }

    #[must_use]
    pub fn summary(&self) -> Summary {
        let snapshot = self.lattice.snapshot();
        Summary {
            age_years: round_to(self.clock.age_years(), 2),
            age_hours: self.clock.age_hours(),
            stage: self.clock.stage(),
            century_progress: round_to(self.clock.century_progress(), 4),
            hunger: round_to(self.hunger, 2),
            energy: round_to(self.energy, 2),
            mood: round_to(self.mood, 2),
            stasis: round_to(self.stasis, 2),
            knowledge_entries: self.knowledge.len(),
            lattice: snapshot.averages,
            dominant_channel: snapshot.dominant,
        }
    }

    #[must_use]
    pub fn build_aura(&self) -> Aura {
        let snapshot = self.lattice.snapshot();
        let glyph = match snapshot.dominant {
            Channel::Mirror => "Mirror ◈",
            Channel::Shard => "Shard ><",
            Channel::Flux => "Flux ⟡",
        };
        Aura {
            descriptor: format!("{glyph} — {}", self.clock.stage()),
            mood: scale_descriptor(self.mood, ["Dormant", "Calm", "Lively", "Wild"]),
            hunger: scale_descriptor(
                100.0 - self.hunger,
                ["Starving", "Peckish", "Content", "Sated"],
            ),
            energy: scale_descriptor(self.energy, ["Fading", "Steady", "Charged", "Radiant"]),
        }
    }
}

fn channel_for_tags(tags: &[String]) -> Channel {
    let lowered: BTreeSet<String> = tags.iter().map(|tag| tag.to_lowercase()).collect();
    let intersects = |names: &[&str]| names.iter().any(|name| lowered.contains(*name));
    if intersects(&["mirror", "symmetry", "palindrome"]) {
        return Channel::Mirror;
    }
    if intersects(&["shard", "entropy", "wild"]) {
        return Channel::Shard;
    }
    if intersects(&["flux", "flow", "dream"]) {
        return Channel::Flux;
    }
    match lowered.len() % 3 {
        0 => Channel::Mirror,
        1 => Channel::Shard,
        _ => Channel::Flux,
    }
}

fn scale_descriptor(value: f64, steps: [&str; 4]) -> String {
    let bucket = ((value / 101.0 * 4.0) as usize).min(3);
    steps[bucket].to_string()
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}
