//! Geometric memory sheet with mirror/shard/flux channels.
//!
//! A lattice is three square grids, one per channel. Each imprint spreads
//! its influence outward from the centre cell, every tick applies a small
//! decay, and all values stay inside `[-10, 10]`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Lower bound for every lattice cell.
pub const VALUE_MIN: f64 = -10.0;
/// Upper bound for every lattice cell.
pub const VALUE_MAX: f64 = 10.0;
/// Grid size used when none is configured.
pub const DEFAULT_SIZE: usize = 5;

/// The three memory categories interactions are filed under.
///
/// Declaration order doubles as the dominance tie-break order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Mirror,
    Shard,
    Flux,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Mirror, Channel::Shard, Channel::Flux];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Mirror => "mirror",
            Channel::Shard => "shard",
            Channel::Flux => "flux",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mirror" => Ok(Channel::Mirror),
            "shard" => Ok(Channel::Shard),
            "flux" => Ok(Channel::Flux),
            other => Err(CoreError::UnknownChannel(other.to_string())),
        }
    }
}

/// Read-only view of the lattice state.
#[derive(Debug, Clone, Serialize)]
pub struct LatticeSnapshot {
    pub averages: BTreeMap<Channel, f64>,
    pub dominant: Channel,
}

/// Bounded 2-D decaying memory grid, one sheet per channel.
#[derive(Debug, Clone)]
pub struct Lattice {
    size: usize,
    grids: [Vec<f64>; 3],
}

impl Default for Lattice {
    fn default() -> Self {
        let cells = DEFAULT_SIZE * DEFAULT_SIZE;
        Self {
            size: DEFAULT_SIZE,
            grids: [vec![0.0; cells], vec![0.0; cells], vec![0.0; cells]],
        }
    }
}

impl Lattice {
    pub fn new(size: usize) -> Result<Self> {
        if size < 3 || size % 2 == 0 {
            return Err(CoreError::invalid_argument(
                "lattice size must be an odd integer >= 3",
            ));
        }
        let cells = size * size;
        Ok(Self {
            size,
            grids: [vec![0.0; cells], vec![0.0; cells], vec![0.0; cells]],
        })
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Spreads `intensity` across `channel` with a soft radial falloff.
    ///
    /// The falloff is Manhattan distance from the centre cell; higher
    /// `focus` widens the imprint. Every other channel relaxes by a fixed
    /// factor once per call.
    pub fn imprint(&mut self, channel: Channel, intensity: f64, focus: f64) {
        let size = self.size;
        let centre = (size / 2) as i64;
        let falloff = (0.65 - focus * 0.05).max(0.1);
        let weight = intensity.abs().clamp(0.05, 5.0);
        let polarity = if intensity >= 0.0 { 1.0 } else { -1.0 };

        let grid = &mut self.grids[channel.slot()];
        for y in 0..size {
            for x in 0..size {
                let distance = ((x as i64 - centre).abs() + (y as i64 - centre).abs()) as f64;
                let influence = (weight - falloff * distance).max(0.0);
                if influence > 0.0 {
                    let idx = y * size + x;
                    grid[idx] = (grid[idx] + polarity * influence * 0.6).clamp(VALUE_MIN, VALUE_MAX);
                }
            }
        }

        // Whenever one channel strengthens, the competing traces relax.
        for other in Channel::ALL {
            if other == channel {
                continue;
            }
            for cell in &mut self.grids[other.slot()] {
                *cell *= 0.985;
            }
        }
    }

    /// Multiplies every cell in every channel by `1 - factor`.
    pub fn decay(&mut self, factor: f64) {
        for grid in &mut self.grids {
            for cell in grid.iter_mut() {
                *cell *= 1.0 - factor;
            }
        }
    }

    /// Per-channel means and the dominant channel.
    ///
    /// Ties resolve to the first channel reaching the maximum in the fixed
    /// mirror, shard, flux order.
    #[must_use]
    pub fn snapshot(&self) -> LatticeSnapshot {
        let cells = (self.size * self.size) as f64;
        let mut averages = BTreeMap::new();
        let mut dominant = Channel::Mirror;
        let mut dominant_value = f64::NEG_INFINITY;
        for channel in Channel::ALL {
            let avg = self.grids[channel.slot()].iter().sum::<f64>() / cells;
            averages.insert(channel, avg);
            if avg > dominant_value {
                dominant = channel;
                dominant_value = avg;
            }
        }
        LatticeSnapshot {
            averages,
            dominant,
        }
    }

    /// Exports the three grids as nested rows keyed by channel name.
    #[must_use]
    pub fn as_grids(&self) -> BTreeMap<String, Vec<Vec<f64>>> {
        Channel::ALL
            .iter()
            .map(|&channel| (channel.as_str().to_string(), self.rows(channel)))
            .collect()
    }

    fn rows(&self, channel: Channel) -> Vec<Vec<f64>> {
        self.grids[channel.slot()]
            .chunks(self.size)
            .map(<[f64]>::to_vec)
            .collect()
    }

    /// Rebuilds a lattice from exported grids.
    ///
    /// All supplied grids must agree on one size and every row must match
    /// it. Channels absent from the payload stay zeroed; unrecognised keys
    /// are ignored.
    pub fn from_grids(payload: &BTreeMap<String, Vec<Vec<f64>>>) -> Result<Self> {
        let sizes: BTreeSet<usize> = payload.values().map(Vec::len).collect();
        if sizes.is_empty() {
            return Err(CoreError::shape_mismatch("payload contains no channel data"));
        }
        if sizes.len() != 1 {
            return Err(CoreError::shape_mismatch("channel grids disagree on size"));
        }
        let size = *sizes.iter().next().unwrap_or(&0);
        let mut lattice = Self::new(size)?;
        for channel in Channel::ALL {
            let Some(rows) = payload.get(channel.as_str()) else {
                continue;
            };
            if rows.iter().any(|row| row.len() != size) {
                return Err(CoreError::shape_mismatch("grid row lengths are not uniform"));
            }
            for (y, row) in rows.iter().enumerate() {
                for (x, value) in row.iter().enumerate() {
                    lattice.grids[channel.slot()][y * size + x] = *value;
                }
            }
        }
        Ok(lattice)
    }
}
