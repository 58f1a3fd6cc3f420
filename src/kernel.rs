//! Kernel: wires devices, the agent and persistence together.

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use vivarium_core::{Agent, CenturyClock, CoreError, Lattice, Settings, Summary};
use vivarium_io::{StreamEntry, Vault, VaultError};

use crate::devices::{Device, DeviceResponse, NetDevice, TabletDevice};
use crate::skin::SkinRenderer;

/// Errors surfaced by the dispatch layer.
#[derive(Error, Debug)]
pub enum KernelError {
    /// A device refused or could not parse a command.
    #[error("{0}")]
    Device(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error("invalid payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Result type alias for kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;

/// What `observe` hands back: the raw summary plus the rendered skin.
#[derive(Debug, Clone)]
pub struct Observation {
    pub summary: Summary,
    pub skin: String,
}

/// Central orchestrator owning the agent, its vault and the device table.
///
/// All access to the agent funnels through here one call at a time, which
/// is what lets the core stay lock-free.
pub struct Kernel {
    agent: Agent,
    vault: Vault,
    renderer: SkinRenderer,
    devices: HashMap<&'static str, Box<dyn Device>>,
}

impl Kernel {
    /// Restores the persisted agent, or grows a fresh one, and persists once
    /// so the vault is valid from the first moment.
    pub fn bootstrap(settings: &Settings) -> Result<Self> {
        let vault = Vault::open(&settings.vault_path)?;
        let agent = match vault.load_state()? {
            Some(state) => Agent::from_state(state, settings.vitals.clone())?,
            None => {
                let clock = CenturyClock::new(settings.century_real_seconds)?;
                let lattice = Lattice::new(settings.lattice_size)?;
                Agent::new(clock, lattice, settings.vitals.clone())
            }
        };
        info!(creature = %settings.creature_name, hours = agent.clock().total_hours(), "Vivarium awake");
        let kernel = Self::new(agent, vault);
        kernel.persist()?;
        Ok(kernel)
    }

    pub fn new(agent: Agent, vault: Vault) -> Self {
        let installed: [Box<dyn Device>; 2] = [Box::new(TabletDevice), Box::new(NetDevice)];
        let mut devices: HashMap<&'static str, Box<dyn Device>> = HashMap::new();
        for device in installed {
            devices.insert(device.name(), device);
        }
        Self {
            agent,
            vault,
            renderer: SkinRenderer::new(),
            devices,
        }
    }

    #[must_use]
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Dispatches a `<device>.<endpoint>` command, then persists and records
    /// the exchange in the event stream.
    pub fn post(&mut self, address: &str, payload: Value) -> Result<DeviceResponse> {
        let (device_name, endpoint) = parse_address(address)?;
        let device = self
            .devices
            .get(device_name)
            .ok_or_else(|| KernelError::Device(format!("unknown device: {device_name}")))?;
        let response = device.handle(&mut self.agent, endpoint, &payload)?;
        self.persist()?;
        info!(address = address, response = %response.payload, "post");
        self.vault
            .append_stream(&StreamEntry::new(address, payload, response.payload.clone()))?;
        Ok(response)
    }

    /// Advances logical time and persists the result.
    pub fn tick(&mut self, hours: i64) -> Result<Summary> {
        self.agent.advance_time(hours)?;
        self.persist()?;
        info!(hours = hours, "tick");
        Ok(self.agent.summary())
    }

    /// Pure read: summary plus rendered skin.
    #[must_use]
    pub fn observe(&self) -> Observation {
        let summary = self.agent.summary();
        let aura = self.agent.build_aura();
        let skin = self.renderer.render(&self.agent.lattice_snapshot(), &aura);
        debug!(stage = %summary.stage, "observe");
        Observation { summary, skin }
    }

    /// Tails the event stream.
    pub fn stream_tail(&self, limit: usize) -> Result<Vec<StreamEntry>> {
        Ok(self.vault.tail_stream(limit)?)
    }

    pub fn persist(&self) -> Result<()> {
        Ok(self.vault.save_state(&self.agent.to_state())?)
    }
}

fn parse_address(address: &str) -> Result<(&str, &str)> {
    let (device, endpoint) = address.split_once('.').ok_or_else(|| {
        KernelError::Device("address must have the form <device>.<endpoint>".to_string())
    })?;
    if device.is_empty() || endpoint.is_empty() {
        return Err(KernelError::Device("invalid address".to_string()));
    }
    Ok((device, endpoint))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("tablet.feed").unwrap(), ("tablet", "feed"));
        // only the first dot splits
        assert_eq!(parse_address("net.add.extra").unwrap(), ("net", "add.extra"));
        assert!(parse_address("tablet").is_err());
        assert!(parse_address(".feed").is_err());
        assert!(parse_address("tablet.").is_err());
    }
}
