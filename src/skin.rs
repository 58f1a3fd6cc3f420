//! ASCII skin renderer keyed on the dominant lattice channel.

use vivarium_core::{Aura, Channel, LatticeSnapshot};

const MIRROR_SKIN: &str = "   ◈   \n  / \\\n <   >\n  \\ /\n   ◈   ";
const SHARD_SKIN: &str = "  ><  \n <<>> \n><  ><\n <<>> \n  ><  ";
const FLUX_SKIN: &str = "  ⟡⟡  \n ⟡  ⟡ \n⟡    ⟡\n ⟡  ⟡ \n  ⟡⟡  ";

/// Renders stylised skins from a lattice snapshot and an aura.
pub struct SkinRenderer;

impl SkinRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn render(&self, snapshot: &LatticeSnapshot, aura: &Aura) -> String {
        let base = base_skin(snapshot.dominant);
        format!(
            "{base}\nAura: {}\nMood: {} | Hunger: {} | Energy: {}",
            aura.descriptor, aura.mood, aura.hunger, aura.energy
        )
    }
}

impl Default for SkinRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn base_skin(channel: Channel) -> &'static str {
    match channel {
        Channel::Mirror => MIRROR_SKIN,
        Channel::Shard => SHARD_SKIN,
        Channel::Flux => FLUX_SKIN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vivarium_core::{Agent, CenturyClock, Lattice, VitalsConfig};

    #[test]
    fn test_render_tracks_dominant_channel() {
        let clock = CenturyClock::new(2_592_000.0).unwrap();
        let lattice = Lattice::new(5).unwrap();
        let mut agent = Agent::new(clock, lattice, VitalsConfig::default());
        agent.teach("zigzag", Channel::Shard);

        let renderer = SkinRenderer::new();
        let skin = renderer.render(&agent.lattice_snapshot(), &agent.build_aura());
        assert!(skin.contains("><"));
        assert!(skin.contains("Aura: Shard"));
        assert!(skin.contains("Mood:"));
    }

    #[test]
    fn test_fresh_agent_wears_mirror_skin() {
        let clock = CenturyClock::new(2_592_000.0).unwrap();
        let lattice = Lattice::new(5).unwrap();
        let agent = Agent::new(clock, lattice, VitalsConfig::default());

        let renderer = SkinRenderer::default();
        let skin = renderer.render(&agent.lattice_snapshot(), &agent.build_aura());
        assert!(skin.contains('◈'));
        assert!(skin.contains("Hunger: Content"));
    }
}
