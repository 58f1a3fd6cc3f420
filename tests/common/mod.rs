use std::fs;
use std::path::PathBuf;

use vivarium_core::{Agent, CenturyClock, Lattice, Settings, VitalsConfig};

/// Builds a fresh default agent on a 30-day century.
#[allow(dead_code)]
pub fn fresh_agent() -> Agent {
    let clock = CenturyClock::new(2_592_000.0).expect("default century is valid");
    let lattice = Lattice::new(5).expect("default lattice size is valid");
    Agent::new(clock, lattice, VitalsConfig::default())
}

/// Settings pointing at an isolated scratch directory per test.
#[allow(dead_code)]
pub fn scratch_settings(tag: &str) -> Settings {
    let root = scratch_root(tag);
    let _ = fs::remove_dir_all(&root);
    Settings {
        vault_path: root.join("vault").to_string_lossy().into_owned(),
        log_path: root.join("logs").to_string_lossy().into_owned(),
        ..Settings::default()
    }
}

#[allow(dead_code)]
pub fn scratch_root(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("vivarium-test-{tag}-{}", std::process::id()))
}

#[allow(dead_code)]
pub fn cleanup(tag: &str) {
    let _ = fs::remove_dir_all(scratch_root(tag));
}
