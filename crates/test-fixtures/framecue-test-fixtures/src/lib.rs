//! Shared fixtures for framecue integration tests: authored op-tree JSON
//! files addressed by short names through a manifest.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    ops: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

/// Raw JSON for a named op-tree fixture.
pub fn op_json(name: &str) -> Result<String> {
    let rel = MANIFEST
        .ops
        .get(name)
        .ok_or_else(|| anyhow!("unknown op fixture '{name}'"))?;
    let path = fixtures_root().join(rel);
    fs::read_to_string(&path).with_context(|| format!("reading fixture {}", path.display()))
}

/// Names of all op-tree fixtures in the manifest.
pub fn op_names() -> Vec<String> {
    let mut names: Vec<String> = MANIFEST.ops.keys().cloned().collect();
    names.sort();
    names
}
