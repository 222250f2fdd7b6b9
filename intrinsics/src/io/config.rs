//! Resolver configuration (`intrinsics.toml`).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::actions::{GET_ATT, REF, SUB};
use crate::core::registry::IntrinsicRegistry;

/// Resolver configuration (TOML).
///
/// Missing fields fall back to defaults, so an empty file is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResolverConfig {
    /// Reject templates and parameter files nested deeper than this before
    /// resolving.
    ///
    /// This bounds the input only. Parameters that reference themselves
    /// through a nested value (`{"A": {"K": {"Ref": "A"}}}`) grow the document
    /// on every inline and are not caught here.
    pub max_depth: usize,

    /// Intrinsic functions to resolve. Others are walked as plain objects.
    pub intrinsics: Vec<String>,

    /// Pretty-print resolved documents.
    pub pretty: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: 100,
            intrinsics: vec![GET_ATT.to_string(), SUB.to_string(), REF.to_string()],
            pretty: true,
        }
    }
}

impl ResolverConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(anyhow!("max_depth must be > 0"));
        }
        if self.intrinsics.is_empty() {
            return Err(anyhow!("intrinsics must be a non-empty array"));
        }
        self.registry()?;
        Ok(())
    }

    /// Registry holding the configured built-in handlers.
    pub fn registry(&self) -> Result<IntrinsicRegistry> {
        IntrinsicRegistry::with_names(&self.intrinsics).context("resolve configured intrinsics")
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ResolverConfig::default()`.
pub fn load_config(path: &Path) -> Result<ResolverConfig> {
    if !path.exists() {
        let cfg = ResolverConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ResolverConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
