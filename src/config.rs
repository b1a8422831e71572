//! Ambient configuration: defensive size ceilings for the CLI's input
//! loading path. Neither [`crate::validator::validate`] nor
//! [`crate::simulator::simulate`] consult this — it only guards the CLI
//! before it hands a parsed [`crate::types::Graph`] to the library.

use crate::error::ConfigError;
use serde::Deserialize;

/// Generous ceilings on graph size, mirroring the teacher's
/// `SystemLimits::default()` pattern of permissive-but-not-unbounded
/// defaults.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,
    #[serde(default = "default_max_edges")]
    pub max_edges: usize,
}

fn default_max_nodes() -> usize {
    10_000
}

fn default_max_edges() -> usize {
    50_000
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_nodes: default_max_nodes(),
            max_edges: default_max_edges(),
        }
    }
}

impl EngineConfig {
    /// Parse a TOML config file's contents, rejecting a zero limit as a
    /// configuration mistake rather than silently accepting a
    /// never-satisfiable guard.
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig =
            toml::from_str(raw).map_err(|e| ConfigError::InvalidToml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_nodes == 0 {
            return Err(ConfigError::ZeroLimit("max_nodes"));
        }
        if self.max_edges == 0 {
            return Err(ConfigError::ZeroLimit("max_edges"));
        }
        Ok(())
    }

    pub fn within_limits(&self, graph: &crate::types::Graph) -> bool {
        graph.nodes.len() <= self.max_nodes && graph.edges.len() <= self.max_edges
    }
}
