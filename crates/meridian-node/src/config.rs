//! Node configuration loading and management.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use meridian_core::config::EngineConfig;
use meridian_routing::TopologyIndex;

/// Full configuration for a Meridian node.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MeridianConfig {
    /// Node identity settings.
    #[serde(default)]
    pub node: NodeSection,

    /// API server settings.
    #[serde(default)]
    pub api: ApiSection,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSection,

    /// Routing engine tunables.
    #[serde(default)]
    pub engine: EngineSection,

    /// Attestation settings.
    #[serde(default)]
    pub attestation: AttestationSection,

    /// Known overlay topology.
    #[serde(default)]
    pub topology: TopologySection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSection {
    /// Node display name.
    #[serde(default = "default_node_name")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSection {
    /// API listen address.
    #[serde(default = "default_api_addr")]
    pub listen_addr: String,
    /// API port.
    #[serde(default = "default_api_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSection {
    /// Instability threshold above which routing is refused.
    #[serde(default = "default_sigma_threshold")]
    pub sigma_threshold: f64,
    /// Route validity window in seconds.
    #[serde(default = "default_route_ttl_secs")]
    pub route_ttl_secs: u64,
    /// Derivation time-bucket width in seconds.
    #[serde(default = "default_time_bucket_secs")]
    pub time_bucket_secs: u64,
    /// Deadline for boundary-collaborator calls in seconds.
    #[serde(default = "default_dependency_timeout_secs")]
    pub dependency_timeout_secs: u64,
    /// Base transit delay in seconds before priority scaling.
    #[serde(default = "default_base_delay_secs")]
    pub base_delay_secs: u64,
    /// σ reported until an external feed updates the monitor.
    #[serde(default)]
    pub initial_sigma: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AttestationSection {
    /// Hex-encoded Ed25519 public key of the attestation authority.
    #[serde(default)]
    pub authority_public_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologySection {
    /// Insert every link in both directions.
    #[serde(default = "default_true")]
    pub symmetric: bool,
    /// Known links.
    #[serde(default)]
    pub links: Vec<LinkSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkSection {
    pub from: String,
    pub to: String,
    /// Link reliability in [0, 1]; defaults to the engine-wide constant.
    #[serde(default)]
    pub reliability: Option<f64>,
}

// Default value functions
fn default_node_name() -> String {
    "meridian-node".into()
}
fn default_api_addr() -> String {
    "127.0.0.1".into()
}
fn default_api_port() -> u16 {
    7800
}
fn default_log_level() -> String {
    "info".into()
}
fn default_sigma_threshold() -> f64 {
    5e-5
}
fn default_route_ttl_secs() -> u64 {
    300
}
fn default_time_bucket_secs() -> u64 {
    60
}
fn default_dependency_timeout_secs() -> u64 {
    3
}
fn default_base_delay_secs() -> u64 {
    3500
}
fn default_true() -> bool {
    true
}

impl Default for NodeSection {
    fn default() -> Self {
        Self {
            name: default_node_name(),
        }
    }
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            listen_addr: default_api_addr(),
            port: default_api_port(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            sigma_threshold: default_sigma_threshold(),
            route_ttl_secs: default_route_ttl_secs(),
            time_bucket_secs: default_time_bucket_secs(),
            dependency_timeout_secs: default_dependency_timeout_secs(),
            base_delay_secs: default_base_delay_secs(),
            initial_sigma: 0.0,
        }
    }
}

impl Default for TopologySection {
    fn default() -> Self {
        Self {
            symmetric: default_true(),
            links: Vec::new(),
        }
    }
}

impl MeridianConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let raw = toml::to_string_pretty(self).context("serializing config")?;
        std::fs::write(path, raw)
            .with_context(|| format!("writing config file {}", path.display()))?;
        Ok(())
    }

    /// Engine tunables derived from the `[engine]` section.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            sigma_threshold: self.engine.sigma_threshold,
            route_ttl: std::time::Duration::from_secs(self.engine.route_ttl_secs),
            time_bucket: std::time::Duration::from_secs(self.engine.time_bucket_secs),
            dependency_timeout: std::time::Duration::from_secs(
                self.engine.dependency_timeout_secs,
            ),
            base_delay: std::time::Duration::from_secs(self.engine.base_delay_secs),
        }
    }

    /// Build the topology index from the `[topology]` section.
    pub fn build_topology(&self) -> TopologyIndex {
        let mut topology = TopologyIndex::new();
        for link in &self.topology.links {
            topology.insert_link(link.from.as_str(), link.to.as_str());
            if self.topology.symmetric {
                topology.insert_link(link.to.as_str(), link.from.as_str());
            }
            if let Some(reliability) = link.reliability {
                topology.set_link_reliability(link.from.as_str(), link.to.as_str(), reliability);
                if self.topology.symmetric {
                    topology.set_link_reliability(
                        link.to.as_str(),
                        link.from.as_str(),
                        reliability,
                    );
                }
            }
        }
        topology
    }

    /// A small demo topology used by `init` so a fresh node routes out of
    /// the box.
    pub fn with_demo_topology(mut self) -> Self {
        self.topology.links = vec![
            LinkSection {
                from: "earth".into(),
                to: "luna".into(),
                reliability: Some(0.999),
            },
            LinkSection {
                from: "luna".into(),
                to: "mars".into(),
                reliability: Some(0.97),
            },
            LinkSection {
                from: "earth".into(),
                to: "relay-1".into(),
                reliability: None,
            },
            LinkSection {
                from: "relay-1".into(),
                to: "mars".into(),
                reliability: None,
            },
        ];
        self
    }
}
