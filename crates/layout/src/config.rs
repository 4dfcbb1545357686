//! Layout configuration, typically parsed from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Which algorithm the default factory binds to each component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// Seeded scatter followed by iterative force-directed refinement.
    ForceDirected,
    /// One-shot placement on a circle.
    Circle,
    /// One-shot seeded scatter.
    Random,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_algorithm")]
    pub algorithm: LayoutKind,
    /// Base seed for scatter; each component derives its own stream from it.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Edge length of the cube initial scatter fills.
    #[serde(default = "default_scatter_extent")]
    pub scatter_extent: f32,
    #[serde(default)]
    pub force_directed: ForceDirectedConfig,
    #[serde(default)]
    pub circle: CircleConfig,
}

fn default_algorithm() -> LayoutKind {
    LayoutKind::ForceDirected
}
fn default_seed() -> u64 {
    1
}
fn default_scatter_extent() -> f32 {
    10.0
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            seed: default_seed(),
            scatter_extent: default_scatter_extent(),
            force_directed: ForceDirectedConfig::default(),
            circle: CircleConfig::default(),
        }
    }
}

impl LayoutConfig {
    pub fn from_toml_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}

/// Tuning for [`crate::ForceDirectedLayout`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForceDirectedConfig {
    /// Inner iterations per `execute()` — the bounded unit of work.
    #[serde(default = "default_iterations_per_execute")]
    pub iterations_per_execute: usize,
    /// Rest length of the springs along edges.
    #[serde(default = "default_spring_length")]
    pub spring_length: f32,
    /// Spring constant pulling adjacent nodes together.
    #[serde(default = "default_spring_strength")]
    pub spring_strength: f32,
    /// Pairwise repulsion constant pushing all nodes apart.
    #[serde(default = "default_repulsion")]
    pub repulsion: f32,
    /// Starting temperature: per-iteration displacement cap.
    #[serde(default = "default_initial_temperature")]
    pub initial_temperature: f32,
    /// Multiplicative temperature decay per inner iteration.
    #[serde(default = "default_cooling")]
    pub cooling: f32,
    /// Maximum node displacement below which the component counts as
    /// converged.
    #[serde(default = "default_convergence_threshold")]
    pub convergence_threshold: f32,
}

fn default_iterations_per_execute() -> usize {
    10
}
fn default_spring_length() -> f32 {
    1.0
}
fn default_spring_strength() -> f32 {
    0.1
}
fn default_repulsion() -> f32 {
    1.0
}
fn default_initial_temperature() -> f32 {
    1.0
}
fn default_cooling() -> f32 {
    0.98
}
fn default_convergence_threshold() -> f32 {
    1e-3
}

impl Default for ForceDirectedConfig {
    fn default() -> Self {
        Self {
            iterations_per_execute: default_iterations_per_execute(),
            spring_length: default_spring_length(),
            spring_strength: default_spring_strength(),
            repulsion: default_repulsion(),
            initial_temperature: default_initial_temperature(),
            cooling: default_cooling(),
            convergence_threshold: default_convergence_threshold(),
        }
    }
}

/// Tuning for [`crate::CircleLayout`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircleConfig {
    /// Arc distance between adjacent nodes on the circle.
    #[serde(default = "default_spacing")]
    pub spacing: f32,
}

fn default_spacing() -> f32 {
    1.0
}

impl Default for CircleConfig {
    fn default() -> Self {
        Self { spacing: default_spacing() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = LayoutConfig::default();
        assert_eq!(config.algorithm, LayoutKind::ForceDirected);
        assert_eq!(config.seed, 1);
        assert_eq!(config.scatter_extent, 10.0);
        assert_eq!(config.force_directed.iterations_per_execute, 10);
        assert_eq!(config.force_directed.cooling, 0.98);
        assert_eq!(config.circle.spacing, 1.0);
    }

    #[test]
    fn parse_partial_toml() {
        let config: LayoutConfig = toml::from_str(
            r#"
            algorithm = "circle"
            seed = 42

            [circle]
            spacing = 2.5
            "#,
        )
        .expect("valid config");

        assert_eq!(config.algorithm, LayoutKind::Circle);
        assert_eq!(config.seed, 42);
        assert_eq!(config.circle.spacing, 2.5);
        // Untouched sections keep their defaults.
        assert_eq!(config.force_directed.spring_length, 1.0);
    }

    #[test]
    fn parse_rejects_unknown_algorithm() {
        let result: Result<LayoutConfig, _> = toml::from_str(r#"algorithm = "magnetic""#);
        assert!(result.is_err());
    }
}
