use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
  capacity::{self, CapacityParameters},
  eks,
  error,
};

/// Top-level configuration loaded from `.eksdeploy.yaml` or an explicit path
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
  #[serde(default)]
  pub cluster: ClusterConfig,

  #[serde(default)]
  pub capacity: CapacityConfig,

  #[serde(default)]
  pub outputs: OutputsConfig,

  #[serde(default)]
  pub provider: ProviderConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterConfig {
  /// Name of the cluster to deploy
  pub name: Option<String>,

  /// AWS region, falls back to the shared AWS configuration when unset
  pub region: Option<String>,

  /// Kubernetes version of the control plane, EKS picks its default when unset
  pub version: Option<String>,
}

/// Node group scaling bounds; every field is optional
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CapacityConfig {
  pub desired_capacity: Option<i32>,
  pub min_size: Option<i32>,
  pub max_size: Option<i32>,
}

impl CapacityConfig {
  /// Overlay another set of values on top of this one, field by field
  pub fn merge(self, other: CapacityConfig) -> CapacityConfig {
    CapacityConfig {
      desired_capacity: other.desired_capacity.or(self.desired_capacity),
      min_size: other.min_size.or(self.min_size),
      max_size: other.max_size.or(self.max_size),
    }
  }

  /// Resolve into validated overrides
  ///
  /// - `None` when no field is set, leaving the choice to the provisioner
  /// - Otherwise unset fields take the provisioner defaults before validation
  pub fn resolve(&self) -> error::Result<Option<CapacityParameters>> {
    if self.desired_capacity.is_none() && self.min_size.is_none() && self.max_size.is_none() {
      return Ok(None);
    }

    let defaults = eks::DEFAULT_CAPACITY;
    let parameters = capacity::validate(
      self.desired_capacity.unwrap_or(defaults.desired_capacity),
      self.min_size.unwrap_or(defaults.min_size),
      self.max_size.unwrap_or(defaults.max_size),
    )?;
    debug!("Resolved capacity overrides: {parameters:?}");

    Ok(Some(parameters))
  }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputsConfig {
  /// Export the `clusterName` output
  #[serde(default, rename = "clusterName")]
  pub cluster_name: bool,
}

/// Settings consumed by the EKS provisioner only
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProviderConfig {
  /// IAM role assumed by the EKS control plane
  pub role_arn: Option<String>,

  /// IAM role assumed by the nodes of the managed node group
  pub node_role_arn: Option<String>,

  /// Subnets used by the control plane and the node group
  #[serde(default)]
  pub subnet_ids: Vec<String>,

  /// Instance types of the managed node group
  #[serde(default = "default_instance_types")]
  pub instance_types: Vec<String>,

  /// AWS profile written into the generated kubeconfig
  pub profile: Option<String>,

  /// Upper bound on the time spent waiting for resources to become active
  #[serde(default = "default_wait_timeout_secs")]
  pub wait_timeout_secs: u64,
}

fn default_instance_types() -> Vec<String> {
  vec![eks::DEFAULT_INSTANCE_TYPE.to_owned()]
}

fn default_wait_timeout_secs() -> u64 {
  40 * 60
}

impl Default for ProviderConfig {
  fn default() -> Self {
    Self {
      role_arn: None,
      node_role_arn: None,
      subnet_ids: Vec::new(),
      instance_types: default_instance_types(),
      profile: None,
      wait_timeout_secs: default_wait_timeout_secs(),
    }
  }
}

const DEFAULT_CONFIG_FILE: &str = ".eksdeploy.yaml";

/// Load configuration from an explicit path, the default `.eksdeploy.yaml` in the
/// current working directory, or fall back to `Config::default()`
pub fn load(path: Option<&Path>) -> Result<Config> {
  load_from(path, std::env::current_dir().ok().as_deref())
}

fn read(path: &Path) -> Result<Config> {
  let contents =
    std::fs::read_to_string(path).with_context(|| format!("Failed to read config file: {}", path.display()))?;
  let config: Config =
    serde_yaml::from_str(&contents).with_context(|| format!("Failed to parse config file: {}", path.display()))?;
  debug!("Loaded configuration from {}", path.display());

  Ok(config)
}

fn load_from(path: Option<&Path>, base_dir: Option<&Path>) -> Result<Config> {
  if let Some(p) = path {
    return read(p);
  }

  if let Some(dir) = base_dir {
    let default_path = dir.join(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
      return read(&default_path);
    }
  }

  Ok(Config::default())
}
