pub mod deploy;
pub mod describe;
pub mod plan;

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
  config::{self, CapacityConfig, Config},
  kubeconfig::KubeConfig,
  outputs::{self, DeploymentOutputs, Format},
  utils,
};

/// Arguments shared by every command that targets a cluster
#[derive(Args, Debug, Default, Serialize, Deserialize)]
pub struct ClusterArgs {
  /// Path to the configuration file
  ///
  /// Defaults to `.eksdeploy.yaml` in the current directory when present
  #[arg(short, long)]
  pub config: Option<PathBuf>,

  /// The name of the EKS cluster
  #[arg(short, long, alias = "cluster-name")]
  pub name: Option<String>,

  /// The AWS region where the cluster is provisioned
  #[arg(short, long)]
  pub region: Option<String>,

  /// Include the `clusterName` output
  #[arg(long)]
  pub include_name: bool,
}

impl ClusterArgs {
  /// Load the configuration file and overlay the values supplied on the command line
  pub fn load(&self) -> Result<Config> {
    let mut config = config::load(self.config.as_deref())?;

    if let Some(name) = &self.name {
      config.cluster.name = Some(name.to_owned());
    }
    if let Some(region) = &self.region {
      config.cluster.region = Some(region.to_owned());
    }
    config.outputs.cluster_name |= self.include_name;

    Ok(config)
  }
}

/// Node group scaling bounds supplied on the command line
#[derive(Args, Debug, Default, Serialize, Deserialize)]
pub struct CapacityArgs {
  /// Number of nodes the node group should run
  #[arg(long, allow_negative_numbers = true)]
  pub desired_capacity: Option<i32>,

  /// Minimum number of nodes in the node group
  #[arg(long, allow_negative_numbers = true)]
  pub min_size: Option<i32>,

  /// Maximum number of nodes in the node group
  #[arg(long, allow_negative_numbers = true)]
  pub max_size: Option<i32>,
}

impl From<&CapacityArgs> for CapacityConfig {
  fn from(args: &CapacityArgs) -> Self {
    CapacityConfig {
      desired_capacity: args.desired_capacity,
      min_size: args.min_size,
      max_size: args.max_size,
    }
  }
}

/// Where and how the deployment outputs are written
#[derive(Args, Debug, Default, Serialize, Deserialize)]
pub struct OutputArgs {
  #[arg(short, long, value_enum, default_value_t)]
  pub format: Format,

  /// Write the outputs to file instead of stdout
  #[arg(short, long)]
  pub output: Option<PathBuf>,

  /// Also write the kubeconfig to this path (mode 0600)
  #[arg(long)]
  pub write_kubeconfig: Option<PathBuf>,
}

impl OutputArgs {
  pub fn emit(&self, outputs: &DeploymentOutputs) -> Result<()> {
    if let Some(path) = &self.write_kubeconfig {
      match serde_yaml::from_str::<KubeConfig>(&outputs.kubeconfig) {
        Ok(kubeconfig) => kubeconfig.write(path)?,
        Err(err) => {
          warn!("Kubeconfig output is not a recognized kubeconfig document, writing it unchanged: {err}");
          utils::write_file(outputs.kubeconfig.as_bytes(), path, Some(0o600))?;
        }
      }
    }

    outputs::write(outputs, self.format, self.output.as_deref())
  }
}
