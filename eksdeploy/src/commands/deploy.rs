use anyhow::Result;
use clap::Args;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CapacityArgs, ClusterArgs, OutputArgs};
use crate::{config::CapacityConfig, eks::EksProvisioner};

/// Provision the cluster and its node group, then export the outputs
#[derive(Args, Debug, Default, Serialize, Deserialize)]
pub struct Deploy {
  #[clap(flatten)]
  pub cluster: ClusterArgs,

  #[clap(flatten)]
  pub capacity: CapacityArgs,

  #[clap(flatten)]
  pub output: OutputArgs,
}

impl Deploy {
  pub async fn deploy(&self) -> Result<()> {
    let config = self.cluster.load()?;
    debug!("Configuration: {config:#?}");

    // Inputs are validated before any AWS call is made
    let capacity = config.capacity.merge(CapacityConfig::from(&self.capacity));
    let overrides = capacity.resolve()?;
    let name = config.cluster.name.clone().unwrap_or_default();

    let sdk_config = crate::get_sdk_config(config.cluster.region.clone()).await?;
    let provisioner = EksProvisioner::new(&sdk_config, config.cluster.version.clone(), config.provider.clone())?;

    let outputs = crate::deploy(&provisioner, &name, overrides, config.outputs.cluster_name).await?;
    self.output.emit(&outputs)
  }
}
