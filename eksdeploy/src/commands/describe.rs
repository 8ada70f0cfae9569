use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{ClusterArgs, OutputArgs};
use crate::{eks::EksProvisioner, error::Error, outputs};

/// Export the outputs of an existing cluster without changing it
#[derive(Args, Debug, Default, Serialize, Deserialize)]
pub struct Describe {
  #[clap(flatten)]
  pub cluster: ClusterArgs,

  #[clap(flatten)]
  pub output: OutputArgs,
}

impl Describe {
  pub async fn describe(&self) -> Result<()> {
    let config = self.cluster.load()?;
    let name = config
      .cluster
      .name
      .clone()
      .filter(|name| !name.trim().is_empty())
      .ok_or(Error::MissingName)?;

    let sdk_config = crate::get_sdk_config(config.cluster.region.clone()).await?;
    let provisioner = EksProvisioner::new(&sdk_config, None, config.provider.clone())?;

    info!("Describing cluster {name}");
    let cluster = provisioner
      .describe(&name)
      .await
      .with_context(|| format!("Failed to describe cluster {name}"))?;
    let outputs = outputs::extract(&cluster, config.outputs.cluster_name)?;

    self.output.emit(&outputs)
  }
}
