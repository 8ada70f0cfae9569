use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::{
  capacity::CapacityParameters,
  outputs::{self, DeploymentOutputs},
  provision::Provision,
  spec,
};

/// Run a deployment end to end
///
/// Builds the cluster spec, hands it to the provisioner and extracts the named
/// outputs from the handle it returns. The first failing stage aborts the run
pub async fn deploy<P: Provision>(
  provisioner: &P,
  name: &str,
  overrides: Option<CapacityParameters>,
  include_name: bool,
) -> Result<DeploymentOutputs> {
  let spec = spec::build(name, overrides)?;
  debug!("Cluster spec: {spec:?}");

  info!("Provisioning cluster {}", spec.name());
  let cluster = provisioner
    .provision(spec)
    .await
    .with_context(|| format!("Failed to provision cluster {name}"))?;
  debug!("Provisioned cluster endpoint: {:?}", cluster.endpoint);

  let outputs = outputs::extract(&cluster, include_name)?;
  info!("Cluster {name} is available at {}", outputs.eks_url);

  Ok(outputs)
}
