use std::sync::Mutex;

use anyhow::{bail, Result};

use eksdeploy::provision::{Provision, ProvisionedCluster};
use eksdeploy::spec::ClusterSpec;

/// Mock provisioner returning a fixed handle and recording the cluster specs it received
#[derive(Default)]
pub struct MockProvisioner {
  pub cluster: ProvisionedCluster,
  pub received: Mutex<Vec<ClusterSpec>>,
}

impl MockProvisioner {
  pub fn new(cluster: ProvisionedCluster) -> Self {
    Self {
      cluster,
      received: Mutex::new(Vec::new()),
    }
  }

  /// Handle of a fully provisioned cluster with the given name
  pub fn healthy(name: &str) -> Self {
    Self::new(ProvisionedCluster {
      kubeconfig: Some("K".into()),
      endpoint: Some("https://x".into()),
      name: Some(name.into()),
    })
  }

  pub fn calls(&self) -> Vec<ClusterSpec> {
    self.received.lock().unwrap().clone()
  }
}

impl Provision for MockProvisioner {
  async fn provision(&self, spec: ClusterSpec) -> Result<ProvisionedCluster> {
    self.received.lock().unwrap().push(spec);
    Ok(self.cluster.clone())
  }
}

/// Mock that fails every provisioning call
pub struct MockProvisionerError;

impl Provision for MockProvisionerError {
  async fn provision(&self, _spec: ClusterSpec) -> Result<ProvisionedCluster> {
    bail!("mock provisioning error")
  }
}
