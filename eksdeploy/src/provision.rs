use std::future::Future;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::spec::ClusterSpec;

/// Handle to a cluster returned by a provisioner
///
/// Fields are optional since the handle comes from outside of this crate;
/// the output extraction step decides which of them are required
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionedCluster {
  /// Kubeconfig used by clients to reach the cluster
  pub kubeconfig: Option<String>,
  /// Cluster API server endpoint
  pub endpoint: Option<String>,
  /// Name of the cluster
  pub name: Option<String>,
}

/// Creates (or adopts) the cluster described by a [`ClusterSpec`]
///
/// Latency, retries and timeouts are the responsibility of the implementation
pub trait Provision {
  fn provision(&self, spec: ClusterSpec) -> impl Future<Output = Result<ProvisionedCluster>> + Send;
}
