use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use aws_config::SdkConfig;
use aws_sdk_eks::{
  config::{self, retry::RetryConfig},
  types::{Cluster, ClusterStatus, Nodegroup, NodegroupScalingConfig, NodegroupStatus, VpcConfigRequest},
  Client,
};
use tracing::{debug, info};

use crate::{
  config::ProviderConfig,
  kubeconfig::KubeConfig,
  provision::{Provision, ProvisionedCluster},
  spec::{Capacity, ClusterSpec},
};

/// Scaling bounds applied when a cluster spec does not carry its own
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScalingDefaults {
  pub desired_capacity: i32,
  pub min_size: i32,
  pub max_size: i32,
}

pub const DEFAULT_CAPACITY: ScalingDefaults = ScalingDefaults {
  desired_capacity: 2,
  min_size: 1,
  max_size: 2,
};

pub const DEFAULT_INSTANCE_TYPE: &str = "t3.medium";

/// Interval between status checks while waiting on a resource
const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Get the EKS client
pub fn get_client(sdk_config: &SdkConfig) -> Client {
  Client::from_conf(
    // Start with the shared environment configuration
    config::Builder::from(sdk_config)
      // Set max attempts
      .retry_config(RetryConfig::standard().with_max_attempts(3))
      .build(),
  )
}

/// Name of the managed node group created alongside the cluster
pub fn nodegroup_name(cluster_name: &str) -> String {
  format!("{cluster_name}-default")
}

/// Scaling configuration sent to the node group API for the given capacity
pub fn scaling_config(capacity: Capacity) -> NodegroupScalingConfig {
  let (desired, min, max) = match capacity {
    Capacity::Explicit(parameters) => (
      parameters.desired_capacity(),
      parameters.min_size(),
      parameters.max_size(),
    ),
    Capacity::Default => (
      DEFAULT_CAPACITY.desired_capacity,
      DEFAULT_CAPACITY.min_size,
      DEFAULT_CAPACITY.max_size,
    ),
  };

  NodegroupScalingConfig::builder()
    .desired_size(desired)
    .min_size(min)
    .max_size(max)
    .build()
}

/// Whether the node group already runs with the desired scaling bounds
pub fn scaling_matches(current: Option<&NodegroupScalingConfig>, desired: &NodegroupScalingConfig) -> bool {
  current.is_some_and(|current| {
    current.desired_size() == desired.desired_size()
      && current.min_size() == desired.min_size()
      && current.max_size() == desired.max_size()
  })
}

/// Point in time after which waiting is abandoned
///
/// `None` when the timeout is too large to represent, in which case there is no deadline
fn deadline_after(timeout_secs: u64) -> Option<Instant> {
  Instant::now().checked_add(Duration::from_secs(timeout_secs))
}

fn expired(deadline: Option<Instant>) -> bool {
  deadline.is_some_and(|deadline| Instant::now() >= deadline)
}

/// `Ok(true)` once the cluster is active, an error when it can no longer become active
fn cluster_ready(name: &str, status: Option<&ClusterStatus>) -> Result<bool> {
  match status {
    Some(ClusterStatus::Active) => Ok(true),
    Some(ClusterStatus::Failed) => bail!("Cluster {name} failed to provision"),
    Some(ClusterStatus::Deleting) => bail!("Cluster {name} is being deleted"),
    status => {
      debug!("Cluster {name} status: {status:?}");
      Ok(false)
    }
  }
}

/// `Ok(true)` once the node group is active, an error when it can no longer become active
fn nodegroup_ready(nodegroup: &str, status: Option<&NodegroupStatus>) -> Result<bool> {
  match status {
    Some(NodegroupStatus::Active) => Ok(true),
    Some(NodegroupStatus::CreateFailed) => bail!("Node group {nodegroup} failed to provision"),
    Some(NodegroupStatus::Degraded) => bail!("Node group {nodegroup} is degraded"),
    Some(NodegroupStatus::Deleting | NodegroupStatus::DeleteFailed) => {
      bail!("Node group {nodegroup} is being deleted")
    }
    status => {
      debug!("Node group {nodegroup} status: {status:?}");
      Ok(false)
    }
  }
}

/// Describe the cluster, returning `None` when it does not exist
pub async fn describe_cluster(client: &Client, name: &str) -> Result<Option<Cluster>> {
  match client.describe_cluster().name(name).send().await {
    Ok(response) => Ok(response.cluster),
    Err(err) => {
      let err = err.into_service_error();
      if err.is_resource_not_found_exception() {
        return Ok(None);
      }
      Err(anyhow::Error::new(err).context(format!("Failed to describe cluster {name}")))
    }
  }
}

/// Build the provisioned cluster handle from the described cluster
///
/// Values missing from the API response are left unset on the handle
pub fn to_provisioned(cluster: &Cluster, region: &str, profile: Option<&str>) -> Result<ProvisionedCluster> {
  let name = cluster.name().map(str::to_owned);
  let endpoint = cluster.endpoint().map(str::to_owned);
  let b64_ca = cluster.certificate_authority().and_then(|ca| ca.data());

  let kubeconfig = match (&name, &endpoint, b64_ca) {
    (Some(name), Some(endpoint), Some(b64_ca)) => {
      Some(KubeConfig::new(endpoint, name, region, b64_ca, profile).to_yaml()?)
    }
    _ => None,
  };

  Ok(ProvisionedCluster {
    kubeconfig,
    endpoint,
    name,
  })
}

/// Provisions clusters through the EKS API
pub struct EksProvisioner {
  client: Client,
  region: String,
  version: Option<String>,
  provider: ProviderConfig,
}

impl EksProvisioner {
  pub fn new(sdk_config: &SdkConfig, version: Option<String>, provider: ProviderConfig) -> Result<Self> {
    let region = sdk_config
      .region()
      .map(|r| r.to_string())
      .context("AWS region not found; set --region or configure a default region")?;

    Ok(Self {
      client: get_client(sdk_config),
      region,
      version,
      provider,
    })
  }

  fn deadline(&self) -> Option<Instant> {
    deadline_after(self.provider.wait_timeout_secs)
  }

  async fn create_cluster(&self, spec: &ClusterSpec) -> Result<()> {
    let role_arn = self
      .provider
      .role_arn
      .as_deref()
      .context("provider.roleArn is required to create a cluster")?;
    if self.provider.subnet_ids.is_empty() {
      bail!("provider.subnetIds is required to create a cluster");
    }

    info!("Creating cluster {}", spec.name());
    self
      .client
      .create_cluster()
      .name(spec.name())
      .role_arn(role_arn)
      .set_version(self.version.clone())
      .resources_vpc_config(
        VpcConfigRequest::builder()
          .set_subnet_ids(Some(self.provider.subnet_ids.clone()))
          .build(),
      )
      .send()
      .await
      .with_context(|| format!("Failed to create cluster {}", spec.name()))?;

    Ok(())
  }

  async fn wait_for_cluster(&self, name: &str) -> Result<Cluster> {
    let deadline = self.deadline();

    loop {
      let cluster = describe_cluster(&self.client, name)
        .await?
        .ok_or_else(|| anyhow!("Cluster {name} not found"))?;

      if cluster_ready(name, cluster.status())? {
        return Ok(cluster);
      }

      if expired(deadline) {
        bail!("Timed out waiting for cluster {name} to become active");
      }
      info!("Waiting for cluster {name} to become active");
      tokio::time::sleep(POLL_INTERVAL).await;
    }
  }

  /// Describe the node group, returning `None` when it does not exist
  async fn describe_nodegroup(&self, cluster_name: &str, nodegroup: &str) -> Result<Option<Nodegroup>> {
    match self
      .client
      .describe_nodegroup()
      .cluster_name(cluster_name)
      .nodegroup_name(nodegroup)
      .send()
      .await
    {
      Ok(response) => Ok(response.nodegroup),
      Err(err) => {
        let err = err.into_service_error();
        if err.is_resource_not_found_exception() {
          return Ok(None);
        }
        Err(anyhow::Error::new(err).context(format!("Failed to describe node group {nodegroup}")))
      }
    }
  }

  async fn ensure_nodegroup(&self, spec: &ClusterSpec) -> Result<()> {
    let nodegroup = nodegroup_name(spec.name());

    if self.describe_nodegroup(spec.name(), &nodegroup).await?.is_some() {
      info!("Node group {nodegroup} already exists");
    } else {
      let node_role_arn = self
        .provider
        .node_role_arn
        .as_deref()
        .context("provider.nodeRoleArn is required to create a node group")?;

      info!("Creating node group {nodegroup}");
      self
        .client
        .create_nodegroup()
        .cluster_name(spec.name())
        .nodegroup_name(&nodegroup)
        .node_role(node_role_arn)
        .set_subnets(Some(self.provider.subnet_ids.clone()))
        .set_instance_types(Some(self.provider.instance_types.clone()))
        .scaling_config(scaling_config(spec.capacity()))
        .send()
        .await
        .with_context(|| format!("Failed to create node group {nodegroup}"))?;
    }

    let current = self.wait_for_nodegroup(spec.name(), &nodegroup).await?;

    let desired = scaling_config(spec.capacity());
    if !scaling_matches(current.scaling_config(), &desired) {
      info!("Updating scaling configuration of node group {nodegroup}");
      self
        .client
        .update_nodegroup_config()
        .cluster_name(spec.name())
        .nodegroup_name(&nodegroup)
        .scaling_config(desired)
        .send()
        .await
        .with_context(|| format!("Failed to update node group {nodegroup}"))?;

      self.wait_for_nodegroup(spec.name(), &nodegroup).await?;
    }

    Ok(())
  }

  async fn wait_for_nodegroup(&self, cluster_name: &str, nodegroup: &str) -> Result<Nodegroup> {
    let deadline = self.deadline();

    loop {
      let current = self
        .describe_nodegroup(cluster_name, nodegroup)
        .await?
        .ok_or_else(|| anyhow!("Node group {nodegroup} not found"))?;

      if nodegroup_ready(nodegroup, current.status())? {
        return Ok(current);
      }

      if expired(deadline) {
        bail!("Timed out waiting for node group {nodegroup} to become active");
      }
      info!("Waiting for node group {nodegroup} to become active");
      tokio::time::sleep(POLL_INTERVAL).await;
    }
  }

  /// Read the handle of an existing cluster without changing it
  pub async fn describe(&self, name: &str) -> Result<ProvisionedCluster> {
    let cluster = describe_cluster(&self.client, name)
      .await?
      .ok_or_else(|| anyhow!("Cluster {name} not found"))?;

    to_provisioned(&cluster, &self.region, self.provider.profile.as_deref())
  }
}

impl Provision for EksProvisioner {
  async fn provision(&self, spec: ClusterSpec) -> Result<ProvisionedCluster> {
    match describe_cluster(&self.client, spec.name()).await? {
      Some(_) => info!("Cluster {} already exists", spec.name()),
      None => self.create_cluster(&spec).await?,
    }

    let cluster = self.wait_for_cluster(spec.name()).await?;
    self.ensure_nodegroup(&spec).await?;

    to_provisioned(&cluster, &self.region, self.provider.profile.as_deref())
  }
}
