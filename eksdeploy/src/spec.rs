use serde::Serialize;

use crate::{
  capacity::CapacityParameters,
  error::{Error, Result},
};

/// Node group capacity requested for a cluster
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "source", content = "parameters")]
pub enum Capacity {
  /// Let the provisioner choose its own scaling bounds
  #[default]
  Default,
  /// Explicit, already validated scaling bounds
  Explicit(CapacityParameters),
}

/// Final, immutable description of the cluster to provision
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClusterSpec {
  name: String,
  capacity: Capacity,
}

impl ClusterSpec {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn capacity(&self) -> Capacity {
    self.capacity
  }
}

/// Merge a cluster name with optional capacity overrides into a [`ClusterSpec`]
///
/// Overrides are expected to come out of [`crate::capacity::validate`] and are not
/// checked again here. Absent overrides select [`Capacity::Default`]
pub fn build(name: &str, overrides: Option<CapacityParameters>) -> Result<ClusterSpec> {
  if name.trim().is_empty() {
    return Err(Error::MissingName);
  }

  let capacity = match overrides {
    Some(parameters) => Capacity::Explicit(parameters),
    None => Capacity::Default,
  };

  Ok(ClusterSpec {
    name: name.to_owned(),
    capacity,
  })
}
