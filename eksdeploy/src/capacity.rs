use serde::Serialize;

use crate::error::{Error, Result};

/// Scaling bounds for the cluster's node group
///
/// Only constructed through [`validate`], so any value of this type satisfies
/// `min_size <= desired_capacity <= max_size` with all values non-negative
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityParameters {
  desired_capacity: i32,
  min_size: i32,
  max_size: i32,
}

impl CapacityParameters {
  /// Number of nodes the node group should run
  pub fn desired_capacity(&self) -> i32 {
    self.desired_capacity
  }

  /// Lower bound on the number of nodes
  pub fn min_size(&self) -> i32 {
    self.min_size
  }

  /// Upper bound on the number of nodes
  pub fn max_size(&self) -> i32 {
    self.max_size
  }
}

/// Validate user supplied capacity bounds
///
/// Fails when any value is negative, when `min_size` exceeds `max_size`, or when
/// `desired_capacity` falls outside of `[min_size, max_size]`
pub fn validate(desired_capacity: i32, min_size: i32, max_size: i32) -> Result<CapacityParameters> {
  for (field, value) in [
    ("desiredCapacity", desired_capacity),
    ("minSize", min_size),
    ("maxSize", max_size),
  ] {
    if value < 0 {
      return Err(Error::InvalidCapacity(format!("{field} must not be negative, got {value}")));
    }
  }

  if min_size > max_size {
    return Err(Error::InvalidCapacity(format!(
      "minSize ({min_size}) must not exceed maxSize ({max_size})"
    )));
  }

  if desired_capacity < min_size || desired_capacity > max_size {
    return Err(Error::InvalidCapacity(format!(
      "desiredCapacity ({desired_capacity}) must be within [{min_size}, {max_size}]"
    )));
  }

  Ok(CapacityParameters {
    desired_capacity,
    min_size,
    max_size,
  })
}
