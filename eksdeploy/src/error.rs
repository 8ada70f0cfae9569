use thiserror::Error;

/// Failures raised while validating inputs or reading the provisioned cluster
///
/// Each variant aborts the deployment at the stage that produced it
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
  /// Capacity bounds supplied by the user are not usable
  #[error("invalid capacity: {0}")]
  InvalidCapacity(String),

  /// The cluster name is empty
  #[error("cluster name must not be empty")]
  MissingName,

  /// The provisioned cluster is missing a field required to produce outputs
  #[error("incomplete provisioning: {0}")]
  IncompleteProvisioning(String),
}

pub type Result<T> = std::result::Result<T, Error>;
