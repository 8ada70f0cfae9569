use anyhow::Result;
use clap::Args;
use serde::{Deserialize, Serialize};

use super::{CapacityArgs, ClusterArgs};
use crate::{
  config::CapacityConfig,
  spec::{self, ClusterSpec},
};

/// Validate the inputs and print the cluster spec without calling AWS
#[derive(Args, Debug, Default, Serialize, Deserialize)]
pub struct Plan {
  #[clap(flatten)]
  pub cluster: ClusterArgs,

  #[clap(flatten)]
  pub capacity: CapacityArgs,
}

impl Plan {
  pub fn spec(&self) -> Result<ClusterSpec> {
    let config = self.cluster.load()?;
    let capacity = config.capacity.merge(CapacityConfig::from(&self.capacity));
    let overrides = capacity.resolve()?;
    let name = config.cluster.name.unwrap_or_default();

    Ok(spec::build(&name, overrides)?)
  }

  pub async fn plan(&self) -> Result<()> {
    let spec = self.spec()?;
    println!("{}", serde_json::to_string_pretty(&spec)?);

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{capacity, error::Error, spec::Capacity};

  /// The returned directory holds an empty config file and must outlive the plan
  fn plan(name: Option<&str>, capacity: CapacityArgs) -> (tempfile::TempDir, Plan) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.yaml");
    std::fs::write(&path, "{}").unwrap();

    let plan = Plan {
      cluster: ClusterArgs {
        config: Some(path),
        name: name.map(str::to_owned),
        ..Default::default()
      },
      capacity,
    };

    (dir, plan)
  }

  #[test]
  fn it_plans_default_capacity() {
    let (_dir, plan) = plan(Some("eks-for-tekton"), CapacityArgs::default());

    let spec = plan.spec().unwrap();
    assert_eq!(spec.name(), "eks-for-tekton");
    assert_eq!(spec.capacity(), Capacity::Default);
  }

  #[test]
  fn it_plans_from_config_file_with_flag_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(
      &path,
      "cluster:\n  name: from-file\ncapacity:\n  desiredCapacity: 3\n  minSize: 3\n  maxSize: 4\n",
    )
    .unwrap();

    let plan = Plan {
      cluster: ClusterArgs {
        config: Some(path),
        ..Default::default()
      },
      capacity: CapacityArgs {
        max_size: Some(6),
        ..Default::default()
      },
    };

    let spec = plan.spec().unwrap();
    assert_eq!(spec.name(), "from-file");
    assert_eq!(spec.capacity(), Capacity::Explicit(capacity::validate(3, 3, 6).unwrap()));
  }

  #[test]
  fn it_requires_a_name() {
    let (_dir, plan) = plan(None, CapacityArgs::default());
    let err = plan.spec().unwrap_err();
    assert_eq!(err.downcast_ref::<Error>(), Some(&Error::MissingName));
  }

  #[test]
  fn it_rejects_invalid_capacity() {
    let capacity = CapacityArgs {
      desired_capacity: Some(5),
      min_size: Some(3),
      max_size: Some(4),
    };
    let (_dir, plan) = plan(Some("eks-for-tekton"), capacity);
    let err = plan.spec().unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::InvalidCapacity(_))));
  }
}
