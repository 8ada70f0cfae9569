use std::{fs::File, io::prelude::*, path::Path};

use anyhow::{Context, Result};
use clap::ValueEnum;
use http::Uri;
use serde::{Deserialize, Serialize};

use crate::{
  error::{self, Error},
  provision::ProvisionedCluster,
};

/// Named values exported by a deployment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentOutputs {
  /// Kubeconfig used by clients to authenticate against the cluster
  pub kubeconfig: String,
  /// Cluster API server endpoint
  pub eks_url: String,
  /// Name of the cluster, only present when requested
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub cluster_name: Option<String>,
}

/// Read a required field off of the handle, treating empty values as missing
fn required<'a>(value: &'a Option<String>, field: &str) -> error::Result<&'a str> {
  match value.as_deref() {
    Some(v) if !v.trim().is_empty() => Ok(v),
    _ => Err(Error::IncompleteProvisioning(format!("provisioned cluster is missing `{field}`"))),
  }
}

/// The endpoint must be an absolute URL such as `https://ABCD.gr7.us-west-2.eks.amazonaws.com`
fn endpoint_url(endpoint: &str) -> error::Result<String> {
  let uri: Uri = endpoint
    .parse()
    .map_err(|e| Error::IncompleteProvisioning(format!("endpoint `{endpoint}` is not a valid URL: {e}")))?;

  if uri.scheme().is_none() || uri.host().is_none() {
    return Err(Error::IncompleteProvisioning(format!(
      "endpoint `{endpoint}` is not an absolute URL"
    )));
  }

  Ok(endpoint.to_owned())
}

/// Extract the named outputs from a provisioned cluster
///
/// `kubeconfig` and `eksUrl` are always extracted. `clusterName` is only extracted
/// when `include_name` is set and is otherwise left out entirely
pub fn extract(cluster: &ProvisionedCluster, include_name: bool) -> error::Result<DeploymentOutputs> {
  let kubeconfig = required(&cluster.kubeconfig, "kubeconfig")?;
  let eks_url = endpoint_url(required(&cluster.endpoint, "endpoint")?)?;

  let cluster_name = match include_name {
    true => Some(required(&cluster.name, "name")?.to_owned()),
    false => None,
  };

  Ok(DeploymentOutputs {
    kubeconfig: kubeconfig.to_owned(),
    eks_url,
    cluster_name,
  })
}

#[derive(Clone, Copy, Debug, Default, ValueEnum, Serialize, Deserialize)]
pub enum Format {
  /// JSON document keyed by output name
  #[default]
  Json,
  /// YAML document keyed by output name
  Yaml,
}

impl DeploymentOutputs {
  pub fn render(&self, format: Format) -> Result<String> {
    let rendered = match format {
      Format::Json => serde_json::to_string_pretty(self)?,
      Format::Yaml => serde_yaml::to_string(self)?,
    };

    Ok(rendered)
  }
}

/// Write the outputs to the given file, or to stdout when no file is given
pub fn write(outputs: &DeploymentOutputs, format: Format, filename: Option<&Path>) -> Result<()> {
  let rendered = outputs.render(format)?;

  match filename {
    Some(filename) => {
      let mut file =
        File::create(filename).with_context(|| format!("Failed to create output file: {}", filename.display()))?;
      file.write_all(rendered.as_bytes())?;
    }
    None => {
      println!("{rendered}");
    }
  }

  Ok(())
}
