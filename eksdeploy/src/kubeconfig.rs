use std::path::Path;

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};

use crate::utils;

/// API version of the credential returned by `aws eks get-token`
const EXEC_API_VERSION: &str = "client.authentication.k8s.io/v1beta1";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubeConfig {
  /// Kind is a string value representing the REST resource this object represents.
  kind: String,

  /// APIVersion defines the versioned schema of this representation of an object.
  api_version: String,

  /// Clusters defined in the kubeconfig
  clusters: Vec<NamedCluster>,

  /// Contexts binds names to cluster/user/namespaces tuples
  contexts: Vec<NamedContext>,

  /// CurrentContext is the name of the default context
  #[serde(rename = "current-context")]
  current_context: String,

  /// Users defined in the kubeconfig
  users: Vec<NamedAuthInfo>,
}

impl KubeConfig {
  /// Kubeconfig for a user reaching an EKS cluster through `aws eks get-token`
  ///
  /// `b64_ca` is the base64 encoded certificate authority data returned by the EKS API.
  /// When `profile` is set, it is passed to the AWS CLI through `AWS_PROFILE`
  pub fn new(server: &str, cluster_name: &str, region: &str, b64_ca: &str, profile: Option<&str>) -> Self {
    let env = profile.map(|profile| {
      vec![EnvVar {
        name: "AWS_PROFILE".to_owned(),
        value: profile.to_owned(),
      }]
    });

    KubeConfig {
      kind: "Config".to_owned(),
      api_version: "v1".to_owned(),
      clusters: vec![NamedCluster {
        cluster: Cluster {
          server: server.into(),
          certificate_authority_data: Some(b64_ca.into()),
          tls_server_name: None,
          proxy_url: None,
        },
        name: cluster_name.into(),
      }],
      contexts: vec![NamedContext {
        context: Context {
          cluster: cluster_name.into(),
          namespace: None,
          user: cluster_name.into(),
        },
        name: cluster_name.into(),
      }],
      current_context: cluster_name.into(),
      users: vec![NamedAuthInfo {
        user: AuthInfo {
          token: None,
          exec: Some(ExecConfig {
            api_version: Some(EXEC_API_VERSION.to_owned()),
            command: "aws".to_owned(),
            args: Some(vec![
              "eks".to_owned(),
              "get-token".to_owned(),
              "--cluster-name".to_owned(),
              cluster_name.into(),
              "--region".to_owned(),
              region.into(),
            ]),
            env,
            interactive_mode: Some(ExecInteractiveMode::Never),
          }),
        },
        name: cluster_name.into(),
      }],
    }
  }

  pub fn to_yaml(&self) -> Result<String> {
    serde_yaml::to_string(self).context("Failed to serialize kubeconfig")
  }

  /// Write the kubeconfig readable only by the current user
  pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
    utils::write_file(self.to_yaml()?.as_bytes(), path, Some(0o600))
  }
}

/// NamedCluster relates nicknames to cluster information
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct NamedCluster {
  /// Cluster holds the cluster information
  cluster: Cluster,

  /// Name is the nickname for this Cluster
  name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct Cluster {
  /// Server is the address of the kubernetes cluster (https://hostname:port)
  server: String,

  /// CertificateAuthorityData contains PEM-encoded certificate authority certificates, base64 encoded
  #[serde(skip_serializing_if = "Option::is_none")]
  certificate_authority_data: Option<String>,

  /// TLSServerName is used to check server certificate. If TLSServerName is empty, the
  /// hostname used to contact the server is used
  #[serde(skip_serializing_if = "Option::is_none")]
  tls_server_name: Option<String>,

  /// ProxyURL is the URL to the proxy to be used for all requests made by this client
  #[serde(skip_serializing_if = "Option::is_none")]
  proxy_url: Option<String>,
}

/// NamedContext relates nicknames to context information
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct NamedContext {
  /// Name is the nickname for this Context
  name: String,

  /// Context holds the context information
  context: Context,
}

/// Context is a tuple of references to a cluster, a user and a namespace
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct Context {
  /// Cluster is the name of the cluster for this context
  cluster: String,

  /// User is the name of the authInfo for this context
  user: String,

  /// Namespace is the default namespace to use on unspecified requests
  #[serde(skip_serializing_if = "Option::is_none")]
  namespace: Option<String>,
}

/// NamedAuthInfo relates nicknames to auth information
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct NamedAuthInfo {
  /// Name is the nickname for this AuthInfo
  name: String,

  /// AuthInfo holds the auth information
  user: AuthInfo,
}

/// AuthInfo contains information that describes identity information
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct AuthInfo {
  /// Token is the bearer token for authentication to the kubernetes cluster
  #[serde(skip_serializing_if = "Option::is_none")]
  token: Option<String>,

  /// Exec specifies a custom exec-based authentication plugin for the kubernetes cluster
  #[serde(skip_serializing_if = "Option::is_none")]
  exec: Option<ExecConfig>,
}

/// ExecConfig specifies a command to provide client credentials.
/// The command is exec'd and outputs structured stdout holding credentials.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExecConfig {
  /// Preferred input version of the ExecInfo
  #[serde(skip_serializing_if = "Option::is_none")]
  api_version: Option<String>,

  /// Command to execute
  command: String,

  /// Arguments to pass to the command when executing it
  #[serde(skip_serializing_if = "Option::is_none")]
  args: Option<Vec<String>>,

  /// Env defines additional environment variables to expose to the process
  #[serde(skip_serializing_if = "Option::is_none")]
  env: Option<Vec<EnvVar>>,

  /// InteractiveMode determines this plugin's relationship with standard input
  #[serde(skip_serializing_if = "Option::is_none", default)]
  interactive_mode: Option<ExecInteractiveMode>,
}

/// ExecEnvVar is used for setting environment variables when executing an exec-based credential plugin
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct EnvVar {
  name: String,
  value: String,
}

/// ExecInteractiveMode is a string that describes an exec plugin's relationship with standard input.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ExecInteractiveMode {
  /// This exec plugin never uses standard input
  Never,

  /// This exec plugin wants to use standard input if it is available
  #[default]
  IfAvailable,

  /// This exec plugin requires standard input to function
  Always,
}
