mod common;

use common::mock_provisioner::{MockProvisioner, MockProvisionerError};
use eksdeploy::{capacity, outputs::Format, provision::ProvisionedCluster, spec::Capacity, Error};

// ============================================================================
// Successful deployments
// ============================================================================

#[tokio::test]
async fn deploy_default_capacity() {
  let provisioner = MockProvisioner::healthy("eks-for-tekton");
  let outputs = eksdeploy::deploy(&provisioner, "eks-for-tekton", None, false).await.unwrap();

  assert_eq!(outputs.kubeconfig, "K");
  assert_eq!(outputs.eks_url, "https://x");
  assert_eq!(outputs.cluster_name, None);

  let calls = provisioner.calls();
  assert_eq!(calls.len(), 1);
  assert_eq!(calls[0].name(), "eks-for-tekton");
  assert_eq!(calls[0].capacity(), Capacity::Default);
}

#[tokio::test]
async fn deploy_with_capacity_and_name() {
  let provisioner = MockProvisioner::healthy("eks-for-tekton");
  let overrides = capacity::validate(3, 3, 4).unwrap();

  let outputs = eksdeploy::deploy(&provisioner, "eks-for-tekton", Some(overrides), true)
    .await
    .unwrap();

  assert_eq!(outputs.cluster_name.as_deref(), Some("eks-for-tekton"));
  assert_eq!(provisioner.calls()[0].capacity(), Capacity::Explicit(overrides));

  let rendered = outputs.render(Format::Json).unwrap();
  assert!(rendered.contains(r#""clusterName": "eks-for-tekton""#));
}

#[tokio::test]
async fn deploy_is_repeatable() {
  let provisioner = MockProvisioner::healthy("eks-for-tekton");
  let first = eksdeploy::deploy(&provisioner, "eks-for-tekton", None, true).await.unwrap();
  let second = eksdeploy::deploy(&provisioner, "eks-for-tekton", None, true).await.unwrap();

  assert_eq!(first, second);
  let calls = provisioner.calls();
  assert_eq!(calls[0], calls[1]);
}

// ============================================================================
// Error paths
// ============================================================================

#[tokio::test]
async fn deploy_missing_name_never_provisions() {
  let provisioner = MockProvisioner::healthy("eks-for-tekton");
  let err = eksdeploy::deploy(&provisioner, "", None, false).await.unwrap_err();

  assert_eq!(err.downcast_ref::<Error>(), Some(&Error::MissingName));
  assert!(provisioner.calls().is_empty());
}

#[tokio::test]
async fn deploy_provisioning_error_propagates() {
  let err = eksdeploy::deploy(&MockProvisionerError, "eks-for-tekton", None, false)
    .await
    .unwrap_err();

  let chain = format!("{err:#}");
  assert!(chain.contains("Failed to provision cluster eks-for-tekton"), "{chain}");
  assert!(chain.contains("mock provisioning error"), "{chain}");
}

#[tokio::test]
async fn deploy_incomplete_handle() {
  let provisioner = MockProvisioner::new(ProvisionedCluster {
    kubeconfig: None,
    endpoint: Some("https://x".into()),
    name: Some("eks-for-tekton".into()),
  });

  let err = eksdeploy::deploy(&provisioner, "eks-for-tekton", None, false)
    .await
    .unwrap_err();
  assert!(matches!(
    err.downcast_ref::<Error>(),
    Some(Error::IncompleteProvisioning(_))
  ));
}

#[tokio::test]
async fn deploy_missing_name_only_matters_when_requested() {
  let provisioner = MockProvisioner::new(ProvisionedCluster {
    name: None,
    ..MockProvisioner::healthy("unused").cluster
  });

  assert!(eksdeploy::deploy(&provisioner, "eks-for-tekton", None, false).await.is_ok());
  assert!(eksdeploy::deploy(&provisioner, "eks-for-tekton", None, true).await.is_err());
}
