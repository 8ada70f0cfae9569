pub mod mock_provisioner;
