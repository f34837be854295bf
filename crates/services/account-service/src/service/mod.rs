//! Service layer - account provisioning use cases.

mod provisioner;

pub use provisioner::AccountProvisioner;
