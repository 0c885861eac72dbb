//! Checked-in prost/tonic code for the kubelet plugin APIs under `proto/`.

pub mod pluginregistration;
pub mod v1alpha1;
