use crate::controller::DriverError;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum DraError {
    #[error("Error: {0}")]
    String(String),
    #[error("Error: {0}")]
    Anyhow(#[from] anyhow::Error),
    #[error("Error: {0}")]
    IO(#[from] std::io::Error),
    #[error("Error: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),
    #[error("Error: {0}")]
    Kube(#[from] kube::Error),
    #[error("Error: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),
    #[error("Error: {0}")]
    InferConfig(#[from] kube::config::InferConfigError),
    #[error("Error: {0}")]
    Transport(#[from] tonic::transport::Error),
    #[error("Error: {0}")]
    Driver(#[from] DriverError),
    #[error("Error: {}", .0)]
    ValidationErrors(#[from] ValidationErrors),
}

impl From<String> for DraError {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}
