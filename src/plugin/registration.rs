use crate::plugin::proto::pluginregistration::registration_server::Registration;
use crate::plugin::proto::pluginregistration::{
    InfoRequest, PluginInfo, RegistrationStatus, RegistrationStatusResponse,
};
use async_trait::async_trait;
use log::{error, info};
use tonic::{Request, Response, Status};

pub const PLUGIN_TYPE: &str = "DRAPlugin";
pub const SUPPORTED_VERSIONS: [&str; 1] = ["1.0.0"];

/// Answers the kubelet plugin watcher, which finds the registrar socket and
/// asks where the plugin itself listens.
#[derive(Clone)]
pub struct Registrar {
    driver_name: String,
    endpoint: String,
}

impl Registrar {
    pub fn new(driver_name: &str, endpoint: &str) -> Self {
        Registrar {
            driver_name: driver_name.to_string(),
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl Registration for Registrar {
    async fn get_info(&self, _request: Request<InfoRequest>) -> Result<Response<PluginInfo>, Status> {
        info!("registration info requested for {}", self.driver_name);
        Ok(Response::new(PluginInfo {
            r#type: PLUGIN_TYPE.to_string(),
            name: self.driver_name.clone(),
            endpoint: self.endpoint.clone(),
            supported_versions: SUPPORTED_VERSIONS.iter().map(|v| v.to_string()).collect(),
        }))
    }

    async fn notify_registration_status(
        &self,
        request: Request<RegistrationStatus>,
    ) -> Result<Response<RegistrationStatusResponse>, Status> {
        let status = request.into_inner();
        match status.plugin_registered {
            true => info!("{} registered with kubelet", self.driver_name),
            false => error!("{} registration failed: {}", self.driver_name, status.error),
        }
        Ok(Response::new(RegistrationStatusResponse {}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_describe_plugin() {
        let registrar = Registrar::new("dractrlplugin", "/var/lib/kubelet/plugins/dractrlplugin/dractrlplugin.sock");
        let info = registrar
            .get_info(Request::new(InfoRequest {}))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(info.r#type, "DRAPlugin");
        assert_eq!(info.name, "dractrlplugin");
        assert_eq!(info.endpoint, "/var/lib/kubelet/plugins/dractrlplugin/dractrlplugin.sock");
        assert_eq!(info.supported_versions, vec!["1.0.0".to_string()]);
    }

    #[tokio::test]
    async fn failed_registration_is_acknowledged() {
        let registrar = Registrar::new("dractrlplugin", "/tmp/plugin.sock");
        let response = registrar
            .notify_registration_status(Request::new(RegistrationStatus {
                plugin_registered: false,
                error: "version mismatch".to_string(),
            }))
            .await;

        assert!(response.is_ok());
    }
}
