use crate::errors::DraError;
use crate::params::{Environment, LookupError, ParameterLookup, SUPPORTED_KIND};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::api::Api;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::Client;
use log::info;

/// Client from an explicit kubeconfig, or the inferred in-cluster/default
/// config when none is given.
pub async fn kube_client(kubeconfig: Option<&str>) -> Result<Client, DraError> {
    let config = match kubeconfig.filter(|p| !p.is_empty()) {
        Some(path) => {
            let path = shellexpand::tilde(path).into_owned();
            info!("using kubeconfig {}", path);
            let kubeconfig = Kubeconfig::read_from(path)?;
            kube::Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default()).await?
        }
        None => {
            info!("no kubeconfig given, inferring client config");
            kube::Config::infer().await?
        }
    };
    Ok(Client::try_from(config)?)
}

/// Parameter lookups against the API server.
pub struct KubeConfigMaps {
    client: Client,
}

impl KubeConfigMaps {
    pub fn new(client: Client) -> Self {
        KubeConfigMaps { client }
    }
}

#[async_trait]
impl ParameterLookup for KubeConfigMaps {
    async fn config_map_data(&self, namespace: &str, name: &str) -> Result<Environment, LookupError> {
        let api: Api<ConfigMap> = Api::namespaced(self.client.clone(), namespace);
        match api.get(name).await {
            Ok(config_map) => Ok(config_map.data.unwrap_or_default()),
            Err(kube::Error::Api(response)) if response.code == 404 => Err(LookupError::NotFound {
                kind: SUPPORTED_KIND.to_string(),
                namespace: namespace.to_string(),
                name: name.to_string(),
            }),
            Err(e) => Err(LookupError::Backend {
                reference: format!("{} {}/{}", SUPPORTED_KIND, namespace, name),
                message: e.to_string(),
            }),
        }
    }
}
