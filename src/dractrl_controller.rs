use crate::config::DriverConfig;
use crate::controller::{Controller, DraDriver};
use crate::deps::{kube_client, KubeConfigMaps};
use crate::errors::DraError;
use crate::util::{setup_logging, termination_signal};
use clap::Parser;
use log::{error, info};

#[derive(Debug, Parser)]
#[command(name = "dractrl-controller")]
#[command(about = "DRA controller", long_about = "Allocates resource claims for the dractrlplugin driver", version)]
pub struct ControllerArgs {
    #[arg(short = 'f', long, env = "KUBECONFIG", long_help = "Path to the kubeconfig file. In-cluster config is used when unset.")]
    pub kubeconfig: Option<String>,
    #[arg(long, long_help = "Driver configuration file.")]
    pub config: Option<String>,
    #[arg(long, long_help = "Name of the driver, overrides the configuration file.")]
    pub driver_name: Option<String>,
    #[arg(long, long_help = "Number of claims processed concurrently.")]
    pub workers: Option<usize>,
    #[arg(short, long, long_help = "Log at debug level.")]
    pub verbose: bool,
}

impl ControllerArgs {
    pub fn driver_config(&self) -> Result<DriverConfig, DraError> {
        let mut config = DriverConfig::load(self.config.as_deref())?;
        if let Some(name) = &self.driver_name {
            config.driver_name = name.clone();
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        config.validated()
    }
}

pub async fn dractrl_controller() -> Result<(), DraError> {
    let args = ControllerArgs::parse();
    setup_logging(args.verbose);

    let config = args.driver_config()?;
    let client = kube_client(args.kubeconfig.as_deref()).await?;

    let driver = DraDriver::new(&config.driver_name, KubeConfigMaps::new(client.clone()));
    let controller = Controller::new(&config.driver_name, client, driver);

    controller.run(config.workers, shutdown()).await;
    info!("controller {} stopped", config.driver_name);
    Ok(())
}

pub(crate) async fn shutdown() {
    if let Err(e) = termination_signal().await {
        error!("failed to install signal handlers: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config::DEFAULT_WORKERS;

    #[test]
    fn flags_override_defaults() {
        let args = ControllerArgs::try_parse_from([
            "dractrl-controller",
            "-f",
            "/tmp/kubeconfig",
            "--workers",
            "8",
            "--driver-name",
            "gpu.example.com",
        ])
        .unwrap();

        assert_eq!(args.kubeconfig.as_deref(), Some("/tmp/kubeconfig"));
        let config = args.driver_config().unwrap();
        assert_eq!(config.workers, 8);
        assert_eq!(config.driver_name, "gpu.example.com");
    }

    #[test]
    fn defaults_without_flags() {
        let args = ControllerArgs::try_parse_from(["dractrl-controller"]).unwrap();
        let config = args.driver_config().unwrap();
        assert_eq!(config.workers, DEFAULT_WORKERS);
    }

    #[test]
    fn zero_workers_is_rejected() {
        let args = ControllerArgs::try_parse_from(["dractrl-controller", "--workers", "0"]).unwrap();
        assert!(args.driver_config().is_err());
    }
}
