use crate::config::DriverConfig;
use crate::dractrl_controller::shutdown;
use crate::errors::DraError;
use crate::plugin::Plugin;
use crate::util::setup_logging;
use clap::Parser;
use log::info;

#[derive(Debug, Parser)]
#[command(name = "dractrl-plugin")]
#[command(about = "DRA kubelet plugin", long_about = "Node plugin for the dractrlplugin driver", version)]
pub struct PluginArgs {
    #[arg(long, long_help = "Driver configuration file.")]
    pub config: Option<String>,
    #[arg(long, long_help = "Name of the driver, overrides the configuration file.")]
    pub driver_name: Option<String>,
    #[arg(long, long_help = "Socket the node service listens on.")]
    pub plugin_socket_path: Option<String>,
    #[arg(long, long_help = "Socket the kubelet discovers the plugin through.")]
    pub registrar_socket_path: Option<String>,
    #[arg(short, long, long_help = "Log at debug level.")]
    pub verbose: bool,
}

impl PluginArgs {
    pub fn driver_config(&self) -> Result<DriverConfig, DraError> {
        let mut config = DriverConfig::load(self.config.as_deref())?;
        if let Some(name) = &self.driver_name {
            config.driver_name = name.clone();
        }
        if let Some(path) = &self.plugin_socket_path {
            config.plugin_socket_path = path.clone();
        }
        if let Some(path) = &self.registrar_socket_path {
            config.registrar_socket_path = path.clone();
        }
        config.validated()
    }
}

pub async fn dractrl_plugin() -> Result<(), DraError> {
    let args = PluginArgs::parse();
    setup_logging(args.verbose);

    let config = args.driver_config()?;
    let plugin = Plugin::new(
        &config.driver_name,
        &config.plugin_socket_path,
        &config.registrar_socket_path,
    );

    plugin.serve(shutdown()).await?;
    info!("plugin {} stopped", config.driver_name);
    Ok(())
}
