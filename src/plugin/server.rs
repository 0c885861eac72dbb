use crate::errors::DraError;
use crate::plugin::node::NodeAgent;
use crate::plugin::proto::pluginregistration::registration_server::RegistrationServer;
use crate::plugin::proto::v1alpha1::node_server::NodeServer;
use crate::plugin::registration::Registrar;
use log::{info, warn};
use std::fs::DirBuilder;
use std::future::Future;
use std::io::ErrorKind;
use std::os::unix::fs::DirBuilderExt;
use std::path::{Path, PathBuf};
use tokio::net::UnixListener;
use tokio::sync::watch;
use tokio_stream::wrappers::UnixListenerStream;
use tonic::transport::Server;

const SOCKET_DIR_MODE: u32 = 0o750;

/// Kubelet plugin serving the node service and the registration service
/// on two unix sockets.
pub struct Plugin {
    driver_name: String,
    plugin_socket: PathBuf,
    registrar_socket: PathBuf,
}

impl Plugin {
    pub fn new(driver_name: &str, plugin_socket: &str, registrar_socket: &str) -> Self {
        Plugin {
            driver_name: driver_name.to_string(),
            plugin_socket: PathBuf::from(plugin_socket),
            registrar_socket: PathBuf::from(registrar_socket),
        }
    }

    /// Serves until `shutdown` resolves, then removes both sockets.
    pub async fn serve(&self, shutdown: impl Future<Output = ()>) -> Result<(), DraError> {
        let plugin_listener = bind(&self.plugin_socket)?;
        let registrar_listener = bind(&self.registrar_socket)?;

        let endpoint = self.plugin_socket.to_string_lossy().to_string();
        let node = NodeServer::new(NodeAgent::new(&self.driver_name));
        let registration = RegistrationServer::new(Registrar::new(&self.driver_name, &endpoint));

        let (stop_tx, stop_rx) = watch::channel(false);

        info!("serving node service on {}", self.plugin_socket.display());
        let node_server = Server::builder()
            .add_service(node)
            .serve_with_incoming_shutdown(
                UnixListenerStream::new(plugin_listener),
                stopped(stop_rx.clone()),
            );

        info!("serving registration service on {}", self.registrar_socket.display());
        let registration_server = Server::builder()
            .add_service(registration)
            .serve_with_incoming_shutdown(
                UnixListenerStream::new(registrar_listener),
                stopped(stop_rx),
            );

        let signal = async move {
            shutdown.await;
            info!("stopping plugin {}", self.driver_name);
            let _ = stop_tx.send(true);
            Ok::<(), tonic::transport::Error>(())
        };

        let result = tokio::try_join!(node_server, registration_server, signal);

        remove_socket(&self.plugin_socket);
        remove_socket(&self.registrar_socket);

        result?;
        Ok(())
    }
}

async fn stopped(mut rx: watch::Receiver<bool>) {
    // a dropped sender also counts as stopped
    let _ = rx.wait_for(|stop| *stop).await;
}

/// Creates the socket directory, clears a stale socket and listens.
pub fn bind(path: &Path) -> Result<UnixListener, DraError> {
    if let Some(dir) = path.parent() {
        DirBuilder::new()
            .recursive(true)
            .mode(SOCKET_DIR_MODE)
            .create(dir)?;
    }
    match std::fs::remove_file(path) {
        Ok(_) => info!("removed stale socket {}", path.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    Ok(UnixListener::bind(path)?)
}

fn remove_socket(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != ErrorKind::NotFound {
            warn!("failed to remove socket {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    #[tokio::test]
    async fn should_create_socket_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("plugins/dractrlplugin/dractrlplugin.sock");

        let _listener = bind(&path).unwrap();

        assert!(path.exists());
        let mode = std::fs::metadata(path.parent().unwrap()).unwrap().permissions().mode();
        assert_eq!(mode & 0o007, 0);
    }

    #[tokio::test]
    async fn should_replace_stale_socket() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("dractrlplugin.sock");
        std::fs::write(&path, b"stale").unwrap();

        let _listener = bind(&path).unwrap();

        assert!(!std::fs::metadata(&path).unwrap().is_file());
    }

    #[tokio::test]
    async fn should_remove_sockets_on_shutdown() {
        let tmp = tempfile::tempdir().unwrap();
        let plugin_socket = tmp.path().join("plugins/dractrlplugin.sock");
        let registrar_socket = tmp.path().join("registry/dractrlplugin-reg.sock");
        let plugin = Plugin::new(
            "dractrlplugin",
            plugin_socket.to_str().unwrap(),
            registrar_socket.to_str().unwrap(),
        );

        plugin.serve(async {}).await.unwrap();

        assert!(!plugin_socket.exists());
        assert!(!registrar_socket.exists());
    }
}
