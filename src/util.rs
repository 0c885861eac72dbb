use env_logger::DEFAULT_FILTER_ENV;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::Metadata;
use log::{info, LevelFilter};
use std::fmt::{Display, Formatter};
use tokio::signal::unix::{signal, SignalKind};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespacedName {
    pub name: String,
    pub namespace: String,
}

impl From<&str> for NamespacedName {
    fn from(s: &str) -> Self {
        match s.split_once('/') {
            Some((namespace, name)) => Self::new(name, namespace),
            None => Self::new(s, "default"),
        }
    }
}

impl Display for NamespacedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

impl NamespacedName {
    pub fn new(name: &str, namespace: &str) -> Self {
        NamespacedName {
            name: name.to_string(),
            namespace: namespace.to_string(),
        }
    }
}

pub fn metadata_name(obj: &impl Metadata<Ty = ObjectMeta>) -> NamespacedName {
    let m = obj.metadata();
    NamespacedName::new(
        m.name.as_deref().unwrap_or_default(),
        m.namespace.as_deref().unwrap_or("default"),
    )
}

/// Logs at info, or debug when verbose. `RUST_LOG` overrides both.
pub fn setup_logging(verbose: bool) {
    let mut builder = env_logger::Builder::default();
    builder.filter_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });
    builder.format_timestamp_millis();

    if std::env::var(DEFAULT_FILTER_ENV).is_ok() {
        builder.parse_default_env();
    }
    // a second init from tests is harmless
    let _ = builder.try_init();
}

/// Resolves on the first SIGHUP, SIGINT, SIGTERM or SIGQUIT.
pub async fn termination_signal() -> Result<(), std::io::Error> {
    let mut hangup = signal(SignalKind::hangup())?;
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut quit = signal(SignalKind::quit())?;

    let name = tokio::select! {
        _ = hangup.recv() => "SIGHUP",
        _ = interrupt.recv() => "SIGINT",
        _ = terminate.recv() => "SIGTERM",
        _ = quit.recv() => "SIGQUIT",
    };
    info!("received {}, shutting down", name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::objects::claim;

    #[test]
    fn should_parse_namespaced_name() {
        assert_eq!(NamespacedName::from("team-a/gpu"), NamespacedName::new("gpu", "team-a"));
        assert_eq!(NamespacedName::from("gpu"), NamespacedName::new("gpu", "default"));
        assert_eq!(NamespacedName::new("gpu", "team-a").to_string(), "team-a/gpu");
    }

    #[test]
    fn should_take_name_from_metadata() {
        let c = claim("gpu", "team-a", "uid-1");
        assert_eq!(metadata_name(&c), NamespacedName::new("gpu", "team-a"));
    }
}
