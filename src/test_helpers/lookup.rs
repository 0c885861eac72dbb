use crate::params::{Environment, LookupError, ParameterLookup, SUPPORTED_KIND};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// ConfigMap store backed by a map, counting every lookup.
#[derive(Default)]
pub struct MemoryLookup {
    config_maps: BTreeMap<(String, String), Environment>,
    calls: AtomicUsize,
}

impl MemoryLookup {
    pub fn with(mut self, namespace: &str, name: &str, data: &[(&str, &str)]) -> Self {
        let data = data
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.config_maps
            .insert((namespace.to_string(), name.to_string()), data);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ParameterLookup for MemoryLookup {
    async fn config_map_data(&self, namespace: &str, name: &str) -> Result<Environment, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.config_maps
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| LookupError::NotFound {
                kind: SUPPORTED_KIND.to_string(),
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }
}
