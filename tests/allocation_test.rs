use async_trait::async_trait;
use dractrlplugin::controller::{DraDriver, Driver, DriverError};
use dractrlplugin::params::{Environment, LookupError, ParameterData, ParameterError, ParameterLookup};
use dractrlplugin::spec::dra::{
    AllocationMode, ResourceClaim, ResourceClaimParametersReference, ResourceClaimSpec,
    ResourceClass, ResourceClassParametersReference,
};
use dractrlplugin::spec::node_helpers::selector_nodes;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct FakeConfigMaps {
    data: HashMap<String, Environment>,
    lookups: AtomicUsize,
}

impl FakeConfigMaps {
    fn with(mut self, namespace: &str, name: &str, entries: &[(&str, &str)]) -> Self {
        self.data.insert(
            format!("{}/{}", namespace, name),
            entries.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        );
        self
    }
}

#[async_trait]
impl ParameterLookup for FakeConfigMaps {
    async fn config_map_data(&self, namespace: &str, name: &str) -> Result<Environment, LookupError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.data
            .get(&format!("{}/{}", namespace, name))
            .cloned()
            .ok_or_else(|| LookupError::NotFound {
                kind: "ConfigMap".to_string(),
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }
}

fn class(parameters: Option<(&str, &str)>) -> ResourceClass {
    ResourceClass {
        metadata: ObjectMeta {
            name: Some("example".to_string()),
            ..Default::default()
        },
        driver_name: "dractrlplugin".to_string(),
        parameters_ref: parameters.map(|(namespace, name)| ResourceClassParametersReference {
            api_group: None,
            kind: "ConfigMap".to_string(),
            name: name.to_string(),
            namespace: Some(namespace.to_string()),
        }),
        suitable_nodes: None,
    }
}

fn claim(uid: &str, parameters: Option<(&str, &str)>) -> ResourceClaim {
    ResourceClaim {
        metadata: ObjectMeta {
            name: Some(format!("claim-{}", uid)),
            namespace: Some("team-a".to_string()),
            uid: Some(uid.to_string()),
            ..Default::default()
        },
        spec: ResourceClaimSpec {
            resource_class_name: "example".to_string(),
            parameters_ref: parameters.map(|(kind, name)| ResourceClaimParametersReference {
                api_group: None,
                kind: kind.to_string(),
                name: name.to_string(),
            }),
            allocation_mode: AllocationMode::WaitForFirstConsumer,
        },
        status: None,
    }
}

async fn allocate<L: ParameterLookup>(
    driver: &DraDriver<L>,
    claim: &ResourceClaim,
    class: &ResourceClass,
    node: &str,
) -> Result<dractrlplugin::spec::dra::AllocationResult, DriverError> {
    let class_parameters = driver.get_class_parameters(class).await?;
    let claim_parameters = driver
        .get_claim_parameters(claim, class, &class_parameters)
        .await?;
    driver
        .allocate(claim, &claim_parameters, class, &class_parameters, node)
        .await
}

#[tokio::test]
async fn immediate_allocation_without_binding_has_no_node() {
    let driver = DraDriver::new("dractrlplugin", FakeConfigMaps::default());

    let result = allocate(&driver, &claim("uid-1", None), &class(None), "")
        .await
        .unwrap();

    assert_eq!(result.resource_handle.as_deref(), Some("{}"));
    assert_eq!(result.shareable, Some(false));
    assert!(selector_nodes(result.available_on_nodes.as_ref().unwrap()).is_empty());
    assert!(driver.allocator().state().is_empty());
}

#[tokio::test]
async fn deferred_allocation_binds_claim_once() {
    let driver = DraDriver::new("dractrlplugin", FakeConfigMaps::default());
    let claim = claim("uid-1", None);

    let first = allocate(&driver, &claim, &class(None), "node-a").await.unwrap();
    let second = allocate(&driver, &claim, &class(None), "node-b").await.unwrap();
    let immediate = allocate(&driver, &claim, &class(None), "").await.unwrap();

    for result in [&first, &second, &immediate] {
        assert_eq!(
            selector_nodes(result.available_on_nodes.as_ref().unwrap()),
            vec!["node-a"]
        );
    }
    assert_eq!(driver.allocator().state().len(), 1);
}

#[tokio::test]
async fn claim_parameters_override_class_parameters() {
    let lookup = FakeConfigMaps::default()
        .with("kube-system", "defaults", &[("MODE", "shared"), ("SIZE", "1")])
        .with("team-a", "overrides", &[("SIZE", "4")]);
    let driver = DraDriver::new("dractrlplugin", lookup);

    let result = allocate(
        &driver,
        &claim("uid-1", Some(("ConfigMap", "overrides"))),
        &class(Some(("kube-system", "defaults"))),
        "node-a",
    )
    .await
    .unwrap();

    let handle: Environment = serde_json::from_str(result.resource_handle.as_deref().unwrap()).unwrap();
    assert_eq!(handle.get("MODE").map(String::as_str), Some("shared"));
    assert_eq!(handle.get("SIZE").map(String::as_str), Some("4"));
}

#[tokio::test]
async fn secret_parameters_are_rejected_without_lookup() {
    let lookup = FakeConfigMaps::default().with("team-a", "creds", &[("k", "v")]);
    let driver = DraDriver::new("dractrlplugin", lookup);
    let class = class(None);
    let claim = claim("uid-1", Some(("Secret", "creds")));

    let err = driver
        .get_claim_parameters(&claim, &class, &ParameterData::Absent)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DriverError::Parameters(ParameterError::UnsupportedKind { .. })
    ));
    assert!(err.to_string().contains("Secret"));
}

#[tokio::test]
async fn missing_config_map_fails_allocation() {
    let driver = DraDriver::new("dractrlplugin", FakeConfigMaps::default());

    let err = allocate(
        &driver,
        &claim("uid-1", Some(("ConfigMap", "absent"))),
        &class(None),
        "node-a",
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        DriverError::Parameters(ParameterError::Lookup { .. })
    ));
    assert!(driver.allocator().state().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_allocations_agree_on_one_node() {
    let driver = Arc::new(DraDriver::new("dractrlplugin", FakeConfigMaps::default()));
    let claim = claim("uid-1", None);

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let driver = driver.clone();
            let claim = claim.clone();
            tokio::spawn(async move {
                let node = format!("node-{}", i);
                let result = allocate(&*driver, &claim, &class(None), &node).await.unwrap();
                selector_nodes(result.available_on_nodes.as_ref().unwrap())
                    .iter()
                    .map(|n| n.to_string())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut nodes = Vec::new();
    for task in tasks {
        nodes.push(task.await.unwrap());
    }

    let bound = driver.allocator().state().lookup("uid-1").unwrap();
    assert!(nodes.iter().all(|n| n == &vec![bound.clone()]));
    assert_eq!(driver.allocator().state().len(), 1);
}

#[tokio::test]
async fn deallocation_keeps_binding() {
    let driver = DraDriver::new("dractrlplugin", FakeConfigMaps::default());
    let claim = claim("uid-1", None);

    allocate(&driver, &claim, &class(None), "node-a").await.unwrap();
    driver.deallocate(&claim).await.unwrap();
    let again = allocate(&driver, &claim, &class(None), "node-b").await.unwrap();

    assert_eq!(
        selector_nodes(again.available_on_nodes.as_ref().unwrap()),
        vec!["node-a"]
    );
}
