use crate::controller::driver::{ClaimAllocation, Driver, DriverError};
use crate::controller::queue::{WorkItem, WorkQueue};
use crate::spec::dra::{
    AllocationMode, PodScheduling, ResourceClaim, ResourceClaimSchedulingStatus, ResourceClass,
};
use crate::util::{metadata_name, NamespacedName};
use futures::{Future, StreamExt};
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, Patch, PatchParams};
use kube::runtime::{watcher, WatchStreamExt};
use kube::Client;
use log::{debug, error, info, warn};
use serde_json::json;
use std::sync::Arc;
use tokio::task::JoinSet;

#[derive(thiserror::Error, Debug)]
pub enum SyncError {
    #[error("{0}")]
    Kube(#[from] kube::Error),
    #[error("{0}")]
    Driver(#[from] DriverError),
    #[error("failed to encode status patch: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Watches claims and pod scheduling objects and drives a [`Driver`] for
/// the ones belonging to it.
pub struct Controller<D: Driver> {
    inner: Arc<Inner<D>>,
}

struct Inner<D: Driver> {
    name: String,
    client: Client,
    driver: D,
    queue: Arc<WorkQueue>,
}

impl<D: Driver + 'static> Controller<D> {
    pub fn new(name: &str, client: Client, driver: D) -> Self {
        Controller {
            inner: Arc::new(Inner {
                name: name.to_string(),
                client,
                driver,
                queue: WorkQueue::new(),
            }),
        }
    }

    /// Runs `workers` workers until `shutdown` resolves.
    pub async fn run(&self, workers: usize, shutdown: impl Future<Output = ()>) {
        info!("starting controller {} with {} workers", self.inner.name, workers);
        let mut tasks = JoinSet::new();

        tasks.spawn(watch::<ResourceClaim>(
            Api::all(self.inner.client.clone()),
            self.inner.queue.clone(),
            |c| WorkItem::Claim(metadata_name(c)),
        ));
        tasks.spawn(watch::<PodScheduling>(
            Api::all(self.inner.client.clone()),
            self.inner.queue.clone(),
            |s| WorkItem::Scheduling(metadata_name(s)),
        ));

        for id in 0..workers {
            let inner = self.inner.clone();
            tasks.spawn(async move { inner.work(id).await });
        }

        shutdown.await;
        info!("stopping controller {}", self.inner.name);
        tasks.abort_all();
        while tasks.join_next().await.is_some() {}
    }
}

async fn watch<K>(api: Api<K>, queue: Arc<WorkQueue>, key: fn(&K) -> WorkItem)
where
    K: kube::Resource + Clone + serde::de::DeserializeOwned + std::fmt::Debug + Send + 'static,
{
    let mut stream = watcher(api, watcher::Config::default())
        .default_backoff()
        .applied_objects()
        .boxed();

    while let Some(event) = stream.next().await {
        match event {
            Ok(obj) => queue.add(key(&obj)),
            Err(e) => warn!("watch error: {}", e),
        }
    }
}

impl<D: Driver> Inner<D> {
    fn finalizer(&self) -> String {
        format!("{}/deletion-protection", self.name)
    }

    async fn work(&self, id: usize) {
        while let Some(item) = self.queue.next().await {
            debug!("worker {} syncing {}", id, item);
            let result = match &item {
                WorkItem::Claim(key) => self.sync_claim(key).await,
                WorkItem::Scheduling(key) => self.sync_scheduling(key).await,
            };
            match result {
                Ok(()) => self.queue.forget(&item),
                Err(e) => {
                    error!("worker {} failed to sync {}: {}", id, item, e);
                    self.queue.add_rate_limited(item);
                }
            }
        }
    }

    async fn sync_claim(&self, key: &NamespacedName) -> Result<(), SyncError> {
        let claims: Api<ResourceClaim> = Api::namespaced(self.client.clone(), &key.namespace);
        let claim = match claims.get_opt(&key.name).await? {
            None => return Ok(()),
            Some(claim) => claim,
        };

        if claim.is_allocated() {
            let ours = claim
                .status
                .as_ref()
                .and_then(|s| s.driver_name.as_deref())
                == Some(self.name.as_str());
            if !ours {
                return Ok(());
            }
            let reserved = claim
                .status
                .as_ref()
                .and_then(|s| s.reserved_for.as_ref())
                .is_some_and(|r| !r.is_empty());
            if (claim.is_being_deleted() || claim.deallocation_requested()) && !reserved {
                return self.deallocate(&claims, &claim).await;
            }
            return Ok(());
        }

        if claim.is_being_deleted() {
            return self.remove_finalizer(&claims, &claim).await;
        }

        let class = match self.class_for(&claim).await? {
            None => return Ok(()),
            Some(class) => class,
        };
        if claim.spec.allocation_mode != AllocationMode::Immediate {
            // allocated once a node is selected for a consuming pod
            return Ok(());
        }

        let class_parameters = self.driver.get_class_parameters(&class).await?;
        let claim_parameters = self
            .driver
            .get_claim_parameters(&claim, &class, &class_parameters)
            .await?;
        let pending = ClaimAllocation {
            pod_claim_name: claim.name().to_string(),
            claim,
            class,
            class_parameters,
            claim_parameters,
            unsuitable_nodes: vec![],
        };
        self.allocate(&claims, &pending, "").await
    }

    async fn sync_scheduling(&self, key: &NamespacedName) -> Result<(), SyncError> {
        let schedulings: Api<PodScheduling> = Api::namespaced(self.client.clone(), &key.namespace);
        let scheduling = match schedulings.get_opt(&key.name).await? {
            None => return Ok(()),
            Some(s) => s,
        };
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), &key.namespace);
        let pod = match pods.get_opt(&key.name).await? {
            None => return Ok(()),
            Some(pod) => pod,
        };

        let mut pending = self.pending_claims(&key.namespace, &pod).await?;
        if pending.is_empty() {
            return Ok(());
        }

        if let Some(node) = scheduling.spec.selected_node.as_deref().filter(|n| !n.is_empty()) {
            let claims: Api<ResourceClaim> = Api::namespaced(self.client.clone(), &key.namespace);
            for claim in &pending {
                self.allocate(&claims, claim, node).await?;
            }
            return Ok(());
        }

        let potential_nodes = scheduling.spec.potential_nodes.clone().unwrap_or_default();
        if potential_nodes.is_empty() {
            return Ok(());
        }
        self.driver
            .unsuitable_nodes(&pod, &mut pending, &potential_nodes)
            .await?;

        let statuses: Vec<_> = pending
            .into_iter()
            .map(|c| ResourceClaimSchedulingStatus {
                name: c.pod_claim_name,
                unsuitable_nodes: Some(c.unsuitable_nodes),
            })
            .collect();
        let patch = json!({"status": {"resourceClaims": serde_json::to_value(statuses)?}});
        schedulings
            .patch_status(&key.name, &PatchParams::default(), &Patch::Merge(&patch))
            .await?;
        Ok(())
    }

    async fn class_for(&self, claim: &ResourceClaim) -> Result<Option<ResourceClass>, SyncError> {
        let classes: Api<ResourceClass> = Api::all(self.client.clone());
        let class = classes.get_opt(&claim.spec.resource_class_name).await?;
        Ok(class.filter(|c| c.driver_name == self.name))
    }

    /// Unallocated claims of this driver referenced by the pod, with their
    /// parameters resolved.
    async fn pending_claims(&self, namespace: &str, pod: &Pod) -> Result<Vec<ClaimAllocation>, SyncError> {
        let claims: Api<ResourceClaim> = Api::namespaced(self.client.clone(), namespace);
        let mut pending = vec![];

        for (pod_claim_name, claim_name) in pod_claim_names(pod) {
            let claim = match claims.get_opt(&claim_name).await? {
                None => continue,
                Some(claim) if claim.is_allocated() => continue,
                Some(claim) => claim,
            };
            let class = match self.class_for(&claim).await? {
                None => continue,
                Some(class) => class,
            };
            let class_parameters = self.driver.get_class_parameters(&class).await?;
            let claim_parameters = self
                .driver
                .get_claim_parameters(&claim, &class, &class_parameters)
                .await?;
            pending.push(ClaimAllocation {
                pod_claim_name,
                claim,
                class,
                class_parameters,
                claim_parameters,
                unsuitable_nodes: vec![],
            });
        }
        Ok(pending)
    }

    async fn allocate(
        &self,
        claims: &Api<ResourceClaim>,
        pending: &ClaimAllocation,
        selected_node: &str,
    ) -> Result<(), SyncError> {
        let claim = &pending.claim;
        self.add_finalizer(claims, claim).await?;

        let allocation = self
            .driver
            .allocate(
                claim,
                &pending.claim_parameters,
                &pending.class,
                &pending.class_parameters,
                selected_node,
            )
            .await?;

        let patch = json!({
            "status": {
                "driverName": self.name,
                "allocation": serde_json::to_value(&allocation)?,
            }
        });
        claims
            .patch_status(claim.name(), &PatchParams::default(), &Patch::Merge(&patch))
            .await?;
        info!("allocated claim {}/{}", claim.namespace(), claim.name());
        Ok(())
    }

    async fn deallocate(&self, claims: &Api<ResourceClaim>, claim: &ResourceClaim) -> Result<(), SyncError> {
        self.driver.deallocate(claim).await?;

        let patch = json!({
            "status": {
                "driverName": null,
                "allocation": null,
                "deallocationRequested": null,
            }
        });
        let claim = claims
            .patch_status(claim.name(), &PatchParams::default(), &Patch::Merge(&patch))
            .await?;
        info!("deallocated claim {}/{}", claim.namespace(), claim.name());
        self.remove_finalizer(claims, &claim).await
    }

    async fn add_finalizer(&self, claims: &Api<ResourceClaim>, claim: &ResourceClaim) -> Result<(), SyncError> {
        let finalizer = self.finalizer();
        if claim.has_finalizer(&finalizer) {
            return Ok(());
        }
        let mut finalizers = claim.metadata.finalizers.clone().unwrap_or_default();
        finalizers.push(finalizer);
        self.patch_finalizers(claims, claim, finalizers).await
    }

    async fn remove_finalizer(&self, claims: &Api<ResourceClaim>, claim: &ResourceClaim) -> Result<(), SyncError> {
        let finalizer = self.finalizer();
        if !claim.has_finalizer(&finalizer) {
            return Ok(());
        }
        let finalizers = claim
            .metadata
            .finalizers
            .iter()
            .flatten()
            .filter(|f| **f != finalizer)
            .cloned()
            .collect();
        self.patch_finalizers(claims, claim, finalizers).await
    }

    async fn patch_finalizers(
        &self,
        claims: &Api<ResourceClaim>,
        claim: &ResourceClaim,
        finalizers: Vec<String>,
    ) -> Result<(), SyncError> {
        // resourceVersion makes a concurrent update fail instead of being overwritten
        let patch = json!({
            "metadata": {
                "finalizers": finalizers,
                "resourceVersion": claim.metadata.resource_version,
            }
        });
        claims
            .patch(claim.name(), &PatchParams::default(), &Patch::Merge(&patch))
            .await?;
        Ok(())
    }
}

/// (pod claim entry name, claim object name) for each claim the pod uses.
/// Claims created from templates are only known once the pod status names them.
pub fn pod_claim_names(pod: &Pod) -> Vec<(String, String)> {
    let statuses = pod
        .status
        .as_ref()
        .and_then(|s| s.resource_claim_statuses.as_ref());

    pod.spec
        .iter()
        .flat_map(|s| s.resource_claims.iter().flatten())
        .filter_map(|pc| {
            let claim_name = match (&pc.resource_claim_name, &pc.resource_claim_template_name) {
                (Some(name), _) => Some(name.clone()),
                (None, Some(_)) => statuses
                    .and_then(|s| s.iter().find(|status| status.name == pc.name))
                    .and_then(|status| status.resource_claim_name.clone()),
                (None, None) => None,
            };
            claim_name.map(|n| (pc.name.clone(), n))
        })
        .collect()
}
