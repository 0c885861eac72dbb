use crate::controller::allocator::Allocator;
use crate::params::{
    resolve_parameters, ParameterData, ParameterError, ParameterLookup, ParameterReference,
    ParameterScope,
};
use crate::spec::dra::{AllocationResult, ResourceClaim, ResourceClass};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use log::{error, info};

#[derive(thiserror::Error, Debug)]
pub enum DriverError {
    #[error("{0}")]
    Parameters(#[from] ParameterError),
    #[error("failed to encode resource handle: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A pending claim of a pod, handed to [`Driver::unsuitable_nodes`].
#[derive(Debug, Clone)]
pub struct ClaimAllocation {
    /// Name of the claim entry in the pod spec.
    pub pod_claim_name: String,
    pub claim: ResourceClaim,
    pub class: ResourceClass,
    pub class_parameters: ParameterData,
    pub claim_parameters: ParameterData,
    /// Filled in by the driver.
    pub unsuitable_nodes: Vec<String>,
}

/// Callbacks the controller loop invokes for claims of this driver.
#[async_trait]
pub trait Driver: Send + Sync {
    async fn get_class_parameters(&self, class: &ResourceClass) -> Result<ParameterData, DriverError>;

    async fn get_claim_parameters(
        &self,
        claim: &ResourceClaim,
        class: &ResourceClass,
        class_parameters: &ParameterData,
    ) -> Result<ParameterData, DriverError>;

    /// `selected_node` is empty for immediate allocation.
    async fn allocate(
        &self,
        claim: &ResourceClaim,
        claim_parameters: &ParameterData,
        class: &ResourceClass,
        class_parameters: &ParameterData,
        selected_node: &str,
    ) -> Result<AllocationResult, DriverError>;

    async fn deallocate(&self, claim: &ResourceClaim) -> Result<(), DriverError>;

    async fn unsuitable_nodes(
        &self,
        pod: &Pod,
        claims: &mut [ClaimAllocation],
        potential_nodes: &[String],
    ) -> Result<(), DriverError>;
}

pub struct DraDriver<L: ParameterLookup> {
    name: String,
    lookup: L,
    allocator: Allocator,
}

impl<L: ParameterLookup> DraDriver<L> {
    pub fn new(name: &str, lookup: L) -> Self {
        info!("new driver {}", name);
        DraDriver {
            name: name.to_string(),
            lookup,
            allocator: Allocator::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn allocator(&self) -> &Allocator {
        &self.allocator
    }
}

#[async_trait]
impl<L: ParameterLookup> Driver for DraDriver<L> {
    async fn get_class_parameters(&self, class: &ResourceClass) -> Result<ParameterData, DriverError> {
        info!("get class parameters for {}", class.name());
        let reference = ParameterReference::for_class(class);
        let data = resolve_parameters(&self.lookup, ParameterScope::Class, reference.as_ref())
            .await
            .map_err(|e| {
                error!("failed to get parameters for class {}: {}", class.name(), e);
                e
            })?;
        info!("class {} parameters: {:?}", class.name(), data);
        Ok(data)
    }

    async fn get_claim_parameters(
        &self,
        claim: &ResourceClaim,
        _class: &ResourceClass,
        _class_parameters: &ParameterData,
    ) -> Result<ParameterData, DriverError> {
        info!("get claim parameters for {}/{}", claim.namespace(), claim.name());
        let reference = ParameterReference::for_claim(claim);
        let data = resolve_parameters(&self.lookup, ParameterScope::Claim, reference.as_ref())
            .await
            .map_err(|e| {
                error!(
                    "failed to get parameters for claim {}/{}: {}",
                    claim.namespace(),
                    claim.name(),
                    e
                );
                e
            })?;
        info!("claim {}/{} parameters: {:?}", claim.namespace(), claim.name(), data);
        Ok(data)
    }

    async fn allocate(
        &self,
        claim: &ResourceClaim,
        claim_parameters: &ParameterData,
        _class: &ResourceClass,
        class_parameters: &ParameterData,
        selected_node: &str,
    ) -> Result<AllocationResult, DriverError> {
        self.allocator
            .decide(claim, class_parameters, claim_parameters, selected_node)
    }

    // Bindings are kept: a claim allocated again lands on the node it had.
    async fn deallocate(&self, claim: &ResourceClaim) -> Result<(), DriverError> {
        info!("deallocate claim {}/{}", claim.namespace(), claim.name());
        Ok(())
    }

    async fn unsuitable_nodes(
        &self,
        pod: &Pod,
        claims: &mut [ClaimAllocation],
        potential_nodes: &[String],
    ) -> Result<(), DriverError> {
        info!(
            "unsuitable nodes for pod {}: {} claims, {} potential nodes",
            pod.metadata.name.as_deref().unwrap_or_default(),
            claims.len(),
            potential_nodes.len()
        );
        Ok(())
    }
}
