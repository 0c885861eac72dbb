//! Object model for the `resource.k8s.io/v1alpha1` API group.
//!
//! k8s-openapi no longer ships this API version, so the types are declared
//! here with the same wire shape. Implementing [`Resource`] and [`Metadata`]
//! is enough for `kube::Api` to work with them.
use k8s_openapi::api::core::v1::NodeSelector;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::{ClusterResourceScope, Metadata, NamespaceResourceScope, Resource};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

pub const GROUP: &str = "resource.k8s.io";
pub const VERSION: &str = "v1alpha1";
pub const API_VERSION: &str = "resource.k8s.io/v1alpha1";

macro_rules! dra_resource {
    ($ty:ty, $kind:literal, $plural:literal, $scope:ty) => {
        impl Resource for $ty {
            const API_VERSION: &'static str = API_VERSION;
            const GROUP: &'static str = GROUP;
            const KIND: &'static str = $kind;
            const VERSION: &'static str = VERSION;
            const URL_PATH_SEGMENT: &'static str = $plural;
            type Scope = $scope;
        }

        impl Metadata for $ty {
            type Ty = ObjectMeta;

            fn metadata(&self) -> &<Self as Metadata>::Ty {
                &self.metadata
            }

            fn metadata_mut(&mut self) -> &mut <Self as Metadata>::Ty {
                &mut self.metadata
            }
        }
    };
}

/// A category of resource handled by one driver. Cluster scoped.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceClass {
    #[serde(default)]
    pub metadata: ObjectMeta,
    pub driver_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters_ref: Option<ResourceClassParametersReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suitable_nodes: Option<NodeSelector>,
}

dra_resource!(ResourceClass, "ResourceClass", "resourceclasses", ClusterResourceScope);

/// Class parameter references carry their own namespace.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceClassParametersReference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_group: Option<String>,
    pub kind: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceClaim {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: ResourceClaimSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ResourceClaimStatus>,
}

dra_resource!(ResourceClaim, "ResourceClaim", "resourceclaims", NamespaceResourceScope);

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceClaimSpec {
    pub resource_class_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters_ref: Option<ResourceClaimParametersReference>,
    #[serde(default)]
    pub allocation_mode: AllocationMode,
}

/// Claim parameter references always live in the claim's namespace.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceClaimParametersReference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_group: Option<String>,
    pub kind: String,
    pub name: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString, Deserialize, Serialize)]
pub enum AllocationMode {
    #[default]
    WaitForFirstConsumer,
    Immediate,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceClaimStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocation: Option<AllocationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_for: Option<Vec<ResourceClaimConsumerReference>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deallocation_requested: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceClaimConsumerReference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_group: Option<String>,
    pub resource: String,
    pub name: String,
    pub uid: String,
}

/// What a driver hands back for a claim. Written verbatim into the claim
/// status by the controller loop.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_on_nodes: Option<NodeSelector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shareable: Option<bool>,
}

/// Negotiation object between the scheduler and drivers for one pod.
/// Shares its name with the pod.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodScheduling {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: PodSchedulingSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PodSchedulingStatus>,
}

dra_resource!(PodScheduling, "PodScheduling", "podschedulings", NamespaceResourceScope);

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSchedulingSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_node: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub potential_nodes: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSchedulingStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_claims: Option<Vec<ResourceClaimSchedulingStatus>>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceClaimSchedulingStatus {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unsuitable_nodes: Option<Vec<String>>,
}

impl ResourceClaim {
    pub fn uid(&self) -> &str {
        self.metadata.uid.as_deref().unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    pub fn namespace(&self) -> &str {
        self.metadata.namespace.as_deref().unwrap_or("default")
    }

    pub fn allocation(&self) -> Option<&AllocationResult> {
        self.status.as_ref().and_then(|s| s.allocation.as_ref())
    }

    pub fn is_allocated(&self) -> bool {
        self.allocation().is_some()
    }

    pub fn deallocation_requested(&self) -> bool {
        self.status
            .as_ref()
            .and_then(|s| s.deallocation_requested)
            .unwrap_or(false)
    }

    pub fn is_being_deleted(&self) -> bool {
        self.metadata.deletion_timestamp.is_some()
    }

    pub fn has_finalizer(&self, finalizer: &str) -> bool {
        self.metadata
            .finalizers
            .as_ref()
            .is_some_and(|f| f.iter().any(|existing| existing == finalizer))
    }
}

impl ResourceClass {
    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }
}
