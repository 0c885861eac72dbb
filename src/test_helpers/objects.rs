use crate::spec::dra::{
    AllocationMode, AllocationResult, PodScheduling, PodSchedulingSpec, ResourceClaim,
    ResourceClaimParametersReference, ResourceClaimSpec, ResourceClaimStatus, ResourceClass,
    ResourceClassParametersReference,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

#[allow(unused)]
pub fn claim(name: &str, namespace: &str, uid: &str) -> ResourceClaim {
    ResourceClaim {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            uid: Some(uid.to_string()),
            ..Default::default()
        },
        spec: ResourceClaimSpec {
            resource_class_name: "example".to_string(),
            parameters_ref: None,
            allocation_mode: AllocationMode::WaitForFirstConsumer,
        },
        status: None,
    }
}

#[allow(unused)]
pub fn class(name: &str) -> ResourceClass {
    ResourceClass {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            ..Default::default()
        },
        driver_name: "dractrlplugin".to_string(),
        parameters_ref: None,
        suitable_nodes: None,
    }
}

#[allow(unused)]
pub fn pod_scheduling(name: &str, namespace: &str, selected_node: Option<&str>) -> PodScheduling {
    PodScheduling {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: PodSchedulingSpec {
            selected_node: selected_node.map(|n| n.to_string()),
            potential_nodes: None,
        },
        status: None,
    }
}

pub trait ClaimBuilder {
    #[allow(unused)]
    fn with_parameters(self, kind: &str, name: &str) -> Self;
    #[allow(unused)]
    fn with_mode(self, mode: AllocationMode) -> Self;
    #[allow(unused)]
    fn with_allocation(self, allocation: AllocationResult) -> Self;
}

impl ClaimBuilder for ResourceClaim {
    fn with_parameters(mut self, kind: &str, name: &str) -> Self {
        self.spec.parameters_ref = Some(ResourceClaimParametersReference {
            api_group: None,
            kind: kind.to_string(),
            name: name.to_string(),
        });
        self
    }

    fn with_mode(mut self, mode: AllocationMode) -> Self {
        self.spec.allocation_mode = mode;
        self
    }

    fn with_allocation(mut self, allocation: AllocationResult) -> Self {
        let status = self.status.get_or_insert_with(ResourceClaimStatus::default);
        status.allocation = Some(allocation);
        status.driver_name = Some("dractrlplugin".to_string());
        self
    }
}

pub trait ClassBuilder {
    #[allow(unused)]
    fn with_parameters(self, kind: &str, namespace: &str, name: &str) -> Self;
}

impl ClassBuilder for ResourceClass {
    fn with_parameters(mut self, kind: &str, namespace: &str, name: &str) -> Self {
        self.parameters_ref = Some(ResourceClassParametersReference {
            api_group: None,
            kind: kind.to_string(),
            name: name.to_string(),
            namespace: Some(namespace.to_string()),
        });
        self
    }
}
