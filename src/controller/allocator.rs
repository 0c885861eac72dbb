use crate::controller::driver::DriverError;
use crate::params::{merge, ParameterData};
use crate::spec::dra::{AllocationResult, ResourceClaim};
use crate::spec::node_helpers::hostname_selector;
use crate::state::state::{AllocationState, Binding};
use log::{error, info};

/// Decides where a claim lives and builds its allocation result.
///
/// An empty selected node is an immediate allocation: nothing is recorded
/// and the result pins no node unless an earlier deferred allocation
/// already bound the claim. A selected node is a deferred allocation and
/// binds the claim to it, unless it is bound already, in which case the
/// recorded node wins.
#[derive(Debug, Default)]
pub struct Allocator {
    state: AllocationState,
}

impl Allocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AllocationState {
        &self.state
    }

    pub fn decide(
        &self,
        claim: &ResourceClaim,
        class_parameters: &ParameterData,
        claim_parameters: &ParameterData,
        selected_node: &str,
    ) -> Result<AllocationResult, DriverError> {
        let immediate = selected_node.is_empty();
        info!(
            "allocate claim {}/{} (uid {}), selected node {:?}, immediate {}",
            claim.namespace(),
            claim.name(),
            claim.uid(),
            selected_node,
            immediate
        );

        let env = merge(class_parameters, claim_parameters);
        let handle = serde_json::to_string(&env).map_err(|e| {
            error!("failed to encode parameters for claim {}/{}: {}", claim.namespace(), claim.name(), e);
            DriverError::Serialization(e)
        })?;
        info!("resource handle for claim {}: {}", claim.uid(), handle);

        let node = match immediate {
            true => self.state.lookup(claim.uid()),
            false => match self.state.bind_if_absent(claim.uid(), selected_node) {
                Binding::Created(node) => {
                    info!("bound claim {} to node {}", claim.uid(), node);
                    Some(node)
                }
                Binding::Existing(node) => Some(node),
            },
        };
        info!("claim {} available on nodes {:?}", claim.uid(), node.as_slice());

        Ok(AllocationResult {
            resource_handle: Some(handle),
            available_on_nodes: Some(hostname_selector(node.as_deref())),
            shareable: Some(false),
        })
    }
}
