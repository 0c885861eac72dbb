use crate::plugin::proto::v1alpha1::node_server::Node;
use crate::plugin::proto::v1alpha1::{
    NodePrepareResourceRequest, NodePrepareResourceResponse, NodeUnprepareResourceRequest,
    NodeUnprepareResourceResponse,
};
use async_trait::async_trait;
use log::info;
use tonic::{Request, Response, Status};

/// Node side of the driver. Claims need no node-local setup, so both calls
/// succeed without side effects.
#[derive(Clone)]
pub struct NodeAgent {
    name: String,
}

impl NodeAgent {
    pub fn new(name: &str) -> Self {
        NodeAgent {
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl Node for NodeAgent {
    async fn node_prepare_resource(
        &self,
        request: Request<NodePrepareResourceRequest>,
    ) -> Result<Response<NodePrepareResourceResponse>, Status> {
        let req = request.get_ref();
        info!(
            "{}: prepare claim {}/{} (uid {})",
            self.name, req.namespace, req.claim_name, req.claim_uid
        );
        Ok(Response::new(NodePrepareResourceResponse::default()))
    }

    async fn node_unprepare_resource(
        &self,
        request: Request<NodeUnprepareResourceRequest>,
    ) -> Result<Response<NodeUnprepareResourceResponse>, Status> {
        let req = request.get_ref();
        info!(
            "{}: unprepare claim {}/{} (uid {})",
            self.name, req.namespace, req.claim_name, req.claim_uid
        );
        Ok(Response::new(NodeUnprepareResourceResponse::default()))
    }
}
