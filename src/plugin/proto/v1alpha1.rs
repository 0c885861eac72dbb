// @generated
// Generated from: proto/dra/v1alpha1/api.proto
// Manual check-in for offline builds.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NodePrepareResourceRequest {
    #[prost(string, tag = "1")]
    pub namespace: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub claim_uid: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub claim_name: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub resource_handle: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NodePrepareResourceResponse {
    #[prost(string, repeated, tag = "1")]
    pub cdi_devices: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NodeUnprepareResourceRequest {
    #[prost(string, tag = "1")]
    pub namespace: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub claim_uid: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub claim_name: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub resource_handle: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NodeUnprepareResourceResponse {}

pub mod node_server {
    #![allow(clippy::derive_partial_eq_without_eq)]
    use tonic::codegen::*;

    #[tonic::async_trait]
    pub trait Node: Send + Sync + 'static {
        async fn node_prepare_resource(
            &self,
            request: tonic::Request<super::NodePrepareResourceRequest>,
        ) -> Result<tonic::Response<super::NodePrepareResourceResponse>, tonic::Status>;
        async fn node_unprepare_resource(
            &self,
            request: tonic::Request<super::NodeUnprepareResourceRequest>,
        ) -> Result<tonic::Response<super::NodeUnprepareResourceResponse>, tonic::Status>;
    }

    #[derive(Debug, Clone)]
    pub struct NodeServer<T: Node> {
        inner: Arc<T>,
    }

    impl<T: Node> NodeServer<T> {
        pub fn new(inner: T) -> Self {
            Self {
                inner: Arc::new(inner),
            }
        }
    }

    impl<T: Node> Service<http::Request<tonic::body::BoxBody>> for NodeServer<T> {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = std::convert::Infallible;
        type Future = BoxFuture<Self::Response, Self::Error>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: http::Request<tonic::body::BoxBody>) -> Self::Future {
            let inner = self.inner.clone();
            match req.uri().path() {
                "/v1alpha1.Node/NodePrepareResource" => {
                    struct NodePrepareResourceSvc<T: Node>(pub Arc<T>);
                    impl<T: Node> tonic::server::UnaryService<super::NodePrepareResourceRequest>
                        for NodePrepareResourceSvc<T>
                    {
                        type Response = super::NodePrepareResourceResponse;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::NodePrepareResourceRequest>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            Box::pin(async move { inner.node_prepare_resource(request).await })
                        }
                    }
                    Box::pin(async move {
                        let method = NodePrepareResourceSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec);
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    })
                }
                "/v1alpha1.Node/NodeUnprepareResource" => {
                    struct NodeUnprepareResourceSvc<T: Node>(pub Arc<T>);
                    impl<T: Node> tonic::server::UnaryService<super::NodeUnprepareResourceRequest>
                        for NodeUnprepareResourceSvc<T>
                    {
                        type Response = super::NodeUnprepareResourceResponse;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::NodeUnprepareResourceRequest>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            Box::pin(async move { inner.node_unprepare_resource(request).await })
                        }
                    }
                    Box::pin(async move {
                        let method = NodeUnprepareResourceSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec);
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    })
                }
                _ => Box::pin(async move {
                    Ok(http::Response::builder()
                        .status(200)
                        .header("grpc-status", "12")
                        .header("content-type", "application/grpc")
                        .body(tonic::body::empty_body())
                        .unwrap())
                }),
            }
        }
    }

    impl<T: Node> tonic::server::NamedService for NodeServer<T> {
        const NAME: &'static str = "v1alpha1.Node";
    }
}
