//! Request tracing middleware
//!
//! 为每个请求生成 UUID 作为 request id，注入 tracing span 并写回 `X-Request-ID` 响应头，
//! 请求结束后记录状态码与耗时。

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::time::Instant;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::api::constants::REQUEST_ID_HEADER;

/// 请求 ID 类型，可从 request extensions 中提取
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Request tracing 中间件工厂
#[derive(Clone, Default)]
pub struct RequestTracing;

impl<S, B> Transform<S, ServiceRequest> for RequestTracing
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestTracingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTracingService {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestTracingService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestTracingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let start = Instant::now();

        let request_id = Uuid::new_v4().to_string();
        req.extensions_mut().insert(RequestId(request_id.clone()));

        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %req.method(),
            path = %req.path(),
        );

        Box::pin(
            async move {
                let result = srv.call(req).await;
                let elapsed = start.elapsed();

                match result {
                    Ok(mut response) => {
                        let status = response.status();
                        if status.is_server_error() {
                            warn!("Completed {} in {:?}", status.as_u16(), elapsed);
                        } else {
                            info!("Completed {} in {:?}", status.as_u16(), elapsed);
                        }

                        if let Ok(header_value) = HeaderValue::from_str(&request_id) {
                            response.headers_mut().insert(
                                HeaderName::from_static(REQUEST_ID_HEADER),
                                header_value,
                            );
                        }
                        Ok(response)
                    }
                    Err(e) => {
                        warn!("Failed after {:?}: {}", elapsed, e);
                        Err(e)
                    }
                }
            }
            .instrument(span),
        )
    }
}
