//! Request correlation middleware.
//!
//! Each incoming request runs under a fresh [`TraceId`] scope, and every
//! response carries the identifier back in the `trace-id` header so clients
//! can quote it when reporting a failure.

use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::warn;

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Middleware attaching a request-scoped [`TraceId`] and echoing it in a
/// response header.
///
/// Handlers can read the identifier via [`TraceId::current`].
///
/// # Examples
/// ```
/// use actix_web::App;
/// use wicket_backend::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Clone)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceService { inner: service }))
    }
}

/// The service [`Trace`] wraps around the inner app. Not used directly.
pub struct TraceService<S> {
    inner: S,
}

impl<S, B> Service<ServiceRequest> for TraceService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = TraceId::generate();
        // A hyphenated UUID is plain ASCII, so encoding only fails if the
        // rendering ever changes shape.
        let header = HeaderValue::from_str(&trace_id.to_string()).ok();
        let fut = self.inner.call(req);

        Box::pin(TraceId::scope(trace_id, async move {
            let mut res = fut.await?;
            if let Some(value) = header {
                res.response_mut()
                    .headers_mut()
                    .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
            } else {
                warn!(%trace_id, "trace identifier not encodable as a header");
            }
            Ok(res)
        }))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use actix_web::{App, HttpResponse, test, web};

    use super::*;
    use crate::domain::Error as DomainError;
    use crate::inbound::http::ApiResult;

    fn header_of(res: &actix_web::dev::ServiceResponse<actix_web::body::BoxBody>) -> String {
        res.headers()
            .get(TRACE_ID_HEADER)
            .expect("trace header present")
            .to_str()
            .expect("trace header is ascii")
            .to_owned()
    }

    #[actix_web::test]
    async fn every_response_carries_a_parseable_trace_header() {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/ping", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/ping").to_request()).await;
        assert!(res.status().is_success());
        let rendered = header_of(&res);
        assert!(rendered.parse::<TraceId>().is_ok(), "header should be a UUID");
    }

    #[actix_web::test]
    async fn the_header_matches_the_identifier_the_handler_saw() {
        let app = test::init_service(App::new().wrap(Trace).route(
            "/whoami",
            web::get().to(|| async {
                let id = TraceId::current().expect("trace id in scope");
                HttpResponse::Ok().body(id.to_string())
            }),
        ))
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request()).await;
        let rendered = header_of(&res);
        let body = test::read_body(res).await;
        assert_eq!(rendered.as_bytes(), body.as_ref());
    }

    #[actix_web::test]
    async fn consecutive_requests_get_distinct_identifiers() {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/ping", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let first =
            test::call_service(&app, test::TestRequest::get().uri("/ping").to_request()).await;
        let second =
            test::call_service(&app, test::TestRequest::get().uri("/ping").to_request()).await;
        assert_ne!(header_of(&first), header_of(&second));
    }

    #[actix_web::test]
    async fn error_payloads_capture_the_scoped_identifier() {
        let app = test::init_service(App::new().wrap(Trace).route(
            "/fail",
            web::get().to(|| async {
                // Error::internal captures the scoped TraceId automatically.
                ApiResult::<HttpResponse>::Err(DomainError::internal("boom"))
            }),
        ))
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/fail").to_request()).await;
        let rendered = header_of(&res);
        let body: DomainError = test::read_body_json(res).await;
        assert_eq!(body.trace_id(), Some(rendered.as_str()));
    }
}
