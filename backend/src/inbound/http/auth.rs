//! Bearer-token authentication for HTTP routes.
//!
//! [`BearerGate`] wraps each resource and enforces a valid token for the
//! methods the route table marks as [`Access::Bearer`](super::routes::Access).
//! The verified user id is stored in request extensions, where the
//! [`AuthenticatedUser`] extractor picks it up.

use std::collections::HashSet;
use std::future::{Ready, ready};
use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::Method;
use actix_web::{FromRequest, HttpMessage as _, HttpRequest, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::ports::TokenError;
use crate::domain::{Error, UserId};

use super::state::HttpState;

pub const MISSING_TOKEN: &str = "Authentication credentials were not provided";
pub const INVALID_TOKEN: &str = "Invalid access token";
pub const EXPIRED_TOKEN: &str = "Access token has expired";

/// Identity of the caller, established by [`BearerGate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

impl AuthenticatedUser {
    pub fn id(&self) -> UserId {
        self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<UserId>().copied();
        ready(user.map(Self).ok_or_else(|| Error::unauthorized(MISSING_TOKEN)))
    }
}

async fn verify_bearer(req: &ServiceRequest) -> Result<UserId, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not registered"))?;
    let bearer = BearerAuth::from_request(req.request(), &mut Payload::None)
        .await
        .map_err(|_| Error::unauthorized(MISSING_TOKEN))?;

    state.tokens.verify(bearer.token()).map_err(|err| {
        debug!(error = %err, "bearer token rejected");
        match err {
            TokenError::Expired => Error::unauthorized(EXPIRED_TOKEN),
            _ => Error::unauthorized(INVALID_TOKEN),
        }
    })
}

/// Resource middleware requiring a bearer token for selected methods.
///
/// # Examples
/// ```
/// use actix_web::{http::Method, web};
/// use tenancy::inbound::http::auth::BearerGate;
///
/// let resource = web::resource("/api/organisations")
///     .wrap(BearerGate::new([Method::GET, Method::POST]));
/// # let _ = resource;
/// ```
#[derive(Debug, Clone)]
pub struct BearerGate {
    methods: Rc<HashSet<Method>>,
}

impl BearerGate {
    pub fn new(methods: impl IntoIterator<Item = Method>) -> Self {
        Self {
            methods: Rc::new(methods.into_iter().collect()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BearerGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerGateMiddleware {
            service: Rc::new(service),
            methods: Rc::clone(&self.methods),
        }))
    }
}

/// Service wrapper produced by [`BearerGate`].
pub struct BearerGateMiddleware<S> {
    service: Rc<S>,
    methods: Rc<HashSet<Method>>,
}

impl<S, B> Service<ServiceRequest> for BearerGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let guarded = self.methods.contains(req.method());
        // Verification runs inside the returned future so errors capture the
        // request trace id.
        Box::pin(async move {
            if guarded {
                match verify_bearer(&req).await {
                    Ok(user) => {
                        req.extensions_mut().insert(user);
                    }
                    Err(err) => return Ok(req.error_response(err).map_into_right_body()),
                }
            }
            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::TokenService as _;
    use crate::inbound::http::test_utils::{test_state, test_tokens};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test};
    use rstest::rstest;
    use serde_json::Value;

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(user.id().to_string())
    }

    async fn call(method: Method, header: Option<String>) -> (StatusCode, Value, String) {
        let app = test::init_service(
            App::new().app_data(web::Data::new(test_state())).service(
                web::resource("/me")
                    .route(web::get().to(whoami))
                    .route(web::post().to(|| async { HttpResponse::Ok().body("open") }))
                    .wrap(BearerGate::new([Method::GET])),
            ),
        )
        .await;
        let mut req = test::TestRequest::default().method(method).uri("/me");
        if let Some(value) = header {
            req = req.insert_header(("Authorization", value));
        }
        let res = test::call_service(&app, req.to_request()).await;
        let status = res.status();
        let bytes = test::read_body(res).await;
        let text = String::from_utf8(bytes.to_vec()).expect("utf8");
        let json = serde_json::from_str(&text).unwrap_or(Value::Null);
        (status, json, text)
    }

    #[actix_web::test]
    async fn valid_token_reaches_handler() {
        let user = UserId::random();
        let token = test_tokens().issue(&user).expect("token");

        let (status, _, body) =
            call(Method::GET, Some(format!("Bearer {}", token.as_str()))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, user.to_string());
    }

    #[rstest]
    #[case(None, MISSING_TOKEN)]
    #[case(Some("Basic dXNlcjpwdw==".to_owned()), MISSING_TOKEN)]
    #[case(Some("Bearer not-a-jwt".to_owned()), INVALID_TOKEN)]
    #[actix_web::test]
    async fn bad_credentials_are_unauthorised(
        #[case] header: Option<String>,
        #[case] message: &str,
    ) {
        let (status, body, _) = call(Method::GET, header).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], message);
        assert_eq!(body["statusCode"], 401);
    }

    #[actix_web::test]
    async fn unguarded_methods_pass_without_token() {
        let (status, _, body) = call(Method::POST, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "open");
    }
}
