use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::JwtKeys;
use crate::db::DbStatus;
use crate::error::AppError;
use crate::models::Role;

/// Short-circuits the request with the error's JSON envelope. Rejections
/// are converted into responses here rather than returned as service
/// errors, so callers driving the app directly (e.g. `test::call_service`)
/// observe the same status and body the wire does.
fn reject<B>(req: ServiceRequest, err: AppError) -> ServiceResponse<EitherBody<B>> {
    let res = err.error_response().map_into_right_body::<B>();
    req.into_response(res)
}

/// Bearer-token middleware: requires an `Authorization: Bearer <token>`
/// header, verifies it against the configured [`JwtKeys`], and injects the
/// decoded claims into request extensions for downstream handlers.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let keys = match req.app_data::<web::Data<JwtKeys>>() {
            Some(keys) => keys.clone(),
            None => {
                let res = reject(req, AppError::Internal("JwtKeys not configured".into()));
                return Box::pin(ready(Ok(res)));
            }
        };

        // Owned verification result so the request can be consumed below.
        let verified = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| keys.verify(token));

        match verified {
            Some(Ok(claims)) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            Some(Err(app_err)) => Box::pin(ready(Ok(reject(req, app_err)))),
            None => {
                let app_err = AppError::Unauthorized("Authorization token missing".into());
                Box::pin(ready(Ok(reject(req, app_err))))
            }
        }
    }
}

/// Route-level role gate. Wrapped on individual routes after
/// [`AuthMiddleware`] has injected claims; answers 403 when the caller's
/// role differs from the required one.
pub struct RequireRole(pub Role);

impl RequireRole {
    pub fn admin() -> Self {
        RequireRole(Role::Admin)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RequireRoleService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleService {
            service,
            role: self.0,
        }))
    }
}

pub struct RequireRoleService<S> {
    service: S,
    role: Role,
}

impl<S, B> Service<ServiceRequest> for RequireRoleService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let caller_role = req
            .extensions()
            .get::<crate::auth::token::Claims>()
            .map(|claims| claims.role);

        match caller_role {
            Some(role) if role == self.role => {
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            Some(_) => {
                let app_err = AppError::Forbidden("Forbidden".into());
                Box::pin(ready(Ok(reject(req, app_err))))
            }
            // Claims absent means AuthMiddleware did not run first.
            None => {
                let app_err = AppError::Unauthorized("Authorization token missing".into());
                Box::pin(ready(Ok(reject(req, app_err))))
            }
        }
    }
}

/// Database-readiness gate. Answers 503 until the startup retry loop has
/// established the first connection, so early requests fail fast instead of
/// hanging on an unreachable pool.
pub struct DbGate;

impl<S, B> Transform<S, ServiceRequest> for DbGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = DbGateService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(DbGateService { service }))
    }
}

pub struct DbGateService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for DbGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let connected = req
            .app_data::<web::Data<DbStatus>>()
            .map(|status| status.is_connected())
            .unwrap_or(false);

        if connected {
            let fut = self.service.call(req);
            Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
        } else {
            let app_err = AppError::ServiceUnavailable("Database not ready".into());
            Box::pin(ready(Ok(reject(req, app_err))))
        }
    }
}
