//! Route table for the HTTP API.
//!
//! Each endpoint is one [`RouteEntry`] naming its method, path, access level
//! and handler. [`configure`] groups entries by path into Actix resources,
//! wraps each resource in a [`BearerGate`] for its bearer-only methods, and
//! answers any other verb on a known path with 405.

use actix_web::http::Method;
use actix_web::{Route, web};

use crate::domain::Error;

use super::auth::BearerGate;
use super::validation::json_config;
use super::{organisations, users};

/// Who may call a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Bearer,
}

/// One endpoint.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub method: Method,
    pub path: &'static str,
    pub access: Access,
    /// Attaches the handler to a method-guarded route.
    pub handler: fn(Route) -> Route,
}

/// Every API endpoint.
pub fn route_table() -> Vec<RouteEntry> {
    vec![
        RouteEntry {
            method: Method::POST,
            path: "/auth/register",
            access: Access::Public,
            handler: |route| route.to(users::register),
        },
        RouteEntry {
            method: Method::POST,
            path: "/auth/login",
            access: Access::Public,
            handler: |route| route.to(users::login),
        },
        RouteEntry {
            method: Method::GET,
            path: "/api/users/{id}",
            access: Access::Bearer,
            handler: |route| route.to(users::get_user),
        },
        RouteEntry {
            method: Method::GET,
            path: "/api/organisations",
            access: Access::Bearer,
            handler: |route| route.to(organisations::list_organisations),
        },
        RouteEntry {
            method: Method::POST,
            path: "/api/organisations",
            access: Access::Bearer,
            handler: |route| route.to(organisations::create_organisation),
        },
        RouteEntry {
            method: Method::GET,
            path: "/api/organisations/{org_id}",
            access: Access::Public,
            handler: |route| route.to(organisations::get_organisation),
        },
        RouteEntry {
            method: Method::POST,
            path: "/api/organisations/{org_id}/users",
            access: Access::Bearer,
            handler: |route| route.to(organisations::add_user),
        },
    ]
}

async fn method_not_allowed() -> Result<web::Json<()>, Error> {
    Err(Error::method_not_allowed("Method not allowed"))
}

async fn resource_not_found() -> Result<web::Json<()>, Error> {
    Err(Error::not_found("Resource not found"))
}

/// Paths in first-seen order, each with its entries.
fn group_by_path(entries: Vec<RouteEntry>) -> Vec<(&'static str, Vec<RouteEntry>)> {
    let mut groups: Vec<(&'static str, Vec<RouteEntry>)> = Vec::new();
    for entry in entries {
        match groups.iter_mut().find(|(path, _)| *path == entry.path) {
            Some((_, group)) => group.push(entry),
            None => groups.push((entry.path, vec![entry])),
        }
    }
    groups
}

/// Register the route table on an Actix app or scope.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use tenancy::inbound::http::routes::configure;
///
/// let app = App::new().configure(configure);
/// # let _ = app;
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config());
    for (path, entries) in group_by_path(route_table()) {
        let guarded = entries
            .iter()
            .filter(|entry| entry.access == Access::Bearer)
            .map(|entry| entry.method.clone());
        let gate = BearerGate::new(guarded);
        let resource = entries
            .iter()
            .fold(web::resource(path), |resource, entry| {
                resource.route((entry.handler)(web::method(entry.method.clone())))
            })
            .default_service(web::to(method_not_allowed))
            .wrap(gate);
        cfg.service(resource);
    }
    cfg.default_service(web::to(resource_not_found));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::test_state;
    use actix_web::http::StatusCode;
    use actix_web::App;
    use actix_web::test::{self};
    use rstest::rstest;
    use serde_json::Value;
    use std::collections::HashSet;

    fn has_duplicate_method<'a>(methods: impl IntoIterator<Item = &'a Method>) -> bool {
        let mut seen = HashSet::new();
        methods.into_iter().any(|method| !seen.insert(method))
    }

    #[rstest]
    #[case(&[Method::GET, Method::POST], false)]
    #[case(&[Method::GET, Method::GET], true)]
    #[case(&[Method::GET, Method::POST, Method::GET], true)]
    fn duplicate_methods_are_detected_anywhere(
        #[case] methods: &[Method],
        #[case] expected: bool,
    ) {
        assert_eq!(has_duplicate_method(methods), expected);
    }

    #[rstest]
    fn every_path_has_a_single_access_level_per_method() {
        for (path, entries) in group_by_path(route_table()) {
            assert!(
                !has_duplicate_method(entries.iter().map(|entry| &entry.method)),
                "duplicate method on {path}"
            );
        }
    }

    #[rstest]
    fn only_register_login_and_fetch_are_public() {
        let public: Vec<_> = route_table()
            .into_iter()
            .filter(|entry| entry.access == Access::Public)
            .map(|entry| (entry.method, entry.path))
            .collect();
        assert_eq!(
            public,
            vec![
                (Method::POST, "/auth/register"),
                (Method::POST, "/auth/login"),
                (Method::GET, "/api/organisations/{org_id}"),
            ]
        );
    }

    async fn status_and_body(method: Method, uri: &str) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .configure(configure),
        )
        .await;
        let req = test::TestRequest::default()
            .method(method)
            .uri(uri)
            .to_request();
        let res = test::call_service(&app, req).await;
        let status = res.status();
        (status, test::read_body_json(res).await)
    }

    #[rstest]
    #[case(Method::GET, "/auth/login")]
    #[case(Method::DELETE, "/api/organisations")]
    #[case(Method::PUT, "/api/users/00000000-0000-0000-0000-000000000000")]
    #[actix_web::test]
    async fn unsupported_verbs_are_method_not_allowed(#[case] method: Method, #[case] uri: &str) {
        let (status, body) = status_and_body(method, uri).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["status"], "Method not allowed");
        assert_eq!(body["statusCode"], 405);
    }

    #[actix_web::test]
    async fn unknown_paths_are_not_found() {
        let (status, body) = status_and_body(Method::GET, "/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "Not found");
    }
}
