//! Mock controller helpers shared by the unit tests

use crate::config::TransportConfig;
use crate::endpoint::BaseUrl;
use crate::session::{Credentials, Session};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "secret";
pub const TOKEN: &str = "5A9C1E2F0B7D4C3A";
pub const SESSION_COOKIE: &str = "JSESSIONID=abc123";

/// Mount the login and token endpoints on `server`
pub async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/j_security_check"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "JSESSIONID=abc123; Path=/"),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/dataservice/client/token"))
        .and(header("authorization", "Basic YWRtaW46c2VjcmV0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TOKEN))
        .mount(server)
        .await;
}

/// Session established against a mock controller
pub async fn session(server: &MockServer) -> Session {
    mount_login(server).await;
    Session::establish_at(
        BaseUrl::for_test(&server.uri()),
        Credentials::new(USERNAME, PASSWORD),
        &TransportConfig::default(),
    )
    .await
    .expect("mock login")
}
