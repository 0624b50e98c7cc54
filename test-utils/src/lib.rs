//! `test-utils` is used for testing in both `waybackscope-lib` and `waybackscope`.
//! This crate does not depend on either of them, else we would get dependency cycles.
//! Macros are used instead, so that the importer is responsible for providing the dependencies.

/// Path of the CDX endpoint on every mock archive
pub const CDX_PATH: &str = "/cdx/search/cdx";

/// Create a mock web server, which responds with a predefined status when
/// handling a matching request
#[macro_export]
macro_rules! mock_server {
    ($status:expr $(, $func:tt ($($arg:expr),*))*) => {{
        let mock_server = wiremock::MockServer::start().await;
        let response_template = wiremock::ResponseTemplate::new(http::StatusCode::from($status));
        let template = response_template$(.$func($($arg),*))*;
        wiremock::Mock::given(wiremock::matchers::method("GET")).respond_with(template).mount(&mock_server).await;
        mock_server
    }};
}

/// Create a mock archive whose CDX endpoint answers every query with `body`
///
/// Further `ResponseTemplate` methods can be chained, as with [`mock_server`].
#[macro_export]
macro_rules! mock_archive {
    ($body:expr $(, $func:tt ($($arg:expr),*))*) => {{
        let mock_server = wiremock::MockServer::start().await;
        let response_template = wiremock::ResponseTemplate::new(200).set_body_string($body);
        let template = response_template$(.$func($($arg),*))*;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path($crate::CDX_PATH))
            .respond_with(template)
            .mount(&mock_server)
            .await;
        mock_server
    }};
}

/// CDX endpoint of a mock server, ready to be passed as `--archive-url`
#[macro_export]
macro_rules! archive_endpoint {
    ($mock_server:expr) => {
        format!("{}{}", $mock_server.uri(), $crate::CDX_PATH)
    };
}

/// CDX endpoint on a local port nobody listens on
///
/// # Panic
///
/// This panics if no local port can be bound, so it should only be used for
/// testing
#[macro_export]
macro_rules! closed_port_endpoint {
    () => {{
        let listener =
            std::net::TcpListener::bind("127.0.0.1:0").expect("Expected a free local port");
        let addr = listener.local_addr().expect("Expected a bound address");
        drop(listener);
        format!("http://{addr}{}", $crate::CDX_PATH)
    }};
}

/// Gets the "main" binary name (e.g. `waybackscope`)
#[macro_export]
macro_rules! main_command {
    () => {
        Command::cargo_bin(env!("CARGO_PKG_NAME")).expect("Couldn't get cargo package name")
    };
}
