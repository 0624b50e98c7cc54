#[cfg(test)]
mod cli {
    use std::{error::Error, fs};

    use assert_cmd::Command;
    use http::StatusCode;
    use predicates::{
        prelude::PredicateBooleanExt,
        str::{contains, is_empty},
    };
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;
    use test_utils::{
        archive_endpoint, closed_port_endpoint, main_command, mock_archive, mock_server,
    };
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, query_param},
    };

    type Result<T> = std::result::Result<T, Box<dyn Error>>;

    /// Mount an archive response for a single `url=` pattern
    async fn mount_pattern(mock_server: &MockServer, pattern: &str, body: &str, expect: u64) {
        Mock::given(method("GET"))
            .and(query_param("url", pattern))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(expect)
            .mount(mock_server)
            .await;
    }

    /// A mock archive that must not receive any request
    async fn unused_archive() -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;
        mock_server
    }

    #[tokio::test]
    async fn test_silent_prints_only_urls() -> Result<()> {
        let mock_server = mock_archive!("http://a.com/1\nhttp://a.com/2\n");

        let output = main_command!()
            .args(["-s", "-d", "a.com", "--archive-url"])
            .arg(archive_endpoint!(mock_server))
            .output()?;

        assert!(output.status.success());
        assert_eq!(
            String::from_utf8(output.stdout)?,
            "http://a.com/1\nhttp://a.com/2\n"
        );
        assert!(output.stderr.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_banner_and_summary() {
        let mock_server = mock_archive!("http://a.com/\n");

        main_command!()
            .args(["-u", "a.com", "--archive-url"])
            .arg(archive_endpoint!(mock_server))
            .assert()
            .success()
            .stdout(contains("WaybackScope URL Collector"))
            .stdout(contains("Legal disclaimer"))
            .stdout(contains("http://a.com/\n"))
            .stdout(contains("Time taken: 0 Minute"))
            .stdout(contains("Timeout Errors: 0"))
            .stdout(contains("Other Errors:   0"));
    }

    #[tokio::test]
    async fn test_piped_input_takes_precedence() {
        let mock_server = MockServer::start().await;
        mount_pattern(&mock_server, "piped.com/*", "http://piped.com/x\n", 1).await;
        mount_pattern(&mock_server, "other.com/*", "http://other.com/y\n", 1).await;
        mount_pattern(&mock_server, "*.flag.com/*", "http://flag.com/z\n", 0).await;

        main_command!()
            .args(["-s", "-d", "flag.com", "--archive-url"])
            .arg(archive_endpoint!(mock_server))
            .write_stdin("https://piped.com/\n\nother.com\n")
            .assert()
            .success()
            .stdout(contains("http://piped.com/x"))
            .stdout(contains("http://other.com/y"))
            .stdout(contains("flag.com").not());
    }

    #[tokio::test]
    async fn test_empty_pipe_falls_back_to_flags() {
        let mock_server = MockServer::start().await;
        mount_pattern(&mock_server, "*.flag.com/*", "http://flag.com/z\n", 1).await;

        main_command!()
            .args(["-s", "-d", "flag.com", "--archive-url"])
            .arg(archive_endpoint!(mock_server))
            .write_stdin("\n   \n")
            .assert()
            .success()
            .stdout("http://flag.com/z\n");
    }

    #[tokio::test]
    async fn test_domain_list() -> Result<()> {
        let mock_server = MockServer::start().await;
        mount_pattern(&mock_server, "*.example.com/*", "http://example.com/a\n", 1).await;
        mount_pattern(&mock_server, "*.other.com/*", "http://other.com/b\n", 1).await;
        mount_pattern(&mock_server, "*.single.com/*", "", 0).await;

        let dir = tempdir()?;
        let list = dir.path().join("domains.txt");
        fs::write(&list, "example.com\n# comment\n\nhttps://other.com/\n")?;

        let output = main_command!()
            .args(["-s", "-d", "single.com", "--dl"])
            .arg(&list)
            .arg("--archive-url")
            .arg(archive_endpoint!(mock_server))
            .output()?;

        assert!(output.status.success());
        let mut lines: Vec<String> = String::from_utf8(output.stdout)?
            .lines()
            .map(String::from)
            .collect();
        lines.sort();
        assert_eq!(lines, vec!["http://example.com/a", "http://other.com/b"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_domain_list_is_fatal() {
        let mock_server = unused_archive().await;
        let dir = tempdir().unwrap();

        main_command!()
            .args(["-d", "a.com", "-l"])
            .arg(dir.path().join("missing.txt"))
            .arg("--archive-url")
            .arg(archive_endpoint!(mock_server))
            .assert()
            .success()
            .stdout(contains("Cannot read domain list"))
            .stdout(contains("Time taken").not());
    }

    #[tokio::test]
    async fn test_missing_domain_list_silent() {
        let mock_server = unused_archive().await;
        let dir = tempdir().unwrap();

        main_command!()
            .arg("-s")
            .arg("-l")
            .arg(dir.path().join("missing.txt"))
            .arg("--archive-url")
            .arg(archive_endpoint!(mock_server))
            .assert()
            .success()
            .stdout(is_empty());
    }

    #[tokio::test]
    async fn test_no_targets_prints_usage() {
        let mock_server = unused_archive().await;

        main_command!()
            .arg("--archive-url")
            .arg(archive_endpoint!(mock_server))
            .assert()
            .success()
            .stdout(contains("Usage:"))
            .stdout(contains("--domain-list"));
    }

    #[test]
    fn test_no_targets_silent() {
        main_command!()
            .args(["-s", "-d", "  "])
            .assert()
            .success()
            .stdout(is_empty());
    }

    #[tokio::test]
    async fn test_output_file() -> Result<()> {
        let mock_server = mock_archive!("http://a.com/1\nhttp://a.com/2\nhttp://a.com/3");
        let dir = tempdir()?;
        let output = dir.path().join("result.txt");

        main_command!()
            .args(["-d", "a.com", "-o"])
            .arg(&output)
            .arg("--archive-url")
            .arg(archive_endpoint!(mock_server))
            .assert()
            .success()
            .stdout(contains(format!(
                "[+] Saved 3 URLs to {}",
                output.display()
            )));

        assert_eq!(
            fs::read_to_string(&output)?,
            "http://a.com/1\nhttp://a.com/2\nhttp://a.com/3\n"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_output_file_silent() -> Result<()> {
        let mock_server = mock_archive!("http://a.com/1\n");
        let dir = tempdir()?;
        let output = dir.path().join("result.txt");

        main_command!()
            .args(["-s", "-d", "a.com", "-o"])
            .arg(&output)
            .arg("--archive-url")
            .arg(archive_endpoint!(mock_server))
            .assert()
            .success()
            .stdout("http://a.com/1\n");

        assert_eq!(fs::read_to_string(&output)?, "http://a.com/1\n");
        Ok(())
    }

    #[tokio::test]
    async fn test_uncreatable_output_file() {
        let mock_server = unused_archive().await;
        let dir = tempdir().unwrap();

        main_command!()
            .args(["-d", "a.com", "-o"])
            .arg(dir.path().join("no-such-dir").join("result.txt"))
            .arg("--archive-url")
            .arg(archive_endpoint!(mock_server))
            .assert()
            .success()
            .stdout(contains("Cannot create output file"));
    }

    #[tokio::test]
    async fn test_uncreatable_output_file_silent() {
        let mock_server = unused_archive().await;
        let dir = tempdir().unwrap();

        main_command!()
            .args(["-s", "-d", "a.com", "-o"])
            .arg(dir.path().join("no-such-dir").join("result.txt"))
            .arg("--archive-url")
            .arg(archive_endpoint!(mock_server))
            .assert()
            .success()
            .stdout(is_empty());
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_failing_output_file_keeps_console_and_summary() -> Result<()> {
        let body: String = (0..2000).map(|i| format!("http://a.com/{i}\n")).collect();
        let mock_server = mock_archive!(body);

        let output = main_command!()
            .args(["-d", "a.com", "-o", "/dev/full", "--archive-url"])
            .arg(archive_endpoint!(mock_server))
            .output()?;

        assert!(output.status.success());
        let stdout = String::from_utf8(output.stdout)?;
        let urls = stdout
            .lines()
            .filter(|line| line.starts_with("http://a.com/"))
            .count();
        assert_eq!(urls, 2000);
        assert!(stdout.contains("Time taken:"));
        assert!(stdout.contains("Other Errors:   0"));
        assert!(!stdout.contains("[+] Saved"));
        assert!(String::from_utf8(output.stderr)?.contains("Cannot write to output file"));
        Ok(())
    }

    #[tokio::test]
    async fn test_error_status_body_is_streamed() {
        let mock_server = mock_server!(
            StatusCode::SERVICE_UNAVAILABLE,
            set_body_string("Service Unavailable")
        );

        main_command!()
            .args(["-u", "a.com", "--archive-url"])
            .arg(archive_endpoint!(mock_server))
            .assert()
            .success()
            .stdout(contains("Service Unavailable\n"))
            .stdout(contains("Other Errors:   0"))
            .stderr(contains("Archive answered 503"));
    }

    #[test]
    fn test_connection_errors_are_counted() {
        main_command!()
            .args(["-d", "a.com", "-u", "b.com", "-r", "1", "--archive-url"])
            .arg(closed_port_endpoint!())
            .assert()
            .success()
            .stdout(contains("Timeout Errors: 0"))
            .stdout(contains("Other Errors:   4"));
    }

    #[tokio::test]
    async fn test_user_agent() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(wiremock::matchers::header("user-agent", "my-agent/2.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string("http://a.com/\n"))
            .expect(1)
            .mount(&mock_server)
            .await;

        main_command!()
            .args(["-s", "-u", "a.com", "--ua", "my-agent/2.0", "--archive-url"])
            .arg(archive_endpoint!(mock_server))
            .assert()
            .success()
            .stdout("http://a.com/\n");
    }

    #[tokio::test]
    async fn test_default_config_file() -> Result<()> {
        let mock_server = mock_archive!("http://a.com/from-config\n");
        let dir = tempdir()?;
        fs::write(
            dir.path().join("waybackscope.toml"),
            format!(
                "domain = \"a.com\"\nsilent = true\narchive_url = \"{}\"\n",
                archive_endpoint!(mock_server)
            ),
        )?;

        main_command!()
            .current_dir(dir.path())
            .assert()
            .success()
            .stdout("http://a.com/from-config\n");
        Ok(())
    }

    #[test]
    fn test_invalid_config_file() -> Result<()> {
        let dir = tempdir()?;
        let config = dir.path().join("bad.toml");
        fs::write(&config, "threads = 4\n")?;

        main_command!()
            .arg("--config")
            .arg(&config)
            .args(["-d", "a.com"])
            .assert()
            .failure()
            .code(3)
            .stderr(contains("Cannot load configuration file"));
        Ok(())
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempdir().unwrap();

        main_command!()
            .arg("-c")
            .arg(dir.path().join("nope.toml"))
            .assert()
            .failure()
            .code(3);
    }
}
