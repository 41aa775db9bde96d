//! Integration tests for the Jenkins REST client.
//!
//! These tests run the client against a fake Jenkins and verify:
//! 1. Requests hit the documented endpoints with basic auth
//! 2. Status codes map to the right `CiError` variants
//! 3. Triggered builds are resolved from queue items to build numbers

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{basic_auth, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jenkins_lex_bot::adapters::jenkins::{JenkinsClient, JenkinsConfig};
use jenkins_lex_bot::domain::foundation::{BuildNumber, JobName};
use jenkins_lex_bot::domain::jobs::BuildResult;
use jenkins_lex_bot::ports::{CiError, CiServer};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn client(server: &MockServer) -> JenkinsClient {
    let config = JenkinsConfig::new(server.uri(), "bot", "token")
        .with_timeout(Duration::from_secs(5))
        .with_queue_polling(3, Duration::from_millis(10));
    JenkinsClient::new(config).unwrap()
}

fn job(name: &str) -> JobName {
    JobName::new(name).unwrap()
}

// =============================================================================
// Job lookups
// =============================================================================

#[tokio::test]
async fn job_exists_maps_404_to_false() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job/api/api/json"))
        .and(basic_auth("bot", "token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "api"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/job/ghost/api/json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client(&server);
    assert!(client.job_exists(&job("api")).await.unwrap());
    assert!(!client.job_exists(&job("ghost")).await.unwrap());
}

#[tokio::test]
async fn get_job_info_reads_jenkins_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job/api/api/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "api",
            "url": format!("{}/job/api/", server.uri()),
            "description": "Builds the API",
            "buildable": true,
            "color": "blue",
            "inQueue": false,
            "lastBuild": {"number": 12},
            "lastSuccessfulBuild": {"number": 12},
            "lastFailedBuild": null,
            "healthReport": [{"description": "Build stability: No recent builds failed."}]
        })))
        .mount(&server)
        .await;

    let info = client(&server).get_job_info(&job("api")).await.unwrap();

    assert_eq!(info.name, "api");
    assert_eq!(info.description.as_deref(), Some("Builds the API"));
    assert_eq!(info.last_build, Some(BuildNumber::new(12)));
    assert_eq!(info.last_failed_build, None);
    assert_eq!(
        info.health.as_deref(),
        Some("Build stability: No recent builds failed.")
    );
}

#[tokio::test]
async fn get_job_info_maps_404_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job/ghost/api/json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client(&server).get_job_info(&job("ghost")).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn lists_jobs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/json"))
        .and(query_param("tree", "jobs[name,url,color]"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jobs": [
                {"name": "api", "url": "http://ci/job/api/", "color": "blue"},
                {"name": "web", "url": "http://ci/job/web/", "color": "red"}
            ]
        })))
        .mount(&server)
        .await;

    let jobs = client(&server).get_jobs().await.unwrap();
    let names: Vec<_> = jobs.iter().map(|j| j.name.as_str()).collect();
    assert_eq!(names, vec!["api", "web"]);
    assert_eq!(jobs[1].color.as_deref(), Some("red"));
}

#[tokio::test]
async fn unauthorized_is_its_own_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/json"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client(&server).get_jobs().await.unwrap_err();
    assert_eq!(err, CiError::Unauthorized);
}

// =============================================================================
// Job mutations
// =============================================================================

#[tokio::test]
async fn create_job_posts_xml() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/createItem"))
        .and(query_param("name", "api"))
        .and(header("content-type", "application/xml"))
        .and(body_string_contains("<project>"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .create_job(&job("api"), "<project></project>")
        .await
        .unwrap();
}

#[tokio::test]
async fn create_job_surfaces_jenkins_error_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/createItem"))
        .respond_with(
            ResponseTemplate::new(400).insert_header("X-Error", "A job already exists with the name 'api'"),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .create_job(&job("api"), "<project/>")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        CiError::remote(400, "A job already exists with the name 'api'")
    );
}

#[tokio::test]
async fn delete_job_posts_do_delete() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/job/old/doDelete"))
        .and(basic_auth("bot", "token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).delete_job(&job("old")).await.unwrap();
}

#[tokio::test]
async fn server_error_quotes_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/job/old/doDelete"))
        .respond_with(ResponseTemplate::new(500).set_body_string("java.lang.IllegalStateException: locked"))
        .mount(&server)
        .await;

    let err = client(&server).delete_job(&job("old")).await.unwrap_err();
    assert_eq!(
        err,
        CiError::remote(500, "java.lang.IllegalStateException: locked")
    );
}

// =============================================================================
// Builds
// =============================================================================

#[tokio::test]
async fn build_job_resolves_queue_item_to_build_number() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/job/api/build"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("Location", format!("{}/queue/item/42/", server.uri()).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/queue/item/42/api/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "why": "Waiting for next available executor"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/queue/item/42/api/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "executable": {"number": 7, "url": "http://ci/job/api/7/"}
        })))
        .mount(&server)
        .await;

    let number = client(&server).build_job(&job("api")).await.unwrap();
    assert_eq!(number, BuildNumber::new(7));
}

#[tokio::test]
async fn build_stuck_in_queue_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/job/api/build"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("Location", format!("{}/queue/item/9/", server.uri()).as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/queue/item/9/api/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 9})))
        .expect(3)
        .mount(&server)
        .await;

    let err = client(&server).build_job(&job("api")).await.unwrap_err();
    assert!(matches!(err, CiError::StillQueued(_)));
}

#[tokio::test]
async fn build_info_and_console() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job/api/7/api/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "number": 7,
            "building": false,
            "result": "FAILURE",
            "duration": 1234,
            "url": "http://ci/job/api/7/"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/job/api/7/consoleText"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Started by user bot\nFinished: FAILURE\n"))
        .mount(&server)
        .await;

    let client = client(&server);
    let info = client
        .get_build_info(&job("api"), BuildNumber::new(7))
        .await
        .unwrap();
    assert!(!info.building);
    assert_eq!(info.result, Some(BuildResult::Failure));
    assert_eq!(info.duration_ms, Some(1234));

    let console = client
        .get_build_console_output(&job("api"), BuildNumber::new(7))
        .await
        .unwrap();
    assert!(console.ends_with("Finished: FAILURE\n"));
}

#[tokio::test]
async fn running_build_has_no_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job/api/8/api/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "number": 8,
            "building": true,
            "result": null
        })))
        .mount(&server)
        .await;

    let info = client(&server)
        .get_build_info(&job("api"), BuildNumber::new(8))
        .await
        .unwrap();
    assert!(info.building);
    assert_eq!(info.result, None);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let config = JenkinsConfig::new("http://127.0.0.1:1", "bot", "token")
        .with_timeout(Duration::from_secs(2));
    let client = JenkinsClient::new(config).unwrap();

    let err = client.get_jobs().await.unwrap_err();
    assert!(matches!(err, CiError::Transport(_)));
}
