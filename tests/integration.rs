use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use vod_uploader::{
    batch::upload_videos_in_directory,
    models::{Credentials, VodConfig},
    report::{read_results, write_results, ReportEntry, RESULTS_FILE_NAME},
    single::{resolve_title, upload_single},
    vod::{MockVodClient, VodClient},
    ErrorKind,
};
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn touch(dir: &Path, name: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, name.as_bytes()).unwrap();
}

fn names(outcomes: &[vod_uploader::models::UploadOutcome]) -> Vec<&str> {
    outcomes.iter().map(|o| o.file_name.as_str()).collect()
}

#[tokio::test]
async fn test_only_video_extensions_are_uploaded() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    touch(input.path(), "a.mp4");
    touch(input.path(), "b.txt");
    touch(input.path(), "c.mov");
    touch(input.path(), "D.MKV");

    let vod = MockVodClient::new();
    let run = upload_videos_in_directory(&vod, "space", input.path(), output.path()).await;

    assert!(!run.is_aborted());
    assert_eq!(names(&run.outcomes), vec!["a.mp4", "c.mov"]);
    assert!(run.outcomes.iter().all(|o| o.published && o.error.is_none()));

    assert!(output.path().join("a.mp4").exists());
    assert!(output.path().join("c.mov").exists());
    assert!(input.path().join("b.txt").exists());
    assert!(input.path().join("D.MKV").exists());
    assert!(!output.path().join("b.txt").exists());
}

#[tokio::test]
async fn test_nested_directories_record_file_names() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    touch(input.path(), "top.avi");
    touch(input.path(), "season1/ep1.mkv");
    touch(input.path(), "season1/deeper/ep2.mp4");

    let vod = MockVodClient::new();
    let run = upload_videos_in_directory(&vod, "space", input.path(), output.path()).await;

    assert!(!run.is_aborted());
    assert_eq!(run.outcomes.len(), 3);
    let mut recorded = names(&run.outcomes);
    recorded.sort();
    assert_eq!(recorded, vec!["ep1.mkv", "ep2.mp4", "top.avi"]);
    assert!(output.path().join("ep2.mp4").exists());

    let uploads = vod.get_uploads();
    assert!(uploads.iter().all(|u| u.space_name == "space"));
    assert!(uploads
        .iter()
        .all(|u| u.remote_name.as_deref() == Some(u.title.as_str())));
}

#[tokio::test]
async fn test_empty_directory_yields_no_outcomes() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    touch(input.path(), "notes.txt");

    let vod = MockVodClient::new();
    let run = upload_videos_in_directory(&vod, "space", input.path(), output.path()).await;

    assert!(run.outcomes.is_empty());
    assert!(run.aborted.is_none());
    assert_eq!(vod.get_upload_count(), 0);
}

#[tokio::test]
async fn test_upload_failure_is_recorded_and_not_moved() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    touch(input.path(), "a.mp4");
    touch(input.path(), "b.mp4");

    let vod = MockVodClient::new().with_upload_failure("a.mp4", "InvalidParameter");
    let run = upload_videos_in_directory(&vod, "space", input.path(), output.path()).await;

    assert!(!run.is_aborted());
    assert_eq!(run.outcomes.len(), 2);

    let failed = &run.outcomes[0];
    assert_eq!(failed.file_name, "a.mp4");
    assert!(failed.vid.is_empty());
    assert!(!failed.published);
    assert_eq!(failed.error_message().as_deref(), Some("InvalidParameter"));

    assert!(input.path().join("a.mp4").exists());
    assert!(!output.path().join("a.mp4").exists());
    assert!(output.path().join("b.mp4").exists());
}

#[tokio::test]
async fn test_publish_failure_still_moves_file() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    touch(input.path(), "a.mp4");

    let vod = MockVodClient::new().with_publish_failure("a.mp4", "InternalError");
    let run = upload_videos_in_directory(&vod, "space", input.path(), output.path()).await;

    let outcome = &run.outcomes[0];
    assert!(!outcome.vid.is_empty());
    assert!(!outcome.published);
    assert_eq!(outcome.error_message().as_deref(), Some("InternalError"));
    assert!(output.path().join("a.mp4").exists());
    assert!(!input.path().join("a.mp4").exists());
}

#[tokio::test]
async fn test_credential_error_aborts_walk() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    touch(input.path(), "a.mp4");
    touch(input.path(), "b.mp4");
    touch(input.path(), "c.mp4");

    let vod = MockVodClient::new().with_upload_failure("b.mp4", "SignatureDoesNotMatch");
    let run = upload_videos_in_directory(&vod, "space", input.path(), output.path()).await;

    let err = run.aborted.as_ref().unwrap();
    assert_eq!(err.kind(), ErrorKind::Credential);
    assert_eq!(err.to_string(), "SignatureDoesNotMatch");

    assert_eq!(names(&run.outcomes), vec!["a.mp4"]);
    assert_eq!(vod.get_upload_count(), 2);
    assert!(output.path().join("a.mp4").exists());
    assert!(input.path().join("b.mp4").exists());
    assert!(input.path().join("c.mp4").exists());
}

#[tokio::test]
async fn test_move_conflict_aborts_walk() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    touch(input.path(), "a.mp4");
    touch(input.path(), "b.mp4");
    touch(output.path(), "a.mp4");

    let vod = MockVodClient::new();
    let run = upload_videos_in_directory(&vod, "space", input.path(), output.path()).await;

    assert_eq!(run.aborted.as_ref().unwrap().kind(), ErrorKind::Filesystem);
    assert_eq!(names(&run.outcomes), vec!["a.mp4"]);
    assert_eq!(vod.get_upload_count(), 1);
}

#[tokio::test]
async fn test_output_inside_input_is_not_rewalked() {
    let input = TempDir::new().unwrap();
    touch(input.path(), "a.mp4");
    let output = input.path().join("done");
    fs::create_dir(&output).unwrap();

    let vod = MockVodClient::new();
    let run = upload_videos_in_directory(&vod, "space", input.path(), &output).await;

    assert!(!run.is_aborted());
    assert_eq!(vod.get_upload_count(), 1);
    assert!(output.join("a.mp4").exists());
}

#[tokio::test]
async fn test_report_matches_batch_outcomes() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    touch(input.path(), "a.mp4");
    touch(input.path(), "b.avi");
    touch(input.path(), "c.mov");

    let vod = MockVodClient::new()
        .with_upload_failure("b.avi", "InvalidParameter")
        .with_publish_failure("c.mov", "InternalError");
    let run = upload_videos_in_directory(&vod, "space", input.path(), output.path()).await;

    let path = output.path().join(RESULTS_FILE_NAME);
    write_results(&run.outcomes, &path).unwrap();
    let entries = read_results(&path).unwrap();

    assert_eq!(
        entries,
        vec![
            ReportEntry {
                file_name: "a.mp4".to_string(),
                vid: "v0mock0001".to_string(),
                published: true,
                error: None,
            },
            ReportEntry {
                file_name: "b.avi".to_string(),
                vid: String::new(),
                published: false,
                error: Some("InvalidParameter".to_string()),
            },
            ReportEntry {
                file_name: "c.mov".to_string(),
                vid: "v0mock0003".to_string(),
                published: false,
                error: Some("InternalError".to_string()),
            },
        ]
    );
}

#[tokio::test]
async fn test_single_upload_uses_base_name_title() {
    let vod = MockVodClient::new();
    let path = Path::new("/tmp/x.mp4");
    let title = resolve_title(path, None);

    let report = upload_single(&vod, "space", path, &title, None).await;
    assert_eq!(report.title, "x.mp4");
    assert!(report.to_string().starts_with("/tmp/x.mp4, x.mp4, "));
}

#[tokio::test]
async fn test_batch_against_http_api_aborts_on_invalid_credential() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("Action", "ApplyUploadInfo"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "ResponseMetadata": {
                "RequestId": "req-1",
                "Action": "ApplyUploadInfo",
                "Error": {"Code": "InvalidCredential", "Message": "access key not found"}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    touch(input.path(), "a.mp4");
    touch(input.path(), "b.mp4");

    let client = VodClient::new(
        VodConfig::new(Credentials::new("ak", "sk")).with_base_url(server.uri()),
    );
    let run = upload_videos_in_directory(&client, "space", input.path(), output.path()).await;

    assert!(run.outcomes.is_empty());
    assert_eq!(run.aborted.unwrap().kind(), ErrorKind::Credential);
    assert!(input.path().join("a.mp4").exists());
}

#[tokio::test]
async fn test_batch_binary_exits_when_input_missing() {
    let output = TempDir::new().unwrap();

    let result = tokio::process::Command::new(env!("CARGO_BIN_EXE_vod-uploader"))
        .current_dir(output.path())
        .args(["--spacename", "space", "--inputdir", "/no/such/dir"])
        .arg("--outputdir")
        .arg(output.path())
        .output()
        .await
        .unwrap();

    assert_eq!(result.status.code(), Some(1));
    assert!(!output.path().join(RESULTS_FILE_NAME).exists());
}

#[tokio::test]
async fn test_batch_binary_writes_report_then_fails_on_credential_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("Action", "ApplyUploadInfo"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "ResponseMetadata": {
                "Error": {"Code": "SignatureDoesNotMatch", "Message": "signature mismatch"}
            }
        })))
        .mount(&server)
        .await;

    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    touch(input.path(), "a.mp4");

    let result = tokio::process::Command::new(env!("CARGO_BIN_EXE_vod-uploader"))
        .current_dir(output.path())
        .env("VOLC_ACCESSKEY", "ak")
        .env("VOLC_SECRETKEY", "sk")
        .env("VOLC_VOD_HOST", server.uri())
        .arg("--spacename=space")
        .arg("--inputdir")
        .arg(input.path())
        .arg("--outputdir")
        .arg(output.path())
        .output()
        .await
        .unwrap();

    assert_eq!(result.status.code(), Some(1));
    assert!(read_results(&output.path().join(RESULTS_FILE_NAME))
        .unwrap()
        .is_empty());
    assert!(input.path().join("a.mp4").exists());
}

#[tokio::test]
async fn test_single_binary_without_config_prints_failure_line() {
    let cwd = TempDir::new().unwrap();

    let result = tokio::process::Command::new(env!("CARGO_BIN_EXE_vod_upload_file"))
        .current_dir(cwd.path())
        .args(["--spacename=space", "--filepath=/tmp/x.mp4"])
        .output()
        .await
        .unwrap();

    assert_eq!(result.status.code(), Some(1));
    let stdout = String::from_utf8(result.stdout).unwrap();
    let fields: Vec<&str> = stdout.trim_end().splitn(6, ", ").collect();
    assert_eq!(
        fields[..5].to_vec(),
        vec!["/tmp/x.mp4", "x.mp4", "", "false", "false"]
    );
    assert!(!fields[5].is_empty());
}
