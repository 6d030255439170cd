use super::test_helpers::*;
use bucket_setup::operations::checksum_sha256;
use predicates::prelude::*;

const PUBLIC_READ_POLICY: &str = r#"{"Version":"2012-10-17","Statement":[{"Sid":"PublicReadGetObject","Effect":"Allow","Principal":"*","Action":["s3:GetObject"],"Resource":["arn:aws:s3:::medicine-store/*"]}]}"#;

#[tokio::test]
async fn creates_missing_bucket_then_applies_cors_and_policy() {
    let mock = MockS3::start(MockBehavior::default()).await;

    let output = run_bucket_setup(&["--endpoint", &mock.endpoint]).await;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
    assert_eq!(
        mock.operations(),
        vec!["HeadBucket", "CreateBucket", "PutBucketCors", "PutBucketPolicy"]
    );

    let stdout = stdout_of(&output);
    assert!(predicate::str::contains("Bucket not found, creating...").eval(&stdout));
    assert!(predicate::str::contains("S3 bucket setup complete!").eval(&stdout));
}

#[tokio::test]
async fn existing_bucket_goes_straight_to_cors_and_policy() {
    let mock = MockS3::start(MockBehavior {
        bucket_exists: true,
        ..MockBehavior::default()
    })
    .await;

    let output = run_bucket_setup(&["--endpoint", &mock.endpoint]).await;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
    assert_eq!(
        mock.operations(),
        vec!["HeadBucket", "PutBucketCors", "PutBucketPolicy"]
    );
    assert!(stdout_of(&output).contains("Bucket 'medicine-store' exists"));
}

#[tokio::test]
async fn submitted_documents_match_the_fixed_literals() {
    let mock = MockS3::start(MockBehavior {
        bucket_exists: true,
        ..MockBehavior::default()
    })
    .await;

    let output = run_bucket_setup(&["--endpoint", &mock.endpoint]).await;
    assert!(output.status.success());

    let requests = mock.requests();
    let cors = &requests[1];
    assert!(cors.body.starts_with("<CORSConfiguration"));
    assert!(cors.body.contains("<AllowedMethod>DELETE</AllowedMethod>"));
    assert!(cors.body.contains("<ExposeHeader>x-amz-version-id</ExposeHeader>"));
    assert!(cors.body.contains("<MaxAgeSeconds>3000</MaxAgeSeconds>"));
    assert_eq!(
        cors.header("x-amz-checksum-sha256"),
        Some(checksum_sha256(cors.body.as_bytes()).as_str())
    );

    let policy = &requests[2];
    assert_eq!(policy.body, PUBLIC_READ_POLICY);
    assert_eq!(policy.header("content-type"), Some("application/json"));
}

#[tokio::test]
async fn every_request_stays_on_the_configured_bucket() {
    let mock = MockS3::start(MockBehavior::default()).await;

    let output = run_bucket_setup(&["--endpoint", &mock.endpoint]).await;
    assert!(output.status.success());

    for request in mock.requests() {
        assert_eq!(request.path.trim_end_matches('/'), "/medicine-store");
        assert!(request.query_keys.iter().any(|k| k == "X-Amz-Signature"));
    }
}

#[tokio::test]
async fn access_denied_on_policy_exits_with_failure() {
    let mock = MockS3::start(MockBehavior {
        bucket_exists: true,
        deny: Some("PutBucketPolicy"),
    })
    .await;

    let output = run_bucket_setup(&["--endpoint", &mock.endpoint]).await;

    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr_of(&output);
    assert!(stderr.contains("PutBucketPolicy failed with HTTP 403"));
    assert!(stderr.contains("AccessDenied: Access Denied."));
    assert!(stderr.contains("Troubleshooting"));
    assert!(!stderr.contains("panicked"));
    assert_eq!(stderr.matches("PutBucketPolicy failed").count(), 1, "{}", stderr);
    assert!(!stdout_of(&output).contains("setup complete"));
}

#[tokio::test]
async fn forbidden_existence_check_does_not_create() {
    let mock = MockS3::start(MockBehavior {
        bucket_exists: false,
        deny: Some("HeadBucket"),
    })
    .await;

    let output = run_bucket_setup(&["--endpoint", &mock.endpoint]).await;

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(mock.operations(), vec!["HeadBucket"]);
}

#[tokio::test]
async fn unreachable_endpoint_exits_with_failure() {
    let output = run_bucket_setup(&["--endpoint", "http://127.0.0.1:9"]).await;

    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr_of(&output);
    assert!(stderr.contains("HeadBucket request could not be completed"));
    assert!(stderr.contains("Ensure MinIO/rustfs is running on http://127.0.0.1:9"));
    assert!(!stderr.contains("X-Amz-Signature"), "{}", stderr);
    assert_eq!(stderr.matches("could not be completed").count(), 1, "{}", stderr);
}

#[tokio::test]
async fn regional_bucket_is_created_with_location_constraint() {
    let mock = MockS3::start(MockBehavior::default()).await;

    let output = run_bucket_setup(&["--endpoint", &mock.endpoint, "--region", "eu-west-1"]).await;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
    assert_eq!(
        mock.operations(),
        vec!["HeadBucket", "CreateBucket", "PutBucketCors", "PutBucketPolicy"]
    );

    let requests = mock.requests();
    let create = &requests[1];
    assert!(create.body.starts_with("<CreateBucketConfiguration"));
    assert!(
        create
            .body
            .contains("<LocationConstraint>eu-west-1</LocationConstraint>")
    );
    assert_eq!(
        create.header("x-amz-checksum-sha256"),
        Some(checksum_sha256(create.body.as_bytes()).as_str())
    );
    assert!(
        create
            .query_keys
            .iter()
            .all(|k| k != "cors" && k != "policy")
    );
}

#[tokio::test]
async fn default_region_creates_bucket_without_body() {
    let mock = MockS3::start(MockBehavior::default()).await;

    let output = run_bucket_setup(&["--endpoint", &mock.endpoint]).await;
    assert!(output.status.success());

    let requests = mock.requests();
    let create = &requests[1];
    assert_eq!(create.operation(), "CreateBucket");
    assert!(create.body.is_empty());
    assert!(create.header("x-amz-checksum-sha256").is_none());
}

#[tokio::test]
async fn dry_run_prints_documents_and_exits_cleanly() {
    let output = run_bucket_setup(&["--endpoint", "http://127.0.0.1:9", "--dry-run"]).await;

    assert_eq!(output.status.code(), Some(0));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("<CORSConfiguration"));
    assert!(stdout.contains(PUBLIC_READ_POLICY));
}
