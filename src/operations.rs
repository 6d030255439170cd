use crate::common::{self, SetupConfig};
use crate::models::{BucketPolicy, CorsConfiguration, CreateBucketConfiguration, S3ErrorBody};
use crate::Result;
use base64::{Engine as _, engine::general_purpose};
use log::{debug, info, warn};
use reqwest::{Client as ReqwestClient, Response, StatusCode};
use rusty_s3::{Bucket, Credentials, S3Action, UrlStyle};
use sha2::{Digest, Sha256};
use std::time::Duration;
use thiserror::Error;
use url::Url;

const SIGN_DURATION: Duration = Duration::from_secs(300);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CHECKSUM_HEADER: &str = "x-amz-checksum-sha256";

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Invalid endpoint {0}")]
    InvalidEndpoint(String),
    #[error("{operation} failed with HTTP {status}: {detail}")]
    RequestFailed {
        operation: &'static str,
        status: StatusCode,
        code: Option<String>,
        detail: String,
    },
    #[error("{operation} request could not be completed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// The administrative calls one provisioning run makes against a bucket.
#[allow(async_fn_in_trait)]
pub trait BucketAdmin {
    /// `Ok(false)` only when the service answers 404, any other failure is an error.
    async fn bucket_exists(&self) -> Result<bool>;
    async fn create_bucket(&self) -> Result<()>;
    async fn put_bucket_cors(&self, cors: &CorsConfiguration) -> Result<()>;
    async fn put_bucket_policy(&self, policy: &BucketPolicy) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketRequest {
    HeadBucket,
    CreateBucket,
    PutBucketCors,
    PutBucketPolicy,
}

impl BucketRequest {
    pub fn operation(self) -> &'static str {
        match self {
            BucketRequest::HeadBucket => "HeadBucket",
            BucketRequest::CreateBucket => "CreateBucket",
            BucketRequest::PutBucketCors => "PutBucketCors",
            BucketRequest::PutBucketPolicy => "PutBucketPolicy",
        }
    }

    fn subresource(self) -> Option<&'static str> {
        match self {
            BucketRequest::PutBucketCors => Some("cors"),
            BucketRequest::PutBucketPolicy => Some("policy"),
            _ => None,
        }
    }
}

/// Talks to one bucket through presigned path-style URLs.
pub struct BucketClient {
    bucket: Bucket,
    client: ReqwestClient,
    credentials: Credentials,
    region: String,
}

impl BucketClient {
    pub fn new(config: &SetupConfig) -> Result<Self> {
        let url = common::parse_endpoint(&config.endpoint)?;
        debug!("Parsed endpoint: {}", url);

        let bucket = Bucket::new(
            url,
            UrlStyle::Path,
            config.bucket.clone(),
            config.region.clone(),
        )?;
        debug!("Bucket URL: {}", bucket.base_url());

        let credentials = Credentials::new(config.access_key.clone(), config.secret_key.clone());

        let client = ReqwestClient::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            bucket,
            client,
            credentials,
            region: config.region.clone(),
        })
    }

    pub fn bucket_url(&self) -> &Url {
        self.bucket.base_url()
    }

    /// Signs `request`. A checksum, when given, becomes a signed header.
    pub fn presign(&self, request: BucketRequest, checksum: Option<&str>) -> Url {
        if request == BucketRequest::HeadBucket {
            return self
                .bucket
                .head_bucket(Some(&self.credentials))
                .sign(SIGN_DURATION);
        }

        // 子资源请求与 CreateBucket 同为 PUT /{bucket}，只多一个查询参数
        let mut action = self.bucket.create_bucket(&self.credentials);
        if let Some(subresource) = request.subresource() {
            action.query_mut().insert(subresource, "");
        }
        if let Some(checksum) = checksum {
            action
                .headers_mut()
                .insert(CHECKSUM_HEADER, checksum.to_string());
        }
        action.sign(SIGN_DURATION)
    }

    async fn put(
        &self,
        request: BucketRequest,
        content_type: &str,
        body: String,
    ) -> Result<()> {
        let operation = request.operation();
        let response = if body.is_empty() {
            let url = self.presign(request, None);
            debug!("PUT {}", url);
            self.client.put(url).send().await
        } else {
            let checksum = checksum_sha256(body.as_bytes());
            let url = self.presign(request, Some(&checksum));
            debug!("PUT {} ({} bytes)", url, body.len());
            self.client
                .put(url)
                .header("Content-Type", content_type)
                .header(CHECKSUM_HEADER, checksum)
                .body(body)
                .send()
                .await
        }
        .map_err(|source| transport_error(operation, source))?;

        debug!("{} returned {}", operation, response.status());
        if !response.status().is_success() {
            return Err(request_failed(operation, response).await.into());
        }

        Ok(())
    }
}

impl BucketAdmin for BucketClient {
    async fn bucket_exists(&self) -> Result<bool> {
        let operation = BucketRequest::HeadBucket.operation();
        let url = self.presign(BucketRequest::HeadBucket, None);
        debug!("HEAD {}", url);

        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|source| transport_error(operation, source))?;

        match response.status() {
            status if status.is_success() => {
                info!("Bucket '{}' exists", self.bucket.name());
                Ok(true)
            }
            StatusCode::NOT_FOUND => {
                info!("Bucket '{}' not found", self.bucket.name());
                Ok(false)
            }
            status => {
                warn!("{} returned unexpected status {}", operation, status);
                Err(request_failed(operation, response).await.into())
            }
        }
    }

    async fn create_bucket(&self) -> Result<()> {
        // us-east-1 以外的区域需要 LocationConstraint
        let body = if self.region == common::DEFAULT_REGION {
            String::new()
        } else {
            CreateBucketConfiguration::new(&self.region).to_xml()?
        };

        self.put(BucketRequest::CreateBucket, "application/xml", body)
            .await?;
        info!("Bucket '{}' created", self.bucket.name());
        Ok(())
    }

    async fn put_bucket_cors(&self, cors: &CorsConfiguration) -> Result<()> {
        let body = cors.to_xml()?;
        self.put(BucketRequest::PutBucketCors, "application/xml", body)
            .await?;
        info!("CORS configuration applied to '{}'", self.bucket.name());
        Ok(())
    }

    async fn put_bucket_policy(&self, policy: &BucketPolicy) -> Result<()> {
        let body = policy.to_json()?;
        self.put(BucketRequest::PutBucketPolicy, "application/json", body)
            .await?;
        info!("Bucket policy applied to '{}'", self.bucket.name());
        Ok(())
    }
}

/// Base64 SHA-256 of `body`, the form S3 expects in `x-amz-checksum-sha256`.
pub fn checksum_sha256(body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    general_purpose::STANDARD.encode(hasher.finalize())
}

// 签名 URL 只进调试日志，不进错误信息
fn transport_error(operation: &'static str, source: reqwest::Error) -> SetupError {
    if let Some(url) = source.url() {
        debug!("{} request to {} failed", operation, url);
    }
    SetupError::Transport {
        operation,
        source: source.without_url(),
    }
}

async fn request_failed(operation: &'static str, response: Response) -> SetupError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let parsed = S3ErrorBody::parse(&body);

    let detail = match (&parsed.code, &parsed.message) {
        (Some(code), Some(message)) => format!("{}: {}", code, message),
        (Some(code), None) => code.clone(),
        (None, Some(message)) => message.clone(),
        (None, None) => "no error details in response".to_string(),
    };

    SetupError::RequestFailed {
        operation,
        status,
        code: parsed.code,
        detail,
    }
}
