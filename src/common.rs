use crate::operations::SetupError;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:9000";
pub const DEFAULT_BUCKET: &str = "medicine-store";
pub const DEFAULT_ACCESS_KEY: &str = "admin";
pub const DEFAULT_SECRET_KEY: &str = "password";
pub const DEFAULT_REGION: &str = "us-east-1";

/// Everything one provisioning run needs to know.
#[derive(Debug, Clone)]
pub struct SetupConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    /// Also grant anonymous `s3:PutObject` in the bucket policy.
    pub allow_public_upload: bool,
    /// Print the documents instead of submitting them.
    pub dry_run: bool,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            bucket: DEFAULT_BUCKET.to_string(),
            access_key: DEFAULT_ACCESS_KEY.to_string(),
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            region: DEFAULT_REGION.to_string(),
            allow_public_upload: false,
            dry_run: false,
        }
    }
}

impl SetupConfig {
    /// Endpoint after normalisation, e.g. `http://localhost:9000`.
    pub fn base_url(&self) -> String {
        normalize_endpoint(&self.endpoint)
    }

    /// Where an uploaded product image becomes reachable once the policy is in place.
    pub fn public_object_hint(&self) -> String {
        format!("{}/{}/products/{{key}}", self.base_url(), self.bucket)
    }
}

/// Adds a scheme when missing and strips trailing slashes.
pub fn normalize_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim();

    // 本地服务默认走 http
    let base_url = if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        format!("http://{}", endpoint)
    } else {
        endpoint.to_string()
    };

    base_url.trim_end_matches('/').to_string()
}

pub fn parse_endpoint(endpoint: &str) -> Result<Url, SetupError> {
    let base_url = normalize_endpoint(endpoint);
    let url = Url::parse(&base_url)
        .map_err(|e| SetupError::InvalidEndpoint(format!("{}: {}", base_url, e)))?;

    if url.host_str().is_none() {
        return Err(SetupError::InvalidEndpoint(format!("{}: missing host", base_url)));
    }
    if url.path() != "/" {
        return Err(SetupError::InvalidEndpoint(format!(
            "{}: path-style requests need an endpoint without a path",
            base_url
        )));
    }

    Ok(url)
}
