use crate::Result;
use serde::{Deserialize, Serialize};

pub const S3_XML_NAMESPACE: &str = "http://s3.amazonaws.com/doc/2006-03-01/";
pub const POLICY_VERSION: &str = "2012-10-17";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "CORSConfiguration")]
pub struct CorsConfiguration {
    #[serde(rename = "@xmlns", default)]
    pub xmlns: String,
    #[serde(rename = "CORSRule", default)]
    pub rules: Vec<CorsRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorsRule {
    #[serde(rename = "AllowedHeader", default)]
    pub allowed_headers: Vec<String>,
    #[serde(rename = "AllowedMethod", default)]
    pub allowed_methods: Vec<String>,
    #[serde(rename = "AllowedOrigin", default)]
    pub allowed_origins: Vec<String>,
    #[serde(rename = "ExposeHeader", default)]
    pub expose_headers: Vec<String>,
    #[serde(rename = "MaxAgeSeconds")]
    pub max_age_seconds: u32,
}

impl CorsConfiguration {
    /// Browser uploads and reads from any origin, preflight cached for 3000s.
    pub fn browser_uploads() -> Self {
        Self {
            xmlns: S3_XML_NAMESPACE.to_string(),
            rules: vec![CorsRule {
                allowed_headers: vec!["*".to_string()],
                allowed_methods: ["GET", "PUT", "POST", "DELETE", "HEAD"]
                    .iter()
                    .map(|m| m.to_string())
                    .collect(),
                allowed_origins: vec!["*".to_string()],
                expose_headers: vec!["ETag".to_string(), "x-amz-version-id".to_string()],
                max_age_seconds: 3000,
            }],
        }
    }

    pub fn to_xml(&self) -> Result<String> {
        Ok(quick_xml::se::to_string(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketPolicy {
    pub version: String,
    pub statement: Vec<PolicyStatement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub sid: String,
    pub effect: String,
    pub principal: String,
    pub action: Vec<String>,
    pub resource: Vec<String>,
}

impl BucketPolicy {
    /// Anonymous `s3:GetObject` on every object in `bucket`.
    pub fn public_read(bucket: &str) -> Self {
        Self::public_access(bucket, &["s3:GetObject"])
    }

    /// Same as [`BucketPolicy::public_read`] plus anonymous `s3:PutObject`.
    pub fn public_read_write(bucket: &str) -> Self {
        Self::public_access(bucket, &["s3:GetObject", "s3:PutObject"])
    }

    fn public_access(bucket: &str, actions: &[&str]) -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statement: vec![PolicyStatement {
                sid: "PublicReadGetObject".to_string(),
                effect: "Allow".to_string(),
                principal: "*".to_string(),
                action: actions.iter().map(|a| a.to_string()).collect(),
                resource: vec![format!("arn:aws:s3:::{}/*", bucket)],
            }],
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename = "CreateBucketConfiguration")]
pub struct CreateBucketConfiguration {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    #[serde(rename = "LocationConstraint")]
    pub location_constraint: String,
}

impl CreateBucketConfiguration {
    pub fn new(region: &str) -> Self {
        Self {
            xmlns: S3_XML_NAMESPACE.to_string(),
            location_constraint: region.to_string(),
        }
    }

    pub fn to_xml(&self) -> Result<String> {
        Ok(quick_xml::se::to_string(self)?)
    }
}

// S3 错误响应体
#[derive(Debug, Default, Deserialize)]
pub struct S3ErrorBody {
    #[serde(rename = "Code", default)]
    pub code: Option<String>,
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
}

impl S3ErrorBody {
    /// Best effort, an empty or non-XML body yields no code and no message.
    pub fn parse(body: &str) -> Self {
        if body.trim().is_empty() {
            return Self::default();
        }
        quick_xml::de::from_str(body).unwrap_or_default()
    }
}
