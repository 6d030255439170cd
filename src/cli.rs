use crate::common::{
    DEFAULT_ACCESS_KEY, DEFAULT_BUCKET, DEFAULT_ENDPOINT, DEFAULT_REGION, DEFAULT_SECRET_KEY,
    SetupConfig,
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "bucket-setup")]
#[command(
    about = "Configure CORS and a public read policy on the local S3 bucket",
    long_about = None
)]
pub struct Cli {
    /// S3 endpoint URL
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Bucket name
    #[arg(short, long, default_value = DEFAULT_BUCKET)]
    pub bucket: String,

    /// S3 access key
    #[arg(short = 'k', long, default_value = DEFAULT_ACCESS_KEY)]
    pub access_key: String,

    /// S3 secret key
    #[arg(short, long, default_value = DEFAULT_SECRET_KEY)]
    pub secret_key: String,

    /// Signing region
    #[arg(short, long, default_value = DEFAULT_REGION)]
    pub region: String,

    /// Also allow anonymous uploads (s3:PutObject) in the bucket policy
    #[arg(long)]
    pub allow_public_upload: bool,

    /// Print the CORS and policy documents without contacting the endpoint
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    pub fn into_config(self) -> SetupConfig {
        SetupConfig {
            endpoint: self.endpoint,
            bucket: self.bucket,
            access_key: self.access_key,
            secret_key: self.secret_key,
            region: self.region,
            allow_public_upload: self.allow_public_upload,
            dry_run: self.dry_run,
        }
    }
}
