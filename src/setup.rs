use crate::common::SetupConfig;
use crate::models::{BucketPolicy, CorsConfiguration};
use crate::operations::{BucketAdmin, BucketClient};
use crate::Result;
use log::info;
use std::error::Error;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupOutcome {
    /// The bucket did not exist and was created by this run.
    pub created: bool,
}

/// Policy document for this run, read-only unless public uploads were requested.
pub fn policy_for(config: &SetupConfig) -> BucketPolicy {
    if config.allow_public_upload {
        BucketPolicy::public_read_write(&config.bucket)
    } else {
        BucketPolicy::public_read(&config.bucket)
    }
}

pub fn write_banner<W: Write>(config: &SetupConfig, out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "🔧 Setting up S3 bucket: {}", config.bucket)?;
    writeln!(out, "📍 Endpoint: {}", config.base_url())?;
    writeln!(out, "🔐 Credentials: {}/{}", config.access_key, config.secret_key)?;
    writeln!(out)
}

/// Existence check, optional create, CORS, then policy. Stops at the first failure.
pub async fn run_setup<A, W>(admin: &A, config: &SetupConfig, out: &mut W) -> Result<SetupOutcome>
where
    A: BucketAdmin,
    W: Write,
{
    writeln!(out, "✓ Checking bucket existence...")?;
    let created = if admin.bucket_exists().await? {
        writeln!(out, "✓ Bucket '{}' exists", config.bucket)?;
        writeln!(out)?;
        false
    } else {
        writeln!(out, "ℹ Bucket not found, creating...")?;
        admin.create_bucket().await?;
        writeln!(out, "✓ Bucket '{}' created", config.bucket)?;
        writeln!(out)?;
        true
    };

    writeln!(out, "✓ Applying CORS policy...")?;
    admin
        .put_bucket_cors(&CorsConfiguration::browser_uploads())
        .await?;
    writeln!(out, "✓ CORS policy applied")?;
    writeln!(out)?;

    let label = if config.allow_public_upload {
        "Public read/upload"
    } else {
        "Public read"
    };
    writeln!(out, "✓ Applying {} policy...", label.to_lowercase())?;
    admin.put_bucket_policy(&policy_for(config)).await?;
    writeln!(out, "✓ {} policy applied", label)?;
    writeln!(out)?;

    writeln!(out, "✅ S3 bucket setup complete!")?;
    writeln!(out)?;
    writeln!(out, "You can now:")?;
    writeln!(out, "  1. Upload images using the test component")?;
    writeln!(
        out,
        "  2. Access images directly at: {}",
        config.public_object_hint()
    )?;
    writeln!(out)?;

    Ok(SetupOutcome { created })
}

/// Prints both documents exactly as they would be submitted.
pub fn write_dry_run<W: Write>(config: &SetupConfig, out: &mut W) -> Result<()> {
    writeln!(out, "ℹ Dry run, nothing will be sent to {}", config.base_url())?;
    writeln!(out)?;
    writeln!(out, "CORS configuration:")?;
    writeln!(out, "{}", CorsConfiguration::browser_uploads().to_xml()?)?;
    writeln!(out)?;
    writeln!(out, "Bucket policy:")?;
    writeln!(out, "{}", policy_for(config).to_json()?)?;
    writeln!(out)?;
    Ok(())
}

/// Runs the whole job against the configured endpoint.
pub async fn execute<W: Write>(config: &SetupConfig, out: &mut W) -> Result<SetupOutcome> {
    write_banner(config, out)?;

    if config.dry_run {
        write_dry_run(config, out)?;
        return Ok(SetupOutcome { created: false });
    }

    let client = BucketClient::new(config)?;
    info!("Provisioning {}", client.bucket_url());
    run_setup(&client, config, out).await
}

pub fn report_failure<W: Write>(
    error: &(dyn Error + 'static),
    config: &SetupConfig,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "❌ Error setting up S3 bucket:")?;
    writeln!(out, "   {}", error)?;
    writeln!(out)?;
    writeln!(out, "⚠️  Troubleshooting:")?;
    writeln!(
        out,
        "   1. Ensure MinIO/rustfs is running on {}",
        config.base_url()
    )?;
    writeln!(
        out,
        "   2. Check that credentials ({}/{}) are correct",
        config.access_key, config.secret_key
    )?;
    writeln!(out, "   3. Verify the S3 endpoint is accessible")?;
    writeln!(out)
}
