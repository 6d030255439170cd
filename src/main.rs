use bucket_setup::{cli, setup};
use clap::Parser;
use log::debug;
use std::io;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::init();
    let config = cli::Cli::parse().into_config();

    let mut stdout = io::stdout();
    match setup::execute(&config, &mut stdout).await {
        Ok(outcome) => {
            debug!("Setup finished, bucket created: {}", outcome.created);
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!("Bucket setup failed: {:?}", e);
            // 报告失败本身出错时也只能以失败码退出
            let _ = setup::report_failure(&*e, &config, &mut io::stderr());
            ExitCode::FAILURE
        }
    }
}
