//! lumoctl - query and control the lumod daemon from the command line.

use lumo_ipc::DaemonClient;
use std::process::ExitCode;

fn usage() -> ExitCode {
    eprintln!("usage: lumoctl <status|force-update|watch>");
    ExitCode::from(2)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::init();

    let Some(command) = std::env::args().nth(1) else {
        return usage();
    };

    let client = DaemonClient::new();
    if !client.connect().await {
        eprintln!("lumod is not running");
        return ExitCode::FAILURE;
    }

    match command.as_str() {
        "status" => {
            if let Some((available, path, last_updated)) = client.get_cache_status().await {
                println!("cache: available={available} path={path} last_updated={last_updated}");
            }
            if let Some((is_indexing, progress, apps_count)) = client.get_indexing_status().await {
                println!("indexing: active={is_indexing} progress={progress:.2} apps={apps_count}");
            }
            ExitCode::SUCCESS
        }
        "force-update" => {
            if client.force_update().await {
                println!("update requested");
                ExitCode::SUCCESS
            } else {
                eprintln!("request failed");
                ExitCode::FAILURE
            }
        }
        "watch" => {
            client
                .subscribe_indexing_progress(|progress, apps| {
                    println!("progress {progress:.2} ({apps} apps)");
                })
                .await;
            client
                .subscribe_cache_updated(|apps, timestamp| {
                    println!("cache updated: {apps} apps at {timestamp}");
                })
                .await;

            let _ = tokio::signal::ctrl_c().await;
            ExitCode::SUCCESS
        }
        _ => usage(),
    }
}
