use anyhow::Context;
use clap::Parser;
use ixp_orchestrator::{LabMonitor, OrchestratorClient};
use ixp_server::cli::{Cli, Command, LabCommand, ServeArgs};
use ixp_server::{logging, AppConfig, Server};
use serde::Serialize;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format).context("failed to install log subscriber")?;

    let mut config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply_globals(&mut config);

    match cli.command {
        Some(Command::Lab(command)) => lab(command, &config).await,
        Some(Command::Serve(args)) => serve(&args, config).await,
        None => serve(&ServeArgs::default(), config).await,
    }
}

async fn serve(args: &ServeArgs, mut config: AppConfig) -> anyhow::Result<()> {
    args.apply(&mut config);
    let server = Server::prepare(&config)
        .await
        .context("failed to start ixp server")?;
    server.run(shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "cannot listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn lab(command: LabCommand, config: &AppConfig) -> anyhow::Result<()> {
    let client = OrchestratorClient::new(&config.orchestrator)
        .context("invalid orchestrator configuration")?;

    match command {
        LabCommand::Status => print_json(&client.status().await),
        LabCommand::Start { filename } => {
            let lab_hash = client
                .start(&filename)
                .await
                .with_context(|| format!("failed to start lab from {filename}"))?;
            print_json(&serde_json::json!({ "lab_hash": lab_hash }))
        }
        LabCommand::Stop => {
            client.wipe().await.context("failed to stop lab")?;
            println!("lab stopped");
            Ok(())
        }
        LabCommand::Devices => {
            let devices = client.devices().await.context("failed to fetch devices")?;
            print_json(&devices)
        }
        LabCommand::Watch => {
            let handle = LabMonitor::new(client, config.orchestrator.poll_interval()).spawn();
            let mut updates = handle.subscribe();
            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    changed = updates.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let snapshot = updates.borrow_and_update().clone();
                        print_json(&snapshot)?;
                    }
                }
            }
            handle.shutdown().await;
            Ok(())
        }
    }
}
