//! Den - deployment tool for the Den container stack
//!
//! This is the main CLI entry point.

use anyhow::Context;
use clap::{Parser, Subcommand};
use den_deploy::compose::{self, Composer, ExportKind};
use den_deploy::config::ConfigStore;
use den_deploy::container::{DockerRuntime, RuntimeApplier, DEFAULT_DOCKER_URL};
use den_deploy::routing::RoutingPusher;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Den - compose and deploy the Den container stack
#[derive(Parser)]
#[command(name = "den")]
#[command(author = "Evoker Industries")]
#[command(version)]
#[command(about = "Compose the Den deployment into live containers or static manifests", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Deployment home (defaults to $DEN_HOME, then the current directory)
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stage secrets and write docker-compose.yml and the Traefik routing file
    Export {
        /// Deployment root for the manifest and staged files (defaults to the deployment home)
        #[arg(short, long)]
        path: Option<PathBuf>,
        /// Only write the routing file
        #[arg(long)]
        traefik_only: bool,
    },

    /// Stage secrets and start every service on the container runtime
    Up {
        /// Docker Engine API URL
        #[arg(long, default_value = DEFAULT_DOCKER_URL)]
        docker_url: String,
    },

    /// Send the current routing rules to the running proxy
    PushRouting {
        /// Give up after this many seconds
        #[arg(short, long)]
        timeout: Option<u64>,
    },

    /// Store a web certificate and private key for TLS
    SetWebCertificate {
        /// Folder holding both files
        #[arg(long)]
        folder: PathBuf,
        /// Certificate file name
        #[arg(long)]
        certificate: String,
        /// Private key file name
        #[arg(long)]
        private_key: String,
    },

    /// Show the composed services
    Show,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        if let Some(den) = e.downcast_ref::<den_deploy::DenError>() {
            if den.requires_restart() {
                eprintln!("Restart the deployment to apply the new routing.");
            }
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let home = ConfigStore::resolve_home(cli.home)?;
    let store = ConfigStore::open(&home);

    match cli.command {
        Commands::Export { path, traefik_only } => {
            let config = store.load()?;

            let kind = if traefik_only {
                ExportKind::RoutingOnly
            } else {
                ExportKind::Compose
            };
            let root = path.unwrap_or_else(|| home.clone());
            let written = compose::export_deployment(&config, &root, kind)
                .with_context(|| format!("Failed to export to {}", root.display()))?;

            for path in written {
                println!("{}", path.display());
            }
        }

        Commands::Up { docker_url } => {
            let config = store.load()?;
            let topology = Composer::new(&home).compose_and_stage(&config)?;

            let applier = RuntimeApplier::new(DockerRuntime::with_url(&docker_url)?);
            let handles = applier.apply(&topology).await?;

            println!("{:<16} CONTAINER ID", "SERVICE");
            for handle in handles {
                println!("{:<16} {}", handle.service, handle.container_id);
            }
        }

        Commands::PushRouting { timeout } => {
            let config = store.load()?;
            let topology = Composer::new(&home).compose(&config)?;
            let rules = topology.routing()?.rules();

            let api_port = config.proxy.api_port;
            let pusher = match timeout {
                Some(secs) => RoutingPusher::with_timeout(api_port, Duration::from_secs(secs))?,
                None => RoutingPusher::new(api_port)?,
            };
            pusher.push(&rules).await?;

            println!("Routing updated ({} frontends)", rules.frontends.len());
        }

        Commands::SetWebCertificate {
            folder,
            certificate,
            private_key,
        } => {
            store.set_web_certificate(&folder, &certificate, &private_key)?;
            println!("Web certificate stored in {}", store.path().display());
        }

        Commands::Show => {
            let config = store.load()?;
            let topology = Composer::new(&home).compose(&config)?;

            println!(
                "Platform: {}  Network: {}",
                topology.context.platform, topology.context.network
            );
            println!("{:<12} {:<40} {:<20} ROUTES", "SERVICE", "IMAGE", "PORTS");
            for descriptor in &topology.descriptors {
                let ports: Vec<String> = descriptor
                    .ports
                    .iter()
                    .map(|p| p.container_port.to_string())
                    .collect();
                let routes: Vec<&str> = descriptor
                    .exposure
                    .iter()
                    .flat_map(|e| e.routes.iter().map(|r| r.name.as_str()))
                    .collect();
                println!(
                    "{:<12} {:<40} {:<20} {}",
                    descriptor.name,
                    descriptor.image,
                    ports.join(","),
                    routes.join(",")
                );
            }
        }
    }

    Ok(())
}
