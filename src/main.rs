// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use clap::Parser;
use kube::api::ListParams;
use std::collections::BTreeSet;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cluster_clients::{ClusterClients, KubernetesOptions};

/// Check access to the infrastructure and build clusters
#[derive(Parser, Debug)]
#[command(name = "cluster-clients", version, about)]
struct Cli {
    #[command(flatten)]
    kubernetes: KubernetesOptions,

    /// Only read from deck, never contact the clusters
    #[arg(long)]
    dry_run: bool,

    /// Namespace holding ProwJobs in the infrastructure cluster
    #[arg(long, default_value = "default")]
    prowjob_namespace: String,

    /// Namespace of job pods in the build clusters
    #[arg(long, default_value = "test-pods")]
    pod_namespace: String,

    /// Build cluster alias that must be available (repeatable)
    #[arg(long = "cluster-alias", value_name = "ALIAS")]
    cluster_aliases: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing, defaulting to info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    cli.kubernetes.validate(cli.dry_run)?;

    let clients = ClusterClients::new(cli.kubernetes);

    let prowjobs = clients
        .prowjob_client(&cli.prowjob_namespace, cli.dry_run)
        .await?;
    let jobs = prowjobs.list().await?;
    info!(
        "Found {} ProwJobs{}",
        jobs.len(),
        if prowjobs.is_dry_run() { " (from deck)" } else { "" }
    );

    if clients.is_dry_run() {
        warn!("Dry run: skipping build cluster checks");
        return Ok(());
    }

    let mut known_aliases: BTreeSet<String> = cli.cluster_aliases.into_iter().collect();
    known_aliases.extend(jobs.iter().map(|job| job.cluster_alias().to_string()));

    let build_clusters = clients
        .build_cluster_clients(&cli.pod_namespace, cli.dry_run, &known_aliases)
        .await?;

    for (alias, pods) in &build_clusters {
        match pods.list(&ListParams::default()).await {
            Ok(list) => info!(
                "Build cluster {}: {} pods in {}",
                alias,
                list.items.len(),
                cli.pod_namespace
            ),
            Err(e) => warn!("Build cluster {}: failed to list pods: {}", alias, e),
        }
    }

    Ok(())
}
