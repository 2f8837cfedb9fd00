// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Lazily resolved, cached clients for the infrastructure and build clusters.

use crate::config::KubernetesOptions;
use crate::constants::DEFAULT_CLUSTER_ALIAS;
use crate::error::{ClientsError, Result};
use crate::kubernetes::{
    ClientFactory, ClusterConfigLoader, DryRunProwJobClient, KubeClientFactory, KubeconfigLoader,
    ProwJobClient, ProwJobClientset,
};
use k8s_openapi::api::core::v1::Pod;
use kube::{Api, Client};
use std::collections::{BTreeSet, HashMap};
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

/// Outcome of the one-time resolution
enum Resolution {
    DryRun,
    Live(LiveClients),
}

struct LiveClients {
    infra_context: String,
    prowjob_clientset: ProwJobClientset,
    clients_by_context: HashMap<String, Client>,
}

/// Clients for the infrastructure cluster and the build clusters.
///
/// Nothing is loaded until the first accessor call. The first call decides
/// whether this instance runs in dry-run mode; later calls reuse that result.
/// A failed resolution stores nothing, so the next call starts over.
pub struct ClusterClients<L = KubeconfigLoader, F = KubeClientFactory> {
    options: KubernetesOptions,
    loader: L,
    factory: F,
    resolution: OnceCell<Resolution>,
}

impl ClusterClients {
    pub fn new(options: KubernetesOptions) -> Self {
        Self::with_parts(options, KubeconfigLoader, KubeClientFactory)
    }
}

impl<L: ClusterConfigLoader, F: ClientFactory> ClusterClients<L, F> {
    pub fn with_parts(options: KubernetesOptions, loader: L, factory: F) -> Self {
        Self {
            options,
            loader,
            factory,
            resolution: OnceCell::new(),
        }
    }

    pub fn options(&self) -> &KubernetesOptions {
        &self.options
    }

    /// Whether resolution happened in dry-run mode. False while unresolved.
    pub fn is_dry_run(&self) -> bool {
        matches!(self.resolution.get(), Some(Resolution::DryRun))
    }

    /// Infrastructure context picked during resolution
    pub fn infra_context(&self) -> Option<&str> {
        match self.resolution.get() {
            Some(Resolution::Live(live)) => Some(&live.infra_context),
            _ => None,
        }
    }

    /// Load all clients once. Calls after a successful resolution are no-ops.
    pub async fn resolve(&self, dry_run: bool) -> Result<()> {
        self.resolved(dry_run).await.map(|_| ())
    }

    async fn resolved(&self, dry_run: bool) -> Result<&Resolution> {
        self.resolution
            .get_or_try_init(|| self.load(dry_run))
            .await
    }

    #[instrument(skip(self))]
    async fn load(&self, dry_run: bool) -> Result<Resolution> {
        if dry_run {
            info!("Dry run: not loading any cluster clients");
            return Ok(Resolution::DryRun);
        }

        let loaded = self
            .loader
            .load(
                self.options.kubeconfig.as_deref(),
                self.options.build_cluster.as_deref(),
            )
            .await?;

        let mut clients_by_context = HashMap::with_capacity(loaded.configs.len());
        for (context, config) in &loaded.configs {
            let client = self
                .factory
                .kubernetes_client(config.clone())
                .map_err(|source| ClientsError::ClientConstruction {
                    context: context.clone(),
                    source,
                })?;
            debug!("Created client for context {:?}", context);
            clients_by_context.insert(context.clone(), client);
        }

        let infra_context = match self.options.context.as_deref() {
            Some(context) if !context.is_empty() => context.to_string(),
            _ => loaded.default_context,
        };
        let Some(infra_config) = loaded.configs.get(&infra_context) else {
            return Err(ClientsError::InfraContextNotFound(infra_context));
        };
        let prowjob_clientset = self
            .factory
            .prowjob_clientset(infra_config.clone())
            .map_err(|source| ClientsError::ClientConstruction {
                context: infra_context.clone(),
                source,
            })?;

        info!(
            "Resolved {} cluster contexts, infrastructure context {:?}",
            clients_by_context.len(),
            infra_context
        );

        Ok(Resolution::Live(LiveClients {
            infra_context,
            prowjob_clientset,
            clients_by_context,
        }))
    }

    /// ProwJob clientset for informer factories. Not available in dry-run mode.
    pub async fn prowjob_clientset(&self, dry_run: bool) -> Result<ProwJobClientset> {
        match self.resolved(dry_run).await? {
            Resolution::DryRun => Err(ClientsError::DryRunUnsupported("prowjob clientset")),
            Resolution::Live(live) => Ok(live.prowjob_clientset.clone()),
        }
    }

    /// ProwJob client for a namespace. In dry-run mode it reads from deck instead.
    pub async fn prowjob_client(&self, namespace: &str, dry_run: bool) -> Result<ProwJobClient> {
        match self.resolved(dry_run).await? {
            Resolution::DryRun => Ok(ProwJobClient::DryRun(DryRunProwJobClient::new(
                self.options.deck_url(),
            ))),
            Resolution::Live(live) => Ok(ProwJobClient::Live(
                live.prowjob_clientset.prowjobs(namespace),
            )),
        }
    }

    /// Client for the infrastructure cluster. Not available in dry-run mode.
    pub async fn infrastructure_cluster_client(&self, dry_run: bool) -> Result<Client> {
        match self.resolved(dry_run).await? {
            Resolution::DryRun => Err(ClientsError::DryRunUnsupported("kubernetes client")),
            // load() only stores a resolution whose infra context has a client
            Resolution::Live(live) => live
                .clients_by_context
                .get(&live.infra_context)
                .cloned()
                .ok_or_else(|| ClientsError::InfraContextNotFound(live.infra_context.clone())),
        }
    }

    /// Pod clients for the build clusters, keyed by alias rather than context.
    ///
    /// Fails when any of `known_aliases` has no loaded cluster.
    pub async fn build_cluster_clients(
        &self,
        namespace: &str,
        dry_run: bool,
        known_aliases: &BTreeSet<String>,
    ) -> Result<HashMap<String, Api<Pod>>> {
        let live = match self.resolved(dry_run).await? {
            Resolution::DryRun => {
                return Err(ClientsError::DryRunUnsupported(
                    "pod client for build clusters",
                ))
            }
            Resolution::Live(live) => live,
        };

        let build_clients: HashMap<String, Api<Pod>> =
            contexts_to_aliases(&live.clients_by_context, &live.infra_context)
                .into_iter()
                .map(|(alias, client)| (alias, Api::namespaced(client, namespace)))
                .collect();

        let missing: Vec<String> = known_aliases
            .iter()
            .filter(|alias| !build_clients.contains_key(alias.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ClientsError::MissingAliases(missing));
        }

        Ok(build_clients)
    }
}

/// Re-key clients from context to build-cluster alias.
///
/// Unless a context is literally named "default", the infrastructure context
/// is exposed as the "default" alias so that alias always exists.
pub fn contexts_to_aliases<T: Clone>(
    by_context: &HashMap<String, T>,
    infra_context: &str,
) -> HashMap<String, T> {
    let literal_default = by_context.contains_key(DEFAULT_CLUSTER_ALIAS);
    by_context
        .iter()
        .map(|(context, client)| {
            let alias = if !literal_default && context == infra_context {
                DEFAULT_CLUSTER_ALIAS.to_string()
            } else {
                context.clone()
            };
            (alias, client.clone())
        })
        .collect()
}
