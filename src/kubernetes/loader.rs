// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Loading of cluster connection configs from kubeconfig and build-cluster files.

use crate::constants::{DEFAULT_CLUSTER_ALIAS, IN_CLUSTER_CONTEXT};
use crate::error::{ClientsError, Result};
use futures::future::try_join_all;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::Config;
use serde::Deserialize;
use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Cluster configs keyed by context name
#[derive(Clone, Default)]
pub struct ClusterConfigs {
    pub configs: HashMap<String, Config>,
    /// Context the loader considers current
    pub default_context: String,
}

/// Source of cluster connection configs.
pub trait ClusterConfigLoader: Send + Sync {
    fn load(
        &self,
        kubeconfig: Option<&Path>,
        build_cluster: Option<&Path>,
    ) -> impl Future<Output = Result<ClusterConfigs>> + Send;
}

/// Loads the in-cluster config, every kubeconfig context and every build cluster.
#[derive(Clone, Copy, Debug, Default)]
pub struct KubeconfigLoader;

impl ClusterConfigLoader for KubeconfigLoader {
    #[instrument(skip(self))]
    async fn load(
        &self,
        kubeconfig: Option<&Path>,
        build_cluster: Option<&Path>,
    ) -> Result<ClusterConfigs> {
        info!("Loading cluster contexts...");

        let local = match Config::incluster() {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(
                    "Could not create in-cluster config (expected when running outside the cluster): {}",
                    e
                );
                None
            }
        };

        let (kube_configs, current_context) = match kubeconfig {
            Some(path) => kubeconfig_contexts(path).await?,
            None => (HashMap::new(), String::new()),
        };

        let build_configs = match build_cluster {
            Some(path) => Some(build_cluster_configs(path).await?),
            None => None,
        };

        merge_configs(local, kube_configs, current_context, build_configs)
    }
}

/// Load a config for every context in a kubeconfig file
async fn kubeconfig_contexts(path: &Path) -> Result<(HashMap<String, Config>, String)> {
    let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
        ClientsError::KubeconfigError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let current_context = kubeconfig.current_context.clone().unwrap_or_default();

    let loads = kubeconfig.contexts.iter().map(|named| {
        let kubeconfig = kubeconfig.clone();
        let name = named.name.clone();
        async move {
            let options = KubeConfigOptions {
                context: Some(name.clone()),
                ..Default::default()
            };
            let config = Config::from_custom_kubeconfig(kubeconfig, &options)
                .await
                .map_err(|e| {
                    ClientsError::KubeconfigError(format!(
                        "Failed to create config for context {}: {}",
                        name, e
                    ))
                })?;
            debug!("Loaded kubeconfig context {}", name);
            Ok::<_, ClientsError>((name, config))
        }
    });

    let configs = try_join_all(loads).await?.into_iter().collect();
    Ok((configs, current_context))
}

/// A cluster entry in a build-cluster file. Credentials are base64-encoded PEM.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuildCluster {
    pub endpoint: String,
    #[serde(default)]
    pub client_certificate: String,
    #[serde(default)]
    pub client_key: String,
    #[serde(default)]
    pub cluster_ca_certificate: String,
}

/// Parse a build-cluster file: either a map of alias to cluster, or a single
/// cluster which becomes the default alias.
pub fn parse_build_clusters(raw: &str) -> Result<HashMap<String, BuildCluster>> {
    match serde_yaml::from_str::<HashMap<String, BuildCluster>>(raw) {
        Ok(clusters) => Ok(clusters),
        Err(map_err) => {
            let single: BuildCluster = serde_yaml::from_str(raw).map_err(|_| {
                ClientsError::BuildClusterError(format!("Failed to parse cluster map: {}", map_err))
            })?;
            Ok(HashMap::from([(DEFAULT_CLUSTER_ALIAS.to_string(), single)]))
        }
    }
}

async fn build_cluster_configs(path: &Path) -> Result<HashMap<String, Config>> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        ClientsError::BuildClusterError(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let mut configs = HashMap::new();
    for (alias, cluster) in parse_build_clusters(&raw)? {
        let config = build_cluster_config(&alias, &cluster).await?;
        debug!("Loaded build cluster {} at {}", alias, cluster.endpoint);
        configs.insert(alias, config);
    }
    Ok(configs)
}

/// Turn a build-cluster entry into a client config via a one-context kubeconfig
pub async fn build_cluster_config(alias: &str, cluster: &BuildCluster) -> Result<Config> {
    let mut cluster_entry = serde_json::json!({ "server": cluster.endpoint });
    if !cluster.cluster_ca_certificate.is_empty() {
        cluster_entry["certificate-authority-data"] = cluster.cluster_ca_certificate.clone().into();
    }

    let mut user_entry = serde_json::json!({});
    if !cluster.client_certificate.is_empty() {
        user_entry["client-certificate-data"] = cluster.client_certificate.clone().into();
    }
    if !cluster.client_key.is_empty() {
        user_entry["client-key-data"] = cluster.client_key.clone().into();
    }

    let kubeconfig: Kubeconfig = serde_json::from_value(serde_json::json!({
        "apiVersion": "v1",
        "kind": "Config",
        "clusters": [{ "name": alias, "cluster": cluster_entry }],
        "users": [{ "name": alias, "user": user_entry }],
        "contexts": [{ "name": alias, "context": { "cluster": alias, "user": alias } }],
        "current-context": alias,
    }))
    .map_err(|e| {
        ClientsError::BuildClusterError(format!("Invalid cluster {}: {}", alias, e))
    })?;

    Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
        .await
        .map_err(|e| ClientsError::BuildClusterError(format!("Invalid cluster {}: {}", alias, e)))
}

/// Combine the config sources into one context map.
///
/// The in-cluster context is always present, and so is the default alias.
pub fn merge_configs(
    local: Option<Config>,
    foreign: HashMap<String, Config>,
    current_context: String,
    build_clusters: Option<HashMap<String, Config>>,
) -> Result<ClusterConfigs> {
    if let Some(clusters) = &build_clusters {
        if !clusters.contains_key(DEFAULT_CLUSTER_ALIAS) {
            return Err(ClientsError::BuildClusterError(format!(
                "build-cluster must have a {:?} context",
                DEFAULT_CLUSTER_ALIAS
            )));
        }
    }

    let mut configs = foreign;
    configs.extend(build_clusters.unwrap_or_default());

    let in_cluster = match local {
        Some(config) => config,
        None if !current_context.is_empty() => configs
            .get(&current_context)
            .cloned()
            .ok_or_else(|| ClientsError::InfraContextNotFound(current_context.clone()))?,
        None => return Err(ClientsError::NoClusterAccess),
    };
    configs.insert(IN_CLUSTER_CONTEXT.to_string(), in_cluster);

    if !configs.contains_key(DEFAULT_CLUSTER_ALIAS) {
        let in_cluster = configs[IN_CLUSTER_CONTEXT].clone();
        configs.insert(DEFAULT_CLUSTER_ALIAS.to_string(), in_cluster);
    }

    Ok(ClusterConfigs {
        configs,
        default_context: current_context,
    })
}
