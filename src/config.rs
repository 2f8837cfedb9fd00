// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Flags selecting the infrastructure and build clusters.

use crate::error::{ClientsError, Result};
use clap::Args;
use std::path::PathBuf;

/// Options for talking to the infrastructure cluster and the build clusters.
///
/// Flatten into a `clap::Parser` to register the flags.
#[derive(Args, Debug, Clone, Default)]
pub struct KubernetesOptions {
    /// Path to a build cluster YAML file. All clusters in it are used as build clusters.
    /// Cannot be combined with --kubeconfig.
    #[arg(long = "build-cluster", value_name = "PATH")]
    pub build_cluster: Option<PathBuf>,

    /// Path to a kubeconfig file. All contexts other than the default or the one passed
    /// to --context are used as build clusters. Cannot be combined with --build-cluster.
    #[arg(long, value_name = "PATH")]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use for the infrastructure client
    #[arg(long, value_name = "CONTEXT")]
    pub context: Option<String>,

    /// Deck URI for read-only access to the infrastructure cluster
    #[arg(long = "deck-url", value_name = "URI")]
    pub deck_url: Option<String>,
}

impl KubernetesOptions {
    /// Check the flag combination without touching any cluster.
    pub fn validate(&self, dry_run: bool) -> Result<()> {
        let deck_url = non_empty(self.deck_url.as_deref());
        let kubeconfig = self.kubeconfig.as_ref().filter(|p| !p.as_os_str().is_empty());

        if dry_run && deck_url.is_none() {
            return Err(ClientsError::DeckUrlRequired);
        }

        if let Some(uri) = deck_url {
            if url::Url::parse(uri).is_err() {
                return Err(ClientsError::InvalidDeckUrl(uri.to_string()));
            }
        }

        if let Some(path) = kubeconfig {
            std::fs::metadata(path).map_err(ClientsError::KubeconfigAccess)?;
        }

        if non_empty(self.context.as_deref()).is_some() && kubeconfig.is_none() {
            return Err(ClientsError::ContextWithoutKubeconfig);
        }

        let build_cluster = self.build_cluster.as_ref().filter(|p| !p.as_os_str().is_empty());
        if kubeconfig.is_some() && build_cluster.is_some() {
            return Err(ClientsError::ConflictingClusterSources);
        }

        Ok(())
    }

    /// Deck URI, empty when unset
    pub fn deck_url(&self) -> &str {
        self.deck_url.as_deref().unwrap_or_default()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn existing_file() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml")
    }

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        kubernetes: KubernetesOptions,
    }

    #[test]
    fn test_flags_are_registered() {
        let cli = TestCli::try_parse_from([
            "test",
            "--kubeconfig",
            "/etc/kube/config",
            "--context",
            "infra",
            "--deck-url",
            "http://deck",
        ])
        .unwrap();

        assert_eq!(cli.kubernetes.kubeconfig, Some(PathBuf::from("/etc/kube/config")));
        assert_eq!(cli.kubernetes.context.as_deref(), Some("infra"));
        assert_eq!(cli.kubernetes.deck_url(), "http://deck");
        assert!(cli.kubernetes.build_cluster.is_none());
    }

    #[test]
    fn test_build_cluster_flag() {
        let cli =
            TestCli::try_parse_from(["test", "--build-cluster", "/etc/clusters.yaml"]).unwrap();
        assert_eq!(
            cli.kubernetes.build_cluster,
            Some(PathBuf::from("/etc/clusters.yaml"))
        );
    }

    #[test]
    fn test_validate_empty_options() {
        assert!(KubernetesOptions::default().validate(false).is_ok());
    }

    #[test]
    fn test_validate_dry_run_requires_deck_url() {
        let err = KubernetesOptions::default().validate(true).unwrap_err();
        assert!(matches!(err, ClientsError::DeckUrlRequired));

        let options = KubernetesOptions {
            deck_url: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(
            options.validate(true),
            Err(ClientsError::DeckUrlRequired)
        ));
    }

    #[test]
    fn test_validate_dry_run_with_deck_url() {
        let options = KubernetesOptions {
            deck_url: Some("http://deck.example.com".to_string()),
            ..Default::default()
        };
        assert!(options.validate(true).is_ok());
    }

    #[test]
    fn test_validate_invalid_deck_url() {
        let options = KubernetesOptions {
            deck_url: Some("not a uri".to_string()),
            ..Default::default()
        };
        let err = options.validate(false).unwrap_err();
        assert!(matches!(err, ClientsError::InvalidDeckUrl(ref u) if u == "not a uri"));
    }

    #[test]
    fn test_validate_missing_kubeconfig() {
        let options = KubernetesOptions {
            kubeconfig: Some(PathBuf::from("/does/not/exist/kubeconfig")),
            ..Default::default()
        };
        assert!(matches!(
            options.validate(false),
            Err(ClientsError::KubeconfigAccess(_))
        ));
    }

    #[test]
    fn test_validate_existing_kubeconfig_with_context() {
        let options = KubernetesOptions {
            kubeconfig: Some(existing_file()),
            context: Some("infra".to_string()),
            ..Default::default()
        };
        assert!(options.validate(false).is_ok());
    }

    #[test]
    fn test_validate_context_without_kubeconfig() {
        let options = KubernetesOptions {
            context: Some("infra".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            options.validate(false),
            Err(ClientsError::ContextWithoutKubeconfig)
        ));
    }

    #[test]
    fn test_validate_build_cluster_and_kubeconfig_conflict() {
        let options = KubernetesOptions {
            kubeconfig: Some(existing_file()),
            build_cluster: Some(PathBuf::from("/etc/clusters.yaml")),
            ..Default::default()
        };
        assert!(matches!(
            options.validate(false),
            Err(ClientsError::ConflictingClusterSources)
        ));
    }

    #[test]
    fn test_validate_build_cluster_alone() {
        let options = KubernetesOptions {
            build_cluster: Some(PathBuf::from("/etc/clusters.yaml")),
            ..Default::default()
        };
        assert!(options.validate(false).is_ok());
    }
}
