// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientsError {
    #[error("a dry-run was requested but required flag --deck-url was unset")]
    DeckUrlRequired,

    #[error("invalid --deck-url URI: {0:?}")]
    InvalidDeckUrl(String),

    #[error("error accessing --kubeconfig: {0}")]
    KubeconfigAccess(#[source] std::io::Error),

    #[error("cannot provide --context without --kubeconfig")]
    ContextWithoutKubeconfig,

    #[error("must provide only --build-cluster OR --kubeconfig")]
    ConflictingClusterSources,

    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to load kubeconfig: {0}")]
    KubeconfigError(String),

    #[error("Failed to load build clusters: {0}")]
    BuildClusterError(String),

    #[error("no cluster access: in-cluster config or current kubeconfig context required")]
    NoClusterAccess,

    #[error("Failed to create client for context {context:?}: {source}")]
    ClientConstruction {
        context: String,
        #[source]
        source: kube::Error,
    },

    #[error("resolved infrastructure cluster context to {0:?} but did not find it in the kubeconfig")]
    InfraContextNotFound(String),

    #[error("no dry-run {0} is supported in dry-run mode")]
    DryRunUnsupported(&'static str),

    #[error("the following cluster aliases declared for jobs were not found in loaded clusters: {0:?}")]
    MissingAliases(Vec<String>),

    #[error("Deck request failed: {0}")]
    DeckError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ClientsError>;
