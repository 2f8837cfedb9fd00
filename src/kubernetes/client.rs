// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Client construction from resolved cluster configs

use crate::types::ProwJob;
use kube::{Api, Client, Config};

/// Typed access to the ProwJob API of the infrastructure cluster
#[derive(Clone)]
pub struct ProwJobClientset {
    client: Client,
}

impl ProwJobClientset {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// ProwJobs in a single namespace
    pub fn prowjobs(&self, namespace: &str) -> Api<ProwJob> {
        Api::namespaced(self.client.clone(), namespace)
    }

    /// Underlying client, for informers and watchers
    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Builds clients for cluster configs.
pub trait ClientFactory: Send + Sync {
    /// Create a generic client for a cluster
    fn kubernetes_client(&self, config: Config) -> Result<Client, kube::Error>;

    /// Create a ProwJob clientset for the infrastructure cluster
    fn prowjob_clientset(&self, config: Config) -> Result<ProwJobClientset, kube::Error>;
}

/// Factory backed by the kube client stack
#[derive(Clone, Copy, Debug, Default)]
pub struct KubeClientFactory;

impl ClientFactory for KubeClientFactory {
    fn kubernetes_client(&self, config: Config) -> Result<Client, kube::Error> {
        Client::try_from(config)
    }

    fn prowjob_clientset(&self, config: Config) -> Result<ProwJobClientset, kube::Error> {
        Client::try_from(config).map(ProwJobClientset::new)
    }
}
