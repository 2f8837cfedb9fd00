// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! ProwJob access that works the same in live and dry-run mode

use crate::error::Result;
use crate::kubernetes::dry_run::DryRunProwJobClient;
use crate::types::ProwJob;
use kube::{
    api::{DeleteParams, ListParams, PostParams},
    Api, ResourceExt,
};

/// ProwJob client for a single namespace, or a read-only stand-in
#[derive(Clone)]
pub enum ProwJobClient {
    Live(Api<ProwJob>),
    DryRun(DryRunProwJobClient),
}

impl ProwJobClient {
    pub fn is_dry_run(&self) -> bool {
        matches!(self, ProwJobClient::DryRun(_))
    }

    pub async fn get(&self, name: &str) -> Result<ProwJob> {
        match self {
            ProwJobClient::Live(api) => Ok(api.get(name).await?),
            ProwJobClient::DryRun(client) => client.get(name).await,
        }
    }

    pub async fn list(&self) -> Result<Vec<ProwJob>> {
        match self {
            ProwJobClient::Live(api) => Ok(api.list(&ListParams::default()).await?.items),
            ProwJobClient::DryRun(client) => client.list().await,
        }
    }

    pub async fn create(&self, job: &ProwJob) -> Result<ProwJob> {
        match self {
            ProwJobClient::Live(api) => Ok(api.create(&PostParams::default(), job).await?),
            ProwJobClient::DryRun(client) => client.create(job).await,
        }
    }

    /// Replace the stored job with this one
    pub async fn replace(&self, job: &ProwJob) -> Result<ProwJob> {
        match self {
            ProwJobClient::Live(api) => Ok(api
                .replace(&job.name_any(), &PostParams::default(), job)
                .await?),
            ProwJobClient::DryRun(client) => client.replace(job).await,
        }
    }

    pub async fn delete(&self, name: &str) -> Result<()> {
        match self {
            ProwJobClient::Live(api) => {
                api.delete(name, &DeleteParams::default()).await?;
                Ok(())
            }
            ProwJobClient::DryRun(client) => client.delete(name).await,
        }
    }
}
