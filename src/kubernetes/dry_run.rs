// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Read-only ProwJob client backed by deck

use crate::constants::deck::{PROWJOBS_OMIT, PROWJOBS_PATH};
use crate::error::{ClientsError, Result};
use crate::types::ProwJob;
use kube::core::ErrorResponse;
use kube::ResourceExt;
use serde::Deserialize;
use tracing::{info, instrument};

#[derive(Deserialize)]
struct DeckProwJobs {
    #[serde(default)]
    items: Vec<ProwJob>,
}

/// Serves reads from deck's job listing and skips every mutation.
#[derive(Clone, Debug)]
pub struct DryRunProwJobClient {
    deck_url: String,
    http: reqwest::Client,
}

impl DryRunProwJobClient {
    pub fn new(deck_url: impl Into<String>) -> Self {
        Self {
            deck_url: deck_url.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn deck_url(&self) -> &str {
        &self.deck_url
    }

    /// URL of deck's job listing
    pub fn prowjobs_url(&self) -> String {
        format!(
            "{}/{}?omit={}",
            self.deck_url.trim_end_matches('/'),
            PROWJOBS_PATH,
            PROWJOBS_OMIT
        )
    }

    #[instrument(skip(self), fields(deck = %self.deck_url))]
    pub async fn list(&self) -> Result<Vec<ProwJob>> {
        let jobs: DeckProwJobs = self
            .http
            .get(self.prowjobs_url())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(jobs.items)
    }

    pub async fn get(&self, name: &str) -> Result<ProwJob> {
        self.list()
            .await?
            .into_iter()
            .find(|job| job.name_any() == name)
            .ok_or_else(|| not_found(name))
    }

    pub async fn create(&self, job: &ProwJob) -> Result<ProwJob> {
        info!("Dry run: skipping create of ProwJob {}", job.name_any());
        Ok(job.clone())
    }

    pub async fn replace(&self, job: &ProwJob) -> Result<ProwJob> {
        info!("Dry run: skipping update of ProwJob {}", job.name_any());
        Ok(job.clone())
    }

    pub async fn delete(&self, name: &str) -> Result<()> {
        info!("Dry run: skipping delete of ProwJob {}", name);
        Ok(())
    }
}

fn not_found(name: &str) -> ClientsError {
    ClientsError::KubeError(kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message: format!("prowjobs.prow.k8s.io \"{}\" not found", name),
        reason: "NotFound".to_string(),
        code: 404,
    }))
}
