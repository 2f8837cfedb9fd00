// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for config loading, client creation, and ProwJob access.

pub mod client;
pub mod dry_run;
pub mod loader;
pub mod prowjobs;

pub use client::{ClientFactory, KubeClientFactory, ProwJobClientset};
pub use dry_run::DryRunProwJobClient;
pub use loader::{ClusterConfigLoader, ClusterConfigs, KubeconfigLoader};
pub use prowjobs::ProwJobClient;
