// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Alias build-cluster consumers use when a job names no cluster
pub const DEFAULT_CLUSTER_ALIAS: &str = "default";

/// Context name of the cluster this process runs in
pub const IN_CLUSTER_CONTEXT: &str = "";

/// Deck endpoints used by the dry-run job client
pub mod deck {
    /// Read-only JSON listing of all ProwJobs
    pub const PROWJOBS_PATH: &str = "prowjobs.js";
    /// Fields deck may leave out of the listing
    pub const PROWJOBS_OMIT: &str = "annotations,labels,decoration_config,pod_spec";
}
