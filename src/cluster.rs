//! Cluster access used by the collector.
//!
//! Everything the collector reads from the cluster goes through [`ClusterApi`],
//! so the collection logic can run against a mock in tests and against either
//! the `oc` binary or the API server in production.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::Result;
use crate::types::{Artifact, LogKind, PodDescriptor};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// Short backend name recorded in the collection report.
    fn backend(&self) -> &'static str;

    /// List the pods of a namespace with their regular and init containers.
    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodDescriptor>>;

    /// Fetch the raw log bytes of one container. Empty output is an error.
    async fn get_logs(
        &self,
        namespace: &str,
        pod: &str,
        container: &str,
        kind: LogKind,
    ) -> Result<Vec<u8>>;

    /// Fetch one cluster-level dump, rendered as text or YAML.
    async fn get_resource(&self, namespace: &str, artifact: Artifact) -> Result<Vec<u8>>;
}
