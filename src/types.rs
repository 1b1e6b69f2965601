use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A pod and the names of every container it runs, regular containers first
/// and init containers after, both in the order the cluster reports them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodDescriptor {
    pub name: String,
    pub containers: Vec<String>,
}

/// Which instance of a container to read logs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Current,
    Previous,
}

impl LogKind {
    pub fn file_name(self, pod: &str, container: &str) -> String {
        match self {
            LogKind::Current => format!("{pod}_{container}.log"),
            LogKind::Previous => format!("{pod}_{container}-previous.log"),
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogKind::Current => f.write_str("current"),
            LogKind::Previous => f.write_str("previous"),
        }
    }
}

/// Cluster-level dumps written next to the per-container logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Events,
    All,
    ClowdApp,
    ClowdEnvironment,
    ClowdJobInvocation,
}

impl Artifact {
    pub const ALL: [Artifact; 5] = [
        Artifact::Events,
        Artifact::All,
        Artifact::ClowdApp,
        Artifact::ClowdEnvironment,
        Artifact::ClowdJobInvocation,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Artifact::Events => "oc_get_events.txt",
            Artifact::All => "oc_get_all.yaml",
            Artifact::ClowdApp => "oc_get_clowdapp.yaml",
            Artifact::ClowdEnvironment => "oc_get_clowdenvironment.yaml",
            Artifact::ClowdJobInvocation => "oc_get_clowdjobinvocation.yaml",
        }
    }

    /// ClowdEnvironments are cluster scoped and named after the namespace they serve.
    pub fn environment_name(namespace: &str) -> String {
        format!("env-{namespace}")
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Artifact::Events => "events",
            Artifact::All => "all",
            Artifact::ClowdApp => "clowdapp",
            Artifact::ClowdEnvironment => "clowdenvironment",
            Artifact::ClowdJobInvocation => "clowdjobinvocation",
        };
        f.write_str(name)
    }
}

/// Job results of one ClowdJobInvocation, keyed by job name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobInvocationStatus {
    pub name: String,
    pub jobs: BTreeMap<String, String>,
    pub complete: bool,
}

/// Summary of one collection run, written as `collection_report.yaml`.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionReport {
    pub namespace: String,
    pub backend: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub artifacts_written: Vec<String>,
    pub artifacts_failed: Vec<String>,
    pub job_invocations: Vec<JobInvocationStatus>,
    pub pods_listed: bool,
    pub log_fetches_attempted: usize,
    pub logs_written: usize,
    pub logs_failed: usize,
    pub skipped_names: Vec<String>,
}

impl CollectionReport {
    pub fn new(namespace: &str, backend: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            backend: backend.to_string(),
            started_at: Utc::now(),
            finished_at: None,
            artifacts_written: Vec::new(),
            artifacts_failed: Vec::new(),
            job_invocations: Vec::new(),
            pods_listed: false,
            log_fetches_attempted: 0,
            logs_written: 0,
            logs_failed: 0,
            skipped_names: Vec::new(),
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_names_follow_pod_container_layout() {
        assert_eq!(LogKind::Current.file_name("api-1", "web"), "api-1_web.log");
        assert_eq!(
            LogKind::Previous.file_name("api-1", "web"),
            "api-1_web-previous.log"
        );
    }

    #[test]
    fn artifact_file_names_are_distinct() {
        let mut names: Vec<_> = Artifact::ALL.iter().map(|a| a.file_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Artifact::ALL.len());
    }

    #[test]
    fn environment_name_is_prefixed() {
        assert_eq!(Artifact::environment_name("ephemeral-abc"), "env-ephemeral-abc");
    }
}
