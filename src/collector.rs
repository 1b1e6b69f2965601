//! Dumps cluster diagnostics and container logs for one namespace.
//!
//! Layout under the artifacts directory:
//!
//! ```text
//! k8s_artifacts/<namespace>/oc_get_*.{txt,yaml}
//! k8s_artifacts/<namespace>/logs/<pod>_<container>.log
//! k8s_artifacts/<namespace>/logs/<pod>_<container>-previous.log
//! k8s_artifacts/<namespace>/collection_report.yaml
//! ```

use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::clowder::job_invocation_statuses;
use crate::cluster::ClusterApi;
use crate::error::{Error, Result};
use crate::types::{Artifact, CollectionReport, LogKind};
use crate::utils::{is_valid_container_name, is_valid_namespace, is_valid_pod_name};

pub const REPORT_FILE: &str = "collection_report.yaml";

#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// Maximum number of cluster reads in flight. 1 keeps everything sequential.
    pub concurrency: usize,
    /// Abort on the first failed artifact query instead of recording it.
    pub fail_fast: bool,
    pub write_report: bool,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            fail_fast: false,
            write_report: true,
        }
    }
}

/// `<artifacts_dir>/k8s_artifacts/<namespace>`
pub fn namespace_dir(artifacts_dir: &Path, namespace: &str) -> PathBuf {
    artifacts_dir.join("k8s_artifacts").join(namespace)
}

async fn create_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| Error::CreateDir {
            path: path.to_path_buf(),
            source,
        })
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// Run both collection steps and write the report.
pub async fn collect<A>(
    api: &A,
    namespace: &str,
    artifacts_dir: &Path,
    options: &CollectOptions,
) -> Result<CollectionReport>
where
    A: ClusterApi + ?Sized,
{
    if !is_valid_namespace(namespace) {
        return Err(Error::InvalidNamespace(namespace.to_string()));
    }
    let target = namespace_dir(artifacts_dir, namespace);
    let mut report = CollectionReport::new(namespace, api.backend());

    info!("Collecting artifacts for namespace {} into {}", namespace, target.display());
    collect_k8s_artifacts(api, namespace, &target, options, &mut report).await?;
    get_pod_logs(api, namespace, &target, options, &mut report).await?;
    report.finish();

    if options.write_report {
        let yaml = serde_yaml::to_string(&report)?;
        write_file(&target.join(REPORT_FILE), yaml.as_bytes()).await?;
    }

    info!(
        "Collection finished: {} artifacts written, {} failed; {} of {} log fetches written",
        report.artifacts_written.len(),
        report.artifacts_failed.len(),
        report.logs_written,
        report.log_fetches_attempted
    );
    Ok(report)
}

/// Write the five cluster-level dumps into `target`.
pub async fn collect_k8s_artifacts<A>(
    api: &A,
    namespace: &str,
    target: &Path,
    options: &CollectOptions,
    report: &mut CollectionReport,
) -> Result<()>
where
    A: ClusterApi + ?Sized,
{
    create_dir(target).await?;

    let mut results = stream::iter(Artifact::ALL)
        .map(|artifact| async move { (artifact, api.get_resource(namespace, artifact).await) })
        .buffered(options.concurrency.max(1));

    while let Some((artifact, result)) = results.next().await {
        let path = target.join(artifact.file_name());
        match result {
            Ok(contents) => {
                write_file(&path, &contents).await?;
                debug!("Wrote {}", path.display());
                report.artifacts_written.push(artifact.file_name().to_string());
                if artifact == Artifact::ClowdJobInvocation {
                    record_job_invocations(&contents, report);
                }
            }
            Err(e) if options.fail_fast => return Err(e),
            Err(e) => {
                warn!("Failed to get {} in namespace {}: {}", artifact, namespace, e);
                report.artifacts_failed.push(artifact.file_name().to_string());
                remove_stale(&path).await;
            }
        }
    }
    Ok(())
}

/// Record the job results of the dumped ClowdJobInvocations. Unfinished or
/// failed jobs are warned about but never fail the collection.
fn record_job_invocations(dump: &[u8], report: &mut CollectionReport) {
    match job_invocation_statuses(dump) {
        Ok(statuses) => {
            for cji in &statuses {
                if cji.complete {
                    info!("ClowdJobInvocation {}: all {} jobs complete", cji.name, cji.jobs.len());
                } else {
                    warn!("ClowdJobInvocation {} has unfinished jobs: {:?}", cji.name, cji.jobs);
                }
            }
            report.job_invocations = statuses;
        }
        Err(e) => warn!("Could not read job status from ClowdJobInvocation dump: {}", e),
    }
}

/// Write current and previous logs for every container of every pod into
/// `target/logs`. Fetch failures are logged and skipped.
pub async fn get_pod_logs<A>(
    api: &A,
    namespace: &str,
    target: &Path,
    options: &CollectOptions,
    report: &mut CollectionReport,
) -> Result<()>
where
    A: ClusterApi + ?Sized,
{
    let logs_dir = target.join("logs");
    create_dir(&logs_dir).await?;

    let pods = match api.list_pods(namespace).await {
        Ok(pods) => pods,
        Err(e) => {
            warn!("Failed to list pods in namespace {}: {}", namespace, e);
            return Ok(());
        }
    };
    report.pods_listed = true;
    debug!("Found {} pods in namespace {}", pods.len(), namespace);

    let mut fetches = Vec::new();
    for pod in &pods {
        if !is_valid_pod_name(&pod.name) {
            warn!("Skipping pod with unusable name {:?}", pod.name);
            report.skipped_names.push(pod.name.clone());
            continue;
        }
        for container in &pod.containers {
            if !is_valid_container_name(container) {
                warn!("Skipping container {:?} of pod {}", container, pod.name);
                report.skipped_names.push(format!("{}/{}", pod.name, container));
                continue;
            }
            for kind in [LogKind::Current, LogKind::Previous] {
                fetches.push((pod.name.as_str(), container.as_str(), kind));
            }
        }
    }

    let mut results = stream::iter(fetches)
        .map(|(pod, container, kind)| async move {
            let result = api.get_logs(namespace, pod, container, kind).await;
            (pod, container, kind, result)
        })
        .buffered(options.concurrency.max(1));

    while let Some((pod, container, kind, result)) = results.next().await {
        report.log_fetches_attempted += 1;
        let path = logs_dir.join(kind.file_name(pod, container));
        match result {
            Ok(logs) => {
                write_file(&path, &logs).await?;
                report.logs_written += 1;
            }
            Err(e) => {
                if e.is_empty_output() {
                    debug!("No {} logs for {}/{}", kind, pod, container);
                } else {
                    warn!("Failed to get {} logs for {}/{}: {}", kind, pod, container, e);
                }
                report.logs_failed += 1;
                remove_stale(&path).await;
            }
        }
    }
    Ok(())
}

/// Drop a file left by an earlier run so the slot reflects this run.
async fn remove_stale(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!("Removed stale {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Could not remove stale {}: {}", path.display(), e),
    }
}
