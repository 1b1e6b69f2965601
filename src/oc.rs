//! `oc` backend: every cluster read is a child `oc` process.

use std::ffi::{OsStr, OsString};
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use k8s_openapi::api::core::v1::Pod;

use crate::cluster::ClusterApi;
use crate::error::{Error, Result};
use crate::types::{Artifact, LogKind, PodDescriptor};
use crate::utils::pod_descriptor;

/// `oc get pods --output json` returns a generic `List`, not a `PodList`.
#[derive(Deserialize)]
struct PodListing {
    #[serde(default)]
    items: Vec<Pod>,
}

#[derive(Debug, Clone)]
pub struct OcCli {
    program: OsString,
    context: Option<String>,
}

impl OcCli {
    pub fn new(program: impl Into<OsString>, context: Option<String>) -> Self {
        Self {
            program: program.into(),
            context,
        }
    }

    /// Arguments for one of the cluster-level dumps.
    pub fn resource_args(namespace: &str, artifact: Artifact) -> Vec<String> {
        let mut args: Vec<String> = vec!["get".into()];
        match artifact {
            Artifact::Events => {
                args.push("events".into());
                args.push("--sort-by=.lastTimestamp".into());
            }
            Artifact::All => args.push("all".into()),
            Artifact::ClowdApp => args.push("clowdapp".into()),
            Artifact::ClowdEnvironment => {
                args.push("clowdenvironment".into());
                args.push(Artifact::environment_name(namespace));
            }
            Artifact::ClowdJobInvocation => args.push("clowdjobinvocation".into()),
        }
        args.push("--namespace".into());
        args.push(namespace.into());
        if artifact != Artifact::Events {
            args.push("--output".into());
            args.push("yaml".into());
        }
        args
    }

    pub fn logs_args(namespace: &str, pod: &str, container: &str, kind: LogKind) -> Vec<String> {
        let mut args = vec![
            "logs".to_string(),
            pod.to_string(),
            "--namespace".to_string(),
            namespace.to_string(),
            "--container".to_string(),
            container.to_string(),
        ];
        if kind == LogKind::Previous {
            args.push("--previous".to_string());
        }
        args
    }

    pub fn list_pods_args(namespace: &str) -> Vec<String> {
        ["get", "pods", "--namespace", namespace, "--output", "json"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn describe(&self, args: &[String]) -> String {
        format!("{} {}", self.program.to_string_lossy(), args.join(" "))
    }

    /// Run `oc` with `args` and return its stdout untouched. Non-zero exits
    /// become errors.
    async fn run(&self, args: Vec<String>) -> Result<Vec<u8>> {
        let mut command = Command::new(&self.program);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(context) = &self.context {
            command.arg("--context").arg(context);
        }
        command.args(&args);

        debug!("running {}", self.describe(&args));
        let output = command.output().await.map_err(|source| Error::Spawn {
            program: self.program.to_string_lossy().into_owned(),
            source,
        })?;

        if !output.status.success() {
            return Err(Error::CommandFailed {
                command: self.describe(&args),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

#[async_trait]
impl ClusterApi for OcCli {
    fn backend(&self) -> &'static str {
        "oc"
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodDescriptor>> {
        let stdout = self.run(Self::list_pods_args(namespace)).await?;
        let listing: PodListing = serde_json::from_slice(&stdout)?;
        Ok(listing.items.iter().filter_map(pod_descriptor).collect())
    }

    async fn get_logs(
        &self,
        namespace: &str,
        pod: &str,
        container: &str,
        kind: LogKind,
    ) -> Result<Vec<u8>> {
        let args = Self::logs_args(namespace, pod, container, kind);
        let command = self.describe(&args);
        let stdout = self.run(args).await?;
        if stdout.is_empty() {
            return Err(Error::EmptyOutput { command });
        }
        Ok(stdout)
    }

    async fn get_resource(&self, namespace: &str, artifact: Artifact) -> Result<Vec<u8>> {
        self.run(Self::resource_args(namespace, artifact)).await
    }
}

/// Run `program` with `args`, sharing this process's stdio, and return the
/// exit code the caller should exit with.
pub fn passthrough<I, S>(program: &OsStr, args: I) -> std::io::Result<i32>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let status = std::process::Command::new(program).args(args).status()?;
    Ok(exit_code(status))
}

/// Map a child's exit status to our own. Signals follow the shell convention.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
