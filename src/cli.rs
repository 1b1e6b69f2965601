use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::collector::CollectOptions;
use crate::utils::is_valid_namespace;

/// Namespaces become a path component, so only DNS-1123 labels are accepted.
fn parse_namespace(value: &str) -> Result<String, String> {
    if is_valid_namespace(value) {
        Ok(value.to_string())
    } else {
        Err(format!(
            "'{}' is not a valid namespace (lowercase alphanumerics and '-', at most 63 characters)",
            value
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Shell out to the `oc` binary
    Oc,
    /// Talk to the API server through the kubeconfig
    Kube,
}

#[derive(Parser, Debug)]
#[command(name = "collect-logs")]
#[command(about = "Collect cluster artifacts and container logs from a namespace")]
pub struct Cli {
    /// Namespace to collect from
    #[arg(value_parser = parse_namespace)]
    pub namespace: String,

    /// Directory the k8s_artifacts tree is written under
    pub artifacts_dir: PathBuf,

    /// How to reach the cluster
    #[arg(long, value_enum, env = "COLLECT_LOGS_BACKEND", default_value = "oc")]
    pub backend: Backend,

    /// Path to the oc binary
    #[arg(long, env = "OC_BIN", default_value = "oc")]
    pub oc_bin: String,

    /// Kubeconfig context
    #[arg(long)]
    pub context: Option<String>,

    /// Maximum cluster reads in flight
    #[arg(long, env = "COLLECT_LOGS_CONCURRENCY", default_value_t = 1,
          value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: u16,

    /// Abort on the first failed artifact query
    #[arg(long)]
    pub fail_fast: bool,

    /// Do not write collection_report.yaml
    #[arg(long)]
    pub no_report: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn collect_options(&self) -> CollectOptions {
        CollectOptions {
            concurrency: usize::from(self.concurrency),
            fail_fast: self.fail_fast,
            write_report: !self.no_report,
        }
    }
}
