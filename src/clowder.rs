//! Reads job results out of a ClowdJobInvocation dump.

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::Deserialize;

use crate::error::Result;
use crate::types::JobInvocationStatus;

const JOB_COMPLETE: &str = "Complete";

#[derive(Deserialize)]
struct JobInvocationList {
    #[serde(default)]
    items: Vec<JobInvocation>,
}

#[derive(Deserialize)]
struct JobInvocation {
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    status: Option<JobInvocationState>,
}

#[derive(Deserialize)]
struct JobInvocationState {
    #[serde(rename = "jobMap", default)]
    job_map: BTreeMap<String, String>,
}

/// Parse the YAML `List` of ClowdJobInvocations. An invocation is complete
/// when every job in its `status.jobMap` reports `Complete`.
pub fn job_invocation_statuses(dump: &[u8]) -> Result<Vec<JobInvocationStatus>> {
    if dump.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    let list: JobInvocationList = serde_yaml::from_slice(dump)?;
    Ok(list
        .items
        .into_iter()
        .map(|cji| {
            let jobs = cji.status.map(|s| s.job_map).unwrap_or_default();
            JobInvocationStatus {
                name: cji.metadata.name.unwrap_or_default(),
                complete: jobs.values().all(|state| state == JOB_COMPLETE),
                jobs,
            }
        })
        .collect())
}
