use std::fmt;
use std::sync::LazyLock;

use k8s_openapi::api::core::v1::{Event, Pod};
use regex::Regex;

use crate::types::PodDescriptor;

static POD_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9.]{0,251}[a-z0-9])?$").expect("valid pod name pattern")
});

static CONTAINER_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]{0,61}[a-z0-9])?$").expect("valid container name pattern")
});

/// Namespaces are DNS-1123 labels, the same shape as container names.
pub fn is_valid_namespace(name: &str) -> bool {
    CONTAINER_NAME.is_match(name)
}

/// Pod names are DNS-1123 subdomains: no `_` and no `/`.
pub fn is_valid_pod_name(name: &str) -> bool {
    POD_NAME.is_match(name)
}

/// Container names are DNS-1123 labels: no `_`, `/` or `.`.
pub fn is_valid_container_name(name: &str) -> bool {
    CONTAINER_NAME.is_match(name)
}

/// Build a descriptor from a pod object. Pods without a name are dropped.
pub fn pod_descriptor(pod: &Pod) -> Option<PodDescriptor> {
    let name = pod.metadata.name.clone()?;
    let containers = pod
        .spec
        .as_ref()
        .map(|spec| {
            spec.containers
                .iter()
                .chain(spec.init_containers.iter().flatten())
                .map(|c| c.name.clone())
                .collect()
        })
        .unwrap_or_default();
    Some(PodDescriptor { name, containers })
}

/// When an event was last seen. Events from the events.k8s.io API only carry
/// `eventTime`, so fall back to it and then to `firstTimestamp`.
fn last_seen(ev: &Event) -> Option<impl Ord + fmt::Display + Copy + use<>> {
    ev.last_timestamp
        .as_ref()
        .map(|t| t.0)
        .or_else(|| ev.event_time.as_ref().map(|t| t.0))
        .or_else(|| ev.first_timestamp.as_ref().map(|t| t.0))
}

/// Render events the way `oc get events` prints them, oldest first.
pub fn render_events(mut events: Vec<Event>) -> String {
    if events.is_empty() {
        return String::new();
    }
    events.sort_by_key(last_seen);

    let rows: Vec<[String; 5]> = events
        .iter()
        .map(|ev| {
            let object = format!(
                "{}/{}",
                ev.involved_object.kind.as_deref().unwrap_or("").to_lowercase(),
                ev.involved_object.name.as_deref().unwrap_or("")
            );
            [
                last_seen(ev)
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "<unknown>".to_string()),
                ev.type_.clone().unwrap_or_default(),
                ev.reason.clone().unwrap_or_default(),
                object,
                ev.message.clone().unwrap_or_default().replace('\n', " "),
            ]
        })
        .collect();

    let header = ["LAST SEEN", "TYPE", "REASON", "OBJECT", "MESSAGE"].map(String::from);
    let mut widths = header.clone().map(|h| h.len());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    for row in std::iter::once(&header).chain(rows.iter()) {
        let line = row
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (cell, w))| {
                if i + 1 == row.len() {
                    cell.clone()
                } else {
                    format!("{:<w$}", cell, w = w)
                }
            })
            .collect::<Vec<_>>()
            .join("   ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
