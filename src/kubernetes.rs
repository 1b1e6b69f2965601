//! `kube` backend: reads the same data as the `oc` backend straight from the
//! API server, for environments that have a kubeconfig but no `oc` binary.

use std::fmt::Debug;

use async_trait::async_trait;
use futures::io::AsyncReadExt;
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, ReplicaSet, StatefulSet};
use k8s_openapi::api::batch::v1::{CronJob, Job};
use k8s_openapi::api::core::v1::{Event, Pod, Service};
use kube::api::{ApiResource, DynamicObject, ListParams, LogParams};
use kube::core::GroupVersionKind;
use kube::{Api, Client, config};
use serde::Serialize;
use tracing::info;

use crate::cluster::ClusterApi;
use crate::error::{Error, Result};
use crate::types::{Artifact, LogKind, PodDescriptor};
use crate::utils::{pod_descriptor, render_events};

const CLOWDER_GROUP: &str = "cloud.redhat.com";
const CLOWDER_VERSION: &str = "v1alpha1";

/// Serialized like the `List` documents `oc get -o yaml` prints.
#[derive(Serialize)]
struct ItemList {
    #[serde(rename = "apiVersion")]
    api_version: &'static str,
    kind: &'static str,
    items: Vec<serde_json::Value>,
}

impl ItemList {
    fn new(items: Vec<serde_json::Value>) -> Self {
        Self {
            api_version: "v1",
            kind: "List",
            items,
        }
    }
}

fn clowder_resource(kind: &str, plural: &str) -> ApiResource {
    let gvk = GroupVersionKind::gvk(CLOWDER_GROUP, CLOWDER_VERSION, kind);
    ApiResource::from_gvk_with_plural(&gvk, plural)
}

#[derive(Clone)]
pub struct KubeApi {
    client: Client,
}

impl KubeApi {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client for `context`, or for the current context when `None`.
    pub async fn connect(context: Option<&str>) -> Result<Self> {
        let config = match context {
            None => config::Config::infer()
                .await
                .map_err(|e| Error::Kubeconfig(e.to_string()))?,
            Some(ctx) => config::Config::from_kubeconfig(&config::KubeConfigOptions {
                context: Some(ctx.to_string()),
                ..Default::default()
            })
            .await
            .map_err(|e| Error::Kubeconfig(format!("context '{}': {}", ctx, e)))?,
        };
        let client = Client::try_from(config)?;
        info!("Connected to cluster (context: {})", context.unwrap_or("current"));
        Ok(Self::new(client))
    }

    async fn list_values<T>(&self, namespace: &str) -> Result<Vec<serde_json::Value>>
    where
        T: k8s_openapi::Resource<Scope = k8s_openapi::NamespaceResourceScope>
            + k8s_openapi::Metadata<
                Ty = k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta,
            > + serde::de::DeserializeOwned
            + Serialize
            + Clone
            + Debug
            + Send
            + Sync,
    {
        let api: Api<T> = Api::namespaced(self.client.clone(), namespace);
        let list = api.list(&ListParams::default()).await?;
        list.items
            .iter()
            .map(|obj| serde_json::to_value(obj).map_err(Error::from))
            .collect()
    }

    async fn all_objects(&self, namespace: &str) -> Result<String> {
        let mut items = Vec::new();
        items.extend(self.list_values::<Pod>(namespace).await?);
        items.extend(self.list_values::<Service>(namespace).await?);
        items.extend(self.list_values::<DaemonSet>(namespace).await?);
        items.extend(self.list_values::<Deployment>(namespace).await?);
        items.extend(self.list_values::<ReplicaSet>(namespace).await?);
        items.extend(self.list_values::<StatefulSet>(namespace).await?);
        items.extend(self.list_values::<Job>(namespace).await?);
        items.extend(self.list_values::<CronJob>(namespace).await?);
        Ok(serde_yaml::to_string(&ItemList::new(items))?)
    }

    async fn clowder_list(&self, namespace: &str, kind: &str, plural: &str) -> Result<String> {
        let ar = clowder_resource(kind, plural);
        let api: Api<DynamicObject> = Api::namespaced_with(self.client.clone(), namespace, &ar);
        let list = api.list(&ListParams::default()).await?;
        let items = list
            .items
            .iter()
            .map(|obj| serde_json::to_value(obj).map_err(Error::from))
            .collect::<Result<Vec<_>>>()?;
        Ok(serde_yaml::to_string(&ItemList::new(items))?)
    }

    async fn clowd_environment(&self, namespace: &str) -> Result<String> {
        let ar = clowder_resource("ClowdEnvironment", "clowdenvironments");
        let api: Api<DynamicObject> = Api::all_with(self.client.clone(), &ar);
        let env = api.get(&Artifact::environment_name(namespace)).await?;
        Ok(serde_yaml::to_string(&env)?)
    }
}

#[async_trait]
impl ClusterApi for KubeApi {
    fn backend(&self) -> &'static str {
        "kube"
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodDescriptor>> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let list = api.list(&ListParams::default()).await?;
        Ok(list.items.iter().filter_map(pod_descriptor).collect())
    }

    async fn get_logs(
        &self,
        namespace: &str,
        pod: &str,
        container: &str,
        kind: LogKind,
    ) -> Result<Vec<u8>> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let params = LogParams {
            container: Some(container.to_string()),
            previous: kind == LogKind::Previous,
            ..Default::default()
        };
        let command = format!("logs {}/{} ({})", pod, container, kind);
        // `Api::logs` decodes to a String; the raw stream keeps bytes as-is.
        let mut stream = Box::pin(api.log_stream(pod, &params).await?);
        let mut logs = Vec::new();
        stream
            .read_to_end(&mut logs)
            .await
            .map_err(|source| Error::LogStream {
                command: command.clone(),
                source,
            })?;
        if logs.is_empty() {
            return Err(Error::EmptyOutput { command });
        }
        Ok(logs)
    }

    async fn get_resource(&self, namespace: &str, artifact: Artifact) -> Result<Vec<u8>> {
        let rendered = match artifact {
            Artifact::Events => {
                let api: Api<Event> = Api::namespaced(self.client.clone(), namespace);
                let list = api.list(&ListParams::default()).await?;
                render_events(list.items)
            }
            Artifact::All => self.all_objects(namespace).await?,
            Artifact::ClowdApp => self.clowder_list(namespace, "ClowdApp", "clowdapps").await?,
            Artifact::ClowdEnvironment => self.clowd_environment(namespace).await?,
            Artifact::ClowdJobInvocation => {
                self.clowder_list(namespace, "ClowdJobInvocation", "clowdjobinvocations")
                    .await?
            }
        };
        Ok(rendered.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clowder_resources_use_cloud_redhat_group() {
        let ar = clowder_resource("ClowdApp", "clowdapps");
        assert_eq!(ar.group, "cloud.redhat.com");
        assert_eq!(ar.version, "v1alpha1");
        assert_eq!(ar.api_version, "cloud.redhat.com/v1alpha1");
        assert_eq!(ar.plural, "clowdapps");
        assert_eq!(ar.kind, "ClowdApp");
    }

    #[test]
    fn item_list_serializes_as_generic_list() {
        let yaml = serde_yaml::to_string(&ItemList::new(Vec::new())).unwrap();
        assert!(yaml.contains("apiVersion: v1"));
        assert!(yaml.contains("kind: List"));
        assert!(yaml.contains("items: []"));
    }
}
