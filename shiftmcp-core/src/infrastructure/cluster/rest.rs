//! Bearer-token REST client for the Kubernetes/OpenShift API

use super::ClusterOperations;
use super::error::ClusterError;
use super::summary;
use crate::config::{ClusterConfig, Credential, resolve_secret};
use crate::domain::types::{ClusterOperation, ToolArguments};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info};

const DEFAULT_TAIL_LINES: i64 = 100;
const MERGE_PATCH: &str = "application/merge-patch+json";

#[derive(Clone)]
pub struct RestClusterClient {
    base_url: String,
    token: Option<Credential>,
    http: Client,
}

impl RestClusterClient {
    pub fn from_config(config: &ClusterConfig, timeout: Duration) -> Result<Self, ClusterError> {
        let http = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()
            .map_err(ClusterError::request)?;

        info!(
            cluster = config.url.as_str(),
            verify_ssl = config.verify_ssl,
            "Cluster client configured"
        );

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            token: resolve_secret("cluster", config.token.as_deref()),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.http.request(method, format!("{}{path}", self.base_url));
        match &self.token {
            Some(token) => request.bearer_auth(token.expose()),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, ClusterError> {
        let response = request.send().await.map_err(ClusterError::request)?;
        let status = response.status();
        let body = response.text().await.map_err(ClusterError::request)?;
        if status.is_success() {
            return Ok(body);
        }

        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or(body);
        Err(ClusterError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json(&self, request: RequestBuilder) -> Result<Value, ClusterError> {
        let body = self.send(request).await?;
        serde_json::from_str(&body).map_err(|e| ClusterError::InvalidResponse {
            reason: e.to_string(),
        })
    }

    async fn get(&self, path: &str) -> Result<Value, ClusterError> {
        debug!(path, "GET cluster resource");
        self.send_json(self.request(Method::GET, path)).await
    }

    async fn list(
        &self,
        path: &str,
        summarize: fn(&Value) -> Value,
    ) -> Result<Value, ClusterError> {
        let list = self.get(path).await?;
        Ok(Value::Array(
            summary::items(&list).iter().map(summarize).collect(),
        ))
    }

    async fn list_applications(&self, namespace: &str) -> Result<Value, ClusterError> {
        let mut applications = Vec::new();
        for (kind, resource) in [
            ("Deployment", "deployments"),
            ("StatefulSet", "statefulsets"),
            ("DaemonSet", "daemonsets"),
        ] {
            let list = self
                .get(&format!("/apis/apps/v1/namespaces/{namespace}/{resource}"))
                .await?;
            applications.extend(
                summary::items(&list)
                    .iter()
                    .map(|item| summary::application(kind, item)),
            );
        }
        Ok(Value::Array(applications))
    }

    async fn pod_logs(
        &self,
        namespace: &str,
        pod: &str,
        tail_lines: i64,
    ) -> Result<Value, ClusterError> {
        let request = self
            .request(
                Method::GET,
                &format!("/api/v1/namespaces/{namespace}/pods/{pod}/log"),
            )
            .query(&[("tailLines", tail_lines)]);
        let logs = self.send(request).await?;
        Ok(json!({ "namespace": namespace, "pod_name": pod, "logs": logs }))
    }

    async fn scale(
        &self,
        namespace: &str,
        deployment: &str,
        replicas: i64,
    ) -> Result<Value, ClusterError> {
        let request = self
            .request(
                Method::PATCH,
                &format!("/apis/apps/v1/namespaces/{namespace}/deployments/{deployment}/scale"),
            )
            .header(CONTENT_TYPE, MERGE_PATCH)
            .body(json!({ "spec": { "replicas": replicas } }).to_string());
        let scale = self.send_json(request).await?;
        let name = scale
            .pointer("/metadata/name")
            .cloned()
            .unwrap_or_else(|| json!(deployment));
        let scaled_to = scale
            .pointer("/spec/replicas")
            .cloned()
            .unwrap_or_else(|| json!(replicas));
        let message = format!("Successfully scaled deployment {deployment} to {replicas} replicas");
        Ok(json!({
            "success": true,
            "message": message,
            "name": name,
            "replicas": scaled_to,
        }))
    }

    async fn delete(&self, path: &str, message: String) -> Result<Value, ClusterError> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(json!({ "success": true, "message": message }))
    }

    async fn create_namespace(&self, name: &str, labels: Value) -> Result<Value, ClusterError> {
        let body = json!({
            "apiVersion": "v1",
            "kind": "Namespace",
            "metadata": { "name": name, "labels": labels },
        });
        let created = self
            .send_json(self.request(Method::POST, "/api/v1/namespaces").json(&body))
            .await?;
        Ok(json!({
            "success": true,
            "message": format!("Namespace {name} created"),
            "namespace": summary::namespace(&created),
        }))
    }
}

/// Required resource name; anything that is not a DNS-1123 subdomain is
/// rejected before it can reach a URL path.
fn required<'a>(
    operation: ClusterOperation,
    args: &'a ToolArguments,
    argument: &'static str,
) -> Result<&'a str, ClusterError> {
    let value = args.str(argument).ok_or(ClusterError::MissingArgument {
        operation: operation.as_str(),
        argument,
    })?;
    if !is_dns1123_subdomain(value) {
        return Err(ClusterError::InvalidName {
            operation: operation.as_str(),
            argument,
            value: value.to_string(),
        });
    }
    Ok(value)
}

fn is_dns1123_subdomain(name: &str) -> bool {
    const MAX_LEN: usize = 253;

    !name.is_empty()
        && name.len() <= MAX_LEN
        && name.split('.').all(|label| {
            let bytes = label.as_bytes();
            match (bytes.first(), bytes.last()) {
                (Some(first), Some(last)) => {
                    first.is_ascii_alphanumeric()
                        && last.is_ascii_alphanumeric()
                        && bytes
                            .iter()
                            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
                }
                _ => false,
            }
        })
}

#[async_trait]
impl ClusterOperations for RestClusterClient {
    async fn execute(
        &self,
        operation: ClusterOperation,
        args: &ToolArguments,
    ) -> Result<Value, ClusterError> {
        use ClusterOperation::*;

        match operation {
            ListNamespaces => self.list("/api/v1/namespaces", summary::namespace).await,
            ListApplications => {
                self.list_applications(required(operation, args, "namespace")?)
                    .await
            }
            ListPods => {
                let ns = required(operation, args, "namespace")?;
                self.list(&format!("/api/v1/namespaces/{ns}/pods"), summary::pod)
                    .await
            }
            ListServices => {
                let ns = required(operation, args, "namespace")?;
                self.list(&format!("/api/v1/namespaces/{ns}/services"), summary::service)
                    .await
            }
            ListRoutes => {
                let ns = required(operation, args, "namespace")?;
                self.list(
                    &format!("/apis/route.openshift.io/v1/namespaces/{ns}/routes"),
                    summary::route,
                )
                .await
            }
            ListConfigMaps => {
                let ns = required(operation, args, "namespace")?;
                self.list(
                    &format!("/api/v1/namespaces/{ns}/configmaps"),
                    summary::config_map,
                )
                .await
            }
            ListSecrets => {
                let ns = required(operation, args, "namespace")?;
                self.list(&format!("/api/v1/namespaces/{ns}/secrets"), summary::secret)
                    .await
            }
            GetPodLogs => {
                let ns = required(operation, args, "namespace")?;
                let pod = required(operation, args, "pod_name")?;
                let tail = args.i64("tail_lines").unwrap_or(DEFAULT_TAIL_LINES);
                self.pod_logs(ns, pod, tail).await
            }
            GetResourceUsage => {
                let ns = required(operation, args, "namespace")?;
                let pods = self.get(&format!("/api/v1/namespaces/{ns}/pods")).await?;
                Ok(summary::resource_usage(ns, summary::items(&pods)))
            }
            ScaleDeployment => {
                let ns = required(operation, args, "namespace")?;
                let deployment = required(operation, args, "deployment_name")?;
                let replicas = args.i64("replicas").ok_or(ClusterError::MissingArgument {
                    operation: operation.as_str(),
                    argument: "replicas",
                })?;
                self.scale(ns, deployment, replicas).await
            }
            DeletePod => {
                let ns = required(operation, args, "namespace")?;
                let pod = required(operation, args, "pod_name")?;
                self.delete(
                    &format!("/api/v1/namespaces/{ns}/pods/{pod}"),
                    format!("Pod {pod} deleted from namespace {ns}"),
                )
                .await
            }
            CreateNamespace => {
                let name = required(operation, args, "name")?;
                let labels = args
                    .object("labels")
                    .cloned()
                    .map(Value::Object)
                    .unwrap_or_else(|| json!({}));
                self.create_namespace(name, labels).await
            }
            DeleteNamespace => {
                let name = required(operation, args, "name")?;
                self.delete(
                    &format!("/api/v1/namespaces/{name}"),
                    format!("Namespace {name} deletion requested"),
                )
                .await
            }
        }
    }

    fn describe(&self) -> Option<String> {
        Some(self.base_url.clone())
    }
}
