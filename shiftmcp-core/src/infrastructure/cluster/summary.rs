//! Reduce raw Kubernetes list responses to the fields tools report.
//!
//! Secret and ConfigMap values are never copied; only their keys are.

use serde_json::{Map, Value, json};

pub(super) fn items(list: &Value) -> &[Value] {
    list.get("items")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn text<'a>(item: &'a Value, pointer: &str) -> Option<&'a str> {
    item.pointer(pointer).and_then(Value::as_str)
}

fn field(item: &Value, pointer: &str) -> Value {
    item.pointer(pointer).cloned().unwrap_or(Value::Null)
}

fn labels(item: &Value) -> Value {
    item.pointer("/metadata/labels")
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()))
}

fn keys_of(item: &Value, pointer: &str) -> Value {
    let keys: Vec<&str> = item
        .pointer(pointer)
        .and_then(Value::as_object)
        .map(|data| data.keys().map(String::as_str).collect())
        .unwrap_or_default();
    json!(keys)
}

fn first_image(item: &Value) -> Value {
    json!(
        text(item, "/spec/template/spec/containers/0/image")
            .or_else(|| text(item, "/spec/containers/0/image"))
            .unwrap_or("N/A")
    )
}

pub(super) fn namespace(item: &Value) -> Value {
    let name = text(item, "/metadata/name").unwrap_or_default();
    let display_name =
        text(item, "/metadata/annotations/openshift.io~1display-name").unwrap_or(name);
    json!({
        "name": name,
        "display_name": display_name,
        "description": text(item, "/metadata/annotations/openshift.io~1description").unwrap_or(""),
        "status": field(item, "/status/phase"),
        "created": field(item, "/metadata/creationTimestamp"),
        "labels": labels(item),
    })
}

pub(super) fn application(kind: &str, item: &Value) -> Value {
    let mut app = json!({
        "name": field(item, "/metadata/name"),
        "type": kind,
        "labels": labels(item),
        "created": field(item, "/metadata/creationTimestamp"),
        "image": first_image(item),
    });
    if kind == "DaemonSet" {
        app["desired_number_scheduled"] = field(item, "/status/desiredNumberScheduled");
        app["number_ready"] = field(item, "/status/numberReady");
    } else {
        app["replicas"] = field(item, "/spec/replicas");
        app["ready_replicas"] = field(item, "/status/readyReplicas");
        if kind == "Deployment" {
            app["available_replicas"] = field(item, "/status/availableReplicas");
        }
    }
    app
}

pub(super) fn pod(item: &Value) -> Value {
    let ready = item
        .pointer("/status/containerStatuses/0/ready")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let restart_count = item
        .pointer("/status/containerStatuses/0/restartCount")
        .and_then(Value::as_i64)
        .unwrap_or(0);
    json!({
        "name": field(item, "/metadata/name"),
        "status": field(item, "/status/phase"),
        "ready": ready,
        "restart_count": restart_count,
        "node": field(item, "/spec/nodeName"),
        "labels": labels(item),
        "created": field(item, "/metadata/creationTimestamp"),
        "image": first_image(item),
    })
}

pub(super) fn service(item: &Value) -> Value {
    let ports: Vec<Value> = item
        .pointer("/spec/ports")
        .and_then(Value::as_array)
        .map(|ports| {
            ports
                .iter()
                .map(|p| {
                    json!({
                        "port": field(p, "/port"),
                        "target_port": field(p, "/targetPort"),
                        "protocol": field(p, "/protocol"),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    json!({
        "name": field(item, "/metadata/name"),
        "type": field(item, "/spec/type"),
        "cluster_ip": field(item, "/spec/clusterIP"),
        "external_ips": item.pointer("/spec/externalIPs").cloned().unwrap_or_else(|| json!([])),
        "ports": ports,
        "labels": labels(item),
        "created": field(item, "/metadata/creationTimestamp"),
    })
}

pub(super) fn route(item: &Value) -> Value {
    json!({
        "name": field(item, "/metadata/name"),
        "host": field(item, "/spec/host"),
        "service_name": field(item, "/spec/to/name"),
        "port": field(item, "/spec/port/targetPort"),
        "tls": item.pointer("/spec/tls").is_some_and(|tls| !tls.is_null()),
        "labels": labels(item),
        "created": field(item, "/metadata/creationTimestamp"),
    })
}

pub(super) fn config_map(item: &Value) -> Value {
    json!({
        "name": field(item, "/metadata/name"),
        "data_keys": keys_of(item, "/data"),
        "labels": labels(item),
        "created": field(item, "/metadata/creationTimestamp"),
    })
}

pub(super) fn secret(item: &Value) -> Value {
    json!({
        "name": field(item, "/metadata/name"),
        "type": field(item, "/type"),
        "data_keys": keys_of(item, "/data"),
        "labels": labels(item),
        "created": field(item, "/metadata/creationTimestamp"),
    })
}

#[derive(Default)]
struct Totals {
    cpu_request: f64,
    memory_request: u64,
    cpu_limit: f64,
    memory_limit: u64,
}

impl Totals {
    fn add_container(&mut self, container: &Value) {
        let quantity = |pointer: &str| text(container, pointer);
        self.cpu_request += quantity("/resources/requests/cpu").and_then(parse_cpu).unwrap_or(0.0);
        self.cpu_limit += quantity("/resources/limits/cpu").and_then(parse_cpu).unwrap_or(0.0);
        self.memory_request += quantity("/resources/requests/memory")
            .and_then(parse_memory)
            .unwrap_or(0);
        self.memory_limit += quantity("/resources/limits/memory")
            .and_then(parse_memory)
            .unwrap_or(0);
    }

    fn merge(&mut self, other: &Totals) {
        self.cpu_request += other.cpu_request;
        self.memory_request += other.memory_request;
        self.cpu_limit += other.cpu_limit;
        self.memory_limit += other.memory_limit;
    }
}

/// Sum container requests and limits per pod and for the whole namespace.
pub(super) fn resource_usage(namespace: &str, pods: &[Value]) -> Value {
    let mut total = Totals::default();
    let mut per_pod = Vec::with_capacity(pods.len());

    for pod in pods {
        let mut totals = Totals::default();
        for container in pod
            .pointer("/spec/containers")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
        {
            totals.add_container(container);
        }
        total.merge(&totals);
        per_pod.push(json!({
            "name": field(pod, "/metadata/name"),
            "status": field(pod, "/status/phase"),
            "cpu_request": totals.cpu_request,
            "memory_request": totals.memory_request,
            "cpu_limit": totals.cpu_limit,
            "memory_limit": totals.memory_limit,
        }));
    }

    json!({
        "namespace": namespace,
        "pods": per_pod,
        "total_cpu_request": total.cpu_request,
        "total_memory_request": total.memory_request,
        "total_cpu_limit": total.cpu_limit,
        "total_memory_limit": total.memory_limit,
    })
}

/// CPU quantity in cores: `"250m"` is 0.25, `"2"` is 2.0.
pub(super) fn parse_cpu(quantity: &str) -> Option<f64> {
    let quantity = quantity.trim();
    match quantity.strip_suffix('m') {
        Some(milli) => milli.parse::<f64>().ok().map(|m| m / 1000.0),
        None => quantity.parse().ok(),
    }
}

/// Memory quantity in bytes. Binary (`Ki`..`Ti`) and decimal (`K`..`T`)
/// suffixes are supported.
pub(super) fn parse_memory(quantity: &str) -> Option<u64> {
    const UNITS: [(&str, u64); 8] = [
        ("Ki", 1 << 10),
        ("Mi", 1 << 20),
        ("Gi", 1 << 30),
        ("Ti", 1 << 40),
        ("K", 1_000),
        ("M", 1_000_000),
        ("G", 1_000_000_000),
        ("T", 1_000_000_000_000),
    ];

    let quantity = quantity.trim();
    for (suffix, factor) in UNITS {
        if let Some(number) = quantity.strip_suffix(suffix) {
            return number.parse::<u64>().ok().map(|n| n * factor);
        }
    }
    quantity.parse().ok()
}
