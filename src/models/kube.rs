use serde_json::Value;

use crate::utils::display_json;

/// Reads `key` from the flat DTO or, failing that, from the raw Kubernetes
/// object at `path`.
fn pick<'a>(obj: &'a Value, key: &str, path: &[&str]) -> Option<&'a Value> {
    if let Some(v) = obj.get(key).filter(|v| !v.is_null() && !v.is_object()) {
        return Some(v);
    }
    let mut node = obj;
    for segment in path {
        node = node.get(*segment)?;
    }
    if node.is_null() {
        None
    } else {
        Some(node)
    }
}

fn pick_string(obj: &Value, key: &str, path: &[&str]) -> String {
    pick(obj, key, path).map(display_json).unwrap_or_default()
}

fn pick_u32(obj: &Value, key: &str, path: &[&str]) -> Option<u32> {
    pick(obj, key, path).and_then(|v| match v {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn labels_of(obj: &Value) -> Vec<(String, String)> {
    let labels = obj
        .get("labels")
        .or_else(|| obj.get("metadata").and_then(|m| m.get("labels")));
    let mut out: Vec<(String, String)> = labels
        .and_then(|l| l.as_object())
        .map(|m| {
            m.iter()
                .map(|(k, v)| (k.clone(), display_json(v)))
                .collect()
        })
        .unwrap_or_default();
    out.sort();
    out
}

fn labels_display(labels: &[(String, String)]) -> String {
    if labels.is_empty() {
        return "—".into();
    }
    labels
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Clone, Debug, Default)]
pub struct PodView {
    pub name: String,
    pub namespace: String,
    pub status: String,
    pub image: String,
    pub node: String,
    pub ip: String,
    pub restarts: Option<u32>,
    pub labels: Vec<(String, String)>,
    pub created: String,
}

impl PodView {
    pub fn from_value(obj: &Value) -> Self {
        let image = obj
            .get("image")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .or_else(|| {
                obj.pointer("/spec/containers/0/image")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string())
            })
            .unwrap_or_default();
        Self {
            name: pick_string(obj, "name", &["metadata", "name"]),
            namespace: pick_string(obj, "namespace", &["metadata", "namespace"]),
            status: pick_string(obj, "status", &["status", "phase"]),
            image,
            node: pick_string(obj, "nodeName", &["spec", "nodeName"]),
            ip: pick_string(obj, "podIP", &["status", "podIP"]),
            restarts: pick_u32(obj, "restartCount", &[]).or_else(|| {
                obj.pointer("/status/containerStatuses/0/restartCount")
                    .and_then(|v| v.as_u64())
                    .and_then(|n| u32::try_from(n).ok())
            }),
            labels: labels_of(obj),
            created: pick_string(obj, "creationTimestamp", &["metadata", "creationTimestamp"]),
        }
    }

    pub fn labels_display(&self) -> String {
        labels_display(&self.labels)
    }

    pub fn badge_class(&self) -> &'static str {
        crate::utils::status_badge_class(&self.status)
    }

    pub fn is_running(&self) -> bool {
        self.status.eq_ignore_ascii_case("running")
    }
}

#[derive(Clone, Debug, Default)]
pub struct DeploymentView {
    pub name: String,
    pub namespace: String,
    pub image: String,
    pub replicas: u32,
    pub ready_replicas: u32,
    pub available_replicas: u32,
    pub labels: Vec<(String, String)>,
    pub created: String,
}

impl DeploymentView {
    pub fn from_value(obj: &Value) -> Self {
        let image = obj
            .get("image")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .or_else(|| {
                obj.pointer("/spec/template/spec/containers/0/image")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string())
            })
            .unwrap_or_default();
        Self {
            name: pick_string(obj, "name", &["metadata", "name"]),
            namespace: pick_string(obj, "namespace", &["metadata", "namespace"]),
            image,
            replicas: pick_u32(obj, "replicas", &["spec", "replicas"]).unwrap_or(0),
            ready_replicas: pick_u32(obj, "readyReplicas", &["status", "readyReplicas"]).unwrap_or(0),
            available_replicas: pick_u32(obj, "availableReplicas", &["status", "availableReplicas"])
                .unwrap_or(0),
            labels: labels_of(obj),
            created: pick_string(obj, "creationTimestamp", &["metadata", "creationTimestamp"]),
        }
    }

    pub fn labels_display(&self) -> String {
        labels_display(&self.labels)
    }

    pub fn ready_display(&self) -> String {
        format!("{}/{}", self.ready_replicas, self.replicas)
    }

    pub fn scale_up(&self) -> u32 {
        self.replicas.saturating_add(1)
    }

    pub fn scale_down(&self) -> u32 {
        self.replicas.saturating_sub(1)
    }
}

#[derive(Clone, Debug, Default)]
pub struct NamespaceView {
    pub name: String,
    pub status: String,
    pub labels: Vec<(String, String)>,
    pub created: String,
}

impl NamespaceView {
    pub fn from_value(obj: &Value) -> Self {
        if let Some(s) = obj.as_str() {
            return Self {
                name: s.to_string(),
                status: "Active".into(),
                ..Default::default()
            };
        }
        Self {
            name: pick_string(obj, "name", &["metadata", "name"]),
            status: pick_string(obj, "status", &["status", "phase"]),
            labels: labels_of(obj),
            created: pick_string(obj, "creationTimestamp", &["metadata", "creationTimestamp"]),
        }
    }

    pub fn labels_display(&self) -> String {
        labels_display(&self.labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pod_from_flat_dto() {
        let p = PodView::from_value(&json!({
            "name": "lab-ana",
            "namespace": "student-ana",
            "status": "Running",
            "image": "python:3.12",
            "labels": {"app": "lab"}
        }));
        assert_eq!(p.name, "lab-ana");
        assert_eq!(p.namespace, "student-ana");
        assert!(p.is_running());
        assert_eq!(p.labels_display(), "app=lab");
    }

    #[test]
    fn pod_from_raw_kubernetes_object() {
        let p = PodView::from_value(&json!({
            "metadata": {"name": "web-1", "namespace": "default", "labels": {"b": "2", "a": "1"}},
            "spec": {"containers": [{"image": "nginx:1.27"}], "nodeName": "minikube"},
            "status": {"phase": "Pending", "containerStatuses": [{"restartCount": 3}]}
        }));
        assert_eq!(p.name, "web-1");
        assert_eq!(p.status, "Pending");
        assert_eq!(p.image, "nginx:1.27");
        assert_eq!(p.node, "minikube");
        assert_eq!(p.restarts, Some(3));
        assert_eq!(p.labels_display(), "a=1, b=2");
    }

    #[test]
    fn deployment_replicas() {
        let d = DeploymentView::from_value(&json!({
            "metadata": {"name": "api", "namespace": "default"},
            "spec": {"replicas": 3, "template": {"spec": {"containers": [{"image": "api:2"}]}}},
            "status": {"readyReplicas": 2}
        }));
        assert_eq!(d.ready_display(), "2/3");
        assert_eq!(d.image, "api:2");
        assert_eq!(d.scale_down(), 2);
        assert_eq!(DeploymentView::default().scale_down(), 0);
    }

    #[test]
    fn namespace_from_bare_string() {
        let n = NamespaceView::from_value(&json!("student-ana"));
        assert_eq!(n.name, "student-ana");
    }
}
