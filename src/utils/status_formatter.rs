/// CSS badge class for a container, pod or service status
pub fn status_badge_class(status: &str) -> &'static str {
    match status.trim().to_lowercase().as_str() {
        "running" | "active" | "healthy" | "up" | "ok" | "connected" | "ready" => "badge-success",
        "pending" | "creating" | "containercreating" | "building" | "starting" | "degraded" => {
            "badge-warning"
        }
        "error" | "failed" | "crashloopbackoff" | "down" | "unhealthy" | "expired" | "revoked" => {
            "badge-danger"
        }
        "stopped" | "terminated" | "succeeded" | "inactive" => "badge-muted",
        _ => "badge-neutral",
    }
}

/// Render an ISO-8601 timestamp as `YYYY-MM-DD HH:MM`; anything unparseable is returned as-is
pub fn format_timestamp(raw: &str) -> String {
    let t = raw.trim();
    if t.is_empty() {
        return "—".into();
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(t) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(t, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    t.to_string()
}
