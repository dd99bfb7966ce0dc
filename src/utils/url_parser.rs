/// Host (and port) of the API base URL, shown in the page footer.
pub fn hostname_from_url(u: &str) -> String {
    match reqwest::Url::parse(u.trim()) {
        Ok(url) => match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            _ => String::new(),
        },
        Err(_) => u.trim().split('/').next().unwrap_or_default().to_string(),
    }
}

/// Post-login redirect target. Only local paths are accepted; anything else
/// (absolute URLs, `//host`, the login page itself) falls back to `/dashboard`.
pub fn safe_next(next: Option<&str>) -> String {
    let fallback = "/dashboard".to_string();
    let Some(n) = next.map(str::trim).filter(|n| !n.is_empty()) else {
        return fallback;
    };
    if !n.starts_with('/') || n.starts_with("//") || n.contains("://") || n.contains('\\') {
        return fallback;
    }
    if n == "/login" || n.starts_with("/login?") || n == "/logout" {
        return fallback;
    }
    n.to_string()
}
