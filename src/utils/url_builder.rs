/// Joins the public base URL (possibly empty) with a local path. Absolute
/// URLs pass through untouched.
pub fn absolute_url(base_url: &str, path: &str) -> String {
    if path.contains("://") {
        return path.to_string();
    }
    let base = base_url.trim_end_matches('/');
    match path.strip_prefix('/') {
        Some(rest) => format!("{}/{}", base, rest),
        None => format!("{}/{}", base, path),
    }
}
