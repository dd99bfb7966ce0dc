use urlencoding::encode;

/// `k=v&k2=v2`, percent-encoded. Used for the request log line.
pub fn build_query_string(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
