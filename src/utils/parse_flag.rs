/// Reads a checkbox or query flag. Browsers send `on` for a ticked box and
/// omit the field otherwise.
pub fn parse_flag(value: Option<&str>, default: bool) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") => default,
        Some("1" | "true" | "yes" | "on") => true,
        Some(_) => false,
    }
}
