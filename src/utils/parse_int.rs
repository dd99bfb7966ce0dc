/// Replica counts and similar form numbers; blank or negative input is `None`.
pub fn parse_optional_u32(value: Option<&str>) -> Option<u32> {
    value.map(str::trim).filter(|v| !v.is_empty())?.parse().ok()
}
