// ── Equipment tag conversion ──
//
// Room forms carry equipment as one comma-delimited string; stored and
// returned rooms carry an ordered tag list.

/// Split a comma-delimited equipment string into trimmed, non-empty tags.
///
/// Order is preserved and duplicates are kept.
pub fn parse_equipment(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Join tags back into the form representation.
pub fn format_equipment(tags: &[String]) -> String {
    tags.join(", ")
}
