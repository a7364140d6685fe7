/// Derive the tracker-side slug for a catalog list name.
///
/// The derivation is deterministic: the same name always yields the same slug.
/// Alphanumeric characters are lowercased and kept; every other run of
/// characters collapses to a single hyphen; leading and trailing hyphens are
/// trimmed.
pub fn infer_list_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }
    slug
}
