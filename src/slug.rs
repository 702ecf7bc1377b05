/// Derives the URL slug used for products and categories.
///
/// Lowercases the name, turns every space into a hyphen and drops anything
/// that is not an ASCII word character or a hyphen.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            c if c.is_ascii_alphanumeric() || c == '_' || c == '-' => Some(c),
            _ => None,
        })
        .collect()
}
