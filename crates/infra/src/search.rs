/// Trailing clause for every `LIKE` built from [`contains_pattern`].
pub const LIKE_ESCAPE: &str = " ESCAPE '\\'";

/// Case-insensitive substring pattern for `LOWER(col) LIKE $n ESCAPE '\'`.
/// Wildcards typed by the user match literally.
pub fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
