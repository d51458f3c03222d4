//! Search query assembly.

/// Build the path and query string for a repository search.
///
/// The result has the shape
/// `{path}?q={query}[+language:{language}]&order=desc[&sort={sort}]`.
/// Values are embedded verbatim; nothing is escaped or validated here, so an
/// unsupported `sort` is left for GitHub to reject.
pub fn build_search_query(
    search_path: &str,
    query: &str,
    language: Option<&str>,
    sort: Option<&str>,
) -> String {
    let mut uri = format!("{search_path}?q={query}");

    if let Some(language) = language.filter(|l| !l.is_empty()) {
        uri.push_str("+language:");
        uri.push_str(language);
    }

    uri.push_str("&order=desc");

    if let Some(sort) = sort.filter(|s| !s.is_empty()) {
        uri.push_str("&sort=");
        uri.push_str(sort);
    }

    uri
}
