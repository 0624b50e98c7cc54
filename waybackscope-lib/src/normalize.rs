//! Turn free-form input lines into bare host names.

use url::Url;

const SCHEMES: [&str; 2] = ["http://", "https://"];

/// Normalize a raw input line into a host name
///
/// Surrounding whitespace is trimmed. Inputs starting with `http://` or
/// `https://` are reduced to their host (and port, if any). Trailing slashes
/// are stripped. The host is kept verbatim: no case folding, no IDNA, no
/// validation.
///
/// ```
/// use waybackscope_lib::normalize;
///
/// assert_eq!(normalize("https://example.com/"), "example.com");
/// assert_eq!(normalize("example.com/"), "example.com");
/// assert_eq!(normalize("  sub.example.com \n"), "sub.example.com");
/// ```
#[must_use]
pub fn normalize(line: &str) -> String {
    let mut domain = line.trim();
    if domain.is_empty() {
        return String::new();
    }

    if SCHEMES.iter().any(|scheme| domain.starts_with(scheme)) {
        domain = match Url::parse(domain) {
            Ok(url) if url.host_str().is_some_and(|host| !host.is_empty()) => authority(domain),
            _ => {
                let stripped = domain.strip_prefix("http://").unwrap_or(domain);
                stripped.strip_prefix("https://").unwrap_or(stripped)
            }
        };
    }

    domain.trim_end_matches('/').to_string()
}

/// Host and port of an absolute URL, sliced out of the original text.
///
/// `Url` normalizes the host (e.g. lowercases it), so the raw authority is
/// read from the input instead. Any userinfo is dropped.
fn authority(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..end];
    authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host)
}
