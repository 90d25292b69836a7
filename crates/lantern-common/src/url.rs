//! URL resolution utilities.
//!
//! [URL Standard](https://url.spec.whatwg.org/)
//!
//! Only the forms a page actually uses for links and stylesheets are
//! handled: absolute URLs, scheme-relative (`//host/…`), host-relative
//! (`/…`) and path-relative (`a/b.css`, `./b.css`, `../b.css`).

/// [§ 2.5 URLs](https://html.spec.whatwg.org/multipage/urls-and-fetching.html#resolving-urls)
///
/// Resolve a potentially relative URL against a base URL.
///
/// # Algorithm
///
/// STEP 1: "If url is an absolute URL, return url."
///
/// STEP 2: "Otherwise, resolve url relative to base."
///
/// NOTE: This is a simplified implementation. Queries and fragments on the
/// base are not stripped, and `..` never climbs above the host.
#[must_use]
pub fn resolve_url(href: &str, base_url: Option<&str>) -> String {
    // STEP 1: Anything carrying a scheme separator is already absolute.
    if href.contains("://") {
        return href.to_string();
    }

    let Some(base) = base_url else {
        return href.to_string();
    };

    // STEP 2: Resolve against the base.
    if let Some(rest) = href.strip_prefix("//") {
        // Scheme-relative: reuse the base scheme.
        let scheme = base.split_once("://").map_or("http", |(scheme, _)| scheme);
        return format!("{scheme}://{rest}");
    }

    let origin_end = origin_len(base);

    if href.starts_with('/') {
        // Host-relative: keep scheme and host, replace the path.
        return if origin_end == 0 {
            href.to_string()
        } else {
            format!("{}{href}", &base[..origin_end])
        };
    }

    // Path-relative: start from the directory containing the base document.
    let mut dir = match base.rfind('/') {
        Some(slash) if slash >= origin_end => &base[..slash],
        _ if origin_end > 0 => base,
        _ => "",
    };

    let mut relative = href;
    loop {
        if let Some(rest) = relative.strip_prefix("./") {
            relative = rest;
        } else if let Some(rest) = relative.strip_prefix("../") {
            relative = rest;
            // Never climb above the host.
            if dir.len() > origin_end {
                let current = dir;
                dir = match current.rfind('/') {
                    Some(slash) if slash >= origin_end => &current[..slash],
                    Some(_) => &current[..origin_end],
                    None => "",
                };
            }
        } else {
            break;
        }
    }

    if dir.is_empty() {
        relative.to_string()
    } else {
        format!("{dir}/{relative}")
    }
}

/// Length of the `scheme://host[:port]` prefix of `url`, or 0 when `url` has
/// no scheme (a plain filesystem path).
fn origin_len(url: &str) -> usize {
    url.find("://").map_or(0, |scheme_end| {
        let host_start = scheme_end + 3;
        url[host_start..]
            .find('/')
            .map_or(url.len(), |path_start| host_start + path_start)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_url_is_returned_unchanged() {
        assert_eq!(
            resolve_url("https://other.org/a.css", Some("http://example.org/index.html")),
            "https://other.org/a.css"
        );
    }

    #[test]
    fn test_host_relative() {
        assert_eq!(
            resolve_url("/style.css", Some("http://example.org/docs/page.html")),
            "http://example.org/style.css"
        );
        assert_eq!(
            resolve_url("/style.css", Some("http://example.org")),
            "http://example.org/style.css"
        );
    }

    #[test]
    fn test_scheme_relative() {
        assert_eq!(
            resolve_url("//cdn.example.org/a.css", Some("https://example.org/")),
            "https://cdn.example.org/a.css"
        );
    }

    #[test]
    fn test_path_relative() {
        assert_eq!(
            resolve_url("style.css", Some("http://example.org/docs/page.html")),
            "http://example.org/docs/style.css"
        );
        assert_eq!(
            resolve_url("./style.css", Some("http://example.org/docs/page.html")),
            "http://example.org/docs/style.css"
        );
    }

    #[test]
    fn test_parent_segments_climb() {
        assert_eq!(
            resolve_url("../css/style.css", Some("http://example.org/a/b/page.html")),
            "http://example.org/a/css/style.css"
        );
    }

    #[test]
    fn test_parent_segments_stop_at_host() {
        assert_eq!(
            resolve_url("../../../style.css", Some("http://example.org/a/page.html")),
            "http://example.org/style.css"
        );
    }

    #[test]
    fn test_relative_to_host_without_path() {
        assert_eq!(
            resolve_url("style.css", Some("http://example.org")),
            "http://example.org/style.css"
        );
    }

    #[test]
    fn test_filesystem_base() {
        assert_eq!(
            resolve_url("style.css", Some("pages/index.html")),
            "pages/style.css"
        );
        assert_eq!(resolve_url("style.css", Some("index.html")), "style.css");
    }

    #[test]
    fn test_no_base() {
        assert_eq!(resolve_url("style.css", None), "style.css");
    }
}
