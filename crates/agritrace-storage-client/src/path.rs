//! Recovery of container-relative paths from storage URLs.
//!
//! The storage provider returns fully-qualified URLs shaped like
//! `https://{host}/{container}/{encoded-path}`: the first path segment is
//! the container, and the remainder, percent-decoded, is the stored object
//! path. That layout is a property of the current provider, so the whole
//! heuristic lives in this one pure function.

use percent_encoding::percent_decode_str;
use url::Url;

/// Extract the container-relative object path from a fully-qualified
/// storage URL.
///
/// `https://host/admin-uploads/products%2Fabc123.jpg` becomes
/// `products/abc123.jpg`. Inputs that do not parse as URLs are returned
/// unchanged and treated as already-relative.
pub fn extract_relative_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => {
            let stripped = strip_container_segment(parsed.path());
            percent_decode_str(stripped).decode_utf8_lossy().into_owned()
        }
        Err(error) => {
            tracing::warn!(input = %url, %error, "unparseable storage URL, treating as relative path");
            url.to_string()
        }
    }
}

/// Remove a leading `/{segment}/` from a URL path. Paths without a second
/// segment are returned unchanged.
fn strip_container_segment(path: &str) -> &str {
    let Some(rest) = path.strip_prefix('/') else {
        return path;
    };
    match rest.split_once('/') {
        Some((_, remainder)) => remainder,
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_encoded_container_relative_path() {
        assert_eq!(
            extract_relative_path(
                "https://host.example.com/admin-uploads/products%2F1762741023058.jpg"
            ),
            "products/1762741023058.jpg"
        );
    }

    #[test]
    fn handles_unencoded_paths() {
        assert_eq!(
            extract_relative_path("https://host.example.com/admin-uploads/products/abc123.jpg"),
            "products/abc123.jpg"
        );
    }

    #[test]
    fn malformed_input_is_returned_unchanged() {
        assert_eq!(
            extract_relative_path("products/abc123.jpg"),
            "products/abc123.jpg"
        );
        assert_eq!(extract_relative_path("not a url"), "not a url");
    }
}
