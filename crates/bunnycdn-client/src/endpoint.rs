//! Canonical URL construction for API paths.
//!
//! Callers hand in relative paths with any mix of leading, trailing or
//! repeated slashes; [`UrlBuilder`] turns them into exactly one canonical
//! URL below the configured base.

use crate::{ClientError, Result};
use url::Url;

/// Joins relative paths onto a fixed base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
    base: Url,
}

impl UrlBuilder {
    /// Parse a base URL. A missing trailing slash is added.
    pub fn new(base: &str) -> Result<Self> {
        let mut base = base.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }

        let url = Url::parse(&base)
            .map_err(|e| ClientError::Config(format!("invalid base URL {}: {}", base, e)))?;
        if url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "base URL cannot carry a path: {}",
                base
            )));
        }

        Ok(Self { base: url })
    }

    /// The base URL, always ending in `/`
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// URL of a resource: no trailing slash, no doubled slashes.
    ///
    /// An empty path (or one made only of slashes) yields the base itself.
    /// `.` and `..` segments are rejected rather than resolved.
    pub fn join(&self, path: &str) -> Result<Url> {
        Ok(self.resolve(&segments(path)?, false))
    }

    /// URL of a directory listing: always exactly one trailing slash.
    pub fn directory(&self, path: &str) -> Result<Url> {
        Ok(self.resolve(&segments(path)?, true))
    }

    /// URL of a fixed API route made of literals and numeric ids
    pub(crate) fn route(&self, path: &str) -> Url {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        self.resolve(&segments, false)
    }

    fn resolve(&self, segments: &[&str], trailing_slash: bool) -> Url {
        if segments.is_empty() {
            return self.base.clone();
        }

        // Every byte outside the unreserved set is escaped, `+ & = ;` included
        let encoded: Vec<_> = segments.iter().map(|s| urlencoding::encode(s)).collect();
        let mut path = format!("{}{}", self.base.path(), encoded.join("/"));
        if trailing_slash {
            path.push('/');
        }

        let mut url = self.base.clone();
        url.set_path(&path);
        url
    }
}

/// Canonical slash-trimmed form of a relative path.
///
/// Fails with [`ClientError::InvalidArgument`] on `.` or `..` segments.
pub fn normalize_path(path: &str) -> Result<String> {
    Ok(segments(path)?.join("/"))
}

/// Last segment of a relative path, if any
pub fn basename(path: &str) -> Option<&str> {
    path.split('/').filter(|s| !s.is_empty()).last()
}

/// A value that must fill exactly one path segment, such as a resource id
pub(crate) fn single_segment<'a>(value: &'a str, name: &str) -> Result<&'a str> {
    match segments(value)?.as_slice() {
        [segment] => Ok(*segment),
        _ => Err(ClientError::InvalidArgument(format!(
            "{} must be a single path segment, got {:?}",
            name, value
        ))),
    }
}

fn segments(path: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if let Some(dot) = segments.iter().find(|s| **s == "." || **s == "..") {
        return Err(ClientError::InvalidArgument(format!(
            "path {:?} contains a {:?} segment",
            path, dot
        )));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const BASE: &str = "https://bunnycdn.com/api/";
    const ZONE: &str = "https://storage.bunnycdn.com/zone/";

    #[rstest]
    #[case("pullzone", "https://bunnycdn.com/api/pullzone")]
    #[case("/pullzone", "https://bunnycdn.com/api/pullzone")]
    #[case("pullzone/", "https://bunnycdn.com/api/pullzone")]
    #[case("/pullzone/", "https://bunnycdn.com/api/pullzone")]
    #[case("///pullzone///", "https://bunnycdn.com/api/pullzone")]
    #[case("pullzone/12/purgeCache", "https://bunnycdn.com/api/pullzone/12/purgeCache")]
    #[case("//pullzone//12//purgeCache//", "https://bunnycdn.com/api/pullzone/12/purgeCache")]
    fn test_join_is_canonical(#[case] path: &str, #[case] expected: &str) {
        let builder = UrlBuilder::new(BASE).unwrap();
        assert_eq!(builder.join(path).unwrap().as_str(), expected);
        assert_eq!(builder.route(path).as_str(), expected);
    }

    #[test]
    fn test_join_is_idempotent_over_canonical_form() {
        let builder = UrlBuilder::new(BASE).unwrap();
        let once = builder.join("/billing/applycode/").unwrap();
        let again = builder
            .join(&normalize_path("/billing/applycode/").unwrap())
            .unwrap();
        assert_eq!(once, again);
    }

    #[test]
    fn test_missing_trailing_slash_on_base() {
        let builder = UrlBuilder::new("https://bunnycdn.com/api").unwrap();
        assert_eq!(builder.base().as_str(), BASE);
        assert_eq!(
            builder.join("statistics").unwrap().as_str(),
            "https://bunnycdn.com/api/statistics"
        );
    }

    #[test]
    fn test_host_only_base() {
        let builder = UrlBuilder::new("http://127.0.0.1:8080").unwrap();
        assert_eq!(
            builder.join("/pullzone/").unwrap().as_str(),
            "http://127.0.0.1:8080/pullzone"
        );
    }

    #[rstest]
    #[case("", "https://storage.bunnycdn.com/zone/")]
    #[case("/", "https://storage.bunnycdn.com/zone/")]
    #[case("images", "https://storage.bunnycdn.com/zone/images/")]
    #[case("/images/", "https://storage.bunnycdn.com/zone/images/")]
    #[case("images//2024///", "https://storage.bunnycdn.com/zone/images/2024/")]
    fn test_directory_has_one_trailing_slash(#[case] path: &str, #[case] expected: &str) {
        let builder = UrlBuilder::new(ZONE).unwrap();
        assert_eq!(builder.directory(path).unwrap().as_str(), expected);
    }

    #[rstest]
    #[case("my docs/report #1.pdf", "my%20docs/report%20%231.pdf")]
    #[case("a+b&c=d;e", "a%2Bb%26c%3Dd%3Be")]
    #[case("café.txt", "caf%C3%A9.txt")]
    #[case("100%.txt", "100%25.txt")]
    #[case("v1.2/~tmp_x-y", "v1.2/~tmp_x-y")]
    #[case("..hidden/a..b/.env", "..hidden/a..b/.env")]
    fn test_segments_are_percent_encoded(#[case] path: &str, #[case] encoded: &str) {
        let builder = UrlBuilder::new(ZONE).unwrap();
        assert_eq!(
            builder.join(path).unwrap().as_str(),
            format!("{}{}", ZONE, encoded)
        );
    }

    #[rstest]
    #[case("..")]
    #[case(".")]
    #[case("docs/..")]
    #[case("keep/../victim.txt")]
    #[case("/./a.txt")]
    fn test_dot_segments_are_rejected(#[case] path: &str) {
        let builder = UrlBuilder::new(ZONE).unwrap();
        assert!(matches!(builder.join(path), Err(ClientError::InvalidArgument(_))));
        assert!(matches!(builder.directory(path), Err(ClientError::InvalidArgument(_))));
        assert!(matches!(normalize_path(path), Err(ClientError::InvalidArgument(_))));
    }

    #[test]
    fn test_single_segment() {
        assert_eq!(single_segment("6f1d-rule", "id").unwrap(), "6f1d-rule");
        assert_eq!(single_segment("/6f1d-rule/", "id").unwrap(), "6f1d-rule");
        assert!(single_segment("", "id").is_err());
        assert!(single_segment("a/b", "id").is_err());
        assert!(single_segment("..", "id").is_err());
    }

    #[test]
    fn test_rejects_invalid_base() {
        assert!(matches!(
            UrlBuilder::new("not a url"),
            Err(ClientError::Config(_))
        ));
        assert!(matches!(
            UrlBuilder::new("mailto:ops@example.com"),
            Err(ClientError::Config(_))
        ));
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("/videos/intro.mp4"), Some("intro.mp4"));
        assert_eq!(basename("intro.mp4/"), Some("intro.mp4"));
        assert_eq!(basename("//"), None);
    }
}
