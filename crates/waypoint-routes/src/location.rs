//! Request path normalization

use percent_encoding::percent_decode_str;
use url::Url;

const BASE: &str = "http://waypoint.local/";

/// A requested location split into decoded path segments, query and fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: String,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    fragment: Option<String>,
}

impl Location {
    /// Parse an application path such as `/service/chat/42?tab=info#top`.
    ///
    /// Empty segments are dropped so `/service/tracker/` and
    /// `/service/tracker` are the same location; `.` and `..` are resolved.
    pub fn parse(input: &str) -> Self {
        let relative = format!("/{}", input.trim().trim_start_matches('/'));

        match Url::parse(BASE).and_then(|base| base.join(&relative)) {
            Ok(url) => Self::from_url(&url),
            Err(e) => {
                tracing::debug!(input = %input, error = %e, "Splitting unparseable path by hand");
                Self::from_raw(&relative)
            }
        }
    }

    fn from_url(url: &Url) -> Self {
        let raw: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        Self {
            path: format!("/{}", raw.join("/")),
            segments: raw.iter().map(|s| decode(s)).collect(),
            query: url.query_pairs().into_owned().collect(),
            fragment: url.fragment().map(decode),
        }
    }

    fn from_raw(input: &str) -> Self {
        let (rest, fragment) = match input.split_once('#') {
            Some((rest, fragment)) => (rest, Some(decode(fragment))),
            None => (input, None),
        };
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (rest, None),
        };

        let raw: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        Self {
            path: format!("/{}", raw.join("/")),
            segments: raw.iter().map(|s| decode(s)).collect(),
            query: query
                .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
                .unwrap_or_default(),
            fragment,
        }
    }

    /// Normalized path, still percent-encoded, without query or fragment
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Decoded path segments
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Path with query string and fragment, for logs and history entries
    pub fn full_path(&self) -> String {
        let mut full = self.path.clone();
        if !self.query.is_empty() {
            full.push('?');
            full.push_str(
                &url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(self.query.iter())
                    .finish(),
            );
        }
        if let Some(fragment) = &self.fragment {
            full.push('#');
            full.push_str(fragment);
        }
        full
    }
}

fn decode(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_path() {
        let location = Location::parse("/service/chat/42");
        assert_eq!(location.path(), "/service/chat/42");
        assert_eq!(location.segments(), ["service", "chat", "42"]);
        assert!(location.query().is_empty());
        assert!(location.fragment().is_none());
    }

    #[test]
    fn test_trailing_and_repeated_slashes() {
        assert_eq!(Location::parse("/service/tracker/").path(), "/service/tracker");
        assert_eq!(Location::parse("//service//tracker").path(), "/service/tracker");
        assert_eq!(Location::parse("service/tracker").path(), "/service/tracker");
        assert_eq!(Location::parse("/").segments().len(), 0);
        assert_eq!(Location::parse("").path(), "/");
    }

    #[test]
    fn test_query_and_fragment() {
        let location = Location::parse("/service/reader?doc=7&page=2#notes");
        assert_eq!(location.path(), "/service/reader");
        assert_eq!(location.query_value("doc"), Some("7"));
        assert_eq!(location.query_value("page"), Some("2"));
        assert_eq!(location.fragment(), Some("notes"));
        assert_eq!(location.full_path(), "/service/reader?doc=7&page=2#notes");
    }

    #[test]
    fn test_dot_segments_resolved() {
        assert_eq!(Location::parse("/service/../auth/login").path(), "/auth/login");
    }

    #[test]
    fn test_segments_are_decoded() {
        let location = Location::parse("/service/chat/hello%20world");
        assert_eq!(location.path(), "/service/chat/hello%20world");
        assert_eq!(location.segments()[2], "hello world");
    }

    #[test]
    fn test_raw_split() {
        let location = Location::from_raw("/a/b%2Fc/?x=1#frag");
        assert_eq!(location.segments(), ["a", "b/c"]);
        assert_eq!(location.query_value("x"), Some("1"));
        assert_eq!(location.fragment(), Some("frag"));
    }
}
