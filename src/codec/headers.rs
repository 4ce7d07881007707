//! Ordered header list and its header-blob grammar.
//!
//! # Grammar
//! ```text
//! blob  := ""  |  pair ( "nndd" pair )*
//! pair  := NAME "nnpp" VALUE
//! NAME  := escape(uppercase(header name))
//! VALUE := escape(header value)
//! ```
//! `escape` is form-urlencoding followed by rewriting every `n` as `%6E`.
//! Form-urlencoding never produces `n` on its own (hex digits are uppercase),
//! so after escaping neither separator can appear inside a component.

use serde::Serialize;

use super::{decode_component, encode_component, DecodeError};

/// Separator between a header name and its value.
pub const PAIR_SEPARATOR: &str = "nnpp";

/// Separator between two rendered header pairs.
pub const FIELD_SEPARATOR: &str = "nndd";

/// Ordered list of `(name, value)` header pairs.
///
/// Names are compared case-insensitively; duplicates keep their original order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeaderList(Vec<(String, String)>);

impl HeaderList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header, keeping any existing header of the same name.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// All values for `name`, in order.
    pub fn get_all<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a str> + use<'a, 'n> {
        self.iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// First value for `name`.
    pub fn get<'a>(&'a self, name: &str) -> Option<&'a str> {
        self.iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// Remove every header named `name`.
    pub fn remove(&mut self, name: &str) {
        self.0.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
    }

    /// Replace every header named `name` with a single one, at the position of
    /// the first occurrence (or at the end if absent).
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.0.iter().position(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some(idx) => {
                self.0[idx].1 = value;
                let mut seen = 0usize;
                self.0.retain(|(n, _)| {
                    if n.eq_ignore_ascii_case(name) {
                        seen += 1;
                        seen == 1
                    } else {
                        true
                    }
                });
            }
            None => self.push(name, value),
        }
    }

    /// Render the header blob for every header except `Cookie`.
    pub fn to_blob(&self) -> String {
        self.iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case("cookie"))
            .map(|(name, value)| {
                format!(
                    "{}{}{}",
                    escape(&name.to_ascii_uppercase()),
                    PAIR_SEPARATOR,
                    escape(value)
                )
            })
            .collect::<Vec<_>>()
            .join(FIELD_SEPARATOR)
    }

    /// Parse a header blob produced by [`HeaderList::to_blob`].
    pub fn from_blob(blob: &str) -> Result<Self, DecodeError> {
        let mut headers = Self::new();
        if blob.is_empty() {
            return Ok(headers);
        }
        for pair in blob.split(FIELD_SEPARATOR) {
            let (name, value) = pair
                .split_once(PAIR_SEPARATOR)
                .ok_or_else(|| DecodeError::MalformedHeader(pair.to_string()))?;
            if value.contains(PAIR_SEPARATOR) {
                return Err(DecodeError::MalformedHeader(pair.to_string()));
            }
            headers.push(decode_component(name)?, decode_component(value)?);
        }
        Ok(headers)
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for HeaderList {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(n, v)| (n.into(), v.into())).collect())
    }
}

fn escape(raw: &str) -> String {
    encode_component(raw).replace('n', "%6E")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_lookup() {
        let headers: HeaderList = [("Accept", "a"), ("ACCEPT", "b"), ("Host", "x")]
            .into_iter()
            .collect();

        assert_eq!(headers.get("accept"), Some("a"));
        assert_eq!(headers.get_all("Accept").collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(headers.get("missing"), None);
    }

    #[test]
    fn test_lookup_outlives_the_name() {
        let headers: HeaderList = [("X-Worker", "w0")].into_iter().collect();
        let value = {
            let name = String::from("x-worker");
            headers.get(&name)
        };
        assert_eq!(value, Some("w0"));
    }

    #[test]
    fn test_set_replaces_duplicates_in_place() {
        let mut headers: HeaderList = [("Host", "a"), ("X", "1"), ("host", "b")]
            .into_iter()
            .collect();
        headers.set("HOST", "w0.example");

        let pairs: Vec<_> = headers.iter().collect();
        assert_eq!(pairs, vec![("Host", "w0.example"), ("X", "1")]);
    }

    #[test]
    fn test_blob_skips_cookie_and_uppercases() {
        let headers: HeaderList = [("Content-Type", "text/plain"), ("cookie", "a=b")]
            .into_iter()
            .collect();

        assert_eq!(headers.to_blob(), "CONTENT-TYPEnnpptext%2Fplai%6E");
    }

    #[test]
    fn test_empty_blob() {
        assert_eq!(HeaderList::new().to_blob(), "");
        assert!(HeaderList::from_blob("").unwrap().is_empty());
    }

    #[test]
    fn test_separators_inside_values_survive() {
        let headers: HeaderList = [
            ("X-Tricky", "annppbnnddc"),
            ("", "empty name"),
            ("X-Reserved", "a&b=c%d+e f"),
        ]
        .into_iter()
        .collect();

        let blob = headers.to_blob();
        assert_eq!(blob.matches(FIELD_SEPARATOR).count(), 2);
        assert_eq!(blob.matches(PAIR_SEPARATOR).count(), 3);

        let decoded = HeaderList::from_blob(&blob).unwrap();
        let pairs: Vec<_> = decoded.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("X-TRICKY", "annppbnnddc"),
                ("", "empty name"),
                ("X-RESERVED", "a&b=c%d+e f"),
            ]
        );
    }

    #[test]
    fn test_malformed_pair() {
        let err = HeaderList::from_blob("NOSEPARATOR").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedHeader(_)));
    }
}
