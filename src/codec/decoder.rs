//! Payload decoder, the inverse of the encoder.

use serde::Serialize;

use crate::codec::{decode_component, decode_nullable, DecodeError, HeaderList};

/// A relayed request as reconstructed from its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedRequest {
    /// Original `scheme://host/path?query`.
    pub uri: String,
    pub method: String,
    /// Header names are uppercase; `Cookie` is carried separately.
    pub headers: HeaderList,
    pub cookie: Option<String>,
    pub body: Option<String>,
}

/// Decode a payload. Accepts the full `"/?…"` path or the bare query string.
///
/// Unknown parameters are ignored; if a parameter repeats, the first wins.
pub fn decode(payload: &str) -> Result<DecodedRequest, DecodeError> {
    let query = payload
        .strip_prefix("/?")
        .or_else(|| payload.strip_prefix('?'))
        .unwrap_or(payload);

    let mut fields: [Option<&str>; 5] = [None; 5];
    for param in query.split('&') {
        let (key, value) = param.split_once('=').unwrap_or((param, ""));
        let slot = match key {
            "dieuri" => 0,
            "diemet" => 1,
            "diehed" => 2,
            "diecok" => 3,
            "diebod" => 4,
            _ => continue,
        };
        fields[slot].get_or_insert(value);
    }

    let [uri, method, headers, cookie, body] = fields;
    Ok(DecodedRequest {
        uri: decode_component(uri.ok_or(DecodeError::MissingField("dieuri"))?)?,
        method: decode_component(method.ok_or(DecodeError::MissingField("diemet"))?)?,
        headers: HeaderList::from_blob(headers.ok_or(DecodeError::MissingField("diehed"))?)?,
        cookie: decode_nullable(cookie.ok_or(DecodeError::MissingField("diecok"))?)?,
        body: decode_nullable(body.ok_or(DecodeError::MissingField("diebod"))?)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode;
    use crate::relay::CapturedRequest;

    #[test]
    fn test_api_scenario() {
        let headers: HeaderList = [("Content-Type", "application/json"), ("Cookie", "sid=abc")]
            .into_iter()
            .collect();
        let captured = CapturedRequest::new(
            "https",
            "api.example.com",
            "/v1/x",
            "POST",
            headers,
            br#"{"a":1}"#.to_vec(),
        );

        let decoded = decode(encode(&captured).payload.as_str()).unwrap();

        assert_eq!(decoded.uri, "https://api.example.com/v1/x");
        assert_eq!(decoded.method, "POST");
        assert_eq!(decoded.headers.len(), 1);
        assert_eq!(decoded.headers.get("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(decoded.cookie.as_deref(), Some("sid=abc"));
        assert_eq!(decoded.body.as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn test_round_trip_reserved_characters() {
        let headers: HeaderList = [
            ("X-Amp", "a&b"),
            ("X-Eq", "k=v"),
            ("X-Pct", "100%"),
            ("X-Sep", "nnppnnddnnpp"),
            ("x-dup", "one"),
            ("X-Dup", "two"),
        ]
        .into_iter()
        .chain([("Cookie", "a=b&c=d; e=%20")])
        .collect();
        let body = "q=1&r=%2&s=nndd nnpp\n";
        let captured =
            CapturedRequest::new("http", "h.example:8080", "/p?x=1&y=2", "PUT", headers, body);

        let decoded = decode(encode(&captured).payload.as_str()).unwrap();

        assert_eq!(decoded.uri, "http://h.example:8080/p?x=1&y=2");
        assert_eq!(decoded.method, "PUT");
        let pairs: Vec<_> = decoded.headers.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("X-AMP", "a&b"),
                ("X-EQ", "k=v"),
                ("X-PCT", "100%"),
                ("X-SEP", "nnppnnddnnpp"),
                ("X-DUP", "one"),
                ("X-DUP", "two"),
            ]
        );
        assert_eq!(decoded.cookie.as_deref(), Some("a=b&c=d; e=%20"));
        assert_eq!(decoded.body.as_deref(), Some(body));
    }

    #[test]
    fn test_boundary_decodes_to_absent() {
        let decoded = decode("/?dieuri=http%3A%2F%2Fa%2F&diemet=GET&diehed=&diecok=null&diebod=null")
            .unwrap();

        assert!(decoded.headers.is_empty());
        assert_eq!(decoded.cookie, None);
        assert_eq!(decoded.body, None);
    }

    #[test]
    fn test_literal_null_values_survive() {
        let headers: HeaderList = [("Cookie", "null")].into_iter().collect();
        let captured = CapturedRequest::new("http", "a", "/", "POST", headers, "null");

        let decoded = decode(encode(&captured).payload.as_str()).unwrap();
        assert_eq!(decoded.cookie.as_deref(), Some("null"));
        assert_eq!(decoded.body.as_deref(), Some("null"));
    }

    #[test]
    fn test_bare_query_accepted() {
        let decoded = decode("dieuri=x&diemet=GET&diehed=&diecok=null&diebod=null").unwrap();
        assert_eq!(decoded.uri, "x");
    }

    #[test]
    fn test_missing_field() {
        let err = decode("/?dieuri=x&diemet=GET&diehed=&diecok=null").unwrap_err();
        assert_eq!(err, DecodeError::MissingField("diebod"));
    }
}
