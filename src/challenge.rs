use http::header::WWW_AUTHENTICATE;
use http::HeaderMap;

/// The subset of a `WWW-Authenticate: Digest ...` prompt that the calculator needs.
///
/// `qop` is kept verbatim; whether it is supported is decided when the response is computed.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Challenge {
    /// Authorization realm (i.e. hostname, serial number...)
    pub realm: String,
    /// Server nonce
    pub nonce: String,
    /// Quality of protection as offered by the server, empty if not given
    pub qop: String,
}

impl Challenge {
    pub fn new(realm: impl Into<String>, nonce: impl Into<String>, qop: impl Into<String>) -> Self {
        Self {
            realm: realm.into(),
            nonce: nonce.into(),
            qop: qop.into(),
        }
    }

    /// Fold the directives of a challenge header into a `Challenge`.
    ///
    /// Returns `None` when there is no realm directive (or it is empty), i.e. when the
    /// server is asking for some scheme other than Digest. Unknown directives are ignored.
    pub fn parse(header: &str) -> Option<Self> {
        let mut challenge = Challenge::default();

        for (key, value) in parse_directives(header) {
            if is_realm_key(&key) {
                challenge.realm = value;
            } else if key == "nonce" {
                challenge.nonce = value;
            } else if key == "qop" {
                challenge.qop = value;
            }
        }

        if challenge.realm.is_empty() {
            None
        } else {
            Some(challenge)
        }
    }

    /// Read and parse the `WWW-Authenticate` header.
    ///
    /// `None` both when the header is missing and when it is not a Digest challenge;
    /// use [`ChallengeHeader::read()`] to tell the two apart.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        match ChallengeHeader::read(headers) {
            ChallengeHeader::Digest(challenge) => Some(challenge),
            _ => None,
        }
    }
}

/// What a 401 response offers in its `WWW-Authenticate` header
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ChallengeHeader {
    /// No challenge header at all
    Missing,
    /// Some other scheme; the raw header value (lossily decoded)
    Other(String),
    /// A Digest challenge
    Digest(Challenge),
}

impl ChallengeHeader {
    /// Inspect the response headers. Bytes outside ASCII are decoded as UTF-8, lossily.
    pub fn read(headers: &HeaderMap) -> Self {
        let value = match headers.get(WWW_AUTHENTICATE) {
            Some(value) => String::from_utf8_lossy(value.as_bytes()).into_owned(),
            None => return ChallengeHeader::Missing,
        };

        match Challenge::parse(&value) {
            Some(challenge) => ChallengeHeader::Digest(challenge),
            None => ChallengeHeader::Other(value),
        }
    }
}

/// The realm directive arrives glued to the scheme token, e.g. `Digest realm`
fn is_realm_key(key: &str) -> bool {
    let mut words = key.split_whitespace();
    match (words.next(), words.next(), words.next()) {
        (Some(scheme), Some("realm"), None) => scheme.eq_ignore_ascii_case("digest"),
        _ => false,
    }
}

/// Split a challenge header on `,` and each segment on its first `=`.
///
/// Segments without `=` are dropped. Commas inside quoted values are not protected.
pub fn parse_directives(header: &str) -> Vec<(String, String)> {
    header.split(',').filter_map(parse_kv).collect()
}

/// Parse a single `key="value"` or `key=value` segment.
///
/// The key is trimmed of whitespace, the value of whitespace and double quotes, at the
/// boundaries only. Everything after the first `=` belongs to the value.
pub fn parse_kv(kv: &str) -> Option<(String, String)> {
    let (key, value) = kv.split_once('=')?;
    let key = key.trim();
    let value = value.trim_matches(|c: char| c == '"' || c.is_whitespace());
    Some((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{parse_directives, parse_kv, Challenge, ChallengeHeader};
    use http::header::WWW_AUTHENTICATE;
    use http::{HeaderMap, HeaderValue};

    fn kv(k: &str, v: &str) -> Option<(String, String)> {
        Some((k.to_string(), v.to_string()))
    }

    #[test]
    fn test_parse_kv() {
        assert_eq!(parse_kv(r#"foo="bar""#), kv("foo", "bar"));
        assert_eq!(parse_kv(r#"foo bar="baz""#), kv("foo bar", "baz"));
        // separator repeated inside the value
        assert_eq!(parse_kv(r#"foo="bar=baz""#), kv("foo", "bar=baz"));
        assert_eq!(parse_kv(r#"  foo =" barbaz  ""#), kv("foo", "barbaz"));
        assert_eq!(parse_kv(r#"foo=" bar  baz ""#), kv("foo", "bar  baz"));
        assert_eq!(parse_kv("algorithm=MD5"), kv("algorithm", "MD5"));
        assert_eq!(parse_kv("auth-int\""), None);
    }

    #[test]
    fn test_parse_directives() {
        let src = r#"Digest realm="testrealm@host.com", qop="auth", nonce="abc=", opaque="5ccc""#;
        let parsed = parse_directives(src);
        assert_eq!(
            parsed,
            vec![
                ("Digest realm".to_string(), "testrealm@host.com".to_string()),
                ("qop".to_string(), "auth".to_string()),
                ("nonce".to_string(), "abc=".to_string()),
                ("opaque".to_string(), "5ccc".to_string()),
            ]
        );

        assert!(parse_directives("").is_empty());
    }

    #[test]
    fn test_challenge_parse() {
        let src = r#"Digest realm="testrealm@host.com",
                     qop="auth",
                     nonce="dcd98b7102dd2f0e8b11d0f600bfb0c093",
                     opaque="5ccc069c403ebaf9f0171e9517f40e41""#;

        assert_eq!(
            Challenge::parse(src),
            Some(Challenge::new(
                "testrealm@host.com",
                "dcd98b7102dd2f0e8b11d0f600bfb0c093",
                "auth"
            ))
        );

        // no qop: RFC 2069 style
        assert_eq!(
            Challenge::parse(r#"Digest realm="aaa", nonce="bbb""#),
            Some(Challenge::new("aaa", "bbb", ""))
        );

        // lowercase scheme token
        assert_eq!(
            Challenge::parse(r#"digest realm="aaa", nonce="bbb""#).map(|c| c.realm),
            Some("aaa".to_string())
        );
    }

    #[test]
    fn test_challenge_qop_list() {
        // the naive comma split cuts the list; the tail segment has no '=' and is skipped
        let src = r#"Digest realm="r", qop="auth,auth-int", nonce="n""#;
        assert_eq!(Challenge::parse(src), Some(Challenge::new("r", "n", "auth")));
    }

    #[test]
    fn test_not_digest() {
        assert_eq!(Challenge::parse("foo=bar"), None);
        assert_eq!(Challenge::parse(r#"Basic realm="x""#), None);
        assert_eq!(Challenge::parse(r#"Digest realm="", nonce="n""#), None);
        assert_eq!(Challenge::parse(""), None);
    }

    #[test]
    fn test_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(Challenge::from_headers(&headers), None);

        headers.insert(
            WWW_AUTHENTICATE,
            HeaderValue::from_static(r#"Digest realm="r", nonce="n", qop=auth"#),
        );
        assert_eq!(Challenge::from_headers(&headers), Some(Challenge::new("r", "n", "auth")));
    }

    #[test]
    fn test_realm_must_lead() {
        // the realm only counts when glued to the scheme token, so a challenge
        // that lists it later is treated like any other scheme
        assert_eq!(Challenge::parse(r#"Digest nonce="n", realm="r""#), None);
        assert_eq!(Challenge::parse(r#"Digest qop=auth, realm="r", nonce="n""#), None);
    }

    #[test]
    fn test_read_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(ChallengeHeader::read(&headers), ChallengeHeader::Missing);

        headers.insert(WWW_AUTHENTICATE, HeaderValue::from_static("foo=bar"));
        assert_eq!(
            ChallengeHeader::read(&headers),
            ChallengeHeader::Other("foo=bar".to_string())
        );

        headers.insert(WWW_AUTHENTICATE, HeaderValue::from_static(r#"Digest realm="r", nonce="n""#));
        assert_eq!(
            ChallengeHeader::read(&headers),
            ChallengeHeader::Digest(Challenge::new("r", "n", ""))
        );
    }

    #[test]
    fn test_non_ascii_realm() {
        let mut headers = HeaderMap::new();
        headers.insert(
            WWW_AUTHENTICATE,
            HeaderValue::from_bytes(r#"Digest realm="Société", nonce="n""#.as_bytes()).unwrap(),
        );

        let expected = Challenge::new("Société", "n", "");
        assert_eq!(Challenge::from_headers(&headers), Some(expected.clone()));
        assert_eq!(ChallengeHeader::read(&headers), ChallengeHeader::Digest(expected));
    }
}
