use crate::digest::{Authorize, DigestCalculator};
use crate::error::BoxError;
use crate::utils::request_uri;
use crate::{Challenge, ChallengeHeader, Credentials, Error, Result};
use http::header::AUTHORIZATION;
use http::{HeaderValue, Method, Request, Response, StatusCode};
use url::Url;

/// Whatever actually puts requests on the wire.
///
/// Connection handling, TLS, redirects and timeouts all live behind this trait.
/// Any `Fn(Request<Vec<u8>>) -> Result<Response<B>, E>` closure is a transport.
pub trait Transport {
    type Body;
    type Error: Into<BoxError>;

    fn send(&self, request: Request<Vec<u8>>) -> std::result::Result<Response<Self::Body>, Self::Error>;
}

impl<F, B, E> Transport for F
where
    F: Fn(Request<Vec<u8>>) -> std::result::Result<Response<B>, E>,
    E: Into<BoxError>,
{
    type Body = B;
    type Error = E;

    fn send(&self, request: Request<Vec<u8>>) -> std::result::Result<Response<B>, E> {
        self(request)
    }
}

/// HTTP client answering a Digest challenge once.
///
/// The first request goes out without credentials. If the server answers 401 with a
/// Digest challenge, the request is repeated a single time with an `Authorization`
/// header computed from the username and password embedded in the URL.
pub struct DigestClient<T, A = DigestCalculator> {
    transport: T,
    authorizer: A,
}

impl<T: Transport> DigestClient<T> {
    /// Client using the MD5 calculator with random client nonces
    pub fn new(transport: T) -> Self {
        Self::with_authorizer(transport, DigestCalculator::new())
    }
}

impl<T: Transport, A: Authorize> DigestClient<T, A> {
    /// Client with a custom calculator (e.g. one with a fixed cnonce)
    pub fn with_authorizer(transport: T, authorizer: A) -> Self {
        Self {
            transport,
            authorizer,
        }
    }

    /// GET `url`, authenticating with the `user:password` from its authority part if the
    /// server asks for Digest auth.
    ///
    /// Responses that are not a 401, 401s without a `WWW-Authenticate` header and
    /// non-Digest challenges are returned unchanged. The retried request's response is
    /// returned as is, even if it is another 401.
    ///
    /// # Errors
    /// - `InvalidUrl` if `url` can't be turned into a request
    /// - `Transport` if either send fails
    /// - `Authorization` if the header can't be computed (missing credentials, unsupported qop)
    pub fn get(&self, url: &str) -> Result<Response<T::Body>> {
        let url = Url::parse(url)?;

        if url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(format!("{} has no authority", url)));
        }

        // credentials only ever leave as the digest
        let mut target = url.clone();
        target
            .set_password(None)
            .and_then(|_| target.set_username(""))
            .map_err(|_| Error::InvalidUrl(format!("can't strip credentials from {}", url)))?;

        let response = self.send(build_request(&target, None)?)?;

        if response.status() != StatusCode::UNAUTHORIZED {
            log::debug!("{} answered {}, no authentication needed", target, response.status());
            return Ok(response);
        }

        let challenge = match ChallengeHeader::read(response.headers()) {
            ChallengeHeader::Digest(challenge) => challenge,
            ChallengeHeader::Missing => {
                log::warn!("{} answered 401 without a challenge", target);
                return Ok(response);
            }
            ChallengeHeader::Other(header) => {
                log::debug!("not a Digest challenge, passing 401 through: {}", header);
                return Ok(response);
            }
        };

        log::debug!("Digest challenge for realm {:?}, qop {:?}", challenge.realm, challenge.qop);

        let authorization = self
            .authorization(&url, &challenge)
            .map_err(|e| Error::Authorization(Box::new(e)))?;

        // release the connection held by the challenge before retrying
        drop(response);

        log::debug!("retrying {} with Digest authorization", target);
        self.send(build_request(&target, Some(authorization))?)
    }

    fn authorization(&self, url: &Url, challenge: &Challenge) -> Result<HeaderValue> {
        let credentials = Credentials::from_url(url)?;
        self.authorizer
            .authorize(&credentials, challenge, &Method::GET, &request_uri(url))?
            .to_header_value()
    }

    fn send(&self, request: Request<Vec<u8>>) -> Result<Response<T::Body>> {
        self.transport
            .send(request)
            .map_err(|e| Error::Transport(e.into()))
    }
}

fn build_request(target: &Url, authorization: Option<HeaderValue>) -> Result<Request<Vec<u8>>> {
    let mut builder = Request::builder().method(Method::GET).uri(target.as_str());
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    Ok(builder.body(Vec::new())?)
}
