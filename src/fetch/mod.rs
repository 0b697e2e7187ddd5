use reqwest::{
    blocking::Client,
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, REFERER, USER_AGENT},
};
use std::{fmt, io, path::PathBuf, time::Duration};
use tracing::debug;
use url::Url;

use crate::config::EIA_REFERER;

pub mod cache;

pub use cache::{ensure_cached, is_zip_file, resolve_source, CacheStatus};

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Leading bytes of every ZIP container, and so of every `.xlsx`.
pub const ZIP_MAGIC: &[u8; 2] = b"PK";

/// A fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct Payload {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

#[derive(Debug)]
pub enum FetchError {
    InvalidUrl { url: String, source: url::ParseError },
    Client { source: reqwest::Error },
    Http { url: String, source: reqwest::Error },
    Status { url: String, status: u16 },
    UnexpectedContent { content_type: String, status: u16 },
    Io { path: PathBuf, source: io::Error },
    Missing { tried: Vec<PathBuf> },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl { url, source } => write!(f, "invalid url {url}: {source}"),
            Self::Client { source } => write!(f, "failed to build http client: {source}"),
            Self::Http { url, source } => write!(f, "GET {url} failed: {source}"),
            Self::Status { url, status } => write!(f, "GET {url} returned status {status}"),
            Self::UnexpectedContent {
                content_type,
                status,
            } => write!(
                f,
                "unexpected content type when downloading Excel: {content_type:?} status={status}"
            ),
            Self::Io { path, source } => write!(f, "writing {}: {source}", path.display()),
            Self::Missing { tried } => {
                let tried: Vec<String> = tried.iter().map(|p| p.display().to_string()).collect();
                write!(f, "workbook not found (tried {})", tried.join(", "))
            }
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidUrl { source, .. } => Some(source),
            Self::Client { source } => Some(source),
            Self::Http { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Anything that can perform a blocking GET and hand back the whole body.
pub trait Transport {
    fn get(&self, url: &str) -> Result<Payload, FetchError>;
}

/// Blocking reqwest client with a fixed timeout and browser-like headers.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static("Mozilla/5.0 (compatible; energymix/0.1)"),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet,application/octet-stream,*/*",
            ),
        );
        headers.insert(REFERER, HeaderValue::from_static(EIA_REFERER));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|source| FetchError::Client { source })?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Payload, FetchError> {
        let parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        debug!(%parsed, "GET");

        let http_err = |source: reqwest::Error| FetchError::Http {
            url: url.to_string(),
            source,
        };
        let resp = self.client.get(parsed).send().map_err(http_err)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = resp.bytes().map_err(http_err)?.to_vec();

        Ok(Payload {
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}

/// Accept a download when it declares the xlsx MIME type or starts with the ZIP magic.
pub fn validate_payload(payload: &Payload) -> Result<(), FetchError> {
    if payload.content_type.contains(XLSX_MIME) || payload.body.starts_with(ZIP_MAGIC) {
        Ok(())
    } else {
        Err(FetchError::UnexpectedContent {
            content_type: payload.content_type.clone(),
            status: payload.status,
        })
    }
}
