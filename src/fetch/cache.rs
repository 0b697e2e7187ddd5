use std::{
    fs::{self, File},
    io::Read,
    path::{Path, PathBuf},
};
use tracing::{info, instrument, warn};

use super::{validate_payload, FetchError, Transport, ZIP_MAGIC};
use crate::config::{Settings, Source};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// The file on disk already looked like a ZIP container.
    Reused,
    /// A fresh copy was downloaded and written.
    Downloaded { bytes: usize },
}

/// True when the first two bytes of `path` are the ZIP magic.
pub fn is_zip_file(path: &Path) -> std::io::Result<bool> {
    let mut head = [0u8; 2];
    let mut file = File::open(path)?;
    let mut read = 0;
    while read < head.len() {
        match file.read(&mut head[read..])? {
            0 => break,
            n => read += n,
        }
    }
    Ok(read == head.len() && &head == ZIP_MAGIC)
}

/// Make sure `dest` holds a ZIP-looking copy of `url`.
///
/// A cached file that fails the magic check is removed (errors ignored) and re-downloaded.
/// Content that fails validation is never written.
#[instrument(level = "info", skip(transport, dest), fields(dest = %dest.display()))]
pub fn ensure_cached(
    dest: &Path,
    url: &str,
    transport: &dyn Transport,
) -> Result<CacheStatus, FetchError> {
    if dest.exists() {
        match is_zip_file(dest) {
            Ok(true) => {
                info!("cached workbook is valid, skipping download");
                return Ok(CacheStatus::Reused);
            }
            Ok(false) => warn!("cached file is not a ZIP container, re-downloading"),
            Err(e) => warn!(error = %e, "cached file unreadable, re-downloading"),
        }
        let _ = fs::remove_file(dest);
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|source| FetchError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let payload = transport.get(url)?;
    validate_payload(&payload)?;
    fs::write(dest, &payload.body).map_err(|source| FetchError::Io {
        path: dest.to_path_buf(),
        source,
    })?;
    info!(bytes = payload.body.len(), "downloaded workbook");

    Ok(CacheStatus::Downloaded {
        bytes: payload.body.len(),
    })
}

/// Find a usable local copy of `source`: download into the data dir, else fall back to the
/// alternative dir. A failed download is logged with manual instructions, not returned.
pub fn resolve_source(
    settings: &Settings,
    source: &Source,
    transport: &dyn Transport,
) -> Result<PathBuf, FetchError> {
    let primary = settings.cache_path(source);

    if let Err(e) = ensure_cached(&primary, source.url, transport) {
        warn!(error = %e, "failed to download EIA workbook");
        warn!("if the network blocks the file, download it manually from {}", source.url);
        warn!("and place it at {}", primary.display());
    }

    if primary.exists() {
        return Ok(primary);
    }

    let mut tried = vec![primary];
    if let Some(alt) = settings.alt_cache_path(source) {
        if alt.exists() {
            info!(path = %alt.display(), "using alternative data path");
            return Ok(alt);
        }
        tried.push(alt);
    }
    Err(FetchError::Missing { tried })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{Payload, XLSX_MIME};
    use std::cell::Cell;
    use tempfile::tempdir;

    struct Canned {
        payload: Option<Payload>,
        calls: Cell<usize>,
    }

    impl Canned {
        fn ok(content_type: &str, body: &[u8]) -> Self {
            Self {
                payload: Some(Payload {
                    status: 200,
                    content_type: content_type.to_string(),
                    body: body.to_vec(),
                }),
                calls: Cell::new(0),
            }
        }

        fn offline() -> Self {
            Self {
                payload: None,
                calls: Cell::new(0),
            }
        }
    }

    impl Transport for Canned {
        fn get(&self, url: &str) -> Result<Payload, FetchError> {
            self.calls.set(self.calls.get() + 1);
            self.payload.clone().ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 503,
            })
        }
    }

    const URL: &str = "https://example.test/figure6_data.xlsx";

    #[test]
    fn valid_cache_is_reused_without_network() {
        let tmp = tempdir().unwrap();
        let dest = tmp.path().join("figure6_data.xlsx");
        fs::write(&dest, b"PK\x03\x04cached").unwrap();
        let transport = Canned::offline();

        let status = ensure_cached(&dest, URL, &transport).unwrap();

        assert_eq!(status, CacheStatus::Reused);
        assert_eq!(transport.calls.get(), 0);
        assert_eq!(fs::read(&dest).unwrap(), b"PK\x03\x04cached");
    }

    #[test]
    fn corrupt_cache_is_deleted_and_redownloaded() {
        let tmp = tempdir().unwrap();
        let dest = tmp.path().join("figure6_data.xlsx");
        fs::write(&dest, b"<html>blocked</html>").unwrap();
        let transport = Canned::ok("application/octet-stream", b"PK\x03\x04fresh");

        let status = ensure_cached(&dest, URL, &transport).unwrap();

        assert_eq!(status, CacheStatus::Downloaded { bytes: 9 });
        assert_eq!(transport.calls.get(), 1);
        assert_eq!(fs::read(&dest).unwrap(), b"PK\x03\x04fresh");
    }

    #[test]
    fn corrupt_cache_is_gone_even_when_download_fails() {
        let tmp = tempdir().unwrap();
        let dest = tmp.path().join("figure6_data.xlsx");
        fs::write(&dest, b"x").unwrap();

        let err = ensure_cached(&dest, URL, &Canned::offline()).unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 503, .. }));
        assert!(!dest.exists());
    }

    #[test]
    fn rejected_content_is_not_cached() {
        let tmp = tempdir().unwrap();
        let dest = tmp.path().join("nested").join("figure7_data.xlsx");
        let transport = Canned::ok("text/html", b"<!doctype html>");

        let err = ensure_cached(&dest, URL, &transport).unwrap_err();

        assert!(matches!(err, FetchError::UnexpectedContent { .. }));
        assert!(!dest.exists());
    }

    #[test]
    fn declared_xlsx_type_is_written() {
        let tmp = tempdir().unwrap();
        let dest = tmp.path().join("a").join("b").join("figure7_data.xlsx");
        let transport = Canned::ok(XLSX_MIME, b"odd-but-declared");

        ensure_cached(&dest, URL, &transport).unwrap();

        assert!(dest.exists());
    }

    #[test]
    fn resolve_falls_back_to_alt_dir() {
        let tmp = tempdir().unwrap();
        let alt = tmp.path().join("alt");
        fs::create_dir_all(&alt).unwrap();
        fs::write(alt.join("figure6_data.xlsx"), b"PK..").unwrap();
        let settings = Settings {
            data_dir: tmp.path().join("data"),
            alt_data_dir: Some(alt.clone()),
            ..Settings::default()
        };
        let source = Source {
            url: URL,
            file_name: "figure6_data.xlsx",
        };

        let path = resolve_source(&settings, &source, &Canned::offline()).unwrap();

        assert_eq!(path, alt.join("figure6_data.xlsx"));
    }

    #[test]
    fn resolve_reports_every_path_tried() {
        let tmp = tempdir().unwrap();
        let settings = Settings {
            data_dir: tmp.path().join("data"),
            alt_data_dir: Some(tmp.path().join("alt")),
            ..Settings::default()
        };
        let source = Source {
            url: URL,
            file_name: "figure6_data.xlsx",
        };

        let err = resolve_source(&settings, &source, &Canned::offline()).unwrap_err();

        match err {
            FetchError::Missing { tried } => assert_eq!(tried.len(), 2),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
