pub mod error;
#[cfg(feature = "mock")]
mod mock;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use exn::ResultExt;
use legis_navigate::DocumentId;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use tracing::instrument;

use crate::error::{ErrorKind, Result};
#[cfg(feature = "mock")]
pub use crate::mock::MockFetcher;

/// Download endpoint; the document id is appended verbatim.
pub const DEFAULT_ENDPOINT: &str = "https://www.legis.md/cautare/downloadpdf/";
const MAX_REDIRECTS: usize = 10;

/// Retrieves the PDF of a document version and stores it locally.
pub trait Fetch {
    /// Returns the path the document was written to.
    fn fetch(&self, id: DocumentId) -> Result<PathBuf>;
}

/// URL the PDF of document `id` is served from.
pub fn download_url(endpoint: &str, id: DocumentId) -> String {
    format!("{endpoint}{id}")
}

/// Name of the local file holding document `id`.
pub fn file_name(id: DocumentId) -> PathBuf {
    PathBuf::from(format!("{id}.pdf"))
}

/// Blocking HTTP downloader writing `<id>.pdf`, by default into the working
/// directory.
///
/// The whole response body is buffered in memory before being written. There
/// is no size or checksum validation and no retry.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
    endpoint: String,
    directory: PathBuf,
}
impl Downloader {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .redirect(Policy::limited(MAX_REDIRECTS))
            .timeout(timeout)
            .build()
            .or_raise(|| ErrorKind::Client)?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            directory: PathBuf::from("."),
        })
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }
}
impl Fetch for Downloader {
    #[instrument(skip(self), fields(doc_id = id.get()))]
    fn fetch(&self, id: DocumentId) -> Result<PathBuf> {
        let url = download_url(&self.endpoint, id);
        let path = self.directory.join(file_name(id));
        tracing::info!(url = %url, path = %path.display(), "Downloading document");
        let response = self.client.get(&url).send().or_raise(|| ErrorKind::Request(url.clone()))?;
        let status = response.status();
        if !status.is_success() {
            exn::bail!(ErrorKind::Status(status.as_u16()));
        }
        let body = response.bytes().or_raise(|| ErrorKind::Request(url))?;
        write_document(&path, &body)?;
        tracing::debug!(bytes = body.len(), "Document written");
        Ok(path)
    }
}

/// Writes `body` next to `path` first and moves it into place once complete,
/// so an interrupted write never leaves a truncated `path` behind.
fn write_document(path: &Path, body: &[u8]) -> Result<()> {
    let failed = || ErrorKind::Write(path.to_path_buf());
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut partial = tempfile::Builder::new()
        .prefix(".legis-")
        .suffix(".part")
        .tempfile_in(directory)
        .or_raise(failed)?;
    partial.write_all(body).or_raise(failed)?;
    partial.persist(path).map_err(|err| err.error).or_raise(failed)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::{BufRead, BufReader};
    use std::net::TcpListener;
    use std::thread;

    /// Serves `connections` requests on a local port and returns the endpoint.
    ///
    /// `/pdf/5` redirects to `/files/5`, which serves a four byte body;
    /// anything else is a 404.
    fn serve(connections: usize) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        thread::spawn(move || {
            for stream in listener.incoming().take(connections) {
                let mut stream = stream.unwrap();
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut request = String::new();
                reader.read_line(&mut request).unwrap();
                loop {
                    let mut header = String::new();
                    if reader.read_line(&mut header).unwrap() == 0 || header == "\r\n" {
                        break;
                    }
                }
                let response = match request.split_whitespace().nth(1) {
                    Some("/pdf/5") => "HTTP/1.1 302 Found\r\nLocation: /files/5\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                    Some("/files/5") => "HTTP/1.1 200 OK\r\nContent-Type: application/pdf\r\nContent-Length: 4\r\nConnection: close\r\n\r\n%PDF",
                    _ => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                };
                stream.write_all(response.as_bytes()).unwrap();
            }
        });
        format!("http://{address}/pdf/")
    }

    fn downloader(endpoint: &str, dir: &tempfile::TempDir) -> Downloader {
        Downloader::new(endpoint, Duration::from_secs(5)).unwrap().with_directory(dir.path())
    }

    #[test]
    fn fetch_follows_redirect() {
        let dir = tempfile::tempdir().unwrap();
        let path = downloader(&serve(2), &dir).fetch(DocumentId::new(5)).unwrap();
        assert_eq!(path, dir.path().join("5.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn fetch_rejects_error_status() {
        let dir = tempfile::tempdir().unwrap();
        let err = downloader(&serve(1), &dir).fetch(DocumentId::new(404)).unwrap_err();
        assert_eq!(*err, ErrorKind::Status(404));
        assert!(!dir.path().join("404.pdf").exists());
    }

    #[rstest]
    #[case(DEFAULT_ENDPOINT, 108460, "https://www.legis.md/cautare/downloadpdf/108460")]
    #[case("http://localhost:8080/pdf/", 7, "http://localhost:8080/pdf/7")]
    fn test_download_url(#[case] endpoint: &str, #[case] id: u64, #[case] expected: &str) {
        assert_eq!(download_url(endpoint, DocumentId::new(id)), expected);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(DocumentId::new(108460)), PathBuf::from("108460.pdf"));
    }

    #[test]
    fn test_write_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(file_name(DocumentId::new(141527)));
        write_document(&path, b"%PDF-1.7").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.7");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_document_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("1.pdf");
        std::fs::write(&path, b"old").unwrap();
        write_document(&path, b"%PDF").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF");
    }

    #[test]
    fn test_write_document_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("1.pdf");
        let err = write_document(&path, b"%PDF").unwrap_err();
        assert_eq!(*err, ErrorKind::Write(path));
    }

    #[test]
    fn test_downloader_builds() {
        assert!(Downloader::new(DEFAULT_ENDPOINT, Duration::from_secs(5)).is_ok());
    }
}
