use crate::ReviewCorpus;
use reqwest::{
    Client,
    header::{CACHE_CONTROL, PRAGMA},
};
use std::{fmt, path::PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("{}", describe_fetch(.status, .reason))]
    Fetch { status: Option<u16>, reason: String },

    #[error("TSV loaded but no '{column}' column found.")]
    EmptyDataset { column: String },
}

impl LoadError {
    /// Soft errors mean the dataset was read but held nothing usable.
    pub fn is_soft(&self) -> bool {
        matches!(self, LoadError::EmptyDataset { .. })
    }
}

fn describe_fetch(status: &Option<u16>, reason: &str) -> String {
    match status {
        Some(code) => format!("Failed to fetch TSV (HTTP {code})"),
        None => format!("Failed to fetch TSV: {reason}"),
    }
}

/// Location of the tab separated dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    Url(String),
    File(PathBuf),
}

impl DatasetSource {
    /// `http://` and `https://` locations are fetched, everything else is read from disk.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            DatasetSource::Url(location.to_string())
        } else {
            DatasetSource::File(PathBuf::from(location))
        }
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::Url(url) => f.write_str(url),
            DatasetSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Loader for the review dataset.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    source: DatasetSource,
    column: String,
    client: Client,
}

impl DatasetLoader {
    /// Create a new loader.
    ///
    /// # Arguments
    /// * `source` - where the TSV lives.
    /// * `column` - header name of the column holding the review text.
    pub fn new(source: DatasetSource, column: impl Into<String>) -> Self {
        Self {
            source,
            column: column.into(),
            client: Client::new(),
        }
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// Fetches and parses the dataset.
    ///
    /// # Returns
    /// * Corpus of non-empty reviews, `LoadError::Fetch` when the source cannot be read
    ///   or `LoadError::EmptyDataset` when it holds no usable row.
    pub async fn load(&self) -> Result<ReviewCorpus, LoadError> {
        let body = self.fetch().await?;
        let corpus = parse_tsv(&body, &self.column);

        info!(
            source = %self.source,
            column = %self.column,
            rows = corpus.len(),
            "Parsed review dataset"
        );

        if corpus.is_empty() {
            return Err(LoadError::EmptyDataset {
                column: self.column.clone(),
            });
        }

        Ok(corpus)
    }

    async fn fetch(&self) -> Result<String, LoadError> {
        match &self.source {
            DatasetSource::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| LoadError::Fetch {
                        status: None,
                        reason: format!("{}: {e}", path.display()),
                    })
            }
            DatasetSource::Url(url) => {
                let response = self
                    .client
                    .get(url)
                    .header(CACHE_CONTROL, "no-cache")
                    .header(PRAGMA, "no-cache")
                    .send()
                    .await
                    .map_err(|e| LoadError::Fetch {
                        status: e.status().map(|s| s.as_u16()),
                        reason: e.to_string(),
                    })?;

                let status = response.status();
                if !status.is_success() {
                    return Err(LoadError::Fetch {
                        status: Some(status.as_u16()),
                        reason: status.canonical_reason().unwrap_or_default().to_string(),
                    });
                }

                response.text().await.map_err(|e| LoadError::Fetch {
                    status: None,
                    reason: e.to_string(),
                })
            }
        }
    }
}

/// Parses header driven, tab delimited text and extracts one column.
///
/// # Arguments
/// * `body` - raw TSV content, the first row names the columns.
/// * `column` - name of the column to extract.
///
/// # Returns
/// Corpus with the trimmed, non-empty values of `column`; empty when the column is absent.
pub fn parse_tsv(body: &str, column: &str) -> ReviewCorpus {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let index = match reader.headers() {
        Ok(headers) => headers.iter().position(|h| h == column),
        Err(e) => {
            warn!("Failed to read TSV header: {e}");
            None
        }
    };

    let Some(index) = index else {
        debug!(column, "TSV header has no matching column");
        return ReviewCorpus::default();
    };

    let values = reader.records().filter_map(|record| match record {
        Ok(record) => Some(record.get(index).map(str::to_owned)),
        Err(e) => {
            warn!("Skipping undecodable TSV record: {e}");
            None
        }
    });

    ReviewCorpus::from_values(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };
    use tokio_test::{assert_err, assert_ok};

    const DATASET: &str = "id\ttext\tlabel\n\
        1\tGreat product, works as advertised.\t1\n\
        2\t   \t0\n\
        3\t\t0\n\
        4\t<b>Terrible</b> support\t0\n\
        5\n\
        6\t  Would buy again  \t1\n";

    /// Serves a single canned HTTP response and returns the URL to hit.
    async fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let request = String::from_utf8_lossy(&request).to_lowercase();
            assert!(request.contains("cache-control: no-cache"));
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{addr}/reviews_test.tsv")
    }

    fn http_response(status_line: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: text/tab-separated-values\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{name}", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_tsv_keeps_only_usable_rows() {
        let corpus = parse_tsv(DATASET, "text");
        assert_eq!(
            corpus.as_slice(),
            [
                "Great product, works as advertised.",
                "<b>Terrible</b> support",
                "Would buy again",
            ]
        );
    }

    #[test]
    fn test_parse_tsv_counts_non_empty_rows() {
        let rows = ["alpha", "", "beta", "  ", "gamma", "\t", "delta"];
        let body = std::iter::once("text\tscore".to_string())
            .chain(rows.iter().map(|r| format!("{r}\t1")))
            .collect::<Vec<_>>()
            .join("\n");
        let expected = rows.iter().filter(|r| !r.trim().is_empty()).count();

        assert_eq!(parse_tsv(&body, "text").len(), expected);
    }

    #[test]
    fn test_parse_tsv_without_text_column() {
        let body = "id\treview\n1\tgood\n2\tbad\n";
        assert!(parse_tsv(body, "text").is_empty());
        assert_eq!(parse_tsv(body, "review").len(), 2);
    }

    #[test]
    fn test_parse_tsv_matches_header_exactly() {
        let body = " text\tlabel\ngood\t1\n";
        assert!(parse_tsv(body, "text").is_empty());
        assert_eq!(parse_tsv(body, " text").as_slice(), ["good"]);
        assert!(parse_tsv("Text\nfine\n", "text").is_empty());
    }

    #[test]
    fn test_parse_tsv_handles_crlf_and_quotes() {
        let body = "text\tlabel\r\n\"tab\tinside\"\t1\r\nplain\t0\r\n";
        let corpus = parse_tsv(body, "text");
        assert_eq!(corpus.as_slice(), ["tab\tinside", "plain"]);
    }

    #[test]
    fn test_parse_tsv_empty_body() {
        assert!(parse_tsv("", "text").is_empty());
    }

    #[test]
    fn test_dataset_source_parse() {
        assert_eq!(
            DatasetSource::parse(" https://example.com/reviews.tsv "),
            DatasetSource::Url("https://example.com/reviews.tsv".to_string())
        );
        assert_eq!(
            DatasetSource::parse("reviews_test.tsv"),
            DatasetSource::File(PathBuf::from("reviews_test.tsv"))
        );
    }

    #[test]
    fn test_load_error_messages() {
        let http = LoadError::Fetch {
            status: Some(404),
            reason: "Not Found".to_string(),
        };
        assert_eq!(http.to_string(), "Failed to fetch TSV (HTTP 404)");
        assert!(!http.is_soft());

        let io = LoadError::Fetch {
            status: None,
            reason: "connection refused".to_string(),
        };
        assert_eq!(io.to_string(), "Failed to fetch TSV: connection refused");

        let empty = LoadError::EmptyDataset {
            column: "text".to_string(),
        };
        assert_eq!(empty.to_string(), "TSV loaded but no 'text' column found.");
        assert!(empty.is_soft());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let path = temp_file("reviews.tsv", DATASET);
        let loader = DatasetLoader::new(DatasetSource::File(path.clone()), "text");

        let corpus = assert_ok!(loader.load().await);
        assert_eq!(corpus.len(), 3);

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_load_without_text_column_is_soft() {
        let path = temp_file("no-text.tsv", "id\treview\n1\tgood\n");
        let loader = DatasetLoader::new(DatasetSource::File(path.clone()), "text");

        let err = assert_err!(loader.load().await);
        assert!(err.is_soft());
        assert_eq!(
            err,
            LoadError::EmptyDataset {
                column: "text".to_string()
            }
        );

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let loader = DatasetLoader::new(
            DatasetSource::File(Path::new("/definitely/not/here.tsv").to_path_buf()),
            "text",
        );

        let err = assert_err!(loader.load().await);
        assert!(!err.is_soft());
        assert!(matches!(err, LoadError::Fetch { status: None, .. }));
    }

    #[tokio::test]
    async fn test_load_from_url() {
        let url = serve_once(http_response("200 OK", DATASET)).await;
        let loader = DatasetLoader::new(DatasetSource::parse(&url), "text");

        let corpus = assert_ok!(loader.load().await);
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus[0], "Great product, works as advertised.");
    }

    #[tokio::test]
    async fn test_load_from_url_http_failure() {
        let url = serve_once(http_response("404 Not Found", "")).await;
        let loader = DatasetLoader::new(DatasetSource::parse(&url), "text");

        let err = assert_err!(loader.load().await);
        assert_eq!(
            err,
            LoadError::Fetch {
                status: Some(404),
                reason: "Not Found".to_string()
            }
        );
        assert_eq!(err.to_string(), "Failed to fetch TSV (HTTP 404)");
    }
}
