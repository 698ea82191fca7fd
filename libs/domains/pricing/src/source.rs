use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::error::{PricingError, PricingResult};
use crate::models::PricingArtifact;

/// Where a pricing artifact comes from.
///
/// Implementations perform a single fetch and never retry; the repository
/// decides what a failure means.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Human-readable origin, used in logs
    fn describe(&self) -> String;

    /// Fetch and parse the artifact
    async fn fetch(&self) -> PricingResult<PricingArtifact>;
}

/// Reads the artifact from a local JSON file
#[derive(Debug, Clone)]
pub struct FilePriceSource {
    path: PathBuf,
}

impl FilePriceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PriceSource for FilePriceSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    async fn fetch(&self) -> PricingResult<PricingArtifact> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| PricingError::Io {
                path: self.path.display().to_string(),
                source,
            })?;

        debug!(path = %self.path.display(), bytes = raw.len(), "Read pricing artifact");
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Downloads the artifact over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpPriceSource {
    url: String,
    client: Client,
}

impl HttpPriceSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> PricingResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl PriceSource for HttpPriceSource {
    fn describe(&self) -> String {
        format!("url {}", self.url)
    }

    async fn fetch(&self) -> PricingResult<PricingArtifact> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PricingError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let raw = response.text().await?;
        debug!(url = %self.url, bytes = raw.len(), "Downloaded pricing artifact");
        Ok(serde_json::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_file_source_reads_artifact() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"us-east-1":{{"AmazonEC2":{{"t3.micro":{{"unit":"Hrs","pricePerUnit":0.0104,"currency":"USD"}}}}}}}}"#
        )
        .unwrap();

        let source = FilePriceSource::new(file.path());
        let artifact = source.fetch().await.unwrap();

        assert_eq!(artifact.len(), 1);
        assert!(source.describe().starts_with("file "));
    }

    #[tokio::test]
    async fn test_file_source_missing_file_is_io_error() {
        let source = FilePriceSource::new("/definitely/not/here/pricing.json");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, PricingError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here/pricing.json"));
    }

    #[tokio::test]
    async fn test_file_source_malformed_json_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = FilePriceSource::new(file.path()).fetch().await.unwrap_err();
        assert!(matches!(err, PricingError::Parse(_)));
    }

    async fn serve(template: ResponseTemplate) -> (MockServer, HttpPriceSource) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pricing.json"))
            .respond_with(template)
            .mount(&server)
            .await;
        let source =
            HttpPriceSource::new(format!("{}/pricing.json", server.uri()), Duration::from_secs(5))
                .unwrap();
        (server, source)
    }

    #[tokio::test]
    async fn test_http_source_downloads_artifact() {
        let (_server, source) = serve(ResponseTemplate::new(200).set_body_string(
            r#"{"us-east-1":{"AmazonS3":{"s3_standard_storage":{"unit":"GB-Mo","pricePerUnit":"0.023"}}}}"#,
        ))
        .await;

        let artifact = source.fetch().await.unwrap();
        let s3 = artifact.service("us-east-1", "AmazonS3").unwrap();
        assert_eq!(s3["s3_standard_storage"].price_per_unit, 0.023);
    }

    #[tokio::test]
    async fn test_http_source_non_success_status_is_error() {
        let (_server, source) = serve(ResponseTemplate::new(503)).await;

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, PricingError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_http_source_malformed_body_is_parse_error() {
        let (_server, source) =
            serve(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>")).await;

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, PricingError::Parse(_)));
    }

    #[test]
    fn test_http_source_describes_its_url() {
        let source =
            HttpPriceSource::new("https://example.com/pricing.json", Duration::from_secs(1))
                .unwrap();
        assert_eq!(source.describe(), "url https://example.com/pricing.json");
    }
}
