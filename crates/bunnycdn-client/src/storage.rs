//! Edge storage API client

use crate::{
    endpoint::{basename, normalize_path, UrlBuilder},
    http::{self, envelope},
    types::{StorageEntry, StorageObject},
    ApiFailure, ApiResult, ClientError, Envelope, Result, StorageConfig,
};
use bytes::Bytes;
use futures::StreamExt;
use reqwest::{header, Client, Method, RequestBuilder};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};
use url::Url;

/// Client for one storage zone, authenticated with the zone password.
///
/// Remote failures come back as [`ApiFailure`] values. Missing or
/// malformed paths and local filesystem errors are [`ClientError`]s raised
/// before any request is made.
#[derive(Clone)]
pub struct StorageClient {
    urls: UrlBuilder,
    http: Client,
}

impl std::fmt::Debug for StorageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageClient")
            .field("base_url", &self.urls.base().as_str())
            .finish()
    }
}

impl StorageClient {
    /// Create a new client. Fails if the storage zone name is empty.
    pub fn new(config: StorageConfig) -> Result<Self> {
        if config.storage_zone.trim_matches('/').trim().is_empty() {
            return Err(ClientError::Config(
                "storage_zone is not specified/missing".to_string(),
            ));
        }

        let urls = UrlBuilder::new(&config.base_url())?;

        let mut access_key = header::HeaderValue::from_str(&config.access_key).map_err(|_| {
            ClientError::Config("access_key is not a valid header value".to_string())
        })?;
        access_key.set_sensitive(true);

        let user_agent = header::HeaderValue::from_str(&config.user_agent).map_err(|_| {
            ClientError::Config("user_agent is not a valid header value".to_string())
        })?;

        let mut headers = header::HeaderMap::new();
        headers.insert("AccessKey", access_key);
        headers.insert(header::USER_AGENT, user_agent);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        // Idle timeouts only, so long transfers that keep moving are not cut off
        let mut builder = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        debug!(base_url = %urls.base(), "storage client ready");
        Ok(Self { urls, http })
    }

    /// Base URL of the zone, e.g. `https://storage.bunnycdn.com/<zone>/`
    pub fn base_url(&self) -> &str {
        self.urls.base().as_str()
    }

    // ==================== Object Operations ====================

    /// Download an object into `download_dir/<file name>`.
    ///
    /// The local file is created only once the provider has answered with
    /// a 2xx status. If the body stream breaks midway, a transport failure
    /// is returned and the local file is left partially written.
    #[instrument(skip(self))]
    pub async fn download_file(
        &self,
        storage_path: &str,
        download_dir: &Path,
    ) -> Result<ApiResult<Envelope>> {
        let path = normalize_path(storage_path)?;
        let file_name = basename(&path).ok_or_else(|| {
            ClientError::InvalidArgument("storage_path must be specified".to_string())
        })?;
        let target = download_dir.join(file_name);
        let url = self.urls.join(&path)?;

        let response = match http::send(self.request(Method::GET, url)).await {
            Ok(response) => response,
            Err(failure) => return Ok(Err(failure)),
        };
        let http_status = response.status().as_u16();

        let mut file = tokio::fs::File::create(&target).await?;
        let mut body = response.bytes_stream();
        let mut written: u64 = 0;
        while let Some(chunk) = body.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    file.flush().await?;
                    return Ok(Err(ApiFailure::transport(e)));
                }
            };
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        info!(bytes = written, target = %target.display(), "downloaded object");
        Ok(Ok(Envelope::new(
            http_status,
            "File downloaded Successfully".to_string(),
        )))
    }

    /// Upload `local_dir/file_name`.
    ///
    /// The object is stored at `storage_path` when one is given, otherwise
    /// under `file_name` at the zone root. The whole file is read into
    /// memory before the request; a missing source file is a
    /// [`ClientError::Io`].
    #[instrument(skip(self))]
    pub async fn put_file(
        &self,
        file_name: &str,
        storage_path: Option<&str>,
        local_dir: &Path,
    ) -> Result<ApiResult<Envelope>> {
        let file_name = normalize_path(file_name)?;
        if file_name.is_empty() {
            return Err(ClientError::InvalidArgument(
                "file_name must be specified".to_string(),
            ));
        }

        let target = match storage_path.map(normalize_path).transpose()? {
            Some(path) if !path.is_empty() => path,
            _ => file_name.clone(),
        };
        let url = self.urls.join(&target)?;

        let data = tokio::fs::read(local_dir.join(&file_name)).await?;

        Ok(self.upload(url, Bytes::from(data)).await)
    }

    /// Upload an in-memory buffer to `storage_path`
    #[instrument(skip(self, data))]
    pub async fn put_bytes(
        &self,
        storage_path: &str,
        data: impl Into<Bytes>,
    ) -> Result<ApiResult<Envelope>> {
        let target = normalize_path(storage_path)?;
        if target.is_empty() {
            return Err(ClientError::InvalidArgument(
                "storage_path must be specified".to_string(),
            ));
        }

        let url = self.urls.join(&target)?;
        Ok(self.upload(url, data.into()).await)
    }

    /// Delete an object, or a directory when the path ends with `/`
    #[instrument(skip(self))]
    pub async fn delete_file(&self, storage_path: &str) -> Result<ApiResult<Envelope>> {
        let path = normalize_path(storage_path)?;
        if path.is_empty() {
            return Err(ClientError::InvalidArgument(
                "storage_path must be specified".to_string(),
            ));
        }

        let url = if storage_path.ends_with('/') {
            self.urls.directory(&path)?
        } else {
            self.urls.join(&path)?
        };

        Ok(self.remove(url).await)
    }

    /// List a directory; `None` or an empty path lists the zone root
    #[instrument(skip(self))]
    pub async fn list_objects(
        &self,
        storage_path: Option<&str>,
    ) -> Result<ApiResult<Vec<StorageEntry>>> {
        let listing = self.list_objects_with_metadata(storage_path).await?;
        Ok(listing.map(|objects| objects.iter().map(StorageObject::entry).collect()))
    }

    /// List a directory, keeping the metadata the provider reports
    #[instrument(skip(self))]
    pub async fn list_objects_with_metadata(
        &self,
        storage_path: Option<&str>,
    ) -> Result<ApiResult<Vec<StorageObject>>> {
        let url = self.urls.directory(storage_path.unwrap_or_default())?;
        Ok(self.fetch_listing(url).await)
    }

    // ==================== Helper Methods ====================

    async fn upload(&self, url: Url, data: Bytes) -> ApiResult<Envelope> {
        debug!(bytes = data.len(), "uploading object");
        let request = self
            .request(Method::PUT, url)
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(data);
        let response = http::send(request).await?;
        Ok(envelope(&response, "The File Upload was Successful"))
    }

    async fn remove(&self, url: Url) -> ApiResult<Envelope> {
        let response = http::send(self.request(Method::DELETE, url)).await?;
        Ok(envelope(&response, "Object Successfully Deleted"))
    }

    async fn fetch_listing(&self, url: Url) -> ApiResult<Vec<StorageObject>> {
        let response = http::send(self.request(Method::GET, url)).await?;
        http::json(response).await
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("Sending {} request to {}", method, url);
        self.http.request(method, url)
    }
}
