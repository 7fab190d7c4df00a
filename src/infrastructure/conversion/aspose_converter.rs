//! Aspose Words Cloud client.
//!
//! Uses the v4.0 REST API with an OAuth client-credentials token:
//!
//! - `POST /connect/token`
//! - `PUT  /v4.0/words/storage/file/{path}` (multipart upload)
//! - `PUT  /v4.0/words/{name}/saveAs?folder={folder}`
//! - `GET  /v4.0/words/storage/file/{path}`

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::json;
use url::Url;

use super::service::{ConversionError, ConversionResult, DocumentConverter, TargetFormat};
use crate::infrastructure::oauth::{TokenCache, TokenGrant};

/// Aspose Words Cloud conversion client.
pub struct AsposeConverter {
    http: Client,
    base_url: Url,
    client_id: String,
    client_secret: String,
    token: TokenCache,
}

impl AsposeConverter {
    /// Creates a client for the API rooted at `base_url` (e.g. `https://api.aspose.cloud`).
    pub fn new(
        http: Client,
        base_url: &str,
        client_id: String,
        client_secret: String,
    ) -> ConversionResult<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http,
            base_url,
            client_id,
            client_secret,
            token: TokenCache::new(),
        })
    }

    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> ConversionResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn storage_file_url(&self, path: &str) -> ConversionResult<Url> {
        self.endpoint(
            ["v4.0", "words", "storage", "file"]
                .into_iter()
                .chain(path.split('/').filter(|s| !s.is_empty())),
        )
    }

    async fn fetch_token(&self) -> ConversionResult<TokenGrant> {
        let response = self
            .http
            .post(self.endpoint(["connect", "token"])?)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConversionError::Auth {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json().await?)
    }

    async fn authorized(&self, method: Method, url: Url) -> ConversionResult<RequestBuilder> {
        let token = self.token.get_or_fetch(|| self.fetch_token()).await?;
        Ok(self.http.request(method, url).bearer_auth(token))
    }

    async fn check(&self, step: &'static str, response: Response) -> ConversionResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            self.token.invalidate().await;
        }

        Err(ConversionError::Api {
            step,
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        })
    }
}

/// Splits `folder/name` into `(Some(folder), name)`.
fn split_path(path: &str) -> (Option<&str>, &str) {
    match path.trim_matches('/').rsplit_once('/') {
        Some((folder, name)) => (Some(folder), name),
        None => (None, path.trim_matches('/')),
    }
}

#[async_trait]
impl DocumentConverter for AsposeConverter {
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> ConversionResult<()> {
        let (_, file_name) = split_path(path);
        let form = Form::new().part(
            "fileContent",
            Part::bytes(bytes).file_name(file_name.to_string()),
        );

        let response = self
            .authorized(Method::PUT, self.storage_file_url(path)?)
            .await?
            .multipart(form)
            .send()
            .await?;
        self.check("upload", response).await?;

        tracing::debug!(path, "Uploaded document for conversion");
        Ok(())
    }

    async fn save_as(
        &self,
        source: &str,
        target: &str,
        format: TargetFormat,
    ) -> ConversionResult<()> {
        let (folder, name) = split_path(source);
        let mut url = self.endpoint(["v4.0", "words", name, "saveAs"])?;
        if let Some(folder) = folder {
            url.query_pairs_mut().append_pair("folder", folder);
        }

        let response = self
            .authorized(Method::PUT, url)
            .await?
            .json(&json!({
                "SaveFormat": format.as_str(),
                "FileName": target,
            }))
            .send()
            .await?;
        self.check("save_as", response).await?;

        tracing::debug!(source, target, format = format.as_str(), "Conversion finished");
        Ok(())
    }

    async fn download(&self, path: &str) -> ConversionResult<Vec<u8>> {
        let response = self
            .authorized(Method::GET, self.storage_file_url(path)?)
            .await?
            .send()
            .await?;
        let response = self.check("download", response).await?;

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converter() -> AsposeConverter {
        AsposeConverter::new(
            Client::new(),
            "https://api.aspose.cloud",
            "id".to_string(),
            "secret".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("offers/ABC/Offer_Asha.docx"), (Some("offers/ABC"), "Offer_Asha.docx"));
        assert_eq!(split_path("Offer_Asha.docx"), (None, "Offer_Asha.docx"));
        assert_eq!(split_path("/Offer_Asha.docx"), (None, "Offer_Asha.docx"));
    }

    #[test]
    fn test_storage_url_keeps_folders_as_segments() {
        let url = converter()
            .storage_file_url("offers/ABC123XYZ/Offer_Asha Rao.docx")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.aspose.cloud/v4.0/words/storage/file/offers/ABC123XYZ/Offer_Asha%20Rao.docx"
        );
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let converter = AsposeConverter::new(
            Client::new(),
            "http://localhost:9000/proxy",
            "id".to_string(),
            "secret".to_string(),
        )
        .unwrap();
        let url = converter.endpoint(["connect", "token"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/proxy/connect/token");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = AsposeConverter::new(
            Client::new(),
            "not a url",
            "id".to_string(),
            "secret".to_string(),
        );
        assert!(matches!(result, Err(ConversionError::Url(_))));
    }
}
