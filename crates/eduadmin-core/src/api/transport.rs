use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};

use super::error::TransportError;
use super::response::RawResponse;
use crate::config::ClientConfig;
use crate::form::{FieldValue, FormPayload};

/// The collaborating server, seen as three request shapes.
///
/// Implementations only move bytes; interpreting the body is the caller's job.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// `POST` with no body
    async fn post_empty(&self, path: &str) -> Result<RawResponse, TransportError>;

    /// `POST` with a multipart body
    async fn post_form(
        &self,
        path: &str,
        form: &FormPayload,
    ) -> Result<RawResponse, TransportError>;

    async fn get(&self, path: &str) -> Result<RawResponse, TransportError>;
}

/// reqwest-backed transport. Session cookies live in a shared jar so whatever
/// the server sets is replayed on later requests.
pub struct HttpTransport {
    base_url: String,
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let base_url = config.base_url().to_string();
        let url = Url::parse(&base_url).map_err(|_| TransportError::InvalidBaseUrl {
            url: base_url.clone(),
        })?;

        let jar = Jar::default();
        if let Some(cookie) = &config.session_cookie {
            for pair in cookie.split(';').map(str::trim).filter(|p| !p.is_empty()) {
                jar.add_cookie_str(pair, &url);
            }
        }

        let client = Client::builder()
            .cookie_provider(Arc::new(jar))
            .timeout(config.timeout())
            .build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read(response: reqwest::Response) -> Result<RawResponse, TransportError> {
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        tracing::debug!("response: HTTP {} ({} bytes)", status, body.len());
        Ok(RawResponse { status, body })
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn post_empty(&self, path: &str) -> Result<RawResponse, TransportError> {
        tracing::debug!("POST {}", path);
        let response = self.client.post(self.url(path)).send().await?;
        Self::read(response).await
    }

    async fn post_form(
        &self,
        path: &str,
        form: &FormPayload,
    ) -> Result<RawResponse, TransportError> {
        tracing::debug!("POST {} ({} fields)", path, form.fields().len());
        let body = multipart_body(form)?;
        let response = self.client.post(self.url(path)).multipart(body).send().await?;
        Self::read(response).await
    }

    async fn get(&self, path: &str) -> Result<RawResponse, TransportError> {
        tracing::debug!("GET {}", path);
        let response = self.client.get(self.url(path)).send().await?;
        Self::read(response).await
    }
}

fn multipart_body(form: &FormPayload) -> Result<Form, TransportError> {
    let mut body = Form::new();
    for field in form.fields() {
        body = match &field.value {
            FieldValue::Text(value) => body.text(field.name.clone(), value.clone()),
            FieldValue::File {
                filename,
                mime_type,
                data,
            } => {
                let part = Part::bytes(data.clone())
                    .file_name(filename.clone())
                    .mime_str(mime_type)?;
                body.part(field.name.clone(), part)
            }
        };
    }
    Ok(body)
}
