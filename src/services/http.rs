use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use reqwest::{
    header::USER_AGENT,
    multipart::{
        Form,
        Part,
    },
    Client,
    Response,
};

use super::{
    FileUpload,
    ParseService,
    RawResponse,
    SaveService,
};
use crate::core::{
    settings::Settings,
    FormError,
    TransportError,
};

const AGENT: &str = "cardform/0.1 (+reqwest)";

pub fn http_client(timeout: Duration) -> Result<Client, FormError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Both collaborators over plain HTTP, sharing one client.
#[derive(Clone)]
pub struct HttpCollaborator {
    client: Client,
    parse_url: String,
    save_url: String,
}

impl HttpCollaborator {
    pub fn new(client: Client, parse_url: impl Into<String>, save_url: impl Into<String>) -> Self {
        Self { client, parse_url: parse_url.into(), save_url: save_url.into() }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, FormError> {
        let client = http_client(Duration::from_secs(settings.request_timeout_secs))?;
        Ok(Self::new(client, settings.parse_url.clone(), settings.save_url.clone()))
    }
}

async fn into_raw(resp: Response) -> Result<RawResponse, TransportError> {
    let status = resp.status().as_u16();
    let body = resp.text().await?;
    Ok(RawResponse { status, body })
}

#[async_trait]
impl ParseService for HttpCollaborator {
    async fn upload(&self, file: &FileUpload) -> Result<RawResponse, TransportError> {
        let part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        let form = Form::new().part("file", part);

        tracing::debug!(url = %self.parse_url, file = %file.file_name, "uploading file");
        let resp = self
            .client
            .post(&self.parse_url)
            .header(USER_AGENT, AGENT)
            .multipart(form)
            .send()
            .await?;
        into_raw(resp).await
    }
}

#[async_trait]
impl SaveService for HttpCollaborator {
    async fn save(&self, payload: &IndexMap<String, String>) -> Result<RawResponse, TransportError> {
        tracing::debug!(url = %self.save_url, fields = payload.len(), "posting form");
        let resp = self
            .client
            .post(&self.save_url)
            .header(USER_AGENT, AGENT)
            .json(payload)
            .send()
            .await?;
        into_raw(resp).await
    }
}
