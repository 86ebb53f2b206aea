//! HTTP client for the portfolio API.

use color_eyre::{eyre::eyre, Result};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::cache::{Family, ListParams};
use crate::config::Config;

use super::types::{Envelope, ErrorBody, ListData, Mutated};

/// Typed resource client performing the four CRUD verbs against a family's
/// collection endpoint. Auth is a bearer token from the session, when one
/// exists.
#[derive(Clone)]
pub struct ApiClient {
  http: reqwest::Client,
  base: Url,
  token: Option<String>,
}

impl ApiClient {
  pub fn new(config: &Config, token: Option<String>) -> Result<Self> {
    let base = Url::parse(&config.api.url)
      .map_err(|e| eyre!("Invalid API url {}: {}", config.api.url, e))?;

    let http = reqwest::Client::builder()
      .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { http, base, token })
  }

  fn endpoint(&self, path: &str) -> Result<Url> {
    let joined = format!("{}/{}", self.base.as_str().trim_end_matches('/'), path);
    Url::parse(&joined).map_err(|e| eyre!("Invalid endpoint {}: {}", joined, e))
  }

  fn request(&self, method: Method, url: Url) -> RequestBuilder {
    let builder = self.http.request(method, url);
    match &self.token {
      Some(token) => builder.bearer_auth(token),
      None => builder,
    }
  }

  /// List a family's collection, flat or paginated.
  pub async fn list<T: DeserializeOwned>(
    &self,
    family: Family,
    params: &ListParams,
  ) -> Result<Vec<T>> {
    let mut url = self.endpoint(family.path())?;
    for (name, value) in params.query_pairs() {
      url.query_pairs_mut().append_pair(name, &value);
    }
    debug!(url = %url, "GET list");

    let fallback = format!("{} could not be loaded", family.label());
    let response = self
      .request(Method::GET, url)
      .send()
      .await
      .map_err(|e| eyre!("{}: {}", fallback, e))?;
    let envelope: Envelope<ListData<T>> = decode(response, &fallback).await?;

    Ok(envelope.data.into_items())
  }

  /// Fetch a singleton record (the personal-info profile).
  pub async fn get_one<T: DeserializeOwned>(&self, family: Family) -> Result<T> {
    let url = self.endpoint(family.path())?;
    let fallback = format!("{} could not be loaded", family.label());
    let response = self
      .request(Method::GET, url)
      .send()
      .await
      .map_err(|e| eyre!("{}: {}", fallback, e))?;
    let envelope: Envelope<T> = decode(response, &fallback).await?;

    Ok(envelope.data)
  }

  pub async fn create(&self, family: Family, body: &Value) -> Result<Mutated> {
    let url = self.endpoint(family.path())?;
    let fallback = format!("{} creation failed", family.singular());
    self.mutate(Method::POST, url, Some(body), &fallback).await
  }

  /// Update one entry, or the whole record for singleton families.
  pub async fn update(&self, family: Family, id: Option<&str>, body: &Value) -> Result<Mutated> {
    let url = match id {
      Some(id) => self.endpoint(&format!("{}/{}", family.path(), id))?,
      None => self.endpoint(family.path())?,
    };
    let fallback = format!("{} update failed", family.singular());
    self.mutate(Method::PUT, url, Some(body), &fallback).await
  }

  pub async fn delete(&self, family: Family, id: &str) -> Result<Mutated> {
    let url = self.endpoint(&format!("{}/{}", family.path(), id))?;
    let fallback = format!("{} deletion failed", family.singular());
    self.mutate(Method::DELETE, url, None, &fallback).await
  }

  async fn mutate(
    &self,
    method: Method,
    url: Url,
    body: Option<&Value>,
    fallback: &str,
  ) -> Result<Mutated> {
    debug!(method = %method, url = %url, "mutation");
    let mut builder = self.request(method, url);
    if let Some(body) = body {
      builder = builder.json(body);
    }
    let response = builder
      .send()
      .await
      .map_err(|e| eyre!("{}: {}", fallback, e))?;

    // Delete returns data: null, create/update return the entity; neither
    // is needed beyond the message
    let envelope: Envelope<Value> = decode(response, fallback).await?;
    Ok(Mutated {
      message: envelope.message,
    })
  }
}

/// Parse a response envelope, surfacing the server message on failure when
/// the body follows the envelope shape, else the per-operation fallback.
async fn decode<T: DeserializeOwned>(
  response: reqwest::Response,
  fallback: &str,
) -> Result<Envelope<T>> {
  let status = response.status();
  let body = response
    .bytes()
    .await
    .map_err(|e| eyre!("{}: {}", fallback, e))?;

  if !status.is_success() {
    if let Ok(error) = serde_json::from_slice::<ErrorBody>(&body) {
      if let Some(message) = error.message {
        return Err(eyre!(message));
      }
    }
    if status == StatusCode::NOT_FOUND {
      return Err(eyre!("{}: not found", fallback));
    }
    return Err(eyre!("{} ({})", fallback, status));
  }

  serde_json::from_slice(&body).map_err(|e| eyre!("{}: {}", fallback, e))
}
