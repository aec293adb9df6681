use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::CatalogError;
use crate::model::{Card, CardSet};

const API_KEY_HEADER: &str = "X-Api-Key";
const CLIENT_USER_AGENT: &str = "holoswap/0.1 (+reqwest)";
const SET_DIRECTORY_ORDER: &str = "-releaseDate";

/// One page of catalog search results, as returned by `/cards`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardPage {
  pub data: Vec<Card>,
  #[serde(default)]
  pub page: i64,
  #[serde(default)]
  pub page_size: i64,
  /// Items on this page.
  #[serde(default)]
  pub count: i64,
  /// Items matching the query across all pages.
  #[serde(default)]
  pub total_count: i64,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
  data: T,
}

/// Read access to the remote card catalog.
///
/// `query` uses the catalog's own syntax (`name:"pika*" set.id:base1`) and
/// `order_by` its sort keys; both are passed through untouched.
pub trait CatalogGateway {
  fn fetch_page(
    &self,
    page: i64,
    query: Option<&str>,
    order_by: Option<&str>,
  ) -> Result<CardPage, CatalogError>;

  fn fetch_sets(&self) -> Result<Vec<CardSet>, CatalogError>;

  fn fetch_card(&self, id: &str) -> Result<Card, CatalogError>;
}

/// Blocking client for the Pokemon TCG API.
pub struct PokemonTcgClient {
  client: Client,
  base_url: String,
  api_key: Option<String>,
  page_size: i64,
}

impl PokemonTcgClient {
  pub fn new(config: &AppConfig) -> Result<Self, CatalogError> {
    let client = Client::builder()
      .timeout(config.request_timeout())
      .build()
      .map_err(|e| CatalogError::Client(e.to_string()))?;

    if config.api_key.is_some() {
      log::info!("Pokemon TCG client configured with API key.");
    } else {
      log::warn!("Pokemon TCG client running without API key. Requests may be rate limited.");
    }

    Ok(Self {
      client,
      base_url: config.api_base_url.trim_end_matches('/').to_string(),
      api_key: config.api_key.clone(),
      page_size: config.api_page_size,
    })
  }

  fn get_json<T: DeserializeOwned>(
    &self,
    path: &str,
    params: &[(&str, String)],
  ) -> Result<T, CatalogError> {
    let url = format!("{}/{}", self.base_url, path);
    let mut request = self
      .client
      .get(&url)
      .header(USER_AGENT, CLIENT_USER_AGENT)
      .header(ACCEPT, "application/json")
      .query(params);
    if let Some(api_key) = &self.api_key {
      request = request.header(API_KEY_HEADER, api_key);
    }

    let response = request.send()?;
    ensure_success(&response)?;
    let body = response.text()?;
    Ok(serde_json::from_str(&body)?)
  }
}

impl CatalogGateway for PokemonTcgClient {
  fn fetch_page(
    &self,
    page: i64,
    query: Option<&str>,
    order_by: Option<&str>,
  ) -> Result<CardPage, CatalogError> {
    log::info!(
      "Fetching cards - Page: {}, Query: {}, Order: {}",
      page,
      query.unwrap_or("None"),
      order_by.unwrap_or("None")
    );
    let params = card_page_params(page, self.page_size, query, order_by);
    let result: CardPage = self.get_json("cards", &params).map_err(|error| {
      log::error!("Error fetching cards: {}", error);
      error
    })?;
    log::info!(
      "Fetched {} cards. Total count: {}",
      result.data.len(),
      result.total_count
    );
    Ok(result)
  }

  fn fetch_sets(&self) -> Result<Vec<CardSet>, CatalogError> {
    let params = [("orderBy", SET_DIRECTORY_ORDER.to_string())];
    let envelope: DataEnvelope<Vec<CardSet>> = self.get_json("sets", &params)?;
    log::info!("Fetched {} sets.", envelope.data.len());
    Ok(envelope.data)
  }

  fn fetch_card(&self, id: &str) -> Result<Card, CatalogError> {
    log::info!("Fetching card details for ID: {}", id);
    let envelope: DataEnvelope<Card> = self.get_json(&format!("cards/{}", id.trim()), &[])?;
    Ok(envelope.data)
  }
}

fn ensure_success(response: &Response) -> Result<(), CatalogError> {
  if !response.status().is_success() {
    return Err(CatalogError::Status {
      status: response.status().as_u16(),
      url: response.url().to_string(),
    });
  }
  Ok(())
}

fn card_page_params(
  page: i64,
  page_size: i64,
  query: Option<&str>,
  order_by: Option<&str>,
) -> Vec<(&'static str, String)> {
  let mut params = vec![
    ("page", page.max(1).to_string()),
    ("pageSize", page_size.to_string()),
  ];
  if let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) {
    params.push(("q", query.to_string()));
  }
  if let Some(order_by) = order_by.map(str::trim).filter(|o| !o.is_empty()) {
    params.push(("orderBy", order_by.to_string()));
  }
  params
}
