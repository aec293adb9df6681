use thiserror::Error;

/// Failures talking to the card catalog. Views turn these into a message and
/// an empty result; nothing here is fatal.
#[derive(Error, Debug)]
pub enum CatalogError {
  #[error("HTTP client build failed: {0}")]
  Client(String),

  #[error("Catalog request failed: {0}")]
  Http(Box<reqwest::Error>),

  #[error("Catalog request failed with status {status} for {url}")]
  Status { status: u16, url: String },

  #[error("Unable to parse catalog response: {0}")]
  Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for CatalogError {
  fn from(error: reqwest::Error) -> Self {
    CatalogError::Http(Box::new(error))
  }
}
