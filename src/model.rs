use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const CARD_IMAGE_PLACEHOLDER: &str = "/images/card-placeholder.png";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CardImages {
  #[serde(default)]
  pub small: String,
  #[serde(default)]
  pub large: String,
}

/// A release grouping in the catalog. Read-only reference data.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CardSet {
  pub id: String,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub series: String,
  #[serde(default)]
  pub release_date: Option<String>,
  #[serde(default)]
  pub printed_total: Option<i64>,
  #[serde(default)]
  pub total: Option<i64>,
}

impl CardSet {
  /// Release date as a unix timestamp in milliseconds. Missing or unparsable
  /// dates sort as the epoch.
  pub fn release_timestamp(&self) -> i64 {
    self
      .release_date
      .as_deref()
      .and_then(parse_release_date)
      .unwrap_or(0)
  }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub set: CardSet,
  #[serde(default)]
  pub images: CardImages,
  #[serde(default)]
  pub number: Option<String>,
}

impl Card {
  pub fn set_id(&self) -> &str {
    &self.set.id
  }

  pub fn thumbnail_url(&self) -> &str {
    if self.images.small.trim().is_empty() {
      CARD_IMAGE_PLACEHOLDER
    } else {
      &self.images.small
    }
  }

  /// Leading digits of the printed number ("58" for "58a", "TG05" has none).
  pub fn number_value(&self) -> Option<u32> {
    let digits: String = self
      .number
      .as_deref()?
      .trim()
      .chars()
      .take_while(|c| c.is_ascii_digit())
      .collect();
    digits.parse().ok()
  }
}

fn parse_release_date(value: &str) -> Option<i64> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return None;
  }
  for format in ["%Y/%m/%d", "%Y-%m-%d"] {
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
      return date
        .and_hms_opt(0, 0, 0)
        .map(|datetime| datetime.and_utc().timestamp_millis());
    }
  }
  for format in ["%Y/%m/%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
    if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
      return Some(datetime.and_utc().timestamp_millis());
    }
  }
  None
}
