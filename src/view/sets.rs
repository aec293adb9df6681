use serde::Serialize;

use crate::catalog::CatalogGateway;
use crate::model::CardSet;
use crate::query::ALL_SETS;

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SetOption {
  pub value: String,
  pub label: String,
  pub disabled: bool,
}

/// Set-filter choices. A failed fetch leaves the list empty with an error
/// message; the filter still offers "All Sets" and card loading goes on.
#[derive(Clone, Debug, Default)]
pub struct SetDirectory {
  sets: Vec<CardSet>,
  error: Option<String>,
  loaded: bool,
}

impl SetDirectory {
  pub fn load(&mut self, gateway: &dyn CatalogGateway) {
    match gateway.fetch_sets() {
      Ok(sets) => {
        self.sets = sets;
        self.error = None;
      }
      Err(error) => {
        log::warn!("Failed to load sets: {}", error);
        self.sets.clear();
        self.error = Some(error.to_string());
      }
    }
    self.loaded = true;
  }

  pub fn sets(&self) -> &[CardSet] {
    &self.sets
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  pub fn is_loading(&self) -> bool {
    !self.loaded
  }

  pub fn find(&self, set_id: &str) -> Option<&CardSet> {
    self.sets.iter().find(|set| set.id == set_id)
  }

  pub fn options(&self) -> Vec<SetOption> {
    let mut options = vec![SetOption {
      value: ALL_SETS.to_string(),
      label: "All Sets".to_string(),
      disabled: false,
    }];
    if self.error.is_some() {
      options.push(SetOption {
        value: "error".to_string(),
        label: "Error loading sets".to_string(),
        disabled: true,
      });
    }
    options.extend(self.sets.iter().map(|set| SetOption {
      value: set.id.clone(),
      label: set.name.clone(),
      disabled: false,
    }));
    options
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::CardPage;
  use crate::error::CatalogError;
  use crate::model::fixtures::set;
  use crate::model::Card;

  struct SetsOnly(Option<Vec<CardSet>>);

  impl CatalogGateway for SetsOnly {
    fn fetch_page(&self, _: i64, _: Option<&str>, _: Option<&str>) -> Result<CardPage, CatalogError> {
      Ok(CardPage::default())
    }

    fn fetch_sets(&self) -> Result<Vec<CardSet>, CatalogError> {
      self
        .0
        .clone()
        .ok_or_else(|| CatalogError::Client("offline".to_string()))
    }

    fn fetch_card(&self, _: &str) -> Result<Card, CatalogError> {
      Err(CatalogError::Client("offline".to_string()))
    }
  }

  #[test]
  fn lists_sets_after_all() {
    let mut directory = SetDirectory::default();
    assert!(directory.is_loading());
    directory.load(&SetsOnly(Some(vec![set("base1", None), set("base2", None)])));

    let values: Vec<String> = directory.options().into_iter().map(|o| o.value).collect();
    assert_eq!(values, vec!["all", "base1", "base2"]);
    assert_eq!(directory.find("base2").map(|s| s.name.as_str()), Some("Set base2"));
  }

  #[test]
  fn failure_degrades_to_all_sets() {
    let mut directory = SetDirectory::default();
    directory.load(&SetsOnly(None));

    assert!(!directory.is_loading());
    assert!(directory.sets().is_empty());
    assert!(directory.error().unwrap().contains("offline"));
    let options = directory.options();
    assert_eq!(options.len(), 2);
    assert!(options[1].disabled);
  }
}
