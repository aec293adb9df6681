use crate::catalog::{CatalogGateway, PokemonTcgClient};
use crate::collection::{CollectionList, CollectionStore};
use crate::config::AppConfig;
use crate::error::CatalogError;
use crate::model::Card;
use crate::storage::SqliteStore;
use crate::view::{BrowseView, LocalView, SetDirectory};

/// Session-wide state. Views borrow the store and the gateway from here;
/// nothing in the crate reaches them through a global.
pub struct App {
  config: AppConfig,
  store: CollectionStore,
  gateway: Box<dyn CatalogGateway>,
  sets: SetDirectory,
}

impl App {
  /// Opens the collection database under the configured data directory
  /// and builds the HTTP catalog client.
  pub fn open(config: AppConfig) -> Result<Self, String> {
    let storage = SqliteStore::open(config.db_path())?;
    let gateway = PokemonTcgClient::new(&config).map_err(|e| e.to_string())?;
    Ok(Self::with_parts(config, CollectionStore::load(storage), gateway))
  }

  pub fn with_parts(
    config: AppConfig,
    store: CollectionStore,
    gateway: impl CatalogGateway + 'static,
  ) -> Self {
    Self {
      config,
      store,
      gateway: Box::new(gateway),
      sets: SetDirectory::default(),
    }
  }

  pub fn config(&self) -> &AppConfig {
    &self.config
  }

  pub fn store(&self) -> &CollectionStore {
    &self.store
  }

  pub fn store_mut(&mut self) -> &mut CollectionStore {
    &mut self.store
  }

  pub fn gateway(&self) -> &dyn CatalogGateway {
    self.gateway.as_ref()
  }

  pub fn browse_view(&self) -> BrowseView {
    BrowseView::new(&self.config)
  }

  /// Browse view restored from URL query parameters.
  pub fn browse_view_from_query<'a, I>(&self, params: I) -> BrowseView
  where
    I: IntoIterator<Item = (&'a str, &'a str)>,
  {
    BrowseView::from_query_params(&self.config, params)
  }

  pub fn local_view(&self, list: CollectionList) -> LocalView {
    LocalView::new(list, &self.config)
  }

  pub fn load_cards(&self, view: &mut BrowseView) {
    view.load(self.gateway.as_ref());
  }

  pub fn load_sets(&mut self) -> &SetDirectory {
    self.sets.load(self.gateway.as_ref());
    &self.sets
  }

  pub fn sets(&self) -> &SetDirectory {
    &self.sets
  }

  pub fn card_detail(&self, card_id: &str) -> Result<Card, CatalogError> {
    self.gateway.fetch_card(card_id)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::CardPage;
  use crate::model::fixtures::{card, set};
  use crate::model::CardSet;
  use crate::storage::MemoryStore;

  struct FixedCatalog;

  impl CatalogGateway for FixedCatalog {
    fn fetch_page(&self, page: i64, _: Option<&str>, _: Option<&str>) -> Result<CardPage, CatalogError> {
      let base = set("base1", Some("1999/01/09"));
      Ok(CardPage {
        data: vec![card("base1-58", "Pikachu", &base)],
        page,
        page_size: 40,
        count: 1,
        total_count: 1,
      })
    }

    fn fetch_sets(&self) -> Result<Vec<CardSet>, CatalogError> {
      Ok(vec![set("base1", Some("1999/01/09"))])
    }

    fn fetch_card(&self, id: &str) -> Result<Card, CatalogError> {
      if id == "base1-58" {
        return Ok(card(id, "Pikachu", &set("base1", None)));
      }
      Err(CatalogError::Status { status: 404, url: format!("cards/{}", id) })
    }
  }

  fn app() -> App {
    App::with_parts(
      AppConfig::default(),
      CollectionStore::load(MemoryStore::new()),
      FixedCatalog,
    )
  }

  #[test]
  fn views_share_the_app_store() {
    let mut app = app();
    let mut browse = app.browse_view();
    app.load_cards(&mut browse);

    let pikachu = browse.cards()[0].clone();
    app.store_mut().add_double(&pikachu);

    let owned = app.local_view(CollectionList::Owned).current_page(app.store());
    assert_eq!(owned.total_match_count, 1);
    assert!(browse.cards_with_membership(app.store())[0].1.double);
  }

  #[test]
  fn loads_sets_and_card_detail() {
    let mut app = app();
    assert!(app.sets().is_loading());
    assert_eq!(app.load_sets().options().len(), 2);

    assert_eq!(app.card_detail("base1-58").unwrap().name, "Pikachu");
    assert!(matches!(
      app.card_detail("nope"),
      Err(CatalogError::Status { status: 404, .. })
    ));
  }

  #[test]
  fn open_creates_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
      data_dir: dir.path().join("nested"),
      ..AppConfig::default()
    };
    let app = App::open(config).unwrap();
    assert!(app.config().db_path().exists());
    assert_eq!(app.store().count(CollectionList::Owned), 0);
  }
}
