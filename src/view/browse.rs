use std::time::Instant;

use super::QueryState;
use crate::catalog::{CardPage, CatalogGateway};
use crate::collection::{CardMembership, CollectionStore};
use crate::config::AppConfig;
use crate::debounce::Debouncer;
use crate::error::CatalogError;
use crate::model::Card;
use crate::pagination::{self, compute_range, should_render_pager, PageItem};
use crate::query::{SetFilter, SortKey, SortOption, BROWSE_SORT_OPTIONS};

pub const BROWSE_DEFAULT_SORT: SortKey = SortKey::ReleaseDateDesc;

/// A catalog fetch issued by [`BrowseView::begin_load`]. Only the most
/// recently issued request may update the view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardRequest {
  pub generation: u64,
  pub page: i64,
  pub query: Option<String>,
  pub order_by: String,
}

impl CardRequest {
  pub fn execute(&self, gateway: &dyn CatalogGateway) -> Result<CardPage, CatalogError> {
    gateway.fetch_page(self.page, self.query.as_deref(), Some(&self.order_by))
  }
}

/// Remote-backed card list: filtering, sorting and paging happen in the
/// catalog, this keeps the query and the last accepted page.
pub struct BrowseView {
  query: QueryState,
  search_input: Debouncer,
  cards: Vec<Card>,
  total_count: i64,
  page_size: i64,
  default_page_size: i64,
  sibling_count: i64,
  error: Option<String>,
  loading: bool,
  latest_generation: u64,
}

impl BrowseView {
  pub fn new(config: &AppConfig) -> Self {
    Self::with_query(config, QueryState::new(BROWSE_DEFAULT_SORT))
  }

  pub fn from_query_params<'a, I>(config: &AppConfig, params: I) -> Self
  where
    I: IntoIterator<Item = (&'a str, &'a str)>,
  {
    Self::with_query(config, QueryState::from_query_params(params, BROWSE_DEFAULT_SORT))
  }

  fn with_query(config: &AppConfig, query: QueryState) -> Self {
    Self {
      search_input: Debouncer::with_value(config.search_debounce(), query.search.clone()),
      query,
      cards: Vec::new(),
      total_count: 0,
      page_size: config.api_page_size,
      default_page_size: config.api_page_size,
      sibling_count: config.pagination_siblings,
      error: None,
      loading: false,
      latest_generation: 0,
    }
  }

  /// Marks the view loading and issues a request for the current query.
  /// Any request issued earlier becomes stale.
  pub fn begin_load(&mut self) -> CardRequest {
    self.latest_generation += 1;
    self.loading = true;
    self.error = None;
    log::debug!(
      "Loading cards - Page: {}, Search: '{}', Set: {}, Sort: {}",
      self.query.page,
      self.query.search,
      self.query.set_filter.as_str(),
      self.query.sort
    );
    CardRequest {
      generation: self.latest_generation,
      page: self.query.page,
      query: self.query.catalog_query(),
      order_by: self.query.sort.as_str().to_string(),
    }
  }

  /// Applies a finished request. Returns false and changes nothing when a
  /// newer request has been issued since.
  pub fn complete(
    &mut self,
    request: &CardRequest,
    result: Result<CardPage, CatalogError>,
  ) -> bool {
    if request.generation != self.latest_generation {
      log::debug!(
        "Discarding stale card response {} (latest {})",
        request.generation,
        self.latest_generation
      );
      return false;
    }

    self.loading = false;
    match result {
      Ok(page) => {
        self.page_size = if page.page_size > 0 {
          page.page_size
        } else {
          self.default_page_size
        };
        self.total_count = page.total_count.max(0);
        self.cards = page.data;
        self.error = None;
      }
      Err(error) => {
        log::error!("Failed to load cards: {}", error);
        self.error = Some(error.to_string());
        self.cards.clear();
        self.total_count = 0;
      }
    }
    true
  }

  /// Issues and completes a request on the calling thread.
  pub fn load(&mut self, gateway: &dyn CatalogGateway) {
    let request = self.begin_load();
    let result = request.execute(gateway);
    self.complete(&request, result);
  }

  pub fn set_page(&mut self, page: i64) -> bool {
    self.query.set_page(page)
  }

  pub fn set_set_filter(&mut self, set_filter: SetFilter) -> bool {
    self.query.set_set_filter(set_filter)
  }

  pub fn set_sort(&mut self, sort: SortKey) -> bool {
    self.query.set_sort(sort)
  }

  /// Raw search box input; nothing is fetched until the input settles.
  pub fn type_search(&mut self, value: impl Into<String>, now: Instant) {
    self.search_input.input(value, now);
  }

  /// Returns true when a settled search term changed the query.
  pub fn poll_search(&mut self, now: Instant) -> bool {
    match self.search_input.poll(now) {
      Some(term) => self.query.set_search(term),
      None => false,
    }
  }

  pub fn next_page(&mut self) -> bool {
    let total = pagination::total_pages(self.total_count, self.page_size);
    match pagination::next_page(self.query.page, total) {
      Some(page) => self.set_page(page),
      None => false,
    }
  }

  pub fn previous_page(&mut self) -> bool {
    match pagination::previous_page(self.query.page) {
      Some(page) => self.set_page(page),
      None => false,
    }
  }

  pub fn query(&self) -> &QueryState {
    &self.query
  }

  pub fn search_display_value(&self) -> &str {
    self.search_input.display_value()
  }

  /// Empties the search box and the committed term in one step.
  pub fn clear_search(&mut self) -> bool {
    self.search_input.reset("");
    self.query.set_search("")
  }

  pub fn sort_options(&self) -> &'static [SortOption] {
    &BROWSE_SORT_OPTIONS
  }

  pub fn cards(&self) -> &[Card] {
    &self.cards
  }

  /// Cards on the current page paired with their collection flags.
  pub fn cards_with_membership(&self, store: &CollectionStore) -> Vec<(Card, CardMembership)> {
    self
      .cards
      .iter()
      .map(|card| (card.clone(), store.membership(&card.id)))
      .collect()
  }

  pub fn total_count(&self) -> i64 {
    self.total_count
  }

  pub fn page_size(&self) -> i64 {
    self.page_size
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }

  pub fn page_range(&self) -> Vec<PageItem> {
    compute_range(self.query.page, self.total_count, self.page_size, self.sibling_count)
  }

  pub fn should_render_pager(&self) -> bool {
    !self.loading
      && should_render_pager(self.query.page, self.total_count, self.page_size, self.sibling_count)
  }
}
