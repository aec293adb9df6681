use std::time::Instant;

use super::QueryState;
use crate::collection::{CollectionList, CollectionStore};
use crate::config::AppConfig;
use crate::debounce::Debouncer;
use crate::pagination::{compute_range, should_render_pager, total_pages, PageItem};
use crate::query::{process_cards, ProcessedCards, SetFilter, SortKey, SortOption, BASE_SORT_OPTIONS};

/// A list view over one of the user's collection lists. All data is local,
/// so every page is recomputed from the store on demand.
pub struct LocalView {
  list: CollectionList,
  query: QueryState,
  search_input: Debouncer,
  page_size: usize,
  sibling_count: i64,
}

impl LocalView {
  pub fn new(list: CollectionList, config: &AppConfig) -> Self {
    Self {
      list,
      query: QueryState::new(SortKey::default()),
      search_input: Debouncer::new(config.search_debounce()),
      page_size: config.local_page_size,
      sibling_count: config.pagination_siblings,
    }
  }

  pub fn list(&self) -> CollectionList {
    self.list
  }

  pub fn query(&self) -> &QueryState {
    &self.query
  }

  pub fn page_size(&self) -> usize {
    self.page_size
  }

  pub fn current_page(&self, store: &CollectionStore) -> ProcessedCards {
    let cards = store.cards(self.list);
    process_cards(
      &cards,
      &self.query.search,
      &self.query.set_filter,
      self.query.sort,
      usize::try_from(self.query.page).unwrap_or(0),
      self.page_size,
    )
  }

  pub fn page_range(&self, total_match_count: usize) -> Vec<PageItem> {
    compute_range(
      self.query.page,
      count_as_i64(total_match_count),
      count_as_i64(self.page_size),
      self.sibling_count,
    )
  }

  pub fn should_render_pager(&self, total_match_count: usize) -> bool {
    should_render_pager(
      self.query.page,
      count_as_i64(total_match_count),
      count_as_i64(self.page_size),
      self.sibling_count,
    )
  }

  /// Pulls the page back into range after the list shrank, e.g. when the
  /// last card on the final page was removed. Returns true if it moved.
  pub fn clamp_page(&mut self, total_match_count: usize) -> bool {
    let last = total_pages(count_as_i64(total_match_count), count_as_i64(self.page_size)).max(1);
    if self.query.page > last {
      return self.query.set_page(last);
    }
    false
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

  pub fn type_search(&mut self, value: impl Into<String>, now: Instant) {
    self.search_input.input(value, now);
  }

  pub fn poll_search(&mut self, now: Instant) -> bool {
    match self.search_input.poll(now) {
      Some(term) => self.query.set_search(term),
      None => false,
    }
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
    &BASE_SORT_OPTIONS
  }
}

fn count_as_i64(count: usize) -> i64 {
  i64::try_from(count).unwrap_or(i64::MAX)
}
