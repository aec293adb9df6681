//! Per-view query state and the list views built on it.
//!
//! A [`QueryState`] is the (page, search, set filter, sort) tuple behind one
//! list. [`BrowseView`] hands it to the remote catalog; [`LocalView`] runs it
//! through the in-memory processor over one collection list.

mod browse;
mod local;
mod sets;

pub use browse::{BrowseView, CardRequest};
pub use local::LocalView;
pub use sets::{SetDirectory, SetOption};

use crate::query::{SetFilter, SortKey};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryState {
  pub page: i64,
  pub search: String,
  pub set_filter: SetFilter,
  pub sort: SortKey,
  default_sort: SortKey,
}

impl QueryState {
  pub fn new(default_sort: SortKey) -> Self {
    Self {
      page: 1,
      search: String::new(),
      set_filter: SetFilter::All,
      sort: default_sort,
      default_sort,
    }
  }

  /// Restores state from URL query parameters (`q`, `set`, `sort`, `page`).
  /// Missing or unreadable values fall back to the defaults.
  pub fn from_query_params<'a, I>(params: I, default_sort: SortKey) -> Self
  where
    I: IntoIterator<Item = (&'a str, &'a str)>,
  {
    let mut state = Self::new(default_sort);
    for (key, value) in params {
      match key {
        "q" => state.search = value.trim().to_string(),
        "set" => state.set_filter = SetFilter::parse(value),
        "sort" if !value.trim().is_empty() => state.sort = SortKey::parse(value),
        "page" => state.page = value.trim().parse::<i64>().ok().filter(|p| *p >= 1).unwrap_or(1),
        _ => {}
      }
    }
    state
  }

  /// The inverse of [`QueryState::from_query_params`]. Default values are left
  /// out so shared URLs stay short.
  pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if !self.search.is_empty() {
      params.push(("q", self.search.clone()));
    }
    if let SetFilter::Set(id) = &self.set_filter {
      params.push(("set", id.clone()));
    }
    if self.sort != self.default_sort {
      params.push(("sort", self.sort.as_str().to_string()));
    }
    if self.page > 1 {
      params.push(("page", self.page.to_string()));
    }
    params
  }

  /// Catalog query expression, e.g. `name:"pika*" set.id:base1`.
  pub fn catalog_query(&self) -> Option<String> {
    let mut clauses = Vec::new();
    let search = self.search.trim();
    if !search.is_empty() {
      clauses.push(format!("name:\"{}*\"", search.replace('"', "")));
    }
    if let SetFilter::Set(id) = &self.set_filter {
      clauses.push(format!("set.id:{}", id));
    }
    if clauses.is_empty() {
      None
    } else {
      Some(clauses.join(" "))
    }
  }

  /// Returns true when the page actually changed.
  pub fn set_page(&mut self, page: i64) -> bool {
    let page = page.max(1);
    if self.page == page {
      return false;
    }
    self.page = page;
    true
  }

  // Search, set and sort changes all restart at page 1.

  pub fn set_search(&mut self, search: impl Into<String>) -> bool {
    let search = search.into();
    if self.search == search {
      return false;
    }
    self.search = search;
    self.page = 1;
    true
  }

  pub fn set_set_filter(&mut self, set_filter: SetFilter) -> bool {
    if self.set_filter == set_filter {
      return false;
    }
    self.set_filter = set_filter;
    self.page = 1;
    true
  }

  pub fn set_sort(&mut self, sort: SortKey) -> bool {
    if self.sort == sort {
      return false;
    }
    self.sort = sort;
    self.page = 1;
    true
  }
}
