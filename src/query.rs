use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::model::Card;

pub const ALL_SETS: &str = "all";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
  #[default]
  #[serde(rename = "name")]
  NameAsc,
  #[serde(rename = "-name")]
  NameDesc,
  #[serde(rename = "releaseDate")]
  ReleaseDateAsc,
  #[serde(rename = "-releaseDate")]
  ReleaseDateDesc,
  #[serde(rename = "set.releaseDate,number")]
  SetOrder,
}

impl SortKey {
  /// Parses a catalog-style sort string. Unknown keys sort by name.
  pub fn parse(value: &str) -> Self {
    match value.trim() {
      "-name" => SortKey::NameDesc,
      "releaseDate" => SortKey::ReleaseDateAsc,
      "-releaseDate" => SortKey::ReleaseDateDesc,
      "set.releaseDate,number" => SortKey::SetOrder,
      _ => SortKey::NameAsc,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      SortKey::NameAsc => "name",
      SortKey::NameDesc => "-name",
      SortKey::ReleaseDateAsc => "releaseDate",
      SortKey::ReleaseDateDesc => "-releaseDate",
      SortKey::SetOrder => "set.releaseDate,number",
    }
  }

  pub fn compare(self, a: &Card, b: &Card) -> Ordering {
    match self {
      SortKey::NameAsc => a.name.cmp(&b.name),
      SortKey::NameDesc => b.name.cmp(&a.name),
      SortKey::ReleaseDateAsc => a.set.release_timestamp().cmp(&b.set.release_timestamp()),
      SortKey::ReleaseDateDesc => b.set.release_timestamp().cmp(&a.set.release_timestamp()),
      SortKey::SetOrder => a
        .set
        .release_timestamp()
        .cmp(&b.set.release_timestamp())
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| compare_numbers(a, b)),
    }
  }
}

impl fmt::Display for SortKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// Cards without a numeric printed number go after numbered ones.
fn compare_numbers(a: &Card, b: &Card) -> Ordering {
  match (a.number_value(), b.number_value()) {
    (Some(left), Some(right)) => left.cmp(&right),
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (None, None) => Ordering::Equal,
  }
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortOption {
  pub value: SortKey,
  pub label: &'static str,
}

pub const BASE_SORT_OPTIONS: [SortOption; 5] = [
  SortOption { value: SortKey::NameAsc, label: "Name (A-Z)" },
  SortOption { value: SortKey::NameDesc, label: "Name (Z-A)" },
  SortOption { value: SortKey::ReleaseDateDesc, label: "Release Date (Newest)" },
  SortOption { value: SortKey::ReleaseDateAsc, label: "Release Date (Oldest)" },
  SortOption { value: SortKey::SetOrder, label: "Set Order (Approx.)" },
];

pub const BROWSE_SORT_OPTIONS: [SortOption; 5] = [
  SortOption { value: SortKey::NameAsc, label: "Name (A-Z)" },
  SortOption { value: SortKey::NameDesc, label: "Name (Z-A)" },
  SortOption { value: SortKey::ReleaseDateDesc, label: "Release Date (Newest)" },
  SortOption { value: SortKey::ReleaseDateAsc, label: "Release Date (Oldest)" },
  SortOption { value: SortKey::SetOrder, label: "Set Order" },
];

/// `all`, or a single set id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SetFilter {
  #[default]
  All,
  Set(String),
}

impl SetFilter {
  pub fn parse(value: &str) -> Self {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == ALL_SETS {
      SetFilter::All
    } else {
      SetFilter::Set(trimmed.to_string())
    }
  }

  pub fn as_str(&self) -> &str {
    match self {
      SetFilter::All => ALL_SETS,
      SetFilter::Set(id) => id,
    }
  }

  pub fn matches(&self, card: &Card) -> bool {
    match self {
      SetFilter::All => true,
      SetFilter::Set(id) => card.set_id() == id,
    }
  }
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedCards {
  pub page_items: Vec<Card>,
  pub total_match_count: usize,
}

pub fn matches_search(card: &Card, search_term: &str) -> bool {
  if search_term.is_empty() {
    return true;
  }
  card.name.to_lowercase().contains(&search_term.to_lowercase())
}

/// Filters, sorts and slices one page out of an in-memory card list.
///
/// `page` is 1-indexed. Pages past the end come back empty rather than
/// failing; the match count is reported either way.
pub fn process_cards(
  cards: &[Card],
  search_term: &str,
  set_filter: &SetFilter,
  sort_key: SortKey,
  page: usize,
  page_size: usize,
) -> ProcessedCards {
  let mut matching: Vec<&Card> = cards
    .iter()
    .filter(|card| matches_search(card, search_term))
    .filter(|card| set_filter.matches(card))
    .collect();

  matching.sort_by(|a, b| sort_key.compare(a, b));

  let total_match_count = matching.len();
  if page == 0 || page_size == 0 {
    return ProcessedCards { page_items: Vec::new(), total_match_count };
  }

  let page_items = matching
    .into_iter()
    .skip((page - 1).saturating_mul(page_size))
    .take(page_size)
    .cloned()
    .collect();

  ProcessedCards { page_items, total_match_count }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::fixtures::{card, set};

  fn names(cards: &[Card]) -> Vec<&str> {
    cards.iter().map(|card| card.name.as_str()).collect()
  }

  fn sample() -> Vec<Card> {
    let base = set("base1", Some("1999/01/09"));
    let jungle = set("base2", Some("1999/06/16"));
    let promo = set("promo", None);
    vec![
      card("base2-60", "Pikachu", &jungle),
      card("base1-4", "Charizard", &base),
      card("base1-58", "Pikachu", &base),
      card("promo-1", "Ancient Mew", &promo),
      card("base1-2", "Blastoise", &base),
    ]
  }

  fn numbered(id: &str, name: &str, number: &str) -> Card {
    let mut card = card(id, name, &set("base1", Some("1999/01/09")));
    card.number = Some(number.to_string());
    card
  }

  #[test]
  fn pages_a_25_card_list() {
    let base = set("base1", None);
    let cards: Vec<Card> = (0..25)
      .map(|i| card(&format!("c{:02}", i), &format!("Card {:02}", i), &base))
      .collect();

    let first = process_cards(&cards, "", &SetFilter::All, SortKey::NameAsc, 1, 10);
    assert_eq!(first.page_items.len(), 10);
    assert_eq!(first.total_match_count, 25);
    assert_eq!(first.page_items[0].name, "Card 00");

    let third = process_cards(&cards, "", &SetFilter::All, SortKey::NameAsc, 3, 10);
    assert_eq!(third.page_items.len(), 5);

    let fourth = process_cards(&cards, "", &SetFilter::All, SortKey::NameAsc, 4, 10);
    assert!(fourth.page_items.is_empty());
    assert_eq!(fourth.total_match_count, 25);
  }

  #[test]
  fn search_is_case_insensitive_substring() {
    let cards = sample();
    let result = process_cards(&cards, "PIKA", &SetFilter::All, SortKey::NameAsc, 1, 10);
    assert_eq!(result.total_match_count, 2);
    assert_eq!(names(&result.page_items), vec!["Pikachu", "Pikachu"]);
  }

  #[test]
  fn set_filter_all_matches_everything() {
    let cards = sample();
    let all = process_cards(&cards, "", &SetFilter::parse("all"), SortKey::NameAsc, 1, 50);
    assert_eq!(all.total_match_count, cards.len());

    let jungle = process_cards(&cards, "", &SetFilter::parse("base2"), SortKey::NameAsc, 1, 50);
    assert_eq!(jungle.total_match_count, 1);
    assert_eq!(jungle.page_items[0].id, "base2-60");
  }

  #[test]
  fn name_descending_reverses_ascending() {
    let base = set("base1", None);
    let cards: Vec<Card> = ["Onix", "Abra", "Zubat", "Mew", "abra"]
      .iter()
      .enumerate()
      .map(|(i, name)| card(&i.to_string(), name, &base))
      .collect();

    let asc = process_cards(&cards, "", &SetFilter::All, SortKey::NameAsc, 1, 10);
    let mut desc = process_cards(&cards, "", &SetFilter::All, SortKey::NameDesc, 1, 10);
    desc.page_items.reverse();
    assert_eq!(names(&asc.page_items), names(&desc.page_items));
    assert_eq!(names(&asc.page_items), vec!["Abra", "Mew", "Onix", "Zubat", "abra"]);
  }

  #[test]
  fn release_date_sorts_missing_dates_as_epoch() {
    let cards = sample();
    let newest = process_cards(&cards, "", &SetFilter::All, SortKey::ReleaseDateDesc, 1, 10);
    assert_eq!(newest.page_items[0].id, "base2-60");
    assert_eq!(newest.page_items[4].id, "promo-1");

    let oldest = process_cards(&cards, "", &SetFilter::All, SortKey::ReleaseDateAsc, 1, 10);
    assert_eq!(oldest.page_items[0].id, "promo-1");
    // Stable within the same set.
    let base_ids: Vec<&str> = oldest.page_items[1..4].iter().map(|c| c.id.as_str()).collect();
    assert_eq!(base_ids, vec!["base1-4", "base1-58", "base1-2"]);
  }

  #[test]
  fn set_order_breaks_ties_by_name_then_number() {
    let cards = vec![
      numbered("a", "Pikachu", "58"),
      numbered("b", "Pikachu", "27"),
      numbered("c", "Abra", "43"),
      numbered("d", "Pikachu", "TG05"),
    ];
    let result = process_cards(&cards, "", &SetFilter::All, SortKey::SetOrder, 1, 10);
    let ids: Vec<&str> = result.page_items.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "b", "a", "d"]);
  }

  #[test]
  fn does_not_mutate_input() {
    let cards = sample();
    let before = cards.clone();
    let _ = process_cards(&cards, "", &SetFilter::All, SortKey::NameDesc, 1, 2);
    assert_eq!(cards, before);
  }

  #[test]
  fn unknown_sort_key_falls_back_to_name() {
    assert_eq!(SortKey::parse("rarity"), SortKey::NameAsc);
    for option in BASE_SORT_OPTIONS {
      assert_eq!(SortKey::parse(option.value.as_str()), option.value);
    }
  }

  #[test]
  fn zero_page_is_empty() {
    let cards = sample();
    let result = process_cards(&cards, "", &SetFilter::All, SortKey::NameAsc, 0, 10);
    assert!(result.page_items.is_empty());
    assert_eq!(result.total_match_count, 5);
  }
}
