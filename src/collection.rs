use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::Card;
use crate::storage::KeyValueStore;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum CollectionList {
  Owned,
  Double,
  Wishlist,
}

impl CollectionList {
  pub const ALL: [CollectionList; 3] = [
    CollectionList::Owned,
    CollectionList::Double,
    CollectionList::Wishlist,
  ];

  pub fn storage_key(self) -> &'static str {
    match self {
      CollectionList::Owned => "holoswap.ownedCards",
      CollectionList::Double => "holoswap.doubleCards",
      CollectionList::Wishlist => "holoswap.wishlistCards",
    }
  }
}

/// Membership flags for one card, used to decide which card actions apply.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CardMembership {
  pub owned: bool,
  pub double: bool,
  pub wishlisted: bool,
}

impl CardMembership {
  pub fn can_mark_double(&self) -> bool {
    self.owned
  }

  pub fn can_wishlist(&self) -> bool {
    !self.owned
  }
}

/// The user's owned, double and wishlist sets.
///
/// Invariants after every call: a double card is also owned, and a
/// wishlisted card is never owned. Each mutation writes the touched lists
/// through to storage; write failures are logged and the in-memory state
/// stays authoritative.
pub struct CollectionStore {
  owned: HashMap<String, Card>,
  double: HashMap<String, Card>,
  wishlist: HashMap<String, Card>,
  storage: Box<dyn KeyValueStore + Send>,
}

impl CollectionStore {
  /// Seeds the store from `storage`. Absent keys and unreadable data both
  /// start the affected list empty.
  pub fn load(storage: impl KeyValueStore + Send + 'static) -> Self {
    let owned = load_list(&storage, CollectionList::Owned);
    let double = load_list(&storage, CollectionList::Double);
    let wishlist = load_list(&storage, CollectionList::Wishlist);
    log::info!(
      "Loaded collection: {} owned, {} double, {} wishlisted",
      owned.len(),
      double.len(),
      wishlist.len()
    );

    let mut store = Self {
      owned,
      double,
      wishlist,
      storage: Box::new(storage),
    };
    store.repair_loaded_state();
    store
  }

  pub fn add_owned(&mut self, card: &Card) {
    self.owned.insert(card.id.clone(), card.clone());
    self.persist(CollectionList::Owned);
    if self.wishlist.remove(&card.id).is_some() {
      self.persist(CollectionList::Wishlist);
    }
  }

  pub fn remove_owned(&mut self, card_id: &str) {
    if self.owned.remove(card_id).is_some() {
      self.persist(CollectionList::Owned);
    }
    if self.double.remove(card_id).is_some() {
      self.persist(CollectionList::Double);
    }
  }

  pub fn add_double(&mut self, card: &Card) {
    if !self.owned.contains_key(&card.id) {
      self.add_owned(card);
    }
    self.double.insert(card.id.clone(), card.clone());
    self.persist(CollectionList::Double);
  }

  pub fn remove_double(&mut self, card_id: &str) {
    if self.double.remove(card_id).is_some() {
      self.persist(CollectionList::Double);
    }
  }

  /// Returns false, leaving every list untouched, when the card is owned.
  pub fn add_wishlist(&mut self, card: &Card) -> bool {
    if self.owned.contains_key(&card.id) {
      log::debug!("Ignoring wishlist request for owned card {}", card.id);
      return false;
    }
    self.wishlist.insert(card.id.clone(), card.clone());
    self.persist(CollectionList::Wishlist);
    true
  }

  pub fn remove_wishlist(&mut self, card_id: &str) {
    if self.wishlist.remove(card_id).is_some() {
      self.persist(CollectionList::Wishlist);
    }
  }

  pub fn toggle_owned(&mut self, card: &Card) {
    if self.is_owned(&card.id) {
      self.remove_owned(&card.id);
    } else {
      self.add_owned(card);
    }
  }

  pub fn toggle_double(&mut self, card: &Card) {
    if self.is_double(&card.id) {
      self.remove_double(&card.id);
    } else {
      self.add_double(card);
    }
  }

  pub fn toggle_wishlist(&mut self, card: &Card) {
    if self.is_owned(&card.id) {
      return;
    }
    if self.is_wishlisted(&card.id) {
      self.remove_wishlist(&card.id);
    } else {
      self.add_wishlist(card);
    }
  }

  pub fn is_owned(&self, card_id: &str) -> bool {
    self.owned.contains_key(card_id)
  }

  pub fn is_double(&self, card_id: &str) -> bool {
    self.double.contains_key(card_id)
  }

  pub fn is_wishlisted(&self, card_id: &str) -> bool {
    self.wishlist.contains_key(card_id)
  }

  pub fn membership(&self, card_id: &str) -> CardMembership {
    CardMembership {
      owned: self.is_owned(card_id),
      double: self.is_double(card_id),
      wishlisted: self.is_wishlisted(card_id),
    }
  }

  pub fn count(&self, list: CollectionList) -> usize {
    self.list(list).len()
  }

  /// Copies of every card in `list`, ordered by id.
  pub fn cards(&self, list: CollectionList) -> Vec<Card> {
    let mut cards: Vec<Card> = self.list(list).values().cloned().collect();
    cards.sort_by(|a, b| a.id.cmp(&b.id));
    cards
  }

  fn list(&self, list: CollectionList) -> &HashMap<String, Card> {
    match list {
      CollectionList::Owned => &self.owned,
      CollectionList::Double => &self.double,
      CollectionList::Wishlist => &self.wishlist,
    }
  }

  // Stored lists are written independently, so a partial write from an
  // earlier session can leave them disagreeing.
  fn repair_loaded_state(&mut self) {
    let orphan_doubles: Vec<Card> = self
      .double
      .values()
      .filter(|card| !self.owned.contains_key(&card.id))
      .cloned()
      .collect();
    if !orphan_doubles.is_empty() {
      log::warn!(
        "Restoring {} double card(s) missing from owned",
        orphan_doubles.len()
      );
      for card in orphan_doubles {
        self.owned.insert(card.id.clone(), card);
      }
      self.persist(CollectionList::Owned);
    }

    let owned = &self.owned;
    let before = self.wishlist.len();
    self.wishlist.retain(|card_id, _| !owned.contains_key(card_id));
    if self.wishlist.len() != before {
      log::warn!(
        "Dropped {} wishlisted card(s) that are already owned",
        before - self.wishlist.len()
      );
      self.persist(CollectionList::Wishlist);
    }
  }

  fn persist(&self, list: CollectionList) {
    let cards = self.cards(list);
    let payload = match serde_json::to_string(&cards) {
      Ok(payload) => payload,
      Err(error) => {
        log::error!("Failed to encode {:?} list: {}", list, error);
        return;
      }
    };
    if let Err(error) = self.storage.set(list.storage_key(), &payload) {
      log::error!(
        "Failed to persist {:?} list ({} cards): {}",
        list,
        cards.len(),
        error
      );
    }
  }
}

fn load_list(storage: &dyn KeyValueStore, list: CollectionList) -> HashMap<String, Card> {
  let key = list.storage_key();
  let raw = match storage.get(key) {
    Ok(Some(raw)) => raw,
    Ok(None) => return HashMap::new(),
    Err(error) => {
      log::warn!("Unable to read '{}': {}. Starting empty.", key, error);
      return HashMap::new();
    }
  };

  match serde_json::from_str::<Vec<Card>>(&raw) {
    Ok(cards) => cards
      .into_iter()
      .map(|card| (card.id.clone(), card))
      .collect(),
    Err(error) => {
      log::warn!("Malformed data under '{}': {}. Starting empty.", key, error);
      HashMap::new()
    }
  }
}
