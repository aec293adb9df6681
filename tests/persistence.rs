use holoswap_lib::{App, AppConfig, Card, CardSet, CollectionList, CollectionStore, KeyValueStore, SqliteStore};

fn card(id: &str, name: &str) -> Card {
  Card {
    id: id.to_string(),
    name: name.to_string(),
    set: CardSet {
      id: "base1".to_string(),
      name: "Base".to_string(),
      ..CardSet::default()
    },
    ..Card::default()
  }
}

#[test]
fn collection_survives_reopening_the_database() {
  let dir = tempfile::tempdir().unwrap();
  let db_path = dir.path().join("holoswap.db");

  {
    let mut store = CollectionStore::load(SqliteStore::open(&db_path).unwrap());
    store.add_double(&card("base1-58", "Pikachu"));
    store.add_wishlist(&card("base1-4", "Charizard"));
    store.add_owned(&card("base1-2", "Blastoise"));
  }

  let store = CollectionStore::load(SqliteStore::open(&db_path).unwrap());
  assert_eq!(store.count(CollectionList::Owned), 2);
  assert!(store.is_double("base1-58"));
  assert!(store.is_wishlisted("base1-4"));
  assert_eq!(store.cards(CollectionList::Wishlist)[0].name, "Charizard");
}

#[test]
fn stored_lists_are_json_arrays_of_cards() {
  let dir = tempfile::tempdir().unwrap();
  let sqlite = SqliteStore::open(dir.path().join("holoswap.db")).unwrap();
  let mut store = CollectionStore::load(sqlite.clone());
  store.add_owned(&card("base1-58", "Pikachu"));

  let raw = sqlite.get("holoswap.ownedCards").unwrap().unwrap();
  let decoded: Vec<Card> = serde_json::from_str(&raw).unwrap();
  assert_eq!(decoded, vec![card("base1-58", "Pikachu")]);
  assert_eq!(sqlite.get("holoswap.doubleCards").unwrap(), None);
}

#[test]
fn malformed_list_starts_empty_and_others_survive() {
  let dir = tempfile::tempdir().unwrap();
  let sqlite = SqliteStore::open(dir.path().join("holoswap.db")).unwrap();
  sqlite.set("holoswap.wishlistCards", "{not json").unwrap();
  sqlite
    .set("holoswap.ownedCards", &serde_json::to_string(&vec![card("a", "Mew")]).unwrap())
    .unwrap();

  let store = CollectionStore::load(sqlite);
  assert_eq!(store.count(CollectionList::Wishlist), 0);
  assert!(store.is_owned("a"));
}

#[test]
fn app_reopens_the_same_collection() {
  let dir = tempfile::tempdir().unwrap();
  let config = AppConfig {
    data_dir: dir.path().to_path_buf(),
    ..AppConfig::default()
  };

  {
    let mut app = App::open(config.clone()).unwrap();
    app.store_mut().add_owned(&card("base1-58", "Pikachu"));
  }

  let app = App::open(config).unwrap();
  assert!(app.store().is_owned("base1-58"));
}
