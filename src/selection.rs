//! Checkbox state owned by the UI shell.
//!
//! The pipeline only ever reads a [`SelectionStore`]. A key that has never been
//! observed is selected: unchecking is the only way to deselect something.

use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
  Kind,
  Governorate,
  Town,
}

pub trait SelectionStore {
  /// The user's explicit choice for `key`, if there is one.
  fn get(&self, category: Category, key: &str) -> Option<bool>;

  /// Keys of `category` that have been observed and are checked.
  fn checked(&self, category: Category) -> Vec<String>;

  fn get_selection(&self, category: Category, key: &str) -> bool {
    self.get(category, key).unwrap_or(true)
  }
}

/// In-memory selection state for a single session.
#[derive(Debug, Default, Clone)]
pub struct SessionSelections {
  state: HashMap<Category, BTreeMap<String, bool>>,
}

impl SessionSelections {
  pub fn new() -> Self { SessionSelections::default() }

  pub fn set(&mut self, category: Category, key: &str, selected: bool) -> &mut Self {
    self.state.entry(category).or_default().insert(key.to_string(), selected);
    self
  }

  pub fn toggle(&mut self, category: Category, key: &str) -> bool {
    let selected = !self.get_selection(category, key);
    self.set(category, key, selected);
    selected
  }

  /// Records that a checkbox for `key` was shown, checking it if it is new.
  pub fn observe(&mut self, category: Category, key: &str) -> bool {
    *self.state.entry(category).or_default().entry(key.to_string()).or_insert(true)
  }

  pub fn check_all<'a>(&mut self, category: Category, keys: impl IntoIterator<Item = &'a str>) {
    for key in keys {
      self.set(category, key, true);
    }
  }

  pub fn uncheck_all<'a>(&mut self, category: Category, keys: impl IntoIterator<Item = &'a str>) {
    for key in keys {
      self.set(category, key, false);
    }
  }
}

impl SelectionStore for SessionSelections {
  fn get(&self, category: Category, key: &str) -> Option<bool> {
    self.state.get(&category).and_then(|keys| keys.get(key)).copied()
  }

  fn checked(&self, category: Category) -> Vec<String> {
    self
      .state
      .get(&category)
      .map(|keys| keys.iter().filter(|(_, on)| **on).map(|(k, _)| k.clone()).collect())
      .unwrap_or_default()
  }
}
