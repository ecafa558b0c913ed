use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use log::trace;

use crate::property::{Callback, Observable};

pub type IsInOrder<T> = Box<dyn Fn(&T, &T) -> bool>;

struct Entry<T> {
  item: Rc<T>,
  callback: Callback,
}

struct Inner<T> {
  entries: RefCell<Vec<Entry<T>>>,
  is_in_order: IsInOrder<T>,
  revision: Cell<u64>,
}

impl<T> Inner<T> {
  fn bump_revision(&self) {
    self.revision.set(self.revision.get() + 1);
  }

  fn ordering(&self, prev: &T, next: &T) -> Ordering {
    let forward = (self.is_in_order)(prev, next);
    let backward = (self.is_in_order)(next, prev);
    match (forward, backward) {
      (true, false) => Ordering::Less,
      (false, true) => Ordering::Greater,
      _ => Ordering::Equal,
    }
  }

  fn is_ordered(&self) -> bool {
    self
      .entries
      .borrow()
      .windows(2)
      .all(|pair| (self.is_in_order)(&*pair[0].item, &*pair[1].item))
  }

  fn on_item_changed(&self) {
    self.bump_revision();
    if !self.is_ordered() {
      trace!("Restoring the order after an item changed");
      let mut entries = self.entries.borrow_mut();
      entries.sort_by(|a, b| self.ordering(&a.item, &b.item));
    }
  }
}

///! A sequence of shared entities kept sorted by an injected predicate.
///!
///! `is_in_order(prev, next)` tells whether `prev` may precede `next`. Items
///! that tie under the predicate keep their insertion order. Items are
///! identified by their `Rc`, not by value, and any change notified by one of
///! their properties bumps the revision and restores the order.
pub struct OrderedList<T: Observable + 'static> {
  inner: Rc<Inner<T>>,
}

impl<T: Observable + 'static> OrderedList<T> {
  pub fn new<F>(is_in_order: F) -> OrderedList<T>
  where
    F: Fn(&T, &T) -> bool + 'static,
  {
    OrderedList {
      inner: Rc::new(Inner {
        entries: RefCell::new(Vec::new()),
        is_in_order: Box::new(is_in_order),
        revision: Cell::new(0),
      }),
    }
  }

  pub fn insert(&mut self, item: Rc<T>) -> usize {
    let inner = Rc::downgrade(&self.inner);
    let callback: Callback = Rc::new(move || {
      if let Some(inner) = inner.upgrade() {
        inner.on_item_changed();
      }
    });
    item.subscribe(&callback);

    let index = {
      let is_in_order = &self.inner.is_in_order;
      let mut entries = self.inner.entries.borrow_mut();
      let index = entries.partition_point(|entry| is_in_order(&*entry.item, &*item));
      entries.insert(index, Entry { item, callback });
      index
    };

    self.inner.bump_revision();
    debug_assert!(self.inner.is_ordered());
    index
  }

  pub fn remove(&mut self, item: &Rc<T>) -> bool {
    let removed = {
      let mut entries = self.inner.entries.borrow_mut();
      entries
        .iter()
        .position(|entry| Rc::ptr_eq(&entry.item, item))
        .map(|index| entries.remove(index))
    };

    match removed {
      Some(entry) => {
        entry.item.unsubscribe(&entry.callback);
        self.inner.bump_revision();
        true
      }
      None => false,
    }
  }

  pub fn clear(&mut self) {
    let entries: Vec<Entry<T>> = self.inner.entries.borrow_mut().drain(..).collect();
    for entry in entries.iter() {
      entry.item.unsubscribe(&entry.callback);
    }
    self.inner.bump_revision();
  }

  pub fn len(&self) -> usize {
    self.inner.entries.borrow().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn get(&self, index: usize) -> Option<Rc<T>> {
    self
      .inner
      .entries
      .borrow()
      .get(index)
      .map(|entry| entry.item.clone())
  }

  pub fn first(&self) -> Option<Rc<T>> {
    self.get(0)
  }

  pub fn last(&self) -> Option<Rc<T>> {
    self.inner.entries.borrow().last().map(|entry| entry.item.clone())
  }

  pub fn position(&self, item: &Rc<T>) -> Option<usize> {
    self
      .inner
      .entries
      .borrow()
      .iter()
      .position(|entry| Rc::ptr_eq(&entry.item, item))
  }

  pub fn contains(&self, item: &Rc<T>) -> bool {
    self.position(item).is_some()
  }

  pub fn to_vec(&self) -> Vec<Rc<T>> {
    self
      .inner
      .entries
      .borrow()
      .iter()
      .map(|entry| entry.item.clone())
      .collect()
  }

  ///! Iterates over a snapshot, so items can be edited while iterating.
  pub fn iter(&self) -> impl Iterator<Item = Rc<T>> {
    self.to_vec().into_iter()
  }

  pub fn revision(&self) -> u64 {
    self.inner.revision.get()
  }

  pub fn is_ordered(&self) -> bool {
    self.inner.is_ordered()
  }
}

impl<T: Observable + 'static> Drop for OrderedList<T> {
  fn drop(&mut self) {
    for entry in self.inner.entries.borrow().iter() {
      entry.item.unsubscribe(&entry.callback);
    }
  }
}

impl<T: Observable + fmt::Debug + 'static> fmt::Debug for OrderedList<T> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_list().entries(self.to_vec()).finish()
  }
}
