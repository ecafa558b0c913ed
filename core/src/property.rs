use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub type Callback = Rc<dyn Fn()>;

///! A value cell that notifies its subscribers whenever the value changes.
///!
///! Only the owning entity can change the value, so it can validate it first.
///! Subscribers are plain callbacks, they read the new value back from the
///! entity when they need it.
///!
///! Derived state (list ordering, cached tables) subscribes through
///! `Observable` and is always notified before the plain subscribers, so they
///! never observe a stale cache.
pub struct Property<T> {
  value: RefCell<T>,
  derived: RefCell<Vec<Callback>>,
  subscribers: RefCell<Vec<Callback>>,
}

fn unique_callbacks<'a>(lists: impl Iterator<Item = &'a RefCell<Vec<Callback>>>) -> Vec<Callback> {
  let mut callbacks: Vec<Callback> = Vec::new();
  for list in lists {
    for callback in list.borrow().iter() {
      if !callbacks.iter().any(|cb| Rc::ptr_eq(cb, callback)) {
        callbacks.push(callback.clone());
      }
    }
  }
  callbacks
}

fn remove_callback(list: &RefCell<Vec<Callback>>, callback: &Callback) -> bool {
  let mut callbacks = list.borrow_mut();
  match callbacks.iter().position(|cb| Rc::ptr_eq(cb, callback)) {
    Some(index) => {
      callbacks.remove(index);
      true
    }
    None => false,
  }
}

impl<T> Property<T>
where
  T: Clone + PartialEq,
{
  pub fn new(value: T) -> Property<T> {
    Property {
      value: RefCell::new(value),
      derived: RefCell::new(Vec::new()),
      subscribers: RefCell::new(Vec::new()),
    }
  }

  pub fn get(&self) -> T {
    self.value.borrow().clone()
  }

  pub(crate) fn set(&self, value: T) -> bool {
    if !self.store(value) {
      return false;
    }
    Property::notify_all(&[self]);
    true
  }

  ///! Stores the value without notifying anyone. Pair with `notify_all`.
  pub(crate) fn store(&self, value: T) -> bool {
    if *self.value.borrow() == value {
      return false;
    }
    *self.value.borrow_mut() = value;
    true
  }

  ///! Notifies the subscribers of several properties changed together,
  ///! every callback once, derived state first.
  pub(crate) fn notify_all(properties: &[&Property<T>]) {
    // callbacks might (un)subscribe, so don't keep the borrows while calling them
    let callbacks = unique_callbacks(
      properties
        .iter()
        .map(|property| &property.derived)
        .chain(properties.iter().map(|property| &property.subscribers)),
    );
    for callback in callbacks.iter() {
      callback();
    }
  }

  pub fn subscribe(&self, callback: &Callback) {
    self.subscribers.borrow_mut().push(callback.clone());
  }

  pub fn unsubscribe(&self, callback: &Callback) -> bool {
    remove_callback(&self.subscribers, callback)
  }

  pub(crate) fn subscribe_derived(&self, callback: &Callback) {
    self.derived.borrow_mut().push(callback.clone());
  }

  pub(crate) fn unsubscribe_derived(&self, callback: &Callback) -> bool {
    remove_callback(&self.derived, callback)
  }

  pub fn num_subscribers(&self) -> usize {
    self.subscribers.borrow().len() + self.derived.borrow().len()
  }
}

impl<T> fmt::Debug for Property<T>
where
  T: fmt::Debug,
{
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{:?}", self.value.borrow())
  }
}

///! Entities whose properties feed derived state (ordering, cached tables).
pub trait Observable {
  fn subscribe(&self, callback: &Callback);
  fn unsubscribe(&self, callback: &Callback);
}
