use std::cell::{Cell, RefCell};
use std::fmt;

/// A change notification for an [`ObservableList`].
///
/// `first` and `last` are inclusive indices bounding the affected region.
/// For `IntervalAdded` and `IntervalRemoved` the indices refer to the list
/// after, respectively before, the mutation; for `ContentsChanged` they refer
/// to the list as it stands when the event is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEvent {
    IntervalAdded { first: usize, last: usize },
    IntervalRemoved { first: usize, last: usize },
    ContentsChanged { first: usize, last: usize },
}

/// Handle returned by [`ObservableList::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(ListEvent)>;

/// An order-preserving sequence that notifies registered observers of every
/// content-changing mutation, delivering exactly one event per mutating call.
///
/// Calls that end up changing nothing (removing an absent value, clearing an
/// empty list, appending an empty iterator) deliver no event. Read access
/// never notifies.
///
/// Notifications are delivered synchronously on the mutating call, before it
/// returns. Precondition: an observer must not mutate or re-subscribe to the
/// list it is observing from inside its callback; this is not guarded at
/// runtime.
pub struct ObservableList<T> {
    items: Vec<T>,
    observers: RefCell<Vec<(ObserverId, Observer)>>,
    next_observer: Cell<u64>,
}

impl<T> ObservableList<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            observers: RefCell::new(Vec::new()),
            next_observer: Cell::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Registers an observer; it receives every subsequent event until
    /// unsubscribed.
    pub fn subscribe(&self, observer: impl FnMut(ListEvent) + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer.get());
        self.next_observer.set(id.0 + 1);
        self.observers.borrow_mut().push((id, Box::new(observer)));
        id
    }

    /// Removes a previously registered observer. Returns false if the id is
    /// unknown (e.g. already unsubscribed).
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|(observer_id, _)| *observer_id != id);
        observers.len() != before
    }

    fn emit(&self, event: ListEvent) {
        let mut observers = self.observers.borrow_mut();
        for (_, observer) in observers.iter_mut() {
            observer(event);
        }
    }

    /// Appends an element to the end of the list.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
        let index = self.items.len() - 1;
        self.emit(ListEvent::IntervalAdded {
            first: index,
            last: index,
        });
    }

    /// Inserts an element at `index`, shifting later elements right.
    pub fn insert(&mut self, index: usize, item: T) {
        self.items.insert(index, item);
        self.emit(ListEvent::IntervalAdded {
            first: index,
            last: index,
        });
    }

    /// Appends every element of `items`.
    pub fn extend(&mut self, items: impl IntoIterator<Item = T>) {
        let first = self.items.len();
        self.items.extend(items);
        if self.items.len() > first {
            self.emit(ListEvent::IntervalAdded {
                first,
                last: self.items.len() - 1,
            });
        }
    }

    /// Replaces the element at `index`, returning the previous value.
    ///
    /// Panics if `index` is out of bounds.
    pub fn set(&mut self, index: usize, item: T) -> T {
        let previous = std::mem::replace(&mut self.items[index], item);
        self.emit(ListEvent::ContentsChanged {
            first: index,
            last: index,
        });
        previous
    }

    /// Mutates the element at `index` in place through `edit`, then notifies.
    /// Returns false without notifying if `index` is out of bounds.
    pub fn update(&mut self, index: usize, edit: impl FnOnce(&mut T)) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                edit(item);
                self.emit(ListEvent::ContentsChanged {
                    first: index,
                    last: index,
                });
                true
            }
            None => false,
        }
    }

    /// Removes and returns the element at `index`.
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove_at(&mut self, index: usize) -> T {
        let item = self.items.remove(index);
        self.emit(ListEvent::IntervalRemoved {
            first: index,
            last: index,
        });
        item
    }

    /// Removes the elements in `first..=last` (inclusive, clamped to the list
    /// length). Does nothing for an empty or inverted range.
    pub fn remove_range(&mut self, first: usize, last: usize) {
        if first >= self.items.len() || last < first {
            return;
        }
        let last = last.min(self.items.len() - 1);
        self.items.drain(first..=last);
        self.emit(ListEvent::IntervalRemoved { first, last });
    }

    /// Removes every element, notifying with the previously occupied interval.
    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let last = self.items.len() - 1;
        self.items.clear();
        self.emit(ListEvent::IntervalRemoved { first: 0, last });
    }

    /// Keeps only the elements for which `keep` returns true. Reported as a
    /// single contents-changed event spanning the surviving region, or an
    /// interval-removed event when the list empties.
    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(keep);
        let removed = before - self.items.len();
        if removed > 0 {
            if self.items.is_empty() {
                self.emit(ListEvent::IntervalRemoved {
                    first: 0,
                    last: before - 1,
                });
            } else {
                self.emit(ListEvent::ContentsChanged {
                    first: 0,
                    last: self.items.len() - 1,
                });
            }
        }
        removed
    }

    /// Removes every element matching `predicate`; the filtered-removal
    /// counterpart of [`ObservableList::retain`]. Returns the removed count.
    pub fn remove_matching(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        self.retain(|item| !predicate(item))
    }

    /// Sorts in place. The whole list is reported as changed.
    pub fn sort_by(&mut self, compare: impl FnMut(&T, &T) -> std::cmp::Ordering) {
        if self.items.len() < 2 {
            return;
        }
        self.items.sort_by(compare);
        self.emit(ListEvent::ContentsChanged {
            first: 0,
            last: self.items.len() - 1,
        });
    }

    /// Applies `apply` to every element in place. The whole list is reported
    /// as changed.
    pub fn map_in_place(&mut self, mut apply: impl FnMut(&mut T)) {
        if self.items.is_empty() {
            return;
        }
        for item in &mut self.items {
            apply(item);
        }
        self.emit(ListEvent::ContentsChanged {
            first: 0,
            last: self.items.len() - 1,
        });
    }

    /// Swaps the elements at `a` and `b`, reporting the spanned interval.
    ///
    /// Panics if either index is out of bounds.
    pub fn swap(&mut self, a: usize, b: usize) {
        self.items.swap(a, b);
        if a == b {
            return;
        }
        self.emit(ListEvent::ContentsChanged {
            first: a.min(b),
            last: a.max(b),
        });
    }
}

impl<T: PartialEq> ObservableList<T> {
    /// Removes the first element equal to `item`. Returns false if absent.
    pub fn remove(&mut self, item: &T) -> bool {
        match self.items.iter().position(|candidate| candidate == item) {
            Some(index) => {
                self.items.remove(index);
                self.emit(ListEvent::IntervalRemoved {
                    first: index,
                    last: index,
                });
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    pub fn position(&self, item: &T) -> Option<usize> {
        self.items.iter().position(|candidate| candidate == item)
    }
}

impl<T> Default for ObservableList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for ObservableList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<'a, T> IntoIterator for &'a ObservableList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
