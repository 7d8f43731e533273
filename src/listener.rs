//! Observer registries for the vocabulary table, the column list and the
//! cascade bracket.
//!
//! Registries are typed by observer category, so a column registry can only
//! ever hold column observers. Handles are weak: a registry never keeps an
//! observer alive, and a handle whose observer is gone counts as null.
//! Callbacks run synchronously on the mutating thread, in registration
//! order, before the mutation returns. Observers must not mutate the
//! collection they are observing from inside a callback.

use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use crate::construct::{DbId, ElementId};
use crate::error::{Result, VocabError};

pub trait VocabListObserver {
    fn vl_insertion(&self, db: DbId, element_id: ElementId);
    fn vl_deletion(&self, db: DbId, element_id: ElementId);
}

/// Column events carry the column order before and after the change.
pub trait ColumnListObserver {
    fn col_insertion(
        &self,
        db: DbId,
        column_id: ElementId,
        old_order: &[ElementId],
        new_order: &[ElementId],
    );
    fn col_deletion(
        &self,
        db: DbId,
        column_id: ElementId,
        old_order: &[ElementId],
        new_order: &[ElementId],
    );
    fn col_order_edited(&self, db: DbId, old_order: &[ElementId], new_order: &[ElementId]);
}

pub trait CascadeObserver {
    fn begin_cascade(&self, db: DbId);
    fn end_cascade(&self, db: DbId);
}

// ------------- Listeners -------------
pub struct Listeners<O: ?Sized> {
    db: DbId,
    category: &'static str,
    observers: Vec<Weak<O>>,
}

impl<O: ?Sized> fmt::Debug for Listeners<O> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("db", &self.db)
            .field("category", &self.category)
            .field("observers", &self.observers.len())
            .finish()
    }
}

pub type VocabListListeners = Listeners<dyn VocabListObserver>;
pub type ColumnListListeners = Listeners<dyn ColumnListObserver>;

impl<O: ?Sized> Listeners<O> {
    pub fn new(db: DbId, category: &'static str) -> Self {
        Self {
            db,
            category,
            observers: Vec::new(),
        }
    }
    pub fn db(&self) -> DbId {
        self.db
    }
    /// Registering the same observer twice keeps a single registration.
    pub fn register_external(&mut self, handle: &Weak<O>) -> Result<()> {
        if handle.strong_count() == 0 {
            return Err(VocabError::NullHandle(self.category));
        }
        if self.observers.iter().any(|o| o.ptr_eq(handle)) {
            debug!(category = self.category, "observer already registered");
            return Ok(());
        }
        self.observers.push(handle.clone());
        debug!(category = self.category, count = self.observers.len(), "observer registered");
        Ok(())
    }
    /// Deregistering an observer that was never registered is a no-op.
    pub fn deregister_external(&mut self, handle: &Weak<O>) -> Result<()> {
        if handle.strong_count() == 0 {
            return Err(VocabError::NullHandle(self.category));
        }
        self.observers.retain(|o| !o.ptr_eq(handle));
        Ok(())
    }
    pub fn register_internal(&mut self, id: ElementId) -> Result<()> {
        Err(VocabError::Unsupported(format!(
            "internal {} listener {}",
            self.category, id
        )))
    }
    pub fn deregister_internal(&mut self, id: ElementId) -> Result<()> {
        Err(VocabError::Unsupported(format!(
            "internal {} listener {}",
            self.category, id
        )))
    }
    pub fn len(&self) -> usize {
        self.observers.len()
    }
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
    // Upgrades every handle up front so callbacks see a stable snapshot.
    // Handles that no longer upgrade are dropped from the registry.
    fn live(&mut self) -> Vec<Rc<O>> {
        let mut live = Vec::with_capacity(self.observers.len());
        let category = self.category;
        self.observers.retain(|o| match o.upgrade() {
            Some(observer) => {
                live.push(observer);
                true
            }
            None => {
                warn!(category, "pruning observer dropped without deregistering");
                false
            }
        });
        live
    }
}

impl Listeners<dyn VocabListObserver> {
    pub fn notify_insertion(&mut self, element_id: ElementId) {
        let db = self.db;
        for observer in self.live() {
            observer.vl_insertion(db, element_id);
        }
    }
    pub fn notify_deletion(&mut self, element_id: ElementId) {
        let db = self.db;
        for observer in self.live() {
            observer.vl_deletion(db, element_id);
        }
    }
}

impl Listeners<dyn ColumnListObserver> {
    pub fn notify_insertion(
        &mut self,
        column_id: ElementId,
        old_order: &[ElementId],
        new_order: &[ElementId],
    ) {
        let db = self.db;
        for observer in self.live() {
            observer.col_insertion(db, column_id, old_order, new_order);
        }
    }
    pub fn notify_deletion(
        &mut self,
        column_id: ElementId,
        old_order: &[ElementId],
        new_order: &[ElementId],
    ) {
        let db = self.db;
        for observer in self.live() {
            observer.col_deletion(db, column_id, old_order, new_order);
        }
    }
    pub fn notify_order_edited(&mut self, old_order: &[ElementId], new_order: &[ElementId]) {
        let db = self.db;
        for observer in self.live() {
            observer.col_order_edited(db, old_order, new_order);
        }
    }
}

// ------------- CascadeListeners -------------
/// Brackets multi-step mutations. Brackets nest; only the outermost begin
/// and end reach the observers.
#[derive(Debug)]
pub struct CascadeListeners {
    listeners: Listeners<dyn CascadeObserver>,
    depth: usize,
}

impl CascadeListeners {
    pub fn new(db: DbId) -> Self {
        Self {
            listeners: Listeners::new(db, "cascade"),
            depth: 0,
        }
    }
    pub fn register_external(&mut self, handle: &Weak<dyn CascadeObserver>) -> Result<()> {
        self.listeners.register_external(handle)
    }
    pub fn deregister_external(&mut self, handle: &Weak<dyn CascadeObserver>) -> Result<()> {
        self.listeners.deregister_external(handle)
    }
    pub fn register_internal(&mut self, id: ElementId) -> Result<()> {
        self.listeners.register_internal(id)
    }
    pub fn deregister_internal(&mut self, id: ElementId) -> Result<()> {
        self.listeners.deregister_internal(id)
    }
    pub fn len(&self) -> usize {
        self.listeners.len()
    }
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
    pub fn in_cascade(&self) -> bool {
        self.depth > 0
    }
    pub fn depth(&self) -> usize {
        self.depth
    }
    pub fn begin_cascade(&mut self) {
        self.depth += 1;
        if self.depth == 1 {
            let db = self.listeners.db();
            debug!(%db, "cascade begins");
            for observer in self.listeners.live() {
                observer.begin_cascade(db);
            }
        }
    }
    pub fn end_cascade(&mut self) -> Result<()> {
        if self.depth == 0 {
            return Err(VocabError::invariant("end of cascade without a matching begin"));
        }
        self.depth -= 1;
        if self.depth == 0 {
            let db = self.listeners.db();
            for observer in self.listeners.live() {
                observer.end_cascade(db);
            }
            debug!(%db, "cascade ends");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<String>>,
    }
    impl CascadeObserver for Recorder {
        fn begin_cascade(&self, _db: DbId) {
            self.events.borrow_mut().push("begin".into());
        }
        fn end_cascade(&self, _db: DbId) {
            self.events.borrow_mut().push("end".into());
        }
    }

    #[test]
    fn nested_cascades_notify_once() {
        let recorder = Rc::new(Recorder::default());
        let handle = Rc::downgrade(&recorder) as Weak<dyn CascadeObserver>;
        let mut cascade = CascadeListeners::new(DbId::next());
        cascade.register_external(&handle).unwrap();
        cascade.begin_cascade();
        cascade.begin_cascade();
        assert_eq!(cascade.depth(), 2);
        cascade.end_cascade().unwrap();
        assert!(cascade.in_cascade());
        cascade.end_cascade().unwrap();
        assert!(!cascade.in_cascade());
        assert_eq!(*recorder.events.borrow(), vec!["begin", "end"]);
        assert!(matches!(cascade.end_cascade(), Err(VocabError::Invariant(_))));
    }

    #[test]
    fn dropped_observers_are_pruned() {
        let mut cascade = CascadeListeners::new(DbId::next());
        {
            let recorder = Rc::new(Recorder::default());
            let handle = Rc::downgrade(&recorder) as Weak<dyn CascadeObserver>;
            cascade.register_external(&handle).unwrap();
        }
        assert_eq!(cascade.len(), 1);
        cascade.begin_cascade();
        assert!(cascade.is_empty());
        cascade.end_cascade().unwrap();
    }
}
