//! The owning database: id authority, user table, vocabulary table, column
//! list and cascade bracket. It is the only way elements enter or leave the
//! collections, and it is the [`Catalog`] that validation consults.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::catalog::{Catalog, ElementRef};
use crate::config::Settings;
use crate::construct::{DbId, ElementId, INVALID_ID, IdGenerator, IdHasher, NO_USER, UserId};
use crate::datatype::{DEFAULT_TPS, MAX_TPS, MIN_TPS};
use crate::error::{Result, VocabError};
use crate::lexicon;
use crate::listener::{CascadeListeners, ColumnListListeners, VocabListListeners};
use crate::table::{Column, ColumnList, VocabList};
use crate::vocab::PredicateVocabElement;

#[derive(Debug)]
pub struct Database {
    id: DbId,
    tick_rate: u32,
    users: HashSet<UserId, IdHasher>,
    current_user: UserId,
    ids: IdGenerator,
    vocab: VocabList,
    columns: ColumnList,
    cascade: CascadeListeners,
}

impl Database {
    pub fn new() -> Self {
        let id = DbId::next();
        Self {
            id,
            tick_rate: DEFAULT_TPS,
            users: HashSet::default(),
            current_user: NO_USER,
            ids: IdGenerator::new(),
            vocab: VocabList::new(id),
            columns: ColumnList::new(id),
            cascade: CascadeListeners::new(id),
        }
    }
    pub fn with_settings(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let mut db = Self::new();
        db.tick_rate = settings.ticks_per_second;
        db.users.extend(settings.users.iter().filter(|uid| **uid != NO_USER));
        db.current_user = settings.current_user;
        info!(db = %db.id, tps = db.tick_rate, users = db.users.len(), "database created");
        Ok(db)
    }
    pub fn id(&self) -> DbId {
        self.id
    }

    // ------------- settings and users -------------
    pub fn set_tick_rate(&mut self, tps: u32) -> Result<()> {
        if !(MIN_TPS..=MAX_TPS).contains(&tps) {
            return Err(VocabError::invariant(format!("tick rate {} out of range", tps)));
        }
        self.tick_rate = tps;
        Ok(())
    }
    pub fn register_user(&mut self, uid: UserId) -> Result<()> {
        if uid == NO_USER || !self.users.insert(uid) {
            return Err(VocabError::InvalidUser(uid));
        }
        debug!(uid, "user registered");
        Ok(())
    }
    /// Retired users no longer validate, so stamps they left behind can no
    /// longer be copied.
    pub fn retire_user(&mut self, uid: UserId) -> Result<()> {
        if uid == self.current_user {
            return Err(VocabError::InvalidState(format!(
                "user {} is the current user",
                uid
            )));
        }
        if !self.users.remove(&uid) {
            return Err(VocabError::InvalidUser(uid));
        }
        debug!(uid, "user retired");
        Ok(())
    }
    pub fn set_current_user(&mut self, uid: UserId) -> Result<()> {
        if !self.is_valid_user(uid) {
            return Err(VocabError::InvalidUser(uid));
        }
        self.current_user = uid;
        Ok(())
    }

    // ------------- vocabulary -------------
    /// A fresh, detached predicate owned by this database, ready for its
    /// arguments to be appended.
    pub fn new_predicate(&self, name: &str) -> Result<PredicateVocabElement> {
        PredicateVocabElement::new(self.id, name)
    }
    pub fn vocab_list(&self) -> &VocabList {
        &self.vocab
    }
    pub fn vocab_element(&self, id: ElementId) -> Option<&PredicateVocabElement> {
        self.vocab.get(id)
    }
    pub fn vocab_element_by_name(&self, name: &str) -> Option<&PredicateVocabElement> {
        self.vocab.get_by_name(name)
    }
    pub fn add_vocab_element(&mut self, mut element: PredicateVocabElement) -> Result<ElementId> {
        if element.db() != Some(self.id) {
            return Err(VocabError::invariant(format!(
                "{} does not belong to {}",
                element.name(),
                self.id
            )));
        }
        if element.identity().is_assigned()
            || element.fargs().iter().any(|farg| farg.identity().is_assigned())
        {
            return Err(VocabError::invariant(format!(
                "{} already carries ids",
                element.name()
            )));
        }
        if !element.is_well_formed(&*self, true)? {
            return Err(VocabError::logic(
                element.id(),
                format!("{} is not well formed", element.name()),
            ));
        }
        element.identity_mut().mark_modified_by_current_user(&*self)?;
        self.vocab.add_element(&mut self.ids, &mut self.cascade, element)
    }
    /// Returns the definition that was replaced.
    pub fn replace_vocab_element(
        &mut self,
        mut element: PredicateVocabElement,
    ) -> Result<PredicateVocabElement> {
        if !element.is_well_formed(&*self, false)? {
            return Err(VocabError::logic(
                element.id(),
                format!("{} is not well formed", element.name()),
            ));
        }
        if let Some(other) = self.vocab.id_of(element.name()).filter(|id| *id != element.id()) {
            return Err(VocabError::logic(
                element.id(),
                format!("name {} is taken by {}", element.name(), other),
            ));
        }
        element.identity_mut().mark_modified_by_current_user(&*self)?;
        self.vocab.replace_element(&mut self.ids, &mut self.cascade, element)
    }
    pub fn remove_vocab_element(&mut self, id: ElementId) -> Result<PredicateVocabElement> {
        self.vocab.remove_element(&mut self.ids, &mut self.cascade, id)
    }

    // ------------- columns -------------
    pub fn column_list(&self) -> &ColumnList {
        &self.columns
    }
    pub fn column(&self, id: ElementId) -> Option<&Column> {
        self.columns.get(id)
    }
    pub fn add_column(&mut self, name: &str) -> Result<ElementId> {
        if !lexicon::is_legal_predicate_name(name) {
            return Err(VocabError::logic(
                INVALID_ID,
                format!("{:?} is not a legal column name", name),
            ));
        }
        if self.columns.contains_name(name) {
            return Err(VocabError::logic(
                INVALID_ID,
                format!("column {} already exists", name),
            ));
        }
        self.columns.add_column(&mut self.ids, &mut self.cascade, name)
    }
    pub fn remove_column(&mut self, id: ElementId) -> Result<Column> {
        self.columns.remove_column(&mut self.ids, &mut self.cascade, id)
    }
    pub fn reorder_columns(&mut self, new_order: &[ElementId]) -> Result<()> {
        self.columns.reorder(&mut self.cascade, new_order)
    }

    // ------------- listeners -------------
    pub fn vocab_listeners_mut(&mut self) -> &mut VocabListListeners {
        self.vocab.listeners_mut()
    }
    pub fn column_listeners_mut(&mut self) -> &mut ColumnListListeners {
        self.columns.listeners_mut()
    }
    pub fn cascade_listeners_mut(&mut self) -> &mut CascadeListeners {
        &mut self.cascade
    }
    /// Opens a cascade around a batch of mutations. Every begin needs a
    /// matching [`Database::end_cascade`].
    pub fn begin_cascade(&mut self) {
        self.cascade.begin_cascade();
    }
    pub fn end_cascade(&mut self) -> Result<()> {
        self.cascade.end_cascade()
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog for Database {
    fn db_id(&self) -> DbId {
        self.id
    }
    fn current_user(&self) -> UserId {
        self.current_user
    }
    fn is_valid_user(&self, uid: UserId) -> bool {
        uid == NO_USER || self.users.contains(&uid)
    }
    fn tick_rate(&self) -> u32 {
        self.tick_rate
    }
    fn resolve(&self, id: ElementId) -> Option<ElementRef<'_>> {
        self.vocab
            .get(id)
            .map(ElementRef::Predicate)
            .or_else(|| self.vocab.formal_arg(id).map(ElementRef::FormalArgument))
            .or_else(|| self.columns.get(id).map(ElementRef::Column))
    }
    fn vocab_contains_name(&self, name: &str) -> bool {
        self.vocab.contains_name(name)
    }
    fn vocab_contains_id(&self, id: ElementId) -> bool {
        self.vocab.contains_id(id)
    }
}
