// The two collections a database owns exclusively: the vocabulary table and
// the column list. Both follow the keeper pattern, owning what they hold and
// handing out references. Their mutators are crate-private: the database
// validates first, then lets them commit inside a cascade bracket.

use std::collections::{HashMap, HashSet};
use std::collections::hash_map::Values;
use std::fmt;

use bimap::BiMap;
use tracing::{debug, info};

use crate::construct::{DbId, ElementId, IdGenerator, IdHasher, Identity};
use crate::error::{Result, VocabError};
use crate::farg::FormalArgument;
use crate::listener::{CascadeListeners, ColumnListListeners, VocabListListeners};
use crate::vocab::PredicateVocabElement;

// Runs `commit` inside a cascade bracket that is closed whatever the outcome.
fn bracketed<T>(
    cascade: &mut CascadeListeners,
    commit: impl FnOnce() -> Result<T>,
) -> Result<T> {
    cascade.begin_cascade();
    let outcome = commit();
    cascade.end_cascade()?;
    outcome
}

// ------------- VocabList -------------
#[derive(Debug)]
pub struct VocabList {
    elements: HashMap<ElementId, PredicateVocabElement, IdHasher>,
    names: BiMap<String, ElementId>,
    // formal argument id -> id of the element holding it
    fargs: HashMap<ElementId, ElementId, IdHasher>,
    listeners: VocabListListeners,
}

impl VocabList {
    pub fn new(db: DbId) -> Self {
        Self {
            elements: HashMap::default(),
            names: BiMap::new(),
            fargs: HashMap::default(),
            listeners: VocabListListeners::new(db, "vocab list"),
        }
    }
    pub fn get(&self, id: ElementId) -> Option<&PredicateVocabElement> {
        self.elements.get(&id)
    }
    pub fn get_by_name(&self, name: &str) -> Option<&PredicateVocabElement> {
        self.names.get_by_left(name).and_then(|id| self.elements.get(id))
    }
    pub fn id_of(&self, name: &str) -> Option<ElementId> {
        self.names.get_by_left(name).copied()
    }
    pub fn formal_arg(&self, id: ElementId) -> Option<&FormalArgument> {
        let owner = self.fargs.get(&id)?;
        self.elements
            .get(owner)?
            .fargs()
            .iter()
            .find(|farg| farg.id() == id)
    }
    pub fn contains_id(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }
    pub fn contains_name(&self, name: &str) -> bool {
        self.names.contains_left(name)
    }
    pub fn len(&self) -> usize {
        self.elements.len()
    }
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
    pub fn iter(&self) -> Values<'_, ElementId, PredicateVocabElement> {
        self.elements.values()
    }
    pub fn listeners(&self) -> &VocabListListeners {
        &self.listeners
    }
    pub fn listeners_mut(&mut self) -> &mut VocabListListeners {
        &mut self.listeners
    }

    /// Commits a new element. The caller has checked well-formedness and that
    /// neither the element nor its arguments carry an id yet.
    pub(crate) fn add_element(
        &mut self,
        ids: &mut IdGenerator,
        cascade: &mut CascadeListeners,
        mut element: PredicateVocabElement,
    ) -> Result<ElementId> {
        bracketed(cascade, || {
            let id = ids.generate();
            element.identity_mut().assign_id(id)?;
            for farg in element.fargs_mut() {
                let farg_id = ids.generate();
                farg.identity_mut().assign_id(farg_id)?;
                farg.set_vocab_element(id);
                self.fargs.insert(farg_id, id);
            }
            info!(id, name = element.name(), "vocab element added");
            self.names.insert(element.name().to_owned(), id);
            self.elements.insert(id, element);
            self.listeners.notify_insertion(id);
            Ok(id)
        })
    }

    /// Swaps in a new definition of an existing element. Arguments that keep
    /// their id must come from the old definition and may appear only once,
    /// new ones get fresh ids and ids of dropped ones are released. The entry itself is neither inserted
    /// nor deleted, so observers are not told.
    pub(crate) fn replace_element(
        &mut self,
        ids: &mut IdGenerator,
        cascade: &mut CascadeListeners,
        mut element: PredicateVocabElement,
    ) -> Result<PredicateVocabElement> {
        let id = element.id();
        let old = self
            .elements
            .get(&id)
            .ok_or_else(|| VocabError::invariant(format!("vocab element {} not found", id)))?;
        let mut seen = HashSet::new();
        for farg in element.fargs().iter().filter(|f| f.identity().is_assigned()) {
            if !old.fargs().iter().any(|o| o.id() == farg.id()) {
                return Err(VocabError::invariant(format!(
                    "argument {} of {} is not part of the old definition",
                    farg.id(),
                    element.name()
                )));
            }
            if !seen.insert(farg.id()) {
                return Err(VocabError::invariant(format!(
                    "argument id {} appears twice in {}",
                    farg.id(),
                    element.name()
                )));
            }
        }
        bracketed(cascade, || {
            for farg in element.fargs_mut() {
                if !farg.identity().is_assigned() {
                    let farg_id = ids.generate();
                    farg.identity_mut().assign_id(farg_id)?;
                    self.fargs.insert(farg_id, id);
                    debug!(id, farg_id, "argument id assigned");
                }
                farg.set_vocab_element(id);
            }
            self.names.insert(element.name().to_owned(), id);
            let old = self
                .elements
                .insert(id, element)
                .ok_or_else(|| VocabError::invariant(format!("vocab element {} vanished", id)))?;
            let kept = &self.elements[&id];
            for farg in old.fargs() {
                if !kept.fargs().iter().any(|k| k.id() == farg.id()) {
                    ids.release(farg.id());
                    self.fargs.remove(&farg.id());
                    debug!(id, farg_id = farg.id(), "argument id released");
                }
            }
            info!(id, name = kept.name(), "vocab element replaced");
            Ok(old)
        })
    }

    pub(crate) fn remove_element(
        &mut self,
        ids: &mut IdGenerator,
        cascade: &mut CascadeListeners,
        id: ElementId,
    ) -> Result<PredicateVocabElement> {
        if !self.elements.contains_key(&id) {
            return Err(VocabError::invariant(format!("vocab element {} not found", id)));
        }
        bracketed(cascade, || {
            let mut element = self
                .elements
                .remove(&id)
                .ok_or_else(|| VocabError::invariant(format!("vocab element {} vanished", id)))?;
            self.names.remove_by_right(&id);
            for farg in element.fargs_mut() {
                let farg_id = farg.identity_mut().clear_id();
                self.fargs.remove(&farg_id);
                ids.release(farg_id);
            }
            ids.release(element.identity_mut().clear_id());
            info!(id, name = element.name(), "vocab element removed");
            self.listeners.notify_deletion(id);
            Ok(element)
        })
    }
}

// ------------- Column -------------
/// A named, ordered column of the spreadsheet view.
#[derive(Debug)]
pub struct Column {
    identity: Identity,
    name: String,
}

impl Column {
    pub fn identity(&self) -> &Identity {
        &self.identity
    }
    pub fn id(&self) -> ElementId {
        self.identity.id()
    }
    pub fn name(&self) -> &str {
        &self.name
    }
}
impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// ------------- ColumnList -------------
#[derive(Debug)]
pub struct ColumnList {
    db: DbId,
    columns: HashMap<ElementId, Column, IdHasher>,
    order: Vec<ElementId>,
    listeners: ColumnListListeners,
}

impl ColumnList {
    pub fn new(db: DbId) -> Self {
        Self {
            db,
            columns: HashMap::default(),
            order: Vec::new(),
            listeners: ColumnListListeners::new(db, "column list"),
        }
    }
    pub fn get(&self, id: ElementId) -> Option<&Column> {
        self.columns.get(&id)
    }
    pub fn get_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.values().find(|column| column.name == name)
    }
    pub fn contains_name(&self, name: &str) -> bool {
        self.get_by_name(name).is_some()
    }
    /// Column ids in display order.
    pub fn order(&self) -> &[ElementId] {
        &self.order
    }
    pub fn len(&self) -> usize {
        self.order.len()
    }
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.order.iter().filter_map(|id| self.columns.get(id))
    }
    pub fn listeners(&self) -> &ColumnListListeners {
        &self.listeners
    }
    pub fn listeners_mut(&mut self) -> &mut ColumnListListeners {
        &mut self.listeners
    }

    pub(crate) fn add_column(
        &mut self,
        ids: &mut IdGenerator,
        cascade: &mut CascadeListeners,
        name: &str,
    ) -> Result<ElementId> {
        bracketed(cascade, || {
            let id = ids.generate();
            let mut identity = Identity::new(self.db);
            identity.assign_id(id)?;
            let old_order = self.order.clone();
            self.columns.insert(
                id,
                Column {
                    identity,
                    name: name.to_owned(),
                },
            );
            self.order.push(id);
            info!(id, name, "column added");
            self.listeners.notify_insertion(id, &old_order, &self.order);
            Ok(id)
        })
    }

    pub(crate) fn remove_column(
        &mut self,
        ids: &mut IdGenerator,
        cascade: &mut CascadeListeners,
        id: ElementId,
    ) -> Result<Column> {
        if !self.columns.contains_key(&id) {
            return Err(VocabError::invariant(format!("column {} not found", id)));
        }
        bracketed(cascade, || {
            let mut column = self
                .columns
                .remove(&id)
                .ok_or_else(|| VocabError::invariant(format!("column {} vanished", id)))?;
            let old_order = self.order.clone();
            self.order.retain(|c| *c != id);
            ids.release(column.identity.clear_id());
            info!(id, name = column.name(), "column removed");
            self.listeners.notify_deletion(id, &old_order, &self.order);
            Ok(column)
        })
    }

    /// `new_order` must be a permutation of the current order. An unchanged
    /// order is accepted silently.
    pub(crate) fn reorder(
        &mut self,
        cascade: &mut CascadeListeners,
        new_order: &[ElementId],
    ) -> Result<()> {
        let mut current = self.order.clone();
        let mut proposed = new_order.to_vec();
        current.sort_unstable();
        proposed.sort_unstable();
        if current != proposed {
            return Err(VocabError::invariant(
                "new column order is not a permutation of the current one",
            ));
        }
        if self.order == new_order {
            return Ok(());
        }
        bracketed(cascade, || {
            let old_order = std::mem::replace(&mut self.order, new_order.to_vec());
            debug!(?new_order, "columns reordered");
            self.listeners.notify_order_edited(&old_order, &self.order);
            Ok(())
        })
    }
}
