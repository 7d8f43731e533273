// Identity layer: every stored element embeds an `Identity`, and every
// identity is handed out by the `IdGenerator` of its owning database.

use core::hash::BuildHasherDefault;
use std::collections::HashSet;
use std::collections::hash_set::Iter;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use seahash::SeaHasher;
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::{Result, VocabError};

// ------------- Identifiers -------------
pub type ElementId = u64;
pub type UserId = u32;

pub type IdHasher = BuildHasherDefault<SeaHasher>;

/// The unassigned identifier. Never handed out by a generator.
pub const INVALID_ID: ElementId = 0;
/// The "nobody in particular" user, valid in every database.
pub const NO_USER: UserId = 0;

static NEXT_DB: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of one database instance. Elements hold it as a
/// back-reference that grants no ownership.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct DbId(u64);

impl DbId {
    pub fn next() -> Self {
        Self(NEXT_DB.fetch_add(1, Ordering::Relaxed))
    }
}
impl fmt::Display for DbId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "db#{}", self.0)
    }
}

// ------------- IdGenerator -------------
#[derive(Debug)]
pub struct IdGenerator {
    lower_bound: ElementId,
    retained: HashSet<ElementId, IdHasher>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            lower_bound: INVALID_ID,
            retained: HashSet::default(),
        }
    }
    // Ids may be explicitly retained when elements are restored from an
    // external source. The lower bound follows so that generated ids
    // never collide with restored ones.
    pub fn retain(&mut self, id: ElementId) -> Result<()> {
        if id == INVALID_ID {
            return Err(VocabError::InvalidIdentifier(
                "cannot retain the unassigned id".into(),
            ));
        }
        if !self.retained.insert(id) {
            return Err(VocabError::InvalidIdentifier(format!(
                "id {} is already in use",
                id
            )));
        }
        if id > self.lower_bound {
            self.lower_bound = id;
        }
        Ok(())
    }
    pub fn check(&self, id: ElementId) -> bool {
        self.retained.contains(&id)
    }
    // Released ids are retired for good, identifiers are never reused.
    pub fn release(&mut self, id: ElementId) -> bool {
        self.retained.remove(&id)
    }
    pub fn generate(&mut self) -> ElementId {
        self.lower_bound += 1;
        self.retained.insert(self.lower_bound);
        self.lower_bound
    }
    pub fn len(&self) -> usize {
        self.retained.len()
    }
    pub fn is_empty(&self) -> bool {
        self.retained.is_empty()
    }
    pub fn iter(&self) -> Iter<'_, ElementId> {
        self.retained.iter()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// ------------- Identity -------------
/// Identifier, modification stamp and owning database of a stored element.
///
/// Two identities are equal only when all three agree, since differently
/// stamped snapshots of the same logical element may coexist while an
/// edit is being prepared.
#[derive(Debug)]
pub struct Identity {
    db: Option<DbId>,
    id: ElementId,
    last_mod_uid: UserId,
}

impl Identity {
    pub fn new(db: DbId) -> Self {
        Self {
            db: Some(db),
            id: INVALID_ID,
            last_mod_uid: NO_USER,
        }
    }
    /// An identity without an owning database. Useful only until it is
    /// attached; most operations on it fail with `InvalidState`.
    pub fn detached() -> Self {
        Self {
            db: None,
            id: INVALID_ID,
            last_mod_uid: NO_USER,
        }
    }
    pub fn db(&self) -> Option<DbId> {
        self.db
    }
    pub fn id(&self) -> ElementId {
        self.id
    }
    pub fn last_mod_uid(&self) -> UserId {
        self.last_mod_uid
    }
    pub fn is_assigned(&self) -> bool {
        self.id != INVALID_ID
    }
    pub fn assign_id(&mut self, id: ElementId) -> Result<()> {
        if id == INVALID_ID {
            return Err(VocabError::InvalidIdentifier(
                "cannot assign the unassigned id".into(),
            ));
        }
        self.id = id;
        Ok(())
    }
    /// Resets the identifier and returns the one that was held.
    pub fn clear_id(&mut self) -> ElementId {
        std::mem::replace(&mut self.id, INVALID_ID)
    }
    pub fn mark_modified_by(&mut self, catalog: &dyn Catalog, uid: UserId) -> Result<()> {
        self.owned_by(catalog)?;
        if !catalog.is_valid_user(uid) {
            return Err(VocabError::InvalidUser(uid));
        }
        self.last_mod_uid = uid;
        Ok(())
    }
    pub fn mark_modified_by_current_user(&mut self, catalog: &dyn Catalog) -> Result<()> {
        self.owned_by(catalog)?;
        self.last_mod_uid = catalog.current_user();
        Ok(())
    }
    /// Copies id, stamp and owner verbatim. Refuses to propagate a stamp
    /// that no longer resolves to a valid user.
    pub fn copy(&self, catalog: &dyn Catalog) -> Result<Identity> {
        self.owned_by(catalog)?;
        if !catalog.is_valid_user(self.last_mod_uid) {
            debug!(id = self.id, uid = self.last_mod_uid, "refusing to copy stale stamp");
            return Err(VocabError::InvalidUser(self.last_mod_uid));
        }
        Ok(Identity {
            db: self.db,
            id: self.id,
            last_mod_uid: self.last_mod_uid,
        })
    }
    fn owned_by(&self, catalog: &dyn Catalog) -> Result<()> {
        match self.db {
            None => Err(VocabError::InvalidState(format!(
                "element {} has no owning database",
                self.id
            ))),
            Some(db) if db != catalog.db_id() => Err(VocabError::invariant(format!(
                "element {} belongs to {}, not {}",
                self.id,
                db,
                catalog.db_id()
            ))),
            Some(_) => Ok(()),
        }
    }
}
impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.db == other.db && self.id == other.id && self.last_mod_uid == other.last_mod_uid
    }
}
impl Eq for Identity {}
impl Hash for Identity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_never_reissues_released_ids() {
        let mut generator = IdGenerator::new();
        let first = generator.generate();
        let second = generator.generate();
        assert_eq!((first, second), (1, 2));
        assert!(generator.release(first));
        assert!(!generator.check(first));
        assert_eq!(generator.generate(), 3);
    }

    #[test]
    fn retain_raises_lower_bound() {
        let mut generator = IdGenerator::new();
        generator.retain(40).unwrap();
        assert_eq!(generator.generate(), 41);
        assert!(generator.retain(40).is_err());
        assert!(generator.retain(INVALID_ID).is_err());
    }

    #[test]
    fn clear_id_returns_previous() {
        let mut identity = Identity::new(DbId::next());
        identity.assign_id(9).unwrap();
        assert_eq!(identity.clear_id(), 9);
        assert!(!identity.is_assigned());
        assert!(matches!(
            identity.assign_id(INVALID_ID),
            Err(VocabError::InvalidIdentifier(_))
        ));
    }
}
