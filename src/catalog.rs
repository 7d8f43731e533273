//! The read-only query capability that validation consults.
//!
//! Formal-argument acceptance, salvage and well-formedness never reach into
//! a database directly. They take a `&dyn Catalog`, which
//! [`crate::database::Database`] implements and tests can fake.

use crate::construct::{DbId, ElementId, UserId};
use crate::datatype::TimeStamp;
use crate::farg::FormalArgument;
use crate::lexicon;
use crate::table::Column;
use crate::vocab::PredicateVocabElement;

/// A borrowed view of an element resolved through the index.
#[derive(Debug, Clone, Copy)]
pub enum ElementRef<'a> {
    Predicate(&'a PredicateVocabElement),
    FormalArgument(&'a FormalArgument),
    Column(&'a Column),
}

impl ElementRef<'_> {
    pub fn id(&self) -> ElementId {
        match self {
            ElementRef::Predicate(pve) => pve.id(),
            ElementRef::FormalArgument(farg) => farg.id(),
            ElementRef::Column(column) => column.id(),
        }
    }
}

pub trait Catalog {
    fn db_id(&self) -> DbId;
    fn current_user(&self) -> UserId;
    fn is_valid_user(&self, uid: UserId) -> bool;
    fn tick_rate(&self) -> u32;
    fn resolve(&self, id: ElementId) -> Option<ElementRef<'_>>;
    fn vocab_contains_name(&self, name: &str) -> bool;
    fn vocab_contains_id(&self, id: ElementId) -> bool;

    fn is_legal_predicate_name(&self, name: &str) -> bool {
        lexicon::is_legal_predicate_name(name)
    }
    fn is_legal_nominal(&self, value: &str) -> bool {
        lexicon::is_legal_nominal(value)
    }
    fn is_legal_quote_string(&self, value: &str) -> bool {
        lexicon::is_legal_quote_string(value)
    }
    fn is_legal_text_string(&self, value: &str) -> bool {
        lexicon::is_legal_text_string(value)
    }
    fn is_legal_time_stamp(&self, value: &TimeStamp) -> bool {
        value.is_legal()
    }
}

/// A catalog with a hand-filled vocabulary and user table, so validation
/// can be exercised without a database.
#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashSet;

    use super::*;
    use crate::datatype::DEFAULT_TPS;

    pub(crate) struct FakeCatalog {
        pub db: DbId,
        pub names: HashSet<String>,
        pub ids: HashSet<ElementId>,
        pub users: HashSet<UserId>,
    }

    impl FakeCatalog {
        pub fn new() -> Self {
            Self {
                db: DbId::next(),
                names: HashSet::new(),
                ids: HashSet::new(),
                users: HashSet::new(),
            }
        }
    }

    impl Catalog for FakeCatalog {
        fn db_id(&self) -> DbId {
            self.db
        }
        fn current_user(&self) -> UserId {
            crate::construct::NO_USER
        }
        fn is_valid_user(&self, uid: UserId) -> bool {
            uid == crate::construct::NO_USER || self.users.contains(&uid)
        }
        fn tick_rate(&self) -> u32 {
            DEFAULT_TPS
        }
        fn resolve(&self, _id: ElementId) -> Option<ElementRef<'_>> {
            None
        }
        fn vocab_contains_name(&self, name: &str) -> bool {
            self.names.contains(name)
        }
        fn vocab_contains_id(&self, id: ElementId) -> bool {
            self.ids.contains(&id)
        }
    }
}
