// ------------- PredicateVocabElement -------------
// A named, ordered signature of formal arguments. Elements are authored
// detached from the vocabulary table and only enter it through the
// database, which checks `is_well_formed` first.

use std::fmt;

use tracing::warn;

use crate::catalog::Catalog;
use crate::construct::{DbId, ElementId, INVALID_ID, Identity};
use crate::error::{Result, VocabError};
use crate::farg::{FargType, FormalArgument};
use crate::lexicon;

#[derive(Debug)]
pub struct PredicateVocabElement {
    identity: Identity,
    name: String,
    system: bool,
    var_len: bool,
    fargs: Vec<FormalArgument>,
}

impl PredicateVocabElement {
    pub fn new(db: DbId, name: &str) -> Result<Self> {
        let mut element = Self::unnamed(db);
        element.set_name(name)?;
        Ok(element)
    }
    /// An element whose name is still to be chosen. It is never well formed
    /// until it gets one.
    pub fn unnamed(db: DbId) -> Self {
        Self {
            identity: Identity::new(db),
            name: String::new(),
            system: false,
            var_len: false,
            fargs: Vec::new(),
        }
    }
    pub fn identity(&self) -> &Identity {
        &self.identity
    }
    pub(crate) fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }
    pub fn id(&self) -> ElementId {
        self.identity.id()
    }
    pub fn db(&self) -> Option<DbId> {
        self.identity.db()
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        if !lexicon::is_legal_predicate_name(name) {
            return Err(VocabError::invariant(format!("invalid predicate name {:?}", name)));
        }
        self.name = name.to_owned();
        Ok(())
    }
    /// System elements are frozen: their argument lists cannot be edited.
    pub fn system(&self) -> bool {
        self.system
    }
    pub fn set_system(&mut self) -> Result<()> {
        if self.fargs.is_empty() {
            return Err(VocabError::invariant(format!(
                "{} cannot become a system element without arguments",
                self.name
            )));
        }
        self.system = true;
        Ok(())
    }
    pub fn var_len(&self) -> bool {
        self.var_len
    }
    pub fn set_var_len(&mut self, var_len: bool) -> Result<()> {
        self.editable()?;
        self.var_len = var_len;
        Ok(())
    }

    // ------------- formal argument list -------------
    pub fn fargs(&self) -> &[FormalArgument] {
        &self.fargs
    }
    pub(crate) fn fargs_mut(&mut self) -> &mut [FormalArgument] {
        &mut self.fargs
    }
    pub fn num_formal_args(&self) -> usize {
        self.fargs.len()
    }
    pub fn formal_arg(&self, n: usize) -> Result<&FormalArgument> {
        self.fargs
            .get(n)
            .ok_or_else(|| VocabError::invariant(format!("no formal argument at {}", n)))
    }
    pub fn formal_arg_mut(&mut self, n: usize) -> Result<&mut FormalArgument> {
        self.editable()?;
        self.fargs
            .get_mut(n)
            .ok_or_else(|| VocabError::invariant(format!("no formal argument at {}", n)))
    }
    pub fn farg_name_is_unique(&self, name: &str) -> bool {
        self.fargs.iter().all(|farg| farg.name() != name)
    }
    pub fn append_formal_arg(&mut self, farg: FormalArgument) -> Result<()> {
        let n = self.fargs.len();
        self.insert_formal_arg(farg, n)
    }
    pub fn insert_formal_arg(&mut self, mut farg: FormalArgument, n: usize) -> Result<()> {
        self.editable()?;
        self.adoptable(&farg)?;
        if n > self.fargs.len() {
            return Err(VocabError::invariant(format!(
                "insertion point {} is past the end of {}",
                n, self.name
            )));
        }
        if !self.farg_name_is_unique(farg.name()) {
            return Err(VocabError::invariant(format!(
                "{} already has an argument named {}",
                self.name,
                farg.name()
            )));
        }
        farg.set_vocab_element(self.id());
        self.fargs.insert(n, farg);
        Ok(())
    }
    pub fn delete_formal_arg(&mut self, n: usize) -> Result<FormalArgument> {
        self.editable()?;
        if n >= self.fargs.len() {
            return Err(VocabError::invariant(format!("no formal argument at {}", n)));
        }
        Ok(self.fargs.remove(n))
    }
    /// Swaps in `farg` at position `n` and hands back the argument it displaced.
    pub fn replace_formal_arg(
        &mut self,
        mut farg: FormalArgument,
        n: usize,
    ) -> Result<FormalArgument> {
        self.editable()?;
        self.adoptable(&farg)?;
        if n >= self.fargs.len() {
            return Err(VocabError::invariant(format!("no formal argument at {}", n)));
        }
        let clash = self
            .fargs
            .iter()
            .enumerate()
            .any(|(i, other)| i != n && other.name() == farg.name());
        if clash {
            return Err(VocabError::invariant(format!(
                "{} already has an argument named {}",
                self.name,
                farg.name()
            )));
        }
        farg.set_vocab_element(self.id());
        Ok(std::mem::replace(&mut self.fargs[n], farg))
    }
    fn editable(&self) -> Result<()> {
        if self.system {
            return Err(VocabError::invariant(format!("{} is a system element", self.name)));
        }
        Ok(())
    }
    fn adoptable(&self, farg: &FormalArgument) -> Result<()> {
        if farg.identity().db() != self.db() {
            return Err(VocabError::invariant(format!(
                "argument {} belongs to another database",
                farg.name()
            )));
        }
        Ok(())
    }

    /// Deep copy, arguments included. Ids and stamps are carried verbatim.
    pub fn copy(&self, catalog: &dyn Catalog) -> Result<PredicateVocabElement> {
        let fargs = self
            .fargs
            .iter()
            .map(|farg| farg.copy(catalog))
            .collect::<Result<Vec<_>>>()?;
        Ok(PredicateVocabElement {
            identity: self.identity.copy(catalog)?,
            name: self.name.clone(),
            system: self.system,
            var_len: self.var_len,
            fargs,
        })
    }

    /// Structural validation ahead of an insert (`is_new`) or a replace.
    ///
    /// `Ok(false)` reports a state the author can correct. An `Err` means an
    /// invariant that argument-list editing should already have enforced has
    /// been broken: an illegal name, two arguments sharing a name, or a
    /// text-string argument.
    pub fn is_well_formed(&self, catalog: &dyn Catalog, is_new: bool) -> Result<bool> {
        let Some(db) = self.db() else {
            return Ok(false);
        };
        if self.name.is_empty() {
            return Ok(false);
        }
        if db != catalog.db_id() {
            return Err(VocabError::invariant(format!(
                "{} belongs to {}, not {}",
                self.name,
                db,
                catalog.db_id()
            )));
        }
        if is_new {
            if catalog.vocab_contains_name(&self.name) {
                return Ok(false);
            }
        } else if self.id() == INVALID_ID || !catalog.vocab_contains_id(self.id()) {
            return Ok(false);
        }
        if self.fargs.is_empty() {
            return Ok(false);
        }
        if !catalog.is_legal_predicate_name(&self.name) {
            return Err(VocabError::invariant(format!("invalid predicate name {:?}", self.name)));
        }
        for (i, farg) in self.fargs.iter().enumerate() {
            let duplicate = self
                .fargs
                .iter()
                .enumerate()
                .any(|(j, other)| i != j && farg.name() == other.name());
            if duplicate {
                warn!(element = %self.name, farg = farg.name(), "duplicate formal argument name");
                return Err(VocabError::invariant(format!(
                    "{} holds two arguments named {}",
                    self.name,
                    farg.name()
                )));
            }
            if farg.farg_type() == FargType::TextString {
                return Err(VocabError::invariant(format!(
                    "{} holds the text string argument {}",
                    self.name,
                    farg.name()
                )));
            }
        }
        Ok(true)
    }

    pub fn to_db_string(&self) -> String {
        let fargs: Vec<String> = self.fargs.iter().map(FormalArgument::to_db_string).collect();
        format!(
            "((PredicateVocabElement {} {}) (system {}) (varLen {}) ({}))",
            self.id(),
            self.name,
            self.system,
            self.var_len,
            fargs.join(", ")
        )
    }
}

impl fmt::Display for PredicateVocabElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names: Vec<&str> = self.fargs.iter().map(FormalArgument::name).collect();
        write!(f, "{}({})", self.name, names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::FakeCatalog;
    use crate::farg::FargKind;

    fn point(catalog: &FakeCatalog, fargs: &[&str]) -> PredicateVocabElement {
        let mut pve = PredicateVocabElement::new(catalog.db, "Point").unwrap();
        for name in fargs {
            pve.append_formal_arg(FormalArgument::untyped(catalog.db, name).unwrap())
                .unwrap();
        }
        pve
    }

    #[test]
    fn empty_signature_is_not_well_formed() {
        let catalog = FakeCatalog::new();
        let pve = point(&catalog, &[]);
        assert_eq!(pve.is_well_formed(&catalog, true), Ok(false));
    }

    #[test]
    fn duplicate_names_are_an_invariant_error() {
        let catalog = FakeCatalog::new();
        let mut pve = point(&catalog, &["<x>"]);
        assert!(pve
            .append_formal_arg(FormalArgument::untyped(catalog.db, "<x>").unwrap())
            .is_err());
        // corrupt the list behind the editing checks
        pve.fargs.push(FormalArgument::untyped(catalog.db, "<x>").unwrap());
        let outcome = pve.is_well_formed(&catalog, true);
        assert!(matches!(outcome, Err(VocabError::Invariant(_))));
        assert!(outcome.unwrap_err().is_invariant());
    }

    #[test]
    fn text_string_argument_is_an_invariant_error() {
        let catalog = FakeCatalog::new();
        let mut pve = point(&catalog, &["<x>"]);
        pve.append_formal_arg(FormalArgument::text_string(catalog.db, "<note>").unwrap())
            .unwrap();
        assert!(matches!(
            pve.is_well_formed(&catalog, true),
            Err(VocabError::Invariant(_))
        ));
    }

    #[test]
    fn illegal_name_is_an_invariant_error() {
        let catalog = FakeCatalog::new();
        let mut pve = point(&catalog, &["<x>"]);
        pve.name = "two words".into();
        assert!(matches!(
            pve.is_well_formed(&catalog, true),
            Err(VocabError::Invariant(_))
        ));
    }

    #[test]
    fn unnamed_or_detached_is_not_well_formed() {
        let catalog = FakeCatalog::new();
        let mut pve = PredicateVocabElement::unnamed(catalog.db);
        pve.append_formal_arg(FormalArgument::untyped(catalog.db, "<x>").unwrap())
            .unwrap();
        assert_eq!(pve.is_well_formed(&catalog, true), Ok(false));
        let mut detached = point(&catalog, &["<x>"]);
        detached.identity = Identity::detached();
        assert_eq!(detached.is_well_formed(&catalog, true), Ok(false));
    }

    #[test]
    fn new_versus_replacement() {
        let mut catalog = FakeCatalog::new();
        let mut pve = point(&catalog, &["<x>", "<y>"]);
        assert_eq!(pve.is_well_formed(&catalog, true), Ok(true));
        assert_eq!(pve.is_well_formed(&catalog, false), Ok(false));
        catalog.names.insert("Point".into());
        assert_eq!(pve.is_well_formed(&catalog, true), Ok(false));
        pve.identity_mut().assign_id(17).unwrap();
        assert_eq!(pve.is_well_formed(&catalog, false), Ok(false));
        catalog.ids.insert(17);
        assert_eq!(pve.is_well_formed(&catalog, false), Ok(true));
    }

    #[test]
    fn system_elements_are_frozen() {
        let catalog = FakeCatalog::new();
        let mut pve = point(&catalog, &[]);
        assert!(pve.set_system().is_err());
        pve.append_formal_arg(FormalArgument::untyped(catalog.db, "<x>").unwrap())
            .unwrap();
        pve.set_system().unwrap();
        assert!(pve.delete_formal_arg(0).is_err());
        assert!(pve.set_var_len(true).is_err());
        assert!(pve
            .append_formal_arg(FormalArgument::untyped(catalog.db, "<y>").unwrap())
            .is_err());
    }

    #[test]
    fn list_editing() {
        let catalog = FakeCatalog::new();
        let mut pve = point(&catalog, &["<a>", "<c>"]);
        pve.insert_formal_arg(FormalArgument::untyped(catalog.db, "<b>").unwrap(), 1)
            .unwrap();
        assert_eq!(pve.to_string(), "Point(<a>, <b>, <c>)");
        assert!(pve
            .insert_formal_arg(FormalArgument::untyped(catalog.db, "<z>").unwrap(), 9)
            .is_err());
        let int = FormalArgument::new(catalog.db, "<b>", FargKind::Int { range: None }).unwrap();
        let old = pve.replace_formal_arg(int, 1).unwrap();
        assert_eq!(old.farg_type(), FargType::Untyped);
        assert_eq!(pve.formal_arg(1).unwrap().farg_type(), FargType::Int);
        let clash = FormalArgument::untyped(catalog.db, "<a>").unwrap();
        assert!(pve.replace_formal_arg(clash, 2).is_err());
        assert_eq!(pve.delete_formal_arg(0).unwrap().name(), "<a>");
        assert_eq!(pve.num_formal_args(), 2);
        assert!(pve.formal_arg(2).is_err());
        let foreign = FormalArgument::untyped(DbId::next(), "<q>").unwrap();
        assert!(pve.append_formal_arg(foreign).is_err());
    }

    #[test]
    fn copy_preserves_signature() {
        let mut catalog = FakeCatalog::new();
        let mut pve = point(&catalog, &["<x>"]);
        pve.identity_mut().assign_id(3).unwrap();
        catalog.users.insert(8);
        pve.identity_mut().mark_modified_by(&catalog, 8).unwrap();
        let copy = pve.copy(&catalog).unwrap();
        assert_eq!(copy.identity(), pve.identity());
        assert_eq!(copy.to_db_string(), pve.to_db_string());
        catalog.users.remove(&8);
        assert!(matches!(pve.copy(&catalog), Err(VocabError::InvalidUser(8))));
    }
}
