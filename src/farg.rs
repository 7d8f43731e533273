//! Formal arguments: the typed positions of a predicate signature.
//!
//! Every variant answers the same three questions. Which candidate values
//! may be bound here ([`FormalArgument::is_acceptable_value`]), what is the
//! empty value ([`FormalArgument::empty_value`]), and how much of a value
//! bound under a previous definition of this position survives a change of
//! type ([`FormalArgument::salvage`]). Salvage never fabricates a value of
//! an incompatible variant; when nothing can be reused the empty value is
//! produced instead.

use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;

use crate::catalog::{Catalog, ElementRef};
use crate::construct::{DbId, ElementId, INVALID_ID, Identity};
use crate::datatype::{DataValue, Literal, TimeStamp, Value};
use crate::error::{Result, VocabError};
use crate::lexicon;

pub const DEFAULT_FARG_NAME: &str = "<val>";

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum FargType {
    Untyped,
    Int,
    Float,
    Nominal,
    QuoteString,
    TextString,
    TimeStamp,
    Predicate,
}

/// Variant tag plus the variant-specific constraints.
#[derive(Clone, Debug, PartialEq)]
pub enum FargKind {
    Untyped,
    Int { range: Option<(i64, i64)> },
    Float { range: Option<(f64, f64)> },
    /// With an approved set, only its members are acceptable.
    Nominal { approved: Option<BTreeSet<String>> },
    QuoteString,
    /// `sub_range` is carried but not consulted.
    TextString { sub_range: bool },
    TimeStamp { range: Option<(TimeStamp, TimeStamp)> },
    /// With an approved set, only instances of the listed predicates are acceptable.
    Predicate { approved: Option<BTreeSet<ElementId>> },
}

impl FargKind {
    pub fn farg_type(&self) -> FargType {
        match self {
            FargKind::Untyped => FargType::Untyped,
            FargKind::Int { .. } => FargType::Int,
            FargKind::Float { .. } => FargType::Float,
            FargKind::Nominal { .. } => FargType::Nominal,
            FargKind::QuoteString => FargType::QuoteString,
            FargKind::TextString { .. } => FargType::TextString,
            FargKind::TimeStamp { .. } => FargType::TimeStamp,
            FargKind::Predicate { .. } => FargType::Predicate,
        }
    }
    fn check(&self) -> Result<()> {
        match self {
            FargKind::Int { range: Some((min, max)) } if min > max => Err(VocabError::invariant(
                format!("int range {}..={} is inverted", min, max),
            )),
            FargKind::Float { range: Some((min, max)) } if !(min <= max) => Err(
                VocabError::invariant(format!("float range {}..={} is not ordered", min, max)),
            ),
            FargKind::TimeStamp { range: Some((min, max)) } => {
                if !min.is_legal() || !max.is_legal() {
                    Err(VocabError::invariant("time stamp range bound is not legal"))
                } else if min.tps() != max.tps() {
                    Err(VocabError::invariant("time stamp range bounds disagree on tps"))
                } else if min.ticks() > max.ticks() {
                    Err(VocabError::invariant("time stamp range is inverted"))
                } else {
                    Ok(())
                }
            }
            FargKind::Nominal { approved: Some(set) } => {
                match set.iter().find(|n| !lexicon::is_legal_nominal(n)) {
                    Some(bad) => Err(VocabError::invariant(format!(
                        "approved value {:?} is not a nominal",
                        bad
                    ))),
                    None => Ok(()),
                }
            }
            FargKind::Predicate { approved: Some(set) } if set.contains(&INVALID_ID) => Err(
                VocabError::invariant("approved predicate set holds the unassigned id"),
            ),
            _ => Ok(()),
        }
    }
}

// ------------- FormalArgument -------------
#[derive(Debug)]
pub struct FormalArgument {
    identity: Identity,
    name: String,
    hidden: bool,
    vocab_element: ElementId,
    kind: FargKind,
}

impl FormalArgument {
    pub fn new(db: DbId, name: &str, kind: FargKind) -> Result<Self> {
        if !lexicon::is_legal_farg_name(name) {
            return Err(VocabError::invariant(format!("invalid formal argument name {:?}", name)));
        }
        kind.check()?;
        Ok(Self {
            identity: Identity::new(db),
            name: name.to_owned(),
            hidden: false,
            vocab_element: INVALID_ID,
            kind,
        })
    }
    /// An argument named [`DEFAULT_FARG_NAME`], to be renamed once the
    /// author settles on a name.
    pub fn with_default_name(db: DbId, kind: FargKind) -> Result<Self> {
        Self::new(db, DEFAULT_FARG_NAME, kind)
    }
    pub fn untyped(db: DbId, name: &str) -> Result<Self> {
        Self::new(db, name, FargKind::Untyped)
    }
    pub fn text_string(db: DbId, name: &str) -> Result<Self> {
        Self::new(db, name, FargKind::TextString { sub_range: false })
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
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        if !lexicon::is_legal_farg_name(name) {
            return Err(VocabError::invariant(format!("invalid formal argument name {:?}", name)));
        }
        self.name = name.to_owned();
        Ok(())
    }
    pub fn hidden(&self) -> bool {
        self.hidden
    }
    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }
    pub fn vocab_element(&self) -> ElementId {
        self.vocab_element
    }
    pub(crate) fn set_vocab_element(&mut self, id: ElementId) {
        self.vocab_element = id;
    }
    pub fn kind(&self) -> &FargKind {
        &self.kind
    }
    pub fn farg_type(&self) -> FargType {
        self.kind.farg_type()
    }
    /// Redefines the constraints, and possibly the variant, of this position.
    /// Values bound under the old definition are carried over with [`Self::salvage`].
    pub fn set_kind(&mut self, kind: FargKind) -> Result<()> {
        kind.check()?;
        debug!(id = self.id(), from = ?self.farg_type(), to = ?kind.farg_type(), "formal argument redefined");
        self.kind = kind;
        Ok(())
    }
    /// Deep, value-preserving copy. Fails if the modification stamp no
    /// longer resolves to a valid user.
    pub fn copy(&self, catalog: &dyn Catalog) -> Result<FormalArgument> {
        Ok(FormalArgument {
            identity: self.identity.copy(catalog)?,
            name: self.name.clone(),
            hidden: self.hidden,
            vocab_element: self.vocab_element,
            kind: self.kind.clone(),
        })
    }

    // ------------- approved sets -------------
    fn nominal_set(&self) -> Result<&BTreeSet<String>> {
        match &self.kind {
            FargKind::Nominal { approved: Some(set) } => Ok(set),
            _ => Err(VocabError::InvalidState(format!("{} has no nominal sub-range", self.name))),
        }
    }
    fn nominal_set_mut(&mut self) -> Result<&mut BTreeSet<String>> {
        match &mut self.kind {
            FargKind::Nominal { approved: Some(set) } => Ok(set),
            _ => Err(VocabError::InvalidState(format!("{} has no nominal sub-range", self.name))),
        }
    }
    fn predicate_set(&self) -> Result<&BTreeSet<ElementId>> {
        match &self.kind {
            FargKind::Predicate { approved: Some(set) } => Ok(set),
            _ => Err(VocabError::InvalidState(format!("{} has no predicate sub-range", self.name))),
        }
    }
    fn predicate_set_mut(&mut self) -> Result<&mut BTreeSet<ElementId>> {
        match &mut self.kind {
            FargKind::Predicate { approved: Some(set) } => Ok(set),
            _ => Err(VocabError::InvalidState(format!("{} has no predicate sub-range", self.name))),
        }
    }
    pub fn add_approved_nominal(&mut self, value: &str) -> Result<()> {
        if !lexicon::is_legal_nominal(value) {
            return Err(VocabError::invariant(format!("{:?} is not a nominal", value)));
        }
        if !self.nominal_set_mut()?.insert(value.to_owned()) {
            return Err(VocabError::invariant(format!("{:?} already approved", value)));
        }
        Ok(())
    }
    pub fn remove_approved_nominal(&mut self, value: &str) -> Result<()> {
        if !self.nominal_set_mut()?.remove(value) {
            return Err(VocabError::invariant(format!("{:?} not approved", value)));
        }
        Ok(())
    }
    pub fn approves_nominal(&self, value: &str) -> Result<bool> {
        Ok(self.nominal_set()?.contains(value))
    }
    pub fn add_approved_predicate(&mut self, pve_id: ElementId) -> Result<()> {
        if pve_id == INVALID_ID {
            return Err(VocabError::InvalidIdentifier("cannot approve the unassigned id".into()));
        }
        if !self.predicate_set_mut()?.insert(pve_id) {
            return Err(VocabError::invariant(format!("predicate {} already approved", pve_id)));
        }
        Ok(())
    }
    pub fn remove_approved_predicate(&mut self, pve_id: ElementId) -> Result<()> {
        if !self.predicate_set_mut()?.remove(&pve_id) {
            return Err(VocabError::invariant(format!("predicate {} not approved", pve_id)));
        }
        Ok(())
    }
    pub fn approves_predicate(&self, pve_id: ElementId) -> Result<bool> {
        Ok(self.predicate_set()?.contains(&pve_id))
    }

    // ------------- acceptance -------------
    pub fn is_acceptable_value(&self, catalog: &dyn Catalog, candidate: &Literal) -> Result<bool> {
        let acceptable = match (&self.kind, candidate) {
            (FargKind::Untyped, Literal::Int(_) | Literal::Float(_)) => true,
            (FargKind::Untyped, Literal::Str(s)) => {
                catalog.is_legal_nominal(s) || catalog.is_legal_quote_string(s)
            }
            (FargKind::Untyped, Literal::TimeStamp(ts)) => {
                catalog.is_legal_time_stamp(ts) && ts.tps() == catalog.tick_rate()
            }
            (FargKind::Untyped, Literal::Predicate(pred)) => {
                if pred.db() != catalog.db_id() {
                    return Ok(false);
                }
                if !pred.is_empty() {
                    match catalog.resolve(pred.pve_id()) {
                        Some(ElementRef::Predicate(_)) => (),
                        Some(other) => {
                            return Err(VocabError::invariant(format!(
                                "pve id {} refers to a non-predicate element {}",
                                pred.pve_id(),
                                other.id()
                            )));
                        }
                        None => {
                            return Err(VocabError::invariant(format!(
                                "pve id {} has no referent",
                                pred.pve_id()
                            )));
                        }
                    }
                }
                true
            }
            (FargKind::Int { range }, Literal::Int(v)) => {
                range.is_none_or(|(min, max)| (min..=max).contains(v))
            }
            (FargKind::Float { range }, Literal::Float(v)) => {
                range.is_none_or(|(min, max)| min <= *v && *v <= max)
            }
            (FargKind::Nominal { approved }, Literal::Str(s)) => {
                catalog.is_legal_nominal(s) && approved.as_ref().is_none_or(|set| set.contains(s))
            }
            (FargKind::QuoteString, Literal::Str(s)) => catalog.is_legal_quote_string(s),
            (FargKind::TextString { .. }, Literal::Str(s)) => catalog.is_legal_text_string(s),
            (FargKind::TimeStamp { range }, Literal::TimeStamp(ts)) => {
                if !catalog.is_legal_time_stamp(ts) {
                    return Ok(false);
                }
                match range {
                    None => true,
                    Some((min, _)) if min.tps() != ts.tps() => {
                        return Err(VocabError::invariant(format!(
                            "tps mismatch: {} against range at {}",
                            ts.tps(),
                            min.tps()
                        )));
                    }
                    Some((min, max)) => min.ticks() <= ts.ticks() && ts.ticks() <= max.ticks(),
                }
            }
            (FargKind::Predicate { approved }, Literal::Predicate(pred)) => {
                pred.db() == catalog.db_id()
                    && approved
                        .as_ref()
                        .is_none_or(|set| !pred.is_empty() && set.contains(&pred.pve_id()))
            }
            _ => false,
        };
        Ok(acceptable)
    }

    // ------------- construction of values -------------
    pub fn empty_value(&self) -> DataValue {
        let value = match &self.kind {
            FargKind::Untyped => Value::Undefined(self.name.clone()),
            FargKind::Int { .. } => Value::Int(None),
            FargKind::Float { .. } => Value::Float(None),
            FargKind::Nominal { .. } => Value::Nominal(None),
            FargKind::QuoteString => Value::QuoteString(None),
            FargKind::TextString { .. } => Value::TextString(None),
            FargKind::TimeStamp { .. } => Value::TimeStamp(None),
            FargKind::Predicate { .. } => Value::Predicate(None),
        };
        DataValue::new(self.id(), value)
    }

    /// Builds a value for this position, reusing as much of `prior` as this
    /// variant can hold.
    pub fn salvage(&self, catalog: &dyn Catalog, prior: Option<&DataValue>) -> Result<DataValue> {
        let prior = match prior {
            Some(prior) if prior.farg_id() != INVALID_ID => prior.value(),
            _ => return Ok(self.empty_value()),
        };
        let value = match &self.kind {
            FargKind::Untyped => match prior {
                Value::Predicate(_)
                | Value::Float(_)
                | Value::Int(_)
                | Value::Nominal(_)
                | Value::TimeStamp(_)
                | Value::QuoteString(_) => Some(prior.clone()),
                Value::TextString(Some(s)) if catalog.is_legal_quote_string(s) => {
                    Some(Value::QuoteString(Some(s.clone())))
                }
                Value::TextString(_) | Value::Undefined(_) => None,
                Value::QueryVariable(_) => {
                    return Err(VocabError::UnknownValueVariant(format!(
                        "cannot salvage a {} into untyped argument {}",
                        prior.kind(),
                        self.name
                    )));
                }
            },
            FargKind::Int { .. } => match prior {
                Value::Int(v) => Some(Value::Int(*v)),
                Value::Float(v) => Some(Value::Int(v.map(|f| f as i64))),
                _ => None,
            },
            FargKind::Float { .. } => match prior {
                Value::Float(v) => Some(Value::Float(*v)),
                Value::Int(v) => Some(Value::Float(v.map(|i| i as f64))),
                _ => None,
            },
            FargKind::Nominal { .. } => match prior {
                Value::Nominal(v) => Some(Value::Nominal(v.clone())),
                Value::QuoteString(Some(s)) | Value::TextString(Some(s))
                    if catalog.is_legal_nominal(s) =>
                {
                    Some(Value::Nominal(Some(s.clone())))
                }
                _ => None,
            },
            FargKind::QuoteString => match prior {
                Value::QuoteString(v) | Value::Nominal(v) => Some(Value::QuoteString(v.clone())),
                Value::TextString(Some(s)) if catalog.is_legal_quote_string(s) => {
                    Some(Value::QuoteString(Some(s.clone())))
                }
                _ => None,
            },
            // Only quoted strings and nominals are eligible here.
            FargKind::TextString { .. } => match prior {
                Value::QuoteString(Some(s)) | Value::Nominal(Some(s))
                    if catalog.is_legal_text_string(s) =>
                {
                    Some(Value::TextString(Some(s.clone())))
                }
                _ => None,
            },
            FargKind::TimeStamp { .. } => match prior {
                Value::Int(Some(ticks)) => {
                    let ts = TimeStamp::new(catalog.tick_rate(), *ticks);
                    catalog.is_legal_time_stamp(&ts).then_some(Value::TimeStamp(Some(ts)))
                }
                Value::TimeStamp(Some(ts)) if catalog.is_legal_time_stamp(ts) => {
                    Some(Value::TimeStamp(Some(*ts)))
                }
                _ => None,
            },
            FargKind::Predicate { .. } => match prior {
                Value::Predicate(v) => Some(Value::Predicate(v.clone())),
                _ => None,
            },
        };
        match value {
            Some(value) => Ok(DataValue::new(self.id(), value)),
            None => {
                debug!(farg = self.id(), from = prior.kind(), to = ?self.farg_type(), "salvage fell back to empty value");
                Ok(self.empty_value())
            }
        }
    }

    // ------------- change detection -------------
    fn same_owner(a: &FormalArgument, b: &FormalArgument) -> Result<()> {
        if a.vocab_element != b.vocab_element {
            return Err(VocabError::invariant(format!(
                "vocab element mismatch: {} vs {}",
                a.vocab_element, b.vocab_element
            )));
        }
        Ok(())
    }
    pub fn name_changed(a: &FormalArgument, b: &FormalArgument) -> Result<bool> {
        Self::same_owner(a, b)?;
        if a.farg_type() != b.farg_type() {
            return Err(VocabError::invariant("formal argument type mismatch"));
        }
        Ok(a.name != b.name)
    }
    pub fn range_changed(a: &FormalArgument, b: &FormalArgument) -> Result<bool> {
        Self::same_owner(a, b)?;
        let changed = match (&a.kind, &b.kind) {
            (FargKind::Int { range: ra }, FargKind::Int { range: rb }) => ra != rb,
            (FargKind::Float { range: ra }, FargKind::Float { range: rb }) => ra != rb,
            (FargKind::TimeStamp { range: ra }, FargKind::TimeStamp { range: rb }) => ra != rb,
            (FargKind::Nominal { approved: sa }, FargKind::Nominal { approved: sb }) => sa != sb,
            (FargKind::Predicate { approved: sa }, FargKind::Predicate { approved: sb }) => {
                sa != sb
            }
            (FargKind::Untyped, FargKind::Untyped)
            | (FargKind::QuoteString, FargKind::QuoteString)
            | (FargKind::TextString { .. }, FargKind::TextString { .. }) => false,
            _ => return Err(VocabError::invariant("formal argument type mismatch")),
        };
        Ok(changed)
    }

    pub fn to_db_string(&self) -> String {
        let id = self.id();
        let name = &self.name;
        match &self.kind {
            FargKind::Untyped => format!("(UnTypedFormalArg {} {})", id, name),
            FargKind::Int { range } => match range {
                Some((min, max)) => format!("(IntFormalArg {} {} true {} {})", id, name, min, max),
                None => format!("(IntFormalArg {} {} false {} {})", id, name, i64::MIN, i64::MAX),
            },
            FargKind::Float { range } => match range {
                Some((min, max)) => {
                    format!("(FloatFormalArg {} {} true {:.6} {:.6})", id, name, min, max)
                }
                None => format!("(FloatFormalArg {} {} false null null)", id, name),
            },
            FargKind::Nominal { approved } => {
                format!("(NominalFormalArg {} {} {})", id, name, approved_to_string(approved))
            }
            FargKind::QuoteString => format!("(QuoteStringFormalArg {} {})", id, name),
            FargKind::TextString { .. } => format!("(TextStringFormalArg {} {})", id, name),
            FargKind::TimeStamp { range } => match range {
                Some((min, max)) => {
                    format!("(TimeStampFormalArg {} {} true {} {})", id, name, min, max)
                }
                None => format!("(TimeStampFormalArg {} {} false null null)", id, name),
            },
            FargKind::Predicate { approved } => {
                format!("(PredFormalArg {} {} {})", id, name, approved_to_string(approved))
            }
        }
    }
}

fn approved_to_string<T: fmt::Display>(approved: &Option<BTreeSet<T>>) -> String {
    match approved {
        None => "false ()".to_string(),
        Some(set) => {
            let items: Vec<String> = set.iter().map(|i| i.to_string()).collect();
            format!("true ({})", items.join(", "))
        }
    }
}

impl fmt::Display for FormalArgument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::FakeCatalog;
    use crate::datatype::PredicateInstance;

    fn assigned(catalog: &FakeCatalog, name: &str, kind: FargKind, id: ElementId) -> FormalArgument {
        let mut farg = FormalArgument::new(catalog.db, name, kind).unwrap();
        farg.identity_mut().assign_id(id).unwrap();
        farg
    }

    #[test]
    fn rejects_inverted_ranges() {
        let db = DbId::next();
        assert!(FormalArgument::new(db, "<n>", FargKind::Int { range: Some((5, 1)) }).is_err());
        assert!(
            FormalArgument::new(db, "<f>", FargKind::Float { range: Some((f64::NAN, 1.0)) })
                .is_err()
        );
        let range = Some((TimeStamp::new(60, 10), TimeStamp::new(30, 20)));
        assert!(FormalArgument::new(db, "<t>", FargKind::TimeStamp { range }).is_err());
        assert!(FormalArgument::new(db, "x", FargKind::Untyped).is_err());
    }

    #[test]
    fn approved_nominals() {
        let catalog = FakeCatalog::new();
        let mut farg = assigned(&catalog, "<colour>", FargKind::Nominal { approved: None }, 3);
        assert!(matches!(
            farg.add_approved_nominal("red"),
            Err(VocabError::InvalidState(_))
        ));
        farg.set_kind(FargKind::Nominal { approved: Some(BTreeSet::new()) }).unwrap();
        farg.add_approved_nominal("red").unwrap();
        assert!(farg.add_approved_nominal("red").is_err());
        assert!(farg.add_approved_nominal(" red").is_err());
        assert!(farg.approves_nominal("red").unwrap());
        assert!(farg.is_acceptable_value(&catalog, &"red".into()).unwrap());
        assert!(!farg.is_acceptable_value(&catalog, &"blue".into()).unwrap());
        farg.remove_approved_nominal("red").unwrap();
        assert!(farg.remove_approved_nominal("red").is_err());
    }

    #[test]
    fn approved_predicates() {
        let catalog = FakeCatalog::new();
        let mut farg = assigned(
            &catalog,
            "<p>",
            FargKind::Predicate { approved: Some(BTreeSet::new()) },
            4,
        );
        farg.add_approved_predicate(12).unwrap();
        assert!(farg.add_approved_predicate(INVALID_ID).is_err());
        let approved = instance_of(&catalog, 12);
        let other = instance_of(&catalog, 13);
        assert!(farg.is_acceptable_value(&catalog, &approved).unwrap());
        assert!(!farg.is_acceptable_value(&catalog, &other).unwrap());
        let foreign = Literal::Predicate(PredicateInstance::empty(DbId::next()));
        assert!(!farg.is_acceptable_value(&catalog, &foreign).unwrap());
    }

    fn instance_of(catalog: &FakeCatalog, pve_id: ElementId) -> Literal {
        Literal::Predicate(PredicateInstance::new(catalog.db, pve_id, vec![]))
    }

    #[test]
    fn time_stamp_range() {
        let catalog = FakeCatalog::new();
        let range = Some((TimeStamp::new(60, 0), TimeStamp::new(60, 600)));
        let farg = assigned(&catalog, "<onset>", FargKind::TimeStamp { range }, 5);
        assert!(farg.is_acceptable_value(&catalog, &TimeStamp::new(60, 300).into()).unwrap());
        assert!(!farg.is_acceptable_value(&catalog, &TimeStamp::new(60, 601).into()).unwrap());
        assert!(!farg.is_acceptable_value(&catalog, &TimeStamp::new(60, -1).into()).unwrap());
        assert!(matches!(
            farg.is_acceptable_value(&catalog, &TimeStamp::new(30, 5).into()),
            Err(VocabError::Invariant(_))
        ));
    }

    #[test]
    fn change_detection() {
        let catalog = FakeCatalog::new();
        let a = assigned(&catalog, "<n>", FargKind::Int { range: None }, 6);
        let mut b = a.copy(&catalog).unwrap();
        assert!(!FormalArgument::name_changed(&a, &b).unwrap());
        assert!(!FormalArgument::range_changed(&a, &b).unwrap());
        b.set_name("<m>").unwrap();
        b.set_kind(FargKind::Int { range: Some((0, 9)) }).unwrap();
        assert!(FormalArgument::name_changed(&a, &b).unwrap());
        assert!(FormalArgument::range_changed(&a, &b).unwrap());
        b.set_kind(FargKind::QuoteString).unwrap();
        assert!(FormalArgument::range_changed(&a, &b).is_err());
        b.set_vocab_element(99);
        assert!(FormalArgument::name_changed(&a, &b).is_err());
    }

    #[test]
    fn db_strings() {
        let catalog = FakeCatalog::new();
        let farg = assigned(&catalog, "<n>", FargKind::Int { range: Some((1, 3)) }, 7);
        assert_eq!(farg.to_db_string(), "(IntFormalArg 7 <n> true 1 3)");
        let farg = assigned(&catalog, "<x>", FargKind::Untyped, 8);
        assert_eq!(farg.to_db_string(), "(UnTypedFormalArg 8 <x>)");
        let mut farg = assigned(
            &catalog,
            "<c>",
            FargKind::Nominal { approved: Some(BTreeSet::new()) },
            9,
        );
        farg.add_approved_nominal("b").unwrap();
        farg.add_approved_nominal("a").unwrap();
        assert_eq!(farg.to_db_string(), "(NominalFormalArg 9 <c> true (a, b))");
    }
}
