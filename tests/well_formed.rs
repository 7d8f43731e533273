use vocabclad::farg::{FargKind, FormalArgument};
use vocabclad::vocab::PredicateVocabElement;
use vocabclad::{Database, VocabError};

fn point(db: &Database, fargs: &[&str]) -> PredicateVocabElement {
    let mut pve = db.new_predicate("Point").expect("legal name");
    for name in fargs {
        pve.append_formal_arg(FormalArgument::untyped(db.id(), name).unwrap())
            .expect("unique argument name");
    }
    pve
}

#[test]
fn zero_arguments_is_never_well_formed() {
    let mut db = Database::new();
    let pve = point(&db, &[]);
    assert_eq!(pve.is_well_formed(&db, true), Ok(false));
    let err = db.add_vocab_element(pve).unwrap_err();
    assert!(matches!(err, VocabError::Logic { .. }));
    assert!(!err.is_invariant());
    assert!(db.vocab_list().is_empty());
}

#[test]
fn duplicate_argument_names_are_refused_at_construction() {
    let db = Database::new();
    let mut pve = point(&db, &["<x>"]);
    let err = pve
        .append_formal_arg(FormalArgument::untyped(db.id(), "<x>").unwrap())
        .unwrap_err();
    assert!(err.is_invariant());
    assert_eq!(pve.num_formal_args(), 1);
    assert!(!pve.farg_name_is_unique("<x>"));
    assert!(pve.farg_name_is_unique("<y>"));
}

#[test]
fn text_string_argument_is_never_well_formed() {
    let mut db = Database::new();
    let mut pve = point(&db, &["<x>"]);
    pve.append_formal_arg(FormalArgument::text_string(db.id(), "<note>").unwrap())
        .unwrap();
    assert!(matches!(
        pve.is_well_formed(&db, true),
        Err(VocabError::Invariant(_))
    ));
    assert!(matches!(
        db.add_vocab_element(pve),
        Err(VocabError::Invariant(_))
    ));
}

#[test]
fn new_element_may_not_reuse_a_name() {
    let mut db = Database::new();
    db.add_vocab_element(point(&db, &["<x>", "<y>"])).expect("first Point");
    let again = point(&db, &["<z>"]);
    assert_eq!(again.is_well_formed(&db, true), Ok(false));
    assert!(matches!(
        db.add_vocab_element(again),
        Err(VocabError::Logic { .. })
    ));
    assert_eq!(db.vocab_list().len(), 1);
}

#[test]
fn replacement_must_target_a_live_entry() {
    let mut db = Database::new();
    let unregistered = point(&db, &["<x>"]);
    assert_eq!(unregistered.is_well_formed(&db, false), Ok(false));
    assert!(matches!(
        db.replace_vocab_element(unregistered),
        Err(VocabError::Logic { .. })
    ));

    let id = db.add_vocab_element(point(&db, &["<x>"])).unwrap();
    let live = db.vocab_element(id).unwrap().copy(&db).unwrap();
    assert_eq!(live.is_well_formed(&db, false), Ok(true));
    let removed = db.remove_vocab_element(id).unwrap();
    assert!(!removed.identity().is_assigned());
    assert_eq!(live.is_well_formed(&db, false), Ok(false));
}

#[test]
fn elements_of_other_databases_are_rejected() {
    let mut db = Database::new();
    let other = Database::new();
    let stranger = point(&other, &["<x>"]);
    assert!(matches!(
        stranger.is_well_formed(&db, true),
        Err(VocabError::Invariant(_))
    ));
    assert!(matches!(
        db.add_vocab_element(stranger),
        Err(VocabError::Invariant(_))
    ));
}

#[test]
fn accepted_signatures_have_unique_names() {
    let mut db = Database::new();
    let mut pve = db.new_predicate("Span").unwrap();
    for (name, kind) in [
        ("<onset>", FargKind::TimeStamp { range: None }),
        ("<offset>", FargKind::TimeStamp { range: None }),
        ("<label>", FargKind::Nominal { approved: None }),
    ] {
        pve.append_formal_arg(FormalArgument::new(db.id(), name, kind).unwrap())
            .unwrap();
    }
    let id = db.add_vocab_element(pve).expect("Span is well formed");
    let stored = db.vocab_element(id).unwrap();
    for (i, a) in stored.fargs().iter().enumerate() {
        for b in &stored.fargs()[i + 1..] {
            assert_ne!(a.name(), b.name());
        }
    }
}

#[test]
fn illegal_names_never_get_that_far() {
    let db = Database::new();
    assert!(matches!(
        db.new_predicate("two words"),
        Err(VocabError::Invariant(_))
    ));
    let mut unnamed = PredicateVocabElement::unnamed(db.id());
    unnamed
        .append_formal_arg(FormalArgument::untyped(db.id(), "<x>").unwrap())
        .unwrap();
    assert_eq!(unnamed.is_well_formed(&db, true), Ok(false));
}
