//! Vocabclad – the vocabulary and identity layer of an in-memory annotation database.
//!
//! Coding schemas are described by *vocabulary elements*: named predicates
//! with an ordered list of typed *formal arguments*. This crate keeps those
//! schemas consistent while they are edited:
//! * Every stored element embeds a [`construct::Identity`] (id, last modifying
//!   user, owning database) handed out by the database's [`construct::IdGenerator`].
//! * A [`farg::FormalArgument`] decides which values it accepts, what its empty
//!   value is, and how much of a previously bound value survives a change of
//!   argument type (*salvage*).
//! * A [`vocab::PredicateVocabElement`] must be well formed before it may enter
//!   the vocabulary table.
//! * Insertions into and deletions from the vocabulary table and the column
//!   list are broadcast to observers registered in typed [`listener`] registries,
//!   bracketed by cascade notifications.
//!
//! ## Modules
//! * [`construct`] – Identifiers, the id generator and the identity of stored elements.
//! * [`datatype`] – Time stamps, predicate instances, candidate literals and data values.
//! * [`lexicon`] – Lexical legality of names, nominals and strings.
//! * [`catalog`] – The read-only query capability validation runs against.
//! * [`farg`] – Formal arguments: acceptance, empty values and salvage.
//! * [`vocab`] – Predicate vocabulary elements and their well-formedness.
//! * [`listener`] – Observer registries and the cascade bracket.
//! * [`table`] – The vocabulary table and the column list.
//! * [`database`] – The owning database tying it all together.
//! * [`config`] – Settings read from a file and the environment.
//!
//! ## Errors
//! Every fallible operation returns [`error::Result`]. A
//! [`error::VocabError::Logic`] error is something an author can correct (a
//! name collision, an element that is not well formed); every other variant
//! signals a bug elsewhere and should abort the enclosing operation, see
//! [`error::VocabError::is_invariant`].
//!
//! ## Quick Start
//! ```
//! use vocabclad::database::Database;
//! use vocabclad::farg::{FargKind, FormalArgument};
//!
//! let mut db = Database::new();
//! let mut point = db.new_predicate("Point").unwrap();
//! point.append_formal_arg(FormalArgument::untyped(db.id(), "<x>").unwrap()).unwrap();
//! point
//!     .append_formal_arg(FormalArgument::new(db.id(), "<y>", FargKind::Int { range: None }).unwrap())
//!     .unwrap();
//! let id = db.add_vocab_element(point).unwrap();
//! assert_eq!(db.vocab_element(id).unwrap().to_string(), "Point(<x>, <y>)");
//! ```

pub mod catalog;
pub mod config;
pub mod construct;
pub mod database;
pub mod datatype;
pub mod error;
pub mod farg;
pub mod lexicon;
pub mod listener;
pub mod table;
pub mod vocab;

pub use catalog::Catalog;
pub use database::Database;
pub use error::{Result, VocabError};
