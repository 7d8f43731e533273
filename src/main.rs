use std::rc::{Rc, Weak};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use vocabclad::config::Settings;
use vocabclad::construct::{DbId, ElementId};
use vocabclad::datatype::{DataValue, Value};
use vocabclad::farg::{FargKind, FormalArgument};
use vocabclad::listener::{CascadeObserver, ColumnListObserver, VocabListObserver};
use vocabclad::{Database, Result};

// Reports every event it is told about through the log.
struct LoggingObserver;

impl VocabListObserver for LoggingObserver {
    fn vl_insertion(&self, db: DbId, element_id: ElementId) {
        info!(%db, element_id, "vocab insertion");
    }
    fn vl_deletion(&self, db: DbId, element_id: ElementId) {
        info!(%db, element_id, "vocab deletion");
    }
}
impl ColumnListObserver for LoggingObserver {
    fn col_insertion(&self, db: DbId, column_id: ElementId, _old: &[ElementId], new: &[ElementId]) {
        info!(%db, column_id, order = ?new, "column insertion");
    }
    fn col_deletion(&self, db: DbId, column_id: ElementId, _old: &[ElementId], new: &[ElementId]) {
        info!(%db, column_id, order = ?new, "column deletion");
    }
    fn col_order_edited(&self, db: DbId, _old: &[ElementId], new: &[ElementId]) {
        info!(%db, order = ?new, "column order edited");
    }
}
impl CascadeObserver for LoggingObserver {
    fn begin_cascade(&self, db: DbId) {
        info!(%db, "cascade begins");
    }
    fn end_cascade(&self, db: DbId) {
        info!(%db, "cascade ends");
    }
}

fn run(settings: &Settings) -> Result<()> {
    let mut db = Database::with_settings(settings)?;
    let observer = Rc::new(LoggingObserver);
    let vocab_handle = Rc::downgrade(&observer) as Weak<dyn VocabListObserver>;
    let column_handle = Rc::downgrade(&observer) as Weak<dyn ColumnListObserver>;
    let cascade_handle = Rc::downgrade(&observer) as Weak<dyn CascadeObserver>;
    db.vocab_listeners_mut().register_external(&vocab_handle)?;
    db.column_listeners_mut().register_external(&column_handle)?;
    db.cascade_listeners_mut().register_external(&cascade_handle)?;

    db.begin_cascade();
    let trial = db.add_column("trial")?;
    let notes = db.add_column("notes")?;
    db.reorder_columns(&[notes, trial])?;
    db.end_cascade()?;

    let mut event = db.new_predicate("event")?;
    event.append_formal_arg(FormalArgument::untyped(db.id(), "<what>")?)?;
    event.append_formal_arg(FormalArgument::new(
        db.id(),
        "<count>",
        FargKind::Float { range: None },
    )?)?;
    let id = db.add_vocab_element(event)?;

    // Retype <count> from float to int and carry a bound value across.
    let (prior, mut edited) = match db.vocab_element(id) {
        Some(event) => {
            let count = event.formal_arg(1)?;
            (DataValue::new(count.id(), Value::Float(Some(4.75))), event.copy(&db)?)
        }
        None => return Ok(()),
    };
    edited.formal_arg_mut(1)?.set_kind(FargKind::Int { range: Some((0, 100)) })?;
    let salvaged = edited.formal_arg(1)?.salvage(&db, Some(&prior))?;
    info!(from = %prior, to = %salvaged, "value salvaged");
    db.replace_vocab_element(edited)?;

    for element in db.vocab_list().iter() {
        println!("{}", element.to_db_string());
    }
    for column in db.column_list().iter() {
        println!("column {} = {}", column.id(), column);
    }
    Ok(())
}

fn main() {
    let path = std::env::args().nth(1).unwrap_or_else(|| "vocabclad.toml".to_string());
    let settings = match Settings::load(&path) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Could not load settings from {}: {}", path, err);
            std::process::exit(1);
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .init();
    if let Err(err) = run(&settings) {
        error!(%err, invariant = err.is_invariant(), "demo aborted");
        std::process::exit(1);
    }
}
