//! Attaching the decorator to model classes.
//!
//! Attachment builds one [`Sausage`] per class: a registry of column
//! accessors, generated from the class's column list, plus memoized `*` and
//! `none` nodes. Accessors whose name would shadow an existing class method
//! are registered as `<column>_column` instead.

use super::ModelClass;
use crate::engine::{self, Dialect};
use crate::error::SausageError;
use crate::executor::{LifeExecutor, Record};
use crate::expr::SausageExpr;
use crate::relation::Relation;
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use sea_query::Expr;
use std::sync::{Arc, Once};

#[cfg(feature = "tracing")]
use crate::logging::tracing_helpers;

static GLOBAL_ATTACH_NOTICE: Once = Once::new();

/// Suffix given to accessors that would shadow an existing class method
pub const COLLISION_SUFFIX: &str = "_column";

/// Attach the decorator to one mapped model class.
///
/// Attaching to the base type itself is allowed but patches every model at
/// once; it logs a one-time warning. Use [`attach_global`] to do that on
/// purpose.
///
/// # Errors
///
/// Returns [`SausageError::Attachment`] if `class` is not the base model type
/// or one of its descendants.
pub fn attach(class: &Arc<ModelClass>) -> Result<(), SausageError> {
    #[cfg(feature = "tracing")]
    let _span = tracing_helpers::attach_span(class.name()).entered();

    if !class.is_model() {
        return Err(SausageError::Attachment(format!(
            "the sausage decorator must be attached to a subclass of {}; `{}` is not one",
            super::BASE_CLASS_NAME,
            class.name()
        )));
    }

    if class.is_base() {
        GLOBAL_ATTACH_NOTICE.call_once(|| {
            log::warn!(
                "Monkey-patching {} with the sausage decorator: every model is now decorated",
                class.name()
            );
        });
        class.mark_attached();
        return Ok(());
    }

    class.mark_attached();
    // Accessors are generated against the columns known right now
    class.sausage().map(|_| ())
}

/// Attach the decorator to the base model type, decorating every model.
pub fn attach_global() {
    let base = ModelClass::base();
    if !base.is_attached() {
        log::info!("sausage decorator attached to {}", base.name());
    }
    base.mark_attached();
}

struct ColumnAccessor {
    column: String,
    node: OnceCell<Arc<SausageExpr>>,
}

/// The decorated surface of one model class
pub struct Sausage {
    class_name: String,
    table: String,
    dialect: Option<Dialect>,
    accessors: IndexMap<String, ColumnAccessor>,
    star: OnceCell<Arc<SausageExpr>>,
    none: OnceCell<Arc<Relation>>,
}

impl Sausage {
    pub(super) fn build(class: &ModelClass) -> Result<Self, SausageError> {
        let table = class.table_name().ok_or_else(|| {
            SausageError::Attachment(format!("`{}` is not mapped to a table", class.name()))
        })?;

        let mut accessors: IndexMap<String, ColumnAccessor> =
            IndexMap::with_capacity(class.column_names().len());
        for column in class.column_names() {
            // Accessors registered earlier in this loop count as defined methods
            let taken = |name: &str| class.responds_to(name) || accessors.contains_key(name);
            let mut accessor = column.clone();
            while taken(&accessor) {
                accessor.push_str(COLLISION_SUFFIX);
            }
            if accessor != *column {
                log::debug!(
                    "{}.{column} already defined; column accessor registered as {accessor}",
                    class.name()
                );
            }
            accessors.insert(
                accessor,
                ColumnAccessor {
                    column: column.clone(),
                    node: OnceCell::new(),
                },
            );
        }

        Ok(Self {
            class_name: class.name().to_string(),
            table: table.to_string(),
            dialect: class.dialect(),
            accessors,
            star: OnceCell::new(),
            none: OnceCell::new(),
        })
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Dialect used by the rendering helpers: the class's own, else the engine's
    ///
    /// # Errors
    ///
    /// [`SausageError::NotConfigured`] when neither is set.
    pub fn dialect(&self) -> Result<Dialect, SausageError> {
        match self.dialect {
            Some(d) => Ok(d),
            None => engine::current(),
        }
    }

    /// Registered accessor names, in column order
    pub fn accessor_names(&self) -> impl Iterator<Item = &str> {
        self.accessors.keys().map(String::as_str)
    }

    /// The memoized node for a column accessor.
    ///
    /// Repeated calls return the same `Arc`.
    ///
    /// # Errors
    ///
    /// [`SausageError::UnknownAccessor`] when `accessor` was never registered.
    pub fn column(&self, accessor: &str) -> Result<Arc<SausageExpr>, SausageError> {
        let entry = self
            .accessors
            .get(accessor)
            .ok_or_else(|| SausageError::UnknownAccessor(format!("{}.{accessor}", self.class_name)))?;
        let node = entry
            .node
            .get_or_init(|| Arc::new(SausageExpr::table_column(&self.table, &entry.column)));
        Ok(Arc::clone(node))
    }

    /// An owned copy of a column accessor's node, ready for chaining
    pub fn col(&self, accessor: &str) -> Result<SausageExpr, SausageError> {
        self.column(accessor).map(|node| SausageExpr::clone(&node))
    }

    /// Memoized `"<table>".*`
    pub fn star(&self) -> Arc<SausageExpr> {
        let node = self
            .star
            .get_or_init(|| Arc::new(SausageExpr::table_star(&self.table)));
        Arc::clone(node)
    }

    /// Memoized relation that matches no rows
    pub fn none(&self) -> Arc<Relation> {
        let rel = self
            .none
            .get_or_init(|| Arc::new(Relation::empty(&self.table).with_dialect(self.dialect)));
        Arc::clone(rel)
    }

    /// A fresh `SELECT "<table>".* FROM "<table>"`
    pub fn relation(&self) -> Relation {
        Relation::new(&self.table).with_dialect(self.dialect)
    }

    /// First row matching `criteria`, or `None`
    pub fn find_by<E, X>(&self, executor: &X, criteria: E) -> Result<Option<Record>, SausageError>
    where
        E: Into<Expr>,
        X: LifeExecutor + ?Sized,
    {
        self.relation().filter(criteria).first(executor)
    }

    /// First row matching `criteria`.
    ///
    /// # Errors
    ///
    /// [`SausageError::NotFound`] when nothing matches.
    pub fn find_by_or_fail<E, X>(&self, executor: &X, criteria: E) -> Result<Record, SausageError>
    where
        E: Into<Expr>,
        X: LifeExecutor + ?Sized,
    {
        self.find_by(executor, criteria)?
            .ok_or_else(|| SausageError::NotFound(self.class_name.clone()))
    }
}
