//! Model classes and the model decorator.
//!
//! [`ModelClass`] is the host ORM's view of a mapped table: a named class with
//! an optional parent, a table name, an ordered column list and the set of
//! class-level methods it already defines. Classes whose parent chain reaches
//! [`ModelClass::base`] are mapped models; anything else is a plain class.
//!
//! The decorator itself lives in [`decorator`]: [`attach`] installs it on one
//! model, [`attach_global`] on the base (and therefore on every model), and
//! [`ModelClass::sausage`] hands out the decorated surface.
//!
//! # Examples
//!
//! ```
//! use awesome_sausage::{attach, Dialect, ModelClass};
//!
//! let users = ModelClass::subclass(&ModelClass::base(), "User")
//!     .table("users")
//!     .columns(["id", "name", "age"])
//!     .dialect(Dialect::Postgres)
//!     .build();
//!
//! attach(&users).unwrap();
//! let model = users.sausage().unwrap();
//!
//! // `name` is already a class method on the base, so its accessor is renamed
//! let adults = model.col("age").unwrap().gteq(18);
//! assert!(model.column("name").is_err());
//! assert_eq!(model.column("name_column").unwrap().name(), Some("name"));
//! assert_eq!(adults.to_sql_with(Dialect::Postgres), r#""users"."age" >= 18"#);
//! ```

pub mod decorator;
mod helpers;

pub use decorator::{attach, attach_global, Sausage};

use crate::engine::Dialect;
use crate::error::SausageError;
use once_cell::sync::{Lazy, OnceCell};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Name of the universal base model class
pub const BASE_CLASS_NAME: &str = "Base";

/// Class-level methods every mapped model inherits from the base
const BASE_METHODS: &[&str] = &[
    "all", "columns", "count", "find", "first", "name", "table_name", "where",
];

static BASE: Lazy<Arc<ModelClass>> = Lazy::new(|| {
    Arc::new(ModelClass {
        name: BASE_CLASS_NAME.to_string(),
        parent: None,
        table: None,
        columns: Vec::new(),
        methods: BASE_METHODS.iter().map(|m| m.to_string()).collect(),
        dialect: None,
        is_base: true,
        attached: AtomicBool::new(false),
        extension: OnceCell::new(),
    })
});

/// A class known to the host ORM
pub struct ModelClass {
    name: String,
    parent: Option<Arc<ModelClass>>,
    table: Option<String>,
    columns: Vec<String>,
    methods: BTreeSet<String>,
    dialect: Option<Dialect>,
    is_base: bool,
    attached: AtomicBool,
    extension: OnceCell<Arc<Sausage>>,
}

impl ModelClass {
    /// The universal base model type
    pub fn base() -> Arc<ModelClass> {
        Arc::clone(&BASE)
    }

    /// Start a class deriving from `parent`
    pub fn subclass(parent: &Arc<ModelClass>, name: &str) -> ModelClassBuilder {
        ModelClassBuilder {
            name: name.to_string(),
            parent: Some(Arc::clone(parent)),
            table: None,
            columns: None,
            methods: BTreeSet::new(),
            dialect: None,
        }
    }

    /// Start a class outside any hierarchy
    pub fn plain(name: &str) -> ModelClassBuilder {
        ModelClassBuilder {
            name: name.to_string(),
            parent: None,
            table: None,
            columns: None,
            methods: BTreeSet::new(),
            dialect: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Arc<ModelClass>> {
        self.parent.as_ref()
    }

    /// Table backing this class; `None` for the base and for plain classes
    pub fn table_name(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Columns known to the schema, in declaration order
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Dialect pinned on this class or its nearest ancestor
    pub fn dialect(&self) -> Option<Dialect> {
        self.dialect
            .or_else(|| self.parent.as_ref().and_then(|p| p.dialect()))
    }

    pub fn is_base(&self) -> bool {
        self.is_base
    }

    /// Whether this class is the base or descends from it
    pub fn is_model(&self) -> bool {
        self.ancestors().any(|c| c.is_base)
    }

    /// Whether this class or any ancestor defines a class method called `method`
    pub fn responds_to(&self, method: &str) -> bool {
        self.ancestors().any(|c| c.methods.contains(method))
    }

    /// This class followed by its parents, nearest first
    pub fn ancestors(&self) -> impl Iterator<Item = &ModelClass> {
        std::iter::successors(Some(self), |c| c.parent.as_deref())
    }

    /// The decorated surface of this class.
    ///
    /// Available once the decorator was attached to this class or to any
    /// ancestor (including the base through [`attach_global`]).
    ///
    /// # Errors
    ///
    /// Returns [`SausageError::Attachment`] when nothing in the hierarchy is
    /// decorated, or when called on the base itself, which has no table.
    pub fn sausage(&self) -> Result<Arc<Sausage>, SausageError> {
        if let Some(ext) = self.extension.get() {
            return Ok(Arc::clone(ext));
        }
        if self.is_base {
            return Err(SausageError::Attachment(format!(
                "`{}` is abstract; decorate and use a subclass",
                self.name
            )));
        }
        if !self.ancestors().any(|c| c.attached.load(Ordering::Acquire)) {
            return Err(SausageError::Attachment(format!(
                "`{}` has no sausage attached",
                self.name
            )));
        }
        self.extension
            .get_or_try_init(|| Sausage::build(self).map(Arc::new))
            .map(Arc::clone)
    }

    pub(crate) fn mark_attached(&self) {
        self.attached.store(true, Ordering::Release);
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }
}

impl fmt::Debug for ModelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelClass")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.name()))
            .field("table", &self.table)
            .field("columns", &self.columns)
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// Builder returned by [`ModelClass::subclass`] and [`ModelClass::plain`]
#[derive(Debug)]
pub struct ModelClassBuilder {
    name: String,
    parent: Option<Arc<ModelClass>>,
    table: Option<String>,
    columns: Option<Vec<String>>,
    methods: BTreeSet<String>,
    dialect: Option<Dialect>,
}

impl ModelClassBuilder {
    pub fn table(mut self, table: &str) -> Self {
        self.table = Some(table.to_string());
        self
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Declare a class-level method the class defines itself
    pub fn method(mut self, name: &str) -> Self {
        self.methods.insert(name.to_string());
        self
    }

    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    /// Finish the class.
    ///
    /// A mapped subclass without an explicit table inherits its parent's
    /// table, or derives `<lowercase name>s` directly under the base. Columns
    /// are inherited from the parent unless given.
    pub fn build(self) -> Arc<ModelClass> {
        let parent_is_model = self.parent.as_ref().is_some_and(|p| p.is_model());
        let table = match (self.table, &self.parent) {
            (Some(t), _) => Some(t),
            (None, Some(p)) if parent_is_model => p
                .table_name()
                .map(str::to_string)
                .or_else(|| Some(format!("{}s", self.name.to_lowercase()))),
            (None, _) => None,
        };
        let columns = self.columns.unwrap_or_else(|| {
            self.parent
                .as_ref()
                .map(|p| p.column_names().to_vec())
                .unwrap_or_default()
        });

        Arc::new(ModelClass {
            name: self.name,
            parent: self.parent,
            table,
            columns,
            methods: self.methods,
            dialect: self.dialect,
            is_base: false,
            attached: AtomicBool::new(false),
            extension: OnceCell::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_is_a_model() {
        let base = ModelClass::base();
        assert!(base.is_base());
        assert!(base.is_model());
        assert!(base.table_name().is_none());
        assert!(Arc::ptr_eq(&base, &ModelClass::base()));
    }

    #[test]
    fn test_subclass_chain() {
        let animal = ModelClass::subclass(&ModelClass::base(), "Animal")
            .columns(["id", "kind"])
            .build();
        let dog = ModelClass::subclass(&animal, "Dog").method("bark").build();

        assert!(dog.is_model());
        assert_eq!(animal.table_name(), Some("animals"));
        assert_eq!(dog.table_name(), Some("animals"));
        assert_eq!(dog.column_names(), ["id", "kind"]);
        let names: Vec<_> = dog.ancestors().map(ModelClass::name).collect();
        assert_eq!(names, ["Dog", "Animal", BASE_CLASS_NAME]);
    }

    #[test]
    fn test_plain_class_is_not_a_model() {
        let widget = ModelClass::plain("Widget").columns(["id"]).build();
        assert!(!widget.is_model());
        assert!(widget.table_name().is_none());

        let gadget = ModelClass::subclass(&widget, "Gadget").build();
        assert!(!gadget.is_model());
    }

    #[test]
    fn test_responds_to_walks_ancestors() {
        let parent = ModelClass::subclass(&ModelClass::base(), "Account")
            .method("balance")
            .build();
        let child = ModelClass::subclass(&parent, "Savings").build();

        assert!(child.responds_to("balance"));
        assert!(child.responds_to("name"));
        assert!(!child.responds_to("rate"));
    }

    #[test]
    fn test_dialect_is_inherited() {
        let parent = ModelClass::subclass(&ModelClass::base(), "Event")
            .dialect(Dialect::MySql)
            .build();
        let child = ModelClass::subclass(&parent, "Click").build();
        assert_eq!(child.dialect(), Some(Dialect::MySql));
    }

    #[test]
    fn test_sausage_requires_attachment() {
        let plain = ModelClass::subclass(&ModelClass::base(), "Unattached").build();
        assert!(matches!(plain.sausage(), Err(SausageError::Attachment(_))));
    }

    #[test]
    fn test_base_has_no_sausage_of_its_own() {
        assert!(matches!(ModelClass::base().sausage(), Err(SausageError::Attachment(_))));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_registry_types_are_send_sync() {
        assert_send_sync::<ModelClass>();
        assert_send_sync::<Sausage>();
        assert_send_sync::<crate::expr::SausageExpr>();
        assert_send_sync::<crate::relation::Relation>();
    }

    #[test]
    fn test_column_race_stores_one_node() {
        let class = ModelClass::subclass(&ModelClass::base(), "Racer")
            .columns(["lap"])
            .dialect(Dialect::Postgres)
            .build();
        attach(&class).unwrap();

        let (a, b) = std::thread::scope(|s| {
            let first = s.spawn(|| class.sausage().unwrap().column("lap").unwrap());
            let second = s.spawn(|| class.sausage().unwrap().column("lap").unwrap());
            (first.join().unwrap(), second.join().unwrap())
        });
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&a, &class.sausage().unwrap().column("lap").unwrap()));
    }
}
