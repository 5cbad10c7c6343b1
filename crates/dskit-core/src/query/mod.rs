//! Module: query
//! Responsibility: immutable query descriptors and their lowering into wire requests.
//! Does not own: execution (the backend) or key encoding rules (see `codec`).
//! Boundary: every `to_wire` conversion reports all faults through `MultiError`.

mod cursor;
mod filter;
mod options;
mod order;

pub use cursor::{Cursor, CursorDecodeError};
pub use filter::{Filter, Operator};
pub use options::{QueryOptions, RangeError, WireOptions, valid_range};
pub use order::{Direction, Order};

use crate::{codec, error::MultiError, key::Context, key::Key, value::Value, wire};
use std::{fmt, iter, sync::Arc};
use thiserror::Error as ThisError;
use tracing::trace;

///
/// QueryError
/// Query shapes this layer cannot express on the wire.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum QueryError {
    #[error("empty query kind; kindless queries are not supported")]
    EmptyKind,

    #[error("invalid query filter: {filter:?}")]
    EmptyFilter { filter: String },

    #[error("empty query filter property in {filter:?}")]
    EmptyFilterProperty { filter: String },

    #[error("invalid operator {operator:?} in filter {filter:?}")]
    UnsupportedOperator { operator: String, filter: String },

    #[error("empty query order property in {order:?}")]
    EmptyOrderProperty { order: String },
}

///
/// Query
///
/// Immutable query descriptor: a kind, an optional ancestor, AND-ed filters
/// and a multi-key sort. Every builder method returns a new value and leaves
/// the receiver untouched; untouched parts are shared, never copied.
///
/// Values are stored as given and validated only by [`Query::to_wire`].
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query {
    kind: String,
    ancestor: Option<Arc<Key>>,
    filters: Arc<[Filter]>,
    orders: Arc<[Order]>,
}

impl Query {
    /// Query over a single entity kind.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    // ------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------

    #[must_use]
    pub fn with_kind(&self, kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..self.clone()
        }
    }

    /// Restrict results to descendants of `ancestor`.
    #[must_use]
    pub fn with_ancestor(&self, ancestor: Key) -> Self {
        Self {
            ancestor: Some(Arc::new(ancestor)),
            ..self.clone()
        }
    }

    /// Add a field filter such as `"age >="`.
    ///
    /// The expression is a property name followed by optional space and one
    /// of `<`, `<=`, `=`, `>=`, `>`. Filters are AND-ed together.
    #[must_use]
    pub fn add_filter(&self, expr: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            filters: appended(&self.filters, Filter::new(expr, value)),
            ..self.clone()
        }
    }

    /// Add a sort on a property; a leading `-` sorts descending.
    /// Orders apply in the order they are added.
    #[must_use]
    pub fn add_order(&self, expr: impl Into<String>) -> Self {
        Self {
            orders: appended(&self.orders, Order::new(expr)),
            ..self.clone()
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn ancestor(&self) -> Option<&Key> {
        self.ancestor.as_deref()
    }

    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    // ------------------------------------------------------------------
    // Lowering
    // ------------------------------------------------------------------

    /// Lower the query shape into a wire query.
    ///
    /// Every fault is collected; a bad filter or order is left out of the
    /// message and no message is returned unless all of them converted.
    pub fn to_wire(&self) -> Result<wire::Query, MultiError> {
        let mut errors = MultiError::new();
        let mut dst = wire::Query::default();

        if self.kind.is_empty() {
            errors.push(QueryError::EmptyKind);
        } else {
            dst.kind = Some(self.kind.clone());
        }

        if let Some(ancestor) = self.ancestor() {
            match codec::key_to_reference(ancestor) {
                Ok(reference) => dst.ancestor = Some(reference),
                Err(err) => errors.push(err),
            }
        }

        for filter in self.filters.iter() {
            match filter.to_wire() {
                Ok(wire_filter) => dst.filter.push(wire_filter),
                Err(err) => errors.push(err),
            }
        }

        for order in self.orders.iter() {
            match order.to_wire() {
                Ok(wire_order) => dst.order.push(wire_order),
                Err(err) => errors.push(err),
            }
        }

        if !errors.is_empty() {
            trace!(kind = %self.kind, errors = errors.len(), "query failed to lower");
        }

        errors.into_result(dst)
    }
}

// SQL-like diagnostic form; never parsed back.
impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT *")?;
        if !self.kind.is_empty() {
            write!(f, " FROM {}", self.kind)?;
        }

        let mut has_where = false;
        if let Some(ancestor) = self.ancestor() {
            match ancestor.try_encode() {
                Ok(encoded) => write!(f, " WHERE ANCESTOR IS KEY('{encoded}')")?,
                Err(_) => write!(f, " WHERE ANCESTOR IS KEY({ancestor})")?,
            }
            has_where = true;
        }

        for filter in self.filters.iter() {
            f.write_str(if has_where { " AND " } else { " WHERE " })?;
            has_where = true;
            write!(f, "{filter}")?;
        }

        for (i, order) in self.orders.iter().enumerate() {
            f.write_str(if i == 0 { " ORDER BY " } else { ", " })?;
            write!(f, "{order}")?;
        }

        Ok(())
    }
}

/// Assemble the full wire request for running `query` with `options`.
///
/// The owning realm comes from `ctx`; the namespace from the ancestor when
/// one is set, otherwise from `ctx`. Faults in the query and in the options
/// are reported together.
pub fn build_request<C: Context + ?Sized>(
    ctx: &C,
    query: &Query,
    options: &QueryOptions,
) -> Result<wire::Query, MultiError> {
    let mut errors = MultiError::new();

    let mut request = query.to_wire().unwrap_or_else(|err| {
        errors.extend(err);
        wire::Query::default()
    });
    if let Err(err) = options.apply_to(&mut request) {
        errors.extend(err);
    }

    request.app = ctx.owner_id().to_string();
    let namespace = query
        .ancestor()
        .map_or_else(|| ctx.namespace(), Key::namespace);
    if !namespace.is_empty() {
        request.name_space = Some(namespace.to_string());
    }

    errors.into_result(request)
}

// New sequence holding `items` plus `item`; `items` itself is not touched.
fn appended<T: Clone>(items: &Arc<[T]>, item: T) -> Arc<[T]> {
    items.iter().cloned().chain(iter::once(item)).collect()
}
