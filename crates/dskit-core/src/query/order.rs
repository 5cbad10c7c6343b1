use crate::{query::QueryError, wire};
use std::fmt;

///
/// Direction
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    #[must_use]
    pub const fn to_wire(self) -> wire::OrderDirection {
        match self {
            Self::Asc => wire::OrderDirection::Ascending,
            Self::Desc => wire::OrderDirection::Descending,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

///
/// Order
/// A sort expression: a property name, optionally prefixed with `-`.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Order(String);

impl Order {
    #[must_use]
    pub fn new(expr: impl Into<String>) -> Self {
        Self(expr.into())
    }

    #[must_use]
    pub fn expr(&self) -> &str {
        &self.0
    }

    /// Split into `(property, direction)`; the property may be empty.
    #[must_use]
    pub fn parse(&self) -> (&str, Direction) {
        let property = self.0.trim();

        match property.strip_prefix('-') {
            Some(rest) => (rest.trim(), Direction::Desc),
            None => (property, Direction::Asc),
        }
    }

    pub fn to_wire(&self) -> Result<wire::QueryOrder, QueryError> {
        let (property, direction) = self.parse();
        if property.is_empty() {
            return Err(QueryError::EmptyOrderProperty {
                order: self.0.clone(),
            });
        }

        Ok(wire::QueryOrder {
            property: property.to_string(),
            direction: Some(direction.to_wire() as i32),
        })
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (property, direction) = self.parse();

        write!(f, "{property} {}", direction.as_str())
    }
}
