use crate::{error::Error, query::QueryError, value::Value, wire};
use std::fmt;

// Characters that may trail a property name as part of its operator.
const OPERATOR_CHARS: &[char] = &[' ', '<', '>', '=', '!'];

///
/// Operator
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operator {
    Lt,
    Lte,
    Eq,
    Gte,
    Gt,
}

impl Operator {
    /// Parse one of `<`, `<=`, `=`, `>=`, `>`.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Lte),
            "=" => Some(Self::Eq),
            ">=" => Some(Self::Gte),
            ">" => Some(Self::Gt),
            _ => None,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Eq => "=",
            Self::Gte => ">=",
            Self::Gt => ">",
        }
    }

    #[must_use]
    pub const fn to_wire(self) -> wire::FilterOperator {
        match self {
            Self::Lt => wire::FilterOperator::LessThan,
            Self::Lte => wire::FilterOperator::LessThanOrEqual,
            Self::Eq => wire::FilterOperator::Equal,
            Self::Gte => wire::FilterOperator::GreaterThanOrEqual,
            Self::Gt => wire::FilterOperator::GreaterThan,
        }
    }
}

///
/// Filter
///
/// A filter exactly as the caller wrote it: a `"property op"` expression
/// and the value to compare against. Parsing happens on demand.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    expr: String,
    value: Value,
}

impl Filter {
    #[must_use]
    pub fn new(expr: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            expr: expr.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn expr(&self) -> &str {
        &self.expr
    }

    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Split the expression into `(property, operator)`.
    ///
    /// The property is everything before the trailing run of operator and
    /// space characters, with any remaining whitespace trimmed. When no such run exists the last word is taken as
    /// the operator, so `"age IN"` yields operator `"IN"` and is rejected
    /// later rather than folded into the property name.
    pub fn parse(&self) -> Result<(&str, &str), QueryError> {
        let filter = self.expr.trim();
        if filter.is_empty() {
            return Err(QueryError::EmptyFilter {
                filter: self.expr.clone(),
            });
        }

        let head = filter.trim_end_matches(OPERATOR_CHARS);
        let mut operator = filter[head.len()..].trim();
        let mut property = head.trim_end();
        if operator.is_empty()
            && let Some((rest, word)) = property.rsplit_once(char::is_whitespace)
        {
            operator = word;
            property = rest.trim_end();
        }

        if property.is_empty() {
            return Err(QueryError::EmptyFilterProperty {
                filter: self.expr.clone(),
            });
        }

        Ok((property, operator))
    }

    /// Lower into a wire filter carrying one typed property.
    pub fn to_wire(&self) -> Result<wire::QueryFilter, Error> {
        let (property, symbol) = self.parse()?;
        let operator =
            Operator::from_symbol(symbol).ok_or_else(|| QueryError::UnsupportedOperator {
                operator: symbol.to_string(),
                filter: self.expr.clone(),
            })?;
        let property = self.value.to_property(property)?;

        Ok(wire::QueryFilter {
            op: operator.to_wire() as i32,
            property: vec![property],
        })
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parse() {
            Ok((property, operator)) => write!(f, "{property}{operator}{}", self.value),
            Err(_) => write!(f, "{}{}", self.expr, self.value),
        }
    }
}
