//! Module: wire
//! Responsibility: protocol message shapes exchanged with the datastore backend.
//! Does not own: validation or conversion from domain values (see `codec`, `query`).
//! Boundary: field numbers and group/message framing are a cross-runtime
//! compatibility contract; never renumber a field.


///
/// Reference
///
/// Wire form of a key: owning realm, optional namespace, and the
/// root-to-leaf path of elements.
///

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Reference {
    #[prost(string, required, tag = "13")]
    pub app: String,

    #[prost(message, required, tag = "14")]
    pub path: Path,

    #[prost(string, optional, tag = "20")]
    pub name_space: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Path {
    #[prost(group, repeated, tag = "1")]
    pub element: Vec<PathElement>,
}

///
/// PathElement
/// At most one of `id` / `name` is set; neither means an incomplete leaf.
///

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PathElement {
    #[prost(string, required, tag = "2")]
    pub r#type: String,

    #[prost(int64, optional, tag = "3")]
    pub id: Option<i64>,

    #[prost(string, optional, tag = "4")]
    pub name: Option<String>,
}

///
/// Query
///
/// Wire query request. Shape fields come from the query descriptor,
/// pagination fields from the query options.
///

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Query {
    #[prost(string, required, tag = "1")]
    pub app: String,

    #[prost(string, optional, tag = "3")]
    pub kind: Option<String>,

    #[prost(group, repeated, tag = "4")]
    pub filter: Vec<QueryFilter>,

    #[prost(int32, optional, tag = "7")]
    pub offset: Option<i32>,

    #[prost(group, repeated, tag = "9")]
    pub order: Vec<QueryOrder>,

    #[prost(int32, optional, tag = "16")]
    pub limit: Option<i32>,

    #[prost(message, optional, tag = "17")]
    pub ancestor: Option<Reference>,

    #[prost(bool, optional, tag = "21")]
    pub keys_only: Option<bool>,

    #[prost(bool, optional, tag = "25")]
    pub compile: Option<bool>,

    #[prost(string, optional, tag = "29")]
    pub name_space: Option<String>,

    #[prost(bytes = "vec", optional, tag = "30")]
    pub compiled_cursor: Option<Vec<u8>>,

    #[prost(bytes = "vec", optional, tag = "31")]
    pub end_compiled_cursor: Option<Vec<u8>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryFilter {
    #[prost(enumeration = "FilterOperator", required, tag = "6")]
    pub op: i32,

    #[prost(message, repeated, tag = "14")]
    pub property: Vec<Property>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryOrder {
    #[prost(string, required, tag = "10")]
    pub property: String,

    #[prost(enumeration = "OrderDirection", optional, tag = "11")]
    pub direction: Option<i32>,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, ::prost::Enumeration)]
#[repr(i32)]
pub enum FilterOperator {
    LessThan = 1,
    LessThanOrEqual = 2,
    GreaterThan = 3,
    GreaterThanOrEqual = 4,
    Equal = 5,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, ::prost::Enumeration)]
#[repr(i32)]
pub enum OrderDirection {
    Ascending = 1,
    Descending = 2,
}

///
/// Property
/// Named, typed value; queries carry exactly one per filter.
///

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Property {
    #[prost(enumeration = "Meaning", optional, tag = "1")]
    pub meaning: Option<i32>,

    #[prost(string, required, tag = "3")]
    pub name: String,

    #[prost(bool, required, tag = "4")]
    pub multiple: bool,

    #[prost(message, required, tag = "5")]
    pub value: PropertyValue,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, ::prost::Enumeration)]
#[repr(i32)]
pub enum Meaning {
    NoMeaning = 0,
    /// int64 microseconds since the Unix epoch
    GdWhen = 7,
}

///
/// PropertyValue
/// Tagged scalar; exactly one field is set.
///

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PropertyValue {
    #[prost(int64, optional, tag = "1")]
    pub int64_value: Option<i64>,

    #[prost(bool, optional, tag = "2")]
    pub boolean_value: Option<bool>,

    #[prost(string, optional, tag = "3")]
    pub string_value: Option<String>,

    #[prost(double, optional, tag = "4")]
    pub double_value: Option<f64>,

    #[prost(group, optional, tag = "12")]
    pub reference_value: Option<ReferenceValue>,
}

///
/// ReferenceValue
/// Key embedded in a property value; same content as [`Reference`] with
/// the path flattened into groups.
///

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReferenceValue {
    #[prost(string, required, tag = "13")]
    pub app: String,

    #[prost(group, repeated, tag = "14")]
    pub path_element: Vec<ReferenceValuePathElement>,

    #[prost(string, optional, tag = "20")]
    pub name_space: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReferenceValuePathElement {
    #[prost(string, required, tag = "15")]
    pub r#type: String,

    #[prost(int64, optional, tag = "16")]
    pub id: Option<i64>,

    #[prost(string, optional, tag = "17")]
    pub name: Option<String>,
}

///
/// QueryResult
///
/// One batch returned by the backend for a query request.
///
/// Tag 1 is the legacy cursor record and is skipped as an unknown field.
/// The compiled cursor message is kept as its raw encoded bytes; they are
/// sent back verbatim in [`Query::compiled_cursor`].
///

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryResult {
    #[prost(bytes = "vec", optional, tag = "6")]
    pub compiled_cursor: Option<Vec<u8>>,

    #[prost(message, repeated, tag = "2")]
    pub result: Vec<EntityProto>,

    #[prost(bool, required, tag = "3")]
    pub more_results: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EntityProto {
    #[prost(message, required, tag = "13")]
    pub key: Reference,
}
