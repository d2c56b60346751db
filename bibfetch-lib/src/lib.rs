#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![warn(missing_docs, rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]
#![doc = include_str!("../README.md")]

mod api;
mod error;
mod key;

pub use api::schema_rpc::SchemaRpcConfig;
pub use error::{Error, ErrorKind};
pub use key::LookupKey;

use log::trace;
use serde_json::Value;

type Client = reqwest::blocking::Client;

/// Fetch the metadata record for the book with the given `isbn`.
///
/// Hyphens in the ISBN are stripped before the lookup; no other validation is
/// performed. The returned metadata is the remote service's record, passed
/// through verbatim.
///
/// # Errors
///
/// An `Err` of kind [`ErrorKind::NotFound`] is returned when no book exists
/// for the `isbn`.
/// An `Err` of kind [`ErrorKind::Network`] is returned when the catalog
/// service cannot be reached or answers with a failure.
#[inline]
pub fn book_by_isbn(isbn: &str) -> Result<Value, Error> {
    trace!("Fetch book metadata by ISBN of '{isbn}'");
    // remove hyphen from ISBN-13 (if applicable)
    let isbn = isbn.replace('-', "");
    api::open_library::book_by_key::<Client>(&LookupKey::Isbn(isbn))
}

/// Fetch the metadata record for the book with the given lookup `key`.
///
/// # Errors
///
/// An `Err` of kind [`ErrorKind::NotFound`] is returned when no book exists
/// for the `key`.
/// An `Err` of kind [`ErrorKind::Network`] is returned when the catalog
/// service cannot be reached or answers with a failure.
#[inline]
pub fn book_by_key(key: &LookupKey) -> Result<Value, Error> {
    trace!("Fetch book metadata by bib-key of '{}'", key.bib_key());
    api::open_library::book_by_key::<Client>(key)
}

/// Resolve a subject name to the lookup key of the first work in its listing.
///
/// Only the first listing entry is ever consulted, so the request is capped
/// at a single result.
///
/// # Errors
///
/// An `Err` of kind [`ErrorKind::NotFound`] is returned when the listing has
/// no entries for the `subject`.
/// An `Err` of kind [`ErrorKind::Network`] is returned when the catalog
/// service cannot be reached or answers with a failure.
#[inline]
pub fn first_work_in_subject(subject: &str) -> Result<LookupKey, Error> {
    trace!("Resolve the first work in the subject of '{subject}'");
    api::open_library::first_work_in_subject::<Client>(subject, 1)
}

/// Fetch the metadata record for the first book in a subject listing.
///
/// Composes [`first_work_in_subject`] and [`book_by_key`]; use those directly
/// when the resolved key itself is of interest.
///
/// # Errors
///
/// An `Err` of kind [`ErrorKind::NotFound`] is returned when the listing has
/// no entries for the `subject` or when the resolved work has no metadata
/// record.
/// An `Err` of kind [`ErrorKind::Network`] is returned when the catalog
/// service cannot be reached or answers with a failure.
#[inline]
pub fn first_book_in_subject(subject: &str) -> Result<Value, Error> {
    trace!("Fetch the first book in the subject of '{subject}'");
    let key = api::open_library::first_work_in_subject::<Client>(subject, 1)?;
    api::open_library::book_by_key::<Client>(&key)
}

/// List all table names in the hosted store's public schema.
///
/// # Errors
///
/// An `Err` of kind [`ErrorKind::NotFound`] is returned when the store
/// reports no tables.
/// An `Err` of kind [`ErrorKind::Network`] is returned when the RPC endpoint
/// cannot be reached or answers with a failure.
#[inline]
pub fn table_names(config: &SchemaRpcConfig) -> Result<Vec<String>, Error> {
    trace!("Fetch all table names from the hosted store");
    api::schema_rpc::table_names::<Client>(config)
}

/// Fetch the column schema for the named `table` as the store reports it.
///
/// # Errors
///
/// An `Err` of kind [`ErrorKind::NotFound`] is returned when the store has no
/// schema for the `table`.
/// An `Err` of kind [`ErrorKind::Network`] is returned when the RPC endpoint
/// cannot be reached or answers with a failure.
#[inline]
pub fn table_schema(config: &SchemaRpcConfig, table: &str) -> Result<Value, Error> {
    trace!("Fetch the schema for the table of '{table}'");
    api::schema_rpc::table_schema::<Client>(config, table)
}

/// Fetch the column schemas for the named `tables`, keyed by table name.
///
/// A table the store has no schema for is logged and omitted from the result
/// rather than failing the whole call, so the remaining tables are still
/// reported.
///
/// # Errors
///
/// An `Err` of kind [`ErrorKind::Network`] is returned when the RPC endpoint
/// cannot be reached or answers with a failure.
#[inline]
pub fn table_schemas(
    config: &SchemaRpcConfig,
    tables: &[String],
) -> Result<serde_json::Map<String, Value>, Error> {
    trace!("Fetch the schemas for {} tables", tables.len());
    api::schema_rpc::table_schemas::<Client>(config, tables)
}
