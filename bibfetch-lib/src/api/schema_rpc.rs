use log::{info, warn};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::{Error, ErrorKind};

use super::Client;

/// Connection details for the hosted store's RPC endpoint.
///
/// Callers build this once, typically from the environment at startup, and
/// pass it into each call explicitly.
#[derive(Clone, Debug)]
pub struct SchemaRpcConfig {
    /// Base URL of the hosted store, e.g. `https://<project>.supabase.co`.
    pub url: String,
    /// Service-role key, sent as both the `apikey` and bearer token headers.
    pub service_key: String,
}

impl SchemaRpcConfig {
    fn rpc_url(&self, function: &str) -> String {
        format!("{}/rest/v1/rpc/{function}", self.url.trim_end_matches('/'))
    }

    fn headers(&self) -> [(&'static str, String); 2] {
        [
            ("apikey", self.service_key.clone()),
            ("Authorization", format!("Bearer {}", self.service_key)),
        ]
    }
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct TableRow {
    table_name: String,
}

pub(crate) fn table_names<C: Client>(config: &SchemaRpcConfig) -> Result<Vec<String>, Error> {
    info!("Fetching all table names from the public schema");
    let url = config.rpc_url("get_all_table_names");

    let client = C::default();
    let rows: Vec<TableRow> = client.post_json(&url, &config.headers(), &json!({}))?;

    if rows.is_empty() {
        Err(Error::new(
            ErrorKind::NotFound,
            "No tables found in the public schema",
        ))
    } else {
        Ok(rows.into_iter().map(|row| row.table_name).collect())
    }
}

pub(crate) fn table_schema<C: Client>(
    config: &SchemaRpcConfig,
    table: &str,
) -> Result<Value, Error> {
    info!("Fetching schema for table: {table}");
    let url = config.rpc_url("get_table_schema");

    let client = C::default();
    let schema: Value = client.post_json(
        &url,
        &config.headers(),
        &json!({ "table_name_input": table }),
    )?;

    // The RPC layer answers `null` or an empty row set for an unknown table.
    if schema.is_null() || schema.as_array().is_some_and(Vec::is_empty) {
        Err(Error::new(
            ErrorKind::NotFound,
            format!("Could not retrieve schema for table: {table}"),
        ))
    } else {
        Ok(schema)
    }
}

pub(crate) fn table_schemas<C: Client>(
    config: &SchemaRpcConfig,
    tables: &[String],
) -> Result<Map<String, Value>, Error> {
    let mut schemas = Map::new();
    for table in tables {
        match table_schema::<C>(config, table) {
            Ok(schema) => {
                schemas.insert(table.clone(), schema);
            }
            // A table without a schema is skipped so the remaining tables are
            // still reported.
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!("Could not retrieve schema for table: {table}");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(schemas)
}
