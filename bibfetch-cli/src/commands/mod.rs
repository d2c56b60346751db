use std::env;

use clap::{ArgGroup, Subcommand};
use eyre::eyre;
use log::trace;

use bibfetch::SchemaRpcConfig;

#[derive(Subcommand)]
#[non_exhaustive]
pub enum Commands {
    /// Fetch the metadata record for a single book and print it as JSON
    #[clap(group = ArgGroup::new("lookup").required(true))]
    Book {
        /// Look the book up directly by its ISBN
        #[clap(long, group = "lookup")]
        isbn: Option<String>,

        /// Discover the first book in an Open Library subject listing
        #[clap(long, group = "lookup")]
        subject: Option<String>,
    },

    /// List all table names in the hosted store's public schema
    ///
    /// Requires the hosted store's URL and service key in the environment.
    Tables,

    /// Print the column schema of the named tables as JSON
    ///
    /// Requires the hosted store's URL and service key in the environment.
    Schema {
        /// The tables to inspect
        #[clap(default_values = &["books", "genres", "book_genres"])]
        tables: Vec<String>,
    },
}

impl Commands {
    pub fn execute(self) -> Result<String, Box<dyn std::error::Error>> {
        match self {
            Commands::Book { isbn, subject } => {
                let book = match (isbn, subject) {
                    (Some(isbn), _) => bibfetch::book_by_isbn(&isbn)?,
                    (None, Some(subject)) => {
                        let key = bibfetch::first_work_in_subject(&subject)?;
                        trace!("Resolved the subject to the bib-key '{}'", key.bib_key());
                        bibfetch::book_by_key(&key)?
                    }
                    (None, None) => unreachable!("clap requires either --isbn or --subject"),
                };
                Ok(serde_json::to_string_pretty(&book)?)
            }
            Commands::Tables => {
                let config = schema_rpc_config()?;
                let names = bibfetch::table_names(&config)?;
                Ok(names.join("\n"))
            }
            Commands::Schema { tables } => {
                let config = schema_rpc_config()?;
                let schemas = bibfetch::table_schemas(&config, &tables)?;
                Ok(serde_json::to_string_pretty(&serde_json::Value::Object(
                    schemas,
                ))?)
            }
        }
    }
}

fn schema_rpc_config() -> eyre::Result<SchemaRpcConfig> {
    let url = env::var("SUPABASE_URL")
        .map_err(|_| eyre!("The SUPABASE_URL environment variable is required"))?;
    let service_key = env::var("SUPABASE_SERVICE_KEY")
        .map_err(|_| eyre!("The SUPABASE_SERVICE_KEY environment variable is required"))?;

    Ok(SchemaRpcConfig { url, service_key })
}
