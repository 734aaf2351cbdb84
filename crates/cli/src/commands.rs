use clap::{Args, Subcommand};

#[derive(Subcommand)]
pub enum Commands {
    /// Render a JSON query for one dialect
    Render {
        #[command(flatten)]
        query: QueryArgs,

        #[arg(long, help = "Print the SQL with parameters inlined instead of JSON")]
        debug: bool,
    },
    /// Render the count query derived from a JSON query
    Count {
        #[command(flatten)]
        query: QueryArgs,

        #[arg(long, help = "Keep LEFT joins even when nothing references them")]
        no_optimize: bool,
    },
    /// Walk the pagination flow without a database, printing each statement
    Page {
        #[command(flatten)]
        query: QueryArgs,

        #[arg(long, default_value_t = 1, help = "1-based page number")]
        page: u64,

        #[arg(long, default_value_t = 10, help = "Rows per page")]
        size: u64,

        #[arg(
            long,
            default_value_t = 100,
            help = "Row count the dry-run count query reports"
        )]
        total: u64,

        #[arg(long, help = "Pass the total with the request and skip counting")]
        known_total: bool,
    },
    /// List the supported database types and their limit strategies
    Dialects,
}

#[derive(Args)]
pub struct QueryArgs {
    #[arg(long, help = "Path to a JSON-serialized query")]
    pub query: String,

    #[arg(long, help = "Database type, e.g. mysql, postgresql, sqlserver_2005")]
    pub db: Option<String>,

    #[arg(
        long,
        help = "If specified, writes the output to this file instead of stdout"
    )]
    pub output: Option<String>,
}
