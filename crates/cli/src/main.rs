use crate::{
    commands::{Commands, QueryArgs},
    dry_run::DryRunExecutor,
    error::CliError,
    output::{StatementReport, emit, to_json},
};
use clap::Parser;
use engine_config::{EngineSettings, env::EnvManager};
use model::core::db_type::DbType;
use planner::{
    QueryWrapper,
    query::dialect::standard::create_dialect,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod dry_run;
mod error;
mod output;

#[derive(Parser)]
#[command(
    name = "sqlflex",
    version = "0.0.1",
    about = "Render query trees as dialect-specific SQL"
)]
struct Cli {
    #[arg(long, global = true, help = "Load SQLFLEX_* variables from this .env file")]
    env_file: Option<String>,

    #[arg(
        long,
        global = true,
        help = "JSON settings file; takes precedence over environment variables"
    )]
    settings: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Serialize)]
struct DialectInfo {
    db_type: DbType,
    dialect: String,
    limit_strategy: &'static str,
}

#[derive(Serialize)]
struct PageReport {
    page_number: u64,
    page_size: u64,
    total_page: u64,
    total_row: u64,
    statements: Vec<(&'static str, StatementReport)>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = load_settings(cli.env_file.as_deref(), cli.settings.as_deref())?;
    let registry = settings.registry();

    match cli.command {
        Commands::Render { query, debug } => {
            let (db_type, wrapper) = load_query(&query, &settings).await?;
            let dialect = registry.dialect_for(db_type);
            let statement = dialect.for_select_by_query(&wrapper)?;
            let content = if debug {
                statement.to_debug_sql()
            } else {
                to_json(&StatementReport::new(dialect.name(), &statement))?
            };
            emit(content, query.output.as_deref()).await?;
        }
        Commands::Count { query, no_optimize } => {
            let (db_type, wrapper) = load_query(&query, &settings).await?;
            let request = settings
                .page_request(1, 1)
                .with_optimize_count_query(settings.optimize_count_query && !no_optimize);
            let paginator = settings.paginator(&registry, Some(db_type));
            let statement = paginator.count_statement(&request, &wrapper)?;
            let report = StatementReport::new(paginator.dialect().name(), &statement);
            emit(to_json(&report)?, query.output.as_deref()).await?;
        }
        Commands::Page {
            query,
            page,
            size,
            total,
            known_total,
        } => {
            let (db_type, wrapper) = load_query(&query, &settings).await?;
            let mut request = settings.page_request(page, size);
            if known_total {
                request = request.with_total_row(total);
            }
            let paginator = settings.paginator(&registry, Some(db_type));
            let executor = DryRunExecutor::new(total);
            let result = paginator.paginate(&executor, &request, &wrapper).await?;

            let dialect = paginator.dialect().name();
            let report = PageReport {
                page_number: result.page_number,
                page_size: result.page_size,
                total_page: result.total_page,
                total_row: result.total_row,
                statements: executor
                    .into_statements()
                    .into_iter()
                    .map(|(kind, statement)| {
                        (kind, StatementReport::new(dialect.clone(), &statement))
                    })
                    .collect(),
            };
            emit(to_json(&report)?, query.output.as_deref()).await?;
        }
        Commands::Dialects => {
            let dialects: Vec<DialectInfo> = DbType::all()
                .iter()
                .map(|db_type| {
                    let dialect = create_dialect(*db_type);
                    DialectInfo {
                        db_type: *db_type,
                        dialect: dialect.name(),
                        limit_strategy: dialect.limit_offset().name(),
                    }
                })
                .collect();
            emit(to_json(&dialects)?, None).await?;
        }
    }

    Ok(())
}

fn load_settings(
    env_file: Option<&str>,
    settings_file: Option<&str>,
) -> Result<EngineSettings, CliError> {
    if let Some(path) = settings_file {
        return Ok(EngineSettings::from_json_file(path)?);
    }

    let mut env = EnvManager::from_process();
    if let Some(path) = env_file {
        env.load_from_file(path)?;
    }
    Ok(EngineSettings::from_env(&env)?)
}

async fn load_query(
    args: &QueryArgs,
    settings: &EngineSettings,
) -> Result<(DbType, QueryWrapper), CliError> {
    let source = tokio::fs::read_to_string(&args.query).await?;
    let wrapper: QueryWrapper = serde_json::from_str(&source)?;
    wrapper.validate()?;

    let db_type = match &args.db {
        Some(name) => name.parse()?,
        None => settings.default_db_type,
    };
    info!("Loaded query from {} for {db_type}", args.query);
    Ok((db_type, wrapper))
}
