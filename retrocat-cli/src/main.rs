use anyhow::{anyhow, bail, Context};
use clap::{Args, Parser, Subcommand};
use retrocat_core::serde_utils::{json_object_from_str, to_pretty_json};
use retrocat_core::{logging, ClientConfig};
use retrocat_listing::{
    columns_for, package_for, CatalogClient, DataTable, Entity, FetchError, FilterValues,
    SortOrder, TableConfig, TableStatus,
};
use retrocat_protocol::records::{
    Article, CollectionEntry, CollectionStatus, Developer, Game, Genre, Platform,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

mod browse;
mod credentials;
mod render;

use credentials::CredentialStore;

#[derive(Parser)]
#[command(name = "retrocat")]
#[command(about = "RetroCat - browse and manage the retro game catalog", long_about = None)]
struct Cli {
    /// Base URL of the catalog API
    #[arg(long, global = true, env = "RETROCAT_API_URL")]
    api_url: Option<String>,
    /// Bearer token for write operations (defaults to the stored login)
    #[arg(long, global = true, env = "RETROCAT_API_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one page of an entity listing
    List(ListArgs),
    /// Page through an entity listing interactively
    Browse(BrowseArgs),
    /// Show the filters an entity listing accepts
    Filters { entity: Entity },
    /// Show the columns of an entity listing
    Columns { entity: Entity },
    /// Show a single record
    Show { entity: Entity, id: i64 },
    /// Create a record from a JSON object
    Create {
        entity: Entity,
        #[arg(long)]
        data: String,
    },
    /// Update a record from a JSON object
    Update {
        entity: Entity,
        id: i64,
        #[arg(long)]
        data: String,
    },
    /// Delete a record
    Delete { entity: Entity, id: i64 },
    /// Manage your personal game collection
    #[command(subcommand)]
    Collection(CollectionCommands),
    /// Store an API token for later runs
    Login {
        #[arg(long)]
        token: String,
    },
    /// Forget the stored API token
    Logout,
    /// Show version information
    Version,
}

#[derive(Args)]
struct ListArgs {
    entity: Entity,
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Rows per page (defaults to RETROCAT_PAGE_SIZE)
    #[arg(long)]
    limit: Option<u32>,
    /// Field to sort by
    #[arg(long)]
    sort: Option<String>,
    /// Sort descending
    #[arg(long, default_value_t = false, requires = "sort")]
    desc: bool,
    /// Filter as key=value; repeatable (see `retrocat filters <entity>`)
    #[arg(short = 'f', long = "filter")]
    filters: Vec<String>,
    /// Comma-separated columns to show
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,
    /// Print raw rows as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Args)]
struct BrowseArgs {
    entity: Entity,
    #[arg(long)]
    limit: Option<u32>,
    /// Ignore responses that arrive after a newer request was issued
    #[arg(long, default_value_t = false)]
    discard_stale: bool,
}

#[derive(Subcommand)]
enum CollectionCommands {
    /// List the games in your collection
    List(CollectionListArgs),
    /// Add a game to your collection
    Add {
        game_id: i64,
        #[arg(long, default_value = "owned")]
        status: CollectionStatus,
    },
    /// Remove a game from your collection
    Remove { game_id: i64 },
}

#[derive(Args)]
struct CollectionListArgs {
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(short = 'f', long = "filter")]
    filters: Vec<String>,
}

fn user_facing(err: FetchError) -> anyhow::Error {
    debug!(error = %err, "request failed");
    anyhow!(err.user_message())
}

fn parse_filters(entity: Entity, raw: &[String]) -> anyhow::Result<FilterValues> {
    let package = package_for(entity);
    let mut values = package.default_filters();
    for item in raw {
        let (key, value) = item
            .split_once('=')
            .ok_or_else(|| anyhow!("filter '{item}' must look like key=value"))?;
        let key = key.trim();
        let value = package.parse_value(key, value)?;
        if value.is_empty() {
            values.remove(key);
        } else {
            values.set(key, value);
        }
    }
    Ok(values)
}

async fn fetch_typed<T>(client: &CatalogClient, entity: Entity, id: i64) -> anyhow::Result<String>
where
    T: DeserializeOwned + Serialize,
{
    let record: T = client.get(entity, id).await.map_err(user_facing)?;
    Ok(to_pretty_json(&record)?)
}

// Records go through their typed form so malformed payloads surface as errors.
async fn show_record(client: &CatalogClient, entity: Entity, id: i64) -> anyhow::Result<String> {
    match entity {
        Entity::Games => fetch_typed::<Game>(client, entity, id).await,
        Entity::Platforms => fetch_typed::<Platform>(client, entity, id).await,
        Entity::Genres => fetch_typed::<Genre>(client, entity, id).await,
        Entity::Developers => fetch_typed::<Developer>(client, entity, id).await,
        Entity::Articles => fetch_typed::<Article>(client, entity, id).await,
        Entity::Collection => fetch_typed::<CollectionEntry>(client, entity, id).await,
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = retrocat_core::config::load_client_config()?;
    if let Some(url) = &cli.api_url {
        config = ClientConfig {
            api_url: retrocat_core::config::normalize_base_url(url)?,
            ..config
        };
    }
    let token = match &cli.token {
        Some(token) => Some(token.clone()),
        None => config
            .api_token
            .clone()
            .or_else(|| CredentialStore::load().ok()?.token().map(str::to_string)),
    };
    if let Some(token) = token {
        config = config.with_token(token);
    }
    Ok(config)
}

async fn print_page(
    mut table: DataTable,
    page: u32,
    as_json: bool,
) -> anyhow::Result<()> {
    table.go_to_page(page).await?;
    if as_json {
        let body = json!({
            "page": table.shown_page(),
            "limit": table.limit(),
            "totalItems": table.total_items(),
            "totalPages": table.total_pages(),
            "data": table.rows(),
        });
        if let TableStatus::Error(message) = table.status() {
            bail!("{message}");
        }
        println!("{}", to_pretty_json(&body)?);
        return Ok(());
    }
    render::print_table(&table);
    if let TableStatus::Error(message) = table.status() {
        bail!("{message}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(Some(&cli.log_level))?;

    match &cli.command {
        Commands::Version => {
            println!("RetroCat v{}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Commands::Filters { entity } => {
            render::print_filter_package(package_for(*entity));
            return Ok(());
        }
        Commands::Columns { entity } => {
            let columns = columns_for(*entity);
            for column in columns.columns() {
                let sortable = if column.sortable { "sortable" } else { "" };
                println!("{:<14} {:<14} {}", column.field, column.header, sortable);
            }
            return Ok(());
        }
        Commands::Login { token } => {
            let mut store = CredentialStore::load()?;
            store.set_token(token);
            store.save()?;
            render::print_success(&format!("token saved to {}", store.path().display()));
            return Ok(());
        }
        Commands::Logout => {
            let mut store = CredentialStore::load()?;
            store.clear();
            store.save()?;
            render::print_success("stored token removed");
            return Ok(());
        }
        _ => {}
    }

    let config = load_config(&cli)?;
    let client = CatalogClient::new(&config).map_err(user_facing)?;
    debug!(
        api = %client.base_url(),
        authorized = config.api_token().is_some(),
        production = config.is_production(),
        "client ready"
    );

    if let Commands::Create { entity, .. }
    | Commands::Update { entity, .. }
    | Commands::Delete { entity, .. } = &cli.command
    {
        if !entity.is_reference_data() {
            bail!("use `retrocat collection add|remove` to change your collection");
        }
    }

    match cli.command {
        Commands::List(args) => {
            let columns = if args.columns.is_empty() {
                columns_for(args.entity)
            } else {
                columns_for(args.entity)
                    .select(&args.columns)
                    .map_err(|err| anyhow!(err))?
            };
            let mut table_config =
                TableConfig::for_entity(args.entity, args.limit.unwrap_or(config.page_size))
                    .with_columns(columns)
                    .with_filters(parse_filters(args.entity, &args.filters)?);
            if let Some(field) = args.sort {
                let order = if args.desc { SortOrder::Desc } else { SortOrder::Asc };
                if !columns_for(args.entity).is_sortable(&field) {
                    bail!("{} cannot be sorted by '{field}'", args.entity);
                }
                table_config = table_config.with_sort(field, order);
            }
            let table = DataTable::new(table_config, Arc::new(client.listing_fetcher()));
            print_page(table, args.page, args.json).await?;
        }
        Commands::Browse(args) => {
            let mut table_config =
                TableConfig::for_entity(args.entity, args.limit.unwrap_or(config.page_size));
            if args.discard_stale {
                table_config =
                    table_config.with_stale_policy(retrocat_listing::StalePolicy::DiscardStale);
            }
            let mut table = DataTable::new(table_config, Arc::new(client.listing_fetcher()));
            browse::run(&mut table).await?;
        }
        Commands::Show { entity, id } => {
            println!("{}", show_record(&client, entity, id).await?);
        }
        Commands::Create { entity, data } => {
            let payload = json_object_from_str(&data).context("--data must be a JSON object")?;
            let created: Value = client
                .create(entity, &payload)
                .await
                .map_err(user_facing)?;
            render::print_success(&format!("{entity} record created"));
            println!("{}", to_pretty_json(&created)?);
        }
        Commands::Update { entity, id, data } => {
            let payload = json_object_from_str(&data).context("--data must be a JSON object")?;
            let updated: Value = client
                .update(entity, id, &payload)
                .await
                .map_err(user_facing)?;
            render::print_success(&format!("{entity} #{id} updated"));
            println!("{}", to_pretty_json(&updated)?);
        }
        Commands::Delete { entity, id } => {
            client.delete(entity, id).await.map_err(user_facing)?;
            render::print_success(&format!("{entity} #{id} deleted"));
        }
        Commands::Collection(CollectionCommands::List(args)) => {
            let table_config = TableConfig::for_entity(Entity::Collection, config.page_size)
                .with_filters(parse_filters(Entity::Collection, &args.filters)?);
            let table = DataTable::new(table_config, Arc::new(client.listing_fetcher()));
            print_page(table, args.page, false).await?;
        }
        Commands::Collection(CollectionCommands::Add { game_id, status }) => {
            let entry = client
                .add_to_collection(game_id, status)
                .await
                .map_err(user_facing)?;
            render::print_success(&format!(
                "game #{} added to your collection ({})",
                entry.game_id, entry.status
            ));
        }
        Commands::Collection(CollectionCommands::Remove { game_id }) => {
            client
                .remove_from_collection(game_id)
                .await
                .map_err(user_facing)?;
            render::print_success(&format!("game #{game_id} removed from your collection"));
        }
        Commands::Version
        | Commands::Filters { .. }
        | Commands::Columns { .. }
        | Commands::Login { .. }
        | Commands::Logout => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use retrocat_listing::FilterValue;

    #[test]
    fn cli_parses_list_arguments() {
        let cli = Cli::try_parse_from([
            "retrocat", "list", "games", "--page", "2", "--sort", "title", "--desc", "-f",
            "search=mario", "-f", "releaseYear=1990..1995", "--columns", "id,title",
        ])
        .expect("valid arguments");
        let Commands::List(args) = cli.command else {
            panic!("expected list command");
        };
        assert_eq!(args.entity, Entity::Games);
        assert_eq!(args.page, 2);
        assert!(args.desc);
        assert_eq!(args.filters.len(), 2);
        assert_eq!(args.columns, vec!["id", "title"]);
    }

    #[test]
    fn desc_requires_sort() {
        assert!(Cli::try_parse_from(["retrocat", "list", "games", "--desc"]).is_err());
    }

    #[test]
    fn filters_start_from_package_defaults() {
        let values = parse_filters(Entity::Articles, &["search=zelda".to_string()]).unwrap();
        assert_eq!(values.get("status"), Some(&FilterValue::status("published")));
        assert_eq!(values.get("search"), Some(&FilterValue::text("zelda")));

        let cleared = parse_filters(Entity::Articles, &["status=".to_string()]).unwrap();
        assert!(cleared.get("status").is_none());
    }

    #[test]
    fn malformed_filters_are_rejected() {
        assert!(parse_filters(Entity::Games, &["search".to_string()]).is_err());
        assert!(parse_filters(Entity::Games, &["rating=high".to_string()]).is_err());
        assert!(parse_filters(Entity::Genres, &["year=1990".to_string()]).is_err());
    }
}
