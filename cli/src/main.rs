use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use config::{load_env_file, PathManager, Settings, StorageBackend};
use dapur_core::{
    load_catalog, open_store, KeyValueStore, Preference, PreferenceStore, RecencyConfig,
    RecencyList, RecipeId, RecipeQuery, RecipeSummary, UserRecord, LAST_SEARCHES_KEY,
    SEARCH_HISTORY_KEY,
};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Copy, Clone, ValueEnum, Debug, PartialEq, Eq)]
enum Backend {
    Fs,
    Sqlite,
    Memory,
}

impl From<Backend> for StorageBackend {
    fn from(b: Backend) -> Self {
        match b {
            Backend::Fs => StorageBackend::Fs,
            Backend::Sqlite => StorageBackend::Sqlite,
            Backend::Memory => StorageBackend::Memory,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "dapur", author, version, about, long_about = None)]
struct Args {
    #[arg(long, short)]
    tracing: bool,

    /// Directory holding the durable store
    #[arg(long, env = config::DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    /// Override the backend from settings.toml
    #[arg(long, value_enum)]
    backend: Option<Backend>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read and write preference flags
    #[command(subcommand)]
    Prefs(PrefsCommand),
    /// Registered user and login session
    #[command(subcommand)]
    Session(SessionCommand),
    /// Recent-search lists
    #[command(subcommand)]
    Recent(RecentCommand),
    /// Filter a catalog file
    Search(SearchArgs),
}

#[derive(Subcommand, Debug)]
enum PrefsCommand {
    Show,
    Get { name: String },
    Set {
        name: String,
        #[arg(action = clap::ArgAction::Set)]
        value: bool,
    },
}

#[derive(ClapArgs, Debug)]
struct UserArgs {
    #[arg(long)]
    id: String,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    photo_url: Option<String>,
}

impl From<UserArgs> for UserRecord {
    fn from(args: UserArgs) -> Self {
        UserRecord {
            name: args.name,
            email: args.email,
            username: args.username,
            photo_url: args.photo_url,
            ..UserRecord::new(args.id)
        }
    }
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    Show,
    Register(UserArgs),
    Login(UserArgs),
    Logout,
}

#[derive(Subcommand, Debug)]
enum RecentCommand {
    List {
        #[arg(long, default_value = LAST_SEARCHES_KEY)]
        key: String,
    },
    Add {
        #[arg(long, default_value = LAST_SEARCHES_KEY)]
        key: String,
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        category: String,
    },
    Clear {
        #[arg(long, default_value = LAST_SEARCHES_KEY)]
        key: String,
    },
}

#[derive(ClapArgs, Debug)]
struct SearchArgs {
    /// JSON array of recipes
    #[arg(long)]
    catalog: PathBuf,
    #[arg(long)]
    category: Option<String>,
    /// Record the recipe with this id in the search history
    #[arg(long)]
    pick: Option<String>,
    #[arg(default_value = "")]
    text: String,
}

fn setup_tracing(enable: bool) {
    if enable {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::TRACE)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Setting default subscriber failed");
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::ERROR)
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Setting default subscriber failed");
    }
}

fn parse_recipe_id(raw: &str) -> RecipeId {
    raw.parse::<u64>()
        .map(RecipeId::Number)
        .unwrap_or_else(|_| RecipeId::from(raw))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn recency_list(
    store: &Arc<dyn KeyValueStore>,
    key: &str,
    settings: &Settings,
) -> RecencyList<RecipeSummary, dyn KeyValueStore> {
    RecencyList::new(store.clone(), RecencyConfig::from_settings(key, settings))
}

async fn run_prefs(prefs: &PreferenceStore<dyn KeyValueStore>, cmd: PrefsCommand) -> Result<()> {
    match cmd {
        PrefsCommand::Show => {
            for pref in Preference::ALL {
                println!("{:<10} {}", pref.key(), prefs.flag(pref).await);
            }
        }
        PrefsCommand::Get { name } => {
            println!("{}", prefs.get_preference(&name).await?);
        }
        PrefsCommand::Set { name, value } => {
            prefs.set_preference(&name, value).await?;
            println!("{} = {}", name, value);
        }
    }
    Ok(())
}

async fn run_session(prefs: &PreferenceStore<dyn KeyValueStore>, cmd: SessionCommand) -> Result<()> {
    match cmd {
        SessionCommand::Show => {
            let profile = prefs.current_profile();
            println!("logged in:  {}", prefs.is_logged_in());
            println!("name:       {}", profile.name);
            println!("email:      {}", profile.email);
            println!("username:   {}", profile.username);
            if profile.has_photo() {
                println!("photo:      {}", profile.photo_url);
            }
            if let Some(registered) = prefs.registered_user() {
                println!("registered: {}", registered.id);
            }
        }
        SessionCommand::Register(user) => {
            let record = UserRecord::from(user);
            prefs.set_registered_user(record.clone()).await?;
            print_json(&record)?;
        }
        SessionCommand::Login(user) => {
            let record = UserRecord::from(user);
            prefs.set_logged_in_user(record.clone()).await?;
            println!("Logged in as {}", prefs.current_profile().username);
        }
        SessionCommand::Logout => {
            prefs.logout().await?;
            println!("Logged out.");
        }
    }
    Ok(())
}

async fn run_recent(store: &Arc<dyn KeyValueStore>, settings: &Settings, cmd: RecentCommand) -> Result<()> {
    match cmd {
        RecentCommand::List { key } => {
            let entries = recency_list(store, &key, settings).load().await;
            if entries.is_empty() {
                println!("No recent searches.");
            }
            for entry in entries {
                println!("{:>6}  {}  ({})", entry.id.to_string(), entry.title, entry.category);
            }
        }
        RecentCommand::Add { key, id, title, category } => {
            let entry = RecipeSummary::new(parse_recipe_id(&id), title).with_category(category);
            let entries = recency_list(store, &key, settings).try_add(entry).await?;
            println!("{} entries in {}", entries.len(), key);
        }
        RecentCommand::Clear { key } => {
            recency_list(store, &key, settings).try_clear().await?;
            println!("Cleared {}.", key);
        }
    }
    Ok(())
}

async fn run_search(
    prefs: &PreferenceStore<dyn KeyValueStore>,
    store: &Arc<dyn KeyValueStore>,
    settings: &Settings,
    args: SearchArgs,
) -> Result<()> {
    let raw = tokio::fs::read_to_string(&args.catalog)
        .await
        .with_context(|| format!("Failed to read {}", args.catalog.display()))?;
    let catalog = load_catalog(&raw)?;

    let mut query = RecipeQuery::new(args.text);
    if let Some(category) = args.category {
        query = query.in_category(category);
    }
    let hits = query.filter(&catalog);

    let fast_mode = prefs.flag(Preference::FastMode).await;
    for recipe in &hits {
        match (&recipe.image_name, fast_mode) {
            (Some(image), false) => println!("{:>6}  {}  [{}]", recipe.id.to_string(), recipe.title, image),
            _ => println!("{:>6}  {}", recipe.id.to_string(), recipe.title),
        }
    }

    if let Some(pick) = args.pick {
        let id = parse_recipe_id(&pick);
        let picked = hits
            .iter()
            .find(|r| r.id == id)
            .with_context(|| format!("No matching recipe with id {}", pick))?;
        recency_list(store, SEARCH_HISTORY_KEY, settings)
            .try_add((*picked).clone())
            .await?;
        println!("Saved {} to search history.", picked.title);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env_file();
    let args = Args::parse();

    setup_tracing(args.tracing);

    let mut settings = Settings::load();
    if let Some(dir) = args.data_dir {
        PathManager::set_data_dir(dir.clone());
        settings.data_dir = Some(dir);
    }
    if let Some(backend) = args.backend {
        settings.backend = backend.into();
    }
    tracing::debug!("Settings: {:?}", settings);

    let store = open_store(&settings).await?;
    let prefs = PreferenceStore::new(store.clone());
    prefs.initialize().await;

    match args.command {
        Command::Prefs(cmd) => run_prefs(&prefs, cmd).await?,
        Command::Session(cmd) => run_session(&prefs, cmd).await?,
        Command::Recent(cmd) => run_recent(&store, &settings, cmd).await?,
        Command::Search(search) => run_search(&prefs, &store, &settings, search).await?,
    }

    prefs.shutdown();
    Ok(())
}
