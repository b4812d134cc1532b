use clap::{Parser, Subcommand};
use database::connection::connect;
use database::repository::PollRepository;
use database::schema::ensure_schema;
use tracing_subscriber::EnvFilter;

mod menu;

/// The main entry point for the pollbox polling application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from an optional .env file, then configure
    // logging from RUST_LOG before anything can emit events.
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Settings are read exactly once and handed to the connection layer by
    // reference; nothing reads the environment after this point.
    let settings = configuration::load_settings()?;
    let pool = connect(&settings).await?;
    ensure_schema(&pool).await?;
    let repo = PollRepository::new(pool);

    // Execute the appropriate command
    match cli.command {
        Some(Commands::Create {
            title,
            owner,
            options,
        }) => {
            let poll_id = repo.create_poll(&title, &owner, &options).await?;
            println!("Created poll {poll_id}.");
        }
        Some(Commands::List) => menu::list_polls(&repo).await?,
        Some(Commands::Vote {
            username,
            option_id,
        }) => menu::cast_vote(&repo, &username, option_id).await?,
        Some(Commands::Results { poll_id }) => menu::show_poll_votes(&repo, poll_id).await?,
        Some(Commands::Winner { option_id }) => menu::announce_winner(&repo, option_id).await?,
        None => menu::run(&repo).await?,
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A terminal-driven polling application backed by PostgreSQL.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// One-shot command to run. With no command, the interactive menu starts.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new poll with a set of options.
    Create {
        /// The poll's title.
        #[arg(long)]
        title: String,

        /// The poll owner's username (free text).
        #[arg(long)]
        owner: String,

        /// An option's text; repeat the flag once per option.
        #[arg(long = "option")]
        options: Vec<String>,
    },

    /// List every poll currently stored.
    List,

    /// Cast a vote for a poll option.
    Vote {
        /// The username to vote as (free text).
        #[arg(long)]
        username: String,

        /// The id of the option to vote for.
        #[arg(long)]
        option_id: i32,
    },

    /// Show per-option vote counts and percentages for a poll.
    Results {
        /// The id of the poll to tally.
        poll_id: i32,
    },

    /// Select a random winner among the voters of an option.
    Winner {
        /// The id of the winning option to draw a voter from.
        option_id: i32,
    },
}
