use std::process::ExitCode;

use anyhow::Context;
use bookshelf_app::books::{self, BookNotId, BookRepository, ModelError};
use bookshelf_db::Database;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "bookshelf", version, about = "Manage the books store")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every book
    List,
    /// Show one book
    Get { id: Uuid },
    /// Create a book and print its id
    Create(BookArgs),
    /// Replace every field of a book
    Update {
        id: Uuid,
        #[command(flatten)]
        book: BookArgs,
    },
    /// Delete a book (no error when it does not exist)
    Delete { id: Uuid },
    /// Check that the store is reachable
    Check,
}

#[derive(Args, Debug)]
struct BookArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    author: String,
    /// Repeat for several categories
    #[arg(long = "category")]
    categories: Vec<String>,
    #[arg(long)]
    link: String,
    #[arg(long)]
    year: i32,
    #[arg(long = "image-url")]
    image_url: String,
}

impl From<BookArgs> for BookNotId {
    fn from(args: BookArgs) -> Self {
        BookNotId {
            title: args.title,
            author: args.author,
            categories: args.categories,
            link: args.link,
            year: args.year,
            image_url: args.image_url,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(env = ?settings.environment, "bookshelf starting");

    let db = Database::connect(&settings.database)
        .await
        .with_context(|| "failed to connect to the books store")?;

    let books_module = books::create_module(db.clone());
    let mut registry = ModuleRegistry::new();
    registry.register(books_module.clone());

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;

    let outcome = run(cli.command, books_module.repository().as_ref()).await;

    registry.stop_all().await?;
    db.close().await;

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => match err.downcast_ref::<ModelError>() {
            Some(model_err) => {
                tracing::warn!(error = %model_err, "command failed");
                eprintln!("{}", serde_json::to_string(&model_err.body())?);
                Ok(ExitCode::FAILURE)
            }
            None => Err(err),
        },
    }
}

async fn run(command: Command, repo: &dyn BookRepository) -> anyhow::Result<()> {
    match command {
        Command::List => {
            let books = repo.get_all().await?;
            print_json(&books)?;
        }
        Command::Get { id } => {
            let book = repo.get_by_id(id).await?;
            print_json(&book)?;
        }
        Command::Create(args) => {
            let id = repo.create_book(args.into()).await?;
            print_json(&serde_json::json!({ "id": id }))?;
        }
        Command::Update { id, book } => {
            repo.update_book(id, book.into()).await?;
            print_json(&serde_json::json!({ "updated": id }))?;
        }
        Command::Delete { id } => {
            repo.delete(id).await?;
            print_json(&serde_json::json!({ "deleted": id }))?;
        }
        Command::Check => {
            print_json(&serde_json::json!({ "status": "ok" }))?;
        }
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
