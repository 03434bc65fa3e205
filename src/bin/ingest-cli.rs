#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

use clap::{Args, Parser, Subcommand};
use ingest_server::client::{ApiClient, ClientError, DEFAULT_SERVER_URL};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing_subscriber::EnvFilter;

/// Command-line front end for the ingest server
#[derive(Debug, Parser)]
#[command(name = "ingest-cli", version, about)]
struct Cli {
    /// Base URL of the ingest server
    #[arg(long, env = "INGEST_SERVER_URL", default_value = DEFAULT_SERVER_URL, global = true)]
    server_url: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register a new user
    Register(RegisterArgs),
    /// Upload a CSV file for a user
    Upload(UploadArgs),
    /// List registered users
    Users,
    /// Show the rows uploaded by a user
    Show(ShowArgs),
    /// Menu-driven session (default)
    Interactive,
}

#[derive(Debug, Args)]
struct RegisterArgs {
    #[arg(short, long)]
    username: String,
    #[arg(short, long)]
    password: String,
}

#[derive(Debug, Args)]
struct UploadArgs {
    #[arg(short, long)]
    username: String,
    /// Path to the CSV file
    #[arg(short, long)]
    file: PathBuf,
}

#[derive(Debug, Args)]
struct ShowArgs {
    #[arg(short, long)]
    username: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = ApiClient::new(&cli.server_url)?;

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Register(args) => report(client.register(&args.username, &args.password).await),
        Command::Upload(args) => report(client.upload(&args.username, &args.file).await),
        Command::Users => list_users(&client).await,
        Command::Show(args) => show_user(&client, &args.username).await,
        Command::Interactive => interactive(&client).await?,
    }

    Ok(())
}

fn report(result: Result<String, ClientError>) {
    match result {
        Ok(message) => println!("{message}"),
        Err(e) => println!("Error: {e}"),
    }
}

async fn list_users(client: &ApiClient) {
    match client.list_users().await {
        Ok(users) => {
            println!("Registered users:");
            for user in users {
                println!("- {user}");
            }
        }
        Err(e) => println!("Failed to fetch users: {e}"),
    }
}

async fn show_user(client: &ApiClient, username: &str) {
    match client.user_data(username).await {
        Ok(rows) => {
            println!("Data for user {username}:");
            for row in rows {
                println!("{row}");
            }
        }
        Err(e) => println!("Error: {e}"),
    }
}

async fn prompt<R: AsyncBufRead + Unpin>(lines: &mut Lines<R>, label: &str) -> anyhow::Result<Option<String>> {
    Ok(prompt_raw(lines, label).await?.map(|line| line.trim().to_string()))
}

/// Like `prompt`, but keeps surrounding whitespace, which is significant in a password.
/// The line is still echoed.
async fn prompt_secret<R: AsyncBufRead + Unpin>(lines: &mut Lines<R>, label: &str) -> anyhow::Result<Option<String>> {
    prompt_raw(lines, label).await
}

async fn prompt_raw<R: AsyncBufRead + Unpin>(lines: &mut Lines<R>, label: &str) -> anyhow::Result<Option<String>> {
    print!("{label}: ");
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?)
}

async fn interactive(client: &ApiClient) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!();
        println!("Choose an action:");
        println!("  1. Register a user");
        println!("  2. Upload a CSV file");
        println!("  3. List users");
        println!("  4. Show user data");
        println!("  5. Exit");

        let Some(choice) = prompt(&mut lines, "Selection").await? else {
            return Ok(());
        };

        match choice.as_str() {
            "1" => {
                let Some(username) = prompt(&mut lines, "Username").await? else { return Ok(()) };
                let Some(password) = prompt_secret(&mut lines, "Password").await? else { return Ok(()) };
                report(client.register(&username, &password).await);
            }
            "2" => {
                let Some(username) = prompt(&mut lines, "Username").await? else { return Ok(()) };
                let Some(path) = prompt(&mut lines, "Path to CSV file").await? else { return Ok(()) };
                report(client.upload(&username, &PathBuf::from(path)).await);
            }
            "3" => list_users(client).await,
            "4" => {
                let Some(username) = prompt(&mut lines, "Username").await? else { return Ok(()) };
                show_user(client, &username).await;
            }
            "5" | "q" | "quit" | "exit" => return Ok(()),
            other => println!("Unknown option: {other}"),
        }
    }
}
