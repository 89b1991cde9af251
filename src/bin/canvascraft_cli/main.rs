// ABOUTME: CanvasCraft CLI - command-line front end for the painting gallery backend
// ABOUTME: Generates paintings, manages comments and likes, and lists gallery records as JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI
//!
//! Usage:
//! ```bash
//! # Generate a painting
//! canvascraft-cli generate --prompt "sunset over hills" --category oil --subtype landscape --requester u1
//!
//! # Imagine a description for a title
//! canvascraft-cli detail "A lighthouse at dawn"
//!
//! # Comment on a painting and get the AI painter's reply
//! canvascraft-cli comment create --painting <id> --author fan@example.com --text "Love the colors!"
//!
//! # Edit or delete a comment
//! canvascraft-cli comment edit <comment-id> --text "Love the light even more"
//! canvascraft-cli comment delete <comment-id>
//!
//! # Like or unlike a painting
//! canvascraft-cli like painting <id> --user fan@example.com
//!
//! # Browse the gallery (no API keys needed)
//! canvascraft-cli paintings list --limit 10
//! canvascraft-cli comment list --painting <id>
//!
//! # Check the text model credentials
//! canvascraft-cli health
//! ```

mod commands;
mod helpers;

use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use canvascraft_server::{
    config::{DatabaseUrl, ServerConfig},
    errors::AppResult,
    logging::LoggingConfig,
};
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "canvascraft-cli",
    about = "CanvasCraft AI gallery CLI",
    long_about = "Command-line front end for generating AI paintings, commenting, and liking."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Generate a painting from a prompt
    Generate {
        /// What the painting is about
        #[arg(long)]
        prompt: String,

        /// Painting category (e.g. oil, watercolor)
        #[arg(long)]
        category: String,

        /// Painting subtype (e.g. landscape, portrait)
        #[arg(long)]
        subtype: String,

        /// Requesting user
        #[arg(long)]
        requester: String,
    },

    /// Imagine a painting description for a title
    Detail {
        /// Painting title
        title: String,
    },

    /// Painting queries
    Paintings {
        #[command(subcommand)]
        action: PaintingCommand,
    },

    /// Comment management
    Comment {
        #[command(subcommand)]
        action: CommentCommand,
    },

    /// Like or unlike a painting or comment
    Like {
        /// What is being liked
        #[arg(value_enum)]
        kind: LikeKind,

        /// Painting or comment ID
        id: String,

        /// Liking user
        #[arg(long)]
        user: String,
    },

    /// Show the effective configuration with secrets redacted
    Config,

    /// Check that the text model is reachable with the configured key
    Health,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum PaintingCommand {
    /// List ready paintings, newest first
    List {
        /// Maximum number of paintings
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Show one painting
    Get {
        /// Painting ID
        id: String,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum CommentCommand {
    /// Comment on a painting
    Create {
        /// Painting ID
        #[arg(long)]
        painting: String,

        /// Author email
        #[arg(long)]
        author: String,

        /// Comment text
        #[arg(long)]
        text: String,
    },

    /// Replace a comment's text and regenerate the reply
    Edit {
        /// Comment ID
        id: String,

        /// New comment text
        #[arg(long)]
        text: String,
    },

    /// Delete a comment
    Delete {
        /// Comment ID
        id: String,
    },

    /// List comments on a painting or by an author
    List {
        /// Painting ID
        #[arg(long, conflicts_with = "author", required_unless_present = "author")]
        painting: Option<String>,

        /// Author email
        #[arg(long)]
        author: Option<String>,

        /// Maximum number of comments
        #[arg(long)]
        limit: Option<u32>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LikeKind {
    /// A painting
    Painting,
    /// A comment on a painting
    Comment,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging.level = "debug".into();
    }
    if let Err(e) = logging.init() {
        eprintln!("Failed to initialize logging: {e:#}");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            helpers::output::print_error(e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let mut config = ServerConfig::from_env()?;
    if let Some(url) = cli.database_url {
        config.database = DatabaseUrl::parse_url(&url)?;
    }
    debug!("{}", config.summary());

    match cli.command {
        Command::Generate {
            prompt,
            category,
            subtype,
            requester,
        } => commands::generate(&config, prompt, category, subtype, requester).await,
        Command::Detail { title } => commands::detail(&config, &title).await,
        Command::Paintings { action } => match action {
            PaintingCommand::List { limit } => commands::list_paintings(&config, limit).await,
            PaintingCommand::Get { id } => commands::get_painting(&config, &id).await,
        },
        Command::Comment { action } => match action {
            CommentCommand::Create {
                painting,
                author,
                text,
            } => commands::create_comment(&config, &painting, &author, &text).await,
            CommentCommand::Edit { id, text } => commands::edit_comment(&config, &id, &text).await,
            CommentCommand::Delete { id } => commands::delete_comment(&config, &id).await,
            CommentCommand::List {
                painting,
                author,
                limit,
            } => commands::list_comments(&config, painting, author, limit).await,
        },
        Command::Like { kind, id, user } => {
            let target = match kind {
                LikeKind::Painting => canvascraft_server::models::LikeTarget::Painting(id),
                LikeKind::Comment => canvascraft_server::models::LikeTarget::Comment(id),
            };
            commands::toggle_like(&config, &target, &user).await
        }
        Command::Config => {
            println!("{}", config.summary());
            Ok(())
        }
        Command::Health => commands::health(&config).await,
    }
}
