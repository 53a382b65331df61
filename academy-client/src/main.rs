//! academy - command-line client for the Academy portal
//!
//! Quiz, program search, lead submission, checkout and chat from a terminal.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use academy_client::client::DEFAULT_PORTAL_URL;
use academy_client::{ChatPoller, PortalClient};
use academy_common::api::types::{LeadRequest, QuizAnswers};
use academy_common::config::TomlConfig;
use academy_common::{recommend, AgeBracket, Goal, Sport};

const MODULE_NAME: &str = "academy-client";

#[derive(Parser, Debug)]
#[command(name = "academy")]
#[command(about = "Command-line client for the Academy portal")]
#[command(version)]
struct Cli {
    /// Portal base URL
    #[arg(long, env = "ACADEMY_PORTAL_URL", global = true)]
    portal_url: Option<String>,

    /// Config file (defaults to ~/.config/academy/academy-client.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recommend a program from three quiz answers
    Quiz {
        #[arg(long)]
        age: AgeBracket,
        #[arg(long)]
        sport: Sport,
        #[arg(long)]
        goal: Goal,
        /// Evaluate locally without contacting the portal
        #[arg(long)]
        offline: bool,
    },

    /// List programs, optionally filtered
    Programs {
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Submit a contact / free-trial request
    Lead {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        message: Option<String>,
        #[arg(long, requires_all = ["sport", "goal"])]
        age: Option<AgeBracket>,
        #[arg(long)]
        sport: Option<Sport>,
        #[arg(long)]
        goal: Option<Goal>,
    },

    /// Start a hosted checkout for one or more program slugs
    Checkout {
        /// Program slugs; repeat a slug to buy it more than once
        programs: Vec<String>,
        #[arg(long)]
        email: Option<String>,
    },

    /// Chat rooms
    Chat {
        #[command(subcommand)]
        command: ChatCommand,
    },

    /// Signed admin requests
    Admin {
        /// Shared admin secret
        #[arg(long, env = "ACADEMY_ADMIN_SECRET", hide_env_values = true)]
        secret: i64,

        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ChatCommand {
    /// List rooms
    Rooms,
    /// Follow a room, printing new messages as they arrive
    Watch {
        #[arg(long, default_value = "general")]
        room: String,
    },
    /// Post one message
    Send {
        #[arg(long, default_value = "general")]
        room: String,
        #[arg(long)]
        author: String,
        body: String,
    },
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    /// Page through submitted leads
    Leads {
        #[arg(long, default_value_t = 1)]
        page: i64,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<TomlConfig> {
    match path {
        Some(path) => TomlConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(TomlConfig::load_or_default(MODULE_NAME)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("academy_client={}", config.logging.level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let portal_url = cli
        .portal_url
        .or(config.portal_url)
        .unwrap_or_else(|| DEFAULT_PORTAL_URL.to_string());
    let client = PortalClient::new(portal_url).context("Failed to build HTTP client")?;

    match cli.command {
        Command::Quiz {
            age,
            sport,
            goal,
            offline,
        } => {
            let (program, price, path) = if offline {
                let rec = recommend(age, sport, goal);
                (rec.program.to_string(), rec.price.to_string(), rec.cta_path.to_string())
            } else {
                let rec = client
                    .recommend(&QuizAnswers { age, sport, goal })
                    .await
                    .context("Recommendation request failed")?;
                (rec.program, rec.price, rec.cta_path)
            };
            println!("{} ({}) -> {}", program, price, path);
        }

        Command::Programs { search } => {
            let programs = match search.as_deref() {
                Some(q) => client.search_programs(q).await,
                None => client.programs().await,
            }
            .context("Failed to fetch programs")?;

            for program in programs {
                println!(
                    "{:<20} {:>8}  {}",
                    program.slug,
                    program.price_display(),
                    program.name
                );
            }
        }

        Command::Lead {
            name,
            email,
            phone,
            message,
            age,
            sport,
            goal,
        } => {
            let quiz = match (age, sport, goal) {
                (Some(age), Some(sport), Some(goal)) => Some(QuizAnswers { age, sport, goal }),
                _ => None,
            };
            let lead = LeadRequest {
                name,
                email,
                phone,
                message,
                quiz,
                source: Some("cli".to_string()),
            };
            let response = client.submit_lead(&lead).await.context("Lead rejected")?;
            println!("Lead {} received", response.id);
            if let Some(rec) = response.recommendation {
                println!("Recommended: {} ({})", rec.program, rec.price);
            }
        }

        Command::Checkout { programs, email } => {
            let session = client
                .create_checkout(programs, email)
                .await
                .context("Checkout failed")?;
            info!(session_id = %session.session_id, "Checkout session created");
            println!("{}", session.url);
        }

        Command::Chat { command } => run_chat(client, command).await?,

        Command::Admin { secret, command } => {
            let client = client.with_admin_secret(secret);
            match command {
                AdminCommand::Leads { page } => {
                    let leads = client.admin_leads(page).await.context("Admin request failed")?;
                    println!(
                        "Page {}/{} ({} leads)",
                        leads.page, leads.total_pages, leads.total
                    );
                    for lead in leads.items {
                        println!(
                            "{}  {:<24} {:<32} {}",
                            lead.created_at.format("%Y-%m-%d %H:%M"),
                            lead.name,
                            lead.email,
                            lead.recommended_slug.as_deref().unwrap_or("-")
                        );
                    }
                }
            }
        }
    }

    Ok(())
}

async fn run_chat(client: PortalClient, command: ChatCommand) -> Result<()> {
    match command {
        ChatCommand::Rooms => {
            for room in client.chat_rooms().await.context("Failed to list rooms")? {
                println!("{:<16} {}", room.slug, room.name);
            }
        }

        ChatCommand::Send { room, author, body } => {
            let request = academy_common::api::types::SendMessageRequest { author, body };
            let message = client
                .send_message(&room, &request)
                .await
                .context("Failed to send message")?;
            println!("Sent #{}", message.seq);
        }

        ChatCommand::Watch { room } => {
            let poller = ChatPoller::spawn(Arc::new(client), room.clone());
            let mut view = poller.subscribe();
            let mut last_printed = 0;
            info!(room = %room, "Watching chat (Ctrl+C to stop)");

            loop {
                tokio::select! {
                    changed = view.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let snapshot = view.borrow_and_update().clone();
                        for message in snapshot.messages().iter() {
                            if message.seq <= last_printed {
                                continue;
                            }
                            println!(
                                "[{}] {}: {}",
                                message.created_at.format("%H:%M"),
                                message.author,
                                message.body
                            );
                            last_printed = message.seq;
                        }
                    }
                    _ = tokio::signal::ctrl_c() => break,
                }
            }

            poller.stop().await;
        }
    }

    Ok(())
}
