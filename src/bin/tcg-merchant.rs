//! Command-line front end for the merchant back-office.
//!
//! Every subcommand goes through the same view-models a graphical client
//! would use, so notices are printed exactly as they would be toasted.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing::error;

use tcg_merchant_sdk::models::{
    BulkConfig, CardCondition, CatalogScope, InventoryFilters, Nationality, RequestFilter,
    RequestStatus, RequestType, ShareKind, SharePage, TemplateFilters, UploadFile,
};
use tcg_merchant_sdk::views::{
    InventoryBrowser, LoginForm, Notice, NoticeLevel, PollingFeed, RequestInbox, ReservationBoard,
};
use tcg_merchant_sdk::{ClientError, MerchantClient, Result};

#[derive(Parser, Debug)]
#[command(name = "tcg-merchant")]
#[command(about = "Merchant back-office for the TCG marketplace", long_about = None)]
struct Cli {
    /// API base URL (defaults to $TCG_API_BASE_URL, then the public API)
    #[arg(long, global = true)]
    api: Option<String>,

    /// Log filter, overridden by RUST_LOG
    #[arg(long, global = true, default_value = "warn,tcg_merchant_sdk=info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session
    Login { username: String, password: String },
    /// Forget the stored session
    Logout,
    /// Show the signed-in merchant
    Whoami,
    /// List the shop's stock
    Inventory {
        #[arg(long)]
        search: Option<String>,
    },
    /// Search the card-template catalog
    Templates {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        set: Option<String>,
        #[arg(long)]
        expansion: Option<i64>,
        /// Pages to fetch
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// List customer requests
    Requests {
        #[arg(long, value_parser = parse_tag::<RequestStatus>)]
        status: Option<RequestStatus>,
        #[arg(long = "type", value_parser = parse_tag::<RequestType>)]
        request_type: Option<RequestType>,
    },
    /// Open a request's conversation and follow it until Ctrl-C
    Chat {
        request_id: i64,
        /// Send this message first
        #[arg(long)]
        send: Option<String>,
    },
    /// Move a request to a new status
    Status {
        request_id: i64,
        #[arg(value_parser = parse_tag::<RequestStatus>)]
        status: RequestStatus,
    },
    /// List reservations
    Reservations,
    /// Validate a reservation code
    Validate { code: String },
    /// Add cards in bulk, by template ids or by catalog scope
    BulkAdd {
        #[arg(long, value_delimiter = ',', conflicts_with = "expansion")]
        templates: Vec<i64>,
        #[arg(long)]
        expansion: Option<i64>,
        #[arg(long, requires = "expansion")]
        set: Option<String>,
        #[arg(long, default_value = "NEAR_MINT", value_parser = parse_tag::<CardCondition>)]
        condition: CardCondition,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        #[arg(long, default_value_t = 0.0)]
        price: f64,
        #[arg(long, default_value = "ENG", value_parser = parse_tag::<Nationality>)]
        nationality: Nationality,
    },
    /// Import stock from a file
    Import {
        path: std::path::PathBuf,
        /// Queue any document for manual processing instead of a CSV import
        #[arg(long)]
        custom: bool,
        #[arg(long, requires = "custom")]
        notes: Option<String>,
    },
    /// Print the app deep link and web link of a public page
    Share { kind: String, id: i64 },
}

/// Parse an API enum tag (`near_mint`, `PRICE_CHECK`, ...) through serde.
fn parse_tag<T: DeserializeOwned>(s: &str) -> std::result::Result<T, String> {
    let tag = s.trim().to_ascii_uppercase().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(tag)).map_err(|e| e.to_string())
}

fn init_logger(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        let tag = match notice.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        println!("[{}] {}", tag, notice.message);
        for line in notice.details {
            println!("    {}", line);
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(&cli.log_level);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut builder = MerchantClient::builder();
    if let Some(api) = cli.api {
        builder = builder.base_url(api);
    }
    let client = builder.build()?;

    match cli.command {
        Command::Login { username, password } => {
            let mut form = LoginForm::new(username, password);
            match form.submit(&client).await {
                Some(route) => println!("Signed in. Continue at {}", route.path()),
                None => {
                    return Err(ClientError::Unauthorized(
                        form.error.unwrap_or_default(),
                    ))
                }
            }
        }
        Command::Logout => {
            client.auth().logout();
            println!("Signed out");
        }
        Command::Whoami => match client.session().current() {
            Some(s) => println!(
                "{} (shop {})",
                s.user.username,
                s.user
                    .shop_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "-".to_string())
            ),
            None => println!("Not signed in"),
        },
        Command::Inventory { search } => {
            let browser = InventoryBrowser::mount(Arc::new(client.clone()), client.session())?;
            match search {
                Some(text) => browser.search_now(text).await,
                None => browser.apply_filters(InventoryFilters::default()).await,
            };
            for item in browser.items() {
                let name = item
                    .card_template
                    .as_ref()
                    .map(|t| t.name.as_str())
                    .unwrap_or("?");
                println!(
                    "{:>6}  {:<32} {:<12} {:>3} x {:>8.2}  {}",
                    item.id,
                    name,
                    item.condition.as_str(),
                    item.quantity,
                    item.price,
                    item.nationality.as_str()
                );
            }
            print_notices(browser.take_notices());
        }
        Command::Templates {
            name,
            set,
            expansion,
            pages,
        } => {
            let browser = InventoryBrowser::mount(Arc::new(client.clone()), client.session())?;
            browser
                .search_templates(TemplateFilters {
                    name,
                    set_name: set,
                    expansion_id: expansion,
                    ..TemplateFilters::default()
                })
                .await;
            for _ in 1..pages {
                if !browser.load_more().await {
                    break;
                }
            }
            let state = browser.snapshot();
            for t in &state.templates {
                println!(
                    "{:>6}  {:<32} {:<20} {}",
                    t.id,
                    t.name,
                    t.set_name.as_deref().unwrap_or("-"),
                    t.rarity.as_deref().unwrap_or("-")
                );
            }
            if state.has_more_templates {
                println!("(more results available)");
            }
            print_notices(browser.take_notices());
        }
        Command::Requests {
            status,
            request_type,
        } => {
            let mut inbox = RequestInbox::mount(Arc::new(client.clone()), client.session())?;
            inbox
                .refresh(RequestFilter {
                    request_type,
                    status,
                })
                .await;
            for r in inbox.requests() {
                println!(
                    "{:>6} {} {:<12} {:<10} {} ({} messages)",
                    r.id,
                    if r.has_unread_messages { "*" } else { " " },
                    r.request_type.as_str(),
                    r.status.as_str(),
                    r.title,
                    r.message_count
                );
            }
            print_notices(inbox.take_notices());
        }
        Command::Chat { request_id, send } => {
            let backend = Arc::new(client.clone());
            let mut inbox = RequestInbox::mount(backend.clone(), client.session())?;
            inbox.reload().await;
            print_notices(inbox.take_notices());
            let feed = PollingFeed::new(backend);
            let mut conversation = inbox.open(request_id, &feed).await?;

            if let Some(text) = send {
                conversation.set_draft(text);
                conversation.send().await;
            }

            let gate = conversation.gate();
            println!(
                "Request {} [{}]{}",
                request_id,
                gate.badge,
                if gate.composer_enabled { "" } else { " (closed)" }
            );

            let mut shown = 0;
            loop {
                let messages = conversation.messages();
                for m in messages.iter().skip(shown) {
                    println!(
                        "{} {:?}: {}",
                        m.created_at.format("%Y-%m-%d %H:%M"),
                        m.sender_type,
                        m.content
                    );
                }
                shown = messages.len();
                print_notices(conversation.take_notices());
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    _ = tokio::time::sleep(std::time::Duration::from_secs(1)) => {}
                }
            }
            conversation.close();
        }
        Command::Status { request_id, status } => {
            let updated = client.requests().update_status(request_id, status).await?;
            println!("Request {} is now {}", updated.id, updated.status.as_str());
        }
        Command::Reservations => {
            let mut board = ReservationBoard::mount(&client)?;
            board.refresh().await;
            for row in board.rows(chrono::Utc::now()) {
                println!(
                    "{:>6}  {:<28} {:<20} {:<10?} {}  {}",
                    row.id, row.card, row.customer, row.status, row.code, row.expires_in
                );
            }
            print_notices(board.take_notices());
        }
        Command::Validate { code } => {
            let mut board = ReservationBoard::mount(&client)?;
            board.validate(&code).await;
            print_notices(board.take_notices());
        }
        Command::BulkAdd {
            templates,
            expansion,
            set,
            condition,
            quantity,
            price,
            nationality,
        } => {
            let config = BulkConfig {
                condition,
                quantity,
                price,
                nationality,
            };
            let browser = InventoryBrowser::mount(Arc::new(client.clone()), client.session())?;
            match expansion {
                Some(expansion_id) => {
                    let scope = CatalogScope::from_selection(expansion_id, set.as_deref());
                    browser.bulk_add_scope(scope, config).await;
                }
                None => {
                    for id in templates {
                        browser.toggle_selected(id);
                    }
                    browser.bulk_add_selected(config).await;
                }
            }
            print_notices(browser.take_notices());
        }
        Command::Import {
            path,
            custom,
            notes,
        } => {
            let file = UploadFile::from_path(&path).await?;
            let browser = InventoryBrowser::mount(Arc::new(client.clone()), client.session())?;
            if custom {
                browser.import_custom(file, notes).await;
            } else {
                browser.import_csv(file).await;
            }
            print_notices(browser.take_notices());
        }
        Command::Share { kind, id } => {
            let kind = ShareKind::parse(&kind).ok_or_else(|| {
                ClientError::InvalidArgument(format!("unknown page kind '{}'", kind))
            })?;
            let page = SharePage::new(kind, id);
            let preview = client.public().raw(kind, id).await?;
            let title = preview
                .get("name")
                .or_else(|| preview.get("title"))
                .and_then(|v| v.as_str())
                .unwrap_or("-");
            println!("{}", title);
            println!("app: {}", page.deep_link());
            println!("web: {}", page.web_url());
        }
    }
    Ok(())
}
