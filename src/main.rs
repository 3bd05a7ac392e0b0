use std::io::{BufRead, Write};
use std::time::Duration;

use linkboard::config::{self, BoardConfig};
use linkboard::core::filter::{CategoryFilter, EmptyReason, Projection, categories};
use linkboard::core::row::DisplayRow;
use linkboard::sync::{BoardState, RestStore, SyncController, SyncStatus};

const ADMIN_TOKEN_ENV: &str = "LINKBOARD_ADMIN_TOKEN";

type Board = SyncController<RestStore>;
type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Watch,
    List,
    Add {
        title: String,
        url: String,
        category: String,
    },
    Delete {
        id: i64,
        confirmed: bool,
    },
    Theme,
}

#[derive(Debug, PartialEq, Eq)]
struct Invocation {
    command: Command,
    category: Option<String>,
    search: Option<String>,
}

const USAGE: &str = "usage: linkboard [watch|list|add TITLE URL [CATEGORY]|delete ID [--yes]|theme] \
[--category NAME] [--search TEXT]";

fn parse_args(args: &[String]) -> Result<Invocation, String> {
    let mut positional: Vec<&str> = Vec::new();
    let mut category = None;
    let mut search = None;
    let mut confirmed = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--category" => category = Some(iter.next().ok_or(USAGE)?.clone()),
            "--search" => search = Some(iter.next().ok_or(USAGE)?.clone()),
            "--yes" | "-y" => confirmed = true,
            "--help" | "-h" => return Err(USAGE.to_string()),
            other => positional.push(other),
        }
    }

    let command = match positional.as_slice() {
        [] | ["watch"] => Command::Watch,
        ["list"] => Command::List,
        ["add", title, url] => Command::Add {
            title: title.to_string(),
            url: url.to_string(),
            category: String::new(),
        },
        ["add", title, url, category] => Command::Add {
            title: title.to_string(),
            url: url.to_string(),
            category: category.to_string(),
        },
        ["delete", id] => Command::Delete {
            id: id.parse().map_err(|_| format!("invalid link id: {}", id))?,
            confirmed,
        },
        ["theme"] => Command::Theme,
        _ => return Err(USAGE.to_string()),
    };

    Ok(Invocation {
        command,
        category,
        search,
    })
}

/// Journal logging: linkboard at info/debug (per config), everything else at warn.
fn init_logging(debug: bool) -> CliResult<()> {
    struct FilteredJournal {
        inner: systemd_journal_logger::JournalLog,
    }

    impl log::Log for FilteredJournal {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            if metadata.target().starts_with("linkboard") {
                let max = if linkboard::debug_logging() {
                    log::LevelFilter::Debug
                } else {
                    log::LevelFilter::Info
                };
                metadata.level() <= max
            } else {
                metadata.level() <= log::LevelFilter::Warn
            }
        }
        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                self.inner.log(record);
            }
        }
        fn flush(&self) {
            self.inner.flush();
        }
    }

    let journal = systemd_journal_logger::JournalLog::new()?
        .with_syslog_identifier("linkboard".to_string());

    linkboard::set_debug_logging(debug);

    log::set_boxed_logger(Box::new(FilteredJournal { inner: journal }))?;
    // Global max must be Debug so linkboard debug logs can pass through when toggled
    log::set_max_level(log::LevelFilter::Debug);
    Ok(())
}

fn print_board(state: &BoardState) {
    let now = chrono::Utc::now();

    let tabs = categories(&state.links);
    if !tabs.is_empty() {
        println!("[{}] {}", state.view.category.label(), tabs.join(" | "));
    }
    if !state.view.search.is_empty() {
        println!("search: {}", state.view.search);
    }

    match state.projection.empty_reason(state.links.len()) {
        Some(EmptyReason::NoRecords) => println!("No links yet."),
        Some(EmptyReason::NoMatches) => println!("No links match the current filter."),
        None => {
            for row in DisplayRow::build_all(&state.projection.links, now) {
                let domain = if row.domain.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", row.domain)
                };
                println!(
                    "#{:<3} {}{}  [{}]  id={}  {}",
                    row.position, row.title, domain, row.tag, row.id, row.age
                );
                println!("     {}", row.url);
            }
        }
    }

    match &state.status {
        SyncStatus::Error(e) => println!("! {}", e),
        SyncStatus::LastSynced(at) => println!("{} synced {}", state.view.theme.icon(), at),
        SyncStatus::Idle | SyncStatus::Syncing => {}
    }
}

fn prompt(question: &str) -> CliResult<String> {
    eprint!("{}", question);
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

fn admin_token() -> CliResult<String> {
    match std::env::var(ADMIN_TOKEN_ENV) {
        Ok(token) if !token.is_empty() => Ok(token),
        _ => prompt("Admin secret: "),
    }
}

fn require_store(board: &Board) -> CliResult<()> {
    if board.is_ready() {
        Ok(())
    } else {
        Err(format!(
            "no link store configured: set {} and {} or run linkboard-login",
            config::ENV_STORE_URL,
            config::ENV_STORE_KEY
        )
        .into())
    }
}

async fn watch(board: &Board, period: Duration) -> CliResult<()> {
    let mut updates = board.subscribe();
    let (first, handle) = board.start(period).await;
    if let Err(e) = first {
        log::error!("Initial load failed: {}", e);
    }

    let mut shown: Projection = updates.borrow_and_update().projection.clone();
    print_board(&updates.borrow());

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                let failed = matches!(state.status, SyncStatus::Error(_));
                if state.projection != shown || failed {
                    println!();
                    print_board(&state);
                    shown = state.projection;
                }
            }
        }
    }

    handle.stop().await;
    Ok(())
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let config_path = BoardConfig::default_path();
    let mut config = match BoardConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Ignoring {}: {}", config_path.display(), e);
            BoardConfig::default()
        }
    };

    init_logging(config.debug_logging)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = parse_args(&args)?;

    let board = Board::from_config(&config);

    match config::load_store_secrets().await {
        Ok(Some(secrets)) => {
            let store = RestStore::new(&secrets, &config.collection, config.request_timeout())?;
            board.attach_store(store);
        }
        Ok(None) => log::warn!("No link store credentials found"),
        Err(e) => log::error!("Failed to load link store credentials: {}", e),
    }

    if let Some(category) = &invocation.category {
        board.set_category(CategoryFilter::from_label(category));
    }
    if let Some(search) = invocation.search {
        board.set_search(search);
    }

    match invocation.command {
        Command::Watch => {
            require_store(&board)?;
            watch(&board, config.refresh_interval()).await?;
        }
        Command::List => {
            require_store(&board)?;
            board.refresh(false).await?;
            print_board(&board.snapshot());
        }
        Command::Add {
            title,
            url,
            category,
        } => {
            require_store(&board)?;
            board.add_record(&title, &url, &category).await?;
            println!("Published: {}", title.trim());
            print_board(&board.snapshot());
        }
        Command::Delete { id, confirmed } => {
            require_store(&board)?;
            let token = admin_token()?;
            if !confirmed {
                let answer = prompt(&format!("Delete link {}? [y/N] ", id))?;
                if !answer.eq_ignore_ascii_case("y") {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            board.delete_record(id, &token).await?;
            println!("Deleted link {}", id);
            print_board(&board.snapshot());
        }
        Command::Theme => {
            let theme = board.cycle_theme();
            config.theme = theme;
            config.save(&config_path)?;
            println!("{} {}", theme.icon(), theme.as_str());
        }
    }

    Ok(())
}
