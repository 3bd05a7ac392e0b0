use std::io::{BufRead, Write};
use std::time::Duration;

use linkboard::config::{BoardConfig, StoreSecrets};
use linkboard::sync::keyring;
use linkboard::sync::{LinkStore, RestStore};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const USAGE: &str = "usage: linkboard-login ENDPOINT | --admin | --forget";

fn read_line(label: &str) -> CliResult<String> {
    eprint!("{}: ", label);
    std::io::stderr().flush()?;
    read_answer(&mut std::io::stdin().lock())
}

fn read_answer(input: &mut impl BufRead) -> CliResult<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err("no input".into());
    }
    Ok(line.trim().to_string())
}

fn non_empty(value: String, what: &str) -> CliResult<String> {
    if value.is_empty() {
        Err(format!("{} must not be empty", what).into())
    } else {
        Ok(value)
    }
}

fn save_admin_secret(config_path: &std::path::Path) -> CliResult<()> {
    let secret = non_empty(read_line("New admin secret")?, "admin secret")?;
    let hash = linkboard::auth::hash_admin_secret(&secret)
        .map_err(|e| format!("hashing failed: {}", e))?;

    let mut config = BoardConfig::load(config_path)?;
    config.admin_secret_hash = Some(hash);
    config.save(config_path)?;
    println!("Admin secret updated in {}", config_path.display());
    Ok(())
}

async fn save_credentials(endpoint: &str, config_path: &std::path::Path) -> CliResult<()> {
    let api_key = non_empty(read_line("Store access key")?, "access key")?;
    let secrets = StoreSecrets {
        endpoint: endpoint.trim_end_matches('/').to_string(),
        api_key,
    };

    // Check the credentials work before saving them
    let config = BoardConfig::load(config_path)?;
    let store = RestStore::new(&secrets, &config.collection, Duration::from_secs(10))?;
    let links = store
        .fetch_all()
        .await
        .map_err(|e| format!("could not read '{}': {}", config.collection, e))?;
    println!("Connected: {} links in '{}'", links.len(), config.collection);

    keyring::store_credentials(&secrets).await?;
    println!("Credentials saved to the system keyring.");
    Ok(())
}

#[tokio::main]
async fn main() -> CliResult<()> {
    systemd_journal_logger::JournalLog::new()
        .and_then(|journal| {
            journal
                .with_syslog_identifier("linkboard-login".to_string())
                .install()
                .map_err(std::io::Error::other)
        })
        .unwrap_or_else(|e| eprintln!("Journal logging unavailable: {}", e));
    log::set_max_level(log::LevelFilter::Info);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config_path = BoardConfig::default_path();

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["--forget"] => {
            keyring::delete_credentials().await?;
            println!("Removed stored link store credentials.");
            Ok(())
        }
        ["--admin"] => save_admin_secret(&config_path),
        [endpoint] if !endpoint.starts_with('-') => save_credentials(endpoint, &config_path).await,
        _ => Err(USAGE.into()),
    }
}
