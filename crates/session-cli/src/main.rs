//! session-vault - manage saved SSH sessions from the terminal
//!
//! Shares the catalog, database location and keychain entry with the
//! desktop SSH tool, so sessions saved in one show up in the other.
//! Errors are printed to stderr the way the desktop shell shows message
//! boxes; the process exits non-zero if any were reported.

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

use session_store::{
    AuthMethod, CatalogConfig, KeyringVault, Notifier, SessionCatalog, SessionRecord,
};

/// Encrypted SSH session catalog
#[derive(Parser, Debug)]
#[command(name = "session-vault")]
#[command(version)]
#[command(about = "Manage saved SSH sessions stored encrypted under an OS keychain key")]
struct Args {
    /// Application name; selects the config directory and keychain entry
    #[arg(long, env = "SESSION_VAULT_APP", default_value = "toolsuite")]
    app_name: String,

    /// Directory holding sessions.db (default: <user-config-dir>/<app-name>)
    #[arg(long, env = "SESSION_VAULT_DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List saved sessions
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one session by name
    Show {
        name: String,

        #[arg(long)]
        json: bool,
    },

    /// Save a new session
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        host: String,

        #[arg(long, default_value_t = 22, value_parser = clap::value_parser!(u16).range(1..))]
        port: u16,

        #[arg(long, default_value = "root")]
        username: String,

        /// Prompt for the password and store it with the session
        #[arg(long)]
        save_password: bool,

        /// Private key file used for authentication
        #[arg(long)]
        key_file: Option<String>,
    },

    /// Remove the first session with the given name
    Remove { name: String },

    /// Print the database location
    Path,
}

/// Prints each error once to stderr and remembers how many there were
#[derive(Default)]
struct StderrNotifier {
    reported: AtomicUsize,
}

impl StderrNotifier {
    fn reported(&self) -> usize {
        self.reported.load(Ordering::Relaxed)
    }
}

impl Notifier for StderrNotifier {
    fn notify_error(&self, title: &str, message: &str) {
        self.reported.fetch_add(1, Ordering::Relaxed);
        eprintln!("{}: {}", title, message);
    }
}

fn auth_label(record: &SessionRecord) -> &'static str {
    match record.auth_method() {
        AuthMethod::KeyFile => "key file",
        AuthMethod::Password => "saved password",
        AuthMethod::Prompt => "prompt",
    }
}

/// JSON view of a session; the password itself is never printed
fn session_json(record: &SessionRecord) -> Value {
    json!({
        "name": record.name,
        "host": record.host,
        "port": record.port,
        "username": record.username,
        "password_saved": record.password.as_deref().is_some_and(|p| !p.is_empty()),
        "key_file_path": record.key_file_path,
    })
}

fn print_table(sessions: &[SessionRecord]) {
    if sessions.is_empty() {
        println!("No saved sessions.");
        return;
    }

    let width = sessions.iter().map(|s| s.name.len()).max().unwrap_or(0).max(4);
    println!("{:<width$}  {:<30}  AUTH", "NAME", "TARGET", width = width);
    for session in sessions {
        let target = format!("{}@{}:{}", session.username, session.host, session.port);
        println!(
            "{:<width$}  {:<30}  {}",
            session.name,
            target,
            auth_label(session),
            width = width
        );
    }
}

fn resolve_config(args: &Args) -> session_store::Result<CatalogConfig> {
    match &args.config_dir {
        Some(dir) => CatalogConfig::with_dir(&args.app_name, dir),
        None => CatalogConfig::for_app(&args.app_name),
    }
}

fn run(args: Args, catalog: &SessionCatalog) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        Command::List { json } => {
            let sessions = catalog.load_all();
            if json {
                let values: Vec<Value> = sessions.iter().map(session_json).collect();
                println!("{}", serde_json::to_string_pretty(&values)?);
            } else {
                print_table(&sessions);
            }
        }
        Command::Show { name, json } => match catalog.find(&name)? {
            Some(session) if json => {
                println!("{}", serde_json::to_string_pretty(&session_json(&session))?)
            }
            Some(session) => {
                println!("{}", session);
                println!("  auth: {}", auth_label(&session));
                if let Some(path) = &session.key_file_path {
                    println!("  key file: {}", path);
                }
            }
            None => return Err(format!("No session named {}", name).into()),
        },
        Command::Add {
            name,
            host,
            port,
            username,
            save_password,
            key_file,
        } => {
            if catalog.find(&name)?.is_some() {
                eprintln!("Note: a session named {} already exists; adding another", name);
            }

            let password = if save_password {
                rpassword::prompt_password(format!("Password for {}@{}: ", username, host))?
            } else {
                String::new()
            };

            catalog.save(
                &name,
                &host,
                port,
                &username,
                &password,
                save_password,
                key_file.as_deref(),
            );
        }
        Command::Remove { name } => {
            if !catalog.try_remove(&name)? {
                eprintln!("No session named {}", name);
            }
        }
        Command::Path => println!("{}", catalog.config().database_path().display()),
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let notifier = Arc::new(StderrNotifier::default());

    let catalog = match resolve_config(&args)
        .and_then(|config| SessionCatalog::open(config, &KeyringVault::new()))
    {
        Ok(catalog) => catalog.with_notifier(notifier.clone()),
        Err(e) => {
            notifier.notify_error("Open Sessions", &e.to_string());
            return ExitCode::FAILURE;
        }
    };

    debug!("Using {:?}", catalog.config().database_path());

    if let Err(e) = run(args, &catalog) {
        notifier.notify_error("Error", &e.to_string());
    }

    if notifier.reported() > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use session_store::MemoryVault;
    use tempfile::TempDir;

    #[test]
    fn test_parse_add_defaults() {
        let args = Args::try_parse_from([
            "session-vault",
            "add",
            "--name",
            "prod",
            "--host",
            "10.0.0.1",
        ])
        .unwrap();

        match args.command {
            Command::Add {
                port,
                username,
                save_password,
                key_file,
                ..
            } => {
                assert_eq!(port, 22);
                assert_eq!(username, "root");
                assert!(!save_password);
                assert_eq!(key_file, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_port_zero() {
        let result = Args::try_parse_from([
            "session-vault", "add", "--name", "p", "--host", "h", "--port", "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_session_json_hides_password() {
        let record = SessionRecord::new("prod", "h", 22, "root").with_password("hunter2");
        let value = session_json(&record);

        assert_eq!(value["password_saved"], true);
        assert!(!value.to_string().contains("hunter2"));
    }

    #[test]
    fn test_run_add_and_remove() {
        let temp_dir = TempDir::new().unwrap();
        let config = CatalogConfig::with_dir("toolsuite", temp_dir.path()).unwrap();
        let notifier = Arc::new(StderrNotifier::default());
        let catalog = SessionCatalog::open(config, &MemoryVault::new())
            .unwrap()
            .with_notifier(notifier.clone());

        let add = Args::try_parse_from([
            "session-vault", "add", "--name", "keyed", "--host", "h", "--key-file", "/k",
        ])
        .unwrap();
        run(add, &catalog).unwrap();

        let sessions = catalog.load_all();
        assert_eq!(sessions.len(), 1);
        assert_eq!(auth_label(&sessions[0]), "key file");

        let remove = Args::try_parse_from(["session-vault", "remove", "keyed"]).unwrap();
        run(remove, &catalog).unwrap();

        assert!(catalog.load_all().is_empty());
        assert_eq!(notifier.reported(), 0);
    }

    #[test]
    fn test_show_missing_session_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let config = CatalogConfig::with_dir("toolsuite", temp_dir.path()).unwrap();
        let catalog = SessionCatalog::open(config, &MemoryVault::new()).unwrap();

        let show = Args::try_parse_from(["session-vault", "show", "nope"]).unwrap();
        assert!(run(show, &catalog).is_err());
    }
}
