//! ayurcare CLI: terminal front end for the AyurCare wellness assistant

use ayurcare_engine::config::CONFIG_DIR;
use ayurcare_engine::{
    Config, ConversationStore, GatewayError, ResponseGateway, QUICK_ACTIONS, THERAPIES,
};
use ayurcare_tui::TuiOptions;
use clap::{Parser, Subcommand};
use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "ayurcare.log";

/// Ayurvedic wellness support chat in your terminal
#[derive(Parser)]
#[command(name = "ayurcare")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config.json (default: .ayurcare/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat (default when no command specified)
    Chat,

    /// Ask a single question and print the reply
    Ask {
        /// Question text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// List the therapy catalog
    Therapies {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the quick actions
    Actions {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default .ayurcare/config.json
    Init,
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let interactive = matches!(cli.command, None | Some(Commands::Chat));
    init_logging(interactive);

    let config_path = cli
        .config
        .unwrap_or_else(|| Config::default_path(Path::new(".")));

    let result = match cli.command {
        None | Some(Commands::Chat) => cmd_chat(&config_path),
        Some(Commands::Ask { text }) => cmd_ask(&config_path, &text.join(" ")),
        Some(Commands::Therapies { json }) => cmd_therapies(json),
        Some(Commands::Actions { json }) => cmd_actions(json),
        Some(Commands::Init) => cmd_init(&config_path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Install the tracing subscriber.
///
/// The interactive session owns the terminal, so its logs go to a file.
fn init_logging(interactive: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if interactive {
        let log_file = std::fs::create_dir_all(CONFIG_DIR)
            .and_then(|()| File::create(Path::new(CONFIG_DIR).join(LOG_FILE)));
        match log_file {
            Ok(file) => builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init(),
            Err(_) => builder.with_writer(std::io::sink).init(),
        }
    } else {
        builder.with_writer(std::io::stderr).init();
    }
}

fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn Error>> {
    Ok(tokio::runtime::Runtime::new()?)
}

fn cmd_chat(config_path: &Path) -> Result<(), Box<dyn Error>> {
    let config = Config::load_or_default(config_path)?;
    let gateway = config.gateway()?;

    let startup_notice = (!gateway.has_api_key()).then(|| GatewayError::MissingApiKey.to_string());
    let options = TuiOptions {
        model_label: gateway.model().to_string(),
        gateway: Arc::new(gateway),
        startup_notice,
    };

    runtime()?.block_on(ayurcare_tui::run_tui(options))
}

fn cmd_ask(config_path: &Path, text: &str) -> Result<(), Box<dyn Error>> {
    let config = Config::load_or_default(config_path)?;
    let gateway = config.gateway()?;
    if !gateway.has_api_key() {
        return Err(GatewayError::MissingApiKey.into());
    }

    let reply = runtime()?.block_on(ask(&gateway, text))?;
    println!("{reply}");
    Ok(())
}

/// One exchange through a fresh conversation. Returns the assistant entry.
async fn ask(gateway: &dyn ResponseGateway, text: &str) -> Result<String, Box<dyn Error>> {
    let mut store = ConversationStore::with_greeting();
    if !store.send(text, gateway).await {
        return Err("question is empty".into());
    }
    info!(messages = store.len(), "Exchange settled");

    store
        .last()
        .map(|m| m.content().to_string())
        .ok_or_else(|| "conversation is empty".into())
}

fn cmd_therapies(json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(THERAPIES)?);
    } else {
        print!("{}", format_therapies());
    }
    Ok(())
}

fn format_therapies() -> String {
    let mut out = String::new();
    for therapy in THERAPIES {
        out.push_str(&format!(
            "{} ({}, {})\n  {}\n  Benefits: {}\n\n",
            therapy.name,
            therapy.category.label(),
            therapy.duration,
            therapy.description,
            therapy.benefits.join(", "),
        ));
    }
    out
}

fn cmd_actions(json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(QUICK_ACTIONS)?);
    } else {
        print!("{}", format_actions());
    }
    Ok(())
}

fn format_actions() -> String {
    let mut out = String::new();
    for (i, action) in QUICK_ACTIONS.iter().enumerate() {
        out.push_str(&format!(
            "[F{}] {} {}: {}\n     {}\n",
            i + 1,
            action.icon,
            action.title,
            action.description,
            action.action.prefill(),
        ));
    }
    out
}

fn cmd_init(config_path: &Path) -> Result<(), Box<dyn Error>> {
    if write_default_config(config_path)? {
        println!("Created {}", config_path.display());
        println!("Set GEMINI_API_KEY (or API_KEY) in your environment or a .env file.");
    } else {
        println!("Config already exists at {}", config_path.display());
    }
    Ok(())
}

/// Write the default config unless one exists. Returns whether it was written.
fn write_default_config(path: &Path) -> Result<bool, Box<dyn Error>> {
    if path.exists() {
        return Ok(false);
    }
    Config::default().save(path)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ayurcare_engine::{HistoryEntry, CONNECTIVITY_ERROR, EMPTY_REPLY_FALLBACK, GREETING};
    use clap::CommandFactory;
    use tempfile::TempDir;

    /// Gateway returning one fixed outcome and recording the history it saw.
    struct FixedGateway {
        outcome: Mutex<Option<Result<Option<String>, GatewayError>>>,
        history: Mutex<Vec<HistoryEntry>>,
    }

    impl FixedGateway {
        fn new(outcome: Result<Option<String>, GatewayError>) -> Self {
            Self {
                outcome: Mutex::new(Some(outcome)),
                history: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ResponseGateway for FixedGateway {
        async fn respond(
            &self,
            _message: &str,
            history: &[HistoryEntry],
        ) -> Result<Option<String>, GatewayError> {
            *self.history.lock().unwrap() = history.to_vec();
            self.outcome.lock().unwrap().take().unwrap_or(Ok(None))
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_ask_prints_reply() {
        let gateway = FixedGateway::new(Ok(Some("Kapha is earth and water.".into())));
        let reply = ask(&gateway, "What is Kapha?").await.unwrap();
        assert_eq!(reply, "Kapha is earth and water.");

        let history = gateway.history.lock().unwrap().clone();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, GREETING);
    }

    #[tokio::test]
    async fn test_ask_empty_reply_gives_fallback() {
        let gateway = FixedGateway::new(Ok(None));
        let reply = ask(&gateway, "Hello").await.unwrap();
        assert_eq!(reply, EMPTY_REPLY_FALLBACK);
    }

    #[tokio::test]
    async fn test_ask_failure_is_a_chat_entry_not_an_error() {
        let gateway = FixedGateway::new(Err(GatewayError::Timeout(60)));
        let reply = ask(&gateway, "Hello").await.unwrap();
        assert_eq!(reply, CONNECTIVITY_ERROR);
    }

    #[tokio::test]
    async fn test_ask_blank_question_is_rejected() {
        let gateway = FixedGateway::new(Ok(Some("unused".into())));
        assert!(ask(&gateway, "   ").await.is_err());
        assert!(gateway.history.lock().unwrap().is_empty());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_opens_chat() {
        let cli = Cli::try_parse_from(["ayurcare"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_ask_joins_words() {
        let cli = Cli::try_parse_from(["ayurcare", "ask", "What", "is", "Vata?"]).unwrap();
        match cli.command {
            Some(Commands::Ask { text }) => assert_eq!(text.join(" "), "What is Vata?"),
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_ask_requires_text() {
        assert!(Cli::try_parse_from(["ayurcare", "ask"]).is_err());
    }

    #[test]
    fn test_global_config_flag_after_subcommand() {
        let cli =
            Cli::try_parse_from(["ayurcare", "therapies", "--json", "--config", "/tmp/c.json"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.json")));
        assert!(matches!(cli.command, Some(Commands::Therapies { json: true })));
    }

    #[test]
    fn test_format_therapies_lists_catalog() {
        let text = format_therapies();
        assert!(text.contains("Abhyanga (Relaxation, 60 mins)"));
        assert!(text.contains("Panchakarma (Detox, 7-21 days)"));
        assert!(text.contains("Sleep quality, Mental clarity, Anxiety relief"));
    }

    #[test]
    fn test_format_actions_shows_keys_and_prefill() {
        let text = format_actions();
        assert!(text.contains("[F1]"));
        assert!(text.contains("Book Therapy"));
        assert!(text.contains("[F3]"));
        assert!(text.contains("I'd like to book an Ayurvedic therapy session."));
    }

    #[test]
    fn test_write_default_config_once() {
        let temp = TempDir::new().unwrap();
        let path = Config::default_path(temp.path());

        assert!(write_default_config(&path).unwrap());
        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.model, Config::default().model);

        std::fs::write(&path, r#"{"model": "custom"}"#).unwrap();
        assert!(!write_default_config(&path).unwrap());
        assert_eq!(Config::load(&path).unwrap().model, "custom");
    }
}
