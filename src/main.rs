// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::sync::Arc;

use lexicard::app_config::{Config, LogLevel};
use lexicard::database::models::{Flashcard, WordDetail};
use lexicard::database::{DataStore, DatabaseConnection, Repository};
use lexicard::interactors::{
    AccountInteractor, AuthorizationInteractor, AuthorizationResult, DecksInteractor,
    DictionaryInteractor,
};
use lexicard::network::dictionary::DictionaryClient;
use lexicard::network::NetworkManager;
use lexicard::presentation::{
    AccountPresenter, DecksPresenter, HistoryPresenter, NewFlashcardForm, NewFlashcardPresenter,
};
use lexicard::{CredentialStore, FileCredentialStore, ValidationManager};

mod terminal;

use terminal::{TerminalRouter, TerminalView};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search stored words containing the given text
    Search {
        /// Part of a word
        query: String,
    },

    /// Show a stored word with its translations and examples
    Show {
        word: String,
    },

    /// Look a word up, asking the dictionary service when it is not stored
    Lookup {
        word: String,
    },

    /// Show the lookup history grouped by day
    History,

    /// List favorite words, or mark a word as favorite
    Favorite {
        /// Word to mark; lists favorites when omitted
        word: Option<String>,

        /// Unmark the word instead
        #[arg(short, long, requires = "word")]
        remove: bool,
    },

    /// Manage flashcard decks
    Deck {
        #[command(subcommand)]
        action: DeckCommand,
    },

    /// Manage flashcards
    Card {
        #[command(subcommand)]
        action: CardCommand,
    },

    /// Sign in to the backend
    Login {
        email: String,

        #[arg(short, long, env = "LEXICARD_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and forget the cached account
    Logout,

    /// Show account settings, rename or delete the account
    Account {
        /// New user name
        #[arg(long, conflicts_with = "delete")]
        rename: Option<String>,

        /// Delete the backend account
        #[arg(long)]
        delete: bool,
    },

    /// Download popular words into the local dictionary
    Download,

    /// Show database statistics
    Stats,

    /// Generate shell completions for lexicard
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum DeckCommand {
    /// List decks, oldest first
    List,
    /// Create a deck
    Create { name: String },
    /// Delete a deck and all its cards
    Delete { deck_id: i64 },
}

#[derive(Subcommand, Debug)]
enum CardCommand {
    /// List the cards of a deck
    List { deck_id: i64 },

    /// Add a card to a deck
    Add {
        deck_id: i64,
        front: String,
        back: String,

        #[arg(long)]
        comment: Option<String>,

        /// Also add a card with the sides swapped
        #[arg(short, long)]
        reversed: bool,
    },

    /// Move a card to another deck
    Move { card_id: i64, deck_id: i64 },

    /// Delete a card
    Delete { card_id: i64 },
}

/// lexicard - vocabulary trainer with dictionary lookups and flashcards
#[derive(Parser, Debug)]
#[command(name = "lexicard")]
#[command(version)]
#[command(about = "Vocabulary trainer with dictionary lookups and flashcards")]
#[command(long_about = "lexicard keeps a local dictionary, a lookup history and flashcard decks.

EXAMPLES:
    lexicard lookup serendipity                 # Look a word up and remember it
    lexicard search ser                         # Search stored words
    lexicard deck create Travel                 # Create a deck
    lexicard card add 1 hello привет -r         # Add a card and its reverse
    lexicard login me@example.com -p secret123  # Sign in
    lexicard download                           # Fetch popular words
    lexicard completions bash > lexicard.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in lexicard.json by default. You can specify a
    different file with --config-path. If the file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "lexicard.json", env = "LEXICARD_CONFIG")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Colored stderr logger
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and emoji for level
    fn decoration(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "❌ "),
            Level::Warn => ("1;33", "🚧 "),
            Level::Info => ("1;32", " "),
            Level::Debug => ("1;36", "🔍 "),
            Level::Trace => ("1;35", "📋 "),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let now = chrono::Local::now().format("%H:%M:%S.%3f");
        let (color, emoji) = Self::decoration(record.level());
        let _ = writeln!(
            std::io::stderr(),
            "\x1B[{}m{} {} {}\x1B[0m",
            color,
            now,
            emoji,
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Everything a command needs, built from the configuration
struct App {
    config: Config,
    repository: Repository,
    store: Arc<dyn DataStore>,
    network: NetworkManager,
    dictionary: Option<DictionaryClient>,
    credentials: Arc<dyn CredentialStore>,
}

impl App {
    fn new(config: Config) -> Result<Self> {
        let connection = match &config.storage.database_path {
            Some(path) => DatabaseConnection::new(path),
            None => DatabaseConnection::new_default(),
        }
        .context("Failed to open the word database")?;
        let repository = Repository::new(connection);
        let store: Arc<dyn DataStore> = Arc::new(repository.clone());

        let network =
            NetworkManager::with_base_url(&config.backend.endpoint, config.backend.timeout_secs)?;

        let dictionary = if config.dictionary.is_enabled() {
            let dictionary_network = NetworkManager::with_base_url(
                &config.dictionary.endpoint,
                config.backend.timeout_secs,
            )?;
            Some(DictionaryClient::new(
                dictionary_network,
                &config.dictionary.endpoint,
                &config.dictionary.api_key,
                config.dictionary.lookup_direction()?,
            ))
        } else {
            None
        };

        let credentials_path = config
            .storage
            .credentials_path
            .clone()
            .or_else(FileCredentialStore::default_path)
            .ok_or_else(|| anyhow!("Could not determine the credentials location"))?;
        let credentials: Arc<dyn CredentialStore> =
            Arc::new(FileCredentialStore::new(credentials_path));

        Ok(Self {
            config,
            repository,
            store,
            network,
            dictionary,
            credentials,
        })
    }

    fn dictionary_interactor(&self) -> Arc<DictionaryInteractor> {
        Arc::new(DictionaryInteractor::new(self.store.clone(), self.dictionary.clone()))
    }

    fn decks_interactor(&self) -> Arc<DecksInteractor> {
        Arc::new(DecksInteractor::new(self.store.clone()))
    }

    fn account_interactor(&self) -> Arc<AccountInteractor> {
        Arc::new(AccountInteractor::new(
            self.store.clone(),
            self.network.clone(),
            self.dictionary.clone(),
            self.credentials.clone(),
            Arc::new(ValidationManager),
            self.config.download.clone(),
        ))
    }

    fn account_presenter(&self) -> AccountPresenter {
        AccountPresenter::new(
            self.account_interactor(),
            Arc::new(TerminalView::new()),
            Arc::new(TerminalRouter),
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "lexicard", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level.into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    config.validate().context("Configuration validation failed")?;

    let app = App::new(config)?;
    run(app, cli.command).await
}

async fn run(app: App, command: Commands) -> Result<()> {
    match command {
        Commands::Search { query } => {
            let words = app.dictionary_interactor().get_words(Some(&query));
            if words.is_empty() {
                println!("No stored words match '{}'", query);
            }
            for word in words {
                println!("{}: {}", word.word, word.translations.join(", "));
            }
        }
        Commands::Show { word } => match app.store.fetch_word_detail(&word) {
            Some(detail) => print_word_detail(&detail),
            None => println!("'{}' is not stored, try `lexicard lookup {}`", word, word),
        },
        Commands::Lookup { word } => {
            let interactor = app.dictionary_interactor();
            match interactor.word_detail(&word).await? {
                Some(detail) => {
                    if !interactor.record_lookup(detail.id) {
                        warn!("Lookup of '{}' was not added to the history", detail.word);
                    }
                    print_word_detail(&detail);
                }
                None => println!("No entry for '{}'", word),
            }
        }
        Commands::History => {
            let presenter = HistoryPresenter::new(
                app.dictionary_interactor(),
                Arc::new(TerminalView::new()),
                Arc::new(TerminalRouter),
            );
            presenter.view_did_load();
        }
        Commands::Favorite { word: None, .. } => {
            for word in app.dictionary_interactor().favorites() {
                println!("{}: {}", word.word, word.translations.join(", "));
            }
        }
        Commands::Favorite {
            word: Some(word),
            remove,
        } => {
            let detail = app
                .store
                .fetch_word_detail(&word)
                .ok_or_else(|| anyhow!("'{}' is not stored", word))?;
            if !app.dictionary_interactor().set_favorite(detail.id, !remove) {
                return Err(anyhow!("Could not update '{}'", word));
            }
            info!("'{}' {} favorites", word, if remove { "removed from" } else { "added to" });
        }
        Commands::Deck { action } => run_deck(&app, action),
        Commands::Card { action } => run_card(&app, action)?,
        Commands::Login { email, password } => {
            let interactor = AuthorizationInteractor::new(
                Arc::new(ValidationManager),
                app.network.clone(),
                app.store.clone(),
                app.credentials.clone(),
            );
            match interactor.enter(&email, &password).await {
                AuthorizationResult::Success => println!("Signed in as {}", email),
                AuthorizationResult::EmailField(message)
                | AuthorizationResult::PasswordField(message) => {
                    return Err(anyhow!("{}", message));
                }
                AuthorizationResult::ServerProblem => {
                    return Err(anyhow!("{}", lexicard::ValidationMessage::ServerProblem));
                }
                AuthorizationResult::TokenNotStored => {
                    return Err(anyhow!("Signed in but the token could not be saved"));
                }
            }
        }
        Commands::Logout => app.account_presenter().exit(),
        Commands::Account { rename, delete } => {
            let presenter = app.account_presenter();
            if delete {
                presenter.delete_account().await;
            } else if let Some(user_name) = rename {
                presenter.change_user_name(&user_name).await;
            } else {
                presenter.view_did_load();
            }
        }
        Commands::Download => {
            let presenter = app.account_presenter();
            tokio::select! {
                _ = presenter.download_dictionary() => {}
                _ = tokio::signal::ctrl_c() => {
                    warn!("Download cancelled, words stored so far are kept");
                }
            }
        }
        Commands::Stats => {
            let stats = app.repository.connection().stats()?;
            println!("Database: {:?}", app.repository.connection().path());
            println!("{}", stats);
        }
        Commands::Completions { .. } => {}
    }
    Ok(())
}

fn run_deck(app: &App, action: DeckCommand) {
    let mut presenter = DecksPresenter::new(
        app.decks_interactor(),
        Arc::new(TerminalView::new()),
        Arc::new(TerminalRouter),
    );
    match action {
        DeckCommand::List => presenter.view_did_load(),
        DeckCommand::Create { name } => {
            presenter.deck_name_changed(&name);
            presenter.create_deck(&name);
        }
        DeckCommand::Delete { deck_id } => {
            presenter.view_did_load();
            match presenter.decks().iter().position(|deck| deck.id == deck_id) {
                Some(index) => {
                    presenter.delete_deck(index);
                }
                None => eprintln!("No deck with id {}", deck_id),
            }
        }
    }
}

fn run_card(app: &App, action: CardCommand) -> Result<()> {
    let interactor = app.decks_interactor();
    match action {
        CardCommand::List { deck_id } => {
            let cards = interactor
                .flashcards(deck_id)
                .ok_or_else(|| anyhow!("No deck with id {}", deck_id))?;
            cards.iter().for_each(print_flashcard);
        }
        CardCommand::Add {
            deck_id,
            front,
            back,
            comment,
            reversed,
        } => {
            let view = Arc::new(TerminalView::new());
            let mut presenter = NewFlashcardPresenter::new(interactor, view.clone(), Some(deck_id));
            presenter.view_did_load();
            presenter.did_tap_save(NewFlashcardForm {
                front_side: Some(front),
                back_side: Some(back),
                deck_index: view.current_deck(),
                comment,
                create_reversed: reversed,
            });
            if view.is_closed() {
                info!("Card added to deck {}", deck_id);
            }
        }
        CardCommand::Move { card_id, deck_id } => {
            let card = interactor
                .flashcard(card_id)
                .ok_or_else(|| anyhow!("No card with id {}", card_id))?;
            if !interactor.update_flashcard(&card, deck_id) {
                return Err(anyhow!("Could not move card {} to deck {}", card_id, deck_id));
            }
            info!("Card {} moved to deck {}", card_id, deck_id);
        }
        CardCommand::Delete { card_id } => {
            if !interactor.delete_flashcard(card_id) {
                return Err(anyhow!("No card with id {}", card_id));
            }
        }
    }
    Ok(())
}

fn print_word_detail(detail: &WordDetail) {
    let star = if detail.is_favorite { " ★" } else { "" };
    println!("{}{}", detail.word, star);
    for translation in &detail.translations {
        let transcription = translation
            .transcription
            .as_deref()
            .map(|t| format!(" [{}]", t))
            .unwrap_or_default();
        println!("  ({}){} {}", translation.speech_part, transcription, translation.translation);
        for example in &translation.examples {
            match &example.translation {
                Some(gloss) => println!("      {} - {}", example.example, gloss),
                None => println!("      {}", example.example),
            }
        }
    }
}

fn print_flashcard(card: &Flashcard) {
    let comment = card
        .comment
        .as_deref()
        .map(|c| format!("  ({})", c))
        .unwrap_or_default();
    println!("{:>6}  {} | {}{}", card.id, card.front_side, card.back_side, comment);
}
