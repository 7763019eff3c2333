use std::fmt;
use std::io::{BufRead, Write as _};

use quiz_core::model::{ModuleId, SessionFilter, SessionLabel};
use services::sessions::option_feedback;
use services::{
    Advance, AppServices, ModuleCatalog, OptionFeedback, QuizLoopService, QuizSession,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidModuleId { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidModuleId { raw } => write!(f, "invalid --module-id value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- quiz    [--db <sqlite_url>] [--data-dir <dir>] [--module-id <id>]");
    eprintln!("  cargo run -p app -- modules [--db <sqlite_url>] [--data-dir <dir>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:progress.sqlite3");
    eprintln!("  --data-dir data");
    eprintln!("  --module-id 1");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_DATA_DIR, QUIZ_MODULE_ID");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Quiz,
    Modules,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "quiz" => Some(Self::Quiz),
            "modules" => Some(Self::Modules),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    data_dir: String,
    module_id: ModuleId,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("QUIZ_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://progress.sqlite3".into(), normalize_sqlite_url);
        let mut data_dir = std::env::var("QUIZ_DATA_DIR")
            .ok()
            .unwrap_or_else(|| "data".into());
        let mut module_id = std::env::var("QUIZ_MODULE_ID")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map_or_else(|| ModuleId::new(1), ModuleId::new);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--data-dir" => {
                    data_dir = require_value(args, "--data-dir")?;
                }
                "--module-id" => {
                    let value = require_value(args, "--module-id")?;
                    let parsed: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidModuleId { raw: value.clone() })?;
                    module_id = ModuleId::new(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            data_dir,
            module_id,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Quiz,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Quiz,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so
    // core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let app = AppServices::new_sqlite(
        &parsed.db_url,
        parsed.data_dir.clone(),
        ModuleCatalog::builtin(),
    )
    .await?;
    tracing::debug!(db = %parsed.db_url, data_dir = %parsed.data_dir, "services ready");

    match cmd {
        Command::Modules => {
            for entry in app.catalog().entries() {
                println!("{}  {} — {}", entry.id(), entry.title(), entry.subtitle());
            }
            Ok(())
        }
        Command::Quiz => run_quiz(&app.quiz_loop(), parsed.module_id).await,
    }
}

const LETTERS: [char; 5] = ['a', 'b', 'c', 'd', 'e'];

async fn run_quiz(
    quiz_loop: &QuizLoopService,
    module_id: ModuleId,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = quiz_loop.open_module(module_id).await;

    if session.is_empty() {
        println!("Module non trouvé.");
        return Ok(());
    }

    println!(
        "{} questions — sessions: {}",
        session.total_questions(),
        session
            .available_sessions()
            .iter()
            .map(SessionLabel::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("Commandes: a-e sélection, x<lettre> barrer, r révéler, n suivant, p précédent,");
    println!("           s <session>|all filtre session, c <chapitre> filtre chapitre,");
    println!("           chapitres, score, reset, q quitter");

    print_question(&session);

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let input = line.trim();

        match input {
            "" => continue,
            "q" => break,
            "r" => {
                match quiz_loop.reveal_current(&mut session).await {
                    Some(_) => print_revealed(&session),
                    None => println!("Sélectionnez au moins une option."),
                }
                continue;
            }
            "n" => {
                if quiz_loop.advance(&mut session) == Advance::Completed {
                    let progress = session.progress();
                    println!("Terminé ! Score: {}/{}", progress.score, progress.answered);
                    break;
                }
                print_question(&session);
                continue;
            }
            "p" => {
                if quiz_loop.go_back(&mut session) {
                    print_question(&session);
                }
                continue;
            }
            "chapitres" => {
                for chapter in session.chapters() {
                    println!(
                        "  {} ({} questions)",
                        chapter.name(),
                        chapter.question_count()
                    );
                }
                continue;
            }
            "score" => {
                let progress = session.progress();
                println!(
                    "Score: {}/{} — maîtrisées: {}/{}",
                    progress.score, progress.answered, progress.mastered, progress.total
                );
                continue;
            }
            "reset" => {
                quiz_loop.request_reset(&mut session);
                println!("Réinitialiser la progression de ce module ? (oui/non)");
                continue;
            }
            "oui" if session.reset_requested() => {
                quiz_loop.confirm_reset(&mut session).await;
                println!("Progression réinitialisée.");
                continue;
            }
            "non" if session.reset_requested() => {
                quiz_loop.cancel_reset(&mut session);
                continue;
            }
            _ => {}
        }

        if let Some(rest) = input.strip_prefix("s ") {
            let filter = if rest.eq_ignore_ascii_case("all") {
                SessionFilter::AllSessions
            } else {
                SessionFilter::Only(SessionLabel::new(rest))
            };
            quiz_loop.set_session_filter(&mut session, filter);
            println!("{} questions dans ce filtre.", session.total_questions());
            print_question(&session);
        } else if let Some(rest) = input.strip_prefix("c ") {
            quiz_loop.select_chapter(&mut session, rest);
            println!("{} questions dans ce filtre.", session.total_questions());
            print_question(&session);
        } else if let Some(rest) = input.strip_prefix('x') {
            if let Some(slot) = letter_slot(rest.trim()) {
                session.toggle_strikethrough(slot);
                print_question(&session);
            }
        } else if let Some(slot) = letter_slot(input) {
            session.toggle_selection(slot);
            print_question(&session);
        } else {
            println!("Commande inconnue: {input}");
        }
    }

    Ok(())
}

fn letter_slot(input: &str) -> Option<usize> {
    let mut chars = input.chars();
    let letter = chars.next()?.to_ascii_lowercase();
    if chars.next().is_some() {
        return None;
    }
    LETTERS.iter().position(|&l| l == letter)
}

fn print_question(session: &QuizSession) {
    let Some(question) = session.current_question() else {
        println!("Aucune question dans ce filtre.");
        return;
    };
    let Some(presentation) = session.presentation() else {
        return;
    };

    let progress = session.progress();
    let mastered = if session.is_mastered(question) { " ✓" } else { "" };
    println!();
    println!(
        "Q{}/{}{} — {}",
        progress.position,
        progress.total,
        mastered,
        question.text()
    );

    for (slot, option) in presentation.options().iter().enumerate() {
        let marker = if session.selected().contains(&slot) {
            "[x]"
        } else {
            "[ ]"
        };
        let struck = if session.is_struck(slot) { " (barré)" } else { "" };
        println!(
            "  {} {}. {}{}",
            marker,
            LETTERS[slot].to_ascii_uppercase(),
            option,
            struck
        );
    }
}

fn print_revealed(session: &QuizSession) {
    let Some(question) = session.current_question() else {
        return;
    };
    let Some(evaluation) = session.last_evaluation() else {
        return;
    };

    println!();
    if evaluation.is_fully_correct {
        println!("Correct !");
    } else {
        println!("Incorrect.");
    }

    // Revealed view renders in canonical order.
    for (canonical, option) in question.options().iter().enumerate() {
        let tag = match option_feedback(question, &evaluation.canonical_selected, canonical) {
            OptionFeedback::SelectedCorrect => "correct",
            OptionFeedback::MissedCorrect => "manquée",
            OptionFeedback::SelectedIncorrect => "incorrect",
            OptionFeedback::Neutral => " ",
        };
        println!("  [{tag}] {option}");
        let explanation = &question.explanations()[canonical];
        if !explanation.is_empty() {
            println!("          {explanation}");
        }
    }

    if !question.overall_explanation().is_empty() {
        println!("Explication générale: {}", question.overall_explanation());
    }
    println!("Score: {}", session.score());
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
