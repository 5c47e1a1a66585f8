use std::fmt;
use std::sync::Arc;

use catalog::{BuiltinCatalog, ContentCatalog};
use services::{GameController, MatchSide, Step, StudyController};
use stem_core::model::{GameQuestion, Grade, GradeError, QuestionBody, Subject};
use tracing_subscriber::{EnvFilter, fmt as log_fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownSubject { raw: String },
    InvalidGrade(GradeError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownSubject { raw } => {
                write!(f, "unknown subject: {raw} (expected plant, animal or physics)")
            }
            ArgsError::InvalidGrade(err) => write!(f, "{err}"),
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
    eprintln!("  stem-learn study [--subject <name>] [--grade <n>] [--log <filter>]");
    eprintln!("  stem-learn game  [--subject <name>] [--grade <n>] [--log <filter>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --subject plant");
    eprintln!("  --grade 6");
    eprintln!("  --log warn");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STEM_SUBJECT, STEM_GRADE, STEM_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Study,
    Game,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "study" => Some(Self::Study),
            "game" => Some(Self::Game),
            _ => None,
        }
    }
}

struct Args {
    subject: Subject,
    grade: Grade,
    log_filter: String,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut subject = std::env::var("STEM_SUBJECT")
            .ok()
            .map_or(Ok(Subject::Plant), |raw| parse_subject(&raw))?;
        let mut grade = std::env::var("STEM_GRADE")
            .ok()
            .map_or(Ok(Grade::new(6)), |raw| raw.parse::<Grade>().map_err(ArgsError::InvalidGrade))?;
        let mut log_filter = std::env::var("STEM_LOG").unwrap_or_else(|_| "warn".into());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--subject" => subject = parse_subject(&require_value(args, "--subject")?)?,
                "--grade" => {
                    grade = require_value(args, "--grade")?
                        .parse::<Grade>()
                        .map_err(ArgsError::InvalidGrade)?;
                }
                "--log" => log_filter = require_value(args, "--log")?,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            subject,
            grade,
            log_filter,
        })
    }
}

// Unknown subjects are valid inside the engines (empty content) but almost
// always a typo on the command line.
fn parse_subject(raw: &str) -> Result<Subject, ArgsError> {
    let subject = Subject::from(raw);
    if subject.is_known() {
        Ok(subject)
    } else {
        Err(ArgsError::UnknownSubject {
            raw: raw.to_string(),
        })
    }
}

fn init_tracing(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(log_fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

async fn run_study(catalog: Arc<dyn ContentCatalog>, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut study = StudyController::new(catalog, args.subject, args.grade);
    study.load().await?;

    let mut state = study.snapshot();
    if state.concept.is_none() {
        println!("No study content for {} grade {}.", args.subject, args.grade);
        return Ok(());
    }

    loop {
        if let Some(concept) = &state.concept {
            println!(
                "[{:>3.0}%] {} / {}",
                state.progress.fraction * 100.0,
                state.topic_title.as_deref().unwrap_or_default(),
                concept.title
            );
            println!("       {}", concept.definition);
            for point in &concept.key_points {
                println!("       - {point}");
            }
        }
        if !state.has_next {
            break;
        }
        study.next_concept();
        state = study.snapshot();
    }
    println!("Finished {} concepts.", state.progress.total);
    Ok(())
}

async fn run_game(catalog: Arc<dyn ContentCatalog>, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut game = GameController::new(catalog, args.subject, args.grade);
    let finished = game.finished().ok_or("finished receiver already taken")?;
    game.load().await?;

    let state = game.snapshot();
    if let Some(message) = state.error_message {
        println!("{message}");
        return Ok(());
    }

    loop {
        let Some(question) = game.snapshot().current_question else {
            break;
        };
        println!("Q{}: {}", game.snapshot().question_index + 1, question.prompt);
        answer_from_key(&mut game, &question);

        let state = game.snapshot();
        if state.show_result {
            println!("    correct: {:?}, score: {}", state.is_answer_correct, state.score);
        }
        if game.next_question() != Some(Step::Next { index: state.question_index + 1 }) {
            break;
        }
    }

    let summary = finished.await?;
    println!(
        "Score {} ({} of {} answered correctly).",
        summary.score(),
        summary.correct(),
        summary.answered()
    );
    Ok(())
}

/// Play the current question using its own answer key.
fn answer_from_key(game: &mut GameController, question: &GameQuestion) {
    match &question.body {
        QuestionBody::Mcq(data) => {
            game.select_answer(&data.correct_answer);
        }
        QuestionBody::Labeling(data) => {
            for part in &data.parts {
                game.select_label(part.expected_label());
                game.place_label_on_part(&part.name);
            }
            game.submit_labeling();
        }
        QuestionBody::Matching(data) => {
            for (left, right) in &data.correct_pairs {
                game.on_matching_item_clicked(left, MatchSide::Left);
                game.on_matching_item_clicked(right, MatchSide::Right);
            }
            game.submit_matching();
        }
        QuestionBody::MindMap(data) => {
            println!("    {}", data.central_topic);
            for branch in &data.branches {
                println!("    - {}: {}", branch.title, branch.items.join(", "));
            }
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);

    let cmd = match argv.next() {
        None => {
            print_usage();
            return Ok(());
        }
        Some(first) if first == "--help" || first == "-h" => {
            print_usage();
            return Ok(());
        }
        Some(first) => Command::from_arg(&first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    let args = Args::parse(&mut argv).inspect_err(|e| {
        eprintln!("{e}");
        print_usage();
    })?;
    init_tracing(&args.log_filter);

    let builtin = BuiltinCatalog::new();
    let warnings = builtin.validate()?;
    tracing::debug!(warnings, "content checked");
    let catalog: Arc<dyn ContentCatalog> = Arc::new(builtin);

    match cmd {
        Command::Study => run_study(catalog, &args).await,
        Command::Game => run_game(catalog, &args).await,
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
