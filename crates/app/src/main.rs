use std::fmt;
use std::sync::Arc;

use catalog::sample_catalog;
use course_core::model::QuizId;
use services::{
    Clock, DashboardService, QuizApiService, QuizFlowError, QuizFlowService, SessionToken,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingQuizId,
    InvalidAnswers { raw: String },
    UnknownArg(String),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingQuizId => write!(f, "quiz requires a quiz id"),
            ArgsError::InvalidAnswers { raw } => {
                write!(f, "invalid --answers value: {raw} (expected e.g. 0,2,1)")
            }
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
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
    eprintln!("  cargo run -p app -- dashboard");
    eprintln!("  cargo run -p app -- lessons");
    eprintln!("  cargo run -p app -- quiz <id> --answers 0,2,1");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  COURSE_API_BASE_URL, COURSE_API_TOKEN, COURSE_API_TIMEOUT_SECS, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Dashboard,
    Lessons,
    Quiz,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "dashboard" => Some(Self::Dashboard),
            "lessons" => Some(Self::Lessons),
            "quiz" => Some(Self::Quiz),
            _ => None,
        }
    }
}

struct QuizArgs {
    quiz_id: QuizId,
    answers: Vec<usize>,
}

impl QuizArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let quiz_id = match args.next() {
            Some(raw) if !raw.starts_with("--") => QuizId::new(raw),
            _ => return Err(ArgsError::MissingQuizId),
        };

        let mut answers = Vec::new();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--answers" => {
                    let value = require_value(args, "--answers")?;
                    answers = parse_answers(&value)?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { quiz_id, answers })
    }
}

fn parse_answers(raw: &str) -> Result<Vec<usize>, ArgsError> {
    raw.split(',')
        .map(|part| part.trim().parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ArgsError::InvalidAnswers { raw: raw.to_string() })
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Dashboard,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() {
        argv.remove(0);
    }
    let mut iter = argv.into_iter();

    let catalog = sample_catalog()?;

    match cmd {
        Command::Dashboard => {
            if let Some(arg) = iter.next() {
                let err = ArgsError::UnknownArg(arg);
                report_args_error(&err);
                return Err(err.into());
            }
            let dashboard = DashboardService::new(catalog);
            let overview = dashboard.overview().await?;

            let summary = overview.summary;
            println!("Overall Progress   {}%", summary.overall_progress_pct);
            println!("Average Score      {}%", summary.average_score_pct);
            println!(
                "Lessons Completed  {}/{}",
                summary.completed_lessons, summary.total_lessons
            );
            println!(
                "Quizzes Completed  {}/{}",
                summary.completed_quizzes, summary.total_quizzes
            );
            println!();
            for quiz in &overview.quizzes {
                let score = quiz
                    .score
                    .map_or_else(|| "-".to_string(), |s| format!("{s}%"));
                println!(
                    "  [{}] {} ({} questions, score {}) -> {}",
                    quiz.id, quiz.title, quiz.question_count, score, quiz.action_label
                );
            }
            Ok(())
        }
        Command::Lessons => {
            if let Some(arg) = iter.next() {
                let err = ArgsError::UnknownArg(arg);
                report_args_error(&err);
                return Err(err.into());
            }
            let dashboard = DashboardService::new(catalog);
            let overview = dashboard.overview().await?;

            for lesson in &overview.lessons {
                let quiz_score = lesson
                    .quiz_score
                    .map_or_else(|| "-".to_string(), |s| format!("{s}%"));
                println!(
                    "  [{}] {} ({}) watched {:.0}%, quiz {} -> {}",
                    lesson.id,
                    lesson.title,
                    lesson.duration,
                    lesson.watch_progress_pct,
                    quiz_score,
                    lesson.action_label
                );
            }
            Ok(())
        }
        Command::Quiz => {
            let parsed = QuizArgs::parse(&mut iter).inspect_err(report_args_error)?;

            let api = Arc::new(QuizApiService::from_env()?);
            let token = SessionToken::from_env();
            let flow = QuizFlowService::new(catalog, api, Clock::default());

            let mut session = match flow.start_practice_quiz(&parsed.quiz_id).await {
                Ok(session) => session,
                Err(QuizFlowError::Api(err)) if err.is_not_found() => {
                    println!("Quiz {} not found", parsed.quiz_id);
                    return Ok(());
                }
                Err(err) => return Err(err.into()),
            };

            println!("{}", session.quiz().title());
            for (index, answer) in parsed.answers.iter().enumerate() {
                let Some(question) = session.current_question() else {
                    println!("(ignoring extra answers past question {index})");
                    break;
                };
                println!("  Q{}: {} -> option {answer}", index + 1, question.text());
                session.select_answer(*answer)?;
            }

            let result = flow.finalize(&mut session, token.as_ref()).await?;
            println!();
            println!(
                "Score: {}% ({}/{} correct)",
                result.score, result.correct, result.total
            );
            Ok(())
        }
    }
}

fn report_args_error(err: &ArgsError) {
    eprintln!("{err}");
    print_usage();
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = run().await {
        eprintln!("error: {err}");
        std::process::exit(2);
    }
}
