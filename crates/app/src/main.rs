use std::io;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use quiz_core::model::{BankId, QuizSettings, QuizSettingsDraft};
use services::ai::config;
use services::{Clock, InferenceParams, ModelInvoker, Provider, QuizCatalog};
use storage::repository::Storage;

mod input;
mod interactive;
mod render;

#[derive(Parser, Debug)]
#[command(name = "cert-quiz", version, about = "Practice quizzes for AWS certification exams")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available question banks
    Banks(BankDir),
    /// Take a quiz
    Run(RunArgs),
    /// Send a single prompt to a hosted model
    Ask(AskArgs),
}

#[derive(Args, Debug)]
struct BankDir {
    /// Directory holding the question bank JSON files
    #[arg(long, env = "CERT_QUIZ_BANK_DIR", default_value = "banks")]
    dir: PathBuf,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Bank id, as shown by `banks`
    #[arg(short, long)]
    bank: String,
    #[command(flatten)]
    dir: BankDir,
    /// Number of questions (clamped to the bank size)
    #[arg(short = 'n', long)]
    count: Option<usize>,
    /// Seed for a reproducible question selection
    #[arg(long)]
    seed: Option<u64>,
    /// Move to the next question after each answer
    #[arg(long)]
    auto_advance: bool,
    /// Percentage needed to pass
    #[arg(long)]
    pass_mark: Option<u8>,
}

#[derive(Args, Debug)]
struct AskArgs {
    #[arg(short, long)]
    prompt: String,
    /// Model id; defaults to CERT_QUIZ_AI_MODEL or a small Claude model
    #[arg(short, long)]
    model: Option<String>,
    /// Provider name; inferred from the model id when omitted
    #[arg(long)]
    provider: Option<String>,
    #[arg(long)]
    max_tokens: Option<u32>,
    #[arg(long)]
    temperature: Option<f32>,
    /// AWS region of the runtime endpoint
    #[arg(long)]
    region: Option<String>,
}

fn init_tracing() {
    // Logs go to stderr; stdout belongs to the quiz.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .init();
}

async fn list_banks(args: BankDir) -> Result<(), Box<dyn std::error::Error>> {
    let storage = Storage::json_dir(&args.dir)?;
    let catalog = QuizCatalog::from_storage(Clock::System, &storage);
    let banks = catalog.list_banks().await?;
    render::write_banks(&mut io::stdout(), &banks)?;
    Ok(())
}

impl RunArgs {
    fn quiz_settings(&self) -> Result<(BankId, QuizSettings), quiz_core::Error> {
        let bank_id = BankId::new(self.bank.as_str())?;
        let settings = QuizSettingsDraft {
            question_count: self.count,
            auto_advance: self.auto_advance,
            seed: self.seed,
            pass_mark_percent: self.pass_mark,
        }
        .validate()?;
        Ok((bank_id, settings))
    }
}

async fn run_quiz(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (bank_id, settings) = args.quiz_settings()?;

    let storage = Storage::json_dir(&args.dir.dir)?;
    let catalog = QuizCatalog::from_storage(Clock::System, &storage);
    let session = catalog.start_session(&bank_id, settings).await?;

    let ai_settings = config::settings_from_env()?;
    let invoker = ModelInvoker::from_settings(&ai_settings);
    tracing::debug!(ai = ?ai_settings, enabled = invoker.enabled(), "ai tutor configured");

    interactive::run(session, invoker).await?;
    Ok(())
}

async fn ask(args: AskArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut draft = config::draft_from_env();
    if args.model.is_some() {
        draft.default_model = args.model;
    }
    if args.region.is_some() {
        draft.region = args.region;
    }
    let ai_settings = draft.validate()?;
    let invoker = ModelInvoker::from_settings(&ai_settings);
    if !invoker.enabled() {
        eprintln!(
            "set {} (or {}) to call a model",
            config::API_KEY_VARS[0],
            config::API_KEY_VARS[1]
        );
    }

    let mut params = InferenceParams::default();
    if let Some(max_tokens) = args.max_tokens {
        params = params.with_max_tokens(max_tokens);
    }
    if let Some(temperature) = args.temperature {
        params = params.with_temperature(temperature);
    }

    let model_id = invoker.default_model().to_string();
    let text = match args.provider {
        Some(name) => {
            let provider: Provider = name.parse()?;
            invoker.invoke(provider, &model_id, &args.prompt, &params).await?
        }
        None => invoker.invoke_model(&model_id, &args.prompt, &params).await?,
    };
    println!("{text}");
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Banks(args) => list_banks(args).await,
        Command::Run(args) => run_quiz(args).await,
        Command::Ask(args) => ask(args).await,
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_flags_parse() {
        let cli = Cli::try_parse_from([
            "cert-quiz",
            "run",
            "--bank",
            "ai-practitioner",
            "-n",
            "5",
            "--seed",
            "42",
            "--auto-advance",
            "--dir",
            "/tmp/banks",
        ])
        .unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.bank, "ai-practitioner");
        assert_eq!(args.count, Some(5));
        assert_eq!(args.seed, Some(42));
        assert!(args.auto_advance);
        assert_eq!(args.dir.dir, PathBuf::from("/tmp/banks"));
    }

    #[test]
    fn run_args_validate_through_core() {
        fn parse(extra: &[&str]) -> Result<(BankId, QuizSettings), quiz_core::Error> {
            let argv = ["cert-quiz", "run"].iter().chain(extra).copied();
            let Command::Run(args) = Cli::try_parse_from(argv).unwrap().command else {
                panic!("expected run");
            };
            args.quiz_settings()
        }

        let (bank_id, settings) = parse(&["--bank", " AI-Practitioner "]).unwrap();
        assert_eq!(bank_id.as_str(), "ai-practitioner");
        assert_eq!(settings.question_count(), 10);

        assert!(matches!(
            parse(&["--bank", "ai", "--pass-mark", "120"]),
            Err(quiz_core::Error::QuizSettings(_))
        ));
        assert!(matches!(
            parse(&["--bank", "not a slug"]),
            Err(quiz_core::Error::BankId(_))
        ));
    }

    #[test]
    fn ask_requires_a_prompt() {
        assert!(Cli::try_parse_from(["cert-quiz", "ask"]).is_err());
    }
}
