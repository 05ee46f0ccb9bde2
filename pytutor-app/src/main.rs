//! `pytutor` — terminal front end for the quiz and tutor surfaces.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pytutor_app::{Interrupt, QuizView, SurfaceError, TutorView};
use pytutor_core::{OptionLabel, Persona, TutorConfig};
use pytutor_llm::{LlmClient, RetryPolicy};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pytutor", version, about = "Python quizzes and tutoring from a language model")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate and take a ten-question quiz.
    Quiz {
        /// Learner level, e.g. "beginner" or "high school".
        #[arg(long)]
        level: Option<String>,
    },
    /// Chat with the tutor. An empty line ends the session.
    Tutor {
        /// `standard` or `casual`.
        #[arg(long)]
        persona: Option<Persona>,
        #[arg(long)]
        level: Option<String>,
    },
}

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => TutorConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => TutorConfig::default(),
    }
    .with_env_overrides();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.general.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let client = Arc::new(LlmClient::from_config(&config.llm)?);
    let policy = RetryPolicy::from(&config.retry);
    info!(model = client.model(), max_retries = policy.max_retries, "pytutor starting");

    let interrupt = Interrupt::new();
    install_ctrl_c(interrupt.clone());

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    match cli.command {
        Command::Quiz { level } => {
            let level = level.unwrap_or_else(|| config.tutor.level.clone());
            run_quiz(QuizView::new(client, policy), &level, &interrupt, &mut input).await
        }
        Command::Tutor { persona, level } => {
            let view = TutorView::new(
                client,
                policy,
                persona.unwrap_or(config.tutor.persona),
                level.unwrap_or_else(|| config.tutor.level.clone()),
            );
            run_tutor(view, &interrupt, &mut input).await
        }
    }
}

/// Listen for Ctrl-C for the rest of the process: cancel the pending
/// request if there is one, exit otherwise.
fn install_ctrl_c(interrupt: Interrupt) {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if !interrupt.interrupt() {
                std::process::exit(130);
            }
        }
    });
}

async fn prompt_line(input: &mut Input, prompt: &str) -> anyhow::Result<Option<String>> {
    println!("{prompt}");
    Ok(input.next_line().await?)
}

async fn run_quiz(
    mut view: QuizView<LlmClient>,
    level: &str,
    interrupt: &Interrupt,
    input: &mut Input,
) -> anyhow::Result<()> {
    loop {
        println!("Generating a {level} quiz...");
        let handle = view.cancel_handle();
        match interrupt.run(handle, view.generate(level)).await {
            Ok(_) => {}
            Err(SurfaceError::Cancelled) => return Ok(()),
            Err(SurfaceError::Terminal(message)) => {
                println!("{message}");
                match prompt_line(input, "Press Enter to try again, or type q to quit.").await? {
                    Some(line) if !line.trim().eq_ignore_ascii_case("q") => continue,
                    _ => return Ok(()),
                }
            }
        }

        while let Some(session) = view.session().filter(|s| !s.is_finished()) {
            let (position, total) = session.position();
            let question = session.current();
            println!("\nQuestion {position} of {total}");
            println!("{}", question.question_text());
            for option in question.options() {
                println!("  {option}");
            }

            let Some(line) = prompt_line(input, "Your answer (A-D):").await? else {
                return Ok(());
            };
            let Some(label) = line.trim().chars().next().and_then(OptionLabel::from_char) else {
                println!("Please choose A, B, C or D.");
                continue;
            };

            let outcome = view.answer(label)?;
            if outcome.is_correct() {
                println!("Correct!");
            } else if let Some(correct) = view.session().map(|s| s.current().correct_option()) {
                println!("Incorrect. The answer was {correct}.");
            }
            view.next()?;
        }

        if let Some(session) = view.session() {
            let (score, total) = session.score();
            println!("\nQuiz Completed! Your Score: {score} / {total}");
        }
        match prompt_line(input, "Press Enter for a new quiz, or type q to quit.").await? {
            Some(line) if !line.trim().eq_ignore_ascii_case("q") => {}
            _ => return Ok(()),
        }
    }
}

async fn run_tutor(mut view: TutorView<LlmClient>, interrupt: &Interrupt, input: &mut Input) -> anyhow::Result<()> {
    println!("Python Tutor ({}, {} level). Empty line to quit.", view.persona(), view.level());
    println!("> {}", pytutor_app::OPENING_LINE);
    let handle = view.cancel_handle();
    print_reply(interrupt.run(handle, view.start()).await);

    while let Some(line) = prompt_line(input, ">").await? {
        if line.trim().is_empty() {
            break;
        }
        let handle = view.cancel_handle();
        print_reply(interrupt.run(handle, view.send(&line)).await);
    }
    Ok(())
}

fn print_reply(result: Result<Option<&pytutor_core::ChatMessage>, SurfaceError>) {
    match result {
        Ok(Some(message)) => println!("{}\n", message.content()),
        Ok(None) => {}
        Err(SurfaceError::Cancelled) => println!("(cancelled)"),
        Err(SurfaceError::Terminal(message)) => println!("{message}"),
    }
}
