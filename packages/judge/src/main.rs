use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use common::config::MqAppConfig;
use common::entity::{DEFAULT_LANGUAGE, NewSubmission, NewUser};
use common::{EntityStore, LogPublisher, MemoryStore, Publisher};
use judge::{
    JudgeAppConfig, JudgeCoordinator, JudgePool, ProblemFile, ProcessSandbox, SubmissionService,
    Toolchains,
};
use mq::{MqConfig, MqPublisher, init_mq};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "judge", version, about = "Compile, run and judge programs against test cases")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Judge one source file against a TOML problem file and print the result as JSON
    Run {
        #[arg(long)]
        problem: PathBuf,
        #[arg(long)]
        source: PathBuf,
        #[arg(long, default_value = DEFAULT_LANGUAGE)]
        language: String,
    },
    /// List the languages the sandbox can judge
    Languages,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = JudgeAppConfig::load().context("Failed to load config")?;
    let toolchains = Toolchains::default();

    match cli.command {
        Command::Languages => {
            for language in toolchains.languages() {
                println!("{language}");
            }
            Ok(())
        }
        Command::Run {
            problem,
            source,
            language,
        } => run(config, toolchains, problem, source, language).await,
    }
}

async fn run(
    config: JudgeAppConfig,
    toolchains: Toolchains,
    problem_path: PathBuf,
    source_path: PathBuf,
    language: String,
) -> anyhow::Result<()> {
    if toolchains.get(&language).is_none() {
        bail!("Unsupported language: {language}");
    }

    let problem_text = tokio::fs::read_to_string(&problem_path)
        .await
        .with_context(|| format!("Failed to read {}", problem_path.display()))?;
    let problem_file = ProblemFile::parse(&problem_text)
        .with_context(|| format!("Invalid problem file {}", problem_path.display()))?;
    let code = tokio::fs::read_to_string(&source_path)
        .await
        .with_context(|| format!("Failed to read {}", source_path.display()))?;

    let store = Arc::new(MemoryStore::new());
    let problem = problem_file
        .seed(store.as_ref())
        .await
        .context("Failed to seed problem")?;
    let user = store
        .insert_user(NewUser {
            username: "local".into(),
            full_name: None,
        })
        .await
        .context("Failed to seed user")?;

    info!(
        worker = %config.worker.id,
        problem = %problem.title,
        test_cases = problem_file.test_cases.len(),
        %language,
        "Judging locally"
    );

    let publisher = publisher(&config.mq).await?;
    let sandbox = Arc::new(ProcessSandbox::new(toolchains, &config.sandbox));
    let coordinator = Arc::new(JudgeCoordinator::new(
        store.clone(),
        sandbox,
        publisher,
        config.scoring.resubmission,
    ));
    let pool = JudgePool::start(
        coordinator,
        config.worker.pool_size,
        config.worker.queue_capacity,
    );
    let service = SubmissionService::new(store.clone(), pool);

    let submission = service
        .submit(NewSubmission {
            user_id: user.id,
            problem_id: problem.id,
            contest_id: problem.contest_id,
            code,
            language: Some(language),
        })
        .await
        .context("Failed to submit")?;
    service.shutdown().await;

    let judged = store
        .submission(submission.id)
        .await
        .context("Failed to load judged submission")?;
    println!("{}", serde_json::to_string_pretty(&judged.view())?);
    Ok(())
}

async fn publisher(config: &MqAppConfig) -> anyhow::Result<Arc<dyn Publisher>> {
    if !config.enabled {
        return Ok(Arc::new(LogPublisher));
    }

    let queue = init_mq(MqConfig {
        url: config.url.clone(),
        pool_size: config.pool_size,
    })
    .await
    .context("Failed to initialize MQ")?;
    info!(url = %config.url, prefix = %config.topic_prefix, "MQ connected");

    Ok(Arc::new(MqPublisher::new(
        Arc::new(queue),
        config.topic_prefix.clone(),
    )))
}
