use crate::demo::{
    run_demo, run_questions, run_risk_level, run_task_import, run_task_list, run_validate,
    DemoArgs, QuestionsArgs, RiskLevelArgs, TaskImportArgs, TaskListArgs, ValidateArgs,
};
use crate::server;
use ai_governance::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "AI Governance Assessment Engine",
    about = "Run regulatory questionnaires, risk reviews and governance tasks from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print a regulation's questionnaire for the chosen mode
    Questions(QuestionsArgs),
    /// Validate a JSON answers file and optional evidence files
    Validate(ValidateArgs),
    /// Risk assessment utilities
    Risk {
        #[command(subcommand)]
        command: RiskCommand,
    },
    /// Governance task utilities
    Tasks {
        #[command(subcommand)]
        command: TaskCommand,
    },
    /// Run an end-to-end demo: wizard, autosave, evidence, risk review and tasks
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum RiskCommand {
    /// Compute the overall risk level from a JSON list of risk assessments
    Level(RiskLevelArgs),
}

#[derive(Subcommand, Debug)]
enum TaskCommand {
    /// List a regulation's governance task blueprint
    List(TaskListArgs),
    /// Apply a tracker CSV export to a demo system's governance tasks
    Import(TaskImportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Questions(args) => run_questions(args),
        Command::Validate(args) => run_validate(args).await,
        Command::Risk {
            command: RiskCommand::Level(args),
        } => run_risk_level(args),
        Command::Tasks {
            command: TaskCommand::List(args),
        } => run_task_list(args),
        Command::Tasks {
            command: TaskCommand::Import(args),
        } => run_task_import(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
