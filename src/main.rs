use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use gradle_test_xml::{
    constants::{EXIT_FAILURE, EXIT_SUCCESS, LOG_FILTER_ENV, PROJECT_DIR_ENV, TASK_ENV},
    context::RunContext,
    dispatch::GradleCommandDispatcher,
    displayer::TestXmlDisplayer,
    junit::reader::{ParserOptions, DEFAULT_READ_BUFFER_CAPACITY},
    print::{print_invocations, print_report},
    project::{JavaTestTask, StaticGradleProject, DEFAULT_TEST_TASK_NAME},
    rerun::RerunKind,
    session::memory::InMemorySession,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    version = std::env!("CARGO_PKG_VERSION"),
    name = "gradle-test-xml",
    about = "Shows the XML test reports of a Gradle test task"
)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Debug)]
struct DisplayArgs {
    #[arg(
        long,
        env = PROJECT_DIR_ENV,
        default_value = ".",
        help = "Path to the Gradle project directory."
    )]
    project_dir: PathBuf,
    #[arg(
        long,
        env = TASK_ENV,
        default_value = DEFAULT_TEST_TASK_NAME,
        help = "Name of the test task whose reports are shown."
    )]
    task: String,
    #[arg(long, help = "Display name of the project. Defaults to the directory name.")]
    project_name: Option<String>,
    #[arg(
        long,
        help = "Report directory of the test task. Defaults to build/test-results."
    )]
    xml_output_dir: Option<PathBuf>,
    #[arg(
        long,
        default_value_t = DEFAULT_READ_BUFFER_CAPACITY,
        help = "Initial size in bytes of the XML read buffer."
    )]
    read_buffer_capacity: usize,
    #[arg(long, help = "Print the session as JSON instead of text.")]
    json: bool,
    #[arg(
        long,
        conflicts_with = "rerun_all",
        help = "Print the Gradle command rerunning the failed testcases."
    )]
    rerun_failed: bool,
    #[arg(long, help = "Print the Gradle command rerunning the whole test task.")]
    rerun_all: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Read the reports of a test task and print the resulting test session
    Display(DisplayArgs),
}

fn main() -> anyhow::Result<()> {
    setup_logger();
    let cli = Cli::parse();
    match run(cli) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            tracing::error!("Error: {:?}", e);
            std::process::exit(exitcode::SOFTWARE);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    match cli.command {
        Commands::Display(display_args) => run_display(display_args),
    }
}

fn run_display(display_args: DisplayArgs) -> anyhow::Result<i32> {
    let DisplayArgs {
        project_dir,
        task,
        project_name,
        xml_output_dir,
        read_buffer_capacity,
        json,
        rerun_failed,
        rerun_all,
    } = display_args;

    let project_name = match project_name {
        Some(project_name) => project_name,
        None => project_dir
            .canonicalize()
            .with_context(|| format!("Could not resolve {}", project_dir.display()))?
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("project")),
    };

    let mut project = StaticGradleProject::new(project_name, project_dir);
    if let Some(xml_output_dir) = xml_output_dir {
        project = project.with_test_task(JavaTestTask::new(task.clone(), Some(xml_output_dir)));
    }

    let dispatcher = Arc::new(GradleCommandDispatcher::new());
    let displayer = TestXmlDisplayer::new(Arc::new(project), dispatcher.clone(), task.clone())
        .with_parser_options(ParserOptions {
            read_buffer_capacity,
        });

    let mut session = InMemorySession::new();
    let run_context = RunContext::new().with_test_task_name(task);
    if !displayer.display_report(run_context, &mut session) {
        return Ok(exitcode::NOINPUT);
    }

    let report = session.report();
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if rerun_all {
        session.rerun(&RerunKind::All);
    } else if rerun_failed && !session.rerun(&RerunKind::Custom) {
        tracing::info!("No failed testcases to rerun");
    }
    print_invocations(&dispatcher.invocations());

    Ok(if report.counts.has_failures() {
        EXIT_FAILURE
    } else {
        EXIT_SUCCESS
    })
}

fn setup_logger() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
