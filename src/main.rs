use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use init_dev_branch::config;
use init_dev_branch::git::Git2Repository;
use init_dev_branch::ui;
use init_dev_branch::version::VersionTag;
use init_dev_branch::workspace::LocalWorkspace;
use init_dev_branch::{BranchInitializer, InitError, Summary};

#[derive(clap::Parser)]
#[command(
    name = "init-dev-branch",
    version,
    about = "Create a Major.Minor.Revision_Dev development branch from the synced trunk"
)]
struct Args {
    #[arg(
        value_name = "BRANCH_NAME",
        help = "Development branch to create, e.g. 1.0.1_Dev"
    )]
    branch_name: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(
        short = 'C',
        long,
        help = "Repository root (defaults to the current directory)"
    )]
    repo: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // clap exits with 2 on usage errors; every failure here is 1
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    let Some(branch_name) = args.branch_name.as_deref() else {
        eprintln!("{}", Args::command().render_usage());
        ui::display_error("Missing BRANCH_NAME (expected Major.Minor.Revision_Dev, e.g. 1.0.1_Dev)");
        return ExitCode::FAILURE;
    };

    match run(branch_name, &args) {
        Ok(summary) => {
            ui::display_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(err) => {
            match err.downcast_ref::<InitError>() {
                Some(init_err) => ui::display_init_error(init_err),
                None => ui::display_error(&format!("{:#}", err)),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(branch_name: &str, args: &Args) -> Result<Summary> {
    // Reject a malformed name before touching configuration or the repository
    VersionTag::parse(branch_name)?;

    let root = match &args.repo {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("Cannot determine the current directory")?,
    };

    let config = config::load_config(args.config.as_deref(), &root)?;
    let repo = Git2Repository::open(&root);
    let workspace = LocalWorkspace::new(&root);

    ui::display_status(&format!(
        "Initializing development branch {} in {}",
        branch_name,
        root.display()
    ));

    let summary = BranchInitializer::new(&repo, &workspace, &config).initialize(branch_name)?;
    Ok(summary)
}
