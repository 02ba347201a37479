mod core;
mod release;

use crate::core::error::{ReleaseError, ReleaseResult, ResultExt, print_error};
use crate::core::scripts::ShellRunner;
use crate::core::vcs::SystemGit;
use crate::release::{Orchestrator, ReleaseScripts};
use clap::Parser;
use std::path::PathBuf;

/// Automate a two-branch git release: sync develop/master, bump, tag, publish
#[derive(Parser)]
#[command(name = "release-train")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  /// Release kind: --prepatch|--preminor|--premajor|--prerelease|--patch|--minor|--major
  #[arg(value_name = "KIND", allow_hyphen_values = true)]
  kind: String,

  /// Remote to synchronize with
  #[arg(long, default_value = "origin")]
  remote: String,

  /// Package manifest holding the version
  #[arg(long, default_value = "Cargo.toml", value_name = "PATH")]
  manifest_path: PathBuf,

  /// Dependency install command (runs first)
  #[arg(long, default_value = "cargo fetch", value_name = "CMD")]
  install_cmd: String,

  /// Lint command (runs after install)
  #[arg(long, default_value = "cargo clippy --all-targets -- -D warnings", value_name = "CMD")]
  lint_cmd: String,

  /// Unit test command (runs after lint)
  #[arg(long, default_value = "cargo test", value_name = "CMD")]
  test_cmd: String,

  /// Deploy command (runs after the version bump)
  #[arg(long, default_value = "cargo publish", value_name = "CMD")]
  deploy_cmd: String,

  /// Print the session log as JSON at exit
  #[arg(long)]
  json: bool,
}

fn main() {
  let cli = Cli::parse();

  // Classify before any git interaction
  let kind = match release::classify(&cli.kind) {
    Ok(kind) => kind,
    Err(err) => handle_error(err),
  };

  let cwd = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => {
      eprintln!("Error: Failed to get current directory: {}", e);
      std::process::exit(1);
    }
  };

  let vcs = match SystemGit::open(&cwd) {
    Ok(vcs) => vcs,
    Err(err) => handle_error(err),
  };
  let runner = ShellRunner::new(&cwd);

  let scripts = ReleaseScripts {
    install: cli.install_cmd,
    lint: cli.lint_cmd,
    test: cli.test_cmd,
    deploy: cli.deploy_cmd,
  };

  let mut orchestrator = Orchestrator::new(&vcs, &runner, kind, cli.remote, cli.manifest_path, scripts);
  let result = orchestrator.make_release();

  if cli.json {
    if let Err(err) = print_session(orchestrator.session()) {
      handle_error(err);
    }
  }

  if let Err(err) = result {
    handle_error(err);
  }
}

fn print_session(session: &crate::core::session::ReleaseSession) -> ReleaseResult<()> {
  let report = serde_json::to_string_pretty(session).context("Failed to serialize the session report")?;
  println!("{}", report);
  Ok(())
}

fn handle_error(err: ReleaseError) -> ! {
  print_error(&err);
  std::process::exit(1);
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}
