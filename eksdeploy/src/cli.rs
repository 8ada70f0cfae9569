use clap::{Parser, Subcommand};
use clap_verbosity_flag::Verbosity;

use crate::commands;

/// Styles for CLI
fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .literal(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::BrightCyan))),
    )
    .usage(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
}

#[derive(Debug, Parser)]
#[command(author, about, version)]
#[command(propagate_version = true)]
#[command(styles=get_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  #[clap(flatten)]
  pub verbose: Verbosity,

  /// Disable colored log output
  #[arg(long, global = true)]
  pub no_color: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
  /// Provision an EKS cluster and export its kubeconfig, endpoint and (optionally) name
  Deploy(commands::deploy::Deploy),

  /// Validate the inputs and print the resulting cluster spec
  ///
  /// No AWS API calls are made
  Plan(commands::plan::Plan),

  /// Export the outputs of an existing cluster
  Describe(commands::describe::Describe),
}

#[cfg(test)]
mod tests {
  use assert_cmd::prelude::*;
  use clap::CommandFactory;
  use rstest::*;

  use super::*;

  /// Runs `plan` from an empty directory so no `.eksdeploy.yaml` is picked up
  fn plan_command() -> (tempfile::TempDir, std::process::Command) {
    let bin_under_test = escargot::CargoBuild::new()
      .bin("eksdeploy")
      .current_release()
      .current_target()
      .run()
      .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let mut cmd = bin_under_test.command();
    cmd.current_dir(dir.path()).arg("plan");
    (dir, cmd)
  }

  #[test]
  fn verify_cli() {
    Cli::command().debug_assert();
  }

  #[rstest]
  #[case(&[], r#""source": "default""#)]
  #[case(&["--desired-capacity", "3", "--min-size", "3", "--max-size", "4"], r#""desiredCapacity": 3"#)]
  #[case(&["--max-size", "5"], r#""maxSize": 5"#)]
  fn plan_test(#[case] args: &[&str], #[case] expected: &str) {
    let (_dir, mut cmd) = plan_command();
    cmd
      .arg("--name")
      .arg("eks-for-tekton")
      .args(args)
      .assert()
      .success()
      .stdout(predicates::str::contains(expected))
      .stdout(predicates::str::contains(r#""name": "eks-for-tekton""#));
  }

  #[rstest]
  #[case(&["--name", "eks-for-tekton", "--desired-capacity", "5", "--min-size", "3", "--max-size", "4"], "invalid capacity")]
  #[case(&["--name", "eks-for-tekton", "--min-size", "-1"], "must not be negative")]
  #[case(&[], "cluster name must not be empty")]
  fn plan_failure_test(#[case] args: &[&str], #[case] expected: &str) {
    let (_dir, mut cmd) = plan_command();
    cmd
      .args(args)
      .assert()
      .failure()
      .stderr(predicates::str::contains(expected));
  }

  #[test]
  fn plan_reads_config_from_working_directory() {
    let (dir, mut cmd) = plan_command();
    std::fs::write(
      dir.path().join(".eksdeploy.yaml"),
      "cluster:\n  name: from-config\ncapacity:\n  maxSize: 6\n",
    )
    .unwrap();

    cmd
      .assert()
      .success()
      .stdout(predicates::str::contains(r#""name": "from-config""#))
      .stdout(predicates::str::contains(r#""maxSize": 6"#));
  }
}
