//! Developer tasks for the `lookupsync` workspace.
//!
//! Run with: `cargo xtask <task>`. Output goes to the terminal, so the
//! print lints are relaxed here.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::env;
use std::process::{Command, ExitCode};

use anyhow::{bail, Context, Result};

mod features;

/// A named task and what `help` says about it.
struct Task {
    name: &'static str,
    about: &'static str,
    run: fn() -> Result<()>,
}

const TASKS: &[Task] = &[
    Task { name: "ci", about: "fmt, clippy, feature tiers and tests, in order", run: run_ci },
    Task { name: "fmt", about: "check formatting", run: run_fmt },
    Task { name: "clippy", about: "lint the workspace with warnings denied", run: run_clippy },
    Task { name: "test", about: "run every workspace test", run: run_test },
    Task {
        name: "test-features",
        about: "check each lookupsync-common tier on its own",
        run: features::test_feature_matrix,
    },
];

fn main() -> ExitCode {
    let Some(name) = env::args().nth(1).filter(|name| name != "help") else {
        print_help();
        return ExitCode::SUCCESS;
    };

    let Some(task) = TASKS.iter().find(|task| task.name == name) else {
        eprintln!("unknown task: {name}\n");
        print_help();
        return ExitCode::FAILURE;
    };

    match (task.run)() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("xtask {name} failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn print_help() {
    println!("usage: cargo xtask <task>\n\ntasks:");
    for task in TASKS {
        println!("    {:<15}{}", task.name, task.about);
    }
}

fn run_ci() -> Result<()> {
    let steps = TASKS.iter().filter(|task| task.name != "ci");
    for (index, task) in steps.enumerate() {
        println!("==> [{}/{}] {}", index + 1, TASKS.len() - 1, task.name);
        (task.run)().with_context(|| format!("ci step `{}`", task.name))?;
    }
    println!("==> ci passed");
    Ok(())
}

fn run_fmt() -> Result<()> {
    cargo(&["fmt", "--all", "--", "--check"], "formatting differs; run `cargo fmt --all`")
}

fn run_clippy() -> Result<()> {
    let mut args = vec!["clippy", "--workspace", "--all-features"];
    if env::var_os("XTASK_CLIPPY_ALL_TARGETS").is_some() {
        args.push("--all-targets");
    }
    args.extend(["--", "-D", "warnings"]);
    cargo(&args, "clippy reported warnings")
}

fn run_test() -> Result<()> {
    cargo(&["test", "--workspace", "--all-features"], "tests failed")
}

/// Run `cargo` with `args`, failing with `failure` on a non-zero exit.
fn cargo(args: &[&str], failure: &str) -> Result<()> {
    let status = Command::new("cargo")
        .args(args)
        .status()
        .with_context(|| format!("failed to spawn `cargo {}`", args.join(" ")))?;
    if !status.success() {
        bail!("{failure}");
    }
    Ok(())
}
