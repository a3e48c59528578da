// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! - `cargo xtask ci` runs lint, build and test in that order
//! - `cargo xtask generate-leads 200 --output seed.json` writes random
//!   sample leads for a development database

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod generate_leads;

use std::path::PathBuf;

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{eyre::Context, Result};
use duct::{cmd, Expression};
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    if let Err(err) = args.command.run() {
        tracing::error!("{err:?}");
        std::process::exit(1);
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Lint formatting, typos, clippy, and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Check for typos in the project
    #[command(visible_alias = "lt")]
    LintTypos,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Write random sample leads as a JSON array
    #[command(visible_alias = "gl")]
    GenerateLeads {
        /// Number of leads to generate
        #[arg(default_value_t = 50)]
        count: usize,

        /// File to write
        #[arg(short, long, default_value = "sample_leads.json")]
        output: PathBuf,
    },
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => {
                Self::Lint.run()?;
                Self::Build.run()?;
                Self::Test.run()
            }
            Self::Build => cargo(&["build", "--all-targets", "--all-features"]).run_with_trace(),
            Self::Check => cargo(&["check", "--all-targets", "--all-features"]).run_with_trace(),
            Self::Lint => [
                Self::LintClippy,
                Self::LintDocs,
                Self::LintFormatting,
                Self::LintTypos,
            ]
            .into_iter()
            .try_for_each(Self::run),
            Self::LintClippy => {
                cargo(&["clippy", "--all-targets", "--all-features", "--", "-D", "warnings"])
                    .run_with_trace()
            }
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => nightly(&cargo(&["fmt", "--all", "--check"])).run_with_trace(),
            Self::LintTypos => cmd!("typos").run_with_trace(),
            Self::FixFormatting => nightly(&cargo(&["fmt", "--all"])).run_with_trace(),
            Self::Test => {
                cargo(&["test", "--all-targets", "--all-features"]).run_with_trace()?;
                cargo(&["test", "--doc", "--all-features"]).run_with_trace()
            }
            Self::GenerateLeads { count, output } => generate_leads::write_leads(count, &output),
        }
    }
}

fn cargo(args: &[&str]) -> Expression {
    cmd("cargo", args)
}

/// Switches an expression to the nightly toolchain. `CARGO` is unset because
/// xtask itself runs under cargo and would otherwise pin the stable binary.
fn nightly(expression: &Expression) -> Expression {
    expression
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
}

/// Builds each workspace crate's docs with the flags docs.rs uses.
fn lint_docs() -> Result<()> {
    let metadata = MetadataCommand::new()
        .exec()
        .wrap_err("failed to read cargo metadata")?;

    for package in metadata.workspace_default_packages() {
        let args: [&str; 5] = [
            "doc",
            "--no-deps",
            "--all-features",
            "--package",
            package.name.as_str(),
        ];
        nightly(&cargo(&args))
            .env("RUSTDOCFLAGS", "--cfg docsrs -D warnings")
            .run_with_trace()?;
    }
    Ok(())
}

trait ExpressionExt {
    /// Logs the command, runs it, and logs it again on failure.
    fn run_with_trace(&self) -> Result<()>;
}

impl ExpressionExt for Expression {
    fn run_with_trace(&self) -> Result<()> {
        tracing::info!("running command: {self:?}");
        self.run()
            .map(|_| ())
            .inspect_err(|_| tracing::error!("failed to run command: {self:?}"))
            .wrap_err("command failed")
    }
}
