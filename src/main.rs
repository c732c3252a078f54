//! CLI entry point for karabiner-chord-compiler
//!
//! Provides command-line interface for rendering the compiled rule
//! document, checking rule definitions, and installing them into the
//! daemon's configuration.

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use karabiner_chord_compiler::config::{render_rule_set, ProfileWriter};
use karabiner_chord_compiler::core::conflict::find_shadowed;
use karabiner_chord_compiler::rules::{build_profile, launcher_coverage, ProfileParams, WmBackend};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "karabiner-chord-compiler")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the rules and print the document to stdout
    Build {
        #[command(flatten)]
        rules: RuleArgs,
    },

    /// Compile the rules and report conflicts, shadowed chords and
    /// launcher coverage gaps without writing anything
    Check {
        #[command(flatten)]
        rules: RuleArgs,
    },

    /// Compile the rules and merge them into the daemon's configuration
    Install {
        #[command(flatten)]
        rules: RuleArgs,

        /// Path to the daemon's configuration file
        #[arg(short, long, default_value = "~/.config/karabiner/karabiner.json")]
        config: PathBuf,
    },
}

/// Arguments shared by every subcommand: they parameterise the compiled
/// rule set.
#[derive(Parser)]
struct RuleArgs {
    /// Daemon profile receiving the compiled rules
    #[arg(short, long, default_value = "Default")]
    profile: String,

    /// Window-manager backend for run-command rules
    #[arg(long, value_enum, default_value = "aerospace")]
    wm: WmChoice,

    /// Override the window manager's program path
    #[arg(long)]
    wm_path: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum WmChoice {
    Aerospace,
    Yabai,
}

impl RuleArgs {
    fn into_params(self) -> ProfileParams {
        let wm = match self.wm {
            WmChoice::Aerospace => WmBackend::aerospace(),
            WmChoice::Yabai => WmBackend::yabai(),
        };
        let wm = match self.wm_path {
            Some(path) => wm.with_program(path),
            None => wm,
        };

        ProfileParams {
            profile_name: self.profile,
            wm,
            ..ProfileParams::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { rules } => build(rules.into_params())?,
        Commands::Check { rules } => check(rules.into_params())?,
        Commands::Install { rules, config } => install(rules.into_params(), &config)?,
    }

    Ok(())
}

/// Compile and print the full document.
fn build(params: ProfileParams) -> anyhow::Result<()> {
    let profile = compile_or_exit(&params);
    print!("{}", render_rule_set(&profile)?);
    Ok(())
}

/// Compile and report every analysis without writing anything.
fn check(params: ProfileParams) -> anyhow::Result<()> {
    let profile = compile_or_exit(&params);

    let manipulators: usize = profile.rules.iter().map(|r| r.manipulators.len()).sum();
    println!(
        "{} Compiled {} rules ({} manipulators)\n",
        "✓".green(),
        profile.rules.len(),
        manipulators
    );

    let mut warnings = 0;

    let shadowed = find_shadowed(&profile);
    for shadow in &shadowed {
        println!("{} {}", "⚠".yellow().bold(), shadow);
        warnings += 1;
    }

    for key in launcher_coverage(&params) {
        println!(
            "{} launcher key {} is mapped in only one device variant",
            "⚠".yellow().bold(),
            format!("{}", key).cyan()
        );
        warnings += 1;
    }

    if warnings == 0 {
        println!("{} {}", "✓".green().bold(), "No conflicts detected!".bold());
    } else {
        println!(
            "\n{} warning{} — the rules still compile and install",
            warnings,
            if warnings == 1 { "" } else { "s" }
        );
    }

    Ok(())
}

/// Compile and merge into the daemon's configuration.
fn install(params: ProfileParams, config_path: &PathBuf) -> anyhow::Result<()> {
    let profile = compile_or_exit(&params);

    let expanded_path = shellexpand::tilde(
        config_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid path encoding"))?,
    );
    let path = PathBuf::from(expanded_path.as_ref());

    println!("{} Installing into: {}", "→".cyan(), path.display());

    let writer = ProfileWriter::new(path)?;
    writer.install(&profile)?;

    println!(
        "{} Installed {} rules into profile {}",
        "✓".green().bold(),
        profile.rules.len(),
        profile.name.cyan()
    );

    Ok(())
}

/// Compiles the rule set; a structural error aborts before anything is
/// rendered or written.
fn compile_or_exit(params: &ProfileParams) -> karabiner_chord_compiler::core::types::Profile {
    match build_profile(params) {
        Ok(profile) => profile,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    }
}
