//! Taskline CLI - Command-line tools for the Taskline protocol layer
//!
//! Provides subcommands for translating event codes between host builds,
//! browsing the flag catalogs and running a sequence against the simulated
//! host.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use taskline::runtime::config::{load_or_default, write_config};
use taskline::runtime::event::{EVENT_INSERTIONS, EventKind};
use taskline::runtime::flags::{ConfigFlag, ResetFlag};
use taskline::runtime::status::ScriptTask;
use taskline::runtime::version::HostVersion;
use taskline::runtime::{ScriptConfig, ScriptContext, SimulatedHost, Vec3};

#[derive(Parser)]
#[command(name = "taskline")]
#[command(about = "Behavior command protocol tools", long_about = None)]
struct Cli {
    /// Script config file
    #[arg(short, long, default_value = "taskline.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate an event between canonical and host numbering
    Translate {
        /// Event name or canonical code (host code with --reverse)
        event: String,

        /// Host build, e.g. 1.0.791.2
        #[arg(long)]
        version: HostVersion,

        /// Map a host code back to the canonical event
        #[arg(long)]
        reverse: bool,
    },

    /// List known host builds
    Versions,

    /// List named behavior flags
    Flags {
        /// Mark flags unavailable on this build
        #[arg(long)]
        version: Option<HostVersion>,
    },

    /// Record and perform a sequence on the simulated host
    Demo {
        /// Host build to simulate (default: from config, else latest)
        #[arg(long)]
        version: Option<HostVersion>,

        /// Repeat the sequence
        #[arg(long)]
        repeat: bool,

        /// Frames to simulate
        #[arg(short, long, default_value = "16")]
        frames: u64,
    },

    /// Write a config file with defaults
    InitConfig {
        /// Resource load timeout in milliseconds
        #[arg(long, default_value = "1000")]
        timeout_ms: u64,

        /// Force a host build
        #[arg(long)]
        host_version: Option<HostVersion>,

        /// Trace every native call
        #[arg(long)]
        debug: bool,
    },
}

fn parse_event(input: &str) -> Result<EventKind> {
    if let Ok(code) = input.parse::<i32>() {
        return EventKind::from_canonical(code)
            .with_context(|| format!("No event with canonical code {}", code));
    }
    EventKind::ALL
        .iter()
        .copied()
        .find(|kind| format!("{:?}", kind).eq_ignore_ascii_case(input))
        .with_context(|| format!("Unknown event: {}", input))
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Translate {
            event,
            version,
            reverse,
        } => {
            if reverse {
                let code: i32 = event
                    .parse()
                    .with_context(|| format!("Host code must be a number: {}", event))?;
                match EventKind::from_host(code, version) {
                    Some(kind) => println!("{} on {} is {:?} ({})", code, version, kind, kind.canonical()),
                    None => bail!("{} is not an event code on {}", code, version),
                }
            } else {
                let kind = parse_event(&event)?;
                let code = kind.to_host(version)?;
                println!("{:?} ({}) on {} is {}", kind, kind.canonical(), version, code);
            }
        }

        Commands::Versions => {
            for version in HostVersion::ALL {
                let shifts = EVENT_INSERTIONS
                    .iter()
                    .filter(|point| *version < point.since)
                    .count();
                println!("{}  missing event insertions: {}", version, shifts);
            }
        }

        Commands::Flags { version } => {
            let available = |since: Option<HostVersion>| match (version, since) {
                (Some(version), Some(since)) => version >= since,
                _ => true,
            };

            println!("Config flags:");
            for info in ConfigFlag::CATALOG {
                let marker = if available(info.since) { " " } else { "x" };
                println!("{} {:>4}  {}", marker, info.flag.code(), info.name);
            }
            println!("Reset flags:");
            for info in ResetFlag::CATALOG {
                let marker = if available(info.since) { " " } else { "x" };
                println!("{} {:>4}  {}", marker, info.flag.code(), info.name);
            }
        }

        Commands::Demo {
            version,
            repeat,
            frames,
        } => {
            let mut config = load_or_default(&cli.config)?;
            if version.is_some() {
                config.host_version = version;
            }
            let host = Arc::new(SimulatedHost::new(config.host_version));
            let ctx = ScriptContext::new(host.clone(), config)?;
            let actor = host.spawn_actor();

            let mut sequence = ctx.open_sequence()?;
            {
                let tasks = sequence.tasks()?;
                tasks.wait(500)?;
                tasks.go_to(Vec3::zero())?;
                tasks.wait(500)?;
            }
            sequence.close(repeat)?;
            println!(
                "Recorded sequence {} with {} commands",
                sequence.handle(),
                sequence.count()
            );

            ctx.tasks(actor)?.perform_sequence(&mut sequence)?;
            let status = ctx.status(actor)?;
            for _ in 0..frames {
                let progress = status
                    .sequence_progress()?
                    .map_or_else(|| "-".to_string(), |p| p.to_string());
                println!(
                    "  frame {:>3}: progress {}, {:?}",
                    host.frame(),
                    progress,
                    status.script_task(ScriptTask::PERFORM_SEQUENCE)?
                );
                host.advance_frame();
            }
        }

        Commands::InitConfig {
            timeout_ms,
            host_version,
            debug,
        } => {
            let config = ScriptConfig {
                resource_load_timeout_ms: timeout_ms,
                host_version,
                debug,
            };
            write_config(&cli.config, &config)?;
            println!("Wrote config to {:?}", cli.config);
        }
    }

    Ok(())
}
