//! CLI entry point for vibe-monitor.
//!
//! Watches a directory tree and plays a sound once file activity has been
//! quiet for a configured number of seconds. Handy for hearing when a coding
//! agent or a long build has finished touching your project.
//!
//! # Usage
//!
//! ```bash
//! vibe-monitor --watch-path <DIR> [OPTIONS]
//!
//! # Alert with the default sound after 60s of silence
//! vibe-monitor --watch-path ~/projects/app
//!
//! # Pick a sound and a shorter delay
//! vibe-monitor --watch-path . --sound wow --delay 30
//!
//! # Show the configured sounds
//! vibe-monitor --list-sounds
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod session;

use std::io::Write;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use color_eyre::eyre::{WrapErr, eyre};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use vibe_core::config::{parse_delay, parse_volume};
use vibe_core::{CONFIG_FILE_NAME, Config, ExclusionRules, LoadOutcome, read_pattern_file};
use vibe_notify::{SoundLibrary, SoundPlayer};
use vibe_watcher::{DebounceTracker, ExclusionFilter, FileWatcher};

use crate::session::Monitor;

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Plays a sound when file activity in a directory has gone quiet.
///
/// Any change to a non-excluded file restarts the countdown. Once the
/// directory has been silent for the configured delay, the sound plays once
/// and the monitor waits for the next burst of activity.
#[derive(Parser)]
#[command(name = "vibe-monitor", version, about, long_about = None)]
struct Cli {
    /// Directory to watch (recursively).
    #[arg(
        long = "watch-path",
        alias = "watch_path",
        env = "VIBE_MONITOR_WATCH_PATH",
        required_unless_present = "list_sounds"
    )]
    watch_path: Option<Utf8PathBuf>,

    /// Sound to play (defaults to `settings.default_sound`).
    #[arg(short, long)]
    sound: Option<String>,

    /// Seconds of inactivity before the sound plays (fractions allowed).
    #[arg(short, long, value_parser = parse_delay)]
    delay: Option<Duration>,

    /// File of file-name patterns replacing `excluded_files`, one per line.
    #[arg(long)]
    exclude_file: Option<Utf8PathBuf>,

    /// File of folder names replacing `excluded_folders`, one per line.
    #[arg(long)]
    exclude_dir: Option<Utf8PathBuf>,

    /// Playback volume between 0.0 and 1.0.
    #[arg(long, value_parser = parse_volume)]
    volume: Option<f32>,

    /// Path to `config.json`.
    ///
    /// Defaults to `config.json` next to the executable.
    #[arg(short, long, env = "VIBE_MONITOR_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long)]
    no_color: bool,

    /// Print the configured sounds and exit.
    #[arg(long)]
    list_sounds: bool,
}

/// Everything a monitor session needs, validated up front.
#[derive(Debug)]
struct MonitorPlan {
    watch_path: Utf8PathBuf,
    sound: String,
    delay: Duration,
    volume: f32,
    rules: ExclusionRules,
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default.
/// The `notify` backend is filtered to `warn` level.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},mio=warn,notify=warn"))
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(use_ansi))
        .with(filter)
        .init();
}

/// Returns the config file location: `--config`, or `config.json` beside the
/// executable.
fn resolve_config_path(cli: &Cli) -> color_eyre::Result<Utf8PathBuf> {
    if let Some(path) = &cli.config {
        return Ok(path.clone());
    }

    let exe = std::env::current_exe().wrap_err("Failed to locate the executable")?;
    let exe = Utf8PathBuf::from_path_buf(exe)
        .map_err(|p| eyre!("Executable path is not UTF-8: {}", p.display()))?;
    let dir = exe.parent().unwrap_or_else(|| Utf8Path::new("."));
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Loads the configuration, logging how it was obtained.
fn load_config(path: &Utf8Path) -> Config {
    let (config, outcome) = Config::load_or_default(path);
    match outcome {
        LoadOutcome::Loaded => info!(path = %path, "Loaded configuration"),
        LoadOutcome::CreatedDefault => {
            info!(path = %path, "Created default configuration file");
        }
        LoadOutcome::DefaultWriteFailed(e) => {
            error!(path = %path, error = %e, "Failed to write default configuration");
        }
        LoadOutcome::Fallback(e) => {
            error!(path = %path, error = %e, "Failed to load configuration, using defaults");
        }
    }
    config
}

/// Validates CLI overrides against the configuration.
///
/// # Errors
///
/// Returns an error if the watch path is missing or not a directory, the
/// sound is unknown, or an exclusion override file cannot be read.
fn build_plan(cli: &Cli, config: &Config) -> color_eyre::Result<MonitorPlan> {
    let watch_path = cli
        .watch_path
        .clone()
        .ok_or_else(|| eyre!("--watch-path is required"))?;

    if !watch_path.exists() {
        return Err(eyre!("Directory {watch_path} does not exist"));
    }
    if !watch_path.is_dir() {
        return Err(eyre!("{watch_path} is not a directory"));
    }

    let sound = cli
        .sound
        .clone()
        .unwrap_or_else(|| config.settings.default_sound.clone());
    config.ensure_sound(&sound)?;

    let delay = cli.delay.unwrap_or_else(|| config.quiet_threshold());
    let volume = cli.volume.unwrap_or_else(|| config.volume());

    let mut rules = config.exclusion_rules();
    if let Some(path) = &cli.exclude_file {
        rules = rules.with_file_overrides(read_pattern_file(path)?);
    }
    if let Some(path) = &cli.exclude_dir {
        rules = rules.with_folder_overrides(read_pattern_file(path)?);
    }

    Ok(MonitorPlan {
        watch_path,
        sound,
        delay,
        volume,
        rules,
    })
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Prints each configured sound and its resolved file.
fn run_list_sounds(library: &SoundLibrary) -> color_eyre::Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    for (name, path) in library.iter() {
        let marker = if name == library.default_sound() {
            " (default)"
        } else {
            ""
        };
        writeln!(handle, "{name}{marker}\t{path}")?;
    }
    Ok(())
}

/// Watches until interrupted or the watcher fails.
///
/// # Errors
///
/// Returns an error if the watcher cannot start or fails while running.
async fn run_monitor(
    plan: MonitorPlan,
    config: &Config,
    library: SoundLibrary,
) -> color_eyre::Result<()> {
    let filter = ExclusionFilter::new(&plan.rules);
    let mut watcher = FileWatcher::new(&plan.watch_path, &config.watch, filter)
        .await
        .wrap_err_with(|| format!("Failed to watch {}", plan.watch_path))?;

    info!(path = %watcher.watch_path(), "Monitoring directory");
    info!(sound = %plan.sound, "Notification sound");
    info!(seconds = plan.delay.as_secs_f64(), "Inactivity timeout");
    info!("Volume: {:.0}%", plan.volume * 100.0);
    info!("Press Ctrl+C to stop monitoring");

    let tracker = DebounceTracker::starting_at(plan.sound, plan.delay, session::now());
    let player = SoundPlayer::new(library, plan.volume);
    let mut monitor = Monitor::new(tracker, player, config.watch.poll_interval());

    let result = monitor.run(watcher.events(), shutdown_signal()).await;
    let result = session::settle(result, watcher.shutdown().await);
    info!("Stopped monitoring");

    result.wrap_err("File watcher failed")
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    () = ctrl_c => {}
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    ctrl_c.await;
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Initialize tracing (handles --no-color for log output)
    init_tracing(cli.verbose, cli.no_color);

    // 4. Load configuration; relative sound paths resolve beside it
    let config_path = resolve_config_path(&cli)?;
    let config = load_config(&config_path);
    let config_dir = config_path
        .parent()
        .filter(|p| !p.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let library = SoundLibrary::from_config(&config, config_dir);

    if cli.list_sounds {
        return run_list_sounds(&library);
    }

    // 5. Validate overrides and run
    let plan = build_plan(&cli, &config)?;
    run_monitor(plan, &config, library).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_utf8_dir() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, path)
    }

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["vibe-monitor"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_watch_path_required_without_list_sounds() {
        assert!(Cli::try_parse_from(["vibe-monitor"]).is_err());
        assert!(Cli::try_parse_from(["vibe-monitor", "--list-sounds"]).is_ok());
    }

    #[test]
    fn test_underscore_alias() {
        let cli = parse(&["--watch_path", "/tmp"]);
        assert_eq!(cli.watch_path.as_deref(), Some(Utf8Path::new("/tmp")));
    }

    #[test]
    fn test_volume_out_of_range_rejected() {
        assert!(Cli::try_parse_from(["vibe-monitor", "--list-sounds", "--volume", "2"]).is_err());
    }

    #[test]
    fn test_fractional_delay_flag() {
        let cli = parse(&["--list-sounds", "--delay", "2.5"]);
        assert_eq!(cli.delay, Some(Duration::from_millis(2500)));
        assert!(Cli::try_parse_from(["vibe-monitor", "--list-sounds", "--delay", "-1"]).is_err());
    }

    #[test]
    fn test_plan_uses_config_defaults() {
        let (_guard, dir) = temp_utf8_dir();
        let cli = parse(&["--watch-path", dir.as_str()]);
        let plan = build_plan(&cli, &Config::default()).unwrap();

        assert_eq!(plan.watch_path, dir);
        assert_eq!(plan.sound, "jobs-done");
        assert_eq!(plan.delay, Duration::from_secs(60));
        assert!((plan.volume - 0.5).abs() < f32::EPSILON);
        assert!(plan.rules.files().iter().any(|f| f == "*.tmp"));
        assert!(plan.rules.folders().iter().any(|f| f == "node_modules"));
    }

    #[test]
    fn test_plan_applies_overrides() {
        let (_guard, dir) = temp_utf8_dir();
        let files = dir.join("files.txt");
        std::fs::write(&files, "# scratch files\n*.bak\n\n  notes.txt  \n").unwrap();
        let empty = dir.join("empty.txt");
        std::fs::write(&empty, "\n# nothing here\n").unwrap();

        let cli = parse(&[
            "--watch-path",
            dir.as_str(),
            "--sound",
            "wow",
            "--delay",
            "5",
            "--volume",
            "0.8",
            "--exclude-file",
            files.as_str(),
            "--exclude-dir",
            empty.as_str(),
        ]);
        let plan = build_plan(&cli, &Config::default()).unwrap();

        assert_eq!(plan.sound, "wow");
        assert_eq!(plan.delay, Duration::from_secs(5));
        assert!((plan.volume - 0.8).abs() < f32::EPSILON);
        assert_eq!(plan.rules.files(), ["*.bak", "notes.txt"]);
        // Empty override keeps the configured folders.
        assert_eq!(plan.rules.folders(), Config::default().excluded_folders);
    }

    #[test]
    fn test_plan_rejects_missing_directory() {
        let (_guard, dir) = temp_utf8_dir();
        let missing = dir.join("nope");
        let cli = parse(&["--watch-path", missing.as_str()]);

        let err = build_plan(&cli, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_plan_rejects_unknown_sound() {
        let (_guard, dir) = temp_utf8_dir();
        let cli = parse(&["--watch-path", dir.as_str(), "--sound", "kazoo"]);

        let err = build_plan(&cli, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("kazoo"));
    }

    #[test]
    fn test_plan_rejects_unreadable_override() {
        let (_guard, dir) = temp_utf8_dir();
        let missing = dir.join("missing.txt");
        let cli = parse(&["--watch-path", dir.as_str(), "--exclude-file", missing.as_str()]);

        assert!(build_plan(&cli, &Config::default()).is_err());
    }

    #[test]
    fn test_explicit_config_path() {
        let cli = parse(&["--list-sounds", "--config", "/etc/vibe/config.json"]);
        assert_eq!(
            resolve_config_path(&cli).unwrap(),
            Utf8PathBuf::from("/etc/vibe/config.json")
        );
    }
}
