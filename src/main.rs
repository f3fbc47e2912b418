//! Keyclack - audible key-press feedback for Linux
//!
//! Run with `keyclack` or `keyclack daemon` to start the daemon.
//! Use `keyclack devices` to see which input device will be used.
//! Use `keyclack play <category>` to test the player and sound files.

use clap::Parser;
use keyclack::config::{self, Config};
use keyclack::input::{self, select_device};
use keyclack::sound::{CommandPlayer, SoundCategory, SoundDispatcher, SoundSet};
use keyclack::{logging, Cli, Commands, Daemon};
use std::backtrace::Backtrace;
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Library errors carry a backtrace into the fatal log unless the user chose otherwise
    if std::env::var_os("RUST_BACKTRACE").is_none()
        && std::env::var_os("RUST_LIB_BACKTRACE").is_none()
    {
        std::env::set_var("RUST_LIB_BACKTRACE", "1");
    }

    let config = config::load_config(cli.config.as_deref());

    // Only the daemon writes the log file, so inspecting commands don't truncate it
    let is_daemon = matches!(cli.command, None | Some(Commands::Daemon));
    let log_file = match (&config, is_daemon) {
        (Ok(config), true) => config.resolve_log_file(),
        (Err(_), true) => Config::default().resolve_log_file(),
        (_, false) => None,
    };

    logging::init(
        &logging::default_directive(cli.quiet, cli.verbose),
        log_file.as_deref(),
    );
    install_panic_hook();

    let result = config
        .map_err(anyhow::Error::from)
        .and_then(|config| {
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .map_err(anyhow::Error::from)
                .and_then(|runtime| runtime.block_on(run(cli, config)))
        });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("FATAL ERROR: {:#}", e);
            // Captured where the error became an anyhow::Error on this thread,
            // not inside the reader thread; the chain above names the device fault
            tracing::error!("{}", e.backtrace());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, mut config: Config) -> anyhow::Result<()> {
    if let Some(dir) = cli.sound_dir {
        config.sound_dir = dir;
    }

    match cli.command.unwrap_or(Commands::Daemon) {
        Commands::Daemon => {
            tracing::info!("=== KEYCLACK STARTING ===");
            if let Some(path) = config.resolve_log_file() {
                tracing::info!("Log file: {:?}", path);
            }
            let mut daemon = Daemon::new(&config);
            daemon.run().await?;
        }

        Commands::Devices => {
            list_devices()?;
        }

        Commands::Config => {
            show_config(&config);
        }

        Commands::Play { category } => {
            let category: SoundCategory = category.parse().map_err(anyhow::Error::msg)?;
            let dispatcher = SoundDispatcher::new(
                SoundSet::from_dir(&config.sound_dir),
                Arc::new(CommandPlayer::new(&config.player)),
            );
            dispatcher.play(category)?;
            println!("Playing: {}", category);
        }
    }

    Ok(())
}

/// Log panics (including the reader thread's) with a backtrace before unwinding
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        tracing::error!("FATAL ERROR: {}", info);
        tracing::error!("{}", Backtrace::force_capture());
    }));
}

/// Print every input device and the one the daemon would pick
fn list_devices() -> anyhow::Result<()> {
    let source = input::create_source();
    let devices = source.enumerate()?;

    if devices.is_empty() {
        println!("No input devices found.");
        return Ok(());
    }

    println!("Input Devices\n");
    println!("=============\n");

    for device in &devices {
        let keyboard_keys = device.supports("KEY_A") && device.supports("KEY_SPACE");
        println!(
            "  {}  {:?}  ({} keys{})",
            device.path.display(),
            device.name,
            device.keys.len(),
            if keyboard_keys { ", has A + Space" } else { "" }
        );
    }

    let selection = select_device(&devices)?;
    println!(
        "\nSelected: {} ({}) [{}]",
        selection.device.name,
        selection.device.path.display(),
        selection.reason
    );

    Ok(())
}

/// Show the effective configuration and sound bindings
fn show_config(config: &Config) {
    println!("Current Configuration\n");
    println!("=====================\n");

    if let Some(path) = Config::default_path() {
        println!("config file = {:?}", path);
    }
    println!("sound_dir = {:?}", config.sound_dir);
    match config.resolve_log_file() {
        Some(path) => println!("log_file = {:?}", path),
        None => println!("log_file = disabled"),
    }

    println!("\n[player]");
    println!("  command = {:?}", config.player.command);
    println!("  args = {:?}", config.player.args);

    println!("\n[sounds]");
    let sounds = SoundSet::from_dir(&config.sound_dir);
    for category in SoundCategory::ALL {
        match sounds.get(category) {
            Some(path) => println!("  {} = {:?}", category, path),
            None => println!("  {} = (missing {})", category, category.file_name()),
        }
    }

    println!("\n---\nDefault config file:\n");
    print!("{}", config::DEFAULT_CONFIG);
}
