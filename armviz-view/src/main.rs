// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use std::sync::Arc;

use clap::Parser;

mod config;
mod console;

#[derive(Parser)]
#[command(author = "Copyright (C) 2024 Laixer Equipment B.V.")]
#[command(version, propagate_version = true)]
#[command(about = "Planar arm trajectory viewer", long_about = None)]
struct Args {
    /// Configuration file.
    #[arg(short = 'c', long = "config", default_value = armviz::consts::DEFAULT_CONFIG_PATH)]
    config: std::path::PathBuf,
    /// Planning service address.
    #[arg(long)]
    planner: Option<String>,
    /// Directory to write rendered frames to.
    #[arg(short, long)]
    output: Option<std::path::PathBuf>,
    /// Write every trajectory to a CSV trace.
    #[arg(long)]
    trace: bool,
    /// Quiet output.
    #[arg(long)]
    quiet: bool,
    /// Daemonize the service.
    #[arg(long)]
    daemon: bool,
    /// Level of verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut log_config = simplelog::ConfigBuilder::new();
    if args.daemon {
        log_config.set_time_level(log::LevelFilter::Off);
        log_config.set_thread_level(log::LevelFilter::Off);
    } else {
        log_config.set_time_offset_to_local().ok();
        log_config.set_time_format_rfc2822();
    }

    log_config.set_target_level(log::LevelFilter::Off);
    log_config.set_location_level(log::LevelFilter::Off);
    log_config.add_filter_ignore_str("mio");
    log_config.add_filter_ignore_str("hyper");
    log_config.add_filter_ignore_str("reqwest");

    let log_level = if args.quiet {
        log::LevelFilter::Off
    } else if args.daemon {
        log::LevelFilter::Info
    } else {
        match args.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };

    let color_choice = if args.daemon {
        simplelog::ColorChoice::Never
    } else {
        simplelog::ColorChoice::Auto
    };

    simplelog::TermLogger::init(
        log_level,
        log_config.build(),
        simplelog::TerminalMode::Mixed,
        color_choice,
    )?;

    let runtime_config = if args.config.exists() {
        armviz::from_file(&args.config)?
    } else {
        log::info!(
            "Configuration {} not found, using defaults",
            args.config.display()
        );
        armviz::Config::default()
    };

    let mut config = config::ViewConfig {
        runtime: runtime_config,
        global: armviz::GlobalConfig::default(),
    };

    config.global.bin_name = env!("CARGO_BIN_NAME").to_string();
    config.global.daemon = args.daemon;

    if let Some(planner) = args.planner {
        config.runtime.planner.url = planner;
    }
    if let Some(output) = args.output {
        config.runtime.output.directory = Some(output);
    }
    if args.trace {
        config.runtime.output.trace = true;
    }

    if args.daemon {
        log::debug!("Running service as daemon");
    }

    log::trace!("{:#?}", config);

    daemonize(&config).await
}

async fn daemonize(config: &config::ViewConfig) -> anyhow::Result<()> {
    use armviz::Configurable;

    log::info!(
        "Starting {} {}",
        config.global().bin_name,
        armviz::consts::VERSION
    );

    let planner = armviz::planner::HttpPlanner::new(
        &config.runtime.planner.url,
        config.runtime.planner.timeout(),
    )?;

    log::info!("Planning service at {}", planner.endpoint());

    let runtime = armviz::Runtime::new(&config.runtime, Arc::new(planner))?;

    runtime.spawn_signal_handler();

    if !config.global().daemon {
        let tx = runtime.event_sender();

        tokio::spawn(async move {
            if let Err(e) = console::read_commands(tx).await {
                log::error!("Console: {}", e);
            }
        });
    }

    runtime.run().await;

    log::info!("Goodbye");

    Ok(())
}
