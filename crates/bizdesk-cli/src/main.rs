// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result, anyhow};
use bizdesk_app::ScreenKind;
use bizdesk_db::{KeyValueStorage, MemoryStorage, SqliteStorage};
use config::Config;
use runtime::Workspace;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "BIZDESK_LOG";
const DEMO_SEED: u64 = 42;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `bizdesk --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;
    init_logging(config.log_filter())?;

    let db_path = if options.demo {
        PathBuf::from(":memory:")
    } else {
        config.db_path()?
    };
    if options.print_db_path {
        println!("{}", db_path.display());
        return Ok(());
    }

    let storage: Box<dyn KeyValueStorage> = if options.demo {
        Box::new(MemoryStorage::new())
    } else {
        Box::new(SqliteStorage::open(&db_path).with_context(|| {
            format!(
                "open database {} -- if this path is wrong, set [storage].db_path or BIZDESK_DB_PATH",
                db_path.display()
            )
        })?)
    };
    let demo = options.demo.then_some(DEMO_SEED);
    let start = options
        .start_screen
        .unwrap_or_else(|| config.start_screen());
    let workspace = Workspace::open(storage, start, demo)?;
    if options.check_only {
        return Ok(());
    }

    print!("{}", workspace.render_summary());
    Ok(())
}

/// `BIZDESK_LOG` wins over `[log].filter`. Logs go to stderr.
fn init_logging(config_filter: &str) -> Result<()> {
    let filter = match env::var(LOG_ENV) {
        Ok(directives) => EnvFilter::try_new(&directives)
            .with_context(|| format!("{LOG_ENV}={directives:?} is not a valid log filter"))?,
        Err(_) => EnvFilter::try_new(config_filter)
            .with_context(|| format!("log filter {config_filter:?} is invalid"))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))
}

/// What the binary was asked to do. Print flags short-circuit in the order
/// `run` checks them.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    start_screen: Option<ScreenKind>,
    print_config_path: bool,
    print_db_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

impl CliOptions {
    fn new(config_path: PathBuf) -> Self {
        Self {
            config_path,
            start_screen: None,
            print_config_path: false,
            print_db_path: false,
            demo: false,
            print_example: false,
            check_only: false,
            show_help: false,
        }
    }
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions::new(default_config_path);
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--screen" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow!("--screen requires one of: contacts, chat, wallet, calendar")
                })?;
                let kind = ScreenKind::parse(value.as_ref()).ok_or_else(|| {
                    anyhow!(
                        "--screen {:?} is not a screen; use contacts, chat, wallet, or calendar",
                        value.as_ref()
                    )
                })?;
                options.start_screen = Some(kind);
            }
            "--print-config-path" => options.print_config_path = true,
            "--print-path" => options.print_db_path = true,
            "--print-example-config" => options.print_example = true,
            "--demo" => options.demo = true,
            "--check" => options.check_only = true,
            "--help" | "-h" => options.show_help = true,
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("bizdesk");
    println!("  --config <path>          Use a specific config path");
    println!("  --screen <name>          Start on contacts, chat, wallet, or calendar");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved database path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Open with seeded demo records (in-memory)");
    println!("  --check                  Validate config and storage, then exit");
    println!("  --help                   Show this help");
}
