//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::file_config_adapter::{ENV_PREFIX, FileConfigAdapter};
use crate::adapters::http_trade_adapter::HttpTradeAdapter;
use crate::adapters::memory_credential_store::MemoryCredentialStore;
use crate::domain::config::{DEFAULT_TAB, ViewerConfig, aggregation_policy, default_tab};
use crate::domain::error::ViewerError;
use crate::domain::session::{Credentials, LoginOutcome};
use crate::domain::stats::{AggregationPolicy, TradeStats};
use crate::domain::trade::{TradeRecord, parse_trades_str};
use crate::domain::trade_views::trade_views;
use crate::ports::credential_port::CredentialStore;
use crate::ports::trade_port::TradePort;

#[derive(Parser, Debug)]
#[command(name = "tradeview", about = "Viewer for remotely recorded trades")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the web viewer
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Summarise a trade payload stored in a JSON file
    Stats {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// View to list: all, winners or losers
        #[arg(short, long)]
        tab: Option<String>,
        /// Print the summary as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Log in to the remote service and summarise the returned trades.
    /// The password is read from the first line of stdin.
    Fetch {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        tab: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Serve { config } => run_serve(&config),
        Command::Stats {
            input,
            config,
            tab,
            json,
        } => run_stats(&input, config.as_deref(), tab.as_deref(), json),
        Command::Fetch {
            config,
            email,
            tab,
            json,
        } => run_fetch(&config, email, tab.as_deref(), json),
        Command::Validate { config } => run_validate(&config),
    }
}

/// Load an INI file with `TRADEVIEW_*` environment overrides applied.
pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path)
        .map(|c| c.with_env_overrides(ENV_PREFIX))
        .map_err(|e| {
            let err = ViewerError::ConfigParse {
                file: path.display().to_string(),
                reason: e.to_string(),
            };
            eprintln!("error: {err}");
            ExitCode::from(&err)
        })
}

fn load_viewer_config(path: &Path) -> Result<ViewerConfig, ExitCode> {
    let adapter = load_config(path)?;
    let config = ViewerConfig::from_port(&adapter).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;
    tracing::info!(path = %path.display(), backend = %config.backend_url, "config loaded");
    Ok(config)
}

fn run_serve(config_path: &Path) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{AppState, build_router};
        use std::sync::Arc;

        let config = match load_viewer_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };

        let trade_port = match HttpTradeAdapter::from_config(&config) {
            Ok(a) => Arc::new(a) as Arc<dyn TradePort>,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        let listen = config.listen.clone();
        let state = AppState {
            trade_port,
            config: Arc::new(config),
        };

        let router = match build_router(state) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        let runtime = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(1);
            }
        };

        let served: Result<(), ViewerError> = runtime.block_on(async {
            let listener = tokio::net::TcpListener::bind(listen.as_str()).await?;
            tracing::info!(address = %listen, "web server listening");
            axum::serve(listener, router).await?;
            Ok(())
        });

        match served {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {e}");
                (&e).into()
            }
        }
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}

fn run_stats(input: &Path, config_path: Option<&Path>, tab: Option<&str>, json: bool) -> ExitCode {
    let (policy, default_tab) = match config_path {
        Some(path) => {
            let adapter = match load_config(path) {
                Ok(a) => a,
                Err(code) => return code,
            };
            let policy = match aggregation_policy(&adapter) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("error: {e}");
                    return (&e).into();
                }
            };
            let default_tab = match default_tab(&adapter) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("error: {e}");
                    return (&e).into();
                }
            };
            (policy, default_tab)
        }
        None => (AggregationPolicy::default(), DEFAULT_TAB.to_string()),
    };

    let raw = match fs::read_to_string(input) {
        Ok(raw) => raw,
        Err(e) => {
            let err = ViewerError::from(e);
            eprintln!("error: {}: {err}", input.display());
            return (&err).into();
        }
    };

    let trades = parse_trades_str(&raw);
    tracing::debug!(count = trades.len(), "decoded trade payload");
    print_report(&trades, policy, &default_tab, tab, json)
}

fn run_fetch(config_path: &Path, email: String, tab: Option<&str>, json: bool) -> ExitCode {
    let config = match load_viewer_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let mut password = String::new();
    if let Err(e) = io::stdin().lock().read_line(&mut password) {
        let err = ViewerError::from(e);
        eprintln!("error: reading password: {err}");
        return (&err).into();
    }
    let credentials = Credentials {
        email,
        password: password.trim_end_matches(['\r', '\n']).to_string(),
    };

    let adapter = match HttpTradeAdapter::from_config(&config) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(1);
        }
    };

    let store = MemoryCredentialStore::new();
    let trades = match runtime.block_on(fetch_with_login(&adapter, &store, &credentials)) {
        Ok(FetchOutcome::Trades(trades)) => trades,
        Ok(FetchOutcome::Rejected(reason)) => {
            eprintln!("error: login rejected: {reason}");
            return ExitCode::from(3);
        }
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    print_report(
        &trades,
        config.aggregation,
        &config.default_tab,
        tab,
        json,
    )
}

#[derive(Debug)]
pub enum FetchOutcome {
    Trades(Vec<TradeRecord>),
    Rejected(String),
}

/// Fetch trades with the stored key, logging in first when the store is empty.
pub async fn fetch_with_login(
    port: &dyn TradePort,
    store: &dyn CredentialStore,
    credentials: &Credentials,
) -> Result<FetchOutcome, ViewerError> {
    let key = match store.load().await? {
        Some(key) => key,
        None => match port.login(credentials).await? {
            LoginOutcome::Accepted(key) => {
                tracing::info!(email = %credentials.email, "login accepted");
                store.store(&key).await?;
                key
            }
            LoginOutcome::Rejected { reason } => {
                tracing::warn!(email = %credentials.email, %reason, "login rejected");
                return Ok(FetchOutcome::Rejected(reason));
            }
        },
    };

    Ok(FetchOutcome::Trades(port.fetch_trades(&key).await?))
}

fn print_report(
    trades: &[TradeRecord],
    policy: AggregationPolicy,
    default_tab: &str,
    tab: Option<&str>,
    json: bool,
) -> ExitCode {
    if json {
        let stats = TradeStats::compute(trades, &policy);
        return match serde_json::to_string_pretty(&stats.summary()) {
            Ok(out) => {
                println!("{out}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::from(1)
            }
        };
    }

    print!("{}", format_report(trades, policy, default_tab, tab));
    ExitCode::SUCCESS
}

/// Plain-text report: summary block, tab strip with the active tab in
/// brackets, then one line per trade in the active view.
pub fn format_report(
    trades: &[TradeRecord],
    policy: AggregationPolicy,
    default_tab: &str,
    tab: Option<&str>,
) -> String {
    let stats = TradeStats::compute(trades, &policy);
    let mut out = String::new();

    let _ = writeln!(out, "Total trades: {}", stats.total_trades);
    let _ = writeln!(out, "Wins:         {}", stats.winners.len());
    let _ = writeln!(out, "Losses:       {}", stats.losers.len());
    let _ = writeln!(out, "Win rate:     {:.2}%", stats.win_rate);
    let _ = writeln!(out, "Net P&L:      {:.2}", stats.net_pnl);
    out.push('\n');

    let mut views = trade_views(default_tab, policy, trade_lines);
    if let Some(name) = tab {
        views.select(name);
    }

    let strip: Vec<String> = views
        .tabs()
        .iter()
        .map(|t| {
            if t.active {
                format!("[{}]", t.label)
            } else {
                t.label.to_string()
            }
        })
        .collect();
    let _ = writeln!(out, "{}", strip.join("  "));

    match views.render(trades) {
        Some(lines) if lines.is_empty() => out.push_str("No trades found.\n"),
        Some(lines) => {
            for line in lines {
                let _ = writeln!(out, "{line}");
            }
        }
        None => {}
    }
    out
}

fn trade_lines(trades: &[&TradeRecord]) -> Vec<String> {
    trades.iter().map(|t| trade_line(t)).collect()
}

fn trade_line(trade: &TradeRecord) -> String {
    let text = |v: &Option<String>| v.as_deref().unwrap_or("-").to_string();
    let number = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());

    format!(
        "{}  {} {}  entry {}  exit {}  {}  pnl {}  {}",
        text(&trade.symbol),
        text(&trade.action),
        text(&trade.direction),
        number(trade.entry_or_price().map(|p| p.to_string())),
        number(trade.exit_price.as_ref().map(|p| p.to_string())),
        text(&trade.result),
        number(trade.pnl.map(|p| p.to_string())),
        trade.display_timestamp(),
    )
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_viewer_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    #[cfg(feature = "web")]
    {
        if let Some(secret) = &config.session.secret {
            if let Err(e) = crate::adapters::web::signing_key(secret) {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }

    eprintln!("  backend:      {}", config.backend_url);
    eprintln!("  timeout:      {}s", config.timeout_secs);
    eprintln!("  listen:       {}", config.listen);
    eprintln!("  default tab:  {}", config.default_tab);
    eprintln!(
        "  session:      {} secret, {}s lifetime, secure={}",
        if config.session.secret.is_some() {
            "configured"
        } else {
            "random"
        },
        config.session.lifetime_secs,
        config.session.secure_cookie,
    );
    eprintln!("  aggregation:  {:?}", config.aggregation);
    eprintln!("Config is valid.");
    ExitCode::SUCCESS
}
