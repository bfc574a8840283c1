//! CLI integration tests.
//!
//! Tests cover:
//! - Config loading from real INI files on disk
//! - Text report layout and tab selection
//! - `stats` and `validate` dispatch with exit codes
//! - Login-then-fetch orchestration with a mock remote and in-memory store

mod common;

use common::*;
use std::process::ExitCode;
use tradeview::adapters::memory_credential_store::MemoryCredentialStore;
use tradeview::cli::{self, Cli, Command, FetchOutcome, fetch_with_login, format_report};
use tradeview::domain::config::ViewerConfig;
use tradeview::domain::error::ViewerError;
use tradeview::domain::session::{ApiKey, Credentials};
use tradeview::domain::stats::{AggregationPolicy, NetPnlPolicy};
use tradeview::domain::trade::parse_trades;
use tradeview::ports::credential_port::CredentialStore;

const VALID_INI: &str = r#"
[remote]
backend_url = http://127.0.0.1:8080/
timeout_secs = 5

[web]
listen = 0.0.0.0:8000
default_tab = winners

[session]
lifetime_secs = 3600

[aggregation]
net_pnl = fixed
outcome = result
"#;

/// `ExitCode` has no `PartialEq`; compare through its debug form.
fn assert_exit(code: ExitCode, expected: ExitCode) {
    assert_eq!(format!("{code:?}"), format!("{expected:?}"));
}

mod config_loading {
    use super::*;

    #[test]
    fn load_config_from_file() {
        let file = write_temp(VALID_INI, ".ini");
        let adapter = cli::load_config(file.path()).unwrap();
        let config = ViewerConfig::from_port(&adapter).unwrap();

        assert_eq!(config.backend_url, "http://127.0.0.1:8080");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.listen, "0.0.0.0:8000");
        assert_eq!(config.default_tab, "winners");
        assert_eq!(config.session.lifetime_secs, 3600);
        assert_eq!(config.aggregation.net_pnl, NetPnlPolicy::fixed_default());
    }

    #[test]
    fn load_config_missing_file_is_config_error() {
        let code = cli::load_config(std::path::Path::new("/nonexistent/tradeview.ini"))
            .err()
            .unwrap();
        assert_exit(code, ExitCode::from(2));
    }
}

mod report {
    use super::*;

    #[test]
    fn summary_and_all_view() {
        let trades = parse_trades(&scenario_payload());
        let out = format_report(&trades, AggregationPolicy::default(), "all", None);

        assert!(out.contains("Total trades: 3"));
        assert!(out.contains("Wins:         2"));
        assert!(out.contains("Losses:       1"));
        assert!(out.contains("Win rate:     66.67%"));
        assert!(out.contains("Net P&L:      155.00"));
        assert!(out.contains("[All]  Winners  Losers"));
        assert_eq!(out.lines().filter(|l| l.contains("USD")).count(), 3);
    }

    #[test]
    fn selected_tab_overrides_default() {
        let trades = parse_trades(&scenario_payload());
        let out = format_report(&trades, AggregationPolicy::default(), "all", Some("losers"));

        assert!(out.contains("All  Winners  [Losers]"));
        assert!(out.contains("ETHUSD  sell short  entry 2250.5"));
        assert!(!out.contains("BTCUSD"));
    }

    #[test]
    fn fixed_reward_policy() {
        let trades = parse_trades(&scenario_payload());
        let policy = AggregationPolicy {
            net_pnl: NetPnlPolicy::fixed_default(),
            ..AggregationPolicy::default()
        };
        let out = format_report(&trades, policy, "all", None);
        assert!(out.contains("Net P&L:      150.00"));
    }

    #[test]
    fn empty_payload() {
        let out = format_report(&[], AggregationPolicy::default(), "all", None);
        assert!(out.contains("Total trades: 0"));
        assert!(out.contains("Win rate:     0.00%"));
        assert!(out.contains("No trades found."));
    }

    #[test]
    fn unknown_tab_lists_nothing() {
        let trades = parse_trades(&scenario_payload());
        let out = format_report(&trades, AggregationPolicy::default(), "all", Some("open"));
        assert!(out.contains("All  Winners  Losers"));
        assert!(!out.contains("USD"));
        assert!(!out.contains("No trades found."));
    }

    #[test]
    fn missing_fields_render_as_dashes() {
        let trades = parse_trades(&serde_json::json!([{"symbol": "XRPUSD"}]));
        let out = format_report(&trades, AggregationPolicy::default(), "all", None);
        assert!(out.contains("XRPUSD  - -  entry -  exit -  -  pnl -  -"));
    }
}

mod dispatch {
    use super::*;

    #[test]
    fn stats_command_succeeds() {
        let input = write_temp(&scenario_payload().to_string(), ".json");
        let code = cli::run(Cli {
            command: Command::Stats {
                input: input.path().to_path_buf(),
                config: None,
                tab: Some("winners".into()),
                json: true,
            },
        });
        assert_exit(code, ExitCode::SUCCESS);
    }

    #[test]
    fn stats_missing_input_is_io_error() {
        let code = cli::run(Cli {
            command: Command::Stats {
                input: "/nonexistent/trades.json".into(),
                config: None,
                tab: None,
                json: false,
            },
        });
        assert_exit(code, ExitCode::from(1));
    }

    #[test]
    fn stats_rejects_bad_aggregation_config() {
        let input = write_temp("[]", ".json");
        let config = write_temp("[aggregation]\nnet_pnl = median\n", ".ini");
        let code = cli::run(Cli {
            command: Command::Stats {
                input: input.path().to_path_buf(),
                config: Some(config.path().to_path_buf()),
                tab: None,
                json: false,
            },
        });
        assert_exit(code, ExitCode::from(2));
    }

    #[test]
    fn stats_rejects_blank_default_tab() {
        let input = write_temp("[]", ".json");
        let config = write_temp("[web]\ndefault_tab =    \n", ".ini");
        let code = cli::run(Cli {
            command: Command::Stats {
                input: input.path().to_path_buf(),
                config: Some(config.path().to_path_buf()),
                tab: None,
                json: false,
            },
        });
        assert_exit(code, ExitCode::from(2));
    }

    #[test]
    fn validate_accepts_valid_config() {
        let file = write_temp(VALID_INI, ".ini");
        let code = cli::run(Cli {
            command: Command::Validate {
                config: file.path().to_path_buf(),
            },
        });
        assert_exit(code, ExitCode::SUCCESS);
    }

    #[test]
    fn validate_rejects_missing_backend() {
        let file = write_temp("[web]\nlisten = 127.0.0.1:3000\n", ".ini");
        let code = cli::run(Cli {
            command: Command::Validate {
                config: file.path().to_path_buf(),
            },
        });
        assert_exit(code, ExitCode::from(2));
    }

    #[cfg(feature = "web")]
    #[test]
    fn validate_rejects_short_session_secret() {
        let ini = format!("{VALID_INI}\n[session]\nsecret = {}\n", "ab".repeat(16));
        let file = write_temp(&ini, ".ini");
        let code = cli::run(Cli {
            command: Command::Validate {
                config: file.path().to_path_buf(),
            },
        });
        assert_exit(code, ExitCode::from(2));
    }
}

mod fetch_pipeline {
    use super::*;

    fn credentials(password: &str) -> Credentials {
        Credentials {
            email: VALID_EMAIL.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn logs_in_then_fetches() {
        let port = MockTradePort::new().with_trades(scenario_payload());
        let store = MemoryCredentialStore::new();

        let outcome = fetch_with_login(&port, &store, &credentials(VALID_PASSWORD))
            .await
            .unwrap();

        match outcome {
            FetchOutcome::Trades(trades) => assert_eq!(trades.len(), 3),
            other => panic!("expected trades, got {other:?}"),
        }
        assert_eq!(store.load().await.unwrap(), Some(ApiKey::new(VALID_KEY)));
        assert_eq!(port.login_count(), 1);
    }

    #[tokio::test]
    async fn stored_key_skips_login() {
        let port = MockTradePort::new().with_trades(scenario_payload());
        let store = MemoryCredentialStore::with_key(ApiKey::new(VALID_KEY));

        let outcome = fetch_with_login(&port, &store, &credentials("ignored"))
            .await
            .unwrap();

        assert!(matches!(outcome, FetchOutcome::Trades(ref t) if t.len() == 3));
        assert_eq!(port.login_count(), 0);
    }

    #[tokio::test]
    async fn rejection_leaves_store_empty() {
        let port = MockTradePort::new();
        let store = MemoryCredentialStore::new();

        let outcome = fetch_with_login(&port, &store, &credentials("wrong"))
            .await
            .unwrap();

        assert!(matches!(outcome, FetchOutcome::Rejected(ref r) if r == "Invalid credentials"));
        assert_eq!(store.load().await.unwrap(), None);
        assert!(port.fetched_with.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn remote_errors_propagate() {
        let port = MockTradePort::new().failing_fetch();
        let store = MemoryCredentialStore::new();

        let err = fetch_with_login(&port, &store, &credentials(VALID_PASSWORD))
            .await
            .unwrap_err();
        assert!(matches!(err, ViewerError::RemoteResponse { status: 500, .. }));
    }
}
