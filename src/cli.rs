use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{self, eyre};

use crate::api::SnapsApiClient;
use crate::api::types::Snap;
use crate::config::{AppConfig, load_config};
use crate::credentials::load_credentials;
use crate::filter::{FilterCriteria, FilterMode, parse_date_bound};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "snapmod", about = "TUI and CLI for moderating snaps")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand)]
pub enum CliCommand {
    /// Launch the interactive TUI (default)
    Tui,
    /// Fetch all snaps and print those matching the filter (JSONL)
    List {
        /// Field to filter on
        #[arg(long, value_enum, default_value_t = FilterMode::Message)]
        by: FilterMode,
        /// Case-insensitive substring for message/username filters
        #[arg(long, default_value = "")]
        term: String,
        /// Exclusive start date (YYYY-MM-DD) for created-at filters
        #[arg(long, value_parser = parse_date_arg)]
        from: Option<NaiveDate>,
        /// Inclusive end date (YYYY-MM-DD) for created-at filters
        #[arg(long, value_parser = parse_date_arg)]
        to: Option<NaiveDate>,
    },
    /// Block a snap
    Block {
        /// Snap id
        id: String,
        /// Author email sent along with the block
        #[arg(long)]
        email: String,
    },
    /// Unblock a snap
    Unblock {
        /// Snap id
        id: String,
    },
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date_bound(s).ok_or_else(|| format!("expected YYYY-MM-DD, got {s:?}"))
}

// ---------------------------------------------------------------------------
// Client construction (shared with main.rs TUI path)
// ---------------------------------------------------------------------------

/// Build a `SnapsApiClient` from env credentials + config.
pub fn build_api_client(config: &AppConfig) -> eyre::Result<SnapsApiClient> {
    let creds = load_credentials()?;
    let base_url = creds.resolve_base_url(&config.api_base_url)?;
    if creds.token.is_none() {
        tracing::warn!("SNAPMOD_TOKEN is not set; requests go out unauthenticated");
    }
    let client = SnapsApiClient::new(&base_url, creds)?;
    tracing::info!(base_url = %client.base_url(), "api client ready");
    Ok(client)
}

// ---------------------------------------------------------------------------
// Command execution
// ---------------------------------------------------------------------------

fn list_criteria(
    by: FilterMode,
    term: String,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> FilterCriteria {
    let mut criteria = FilterCriteria::new(by);
    criteria.set_term(term);
    criteria.set_start(from);
    criteria.set_end(to);
    criteria
}

/// Print snaps as JSONL to stdout.
fn print_snaps<'a>(snaps: impl IntoIterator<Item = &'a Snap>) -> eyre::Result<()> {
    for snap in snaps {
        let line = serde_json::to_string(snap)?;
        println!("{line}");
    }
    Ok(())
}

pub async fn run_command(cmd: CliCommand) -> eyre::Result<()> {
    let config = load_config();
    let client = build_api_client(&config)?;

    match cmd {
        CliCommand::Tui => unreachable!("tui is handled in main"),

        CliCommand::List {
            by,
            term,
            from,
            to,
        } => {
            let snaps = client.fetch_all_snaps().await.map_err(|e| eyre!("{e}"))?;
            let criteria = list_criteria(by, term, from, to);
            print_snaps(criteria.apply(&snaps).into_iter().map(|i| &snaps[i]))?;
        }

        CliCommand::Block { id, email } => {
            client
                .block_snap(&id, &email)
                .await
                .map_err(|e| eyre!("{e}"))?;
            println!("{}", serde_json::json!({ "id": id, "is_blocked": true }));
        }

        CliCommand::Unblock { id } => {
            client.unblock_snap(&id).await.map_err(|e| eyre!("{e}"))?;
            println!("{}", serde_json::json!({ "id": id, "is_blocked": false }));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["snapmod"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn list_flags_parse() {
        let cli = Cli::try_parse_from([
            "snapmod",
            "list",
            "--by",
            "created-at",
            "--from",
            "2024-02-01",
            "--to",
            "2024-02-28",
        ])
        .unwrap();
        match cli.command {
            Some(CliCommand::List { by, from, to, .. }) => {
                assert_eq!(by, FilterMode::CreatedAt);
                assert_eq!(from, parse_date_bound("2024-02-01"));
                assert_eq!(to, parse_date_bound("2024-02-28"));
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn list_rejects_bad_dates() {
        assert!(Cli::try_parse_from(["snapmod", "list", "--from", "Feb 1"]).is_err());
    }

    #[test]
    fn block_requires_email() {
        assert!(Cli::try_parse_from(["snapmod", "block", "65a1"]).is_err());
        let cli = Cli::try_parse_from(["snapmod", "block", "65a1", "--email", "a@b.c"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(CliCommand::Block { ref id, ref email }) if id == "65a1" && email == "a@b.c"
        ));
    }

    #[test]
    fn list_criteria_matches_tui_semantics() {
        let snaps: Vec<Snap> = serde_json::from_str(
            r#"[
                {"_id": "1", "message": "hi", "username": "ana", "created_at": "2024-01-05"},
                {"_id": "2", "message": "bye", "username": "bob", "created_at": "2024-02-10"}
            ]"#,
        )
        .unwrap();
        let by_user = list_criteria(FilterMode::Username, "AN".into(), None, None);
        assert_eq!(by_user.apply(&snaps), vec![0]);

        let by_date = list_criteria(
            FilterMode::CreatedAt,
            String::new(),
            parse_date_bound("2024-02-01"),
            parse_date_bound("2024-02-28"),
        );
        assert_eq!(by_date.apply(&snaps), vec![1]);
    }
}
