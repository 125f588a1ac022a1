//! Print one user's relocation dashboard, projected over the seed fixture.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use mockable::{Clock, DefaultClock};
use moveitright::WorkflowSettings;
use moveitright::domain::ports::RelocationQuery;
use moveitright::domain::{
    DashboardQuery, Error, RelocationWorkflowService, StatusFilter, UserId, WorkflowNotification,
};
use moveitright::outbound::memory::TracingNotificationSink;
use moveitright::outbound::seed::SeedFixture;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// `relocation-dashboard` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "relocation-dashboard",
    about = "Print the relocation dashboard a user would see, as JSON",
    version
)]
struct CliArgs {
    /// Identifier of the user whose dashboard is projected.
    #[arg(long = "user-id", value_name = "id")]
    user_id: String,
    /// Status tab applied on top of the role projection.
    #[arg(long = "filter", value_name = "tab", default_value = "all")]
    filter: StatusFilter,
    /// Case-insensitive search on request number, asset or requester.
    #[arg(long = "search", value_name = "text")]
    search: Option<String>,
    /// Seed fixture path. Falls back to `RELOCATION_SEED_PATH`.
    #[arg(long = "seed", value_name = "path")]
    seed: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let settings = WorkflowSettings::load_from_iter([OsString::from("relocation-dashboard")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    let rules = settings
        .rules()
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error.to_string()))?;
    let seed_path = args.seed.clone().unwrap_or_else(|| settings.seed_path());
    let seed = SeedFixture::load(&seed_path)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error.to_string()))?;

    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let user_id = UserId::new(&args.user_id)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error.to_string()))?;
    let Some(user) = seed.find_user(&user_id).cloned() else {
        return Err(report(
            &Error::not_found(format!("user {user_id} not found")),
            clock.as_ref(),
        ));
    };

    let service = RelocationWorkflowService::new(
        Arc::new(seed.repository()),
        Arc::new(seed.catalogue()),
        Arc::new(TracingNotificationSink),
        Arc::clone(&clock),
        rules,
    );
    let query = DashboardQuery {
        filter: args.filter,
        search: args.search,
    };
    let summary = service
        .dashboard(&user, &query)
        .await
        .map_err(|error| report(&error, clock.as_ref()))?;

    let rendered = serde_json::to_string_pretty(&summary)
        .map_err(|error| io::Error::other(format!("render dashboard: {error}")))?;
    println!("{rendered}");
    Ok(())
}

/// Print the rejection as a notification on stderr and turn it into an
/// I/O error for the exit status.
fn report(error: &Error, clock: &dyn Clock) -> io::Error {
    let notification = WorkflowNotification::from_error(error, clock.utc());
    match serde_json::to_string(&notification) {
        Ok(rendered) => eprintln!("{rendered}"),
        Err(render_error) => warn!(error = %render_error, "failed to render notification"),
    }
    io::Error::other(error.to_string())
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI parsing.

    use clap::Parser;
    use rstest::rstest;

    use super::{CliArgs, StatusFilter};

    #[rstest]
    fn filter_defaults_to_all() {
        let args = CliArgs::try_parse_from(["relocation-dashboard", "--user-id", "5"])
            .expect("arguments parse");
        assert_eq!(args.filter, StatusFilter::All);
        assert_eq!(args.user_id, "5");
        assert!(args.search.is_none());
    }

    #[rstest]
    fn filter_accepts_tab_names() {
        let args = CliArgs::try_parse_from([
            "relocation-dashboard",
            "--user-id",
            "4",
            "--filter",
            "external",
            "--search",
            "server",
        ])
        .expect("arguments parse");
        assert_eq!(args.filter, StatusFilter::External);
        assert_eq!(args.search.as_deref(), Some("server"));
    }

    #[rstest]
    fn unknown_filter_is_rejected() {
        assert!(
            CliArgs::try_parse_from(["relocation-dashboard", "--user-id", "4", "--filter", "soon"])
                .is_err()
        );
    }
}
