//! `courier run`: replay the demo scenario through a live dispatcher.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tracing::info;

use courier_config::{Config, SubmitModeSetting, validate};
use courier_events::{EventDispatcher, StatsSnapshot};
use courier_handlers::Services;

use crate::config_bridge;
use crate::scenario;
use crate::theme::Theme;

/// Submit mode as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SubmitModeArg {
    /// Wait for queue space.
    Blocking,
    /// Hand off to a background task.
    Detached,
}

impl From<SubmitModeArg> for SubmitModeSetting {
    fn from(arg: SubmitModeArg) -> Self {
        match arg {
            SubmitModeArg::Blocking => Self::Blocking,
            SubmitModeArg::Detached => Self::Detached,
        }
    }
}

/// Flags for `courier run`. Each overrides the matching config value.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct RunArgs {
    /// Submit mode
    #[arg(long, value_enum)]
    pub(crate) submit_mode: Option<SubmitModeArg>,

    /// Ingestion queue capacity
    #[arg(long)]
    pub(crate) queue_capacity: Option<usize>,

    /// Per-invocation handler timeout in milliseconds
    #[arg(long)]
    pub(crate) handler_timeout_ms: Option<u64>,

    /// Pause between scenario events in milliseconds
    #[arg(long)]
    pub(crate) step_delay_ms: Option<u64>,

    /// Skip the handlers' simulated work
    #[arg(long)]
    pub(crate) no_latency: bool,
}

/// Layer the command-line flags over `config` and validate the result.
fn apply_overrides(config: &Config, args: &RunArgs) -> Result<Config> {
    let mut effective = config.clone();
    if let Some(mode) = args.submit_mode {
        effective.dispatcher.submit_mode = mode.into();
    }
    if let Some(capacity) = args.queue_capacity {
        effective.dispatcher.queue_capacity = capacity;
    }
    if let Some(ms) = args.handler_timeout_ms {
        effective.dispatcher.handler_timeout_ms = Some(ms);
    }
    if let Some(ms) = args.step_delay_ms {
        effective.demo.step_delay_ms = ms;
    }
    if args.no_latency {
        effective.demo.simulate_latency = false;
    }

    validate::validate(&effective).context("invalid run options")?;
    Ok(effective)
}

/// Run the scenario and print the final counters.
pub(crate) async fn run(config: &Config, args: &RunArgs) -> Result<()> {
    let config = apply_overrides(config, args)?;
    let dispatcher_config = config_bridge::to_dispatcher_config(&config);
    let latency = config_bridge::to_latency(&config);
    let step_delay = Duration::from_millis(config.demo.step_delay_ms);

    let services = Services::new(latency);
    let mut dispatcher = EventDispatcher::with_registry(dispatcher_config, services.registry());
    dispatcher
        .start()
        .await
        .context("failed to start dispatcher")?;

    println!("{}", Theme::header("Courier demo"));
    println!("{}", Theme::separator());

    let events = scenario::events(chrono::Utc::now());
    let total = events.len();
    for (i, event) in events.into_iter().enumerate() {
        println!(
            "{} {} {}",
            Theme::dimmed(&format!("[step {}/{total}]", i.saturating_add(1))),
            event.event_type,
            Theme::dimmed(&event.id)
        );
        dispatcher
            .submit(event)
            .await
            .context("failed to submit event")?;
        tokio::time::sleep(step_delay).await;
    }

    info!("scenario submitted, draining queue");
    let stats = dispatcher
        .stop()
        .await
        .context("failed to stop dispatcher")?;

    print_summary(&stats, &services);
    Ok(())
}

fn print_summary(stats: &StatsSnapshot, services: &Services) {
    const WIDTH: usize = 22;

    println!();
    println!("{}", Theme::header("Dispatcher"));
    println!("{}", Theme::separator());
    println!("{}", Theme::stat("events dispatched", stats.dispatched, WIDTH));
    println!("{}", Theme::stat("events completed", stats.completed, WIDTH));
    println!("{}", Theme::stat("events unhandled", stats.unhandled, WIDTH));
    println!("{}", Theme::stat("handler invocations", stats.processed, WIDTH));
    println!("{}", Theme::stat("handler failures", stats.failed, WIDTH));
    if stats.failed > 0 {
        println!("{}", Theme::warning("some handlers failed; see the log for details"));
    }

    println!();
    println!("{}", Theme::header("Handlers"));
    println!("{}", Theme::separator());
    println!("{}", Theme::stat("users", services.users.user_count(), WIDTH));
    let orders = services.orders.counts();
    println!(
        "{}",
        Theme::stat(
            "orders",
            format!(
                "{} placed, {} cancelled, {} shipped",
                orders.placed, orders.cancelled, orders.shipped
            ),
            WIDTH
        )
    );
    let payments = services.payments.counts();
    println!(
        "{}",
        Theme::stat(
            "payments",
            format!(
                "{} succeeded, {} failed, {} refunded",
                payments.succeeded, payments.failed, payments.refunded
            ),
            WIDTH
        )
    );
    println!(
        "{}",
        Theme::stat(
            "low-stock alerts",
            format!(
                "{} ({} reorders)",
                services.inventory.alert_count(),
                services.inventory.reorder_count()
            ),
            WIDTH
        )
    );
    println!(
        "{}",
        Theme::stat(
            "notifications sent",
            services.notifications.sent_count(),
            WIDTH
        )
    );
    println!(
        "{}",
        Theme::stat("analytics total", services.analytics.total(), WIDTH)
    );
    for (event_type, count) in services.analytics.breakdown() {
        println!("{}", Theme::stat(&format!("  {event_type}"), count, WIDTH));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_scenario_without_delays() {
        let args = RunArgs {
            step_delay_ms: Some(0),
            no_latency: true,
            submit_mode: Some(SubmitModeArg::Detached),
            queue_capacity: Some(2),
            ..RunArgs::default()
        };

        run(&Config::default(), &args).await.unwrap();
    }

    #[test]
    fn test_overrides_are_validated() {
        let config = Config::default();
        let rejected = [
            RunArgs {
                queue_capacity: Some(0),
                ..RunArgs::default()
            },
            RunArgs {
                queue_capacity: Some(2_000_000),
                ..RunArgs::default()
            },
            RunArgs {
                handler_timeout_ms: Some(0),
                ..RunArgs::default()
            },
            RunArgs {
                step_delay_ms: Some(u64::MAX),
                ..RunArgs::default()
            },
        ];

        for args in &rejected {
            assert!(apply_overrides(&config, args).is_err(), "{args:?}");
        }
    }

    #[test]
    fn test_overrides_are_applied() {
        let args = RunArgs {
            submit_mode: Some(SubmitModeArg::Detached),
            queue_capacity: Some(8),
            handler_timeout_ms: Some(500),
            step_delay_ms: Some(0),
            no_latency: true,
        };

        let effective = apply_overrides(&Config::default(), &args).unwrap();
        assert_eq!(effective.dispatcher.submit_mode, SubmitModeSetting::Detached);
        assert_eq!(effective.dispatcher.queue_capacity, 8);
        assert_eq!(effective.dispatcher.handler_timeout_ms, Some(500));
        assert_eq!(effective.demo.step_delay_ms, 0);
        assert!(!effective.demo.simulate_latency);
    }

    #[tokio::test]
    async fn test_run_rejects_zero_capacity() {
        let args = RunArgs {
            queue_capacity: Some(0),
            ..RunArgs::default()
        };
        assert!(run(&Config::default(), &args).await.is_err());
    }

    #[test]
    fn test_submit_mode_arg() {
        assert_eq!(
            SubmitModeSetting::from(SubmitModeArg::Detached),
            SubmitModeSetting::Detached
        );
        assert_eq!(
            SubmitModeSetting::from(SubmitModeArg::Blocking),
            SubmitModeSetting::Blocking
        );
    }
}
