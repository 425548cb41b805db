//! Long-running mode: run the reminder job once a day.
//!
//! The job runs once at startup so a missed morning is caught up, then at
//! `reminder_hour` local time every day. Reruns on the same day are harmless
//! because the send log skips reminders that already went out.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{Local, NaiveDateTime, NaiveTime};
use tracing::{error, info};

use crate::commands::{reminders, Context};
use crate::sender::OutboxSender;

/// Next time the job should run, strictly after `now`.
pub fn next_run_after(now: NaiveDateTime, hour: u32) -> NaiveDateTime {
    let at = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
    let today = now.date().and_time(at);
    if today > now {
        today
    } else {
        (now.date() + chrono::Days::new(1)).and_time(at)
    }
}

async fn run_once(ctx: Arc<Context>) {
    let today = Local::now().date_naive();
    let result = tokio::task::spawn_blocking(move || -> Result<()> {
        let club_name = ctx.club_name()?;
        let sender = OutboxSender::new(ctx.config.outbox_dir()?, &club_name, &ctx.config.from_address)?;
        let report = reminders::run_and_record(&ctx, today, &sender)?;
        info!(
            date = %today,
            sent = report.sent.len(),
            already_sent = report.already_sent,
            "Reminder run finished"
        );
        Ok(())
    })
    .await;

    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(date = %today, "Reminder run failed: {:#}", e),
        Err(e) => error!(date = %today, "Reminder task panicked: {}", e),
    }
}

pub async fn run(ctx: Context) -> Result<()> {
    let ctx = Arc::new(ctx);
    let hour = ctx.config.reminder_hour;
    info!(hour, "Reminder daemon starting");

    run_once(Arc::clone(&ctx)).await;

    loop {
        let now = Local::now().naive_local();
        let next = next_run_after(now, hour);
        let wait = (next - now).to_std().unwrap_or(Duration::from_secs(60));
        info!(next = %next, "Sleeping until next reminder run");

        tokio::select! {
            _ = tokio::time::sleep(wait) => run_once(Arc::clone(&ctx)).await,
            _ = tokio::signal::ctrl_c() => {
                info!("Reminder daemon shutting down");
                return Ok(());
            }
        }
    }
}
