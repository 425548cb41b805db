use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use squarehead_core::reminders::{ReminderPreview, ReminderRunReport};
use squarehead_core::utils::{format_date, format_days_until};
use squarehead_core::{EmailSender, ReminderJob};
use tracing::warn;

use super::Context;
use crate::sender::{DryRunSender, OutboxSender};

fn job(ctx: &Context) -> ReminderJob<'_> {
    ReminderJob::new(&ctx.store, &ctx.store, &ctx.store)
}

/// Lists the reminders that would go out on `date` without sending them.
pub fn preview(ctx: &Context, date: NaiveDate) -> Result<()> {
    let preview = job(ctx).preview(date)?;
    print_preview(&preview);
    Ok(())
}

fn print_preview(preview: &ReminderPreview) {
    println!("Reminders due on {}", format_date(preview.reference_date));
    if preview.plan.dispatches.is_empty() && preview.plan.skipped.is_empty() {
        println!("  none");
        return;
    }
    for d in &preview.plan.dispatches {
        let with = d
            .partner_name
            .as_deref()
            .map(|p| format!(" with {}", p))
            .unwrap_or_default();
        println!(
            "  {} <{}>: {} ({}){}",
            d.recipient_name,
            d.recipient_email,
            format_date(d.dance_date),
            format_days_until(d.days_until),
            with
        );
    }
    for s in &preview.plan.skipped {
        println!(
            "  skipped member #{} for {}: {}",
            s.hit.member_id,
            format_date(s.hit.dance_date),
            s.reason
        );
    }
}

/// Runs the reminder job once for `date` and persists the send log.
pub fn send(ctx: &Context, date: NaiveDate, dry_run: bool) -> Result<ReminderRunReport> {
    let club_name = ctx.club_name()?;
    let from = ctx.config.from_address.clone();

    if dry_run {
        let sender = DryRunSender::new(&club_name, &from);
        // A dry run works on a throwaway copy of the log.
        let mut log = ctx.store.load_send_log()?;
        let report = job(ctx).run(date, &sender, &mut log)?;
        print_report(&report);
        return Ok(report);
    }

    let sender = OutboxSender::new(ctx.config.outbox_dir()?, &club_name, &from)
        .context("Failed to open outbox")?;
    run_and_record(ctx, date, &sender)
}

pub fn run_and_record(ctx: &Context, date: NaiveDate, sender: &dyn EmailSender) -> Result<ReminderRunReport> {
    let mut log = ctx.store.load_send_log()?;
    let report = job(ctx).run(date, sender, &mut log)?;
    ctx.store.save_send_log(&log)?;
    if !report.is_clean() {
        warn!(
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Reminder run needs operator attention"
        );
    }
    print_report(&report);
    Ok(report)
}

fn print_report(report: &ReminderRunReport) {
    println!(
        "{}: {} sent, {} already sent, {} skipped, {} failed",
        format_date(report.reference_date),
        report.sent.len(),
        report.already_sent,
        report.skipped.len(),
        report.failed.len()
    );
    for s in &report.skipped {
        println!("  skipped member #{}: {}", s.hit.member_id, s.reason);
    }
    for f in &report.failed {
        println!("  failed member #{} ({}): {}", f.key.member_id, f.key.dance_date, f.error);
    }
}
