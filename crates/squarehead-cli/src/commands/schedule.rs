use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use squarehead_core::calendar::dance_nights;
use squarehead_core::utils::truncate_string;
use squarehead_core::{
    generate_with, Assignment, AssignmentRepository, GenerateOptions, MemberDirectory, MemberId,
    ScheduleId, ScheduleSummary,
};
use tracing::info;

use super::Context;

pub fn create(ctx: &Context, name: &str, from: NaiveDate, to: NaiveDate) -> Result<()> {
    let schedule = ctx.store.create_schedule(name, from, to)?;
    println!(
        "Created schedule {} \"{}\" ({})",
        schedule.id,
        schedule.name,
        schedule.date_range_display()
    );
    Ok(())
}

pub fn list(ctx: &Context) -> Result<()> {
    let schedules = ctx.store.load_schedules()?;
    if schedules.is_empty() {
        println!("No schedules yet. Create one with `squarehead schedule create`.");
        return Ok(());
    }
    for schedule in schedules {
        let summary = ScheduleSummary::from_assignments(&ctx.store.load_assignments(schedule.id)?);
        println!(
            "{:>3}  {:<20} {}  complete {} / partial {} / unassigned {}",
            schedule.id,
            truncate_string(&schedule.name, 20),
            schedule.date_range_display(),
            summary.complete,
            summary.partial,
            summary.unassigned
        );
    }
    Ok(())
}

/// Generates squareheads for every club night in the schedule's range.
/// Nothing is saved when generation fails or `dry_run` is set.
pub fn generate(ctx: &Context, schedule_id: ScheduleId, dry_run: bool) -> Result<()> {
    let schedule = ctx
        .store
        .get_schedule(schedule_id)?
        .with_context(|| format!("Schedule not found: {}", schedule_id))?;
    let nights = dance_nights(schedule.start_date, schedule.end_date, ctx.config.weekday()?);

    let members = ctx.store.load_members()?;
    // Other schedules supply rotation history; this schedule's own nights are
    // replaced, keeping their ids and notes.
    let mut prior = ctx.store.all_assignments()?;
    let own = ctx.store.load_assignments(schedule_id)?;
    prior.retain(|a| !schedule.contains(a.date()));
    prior.extend(own);

    let options = GenerateOptions {
        lookback_days: ctx.config.lookback_days,
    };
    let proposals = generate_with(&nights, &members, &prior, &options)?;

    let directory = MemberDirectory::from_members(members)?;
    print_assignments(&directory, &proposals);
    print_summary(&ScheduleSummary::from_assignments(&proposals));

    if dry_run {
        println!("\nDry run: nothing saved.");
        return Ok(());
    }
    ctx.store.save_assignments(schedule_id, &proposals)?;
    info!(schedule_id, nights = proposals.len(), "Schedule generated");
    println!("\nSaved {} nights to schedule {}.", proposals.len(), schedule_id);
    Ok(())
}

pub fn show(ctx: &Context, schedule_id: ScheduleId) -> Result<()> {
    let schedule = ctx
        .store
        .get_schedule(schedule_id)?
        .with_context(|| format!("Schedule not found: {}", schedule_id))?;
    let assignments = ctx.store.load_assignments(schedule_id)?;
    let directory = ctx.store.load_directory()?;

    println!("{} ({})\n", schedule.name, schedule.date_range_display());
    if assignments.is_empty() {
        println!("No assignments yet. Run `squarehead schedule generate {}`.", schedule_id);
        return Ok(());
    }
    print_assignments(&directory, &assignments);
    print_summary(&ScheduleSummary::from_assignments(&assignments));
    Ok(())
}

/// Manual override of one night's squareheads.
pub fn assign(
    ctx: &Context,
    schedule_id: ScheduleId,
    date: NaiveDate,
    first: Option<MemberId>,
    second: Option<MemberId>,
    notes: Option<String>,
) -> Result<()> {
    let directory = ctx.store.load_directory()?;
    for id in [first, second].into_iter().flatten() {
        let member = directory
            .get(id)
            .with_context(|| format!("Member not found: {}", id))?;
        if !member.is_assignable() {
            println!("Note: {} is {} and would not be picked by the rotation.", member.full_name(), member.status);
        }
    }

    let mut assignments = ctx.store.load_assignments(schedule_id)?;
    let assignment = assignments
        .iter_mut()
        .find(|a| a.date() == date)
        .with_context(|| format!("No dance night on {} in schedule {}", date, schedule_id))?;
    assignment.set_squareheads(first, second)?;
    if let Some(notes) = notes {
        assignment.notes = notes;
    }

    ctx.store.save_assignments(schedule_id, &assignments)?;
    println!("Updated {}", date);
    Ok(())
}

fn slot_name(directory: &MemberDirectory, id: Option<MemberId>) -> String {
    match id {
        Some(id) => directory
            .get(id)
            .map(|m| m.full_name())
            .unwrap_or_else(|| format!("#{} (removed)", id)),
        None => "-".to_string(),
    }
}

fn print_assignments(directory: &MemberDirectory, assignments: &[Assignment]) {
    for a in assignments {
        if !a.dance_date.needs_squareheads() {
            println!("{}  {}", a.dance_date.formatted(), a.night_type());
            continue;
        }
        println!(
            "{}  {:<24} {:<24} {:<10} {}",
            a.dance_date.formatted(),
            truncate_string(&slot_name(directory, a.squarehead1_id), 24),
            truncate_string(&slot_name(directory, a.squarehead2_id), 24),
            a.status().to_string(),
            a.notes
        );
    }
}

fn print_summary(summary: &ScheduleSummary) {
    println!(
        "\n{} complete, {} partial, {} unassigned, {} board nights",
        summary.complete, summary.partial, summary.unassigned, summary.board_nights
    );
    if summary.needs_attention() {
        println!("Some nights need a squarehead filled in by hand (`squarehead assignment set`).");
    }
}
