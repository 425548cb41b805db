use anyhow::Result;
use chrono::NaiveDate;
use squarehead_core::utils::truncate_string;
use squarehead_core::{Assignment, AssignmentRepository, Member, MemberDirectory, MemberId, MemberStatus};
use tracing::info;

use super::Context;

fn name_of(directory: &MemberDirectory, id: Option<MemberId>) -> String {
    id.and_then(|id| directory.get(id))
        .map(|m| m.full_name())
        .unwrap_or_else(|| "-".to_string())
}

pub fn list(ctx: &Context) -> Result<()> {
    let directory = ctx.store.load_directory()?;
    if directory.is_empty() {
        println!("No members yet. Add one with `squarehead members add`.");
        return Ok(());
    }

    println!(
        "{:>4}  {:<24} {:<28} {:<11} {:<20} {:<20}",
        "ID", "Name", "Email", "Status", "Partner", "Friend"
    );
    for m in directory.list() {
        println!(
            "{:>4}  {:<24} {:<28} {:<11} {:<20} {:<20}",
            m.id,
            truncate_string(&m.display_name(), 24),
            truncate_string(&m.email, 28),
            m.status.to_string(),
            truncate_string(&name_of(&directory, m.partner_id), 20),
            truncate_string(&name_of(&directory, m.friend_id), 20),
        );
    }
    let eligible = directory.eligible().count();
    println!("\n{} members, {} assignable", directory.len(), eligible);
    if let Some(age) = ctx.store.members_age() {
        println!("Roster saved {}", age);
    }
    Ok(())
}

pub struct NewMember {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub status: MemberStatus,
    pub partner: Option<MemberId>,
    pub friend: Option<MemberId>,
}

pub fn add(ctx: &Context, new: NewMember) -> Result<()> {
    let mut directory = ctx.store.load_directory()?;
    if let Some(existing) = directory.find_by_email(&new.email) {
        anyhow::bail!(
            "{} is already used by {} (member {})",
            new.email.trim(),
            existing.full_name(),
            existing.id
        );
    }
    let member = Member {
        id: directory.next_id(),
        first_name: new.first_name.trim().to_string(),
        last_name: new.last_name.trim().to_string(),
        email: new.email.trim().to_string(),
        status: new.status,
        partner_id: new.partner,
        friend_id: new.friend,
    };
    let id = member.id;
    directory.insert(member)?;
    ctx.store.save_directory(&directory)?;
    info!(member_id = id, "Member added");
    println!("Added member {}", id);
    Ok(())
}

/// Field changes for an existing member; `None` leaves a field as is.
#[derive(Default)]
pub struct MemberEdit {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

pub fn edit(ctx: &Context, id: MemberId, changes: MemberEdit) -> Result<()> {
    let mut directory = ctx.store.load_directory()?;
    let mut member = directory
        .get(id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Member not found: {}", id))?;
    if let Some(first) = changes.first_name {
        member.first_name = first.trim().to_string();
    }
    if let Some(last) = changes.last_name {
        member.last_name = last.trim().to_string();
    }
    if let Some(email) = changes.email {
        member.email = email.trim().to_string();
    }
    let name = member.full_name();
    directory.update(member)?;
    ctx.store.save_directory(&directory)?;
    println!("Updated {}", name);
    Ok(())
}

/// Nights on or after `from` that still name the member as a squarehead.
pub fn upcoming_duties(assignments: &[Assignment], id: MemberId, from: NaiveDate) -> Vec<NaiveDate> {
    assignments
        .iter()
        .filter(|a| a.date() >= from && a.involves(id))
        .map(|a| a.date())
        .collect()
}

pub fn remove(ctx: &Context, id: MemberId) -> Result<()> {
    let mut directory = ctx.store.load_directory()?;
    let removed = directory.remove(id)?;
    ctx.store.save_directory(&directory)?;
    println!("Removed {}", removed.full_name());

    let today = chrono::Local::now().date_naive();
    let duties = upcoming_duties(&ctx.store.all_assignments()?, id, today);
    if !duties.is_empty() {
        println!(
            "{} upcoming night(s) still list them; reassign with `squarehead assignment set`:",
            duties.len()
        );
        for date in duties {
            println!("  {}", date);
        }
    }
    Ok(())
}

pub fn set_status(ctx: &Context, id: MemberId, status: MemberStatus) -> Result<()> {
    let mut directory = ctx.store.load_directory()?;
    directory.set_status(id, status)?;
    ctx.store.save_directory(&directory)?;
    println!("Member {} is now {}", id, status);
    Ok(())
}

pub fn set_partner(ctx: &Context, id: MemberId, partner: Option<MemberId>) -> Result<()> {
    let mut directory = ctx.store.load_directory()?;
    directory.set_partner(id, partner)?;
    ctx.store.save_directory(&directory)?;
    match partner {
        Some(p) => println!("Members {} and {} are now partners", id, p),
        None => println!("Member {} no longer has a partner", id),
    }
    Ok(())
}

pub fn set_friend(ctx: &Context, id: MemberId, friend: Option<MemberId>) -> Result<()> {
    let mut directory = ctx.store.load_directory()?;
    directory.set_friend(id, friend)?;
    ctx.store.save_directory(&directory)?;
    match friend {
        Some(f) => println!("Member {} now prefers to serve with {}", id, f),
        None => println!("Member {} no longer has a friend preference", id),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use squarehead_core::calendar::parse_date;
    use squarehead_core::{ClubStore, Config, DanceDate};

    fn context() -> (tempfile::TempDir, Context) {
        let tmp = tempfile::tempdir().unwrap();
        let store = ClubStore::new(tmp.path().to_path_buf()).unwrap();
        let ctx = Context {
            config: Config::default(),
            store,
        };
        (tmp, ctx)
    }

    fn new_member(first: &str, email: &str) -> NewMember {
        NewMember {
            first_name: first.to_string(),
            last_name: "Lee".to_string(),
            email: email.to_string(),
            status: MemberStatus::Assignable,
            partner: None,
            friend: None,
        }
    }

    #[test]
    fn test_add_rejects_email_in_use() {
        let (_tmp, ctx) = context();
        add(&ctx, new_member("Ann", "ann@club.org")).unwrap();
        let err = add(&ctx, new_member("Annie", " ANN@club.org ")).unwrap_err();
        assert!(err.to_string().contains("already used by Ann Lee"));
        assert_eq!(ctx.store.load_directory().unwrap().len(), 1);
    }

    #[test]
    fn test_upcoming_duties() {
        let date = |s: &str| parse_date(s).unwrap();
        let mut past = Assignment::empty(DanceDate::normal(date("2025-05-28")));
        past.squarehead1_id = Some(3);
        let mut next = Assignment::empty(DanceDate::normal(date("2025-06-04")));
        next.squarehead2_id = Some(3);
        let mut other = Assignment::empty(DanceDate::normal(date("2025-06-11")));
        other.squarehead1_id = Some(4);

        let assignments = vec![past, next, other];
        assert_eq!(upcoming_duties(&assignments, 3, date("2025-06-01")), vec![date("2025-06-04")]);
        assert!(upcoming_duties(&assignments, 5, date("2025-06-01")).is_empty());
    }
}
