use anyhow::Result;
use squarehead_core::reminders::validate_offsets;

use super::Context;

pub fn show(ctx: &Context) -> Result<()> {
    let settings = ctx.store.load_settings()?;
    let offsets: Vec<String> = settings.reminder_offsets.iter().map(|o| o.to_string()).collect();
    println!("Club name:        {}", ctx.club_name()?);
    println!("Reminder offsets: {} days before", offsets.join(", "));
    println!("Dance weekday:    {}", ctx.config.dance_weekday);
    println!("Reminder hour:    {:02}:00", ctx.config.reminder_hour);
    println!("Data directory:   {}", ctx.store.dir().display());
    println!("Outbox:           {}", ctx.config.outbox_dir()?.display());
    Ok(())
}

/// Parses "14,7,3,1" into offsets, rejecting negatives.
pub fn parse_offsets(value: &str) -> Result<Vec<i64>> {
    let mut offsets = Vec::new();
    for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let offset: i64 = part
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid reminder offset '{}'", part))?;
        offsets.push(offset);
    }
    // Stored largest first, the order reminders go out in.
    let mut offsets: Vec<i64> = validate_offsets(&offsets)?.into_iter().collect();
    offsets.reverse();
    Ok(offsets)
}

pub fn set_offsets(ctx: &Context, value: &str) -> Result<()> {
    let offsets = parse_offsets(value)?;
    let mut settings = ctx.store.load_settings()?;
    settings.reminder_offsets = offsets;
    ctx.store.save_settings(&settings)?;
    println!("Reminder offsets set to {:?}", settings.reminder_offsets);
    Ok(())
}

pub fn set_club_name(ctx: &Context, name: &str) -> Result<()> {
    let mut settings = ctx.store.load_settings()?;
    settings.club_name = name.trim().to_string();
    ctx.store.save_settings(&settings)?;
    println!("Club name set to {}", settings.club_name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_offsets() {
        assert_eq!(parse_offsets("1, 7,14,3,7").unwrap(), vec![14, 7, 3, 1]);
        assert_eq!(parse_offsets("0").unwrap(), vec![0]);
        assert!(parse_offsets("7,-1").is_err());
        assert!(parse_offsets("seven").is_err());
    }
}
