//! Reminder email text.

use squarehead_core::utils::{format_date, format_days_until};
use squarehead_core::Dispatch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    /// Plain RFC 822 style text, suitable for an outbox file.
    pub fn to_text(&self) -> String {
        format!(
            "From: {}\nTo: {}\nSubject: {}\nContent-Type: text/plain; charset=utf-8\n\n{}",
            self.from, self.to, self.subject, self.body
        )
    }
}

pub fn compose(dispatch: &Dispatch, club_name: &str, from: &str) -> EmailMessage {
    let when = format_days_until(dispatch.days_until);
    let date = format_date(dispatch.dance_date);

    let subject = format!("{}: squarehead duty {} ({})", club_name, when, date);

    let duty_line = match dispatch.partner_name {
        Some(ref partner) => format!(
            "You and {} are the squareheads for the dance on {}.",
            partner, date
        ),
        None => format!("You are a squarehead for the dance on {}.", date),
    };

    let mut body = format!("Hi {},\n\n{}\n", dispatch.recipient_name, duty_line);
    body.push_str(
        "\nSquareheads arrive early to set up, collect the door fee and help tear down after the last tip.\n\
         If you cannot make it, please arrange a swap and let the board know.\n",
    );
    body.push_str(&format!("\nThanks,\n{}\n", club_name));

    EmailMessage {
        from: from.to_string(),
        to: dispatch.recipient_email.clone(),
        subject,
        body,
    }
}
