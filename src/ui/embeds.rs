use serenity::all::{Colour, CreateEmbed, Timestamp};

/// Observer-channel notice for a freshly logged shift.
pub fn shift_logged_embed(
    subject_id: u64,
    rank_name: &str,
    session_host: &str,
    time_started: &str,
    time_ended: &str,
    duration_hours: f64,
    rating: Option<i32>,
    notes: Option<&str>,
) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title("\u{1F693} Shift Logged")
        .colour(Colour::BLUE)
        .field("User", format!("<@{subject_id}>"), true)
        .field("Rank", rank_name.to_string(), true)
        .field("Session Host", session_host.to_string(), false)
        .field("Time", format!("{time_started} - {time_ended}"), false)
        .field("Duration", format!("{duration_hours} hours"), true)
        .timestamp(Timestamp::now());
    if let Some(rating) = rating {
        embed = embed.field("Shift Rating", rating.to_string(), true);
    }
    if let Some(notes) = notes {
        embed = embed.field("Notes", notes.to_string(), false);
    }
    embed
}
