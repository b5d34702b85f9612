use crate::quota::QuotaStatus;

/// Discord caps a message at 2000 characters; reports longer than that are
/// split, never truncated.
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

pub fn status_symbol(status: QuotaStatus) -> &'static str {
    match status {
        QuotaStatus::OnLeave => "\u{1F4D8} Leave of Absence",
        QuotaStatus::Exempt => "\u{2734}\u{FE0F} Exempt",
        QuotaStatus::Met => "\u{2705}",
        QuotaStatus::MetReduced => "\u{1F530}",
        QuotaStatus::NotMet => "\u{274C}",
    }
}

pub fn report_header() -> String {
    [
        "**2-Week Quota Count-up Results:**",
        "__Quota key:__",
        "\u{2734}\u{FE0F} - Exempt",
        "\u{274C} - Quota Not Met",
        "\u{2705} - Quota Met",
        "\u{1F4D8} - Leave of Absence",
        "\u{1F530} - Reduced Quota Met",
        "",
    ]
    .join("\n")
}

/// `3.25` hours renders as `3h 15m`.
pub fn fmt_hours_minutes(hours: f64) -> String {
    let total_minutes = (hours * 60.0).round() as i64;
    format!("{}h {}m", total_minutes / 60, total_minutes % 60)
}

pub fn member_line(subject_id: u64, rank_name: &str, hours: f64, status: QuotaStatus) -> String {
    format!(
        "- <@{}> ({}): {} {}",
        subject_id,
        rank_name,
        fmt_hours_minutes(hours),
        status_symbol(status)
    )
}

/// Pack the header and member lines into messages that each fit `limit`,
/// splitting only on line boundaries and preserving order.
pub fn split_report(header: &str, lines: &[String], limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = header.to_string();
    for line in lines {
        let needed = if current.is_empty() { line.len() } else { line.len() + 1 };
        if !current.is_empty() && current.len() + needed > limit {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
