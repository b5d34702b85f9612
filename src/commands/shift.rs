use serenity::all::{
    ChannelId, CommandDataOptionValue, CommandInteraction, CommandOptionType, Context,
    CreateCommand, CreateCommandOption, CreateMessage, GuildId, UserId,
};

use crate::commands::{reply_ephemeral, role_ids};
use crate::config::QuotaConfig;
use crate::db::models::NewShift;
use crate::db::repo;
use crate::error::CommandError;
use crate::handlers::state_from_ctx;
use crate::quota;
use crate::shift_time::{parse_clock, shift_duration_hours};
use crate::ui::embeds;

pub async fn register(ctx: &Context, guild: GuildId, config: &QuotaConfig) -> anyhow::Result<()> {
    let mut rank_option =
        CreateCommandOption::new(CommandOptionType::String, "rank", "Rank during the shift")
            .required(true);
    for rank in &config.ranks {
        rank_option = rank_option.add_string_choice(&rank.name, &rank.name);
    }

    guild
        .create_command(
            &ctx.http,
            CreateCommand::new("logshift")
                .description("Log your shift, or someone else's if authorized")
                .add_option(
                    CreateCommandOption::new(
                        CommandOptionType::String,
                        "session_host",
                        "Who hosted the session?",
                    )
                    .required(true),
                )
                .add_option(
                    CreateCommandOption::new(
                        CommandOptionType::String,
                        "time_started",
                        "Start time (e.g. 1:00 PM)",
                    )
                    .required(true),
                )
                .add_option(
                    CreateCommandOption::new(
                        CommandOptionType::String,
                        "time_ended",
                        "End time (e.g. 3:15 PM)",
                    )
                    .required(true),
                )
                .add_option(rank_option)
                .add_option(CreateCommandOption::new(
                    CommandOptionType::User,
                    "user",
                    "Member to log the shift for (senior ranks only)",
                ))
                .add_option(CreateCommandOption::new(
                    CommandOptionType::Integer,
                    "rating",
                    "Shift rating (optional)",
                ))
                .add_option(CreateCommandOption::new(
                    CommandOptionType::String,
                    "notes",
                    "Additional notes (optional)",
                )),
        )
        .await?;
    Ok(())
}

pub async fn register_delete_last(ctx: &Context, guild: GuildId) -> anyhow::Result<()> {
    guild
        .create_command(
            &ctx.http,
            CreateCommand::new("deletelastshift")
                .description("Delete your most recently logged shift"),
        )
        .await?;
    Ok(())
}

pub async fn handle_logshift(ctx: &Context, cmd: &CommandInteraction) -> anyhow::Result<()> {
    let state = state_from_ctx(ctx).await?;

    let mut session_host = String::new();
    let mut time_started = String::new();
    let mut time_ended = String::new();
    let mut rank_name = String::new();
    let mut target: Option<UserId> = None;
    let mut rating: Option<i64> = None;
    let mut notes: Option<String> = None;

    for opt in &cmd.data.options {
        match opt.name.as_str() {
            "session_host" => if let CommandDataOptionValue::String(s) = &opt.value { session_host = s.clone(); },
            "time_started" => if let CommandDataOptionValue::String(s) = &opt.value { time_started = s.clone(); },
            "time_ended" => if let CommandDataOptionValue::String(s) = &opt.value { time_ended = s.clone(); },
            "rank" => if let CommandDataOptionValue::String(s) = &opt.value { rank_name = s.clone(); },
            "user" => if let CommandDataOptionValue::User(u) = &opt.value { target = Some(*u); },
            "rating" => if let CommandDataOptionValue::Integer(n) = &opt.value { rating = Some(*n); },
            "notes" => if let CommandDataOptionValue::String(s) = &opt.value { notes = Some(s.clone()); },
            _ => {}
        }
    }

    let Some(member) = cmd.member.as_deref() else {
        return reply_ephemeral(ctx, cmd, "Use this in a server.").await;
    };

    let subject = target.unwrap_or(cmd.user.id);
    if subject != cmd.user.id
        && !quota::holds_top_rank(&state.config, &role_ids(member), state.config.proxy_rank_count)
    {
        return reply_ephemeral(ctx, cmd, &CommandError::Unauthorized.to_string()).await;
    }

    let Some(rank) = state.config.rank_by_name(&rank_name) else {
        return reply_ephemeral(ctx, cmd, &CommandError::InvalidRank(rank_name).to_string()).await;
    };

    if let Some(r) = rating {
        if r < state.config.rating_min || r > state.config.rating_max {
            let err = CommandError::RatingOutOfRange {
                min: state.config.rating_min,
                max: state.config.rating_max,
            };
            return reply_ephemeral(ctx, cmd, &err.to_string()).await;
        }
    }

    let (start, end) = match (parse_clock(&time_started), parse_clock(&time_ended)) {
        (Ok(start), Ok(end)) => (start, end),
        _ => return reply_ephemeral(ctx, cmd, &CommandError::InvalidTimeFormat.to_string()).await,
    };
    let duration_hours = shift_duration_hours(start, end);

    let subject_name = subject_display_name(ctx, state.guild_id, subject).await;
    let _guard = state.table_lock.read().await;
    repo::insert_shift(
        &state.pool,
        &NewShift {
            subject_id: subject.get() as i64,
            subject_name,
            session_host: session_host.clone(),
            time_started: time_started.clone(),
            time_ended: time_ended.clone(),
            rank_name: rank.name.clone(),
            duration_hours,
            rating: rating.map(|r| r as i32),
            notes: notes.clone(),
        },
    )
    .await?;

    let embed = embeds::shift_logged_embed(
        subject.get(),
        &rank.name,
        &session_host,
        &time_started,
        &time_ended,
        duration_hours,
        rating.map(|r| r as i32),
        notes.as_deref(),
    );
    let notice_channel = state.log_channel_id.map(ChannelId::new).unwrap_or(cmd.channel_id);
    notice_channel.send_message(&ctx.http, CreateMessage::new().embed(embed)).await?;

    reply_ephemeral(ctx, cmd, "\u{2705} Shift logged successfully.").await
}

pub async fn handle_delete_last(ctx: &Context, cmd: &CommandInteraction) -> anyhow::Result<()> {
    let state = state_from_ctx(ctx).await?;
    let _guard = state.table_lock.read().await;
    match repo::delete_last_for_subject(&state.pool, cmd.user.id.get() as i64).await? {
        Some(record) => {
            let text = format!(
                "\u{2705} Deleted your last logged shift ({} - {}, {} hours, hosted by {}).",
                record.time_started, record.time_ended, record.duration_hours, record.session_host
            );
            reply_ephemeral(ctx, cmd, &text).await
        }
        None => reply_ephemeral(ctx, cmd, "You have no logged shifts to delete.").await,
    }
}

/// Guild nickname if the member can be fetched, otherwise a stable fallback.
async fn subject_display_name(ctx: &Context, guild_id: u64, user_id: UserId) -> String {
    match GuildId::new(guild_id).member(&ctx.http, user_id).await {
        Ok(member) => member.display_name().to_string(),
        Err(_) => format!("user {}", user_id.get()),
    }
}
