use std::collections::HashSet;

use serenity::all::{
    CommandInteraction, Context, CreateCommand, CreateInteractionResponseFollowup, CreateMessage,
    GuildId, Member, UserId,
};

use crate::commands::{reply_ephemeral, role_ids};
use crate::db::repo;
use crate::error::CommandError;
use crate::handlers::state_from_ctx;
use crate::quota;
use crate::ui::report;

pub async fn register(ctx: &Context, guild: GuildId) -> anyhow::Result<()> {
    guild
        .create_command(
            &ctx.http,
            CreateCommand::new("countallquota").description("Check everyone's quota"),
        )
        .await?;
    guild
        .create_command(
            &ctx.http,
            CreateCommand::new("resetquota").description("Clear all logged quota data"),
        )
        .await?;
    Ok(())
}

pub async fn handle_tally(ctx: &Context, cmd: &CommandInteraction) -> anyhow::Result<()> {
    let state = state_from_ctx(ctx).await?;
    let Some(member) = cmd.member.as_deref() else {
        return reply_ephemeral(ctx, cmd, "Use this in a server.").await;
    };
    if !quota::holds_top_rank(&state.config, &role_ids(member), state.config.supervisor_rank_count)
    {
        return reply_ephemeral(ctx, cmd, &CommandError::Unauthorized.to_string()).await;
    }

    // Roster fetch plus report rendering can outlast the 3s interaction window.
    cmd.defer(&ctx.http).await?;

    // The clear-after-read is what ends the quota period, so the whole
    // read-evaluate-clear sequence holds the table lock.
    let _guard = state.table_lock.write().await;

    let totals = repo::sum_hours_by_subject(&state.pool).await?;
    let members = fetch_full_roster(ctx, GuildId::new(state.guild_id)).await?;
    let roster: Vec<(u64, HashSet<u64>)> = members
        .iter()
        .map(|m| (m.user.id.get(), m.roles.iter().map(|r| r.get()).collect()))
        .collect();

    let (evaluations, evaluated) = quota::evaluate_roster(&state.config, &roster, &totals);

    if evaluated == 0 {
        // Nothing evaluable: report the no-op and leave the table untouched.
        cmd.create_followup(
            &ctx.http,
            CreateInteractionResponseFollowup::new()
                .content("\u{274C} No quota has been logged.")
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }

    let cleared = repo::clear_shifts(&state.pool).await?;
    tracing::info!(members = evaluated, rows = cleared, "tally complete, shift log cleared");

    if evaluations.is_empty() {
        // Every evaluated member was hidden (exempt with show_exempt off);
        // the period still ended, but there is no report to post.
        cmd.create_followup(
            &ctx.http,
            CreateInteractionResponseFollowup::new()
                .content("All evaluated members are exempt; the shift log has been cleared.")
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }

    let lines: Vec<String> = evaluations
        .iter()
        .map(|e| report::member_line(e.subject_id, &e.rank_name, e.hours, e.status))
        .collect();
    let mut chunks =
        report::split_report(&report::report_header(), &lines, report::DISCORD_MESSAGE_LIMIT)
            .into_iter();
    if let Some(first) = chunks.next() {
        cmd.create_followup(&ctx.http, CreateInteractionResponseFollowup::new().content(first))
            .await?;
    }
    for chunk in chunks {
        cmd.channel_id.send_message(&ctx.http, CreateMessage::new().content(chunk)).await?;
    }
    Ok(())
}

pub async fn handle_reset(ctx: &Context, cmd: &CommandInteraction) -> anyhow::Result<()> {
    let state = state_from_ctx(ctx).await?;
    let Some(member) = cmd.member.as_deref() else {
        return reply_ephemeral(ctx, cmd, "Use this in a server.").await;
    };
    if !quota::holds_top_rank(&state.config, &role_ids(member), state.config.supervisor_rank_count)
    {
        return reply_ephemeral(ctx, cmd, &CommandError::Unauthorized.to_string()).await;
    }

    let _guard = state.table_lock.write().await;
    let cleared = repo::clear_shifts(&state.pool).await?;
    tracing::info!(rows = cleared, "shift log manually reset");

    reply_ephemeral(ctx, cmd, "\u{2705} All quota logs have been cleared.").await
}

/// Full guild roster via the paginated members endpoint.
async fn fetch_full_roster(ctx: &Context, guild: GuildId) -> anyhow::Result<Vec<Member>> {
    const PAGE: u64 = 1000;
    let mut roster = Vec::new();
    let mut after: Option<UserId> = None;
    loop {
        let page = guild.members(&ctx.http, Some(PAGE), after).await?;
        let full_page = page.len() as u64 == PAGE;
        after = page.last().map(|m| m.user.id);
        roster.extend(page);
        if !full_page {
            break;
        }
    }
    Ok(roster)
}
