pub mod quota;
pub mod shift;

use std::collections::HashSet;

use serenity::all::{
    CommandInteraction, Context, CreateInteractionResponse, CreateInteractionResponseMessage,
    GuildId, Member,
};

use crate::handlers::AppState;

pub async fn register_commands(ctx: &Context, state: &AppState) -> anyhow::Result<()> {
    let guild = GuildId::new(state.guild_id);
    shift::register(ctx, guild, &state.config).await?;
    shift::register_delete_last(ctx, guild).await?;
    quota::register(ctx, guild).await?;
    Ok(())
}

pub async fn dispatch(ctx: &Context, cmd: &CommandInteraction) -> anyhow::Result<()> {
    match cmd.data.name.as_str() {
        "logshift" => shift::handle_logshift(ctx, cmd).await,
        "deletelastshift" => shift::handle_delete_last(ctx, cmd).await,
        "countallquota" => quota::handle_tally(ctx, cmd).await,
        "resetquota" => quota::handle_reset(ctx, cmd).await,
        _ => Ok(()),
    }
}

pub(crate) fn role_ids(member: &Member) -> HashSet<u64> {
    member.roles.iter().map(|r| r.get()).collect()
}

pub(crate) async fn reply_ephemeral(
    ctx: &Context,
    cmd: &CommandInteraction,
    content: &str,
) -> anyhow::Result<()> {
    cmd.create_response(
        &ctx.http,
        CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new().content(content).ephemeral(true),
        ),
    )
    .await?;
    Ok(())
}
