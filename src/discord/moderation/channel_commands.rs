// Channel moderation commands: purge, slowmode and lock.

use super::guards::{ensure_moderator, reply_ephemeral, GUILD_ONLY_MESSAGE};
use crate::core::moderation::{
    apply_lock, is_bulk_deletable, reason_or_default, slowmode_seconds, DurationRejection,
    OverwriteChange,
};
use crate::core::time::{format_duration, SECOND_MS};
use crate::discord::{Context, Error};
use chrono::Utc;
use poise::serenity_prelude as serenity;
use poise::serenity_prelude::Mentionable;

/// Explicit channel if given, otherwise the one the command ran in.
/// Only guild text and announcement channels qualify.
async fn resolve_text_channel(
    ctx: Context<'_>,
    explicit: Option<serenity::GuildChannel>,
) -> Option<serenity::GuildChannel> {
    let channel = match explicit {
        Some(channel) => Some(channel),
        None => ctx.guild_channel().await,
    };

    channel.filter(|c| matches!(c.kind, serenity::ChannelType::Text | serenity::ChannelType::News))
}

/// Delete a batch of recent messages from the current channel.
#[poise::command(slash_command, guild_only)]
pub async fn purge(
    ctx: Context<'_>,
    #[description = "Number of messages to delete (max 100)"]
    #[min = 1]
    #[max = 100]
    amount: u8,
) -> Result<(), Error> {
    if !ensure_moderator(ctx).await? {
        return Ok(());
    }
    if ctx.guild_id().is_none() {
        return reply_ephemeral(ctx, GUILD_ONLY_MESSAGE).await;
    }

    ctx.defer_ephemeral().await?;

    let channel_id = ctx.channel_id();
    let amount = amount.clamp(1, crate::core::moderation::MAX_PURGE_AMOUNT);
    let messages = channel_id
        .messages(ctx.http(), serenity::GetMessages::new().limit(amount))
        .await?;

    // Bulk delete refuses anything older than two weeks, so skip those.
    let now = Utc::now().timestamp();
    let deletable: Vec<serenity::MessageId> = messages
        .iter()
        .filter(|m| is_bulk_deletable(m.timestamp.unix_timestamp(), now))
        .map(|m| m.id)
        .collect();

    match deletable.as_slice() {
        [] => {}
        [single] => channel_id.delete_message(ctx.http(), *single).await?,
        many => channel_id.delete_messages(ctx.http(), many).await?,
    }

    tracing::info!(
        channel_id = channel_id.get(),
        moderator_id = ctx.author().id.get(),
        requested = amount,
        deleted = deletable.len(),
        "Messages purged"
    );

    reply_ephemeral(ctx, format!("Deleted {} message(s).", deletable.len())).await
}

/// Set or disable slowmode on a channel.
#[poise::command(slash_command, guild_only)]
pub async fn slowmode(
    ctx: Context<'_>,
    #[description = "Use formats like 10s, 5m, 1h, or 0s to disable."] duration: String,
    #[description = "Channel to modify (defaults to current)"]
    #[channel_types("Text", "News")]
    channel: Option<serenity::GuildChannel>,
    #[description = "Why are you changing slowmode?"] reason: Option<String>,
) -> Result<(), Error> {
    if !ensure_moderator(ctx).await? {
        return Ok(());
    }

    let seconds = match slowmode_seconds(&duration) {
        Ok(seconds) => seconds,
        Err(DurationRejection::Invalid) => {
            return reply_ephemeral(
                ctx,
                "Invalid duration. Use values like `10s`, `5m`, or `0s` to disable.",
            )
            .await;
        }
        Err(DurationRejection::TooLong) => {
            return reply_ephemeral(ctx, "Slowmode cannot exceed 6 hours.").await;
        }
    };

    let Some(channel) = resolve_text_channel(ctx, channel).await else {
        return reply_ephemeral(ctx, "You must target a guild text or announcement channel.")
            .await;
    };

    let reason = reason_or_default(reason);
    channel
        .id
        .edit(
            ctx.http(),
            serenity::EditChannel::new()
                .rate_limit_per_user(seconds)
                .audit_log_reason(&reason),
        )
        .await?;

    tracing::info!(
        channel_id = channel.id.get(),
        moderator_id = ctx.author().id.get(),
        seconds,
        "Slowmode updated"
    );

    let content = if seconds == 0 {
        format!("Disabled slowmode in {}.", channel.id.mention())
    } else {
        format!(
            "Set slowmode in {} to {}.",
            channel.id.mention(),
            format_duration(u64::from(seconds) * SECOND_MS)
        )
    };
    ctx.say(content).await?;
    Ok(())
}

/// The @everyone overwrite carrying the given permission bits.
fn everyone_overwrite(
    guild_id: serenity::GuildId,
    allow: u64,
    deny: u64,
) -> serenity::PermissionOverwrite {
    serenity::PermissionOverwrite {
        allow: serenity::Permissions::from_bits_truncate(allow),
        deny: serenity::Permissions::from_bits_truncate(deny),
        kind: serenity::PermissionOverwriteType::Role(guild_id.everyone_role()),
    }
}

/// Lock or unlock a channel for @everyone.
#[poise::command(slash_command, guild_only)]
pub async fn lock(
    ctx: Context<'_>,
    #[description = "Channel to lock (defaults to current)"]
    #[channel_types("Text", "News")]
    channel: Option<serenity::GuildChannel>,
    #[description = "Enable lock (true) or unlock (false). Default: true"] enabled: Option<bool>,
    #[description = "Reason for lock/unlock"] reason: Option<String>,
) -> Result<(), Error> {
    if !ensure_moderator(ctx).await? {
        return Ok(());
    }
    let Some(guild_id) = ctx.guild_id() else {
        return reply_ephemeral(ctx, GUILD_ONLY_MESSAGE).await;
    };
    let Some(channel) = resolve_text_channel(ctx, channel).await else {
        return reply_ephemeral(ctx, "You must target a guild text channel.").await;
    };

    let enabled = enabled.unwrap_or(true);
    let reason = reason_or_default(reason);
    let everyone = serenity::PermissionOverwriteType::Role(guild_id.everyone_role());

    let existing = channel
        .permission_overwrites
        .iter()
        .find(|overwrite| overwrite.kind == everyone);
    let (allow, deny) = existing
        .map(|o| (o.allow.bits(), o.deny.bits()))
        .unwrap_or((0, 0));

    let everyone_target = serenity::TargetId::from(guild_id.everyone_role().get());
    match apply_lock(allow, deny, enabled) {
        OverwriteChange::Set { allow, deny } => {
            let overwrite = everyone_overwrite(guild_id, allow, deny);
            ctx.http()
                .create_permission(channel.id, everyone_target, &overwrite, Some(reason.as_str()))
                .await?;
        }
        OverwriteChange::Remove if existing.is_some() => {
            ctx.http()
                .delete_permission(channel.id, everyone_target, Some(reason.as_str()))
                .await?;
        }
        OverwriteChange::Remove => {}
    }

    tracing::info!(
        channel_id = channel.id.get(),
        moderator_id = ctx.author().id.get(),
        locked = enabled,
        reason = %reason,
        "Channel lock updated"
    );

    ctx.say(format!(
        "{} {} ({}).",
        if enabled { "Locked" } else { "Unlocked" },
        channel.id.mention(),
        reason
    ))
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everyone_overwrite_targets_the_everyone_role() {
        let guild_id = serenity::GuildId::new(4242);
        let send = serenity::Permissions::SEND_MESSAGES.bits();
        let view = serenity::Permissions::VIEW_CHANNEL.bits();

        let overwrite = everyone_overwrite(guild_id, view, send);

        assert_eq!(
            overwrite.kind,
            serenity::PermissionOverwriteType::Role(serenity::RoleId::new(4242))
        );
        assert_eq!(overwrite.allow, serenity::Permissions::VIEW_CHANNEL);
        assert_eq!(overwrite.deny, serenity::Permissions::SEND_MESSAGES);
    }

    #[test]
    fn everyone_overwrite_drops_unknown_bits() {
        let overwrite = everyone_overwrite(serenity::GuildId::new(1), 1 << 63, 0);

        assert!(overwrite.allow.is_empty());
        assert!(overwrite.deny.is_empty());
    }
}
