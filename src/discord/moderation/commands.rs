// Member moderation commands: warnings, timeouts, kicks and bans.
//
// Every command here runs the access gate first, then the target validator,
// and only then touches the Discord API.

use super::guards::{ensure_moderator, reply_ephemeral, validate_target_member, GUILD_ONLY_MESSAGE};
use crate::core::moderation::{
    check_target_identity, reason_or_default, timeout_duration, DurationRejection,
    RejectionReason,
};
use crate::core::time::format_duration;
use crate::core::warnings::{WarningError, WarningRecord};
use crate::discord::{Context, Error};
use chrono::Utc;
use poise::serenity_prelude as serenity;

/// Embed descriptions stop at 4096 characters.
const WARNING_LIST_LIMIT: usize = 4000;
/// Embed field values stop at 1024 characters.
const MAX_WARN_REASON_LEN: usize = 1000;

/// Cut `text` to at most `max` bytes on a char boundary, marking the cut with an ellipsis.
fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }

    let mut end = max.saturating_sub('…'.len_utf8());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &text[..end])
}

/// One bullet per warning. The reason is shortened so the line fits in `max_len`.
fn warning_line(record: &WarningRecord, max_len: usize) -> String {
    let prefix = format!("• **<t:{}:f>** ", record.created_at.timestamp());
    let suffix = format!(" *(by <@{}>)*", record.moderator_id);
    let budget = max_len.saturating_sub(prefix.len() + suffix.len());

    format!(
        "{}{}{}",
        prefix,
        truncate_with_ellipsis(&record.reason, budget),
        suffix
    )
}

/// Newest-first bullet list, cut short with a tally if it won't fit.
///
/// The newest warning is always shown, with its reason shortened if needed.
fn render_warning_list(records: &[WarningRecord]) -> String {
    let Some((newest, older)) = records.split_first() else {
        return String::new();
    };
    let mut out = warning_line(newest, WARNING_LIST_LIMIT);

    for (shown, record) in older.iter().enumerate() {
        let line = warning_line(record, usize::MAX);
        if out.len() + line.len() + 1 > WARNING_LIST_LIMIT {
            out.push_str(&format!("\n…and {} more", older.len() - shown));
            break;
        }
        out.push('\n');
        out.push_str(&line);
    }

    out
}

/// Refusal text for `/warn`. Bots get the command's own wording.
fn warn_rejection_message(rejection: RejectionReason, target_tag: &str) -> String {
    match rejection {
        RejectionReason::TargetIsBot => "You cannot warn bots.".to_string(),
        other => other.message("warn", target_tag),
    }
}

fn action_embed(
    title: &str,
    description: String,
    colour: u32,
    fields: Vec<(&str, String)>,
) -> serenity::CreateEmbed {
    fields
        .into_iter()
        .fold(serenity::CreateEmbed::new(), |embed, (name, value)| {
            embed.field(name, value, false)
        })
        .title(title)
        .description(description)
        .color(colour)
        .timestamp(serenity::Timestamp::now())
}

/// Issue a formal warning to a server member.
#[poise::command(slash_command, guild_only)]
pub async fn warn(
    ctx: Context<'_>,
    #[description = "Member to warn"] user: serenity::User,
    #[description = "Why are they being warned?"]
    #[max_length = 1000]
    reason: String,
) -> Result<(), Error> {
    if !ensure_moderator(ctx).await? {
        return Ok(());
    }

    // Warnings work on people who already left, so no member lookup.
    if let Err(rejection) = check_target_identity(user.id.get(), user.bot, ctx.author().id.get()) {
        return reply_ephemeral(ctx, warn_rejection_message(rejection, &user.tag())).await;
    }

    let record = match ctx
        .data()
        .warnings
        .add_warning(user.id.get(), ctx.author().id.get(), &reason, ctx.id())
        .await
    {
        Ok(record) => record,
        Err(WarningError::EmptyReason) => {
            return reply_ephemeral(ctx, "A warning needs a reason.").await;
        }
        Err(e) => return Err(e.into()),
    };

    let embed = serenity::CreateEmbed::new()
        .title("Warning issued")
        .description(format!("Warned **{}**", user.tag()))
        .field("Moderator", ctx.author().tag(), true)
        .field(
            "Reason",
            truncate_with_ellipsis(&record.reason, MAX_WARN_REASON_LEN),
            false,
        )
        .field("Record ID", record.id.to_string(), true)
        .timestamp(serenity::Timestamp::from_unix_timestamp(
            record.created_at.timestamp(),
        )?)
        .color(0xFFB347);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// View or clear warnings for a member.
#[poise::command(slash_command, guild_only)]
pub async fn warnings(
    ctx: Context<'_>,
    #[description = "Member to view warnings for"] user: serenity::User,
    #[description = "Set to true to clear all warnings for the member"] clear: Option<bool>,
) -> Result<(), Error> {
    if !ensure_moderator(ctx).await? {
        return Ok(());
    }

    let service = &ctx.data().warnings;

    if clear.unwrap_or(false) {
        let removed = service.clear_warnings_for_user(user.id.get()).await?;
        tracing::info!(
            user_id = user.id.get(),
            moderator_id = ctx.author().id.get(),
            removed,
            "Warnings cleared"
        );
        return reply_ephemeral(
            ctx,
            format!("Cleared {} warning(s) for {}.", removed, user.tag()),
        )
        .await;
    }

    let records = service.get_warnings_for_user(user.id.get()).await?;
    if records.is_empty() {
        return reply_ephemeral(ctx, format!("{} has no warnings on record.", user.tag())).await;
    }

    let embed = serenity::CreateEmbed::new()
        .title(format!("Warnings for {}", user.tag()))
        .color(0xFF8C94)
        .description(render_warning_list(&records))
        .footer(serenity::CreateEmbedFooter::new(format!(
            "Total warnings: {} | Kept for {} days",
            records.len(),
            service.retention_days()
        )));

    ctx.send(
        poise::CreateReply::default()
            .embed(embed)
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Temporarily mute (timeout) a member.
#[poise::command(slash_command, guild_only)]
pub async fn mute(
    ctx: Context<'_>,
    #[description = "Member to mute"] user: serenity::User,
    #[description = "Duration (e.g., 10m, 2h, 1d)"] duration: String,
    #[description = "Why are they being muted?"] reason: Option<String>,
) -> Result<(), Error> {
    if !ensure_moderator(ctx).await? {
        return Ok(());
    }
    let Some(member) = validate_target_member(ctx, &user, "mute").await? else {
        return Ok(());
    };

    let duration_ms = match timeout_duration(&duration) {
        Ok(ms) => ms,
        Err(DurationRejection::Invalid) => {
            return reply_ephemeral(
                ctx,
                "Invalid duration. Use a format like `10m`, `2h`, or `1d`.",
            )
            .await;
        }
        Err(DurationRejection::TooLong) => {
            return reply_ephemeral(ctx, "Duration exceeds Discord's 28 day timeout limit.").await;
        }
    };

    let reason = reason_or_default(reason);
    let until_secs = Utc::now().timestamp() + (duration_ms / 1000) as i64;
    let until = serenity::Timestamp::from_unix_timestamp(until_secs)?;

    member
        .guild_id
        .edit_member(
            ctx.http(),
            member.user.id,
            serenity::EditMember::new()
                .disable_communication_until_datetime(until)
                .audit_log_reason(&reason),
        )
        .await?;

    tracing::info!(
        user_id = member.user.id.get(),
        moderator_id = ctx.author().id.get(),
        duration_ms,
        "Member muted"
    );

    let embed = action_embed(
        "Member Muted",
        format!(
            "Muted **{}** for {}.",
            member.user.tag(),
            format_duration(duration_ms)
        ),
        0xF5A623,
        vec![("Reason", reason), ("Moderator", ctx.author().tag())],
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Remove the timeout from a member.
#[poise::command(slash_command, guild_only)]
pub async fn unmute(
    ctx: Context<'_>,
    #[description = "Member to unmute"] user: serenity::User,
    #[description = "Why are they being unmuted?"] reason: Option<String>,
) -> Result<(), Error> {
    if !ensure_moderator(ctx).await? {
        return Ok(());
    }
    let Some(member) = validate_target_member(ctx, &user, "unmute").await? else {
        return Ok(());
    };

    let now = Utc::now().timestamp();
    let muted = member
        .communication_disabled_until
        .is_some_and(|until| until.unix_timestamp() > now);
    if !muted {
        return reply_ephemeral(ctx, format!("{} is not currently muted.", member.user.tag()))
            .await;
    }

    let reason = reason_or_default(reason);
    member
        .guild_id
        .edit_member(
            ctx.http(),
            member.user.id,
            serenity::EditMember::new()
                .enable_communication()
                .audit_log_reason(&reason),
        )
        .await?;

    tracing::info!(
        user_id = member.user.id.get(),
        moderator_id = ctx.author().id.get(),
        "Member unmuted"
    );
    reply_ephemeral(ctx, format!("Unmuted {}.", member.user.tag())).await
}

/// Kick a member from the server.
#[poise::command(slash_command, guild_only)]
pub async fn kick(
    ctx: Context<'_>,
    #[description = "Member to kick"] user: serenity::User,
    #[description = "Why are they being kicked?"] reason: Option<String>,
) -> Result<(), Error> {
    if !ensure_moderator(ctx).await? {
        return Ok(());
    }
    let Some(member) = validate_target_member(ctx, &user, "kick").await? else {
        return Ok(());
    };

    let reason = reason_or_default(reason);
    member
        .guild_id
        .kick_with_reason(ctx.http(), member.user.id, &reason)
        .await?;

    tracing::info!(
        user_id = member.user.id.get(),
        moderator_id = ctx.author().id.get(),
        "Member kicked"
    );

    let embed = action_embed(
        "Member Kicked",
        format!("Kicked **{}**", member.user.tag()),
        0xFF5E5B,
        vec![("Reason", reason), ("Moderator", ctx.author().tag())],
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Ban a user from the server.
#[poise::command(slash_command, guild_only)]
pub async fn ban(
    ctx: Context<'_>,
    #[description = "Member to ban"] user: serenity::User,
    #[description = "Delete message history (0-7 days)"]
    #[min = 0]
    #[max = 7]
    delete_days: Option<u8>,
    #[description = "Why are they being banned?"] reason: Option<String>,
) -> Result<(), Error> {
    if !ensure_moderator(ctx).await? {
        return Ok(());
    }
    let Some(member) = validate_target_member(ctx, &user, "ban").await? else {
        return Ok(());
    };

    let reason = reason_or_default(reason);
    let delete_days = delete_days
        .unwrap_or(0)
        .min(crate::core::moderation::MAX_BAN_DELETE_DAYS);

    member
        .guild_id
        .ban_with_reason(ctx.http(), member.user.id, delete_days, &reason)
        .await?;

    tracing::info!(
        user_id = member.user.id.get(),
        moderator_id = ctx.author().id.get(),
        delete_days,
        "Member banned"
    );

    let embed = action_embed(
        "User Banned",
        format!("Banned **{}**", member.user.tag()),
        0xC0392B,
        vec![
            ("Reason", reason),
            ("Deleted Messages", format!("{} day(s)", delete_days)),
            ("Moderator", ctx.author().tag()),
        ],
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Lift a ban using the user ID.
#[poise::command(slash_command, guild_only)]
pub async fn unban(
    ctx: Context<'_>,
    #[description = "ID of the user to unban"] user_id: String,
    #[description = "Reason for lifting the ban"] reason: Option<String>,
) -> Result<(), Error> {
    if !ensure_moderator(ctx).await? {
        return Ok(());
    }
    let Some(guild_id) = ctx.guild_id() else {
        return reply_ephemeral(ctx, GUILD_ONLY_MESSAGE).await;
    };

    let raw_id = user_id.trim();
    let Some(target) = raw_id
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .map(serenity::UserId::new)
    else {
        return reply_ephemeral(ctx, format!("`{}` is not a valid user ID.", raw_id)).await;
    };

    let reason = reason_or_default(reason);
    match ctx
        .http()
        .remove_ban(guild_id, target, Some(reason.as_str()))
        .await
    {
        Ok(()) => {
            tracing::info!(
                user_id = target.get(),
                moderator_id = ctx.author().id.get(),
                "User unbanned"
            );
            ctx.say(format!("Unbanned user ID {}.", target)).await?;
        }
        Err(e) => {
            tracing::error!(error = %e, user_id = target.get(), "Failed to unban user");
            reply_ephemeral(
                ctx,
                format!("Failed to unban user ID {}. They may not be banned.", target),
            )
            .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn record(reason: &str, minutes_ago: i64) -> WarningRecord {
        WarningRecord {
            id: Uuid::new_v4(),
            user_id: 1,
            moderator_id: 42,
            reason: reason.to_string(),
            interaction_id: 1,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
                - Duration::minutes(minutes_ago),
        }
    }

    #[test]
    fn warning_line_mentions_moderator_and_time() {
        let line = warning_line(&record("spam", 0), WARNING_LIST_LIMIT);
        assert_eq!(line, "• **<t:1767268800:f>** spam *(by <@42>)*");
    }

    #[test]
    fn short_lists_render_every_record() {
        let records = vec![record("first", 0), record("second", 5)];
        let rendered = render_warning_list(&records);

        assert_eq!(rendered.lines().count(), 2);
        assert!(rendered.starts_with("• **<t:1767268800:f>** first"));
    }

    #[test]
    fn long_lists_are_truncated_with_a_tally() {
        let reason = "x".repeat(300);
        let records: Vec<WarningRecord> = (0..30).map(|i| record(&reason, i)).collect();

        let rendered = render_warning_list(&records);

        assert!(rendered.len() <= WARNING_LIST_LIMIT + 20);
        assert!(rendered.ends_with("more"));
        let shown = rendered.lines().filter(|l| l.starts_with('•')).count();
        assert!(rendered.contains(&format!("…and {} more", 30 - shown)));
    }

    #[test]
    fn oversized_newest_warning_is_still_shown() {
        let records = vec![record(&"x".repeat(4500), 0)];

        let rendered = render_warning_list(&records);

        assert!(rendered.starts_with("• **<t:1767268800:f>** xxx"));
        assert!(rendered.ends_with("… *(by <@42>)*"));
        assert!(rendered.len() <= WARNING_LIST_LIMIT);
        assert!(!rendered.contains("more"));
    }

    #[test]
    fn oversized_newest_warning_leaves_room_for_the_tally() {
        let records = vec![record(&"x".repeat(4500), 0), record("older", 5)];

        let rendered = render_warning_list(&records);

        assert!(rendered.contains('•'));
        assert!(rendered.ends_with("\n…and 1 more"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_with_ellipsis("short", 10), "short");
        // "é" is two bytes, so the cut backs off to a boundary.
        let cut = truncate_with_ellipsis("ééééé", 6);
        assert_eq!(cut, "é…");
        assert!(cut.len() <= 6);
    }

    #[test]
    fn warn_refuses_bots_with_its_own_wording() {
        assert_eq!(
            warn_rejection_message(RejectionReason::TargetIsBot, "bot#0001"),
            "You cannot warn bots."
        );
        assert_eq!(
            warn_rejection_message(RejectionReason::SelfTarget, "mod#0001"),
            "You cannot warn yourself."
        );
    }
}
