// General commands anyone can run: latency, avatars and server info.

use crate::discord::moderation::guards::{reply_ephemeral, GUILD_ONLY_MESSAGE};
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;
use std::time::Instant;

/// Replies with the bot latency.
#[poise::command(slash_command)]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let started = Instant::now();
    let reply = ctx.say("Pinging...").await?;
    let round_trip = started.elapsed().as_millis();

    let mut content = format!("Pong! Round-trip latency: {}ms", round_trip);
    // Zero until the shard has completed its first heartbeat.
    let heartbeat = ctx.ping().await;
    if !heartbeat.is_zero() {
        content.push_str(&format!(" | Gateway heartbeat: {}ms", heartbeat.as_millis()));
    }

    reply
        .edit(ctx, poise::CreateReply::default().content(content))
        .await?;
    Ok(())
}

/// Display the avatar of yourself or another user.
#[poise::command(slash_command)]
pub async fn avatar(
    ctx: Context<'_>,
    #[description = "User to fetch the avatar for"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let target = user.as_ref().unwrap_or_else(|| ctx.author());

    let embed = serenity::CreateEmbed::new()
        .title(format!("{}'s avatar", target.name))
        .image(target.face())
        .color(0xF1A5C7)
        .footer(serenity::CreateEmbedFooter::new(format!(
            "Requested by {}",
            ctx.author().tag()
        )))
        .timestamp(serenity::Timestamp::now());

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Display information about the current server.
#[poise::command(slash_command, guild_only)]
pub async fn serverinfo(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return reply_ephemeral(ctx, GUILD_ONLY_MESSAGE).await;
    };

    let guild = guild_id.to_partial_guild_with_counts(ctx.http()).await?;
    let owner = guild.owner_id.to_user(ctx.http()).await?;

    let members = guild
        .approximate_member_count
        .map(|count| count.to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    let boost_tier = match guild.premium_tier {
        serenity::PremiumTier::Tier1 => "Level 1",
        serenity::PremiumTier::Tier2 => "Level 2",
        serenity::PremiumTier::Tier3 => "Level 3",
        _ => "None",
    };
    let created = guild.id.created_at().unix_timestamp();

    let mut embed = serenity::CreateEmbed::new()
        .title(&guild.name)
        .field("Owner", owner.tag(), true)
        .field("Members", members, true)
        .field("Boost Tier", boost_tier, true)
        .field("Created", format!("<t:{0}:R> (<t:{0}:D>)", created), false)
        .color(0x9ACFE5)
        .footer(serenity::CreateEmbedFooter::new(format!(
            "Guild ID: {}",
            guild.id
        )));

    if let Some(icon) = guild.icon_url() {
        embed = embed.thumbnail(icon);
    }

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
