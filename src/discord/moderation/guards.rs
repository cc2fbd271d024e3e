// Guards shared by the moderation commands.
//
// These adapt Discord types into the primitives the core access gate and
// target validator expect, and send the ephemeral refusal when they say no.

use crate::core::moderation::{
    is_authorized, is_manageable, validate_target, HierarchySnapshot, LookupError,
    ManageableTarget, MemberLookup, TargetError,
};
use crate::discord::{Context, Error};
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use std::collections::HashMap;

pub const GUILD_ONLY_MESSAGE: &str = "This command can only be used inside a server.";
const NO_PERMISSION_MESSAGE: &str = "You do not have permission to use this command.";

/// Reply with a message only the caller can see.
pub async fn reply_ephemeral(ctx: Context<'_>, content: impl Into<String>) -> Result<(), Error> {
    ctx.send(
        poise::CreateReply::default()
            .content(content)
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Check the caller may moderate. Replies and returns `false` if not.
pub async fn ensure_moderator(ctx: Context<'_>) -> Result<bool, Error> {
    let Some(member) = ctx.author_member().await else {
        reply_ephemeral(ctx, GUILD_ONLY_MESSAGE).await?;
        return Ok(false);
    };

    // Interaction members carry their resolved channel permissions.
    let permission_bits = member.permissions.map(|p| p.bits()).unwrap_or(0);
    let role_ids: Vec<u64> = member.roles.iter().map(|r| r.get()).collect();

    if !is_authorized(
        permission_bits,
        &role_ids,
        &ctx.data().config.moderator_role_ids,
    ) {
        tracing::debug!(
            user_id = ctx.author().id.get(),
            command = %ctx.command().name,
            "Moderator access refused"
        );
        reply_ephemeral(ctx, NO_PERMISSION_MESSAGE).await?;
        return Ok(false);
    }

    Ok(true)
}

/// A guild member the lookup resolved, with its manageability precomputed.
pub struct TargetMember {
    pub member: serenity::Member,
    manageable: bool,
}

impl ManageableTarget for TargetMember {
    fn is_manageable(&self) -> bool {
        self.manageable
    }
}

/// Resolves members over REST and compares top role positions.
pub struct GuildMemberLookup<'a> {
    http: &'a serenity::Http,
    guild_id: serenity::GuildId,
    bot_id: serenity::UserId,
}

impl<'a> GuildMemberLookup<'a> {
    pub fn new(http: &'a serenity::Http, guild_id: serenity::GuildId, bot_id: serenity::UserId) -> Self {
        Self {
            http,
            guild_id,
            bot_id,
        }
    }

    async fn fetch_member(&self, user_id: serenity::UserId) -> Result<serenity::Member, LookupError> {
        self.guild_id
            .member(self.http, user_id)
            .await
            .map_err(|e| LookupError {
                user_id: user_id.get(),
                message: e.to_string(),
            })
    }
}

/// Highest position among `roles`. Roles the guild no longer has count as 0.
fn top_position(roles: &[serenity::RoleId], positions: &HashMap<serenity::RoleId, u16>) -> u16 {
    roles
        .iter()
        .filter_map(|role_id| positions.get(role_id).copied())
        .max()
        .unwrap_or(0)
}

#[async_trait]
impl MemberLookup for GuildMemberLookup<'_> {
    type Member = TargetMember;

    async fn lookup_member(&self, user_id: u64) -> Result<TargetMember, LookupError> {
        let guild = self
            .guild_id
            .to_partial_guild(self.http)
            .await
            .map_err(|e| LookupError {
                user_id,
                message: e.to_string(),
            })?;

        let bot = self.fetch_member(self.bot_id).await?;
        let member = self.fetch_member(serenity::UserId::new(user_id)).await?;

        let positions: HashMap<serenity::RoleId, u16> = guild
            .roles
            .iter()
            .map(|(id, role)| (*id, role.position))
            .collect();

        let snapshot = HierarchySnapshot {
            guild_owner_id: guild.owner_id.get(),
            bot_id: self.bot_id.get(),
            bot_top_position: top_position(&bot.roles, &positions),
            target_id: user_id,
            target_top_position: top_position(&member.roles, &positions),
        };

        Ok(TargetMember {
            member,
            manageable: is_manageable(&snapshot),
        })
    }
}

/// Validate a moderation target for `action` ("mute", "kick", ...).
///
/// Replies with the refusal and returns `None` when the target is rejected.
/// Lookup failures propagate to the command error handler.
pub async fn validate_target_member(
    ctx: Context<'_>,
    target: &serenity::User,
    action: &str,
) -> Result<Option<serenity::Member>, Error> {
    let Some(guild_id) = ctx.guild_id() else {
        reply_ephemeral(ctx, GUILD_ONLY_MESSAGE).await?;
        return Ok(None);
    };

    let lookup = GuildMemberLookup::new(ctx.http(), guild_id, ctx.framework().bot_id);

    match validate_target(target.id.get(), target.bot, ctx.author().id.get(), &lookup).await {
        Ok(resolved) => Ok(Some(resolved.member)),
        Err(TargetError::Rejected(reason)) => {
            reply_ephemeral(ctx, reason.message(action, &target.tag())).await?;
            Ok(None)
        }
        Err(TargetError::Lookup(e)) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(id: u64) -> serenity::RoleId {
        serenity::RoleId::new(id)
    }

    fn positions() -> HashMap<serenity::RoleId, u16> {
        HashMap::from([(role(1), 0), (role(10), 3), (role(20), 7), (role(30), 5)])
    }

    #[test]
    fn highest_role_position_wins() {
        assert_eq!(top_position(&[role(10), role(20), role(30)], &positions()), 7);
    }

    #[test]
    fn roles_missing_from_the_guild_are_ignored() {
        assert_eq!(top_position(&[role(99), role(10)], &positions()), 3);
        assert_eq!(top_position(&[role(99)], &positions()), 0);
    }

    #[test]
    fn member_without_roles_sits_at_the_bottom() {
        assert_eq!(top_position(&[], &positions()), 0);
        assert_eq!(top_position(&[role(1)], &positions()), 0);
    }
}
