// Bot presence. Set once when the gateway reports Ready.

use poise::serenity_prelude as serenity;

const DEFAULT_ACTIVITY: &str = "over the hearth | /help";

/// Show the default "Watching ..." status.
pub fn on_ready(ctx: &serenity::Context) {
    let activity = serenity::ActivityData::watching(DEFAULT_ACTIVITY);
    ctx.set_presence(Some(activity), serenity::OnlineStatus::Online);
}
