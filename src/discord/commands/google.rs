// Web search through the configured search provider.

use crate::core::search::SearchError;
use crate::discord::moderation::guards::reply_ephemeral;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

/// Search the web via Google.
#[poise::command(slash_command)]
pub async fn google(
    ctx: Context<'_>,
    #[description = "What to search for"] query: String,
    #[description = "Number of results to show (1-5)"]
    #[min = 1]
    #[max = 5]
    results: Option<u8>,
) -> Result<(), Error> {
    let Some(search) = ctx.data().search.clone() else {
        return reply_ephemeral(ctx, "Google search is not configured for this bot.").await;
    };

    // The API round trip can outlast Discord's three second window.
    ctx.defer().await?;

    match search.search(&query, results).await {
        Ok(found) if found.is_empty() => {
            ctx.say(format!("No results found for **{}**.", query.trim()))
                .await?;
        }
        Ok(found) => {
            let description = found
                .iter()
                .map(|r| format!("**[{}]({})**\n{}", r.title, r.link, r.snippet))
                .collect::<Vec<_>>()
                .join("\n\n");

            let embed = serenity::CreateEmbed::new()
                .title(format!("Results for \"{}\"", query.trim()))
                .color(0x4285F4)
                .description(description)
                .footer(serenity::CreateEmbedFooter::new(
                    "Powered by Google Custom Search",
                ));

            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Err(SearchError::EmptyQuery) => {
            ctx.say("Give me something to search for.").await?;
        }
        Err(e) => {
            tracing::error!(error = %e, query = %query, "Google search command failed");
            ctx.say("Sorry, something went wrong while performing that search.")
                .await?;
        }
    }

    Ok(())
}
