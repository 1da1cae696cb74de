use nursery_api_models::{Theme, ThemeRequest};
use tracing::warn;

use crate::cli::ThemeSetArgs;
use crate::client::{AppContext, CliResult};
use crate::output::render_theme;

/// Nursery theme, falling back to the built-in default when it cannot be
/// loaded.
pub(crate) async fn handle_show(ctx: &AppContext) -> CliResult<()> {
    let nursery_id = ctx.nursery_id()?;
    let theme = match ctx.client.nursery_theme(&nursery_id).await {
        Ok(theme) => theme,
        Err(err) if err.is_network() || err.is_server_error() => {
            warn!(error = %err, nursery_id = %nursery_id, "theme unavailable; using default");
            ctx.signals()
                .toasts
                .info("Theme could not be loaded; showing the default");
            Theme::default()
        }
        Err(err) => return Err(err.into()),
    };
    render_theme(&theme, ctx.output)
}

pub(crate) async fn handle_default(ctx: &AppContext) -> CliResult<()> {
    render_theme(&ctx.client.default_theme().await?, ctx.output)
}

pub(crate) async fn handle_set(ctx: &AppContext, args: ThemeSetArgs) -> CliResult<()> {
    let request = ThemeRequest {
        primary_color: args.primary_color,
        secondary_color: args.secondary_color,
        accent_color: args.accent_color,
        font_family: args.font_family,
        font_size_base: args.font_size_base,
        logo_url: args.logo_url,
        border_radius: args.border_radius,
        theme_mode: args.mode,
        ..ThemeRequest::default()
    };
    let theme = ctx
        .client
        .update_theme(&ctx.nursery_id()?, &request)
        .await?;
    ctx.signals().toasts.success("Theme updated");
    render_theme(&theme, ctx.output)
}
