use anyhow::anyhow;
use nursery_api_models::LoginRequest;

use crate::cli::LoginArgs;
use crate::client::{AppContext, CliError, CliResult};
use crate::output::render_user;

pub(crate) async fn handle_login(ctx: &AppContext, args: LoginArgs) -> CliResult<()> {
    let phone = args.phone.trim().to_string();
    if phone.is_empty() {
        return Err(CliError::validation("phone must not be empty"));
    }
    let password = match args.password {
        Some(password) => password,
        None => tokio::task::spawn_blocking(|| rpassword::prompt_password("Password: "))
            .await
            .map_err(|err| CliError::failure(anyhow!("prompt task failed: {err}")))?
            .map_err(|err| CliError::failure(anyhow!("failed to read password: {err}")))?,
    };
    if password.is_empty() {
        return Err(CliError::validation("password must not be empty"));
    }

    let user = ctx.client.login(&LoginRequest { phone, password }).await?;
    let name = user.name.as_deref().unwrap_or(&user.phone);
    ctx.signals().toasts.success(format!("Signed in as {name}"));
    Ok(())
}

pub(crate) fn handle_logout(ctx: &AppContext) -> CliResult<()> {
    ctx.client.logout()?;
    ctx.signals().toasts.success("Signed out");
    Ok(())
}

pub(crate) async fn handle_whoami(ctx: &AppContext) -> CliResult<()> {
    if ctx.client.session().is_none() {
        return Err(CliError::Unauthorized("not signed in".to_string()));
    }
    let user = ctx.client.current_user().await?;
    render_user(&user, ctx.output)
}
