use nursery_api_models::SaplingRequest;
use nursery_client::SaplingFilter;
use nursery_signals::{ConfirmationOptions, ConfirmationVariant};

use crate::cli::{IdArgs, SaplingAddArgs, SaplingListArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_page_footer, render_sapling, render_saplings};

pub(crate) async fn handle_list(ctx: &AppContext, args: SaplingListArgs) -> CliResult<()> {
    let filter = SaplingFilter {
        nursery_id: Some(ctx.nursery_id()?),
        search: args.search,
    };
    match args.paging.request() {
        Some(page) => {
            let page = ctx.client.saplings_page(&filter, page).await?;
            render_saplings(&page.content, ctx.output)?;
            render_page_footer(&page, ctx.output);
            Ok(())
        }
        None => render_saplings(&ctx.client.list_saplings(&filter).await?, ctx.output),
    }
}

pub(crate) async fn handle_show(ctx: &AppContext, args: IdArgs) -> CliResult<()> {
    let sapling = ctx.client.get_sapling(&args.id).await?;
    render_sapling(&sapling, ctx.output)
}

pub(crate) async fn handle_add(ctx: &AppContext, args: SaplingAddArgs) -> CliResult<()> {
    let name = args.name.trim().to_string();
    if name.is_empty() {
        return Err(CliError::validation("name must not be empty"));
    }
    let request = SaplingRequest {
        name,
        description: args.description,
        image_url: args.image_url,
        nursery_id: ctx.nursery_id()?,
    };
    let sapling = ctx.client.create_sapling(&request).await?;
    ctx.signals()
        .toasts
        .success(format!("Sapling '{}' created", sapling.name));
    render_sapling(&sapling, ctx.output)
}

pub(crate) async fn handle_remove(ctx: &AppContext, args: IdArgs) -> CliResult<()> {
    let options = ConfirmationOptions::new(
        "Delete sapling",
        format!("Delete sapling {}? This cannot be undone.", args.id),
    )
    .confirm_label("Delete")
    .variant(ConfirmationVariant::Danger);
    if !ctx.confirm(options).await? {
        ctx.signals().toasts.info("Deletion cancelled");
        return Ok(());
    }
    ctx.client.delete_sapling(&args.id).await?;
    ctx.signals().toasts.success("Sapling deleted");
    Ok(())
}
