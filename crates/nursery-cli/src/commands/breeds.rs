use nursery_api_models::{BreedMode, BreedRequest};
use nursery_client::BreedFilter;
use nursery_signals::{ConfirmationOptions, ConfirmationVariant};

use crate::cli::{BreedAddArgs, BreedListArgs, IdArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_breed, render_breeds, render_page_footer};

pub(crate) async fn handle_list(ctx: &AppContext, args: BreedListArgs) -> CliResult<()> {
    let filter = BreedFilter {
        nursery_id: Some(ctx.nursery_id()?),
        sapling_id: args.sapling,
    };
    match args.paging.request() {
        Some(page) => {
            let page = ctx.client.breeds_page(&filter, page).await?;
            render_breeds(&page.content, ctx.output)?;
            render_page_footer(&page, ctx.output);
            Ok(())
        }
        None => render_breeds(&ctx.client.list_breeds(&filter).await?, ctx.output),
    }
}

pub(crate) async fn handle_show(ctx: &AppContext, args: IdArgs) -> CliResult<()> {
    let breed = ctx.client.get_breed(&args.id).await?;
    render_breed(&breed, ctx.output)
}

pub(crate) async fn handle_add(ctx: &AppContext, args: BreedAddArgs) -> CliResult<()> {
    let name = args.name.trim().to_string();
    if name.is_empty() {
        return Err(CliError::validation("name must not be empty"));
    }
    let items_per_slot = match (args.mode, args.items_per_slot) {
        (BreedMode::Slot, None | Some(0)) => {
            return Err(CliError::validation(
                "--items-per-slot must be greater than 0 for slot mode",
            ));
        }
        (BreedMode::Slot, items) => items,
        (BreedMode::Individual, _) => None,
    };
    let request = BreedRequest {
        name,
        description: args.description,
        sapling_id: args.sapling,
        nursery_id: ctx.nursery_id()?,
        mode: args.mode,
        items_per_slot,
        image_url: None,
    };
    let breed = ctx.client.create_breed(&request).await?;
    ctx.signals()
        .toasts
        .success(format!("Breed '{}' created", breed.name));
    render_breed(&breed, ctx.output)
}

/// Breeds with recorded movements cannot be deleted; that is checked before
/// asking for confirmation.
pub(crate) async fn handle_remove(ctx: &AppContext, args: IdArgs) -> CliResult<()> {
    if ctx.client.breed_has_transactions(&args.id).await? {
        return Err(CliError::validation(
            "Cannot delete breed with existing transactions",
        ));
    }
    let options = ConfirmationOptions::new(
        "Delete breed",
        format!("Delete breed {}? This cannot be undone.", args.id),
    )
    .confirm_label("Delete")
    .variant(ConfirmationVariant::Danger);
    if !ctx.confirm(options).await? {
        ctx.signals().toasts.info("Deletion cancelled");
        return Ok(());
    }
    ctx.client.delete_breed(&args.id).await?;
    ctx.signals().toasts.success("Breed deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::client::testing::{answer_no, answer_yes, context_with};

    #[tokio::test]
    async fn remove_refuses_breeds_with_history() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/breeds/b1/has-transactions");
            then.status(200).json_body(json!({"success": true, "data": true}));
        });
        let delete = server.mock(|when, then| {
            when.method(DELETE).path("/breeds/b1");
            then.status(204);
        });
        let ctx = context_with(&server, true, answer_yes);

        let err = handle_remove(&ctx, IdArgs { id: "b1".to_string() })
            .await
            .expect_err("breed with history");
        assert_eq!(err.exit_code(), 2);
        delete.assert_calls(0);
    }

    #[tokio::test]
    async fn remove_respects_declined_confirmation() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/breeds/b1/has-transactions");
            then.status(200).json_body(json!({"success": true, "data": false}));
        });
        let delete = server.mock(|when, then| {
            when.method(DELETE).path("/breeds/b1");
            then.status(204);
        });

        let declined = context_with(&server, false, answer_no);
        assert!(handle_remove(&declined, IdArgs { id: "b1".to_string() }).await.is_ok());
        delete.assert_calls(0);
        assert_eq!(
            declined.signals().toasts.toasts()[0].message,
            "Deletion cancelled"
        );

        let accepted = context_with(&server, false, answer_yes);
        assert!(handle_remove(&accepted, IdArgs { id: "b1".to_string() }).await.is_ok());
        delete.assert_calls(1);
    }

    #[tokio::test]
    async fn slot_mode_requires_items_per_slot() {
        let server = MockServer::start_async().await;
        let ctx = context_with(&server, true, answer_yes);
        let err = handle_add(
            &ctx,
            BreedAddArgs {
                name: "Damask".to_string(),
                sapling: "s1".to_string(),
                mode: BreedMode::Slot,
                items_per_slot: None,
                description: None,
            },
        )
        .await
        .expect_err("slot without items");
        assert_eq!(err.exit_code(), 2);
    }
}
