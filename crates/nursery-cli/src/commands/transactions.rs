use nursery_client::TransactionFilter;
use nursery_signals::{ConfirmationOptions, ConfirmationVariant};

use crate::cli::{IdArgs, TransactionListArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_page_footer, render_transaction, render_transactions};

pub(crate) async fn handle_list(ctx: &AppContext, args: TransactionListArgs) -> CliResult<()> {
    let filter = TransactionFilter {
        breed_id: args.breed,
        nursery_id: Some(ctx.nursery_id()?),
    };
    match args.paging.request() {
        Some(page) => {
            let page = ctx.client.transactions_page(&filter, page).await?;
            render_transactions(&page.content, ctx.output)?;
            render_page_footer(&page, ctx.output);
            Ok(())
        }
        None => render_transactions(&ctx.client.list_transactions(&filter).await?, ctx.output),
    }
}

pub(crate) async fn handle_show(ctx: &AppContext, args: IdArgs) -> CliResult<()> {
    let transaction = ctx.client.get_transaction(&args.id).await?;
    render_transaction(&transaction, ctx.output)
}

/// Reverse a movement. Reversals and already reversed movements are refused
/// locally.
pub(crate) async fn handle_undo(ctx: &AppContext, args: IdArgs) -> CliResult<()> {
    let transaction = ctx.client.get_transaction(&args.id).await?;
    if transaction.is_undo {
        return Err(CliError::validation("an undo transaction cannot be undone"));
    }
    if transaction.reversed_by_txn_id.is_some() {
        return Err(CliError::validation("transaction has already been undone"));
    }

    let options = ConfirmationOptions::new(
        "Undo transaction",
        format!(
            "Reverse {} of {} for breed {}?",
            transaction.kind, transaction.delta, transaction.breed_id
        ),
    )
    .confirm_label("Undo")
    .variant(ConfirmationVariant::Warning);
    if !ctx.confirm(options).await? {
        ctx.signals().toasts.info("Undo cancelled");
        return Ok(());
    }
    ctx.client.undo_transaction(&transaction.id).await?;
    ctx.signals().toasts.success("Transaction undone");
    Ok(())
}

pub(crate) async fn handle_remove(ctx: &AppContext, args: IdArgs) -> CliResult<()> {
    let options = ConfirmationOptions::new(
        "Delete transaction",
        format!("Delete transaction {}? Stock is not restored.", args.id),
    )
    .confirm_label("Delete")
    .variant(ConfirmationVariant::Danger);
    if !ctx.confirm(options).await? {
        ctx.signals().toasts.info("Deletion cancelled");
        return Ok(());
    }
    ctx.client.soft_delete_transaction(&args.id).await?;
    ctx.signals().toasts.success("Transaction deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::{Value, json};

    use super::*;
    use crate::client::testing::{answer_no, answer_yes, context_with};

    fn transaction(reversed_by: Option<&str>) -> Value {
        json!({
            "success": true,
            "data": {
                "id": "t1",
                "nurseryId": "n1",
                "breedId": "b1",
                "delta": -2,
                "type": "SELL",
                "reversedByTxnId": reversed_by,
                "createdAt": "2026-01-01T00:00:00Z",
                "updatedAt": "2026-01-01T00:00:00Z"
            }
        })
    }

    #[tokio::test]
    async fn undo_runs_after_confirmation() {
        let server = MockServer::start_async().await;
        let body = transaction(None);
        server.mock(|when, then| {
            when.method(GET).path("/transactions/t1");
            then.status(200).json_body(body);
        });
        let undo = server.mock(|when, then| {
            when.method(POST).path("/transactions/t1/undo");
            then.status(200).json_body(json!({"success": true, "data": null}));
        });

        let declined = context_with(&server, false, answer_no);
        assert!(handle_undo(&declined, IdArgs { id: "t1".to_string() }).await.is_ok());
        undo.assert_calls(0);

        let accepted = context_with(&server, false, answer_yes);
        assert!(handle_undo(&accepted, IdArgs { id: "t1".to_string() }).await.is_ok());
        undo.assert_calls(1);
        assert_eq!(
            accepted.signals().toasts.toasts()[0].message,
            "Transaction undone"
        );
    }

    #[tokio::test]
    async fn undo_refuses_reversed_transactions() {
        let server = MockServer::start_async().await;
        let body = transaction(Some("t2"));
        server.mock(|when, then| {
            when.method(GET).path("/transactions/t1");
            then.status(200).json_body(body);
        });
        let ctx = context_with(&server, true, answer_yes);

        let err = handle_undo(&ctx, IdArgs { id: "t1".to_string() })
            .await
            .expect_err("already reversed");
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn remove_with_yes_skips_prompt() {
        let server = MockServer::start_async().await;
        let delete = server.mock(|when, then| {
            when.method(POST).path("/transactions/t1/soft-delete");
            then.status(200).json_body(json!({"success": true, "data": null}));
        });
        let ctx = context_with(&server, true, answer_no);

        assert!(handle_remove(&ctx, IdArgs { id: "t1".to_string() }).await.is_ok());
        delete.assert();
    }
}
