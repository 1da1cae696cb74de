use nursery_api_models::{InventoryTransactionRequest, upcoming_quantity};
use nursery_client::InventoryFilter;

use crate::cli::{InventoryAdjustArgs, InventoryListArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_inventory, render_page_footer, render_transaction};

pub(crate) async fn handle_list(ctx: &AppContext, args: InventoryListArgs) -> CliResult<()> {
    let filter = InventoryFilter {
        nursery_id: Some(ctx.nursery_id()?),
        sapling_id: args.sapling,
    };
    match args.paging.request() {
        Some(page) => {
            let page = ctx.client.inventory_page(&filter, page).await?;
            render_inventory(&page.content, ctx.output)?;
            render_page_footer(&page, ctx.output);
            Ok(())
        }
        None => render_inventory(&ctx.client.list_inventory(&filter).await?, ctx.output),
    }
}

/// Record a stock movement after checking it against current stock.
pub(crate) async fn handle_adjust(ctx: &AppContext, args: InventoryAdjustArgs) -> CliResult<()> {
    let stock = ctx.client.inventory_for_breed(&args.breed_id).await?;
    let projection = upcoming_quantity(stock.quantity, args.kind, Some(args.quantity), None);
    if !projection.is_valid {
        return Err(CliError::validation(format!(
            "stock for {} would drop to {} (currently {})",
            stock.breed_name, projection.upcoming, stock.quantity
        )));
    }

    let request = InventoryTransactionRequest {
        transaction_type: args.kind,
        quantity: args.quantity,
        notes: args.notes,
    };
    let mut recorded = ctx
        .client
        .record_inventory_transaction(&args.breed_id, request)
        .await?;
    if recorded.breed_name.is_none() {
        recorded.breed_name = Some(stock.breed_name);
    }
    ctx.signals().toasts.success(format!(
        "Recorded {} of {}; stock now {}",
        recorded.kind, args.quantity, projection.upcoming
    ));
    render_transaction(&recorded, ctx.output)
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use nursery_api_models::TransactionType;
    use serde_json::json;

    use super::*;
    use crate::client::testing::{answer_no, context_with};

    fn stock_mock(server: &MockServer, quantity: i64) {
        server.mock(|when, then| {
            when.method(GET).path("/inventory/breed/b1");
            then.status(200).json_body(json!({
                "success": true,
                "data": {
                    "id": "i1",
                    "breedId": "b1",
                    "breedName": "Damask",
                    "quantity": quantity,
                    "nurseryId": "n1"
                }
            }));
        });
    }

    #[tokio::test]
    async fn overselling_is_rejected_before_posting() {
        let server = MockServer::start_async().await;
        stock_mock(&server, 3);
        let post = server.mock(|when, then| {
            when.method(POST).path("/inventory/b1/transaction");
            then.status(200);
        });
        let ctx = context_with(&server, false, answer_no);

        let err = handle_adjust(
            &ctx,
            InventoryAdjustArgs {
                breed_id: "b1".to_string(),
                kind: TransactionType::Sell,
                quantity: 5,
                notes: None,
            },
        )
        .await
        .expect_err("oversell");
        assert_eq!(err.exit_code(), 2);
        post.assert_calls(0);
    }

    #[tokio::test]
    async fn sale_within_stock_is_recorded() {
        let server = MockServer::start_async().await;
        stock_mock(&server, 10);
        let post = server.mock(|when, then| {
            when.method(POST)
                .path("/inventory/b1/transaction")
                .json_body(json!({"delta": 4, "type": "SELL", "reason": "market"}));
            then.status(200).json_body(json!({
                "success": true,
                "data": {
                    "id": "t9",
                    "nurseryId": "n1",
                    "breedId": "b1",
                    "delta": -4,
                    "type": "SELL",
                    "reason": "market",
                    "createdAt": "2026-01-01T00:00:00Z",
                    "updatedAt": "2026-01-01T00:00:00Z"
                }
            }));
        });
        let ctx = context_with(&server, false, answer_no);

        let result = handle_adjust(
            &ctx,
            InventoryAdjustArgs {
                breed_id: "b1".to_string(),
                kind: TransactionType::Sell,
                quantity: 4,
                notes: Some("market".to_string()),
            },
        )
        .await;
        assert!(result.is_ok());
        post.assert();
        assert_eq!(
            ctx.signals().toasts.toasts()[0].message,
            "Recorded SELL of 4; stock now 6"
        );
    }
}
