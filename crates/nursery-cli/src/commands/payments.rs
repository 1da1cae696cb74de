use nursery_api_models::{PaymentRequest, PaymentType};
use nursery_signals::{ConfirmationOptions, ConfirmationVariant};

use crate::cli::{IdArgs, PaymentAddArgs, PaymentListArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::render_payments;

pub(crate) async fn handle_list(ctx: &AppContext, args: PaymentListArgs) -> CliResult<()> {
    let payments = ctx
        .client
        .payments_for_transaction(&args.transaction_id)
        .await?;
    render_payments(&payments, ctx.output)
}

pub(crate) async fn handle_add(ctx: &AppContext, args: PaymentAddArgs) -> CliResult<()> {
    let kind = args.kind.trim();
    if kind.is_empty() {
        return Err(CliError::validation("payment type must not be empty"));
    }
    let request = PaymentRequest {
        transaction_id: args.transaction_id.clone(),
        kind: PaymentType::from(kind),
        amount: args.amount,
        description: args.description,
    };
    let payment = ctx
        .client
        .create_payment(&args.transaction_id, &request)
        .await?;
    ctx.signals().toasts.success(format!(
        "Recorded {} payment of {:.2}",
        payment.kind, payment.amount
    ));
    render_payments(std::slice::from_ref(&payment), ctx.output)
}

pub(crate) async fn handle_remove(ctx: &AppContext, args: IdArgs) -> CliResult<()> {
    let options = ConfirmationOptions::new(
        "Delete payment",
        format!("Delete payment {}?", args.id),
    )
    .confirm_label("Delete")
    .variant(ConfirmationVariant::Danger);
    if !ctx.confirm(options).await? {
        ctx.signals().toasts.info("Deletion cancelled");
        return Ok(());
    }
    ctx.client.soft_delete_payment(&args.id).await?;
    ctx.signals().toasts.success("Payment deleted");
    Ok(())
}
