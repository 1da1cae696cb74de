use crate::client::{AppContext, CliResult};
use crate::output::render_dashboard;

pub(crate) async fn handle_dashboard(ctx: &AppContext) -> CliResult<()> {
    let nursery_id = ctx.nursery_id()?;
    let (summary, recent) = tokio::join!(
        ctx.client.dashboard_summary(&nursery_id),
        ctx.client.recent_transactions(&nursery_id)
    );
    render_dashboard(&summary?, &recent?, ctx.output)
}
