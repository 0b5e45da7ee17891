use serde::Serialize;
use taskflow_domain::{DropTarget, Task, TaskId, TaskStatus};
use taskflow_persistence::StatusSync;

use crate::cli::ViewArgs;
use crate::context::CliContext;
use crate::handlers::view;
use crate::output;

#[derive(Serialize)]
struct MoveResult<'a> {
    changed: bool,
    task: Option<&'a Task>,
}

pub async fn handle_list(ctx: &CliContext, args: ViewArgs) -> anyhow::Result<()> {
    let mut session = match ctx.session().await {
        Ok(session) => session,
        Err(e) => output::output_error(&e.to_string()),
    };
    view::apply(&mut session, &args)?;
    output::output_list(session.list())
}

/// Run a keyboard drag onto the target column and write it through.
pub async fn handle_move(
    ctx: &CliContext,
    id: TaskId,
    status: TaskStatus,
    no_rollback: bool,
) -> anyhow::Result<()> {
    let session = match ctx.session().await {
        Ok(session) => session,
        Err(e) => output::output_error(&e.to_string()),
    };
    let mut session = if no_rollback {
        session.with_rollback(false)
    } else {
        session
    };

    if let Err(e) = session.drag_start(id) {
        output::output_error(&e.to_string());
    }
    let update = match session.drag_end(Some(DropTarget::column(status))) {
        Ok(update) => update,
        Err(e) => output::output_error(&e.to_string()),
    };

    let Some(update) = update else {
        return output::output_success(MoveResult {
            changed: false,
            task: session.collection().get(id),
        });
    };

    let (sync, mut outcomes) = StatusSync::new(ctx.store.clone());
    sync.dispatch(update).await?;
    let outcome = outcomes
        .recv()
        .await
        .ok_or_else(|| anyhow::anyhow!("status sync ended without a result"))?;

    if let Some(failure) = session.reconcile(outcome) {
        output::output_error(&failure.to_string());
    }
    output::output_success(MoveResult {
        changed: true,
        task: session.collection().get(id),
    })
}
