use serde::Serialize;
use taskflow_domain::{Board, IntegrityIssue, Task};

use crate::cli::ViewArgs;
use crate::context::CliContext;
use crate::handlers::view;
use crate::output;

#[derive(Serialize)]
struct ColumnView<'a> {
    status: &'static str,
    count: usize,
    tasks: &'a [Task],
}

#[derive(Serialize)]
struct BoardView<'a> {
    columns: Vec<ColumnView<'a>>,
    total: usize,
    unrecognized: &'a [IntegrityIssue],
}

impl<'a> From<&'a Board> for BoardView<'a> {
    fn from(board: &'a Board) -> Self {
        Self {
            columns: board
                .columns
                .iter()
                .map(|column| ColumnView {
                    status: column.status.label(),
                    count: column.count(),
                    tasks: &column.tasks,
                })
                .collect(),
            total: board.total(),
            unrecognized: &board.unrecognized,
        }
    }
}

pub async fn handle(ctx: &CliContext, args: ViewArgs) -> anyhow::Result<()> {
    let mut session = match ctx.session().await {
        Ok(session) => session,
        Err(e) => output::output_error(&e.to_string()),
    };
    view::apply(&mut session, &args)?;
    output::output_success(BoardView::from(session.board()))
}
