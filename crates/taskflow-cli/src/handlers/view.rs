use chrono::{DateTime, Duration, NaiveDate, Utc};
use taskflow_domain::{
    parse_timestamp, BoardSession, DueDateRange, ProgressRange, SortDirection, SortSpec,
    ViewConfig,
};

use crate::cli::ViewArgs;

/// Build the view configuration described by the filter flags.
pub fn view_config(args: &ViewArgs) -> anyhow::Result<ViewConfig> {
    let mut config = ViewConfig::default()
        .with_statuses(args.status.iter().copied())
        .with_priorities(args.priority.iter().copied())
        .with_assignees(args.assignee.iter().cloned())
        .with_accounts(args.account.iter().cloned())
        .with_categories(args.category.iter().cloned())
        .with_tags(args.tag.iter().cloned())
        .with_due_in(args.due_in)
        .with_show_overdue(args.overdue)
        .with_show_completed(!args.hide_completed);

    if let Some(search) = &args.search {
        config = config.with_search(search.as_str());
    }

    let from = args.due_from.as_deref().map(|raw| bound(raw, false)).transpose()?;
    let to = args.due_to.as_deref().map(|raw| bound(raw, true)).transpose()?;
    if from.is_some() || to.is_some() {
        config = config.with_due_range(Some(DueDateRange::new(from, to)));
    }

    let min = args.min_progress.unwrap_or(0);
    let max = args.max_progress.unwrap_or(100);
    if min > max {
        anyhow::bail!("--min-progress {} is greater than --max-progress {}", min, max);
    }
    Ok(config.with_progress_range(ProgressRange::new(min, max)))
}

// A bare date as an upper bound covers the whole day.
fn bound(raw: &str, upper: bool) -> anyhow::Result<DateTime<Utc>> {
    let instant =
        parse_timestamp(raw).ok_or_else(|| anyhow::anyhow!("Invalid date: {}", raw))?;
    let date_only = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").is_ok();
    if upper && date_only {
        Ok(instant + Duration::days(1) - Duration::milliseconds(1))
    } else {
        Ok(instant)
    }
}

/// Apply the filter and sort flags to a session.
pub fn apply(session: &mut BoardSession, args: &ViewArgs) -> anyhow::Result<()> {
    let config = view_config(args)?;
    let current = session.view().sort();
    let sort = match (args.sort, args.desc) {
        (Some(key), desc) => SortSpec::new(key, direction(desc)),
        (None, true) => SortSpec::new(current.key, SortDirection::Descending),
        (None, false) => current,
    };

    session.update_view(|view| {
        view.replace(config);
        view.set_sort(sort);
    });
    Ok(())
}

fn direction(desc: bool) -> SortDirection {
    if desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    }
}
