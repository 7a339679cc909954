//! `counts`: the windowed series for one location and session, plus the
//! latest counts.

use std::sync::Arc;

use chrono::Utc;

use clientcount_core::{
    DashboardView, FetchOptions, FilterModel, FilterState, MetricVisibility, NO_DATA_MESSAGE,
    format_number,
};

use crate::cli::{CountsArgs, GlobalOpts};
use crate::config::{self, Settings};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    settings: &Settings,
    args: CountsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let now = Utc::now();
    let filters = FilterModel::with_state(
        Arc::new(settings.catalog.clone()),
        FilterState {
            query: util::resolve_query(settings, &args.query)?,
            metric_visibility: args.metrics.parse()?,
            window: util::window_selector(&args, settings.offset, now)?,
        },
    )?;

    let fetcher = config::build_fetcher(settings)?;
    let state = util::fetch(&fetcher, &filters.query(), FetchOptions::default(), global).await?;
    let view = DashboardView::compose(
        &state,
        &filters.current(),
        filters.catalog(),
        settings.offset,
        now,
    );

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &view,
        |v| detail(v, settings, color),
        plain,
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(view: &DashboardView, settings: &Settings, color: bool) -> String {
    let summary = MetricVisibility::only(view.visible_metrics.iter().copied()).summary();
    let mut sections = vec![
        output::heading(&view.title, color),
        output::muted(&format!("{} \u{b7} {summary}", view.window_label), color),
    ];

    if view.points.is_empty() {
        sections.push(NO_DATA_MESSAGE.into());
        return sections.join("\n");
    }

    let mut header = vec!["Date".to_owned()];
    header.extend(view.visible_metrics.iter().map(|m| m.label().to_owned()));
    let rows = view
        .points
        .iter()
        .map(|p| {
            let mut row = vec![p.date_label.clone()];
            row.extend(
                view.visible_metrics
                    .iter()
                    .map(|m| format_number(p.value(*m), &settings.locale)),
            );
            row
        })
        .collect();
    sections.push(output::render_grid(header, rows));

    if let Some(ref latest) = view.latest {
        sections.push(String::new());
        sections.push(output::heading(
            &format!(
                "Latest at {}",
                util::local_timestamp(latest.created_at, settings.offset)
            ),
            color,
        ));
        sections.push(util::kpi_lines(latest, &settings.locale, color));
    }
    sections.join("\n")
}

/// Tab-separated: epoch ms, date label, then the visible metric counts.
fn plain(view: &DashboardView) -> String {
    if view.points.is_empty() {
        return NO_DATA_MESSAGE.into();
    }
    view.points
        .iter()
        .map(|p| {
            let mut fields = vec![p.timestamp.to_string(), p.date_label.clone()];
            fields.extend(view.visible_metrics.iter().map(|m| p.value(*m).to_string()));
            fields.join("\t")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
