//! Plain-text rendering for terminal output

use ephemera_context::{FossilContext, HistoryContext, NormalizedContext};
use ephemera_forge::{ForgeAsset, ForgePhase, ForgeProgress};
use ephemera_navigator::{NavigationState, Status, ViewMode};

pub(crate) fn context(ctx: &NormalizedContext, model_url: &str, detail: bool) -> String {
    let mut lines = vec![
        format!("date    : {}", ctx.date),
        format!("theme   : {}", ctx.theme),
        format!("summary : {}", ctx.summary),
        format!("model   : {model_url}"),
    ];
    if detail {
        lines.push(format!("prompt  : {}", ctx.generation_prompt));
        lines.push(format!("context : {}", ctx.context_id));
        for (i, item) in ctx.news_items.iter().enumerate() {
            lines.push(format!("  {}. {}", i + 1, item.title));
            lines.push(format!("     {}", item.content));
        }
    } else if !ctx.news_items.is_empty() {
        lines.push(format!("news    : {} items (open detail to read)", ctx.news_items.len()));
    }
    lines.join("\n")
}

/// One published session state
pub(crate) fn state(
    state: &NavigationState,
    display_model_url: impl Fn(&str) -> String,
) -> String {
    let today = if state.is_today { " (today)" } else { "" };
    let header = format!("── {}{today} ── {}", state.selected_date, state.status);

    let body = match state.status {
        Status::Loading => "loading...".to_string(),
        Status::Success => match &state.context {
            Some(ctx) => context(
                ctx,
                &display_model_url(&ctx.model_url),
                state.view == ViewMode::Detail,
            ),
            None => String::new(),
        },
        Status::Void => match &state.last_error {
            Some(e) if e.is_not_found() => {
                format!("the void: nothing was recorded for this day ({e})")
            }
            Some(e) => format!("the void: {e}"),
            None => "the void".to_string(),
        },
    };
    format!("{header}\n{body}")
}

pub(crate) fn history(ctx: &HistoryContext) -> String {
    let mut lines = vec![
        format!("{} ({})", ctx.year_display, ctx.context_id),
        format!("synthesis  : {}", ctx.synthesis),
        format!("philosophy : {}", ctx.philosophy),
        format!("prompt     : {}", ctx.suggested_prompt),
    ];
    if !ctx.symbols.is_empty() {
        lines.push(format!("symbols    : {}", ctx.symbols.join(", ")));
    }
    for event in &ctx.events {
        lines.push(format!("  [{:?}] {}: {}", event.category, event.title, event.description));
    }
    lines.join("\n")
}

pub(crate) fn fossil(ctx: &FossilContext) -> String {
    let mut lines = vec![
        format!("year {} ({})", ctx.year, ctx.context_id),
        format!("synthesis  : {}", ctx.synthesis),
        format!("philosophy : {}", ctx.philosophy),
        format!("report     : {}", ctx.archaeologist_report),
        format!("prompt     : {}", ctx.suggested_prompt),
    ];
    for prediction in &ctx.predictions {
        lines.push(format!("  - {}: {}", prediction.title, prediction.description));
    }
    lines.join("\n")
}

pub(crate) fn asset(asset: &ForgeAsset) -> String {
    let url = asset
        .selected_url
        .as_deref()
        .or(asset.alist_url.as_deref())
        .or(asset.tripo_url.as_deref())
        .unwrap_or("-");
    format!("{:<12} {:?} {url}", asset.task_id, asset.status)
}

pub(crate) fn forge_progress(progress: &ForgeProgress) -> String {
    let phase = match progress.phase {
        ForgePhase::Idle => "idle",
        ForgePhase::Creating => "creating",
        ForgePhase::Polling => "polling",
        ForgePhase::Completed => "completed",
        ForgePhase::Failed => "failed",
    };
    match (&progress.task, &progress.error) {
        (_, Some(error)) => format!("[{phase}] {error}"),
        (Some(task), None) => format!(
            "[{phase}] task {} {:?} {}%",
            task.task_id, task.status, task.progress_percent
        ),
        (None, None) => format!("[{phase}]"),
    }
}
