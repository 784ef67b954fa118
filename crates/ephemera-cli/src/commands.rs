//! Subcommand implementations

use anyhow::{bail, Context as _};
use ephemera_context::{normalize_daily_context, CalendarDate, ContextClient, ContextSource};
use ephemera_forge::{
    load_assets, AssetLookup, CancelHandle, ForgeApi, ForgeClient, ForgeCreateRequest,
    ForgePoller,
};
use ephemera_navigator::{LocalClock, NavigatorSession};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::browse::{self, BrowseCommand};
use crate::config::EphemeraConfig;
use crate::render;

/// Context and forge clients sharing one connection pool
fn clients(config: &EphemeraConfig) -> anyhow::Result<(ContextClient, ForgeClient)> {
    let client =
        ContextClient::new(config.client.clone()).context("failed to build the HTTP client")?;
    let forge = ForgeClient::with_transport(client.transport().clone());
    Ok((client, forge))
}

pub(crate) async fn daily(
    config: &EphemeraConfig,
    date: Option<CalendarDate>,
    detail: bool,
) -> anyhow::Result<()> {
    let (client, forge) = clients(config)?;

    let daily = match client.fetch_daily_context(date).await {
        Ok(daily) => daily,
        Err(e) if e.is_not_found() => {
            let day = date.map_or_else(|| "today".to_string(), |d| d.to_string());
            println!("the void: nothing was recorded for {day}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let model_url = match forge.completed_model_url(&daily.context_id).await {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!(error = %e, "no existing asset");
            None
        }
    };
    let ctx = normalize_daily_context(&daily, model_url.as_deref());
    let display_url = forge.process_model_url(&ctx.model_url);
    println!("{}", render::context(&ctx, &display_url, detail));
    Ok(())
}

pub(crate) async fn history(config: &EphemeraConfig, year: i32) -> anyhow::Result<()> {
    let (client, _) = clients(config)?;
    let ctx = client
        .fetch_history_context(year)
        .await
        .with_context(|| format!("no history context for {year}"))?;
    println!("{}", render::history(&ctx));
    Ok(())
}

pub(crate) async fn fossil(config: &EphemeraConfig, year: i32) -> anyhow::Result<()> {
    let (client, _) = clients(config)?;
    let ctx = client
        .fetch_fossil_context(year)
        .await
        .with_context(|| format!("no fossil context for {year}"))?;
    println!("{}", render::fossil(&ctx));
    Ok(())
}

pub(crate) async fn assets(config: &EphemeraConfig, context_id: &str) -> anyhow::Result<()> {
    let (_, forge) = clients(config)?;
    let assets = load_assets(&forge, context_id).await;
    if assets.is_empty() {
        println!("no assets for {context_id}");
        return Ok(());
    }
    for asset in &assets {
        println!("{}", render::asset(asset));
    }
    if let Some(url) = ephemera_forge::completed_model_url(&assets) {
        println!("model: {}", forge.process_model_url(url));
    }
    Ok(())
}

pub(crate) async fn forge(
    config: &EphemeraConfig,
    context_id: &str,
    modifier: Option<String>,
    style: Option<String>,
) -> anyhow::Result<()> {
    let (_, forge) = clients(config)?;
    let forge = Arc::new(forge);
    let api: Arc<dyn ForgeApi> = forge.clone();
    let poller = ForgePoller::new(api, config.forge);

    let mut progress = poller.subscribe();
    let printer = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            eprintln!("{}", render::forge_progress(&progress.borrow_and_update()));
        }
    });

    let handle = CancelHandle::new();
    let interrupt = {
        let handle = handle.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                handle.cancel();
            }
        })
    };

    let mut request = ForgeCreateRequest::new(context_id);
    if let Some(modifier) = modifier {
        request = request.with_modifier(modifier);
    }
    if let Some(style) = style {
        request = request.with_style(style);
    }

    let outcome = poller.forge(&request, &handle.token()).await;
    interrupt.abort();
    drop(poller);
    let _ = printer.await;

    match outcome {
        Ok(task) => {
            let url = forge
                .resolve_model_url(task.alist_url.as_deref(), task.tripo_url.as_deref())
                .await;
            println!("model: {url}");
            Ok(())
        }
        Err(e) if e.is_cancelled() => {
            println!("cancelled");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub(crate) async fn health(config: &EphemeraConfig) -> anyhow::Result<()> {
    let (client, _) = clients(config)?;
    if !client.health_check().await {
        bail!("{} is not healthy", config.client.base_url);
    }
    println!("OK");
    Ok(())
}

pub(crate) async fn browse(
    config: &EphemeraConfig,
    start_at: Option<CalendarDate>,
) -> anyhow::Result<()> {
    let (client, forge) = clients(config)?;
    let forge = Arc::new(forge);
    let source: Arc<dyn ContextSource> = Arc::new(client);
    let assets: Arc<dyn AssetLookup> = forge.clone();

    let session = NavigatorSession::start(source, Arc::new(LocalClock), Some(assets));
    if let Some(date) = start_at {
        session.go_to(date);
    }

    let mut updates = session.subscribe();
    let printer = {
        let forge = forge.clone();
        tokio::spawn(async move {
            while updates.changed().await.is_ok() {
                let state = updates.borrow_and_update().clone();
                println!("{}\n", render::state(&state, |u| forge.process_model_url(u)));
            }
        })
    };

    println!("{}\n", browse::HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        // the session may have been open across midnight
        if session.refresh_today() {
            tracing::info!("local day changed");
        }
        match browse::parse_command(&line) {
            Some(BrowseCommand::Action(action)) => {
                if !session.dispatch(action) {
                    println!("(nothing to do)");
                }
            }
            Some(BrowseCommand::Link(raw)) => {
                session.go_to_link(&raw);
            }
            Some(BrowseCommand::Show) => {
                let state = session.snapshot();
                println!("{}\n", render::state(&state, |u| forge.process_model_url(u)));
            }
            Some(BrowseCommand::Help) => println!("{}", browse::HELP),
            Some(BrowseCommand::Quit) => break,
            None => {
                if !line.trim().is_empty() {
                    println!("unknown command, try `help`");
                }
            }
        }
    }

    session.shutdown();
    drop(session);
    let _ = printer.await;
    Ok(())
}
