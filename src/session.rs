//! Session runner
//!
//! Wires the pieces together for one run of the program: settings and mapping file,
//! platform sink, persistence worker, controller source, then the polling loop until
//! the exit action or Ctrl-C.

use crate::config::SessionSettings;
use crate::controller::source::Polling;
use crate::controller::{GamepadSource, SourceSettings, SourceStatus};
use crate::mapping::{BindingTable, EngineStats, MappingEngine, TickOutcome};
use crate::output::{self, ActionSink};
use crate::persistence::{MappingStore, PersistenceHandle, StorePersister};
use chrono::Local;
use color_eyre::{eyre::eyre, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, trace, warn};

const STATS_INTERVAL: Duration = Duration::from_secs(30);

pub async fn run() -> Result<()> {
    let settings = SessionSettings::load().await;
    debug!("Session settings: {:?}", settings);
    run_with(settings).await
}

pub async fn run_with(settings: SessionSettings) -> Result<()> {
    let store = MappingStore::load_or_default(&settings.mapping_file)
        .await
        .map_err(|e| eyre!("Failed to load mapping: {}", e))?;
    log_bindings(&store);

    let sink = output::open_default_sink()
        .map_err(|e| eyre!("Failed to open input sink: {}", e))?;

    let (persister, worker) = PersistenceHandle::spawn(settings.mapping_file.clone());

    let source_settings = SourceSettings {
        connect_timeout: settings.connect_timeout(),
        connect_poll: settings.connect_poll(),
    };
    let source = match until_interrupted(connect_source(source_settings), ctrl_c()).await {
        Some(Ok(source)) => source,
        Some(Err(e)) => {
            worker.shutdown().await;
            return Err(e);
        }
        None => {
            info!("Ctrl-C received while waiting for a controller, shutting down");
            worker.shutdown().await;
            return Ok(());
        }
    };

    let mut engine = MappingEngine::new(store, sink, persister);
    let result = drive(source, &mut engine, settings.poll_interval()).await;

    engine.release_held();
    log_stats(engine.stats(), EngineStats::default());
    info!(
        "Final settings: mouse sensitivity {}, scroll sensitivity {}, scroll inverted: {}",
        engine.mouse_sensitivity(),
        engine.scroll_sensitivity(),
        engine.invert_scroll()
    );
    worker.shutdown().await;
    info!("Session ended");
    result
}

/// Runs `work` unless `interrupt` completes first, in which case `None` is returned.
async fn until_interrupted<T>(
    work: impl Future<Output = T>,
    interrupt: impl Future<Output = ()>,
) -> Option<T> {
    tokio::select! {
        result = work => Some(result),
        _ = interrupt => None,
    }
}

// Resolves on Ctrl-C; never resolves when the handler cannot be installed
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Unable to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn connect_source(settings: SourceSettings) -> Result<GamepadSource<Polling>> {
    let source = GamepadSource::create(Some(settings))
        .map_err(|e| eyre!("Failed to create gamepad source: {}", e))?;
    let source = source
        .connect()
        .await
        .map_err(|e| eyre!("Failed to connect gamepad: {}", e))?;
    if let Some(name) = source.active_gamepad_name() {
        info!("Using controller: {}", name);
    }
    Ok(source)
}

async fn drive<S, P>(
    mut source: GamepadSource<Polling>,
    engine: &mut MappingEngine<S, P>,
    poll_interval: Duration,
) -> Result<()>
where
    S: ActionSink,
    P: StorePersister,
{
    let mut ticker = interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut stats_ticker = interval_at(Instant::now() + STATS_INTERVAL, STATS_INTERVAL);
    let mut last_stats = EngineStats::default();
    let mut link = LinkState::Connected;

    let interrupt = ctrl_c();
    tokio::pin!(interrupt);

    info!("Mapping active, polling every {:?}", poll_interval);
    loop {
        tokio::select! {
            _ = &mut interrupt => {
                info!("Ctrl-C received, shutting down");
                break;
            }
            _ = stats_ticker.tick() => {
                let stats = engine.stats();
                log_stats(stats, last_stats);
                last_stats = stats;
            }
            _ = ticker.tick() => {
                if step(engine, source.poll(), &mut link) == TickOutcome::TerminationRequested {
                    info!("Exit action pressed, shutting down");
                    break;
                }
            }
        }
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LinkState {
    Connected,
    Lost,
}

// One poll result applied to the engine
fn step<S, P>(
    engine: &mut MappingEngine<S, P>,
    status: SourceStatus,
    link: &mut LinkState,
) -> TickOutcome
where
    S: ActionSink,
    P: StorePersister,
{
    match status {
        SourceStatus::Connected(snapshot) => {
            if *link == LinkState::Lost {
                info!("Controller back, resuming");
                *link = LinkState::Connected;
            }
            trace!("{}", snapshot.summary());
            engine.tick(&snapshot)
        }
        SourceStatus::Disconnected => {
            if *link == LinkState::Connected {
                warn!("Controller disconnected, waiting for it to come back");
                engine.suspend();
                *link = LinkState::Lost;
            }
            TickOutcome::Continue
        }
    }
}

fn log_stats(stats: EngineStats, since: EngineStats) {
    info!(
        "[{}] ticks: {} (+{}), edges: {} (+{})",
        Local::now().format("%H:%M:%S"),
        stats.ticks,
        stats.ticks - since.ticks,
        stats.edges,
        stats.edges - since.edges
    );
}

fn log_bindings(store: &MappingStore) {
    info!(
        "Mouse sensitivity {:.1}, scroll sensitivity {:.1}, scroll inverted: {}",
        store.mouse_sensitivity(),
        store.scroll_sensitivity(),
        store.invert_scroll()
    );
    info!("Left stick moves the pointer, right stick scrolls");
    for (input, action) in BindingTable::compile(store).iter() {
        info!("  {:<20} {}", input.config_key(), action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{ControllerSnapshot, InputId};
    use crate::output::recording::{RecordingSink, SinkCall};
    use crate::output::PointerButton;
    use crate::persistence::RecordingPersister;

    fn engine() -> MappingEngine<RecordingSink, RecordingPersister> {
        MappingEngine::new(
            MappingStore::defaults(),
            RecordingSink::default(),
            RecordingPersister::default(),
        )
    }

    #[test]
    fn disconnect_suspends_once() {
        let mut engine = engine();
        let mut link = LinkState::Connected;
        let held = ControllerSnapshot::pressed(InputId::ButtonA);

        step(&mut engine, SourceStatus::Connected(held), &mut link);
        step(&mut engine, SourceStatus::Disconnected, &mut link);
        step(&mut engine, SourceStatus::Disconnected, &mut link);
        assert_eq!(link, LinkState::Lost);

        step(&mut engine, SourceStatus::Connected(held), &mut link);
        assert_eq!(link, LinkState::Connected);

        assert_eq!(
            engine.sink_mut().take(),
            vec![
                SinkCall::Down(PointerButton::Left),
                SinkCall::Up(PointerButton::Left),
                SinkCall::Down(PointerButton::Left),
            ]
        );
    }

    #[test]
    fn disconnected_tick_never_requests_termination() {
        let mut engine = engine();
        let mut link = LinkState::Connected;
        let start = ControllerSnapshot::pressed(InputId::ButtonStart);

        assert_eq!(
            step(&mut engine, SourceStatus::Disconnected, &mut link),
            TickOutcome::Continue
        );
        assert_eq!(
            step(&mut engine, SourceStatus::Connected(start), &mut link),
            TickOutcome::TerminationRequested
        );
    }

    #[tokio::test]
    async fn interrupt_abandons_pending_work() {
        let result = until_interrupted(std::future::pending::<u32>(), async {}).await;
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn finished_work_wins_over_idle_interrupt() {
        let result = until_interrupted(async { 7 }, std::future::pending::<()>()).await;
        assert_eq!(result, Some(7));
    }
}
