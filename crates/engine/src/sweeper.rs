use crate::store::SessionStore;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Evicts idle sessions every `sweep_interval` until `shutdown` flips to `true`
/// or its sender is dropped.
pub fn spawn_sweeper(
    store: Arc<SessionStore>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let period = store.config().sweep_interval;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately; nothing can be idle yet.
        ticker.tick().await;

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let evicted = store.sweep_idle(Instant::now());
                    log::debug!(
                        "Session sweep evicted {} session(s), {} remaining",
                        evicted.len(),
                        store.len()
                    );
                }
            }
        }
        log::debug!("Session sweeper stopped");
    })
}
