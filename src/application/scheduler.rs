//! Fixed-interval background tasks with a shared stop signal

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

pub struct Scheduler {
    stop_tx: watch::Sender<bool>,
    loops: Vec<(String, JoinHandle<()>)>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            stop_tx,
            loops: Vec::new(),
        }
    }

    /// Run `task` every `period`, first run one period from now.
    ///
    /// Each run is spawned on its own so a slow run never holds the timer back;
    /// ticks missed while the loop itself was starved are dropped.
    pub fn spawn_interval<F, Fut>(&mut self, name: &str, period: Duration, task: F)
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut stop_rx = self.stop_tx.subscribe();
        let loop_name = name.to_string();

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        tokio::spawn(task());
                    }
                    _ = stop_rx.changed() => break,
                }
            }
            debug!("Stopped {} loop", loop_name);
        });

        info!("Scheduled {} every {:?}", name, period);
        self.loops.push((name.to_string(), handle));
    }

    /// Stop every loop; runs already in flight finish on their own
    pub fn cancel(&self) {
        self.stop_tx.send_replace(true);
    }

    pub async fn shutdown(self) {
        self.cancel();
        for (name, handle) in self.loops {
            if let Err(e) = handle.await {
                error!("{} loop ended abnormally: {}", name, e);
            }
        }
    }
}
