use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Collapses bursts of triggers into a single message, delivered once
/// `delay` has passed without another trigger.
#[derive(Debug)]
pub struct Debouncer {
    tx: mpsc::UnboundedSender<()>,
    task: JoinHandle<()>,
}

impl Debouncer {
    pub fn spawn<T, F>(delay: Duration, out: mpsc::UnboundedSender<T>, make: F) -> Self
    where
        T: Send + 'static,
        F: Fn() -> T + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();
        let task = tokio::spawn(async move {
            while rx.recv().await.is_some() {
                loop {
                    tokio::select! {
                        next = rx.recv() => {
                            if next.is_none() {
                                return;
                            }
                        }
                        _ = tokio::time::sleep(delay) => break,
                    }
                }
                if out.send(make()).is_err() {
                    return;
                }
            }
        });
        Self { tx, task }
    }

    pub fn trigger(&self) {
        // The task only stops when the receiving side is gone.
        let _ = self.tx.send(());
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, timeout, Instant};

    const QUIET: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn burst_fires_once_after_quiet_period() {
        let (out, mut rx) = mpsc::unbounded_channel();
        let d = Debouncer::spawn(QUIET, out, || "load");
        let start = Instant::now();

        d.trigger();
        sleep(Duration::from_millis(100)).await;
        d.trigger();
        sleep(Duration::from_millis(100)).await;
        d.trigger();

        assert_eq!(rx.recv().await, Some("load"));
        assert!(start.elapsed() >= Duration::from_millis(500));
        assert!(timeout(Duration::from_secs(2), rx.recv()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn separated_triggers_fire_separately() {
        let (out, mut rx) = mpsc::unbounded_channel();
        let d = Debouncer::spawn(QUIET, out, || 7u8);

        d.trigger();
        assert_eq!(rx.recv().await, Some(7));
        d.trigger();
        assert_eq!(rx.recv().await, Some(7));
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_fires_without_trigger() {
        let (out, mut rx) = mpsc::unbounded_channel::<()>();
        let _d = Debouncer::spawn(QUIET, out, || ());
        assert!(timeout(Duration::from_secs(5), rx.recv()).await.is_err());
    }
}
