use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::clicker::BackendFactory;
use crate::error::ClickError;
use crate::queue::UiSender;
use crate::settings::Settings;

const CANCEL_POLL: Duration = Duration::from_millis(10);

/// Identifies one start..finish cycle so late events from an old worker can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(pub u64);

/// Cooperative stop signal shared between the controller and one worker.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Sleeps for `dur` unless cancelled first. Returns false if cancelled.
    pub fn wait(&self, dur: Duration) -> bool {
        let deadline = Instant::now().checked_add(dur);
        loop {
            if self.is_cancelled() {
                return false;
            }
            let remaining = match deadline {
                Some(d) => d.saturating_duration_since(Instant::now()),
                None => CANCEL_POLL,
            };
            if remaining.is_zero() {
                return true;
            }
            thread::sleep(remaining.min(CANCEL_POLL));
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StopReason {
    Cancelled,
    LimitReached,
    FailSafe,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent {
    Clicked { run: RunId, count: u64 },
    Finished { run: RunId, count: u64, reason: StopReason },
}

pub fn click_interval(cps: f64) -> Duration {
    Duration::try_from_secs_f64(1.0 / cps).unwrap_or(Duration::MAX)
}

pub fn start_click_worker<M>(
    run: RunId,
    settings: Settings,
    factory: BackendFactory,
    token: CancelToken,
    events: UiSender<M>,
) -> thread::JoinHandle<()>
where
    M: From<WorkerEvent> + Send + 'static,
{
    thread::spawn(move || {
        let (count, reason) = run_clicks(run, &settings, &factory, &token, &events);
        match &reason {
            StopReason::Failed(msg) => error!(?run, count, "Clicking failed: {}", msg),
            StopReason::FailSafe => warn!(?run, count, "Clicking stopped by fail-safe"),
            _ => info!(?run, count, ?reason, "Clicking finished"),
        }
        events.post(M::from(WorkerEvent::Finished { run, count, reason }));
    })
}

fn run_clicks<M: From<WorkerEvent>>(
    run: RunId,
    settings: &Settings,
    factory: &BackendFactory,
    token: &CancelToken,
    events: &UiSender<M>,
) -> (u64, StopReason) {
    let mut backend = match factory() {
        Ok(b) => b,
        Err(e) => return (0, StopReason::Failed(e.to_string())),
    };

    let interval = click_interval(settings.cps);
    info!(?run, ?interval, limit = ?settings.limit, "Clicking started");

    let mut count = 0;
    loop {
        if token.is_cancelled() {
            return (count, StopReason::Cancelled);
        }
        if !settings.limit.allows(count) {
            return (count, StopReason::LimitReached);
        }

        let tick = Instant::now();
        match backend.click(settings.button, settings.kind) {
            Ok(()) => {}
            Err(ClickError::FailSafe) => return (count, StopReason::FailSafe),
            Err(e) => return (count, StopReason::Failed(e.to_string())),
        }
        count += 1;
        debug!(?run, count, "click");
        events.post(M::from(WorkerEvent::Clicked { run, count }));

        if !token.wait(interval.saturating_sub(tick.elapsed())) {
            return (count, StopReason::Cancelled);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::clicker::{backend_factory, ClickBackend};
    use crate::queue::tests::quiet_queue;
    use crate::settings::{ClickKind, ClickLimit, MouseButton};
    use assert_matches::assert_matches;
    use std::sync::Mutex;

    /// Records every click; returns `fail_at`'s error on that 1-based click.
    #[derive(Clone, Default)]
    pub(crate) struct FakeClicker {
        pub clicks: Arc<Mutex<Vec<(Instant, MouseButton, ClickKind)>>>,
        pub fail_at: Option<(usize, ClickError)>,
    }

    impl FakeClicker {
        pub fn factory(&self) -> BackendFactory {
            let fake = self.clone();
            backend_factory(move || Ok(Box::new(fake.clone()) as Box<dyn ClickBackend>))
        }

        pub fn count(&self) -> usize {
            self.clicks.lock().unwrap().len()
        }
    }

    impl ClickBackend for FakeClicker {
        fn click(&mut self, button: MouseButton, kind: ClickKind) -> Result<(), ClickError> {
            let mut clicks = self.clicks.lock().unwrap();
            if let Some((n, err)) = &self.fail_at {
                if clicks.len() + 1 == *n {
                    return Err(err.clone());
                }
            }
            clicks.push((Instant::now(), button, kind));
            Ok(())
        }
    }

    fn settings(cps: f64, limit: ClickLimit) -> Settings {
        Settings { cps, limit, ..Settings::default() }
    }

    fn finished(events: &[WorkerEvent]) -> Option<&WorkerEvent> {
        events.iter().find(|e| matches!(e, WorkerEvent::Finished { .. }))
    }

    #[test]
    fn interval_is_reciprocal_of_rate() {
        assert_eq!(click_interval(2.0), Duration::from_millis(500));
        assert_eq!(click_interval(10.0), Duration::from_millis(100));
        assert_eq!(click_interval(1e-320), Duration::MAX);
    }

    #[test]
    fn token_wait_returns_early_on_cancel() {
        let token = CancelToken::new();
        let remote = token.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            remote.cancel();
        });
        let started = Instant::now();
        assert!(!token.wait(Duration::from_secs(5)));
        assert!(started.elapsed() < Duration::from_secs(1));
        handle.join().unwrap();
    }

    #[test]
    fn token_wait_completes_when_not_cancelled() {
        let token = CancelToken::new();
        let started = Instant::now();
        assert!(token.wait(Duration::from_millis(20)));
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn bounded_run_clicks_exactly_limit_times() {
        let fake = FakeClicker::default();
        let queue = quiet_queue::<WorkerEvent>();
        let started = Instant::now();
        start_click_worker(RunId(1), settings(2.0, ClickLimit::Bounded(5)), fake.factory(), CancelToken::new(), queue.sender())
            .join()
            .unwrap();
        let elapsed = started.elapsed();

        assert_eq!(fake.count(), 5);
        assert!(elapsed >= Duration::from_millis(2450), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(3200), "{elapsed:?}");

        let events = queue.drain();
        let counts: Vec<u64> = events
            .iter()
            .filter_map(|e| match e {
                WorkerEvent::Clicked { count, .. } => Some(*count),
                _ => None,
            })
            .collect();
        assert_eq!(counts, vec![1, 2, 3, 4, 5]);
        assert_eq!(
            finished(&events),
            Some(&WorkerEvent::Finished { run: RunId(1), count: 5, reason: StopReason::LimitReached })
        );
    }

    #[test]
    fn successive_clicks_are_one_interval_apart() {
        let fake = FakeClicker::default();
        let queue = quiet_queue::<WorkerEvent>();
        start_click_worker(RunId(1), settings(20.0, ClickLimit::Bounded(6)), fake.factory(), CancelToken::new(), queue.sender())
            .join()
            .unwrap();

        let clicks = fake.clicks.lock().unwrap();
        for pair in clicks.windows(2) {
            let gap = pair[1].0 - pair[0].0;
            assert!(gap >= Duration::from_millis(48), "{gap:?}");
            assert!(gap < Duration::from_millis(120), "{gap:?}");
        }
    }

    #[test]
    fn cancel_stops_infinite_run_within_one_interval() {
        let fake = FakeClicker::default();
        let queue = quiet_queue::<WorkerEvent>();
        let token = CancelToken::new();
        let handle =
            start_click_worker(RunId(7), settings(10.0, ClickLimit::Infinite), fake.factory(), token.clone(), queue.sender());

        thread::sleep(Duration::from_millis(350));
        token.cancel();
        let at_cancel = fake.count();
        thread::sleep(Duration::from_millis(100));
        let after = fake.count();
        handle.join().unwrap();

        assert!(at_cancel >= 2);
        assert!(after <= at_cancel + 1, "{at_cancel} -> {after}");
        assert_matches!(
            finished(&queue.drain()),
            Some(WorkerEvent::Finished { run: RunId(7), reason: StopReason::Cancelled, .. })
        );
    }

    #[test]
    fn failsafe_ends_run() {
        let fake = FakeClicker { fail_at: Some((3, ClickError::FailSafe)), ..FakeClicker::default() };
        let queue = quiet_queue::<WorkerEvent>();
        start_click_worker(RunId(2), settings(50.0, ClickLimit::Infinite), fake.factory(), CancelToken::new(), queue.sender())
            .join()
            .unwrap();

        assert_eq!(fake.count(), 2);
        assert_eq!(
            finished(&queue.drain()),
            Some(&WorkerEvent::Finished { run: RunId(2), count: 2, reason: StopReason::FailSafe })
        );
    }

    #[test]
    fn other_click_errors_carry_their_cause() {
        let fake = FakeClicker { fail_at: Some((1, ClickError::Input("denied".into()))), ..FakeClicker::default() };
        let queue = quiet_queue::<WorkerEvent>();
        start_click_worker(RunId(3), settings(50.0, ClickLimit::Infinite), fake.factory(), CancelToken::new(), queue.sender())
            .join()
            .unwrap();

        assert_eq!(fake.count(), 0);
        assert_matches!(
            finished(&queue.drain()),
            Some(WorkerEvent::Finished { reason: StopReason::Failed(msg), .. }) if msg.contains("denied")
        );
    }

    #[test]
    fn backend_creation_failure_is_reported() {
        let factory = backend_factory(|| Err(ClickError::Unavailable("no display".into())));
        let queue = quiet_queue::<WorkerEvent>();
        start_click_worker(RunId(4), settings(1.0, ClickLimit::Infinite), factory, CancelToken::new(), queue.sender())
            .join()
            .unwrap();

        assert_matches!(
            queue.drain().as_slice(),
            [WorkerEvent::Finished { count: 0, reason: StopReason::Failed(_), .. }]
        );
    }

    #[test]
    fn double_click_is_one_operation_per_interval() {
        let fake = FakeClicker::default();
        let queue = quiet_queue::<WorkerEvent>();
        let s = Settings { kind: ClickKind::Double, button: MouseButton::Middle, ..settings(50.0, ClickLimit::Bounded(3)) };
        start_click_worker(RunId(5), s, fake.factory(), CancelToken::new(), queue.sender()).join().unwrap();

        let clicks = fake.clicks.lock().unwrap();
        assert_eq!(clicks.len(), 3);
        assert!(clicks.iter().all(|(_, b, k)| *b == MouseButton::Middle && *k == ClickKind::Double));
    }
}
