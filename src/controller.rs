//! Start/stop control for clicking runs.
//!
//! The controller lives on the UI thread. Workers and the hotkey listener only
//! talk to it through its queue, which the UI drains with [`Controller::poll`].

use tracing::{info, warn};

use crate::clicker::BackendFactory;
use crate::error::StartError;
use crate::hotkey::HotkeyCommand;
use crate::queue::{UiQueue, UiSender, Waker};
use crate::settings::Settings;
use crate::worker::{start_click_worker, CancelToken, RunId, StopReason, WorkerEvent};

#[derive(Debug, Clone, PartialEq)]
pub enum ControlMessage {
    Worker(WorkerEvent),
    Hotkey(HotkeyCommand),
}

impl From<WorkerEvent> for ControlMessage {
    fn from(ev: WorkerEvent) -> Self {
        ControlMessage::Worker(ev)
    }
}

impl From<HotkeyCommand> for ControlMessage {
    fn from(cmd: HotkeyCommand) -> Self {
        ControlMessage::Hotkey(cmd)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ready,
    Clicking,
    Stopped,
    Completed,
    FailSafe,
    Failed,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Ready => "Ready",
            Status::Clicking => "Clicking...",
            Status::Stopped => "Stopped",
            Status::Completed => "Completed",
            Status::FailSafe => "Stopped (fail-safe)",
            Status::Failed => "Stopped (error)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message the window shows in a blocking dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: &str, message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, title: title.to_string(), message: message.into() }
    }

    pub fn error(title: &str, message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, title: title.to_string(), message: message.into() }
    }

    pub fn missing_backend() -> Self {
        Notice::error(
            "Missing Dependency",
            "Input simulation is not available, so clicks cannot be sent.\n\n\
             On Linux make sure an X11 or Wayland session with input access is running.",
        )
    }
}

impl From<&StartError> for Notice {
    fn from(err: &StartError) -> Self {
        match err {
            StartError::BackendUnavailable => Notice::missing_backend(),
            other => Notice::error("Error", other.to_string()),
        }
    }
}

#[derive(Debug)]
enum RunState {
    Idle,
    Running { run: RunId, token: CancelToken },
}

pub struct Controller {
    settings: Settings,
    state: RunState,
    clicks: u64,
    status: Status,
    last_run: u64,
    factory: Option<BackendFactory>,
    queue: UiQueue<ControlMessage>,
}

impl Controller {
    pub fn new(settings: Settings, factory: Option<BackendFactory>, waker: Waker) -> Self {
        Self {
            settings,
            state: RunState::Idle,
            clicks: 0,
            status: Status::Ready,
            last_run: 0,
            factory,
            queue: UiQueue::with_waker(waker),
        }
    }

    /// Handle for background threads that need to reach the controller.
    pub fn sender(&self) -> UiSender<ControlMessage> {
        self.queue.sender()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Settings can only change while idle.
    pub fn settings_mut(&mut self) -> Option<&mut Settings> {
        match self.state {
            RunState::Idle => Some(&mut self.settings),
            RunState::Running { .. } => None,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, RunState::Running { .. })
    }

    pub fn clicks(&self) -> u64 {
        self.clicks
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn has_backend(&self) -> bool {
        self.factory.is_some()
    }

    pub fn start(&mut self) -> Result<(), StartError> {
        self.settings.validate()?;
        let factory = self.factory.clone().ok_or(StartError::BackendUnavailable)?;
        if self.is_running() {
            return Err(StartError::AlreadyRunning);
        }

        self.last_run += 1;
        let run = RunId(self.last_run);
        let token = CancelToken::new();
        self.clicks = 0;
        self.status = Status::Clicking;
        self.state = RunState::Running { run, token: token.clone() };

        info!(?run, cps = self.settings.cps, button = ?self.settings.button, kind = ?self.settings.kind, "Starting clicks");
        start_click_worker(run, self.settings.clone(), factory, token, self.queue.sender());
        Ok(())
    }

    pub fn stop(&mut self) {
        if let RunState::Running { run, token } = std::mem::replace(&mut self.state, RunState::Idle) {
            info!(?run, clicks = self.clicks, "Stopping clicks");
            token.cancel();
            self.status = Status::Stopped;
        }
    }

    pub fn toggle(&mut self) -> Result<(), StartError> {
        if self.is_running() {
            self.stop();
            Ok(())
        } else {
            self.start()
        }
    }

    /// Applies everything queued by background threads. Call from the UI thread.
    pub fn poll(&mut self) -> Vec<Notice> {
        let mut notices = Vec::new();
        for msg in self.queue.drain() {
            match msg {
                ControlMessage::Worker(ev) => notices.extend(self.apply_worker_event(ev)),
                ControlMessage::Hotkey(HotkeyCommand::Toggle) => {
                    if let Err(e) = self.toggle() {
                        warn!("Hotkey start rejected: {}", e);
                        notices.push(Notice::from(&e));
                    }
                }
                ControlMessage::Hotkey(HotkeyCommand::Stop) => self.stop(),
            }
        }
        notices
    }

    fn current_run(&self) -> Option<RunId> {
        match &self.state {
            RunState::Running { run, .. } => Some(*run),
            RunState::Idle => None,
        }
    }

    fn apply_worker_event(&mut self, ev: WorkerEvent) -> Option<Notice> {
        match ev {
            WorkerEvent::Clicked { run, count } if Some(run) == self.current_run() => {
                self.clicks = count;
                None
            }
            WorkerEvent::Finished { run, count, reason } if Some(run) == self.current_run() => {
                self.clicks = count;
                self.state = RunState::Idle;
                match reason {
                    StopReason::Cancelled => {
                        self.status = Status::Stopped;
                        None
                    }
                    StopReason::LimitReached => {
                        self.status = Status::Completed;
                        None
                    }
                    StopReason::FailSafe => {
                        self.status = Status::FailSafe;
                        Some(Notice::info(
                            "Fail-safe Triggered",
                            "Auto-clicking stopped because the mouse moved to a screen corner (fail-safe).",
                        ))
                    }
                    StopReason::Failed(msg) => {
                        self.status = Status::Failed;
                        Some(Notice::error("Error", format!("An error occurred during clicking: {msg}")))
                    }
                }
            }
            // Late events from a run that was already stopped.
            _ => None,
        }
    }
}
