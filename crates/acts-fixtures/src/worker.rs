//! ---
//! acts_section: "04-reference-fixtures"
//! acts_subsection: "module"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Echo worker answering posted messages from its own task."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use acts_bridge::{
    BridgeError, ErrorEvent, Event, EventHandler, EventTarget, HandlerRegistry, ListenerId, Result,
};
use acts_common::FixtureConfig;
use parking_lot::Mutex;
use serde_json::Value as JsonValue;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

const KIND: &str = "worker";

/// Settings for an [`EchoWorker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerOptions {
    /// Script name reported in `error` events.
    pub script: String,
    /// Text appended to every string message.
    pub suffix: String,
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self {
            script: "workers/echo".to_owned(),
            suffix: " worker".to_owned(),
        }
    }
}

impl From<&FixtureConfig> for WorkerOptions {
    fn from(config: &FixtureConfig) -> Self {
        Self {
            suffix: config.worker_suffix.clone(),
            ..Self::default()
        }
    }
}

#[derive(Debug)]
enum Command {
    Post(JsonValue),
    Dispatch(Event),
}

/// Worker that replies to posted strings with a suffixed copy.
///
/// Commands are queued and handled in order on a dedicated tokio task, so
/// callbacks never run inside the call that triggered them.
pub struct EchoWorker {
    options: WorkerOptions,
    registry: Arc<HandlerRegistry>,
    commands: Mutex<Option<mpsc::UnboundedSender<Command>>>,
    terminated: AtomicBool,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl EchoWorker {
    /// Spawn the worker task on the current runtime.
    pub fn spawn(options: WorkerOptions) -> Arc<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let registry = Arc::new(HandlerRegistry::new());
        let task = tokio::spawn(run_worker(options.clone(), registry.clone(), rx));
        debug!(target: "acts::fixtures::worker", script = %options.script, "worker spawned");
        Arc::new(Self {
            options,
            registry,
            commands: Mutex::new(Some(tx)),
            terminated: AtomicBool::new(false),
            task: Mutex::new(Some(task)),
        })
    }

    /// Options the worker was spawned with.
    pub fn options(&self) -> &WorkerOptions {
        &self.options
    }

    /// Queue a message for the worker. The reply arrives as a `message` or
    /// `error` event.
    pub fn post_message(&self, payload: JsonValue) -> Result<()> {
        self.send(Command::Post(payload))
    }

    /// Wait for the worker task to finish. Returns immediately when it was
    /// already joined.
    pub async fn join(&self) {
        let handle = self.task.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    fn send(&self, command: Command) -> Result<()> {
        let guard = self.commands.lock();
        let tx = guard.as_ref().ok_or(BridgeError::TargetClosed(KIND))?;
        tx.send(command).map_err(|_| BridgeError::TargetClosed(KIND))
    }
}

impl EventTarget for EchoWorker {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn add_listener(&self, event: &str, handler: EventHandler) -> ListenerId {
        self.registry.add(event, handler)
    }

    fn add_listener_once(&self, event: &str, handler: EventHandler) -> ListenerId {
        self.registry.add_once(event, handler)
    }

    fn remove_listener(&self, event: &str, id: ListenerId) -> bool {
        self.registry.remove(event, id)
    }

    fn remove_all_listeners(&self, event: &str) -> usize {
        self.registry.remove_all(event)
    }

    fn dispatch(&self, event: Event) -> Result<()> {
        self.send(Command::Dispatch(event))
    }

    fn terminate(&self) -> Result<()> {
        if self.terminated.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        // Dropping the sender lets the task drain queued commands and exit.
        self.commands.lock().take();
        info!(target: "acts::fixtures::worker", script = %self.options.script, "worker terminating");
        Ok(())
    }

    fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for EchoWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EchoWorker")
            .field("options", &self.options)
            .field("terminated", &self.is_terminated())
            .finish_non_exhaustive()
    }
}

async fn run_worker(
    options: WorkerOptions,
    registry: Arc<HandlerRegistry>,
    mut commands: mpsc::UnboundedReceiver<Command>,
) {
    while let Some(command) = commands.recv().await {
        let event = match command {
            Command::Post(payload) => reply(&options, payload),
            Command::Dispatch(event) => event,
        };
        let delivered = registry.emit(&event);
        debug!(target: "acts::fixtures::worker", event = %event.name, delivered, "event delivered");
    }
    registry.emit(&Event::exit(0));
    info!(target: "acts::fixtures::worker", script = %options.script, "worker exited");
}

fn reply(options: &WorkerOptions, payload: JsonValue) -> Event {
    match payload {
        JsonValue::String(text) => {
            Event::message(JsonValue::String(format!("{text}{}", options.suffix)))
        }
        other => Event::error(
            ErrorEvent::new(format!(
                "unsupported message payload: expected string, got {}",
                json_kind(&other)
            ))
            .with_filename(options.script.clone()),
        ),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
