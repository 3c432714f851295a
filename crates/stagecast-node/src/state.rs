//! # State Manager
//!
//! Owns the node's replicated state and definition cache behind one lock.
//! All mutation funnels through here: the director's foreground actions
//! and the background receive loop both end up in `apply_remote` /
//! `update_state`, so the two can interleave but never overlap.
//!
//! Snapshot application is wholesale last-writer-wins. The channel gives
//! no ordering guarantee between a locally-issued change and a
//! concurrently arriving broadcast, and no sequencing guard exists on the
//! wire: a stale snapshot delivered late will regress the display.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use stagecast_scenario::{resolve, ScenarioCache};
use stagecast_sync::StatePublisher;
use stagecast_types::{Command, DisplayContent, ReplicatedState, Role, SignalCommand, StateMessage, StateSnapshot};

use crate::config::NodeConfig;
use crate::ports::{DisplaySink, SignalSink};

/// Per-node state, guarded as one unit.
#[derive(Default)]
struct Inner {
    state: ReplicatedState,
    cache: ScenarioCache,
}

/// The node's single state-mutation entry point.
pub struct StateManager {
    role: Role,
    config: NodeConfig,
    publisher: Arc<dyn StatePublisher>,
    display: Arc<dyn DisplaySink>,
    signal: Arc<dyn SignalSink>,
    inner: Mutex<Inner>,
}

impl StateManager {
    pub fn new(
        role: Role,
        config: NodeConfig,
        publisher: Arc<dyn StatePublisher>,
        display: Arc<dyn DisplaySink>,
        signal: Arc<dyn SignalSink>,
    ) -> Self {
        Self {
            role,
            config,
            publisher,
            display,
            signal,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// The role this node runs as.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// A copy of the current replicated state.
    #[must_use]
    pub fn current_state(&self) -> ReplicatedState {
        self.inner.lock().state.clone()
    }

    /// Show the role-default display a device starts up with. The
    /// director has no display of its own until a scenario starts.
    pub fn show_initial_display(&self) {
        if !self.role.is_director() {
            self.render_role_default();
        }
    }

    /// Director entry point: broadcast a state change, then apply it
    /// locally and re-render without waiting for the round trip.
    ///
    /// A publish failure is logged and otherwise ignored; the local
    /// display stays correct and the fleet catches up on the next
    /// successful publish.
    pub async fn update_state(&self, scenario: &str, step: usize) {
        let snapshot = StateSnapshot::new(scenario, step);
        let message = StateMessage::for_snapshot(self.role, snapshot.clone());
        if let Err(err) = self.publisher.publish(&message).await {
            warn!(error = %err, "Could not broadcast state update, fleet may be stale");
        }

        let mut inner = self.inner.lock();
        inner.state.apply(&snapshot);
        self.handle_state_change(&mut inner);
    }

    /// Apply a snapshot received from the channel.
    ///
    /// Messages published by this node's own role are discarded; that
    /// guards against a misconfigured duplicate director echoing our own
    /// broadcasts back at us.
    pub fn apply_remote(&self, message: &StateMessage) {
        if message.source_role == self.role {
            debug!(source = %message.source_role, "Discarding own broadcast");
            return;
        }

        match message.command {
            Command::ShowRoleImage => {
                let mut inner = self.inner.lock();
                inner.state.reset();
                inner.cache.clear();
                drop(inner);
                // Resolver bypassed: an idle fleet shows role defaults.
                self.render_role_default();
            }
            Command::UpdateState => {
                let mut inner = self.inner.lock();
                inner.state.apply(&message.state);
                self.handle_state_change(&mut inner);
            }
        }
    }

    /// Start a scenario from its first step.
    pub async fn start_scenario(&self, id: &str) {
        self.update_state(id, 0).await;
    }

    /// Advance to the next step. Returns false when already at the last
    /// step (or idle), which also ends an auto-advance run.
    pub async fn next_step(&self) -> bool {
        let Some((scenario, step, maximum)) = self.navigation() else {
            return false;
        };
        if step + 1 >= maximum {
            return false;
        }
        self.update_state(&scenario, step + 1).await;
        true
    }

    /// Go back one step, clamped at the first.
    pub async fn previous_step(&self) -> bool {
        let Some((scenario, step, _)) = self.navigation() else {
            return false;
        };
        if step == 0 {
            return false;
        }
        self.update_state(&scenario, step - 1).await;
        true
    }

    /// Jump back to the first step of the active scenario.
    pub async fn restart(&self) {
        if let Some((scenario, _, _)) = self.navigation() {
            self.update_state(&scenario, 0).await;
        }
    }

    /// Leave the active scenario; the whole fleet falls back to role
    /// defaults.
    pub async fn exit_scenario(&self) {
        self.update_state("", 0).await;
    }

    /// Step forward on the configured interval until the last step.
    pub async fn run_auto_advance(&self) {
        while self.next_step().await {
            tokio::time::sleep(self.config.auto_advance).await;
        }
    }

    /// Current `(scenario, step, maximum_steps)` for an active scenario.
    fn navigation(&self) -> Option<(String, usize, usize)> {
        let mut inner = self.inner.lock();
        if inner.state.is_idle() {
            return None;
        }
        let scenario = inner.state.scenario.clone();
        let step = inner.state.step;
        let definition = inner.cache.definition(&self.config.scenario_dir, &scenario);
        Some((scenario, step, definition.maximum_steps()))
    }

    /// Re-resolve the display for the state just applied. Holding the
    /// lock across rendering is deliberate: a slow render back-pressures
    /// the receive loop instead of letting displays race each other.
    fn handle_state_change(&self, inner: &mut Inner) {
        if inner.state.is_idle() {
            inner.state.reset();
            inner.cache.clear();
            self.render_role_default();
            return;
        }

        let scenario = inner.state.scenario.clone();
        let definition = inner.cache.definition(&self.config.scenario_dir, &scenario);
        inner.state.last_scenario = scenario;

        let resolution = resolve(&definition, self.role, inner.state.step);
        self.render(&resolution.content);
        if let Some(signal) = resolution.signal {
            self.dispatch_signal(signal);
        }
    }

    fn render_role_default(&self) {
        let path = self.display.default_display(self.role);
        self.render(&DisplayContent::Image { path });
    }

    fn render(&self, content: &DisplayContent) {
        if let Err(err) = self.display.render(content) {
            warn!(error = %err, "Display collaborator failed");
        }
    }

    fn dispatch_signal(&self, signal: SignalCommand) {
        if let Err(err) = self.signal.notify(&signal) {
            warn!(error = %err, "Signaling collaborator failed");
        }
    }
}
