//! # Fleet Synchronization Tests
//!
//! Wires a director and several device nodes over the in-memory channel
//! and drives them the way an operator drives the deployed fleet:
//!
//! ```text
//! [Director] ──update_state──→ [State Channel]
//!                                    │
//!              ┌─────────────────────┼─────────────────────┐
//!              ↓                     ↓                     ↓
//!          [Client]              [Switch]             [Firewall]
//!              │                     │                     │
//!              └── resolve own role ─┴── render content ───┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use stagecast_node::{run_subscriber, DisplaySink, NodeConfig, SignalSink, SinkError, StateManager};
use stagecast_sync::InMemoryChannel;
use stagecast_types::{DisplayContent, Role, SignalCommand};

// =============================================================================
// TEST FIXTURES
// =============================================================================

/// Display sink that remembers everything it was asked to render.
#[derive(Default)]
pub struct RecordingDisplay {
    rendered: Mutex<Vec<DisplayContent>>,
}

impl RecordingDisplay {
    pub fn last(&self) -> Option<DisplayContent> {
        self.rendered.lock().last().cloned()
    }

    pub fn all(&self) -> Vec<DisplayContent> {
        self.rendered.lock().clone()
    }
}

impl DisplaySink for RecordingDisplay {
    fn render(&self, content: &DisplayContent) -> Result<(), SinkError> {
        self.rendered.lock().push(content.clone());
        Ok(())
    }
}

/// Signal sink that remembers every dispatched command.
#[derive(Default)]
pub struct RecordingSignal {
    notified: Mutex<Vec<SignalCommand>>,
}

impl RecordingSignal {
    pub fn all(&self) -> Vec<SignalCommand> {
        self.notified.lock().clone()
    }
}

impl SignalSink for RecordingSignal {
    fn notify(&self, signal: &SignalCommand) -> Result<(), SinkError> {
        self.notified.lock().push(*signal);
        Ok(())
    }
}

/// One node of the fleet with its recording collaborators.
pub struct FleetNode {
    pub manager: Arc<StateManager>,
    pub display: Arc<RecordingDisplay>,
    pub signals: Arc<RecordingSignal>,
}

/// A director plus devices, all subscribed to one channel.
pub struct Fleet {
    pub channel: InMemoryChannel,
    pub nodes: Vec<FleetNode>,
    _scenario_dir: tempfile::TempDir,
}

impl Fleet {
    /// Spin up one node per role; `roles[0]` is expected to be the
    /// director. Each subscription is opened before this returns, so no
    /// broadcast is missed even if a receive loop is scheduled late.
    pub fn spawn(roles: &[Role], scenario: &str) -> Self {
        let scenario_dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(scenario_dir.path().join("demo.txt"), scenario).expect("scenario file");

        let channel = InMemoryChannel::new();
        let mut nodes = Vec::new();
        for &role in roles {
            let display = Arc::new(RecordingDisplay::default());
            let signals = Arc::new(RecordingSignal::default());
            let manager = Arc::new(StateManager::new(
                role,
                NodeConfig {
                    scenario_dir: scenario_dir.path().to_path_buf(),
                    ..NodeConfig::default()
                },
                Arc::new(channel.clone()),
                Arc::clone(&display) as Arc<dyn DisplaySink>,
                Arc::clone(&signals) as Arc<dyn SignalSink>,
            ));
            let subscription = channel.subscribe();
            tokio::spawn(run_subscriber(Arc::clone(&manager), subscription));
            nodes.push(FleetNode {
                manager,
                display,
                signals,
            });
        }

        Self {
            channel,
            nodes,
            _scenario_dir: scenario_dir,
        }
    }

    pub fn node(&self, role: Role) -> &FleetNode {
        self.nodes
            .iter()
            .find(|node| node.manager.role() == role)
            .expect("role in fleet")
    }
}

/// Poll until the node's latest rendered content matches, or panic after
/// one second.
pub async fn wait_for_display(node: &FleetNode, expected: &DisplayContent) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
    loop {
        if node.display.last().as_ref() == Some(expected) {
            return;
        }
        if tokio::time::Instant::now() > deadline {
            panic!(
                "display never showed {:?}; last was {:?}",
                expected,
                node.display.last()
            );
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

fn image(path: &str) -> DisplayContent {
    DisplayContent::Image {
        path: path.to_string(),
    }
}

fn text(content: &str) -> DisplayContent {
    DisplayContent::Text {
        content: content.to_string(),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use stagecast_sync::StatePublisher;
    use stagecast_types::{StateMessage, StateSnapshot};

    const WALKTHROUGH: &str = "\
# Demo walkthrough
0;main;000_init.png;;;Welcome;
1;client;client/send.png;client>switch;3;Client sends the request;
2;switch;switch/forward.png;;;;
5;firewall;;;;Firewall inspects the packet;
";

    fn walkthrough_fleet() -> Fleet {
        Fleet::spawn(
            &[Role::Director, Role::Client, Role::Switch, Role::Firewall],
            WALKTHROUGH,
        )
    }

    #[tokio::test]
    async fn test_start_scenario_reaches_every_node() {
        let fleet = walkthrough_fleet();
        fleet.node(Role::Director).manager.start_scenario("demo").await;

        // The director resolved and rendered locally, without the round trip.
        assert_eq!(
            fleet.node(Role::Director).display.last(),
            Some(DisplayContent::ImageWithText {
                image: "images/000_init.png".to_string(),
                text: "Welcome".to_string()
            })
        );

        // Step 0 authors nothing for the devices, so each falls back to
        // its role default.
        wait_for_display(fleet.node(Role::Client), &image("images/devices/client.png")).await;
        wait_for_display(fleet.node(Role::Switch), &image("images/devices/switch.png")).await;
        wait_for_display(fleet.node(Role::Firewall), &image("images/devices/firewall.png")).await;

        for role in [Role::Client, Role::Switch, Role::Firewall] {
            let state = fleet.node(role).manager.current_state();
            assert_eq!(state.scenario, "demo");
            assert_eq!(state.step, 0);
        }
    }

    #[tokio::test]
    async fn test_caption_renders_once_across_the_fleet() {
        let fleet = walkthrough_fleet();
        let director = fleet.node(Role::Director);
        director.manager.start_scenario("demo").await;

        // Navigation index 1 -> authored step 1: only the client has an
        // entry, with both an image and a caption, and no director entry.
        director.manager.next_step().await;

        // The director synthesizes the caption...
        assert_eq!(
            director.display.last(),
            Some(text("Client sends the request"))
        );
        // ...so the client renders the image alone, caption suppressed.
        wait_for_display(fleet.node(Role::Client), &image("images/client/send.png")).await;
    }

    #[tokio::test]
    async fn test_desc_only_step_suppression() {
        let fleet = walkthrough_fleet();
        let director = fleet.node(Role::Director);
        director.manager.start_scenario("demo").await;
        for _ in 0..3 {
            director.manager.next_step().await;
        }

        // Navigation index 3 -> authored step 5: firewall caption only.
        assert_eq!(
            director.display.last(),
            Some(text("Firewall inspects the packet"))
        );
        wait_for_display(
            fleet.node(Role::Firewall),
            &image("images/devices/firewall.png"),
        )
        .await;
    }

    #[tokio::test]
    async fn test_signal_reaches_participants_only() {
        let fleet = walkthrough_fleet();
        let director = fleet.node(Role::Director);
        director.manager.start_scenario("demo").await;
        director.manager.next_step().await;

        wait_for_display(fleet.node(Role::Client), &image("images/client/send.png")).await;

        let client_signals = fleet.node(Role::Client).signals.all();
        assert_eq!(client_signals.len(), 1);
        assert_eq!(client_signals[0].source, Role::Client);
        assert_eq!(client_signals[0].target, Role::Switch);
        assert!(!client_signals[0].reverse);

        // The switch has no matching entry at this step, so no signal is
        // selected for it even though it is the command's target.
        assert!(fleet.node(Role::Switch).signals.all().is_empty());
    }

    #[tokio::test]
    async fn test_exit_resets_fleet_mid_scenario() {
        let fleet = walkthrough_fleet();
        let director = fleet.node(Role::Director);
        director.manager.start_scenario("demo").await;
        director.manager.next_step().await;
        director.manager.exit_scenario().await;

        for role in [Role::Client, Role::Switch, Role::Firewall] {
            let expected = DisplayContent::default_for(role);
            wait_for_display(fleet.node(role), &expected).await;
            let state = fleet.node(role).manager.current_state();
            assert!(state.is_idle());
            assert!(state.last_scenario.is_empty());
        }
    }

    #[tokio::test]
    async fn test_stale_snapshot_regresses_display() {
        // The channel is last-writer-wins with no sequencing guard; a
        // snapshot for an older step arriving late wins. This pins the
        // documented behavior rather than endorsing it.
        let fleet = Fleet::spawn(&[Role::Client], WALKTHROUGH);
        let client = fleet.node(Role::Client);

        client
            .manager
            .apply_remote(&StateMessage::for_snapshot(
                Role::Director,
                StateSnapshot::new("demo", 2),
            ));
        assert_eq!(client.manager.current_state().step, 2);

        client
            .manager
            .apply_remote(&StateMessage::for_snapshot(
                Role::Director,
                StateSnapshot::new("demo", 1),
            ));
        assert_eq!(client.manager.current_state().step, 1);
        assert_eq!(client.display.last(), Some(image("images/client/send.png")));
    }

    #[tokio::test]
    async fn test_node_ignores_messages_from_its_own_role() {
        let fleet = Fleet::spawn(&[Role::Client], WALKTHROUGH);
        let client = fleet.node(Role::Client);

        fleet
            .channel
            .publish(&StateMessage::for_snapshot(
                Role::Client,
                StateSnapshot::new("demo", 2),
            ))
            .await
            .expect("publish");

        // Give the receive loop a chance to (not) apply it.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(client.manager.current_state().is_idle());
        assert!(client.display.last().is_none());
    }
}
