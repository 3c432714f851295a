//! # Director Console
//!
//! A small stdin command loop standing in for the out-of-scope selector
//! UI. Every command funnels into the same state-manager entry points a
//! graphical frontend would use.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

use stagecast_node::StateManager;
use stagecast_scenario::available_scenarios;

const HELP: &str = "\
commands:
  list              show available scenarios
  start <id>        start a scenario from step 0
  next | n          advance one step
  prev | p          go back one step
  restart           jump back to step 0
  auto              toggle auto-advance
  exit              leave the scenario (fleet shows role defaults)
  status            show the replicated state
  quit | q          stop this node";

/// Run the console until the operator quits or stdin closes.
pub async fn run(manager: Arc<StateManager>, scenario_dir: PathBuf) -> std::io::Result<()> {
    println!("stagecast director console");
    println!("{HELP}");
    print_scenarios(&scenario_dir);

    let mut auto_task: Option<JoinHandle<()>> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (None, _) => {}
            (Some("list"), _) => print_scenarios(&scenario_dir),
            (Some("start"), Some(id)) => {
                stop_auto(&mut auto_task);
                manager.start_scenario(id).await;
                print_status(&manager);
            }
            (Some("start"), None) => println!("usage: start <id>"),
            (Some("next" | "n"), _) => {
                if manager.next_step().await {
                    print_status(&manager);
                } else {
                    println!("(already at the last step)");
                }
            }
            (Some("prev" | "p"), _) => {
                if manager.previous_step().await {
                    print_status(&manager);
                } else {
                    println!("(already at the first step)");
                }
            }
            (Some("restart"), _) => {
                manager.restart().await;
                print_status(&manager);
            }
            (Some("auto"), _) => toggle_auto(&manager, &mut auto_task),
            (Some("exit"), _) => {
                stop_auto(&mut auto_task);
                manager.exit_scenario().await;
                println!("scenario ended");
            }
            (Some("status"), _) => print_status(&manager),
            (Some("quit" | "q"), _) => break,
            (Some(other), _) => println!("unknown command '{other}'\n{HELP}"),
        }
    }

    stop_auto(&mut auto_task);
    Ok(())
}

fn toggle_auto(manager: &Arc<StateManager>, auto_task: &mut Option<JoinHandle<()>>) {
    if auto_task.as_ref().is_some_and(|task| !task.is_finished()) {
        stop_auto(auto_task);
        println!("auto-advance stopped");
        return;
    }
    if manager.current_state().is_idle() {
        println!("start a scenario first");
        return;
    }
    let manager = Arc::clone(manager);
    *auto_task = Some(tokio::spawn(async move {
        manager.run_auto_advance().await;
    }));
    println!("auto-advance running");
}

fn stop_auto(auto_task: &mut Option<JoinHandle<()>>) {
    if let Some(task) = auto_task.take() {
        task.abort();
    }
}

fn print_scenarios(scenario_dir: &Path) {
    let scenarios = available_scenarios(scenario_dir);
    if scenarios.is_empty() {
        println!("no scenarios found in {}", scenario_dir.display());
        return;
    }
    println!("scenarios:");
    for (name, id) in scenarios {
        println!("  {id}  ({name})");
    }
}

fn print_status(manager: &Arc<StateManager>) {
    let state = manager.current_state();
    if state.is_idle() {
        println!("idle");
    } else {
        println!("scenario '{}', step {}", state.scenario, state.step);
    }
}
