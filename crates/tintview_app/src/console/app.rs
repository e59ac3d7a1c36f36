use std::collections::VecDeque;
use std::sync::mpsc::{self, TryRecvError};
use std::time::Duration;

use log::LevelFilter;
use tintview_core::{AppState, Msg, Phase, Store};
use tintview_engine::EngineConfig;
use tintview_logging::{set_request_generation, tint_info};

use super::announcer::ConsoleAnnouncer;
use super::effects::EffectRunner;
use super::input::{spawn_stdin_reader, Command};
use super::logging;
use super::render;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn run_app() -> anyhow::Result<()> {
    logging::initialize(LevelFilter::Debug);
    tint_info!("tintview starting");

    println!("Enter (or r) for another image, d/l for dark/light theme, q to quit.");

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    spawn_stdin_reader(cmd_tx);

    let mut runner = EffectRunner::new(EngineConfig::default(), Box::new(ConsoleAnnouncer));
    let mut store = Store::new(AppState::new());
    store.subscribe(Box::new(render::render));

    let mut inbox = VecDeque::from([Msg::FetchRequested]);
    let mut input_closed = false;

    loop {
        while let Some(msg) = inbox.pop_front() {
            let effects = store.dispatch(msg);
            set_request_generation(store.state().latest_request());
            runner.run(effects);
        }

        if !input_closed {
            loop {
                match cmd_rx.try_recv() {
                    Ok(Command::Dispatch(msg)) => inbox.push_back(msg),
                    Ok(Command::Quit) => {
                        tint_info!("quit requested");
                        return Ok(());
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        input_closed = true;
                        break;
                    }
                }
            }
        }

        // Without input there is nothing left to wait for once the engine is idle.
        if input_closed
            && inbox.is_empty()
            && runner.in_flight() == 0
            && store.view().phase != Phase::Loading
        {
            tint_info!("input closed and engine idle; exiting");
            return Ok(());
        }

        if let Some(msg) = runner.poll(POLL_INTERVAL) {
            inbox.push_back(msg);
        }
    }
}
