use std::rc::Rc;
use std::time::Instant;

use monopoly_sim::game::learner::Hyperparameters;
use monopoly_sim::game::storage::{JsonDirStorage, NoStorage, Storage};
use monopoly_sim::{Game, InitOptions, Phase};

/// The number of turns the scripted human plays before the demo stops.
const HUMAN_TURNS: usize = 30;

/// Where the AI players keep what they learn between runs.
const POLICY_DIR: &str = "policies";

fn init_logging() {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();

    let _ = simplelog::TermLogger::init(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
}

fn open_storage() -> Rc<dyn Storage> {
    match JsonDirStorage::open(POLICY_DIR) {
        Ok(storage) => Rc::new(storage),
        Err(e) => {
            log::warn!("playing without saved policies: {}", e);
            Rc::new(NoStorage)
        }
    }
}

/// Play one turn for the human seat: always buy when affordable, never build.
fn scripted_turn(game: &mut Game) {
    game.roll();
    game.resolve();

    if game.state().phase == Phase::AwaitAction {
        let state = game.state();
        let cost = state
            .current_tile()
            .property
            .as_ref()
            .map_or(i64::MAX, |prop| prop.cost);

        if state.current_player().cash >= cost {
            game.buy();
        } else {
            game.skip();
        }
    }

    game.end_turn();
}

fn main() {
    init_logging();

    let start = Instant::now();
    let options = InitOptions {
        players: 4,
        humans: 1,
        ..InitOptions::default()
    };
    let mut game = Game::new(options, open_storage(), Hyperparameters::default());

    for _ in 0..HUMAN_TURNS {
        if game.state().is_over() || game.state().current_player().bankrupt {
            break;
        }

        scripted_turn(&mut game);
    }

    let duration = start.elapsed();
    let state = game.state();

    for entry in &state.log {
        println!("{}", entry);
    }

    println!("\n{}", state);

    if let Some(winner) = state.winner() {
        println!("Winner: \x1b[32m{}\x1b[0m", winner.name);
    }

    println!("{} snapshots in history", game.depth() + 1);
    println!("Time elapsed: {:?}", duration);
}
