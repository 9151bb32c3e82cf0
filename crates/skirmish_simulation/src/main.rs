//! Headless симуляция SKIRMISH
//!
//! Прогоняет GameFlow без рендера: exploration → (победа) → fighting → меню.
//! Input: скрипт "подойти и бить под блоком".
//!
//! Usage: skirmish_simulation [tuning.ron]
//! Уровень логов: SKIRMISH_LOG=debug|info|warn|error

use skirmish_simulation::encounter::{
    FrameView, InputSnapshot, RenderError, ScriptedInput, SessionIo, Unpaced,
};
use skirmish_simulation::{
    init_logger, log_info, log_warning, set_log_level, Direction, FlowState, GameFlow, LogLevel,
    MenuChoice, Tuning,
};

/// Сколько тиков скрипт держит атаку до выхода в меню
const SCRIPT_TICKS: usize = 900;
/// Защита от бесконечного SwitchMode
const MAX_SESSIONS: u64 = 4;

fn main() {
    init_logger();
    if let Some(level) = std::env::var("SKIRMISH_LOG").ok().and_then(|v| LogLevel::parse(&v)) {
        set_log_level(level);
    }

    let tuning = load_tuning(std::env::args().nth(1));
    let seed = 42;
    println!("Starting SKIRMISH headless simulation (seed: {})", seed);

    let mut flow = GameFlow::new(tuning, seed);
    flow.select(MenuChoice::Continue);

    while let FlowState::Playing(mode) = flow.state() {
        if flow.sessions_played() >= MAX_SESSIONS {
            break;
        }

        let mut input = approach_and_strike(SCRIPT_TICKS);
        let mut sink = |view: &FrameView| -> Result<(), RenderError> {
            if view.tick % 100 == 0 {
                let enemy_hp = view.enemy.map(|enemy| enemy.health).unwrap_or(0);
                println!(
                    "Tick {}: player ({:.0}, {:.0}) hp {} | enemy hp {} | camera ({:.0}, {:.0})",
                    view.tick,
                    view.player.position.x,
                    view.player.position.y,
                    view.player.health,
                    enemy_hp,
                    view.camera_offset.x,
                    view.camera_offset.y,
                );
            }
            Ok(())
        };
        let mut pacer = Unpaced;

        let outcome = flow.play(&mut SessionIo::new(&mut input, &mut sink, &mut pacer));
        println!("{} finished: {:?} → {:?}", mode.title(), outcome, flow.state());
    }

    if flow.state() == FlowState::Menu {
        flow.select(MenuChoice::Exit);
    }

    println!(
        "Simulation complete! {} sessions, player hp {}",
        flow.sessions_played(),
        flow.player().combatant.health
    );
}

/// Tuning из RON файла; при ошибке: defaults с предупреждением
fn load_tuning(path: Option<String>) -> Tuning {
    let Some(path) = path else {
        return Tuning::default();
    };

    match Tuning::load(&path) {
        Ok(tuning) => {
            log_info(&format!("Loaded tuning from {}", path));
            tuning
        }
        Err(err) => {
            log_warning(&format!("{}; falling back to default tuning", err));
            Tuning::default()
        }
    }
}

/// Идём вверх-влево (к точке спавна врага) под блоком, зажав атаку; потом Esc
fn approach_and_strike(ticks: usize) -> ScriptedInput {
    let advance = InputSnapshot::moving(&[Direction::Up, Direction::Left])
        .with_attack()
        .with_block();

    ScriptedInput::default()
        .hold(advance, ticks)
        .then(InputSnapshot::escape())
}
