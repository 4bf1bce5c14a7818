mod simulation;

#[cfg(feature = "ui")]
mod ui;

use clap::Parser;
use log::info;

use simulation::{ControllerConfig, SignalController, SimWorld};

#[derive(Parser)]
#[command(name = "intersection_sim")]
#[command(about = "Adaptive traffic-signal intersection simulation with optional UI")]
struct Cli {
    /// Run with the Bevy game engine UI
    #[arg(long)]
    ui: bool,

    /// Number of simulation ticks to run in headless mode
    #[arg(long, default_value = "1200")]
    ticks: u32,

    /// Time delta per tick in seconds
    #[arg(long, default_value = "0.1")]
    delta: f32,

    /// RNG seed for reproducible vehicle spawning
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    let cli = Cli::parse();

    if cli.ui {
        #[cfg(feature = "ui")]
        {
            run_with_ui();
        }
        #[cfg(not(feature = "ui"))]
        {
            eprintln!("Error: UI feature is not enabled. Rebuild with --features ui");
            std::process::exit(1);
        }
    } else {
        run_headless(cli.ticks, cli.delta, cli.seed);
    }
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(ticks: u32, delta: f32, seed: Option<u64>) {
    env_logger::init();

    println!("Running intersection simulation in headless mode...");
    println!("Ticks: {}, Delta: {}s", ticks, delta);

    // Calculate how many ticks equal 1 second of simulation time
    let ticks_per_second = (1.0 / delta).ceil() as u32;

    let mut world = match seed {
        Some(seed) => {
            info!("using seed {seed}");
            SimWorld::new_with_seed(seed)
        }
        None => SimWorld::new(),
    };
    let mut controller = SignalController::new(ControllerConfig::default());

    println!("Initial state:");
    world.print_summary();
    println!();

    let mut tick = 0;
    while tick < ticks {
        // Run one second worth of ticks, then report.
        let ticks_to_run = ticks_per_second.min(ticks - tick);

        for _ in 0..ticks_to_run {
            tick += 1;
            world.tick(delta);
            controller.update(delta, &mut world);
        }

        // Print summary every 10 simulated seconds
        if tick % (ticks_per_second * 10) == 0 {
            println!(
                "--- After tick {} ({:.1}s simulated time) ---",
                tick,
                tick as f32 * delta
            );
            world.print_summary();
            world.draw_map();
        }
    }

    println!("=== Final State ===");
    world.print_summary();
    world.draw_map();
}

#[cfg(feature = "ui")]
fn run_with_ui() {
    use bevy::log::LogPlugin;
    use bevy::prelude::*;

    println!("Starting Intersection Sim UI...");
    println!();
    println!("Camera Controls:");
    println!("  W/A/S/D     - Move camera");
    println!("  Z/X         - Zoom in/out");
    println!("  ESC         - Exit");
    println!();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(LogPlugin {
                    filter: "warn,intersection_sim=debug".to_string(),
                    level: bevy::log::Level::DEBUG,
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Intersection Sim - Adaptive Signals".into(),
                        resolution: (1280, 720).into(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .add_plugins(ui::IntersectionSimUIPlugin)
        .run();
}
