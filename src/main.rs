//! Tempestry - Entry Point
//!
//! Interactive demo loop around the environment engine: an in-memory
//! calendar, settings store, and scene set, with commands to advance time,
//! roll or override weather, and inspect the forecast, history, and the
//! lighting values pushed to scenes.

use tempestry::calendar::{CalendarProvider, SimpleCalendar};
use tempestry::core::config::EnvironmentConfig;
use tempestry::core::error::Result;
use tempestry::engine::EnvironmentEngine;
use tempestry::scene::{MemoryScenes, SceneFlags};
use tempestry::store::MemorySettings;
use tempestry::sync::{EnvironmentEvent, NoFx, PrimaryWriter, SceneSynchronizer};
use tempestry::weather::GenerateOptions;

use tempestry::core::types::SceneId;

use std::io::{self, Write};

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("tempestry=debug")
        .init();

    tracing::info!("Tempestry starting...");

    let mut cal = SimpleCalendar::standard();
    cal.set_time_of_day(8, 0);

    let mut engine = EnvironmentEngine::new(
        EnvironmentConfig::default(),
        Box::new(MemorySettings::new()),
        rand::random(),
    );
    if let Some(zone) = engine.create_zone_from_template("temperate", &cal) {
        engine.set_active_zone(Some(zone));
    }

    let mut scenes = MemoryScenes::new();
    scenes.add_scene(SceneId::new("overworld"), SceneFlags::default());
    scenes.activate(SceneId::new("overworld"));

    let mut sync = SceneSynchronizer::new();
    engine.generate_weather(&cal);
    sync.handle(
        &EnvironmentEvent::WeatherChanged,
        &engine,
        &cal,
        &mut scenes,
        &PrimaryWriter,
        &NoFx,
    );

    println!("\n=== TEMPESTRY ===");
    println!("Environmental simulation demo");
    println!();
    println!("Commands:");
    println!("  tick / t        - Advance time by one hour");
    println!("  run <n>         - Advance n hours");
    println!("  day             - Advance to next morning and reroll weather");
    println!("  set <preset>    - Force a weather preset (e.g. set rain)");
    println!("  forecast / f    - Show the upcoming forecast");
    println!("  history         - Show recorded weather days");
    println!("  presets         - List available weather presets");
    println!("  status / s      - Show detailed status");
    println!("  quit / q        - Exit");
    println!();

    loop {
        display_status(&engine, &cal, &scenes);

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input == "quit" || input == "q" {
            break;
        }

        if input == "tick" || input == "t" {
            advance_hours(1, &mut cal, &engine, &mut scenes, &mut sync);
            continue;
        }

        if let Some(n) = input.strip_prefix("run ") {
            match n.trim().parse::<u64>() {
                Ok(hours) => advance_hours(hours, &mut cal, &engine, &mut scenes, &mut sync),
                Err(_) => println!("Usage: run <hours>"),
            }
            continue;
        }

        if input == "day" {
            cal.advance_days(1);
            cal.set_time_of_day(8, 0);
            let state = engine.generate_weather(&cal);
            println!(
                "New day: {} ({})",
                state.label,
                engine.format_temperature(state.temperature)
            );
            sync.handle(
                &EnvironmentEvent::WeatherChanged,
                &engine,
                &cal,
                &mut scenes,
                &PrimaryWriter,
                &NoFx,
            );
            continue;
        }

        if let Some(id) = input.strip_prefix("set ") {
            match engine.set_weather(&cal, id.trim(), &GenerateOptions::default()) {
                Some(state) => {
                    println!(
                        "Weather set: {} ({})",
                        state.label,
                        engine.format_temperature(state.temperature)
                    );
                    sync.handle(
                        &EnvironmentEvent::WeatherChanged,
                        &engine,
                        &cal,
                        &mut scenes,
                        &PrimaryWriter,
                        &NoFx,
                    );
                }
                None => println!("Unknown preset: {}", id.trim()),
            }
            continue;
        }

        if input == "forecast" || input == "f" {
            let forecast = engine.weather_forecast(&cal, None);
            if forecast.is_empty() {
                println!("No forecast planned yet (advance a day first)");
            }
            for entry in forecast {
                println!(
                    "  {}-{:02}-{:02}  {:10}  {}",
                    entry.date.year,
                    entry.date.month,
                    entry.date.day,
                    entry.preset.label,
                    engine.format_temperature(entry.temperature)
                );
            }
            continue;
        }

        if input == "history" {
            for record in engine.weather_history(None) {
                println!(
                    "  {}-{:02}-{:02}  {:14}  {}{}",
                    record.date.year,
                    record.date.month,
                    record.date.day,
                    record.state.label,
                    engine.format_temperature(record.state.temperature),
                    if record.overridden { "  (overridden)" } else { "" }
                );
            }
            continue;
        }

        if input == "presets" {
            for preset in engine.weather_presets() {
                println!("  {:14}  {} {}", preset.id, preset.icon, preset.label);
            }
            continue;
        }

        if input == "status" || input == "s" {
            continue;
        }

        println!("Unknown command: {}", input);
    }

    println!("Goodbye!");
    Ok(())
}

fn advance_hours(
    hours: u64,
    cal: &mut SimpleCalendar,
    engine: &EnvironmentEngine,
    scenes: &mut MemoryScenes,
    sync: &mut SceneSynchronizer,
) {
    for _ in 0..hours {
        cal.advance_hours(1);
        sync.handle(
            &EnvironmentEvent::TimeAdvanced { hour_changed: true },
            engine,
            cal,
            scenes,
            &PrimaryWriter,
            &NoFx,
        );
    }
}

fn display_status(engine: &EnvironmentEngine, cal: &SimpleCalendar, scenes: &MemoryScenes) {
    let date = cal.current_date();
    let time = cal.current_time();
    let season = cal.season_name().unwrap_or_else(|| "?".to_string());

    print!(
        "[{}-{:02}-{:02} {:02}:{:02} {}] ",
        date.year, date.month, date.day, time.hour, time.minute, season
    );
    match engine.current_weather() {
        Some(state) => print!(
            "{} {} ({})",
            state.icon,
            state.label,
            engine.format_temperature(state.temperature)
        ),
        None => print!("no weather"),
    }
    if let Some(update) = scenes.last_update(&SceneId::new("overworld")) {
        print!("  darkness {:.2}", update.darkness);
    }
    println!();
}
