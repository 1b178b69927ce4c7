mod app;
mod cli;
mod config;
mod datasources;
mod error;
mod files;
mod logic;
mod models;
mod ui;

use app::{App, Screen, ZoneField};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use datasources::{NdviRequest, SentinelHubClient};
use error::Result;
use logic::Session;
use models::CropRules;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use ui::screens::{EvaluationScreen, MapScreen, ZonesScreen};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Some(Commands::Init) = cli.command {
        Config::setup_interactive()?;
        return Ok(());
    }

    // Load configuration
    let config = match Config::load(cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!("Run `agrorisk init` or copy config/config.yaml.example to config/config.yaml");
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Init) => Ok(()),
        Some(Commands::Check) => run_check(&config),
        Some(Commands::Evaluate {
            zones,
            crops,
            xlsx,
            geojson,
        }) => run_evaluate(&config, &zones, &crops, xlsx, geojson),
        Some(Commands::FetchNdvi {
            bbox,
            size,
            time,
            output,
        }) => run_fetch_ndvi(&config, bbox, size, time, output).await,
        None => run_dashboard(config),
    }
}

fn run_check(config: &Config) -> Result<()> {
    println!("Config OK");

    let content = std::fs::read_to_string(&config.crops_file)?;
    let rules = CropRules::from_json_str(&content)?;
    println!(
        "Crop rules: {} loaded from {}",
        rules.len(),
        config.crops_file.display()
    );
    for name in rules.names() {
        println!("  - {}", name);
    }

    for crop in &config.default_crops {
        if !rules.contains(crop) {
            println!("  warning: default crop '{}' has no rule", crop);
        }
    }

    match config.sentinel_or_env() {
        Ok(s) => {
            let request = NdviRequest::from_config(&s)?;
            println!(
                "Sentinel Hub: configured (bbox {}, {})",
                request.bbox, request.time
            );
        }
        Err(e) => println!("Sentinel Hub: not configured ({})", e),
    }

    Ok(())
}

fn run_evaluate(
    config: &Config,
    zones: &Path,
    crops: &[String],
    xlsx: Option<PathBuf>,
    geojson: Option<PathBuf>,
) -> Result<()> {
    let rules = CropRules::load(&config.crops_file);
    let selected = if crops.is_empty() {
        config.default_crops.as_slice()
    } else {
        crops
    };

    let mut session = Session::new(rules, selected);
    let imported = session.import_zones_from_path(zones)?;
    tracing::info!("Imported {} zones from {:?}", imported, zones);

    let results = session.evaluate()?;
    for r in results {
        println!(
            "{:<20} {:<10} ndvi={:.2} rain={:.1}mm temp={:.1}C {:<5} {}",
            r.zone_name,
            r.crop_name,
            r.readings.ndvi,
            r.readings.rainfall_mm,
            r.readings.temperature_c,
            r.tier,
            r.reasons_text()
        );
    }

    if let Some(path) = xlsx {
        session.export_results_to_workbook(&path)?;
        println!("Saved {}", path.display());
    }
    if let Some(path) = geojson {
        session.export_results_to_geojson(&path)?;
        println!("Saved {}", path.display());
    }

    Ok(())
}

async fn run_fetch_ndvi(
    config: &Config,
    bbox: Option<String>,
    size: Option<u32>,
    time: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut sentinel = config.sentinel_or_env()?;
    if let Some(bbox) = bbox {
        sentinel.bbox = bbox;
    }
    if let Some(size) = size {
        sentinel.size_px = size;
    }
    if let Some(time) = time {
        sentinel.time_range = time;
    }
    if let Some(output) = output {
        sentinel.output = output;
    }

    let request = NdviRequest::from_config(&sentinel)?;
    let path = sentinel.output.clone();
    let client = SentinelHubClient::new(sentinel);

    let bytes = client.download(&request, &path).await?;
    println!("Saved {} ({} bytes)", path.display(), bytes);
    Ok(())
}

fn run_dashboard(config: Config) -> Result<()> {
    let rules = CropRules::load(&config.crops_file);
    if rules.is_empty() {
        tracing::warn!("No crop rules loaded from {:?}", config.crops_file);
    }
    let session = Session::new(rules, &config.default_crops);
    let mut app = App::new(config, session);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);
    app.session.clear();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| {
            let area = f.area();
            let status = app.status_message.as_ref();

            match app.screen {
                Screen::Zones => {
                    let screen =
                        ZonesScreen::new(&app.session, &app.zones_state).with_status(status);
                    f.render_widget(screen, area);
                }
                Screen::Evaluation => {
                    let screen = EvaluationScreen::new(app.session.results())
                        .with_selection(app.evaluation_state.selected_index)
                        .with_status(status);
                    f.render_widget(screen, area);
                }
                Screen::Map => {
                    let screen = MapScreen::new(&app.markers, &app.config.map)
                        .with_selection(app.map_state.selected_index)
                        .with_status(status);
                    f.render_widget(screen, area);
                }
            }
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                let editing = app.zones_state.editing;
                match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        app.quit();
                    }
                    KeyCode::Char('q') if !editing => {
                        app.quit();
                    }
                    KeyCode::Char(c) if !editing => {
                        if let Some(screen) = Screen::from_key(c) {
                            app.switch_screen(screen);
                        } else {
                            handle_screen_input(app, key.code);
                        }
                    }
                    _ => {
                        handle_screen_input(app, key.code);
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_screen_input(app: &mut App, code: KeyCode) {
    match app.screen {
        Screen::Zones => handle_zones_input(app, code),
        Screen::Evaluation => handle_evaluation_input(app, code),
        Screen::Map => handle_map_input(app, code),
    }
}

fn handle_zones_input(app: &mut App, code: KeyCode) {
    let state = &mut app.zones_state;

    if state.editing {
        match code {
            KeyCode::Esc => state.cancel_editing(),
            KeyCode::Enter => state.finish_editing(),
            KeyCode::Backspace => {
                state.edit_buffer.pop();
            }
            KeyCode::Char(c) => state.edit_buffer.push(c),
            _ => {}
        }
        return;
    }

    let crop_count = app.session.rules().len();
    let field = state.focused_field;
    match code {
        KeyCode::Up | KeyCode::BackTab => state.prev_field(),
        KeyCode::Down | KeyCode::Tab => state.next_field(),
        KeyCode::Left if field == ZoneField::CropFilter => {
            state.filter_cursor = state.filter_cursor.saturating_sub(1);
        }
        KeyCode::Right if field == ZoneField::CropFilter => {
            if state.filter_cursor + 1 < crop_count {
                state.filter_cursor += 1;
            }
        }
        KeyCode::Left if field == ZoneField::Crop => state.cycle_crop(false, crop_count),
        KeyCode::Right if field == ZoneField::Crop => state.cycle_crop(true, crop_count),
        KeyCode::Char(' ') | KeyCode::Enter if field == ZoneField::CropFilter => {
            app.toggle_filter_crop();
        }
        KeyCode::Enter => state.start_editing(),
        KeyCode::Char('i') => app.import_file(),
        KeyCode::Char('a') => app.add_manual_zone(),
        KeyCode::Char('s') => app.export_zones(),
        KeyCode::Esc => app.clear_status(),
        _ => {}
    }
}

fn handle_evaluation_input(app: &mut App, code: KeyCode) {
    let count = app.session.results().len();
    match code {
        KeyCode::Up => app.evaluation_state.prev(),
        KeyCode::Down => app.evaluation_state.next(count),
        KeyCode::Char('r') => app.run_evaluation(),
        KeyCode::Char('x') => app.export_workbook(),
        KeyCode::Esc => app.switch_screen(Screen::Zones),
        _ => {}
    }
}

fn handle_map_input(app: &mut App, code: KeyCode) {
    let count = app.markers.len();
    match code {
        KeyCode::Up => app.map_state.prev(),
        KeyCode::Down => app.map_state.next(count),
        KeyCode::Char('g') => app.export_geojson(),
        KeyCode::Esc => app.switch_screen(Screen::Zones),
        _ => {}
    }
}
