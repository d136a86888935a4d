use deckplay::cli::Args;
use deckplay::config;
use deckplay::core::autoplay::{AutoPlayController, AutoPlayOptions};
use deckplay::core::dom::{selectors, Document, Element, MemoryDocument, MemoryElement};
use deckplay::core::engine::{EngineOptions, SlideEngine};
use deckplay::core::event_bus::{DeckBus, DeckEvent};
use deckplay::core::fullscreen::{FullscreenController, FullscreenSurface, HeadlessFullscreen};
use deckplay::core::input::KeyMap;
use deckplay::core::prefs::FilePrefs;
use deckplay::core::transition::TransitionStyle;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Tick resolution of the rehearsal loop.
const TICK: Duration = Duration::from_millis(25);

/// Speed options exposed on the control panel, in milliseconds.
const SPEED_OPTIONS: [u64; 3] = [2000, 5000, 8000];

fn main() -> Result<()> {
    let args = Args::parse();

    // Create path configuration from CLI args and environment
    let path_config = config::PathConfig::from_env_and_cli(args.config_dir.clone());
    if let Err(e) = config::ensure_dirs(&path_config) {
        eprintln!("Warning: failed to create application directories: {}", e);
    }

    init_logging(&args, &path_config)?;

    info!("Deckplay presentation rehearsal starting...");
    debug!("Command-line args: {:?}", args);
    info!(
        "Config path: {}",
        config::config_file("deckplay.json", &path_config).display()
    );

    let titles = load_titles(&args)?;
    let document = build_document(&titles);

    let bus = DeckBus::new();
    bus.subscribe(|event| match event {
        DeckEvent::SlideChanged { index, total } => {
            info!("slide {}/{}", index + 1, total);
        }
        DeckEvent::PlaybackChanged { playing } => {
            info!("autoplay {}", if *playing { "started" } else { "stopped" });
        }
        DeckEvent::TransitionChanged { style } => {
            info!("transition style: {}", style);
        }
        DeckEvent::FullscreenChanged { active } => {
            info!("fullscreen: {}", active);
        }
    });

    let prefs = Arc::new(FilePrefs::load(config::config_file("deckplay.json", &path_config)));
    let doc: Arc<dyn Document> = Arc::new(document.clone());

    let mut engine = SlideEngine::new(
        doc.clone(),
        prefs,
        bus.emitter(),
        EngineOptions::default(),
    );

    // An explicit --transition overrides the persisted preference
    if let Some(name) = &args.transition {
        if TransitionStyle::parse(name).is_some() {
            engine.set_transition(name);
        } else {
            warn!("unknown transition style {:?}, keeping {}", name, engine.style());
        }
    }

    let mut autoplay = AutoPlayController::new(
        doc.clone(),
        bus.emitter(),
        AutoPlayOptions {
            interval_ms: args.interval,
            stop_on_last: !args.loop_playback,
            ..AutoPlayOptions::default()
        },
    );

    let surface = HeadlessFullscreen::new();
    let mut fullscreen = FullscreenController::new(
        doc.clone(),
        bus.emitter(),
        vec![surface.clone() as Arc<dyn FullscreenSurface>],
    );
    if args.fullscreen {
        fullscreen.toggle();
    }

    if args.autoplay {
        run_autoplay(&mut engine, &mut autoplay);
    } else {
        run_walkthrough(&mut engine);
    }

    debug!("{} deck events emitted", bus.poll().len());
    if let Some(counter) = document.query(selectors::COUNTER) {
        info!("rehearsal finished at {}", counter.text());
    }
    Ok(())
}

/// Initialize env_logger from the verbosity flags, to file when --log is set.
fn init_logging(args: &Args, path_config: &config::PathConfig) -> Result<()> {
    // 0 (default) = warn, 1 (-v) = info, 2 (-vv) = debug, 3+ (-vvv) = trace
    let log_level = match args.verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    if let Some(log_path_opt) = &args.log_file {
        let log_path = log_path_opt
            .as_ref()
            .cloned()
            .unwrap_or_else(|| config::data_file("deckplay.log", path_config));
        let file = std::fs::File::create(&log_path)
            .with_context(|| format!("failed to create log file: {}", log_path.display()))?;

        env_logger::Builder::new()
            .filter_level(log_level)
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
        info!("Logging to file: {} (level: {:?})", log_path.display(), log_level);
    } else {
        let default_level = match args.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .format_timestamp_millis()
            .init();
    }
    Ok(())
}

/// Slide titles: from the deck manifest if given, otherwise generated.
fn load_titles(args: &Args) -> Result<Vec<String>> {
    if let Some(path) = &args.deck {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read deck manifest: {}", path.display()))?;
        let titles: Vec<String> = serde_json::from_str(&json)
            .with_context(|| format!("invalid deck manifest: {}", path.display()))?;
        Ok(titles)
    } else {
        Ok((1..=args.count).map(|i| format!("Slide {}", i)).collect())
    }
}

/// Assemble the in-memory document the controllers drive: slides plus the
/// optional navigation and control surfaces.
fn build_document(titles: &[String]) -> MemoryDocument {
    let doc = MemoryDocument::new();
    doc.add(selectors::VIEWPORT);

    for title in titles {
        doc.add(selectors::SLIDE).set_text(title);
        doc.add(selectors::NAV_DOT);
    }
    doc.add(selectors::COUNTER);
    doc.add(selectors::PROGRESS_BAR);
    doc.add(selectors::CONTROL_PANEL);
    doc.add(selectors::AUTOPLAY_TOGGLE);
    doc.add(selectors::FULLSCREEN_TOGGLE);

    for style in TransitionStyle::ALL {
        doc.insert(
            selectors::STYLE_BUTTON,
            MemoryElement::with_attrs(&[("data-style", style.as_str())]),
        );
    }
    for ms in SPEED_OPTIONS {
        doc.insert(
            selectors::SPEED_BUTTON,
            MemoryElement::with_attrs(&[("data-speed", &ms.to_string())]),
        );
    }
    doc
}

/// Let autoplay carry the deck. With --loop the run ends after one full
/// cycle (back on slide 0); otherwise it ends when autoplay stops on the
/// last slide.
fn run_autoplay(engine: &mut SlideEngine, autoplay: &mut AutoPlayController) {
    let mut now = Instant::now();
    autoplay.start(now);

    while autoplay.is_playing() {
        std::thread::sleep(TICK);
        now = Instant::now();
        autoplay.tick(engine, now);
        if engine.tick(now) == Some(0) {
            // Wrapped around; one cycle is enough for a rehearsal
            autoplay.stop();
        }
    }
}

/// Step through the deck the way a presenter would: one key press per slide.
fn run_walkthrough(engine: &mut SlideEngine) {
    let keys = KeyMap::new();
    let mut now = Instant::now();

    while engine.current() + 1 < engine.total() {
        if let Some(cmd) = keys.resolve("ArrowRight", false) {
            cmd.apply(engine, now);
        }
        // Wait out the transition before the next key press
        while engine.is_transitioning() {
            std::thread::sleep(TICK);
            now = Instant::now();
            engine.tick(now);
        }
    }
}
