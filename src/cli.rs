use clap::Parser;
use std::path::PathBuf;

// Build version with target info
const VERSION_INFO: &str = const_format::concatcp!(
    env!("CARGO_PKG_VERSION"), "\n",
    "Target: ", std::env::consts::ARCH, "-", std::env::consts::OS
);

/// Presentation deck rehearsal player
#[derive(Parser, Debug)]
#[command(author, version = VERSION_INFO, about, long_about = None)]
pub struct Args {
    /// Deck manifest to load (JSON array of slide titles) - optional
    #[arg(value_name = "DECK")]
    pub deck: Option<PathBuf>,

    /// Number of untitled slides when no deck manifest is given
    #[arg(short = 'n', long = "count", value_name = "N", default_value_t = 5)]
    pub count: usize,

    /// Start autoplay immediately
    #[arg(short = 'a', long = "autoplay")]
    pub autoplay: bool,

    /// Autoplay interval in milliseconds
    #[arg(short = 'i', long = "interval", value_name = "MS", default_value_t = 5000)]
    pub interval: u64,

    /// Transition style (fade, slide, cinematic, cut, flip, zoom)
    #[arg(short = 't', long = "transition", value_name = "STYLE")]
    pub transition: Option<String>,

    /// Loop back to the first slide instead of stopping on the last
    #[arg(long = "loop")]
    pub loop_playback: bool,

    /// Start in fullscreen mode
    #[arg(short = 'F', long = "fullscreen")]
    pub fullscreen: bool,

    /// Enable debug logging to file (default: deckplay.log)
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE")]
    pub log_file: Option<Option<PathBuf>>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Custom configuration directory (overrides default platform paths)
    #[arg(short = 'c', long = "config-dir", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}
