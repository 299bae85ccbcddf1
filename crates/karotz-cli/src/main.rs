//! Karotz CLI
//!
//! Opens an interactive session, runs one action and stops the session.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use karotz_client::{
    Color, Credentials, HttpTransport, Karotz, Language, DEFAULT_FADE_PERIOD_MS, DEFAULT_PULSE_DURATION_MS,
    DEFAULT_PULSE_PERIOD_MS, DEFAULT_SECTION,
};
use tracing_subscriber::EnvFilter;

/// Control a Karotz through its REST API.
#[derive(Parser, Debug)]
#[command(name = "karotz")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Settings file (default: ~/.karotz.yaml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Section of the settings file holding the application credentials
    #[arg(short, long, global = true, default_value = DEFAULT_SECTION)]
    pub section: String,

    /// Override the API base URL
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value = "30")]
    pub timeout: u64,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Action to perform
    #[command(subcommand)]
    pub command: Commands,
}

/// Available actions.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Open a session, print its id and granted access, then stop it
    Start,

    /// Drive the nose LED
    Led {
        /// LED action
        #[arg(value_enum)]
        action: LedCommand,

        /// Color as a palette name (red, blue, ...) or six hex digits
        #[arg(long, default_value = "red")]
        color: Color,

        /// Pulse or fade period in milliseconds
        #[arg(long)]
        period: Option<u32>,

        /// Total pulse duration in milliseconds
        #[arg(long, default_value_t = DEFAULT_PULSE_DURATION_MS)]
        pulse: u32,
    },

    /// Move the ears
    Ears {
        /// Left ear offset
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        left: i32,

        /// Right ear offset
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        right: i32,

        /// Treat offsets as absolute positions
        #[arg(long)]
        absolute: bool,
    },

    /// Put both ears back upright
    ResetEars,

    /// Speak a sentence
    Say {
        /// Text to speak
        text: String,

        /// Language tag (EN, DE, FR, ES)
        #[arg(long, short, default_value = "EN")]
        lang: Language,
    },

    /// Interrupt speech
    Mute,

    /// Cycle the LED through the palette
    Demo {
        /// Pause between colors in milliseconds
        #[arg(long, default_value = "1000")]
        delay_ms: u64,
    },
}

/// LED actions.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedCommand {
    /// Steady color
    Light,
    /// Blink
    Pulse,
    /// Fade to the color
    Fade,
    /// Switch off
    Off,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let credentials = match &cli.config {
        Some(path) => {
            tracing::info!("Using settings file: {:?}", path);
            Credentials::load(path, &cli.section)
        }
        None => Credentials::default_path().and_then(|path| Credentials::load(path, &cli.section)),
    }
    .context("failed to load credentials")?;

    let transport = HttpTransport::with_timeout(Duration::from_secs(cli.timeout))?;
    let mut karotz = Karotz::new(credentials, transport);
    if let Some(base_url) = &cli.base_url {
        karotz = karotz.with_base_url(base_url.as_str());
    }

    karotz.start().context("failed to start interactive session")?;
    let outcome = run(&mut karotz, &cli.command);
    let closed = karotz.close().context("failed to stop interactive session");

    outcome?;
    closed
}

fn run(karotz: &mut Karotz, command: &Commands) -> anyhow::Result<()> {
    match command {
        Commands::Start => {
            println!("interactive id: {}", karotz.interactive_id().unwrap_or("-"));
            println!("access: {}", karotz.access().join(", "));
        }
        Commands::Led { action, color, period, pulse } => {
            match action {
                LedCommand::Light => karotz.led_light(color)?,
                LedCommand::Pulse => {
                    karotz.led_pulse(color, period.unwrap_or(DEFAULT_PULSE_PERIOD_MS), *pulse)?
                }
                LedCommand::Fade => karotz.led_fade(color, period.unwrap_or(DEFAULT_FADE_PERIOD_MS))?,
                LedCommand::Off => karotz.led_off()?,
            };
        }
        Commands::Ears { left, right, absolute } => {
            karotz.ears(*left, *right, !absolute, false)?;
        }
        Commands::ResetEars => {
            karotz.reset_ears()?;
        }
        Commands::Say { text, lang } => {
            karotz.say(text, *lang)?;
        }
        Commands::Mute => {
            karotz.mute()?;
        }
        Commands::Demo { delay_ms } => {
            karotz.demo_led(Duration::from_millis(*delay_ms))?;
        }
    }
    Ok(())
}
