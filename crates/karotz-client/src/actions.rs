//! Device actions: ears, nose LED and speech.
//!
//! Each action only maps its arguments onto request parameters and goes
//! through [`Karotz::call`].

use crate::session::Karotz;
use crate::transport::Transport;
use crate::{ClientError, Result};
use karotz_protocol::{Function, Params, VooMessage};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::thread;
use std::time::Duration;

/// Default LED pulse period in milliseconds.
pub const DEFAULT_PULSE_PERIOD_MS: u32 = 500;
/// Default LED pulse duration in milliseconds.
pub const DEFAULT_PULSE_DURATION_MS: u32 = 3000;
/// Default LED fade period in milliseconds.
pub const DEFAULT_FADE_PERIOD_MS: u32 = 3000;

// ============================================================================
// Vocabulary
// ============================================================================

/// An RGB color, six upper-case hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Color(Cow<'static, str>);

impl Color {
    /// LED off.
    pub const OFF: Color = Color(Cow::Borrowed("000000"));
    /// Blue.
    pub const BLUE: Color = Color(Cow::Borrowed("0000FF"));
    /// Cyan.
    pub const CYAN: Color = Color(Cow::Borrowed("00FF9F"));
    /// Green.
    pub const GREEN: Color = Color(Cow::Borrowed("00FF00"));
    /// Orange.
    pub const ORANGE: Color = Color(Cow::Borrowed("FFA500"));
    /// Pink.
    pub const PINK: Color = Color(Cow::Borrowed("FFCFAF"));
    /// Purple.
    pub const PURPLE: Color = Color(Cow::Borrowed("9F00FF"));
    /// Red, the default.
    pub const RED: Color = Color(Cow::Borrowed("FF0000"));
    /// Yellow, as the device renders it.
    pub const YELLOW: Color = Color(Cow::Borrowed("75FF00"));
    /// White, as the device renders it.
    pub const WHITE: Color = Color(Cow::Borrowed("4FFF68"));

    /// The named colors, in demo order.
    pub const PALETTE: [Color; 10] = [
        Color::OFF,
        Color::BLUE,
        Color::CYAN,
        Color::GREEN,
        Color::ORANGE,
        Color::PINK,
        Color::PURPLE,
        Color::RED,
        Color::YELLOW,
        Color::WHITE,
    ];

    /// Parse a color from six hex digits, with or without a leading `#`.
    pub fn new(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ClientError::InvalidColor(hex.to_string()));
        }
        Ok(Color(Cow::Owned(digits.to_ascii_uppercase())))
    }

    /// Build a color from its components.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color(Cow::Owned(format!("{:02X}{:02X}{:02X}", r, g, b)))
    }

    /// Look up a palette color by name (`red`, `Blue`, ...).
    pub fn named(name: &str) -> Option<Color> {
        let color = match name.to_ascii_lowercase().as_str() {
            "off" => Color::OFF,
            "blue" => Color::BLUE,
            "cyan" => Color::CYAN,
            "green" => Color::GREEN,
            "orange" => Color::ORANGE,
            "pink" => Color::PINK,
            "purple" => Color::PURPLE,
            "red" => Color::RED,
            "yellow" => Color::YELLOW,
            "white" => Color::WHITE,
            _ => return None,
        };
        Some(color)
    }

    /// The six hex digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::RED
    }
}

/// Accepts palette names as well as hex digits.
impl FromStr for Color {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match Color::named(s.trim()) {
            Some(color) => Ok(color),
            None => Color::new(s),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Speech language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    German,
    French,
    Spanish,
}

impl Language {
    /// Language tag sent as `lang`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "EN",
            Language::German => "DE",
            Language::French => "FR",
            Language::Spanish => "ES",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "EN" => Ok(Language::English),
            "DE" => Ok(Language::German),
            "FR" => Ok(Language::French),
            "ES" => Ok(Language::Spanish),
            _ => Err(format!("unsupported language '{}' (expected EN, DE, FR or ES)", s)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `tts` actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtsAction {
    /// Speak a text.
    Speak,
    /// Interrupt speech in progress.
    Stop,
}

impl TtsAction {
    /// Value sent as `action`.
    pub fn as_str(&self) -> &'static str {
        match self {
            TtsAction::Speak => "speak",
            TtsAction::Stop => "stop",
        }
    }
}

/// `led` actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedAction {
    /// Steady color.
    Light,
    /// Blink for a given duration.
    Pulse,
    /// Fade from the current color.
    Fade,
}

impl LedAction {
    /// Value sent as `action`.
    pub fn as_str(&self) -> &'static str {
        match self {
            LedAction::Light => "light",
            LedAction::Pulse => "pulse",
            LedAction::Fade => "fade",
        }
    }
}

// ============================================================================
// Actions
// ============================================================================

impl<T: Transport> Karotz<T> {
    /// Move the ears. Positions are relative to the current one unless
    /// `relative` is false; `reset` puts both ears back upright.
    pub fn ears(&mut self, left: i32, right: i32, relative: bool, reset: bool) -> Result<VooMessage> {
        let params = Params::new()
            .with("left", left)
            .with("right", right)
            .with("relative", relative)
            .with("reset", reset);
        self.call(Function::Ears, params)
    }

    /// Put both ears back to their rest position.
    pub fn reset_ears(&mut self) -> Result<VooMessage> {
        self.ears(0, 0, true, true)
    }

    /// Droop both ears.
    pub fn sad(&mut self) -> Result<VooMessage> {
        self.ears(5, 5, false, false)
    }

    /// Perk both ears up.
    pub fn happy(&mut self) -> Result<VooMessage> {
        self.ears(-2, -2, false, false)
    }

    /// Spin the ears a full turn, clockwise.
    pub fn spin_clockwise(&mut self) -> Result<VooMessage> {
        self.ears(-17, 17, true, false)
    }

    /// Spin the ears a full turn, anticlockwise.
    pub fn spin_anticlockwise(&mut self) -> Result<VooMessage> {
        self.ears(17, -17, true, false)
    }

    /// Light the LED in a steady color.
    pub fn led_light(&mut self, color: &Color) -> Result<VooMessage> {
        let params = Params::new()
            .with("action", LedAction::Light.as_str())
            .with("color", color);
        self.call(Function::Led, params)
    }

    /// Switch the LED off.
    pub fn led_off(&mut self) -> Result<VooMessage> {
        self.led_light(&Color::OFF)
    }

    /// Pulse the LED: `period` is one blink, `pulse` the total duration (ms).
    pub fn led_pulse(&mut self, color: &Color, period: u32, pulse: u32) -> Result<VooMessage> {
        let params = Params::new()
            .with("action", LedAction::Pulse.as_str())
            .with("color", color)
            .with("period", period)
            .with("pulse", pulse);
        self.call(Function::Led, params)
    }

    /// Fade the LED to `color` over `period` milliseconds.
    pub fn led_fade(&mut self, color: &Color, period: u32) -> Result<VooMessage> {
        let params = Params::new()
            .with("action", LedAction::Fade.as_str())
            .with("color", color)
            .with("period", period);
        self.call(Function::Led, params)
    }

    /// Raw `tts` call.
    pub fn tts(&mut self, action: TtsAction, text: &str, lang: Language) -> Result<VooMessage> {
        let params = Params::new()
            .with("action", action.as_str())
            .with("lang", lang)
            .with("text", text);
        self.call(Function::Tts, params)
    }

    /// Speak `text`.
    pub fn say(&mut self, text: &str, lang: Language) -> Result<VooMessage> {
        self.tts(TtsAction::Speak, text, lang)
    }

    /// Interrupt speech.
    pub fn mute(&mut self) -> Result<VooMessage> {
        self.tts(TtsAction::Stop, "", Language::default())
    }

    /// Cycle through [`Color::PALETTE`], pausing `delay` after each color.
    pub fn demo_led(&mut self, delay: Duration) -> Result<()> {
        for color in Color::PALETTE.iter() {
            self.led_light(color)?;
            thread::sleep(delay);
        }
        Ok(())
    }
}
