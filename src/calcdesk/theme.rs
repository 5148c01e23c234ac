//! AI-generated calculator themes.
//!
//! A user describes a look ("ocean sunset", "terminal green") and a language
//! model answers with three colors and a font. [`LlmThemeGenerator`] asks any
//! [`ClientWrapper`] for that answer as a JSON object, validates it, and
//! returns a [`Theme`]. [`Theme::css_variables`] turns the colors into the
//! space-separated HSL custom properties the UI stylesheet consumes.
//!
//! ```rust
//! use calcdesk::theme::HexColor;
//!
//! let red = HexColor::parse("#ff0000").unwrap();
//! assert_eq!(red.to_hsl().to_string(), "0 100% 50%");
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::calcdesk::client_wrapper::{ClientWrapper, Message};

const MIN_DESCRIPTION_LEN: usize = 3;

const THEME_SYSTEM_PROMPT: &str = "You are an expert in UI/UX design, specializing in color schemes. \
Based on the user's description, generate a color scheme for a calculator application. \
Provide the primary color, background color, and accent color in hex format (e.g., #RRGGBB). \
Also, suggest a suitable font for the calculator's UI. \
Reply with a single JSON object and nothing else, using exactly these keys: \
\"primaryColor\", \"backgroundColor\", \"accentColor\", \"font\".";

/// A generated theme as returned by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub primary_color: String,
    pub background_color: String,
    pub accent_color: String,
    pub font: String,
}

impl Theme {
    /// CSS custom properties for this theme, in HSL component form.
    ///
    /// Besides `--primary`, `--background` and `--accent`, the foreground,
    /// card, border and input colors are derived from the background:
    /// light backgrounds get dark text and slightly darker surfaces, dark
    /// backgrounds the opposite.
    pub fn css_variables(&self) -> Result<Vec<(String, String)>, ThemeError> {
        let primary = HexColor::parse(&self.primary_color)?.to_hsl();
        let background = HexColor::parse(&self.background_color)?.to_hsl();
        let accent = HexColor::parse(&self.accent_color)?.to_hsl();

        let light = background.l > 50.0;
        let h = background.h;
        let s = background.s;
        let l = background.l;
        let (foreground_l, card_l, border_l) = if light {
            (10.0, l * 0.98, l * 0.9)
        } else {
            (95.0, l * 1.2, l * 1.3)
        };
        let border = Hsl::new(h, s * 0.5, border_l);

        Ok(vec![
            ("--primary".to_string(), primary.to_string()),
            ("--background".to_string(), background.to_string()),
            ("--accent".to_string(), accent.to_string()),
            (
                "--foreground".to_string(),
                Hsl::new(h, 10.0, foreground_l).to_string(),
            ),
            ("--card".to_string(), Hsl::new(h, s, card_l).to_string()),
            ("--border".to_string(), border.to_string()),
            ("--input".to_string(), border.to_string()),
        ])
    }
}

#[derive(Debug)]
pub enum ThemeError {
    /// The description is too short to act on.
    DescriptionTooShort,
    /// A color is not `#RGB` or `#RRGGBB`.
    InvalidColor(String),
    /// The model reply did not contain a usable theme object.
    MalformedResponse(String),
    /// The client failed to deliver a reply.
    Client(String),
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeError::DescriptionTooShort => {
                write!(f, "Please describe the theme in a bit more detail.")
            }
            ThemeError::InvalidColor(color) => write!(f, "Invalid hex color: {}", color),
            ThemeError::MalformedResponse(detail) => {
                write!(f, "Failed to generate theme: {}", detail)
            }
            ThemeError::Client(detail) => {
                write!(f, "Failed to generate theme. Please try again. ({})", detail)
            }
        }
    }
}

impl Error for ThemeError {}

/// An sRGB color parsed from hex notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    /// Parse `#RRGGBB` or `#RGB` (the `#` is optional, case-insensitive).
    pub fn parse(text: &str) -> Result<Self, ThemeError> {
        let invalid = || ThemeError::InvalidColor(text.to_string());
        let hex = text.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self {
                r: channel(&hex[0..2])?,
                g: channel(&hex[2..4])?,
                b: channel(&hex[4..6])?,
            }),
            3 => {
                let doubled = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Self {
                    r: doubled(0)?,
                    g: doubled(1)?,
                    b: doubled(2)?,
                })
            }
            _ => Err(invalid()),
        }
    }

    /// Hue in degrees, saturation and lightness in percent, each rounded to a
    /// whole number.
    pub fn to_hsl(self) -> Hsl {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        let (h, s) = if max == min {
            (0.0, 0.0)
        } else {
            let d = max - min;
            let s = if l > 0.5 {
                d / (2.0 - max - min)
            } else {
                d / (max + min)
            };
            let h = if max == r {
                (g - b) / d + if g < b { 6.0 } else { 0.0 }
            } else if max == g {
                (b - r) / d + 2.0
            } else {
                (r - g) / d + 4.0
            };
            (h / 6.0, s)
        };

        Hsl::new(
            (h * 360.0).round(),
            (s * 100.0).round(),
            (l * 100.0).round(),
        )
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// HSL components; displays as `"H S% L%"` with at most two decimals, so
/// derived values like `14.4%` keep their fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub fn new(h: f64, s: f64, l: f64) -> Self {
        Self {
            h,
            s: s.clamp(0.0, 100.0),
            l: l.clamp(0.0, 100.0),
        }
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let component = |v: f64| (v * 100.0).round() / 100.0;
        write!(
            f,
            "{} {}% {}%",
            component(self.h),
            component(self.s),
            component(self.l)
        )
    }
}

#[async_trait]
pub trait ThemeGenerator: Send + Sync {
    async fn generate_theme(&self, description: &str) -> Result<Theme, ThemeError>;
}

/// [`ThemeGenerator`] that asks a chat model. One request per call, no
/// retries.
pub struct LlmThemeGenerator {
    client: Arc<dyn ClientWrapper>,
}

impl LlmThemeGenerator {
    pub fn new(client: Arc<dyn ClientWrapper>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ThemeGenerator for LlmThemeGenerator {
    async fn generate_theme(&self, description: &str) -> Result<Theme, ThemeError> {
        let description = description.trim();
        if description.chars().count() < MIN_DESCRIPTION_LEN {
            return Err(ThemeError::DescriptionTooShort);
        }

        let messages = [
            Message::system(THEME_SYSTEM_PROMPT),
            Message::user(format!("User's theme description: {}", description)),
        ];
        let reply = self.client.send_message(&messages).await.map_err(|e| {
            log::error!(
                "LlmThemeGenerator::generate_theme: {} failed: {}",
                self.client.model_name(),
                e
            );
            ThemeError::Client(e.to_string())
        })?;

        let theme = parse_theme_reply(&reply.content)?;
        log::debug!("LlmThemeGenerator::generate_theme: {:?}", theme);
        Ok(theme)
    }
}

/// Pull the theme object out of a model reply, tolerating prose or code
/// fences around it.
pub fn parse_theme_reply(reply: &str) -> Result<Theme, ThemeError> {
    let start = reply
        .find('{')
        .ok_or_else(|| ThemeError::MalformedResponse("no JSON object in reply".to_string()))?;
    let end = reply
        .rfind('}')
        .filter(|&end| end > start)
        .ok_or_else(|| ThemeError::MalformedResponse("unterminated JSON object".to_string()))?;

    let theme: Theme = serde_json::from_str(&reply[start..=end])
        .map_err(|e| ThemeError::MalformedResponse(e.to_string()))?;

    for color in [
        &theme.primary_color,
        &theme.background_color,
        &theme.accent_color,
    ] {
        HexColor::parse(color)?;
    }
    if theme.font.trim().is_empty() {
        return Err(ThemeError::MalformedResponse("empty font".to_string()));
    }
    Ok(theme)
}
