use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";
pub const DEFAULT_TEXT_COLOR: &str = "#000000";
pub const DEFAULT_FONT_FAMILY: &str = "Postbook, sans-serif";

pub const DEFAULT_LOGO_WIDTH: u32 = 150;
pub const DEFAULT_LOGO_HEIGHT: u32 = 100;

/// Maximum accepted upload size, checked client-side before any request.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Application-wide appearance settings. This is exactly the shape posted
/// to update-settings; logo dimensions travel through their own endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceSettings {
    pub background_color: String,
    pub text_color: String,
    pub font_family: String,
}

impl Default for AppearanceSettings {
    fn default() -> Self {
        Self {
            background_color: DEFAULT_BACKGROUND_COLOR.into(),
            text_color: DEFAULT_TEXT_COLOR.into(),
            font_family: DEFAULT_FONT_FAMILY.into(),
        }
    }
}

/// What get-settings actually returns: the appearance fields plus logo
/// dimensions, which the API serves either as numbers or numeric strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSettings {
    #[serde(flatten)]
    pub appearance: AppearanceSettings,
    #[serde(default, deserialize_with = "dimension")]
    pub logo_width: Option<u32>,
    #[serde(default, deserialize_with = "dimension")]
    pub logo_height: Option<u32>,
}

/// Payload for the update-logo-size endpoint. Documented ranges are
/// 50-500 for width and 20-300 for height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoSize {
    pub logo_width: u32,
    pub logo_height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// The fonts the player-facing application ships with.
pub const LOCAL_FONTS: [FontOption; 8] = [
    FontOption { value: "Postbook, sans-serif", label: "Postbook (Clean & Modern)" },
    FontOption { value: "OpalOrbit, sans-serif", label: "Opal Orbit (Light & Elegant)" },
    FontOption { value: "SweetJoys, sans-serif", label: "Sweet Joys (Playful & Fun)" },
    FontOption { value: "RiskTaker, sans-serif", label: "Risk Taker (Bold & Dynamic)" },
    FontOption { value: "Howdybun, sans-serif", label: "Howdybun (Friendly & Casual)" },
    FontOption { value: "KindDaily, sans-serif", label: "Kind Daily (Warm & Welcoming)" },
    FontOption { value: "SuperGreatly, sans-serif", label: "Super Greatly (Strong & Impactful)" },
    FontOption { value: "BeachBall, sans-serif", label: "Beach Ball (Fun & Relaxed)" },
];

/// `#RGB` or `#RRGGBB`, case-insensitive.
pub fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    (digits.len() == 3 || digits.len() == 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// A file the operator picked for upload, held in memory until it passes
/// the client-side checks.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl SelectedFile {
    /// True when the declared content type is any `image/*` type.
    pub fn is_image(&self) -> bool {
        self.content_type
            .parse::<mime::Mime>()
            .map(|m| m.type_() == mime::IMAGE)
            .unwrap_or(false)
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

fn dimension<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}
