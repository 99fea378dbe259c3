use std::env;

use crate::boundaries::BoundaryPolicy;
use crate::color::{Color, Palette};
use crate::steam_id::extract_steam_id;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterSource {
    Backend,
    Demo,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub steam_id: Option<String>,
    pub palette: Palette,
    pub boundary_policy: BoundaryPolicy,
    pub resort_ranking: bool,
    pub source: RosterSource,
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            steam_id: None,
            palette: Palette::default(),
            boundary_policy: BoundaryPolicy::default(),
            resort_ranking: false,
            source: RosterSource::Backend,
            http_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Reads the process environment. Values that do not parse fall back to
    /// their defaults; the returned messages describe each fallback.
    pub fn from_env() -> (Self, Vec<String>) {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> (Self, Vec<String>) {
        let defaults = Self::default();
        let mut warnings = Vec::new();

        let api_url = lookup("AFFINITY_API_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.api_url);

        let steam_id = lookup("STEAM_ID").and_then(|raw| {
            let id = extract_steam_id(&raw);
            if id.is_none() && !raw.trim().is_empty() {
                warnings.push(format!("[WARN] STEAM_ID has no numeric id: {raw}"));
            }
            id
        });

        let low = parse_color(&lookup, "AFFINITY_LOW_COLOR", defaults.palette.low, &mut warnings);
        let high = parse_color(&lookup, "AFFINITY_HIGH_COLOR", defaults.palette.high, &mut warnings);

        let boundary_policy = match lookup("BOUNDARY_POLICY") {
            None => defaults.boundary_policy,
            Some(raw) => BoundaryPolicy::parse(&raw).unwrap_or_else(|err| {
                warnings.push(format!("[WARN] BOUNDARY_POLICY: {err}"));
                defaults.boundary_policy
            }),
        };

        let resort_ranking = match lookup("RANKING_RESORT") {
            None => defaults.resort_ranking,
            Some(raw) => parse_flag(&raw).unwrap_or_else(|| {
                warnings.push(format!("[WARN] RANKING_RESORT {raw} is not a flag, using false"));
                defaults.resort_ranking
            }),
        };

        let http_timeout_secs = match lookup("HTTP_TIMEOUT_SECS") {
            None => defaults.http_timeout_secs,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs >= 1 => secs,
                _ => {
                    warnings.push(format!(
                        "[WARN] HTTP_TIMEOUT_SECS {raw} invalid, using {DEFAULT_TIMEOUT_SECS}s"
                    ));
                    defaults.http_timeout_secs
                }
            },
        };

        let source = match lookup("AFFINITY_SOURCE").map(|v| v.trim().to_lowercase()) {
            None => defaults.source,
            Some(v) if v == "backend" || v.is_empty() => RosterSource::Backend,
            Some(v) if v == "demo" => RosterSource::Demo,
            Some(v) => {
                warnings.push(format!("[WARN] AFFINITY_SOURCE {v} unknown, using backend"));
                RosterSource::Backend
            }
        };

        (
            Self {
                api_url,
                steam_id,
                palette: Palette { low, high },
                boundary_policy,
                resort_ranking,
                source,
                http_timeout_secs,
            },
            warnings,
        )
    }
}

fn parse_color(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Color,
    warnings: &mut Vec<String>,
) -> Color {
    let Some(raw) = lookup(key) else {
        return default;
    };
    Color::parse(&raw).unwrap_or_else(|err| {
        warnings.push(format!("[WARN] {key}: {err}"));
        default
    })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
