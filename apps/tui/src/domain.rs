use chrono::{DateTime, Local};

/// The eight canonical moon phases as named by the phase endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoonPhase {
    DarkMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    ThirdQuarter,
    WaningCrescent,
}

impl MoonPhase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DarkMoon => "Dark Moon",
            Self::WaxingCrescent => "Waxing Crescent",
            Self::FirstQuarter => "1st Quarter",
            Self::WaxingGibbous => "Waxing Gibbous",
            Self::FullMoon => "Full Moon",
            Self::WaningGibbous => "Waning Gibbous",
            Self::ThirdQuarter => "3rd Quarter",
            Self::WaningCrescent => "Waning Crescent",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Dark Moon" | "New Moon" => Some(Self::DarkMoon),
            "Waxing Crescent" => Some(Self::WaxingCrescent),
            "1st Quarter" | "First Quarter" => Some(Self::FirstQuarter),
            "Waxing Gibbous" => Some(Self::WaxingGibbous),
            "Full Moon" => Some(Self::FullMoon),
            "Waning Gibbous" => Some(Self::WaningGibbous),
            "3rd Quarter" | "Last Quarter" => Some(Self::ThirdQuarter),
            "Waning Crescent" => Some(Self::WaningCrescent),
            _ => None,
        }
    }

    /// File name of the phase artwork served next to the backend.
    pub const fn image_asset(self) -> &'static str {
        match self {
            Self::DarkMoon => "dark_moon.svg",
            Self::WaxingCrescent => "waxing_crescent.svg",
            Self::FirstQuarter => "1st_quarter.svg",
            Self::WaxingGibbous => "waxing_gibbous.svg",
            Self::FullMoon => "full_moon.svg",
            Self::WaningGibbous => "waning_gibbous.svg",
            Self::ThirdQuarter => "third_quarter.svg",
            Self::WaningCrescent => "waning_crescent.svg",
        }
    }

    pub const fn glyph(self) -> &'static str {
        match self {
            Self::DarkMoon => "🌑",
            Self::WaxingCrescent => "🌒",
            Self::FirstQuarter => "🌓",
            Self::WaxingGibbous => "🌔",
            Self::FullMoon => "🌕",
            Self::WaningGibbous => "🌖",
            Self::ThirdQuarter => "🌗",
            Self::WaningCrescent => "🌘",
        }
    }
}

/// One reading from the phase endpoint; superseded wholesale on every
/// fetch cycle.
#[derive(Debug, Clone)]
pub struct MoonReading {
    pub phase_name: String,
    pub illumination: f64,
    pub moon_names: Vec<String>,
}

impl MoonReading {
    /// Unknown phase names still render; they just lose artwork.
    pub fn phase(&self) -> Option<MoonPhase> {
        MoonPhase::parse(&self.phase_name)
    }

    pub fn image_asset(&self) -> &'static str {
        self.phase()
            .map_or("dark_moon.svg", MoonPhase::image_asset)
    }
}

/// A scheduled gate change, chronologically keyed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateEvent {
    pub at: String,
    pub gate: String,
}

/// One reading from the position endpoint. `upcoming` is ascending and
/// holds at most the requested count; the first entry is the next gate.
#[derive(Debug, Clone)]
pub struct PositionReading {
    pub gate: String,
    pub zodiac_sign: String,
    pub degree: f64,
    pub upcoming: Vec<GateEvent>,
}

impl PositionReading {
    pub fn next_gate(&self) -> Option<&GateEvent> {
        self.upcoming.first()
    }

    pub fn later_gates(&self) -> &[GateEvent] {
        self.upcoming.get(1..).unwrap_or(&[])
    }
}

/// "98.0%" style illumination string.
pub fn format_illumination(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// "17 - Scorpio 12.5°" style position string.
pub fn format_position(gate: &str, zodiac_sign: &str, degree: f64) -> String {
    format!("{gate} - {zodiac_sign} {degree}°")
}

/// Renders an ISO-8601 timestamp in local time. Unparseable input is
/// shown verbatim rather than dropped.
pub fn format_event_time(iso: &str) -> String {
    DateTime::parse_from_rfc3339(iso).map_or_else(
        |_| iso.to_string(),
        |at| {
            at.with_timezone(&Local)
                .format("%b %e, %Y %I:%M %p")
                .to_string()
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_eight_phases() {
        let names = [
            "Dark Moon",
            "Waxing Crescent",
            "1st Quarter",
            "Waxing Gibbous",
            "Full Moon",
            "Waning Gibbous",
            "3rd Quarter",
            "Waning Crescent",
        ];
        for name in names {
            let phase = MoonPhase::parse(name);
            assert_eq!(phase.map(MoonPhase::as_str), Some(name));
        }
    }

    #[test]
    fn parses_legacy_phase_aliases() {
        assert_eq!(MoonPhase::parse("New Moon"), Some(MoonPhase::DarkMoon));
        assert_eq!(
            MoonPhase::parse("First Quarter"),
            Some(MoonPhase::FirstQuarter)
        );
        assert_eq!(
            MoonPhase::parse("Last Quarter"),
            Some(MoonPhase::ThirdQuarter)
        );
        assert_eq!(MoonPhase::parse("Blue Moon"), None);
    }

    #[test]
    fn asset_paths_match_served_files() {
        assert_eq!(MoonPhase::FullMoon.image_asset(), "full_moon.svg");
        assert_eq!(MoonPhase::ThirdQuarter.image_asset(), "third_quarter.svg");
        assert_eq!(MoonPhase::FirstQuarter.image_asset(), "1st_quarter.svg");
    }

    #[test]
    fn unknown_phase_falls_back_to_dark_moon_art() {
        let reading = MoonReading {
            phase_name: "Blood Moon".to_string(),
            illumination: 0.5,
            moon_names: vec![],
        };
        assert_eq!(reading.phase(), None);
        assert_eq!(reading.image_asset(), "dark_moon.svg");
    }

    #[test]
    fn formats_illumination_to_one_decimal() {
        assert_eq!(format_illumination(0.98), "98.0%");
        assert_eq!(format_illumination(0.0), "0.0%");
        assert_eq!(format_illumination(1.0), "100.0%");
    }

    #[test]
    fn formats_position_line() {
        assert_eq!(format_position("17", "Scorpio", 12.5), "17 - Scorpio 12.5°");
    }

    #[test]
    fn unparseable_event_time_passes_through() {
        assert_eq!(format_event_time("soon"), "soon");
    }

    #[test]
    fn next_and_later_gates_split_in_order() {
        let position = PositionReading {
            gate: "17".to_string(),
            zodiac_sign: "Scorpio".to_string(),
            degree: 12.5,
            upcoming: vec![
                GateEvent {
                    at: "2024-06-01T10:00:00Z".to_string(),
                    gate: "18".to_string(),
                },
                GateEvent {
                    at: "2024-06-03T04:00:00Z".to_string(),
                    gate: "19".to_string(),
                },
            ],
        };
        assert_eq!(position.next_gate().map(|g| g.gate.as_str()), Some("18"));
        let later: Vec<&str> = position
            .later_gates()
            .iter()
            .map(|g| g.gate.as_str())
            .collect();
        assert_eq!(later, vec!["19"]);
    }

    #[test]
    fn later_gates_empty_when_only_next_is_known() {
        let position = PositionReading {
            gate: "1".to_string(),
            zodiac_sign: "Aries".to_string(),
            degree: 0.0,
            upcoming: vec![GateEvent {
                at: "2024-06-01T10:00:00Z".to_string(),
                gate: "2".to_string(),
            }],
        };
        assert!(position.later_gates().is_empty());
    }
}
