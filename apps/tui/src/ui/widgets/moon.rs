use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::state::RenderState;
use crate::app::App;
use crate::domain::{format_illumination, MoonPhase};

const PHASE_CYCLE: [MoonPhase; 8] = [
    MoonPhase::DarkMoon,
    MoonPhase::WaxingCrescent,
    MoonPhase::FirstQuarter,
    MoonPhase::WaxingGibbous,
    MoonPhase::FullMoon,
    MoonPhase::WaningGibbous,
    MoonPhase::ThirdQuarter,
    MoonPhase::WaningCrescent,
];

/// Small decorative moon in the title area. While a fetch is in
/// flight the glyph cycles through the phases; once loaded it settles
/// on the current one.
pub fn render_badge(app: &App, f: &mut Frame<'_>, area: Rect) {
    let (glyph, caption) = match &app.render_state {
        RenderState::Loaded { moon, .. } => (
            moon.phase().map_or("🌚", MoonPhase::glyph),
            format!(
                "{} · {}",
                moon.phase_name,
                format_illumination(moon.illumination)
            ),
        ),
        RenderState::Loading => (animated_glyph(app.animation_counter), "...".to_string()),
        RenderState::Error(_) => ("🌚", "unavailable".to_string()),
    };

    let text = Text::from(vec![
        TextLine::from(Span::raw(glyph)),
        TextLine::from(Span::styled(caption, Style::default().fg(Color::Gray))),
    ]);

    f.render_widget(Paragraph::new(text).alignment(Alignment::Right), area);
}

fn animated_glyph(counter: f64) -> &'static str {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = ((counter / (2.0 * std::f64::consts::PI)) * 8.0).abs() as usize % PHASE_CYCLE.len();
    PHASE_CYCLE[index].glyph()
}
