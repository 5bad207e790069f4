//! Scenario cards.

use crate::scenario::{ScenarioId, SCENARIOS};
use eframe::egui::{self, Color32, RichText, Stroke};

/// Draws one card per scenario and returns the id the user clicked, if any.
///
/// Stateless: the highlight follows `selected`, and every card is inert
/// while `disabled`.
pub(crate) fn scenario_selector(
    ui: &mut egui::Ui,
    selected: ScenarioId,
    disabled: bool,
) -> Option<ScenarioId> {
    let mut clicked = None;
    ui.columns(SCENARIOS.len(), |cols| {
        for (col, scenario) in cols.iter_mut().zip(SCENARIOS.iter()) {
            let is_selected = scenario.id == selected;
            let [r, g, b] = scenario.color.rgb();
            let accent = Color32::from_rgb(r, g, b);

            let text = RichText::new(format!(
                "{}  {}\n{}",
                scenario.icon, scenario.name, scenario.description
            ));
            let mut button = egui::Button::new(text)
                .wrap()
                .selected(is_selected)
                .min_size(egui::vec2(col.available_width(), 72.0));
            if is_selected {
                button = button
                    .stroke(Stroke::new(2.0, accent))
                    .fill(accent.gamma_multiply(0.25));
            }

            if col.add_enabled(!disabled, button).clicked() {
                clicked = Some(scenario.id);
            }
        }
    });
    clicked
}
