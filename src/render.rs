//! Plain-text result cards
//!
//! Empty fighter names are swapped for placeholder labels here, at display
//! time; the request itself carries whatever the user typed.

use crate::ai::gemini::{AnalysisResult, FighterProfile};
use std::fmt::Write;

pub const FIGHTER_PLACEHOLDER: &str = "Your Fighter";
pub const OPPONENT_PLACEHOLDER: &str = "Opponent";

const CARD_WIDTH: usize = 64;

/// Name to show for a fighter, falling back to a placeholder
pub fn display_name<'a>(name: &'a str, placeholder: &'a str) -> &'a str {
    let name = name.trim();
    if name.is_empty() {
        placeholder
    } else {
        name
    }
}

/// Render the full report: two fighter cards, the prediction and the plan
pub fn render_report(result: &AnalysisResult, fighter_name: &str, opponent_name: &str) -> String {
    let fighter = display_name(fighter_name, FIGHTER_PLACEHOLDER);
    let opponent = display_name(opponent_name, OPPONENT_PLACEHOLDER);

    let mut out = String::new();
    render_profile(&mut out, fighter, &result.fighter_analysis);
    render_profile(&mut out, opponent, &result.opponent_analysis);

    heading(&mut out, &format!("Head to Head: {} vs {}", fighter, opponent));
    let _ = writeln!(out, "{}", result.head_to_head.prediction);
    let _ = writeln!(
        out,
        "Confidence: {:.0}% {}",
        result.head_to_head.confidence,
        confidence_bar(result.head_to_head.confidence)
    );
    out.push('\n');

    heading(&mut out, &format!("Game Plan for {}", fighter));
    let _ = writeln!(out, "{}", result.game_plan.strategy);
    section(&mut out, "Key Tactics", &result.game_plan.key_tactics);
    section(&mut out, "Drills", &result.game_plan.drills);

    out
}

fn render_profile(out: &mut String, name: &str, profile: &FighterProfile) {
    heading(out, name);
    let _ = writeln!(out, "Style: {}", profile.fighting_style);
    section(out, "Strengths", &profile.strengths);
    section(out, "Weaknesses", &profile.weaknesses);
    section(out, "Habits", &profile.fighting_habits);
    section(out, "Patterns", &profile.fighting_pattern);
    out.push('\n');
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", "=".repeat(CARD_WIDTH));
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "=".repeat(CARD_WIDTH));
}

fn section(out: &mut String, title: &str, items: &[String]) {
    let _ = writeln!(out, "{}:", title);
    if items.is_empty() {
        let _ = writeln!(out, "  (none noted)");
    }
    for item in items {
        let _ = writeln!(out, "  - {}", item);
    }
}

/// Twenty-cell bar for a 0-100 score
fn confidence_bar(confidence: f64) -> String {
    let filled = (confidence.clamp(0.0, 100.0) / 5.0).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(20 - filled))
}
