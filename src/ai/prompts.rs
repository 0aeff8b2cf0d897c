/// Role and output rules shared by every analysis request
pub const ANALYSIS_SYSTEM_PROMPT: &str = r#"You are an elite combat sports analyst and fight camp strategist. You study fight footage the way a head coach does: stance, footwork, range management, defensive responses, output over time, and what each fighter does under pressure.

RULES:
1. Base every observation on what is visible in the footage; do not invent fight records or history
2. Be specific: name the technique, the situation, and the reaction (e.g. "drops the right hand when throwing the lead hook")
3. Keep each list item to one sentence
4. The confidence score is an integer from 0 to 100
5. Respond with JSON that matches the provided schema exactly, with no extra text"#;

/// Build the instruction for a head-to-head breakdown
///
/// Names are embedded verbatim, even when empty.
pub fn build_analysis_prompt(fighter_name: &str, opponent_name: &str, weight_class: &str) -> String {
    format!(
        r#"{system}

Analyze the two attached fight videos.

WEIGHT CLASS: {weight_class}
FIGHTER (first video): {fighter}
OPPONENT (second video): {opponent}

Provide:
1. For {fighter}: fighting style, strengths, weaknesses, fighting habits and fighting patterns, taken from the first video.
2. For {opponent}: fighting style, strengths, weaknesses, fighting habits and fighting patterns, taken from the second video.
3. A head-to-head prediction for {fighter} vs {opponent} at {weight_class}, with a confidence score from 0 to 100.
4. A game plan for {fighter} to beat {opponent}: an overall strategy, key tactics, and training drills to prepare."#,
        system = ANALYSIS_SYSTEM_PROMPT,
        fighter = fighter_name,
        opponent = opponent_name,
        weight_class = weight_class,
    )
}
