#![warn(clippy::all, clippy::pedantic)]

/// Builds the shareable challenge text for a finished run. Pure formatting;
/// where the text ends up is the caller's problem.
#[must_use]
pub fn share_text(name: &str, score: u32, level: u32, victory: bool) -> String {
    let name = if name.trim().is_empty() {
        "Anonymous"
    } else {
        name.trim()
    };

    if victory {
        format!("{name} beat TETRACUBE with {score} points. Master of the Cube. Can you keep up?")
    } else {
        format!("{name} scored {score} points on level {level} of TETRACUBE. Can you do better?")
    }
}
