//! Dialogue-to-shot alignment and viseme timing.

use omni_models::budget::round2;
use omni_models::{
    DialogueLine, DialogueSegment, SegmentTiming, Shot, VisemeShape, VisemeWindow,
};

/// Minimum viseme window width in seconds.
const MIN_VISEME_STEP_SEC: f64 = 0.08;
/// Fraction of each step actually occupied by the mouth shape.
const VISEME_OCCUPANCY: f64 = 0.8;

/// Map dialogue lines onto shot time windows.
///
/// Line `i` lands on the shot at the same index; surplus lines clamp to
/// the last shot. Produces nothing when dialogue is absent.
pub fn align_dialogue_to_shots(dialogue: &[DialogueLine], shots: &[Shot]) -> Vec<DialogueSegment> {
    if dialogue.is_empty() || shots.is_empty() {
        return Vec::new();
    }

    dialogue
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let shot = &shots[index.min(shots.len() - 1)];
            let end_sec = round2(shot.duration_sec.min(line.duration_sec));

            DialogueSegment {
                line_id: line.id.clone(),
                shot_id: shot.id.clone(),
                speaker: line.speaker.clone(),
                emotion: line.emotion.clone(),
                text: line.text.clone(),
                timing: SegmentTiming {
                    start_sec: 0.0,
                    end_sec,
                    reaction_before_sec: round2((shot.duration_sec * 0.1).min(0.2)),
                    reaction_after_sec: round2((shot.duration_sec * 0.12).min(0.25)),
                },
                viseme_hints: estimate_viseme_windows(line, shot.duration_sec),
            }
        })
        .collect()
}

/// Tokenize the line and hand each token a time window, tagged open when
/// it contains a vowel.
fn estimate_viseme_windows(line: &DialogueLine, shot_duration_sec: f64) -> Vec<VisemeWindow> {
    let words: Vec<&str> = line.text.split_whitespace().collect();
    let step = (shot_duration_sec / (words.len() as f64 + 2.0)).max(MIN_VISEME_STEP_SEC);

    words
        .iter()
        .enumerate()
        .map(|(index, word)| {
            let start_sec = round2(index as f64 * step);
            let end_sec = round2(shot_duration_sec.min(start_sec + step * VISEME_OCCUPANCY));
            VisemeWindow {
                token: word.to_string(),
                start_sec,
                end_sec,
                viseme: if word.to_lowercase().chars().any(|c| "aeiou".contains(c)) {
                    VisemeShape::Open
                } else {
                    VisemeShape::Closed
                },
            }
        })
        .collect()
}
