//! Storyboard assembly.

use omni_models::{
    CameraPath, RenderedKeyframe, Shot, StoryboardKeyframe, StoryboardShot, Transition,
};

/// Assemble the per-shot presentation: transition, camera path and the
/// shot's keyframes sorted by planned index.
pub fn build_storyboard(shots: &[Shot], keyframes: &[RenderedKeyframe]) -> Vec<StoryboardShot> {
    shots
        .iter()
        .enumerate()
        .map(|(index, shot)| {
            let mut shot_frames: Vec<StoryboardKeyframe> = keyframes
                .iter()
                .filter(|frame| frame.spec.shot_id == shot.id)
                .map(|frame| StoryboardKeyframe {
                    index: frame.spec.index,
                    timestamp_sec: frame.spec.timestamp_sec,
                    file_path: frame.file_path.clone(),
                })
                .collect();
            shot_frames.sort_by_key(|frame| frame.index);

            StoryboardShot {
                shot_id: shot.id.clone(),
                duration_sec: shot.duration_sec,
                description: shot.description.clone(),
                transition_in: infer_transition(index),
                camera_path: CameraPath::for_camera(shot.camera),
                keyframes: shot_frames,
            }
        })
        .collect()
}

/// Cold open first, then alternate by index parity.
fn infer_transition(index: usize) -> Transition {
    if index == 0 {
        Transition::ColdOpen
    } else if index % 2 == 0 {
        Transition::Cut
    } else {
        Transition::GentleDissolve
    }
}
