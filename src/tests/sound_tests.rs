#[cfg(test)]
mod tests {
    use crate::sound::{SoundEffect, generate_sound_sample};

    const ALL_EFFECTS: [SoundEffect; 14] = [
        SoundEffect::Move,
        SoundEffect::Rotate,
        SoundEffect::Lock,
        SoundEffect::LineFlagged,
        SoundEffect::Explosion,
        SoundEffect::SimonTone(0),
        SoundEffect::SimonTone(2),
        SoundEffect::SimonTone(4),
        SoundEffect::SimonSuccess,
        SoundEffect::SimonFail,
        SoundEffect::CountdownBeep,
        SoundEffect::GameStart,
        SoundEffect::GameOver,
        SoundEffect::SimonTone(9), // Out-of-range index wraps instead of panicking
    ];

    #[test]
    fn test_samples_are_finite_and_bounded() {
        for effect in ALL_EFFECTS {
            let mut t = 0.0;
            while t < 2.5 {
                let (left, right) = generate_sound_sample(effect, t);
                assert!(left.is_finite() && right.is_finite(), "{effect:?} at {t}");
                assert!(left.abs() <= 2.0 && right.abs() <= 2.0, "{effect:?} at {t}");
                t += 0.011;
            }
        }
    }

    #[test]
    fn test_effects_go_silent() {
        // Every cue has decayed to silence by the two-second cutoff
        for effect in ALL_EFFECTS {
            let (left, right) = generate_sound_sample(effect, 2.1);
            assert!(left.abs() < f32::EPSILON, "{effect:?} still audible");
            assert!(right.abs() < f32::EPSILON, "{effect:?} still audible");
        }
    }

    #[test]
    fn test_effects_make_noise_at_onset() {
        for effect in ALL_EFFECTS {
            let mut peak: f32 = 0.0;
            let mut t = 0.0;
            while t < 0.1 {
                let (left, right) = generate_sound_sample(effect, t);
                peak = peak.max(left.abs()).max(right.abs());
                t += 0.0003;
            }
            assert!(peak > 0.0, "{effect:?} is silent at onset");
        }
    }
}
