use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

/// Emotional register of the current reply. The only effect an emotion has
/// on the avatar is the target smile intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Emotion {
    #[default]
    Neutral,
    Happy,
    Concerned,
}

impl Emotion {
    pub fn smile_target(self) -> f32 {
        match self {
            Emotion::Happy => 0.7,
            Emotion::Neutral => 0.05,
            Emotion::Concerned => 0.0,
        }
    }

    fn to_bits(self) -> u8 {
        match self {
            Emotion::Neutral => 0,
            Emotion::Happy => 1,
            Emotion::Concerned => 2,
        }
    }

    fn from_bits(bits: u8) -> Self {
        match bits {
            1 => Emotion::Happy,
            2 => Emotion::Concerned,
            _ => Emotion::Neutral,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mood {
    pub emotion: Emotion,
    pub speaking: bool,
}

/// Snapshot cell at the conversation/animation boundary: the bridge replaces
/// the whole value once per reply, the driver reads it once per frame. Both
/// fields live in one atomic so a reader never observes a half-updated pair.
#[derive(Debug, Default)]
pub struct MoodCell(AtomicU8);

const SPEAKING_BIT: u8 = 1 << 2;

impl MoodCell {
    pub fn new(mood: Mood) -> Self {
        let cell = Self(AtomicU8::new(0));
        cell.store(mood);
        cell
    }

    pub fn store(&self, mood: Mood) {
        let mut bits = mood.emotion.to_bits();
        if mood.speaking {
            bits |= SPEAKING_BIT;
        }
        self.0.store(bits, Ordering::Relaxed);
    }

    pub fn load(&self) -> Mood {
        let bits = self.0.load(Ordering::Relaxed);
        Mood {
            emotion: Emotion::from_bits(bits & !SPEAKING_BIT),
            speaking: bits & SPEAKING_BIT != 0,
        }
    }
}
