use std::sync::Arc;

use animation_engine::mood::{Emotion, Mood, MoodCell};

/// A reply ready for playback: tag stripped, emotion extracted and the
/// speaking window estimated.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub emotion: Emotion,
    pub speak_for: f32,
}

/// The conversation side of the mood boundary. Replies arrive as raw text
/// with a leading emotion tag; the bridge parses them and publishes the
/// mood snapshot the animation driver reads each frame. It never touches
/// the scene graph.
pub struct ConversationBridge {
    mood: Arc<MoodCell>,
}

impl ConversationBridge {
    pub fn new(mood: Arc<MoodCell>) -> Self {
        Self { mood }
    }

    pub fn deliver(&self, raw: &str) -> Reply {
        let (text, emotion) = parse_reply(raw);
        let speak_for = estimated_speech_seconds(&text);
        self.mood.store(Mood {
            emotion,
            speaking: true,
        });
        Reply {
            text,
            emotion,
            speak_for,
        }
    }

    /// The playback-ended signal; the emotion stays on the face.
    pub fn speech_finished(&self, emotion: Emotion) {
        self.mood.store(Mood {
            emotion,
            speaking: false,
        });
    }
}

/// Splits a leading `[TAG]` off the reply. Tag matching is tolerant: any
/// bracketed prefix containing HAPPY or CONCERNED (any case) selects that
/// emotion, everything else is neutral.
pub fn parse_reply(raw: &str) -> (String, Emotion) {
    let trimmed = raw.trim();
    if let Some(rest) = trimmed.strip_prefix('[') {
        if let Some(end) = rest.find(']') {
            let tag = rest[..end].to_uppercase();
            let text = rest[end + 1..].trim().to_string();
            let emotion = if tag.contains("HAPPY") {
                Emotion::Happy
            } else if tag.contains("CONCERNED") {
                Emotion::Concerned
            } else {
                Emotion::Neutral
            };
            return (text, emotion);
        }
    }
    (trimmed.to_string(), Emotion::Neutral)
}

/// Stand-in for the audio element's play/ended events: roughly a third of a
/// second per word, never less than a second.
fn estimated_speech_seconds(text: &str) -> f32 {
    (text.split_whitespace().count() as f32 * 0.35).max(1.0)
}

/// Offline therapist with canned keyword replies, used so a session can run
/// without any hosted model behind it.
#[derive(Debug, Default)]
pub struct ScriptedTherapist;

impl ScriptedTherapist {
    pub fn new() -> Self {
        Self
    }

    pub fn reply(&self, message: &str) -> String {
        let lower = message.to_lowercase();
        if lower.contains("good") || lower.contains("great") || lower.contains("happy") {
            "[HAPPY] That is wonderful to hear! What made it feel so good?".to_string()
        } else if lower.contains("sad") || lower.contains("tired") || lower.contains("bad") {
            "[CONCERNED] I am sorry to hear that. Do you want to talk about it?".to_string()
        } else if lower.contains("hello") || lower.contains("hi") {
            "[NEUTRAL] Hello. How are you feeling today?".to_string()
        } else if lower.contains("thank") {
            "[HAPPY] You are very welcome. Take care of yourself.".to_string()
        } else {
            "[NEUTRAL] I see. Can you tell me more about that?".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_select_the_emotion() {
        assert_eq!(
            parse_reply("[HAPPY] Glad to hear it!"),
            ("Glad to hear it!".to_string(), Emotion::Happy)
        );
        assert_eq!(parse_reply("[CONCERNED] Tell me more.").1, Emotion::Concerned);
        assert_eq!(parse_reply("[NEUTRAL] I see.").1, Emotion::Neutral);
    }

    #[test]
    fn tag_matching_is_case_insensitive_and_tolerant() {
        assert_eq!(parse_reply("[happy] Great!").1, Emotion::Happy);
        assert_eq!(parse_reply("[VERY HAPPY] Great!").1, Emotion::Happy);
        assert_eq!(parse_reply("[GRUMPY] Hmpf.").1, Emotion::Neutral);
    }

    #[test]
    fn untagged_replies_pass_through_neutral() {
        let (text, emotion) = parse_reply("  Just some text.  ");
        assert_eq!(text, "Just some text.");
        assert_eq!(emotion, Emotion::Neutral);
    }

    #[test]
    fn unterminated_tag_is_left_alone() {
        let (text, emotion) = parse_reply("[HAPPY unterminated");
        assert_eq!(text, "[HAPPY unterminated");
        assert_eq!(emotion, Emotion::Neutral);
    }

    #[test]
    fn delivery_publishes_a_speaking_mood() {
        let mood = Arc::new(MoodCell::default());
        let bridge = ConversationBridge::new(mood.clone());

        let reply = bridge.deliver("[HAPPY] What a lovely day outside.");
        assert!(mood.load().speaking);
        assert_eq!(mood.load().emotion, Emotion::Happy);
        assert!(reply.speak_for >= 1.0);

        bridge.speech_finished(reply.emotion);
        assert!(!mood.load().speaking);
        assert_eq!(mood.load().emotion, Emotion::Happy);
    }

    #[test]
    fn short_replies_still_get_a_speaking_window() {
        let mood = Arc::new(MoodCell::default());
        let bridge = ConversationBridge::new(mood);
        let reply = bridge.deliver("[NEUTRAL] Yes.");
        assert_eq!(reply.speak_for, 1.0);
    }

    #[test]
    fn scripted_replies_always_carry_a_tag() {
        let therapist = ScriptedTherapist::new();
        for message in ["hello", "I feel sad", "today was good", "thank you", "xyzzy"] {
            let raw = therapist.reply(message);
            let (text, _) = parse_reply(&raw);
            assert!(!text.starts_with('['), "tag not stripped from {raw:?}");
            assert!(!text.is_empty());
        }
    }
}
