//! Voice service implementation

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

/// Text-to-speech output device seam
///
/// Implementations wrap the host audio stack; tests substitute a recording
/// sink.
pub trait SpeechSink {
    /// Begin speaking, replacing any in-progress utterance
    fn speak(&mut self, text: &str);

    /// Stop any in-progress utterance; must be safe when idle
    fn cancel(&mut self);
}

/// Sink that discards all output
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl SpeechSink for NullSink {
    fn speak(&mut self, _text: &str) {}
    fn cancel(&mut self) {}
}

/// Voice service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Window within which an identical prompt is skipped (seconds)
    pub dedup_window_s: u64,
    /// Whether speech starts enabled
    pub enabled: bool,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            dedup_window_s: 5,
            enabled: true,
        }
    }
}

/// Deduplicating, cancellable front-end over a speech sink
pub struct VoiceService<S: SpeechSink> {
    sink: S,
    enabled: bool,
    dedup_window: Duration,
    last_text: Option<String>,
    last_spoke_at: Option<Instant>,
}

impl<S: SpeechSink> VoiceService<S> {
    /// Create a service over the given sink
    pub fn new(sink: S, config: VoiceConfig) -> Self {
        Self {
            sink,
            enabled: config.enabled,
            dedup_window: Duration::from_secs(config.dedup_window_s),
            last_text: None,
            last_spoke_at: None,
        }
    }

    /// Speak a prompt
    ///
    /// Disabled services no-op. Unless forced, an identical prompt within
    /// the dedup window of the previous one is skipped. Otherwise any
    /// in-progress utterance is cancelled first.
    pub fn speak(&mut self, text: &str, force: bool) {
        if !self.enabled {
            return;
        }

        if !force {
            let repeat = self.last_text.as_deref() == Some(text);
            let recent = self
                .last_spoke_at
                .is_some_and(|at| at.elapsed() < self.dedup_window);
            if repeat && recent {
                debug!(text, "skipping duplicate voice prompt");
                return;
            }
        }

        self.sink.cancel();
        self.sink.speak(text);
        self.last_text = Some(text.to_string());
        self.last_spoke_at = Some(Instant::now());
    }

    /// Stop any in-progress utterance immediately
    pub fn cancel(&mut self) {
        self.sink.cancel();
    }

    /// Toggle speech; disabling cancels immediately
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.sink.cancel();
        }
    }

    /// Whether speech is currently enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recording {
        spoken: Vec<String>,
        cancels: usize,
    }

    #[derive(Clone, Default)]
    struct RecordingSink(Rc<RefCell<Recording>>);

    impl SpeechSink for RecordingSink {
        fn speak(&mut self, text: &str) {
            self.0.borrow_mut().spoken.push(text.to_string());
        }
        fn cancel(&mut self) {
            self.0.borrow_mut().cancels += 1;
        }
    }

    fn service(sink: RecordingSink) -> VoiceService<RecordingSink> {
        VoiceService::new(sink, VoiceConfig::default())
    }

    #[test]
    fn test_duplicate_within_window_skipped() {
        let sink = RecordingSink::default();
        let mut voice = service(sink.clone());
        voice.speak("Turn left", false);
        voice.speak("Turn left", false);
        assert_eq!(sink.0.borrow().spoken.len(), 1);
    }

    #[test]
    fn test_force_overrides_dedup() {
        let sink = RecordingSink::default();
        let mut voice = service(sink.clone());
        voice.speak("Turn left", false);
        voice.speak("Turn left", true);
        assert_eq!(sink.0.borrow().spoken.len(), 2);
    }

    #[test]
    fn test_different_text_not_deduped() {
        let sink = RecordingSink::default();
        let mut voice = service(sink.clone());
        voice.speak("Turn left", false);
        voice.speak("Turn right", false);
        assert_eq!(sink.0.borrow().spoken.len(), 2);
    }

    #[test]
    fn test_disabled_is_noop() {
        let sink = RecordingSink::default();
        let mut voice = service(sink.clone());
        voice.set_enabled(false);
        voice.speak("Turn left", false);
        assert!(sink.0.borrow().spoken.is_empty());
    }

    #[test]
    fn test_disabling_cancels() {
        let sink = RecordingSink::default();
        let mut voice = service(sink.clone());
        voice.speak("Turn left", false);
        let before = sink.0.borrow().cancels;
        voice.set_enabled(false);
        assert_eq!(sink.0.borrow().cancels, before + 1);
    }

    #[test]
    fn test_reenabling_takes_effect_on_next_speak() {
        let sink = RecordingSink::default();
        let mut voice = service(sink.clone());
        voice.set_enabled(false);
        voice.speak("muted", false);
        voice.set_enabled(true);
        voice.speak("audible", false);
        assert_eq!(sink.0.borrow().spoken, vec!["audible".to_string()]);
    }

    #[test]
    fn test_cancel_when_idle_is_safe() {
        let sink = RecordingSink::default();
        let mut voice = service(sink);
        voice.cancel();
    }

    #[test]
    fn test_speak_cancels_in_flight() {
        let sink = RecordingSink::default();
        let mut voice = service(sink.clone());
        voice.speak("first", false);
        voice.speak("second", false);
        // Each speak cancels whatever is playing before starting
        assert_eq!(sink.0.borrow().cancels, 2);
        assert_eq!(sink.0.borrow().spoken.len(), 2);
    }
}
