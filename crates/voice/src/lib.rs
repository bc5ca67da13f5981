//! Voice Announcement Service
//!
//! Deduplicates and throttles spoken prompts in front of a pluggable
//! text-to-speech sink. One service instance per navigation session; no
//! process-wide state.

mod service;

pub use service::{NullSink, SpeechSink, VoiceConfig, VoiceService};
