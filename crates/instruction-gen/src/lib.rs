//! Instruction Generator
//!
//! Derives maneuver instructions from a raw coordinate sequence when the
//! routing provider supplies no step metadata, and phrases distances and
//! spoken prompts for voice guidance.

mod generator;
mod phrase;

pub use generator::{
    from_native_steps, generate, Instruction, InstructionConfig, ManeuverType,
};
pub use phrase::{phrase_distance, proximity_prompt, spoken_instruction};
