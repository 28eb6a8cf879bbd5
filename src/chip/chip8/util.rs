use crate::chip::chip8::Chip8;

/// Advances the program counter past the current instruction.
pub fn increment_program_counter(state: &mut Chip8) {
    state.program_counter = state.program_counter.wrapping_add(2);
}

/// Advances the program counter past the current instruction and, if the
/// condition holds, past the following one as well. A "skip" is a program
/// counter advance by 4 rather than a flag.
pub fn skip_next_if(state: &mut Chip8, condition: bool) {
    if condition {
        increment_program_counter(state);
    }
    increment_program_counter(state);
}
