use crate::chip::{
    chip8::{constants::CHIP8_STACK_DEPTH, util, Chip8},
    Step, StepError,
};

pub(super) fn jump(state: &mut Chip8, address: u16) -> Step {
    state.program_counter = address;
    Step::Advanced
}

/// Pushes the address of the call instruction, so that the matching return
/// restores it and then steps past it.
pub(super) fn call(state: &mut Chip8, address: u16) -> Result<Step, StepError> {
    if state.stack_pointer >= CHIP8_STACK_DEPTH {
        return Err(StepError::StackOverflow);
    }
    state.stack[state.stack_pointer as usize] = state.program_counter;
    state.stack_pointer += 1;
    state.program_counter = address;
    Ok(Step::Advanced)
}

pub(super) fn ret(state: &mut Chip8) -> Result<Step, StepError> {
    if state.stack_pointer == 0 {
        return Err(StepError::StackUnderflow);
    }
    state.stack_pointer -= 1;
    state.program_counter = state.stack[state.stack_pointer as usize];
    util::increment_program_counter(state);
    Ok(Step::Advanced)
}

pub(super) fn jump_with_offset(state: &mut Chip8, address: u16) -> Step {
    state.program_counter = address.wrapping_add(state.registers[0] as u16);
    Step::Advanced
}

pub(super) fn skip_if_equal(state: &mut Chip8, x: u8, value: u8) -> Step {
    let condition = state.registers[x as usize] == value;
    util::skip_next_if(state, condition);
    Step::Advanced
}

pub(super) fn skip_if_not_equal(state: &mut Chip8, x: u8, value: u8) -> Step {
    let condition = state.registers[x as usize] != value;
    util::skip_next_if(state, condition);
    Step::Advanced
}

pub(super) fn skip_if_registers_equal(state: &mut Chip8, x: u8, y: u8) -> Step {
    let condition = state.registers[x as usize] == state.registers[y as usize];
    util::skip_next_if(state, condition);
    Step::Advanced
}

pub(super) fn skip_if_registers_not_equal(state: &mut Chip8, x: u8, y: u8) -> Step {
    let condition = state.registers[x as usize] != state.registers[y as usize];
    util::skip_next_if(state, condition);
    Step::Advanced
}

pub(super) fn skip_if_pressed(state: &mut Chip8, x: u8) -> Step {
    let condition = state.input_pins[(state.registers[x as usize] & 0xF) as usize];
    util::skip_next_if(state, condition);
    Step::Advanced
}

pub(super) fn skip_if_not_pressed(state: &mut Chip8, x: u8) -> Step {
    let condition = !state.input_pins[(state.registers[x as usize] & 0xF) as usize];
    util::skip_next_if(state, condition);
    Step::Advanced
}

/// Completes once any input pin is set, storing the lowest pressed pin index
/// in VX. While no pin is set the program counter stays put and control
/// returns to the caller, which must invoke `step` again.
pub(super) fn wait_for_key(state: &mut Chip8, x: u8) -> Step {
    for i in 0x0..=0xF {
        if state.input_pins[i as usize] {
            state.registers[x as usize] = i;
            util::increment_program_counter(state);
            return Step::Advanced;
        }
    }
    Step::WaitingForKey
}
