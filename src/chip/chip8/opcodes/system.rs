use crate::chip::{
    chip8::{
        constants::{CHIP8_DISPLAY_HEIGHT, CHIP8_DISPLAY_WIDTH},
        util, Chip8,
    },
    Step,
};

/// Zeroes the framebuffer and raises the redraw flag.
pub(super) fn clear_screen(state: &mut Chip8) -> Step {
    state.output_pins = [false; CHIP8_DISPLAY_WIDTH * CHIP8_DISPLAY_HEIGHT];
    state.draw = true;
    util::increment_program_counter(state);
    Step::Advanced
}
