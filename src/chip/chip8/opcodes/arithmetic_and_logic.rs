use rand::{thread_rng, Rng};

use crate::chip::{
    chip8::{
        constants::{
            CHIP8_CHARSET_OFFSET, CHIP8_DISPLAY_HEIGHT, CHIP8_DISPLAY_WIDTH, CHIP8_GLYPH_SIZE,
            CHIP8_MEMORY_SIZE,
        },
        util, Chip8,
    },
    Step,
};

pub(super) fn load_value(state: &mut Chip8, x: u8, value: u8) -> Step {
    state.registers[x as usize] = value;
    util::increment_program_counter(state);
    Step::Advanced
}

/// Adds an immediate to VX modulo 256. The carry flag is not touched.
pub(super) fn add_value(state: &mut Chip8, x: u8, value: u8) -> Step {
    state.registers[x as usize] = state.registers[x as usize].wrapping_add(value);
    util::increment_program_counter(state);
    Step::Advanced
}

/// Applies a binary operation to (VX, VY), storing the result in VX. The
/// result is written before the flag, so VF holds the flag value when the
/// operation targets VF itself.
fn modify_registers(state: &mut Chip8, x: u8, y: u8, f: fn(u8, u8) -> (u8, Option<bool>)) -> Step {
    let (value, flag) = f(state.registers[x as usize], state.registers[y as usize]);
    state.registers[x as usize] = value;
    match flag {
        Some(true) => state.registers[0xF] = 1,
        Some(false) => state.registers[0xF] = 0,
        None => {}
    }
    util::increment_program_counter(state);
    Step::Advanced
}

pub(super) fn copy(state: &mut Chip8, x: u8, y: u8) -> Step {
    modify_registers(state, x, y, |_, v2| (v2, None))
}

pub(super) fn or(state: &mut Chip8, x: u8, y: u8) -> Step {
    modify_registers(state, x, y, |v1, v2| (v1 | v2, None))
}

pub(super) fn and(state: &mut Chip8, x: u8, y: u8) -> Step {
    modify_registers(state, x, y, |v1, v2| (v1 & v2, None))
}

pub(super) fn xor(state: &mut Chip8, x: u8, y: u8) -> Step {
    modify_registers(state, x, y, |v1, v2| (v1 ^ v2, None))
}

pub(super) fn add(state: &mut Chip8, x: u8, y: u8) -> Step {
    modify_registers(state, x, y, |v1, v2| {
        let (result, overflow) = v1.overflowing_add(v2);
        (result, Some(overflow))
    })
}

pub(super) fn sub(state: &mut Chip8, x: u8, y: u8) -> Step {
    modify_registers(state, x, y, |v1, v2| {
        let (result, borrow) = v1.overflowing_sub(v2);
        (result, Some(!borrow))
    })
}

pub(super) fn sub_reversed(state: &mut Chip8, x: u8, y: u8) -> Step {
    modify_registers(state, x, y, |v1, v2| {
        let (result, borrow) = v2.overflowing_sub(v1);
        (result, Some(!borrow))
    })
}

/// The shifted-out bit is captured before the shift, then VX moves by
/// exactly one position.
pub(super) fn shift_right(state: &mut Chip8, x: u8) -> Step {
    modify_registers(state, x, x, |v1, _| (v1 >> 1, Some(v1 & 0x01 != 0)))
}

pub(super) fn shift_left(state: &mut Chip8, x: u8) -> Step {
    modify_registers(state, x, x, |v1, _| (v1 << 1, Some(v1 & 0x80 != 0)))
}

pub(super) fn load_index(state: &mut Chip8, address: u16) -> Step {
    state.index = address;
    util::increment_program_counter(state);
    Step::Advanced
}

/// The random source does not need to be cryptographic and no determinism
/// across runs is guaranteed.
pub(super) fn random(state: &mut Chip8, x: u8, mask: u8) -> Step {
    let sample: u8 = thread_rng().gen();
    state.registers[x as usize] = sample & mask;
    util::increment_program_counter(state);
    Step::Advanced
}

/// XORs an N-row sprite read from memory[I] onto the framebuffer at
/// (VX, VY). Pixels addressed beyond the display bounds wrap around on both
/// axes; sprite rows that would be read from beyond the address space are
/// clipped. VF becomes 1 if any pixel flipped from set to unset, 0
/// otherwise. The redraw flag is raised unconditionally.
pub(super) fn draw(state: &mut Chip8, x: u8, y: u8, rows: u8) -> Step {
    fn translate_gfx(x: u16, y: u16) -> usize {
        (x as usize % CHIP8_DISPLAY_WIDTH)
            + (y as usize % CHIP8_DISPLAY_HEIGHT) * CHIP8_DISPLAY_WIDTH
    }

    let origin_x = state.registers[x as usize] as u16;
    let origin_y = state.registers[y as usize] as u16;

    state.registers[0xF] = 0;
    for row in 0..rows as u16 {
        let row_address = state.index.wrapping_add(row);
        if row_address >= CHIP8_MEMORY_SIZE as u16 {
            break;
        }
        let sprite_byte = state.memory[row_address as usize];

        for col in 0..8 {
            if sprite_byte & (0x80 >> col) == 0 {
                continue;
            }

            let pixel_pos = translate_gfx(origin_x + col, origin_y + row);
            if state.output_pins[pixel_pos] {
                state.registers[0xF] = 1;
            }
            state.output_pins[pixel_pos] ^= true;
        }
    }

    state.draw = true;
    util::increment_program_counter(state);
    Step::Advanced
}

pub(super) fn read_delay_timer(state: &mut Chip8, x: u8) -> Step {
    state.registers[x as usize] = state.delay_timer;
    util::increment_program_counter(state);
    Step::Advanced
}

pub(super) fn set_delay_timer(state: &mut Chip8, x: u8) -> Step {
    state.delay_timer = state.registers[x as usize];
    util::increment_program_counter(state);
    Step::Advanced
}

pub(super) fn set_sound_timer(state: &mut Chip8, x: u8) -> Step {
    state.sound_timer = state.registers[x as usize];
    util::increment_program_counter(state);
    Step::Advanced
}

/// Adds VX to the index register. The index register itself is not masked;
/// VF flags whether the sum left the addressable range.
pub(super) fn add_to_index(state: &mut Chip8, x: u8) -> Step {
    state.index = state
        .index
        .wrapping_add(state.registers[x as usize] as u16);
    state.registers[0xF] = if state.index > 0xFFF { 1 } else { 0 };
    util::increment_program_counter(state);
    Step::Advanced
}

pub(super) fn load_glyph_address(state: &mut Chip8, x: u8) -> Step {
    let character = state.registers[x as usize] as u16;
    state.index = CHIP8_CHARSET_OFFSET + character * CHIP8_GLYPH_SIZE;
    util::increment_program_counter(state);
    Step::Advanced
}

/// Decomposes VX into hundreds, tens and ones, stored at memory[I..=I+2].
pub(super) fn store_bcd(state: &mut Chip8, x: u8) -> Step {
    let value = state.registers[x as usize];
    state.set_memory_byte(value / 100, state.index);
    state.set_memory_byte((value / 10) % 10, state.index.wrapping_add(1));
    state.set_memory_byte(value % 10, state.index.wrapping_add(2));
    util::increment_program_counter(state);
    Step::Advanced
}

/// Copies V0..=VX to memory starting at the index register. The index
/// register is unchanged.
pub(super) fn store_registers(state: &mut Chip8, x: u8) -> Step {
    for reg in 0x0..=x {
        state.set_memory_byte(
            state.registers[reg as usize],
            state.index.wrapping_add(reg as u16),
        );
    }
    util::increment_program_counter(state);
    Step::Advanced
}

/// Fills V0..=VX from memory starting at the index register. The index
/// register is unchanged.
pub(super) fn load_registers(state: &mut Chip8, x: u8) -> Step {
    for reg in 0x0..=x {
        state.registers[reg as usize] = state.memory
            [(state.index.wrapping_add(reg as u16) % CHIP8_MEMORY_SIZE as u16) as usize];
    }
    util::increment_program_counter(state);
    Step::Advanced
}
