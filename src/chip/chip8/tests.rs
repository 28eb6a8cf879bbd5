use crate::chip::chip8::constants::{CHIP8_CHARSET, CHIP8_CHARSET_LEN};
use crate::chip::chip8::Chip8;
use crate::chip::{Chip, LoadProgramError, Step, StepError};

fn prepare_state_with_single_instruction(instruction: u16) -> Chip8 {
    let mut chip8 = Chip8::new();
    chip8.memory[0x200] = ((instruction & 0xFF00) >> 8) as u8;
    chip8.memory[0x201] = (instruction & 0xFF) as u8;
    chip8
}

fn do_step(instruction: u16, before_step: fn(&mut Chip8), after_step: fn(&mut Chip8)) {
    let mut state = prepare_state_with_single_instruction(instruction);

    before_step(&mut state);
    assert_eq!(state.step(), Ok(Step::Advanced));
    after_step(&mut state);
}

#[test]
fn test_jump() {
    do_step(
        0x1CAF,
        |state| {
            assert_eq!(state.program_counter, 0x200);
        },
        |state| {
            assert_eq!(state.program_counter, 0xCAF);
        },
    )
}

#[test]
fn test_call() {
    do_step(
        0x2304,
        |state| {
            assert_eq!(state.program_counter, 0x200);
        },
        |state| {
            assert_eq!(state.program_counter, 0x304);
            assert_eq!(state.stack_pointer, 1);
            assert_eq!(state.stack[0], 0x200);
        },
    )
}

#[test]
fn test_call_return_round_trip() {
    let mut state = prepare_state_with_single_instruction(0x2304);
    state.memory[0x304] = 0x00;
    state.memory[0x305] = 0xEE;

    assert_eq!(state.step(), Ok(Step::Advanced));
    assert_eq!(state.program_counter, 0x304);

    assert_eq!(state.step(), Ok(Step::Advanced));
    assert_eq!(state.program_counter, 0x202);
    assert_eq!(state.stack_pointer, 0);
}

#[test]
fn test_call_with_full_stack_is_rejected() {
    let mut state = prepare_state_with_single_instruction(0x2304);
    state.stack_pointer = 16;

    assert_eq!(state.step(), Err(StepError::StackOverflow));
    assert_eq!(state.program_counter, 0x200);
    assert_eq!(state.stack_pointer, 16);
}

#[test]
fn test_return_with_empty_stack_is_rejected() {
    let mut state = prepare_state_with_single_instruction(0x00EE);

    assert_eq!(state.step(), Err(StepError::StackUnderflow));
    assert_eq!(state.program_counter, 0x200);
    assert_eq!(state.stack_pointer, 0);
}

#[test]
fn test_skip_if_equal() {
    do_step(
        0x34AF,
        |state| {
            state.registers[4] = 0xAF;
        },
        |state| {
            assert_eq!(state.program_counter, 0x204);
        },
    );

    do_step(
        0x34BF,
        |state| {
            state.registers[4] = 0xAF;
        },
        |state| {
            assert_eq!(state.program_counter, 0x202);
        },
    );
}

#[test]
fn test_skip_if_not_equal() {
    do_step(
        0x44BF,
        |state| {
            state.registers[4] = 0xAF;
        },
        |state| {
            assert_eq!(state.program_counter, 0x204);
        },
    );

    do_step(
        0x44AF,
        |state| {
            state.registers[4] = 0xAF;
        },
        |state| {
            assert_eq!(state.program_counter, 0x202);
        },
    );
}

#[test]
fn test_skip_if_registers_equal() {
    do_step(
        0x5120,
        |state| {
            state.registers[1] = 0x11;
            state.registers[2] = 0x11;
        },
        |state| {
            assert_eq!(state.program_counter, 0x204);
        },
    );

    do_step(
        0x5120,
        |state| {
            state.registers[1] = 0x11;
            state.registers[2] = 0x22;
        },
        |state| {
            assert_eq!(state.program_counter, 0x202);
        },
    );
}

#[test]
fn test_skip_if_registers_not_equal() {
    do_step(
        0x9120,
        |state| {
            state.registers[1] = 0x11;
            state.registers[2] = 0x22;
        },
        |state| {
            assert_eq!(state.program_counter, 0x204);
        },
    );

    do_step(
        0x9120,
        |state| {
            state.registers[1] = 0x11;
            state.registers[2] = 0x11;
        },
        |state| {
            assert_eq!(state.program_counter, 0x202);
        },
    );
}

#[test]
fn test_load_value_for_all_registers() {
    for x in 0x0..=0xFu16 {
        let mut state = prepare_state_with_single_instruction(0x60AF | (x << 8));
        assert_eq!(state.step(), Ok(Step::Advanced));
        assert_eq!(state.registers[x as usize], 0xAF);
        assert_eq!(state.program_counter, 0x202);
    }
}

#[test]
fn test_add_value_wraps_without_flag() {
    do_step(
        0x7410,
        |state| {
            state.registers[4] = 0xFF;
            state.registers[0xF] = 0xAA;
        },
        |state| {
            assert_eq!(state.registers[4], 0x0F);
            // The immediate add never touches the carry flag.
            assert_eq!(state.registers[0xF], 0xAA);
            assert_eq!(state.program_counter, 0x202);
        },
    );
}

#[test]
fn test_copy_register() {
    do_step(
        0x8120,
        |state| {
            state.registers[2] = 0x42;
        },
        |state| {
            assert_eq!(state.registers[1], 0x42);
        },
    );
}

#[test]
fn test_or_and_xor() {
    do_step(
        0x8121,
        |state| {
            state.registers[1] = 0xF0;
            state.registers[2] = 0x0F;
        },
        |state| {
            assert_eq!(state.registers[1], 0xFF);
        },
    );

    do_step(
        0x8122,
        |state| {
            state.registers[1] = 0xF6;
            state.registers[2] = 0x0F;
        },
        |state| {
            assert_eq!(state.registers[1], 0x06);
        },
    );

    do_step(
        0x8123,
        |state| {
            state.registers[1] = 0xFF;
            state.registers[2] = 0x0F;
        },
        |state| {
            assert_eq!(state.registers[1], 0xF0);
        },
    );
}

#[test]
fn test_add_registers_with_carry() {
    do_step(
        0x8124,
        |state| {
            state.registers[1] = 0xFE;
            state.registers[2] = 0xF0;
        },
        |state| {
            assert_eq!(state.registers[1], 0xEE);
            assert_eq!(state.registers[0xF], 1);
        },
    );

    do_step(
        0x8124,
        |state| {
            state.registers[1] = 0x04;
            state.registers[2] = 0x20;
        },
        |state| {
            assert_eq!(state.registers[1], 0x24);
            assert_eq!(state.registers[0xF], 0);
        },
    );
}

#[test]
fn test_sub_registers_with_borrow_flag() {
    do_step(
        0x8125,
        |state| {
            state.registers[1] = 0xFE;
            state.registers[2] = 0xF0;
        },
        |state| {
            assert_eq!(state.registers[1], 0x0E);
            // no borrow
            assert_eq!(state.registers[0xF], 1);
        },
    );

    do_step(
        0x8125,
        |state| {
            state.registers[1] = 0x04;
            state.registers[2] = 0x20;
        },
        |state| {
            assert_eq!(state.registers[1], 0xE4);
            // borrow occurred
            assert_eq!(state.registers[0xF], 0);
        },
    );
}

#[test]
fn test_sub_reversed_with_borrow_flag() {
    do_step(
        0x8127,
        |state| {
            state.registers[1] = 0xF0;
            state.registers[2] = 0xFE;
        },
        |state| {
            assert_eq!(state.registers[1], 0x0E);
            assert_eq!(state.registers[0xF], 1);
        },
    );

    do_step(
        0x8127,
        |state| {
            state.registers[1] = 0x20;
            state.registers[2] = 0x04;
        },
        |state| {
            assert_eq!(state.registers[1], 0xE4);
            assert_eq!(state.registers[0xF], 0);
        },
    );
}

#[test]
fn test_shift_right_captures_lsb() {
    do_step(
        0x8106,
        |state| {
            state.registers[1] = 0xEF;
        },
        |state| {
            assert_eq!(state.registers[1], 0x77);
            assert_eq!(state.registers[0xF], 1);
        },
    );
}

#[test]
fn test_shift_left_captures_msb() {
    do_step(
        0x810E,
        |state| {
            state.registers[1] = 0xEF;
        },
        |state| {
            assert_eq!(state.registers[1], 0xDE);
            assert_eq!(state.registers[0xF], 1);
        },
    );
}

#[test]
fn test_load_index() {
    do_step(
        0xACAF,
        |_| {},
        |state| {
            assert_eq!(state.index, 0xCAF);
            assert_eq!(state.program_counter, 0x202);
        },
    );
}

#[test]
fn test_jump_with_offset() {
    do_step(
        0xB300,
        |state| {
            state.registers[0] = 0x04;
        },
        |state| {
            assert_eq!(state.program_counter, 0x304);
        },
    );
}

#[test]
fn test_random_respects_mask() {
    do_step(
        0xC100,
        |state| {
            state.registers[1] = 0xFF;
        },
        |state| {
            // A zero mask forces a zero sample regardless of the RNG.
            assert_eq!(state.registers[1], 0x00);
        },
    );

    do_step(
        0xC10F,
        |_| {},
        |state| {
            assert_eq!(state.registers[1] & 0xF0, 0x00);
        },
    );
}

#[test]
fn test_clear_screen() {
    do_step(
        0x00E0,
        |state| {
            state.output_pins = [true; 64 * 32];
            state.draw = false;
        },
        |state| {
            assert!(state.output_pins.iter().all(|pin| !pin));
            assert!(state.take_redraw());
            assert_eq!(state.program_counter, 0x202);
        },
    );
}

#[test]
fn test_draw_wraps_at_both_edges() {
    let mut state = prepare_state_with_single_instruction(0xD012);
    state.index = 0x300;
    state.memory[0x300] = 0xFF;
    state.memory[0x301] = 0xFF;
    state.registers[0] = 60;
    state.registers[1] = 31;

    assert_eq!(state.step(), Ok(Step::Advanced));

    // The sprite's origin is (60, 31); its right half wraps to x 0..4 and
    // its second row wraps to y 0.
    for (x, y) in &[(60, 31), (63, 31), (0, 31), (3, 31), (60, 0), (3, 0)] {
        assert!(state.pixel(*x, *y), "expected pixel ({}, {}) set", x, y);
    }
    assert!(!state.pixel(4, 31));
    assert!(!state.pixel(59, 0));
    assert_eq!(state.registers[0xF], 0);
    assert!(state.take_redraw());
}

#[test]
fn test_draw_clips_rows_beyond_memory() {
    let mut state = prepare_state_with_single_instruction(0xD012);
    state.index = 0xFFF;
    state.memory[0xFFF] = 0x80;
    state.registers[0] = 0;
    state.registers[1] = 0;

    assert_eq!(state.step(), Ok(Step::Advanced));

    // Only the row at 0xFFF is drawn; the second row has no backing memory.
    assert!(state.pixel(0, 0));
    for x in 0..64 {
        assert!(!state.pixel(x, 1));
    }
}

#[test]
fn test_draw_reports_collision() {
    let mut state = prepare_state_with_single_instruction(0xD011);
    state.index = 0x300;
    state.memory[0x300] = 0xF0;
    state.registers[0] = 8;
    state.registers[1] = 4;

    assert_eq!(state.step(), Ok(Step::Advanced));
    assert_eq!(state.registers[0xF], 0);
    assert!(state.pixel(8, 4));

    // Drawing the same sprite again erases it and raises the collision flag.
    state.program_counter = 0x200;
    assert_eq!(state.step(), Ok(Step::Advanced));
    assert_eq!(state.registers[0xF], 1);
    assert!(!state.pixel(8, 4));
    assert!(state.take_redraw());
}

#[test]
fn test_skip_if_pressed() {
    do_step(
        0xE19E,
        |state| {
            state.registers[1] = 0xB;
            state.set_input_pin(0xB, true);
        },
        |state| {
            assert_eq!(state.program_counter, 0x204);
        },
    );

    do_step(
        0xE19E,
        |state| {
            state.registers[1] = 0xB;
        },
        |state| {
            assert_eq!(state.program_counter, 0x202);
        },
    );
}

#[test]
fn test_skip_if_not_pressed() {
    do_step(
        0xE1A1,
        |state| {
            state.registers[1] = 0xB;
        },
        |state| {
            assert_eq!(state.program_counter, 0x204);
        },
    );

    do_step(
        0xE1A1,
        |state| {
            state.registers[1] = 0xB;
            state.set_input_pin(0xB, true);
        },
        |state| {
            assert_eq!(state.program_counter, 0x202);
        },
    );
}

#[test]
fn test_wait_for_key_blocks_until_key_press() {
    let mut state = prepare_state_with_single_instruction(0xF50A);

    for _ in 0..3 {
        assert_eq!(state.step(), Ok(Step::WaitingForKey));
        assert_eq!(state.program_counter, 0x200);
    }

    state.set_input_pin(0xB, true);
    assert_eq!(state.step(), Ok(Step::Advanced));
    assert_eq!(state.registers[5], 0xB);
    assert_eq!(state.program_counter, 0x202);
}

#[test]
fn test_delay_timer_read_write() {
    do_step(
        0xF107,
        |state| {
            state.delay_timer = 0x42;
        },
        |state| {
            assert_eq!(state.registers[1], 0x42);
        },
    );

    do_step(
        0xF115,
        |state| {
            state.registers[1] = 0x42;
        },
        |state| {
            assert_eq!(state.delay_timer, 0x42);
        },
    );
}

#[test]
fn test_sound_timer_write() {
    do_step(
        0xF118,
        |state| {
            state.registers[1] = 0x42;
        },
        |state| {
            assert_eq!(state.sound_timer, 0x42);
            assert!(state.sound_active());
        },
    );
}

#[test]
fn test_tick_timers_decrements_and_saturates() {
    let mut state = Chip8::new();
    state.delay_timer = 2;
    state.sound_timer = 1;

    state.tick_timers();
    assert_eq!(state.delay_timer, 1);
    assert_eq!(state.sound_timer, 0);
    assert!(!state.sound_active());

    state.tick_timers();
    assert_eq!(state.delay_timer, 0);
    assert_eq!(state.sound_timer, 0);

    state.tick_timers();
    assert_eq!(state.delay_timer, 0);
    assert_eq!(state.sound_timer, 0);
}

#[test]
fn test_add_to_index_flags_overflow() {
    do_step(
        0xF11E,
        |state| {
            state.index = 0xFFF;
            state.registers[1] = 0x10;
        },
        |state| {
            // The index register is not masked back into range.
            assert_eq!(state.index, 0x100F);
            assert_eq!(state.registers[0xF], 1);
        },
    );

    do_step(
        0xF11E,
        |state| {
            state.index = 0x100;
            state.registers[1] = 0x10;
        },
        |state| {
            assert_eq!(state.index, 0x110);
            assert_eq!(state.registers[0xF], 0);
        },
    );
}

#[test]
fn test_glyph_address() {
    do_step(
        0xF229,
        |state| {
            state.registers[2] = 0xA;
        },
        |state| {
            assert_eq!(state.index, 50);
        },
    );
}

#[test]
fn test_bcd_store() {
    do_step(
        0xF333,
        |state| {
            state.registers[3] = 204;
            state.index = 0x300;
        },
        |state| {
            assert_eq!(state.memory[0x300], 2);
            assert_eq!(state.memory[0x301], 0);
            assert_eq!(state.memory[0x302], 4);
            assert_eq!(state.index, 0x300);
        },
    );
}

#[test]
fn test_register_block_store_load_round_trip() {
    let mut state = prepare_state_with_single_instruction(0xF755);
    for reg in 0x0..=0x7 {
        state.registers[reg] = 0x10 + reg as u8;
    }
    state.index = 0x300;

    assert_eq!(state.step(), Ok(Step::Advanced));
    for reg in 0x0..=0x7u16 {
        assert_eq!(state.memory[(0x300 + reg) as usize], 0x10 + reg as u8);
    }
    assert_eq!(state.index, 0x300);

    let mut state = prepare_state_with_single_instruction(0xF765);
    for reg in 0x0..=0x7u16 {
        state.memory[(0x300 + reg) as usize] = 0x10 + reg as u8;
    }
    state.index = 0x300;

    assert_eq!(state.step(), Ok(Step::Advanced));
    for reg in 0x0..=0x7 {
        assert_eq!(state.registers[reg], 0x10 + reg as u8);
    }
    assert_eq!(state.index, 0x300);
}

#[test]
fn test_unknown_opcode_leaves_state_untouched() {
    for &word in &[0x0FFFu16, 0x5121, 0x8128, 0xE1FF, 0xF1FF, 0xFFFF] {
        let mut state = prepare_state_with_single_instruction(word);
        state.registers[1] = 0x42;
        state.index = 0x300;

        assert_eq!(state.step(), Err(StepError::UnknownOpcode(word)));
        assert_eq!(state.program_counter, 0x200);
        assert_eq!(state.registers[1], 0x42);
        assert_eq!(state.index, 0x300);
        assert_eq!(state.stack_pointer, 0);
    }
}

#[test]
fn test_fetch_at_memory_end_reads_around_the_wrap() {
    let mut state = prepare_state_with_single_instruction(0x1FFF);

    assert_eq!(state.step(), Ok(Step::Advanced));
    assert_eq!(state.program_counter, 0xFFF);

    // The fetch at 0xFFF pairs the last memory byte with the first one (the
    // leading charset byte), which decodes to no instruction; the step
    // reports that instead of dying.
    assert_eq!(state.step(), Err(StepError::UnknownOpcode(0x00F0)));
    assert_eq!(state.program_counter, 0xFFF);
}

#[test]
fn test_load_program_rejects_oversized_program() {
    let mut state = Chip8::new();
    let program = vec![0; 0xE01];
    assert_eq!(
        state.load_program(&program),
        Err(LoadProgramError::ProgramTooLarge(0xE01))
    );

    let program = vec![0x1A; 0xE00];
    assert_eq!(state.load_program(&program), Ok(()));
    assert_eq!(state.memory[0xFFF], 0x1A);
}

#[test]
fn test_charset_survives_load_and_execution() {
    let mut state = Chip8::new();
    state.load_program(&[0x60, 0xAA]).unwrap();
    assert_eq!(
        &state.memory[..CHIP8_CHARSET_LEN as usize],
        &CHIP8_CHARSET[..]
    );

    // A BCD store aimed at the charset region is dropped.
    let mut state = prepare_state_with_single_instruction(0xF333);
    state.registers[3] = 204;
    state.index = 0x10;
    assert_eq!(state.step(), Ok(Step::Advanced));
    assert_eq!(
        &state.memory[..CHIP8_CHARSET_LEN as usize],
        &CHIP8_CHARSET[..]
    );
}

#[test]
fn test_reset_restores_loaded_program() {
    let mut state = Chip8::new();
    state.load_program(&[0x61, 0xAA, 0x12, 0x00]).unwrap();

    assert_eq!(state.step(), Ok(Step::Advanced));
    assert_eq!(state.registers[1], 0xAA);
    state.memory[0x200] = 0x00;

    state.reset();
    assert_eq!(state.program_counter, 0x200);
    assert_eq!(state.registers[1], 0);
    assert_eq!(state.memory[0x200], 0x61);
    assert_eq!(state.memory[0x203], 0x00);
    assert_eq!(
        &state.memory[..CHIP8_CHARSET_LEN as usize],
        &CHIP8_CHARSET[..]
    );
}
