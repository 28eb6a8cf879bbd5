/// CHIP-8 constants.
mod constants;
/// Cursive display output.
pub mod cursive_display;
/// Decoding of opcodes and their execution.
mod opcodes;
/// Convenience functions for modification of the CHIP-8 state.
mod util;

#[cfg(test)]
mod tests;

use std::fs;
use std::fs::File;
use std::io::Read;

use crate::chip::{
    chip8::constants::{
        CHIP8_CHARSET, CHIP8_CHARSET_LEN, CHIP8_CHARSET_OFFSET, CHIP8_DISPLAY_HEIGHT,
        CHIP8_DISPLAY_WIDTH, CHIP8_MAX_PROGRAM_SIZE, CHIP8_MEMORY_SIZE, CHIP8_PROGRAM_OFFSET,
    },
    chip8::opcodes::Instruction,
    Chip, LoadProgramError, Step, StepError,
};

/// Represents the state of the CHIP-8.
pub struct Chip8 {
    /// 4096 bytes of main memory
    memory: [u8; CHIP8_MEMORY_SIZE],

    /// 16 registers where each can store one byte
    registers: [u8; 16],

    /// An index register
    index: u16,

    /// A program counter
    program_counter: u16,

    /// The output pins. Note that those are usually directly wired
    /// up to the pixels of the display. However, given that this implementation
    /// considers a display as optional, we refer to them as output_pins for
    /// the sake of generality.
    output_pins: [bool; CHIP8_DISPLAY_WIDTH * CHIP8_DISPLAY_HEIGHT],

    /// The delay timer. Decremented on every `tick_timers` call while nonzero.
    delay_timer: u8,

    /// The sound timer. Decremented on every `tick_timers` call while nonzero.
    /// An audio collaborator should produce a tone while it is nonzero.
    sound_timer: u8,

    /// The input pins. Note that those input pins are usually directly wired
    /// up to the keys. However, we do not prescribe how this is handled and
    /// hence refer to them as input pins rather than as keys.
    input_pins: [bool; 16],

    /// A stack. Note that there are no instructions allowing to modify the
    /// stack and it is only used to store return addresses for the return
    /// opcode.
    stack: [u16; 16],

    /// A pointer, pointing to the current position in the stack.
    stack_pointer: u8,

    /// A copy of the last successfully loaded program. Replayed into memory
    /// on `reset` so that a reset restarts the program.
    program: Vec<u8>,

    /// A flag that indicates whether the output pins changed since it
    /// was last set to false.
    draw: bool,
}

impl Chip for Chip8 {
    /// The CHIP-8's pins can actually be addressed by using just half a byte.
    /// However, we use a whole byte here and assert whether it is in the right
    /// range, because it is more convenient to handle.
    type PinAddress = u8;

    fn reset(&mut self) {
        self.memory = [0; CHIP8_MEMORY_SIZE];
        for i in 0..CHIP8_CHARSET_LEN {
            self.memory[(i + CHIP8_CHARSET_OFFSET) as usize] = CHIP8_CHARSET[i as usize];
        }

        self.registers = [0; 16];
        self.index = 0;
        self.program_counter = CHIP8_PROGRAM_OFFSET;
        self.output_pins = [false; CHIP8_DISPLAY_WIDTH * CHIP8_DISPLAY_HEIGHT];
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.input_pins = [false; 16];
        self.stack = [0; 16];
        self.stack_pointer = 0;
        self.draw = false;

        for i in 0..self.program.len() {
            self.memory[CHIP8_PROGRAM_OFFSET as usize + i] = self.program[i];
        }
    }

    fn load_program(&mut self, program: &[u8]) -> Result<(), LoadProgramError> {
        if program.len() > CHIP8_MAX_PROGRAM_SIZE {
            return Err(LoadProgramError::ProgramTooLarge(program.len()));
        }

        self.program = program.to_vec();
        for i in 0..program.len() {
            self.memory[CHIP8_PROGRAM_OFFSET as usize + i] = program[i];
        }

        Ok(())
    }

    /// Executes one fetch-decode-execute cycle. An opcode that does not decode
    /// to one of the defined instructions is reported as `UnknownOpcode` and
    /// leaves all state, including the program counter, unchanged; advancing
    /// past it would mask a corrupted program.
    fn step(&mut self) -> Result<Step, StepError> {
        let word = self.next_instruction_word();
        let instruction =
            Instruction::decode(word).ok_or(StepError::UnknownOpcode(word))?;
        instruction.execute(self)
    }

    fn tick_timers(&mut self) {
        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }

        if self.sound_timer > 0 {
            self.sound_timer -= 1;
        }
    }

    fn read_output_pins(&self) -> &[bool] {
        &self.output_pins
    }

    fn take_redraw(&mut self) -> bool {
        let redraw = self.draw;
        self.draw = false;
        redraw
    }

    fn sound_active(&self) -> bool {
        self.sound_timer > 0
    }

    fn set_input_pin(&mut self, pin: u8, value: bool) {
        assert!(pin & 0x0F == pin);
        self.input_pins[pin as usize] = value;
    }

    fn reset_input_pins(&mut self) {
        for i in 0..16 {
            self.input_pins[i] = false;
        }
    }
}

impl Chip8 {
    /// Constructs a new CHIP-8 and appropriately initializes all fields so that
    /// it is ready for the first execution cycle. Essentially this means that
    /// the program counter is set to `CHIP8_PROGRAM_OFFSET` and the default
    /// CHIP-8 charset is loaded at memory address `CHIP8_CHARSET_OFFSET`. Note
    /// that no program is loaded upon initialization.
    pub fn new() -> Self {
        let mut chip8 = Chip8 {
            memory: [0; CHIP8_MEMORY_SIZE],
            registers: [0; 16],
            index: 0,
            program_counter: CHIP8_PROGRAM_OFFSET,
            output_pins: [false; CHIP8_DISPLAY_WIDTH * CHIP8_DISPLAY_HEIGHT],
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; 16],
            stack_pointer: 0,
            input_pins: [false; 16],
            program: Vec::new(),
            draw: false,
        };
        chip8.reset();
        chip8
    }

    /// Convenience method to load a program from a file.
    pub fn load_program_file(&mut self, path: &str) -> Result<usize, LoadProgramError> {
        let mut file =
            File::open(path).map_err(|_| LoadProgramError::CouldNotOpenFile(path.to_string()))?;
        let md = fs::metadata(path)
            .map_err(|_| LoadProgramError::CouldNotReadMetadata(path.to_string()))?;
        let mut buffer = vec![0; md.len() as usize];
        file.read(&mut buffer)
            .map_err(|_| LoadProgramError::CouldNotReadFile(path.to_string()))?;

        self.load_program(&buffer)?;

        Ok(buffer.len())
    }

    /// Returns the state of the pixel at (x, y), for x in [0, 64) and
    /// y in [0, 32).
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        assert!(x < CHIP8_DISPLAY_WIDTH && y < CHIP8_DISPLAY_HEIGHT);
        self.output_pins[x + CHIP8_DISPLAY_WIDTH * y]
    }

    /// Fetches the next instruction word based on the current state of
    /// self.program_counter. Opcodes are two bytes long and stored big-endian.
    /// A program counter at the edge of the address space reads around the
    /// wrap, the same policy `set_memory_byte` applies to writes; whatever is
    /// fetched there still decodes or fails like any other word.
    fn next_instruction_word(&self) -> u16 {
        let high = self.program_counter % CHIP8_MEMORY_SIZE as u16;
        let low = high.wrapping_add(1) % CHIP8_MEMORY_SIZE as u16;
        (self.memory[high as usize] as u16) << 8 | self.memory[low as usize] as u16
    }

    /// Sets a memory byte. Writes addressed at the charset region are
    /// dropped, so the built-in glyphs survive program execution; writes
    /// beyond the address space wrap around.
    fn set_memory_byte(&mut self, byte: u8, index: u16) {
        let index = index % CHIP8_MEMORY_SIZE as u16;
        if index < CHIP8_CHARSET_OFFSET + CHIP8_CHARSET_LEN {
            return;
        }
        self.memory[index as usize] = byte;
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Chip8::new()
    }
}
