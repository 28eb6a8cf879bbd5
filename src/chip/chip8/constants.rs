/// Size of the main memory in bytes.
pub const CHIP8_MEMORY_SIZE: usize = 4096;

/// Width of the display in pixels.
pub const CHIP8_DISPLAY_WIDTH: usize = 64;

/// Height of the display in pixels.
pub const CHIP8_DISPLAY_HEIGHT: usize = 32;

/// Memory address at which programs are loaded and execution starts.
pub const CHIP8_PROGRAM_OFFSET: u16 = 0x200;

/// Maximum size of a program in bytes. Programs occupy memory from
/// `CHIP8_PROGRAM_OFFSET` up to the end of the address space.
pub const CHIP8_MAX_PROGRAM_SIZE: usize = CHIP8_MEMORY_SIZE - CHIP8_PROGRAM_OFFSET as usize;

/// Memory address at which the built-in charset is loaded.
pub const CHIP8_CHARSET_OFFSET: u16 = 0x000;

/// Length of the built-in charset in bytes.
pub const CHIP8_CHARSET_LEN: u16 = 80;

/// Size of a single charset glyph in bytes.
pub const CHIP8_GLYPH_SIZE: u16 = 5;

/// Maximum depth of the call stack.
pub const CHIP8_STACK_DEPTH: u8 = 16;

/// The built-in charset. One 4x5 pixel glyph per hexadecimal digit,
/// encoded as 5 bytes per glyph with one row per byte.
pub const CHIP8_CHARSET: [u8; CHIP8_CHARSET_LEN as usize] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
