mod arithmetic_and_logic;
mod program_flow;
mod system;

use crate::chip::{chip8::Chip8, Step, StepError};

/// A decoded CHIP-8 instruction. An opcode is two bytes long; the most
/// significant nibble selects the instruction class and, for the 0x0, 0x8,
/// 0xE and 0xF classes, a secondary nibble or byte selects the instruction
/// within the class. Each variant carries only the operand fields its
/// semantics need: register indices (X, Y), an address (NNN), a byte
/// immediate (NN) or a nibble immediate (N).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Instruction {
    /// 00E0: clear the screen.
    ClearScreen,
    /// 00EE: return from a subroutine.
    Return,
    /// 1NNN: jump to NNN.
    Jump { address: u16 },
    /// 2NNN: call the subroutine at NNN.
    Call { address: u16 },
    /// 3XNN: skip the next instruction if VX equals NN.
    SkipIfEqual { x: u8, value: u8 },
    /// 4XNN: skip the next instruction if VX does not equal NN.
    SkipIfNotEqual { x: u8, value: u8 },
    /// 5XY0: skip the next instruction if VX equals VY.
    SkipIfRegistersEqual { x: u8, y: u8 },
    /// 6XNN: set VX to NN.
    LoadValue { x: u8, value: u8 },
    /// 7XNN: add NN to VX without touching the carry flag.
    AddValue { x: u8, value: u8 },
    /// 8XY0: set VX to VY.
    Copy { x: u8, y: u8 },
    /// 8XY1: set VX to VX | VY.
    Or { x: u8, y: u8 },
    /// 8XY2: set VX to VX & VY.
    And { x: u8, y: u8 },
    /// 8XY3: set VX to VX ^ VY.
    Xor { x: u8, y: u8 },
    /// 8XY4: add VY to VX, VF becomes 1 on carry and 0 otherwise.
    Add { x: u8, y: u8 },
    /// 8XY5: subtract VY from VX, VF becomes 0 on borrow and 1 otherwise.
    Sub { x: u8, y: u8 },
    /// 8XY6: shift VX right by one, VF receives the shifted-out bit.
    ShiftRight { x: u8 },
    /// 8XY7: set VX to VY - VX, VF becomes 0 on borrow and 1 otherwise.
    SubReversed { x: u8, y: u8 },
    /// 8XYE: shift VX left by one, VF receives the shifted-out bit.
    ShiftLeft { x: u8 },
    /// 9XY0: skip the next instruction if VX does not equal VY.
    SkipIfRegistersNotEqual { x: u8, y: u8 },
    /// ANNN: set the index register to NNN.
    LoadIndex { address: u16 },
    /// BNNN: jump to NNN + V0.
    JumpWithOffset { address: u16 },
    /// CXNN: set VX to a random byte masked with NN.
    Random { x: u8, mask: u8 },
    /// DXYN: draw an N-row sprite from memory[I] at (VX, VY).
    Draw { x: u8, y: u8, rows: u8 },
    /// EX9E: skip the next instruction if the key in VX is pressed.
    SkipIfPressed { x: u8 },
    /// EXA1: skip the next instruction if the key in VX is not pressed.
    SkipIfNotPressed { x: u8 },
    /// FX07: set VX to the delay timer.
    ReadDelayTimer { x: u8 },
    /// FX0A: wait for any key press and store its index in VX.
    WaitForKey { x: u8 },
    /// FX15: set the delay timer to VX.
    SetDelayTimer { x: u8 },
    /// FX18: set the sound timer to VX.
    SetSoundTimer { x: u8 },
    /// FX1E: add VX to the index register, VF flags overflow past 0xFFF.
    AddToIndex { x: u8 },
    /// FX29: set the index register to the charset glyph for VX.
    LoadGlyphAddress { x: u8 },
    /// FX33: store VX as three decimal digits at memory[I..=I+2].
    StoreBcd { x: u8 },
    /// FX55: store V0..=VX at memory[I..], I unchanged.
    StoreRegisters { x: u8 },
    /// FX65: load V0..=VX from memory[I..], I unchanged.
    LoadRegisters { x: u8 },
}

impl Instruction {
    /// Decodes an instruction word, or `None` if it does not map to any
    /// defined instruction.
    pub(super) fn decode(word: u16) -> Option<Instruction> {
        let x = ((word >> 8) & 0xF) as u8;
        let y = ((word >> 4) & 0xF) as u8;
        let n = (word & 0xF) as u8;
        let nn = (word & 0xFF) as u8;
        let nnn = word & 0xFFF;

        match word >> 12 {
            // The 0NNN machine call family is not interpreted; only the
            // clear and return instructions live in this class.
            0x0 => match word {
                0x00E0 => Some(Instruction::ClearScreen),
                0x00EE => Some(Instruction::Return),
                _ => None,
            },
            0x1 => Some(Instruction::Jump { address: nnn }),
            0x2 => Some(Instruction::Call { address: nnn }),
            0x3 => Some(Instruction::SkipIfEqual { x, value: nn }),
            0x4 => Some(Instruction::SkipIfNotEqual { x, value: nn }),
            0x5 if n == 0x0 => Some(Instruction::SkipIfRegistersEqual { x, y }),
            0x6 => Some(Instruction::LoadValue { x, value: nn }),
            0x7 => Some(Instruction::AddValue { x, value: nn }),
            0x8 => match n {
                0x0 => Some(Instruction::Copy { x, y }),
                0x1 => Some(Instruction::Or { x, y }),
                0x2 => Some(Instruction::And { x, y }),
                0x3 => Some(Instruction::Xor { x, y }),
                0x4 => Some(Instruction::Add { x, y }),
                0x5 => Some(Instruction::Sub { x, y }),
                0x6 => Some(Instruction::ShiftRight { x }),
                0x7 => Some(Instruction::SubReversed { x, y }),
                0xE => Some(Instruction::ShiftLeft { x }),
                _ => None,
            },
            0x9 if n == 0x0 => Some(Instruction::SkipIfRegistersNotEqual { x, y }),
            0xA => Some(Instruction::LoadIndex { address: nnn }),
            0xB => Some(Instruction::JumpWithOffset { address: nnn }),
            0xC => Some(Instruction::Random { x, mask: nn }),
            0xD => Some(Instruction::Draw { x, y, rows: n }),
            0xE => match nn {
                0x9E => Some(Instruction::SkipIfPressed { x }),
                0xA1 => Some(Instruction::SkipIfNotPressed { x }),
                _ => None,
            },
            0xF => match nn {
                0x07 => Some(Instruction::ReadDelayTimer { x }),
                0x0A => Some(Instruction::WaitForKey { x }),
                0x15 => Some(Instruction::SetDelayTimer { x }),
                0x18 => Some(Instruction::SetSoundTimer { x }),
                0x1E => Some(Instruction::AddToIndex { x }),
                0x29 => Some(Instruction::LoadGlyphAddress { x }),
                0x33 => Some(Instruction::StoreBcd { x }),
                0x55 => Some(Instruction::StoreRegisters { x }),
                0x65 => Some(Instruction::LoadRegisters { x }),
                _ => None,
            },
            _ => None,
        }
    }

    /// Executes `self` relative to the given state. Note that this method
    /// will in-place modify the given state.
    pub(super) fn execute(self, state: &mut Chip8) -> Result<Step, StepError> {
        match self {
            Instruction::ClearScreen => Ok(system::clear_screen(state)),
            Instruction::Return => program_flow::ret(state),
            Instruction::Jump { address } => Ok(program_flow::jump(state, address)),
            Instruction::Call { address } => program_flow::call(state, address),
            Instruction::SkipIfEqual { x, value } => {
                Ok(program_flow::skip_if_equal(state, x, value))
            }
            Instruction::SkipIfNotEqual { x, value } => {
                Ok(program_flow::skip_if_not_equal(state, x, value))
            }
            Instruction::SkipIfRegistersEqual { x, y } => {
                Ok(program_flow::skip_if_registers_equal(state, x, y))
            }
            Instruction::LoadValue { x, value } => {
                Ok(arithmetic_and_logic::load_value(state, x, value))
            }
            Instruction::AddValue { x, value } => {
                Ok(arithmetic_and_logic::add_value(state, x, value))
            }
            Instruction::Copy { x, y } => Ok(arithmetic_and_logic::copy(state, x, y)),
            Instruction::Or { x, y } => Ok(arithmetic_and_logic::or(state, x, y)),
            Instruction::And { x, y } => Ok(arithmetic_and_logic::and(state, x, y)),
            Instruction::Xor { x, y } => Ok(arithmetic_and_logic::xor(state, x, y)),
            Instruction::Add { x, y } => Ok(arithmetic_and_logic::add(state, x, y)),
            Instruction::Sub { x, y } => Ok(arithmetic_and_logic::sub(state, x, y)),
            Instruction::ShiftRight { x } => Ok(arithmetic_and_logic::shift_right(state, x)),
            Instruction::SubReversed { x, y } => {
                Ok(arithmetic_and_logic::sub_reversed(state, x, y))
            }
            Instruction::ShiftLeft { x } => Ok(arithmetic_and_logic::shift_left(state, x)),
            Instruction::SkipIfRegistersNotEqual { x, y } => {
                Ok(program_flow::skip_if_registers_not_equal(state, x, y))
            }
            Instruction::LoadIndex { address } => {
                Ok(arithmetic_and_logic::load_index(state, address))
            }
            Instruction::JumpWithOffset { address } => {
                Ok(program_flow::jump_with_offset(state, address))
            }
            Instruction::Random { x, mask } => Ok(arithmetic_and_logic::random(state, x, mask)),
            Instruction::Draw { x, y, rows } => Ok(arithmetic_and_logic::draw(state, x, y, rows)),
            Instruction::SkipIfPressed { x } => Ok(program_flow::skip_if_pressed(state, x)),
            Instruction::SkipIfNotPressed { x } => {
                Ok(program_flow::skip_if_not_pressed(state, x))
            }
            Instruction::ReadDelayTimer { x } => {
                Ok(arithmetic_and_logic::read_delay_timer(state, x))
            }
            Instruction::WaitForKey { x } => Ok(program_flow::wait_for_key(state, x)),
            Instruction::SetDelayTimer { x } => {
                Ok(arithmetic_and_logic::set_delay_timer(state, x))
            }
            Instruction::SetSoundTimer { x } => {
                Ok(arithmetic_and_logic::set_sound_timer(state, x))
            }
            Instruction::AddToIndex { x } => Ok(arithmetic_and_logic::add_to_index(state, x)),
            Instruction::LoadGlyphAddress { x } => {
                Ok(arithmetic_and_logic::load_glyph_address(state, x))
            }
            Instruction::StoreBcd { x } => Ok(arithmetic_and_logic::store_bcd(state, x)),
            Instruction::StoreRegisters { x } => {
                Ok(arithmetic_and_logic::store_registers(state, x))
            }
            Instruction::LoadRegisters { x } => {
                Ok(arithmetic_and_logic::load_registers(state, x))
            }
        }
    }
}
