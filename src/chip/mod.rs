pub mod chip8;

use cursive::CbSink;
use thiserror::Error;

/// Captures errors that occur while loading a program into a chip.
#[derive(Debug, Error, PartialEq)]
pub enum LoadProgramError {
    #[error("Could not open file {0}.")]
    CouldNotOpenFile(String),

    #[error("Could not read metadata of file {0}.")]
    CouldNotReadMetadata(String),

    #[error("Could not read file {0}.")]
    CouldNotReadFile(String),

    #[error("Program of {0} bytes is too large to fit into memory.")]
    ProgramTooLarge(usize),
}

/// Captures errors that occur while executing a single instruction. An
/// `UnknownOpcode` is recoverable; the machine state is left untouched and
/// the caller decides whether to halt, skip or log. The stack errors leave
/// the machine state untouched as well, but continuing past them would run
/// with an undefined call stack, so callers should halt or reset.
#[derive(Debug, Error, PartialEq)]
pub enum StepError {
    #[error("Unknown opcode: {0:#06X}.")]
    UnknownOpcode(u16),

    #[error("Call exceeds the maximum stack depth.")]
    StackOverflow,

    #[error("Return with an empty call stack.")]
    StackUnderflow,
}

/// The outcome of a successfully executed step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// The instruction completed and the program counter moved on.
    Advanced,

    /// The key-wait instruction found no key pressed. The program counter
    /// is unchanged and the caller must invoke `step` again. Control always
    /// returns to the caller between attempts; the chip never busy-loops.
    WaitingForKey,
}

/// The seam between the interpreter core and its collaborators. The core
/// only ever mutates its own state in `reset`, `load_program`, `step` and
/// `tick_timers`; everything else is a read or an input-pin write performed
/// on behalf of a collaborator.
pub trait Chip {
    /// Type for addressing input pins.
    type PinAddress;

    /// Restores the power-on state: memory cleared except for the built-in
    /// font, program counter at the program start address, everything else
    /// zeroed. A previously loaded program is loaded again.
    fn reset(&mut self);

    /// Loads a program into memory at the program start address.
    fn load_program(&mut self, program: &[u8]) -> Result<(), LoadProgramError>;

    /// Executes one fetch-decode-execute cycle.
    fn step(&mut self) -> Result<Step, StepError>;

    /// Decrements the delay and sound timers if nonzero. Must be called at
    /// 60 Hz, independently of the instruction rate.
    fn tick_timers(&mut self);

    /// The display collaborator reads the framebuffer through this.
    fn read_output_pins(&self) -> &[bool];

    /// Returns whether the framebuffer changed since the last call, and
    /// clears the flag.
    fn take_redraw(&mut self) -> bool;

    /// Whether the sound timer is nonzero. The audio collaborator samples
    /// this once per timer tick; the chip does not synthesize audio.
    fn sound_active(&self) -> bool;

    fn set_input_pin(&mut self, pin: Self::PinAddress, value: bool);

    fn reset_input_pins(&mut self);
}

/// A chip whose framebuffer can be presented through a cursive UI.
pub trait ChipWithCursiveDisplay {
    /// Pushes the current framebuffer to the UI thread if a redraw is due.
    fn update_ui(&mut self, gfx_sink: &CbSink);
}
