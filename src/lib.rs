//! An implementation of a CHIP-8 virtual machine. The interpreter follows the
//! instruction set described [here](https://en.wikipedia.org/wiki/CHIP-8#Opcode_table).
//! The interpreter core is a pure state transition; presentation, input and
//! audio collaborators talk to it through the `Chip` trait, and the cycle
//! scheduler drives it at a configurable instruction rate decoupled from the
//! 60 Hz timer cadence. For graphical output the bundled front end relies on
//! the cursive text user interface library.
pub mod chip;
pub mod scheduler;
