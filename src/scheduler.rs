//! Drives a chip at a configurable instruction rate, decoupled from the
//! fixed 60 Hz timer and render cadences. The scheduler is the single owner
//! of the chip; collaborators reach the framebuffer, keypad and sound state
//! through its pass-throughs rather than by aliasing the core's internals.

use std::time::Instant;

use crate::chip::{Chip, Step, StepError};

/// Converts wall-clock time into executed instructions. On every call to
/// `run_due_cycles` it computes how many cycles should have been executed
/// since the time origin and steps the chip until the executed-cycle counter
/// catches up. While paused the counter is advanced without stepping, so
/// emulated time freezes and unpausing does not replay the missed cycles.
pub struct Scheduler<T> {
    chip: T,

    /// Instructions to execute per second. A clock speed of zero halts the
    /// instruction clock without pausing the timers.
    clock_speed: u64,

    /// The wall-clock instant cycle accounting is measured from. Re-based
    /// whenever the clock speed changes.
    origin: Instant,

    /// The number of cycles executed (or skipped while paused) since the
    /// origin.
    cycles: u64,

    paused: bool,
}

impl<T: Chip> Scheduler<T> {
    pub fn new(chip: T, clock_speed: u64) -> Self {
        Scheduler {
            chip,
            clock_speed,
            origin: Instant::now(),
            cycles: 0,
            paused: false,
        }
    }

    /// Steps the chip until the executed-cycle counter reaches the count due
    /// by now. Every `step` attempt counts as one cycle, including key-wait
    /// retries, so a program blocked on input does not stall the clock. A
    /// step error aborts the burst and is passed on to the caller.
    pub fn run_due_cycles(&mut self) -> Result<(), StepError> {
        let target = self.target_cycles();
        if self.paused {
            self.cycles = target;
            return Ok(());
        }

        while self.cycles < target {
            self.chip.step()?;
            self.cycles += 1;
        }

        Ok(())
    }

    /// Executes a single cycle regardless of the clock, for stepping through
    /// a program while paused.
    pub fn step_once(&mut self) -> Result<Step, StepError> {
        let outcome = self.chip.step()?;
        self.cycles += 1;
        Ok(outcome)
    }

    /// Forwards a 60 Hz tick to the chip's timers and samples the sound
    /// timer for the audio collaborator. Must not be called more than once
    /// per 1/60 s interval.
    pub fn tick_timers(&mut self) -> bool {
        self.chip.tick_timers();
        self.chip.sound_active()
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn clock_speed(&self) -> u64 {
        self.clock_speed
    }

    /// Changes the instruction rate from now on. The time origin is re-based
    /// so that already-elapsed time is not re-priced at the new rate.
    pub fn set_clock_speed(&mut self, clock_speed: u64) {
        self.origin = Instant::now();
        self.cycles = 0;
        self.clock_speed = clock_speed;
    }

    /// Resets the chip, restarts cycle accounting from now and resumes a
    /// paused clock.
    pub fn reset(&mut self) {
        self.chip.reset();
        self.origin = Instant::now();
        self.cycles = 0;
        self.paused = false;
    }

    pub fn take_redraw(&mut self) -> bool {
        self.chip.take_redraw()
    }

    pub fn read_output_pins(&self) -> &[bool] {
        self.chip.read_output_pins()
    }

    pub fn set_input_pin(&mut self, pin: T::PinAddress, value: bool) {
        self.chip.set_input_pin(pin, value);
    }

    pub fn reset_input_pins(&mut self) {
        self.chip.reset_input_pins();
    }

    pub fn chip(&self) -> &T {
        &self.chip
    }

    pub fn chip_mut(&mut self) -> &mut T {
        &mut self.chip
    }

    fn target_cycles(&self) -> u64 {
        (self.origin.elapsed().as_secs_f64() * self.clock_speed as f64) as u64
    }
}
