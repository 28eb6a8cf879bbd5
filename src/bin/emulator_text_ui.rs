use crossbeam_channel::{bounded, Receiver, Sender};
use cursive::CbSink;
use std::env;
use std::time::{Duration, Instant};

use chip8_vm::chip::{
    chip8::cursive_display::Display, chip8::Chip8, Chip, ChipWithCursiveDisplay, LoadProgramError,
};
use chip8_vm::scheduler::Scheduler;

/// The default instruction rate in instructions per second.
const DEFAULT_CLOCK_SPEED: u64 = 700;

/// The increment applied by the speed-up and slow-down keys.
const CLOCK_SPEED_STEP: u64 = 100;

/// The interval between two timer ticks (60 Hz).
const TIMER_INTERVAL: Duration = Duration::from_nanos(1_000_000_000 / 60);

/// Error type for errors that occur during parsing the command line arguments
/// and loading the program based on the arguments.
enum Error {
    InvalidUsage(String),
    InvalidProgram(LoadProgramError),
}

/// Represents an event to be processed by the event loop. It is generic
/// over the type representing the pressed key.
enum Event<T> {
    /// Occurs when the key passed in the enum value was pressed.
    Key(T),

    /// Indicates that all keys are released. Note that this is a
    /// hack because OS X currently requires extra permissions to
    /// listen to key down/up events. To get around this we simply
    /// read the stdin (indirectly via registering for cursive
    /// events) and assign one key to trigger releasing all keys.
    KeyRelease,

    /// Resets the machine, restarting the loaded program.
    Reset,

    /// Pauses or resumes the instruction clock.
    TogglePause,

    /// Executes a single cycle while paused.
    StepOnce,

    /// Raises the instruction clock rate.
    SpeedUp,

    /// Lowers the instruction clock rate.
    SlowDown,

    /// Shut down.
    Quit,
}

/// Represents the channels available to the event loop. It is generic
/// over the type representing the pressed keys.
#[derive(Clone)]
struct EventLoopChannels<T> {
    /// The channel to send the UI refresh messages to.
    gfx_sender: CbSink,

    /// The channel on which the Events are received.
    key_receiver: Receiver<Event<T>>,

    /// A channel to report that the thread has completed
    /// shutdown.
    shutdown_sender: Sender<()>,
}

/// The event loop. Constantly loops over (1) process event if there
/// is any. (2) Run the cycles due by now. (3) Tick the timers if 1/60 s
/// passed. (4) Update the UI. (5) Sleep briefly. (6) Start over.
fn event_loop<T, P>(mut scheduler: Scheduler<T>, io_channels: EventLoopChannels<P>)
where
    T: Chip<PinAddress = P> + ChipWithCursiveDisplay,
{
    let mut last_tick = Instant::now();
    loop {
        match io_channels.key_receiver.try_recv() {
            Ok(Event::Key(key)) => {
                scheduler.set_input_pin(key, true);
            }
            Ok(Event::KeyRelease) => {
                scheduler.reset_input_pins();
            }
            Ok(Event::Reset) => {
                scheduler.reset();
            }
            Ok(Event::TogglePause) => {
                if scheduler.is_paused() {
                    scheduler.resume();
                } else {
                    scheduler.pause();
                }
            }
            Ok(Event::StepOnce) => {
                if scheduler.is_paused() {
                    // A failing instruction keeps the machine paused; the
                    // user can still quit or reset.
                    let _ = scheduler.step_once();
                }
            }
            Ok(Event::SpeedUp) => {
                let clock_speed = scheduler.clock_speed() + CLOCK_SPEED_STEP;
                scheduler.set_clock_speed(clock_speed);
            }
            Ok(Event::SlowDown) => {
                let clock_speed = scheduler.clock_speed().saturating_sub(CLOCK_SPEED_STEP);
                scheduler.set_clock_speed(clock_speed);
            }
            Ok(Event::Quit) => {
                io_channels
                    .shutdown_sender
                    .send(())
                    .expect("Failed to orderly shutdown.");
                return;
            }
            Err(_) => { /* do nothing */ }
        };

        if scheduler.run_due_cycles().is_err() {
            // An unknown opcode or a stack fault leaves the machine in a
            // state not worth continuing from; freeze it instead of
            // spinning on the same fault.
            scheduler.pause();
        }

        if last_tick.elapsed() >= TIMER_INTERVAL {
            // An audio collaborator would sample the returned sound state
            // here; the text UI has no tone to offer.
            let _sound_active = scheduler.tick_timers();
            last_tick += TIMER_INTERVAL;
        }

        scheduler.chip_mut().update_ui(&io_channels.gfx_sender);

        std::thread::sleep(Duration::from_millis(1));
    }
}

/// Loads a program based on the given arguments. The first argument is
/// interpreted as the path to the program, the optional second argument as
/// the instruction clock rate in instructions per second.
fn load_from_args(chip8: &mut Chip8) -> Result<u64, Error> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(Error::InvalidUsage(
            "Expecting path to the program to load as command line argument, \
             optionally followed by the clock speed in instructions per second."
                .to_string(),
        ));
    }

    chip8
        .load_program_file(&args[1])
        .map_err(Error::InvalidProgram)?;

    match args.get(2) {
        Some(arg) => arg.parse::<u64>().map_err(|_| {
            Error::InvalidUsage(format!("Invalid clock speed: {}.", arg))
        }),
        None => Ok(DEFAULT_CLOCK_SPEED),
    }
}

/// Constructs the UI and spawns the event loop and the UI thread.
fn main() {
    let mut chip8 = Chip8::new();

    let clock_speed = match load_from_args(&mut chip8) {
        Ok(clock_speed) => clock_speed,
        Err(e) => {
            println!("{}", e);
            return;
        }
    };

    let scheduler = Scheduler::new(chip8, clock_speed);

    let mut siv = cursive::default();

    let cb_sink = siv.cb_sink().clone();
    let (key_sender, key_receiver) = bounded::<Event<u8>>(10);
    let (shutdown_sender, shutdown_receiver) = bounded::<()>(1);

    std::thread::spawn(move || {
        event_loop(
            scheduler,
            EventLoopChannels {
                gfx_sender: cb_sink,
                key_receiver,
                shutdown_sender,
            },
        );
    });

    let sender = key_sender.clone();
    siv.add_global_callback(cursive::event::Key::Esc, move |s| {
        sender.send(Event::Quit).unwrap();
        shutdown_receiver.recv().expect("Orderly shutdown failed");
        s.quit();
    });

    for (i, j) in &[
        ('1', 0x1),
        ('2', 0x2),
        ('3', 0x3),
        ('4', 0xC),
        ('q', 0x4),
        ('w', 0x5),
        ('e', 0x6),
        ('r', 0xD),
        ('a', 0x7),
        ('s', 0x8),
        ('d', 0x9),
        ('f', 0xE),
        ('z', 0xA),
        ('x', 0x0),
        ('c', 0xB),
        ('v', 0xF),
    ] {
        let sender = key_sender.clone();
        siv.add_global_callback(*i, move |_s| {
            sender.send(Event::Key(*j as u8)).unwrap();
        });
    }

    let sender = key_sender.clone();
    siv.add_global_callback(' ', move |_s| {
        sender.send(Event::KeyRelease).unwrap();
    });

    let sender = key_sender.clone();
    siv.add_global_callback(cursive::event::Key::Backspace, move |_s| {
        sender.send(Event::Reset).unwrap();
    });

    let sender = key_sender.clone();
    siv.add_global_callback('p', move |_s| {
        sender.send(Event::TogglePause).unwrap();
    });

    let sender = key_sender.clone();
    siv.add_global_callback('n', move |_s| {
        sender.send(Event::StepOnce).unwrap();
    });

    let sender = key_sender.clone();
    siv.add_global_callback(cursive::event::Key::Up, move |_s| {
        sender.send(Event::SpeedUp).unwrap();
    });

    let sender = key_sender.clone();
    siv.add_global_callback(cursive::event::Key::Down, move |_s| {
        sender.send(Event::SlowDown).unwrap();
    });

    siv.add_layer(Display::default());

    siv.run();
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::InvalidUsage(message) => write!(f, "Usage: {}", message),
            Error::InvalidProgram(error) => write!(f, "{}", error),
        }
    }
}
