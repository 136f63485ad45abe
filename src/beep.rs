use crate::code::element_millis;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

/// Something that can sound a tone for a while.
pub trait Beeper {
    fn tone(&mut self, tone_hz: f64, duration: Duration) -> io::Result<()>;
    fn rest(&mut self, duration: Duration) -> io::Result<()>;
}

/// Rings the terminal bell for every tone and sleeps through it.
///
/// The bell has no pitch, so the frequency is only logged.
pub struct TerminalBeeper<W: Write> {
    out: W,
}

impl<W: Write> TerminalBeeper<W> {
    pub fn new(out: W) -> TerminalBeeper<W> {
        TerminalBeeper { out }
    }
}

impl<W: Write> Beeper for TerminalBeeper<W> {
    fn tone(&mut self, tone_hz: f64, duration: Duration) -> io::Result<()> {
        log::trace!("beep {tone_hz} Hz for {duration:?}");
        self.out.write_all(b"\x07")?;
        self.out.flush()?;
        thread::sleep(duration);
        Ok(())
    }

    fn rest(&mut self, duration: Duration) -> io::Result<()> {
        thread::sleep(duration);
        Ok(())
    }
}

/// Key dot/dash morse on a beeper: one element per dit, three per dah and
/// three and a half of silence per space.
pub fn play<B: Beeper>(morse: &str, tone_hz: f64, wpm: f64, beeper: &mut B) -> io::Result<()> {
    let element = element_millis(wpm);
    let millis = |units: f64| Duration::from_micros((units * element * 1000.).round() as u64);
    for c in morse.chars() {
        match c {
            '.' => beeper.tone(tone_hz, millis(1.))?,
            '-' => beeper.tone(tone_hz, millis(3.))?,
            ' ' => beeper.rest(millis(3.5))?,
            _ => {}
        }
    }
    Ok(())
}
