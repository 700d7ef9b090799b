use std::{
    io::{self, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use console::Term;
use log::debug;

const BANNER_WIDTH: usize = 70;

const WELCOME: [&str; 21] = [
    "🌟 Welcome to Your Personal Health Management System! 🌟",
    "\nAbout Our Application:",
    "We help you maintain and improve your health through:",
    "\n🏥 Health Monitoring & Tracking",
    "   • Log your daily health metrics",
    "   • Monitor weight, blood pressure, and activity",
    "   • View your health history",
    "\n💪 Personalized Health Advice",
    "   • Get customized health tips",
    "   • Receive symptom-specific advice",
    "   • Access health recommendations",
    "\n👩‍⚕️ Contact a Doctor",
    "   • Connect with specialized doctors based on your needs",
    "   • Access doctor contact information and advice",
    "\n📊 Features Available:",
    "   • User Registration and Login",
    "   • Health Metrics Logging",
    "   • Health Tips and Advice",
    "   • Personal Health History",
    "   • Progress Tracking",
    "   • Contact a Doctor",
];

/// The welcome screen, typed out one character at a time.
/// Typing stops as soon as the skip flag is raised.
pub struct Intro {
    delay: Duration,
}

impl Intro {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Writes the intro to `out`, returning false if it was skipped
    pub fn play<W: Write>(&self, out: &mut W, skip: &AtomicBool) -> io::Result<bool> {
        writeln!(out, "\n{}", "═".repeat(BANNER_WIDTH))?;
        writeln!(out, "║{:^68}║", "COMMUNITY HEALTH TRACKER")?;
        writeln!(out, "{}\n", "═".repeat(BANNER_WIDTH))?;

        for line in WELCOME {
            if !self.type_line(out, line, skip)? {
                writeln!(out)?;
                return Ok(false);
            }
        }

        write!(out, "\nLoading your health companion")?;
        for _ in 0..3 {
            if skip.load(Ordering::Relaxed) {
                break;
            }

            out.flush()?;
            thread::sleep(self.dot_delay());
            write!(out, ".")?;
        }
        writeln!(out, "\n")?;
        out.flush()?;

        Ok(!skip.load(Ordering::Relaxed))
    }

    /// Each loading dot takes as long as sixteen typed characters
    fn dot_delay(&self) -> Duration {
        self.delay.saturating_mul(16)
    }

    fn type_line<W: Write>(&self, out: &mut W, line: &str, skip: &AtomicBool) -> io::Result<bool> {
        for c in line.chars() {
            if skip.load(Ordering::Relaxed) {
                return Ok(false);
            }

            write!(out, "{c}")?;
            out.flush()?;

            if !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
        }

        writeln!(out)?;
        Ok(true)
    }

    /// Plays the intro on the terminal. Any key skips it,
    /// otherwise it waits for a key press once done.
    pub fn run(&self, term: &Term) -> io::Result<()> {
        let skip = Arc::new(AtomicBool::new(false));

        let listener = {
            let skip = skip.clone();
            let term = term.clone();

            thread::spawn(move || {
                if let Err(e) = term.read_key() {
                    debug!("Intro key listener stopped: {}", e);
                }
                skip.store(true, Ordering::Relaxed);
            })
        };

        let mut out = term.clone();
        let completed = self.play(&mut out, &skip)?;

        if completed {
            term.write_str("Press any key to begin your health journey...")?;
        }

        // The listener ends on the first key press
        let _ = listener.join();
        term.write_line("")?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn plays_everything_when_not_skipped() {
        let intro = Intro::new(Duration::ZERO);
        let skip = AtomicBool::new(false);
        let mut out = Vec::new();

        let completed = intro.play(&mut out, &skip).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(completed);
        assert!(text.contains("COMMUNITY HEALTH TRACKER"));
        assert!(text.contains("Contact a Doctor"));
        assert!(text.contains("Loading your health companion..."));
    }

    #[test]
    fn huge_delays_do_not_overflow() {
        assert_eq!(Intro::new(Duration::MAX).dot_delay(), Duration::MAX);
        assert_eq!(
            Intro::new(Duration::from_millis(30)).dot_delay(),
            Duration::from_millis(480)
        );
    }

    #[test]
    fn stops_typing_once_skipped() {
        let intro = Intro::new(Duration::ZERO);
        let skip = AtomicBool::new(true);
        let mut out = Vec::new();

        let completed = intro.play(&mut out, &skip).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(!completed);
        assert!(text.contains("COMMUNITY HEALTH TRACKER"));
        assert!(!text.contains("Welcome to Your Personal"));
    }
}
