use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use tracing::debug;

/// Where typed lines come from.
pub trait LineSource {
    /// Blocks until the next line. `None` once input is closed.
    fn next_line(&mut self) -> Option<String>;

    /// Drops every line typed since the last read, returning how many were dropped.
    fn discard_pending(&mut self) -> usize;
}

/// Lines read on a background thread and queued in a channel as they are typed.
///
/// Keys pressed while the driver is sleeping through feedback or an
/// inter-trial interval sit in the queue until `discard_pending` clears them.
pub struct ChannelLines {
    rx: Receiver<String>,
}

impl ChannelLines {
    pub fn spawn<I: BufRead + Send + 'static>(input: I) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for line in input.lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
        Self { rx }
    }

    pub fn stdin() -> Self {
        Self::spawn(std::io::BufReader::new(std::io::stdin()))
    }

    #[cfg(test)]
    fn from_receiver(rx: Receiver<String>) -> Self {
        Self { rx }
    }
}

impl LineSource for ChannelLines {
    fn next_line(&mut self) -> Option<String> {
        self.rx.recv().ok()
    }

    fn discard_pending(&mut self) -> usize {
        let mut dropped = 0;
        loop {
            match self.rx.try_recv() {
                Ok(line) => {
                    debug!(line = %line.trim(), "dropped early input");
                    dropped += 1;
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return dropped,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn queued_lines_are_discarded_and_later_ones_kept() {
        let (tx, rx) = mpsc::channel();
        let mut lines = ChannelLines::from_receiver(rx);

        tx.send("1".to_string()).unwrap();
        tx.send("q".to_string()).unwrap();
        assert_eq!(lines.discard_pending(), 2);

        tx.send("2".to_string()).unwrap();
        assert_eq!(lines.next_line().as_deref(), Some("2"));

        drop(tx);
        assert_eq!(lines.discard_pending(), 0);
        assert_eq!(lines.next_line(), None);
    }

    #[test]
    fn reader_thread_forwards_lines_then_closes() {
        let mut lines = ChannelLines::spawn(Cursor::new(b"1\nk\n".to_vec()));
        assert_eq!(lines.next_line().as_deref(), Some("1"));
        assert_eq!(lines.next_line().as_deref(), Some("k"));
        assert_eq!(lines.next_line(), None);
    }
}
