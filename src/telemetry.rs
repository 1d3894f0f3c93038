//! Recording of raw and filtered angles for offline analysis.
//!
//! Rows are written as comma-separated values by a background thread. Recording never blocks the
//! caller: when the writer falls behind and its queue is full, rows are dropped.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    panic::resume_unwind,
    path::Path,
    thread::{self, JoinHandle},
    time::Duration,
};

use crossbeam::channel::{self, Sender, TrySendError};

/// First line of every telemetry file.
pub const HEADER: &str = "timestamp,raw_angle,filtered_angle,alpha";

/// One processed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryRecord {
    pub timestamp: Duration,
    /// `None` if the frame had no usable hand.
    pub raw_angle: Option<f32>,
    /// `None` until the first usable hand was seen.
    pub filtered_angle: Option<f32>,
    pub alpha: f32,
}

impl TelemetryRecord {
    /// Writes the record as one CSV row, terminated by a newline.
    ///
    /// Missing values are written as empty fields.
    pub fn write_row<W: Write>(&self, mut w: W) -> io::Result<()> {
        write!(w, "{:.6},", self.timestamp.as_secs_f64())?;
        if let Some(raw) = self.raw_angle {
            write!(w, "{raw:.4}")?;
        }
        w.write_all(b",")?;
        if let Some(filtered) = self.filtered_angle {
            write!(w, "{filtered:.4}")?;
        }
        writeln!(w, ",{:.4}", self.alpha)
    }
}

/// Writes [`TelemetryRecord`]s to a sink on a background thread.
///
/// Dropping the recorder writes out all queued rows and waits for the writer thread to exit.
/// Use [`TelemetryRecorder::finish`] to find out whether writing succeeded.
pub struct TelemetryRecorder {
    sender: Option<Sender<TelemetryRecord>>,
    handle: Option<JoinHandle<io::Result<()>>>,
    dropped: u64,
}

impl TelemetryRecorder {
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Creates (or truncates) a CSV file at `path` and starts recording into it.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)?;
        log::debug!("recording telemetry to {}", path.display());
        Self::spawn(BufWriter::new(file), Self::DEFAULT_CAPACITY)
    }

    /// Starts recording into `writer`, queueing at most `capacity` rows.
    ///
    /// # Panics
    ///
    /// This method panics if `capacity` is 0.
    pub fn spawn<W: Write + Send + 'static>(mut writer: W, capacity: usize) -> io::Result<Self> {
        assert!(capacity > 0, "telemetry queue needs room for at least one row");
        let (sender, recv) = channel::bounded::<TelemetryRecord>(capacity);
        let handle = thread::Builder::new()
            .name("telemetry".into())
            .spawn(move || {
                log::trace!("telemetry writer starting");
                let res = (|| {
                    writeln!(writer, "{HEADER}")?;
                    for record in recv {
                        record.write_row(&mut writer)?;
                    }
                    writer.flush()
                })();
                if let Err(e) = &res {
                    log::warn!("telemetry writer failed: {e}");
                }
                log::trace!("telemetry writer exiting");
                res
            })?;

        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
            dropped: 0,
        })
    }

    /// Queues a record for writing, without blocking.
    ///
    /// Returns `false` if the record was dropped because the queue is full or the writer has
    /// stopped.
    pub fn record(&mut self, record: TelemetryRecord) -> bool {
        let Some(sender) = &self.sender else {
            self.dropped += 1;
            return false;
        };
        match sender.try_send(record) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                log::trace!("telemetry queue full, dropping row");
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                self.dropped += 1;
                false
            }
        }
    }

    /// Number of records dropped so far.
    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Writes out all queued rows, stops the writer thread and returns its result.
    pub fn finish(mut self) -> io::Result<()> {
        self.stop()
    }

    fn stop(&mut self) -> io::Result<()> {
        // Closing the channel makes the thread exit once the queue is drained.
        drop(self.sender.take());

        match self.handle.take() {
            Some(handle) => match handle.join() {
                Ok(res) => res,
                Err(payload) => {
                    if thread::panicking() {
                        Ok(())
                    } else {
                        resume_unwind(payload)
                    }
                }
            },
            None => Ok(()),
        }
    }
}

impl Drop for TelemetryRecorder {
    fn drop(&mut self) {
        // Errors were already logged by the writer thread.
        self.stop().ok();
    }
}
