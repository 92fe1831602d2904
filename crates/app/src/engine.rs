//! The dictation engine: a soft-real-time loop that drains the
//! non-blocking audio pipe, feeds the recognizer, routes hypotheses
//! through the text pipeline, and types minimal edits into the sink.
//!
//! Lifecycle transitions arrive asynchronously — signals set flags, the
//! cookie conveys end/cancel from sibling processes — and are all acted
//! on here, between iterations, never in a handler.

use std::thread;
use std::time::{Duration, Instant, UNIX_EPOCH};

use tracing::{debug, info};

use prism_audio::AudioSource;
use prism_foundation::DictationError;
use prism_stt::Recognizer;
use prism_text_injection::TextSink;

use crate::cookie::Cookie;
use crate::pipeline::TextPipeline;
use crate::signals::{self, ControlFlags};

/// Upper bound on a single drain of the audio pipe. Reads are usually
/// tiny; only the first one is large, because the model load gave the
/// recorder time to accumulate.
const BLOCK_SIZE: usize = 1_048_576;

#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Type while speaking, correcting with minimal edits. Off means
    /// deferred: everything is typed at the end in one go.
    pub progressive: bool,
    /// Never re-process already-finalized text; keeps long sessions
    /// from re-diffing their entire history on every update.
    pub progressive_continuous: bool,
    /// End after this many seconds without recognizer progress
    /// (0 disables).
    pub timeout: f64,
    /// Sleep between polls, minus time spent processing (0 disables).
    pub idle_time: f64,
    /// Keep processing this long after an end request (0 disables).
    pub delay_exit: f64,
    pub suspend_on_start: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            progressive: true,
            progressive_continuous: false,
            timeout: 0.0,
            idle_time: 0.1,
            delay_exit: 0.0,
            suspend_on_start: false,
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Ended normally; `handled_any` is false when no speech was ever
    /// recognized.
    Completed { handled_any: bool },
    /// Canceled by a sibling invocation; nothing further was typed.
    Canceled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CookiePoll {
    Continue,
    End,
    Cancel,
}

pub struct DictationEngine<R, S, A> {
    recognizer: R,
    sink: S,
    audio: A,
    pipeline: TextPipeline,
    flags: ControlFlags,
    cookie: Cookie,
    options: EngineOptions,

    /// Finalized fragments, joined ahead of the live text in deferred
    /// and progressive-non-continuous modes.
    committed: Vec<String>,
    /// Exactly what the sink holds, for computing minimal edits.
    prev_emitted: String,
    /// Last partial signature, to skip the many identical partials the
    /// recognizer produces between changes.
    partial_signature: String,
    handled_any: bool,
    suspended: bool,

    timeout_signature: String,
    timeout_started: Instant,
    overtime_started: Option<Instant>,

    read_buf: Vec<u8>,
    /// A read can split a sample; the odd byte carries to the next.
    pcm_carry: Option<u8>,
}

impl<R, S, A> DictationEngine<R, S, A>
where
    R: Recognizer,
    S: TextSink,
    A: AudioSource,
{
    pub fn new(
        recognizer: R,
        sink: S,
        audio: A,
        pipeline: TextPipeline,
        flags: ControlFlags,
        cookie: Cookie,
        options: EngineOptions,
    ) -> Self {
        Self {
            recognizer,
            sink,
            audio,
            pipeline,
            flags,
            cookie,
            options,
            committed: Vec::new(),
            prev_emitted: String::new(),
            partial_signature: String::new(),
            handled_any: false,
            suspended: false,
            timeout_signature: String::new(),
            timeout_started: Instant::now(),
            overtime_started: None,
            read_buf: vec![0; BLOCK_SIZE],
            pcm_carry: None,
        }
    }

    pub fn run(&mut self) -> Result<Outcome, DictationError> {
        if self.options.suspend_on_start {
            self.suspended = true;
            signals::raise_stop();
        } else {
            self.sink.setup()?;
        }

        let mut idle_prev = Instant::now();
        self.timeout_started = Instant::now();
        let mut canceled = false;

        loop {
            let mut poll = self.poll_cookie();
            if poll == CookiePoll::Cancel {
                canceled = true;
                break;
            }

            if self.flags.take_reload() {
                info!("Reload.");
                self.pipeline.reload();
            }

            if self.flags.take_suspend() && !self.suspended {
                self.pause_for_suspend()?;
                self.suspended = true;
                // Park until a sibling resume delivers SIGCONT.
                signals::raise_stop();
                continue;
            }
            if self.suspended {
                if self.flags.take_resume() {
                    self.suspended = false;
                } else {
                    continue;
                }
            }

            if self.options.idle_time > 0.0 {
                // Subtract the previous iteration's processing time and
                // skip sleeping entirely when recognition cannot keep
                // up with the recording.
                let now = Instant::now();
                let wait = self.options.idle_time - now.duration_since(idle_prev).as_secs_f64();
                if wait > 0.0 {
                    thread::sleep(Duration::from_secs_f64(wait));
                    idle_prev = Instant::now();
                } else {
                    idle_prev = now;
                }
            }

            if !self.audio.is_running() {
                // Either --suspend-on-start never opened the recorder,
                // or a suspend closed it.
                self.resume_audio()?;
                continue;
            }

            let read = self.audio.read_available(&mut self.read_buf)?;
            if read > 0 {
                let pcm = self.take_pcm(read);
                let finalized = self.recognizer.accept(&pcm)?;
                let signature = if finalized {
                    self.partial_signature.clear();
                    let text = self.recognizer.final_text()?;
                    if !text.is_empty() {
                        self.handle_text(&text, false)?;
                    }
                    format!("final:{text}")
                } else {
                    let text = self.recognizer.partial_text()?;
                    let signature = format!("partial:{text}");
                    // The recognizer repeats unchanged partials at the
                    // polling rate; only route real revisions.
                    if signature != self.partial_signature {
                        self.partial_signature.clone_from(&signature);
                        if !text.is_empty() {
                            self.handle_text(&text, true)?;
                        }
                    }
                    signature
                };

                if self.options.timeout > 0.0 {
                    if signature != self.timeout_signature {
                        self.timeout_signature = signature;
                        self.timeout_started = Instant::now();
                    } else if poll == CookiePoll::Continue
                        && self.timeout_started.elapsed().as_secs_f64() > self.options.timeout
                    {
                        debug!("silence timeout reached");
                        poll = CookiePoll::End;
                    }
                }
            }

            if poll == CookiePoll::End {
                break;
            }
        }

        let audio_was_running = self.audio.is_running();
        self.audio.stop();

        if canceled {
            if audio_was_running {
                self.sink.teardown()?;
            }
            return Ok(Outcome::Canceled);
        }

        // Drain whatever the recognizer still holds.
        let text = self.recognizer.final_text()?;
        if !text.is_empty() {
            self.handle_text(&text, false)?;
        }

        if !self.options.progressive {
            // Deferred output never needs deletions.
            let joined = self.committed.join(" ");
            let processed = self.pipeline.process(&joined)?;
            self.sink.emit(0, &processed)?;
        }

        if audio_was_running {
            self.sink.teardown()?;
        }

        Ok(Outcome::Completed {
            handled_any: self.handled_any,
        })
    }

    /// Route one hypothesis to the sink.
    ///
    /// Deferred mode just accumulates finals. Progressive mode
    /// post-processes the full candidate text, diffs it against what
    /// the sink already holds, and emits only the edit.
    fn handle_text(&mut self, text: &str, is_partial: bool) -> Result<(), DictationError> {
        if !self.options.progressive {
            if is_partial {
                return Ok(());
            }
            self.committed.push(text.to_string());
            self.handled_any = true;
            return Ok(());
        }

        let candidate = if self.options.progressive_continuous {
            self.pipeline.process(text)?
        } else {
            let mut session = self.committed.join(" ");
            if !session.is_empty() {
                session.push(' ');
            }
            session.push_str(text);
            self.pipeline.process(&session)?
        };

        if candidate != self.prev_emitted {
            let shared = common_prefix_chars(&self.prev_emitted, &candidate);
            let delete = self.prev_emitted.chars().count() - shared;
            let insert_at = candidate
                .char_indices()
                .nth(shared)
                .map_or(candidate.len(), |(i, _)| i);
            self.sink.emit(delete, &candidate[insert_at..])?;
            self.prev_emitted = candidate;
        }

        if !is_partial {
            if self.options.progressive_continuous {
                // The final is committed on screen; future edits only
                // address text spoken after it.
                self.prev_emitted.clear();
            } else {
                self.committed.push(text.to_string());
            }
        }

        self.handled_any = true;
        Ok(())
    }

    /// The suspend handshake: flush, reset, clear, tear down, stop.
    /// The caller raises SIGSTOP afterwards.
    fn pause_for_suspend(&mut self) -> Result<(), DictationError> {
        let text = self.recognizer.final_text()?;
        if !text.is_empty() {
            self.handle_text(&text, false)?;
        }
        // Resumed audio must not attach to the stale hypothesis.
        self.recognizer.reset()?;
        self.clear_session();

        info!("Recording suspended.");
        if self.audio.is_running() {
            self.sink.teardown()?;
            self.audio.stop();
        }
        Ok(())
    }

    fn clear_session(&mut self) {
        self.handled_any = false;
        self.prev_emitted.clear();
        self.partial_signature.clear();
        self.pcm_carry = None;
        if !(self.options.progressive && self.options.progressive_continuous) {
            self.committed.clear();
        }
    }

    fn resume_audio(&mut self) -> Result<(), DictationError> {
        info!("Recording.");
        self.sink.setup()?;
        self.audio.start()?;
        Ok(())
    }

    /// Observe the cookie: missing means cancel, a non-zero mtime means
    /// an end request (optionally stretched by the delay-exit grace
    /// period so push-to-talk can be released mid-word).
    fn poll_cookie(&mut self) -> CookiePoll {
        let Some(mtime) = self.cookie.mtime() else {
            return CookiePoll::Cancel;
        };
        if mtime != UNIX_EPOCH {
            // Only delay the exit when some text was handled; a stray
            // tap of push-to-talk should not keep the session alive.
            if self.handled_any && self.options.delay_exit > 0.0 && self.options.timeout == 0.0 {
                let started = *self.overtime_started.get_or_insert_with(Instant::now);
                if started.elapsed().as_secs_f64() < self.options.delay_exit {
                    return CookiePoll::Continue;
                }
            }
            return CookiePoll::End;
        }
        CookiePoll::Continue
    }

    /// Convert the freshly read bytes to samples, carrying a split
    /// sample byte across reads.
    fn take_pcm(&mut self, read: usize) -> Vec<i16> {
        let mut data = &self.read_buf[..read];
        let mut pcm = Vec::with_capacity(read / 2 + 1);
        if let Some(low) = self.pcm_carry.take() {
            if let Some((&high, rest)) = data.split_first() {
                pcm.push(i16::from_le_bytes([low, high]));
                data = rest;
            } else {
                self.pcm_carry = Some(low);
                return pcm;
            }
        }
        let chunks = data.chunks_exact(2);
        if let [byte] = chunks.remainder() {
            self.pcm_carry = Some(*byte);
        }
        pcm.extend(chunks.map(|pair| i16::from_le_bytes([pair[0], pair[1]])));
        pcm
    }
}

fn common_prefix_chars(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .count()
}
