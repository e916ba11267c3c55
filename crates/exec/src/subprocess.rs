//! The subprocess-component contract (spec §6, §11): a component built over
//! anything exposing line-oriented byte streams. Grounded on the original's
//! `cons_subprocess_component` (`helpers/helpers.py`): format one line, write
//! it plus a newline, flush, read one line back, strip trailing whitespace,
//! hand it to the output-forming function.
//!
//! The library never spawns or supervises a child process — that is the
//! caller's responsibility (spec §1, §6's explicit Non-goal). `LineChannel`
//! is the boundary: implement it over a `std::process::Child`'s piped
//! stdin/stdout (or over anything else line-oriented, including the
//! in-memory pair used in this module's own tests) and hand it to
//! [`cons_subprocess_component`].

use arrowline_algebra::Kleisli;
use arrowline_core::State;
use parking_lot::Mutex;
use std::io::{BufRead, Write};
use std::sync::Arc;

/// A line-oriented duplex channel: write a line out, read a line back.
pub trait LineChannel {
    fn write_line(&mut self, line: &str) -> std::io::Result<()>;
    fn read_line(&mut self) -> std::io::Result<String>;
}

/// Any `(Write, BufRead)` pair is a `LineChannel` — a piped child process's
/// `(ChildStdin, BufReader<ChildStdout>)` included.
impl<W, R> LineChannel for (W, R)
where
    W: Write,
    R: BufRead,
{
    fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        writeln!(self.0, "{line}")?;
        self.0.flush()
    }

    fn read_line(&mut self) -> std::io::Result<String> {
        let mut buf = String::new();
        self.1.read_line(&mut buf)?;
        Ok(buf.trim_end().to_string())
    }
}

/// `cons_subprocess_component(channel, in, out, mut?)`. I/O failures on the
/// channel panic rather than returning a `Result`, the same way
/// `cons_dictionary_wire`'s missing-key case does — there is no
/// `Result`-typed escape hatch in an ordinary component's output type, and
/// a broken pipe to a supervising-process-less child is a programmer/
/// deployment error, not a recoverable data condition.
pub fn cons_subprocess_component<S, A, B, Ch>(
    channel: Ch,
    input_forming: impl Fn(&A, &S) -> String + Send + Sync + 'static,
    output_forming: impl Fn(String, &S) -> B + Send + Sync + 'static,
    mutator: Option<impl Fn(S) -> S + Send + Sync + 'static>,
) -> Kleisli<S, A, B>
where
    S: Send + 'static,
    A: Send + 'static,
    B: Send + 'static,
    Ch: LineChannel + Send + 'static,
{
    let channel = Arc::new(Mutex::new(channel));
    let input_forming = Arc::new(input_forming);
    let output_forming = Arc::new(output_forming);
    let mutator: Option<Arc<dyn Fn(S) -> S + Send + Sync>> =
        mutator.map(|m| Arc::new(m) as Arc<dyn Fn(S) -> S + Send + Sync>);

    tracing::debug!("constructing subprocess component");
    Kleisli::new(move |a: A| {
        let channel = channel.clone();
        let input_forming = input_forming.clone();
        let output_forming = output_forming.clone();
        let mutator = mutator.clone();
        State::make(move |s: S| {
            let line = input_forming(&a, &s);
            tracing::trace!(%line, "writing line to subprocess channel");
            let response = {
                let mut channel = channel.lock();
                channel
                    .write_line(&line)
                    .expect("subprocess channel write failed");
                channel
                    .read_line()
                    .expect("subprocess channel read failed")
            };
            let b = output_forming(response, &s);
            let s = match mutator {
                Some(m) => m(s),
                None => s,
            };
            (b, s)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run<A, B>(k: &Kleisli<i32, A, B>, a: A) -> (B, i32)
    where
        A: 'static,
        B: 'static,
    {
        k.run(a).run(0)
    }

    #[test]
    fn writes_one_line_and_parses_the_echoed_response() {
        let channel: (Vec<u8>, Cursor<Vec<u8>>) =
            (Vec::new(), Cursor::new(b"DLROW OLLEH\n".to_vec()));

        let component = cons_subprocess_component(
            channel,
            |a: &String, _s: &i32| a.clone(),
            |line: String, _s: &i32| line,
            Some(|s: i32| s + 1),
        );

        let (value, state) = run(&component, "hello world".to_string());
        assert_eq!(value, "DLROW OLLEH");
        assert_eq!(state, 1);
    }

    #[test]
    fn without_a_mutator_state_passes_through_unchanged() {
        let channel: (Vec<u8>, Cursor<Vec<u8>>) = (Vec::new(), Cursor::new(b"ok\n".to_vec()));
        let component = cons_subprocess_component(
            channel,
            |a: &String, _s: &i32| a.clone(),
            |line: String, _s: &i32| line,
            None::<fn(i32) -> i32>,
        );

        let (value, state) = run(&component, "ping".to_string());
        assert_eq!(value, "ok");
        assert_eq!(state, 0);
    }
}
