//! Where the verbose iteration table goes.

use std::fmt;
use std::fs::File;
use std::io::{self, Write};

type BoxedWriter = Box<dyn Write + Send + Sync>;

enum Sink {
    Stdout,
    Writer(BoxedWriter),
    Buffer(Vec<u8>),
}

/// Destination for verbose solver output.  Starts out on stdout.
pub struct PrintTarget {
    sink: Sink,
}

impl Default for PrintTarget {
    fn default() -> Self {
        Self { sink: Sink::Stdout }
    }
}

impl fmt::Debug for PrintTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.sink {
            Sink::Stdout => "stdout",
            Sink::Writer(_) => "writer",
            Sink::Buffer(_) => "buffer",
        };
        f.debug_tuple("PrintTarget").field(&kind).finish()
    }
}

impl PrintTarget {
    fn redirect(&mut self, sink: Sink) {
        // anything still pending in the old sink is flushed on a best effort basis
        let _ = self.flush();
        self.sink = sink;
    }

    /// Buffered output so far, if output is being buffered
    fn buffered(&self) -> Option<&[u8]> {
        match &self.sink {
            Sink::Buffer(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl Write for PrintTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.sink {
            Sink::Stdout => io::stdout().lock().write(buf),
            Sink::Writer(w) => w.write(buf),
            Sink::Buffer(bytes) => {
                bytes.extend_from_slice(buf);
                Ok(buf.len())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.sink {
            Sink::Stdout => io::stdout().flush(),
            Sink::Writer(w) => w.flush(),
            Sink::Buffer(_) => Ok(()),
        }
    }
}

/// Redirection of a solver's verbose output.
///
/// Implementors only expose their [`PrintTarget`]; the redirections
/// themselves are provided.
pub trait ConfigurablePrintTarget {
    fn print_target(&mut self) -> &mut PrintTarget;

    fn print_to_stdout(&mut self) {
        self.print_target().redirect(Sink::Stdout);
    }

    fn print_to_file(&mut self, file: File) {
        self.print_target().redirect(Sink::Writer(Box::new(file)));
    }

    fn print_to_stream(&mut self, stream: BoxedWriter) {
        self.print_target().redirect(Sink::Writer(stream));
    }

    /// Collect output in memory, see [`get_print_buffer`](Self::get_print_buffer).
    fn print_to_buffer(&mut self) {
        self.print_target().redirect(Sink::Buffer(Vec::new()));
    }

    /// Everything printed since [`print_to_buffer`](Self::print_to_buffer).
    /// Fails if output is not being buffered.
    fn get_print_buffer(&mut self) -> io::Result<String> {
        self.print_target()
            .buffered()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "output is not being buffered"))
    }
}

impl ConfigurablePrintTarget for PrintTarget {
    fn print_target(&mut self) -> &mut PrintTarget {
        self
    }
}
