//! Log and panic forwarding to the browser console.

use std::io::{self, Write};
use std::sync::Once;

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriter;

static INSTALLED: Once = Once::new();

/// Buffers one formatted event and emits it as a single `console.log` line.
#[derive(Debug, Default)]
pub struct ConsoleWriter {
    buffer: Vec<u8>,
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&self.buffer);
        web_sys::console::log_1(&line.trim_end().into());
        self.buffer.clear();
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// [`MakeWriter`] handing out [`ConsoleWriter`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::default()
    }
}

/// Installs the panic hook and a console subscriber (idempotent).
pub fn install(max_level: Level) {
    INSTALLED.call_once(|| {
        console_error_panic_hook::set_once();
        let _ = tracing_subscriber::fmt()
            .with_writer(ConsoleMakeWriter)
            .with_max_level(max_level)
            .without_time()
            .try_init();
    });
}
