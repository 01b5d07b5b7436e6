//! # ESC/POS Framing
//!
//! Turns the plain receipt text from driwich-core into the byte stream a
//! thermal printer understands.
//!
//! ```text
//! ESC @ │ ESC a 1 │ ESC E 1 │ shop name │ ESC E 0 │ ESC a 0 │ body lines │ ESC d 3 │ GS V 0
//! init    center    bold                  normal    left                   feed      cut
//! ```

use driwich_core::receipt::{ReceiptRequest, RECEIPT_WIDTH};

const INIT: [u8; 2] = [0x1B, b'@'];
const ALIGN: [u8; 2] = [0x1B, b'a'];
const EMPHASIS: [u8; 2] = [0x1B, b'E'];
const FEED_LINES: [u8; 2] = [0x1B, b'd'];
const FULL_CUT: [u8; 3] = [0x1D, b'V', 0x00];

/// Horizontal justification for the lines that follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left = 0,
    Center = 1,
    Right = 2,
}

/// Accumulates ESC/POS commands and text for one print job.
///
/// Text goes out as UTF-8, so receipt content should stay inside the
/// printer's code page.
#[derive(Debug)]
pub struct EscPosBuilder {
    bytes: Vec<u8>,
    columns: usize,
}

impl EscPosBuilder {
    /// Starts a job for paper `columns` characters wide (32 on 58mm rolls,
    /// 48 on 80mm).
    pub fn new(columns: usize) -> Self {
        let mut bytes = Vec::with_capacity(512);
        bytes.extend_from_slice(&INIT);
        Self { bytes, columns }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    fn command(&mut self, prefix: &[u8], arg: u8) -> &mut Self {
        self.bytes.extend_from_slice(prefix);
        self.bytes.push(arg);
        self
    }

    pub fn align(&mut self, align: Align) -> &mut Self {
        self.command(&ALIGN, align as u8)
    }

    pub fn emphasis(&mut self, on: bool) -> &mut Self {
        self.command(&EMPHASIS, u8::from(on))
    }

    /// Writes `text` followed by a newline.
    pub fn line(&mut self, text: &str) -> &mut Self {
        self.bytes.extend(text.bytes().chain(std::iter::once(b'\n')));
        self
    }

    /// Dashes across the full paper width.
    pub fn rule(&mut self) -> &mut Self {
        let dashes = "-".repeat(self.columns);
        self.line(&dashes)
    }

    pub fn feed(&mut self, lines: u8) -> &mut Self {
        self.command(&FEED_LINES, lines)
    }

    pub fn cut(&mut self) -> &mut Self {
        self.bytes.extend_from_slice(&FULL_CUT);
        self
    }

    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

/// Frames a rendered receipt for the printer.
///
/// The shop name (first line) is printed centered and bold, everything else
/// left-aligned exactly as [`ReceiptRequest::render`] laid it out.
pub fn receipt_bytes(request: &ReceiptRequest) -> Vec<u8> {
    let text = request.render();
    let mut lines = text.lines();

    let mut job = EscPosBuilder::new(RECEIPT_WIDTH);
    if let Some(shop) = lines.next() {
        job.align(Align::Center)
            .emphasis(true)
            .line(shop)
            .emphasis(false)
            .align(Align::Left);
    }
    lines.for_each(|line| {
        job.line(line);
    });
    job.feed(3).cut();
    job.finish()
}
