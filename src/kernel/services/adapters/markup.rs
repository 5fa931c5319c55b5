//! Plain hex dump markup: offset, hex columns and an ASCII gutter per row.

use crate::kernel::services::ports::MarkupProvider;
use crate::kernel::BinaryDocument;
use std::fmt::Write;

const DEFAULT_BYTES_PER_ROW: usize = 16;

pub struct HexDumpMarkup {
    bytes_per_row: usize,
}

impl HexDumpMarkup {
    pub fn new(bytes_per_row: usize) -> Self {
        Self {
            bytes_per_row: bytes_per_row.max(1),
        }
    }

    pub fn render_bytes(&self, bytes: &[u8]) -> String {
        let width = self.bytes_per_row;
        let mut out = String::with_capacity(bytes.len() * 4 + 32);
        out.push_str("<pre class=\"hexdump\">");

        for (row, chunk) in bytes.chunks(width).enumerate() {
            let _ = write!(out, "{:08x} ", row * width);
            for byte in chunk {
                let _ = write!(out, " {:02x}", byte);
            }
            for _ in chunk.len()..width {
                out.push_str("   ");
            }
            out.push_str("  ");
            for &byte in chunk {
                push_escaped(&mut out, byte);
            }
            out.push('\n');
        }

        out.push_str("</pre>");
        out
    }
}

impl Default for HexDumpMarkup {
    fn default() -> Self {
        Self::new(DEFAULT_BYTES_PER_ROW)
    }
}

impl MarkupProvider for HexDumpMarkup {
    fn render(&self, document: &BinaryDocument) -> String {
        self.render_bytes(document.content())
    }
}

fn push_escaped(out: &mut String, byte: u8) {
    match byte {
        b'<' => out.push_str("&lt;"),
        b'>' => out.push_str("&gt;"),
        b'&' => out.push_str("&amp;"),
        b'"' => out.push_str("&quot;"),
        0x20..=0x7e => out.push(byte as char),
        _ => out.push('.'),
    }
}
