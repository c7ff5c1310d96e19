//! Transcript formatter: pure `(payload, direction, mode) -> text block`.
//!
//! Every mode prefixes its logical lines with `--> ` (outbound) or `<-- `
//! (inbound) and terminates the block with a single trailing newline.
//! Output is `Vec<u8>` rather than `String` because `raw` mode inserts the
//! payload verbatim, including bytes that are not valid UTF-8.

use crate::config::{DisplayMode, Direction};

const HEX_ROW_WIDTH: usize = 16;

/// Render one chunk as one formatted block, per the selected display mode.
pub fn format_chunk(payload: &[u8], direction: Direction, mode: DisplayMode) -> Vec<u8> {
    match mode {
        DisplayMode::None => Vec::new(),
        DisplayMode::Raw => format_raw(payload, direction),
        DisplayMode::Strip => format_strip(payload, direction),
        DisplayMode::Hex => format_hex(payload, direction),
        DisplayMode::Auto(n) => format_auto(payload, direction, n),
    }
}

fn is_printable(b: u8) -> bool {
    (0x20..=0x7E).contains(&b)
}

fn format_raw(payload: &[u8], direction: Direction) -> Vec<u8> {
    let mut out = Vec::with_capacity(direction.prefix().len() + payload.len() + 1);
    out.extend_from_slice(direction.prefix().as_bytes());
    out.extend_from_slice(payload);
    out.push(b'\n');
    out
}

fn format_strip(payload: &[u8], direction: Direction) -> Vec<u8> {
    let mut out = Vec::with_capacity(direction.prefix().len() + payload.len() + 1);
    out.extend_from_slice(direction.prefix().as_bytes());
    for &b in payload {
        out.push(if is_printable(b) { b } else { b'.' });
    }
    out.push(b'\n');
    out
}

/// Canonical hex dump. Offsets restart at zero for each chunk; the row
/// width never produces a trailing empty continuation row when the chunk
/// length is an exact multiple of 16.
fn format_hex(payload: &[u8], direction: Direction) -> Vec<u8> {
    let mut out = Vec::new();
    for (row_index, row) in payload.chunks(HEX_ROW_WIDTH).enumerate() {
        out.extend_from_slice(direction.prefix().as_bytes());
        out.extend_from_slice(format!("{:08X}  ", row_index * HEX_ROW_WIDTH).as_bytes());

        let hex_tokens: Vec<String> = row.iter().map(|b| format!("{:02X}", b)).collect();
        let (first_half, second_half) = if hex_tokens.len() > 8 {
            hex_tokens.split_at(8)
        } else {
            (&hex_tokens[..], &[][..])
        };
        out.extend_from_slice(first_half.join(" ").as_bytes());
        if !second_half.is_empty() {
            out.extend_from_slice(b"  ");
            out.extend_from_slice(second_half.join(" ").as_bytes());
        }

        out.extend_from_slice(b"  |");
        for &b in row {
            out.push(if is_printable(b) { b } else { b'.' });
        }
        out.extend_from_slice(b"|\n");
    }
    out
}

/// Escaped form, chunked every `n` input bytes onto a new labeled line. No
/// new labeled line is started after the final byte of the chunk, even if
/// it lands exactly on a chunk boundary.
fn format_auto(payload: &[u8], direction: Direction, n: u32) -> Vec<u8> {
    let n = n.max(1) as usize;
    let mut out = Vec::new();
    out.extend_from_slice(direction.prefix().as_bytes());

    let mut in_line = 0usize;
    for (i, &b) in payload.iter().enumerate() {
        push_escaped_byte(&mut out, b);
        in_line += 1;
        let is_last = i + 1 == payload.len();
        if in_line == n && !is_last {
            out.push(b'\n');
            out.extend_from_slice(direction.prefix().as_bytes());
            in_line = 0;
        }
    }
    out.push(b'\n');
    out
}

fn push_escaped_byte(out: &mut Vec<u8>, b: u8) {
    match b {
        0x5C => out.extend_from_slice(b"\\\\"),
        0x09 => out.extend_from_slice(b"\\t"),
        0x0A => out.extend_from_slice(b"\\n"),
        0x0D => out.extend_from_slice(b"\\r"),
        0x20..=0x7F => out.push(b),
        other => out.extend_from_slice(format!("\\{:02X}", other).as_bytes()),
    }
}
