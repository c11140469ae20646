//! SubRip (`.srt`) parsing.
//!
//! Malformed blocks are skipped rather than failing the whole file.

use crate::models::CaptionEntry;

/// Parses `HH:MM:SS,mmm` (or `HH:MM:SS.mmm`) into seconds.
pub fn parse_timestamp(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let (clock, millis) = raw.split_once([',', '.'])?;
    let mut parts = clock.split(':');
    let hours: u64 = parts.next()?.trim().parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds: u64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
        return None;
    }
    if millis.is_empty() || millis.len() > 3 || !millis.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let millis: u64 = format!("{millis:0<3}").parse().ok()?;

    let total_ms = ((hours * 60 + minutes) * 60 + seconds) * 1000 + millis;
    Some(total_ms as f64 / 1000.0)
}

fn parse_timing_line(line: &str) -> Option<(f64, f64)> {
    let (start, rest) = line.split_once("-->")?;
    // Trailing positioning hints ("X1:... Y1:...") follow the end time.
    let end = rest.split_whitespace().next()?;
    Some((parse_timestamp(start)?, parse_timestamp(end)?))
}

fn parse_block(block: &str) -> Option<CaptionEntry> {
    let lines: Vec<&str> = block.lines().map(str::trim).collect();
    if lines.len() < 3 {
        return None;
    }
    lines[0].parse::<u64>().ok()?;
    let (start, end) = parse_timing_line(lines[1])?;
    let text = lines[2..]
        .iter()
        .filter(|line| !line.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    Some(CaptionEntry::new(start, end, text))
}

/// Parses every well-formed block, in file order.
pub fn parse(contents: &str) -> Vec<CaptionEntry> {
    let normalized = contents
        .trim_start_matches('\u{feff}')
        .replace("\r\n", "\n")
        .replace('\r', "\n");

    let mut entries = Vec::new();
    let mut block = String::new();
    for line in normalized.lines() {
        if line.trim().is_empty() {
            if !block.is_empty() {
                entries.extend(parse_block(&block));
                block.clear();
            }
        } else {
            block.push_str(line);
            block.push('\n');
        }
    }
    if !block.is_empty() {
        entries.extend(parse_block(&block));
    }
    entries
}
