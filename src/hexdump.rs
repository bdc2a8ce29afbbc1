//! Checksummed hex dump
//!
//! Sixteen bytes per row followed by the row's 8-bit sum; the footer holds
//! the per-column sums and their total. Sums wrap, so a dump can be
//! compared against one taken on another host byte for byte.

use std::fmt::Write;

const COLUMNS: usize = 16;

/// Format `data` as read from flash address `base`
pub fn format_dump(base: u32, data: &[u8]) -> String {
    let last = base as usize + data.len().saturating_sub(1);
    let width = format!("{:x}", last).len().max(5);
    let rule = "-".repeat(width + 2 + COLUMNS * 3 + 3);

    let mut out = String::new();
    let mut vsum = [0u8; COLUMNS];

    let _ = writeln!(out, "{}", rule);
    for (row, chunk) in data.chunks(COLUMNS).enumerate() {
        let addr = base as usize + row * COLUMNS;
        let _ = write!(out, "{:0width$x}: ", addr, width = width);

        let mut sum = 0u8;
        for (col, &b) in chunk.iter().enumerate() {
            sum = sum.wrapping_add(b);
            vsum[col] = vsum[col].wrapping_add(b);
            let _ = write!(out, "{:02x} ", b);
        }
        out.push_str(&"   ".repeat(COLUMNS - chunk.len()));
        let _ = writeln!(out, "|{:02x}", sum);
    }
    let _ = writeln!(out, "{}", rule);

    out.push_str(&" ".repeat(width + 2));
    let mut total = 0u8;
    for v in vsum {
        total = total.wrapping_add(v);
        let _ = write!(out, "{:02x} ", v);
    }
    let _ = writeln!(out, "|{:02x}", total);
    out
}

/// Print a dump to stdout
pub fn print_dump(base: u32, data: &[u8]) {
    println!("{}", format_dump(base, data));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_and_column_sums() {
        let data: Vec<u8> = (0..16).collect();
        let out = format_dump(0, &data);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].chars().all(|c| c == '-'));
        assert_eq!(
            lines[1],
            "00000: 00 01 02 03 04 05 06 07 08 09 0a 0b 0c 0d 0e 0f |78"
        );
        assert_eq!(
            lines[3],
            "       00 01 02 03 04 05 06 07 08 09 0a 0b 0c 0d 0e 0f |78"
        );
    }

    #[test]
    fn test_sums_wrap() {
        let data = [0xFFu8; 32];
        let out = format_dump(0, &data);
        // 16 * 0xFF = 0xFF0, 32 * 0xFF = 0x1FE0
        assert!(out.lines().nth(1).unwrap().ends_with("|f0"));
        assert!(out.lines().last().unwrap().ends_with("|e0"));
    }

    #[test]
    fn test_partial_row_is_padded() {
        let out = format_dump(0x1000, b"AB");
        let row = out.lines().nth(1).unwrap();
        assert!(row.starts_with("01000: 41 42 "));
        assert!(row.ends_with("|83"));
        assert_eq!(row.len(), out.lines().nth(3).unwrap().len());
    }

    #[test]
    fn test_wide_addresses() {
        let out = format_dump(0x1FF_FFF0, &[0u8; 16]);
        assert!(out.lines().nth(1).unwrap().starts_with("1fffff0: "));
    }
}
