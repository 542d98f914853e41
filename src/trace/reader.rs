//! # Trace Text Reader
//!
//! Reference parser for the textual log grammar, built with `nom`. One line
//! is one frame:
//!
//! - LIN:    `<ts> <Rx|Tx> <channel> <0xPID> <dlc> <byte>{dlc} <checksum>`
//! - CAN:    `<ts> <channel> <0xID> <Rx|Tx> d <dlc> <byte>{dlc}`
//! - CAN FD: `<ts> <channel> <0xID> <Rx|Tx> f|fb <len> <byte>{len}`
//!
//! A `x` suffix on a CAN identifier marks a 29-bit ID; `fb` marks an FD frame
//! with bit-rate switching. Blank lines and `#` comments are skipped. The
//! reader does not judge protocol legality (an FD length of 9 parses and is
//! flagged by the validator); it only rejects lines that match none of the
//! three forms.

use crate::error::LinspectorError;
use crate::trace::{CanFrame, Direction, IdWidth, LinFrame, LogEntry};
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{char, digit1, hex_digit1, space1};
use nom::combinator::{all_consuming, map, map_res, opt};
use nom::number::complete::double;
use nom::sequence::preceded;
use nom::IResult;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

fn direction(input: &str) -> IResult<&str, Direction> {
    alt((
        map(tag("Rx"), |_| Direction::Rx),
        map(tag("Tx"), |_| Direction::Tx),
    ))(input)
}

fn dec_u8(input: &str) -> IResult<&str, u8> {
    map_res(digit1, |s: &str| s.parse::<u8>())(input)
}

fn hex_u8(input: &str) -> IResult<&str, u8> {
    map_res(preceded(tag("0x"), hex_digit1), |s: &str| {
        u8::from_str_radix(s, 16)
    })(input)
}

fn hex_byte(input: &str) -> IResult<&str, u8> {
    map_res(hex_digit1, |s: &str| u8::from_str_radix(s, 16))(input)
}

fn can_id(input: &str) -> IResult<&str, (u32, IdWidth)> {
    let (input, id) = map_res(preceded(tag("0x"), hex_digit1), |s: &str| {
        u32::from_str_radix(s, 16)
    })(input)?;
    let (input, extended) = opt(char('x'))(input)?;
    let width = if extended.is_some() || id > 0x7FF {
        IdWidth::Extended29
    } else {
        IdWidth::Standard11
    };
    Ok((input, (id, width)))
}

fn byte_run(input: &str, count: usize) -> IResult<&str, Vec<u8>> {
    let mut bytes = Vec::with_capacity(count);
    let mut rest = input;
    for _ in 0..count {
        let (r, _) = space1(rest)?;
        let (r, byte) = hex_byte(r)?;
        bytes.push(byte);
        rest = r;
    }
    Ok((rest, bytes))
}

fn lin_tail(input: &str, ts: f64) -> IResult<&str, LogEntry> {
    let (input, direction) = direction(input)?;
    let (input, _) = space1(input)?;
    let (input, channel) = dec_u8(input)?;
    let (input, _) = space1(input)?;
    let (input, pid_byte) = hex_u8(input)?;
    let (input, _) = space1(input)?;
    let (input, dlc) = dec_u8(input)?;
    let (input, payload) = byte_run(input, dlc as usize)?;
    let (input, _) = space1(input)?;
    let (input, checksum_byte) = hex_byte(input)?;
    Ok((
        input,
        LogEntry::Lin(LinFrame {
            ts,
            channel,
            pid_byte,
            payload,
            checksum_byte,
            direction,
            header: None,
        }),
    ))
}

fn can_tail(input: &str, ts: f64) -> IResult<&str, LogEntry> {
    let (input, channel) = dec_u8(input)?;
    let (input, _) = space1(input)?;
    let (input, (id, id_width)) = can_id(input)?;
    let (input, _) = space1(input)?;
    let (input, direction) = direction(input)?;
    let (input, _) = space1(input)?;
    let (input, flag) = alt((tag("fb"), tag("f"), tag("d")))(input)?;
    let (is_fd, brs) = match flag {
        "fb" => (true, true),
        "f" => (true, false),
        _ => (false, false),
    };
    let (input, _) = space1(input)?;
    let (input, len) = dec_u8(input)?;
    let (input, payload) = byte_run(input, len as usize)?;
    Ok((
        input,
        LogEntry::Can(CanFrame {
            ts,
            channel,
            id,
            id_width,
            is_fd,
            brs,
            payload,
            direction,
        }),
    ))
}

fn entry(input: &str) -> IResult<&str, LogEntry> {
    let (input, ts) = double(input)?;
    let (input, _) = space1(input)?;
    let result = alt((|i| lin_tail(i, ts), |i| can_tail(i, ts)))(input);
    result
}

/// Parses one trimmed log line. Blank lines and comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<LogEntry>, LinspectorError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    match all_consuming(entry)(trimmed) {
        Ok((_, parsed)) => Ok(Some(parsed)),
        Err(_) => Err(LinspectorError::InputError(format!(
            "unrecognized log line: {trimmed}"
        ))),
    }
}

/// Line-oriented trace reader over any buffered source.
pub struct TraceReader<R: BufRead> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: BufRead> TraceReader<R> {
    pub fn new(reader: R) -> Self {
        TraceReader {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl TraceReader<BufReader<File>> {
    /// Opens a trace file for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LinspectorError> {
        let file = File::open(path.as_ref()).map_err(|err| {
            LinspectorError::InputError(format!(
                "cannot open trace {}: {err}",
                path.as_ref().display()
            ))
        })?;
        Ok(TraceReader::new(BufReader::new(file)))
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<LogEntry, LinspectorError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => {
                    return Some(Err(LinspectorError::InputError(format!(
                        "read error after line {}: {err}",
                        self.line_no
                    ))))
                }
            };
            self.line_no += 1;
            match parse_line(&line) {
                Ok(None) => continue,
                Ok(Some(parsed)) => return Some(Ok(parsed)),
                Err(LinspectorError::InputError(msg)) => {
                    return Some(Err(LinspectorError::InputError(format!(
                        "line {}: {msg}",
                        self.line_no
                    ))))
                }
                Err(other) => return Some(Err(other)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lin_line() {
        let parsed = parse_line("0.0125 Rx 1 0x50 2 11 22 7B").unwrap().unwrap();
        match parsed {
            LogEntry::Lin(frame) => {
                assert_eq!(frame.channel, 1);
                assert_eq!(frame.pid_byte, 0x50);
                assert_eq!(frame.payload, vec![0x11, 0x22]);
                assert_eq!(frame.checksum_byte, 0x7B);
                assert_eq!(frame.direction, Direction::Rx);
            }
            other => panic!("expected a LIN frame, got {other:?}"),
        }
    }

    #[test]
    fn parses_classic_can_line() {
        let parsed = parse_line("1.5 2 0x1A0 Tx d 3 01 02 03").unwrap().unwrap();
        match parsed {
            LogEntry::Can(frame) => {
                assert_eq!(frame.channel, 2);
                assert_eq!(frame.id, 0x1A0);
                assert_eq!(frame.id_width, IdWidth::Standard11);
                assert!(!frame.is_fd);
                assert_eq!(frame.payload.len(), 3);
            }
            other => panic!("expected a CAN frame, got {other:?}"),
        }
    }

    #[test]
    fn parses_fd_line_with_brs_and_extended_id() {
        let line = "2.0 1 0x18DAF110x Rx fb 12 00 11 22 33 44 55 66 77 88 99 AA BB";
        let parsed = parse_line(line).unwrap().unwrap();
        match parsed {
            LogEntry::Can(frame) => {
                assert_eq!(frame.id, 0x18DA_F110);
                assert_eq!(frame.id_width, IdWidth::Extended29);
                assert!(frame.is_fd);
                assert!(frame.brs);
                assert_eq!(frame.payload.len(), 12);
            }
            other => panic!("expected a CAN FD frame, got {other:?}"),
        }
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        assert!(parse_line("").unwrap().is_none());
        assert!(parse_line("   ").unwrap().is_none());
        assert!(parse_line("# header").unwrap().is_none());
    }

    #[test]
    fn rejects_malformed_line() {
        assert!(parse_line("0.1 bogus").is_err());
        assert!(parse_line("0.1 Rx 1 0x50 3 11 22").is_err());
    }
}
