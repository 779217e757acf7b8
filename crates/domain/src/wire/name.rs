//! Domain name encoding (RFC 1035 §3.1, §4.1.4).
//!
//! Decoding follows compression pointers, but only backwards and at most
//! [`MAX_POINTER_JUMPS`] times, so any finite input terminates. Encoding
//! never emits pointers.
//!
//! Names are carried as master-file text (RFC 1035 §5.1): a `.` or `\`
//! inside a label is written `\.` or `\\`, and bytes outside printable
//! ASCII as `\DDD`. Decoding then encoding reproduces the wire labels
//! exactly.

use super::cursor::{WireReader, WireWriter};
use crate::errors::DomainError;

/// Upper bound on pointers followed while decoding a single name.
pub const MAX_POINTER_JUMPS: usize = 10;

const MAX_LABEL_LEN: usize = 63;
const MAX_NAME_WIRE_LEN: usize = 255;
const POINTER_MASK: u8 = 0xC0;

/// Reads a possibly compressed name starting at the reader's offset.
///
/// Returns the fully qualified name (`"example.com."`, or `"."` for the
/// root). On success the reader sits right after the name's own bytes: the
/// terminating zero, or the first two-byte pointer.
pub fn read_domain_name(reader: &mut WireReader<'_>) -> Result<String, DomainError> {
    let mut name = String::new();
    let mut wire_len = 0usize;
    let mut jumps = 0usize;
    let mut resume_at: Option<usize> = None;

    loop {
        let label_offset = reader.offset();
        let len = reader.read_u8().map_err(out_of_bounds)?;

        match len & POINTER_MASK {
            0x00 if len == 0 => {
                if name.is_empty() {
                    name.push('.');
                }
                break;
            }
            0x00 => {
                let label = reader.read_bytes(len as usize).map_err(out_of_bounds)?;
                wire_len += 1 + label.len();
                if wire_len + 1 > MAX_NAME_WIRE_LEN {
                    return Err(DomainError::InvalidDomainName(format!(
                        "name exceeds {} octets",
                        MAX_NAME_WIRE_LEN
                    )));
                }
                push_escaped_label(&mut name, label);
                name.push('.');
            }
            POINTER_MASK => {
                let low = reader.read_u8().map_err(out_of_bounds)?;
                let target = (((len & !POINTER_MASK) as usize) << 8) | low as usize;

                if target >= label_offset {
                    return Err(DomainError::InvalidDomainName(format!(
                        "compression pointer at offset {} does not point backwards (target {})",
                        label_offset, target
                    )));
                }

                jumps += 1;
                if jumps > MAX_POINTER_JUMPS {
                    return Err(DomainError::InvalidDomainName(
                        "too many compression pointers".to_string(),
                    ));
                }

                if resume_at.is_none() {
                    resume_at = Some(reader.offset());
                }
                reader.seek(target).map_err(out_of_bounds)?;
            }
            other => {
                return Err(DomainError::InvalidDomainName(format!(
                    "unsupported label type 0x{:02x} at offset {}",
                    other, label_offset
                )));
            }
        }
    }

    if let Some(position) = resume_at {
        reader.seek(position).map_err(out_of_bounds)?;
    }

    Ok(name)
}

/// Writes `name` as an uncompressed label sequence ending in the root label.
///
/// Empty labels are skipped, so `"example.com"`, `"example.com."` and
/// `"."` are all accepted. Escapes produced by [`read_domain_name`] are
/// turned back into the raw label bytes.
pub fn write_domain_name(writer: &mut WireWriter, name: &str) -> Result<(), DomainError> {
    let labels = parse_labels(name)?;
    let mut wire_len = 1usize;

    for label in &labels {
        if label.len() > MAX_LABEL_LEN {
            return Err(DomainError::InvalidDomainName(format!(
                "label '{}' is longer than {} bytes",
                String::from_utf8_lossy(label),
                MAX_LABEL_LEN
            )));
        }
        wire_len += 1 + label.len();
        if wire_len > MAX_NAME_WIRE_LEN {
            return Err(DomainError::InvalidDomainName(format!(
                "name '{}' exceeds {} octets",
                name, MAX_NAME_WIRE_LEN
            )));
        }
    }

    for label in &labels {
        writer.write_u8(label.len() as u8);
        writer.write_bytes(label);
    }
    writer.write_u8(0);
    Ok(())
}

/// Number of bytes `write_domain_name` produces for `name`.
pub fn encoded_name_len(name: &str) -> usize {
    match parse_labels(name) {
        Ok(labels) => 1 + labels.iter().map(|label| 1 + label.len()).sum::<usize>(),
        // Not encodable anyway; count the text as-is.
        Err(_) => 1 + name
            .split('.')
            .filter(|label| !label.is_empty())
            .map(|label| 1 + label.len())
            .sum::<usize>(),
    }
}

fn push_escaped_label(name: &mut String, label: &[u8]) {
    for &byte in label {
        match byte {
            b'.' | b'\\' => {
                name.push('\\');
                name.push(byte as char);
            }
            0x21..=0x7e => name.push(byte as char),
            _ => name.push_str(&format!("\\{:03}", byte)),
        }
    }
}

/// Splits master-file text into raw labels, resolving `\X` and `\DDD`.
fn parse_labels(name: &str) -> Result<Vec<Vec<u8>>, DomainError> {
    let bytes = name.as_bytes();
    let mut labels = Vec::new();
    let mut current = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'.' => {
                if !current.is_empty() {
                    labels.push(std::mem::take(&mut current));
                }
                pos += 1;
            }
            b'\\' => {
                let rest = &bytes[pos + 1..];
                match rest {
                    [a, b, c, ..]
                        if a.is_ascii_digit() && b.is_ascii_digit() && c.is_ascii_digit() =>
                    {
                        let value = u16::from(a - b'0') * 100
                            + u16::from(b - b'0') * 10
                            + u16::from(c - b'0');
                        let byte = u8::try_from(value).map_err(|_| {
                            DomainError::InvalidDomainName(format!(
                                "escape \\{}{}{} in '{}' is above 255",
                                *a as char, *b as char, *c as char, name
                            ))
                        })?;
                        current.push(byte);
                        pos += 4;
                    }
                    [first, ..] if !first.is_ascii_digit() => {
                        current.push(*first);
                        pos += 2;
                    }
                    _ => {
                        return Err(DomainError::InvalidDomainName(format!(
                            "incomplete escape in '{}'",
                            name
                        )));
                    }
                }
            }
            other => {
                current.push(other);
                pos += 1;
            }
        }
    }

    if !current.is_empty() {
        labels.push(current);
    }
    Ok(labels)
}

fn out_of_bounds(err: DomainError) -> DomainError {
    DomainError::InvalidDomainName(err.to_string())
}
