// CLASSIFICATION: COMMUNITY
// Filename: parse.rs v0.3
// Author: Lukas Bower
// Date Modified: 2027-07-26

//! Tolerant command parsing for apply handlers.
//!
//! Every parser here is a pure function returning `Option`; `None` means the
//! payload did not match the grammar and the caller treats the write as a
//! consumed no-op. Grammars follow the original driver commands: whitespace
//! separated fields, decimal or hex scalars, first match wins, trailing
//! garbage ignored.

use crate::state::AdaptivityParams;

/// Best-effort text view of a payload window. Stops at the first invalid
/// UTF-8 byte rather than rejecting the whole payload, since a truncated
/// window may cut a caller's buffer mid-character.
pub fn as_text(window: &[u8]) -> Option<&str> {
    let end = window
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(window.len());
    let window = &window[..end];
    match std::str::from_utf8(window) {
        Ok(text) => Some(text),
        Err(err) if err.valid_up_to() > 0 => {
            std::str::from_utf8(&window[..err.valid_up_to()]).ok()
        }
        Err(_) => None,
    }
}

/// Whitespace-separated fields of a command line.
pub fn fields(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Parse a decimal `u32` field.
pub fn dec_u32(field: &str) -> Option<u32> {
    field.parse().ok()
}

/// Parse a decimal `u8` field.
pub fn dec_u8(field: &str) -> Option<u8> {
    field.parse().ok()
}

/// Parse a decimal `i32` field.
pub fn dec_i32(field: &str) -> Option<i32> {
    field.parse().ok()
}

/// Parse a decimal `i8` field.
pub fn dec_i8(field: &str) -> Option<i8> {
    field.parse().ok()
}

fn strip_hex(field: &str) -> &str {
    field
        .strip_prefix("0x")
        .or_else(|| field.strip_prefix("0X"))
        .unwrap_or(field)
}

/// Parse a hex `u8` field, `0x` prefix optional.
pub fn hex_u8(field: &str) -> Option<u8> {
    u8::from_str_radix(strip_hex(field), 16).ok()
}

/// Parse a hex `u32` field, `0x` prefix optional.
pub fn hex_u32(field: &str) -> Option<u32> {
    u32::from_str_radix(strip_hex(field), 16).ok()
}

/// Parse a hex `u64` field, `0x` prefix optional.
pub fn hex_u64(field: &str) -> Option<u64> {
    u64::from_str_radix(strip_hex(field), 16).ok()
}

/// First field of the line as decimal `u32`.
pub fn first_dec_u32(text: &str) -> Option<u32> {
    dec_u32(fields(text).first()?)
}

/// First field of the line as hex `u32`.
pub fn first_hex_u32(text: &str) -> Option<u32> {
    hex_u32(fields(text).first()?)
}

/// First field of the line as hex `u64`.
pub fn first_hex_u64(text: &str) -> Option<u64> {
    hex_u64(fields(text).first()?)
}

/// Security CAM control commands: `c <id>` clears an entry, `wfc <id>`
/// rewrites the hardware entry from the cached copy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CamCommand {
    /// Clear CAM entry `id`.
    Clear(u8),
    /// Write CAM entry `id` back from the cache.
    WriteFromCache(u8),
}

impl CamCommand {
    /// Parse a CAM control line. Unknown verbs and missing ids are no-ops.
    pub fn parse(text: &str) -> Option<Self> {
        let fields = fields(text);
        let id = dec_u8(fields.get(1)?)?;
        match *fields.first()? {
            "c" => Some(CamCommand::Clear(id)),
            "wfc" => Some(CamCommand::WriteFromCache(id)),
            _ => None,
        }
    }
}

/// Register write command: `<addr_hex> <value_hex>`.
pub fn parse_reg_write(text: &str) -> Option<(u32, u32)> {
    let fields = fields(text);
    if fields.len() < 2 {
        return None;
    }
    Some((hex_u32(fields[0])?, hex_u32(fields[1])?))
}

/// Colon-separated MAC address field, e.g. `00:e0:4c:87:00:01`.
pub fn parse_mac(field: &str) -> Option<[u8; 6]> {
    let mut mac = [0u8; 6];
    let mut octets = field.split(':');
    for slot in mac.iter_mut() {
        *slot = hex_u8(octets.next()?)?;
    }
    if octets.next().is_some() {
        return None;
    }
    Some(mac)
}

/// Adaptivity parameter line, six fields:
/// `<th_l2h_ini hex> <th_edcca_hl_diff dec> <igi_base hex> <force_edcca dec>
/// <adap_en_rssi dec> <igi_lowerbound dec>`.
pub fn parse_adaptivity(text: &str) -> Option<AdaptivityParams> {
    let fields = fields(text);
    if fields.len() != 6 {
        return None;
    }
    Some(AdaptivityParams {
        th_l2h_ini: hex_u8(fields[0])? as i8,
        th_edcca_hl_diff: dec_i8(fields[1])?,
        igi_base: hex_u8(fields[2])? as i8,
        force_edcca: dec_i32(fields[3])? != 0,
        adap_en_rssi: dec_u8(fields[4])?,
        igi_lowerbound: dec_u8(fields[5])?,
    })
}
