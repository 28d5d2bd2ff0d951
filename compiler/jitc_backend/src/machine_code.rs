// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::fmt::Display;

use itertools::Itertools;

/// Encoded instruction stream of one compiled unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MachineCode {
    bytes: Vec<u8>,
}

impl MachineCode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    pub fn push_i32(&mut self, value: i32) {
        self.extend(&value.to_le_bytes());
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Uppercase hex, 16 bytes per line.
impl Display for MachineCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dump = self
            .bytes
            .chunks(16)
            .map(|line| line.iter().map(|b| format!("{b:02X}")).join(" "))
            .join("\n");
        write!(f, "{dump}")
    }
}

#[cfg(test)]
mod tests {
    use super::MachineCode;

    #[test]
    fn test_hex_dump_wraps_every_16_bytes() {
        let mut code = MachineCode::new();
        code.extend(&(0u8..18).collect::<Vec<u8>>());
        assert_eq!(
            code.to_string(),
            "00 01 02 03 04 05 06 07 08 09 0A 0B 0C 0D 0E 0F\n10 11"
        );
    }

    #[test]
    fn test_immediates_are_little_endian() {
        let mut code = MachineCode::new();
        code.push_i32(-4);
        code.push_i32(10);
        assert_eq!(code.as_bytes(), &[0xFC, 0xFF, 0xFF, 0xFF, 0x0A, 0x00, 0x00, 0x00]);
        assert_eq!(code.size(), 8);
    }
}
