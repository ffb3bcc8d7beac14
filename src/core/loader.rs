// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 rvpico contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Image loading and validation
//!
//! Images are raw little-endian machine code blobs mapped at the start of
//! SRAM. There is no container format; the entry point is supplied out of
//! band (by the CLI flag or the host).

use crate::core::error::{EmulatorError, Result};
use crate::core::memory::Bus;
use std::path::Path;

/// A validated machine-code image
///
/// Construction guarantees the image fits in SRAM and the entry address
/// lands inside the mapped bytes, so loading into a `System` cannot fail.
#[derive(Debug, Clone)]
pub struct Image {
    data: Vec<u8>,
    entry: u32,
}

impl Image {
    /// Validate a raw byte image
    ///
    /// # Arguments
    ///
    /// * `bytes` - Raw machine code, mapped at `Bus::SRAM_START`
    /// * `entry` - Absolute entry address
    ///
    /// # Errors
    ///
    /// - `ImageTooLarge` if `bytes` exceeds SRAM capacity
    /// - `InvalidEntryAddress` if `entry` is outside the mapped range
    ///
    /// # Example
    ///
    /// ```
    /// use rvpico::core::loader::Image;
    ///
    /// let image = Image::from_bytes(&0x00100073u32.to_le_bytes(), 0x2000_0000).unwrap();
    /// assert_eq!(image.entry(), 0x2000_0000);
    /// ```
    pub fn from_bytes(bytes: &[u8], entry: u32) -> Result<Self> {
        if bytes.len() > Bus::SRAM_SIZE {
            return Err(EmulatorError::ImageTooLarge {
                got: bytes.len(),
                limit: Bus::SRAM_SIZE,
            });
        }

        let end = Bus::SRAM_START + bytes.len() as u32;
        if entry < Bus::SRAM_START || entry >= end {
            return Err(EmulatorError::InvalidEntryAddress { entry });
        }

        Ok(Self {
            data: bytes.to_vec(),
            entry,
        })
    }

    /// Load and validate an image file
    ///
    /// # Errors
    ///
    /// `ImageNotFound` if the file cannot be opened, plus the validation
    /// errors of `from_bytes`.
    pub fn from_file<P: AsRef<Path>>(path: P, entry: u32) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|_| EmulatorError::ImageNotFound(path.display().to_string()))?;
        log::info!("Read {} byte image from {}", bytes.len(), path.display());
        Self::from_bytes(&bytes, entry)
    }

    /// Image bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Validated entry address
    pub fn entry(&self) -> u32 {
        self.entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_entry_must_be_inside_image() {
        let bytes = [0u8; 8];
        assert!(Image::from_bytes(&bytes, Bus::SRAM_START).is_ok());
        assert!(Image::from_bytes(&bytes, Bus::SRAM_START + 4).is_ok());
        assert!(matches!(
            Image::from_bytes(&bytes, Bus::SRAM_START + 8),
            Err(EmulatorError::InvalidEntryAddress { entry }) if entry == Bus::SRAM_START + 8
        ));
        assert!(Image::from_bytes(&bytes, 0).is_err());
    }

    #[test]
    fn test_image_too_large() {
        let bytes = vec![0u8; Bus::SRAM_SIZE + 1];
        assert!(matches!(
            Image::from_bytes(&bytes, Bus::SRAM_START),
            Err(EmulatorError::ImageTooLarge { got, limit })
                if got == Bus::SRAM_SIZE + 1 && limit == Bus::SRAM_SIZE
        ));
    }

    #[test]
    fn test_exact_sram_fit() {
        let bytes = vec![0u8; Bus::SRAM_SIZE];
        assert!(Image::from_bytes(&bytes, Bus::SRAM_START).is_ok());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&0x0010_0073u32.to_le_bytes()).unwrap();

        let image = Image::from_file(file.path(), Bus::SRAM_START).unwrap();
        assert_eq!(image.data().len(), 4);
        assert_eq!(image.entry(), Bus::SRAM_START);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Image::from_file("/no/such/image.bin", Bus::SRAM_START),
            Err(EmulatorError::ImageNotFound(_))
        ));
    }
}
