//! Move classification chosen at the start of a scan run.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Kind of inventory move being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveType {
    #[default]
    PalletToZone,
    AssetToPallet,
    BinToBin,
    InitialBin,
}

impl MoveType {
    /// All move types in selector order.
    pub const ALL: [MoveType; 4] = [
        MoveType::PalletToZone,
        MoveType::AssetToPallet,
        MoveType::BinToBin,
        MoveType::InitialBin,
    ];

    /// Wire tag (e.g. "bin-to-bin").
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveType::PalletToZone => "pallet-to-zone",
            MoveType::AssetToPallet => "asset-to-pallet",
            MoveType::BinToBin => "bin-to-bin",
            MoveType::InitialBin => "initial-bin",
        }
    }

    /// Get the display name for the move type.
    pub fn display_name(&self) -> &'static str {
        match self {
            MoveType::PalletToZone => "Pallet to Zone",
            MoveType::AssetToPallet => "Asset to Pallet",
            MoveType::BinToBin => "Bin to Bin Transfer",
            MoveType::InitialBin => "Initial Bin Assignment",
        }
    }

    /// Message shown once a move of this type has been committed.
    pub fn completion_message(&self) -> &'static str {
        match self {
            MoveType::PalletToZone => "The pallet has been successfully moved to the new zone.",
            MoveType::AssetToPallet => "The asset has been successfully assigned to the pallet.",
            MoveType::BinToBin => "The item has been successfully transferred between bins.",
            MoveType::InitialBin => "The initial bin location has been successfully assigned.",
        }
    }

    /// Whether the second scan identifies an individual asset rather than a pallet.
    pub fn scans_asset(&self) -> bool {
        matches!(self, MoveType::AssetToPallet)
    }
}

impl fmt::Display for MoveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoveType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        MoveType::ALL
            .into_iter()
            .find(|t| t.as_str() == tag)
            .ok_or_else(|| AppError::parse(format!("Unknown move type '{}'", s.trim())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_pallet_to_zone() {
        assert_eq!(MoveType::default(), MoveType::PalletToZone);
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!("bin-to-bin".parse::<MoveType>().unwrap(), MoveType::BinToBin);
        assert_eq!(" Initial-Bin ".parse::<MoveType>().unwrap(), MoveType::InitialBin);
        assert!("pallet".parse::<MoveType>().is_err());
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&MoveType::AssetToPallet).unwrap();
        assert_eq!(json, "\"asset-to-pallet\"");
    }

    #[test]
    fn test_completion_message_per_type() {
        assert!(MoveType::PalletToZone.completion_message().contains("new zone"));
        assert!(MoveType::AssetToPallet.completion_message().contains("assigned to the pallet"));
        assert!(MoveType::BinToBin.completion_message().contains("between bins"));
        assert!(MoveType::InitialBin.completion_message().contains("initial bin"));
    }
}
