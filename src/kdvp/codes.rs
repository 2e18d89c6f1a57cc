use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Method of acquisition (F2 of a purchase row).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GainType {
    /// investment of capital; every exchange purchase is one of these
    A,
    /// purchase
    B,
    /// capital increase from the company's own resources
    C,
    /// no data
    D,
    /// change of capital
    E,
    /// inheritance
    F,
    /// gift
    G,
}

impl GainType {
    pub fn code(self) -> &'static str {
        match self {
            GainType::A => "A",
            GainType::B => "B",
            GainType::C => "C",
            GainType::D => "D",
            GainType::E => "E",
            GainType::F => "F",
            GainType::G => "G",
        }
    }
}

impl FromStr for GainType {
    type Err = Error;

    fn from_str(code: &str) -> Result<GainType, Error> {
        match code {
            "A" => Ok(GainType::A),
            "B" => Ok(GainType::B),
            "C" => Ok(GainType::C),
            "D" => Ok(GainType::D),
            "E" => Ok(GainType::E),
            "F" => Ok(GainType::F),
            "G" => Ok(GainType::G),
            _ => Err(unknown("gain type", code)),
        }
    }
}

/// Which inventory list an item belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryListType {
    /// securities
    Plvp,
    /// securities, short sales
    PlvpShort,
    /// securities held under a contract
    PlvpGb,
    /// securities held under a contract, short sales
    PlvpGbShort,
    /// shares in companies
    Pld,
    /// securities affected by capital reduction
    PlvpZok,
}

impl Default for InventoryListType {
    fn default() -> InventoryListType {
        InventoryListType::Plvp
    }
}

impl InventoryListType {
    pub fn code(self) -> &'static str {
        match self {
            InventoryListType::Plvp => "PLVP",
            InventoryListType::PlvpShort => "PLVPSHORT",
            InventoryListType::PlvpGb => "PLVPGB",
            InventoryListType::PlvpGbShort => "PLVPGBSHORT",
            InventoryListType::Pld => "PLD",
            InventoryListType::PlvpZok => "PLVPZOK",
        }
    }
}

impl FromStr for InventoryListType {
    type Err = Error;

    fn from_str(code: &str) -> Result<InventoryListType, Error> {
        match code {
            "PLVP" => Ok(InventoryListType::Plvp),
            "PLVPSHORT" => Ok(InventoryListType::PlvpShort),
            "PLVPGB" => Ok(InventoryListType::PlvpGb),
            "PLVPGBSHORT" => Ok(InventoryListType::PlvpGbShort),
            "PLD" => Ok(InventoryListType::Pld),
            "PLVPZOK" => Ok(InventoryListType::PlvpZok),
            _ => Err(unknown("inventory list type", code)),
        }
    }
}

/// Whether a filing is the original submission or a self-initiated report.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocWorkflowId {
    Original,
    SelfReport,
}

impl Default for DocWorkflowId {
    fn default() -> DocWorkflowId {
        DocWorkflowId::Original
    }
}

impl DocWorkflowId {
    pub fn code(self) -> &'static str {
        match self {
            DocWorkflowId::Original => "O",
            DocWorkflowId::SelfReport => "I",
        }
    }
}

impl FromStr for DocWorkflowId {
    type Err = Error;

    fn from_str(code: &str) -> Result<DocWorkflowId, Error> {
        match code {
            "O" => Ok(DocWorkflowId::Original),
            "I" => Ok(DocWorkflowId::SelfReport),
            _ => Err(unknown("workflow", code)),
        }
    }
}

macro_rules! display_code {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.code())
                }
            }
        )*
    };
}

display_code!(GainType, InventoryListType, DocWorkflowId);

fn unknown(kind: &'static str, code: &str) -> Error {
    Error::UnknownCode {
        kind,
        code: code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAIN_TYPES: [GainType; 7] = [
        GainType::A,
        GainType::B,
        GainType::C,
        GainType::D,
        GainType::E,
        GainType::F,
        GainType::G,
    ];

    const LIST_TYPES: [InventoryListType; 6] = [
        InventoryListType::Plvp,
        InventoryListType::PlvpShort,
        InventoryListType::PlvpGb,
        InventoryListType::PlvpGbShort,
        InventoryListType::Pld,
        InventoryListType::PlvpZok,
    ];

    #[test]
    fn gain_type_codes_are_single_letters() {
        let codes: Vec<&str> = GAIN_TYPES.iter().map(|t| t.code()).collect();
        assert_eq!(codes, vec!["A", "B", "C", "D", "E", "F", "G"]);
        for t in GAIN_TYPES.iter() {
            assert_eq!(t.code().parse::<GainType>().unwrap(), *t);
        }
    }

    #[test]
    fn list_type_codes() {
        assert_eq!(InventoryListType::default().code(), "PLVP");
        assert_eq!(InventoryListType::PlvpGbShort.to_string(), "PLVPGBSHORT");
        for t in LIST_TYPES.iter() {
            assert_eq!(t.code().parse::<InventoryListType>().unwrap(), *t);
        }
    }

    #[test]
    fn workflow_is_binary() {
        assert_eq!(DocWorkflowId::Original.code(), "O");
        assert_eq!(DocWorkflowId::SelfReport.code(), "I");
        assert_eq!("I".parse::<DocWorkflowId>().unwrap(), DocWorkflowId::SelfReport);
    }

    #[test]
    fn unknown_codes_are_rejected() {
        assert!(matches!(
            "H".parse::<GainType>(),
            Err(Error::UnknownCode { kind: "gain type", .. })
        ));
        assert!("plvp".parse::<InventoryListType>().is_err());
        assert!("X".parse::<DocWorkflowId>().is_err());
    }
}
