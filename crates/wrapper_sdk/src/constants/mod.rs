use std::str::FromStr;

pub mod addrs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainId {
    Sepolia,
}

impl ChainId {
    pub const fn id(&self) -> u64 {
        match self {
            ChainId::Sepolia => 11_155_111,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChainId::Sepolia => "Sepolia",
        }
    }

    pub fn explorer_url(&self) -> &'static str {
        match self {
            ChainId::Sepolia => "https://sepolia.etherscan.io",
        }
    }

    /// Returns the `0x`-prefixed hex form that EIP-1193 wallets expect.
    pub fn hex(&self) -> String {
        format!("{:#x}", self.id())
    }
}

impl TryFrom<u64> for ChainId {
    type Error = &'static str;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            11_155_111 => Ok(ChainId::Sepolia),
            _ => Err("Unsupported chain ID"),
        }
    }
}

impl FromStr for ChainId {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = match s.strip_prefix("0x") {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => s.parse::<u64>(),
        }
        .map_err(|_| "Invalid chain ID")?;

        ChainId::try_from(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_and_hex_chain_ids() {
        assert_eq!("11155111".parse::<ChainId>(), Ok(ChainId::Sepolia));
        assert_eq!("0xaa36a7".parse::<ChainId>(), Ok(ChainId::Sepolia));
        assert_eq!(ChainId::Sepolia.hex(), "0xaa36a7");
        assert!("0x1".parse::<ChainId>().is_err());
        assert!("sepolia".parse::<ChainId>().is_err());
    }
}
