use crate::{error::Error, types::WalletBalances};
use alloy_primitives::{Address, U256};
use chrono::{DateTime, Local, TimeZone};
use leptos::prelude::window;

pub fn alert(msg: impl AsRef<str>) {
    let _ = window().alert_with_message(msg.as_ref());
}

pub fn shorten_address(address: impl ToString) -> String {
    let address = address.to_string();
    if address.len() > 12 {
        format!("{}...{}", &address[..6], &address[address.len() - 4..])
    } else {
        address
    }
}

fn scale(decimals: u8) -> U256 {
    U256::from(10u64).pow(U256::from(decimals))
}

/// Formats a raw token amount with trailing zeros trimmed, keeping at least one fractional digit.
pub fn display_token_amount(amount: U256, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }

    let factor = scale(decimals);
    let integer_part = amount / factor;
    let fractional_part = amount % factor;

    let fractional_str = format!(
        "{:0>width$}",
        fractional_part.to_string(),
        width = decimals as usize
    );
    let trimmed = fractional_str.trim_end_matches('0');

    if trimmed.is_empty() {
        format!("{integer_part}.0")
    } else {
        format!("{integer_part}.{trimmed}")
    }
}

/// Parses a decimal string such as `"12.5"` into a raw token amount.
pub fn parse_token_amount(amount: impl AsRef<str>, decimals: u8) -> Result<U256, Error> {
    let amount = amount.as_ref().trim();

    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(Error::invalid_amount("amount is empty"));
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(Error::invalid_amount(format!("{amount} is not a number")));
    }

    // Digits past the token's precision are only allowed when they are zeros.
    let fraction = if fraction.len() > decimals as usize {
        let (kept, excess) = fraction.split_at(decimals as usize);
        if excess.chars().any(|c| c != '0') {
            return Err(Error::invalid_amount(format!(
                "too many decimals, at most {decimals} allowed"
            )));
        }
        kept
    } else {
        fraction
    };

    let whole = if whole.is_empty() {
        U256::ZERO
    } else {
        whole
            .parse::<U256>()
            .map_err(|_| Error::invalid_amount(format!("{amount} is too large")))?
    };
    let fraction = format!("{fraction:0<width$}", width = decimals as usize);
    let fraction = if fraction.is_empty() {
        U256::ZERO
    } else {
        fraction.parse::<U256>().map_err(Error::invalid_amount)?
    };

    whole
        .checked_mul(scale(decimals))
        .and_then(|whole| whole.checked_add(fraction))
        .ok_or_else(|| Error::invalid_amount(format!("{amount} is too large")))
}

/// The wallet balance of `token` followed by its symbol, or `--.--` when it was never loaded.
pub fn human_balance(
    balances: &WalletBalances,
    token: Address,
    decimals: u8,
    symbol: &str,
) -> String {
    match balances.get(&token) {
        Some(balance) => format!("{} {symbol}", display_token_amount(*balance, decimals)),
        None => "--.--".to_string(),
    }
}

/// Current unix time in seconds, from the browser clock.
pub fn unix_now() -> u64 {
    (web_sys::js_sys::Date::now() / 1000.0) as u64
}

pub fn format_timestamp<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%a, %b %-d, %Y %-I:%M %p").to_string()
}

/// Formats a unix timestamp in the browser's local time zone.
pub fn format_local_time(seconds: u64) -> String {
    match DateTime::from_timestamp(seconds as i64, 0) {
        Some(time) => format_timestamp(&time.with_timezone(&Local)),
        None => "--".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    #[test]
    fn shortens_long_addresses() {
        let address =
            Address::from_str("0x6CB1fcFFF4757B8b7B0BCFE25f43F6b4626FDAfF").unwrap();

        assert_eq!(shorten_address(address), "0x6CB1...DAfF");
        assert_eq!(shorten_address("0x1234"), "0x1234");
    }

    #[test]
    fn displays_amounts() {
        assert_eq!(display_token_amount(U256::from(100_000_000u64), 6), "100.0");
        assert_eq!(display_token_amount(U256::from(1_500_000u64), 6), "1.5");
        assert_eq!(display_token_amount(U256::from(1u64), 6), "0.000001");
        assert_eq!(display_token_amount(U256::ZERO, 18), "0.0");
        assert_eq!(display_token_amount(U256::from(42u64), 0), "42");
    }

    #[test]
    fn parses_amounts() {
        assert_eq!(parse_token_amount("1.5", 6), Ok(U256::from(1_500_000u64)));
        assert_eq!(parse_token_amount("100", 6), Ok(U256::from(100_000_000u64)));
        assert_eq!(parse_token_amount(".25", 2), Ok(U256::from(25u64)));
        assert_eq!(parse_token_amount(" 7. ", 1), Ok(U256::from(70u64)));
        assert_eq!(parse_token_amount("1.500000000", 6), Ok(U256::from(1_500_000u64)));
        assert_eq!(
            parse_token_amount("1", 18),
            Ok(U256::from(1_000_000_000_000_000_000u64))
        );
    }

    #[test]
    fn rejects_bad_amounts() {
        assert!(parse_token_amount("", 6).is_err());
        assert!(parse_token_amount(".", 6).is_err());
        assert!(parse_token_amount("-1", 6).is_err());
        assert!(parse_token_amount("1e5", 6).is_err());
        assert!(parse_token_amount("1.2.3", 6).is_err());
        assert!(parse_token_amount("0.0000001", 6).is_err());
        assert!(matches!(
            parse_token_amount("abc", 6),
            Err(Error::InvalidAmount(_))
        ));
    }

    #[test]
    fn parse_and_display_agree() {
        let raw = parse_token_amount("1234.5678", 18).unwrap();
        assert_eq!(display_token_amount(raw, 18), "1234.5678");
    }

    #[test]
    fn balances_fall_back_to_placeholder() {
        let token = Address::repeat_byte(0x11);
        let mut balances = WalletBalances::new();

        assert_eq!(human_balance(&balances, token, 6, "USDT"), "--.--");

        balances.insert(token, U256::from(2_500_000u64));
        assert_eq!(human_balance(&balances, token, 6, "USDT"), "2.5 USDT");
    }

    #[test]
    fn formats_timestamps() {
        let time = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert_eq!(format_timestamp(&time), "Tue, Nov 14, 2023 10:13 PM");
    }
}
