// piiguard-core/src/validators.rs
//! Programmatic validation functions for specific PII types.
//!
//! This module provides additional validation logic beyond regular expression
//! matching for candidates such as credit card numbers and IPv4 addresses.
//! These functions help reduce false positives by applying checksum and range
//! checks; a candidate that fails validation is silently dropped by the
//! detector, never surfaced as an error.
//!
//! License: MIT OR APACHE 2.0

/// Validates a number using the Luhn algorithm.
///
/// The Luhn algorithm, also known as the Mod 10 algorithm, is a simple
/// checksum formula used to validate a variety of identification numbers,
/// such as credit card numbers.
///
/// # Arguments
///
/// * `num_str` - A string slice containing only digits.
///
/// # Returns
///
/// `true` if the number is valid according to the Luhn algorithm, `false` otherwise.
pub fn is_valid_luhn(num_str: &str) -> bool {
    let mut sum = 0;
    let mut alternate = false;

    for c in num_str.chars().rev() {
        let Some(mut digit) = c.to_digit(10) else { return false; };

        if alternate {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
        alternate = !alternate;
    }

    sum % 10 == 0
}

/// Helper function to validate credit card candidates.
///
/// Strips all non-digit characters (separators like spaces and dashes are
/// permitted in the raw match), then requires at least 13 digits and a
/// passing Luhn checksum. The digit-count floor filters out phone numbers
/// masquerading as card numbers.
///
/// # Arguments
///
/// * `cc_number` - The credit card number string slice to validate.
///
/// # Returns
///
/// `true` if the candidate is a plausible, Luhn-valid card number.
pub fn is_valid_credit_card_programmatically(cc_number: &str) -> bool {
    let digits: String = cc_number.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 13 {
        return false;
    }
    is_valid_luhn(&digits)
}

/// Helper function to validate IPv4 address candidates.
///
/// The dotted-quad regex admits octets up to 999; this check requires exactly
/// four integer octets, each in `[0, 255]`.
pub fn is_valid_ipv4_programmatically(addr: &str) -> bool {
    let mut octets = 0usize;
    for part in addr.split('.') {
        let Ok(value) = part.parse::<u16>() else { return false; };
        if value > 255 {
            return false;
        }
        octets += 1;
    }
    octets == 4
}
