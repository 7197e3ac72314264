//! Input validation helpers
//!
//! Centralized text length constants, party-size bounds and guest contact
//! normalization. Everything here runs before a request reaches the
//! evaluation engine, which assumes well-formed input.

use validator::ValidateEmail;

use crate::utils::{AppError, AppResult, ErrorCode};

// ── Limits ──────────────────────────────────────────────────────────

/// Guest names
pub const MAX_NAME_LEN: usize = 200;

/// Notes
pub const MAX_NOTE_LEN: usize = 500;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Party size bounds (inclusive)
pub const MIN_PARTY_SIZE: u32 = 1;
pub const MAX_PARTY_SIZE: u32 = 20;

/// Phone number digit count bounds (E.164 allows up to 15)
pub const MIN_PHONE_DIGITS: usize = 7;
pub const MAX_PHONE_DIGITS: usize = 15;

// ── Generic helpers ─────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")).with_detail("field", field));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(value: &Option<String>, field: &str, max_len: usize) -> AppResult<()> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

pub fn validate_party_size(party_size: u32) -> AppResult<()> {
    if !(MIN_PARTY_SIZE..=MAX_PARTY_SIZE).contains(&party_size) {
        return Err(AppError::with_message(
            ErrorCode::PartySizeOutOfRange,
            format!("Party size must be between {MIN_PARTY_SIZE} and {MAX_PARTY_SIZE}, got {party_size}"),
        )
        .with_detail("field", "party_size"));
    }
    Ok(())
}

// ── Contact normalization ───────────────────────────────────────────

/// 去首尾空白，空串视为未填写
fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn normalize_name(name: &str) -> AppResult<String> {
    validate_required_text(name, "guest_name", MAX_NAME_LEN)?;
    Ok(name.trim().to_string())
}

pub fn normalize_notes(notes: Option<String>) -> AppResult<Option<String>> {
    let notes = blank_to_none(notes);
    validate_optional_text(&notes, "notes", MAX_NOTE_LEN)?;
    Ok(notes)
}

/// 邮箱：去空白、转小写、格式校验
pub fn normalize_email(email: Option<String>) -> AppResult<Option<String>> {
    let Some(email) = blank_to_none(email).map(|e| e.to_lowercase()) else {
        return Ok(None);
    };
    if email.len() > MAX_EMAIL_LEN || !email.validate_email() {
        return Err(AppError::validation(format!("Invalid email address: {}", email))
            .with_detail("field", "guest_email"));
    }
    Ok(Some(email))
}

/// 电话：只保留数字，再按规范格式输出
///
/// - 10 位 → `(XXX) XXX-XXXX`
/// - 11 位且以 1 开头 → `+1 (XXX) XXX-XXXX`
/// - 其他 → `+<digits>`
pub fn normalize_phone(phone: Option<String>) -> AppResult<Option<String>> {
    let Some(raw) = blank_to_none(phone) else {
        return Ok(None);
    };
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len()) {
        return Err(AppError::validation(format!("Invalid phone number: {}", raw))
            .with_detail("field", "guest_phone"));
    }
    Ok(Some(format_phone(&digits)))
}

fn format_phone(digits: &str) -> String {
    match digits.len() {
        10 => format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..10]),
        11 if digits.starts_with('1') => {
            format!("+1 ({}) {}-{}", &digits[1..4], &digits[4..7], &digits[7..11])
        }
        _ => format!("+{}", digits),
    }
}

/// 规范化后的客人联系方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestContact {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

pub fn normalize_contact(
    name: &str,
    email: Option<String>,
    phone: Option<String>,
) -> AppResult<GuestContact> {
    Ok(GuestContact {
        name: normalize_name(name)?,
        email: normalize_email(email)?,
        phone: normalize_phone(phone)?,
    })
}
