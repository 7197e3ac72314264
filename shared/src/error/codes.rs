//! Error codes for the booking engine
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Reservation errors
//! - 5xxx: Waitlist errors
//! - 6xxx: Settings errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Codes serialize as plain `u16` so any front end can match on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid format (date / time strings)
    InvalidFormat = 6,

    // ==================== 4xxx: Reservation ====================
    /// Reservation not found
    ReservationNotFound = 4001,
    /// Reservation has already been cancelled
    ReservationAlreadyCancelled = 4002,
    /// Status transition not allowed
    InvalidStatusTransition = 4003,
    /// Cancel token does not match any reservation
    CancelTokenInvalid = 4004,
    /// Party size outside the accepted range
    PartySizeOutOfRange = 4005,
    /// Requested change is refused by booking policy (hours, notice window)
    BookingRejected = 4006,

    // ==================== 5xxx: Waitlist ====================
    /// Waitlist entry not found
    WaitlistEntryNotFound = 5001,

    // ==================== 6xxx: Settings ====================
    /// Settings not configured
    SettingsNotFound = 6001,
    /// Settings failed validation
    SettingsInvalid = 6002,
    /// Total seating capacity is zero
    ZeroCapacity = 6003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Storage corrupted
    StorageCorrupted = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidFormat => "Invalid format",

            // Reservation
            ErrorCode::ReservationNotFound => "Reservation not found",
            ErrorCode::ReservationAlreadyCancelled => "Reservation has already been cancelled",
            ErrorCode::InvalidStatusTransition => "Reservation status transition is not allowed",
            ErrorCode::CancelTokenInvalid => "No reservation matches this link",
            ErrorCode::PartySizeOutOfRange => "Party size is out of range",
            ErrorCode::BookingRejected => "Booking request was rejected",

            // Waitlist
            ErrorCode::WaitlistEntryNotFound => "Waitlist entry not found",

            // Settings
            ErrorCode::SettingsNotFound => "Restaurant settings are not configured",
            ErrorCode::SettingsInvalid => "Restaurant settings are invalid",
            ErrorCode::ZeroCapacity => "Total seating capacity must be greater than zero",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::StorageCorrupted => "Storage is corrupted",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            6 => Ok(ErrorCode::InvalidFormat),

            4001 => Ok(ErrorCode::ReservationNotFound),
            4002 => Ok(ErrorCode::ReservationAlreadyCancelled),
            4003 => Ok(ErrorCode::InvalidStatusTransition),
            4004 => Ok(ErrorCode::CancelTokenInvalid),
            4005 => Ok(ErrorCode::PartySizeOutOfRange),
            4006 => Ok(ErrorCode::BookingRejected),

            5001 => Ok(ErrorCode::WaitlistEntryNotFound),

            6001 => Ok(ErrorCode::SettingsNotFound),
            6002 => Ok(ErrorCode::SettingsInvalid),
            6003 => Ok(ErrorCode::ZeroCapacity),

            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::StorageCorrupted),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
