//! Error Code - Stable machine-readable error codes
//!
//! [`ErrorKind`](super::kind::ErrorKind) decides the HTTP status, while
//! [`ErrorCode`] tells the client precisely what went wrong.

use serde::Serialize;

/// エラーコードの列挙体
///
/// クライアントが分岐に使う安定した識別子です。
/// 文字列表現は SCREAMING_SNAKE_CASE で固定され、変更してはいけません。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorCode {
    // Authentication
    InvalidCredentials,
    AccountDeactivated,
    UserAlreadyExists,
    TokenGenerationFailed,
    TokenInvalid,
    MissingAuthorizationHeader,
    InvalidAuthorizationFormat,
    UserNotFound,

    // Validation
    RequiredField,
    InvalidFormat,
    InvalidValue,
    FieldTooShort,
    FieldTooLong,
    InvalidRequestBody,

    // Infrastructure
    DatabaseError,
    HashingFailed,
    RequestTimeout,
    InternalError,
}

impl ErrorCode {
    /// ワイヤ上の文字列表現
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorCode::AccountDeactivated => "ACCOUNT_DEACTIVATED",
            ErrorCode::UserAlreadyExists => "USER_ALREADY_EXISTS",
            ErrorCode::TokenGenerationFailed => "TOKEN_GENERATION_FAILED",
            ErrorCode::TokenInvalid => "TOKEN_INVALID",
            ErrorCode::MissingAuthorizationHeader => "MISSING_AUTHORIZATION_HEADER",
            ErrorCode::InvalidAuthorizationFormat => "INVALID_AUTHORIZATION_FORMAT",
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::RequiredField => "REQUIRED_FIELD",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::InvalidValue => "INVALID_VALUE",
            ErrorCode::FieldTooShort => "FIELD_TOO_SHORT",
            ErrorCode::FieldTooLong => "FIELD_TOO_LONG",
            ErrorCode::InvalidRequestBody => "INVALID_REQUEST_BODY",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::HashingFailed => "HASHING_FAILED",
            ErrorCode::RequestTimeout => "REQUEST_TIMEOUT",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_form_matches_as_str() {
        for code in [
            ErrorCode::InvalidCredentials,
            ErrorCode::MissingAuthorizationHeader,
            ErrorCode::InvalidAuthorizationFormat,
            ErrorCode::FieldTooShort,
            ErrorCode::InvalidRequestBody,
            ErrorCode::InternalError,
        ] {
            let json = serde_json::to_value(code).unwrap();
            assert_eq!(json, serde_json::Value::from(code.as_str()));
        }
    }
}
