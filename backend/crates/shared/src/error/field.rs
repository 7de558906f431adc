//! Field Errors - Collecting per-field validation failures
//!
//! A request body is validated field by field; every failure is recorded
//! and reported together as one `Validation` error whose `details` map
//! each field name to `{code, message}`.

use serde_json::{Map, Value, json};

use super::app_error::{AppError, AppResult};
use super::code::ErrorCode;

/// 集約エラーのメッセージ
pub const INVALID_REQUEST_BODY_MESSAGE: &str = "Invalid request body";

/// フィールド検証エラーの集約器
///
/// ## Examples
/// ```rust
/// use kernel::error::{app_error::AppError, code::ErrorCode, field::FieldErrors};
///
/// let mut errors = FieldErrors::new();
/// let name: Option<String> = errors.check(
///     "username",
///     Err(AppError::validation(ErrorCode::FieldTooShort, "Too short")),
/// );
/// assert!(name.is_none());
///
/// let err = errors.into_result().unwrap_err();
/// assert_eq!(err.details().unwrap()["username"]["code"], "FIELD_TOO_SHORT");
/// ```
#[derive(Debug, Default)]
pub struct FieldErrors {
    details: Map<String, Value>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// 検証結果を記録し、成功時の値を返す
    ///
    /// 同じフィールドで複数回失敗した場合は最初のエラーを残します。
    pub fn check<T>(&mut self, field: &str, result: AppResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.add(field, err.code(), err.message().to_owned());
                None
            }
        }
    }

    /// エラーを直接追加
    pub fn add(&mut self, field: &str, code: ErrorCode, message: impl Into<String>) {
        self.details
            .entry(field.to_owned())
            .or_insert_with(|| json!({ "code": code, "message": message.into() }));
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }

    /// エラーが無ければ `Ok(())`、あれば集約した `Validation` エラー
    pub fn into_result(self) -> AppResult<()> {
        if self.details.is_empty() {
            Ok(())
        } else {
            Err(self.into_error())
        }
    }

    /// 記録済みのエラーから `Validation` エラーを構築
    pub fn into_error(self) -> AppError {
        AppError::validation(ErrorCode::InvalidValue, INVALID_REQUEST_BODY_MESSAGE)
            .with_details(self.details)
    }
}
