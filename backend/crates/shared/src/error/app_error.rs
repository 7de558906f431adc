//! Application Error - Unified error type for the application
//!
//! Defines [`AppError`] struct, the serialized [`ErrorEnvelope`] and the
//! [`AppResult<T>`] type alias.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::code::ErrorCode;
use super::kind::ErrorKind;

/// アプリケーション統一エラー型
///
/// プロジェクト全体で使用する標準エラー型です。
/// ビルダーパターンを使用してエラーを構築できます。
///
/// ## Fields
/// * `kind` - エラーの分類（HTTP ステータスコードにマッピング）
/// * `code` - 機械可読なエラーコード
/// * `message` - ユーザー向けのエラーメッセージ
/// * `details` - フィールド単位の詳細（オプション）
/// * `request_id` - 相関 ID（オプション）
/// * `timestamp` - 発生時刻（UTC）
/// * `source` - 元のエラー（オプション、ログ専用）
///
/// ## Examples
/// ```rust
/// use kernel::error::{app_error::AppError, code::ErrorCode, kind::ErrorKind};
///
/// // シンプルなエラー
/// let err = AppError::new(ErrorKind::NotFound, ErrorCode::UserNotFound, "User not found");
///
/// // 相関 ID 付き
/// let err = AppError::unauthorized(ErrorCode::TokenInvalid, "Invalid or expired token")
///     .with_request_id("req-1");
/// assert_eq!(err.request_id(), Some("req-1"));
/// ```
pub struct AppError {
    /// エラー種別
    kind: ErrorKind,
    /// エラーコード
    code: ErrorCode,
    /// ユーザー向けメッセージ
    message: Cow<'static, str>,
    /// フィールド単位の詳細
    details: Option<Map<String, Value>>,
    /// 相関 ID
    request_id: Option<String>,
    /// 発生時刻
    timestamp: DateTime<Utc>,
    /// 元のエラー（デバッグ用）
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

/// アプリケーション結果型エイリアス
///
/// `Result<T, AppError>` の省略形です。
pub type AppResult<T> = Result<T, AppError>;

/// クライアントに返すエラーエンベロープ
///
/// `{type, code, message, details?, request_id?, timestamp}` の形で
/// シリアライズされます。`source` は決して含まれません。
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope<'a> {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub code: ErrorCode,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<&'a Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<&'a str>,
    pub timestamp: DateTime<Utc>,
}

impl AppError {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// 新しいエラーを作成
    ///
    /// ## Arguments
    /// * `kind` - エラー種別
    /// * `code` - エラーコード
    /// * `message` - ユーザー向けメッセージ
    #[inline]
    pub fn new(kind: ErrorKind, code: ErrorCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            code,
            message: message.into(),
            details: None,
            request_id: None,
            timestamp: Utc::now(),
            source: None,
        }
    }

    // ========================================================================
    // Convenience constructors
    // ========================================================================

    /// 400 Bad Request エラー
    #[inline]
    pub fn bad_request(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BadRequest, code, message)
    }

    /// 400 Validation エラー
    #[inline]
    pub fn validation(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Validation, code, message)
    }

    /// 401 Unauthorized エラー
    #[inline]
    pub fn unauthorized(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Unauthorized, code, message)
    }

    /// 403 Forbidden エラー
    #[inline]
    pub fn forbidden(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Forbidden, code, message)
    }

    /// 404 Not Found エラー
    #[inline]
    pub fn not_found(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NotFound, code, message)
    }

    /// 408 Request Timeout エラー
    #[inline]
    pub fn request_timeout(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::RequestTimeout, ErrorCode::RequestTimeout, message)
    }

    /// 409 Conflict エラー
    #[inline]
    pub fn conflict(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Conflict, code, message)
    }

    /// 500 Internal Server Error
    #[inline]
    pub fn internal(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InternalServerError, code, message)
    }

    /// 503 Service Unavailable エラー
    #[inline]
    pub fn service_unavailable(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, code, message)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// フィールド単位の詳細を設定
    #[inline]
    pub fn with_details(mut self, details: Map<String, Value>) -> Self {
        self.details = Some(details);
        self
    }

    /// 相関 ID を設定
    ///
    /// 既に設定されている場合は上書きしません。
    #[inline]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        if self.request_id.is_none() {
            self.request_id = Some(request_id.into());
        }
        self
    }

    /// 元のエラーを設定（デバッグ用）
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::{app_error::{AppError, AppResult}, code::ErrorCode};
    ///
    /// fn read_config() -> AppResult<()> {
    ///     std::fs::read_to_string("config.json").map_err(|e| {
    ///         AppError::internal(ErrorCode::InternalError, "Failed to read config").with_source(e)
    ///     })?;
    ///     Ok(())
    /// }
    /// ```
    #[inline]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// エラー種別を取得
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// エラーコードを取得
    #[inline]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// HTTP ステータスコードを取得
    #[inline]
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    /// メッセージを取得
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 詳細を取得
    #[inline]
    pub fn details(&self) -> Option<&Map<String, Value>> {
        self.details.as_ref()
    }

    /// 相関 ID を取得
    #[inline]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// 発生時刻を取得
    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// サーバーエラーかどうか
    #[inline]
    pub fn is_server_error(&self) -> bool {
        self.kind.is_server_error()
    }

    /// クライアントエラーかどうか
    #[inline]
    pub fn is_client_error(&self) -> bool {
        self.kind.is_client_error()
    }

    /// シリアライズ用のエンベロープを借用で構築
    pub fn envelope(&self) -> ErrorEnvelope<'_> {
        ErrorEnvelope {
            kind: self.kind,
            code: self.code,
            message: &self.message,
            details: self.details.as_ref(),
            request_id: self.request_id.as_deref(),
            timestamp: self.timestamp,
        }
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("AppError");
        builder.field("kind", &self.kind);
        builder.field("code", &self.code);
        builder.field("message", &self.message);
        if let Some(details) = &self.details {
            builder.field("details", details);
        }
        if let Some(request_id) = &self.request_id {
            builder.field("request_id", request_id);
        }
        if let Some(source) = &self.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.code, self.message)
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}
