//! Shared path-id parsing (§7 `BadRequest` "malformed ... ids").

use cortex_core::errors::CortexError;

pub fn parse_id<T, F>(raw: &str, ctor: F) -> Result<T, CortexError>
where
    F: FnOnce(&str) -> Result<T, uuid::Error>,
{
    ctor(raw).map_err(|_| CortexError::BadRequest { message: format!("malformed id: {raw}") })
}
