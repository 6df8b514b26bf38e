//! Failures of the browser shell. Game logic itself cannot fail; only wiring
//! the canvas and listeners into the page can.

use wasm_bindgen::JsValue;

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("document has no body")]
    NoBody,
    #[error("canvas 2d context unavailable")]
    NoContext,
    #[error("DOM call failed: {0}")]
    Dom(String),
    #[cfg(feature = "serde_json")]
    #[error("invalid greeting config: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<JsValue> for ShellError {
    fn from(value: JsValue) -> Self {
        ShellError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<ShellError> for JsValue {
    fn from(err: ShellError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_readable() {
        assert_eq!(ShellError::NoBody.to_string(), "document has no body");
        assert_eq!(
            ShellError::Dom("boom".into()).to_string(),
            "DOM call failed: boom"
        );
    }
}
