//! Crate error type
//!
//! The simulation itself never fails; these cover the outer surfaces
//! (settings, browser bootstrap).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Settings parse error: {0}")]
    SettingsParse(#[from] serde_json::Error),

    #[error("No browser window")]
    NoWindow,

    #[error("No document")]
    NoDocument,

    #[error("DOM call failed: {0}")]
    Dom(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for Error {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Error::Dom(format!("{:?}", value))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<Error> for wasm_bindgen::JsValue {
    fn from(err: Error) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
