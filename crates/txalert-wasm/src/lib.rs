//! WASM bindings for the banking notification classifier.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use txalert_core::{TransactionRecord, TxAlertConfig};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn record_to_js(record: Option<TransactionRecord>) -> Result<JsValue, JsValue> {
    match record {
        Some(record) => to_js(&record),
        None => Ok(JsValue::NULL),
    }
}

/// Transaction classifier class for browser use.
#[wasm_bindgen]
pub struct TransactionClassifier {
    inner: txalert_core::TransactionClassifier,
}

#[wasm_bindgen]
impl TransactionClassifier {
    /// Create a classifier, optionally from a JSON configuration document.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<TransactionClassifier, JsValue> {
        let config = match config_json.as_deref() {
            Some(json) if !json.trim().is_empty() => serde_json::from_str::<TxAlertConfig>(json)
                .map_err(|e| JsValue::from_str(&e.to_string()))?,
            _ => TxAlertConfig::default(),
        };

        let inner = txalert_core::TransactionClassifier::from_config(&config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(Self { inner })
    }

    #[wasm_bindgen(js_name = shouldProcess)]
    pub fn should_process(&self, source_app: &str) -> bool {
        self.inner.should_process(source_app)
    }

    #[wasm_bindgen(js_name = isTransactionCandidate)]
    pub fn is_transaction_candidate(&self, text: &str) -> bool {
        self.inner.is_transaction_candidate(text)
    }

    /// Dollar amount found in `text`, or `undefined`.
    #[wasm_bindgen(js_name = extractAmount)]
    pub fn extract_amount(&self, text: &str) -> Option<f64> {
        self.inner
            .extract_amount(text)
            .and_then(|d| d.to_string().parse().ok())
    }

    #[wasm_bindgen(js_name = extractVendor)]
    pub fn extract_vendor(&self, text: &str) -> Option<String> {
        self.inner.extract_vendor(text)
    }

    /// Classify a notification. Returns the wire record or `null`.
    ///
    /// `now` defaults to `Date.now()`.
    #[wasm_bindgen]
    pub fn classify(
        &self,
        source_app: &str,
        title: Option<String>,
        text: Option<String>,
        big_text: Option<String>,
        now: Option<f64>,
    ) -> Result<JsValue, JsValue> {
        let now = now.unwrap_or_else(js_sys::Date::now) as i64;
        let record = self.inner.classify(
            source_app,
            title.as_deref().unwrap_or_default(),
            text.as_deref().unwrap_or_default(),
            big_text.as_deref().unwrap_or_default(),
            now,
        );
        record_to_js(record)
    }

    /// Monitored package names, sorted.
    #[wasm_bindgen]
    pub fn allowlist(&self) -> Vec<String> {
        self.inner.allowlist().into_iter().map(String::from).collect()
    }
}
