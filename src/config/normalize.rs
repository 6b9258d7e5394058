use crate::config::types::{
    ConfigDocument, DEFAULT_BASE_URL, DEFAULT_CHECK_INTERVAL, DEFAULT_LANGUAGE,
    DEFAULT_LINE_THRESHOLD, DEFAULT_LOG_LEVEL, DEFAULT_MODEL,
};

/// Fill the always-required runtime fields when they are empty or zero.
///
/// Runs on every load, migrated or not. Only touches the in-memory document.
pub fn normalize(doc: &mut ConfigDocument) {
    let openai = &mut doc.notifications.openai;
    if openai.base_url.is_empty() {
        openai.base_url = DEFAULT_BASE_URL.to_string();
    }
    if openai.model.is_empty() {
        openai.model = DEFAULT_MODEL.to_string();
    }

    let defaults = &mut doc.defaults;
    if defaults.line_threshold == 0 {
        defaults.line_threshold = DEFAULT_LINE_THRESHOLD;
    }
    if defaults.check_interval.is_zero() {
        defaults.check_interval = DEFAULT_CHECK_INTERVAL;
    }
    if defaults.language.is_empty() {
        defaults.language = DEFAULT_LANGUAGE.to_string();
    }

    if doc.logging.level.is_empty() {
        doc.logging.level = DEFAULT_LOG_LEVEL.to_string();
    }
}
