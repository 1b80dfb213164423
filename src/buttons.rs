use crate::config::{BUTTON_LABEL, BUTTON_URL};

/// A pressable inline element with a label and a target URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlButton {
    pub label: String,
    pub url: String,
}

/// Grid of inline buttons attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonLayout {
    pub rows: Vec<Vec<UrlButton>>,
}

impl ButtonLayout {
    /// A layout holding exactly one button.
    pub fn single(label: &str, url: &str) -> Self {
        Self {
            rows: vec![vec![UrlButton {
                label: label.to_string(),
                url: url.to_string(),
            }]],
        }
    }
}

/// Replace whatever layout the source carried with the fixed call-to-action
/// button. The input is never inspected; the relay only calls this when the
/// source message had some markup attached.
pub fn rewrite(_existing: Option<&ButtonLayout>) -> ButtonLayout {
    ButtonLayout::single(BUTTON_LABEL, BUTTON_URL)
}
