use serde::{Deserialize, Serialize};

/// Events pushed into the engine by presentation surfaces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail", rename_all = "camelCase")]
pub enum UiEvent {
    /// Saved list changed somewhere; re-read it
    SavedPropertiesChanged,
    /// Header search box submitted a location term
    SearchTermChanged(String),
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::SavedPropertiesChanged => "savedPropertiesChanged",
            UiEvent::SearchTermChanged(_) => "searchTermChanged",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_names() {
        assert_eq!(UiEvent::SavedPropertiesChanged.name(), "savedPropertiesChanged");
        assert_eq!(UiEvent::SearchTermChanged("x".into()).name(), "searchTermChanged");
    }

    #[test]
    fn test_wire_shape() {
        let event: UiEvent =
            serde_json::from_value(json!({ "type": "searchTermChanged", "detail": "Austin" })).unwrap();
        assert_eq!(event, UiEvent::SearchTermChanged("Austin".to_string()));

        let value = serde_json::to_value(UiEvent::SavedPropertiesChanged).unwrap();
        assert_eq!(value, json!({ "type": "savedPropertiesChanged" }));
    }
}
