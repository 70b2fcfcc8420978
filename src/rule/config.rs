//! Loading and saving rules as YAML or JSON.

use super::RuleSpec;
use crate::error::{RenameError, Result};
use std::path::Path;

impl RuleSpec {
    /// Loads and validates a rule from a YAML file.
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Loads and validates a rule from a JSON file.
    pub fn from_json(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Loads a rule from a file, picking the format from its extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(path),
            _ => Self::from_yaml(path),
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let rule: Self = serde_yaml::from_str(content).map_err(|e| {
            RenameError::InvalidConfig(format!("Failed to parse YAML rule: {}", e))
        })?;
        rule.validate()?;
        Ok(rule)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let rule: Self = serde_json::from_str(content).map_err(|e| {
            RenameError::InvalidConfig(format!("Failed to parse JSON rule: {}", e))
        })?;
        rule.validate()?;
        Ok(rule)
    }

    /// Serializes the rule to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Serializes the rule to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Saves the rule to a YAML file.
    pub fn save_yaml(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_yaml()?)?;
        Ok(())
    }
}

fn read_config(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        RenameError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read rule file {}: {}", path.display(), e),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Action, Anchor, CountingText, InsertText, Position, SortKey, TextItem};
    use tempfile::TempDir;

    #[test]
    fn test_parse_yaml_rule() {
        let yaml = r#"
action: add
match:
  patterns: ["IMG"]
  case_sensitive: false
insert:
  text:
    type: counting
    prefix: "-"
    start: 1
    width: 3
placement:
  position: end
  anchor: of_file_name
sort:
  key: modify_date
links:
  - gallery.html
"#;
        let rule = RuleSpec::from_yaml_str(yaml).unwrap();
        assert_eq!(rule.action, Action::Add);
        assert!(!rule.matching.case_sensitive);
        assert_eq!(rule.matching.match_limit, None);
        assert_eq!(
            rule.insert.text,
            InsertText::Counting(CountingText::new(1).prefix("-").width(3))
        );
        assert_eq!(rule.placement.position, Position::End);
        assert_eq!(rule.placement.anchor, Anchor::OfFileName);
        assert_eq!(rule.sort.unwrap().key, SortKey::ModifyDate);
        assert_eq!(rule.links.len(), 1);
    }

    #[test]
    fn test_parse_list_items() {
        let yaml = r#"
action: rename
match:
  patterns: [""]
insert:
  text:
    type: list
    items:
      - alpha
      - prefix: "beta-"
        start: 5
  repeat_list: true
"#;
        let rule = RuleSpec::from_yaml_str(yaml).unwrap();
        match &rule.insert.text {
            InsertText::List { items } => {
                assert_eq!(items[0], TextItem::Static("alpha".to_string()));
                assert_eq!(
                    items[1],
                    TextItem::Counting(CountingText::new(5).prefix("beta-"))
                );
            }
            other => panic!("unexpected insert text: {other:?}"),
        }
        assert!(rule.insert.repeat_list);
    }

    #[test]
    fn test_invalid_rule_rejected_on_load() {
        let json = r#"{
            "action": "replace",
            "match": { "patterns": ["a", "b"], "same_match_index": true },
            "insert": { "text": { "type": "list", "items": ["x"] } }
        }"#;
        assert!(matches!(
            RuleSpec::from_json_str(json),
            Err(RenameError::RuleMismatch(_))
        ));
    }

    #[test]
    fn test_malformed_config() {
        assert!(matches!(
            RuleSpec::from_yaml_str("action: [nonsense"),
            Err(RenameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rule.yaml");
        let rule = RuleSpec::replace("txt", "doc")
            .placement(Position::End, Anchor::OfExtension)
            .matching(|m| m.case_insensitive());

        rule.save_yaml(&path).unwrap();
        let loaded = RuleSpec::from_file(&path).unwrap();
        assert_eq!(loaded, rule);
    }
}
