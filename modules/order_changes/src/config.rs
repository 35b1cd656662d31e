use serde::{Deserialize, Serialize};

/// Configuration for the order_changes module (`modules.order_changes`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderChangesConfig {
    #[serde(default = "default_base_path")]
    pub base_path: String,
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
    #[serde(default = "default_max_changes_length")]
    pub max_changes_length: usize,
}

impl Default for OrderChangesConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            max_changes_length: default_max_changes_length(),
        }
    }
}

fn default_base_path() -> String {
    "/api/order-changes".to_string()
}

fn default_page_size() -> u64 {
    10
}

fn default_max_page_size() -> u64 {
    100
}

fn default_max_changes_length() -> usize {
    4096
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: OrderChangesConfig =
            serde_json::from_value(serde_json::json!({ "max_page_size": 50 })).unwrap();
        assert_eq!(cfg.max_page_size, 50);
        assert_eq!(cfg.default_page_size, 10);
        assert_eq!(cfg.base_path, "/api/order-changes");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let res = serde_json::from_value::<OrderChangesConfig>(serde_json::json!({ "page": 1 }));
        assert!(res.is_err());
    }
}
