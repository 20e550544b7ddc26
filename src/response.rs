//! Success/failure envelope returned to callers of the facade

use serde::Serialize;

/// Standard result wrapper
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AjaxResult<T: Serialize> {
    pub success: bool,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> AjaxResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            msg: message.into(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_serializes_data() {
        let json = serde_json::to_value(AjaxResult::ok("a.xlsx".to_string())).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], "a.xlsx");
    }

    #[test]
    fn test_err_omits_data() {
        let result: AjaxResult<String> = AjaxResult::err("export failed");
        assert!(!result.is_success());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["msg"], "export failed");
        assert!(json.get("data").is_none());
    }
}
