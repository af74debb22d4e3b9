use super::*;

#[test]
fn test_evaluate_params_omits_unset_optionals() {
    let params = EvaluateParams {
        expression: "1+2".to_string(),
        return_by_value: Some(true),
        ..Default::default()
    };
    let json = serde_json::to_string(&params).unwrap();
    assert_eq!(json, r#"{"expression":"1+2","returnByValue":true}"#);
}

#[test]
fn test_evaluate_result_deserializes_number() {
    let result: EvaluateResult = serde_json::from_str(
        r#"{"result":{"type":"number","value":3}}"#,
    )
    .unwrap();
    assert_eq!(result.result.object_type, "number");
    assert_eq!(result.result.value, Some(serde_json::json!(3)));
    assert!(result.exception_details.is_none());
}

#[test]
fn test_evaluate_result_with_exception() {
    let result: EvaluateResult = serde_json::from_str(
        r#"{"result":{"type":"undefined"},"exceptionDetails":{"exceptionId":1,"text":"Uncaught","lineNumber":0,"columnNumber":0}}"#,
    )
    .unwrap();
    assert!(result.exception_details.is_some());
}

#[test]
fn test_call_function_on_params_serialization() {
    let params = CallFunctionOnParams {
        function_declaration: "function() { return this.x; }".to_string(),
        object_id: Some("obj-1".to_string()),
        return_by_value: Some(true),
        ..Default::default()
    };
    let json = serde_json::to_string(&params).unwrap();
    assert!(json.contains(r#""objectId":"obj-1""#));
    assert!(!json.contains("arguments"));
}
