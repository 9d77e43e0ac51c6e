//! Scenario runner – execute scripted key flows from YAML files.

use crate::commands::CommandRegistry;
use crate::session::Session;
use crate::types::*;

/// Load a scenario from a YAML string.
pub fn load_scenario(yaml: &str) -> Result<Scenario, String> {
    serde_yaml::from_str(yaml).map_err(|e| format!("failed to parse scenario YAML: {}", e))
}

/// Execute a scenario against `session` and return the overall result.
pub fn run_scenario(
    scenario: &Scenario,
    session: &mut Session,
    registry: &CommandRegistry,
) -> ScenarioResult {
    let mut step_results = Vec::new();
    let mut overall = Status::Pass;

    for (i, step) in scenario.steps.iter().enumerate() {
        let result = match step {
            ScenarioStep::Keys {
                keys,
                expect_display,
                expect_expression,
            } => {
                let mut r = registry.execute("keys", serde_json::json!({ "keys": keys }), session);
                if r.status == Status::Pass {
                    let snapshot = session.snapshot();
                    let mismatch = [
                        ("display", expect_display, &snapshot.display_value),
                        ("expression", expect_expression, &snapshot.expression_text),
                    ]
                    .into_iter()
                    .find_map(|(field, expected, actual)| match expected {
                        Some(expected) if expected != actual => {
                            Some((field, expected.clone(), actual.clone()))
                        }
                        _ => None,
                    });

                    if let Some((field, expected, actual)) = mismatch {
                        tracing::warn!(
                            step = i,
                            field,
                            expected = %expected,
                            actual = %actual,
                            "scenario step expectation mismatch"
                        );
                        mark_failed(
                            &mut r,
                            format!("expected {} {:?}, got {:?}", field, expected, actual),
                            serde_json::json!({ "field": field, "expected": expected, "actual": actual }),
                        );
                    }
                }
                if r.status != Status::Pass {
                    overall = Status::Fail;
                }
                r
            }
            ScenarioStep::Call {
                call,
                args,
                expect_status,
            } => {
                let r = registry.execute(call, args.clone(), session);
                if r.status.as_str() != expect_status.as_str() {
                    tracing::warn!(
                        step = i,
                        expected = %expect_status,
                        actual = r.status.as_str(),
                        "scenario step status mismatch"
                    );
                    overall = Status::Fail;
                }
                r
            }
        };
        step_results.push(result);
    }

    ScenarioResult {
        name: scenario.name.clone(),
        overall_status: overall,
        step_results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scenario() {
        let yaml = r#"
name: chaining
steps:
  - keys: "3+4*5="
    expect_display: "35"
    expect_expression: "7 × 5 ="
  - call: "tape"
"#;
        let s = load_scenario(yaml).expect("should parse");
        assert_eq!(s.name, Some("chaining".into()));
        assert_eq!(s.steps.len(), 2);
        assert!(matches!(s.steps[0], ScenarioStep::Keys { .. }));
        assert!(matches!(
            &s.steps[1],
            ScenarioStep::Call { expect_status, .. } if expect_status == "pass"
        ));
    }

    #[test]
    fn test_run_scenario_pass() {
        let yaml = r#"
steps:
  - keys: "0.1+0.2="
    expect_display: "0.3"
  - keys: "Escape"
    expect_display: "0"
    expect_expression: ""
  - call: "press"
    args: { key: "Tab" }
    expect_status: "error"
"#;
        let scenario = load_scenario(yaml).unwrap();
        let mut session = Session::new();
        let reg = CommandRegistry::new();
        let result = run_scenario(&scenario, &mut session, &reg);
        assert_eq!(result.overall_status, Status::Pass);
        assert_eq!(result.step_results.len(), 3);
    }

    #[test]
    fn test_run_scenario_expectation_mismatch() {
        let yaml = r#"
steps:
  - keys: "2*3="
    expect_display: "5"
  - keys: "+1="
    expect_display: "7"
"#;
        let scenario = load_scenario(yaml).unwrap();
        let mut session = Session::new();
        let reg = CommandRegistry::new();
        let result = run_scenario(&scenario, &mut session, &reg);
        assert_eq!(result.overall_status, Status::Fail);

        let first = &result.step_results[0];
        assert_eq!(first.status, Status::Fail);
        assert_eq!(first.error.as_ref().unwrap().code, ErrorCode::AssertionFailed);
        // Later steps still run on the same session.
        assert_eq!(result.step_results[1].status, Status::Pass);
    }

    #[test]
    fn test_run_scenario_bad_keys() {
        let yaml = r#"
steps:
  - keys: "2 ? 3"
"#;
        let scenario = load_scenario(yaml).unwrap();
        let mut session = Session::new();
        let reg = CommandRegistry::new();
        let result = run_scenario(&scenario, &mut session, &reg);
        assert_eq!(result.overall_status, Status::Fail);
        assert_eq!(result.step_results[0].status, Status::Error);
    }

    #[test]
    fn test_bundled_scenario_passes() {
        let scenario = load_scenario(include_str!("../../../scenarios/basic.yaml")).unwrap();
        let mut session = Session::new();
        let reg = CommandRegistry::new();
        let result = run_scenario(&scenario, &mut session, &reg);
        assert_eq!(result.overall_status, Status::Pass, "{:#?}", result.step_results);
    }

    #[test]
    fn test_parse_scenario_rejects_garbage() {
        assert!(load_scenario("steps: 3").is_err());
    }

    #[test]
    fn test_parse_scenario_rejects_misplaced_expectations() {
        let yaml = r#"
steps:
  - keys: "2*3="
    expect_status: "fail"
"#;
        assert!(load_scenario(yaml).is_err());

        let yaml = r#"
steps:
  - call: "snapshot"
    expect_display: "0"
"#;
        assert!(load_scenario(yaml).is_err());

        let yaml = r#"
steps:
  - keys: "2*3="
    expect_dispaly: "6"
"#;
        assert!(load_scenario(yaml).is_err());
    }
}
