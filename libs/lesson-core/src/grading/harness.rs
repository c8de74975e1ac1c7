//! Call harness for functional test cases.
//!
//! The submission is run with one extra statement that prints the result of
//! the test call, JSON-encoded, behind a marker. The last marked line of the
//! output is the return value.

use serde_json::Value;

use crate::types::FunctionCall;

pub(crate) const RESULT_MARKER: &str = "__LESSON_RESULT__";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    JavaScript,
    Python,
}

impl Dialect {
    fn of(language: &str) -> Option<Self> {
        match language.to_ascii_lowercase().as_str() {
            "js" | "javascript" | "node" | "ts" | "typescript" => Some(Self::JavaScript),
            "py" | "python" | "python3" => Some(Self::Python),
            _ => None,
        }
    }
}

/// `code` followed by a statement printing `call`'s result.
pub(crate) fn call_program(code: &str, language: &str, call: &FunctionCall) -> Result<String, String> {
    let dialect = Dialect::of(language)
        .ok_or_else(|| format!("test cases are not supported for {}", language))?;

    let program = match dialect {
        Dialect::JavaScript => {
            let args: Vec<String> = call.params.iter().map(Value::to_string).collect();
            format!(
                "{}\n;console.log(\"{}\" + JSON.stringify({}({})));\n",
                code,
                RESULT_MARKER,
                call.function_name,
                args.join(", ")
            )
        }
        Dialect::Python => {
            let args: Vec<String> = call.params.iter().map(python_literal).collect();
            format!(
                "{}\n\nimport json as __lesson_json\nprint(\"{}\" + __lesson_json.dumps({}({})))\n",
                code,
                RESULT_MARKER,
                call.function_name,
                args.join(", ")
            )
        }
    };
    Ok(program)
}

/// Decode the value printed by the harness.
pub(crate) fn read_result(output: &str) -> Result<Value, String> {
    let encoded = output
        .lines()
        .rev()
        .find_map(|line| line.trim().strip_prefix(RESULT_MARKER))
        .ok_or_else(|| "the function call produced no result".to_string())?;

    match encoded.trim() {
        "undefined" => Ok(Value::Null),
        text => serde_json::from_str(text)
            .map_err(|_| format!("could not read the returned value: {}", text)),
    }
}

fn python_literal(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(_) => value.to_string(),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(python_literal).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", Value::String(k.clone()), python_literal(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

/// Structural equality where numbers compare by value (`6 == 6.0`).
pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => (x - y).abs() <= f64::EPSILON * x.abs().max(y.abs()).max(1.0),
            _ => x == y,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn call(name: &str, params: Vec<Value>) -> FunctionCall {
        FunctionCall {
            function_name: name.to_string(),
            params,
        }
    }

    #[test]
    fn javascript_program_prints_marked_json() {
        let program = call_program("function f(a) { return a; }", "javascript", &call("f", vec![json!([1, "x"])])).unwrap();
        assert!(program.ends_with(
            ";console.log(\"__LESSON_RESULT__\" + JSON.stringify(f([1,\"x\"])));\n"
        ));
    }

    #[test]
    fn python_program_uses_python_literals() {
        let program = call_program(
            "def f(*a): return a",
            "python",
            &call("f", vec![json!(null), json!(true), json!({"k": [false]})]),
        )
        .unwrap();
        assert!(program.contains("f(None, True, {\"k\": [False]})"));
    }

    #[test]
    fn unsupported_language() {
        let err = call_program("", "cobol", &call("f", vec![])).unwrap_err();
        assert_eq!(err, "test cases are not supported for cobol");
    }

    #[test]
    fn read_last_marked_line() {
        let output = "debug\n__LESSON_RESULT__1\nmore\n__LESSON_RESULT__{\"a\": [1, 2]}\n";
        assert_eq!(read_result(output).unwrap(), json!({"a": [1, 2]}));
        assert_eq!(read_result("__LESSON_RESULT__undefined").unwrap(), Value::Null);
        assert!(read_result("nothing here").is_err());
    }

    #[test]
    fn numbers_compare_by_value() {
        assert!(values_equal(&json!(6), &json!(6.0)));
        assert!(values_equal(&json!({"a": [1, 2.0]}), &json!({"a": [1.0, 2]})));
        assert!(!values_equal(&json!([1, 2]), &json!([2, 1])));
        assert!(!values_equal(&json!("6"), &json!(6)));
    }
}
