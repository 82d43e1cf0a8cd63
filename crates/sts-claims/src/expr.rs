//! Compilation and evaluation of claim-mapping expressions.
//!
//! Expressions are CEL. Each one is evaluated against a single declared
//! input variable, `claims`, holding the flat claim map of the subject
//! token. Compilation is pure; evaluation is deterministic and performs
//! no I/O. A mapping evaluates all-or-nothing: one failing expression
//! fails the whole mapping, naming the claim.

use std::collections::BTreeMap;

use cel_interpreter::{Context, Program, Value};
use sts_model::ClaimsMapping;

use crate::error::{ClaimsError, ClaimsResult};

/// The single variable claim expressions may reference: the flat claim
/// map of the incoming token.
pub const INPUT_VARIABLE: &str = "claims";

/// A compiled, reusable claim expression.
///
/// Keeps the source text alongside the program so the human-readable form
/// is always re-derivable from the compiled one.
pub struct CompiledExpr {
    source: String,
    program: Program,
}

impl std::fmt::Debug for CompiledExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledExpr")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl CompiledExpr {
    /// Compiles the expression for the named output claim.
    ///
    /// # Errors
    ///
    /// Returns `ClaimsError::Compile` when the source does not parse and
    /// `ClaimsError::UndeclaredReference` when it references any variable
    /// other than [`INPUT_VARIABLE`].
    pub fn compile(claim: &str, source: &str) -> ClaimsResult<Self> {
        let program =
            Program::compile(source).map_err(|e| ClaimsError::compile(claim, e.to_string()))?;

        for reference in program.references().variables() {
            let variable = reference.to_string();
            if variable != INPUT_VARIABLE {
                return Err(ClaimsError::UndeclaredReference {
                    claim: claim.to_string(),
                    variable,
                });
            }
        }

        Ok(Self {
            source: source.to_string(),
            program,
        })
    }

    /// The expression source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// A fully compiled claims mapping, ready for repeated evaluation.
#[derive(Debug, Default)]
pub struct CompiledMapping {
    exprs: BTreeMap<String, CompiledExpr>,
}

impl CompiledMapping {
    /// Compiles every expression in the mapping.
    ///
    /// # Errors
    ///
    /// Fails on the first invalid expression; nothing from a partially
    /// valid mapping is usable, matching the requirement that unparsable
    /// mappings are rejected before persistence.
    pub fn compile(mapping: &ClaimsMapping) -> ClaimsResult<Self> {
        let mut exprs = BTreeMap::new();
        for (claim, source) in mapping.iter() {
            exprs.insert(claim.to_string(), CompiledExpr::compile(claim, source)?);
        }
        Ok(Self { exprs })
    }

    /// Evaluates the mapping against the given input claims, producing
    /// the output claim set.
    ///
    /// # Errors
    ///
    /// Returns the first expression failure, naming the offending claim;
    /// no partial output is returned.
    pub fn evaluate(
        &self,
        input: &serde_json::Map<String, serde_json::Value>,
    ) -> ClaimsResult<serde_json::Map<String, serde_json::Value>> {
        let mut context = Context::default();
        context
            .add_variable(INPUT_VARIABLE, input)
            .map_err(|e| ClaimsError::Context(e.to_string()))?;

        let mut output = serde_json::Map::with_capacity(self.exprs.len());
        for (claim, expr) in &self.exprs {
            let value = expr
                .program
                .execute(&context)
                .map_err(|e| ClaimsError::eval(claim, e.to_string()))?;
            output.insert(claim.clone(), value_to_claim(claim, value)?);
        }

        Ok(output)
    }

    /// Reconstructs the source-text mapping this was compiled from.
    #[must_use]
    pub fn represent(&self) -> ClaimsMapping {
        self.exprs
            .iter()
            .map(|(claim, expr)| (claim.clone(), expr.source().to_string()))
            .collect()
    }

    /// Number of claims in the mapping.
    #[must_use]
    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    /// Whether the mapping has no claims.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }
}

/// Converts an evaluation result into a JWT-compatible claim value.
///
/// JWT claims are strings, numbers, booleans, lists, or maps of the same;
/// anything else (bytes, null, timestamps, functions) is rejected.
fn value_to_claim(claim: &str, value: Value) -> ClaimsResult<serde_json::Value> {
    let unsupported = || ClaimsError::UnsupportedType {
        claim: claim.to_string(),
    };

    let out = match value {
        Value::Bool(b) => serde_json::Value::Bool(b),
        Value::Int(i) => serde_json::Value::Number(i.into()),
        Value::UInt(u) => serde_json::Value::Number(u.into()),
        Value::Float(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .ok_or_else(unsupported)?,
        Value::String(s) => serde_json::Value::String(s.as_ref().clone()),
        Value::List(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items.iter() {
                out.push(value_to_claim(claim, item.clone())?);
            }
            serde_json::Value::Array(out)
        }
        Value::Map(map) => {
            let mut out = serde_json::Map::with_capacity(map.map.len());
            for (key, item) in map.map.iter() {
                let cel_interpreter::objects::Key::String(key) = key else {
                    return Err(unsupported());
                };
                out.insert(key.as_ref().clone(), value_to_claim(claim, item.clone())?);
            }
            serde_json::Value::Object(out)
        }
        _ => return Err(unsupported()),
    };

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(pairs: &[(&str, serde_json::Value)]) -> serde_json::Map<String, serde_json::Value> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn compiles_valid_expression() {
        let expr = CompiledExpr::compile("email", "claims.email").unwrap();
        assert_eq!(expr.source(), "claims.email");
    }

    #[test]
    fn rejects_unparsable_expression() {
        let err = CompiledExpr::compile("email", "claims.email +").unwrap_err();
        assert!(matches!(err, ClaimsError::Compile { ref claim, .. } if claim == "email"));
    }

    #[test]
    fn rejects_undeclared_variable() {
        let err = CompiledExpr::compile("email", "request.email").unwrap_err();
        assert!(matches!(
            err,
            ClaimsError::UndeclaredReference { ref claim, ref variable }
                if claim == "email" && variable == "request"
        ));
    }

    #[test]
    fn literal_only_expression_is_valid() {
        CompiledExpr::compile("version", "'v1'").unwrap();
    }

    #[test]
    fn evaluates_mapping_against_claims() {
        let mapping = ClaimsMapping::new()
            .with_claim("email", "claims.email")
            .with_claim("admin", "claims.role == 'admin'")
            .with_claim("greeting", "'hello ' + claims.name");
        let compiled = CompiledMapping::compile(&mapping).unwrap();

        let input = claims(&[
            ("email", serde_json::json!("mal@iketh.co")),
            ("role", serde_json::json!("admin")),
            ("name", serde_json::json!("Maliketh")),
        ]);

        let out = compiled.evaluate(&input).unwrap();
        assert_eq!(out["email"], serde_json::json!("mal@iketh.co"));
        assert_eq!(out["admin"], serde_json::json!(true));
        assert_eq!(out["greeting"], serde_json::json!("hello Maliketh"));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let mapping = ClaimsMapping::new().with_claim("scope", "claims.sub + '/read'");
        let compiled = CompiledMapping::compile(&mapping).unwrap();
        let input = claims(&[("sub", serde_json::json!("svc-1"))]);

        let first = compiled.evaluate(&input).unwrap();
        let second = compiled.evaluate(&input).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn list_and_map_results_are_supported() {
        let mapping = ClaimsMapping::new()
            .with_claim("groups", "[claims.sub, 'everyone']")
            .with_claim("meta", "{'issuer_class': 'external', 'sub': claims.sub}");
        let compiled = CompiledMapping::compile(&mapping).unwrap();
        let input = claims(&[("sub", serde_json::json!("svc-1"))]);

        let out = compiled.evaluate(&input).unwrap();
        assert_eq!(out["groups"], serde_json::json!(["svc-1", "everyone"]));
        assert_eq!(
            out["meta"],
            serde_json::json!({"issuer_class": "external", "sub": "svc-1"})
        );
    }

    #[test]
    fn numeric_results_are_supported() {
        let mapping = ClaimsMapping::new()
            .with_claim("count", "1 + 2")
            .with_claim("ratio", "1.5");
        let compiled = CompiledMapping::compile(&mapping).unwrap();

        let out = compiled.evaluate(&claims(&[])).unwrap();
        assert_eq!(out["count"], serde_json::json!(3));
        assert_eq!(out["ratio"], serde_json::json!(1.5));
    }

    #[test]
    fn null_result_is_rejected() {
        let mapping = ClaimsMapping::new().with_claim("bad", "null");
        let compiled = CompiledMapping::compile(&mapping).unwrap();

        let err = compiled.evaluate(&claims(&[])).unwrap_err();
        assert!(matches!(err, ClaimsError::UnsupportedType { ref claim } if claim == "bad"));
    }

    #[test]
    fn one_failing_claim_fails_the_whole_mapping() {
        let mapping = ClaimsMapping::new()
            .with_claim("ok", "'fine'")
            .with_claim("broken", "claims.missing_key + '!'");
        let compiled = CompiledMapping::compile(&mapping).unwrap();

        let err = compiled.evaluate(&claims(&[])).unwrap_err();
        assert!(matches!(err, ClaimsError::Eval { ref claim, .. } if claim == "broken"));
    }

    #[test]
    fn represent_compile_round_trip_is_identity() {
        let mapping = ClaimsMapping::new()
            .with_claim("email", "claims.email")
            .with_claim("admin", "claims.role == 'admin'");

        let once = CompiledMapping::compile(&mapping).unwrap().represent();
        let twice = CompiledMapping::compile(&once).unwrap().represent();

        assert_eq!(once, mapping);
        assert_eq!(twice, once);
    }
}
