//! Law checks over concrete partial maps.
//!
//! A [`LawCheck`] names a kind of check and its inputs; [`run_law_check`]
//! evaluates every law of that kind and reports each violation with a
//! deterministic witness id:
//!
//! ```text
//! witnessId = "w1_" || hex(SHA256(canonical {kind, law, members, schema: 1}))
//! ```
//!
//! The canonical key is compact JSON with sorted object keys, so two runs on
//! the same failing input agree on the id.

use crate::colimit::{Directed, directed_colimit, first_unbounded_pair};
use crate::error::{GraftError, Law, Violation};
use crate::merge::{RightFirst, try_join, try_join_with};
use crate::order::{bottom, le, meet};
use crate::partial::PartialMap;
use crate::scalar::Field;
use crate::subspace::Subspace;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// A law check, as read from a JSON fixture.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[serde(bound(deserialize = "K: Field + Deserialize<'de>"))]
pub enum LawCheck<K> {
    /// Reflexivity, bottom, antisymmetry, transitivity and graph inclusion
    /// over every pair and triple of `maps`.
    Order { maps: Vec<PartialMap<K>> },
    Meet {
        left: PartialMap<K>,
        right: PartialMap<K>,
    },
    /// Agreement first; the join laws only run on compatible pairs.
    Join {
        left: PartialMap<K>,
        right: PartialMap<K>,
    },
    Colimit { family: Vec<PartialMap<K>> },
    RoundTrip { maps: Vec<PartialMap<K>> },
}

impl<K: Field + for<'de> Deserialize<'de>> LawCheck<K> {
    /// Parse a check from its fixture JSON. Maps are validated on the way
    /// in, so a non-functional map is a fixture error.
    pub fn from_fixture(check: &Value) -> Result<Self, GraftError> {
        serde_json::from_value(check.clone()).map_err(|e| GraftError::Fixture(e.to_string()))
    }
}

impl<K> LawCheck<K> {
    pub fn kind(&self) -> &'static str {
        match self {
            LawCheck::Order { .. } => "order",
            LawCheck::Meet { .. } => "meet",
            LawCheck::Join { .. } => "join",
            LawCheck::Colimit { .. } => "colimit",
            LawCheck::RoundTrip { .. } => "round_trip",
        }
    }
}

/// Outcome of one [`LawCheck`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LawResult {
    /// "accepted" or "rejected".
    pub result: String,
    pub kind: String,
    pub checked: Vec<Law>,
    pub failures: Vec<Violation>,
    /// The map the check computed (meet, join, colimit) or a summary of it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
}

impl LawResult {
    fn new(
        kind: &str,
        checked: Vec<Law>,
        mut failures: Vec<Violation>,
        output: Option<Value>,
    ) -> Self {
        failures.sort_by(|a, b| {
            (a.law, &a.members, &a.witness_id).cmp(&(b.law, &b.members, &b.witness_id))
        });
        let result = if failures.is_empty() {
            "accepted"
        } else {
            "rejected"
        };
        Self {
            result: result.to_string(),
            kind: kind.to_string(),
            checked,
            failures,
            output,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Witness id for a violation of `law` in a `kind` check at `members`.
pub fn compute_witness_id(law: Law, kind: &str, members: &[usize]) -> String {
    let mut key = serde_json::Map::new();
    key.insert("schema".to_string(), Value::from(1));
    key.insert("law".to_string(), Value::from(law.as_str()));
    key.insert("kind".to_string(), Value::from(kind));
    key.insert("members".to_string(), Value::from(members.to_vec()));
    let hash = Sha256::digest(canonical_bytes(&Value::Object(key)));
    format!("w1_{hash:x}")
}

/// Compact JSON with object keys sorted at every level.
fn canonical_bytes(value: &Value) -> Vec<u8> {
    fn write(value: &Value, out: &mut String) {
        match value {
            Value::Array(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    write(item, out);
                }
                out.push(']');
            }
            Value::Object(map) => {
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();
                out.push('{');
                for (i, key) in keys.into_iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push_str(&Value::from(key.as_str()).to_string());
                    out.push(':');
                    write(&map[key], out);
                }
                out.push('}');
            }
            scalar => out.push_str(&scalar.to_string()),
        }
    }
    let mut out = String::new();
    write(value, &mut out);
    out.into_bytes()
}

impl Violation {
    pub fn new(law: Law, kind: &str, members: Vec<usize>, description: impl Into<String>) -> Self {
        Self {
            law,
            witness_id: compute_witness_id(law, kind, &members),
            members,
            description: description.into(),
        }
    }
}

/// Run every law of `check`'s kind.
///
/// Law failures are reported in the result. Inputs no law applies to (an
/// empty family, a meet across shapes) are errors.
pub fn run_law_check<K: Field + Serialize>(check: &LawCheck<K>) -> Result<LawResult, GraftError> {
    let result = match check {
        LawCheck::Order { maps } => check_order(maps),
        LawCheck::Meet { left, right } => check_meet(left, right)?,
        LawCheck::Join { left, right } => check_join(left, right),
        LawCheck::Colimit { family } => check_colimit(family)?,
        LawCheck::RoundTrip { maps } => check_round_trip(maps),
    };
    tracing::debug!(
        kind = %result.kind,
        result = %result.result,
        failures = result.failures.len(),
        "law check"
    );
    Ok(result)
}

fn to_output<K: Field + Serialize>(map: &PartialMap<K>) -> Option<Value> {
    serde_json::to_value(map).ok()
}

// ─── Order ──────────────────────────────────────────────────────────────────

fn check_order<K: Field>(maps: &[PartialMap<K>]) -> LawResult {
    const KIND: &str = "order";
    let n = maps.len();
    let rel: Vec<Vec<bool>> = maps
        .iter()
        .map(|f| maps.iter().map(|g| le(f, g)).collect())
        .collect();
    let mut failures = Vec::new();

    for (i, f) in maps.iter().enumerate() {
        if !rel[i][i] {
            failures.push(Violation::new(
                Law::Reflexivity,
                KIND,
                vec![i],
                format!("map {i} is not below itself"),
            ));
        }
        if !le(&bottom(f.shape()), f) {
            failures.push(Violation::new(
                Law::Bottom,
                KIND,
                vec![i],
                format!("the empty map is not below map {i}"),
            ));
        }
    }

    for i in 0..n {
        for j in 0..n {
            if i < j && rel[i][j] && rel[j][i] && maps[i] != maps[j] {
                failures.push(Violation::new(
                    Law::Antisymmetry,
                    KIND,
                    vec![i, j],
                    format!("maps {i} and {j} are mutually below but differ"),
                ));
            }
            if rel[i][j] != maps[i].graph().is_subgraph_of(&maps[j].graph()) {
                failures.push(Violation::new(
                    Law::GraphOrder,
                    KIND,
                    vec![i, j],
                    format!("order and graph inclusion disagree on maps {i} and {j}"),
                ));
            }
            for k in 0..n {
                if rel[i][j] && rel[j][k] && !rel[i][k] {
                    failures.push(Violation::new(
                        Law::Transitivity,
                        KIND,
                        vec![i, j, k],
                        format!("map {i} ≤ {j} ≤ {k} but not {i} ≤ {k}"),
                    ));
                }
            }
        }
    }

    let checked = vec![
        Law::Reflexivity,
        Law::Transitivity,
        Law::Antisymmetry,
        Law::Bottom,
        Law::GraphOrder,
    ];
    let output = serde_json::json!({ "le": rel });
    LawResult::new(KIND, checked, failures, Some(output))
}

// ─── Meet ───────────────────────────────────────────────────────────────────

fn check_meet<K: Field + Serialize>(
    left: &PartialMap<K>,
    right: &PartialMap<K>,
) -> Result<LawResult, GraftError> {
    const KIND: &str = "meet";
    if left.shape() != right.shape() {
        return Err(GraftError::ShapeMismatch {
            expected: left.shape(),
            actual: right.shape(),
        });
    }
    let m = meet(left, right);
    let mut failures = Vec::new();

    if !le(&m, left) || !le(&m, right) {
        failures.push(Violation::new(
            Law::MeetLowerBound,
            KIND,
            vec![0, 1],
            "meet is not below both operands",
        ));
    }

    // The agreement locus of f and g on their overlap is the kernel of
    // f - g there, so its dimension is fixed by the rank of the differences.
    let overlap = left.domain().intersect(right.domain());
    let mut differences = Vec::new();
    let mut agreeing = Vec::new();
    for v in overlap.basis() {
        match (left.eval(v), right.eval(v)) {
            (Ok(fv), Ok(gv)) if fv == gv => agreeing.push(v),
            (Ok(fv), Ok(gv)) => differences.push(fv.sub(&gv)),
            _ => {}
        }
    }
    let rank = Subspace::span(left.shape().output, differences)?.dim();
    let greatest = m.domain().dim() + rank == overlap.dim()
        && agreeing.into_iter().all(|v| m.domain().contains(v));
    if !greatest {
        failures.push(Violation::new(
            Law::MeetGreatest,
            KIND,
            vec![0, 1],
            format!(
                "meet domain {} is not the agreement locus of the operands",
                m.domain()
            ),
        ));
    }

    Ok(LawResult::new(
        KIND,
        vec![Law::MeetLowerBound, Law::MeetGreatest],
        failures,
        to_output(&m),
    ))
}

// ─── Join ───────────────────────────────────────────────────────────────────

fn check_join<K: Field + Serialize>(left: &PartialMap<K>, right: &PartialMap<K>) -> LawResult {
    const KIND: &str = "join";
    let joined = match try_join(left, right) {
        Ok(j) => j,
        Err(e) => {
            let failure = Violation::new(Law::Agreement, KIND, vec![0, 1], e.to_string());
            return LawResult::new(KIND, vec![Law::Agreement], vec![failure], None);
        }
    };
    let mut failures = Vec::new();

    if !le(left, &joined) || !le(right, &joined) {
        failures.push(Violation::new(
            Law::JoinUpperBound,
            KIND,
            vec![0, 1],
            "join is not above both operands",
        ));
    }
    let expected_domain = left.domain().sum(right.domain());
    if *joined.domain() != expected_domain {
        failures.push(Violation::new(
            Law::JoinDomain,
            KIND,
            vec![0, 1],
            format!(
                "join domain {} differs from {expected_domain}",
                joined.domain()
            ),
        ));
    }
    if left.graph().sum(&right.graph()).ok() != Some(joined.graph()) {
        failures.push(Violation::new(
            Law::JoinLeast,
            KIND,
            vec![0, 1],
            "join graph is not the sum of the operand graphs",
        ));
    }
    match try_join_with(left, right, &RightFirst) {
        Ok(other) if other == joined => {}
        _ => failures.push(Violation::new(
            Law::StrategyIndependence,
            KIND,
            vec![0, 1],
            "joins under left-first and right-first decomposition differ",
        )),
    }

    let checked = vec![
        Law::Agreement,
        Law::JoinUpperBound,
        Law::JoinDomain,
        Law::JoinLeast,
        Law::StrategyIndependence,
    ];
    LawResult::new(KIND, checked, failures, to_output(&joined))
}

// ─── Colimit ────────────────────────────────────────────────────────────────

fn check_colimit<K: Field + Serialize>(family: &[PartialMap<K>]) -> Result<LawResult, GraftError> {
    const KIND: &str = "colimit";
    let directed = match Directed::new(family.to_vec()) {
        Ok(d) => d,
        Err(e @ GraftError::NotDirected { .. }) => {
            let members = first_unbounded_pair(family)
                .map(|(i, j)| vec![i, j])
                .unwrap_or_default();
            let failure = Violation::new(Law::Directedness, KIND, members, e.to_string());
            return Ok(LawResult::new(
                KIND,
                vec![Law::Directedness],
                vec![failure],
                None,
            ));
        }
        Err(e) => return Err(e),
    };
    let colimit = directed_colimit(&directed);
    let mut failures = Vec::new();

    for (i, member) in family.iter().enumerate() {
        if !le(member, &colimit) {
            failures.push(Violation::new(
                Law::ColimitUpperBound,
                KIND,
                vec![i],
                format!("member {i} is not below the colimit"),
            ));
        }
    }
    let union = family
        .iter()
        .fold(Subspace::zero(colimit.shape().input), |acc, m| {
            acc.sum(m.domain())
        });
    if *colimit.domain() != union {
        failures.push(Violation::new(
            Law::ColimitDomain,
            KIND,
            (0..family.len()).collect(),
            format!(
                "colimit domain {} differs from the union {union}",
                colimit.domain()
            ),
        ));
    }

    let checked = vec![
        Law::Directedness,
        Law::ColimitUpperBound,
        Law::ColimitDomain,
    ];
    Ok(LawResult::new(
        KIND,
        checked,
        failures,
        to_output(&colimit),
    ))
}

// ─── Graph round trip ───────────────────────────────────────────────────────

fn check_round_trip<K: Field + Serialize>(maps: &[PartialMap<K>]) -> LawResult {
    const KIND: &str = "round_trip";
    let mut failures = Vec::new();
    let graphs: Vec<_> = maps.iter().map(PartialMap::graph).collect();

    for (i, (map, graph)) in maps.iter().zip(&graphs).enumerate() {
        match graph.decode() {
            Ok(decoded) if decoded == *map => {}
            Ok(_) => failures.push(Violation::new(
                Law::GraphRoundTrip,
                KIND,
                vec![i],
                format!("decoding the graph of map {i} gives a different map"),
            )),
            Err(e) => failures.push(Violation::new(
                Law::GraphRoundTrip,
                KIND,
                vec![i],
                e.to_string(),
            )),
        }
    }
    for i in 0..maps.len() {
        for j in 0..maps.len() {
            if le(&maps[i], &maps[j]) != graphs[i].is_subgraph_of(&graphs[j]) {
                failures.push(Violation::new(
                    Law::GraphOrder,
                    KIND,
                    vec![i, j],
                    format!("order and graph inclusion disagree on maps {i} and {j}"),
                ));
            }
        }
    }

    let output = serde_json::to_value(&graphs).ok();
    LawResult::new(
        KIND,
        vec![Law::GraphRoundTrip, Law::GraphOrder],
        failures,
        output,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::Rational;
    use serde_json::json;

    fn check(value: Value) -> LawResult {
        let check = LawCheck::<Rational>::from_fixture(&value).unwrap();
        run_law_check(&check).unwrap()
    }

    fn map(pairs: Value) -> Value {
        json!({ "input": 2, "output": 1, "pairs": pairs })
    }

    #[test]
    fn witness_ids_are_deterministic() {
        let a = compute_witness_id(Law::Agreement, "join", &[0, 1]);
        let b = compute_witness_id(Law::Agreement, "join", &[0, 1]);
        assert_eq!(a, b);
        assert!(a.starts_with("w1_"));
        assert_eq!(a.len(), 3 + 64);
        assert_ne!(a, compute_witness_id(Law::Agreement, "join", &[1, 0]));
        assert_ne!(a, compute_witness_id(Law::Directedness, "join", &[0, 1]));
    }

    #[test]
    fn canonical_bytes_sort_keys() {
        let value = json!({ "b": [1, {"z": null, "a": true}], "a": "x" });
        assert_eq!(
            canonical_bytes(&value),
            br#"{"a":"x","b":[1,{"a":true,"z":null}]}"#.to_vec()
        );
    }

    #[test]
    fn compatible_join_is_accepted() {
        let result = check(json!({
            "kind": "join",
            "left": map(json!([{ "x": [1, 0], "y": [3] }])),
            "right": map(json!([{ "x": [0, 1], "y": [5] }])),
        }));
        assert!(result.is_accepted());
        assert_eq!(result.checked.len(), 5);
        assert_eq!(result.output.unwrap()["pairs"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn disagreeing_join_is_rejected() {
        let result = check(json!({
            "kind": "join",
            "left": map(json!([{ "x": [1, 0], "y": [1] }, { "x": [0, 1], "y": [2] }])),
            "right": map(json!([{ "x": [0, 1], "y": [9] }])),
        }));
        assert_eq!(result.result, "rejected");
        assert_eq!(result.failures.len(), 1);
        let failure = &result.failures[0];
        assert_eq!(failure.law, Law::Agreement);
        assert_eq!(
            failure.witness_id,
            compute_witness_id(Law::Agreement, "join", &[0, 1])
        );
        assert!(failure.description.contains("(0, 1)"));
        assert!(result.output.is_none());
    }

    #[test]
    fn undirected_family_names_the_pair() {
        let result = check(json!({
            "kind": "colimit",
            "family": [
                map(json!([])),
                map(json!([{ "x": [1, 0], "y": [1] }])),
                map(json!([{ "x": [0, 1], "y": [2] }])),
            ],
        }));
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].members, vec![1, 2]);
    }

    #[test]
    fn order_relation_is_reported() {
        let result = check(json!({
            "kind": "order",
            "maps": [
                map(json!([])),
                map(json!([{ "x": [1, 0], "y": [1] }])),
            ],
        }));
        assert!(result.is_accepted());
        assert_eq!(result.output.unwrap(), json!({ "le": [[true, true], [false, true]] }));
    }

    #[test]
    fn meet_across_shapes_is_an_error() {
        let check = LawCheck::<Rational>::from_fixture(&json!({
            "kind": "meet",
            "left": map(json!([])),
            "right": { "input": 3, "output": 1, "pairs": [] },
        }))
        .unwrap();
        assert!(matches!(
            run_law_check(&check),
            Err(GraftError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn non_functional_fixture_is_rejected_on_parse() {
        let err = LawCheck::<Rational>::from_fixture(&json!({
            "kind": "round_trip",
            "maps": [map(json!([{ "x": [1, 0], "y": [1] }, { "x": [1, 0], "y": [2] }]))],
        }))
        .unwrap_err();
        assert!(matches!(err, GraftError::Fixture(_)));
    }

    #[test]
    fn unknown_kind_is_a_fixture_error() {
        assert!(LawCheck::<Rational>::from_fixture(&json!({ "kind": "descent" })).is_err());
    }
}
