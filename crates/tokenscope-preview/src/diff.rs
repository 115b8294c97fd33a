//! Line and structural diffs between two registry snapshots
//!
//! Both snapshots are serialized with recursively sorted keys before the line
//! diff runs, so key order in the source files never shows up as a change.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineChange {
    Added,
    Removed,
    Unchanged,
}

/// Consecutive lines sharing one classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffRun {
    #[serde(rename = "type")]
    pub kind: LineChange,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StructuralKind {
    Added,
    Removed,
    Modified,
}

/// One key-aware change, addressed by JSON pointer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuralChange {
    pub path: String,

    #[serde(rename = "type")]
    pub kind: StructuralKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
    pub unchanged: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentDiff {
    pub lines: Vec<DiffRun>,
    pub structural: Vec<StructuralChange>,
    pub stats: DiffStats,
}

impl DocumentDiff {
    pub fn has_changes(&self) -> bool {
        !self.structural.is_empty()
    }

    /// Added and removed lines in order, unchanged context dropped
    pub fn changed_lines(&self) -> impl Iterator<Item = (LineChange, &str)> + '_ {
        self.lines
            .iter()
            .filter(|run| run.kind != LineChange::Unchanged)
            .flat_map(|run| run.lines.iter().map(move |line| (run.kind, line.as_str())))
    }
}

/// Diff two documents
pub fn diff_documents(original: &Value, mutated: &Value) -> DocumentDiff {
    let before = stable_json(original);
    let after = stable_json(mutated);

    let lines = diff_lines(&before, &after);
    let mut stats = DiffStats::default();
    for run in &lines {
        let count = run.lines.len();
        match run.kind {
            LineChange::Added => stats.added += count,
            LineChange::Removed => stats.removed += count,
            LineChange::Unchanged => stats.unchanged += count,
        }
    }

    DocumentDiff {
        lines,
        structural: diff_structure(original, mutated),
        stats,
    }
}

/// Copy of `value` with every object's keys in sorted order
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&String, Value> =
                map.iter().map(|(k, v)| (k, canonicalize(v))).collect();
            let mut out = Map::new();
            for (key, child) in sorted {
                out.insert(key.clone(), child);
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// Pretty JSON with sorted keys
pub fn stable_json(value: &Value) -> String {
    serde_json::to_string_pretty(&canonicalize(value)).unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    Equal(usize),
    Insert(usize),
    Delete(usize),
}

/// Myers line diff, grouped into runs
pub fn diff_lines(before: &str, after: &str) -> Vec<DiffRun> {
    let a: Vec<&str> = before.lines().collect();
    let b: Vec<&str> = after.lines().collect();

    let mut runs: Vec<DiffRun> = Vec::new();
    for edit in shortest_edit_script(&a, &b) {
        let (kind, line) = match edit {
            Edit::Equal(i) => (LineChange::Unchanged, a[i]),
            Edit::Delete(i) => (LineChange::Removed, a[i]),
            Edit::Insert(j) => (LineChange::Added, b[j]),
        };
        match runs.last_mut() {
            Some(run) if run.kind == kind => run.lines.push(line.to_string()),
            _ => runs.push(DiffRun {
                kind,
                lines: vec![line.to_string()],
            }),
        }
    }
    runs
}

/// Linear-space Myers: split on the middle snake and recurse on both halves.
/// Within each changed block deletions are ordered before insertions.
fn shortest_edit_script(a: &[&str], b: &[&str]) -> Vec<Edit> {
    let bound = max_d(a.len(), b.len());
    let mut forward = Frontier::new(bound);
    let mut backward = Frontier::new(bound);
    let mut edits = Vec::with_capacity(a.len() + b.len());
    conquer(a, 0..a.len(), b, 0..b.len(), &mut forward, &mut backward, &mut edits);
    deletions_first(edits)
}

/// Furthest-reaching `x` per diagonal `k`, for `k` in `-bound..=bound`
struct Frontier {
    offset: isize,
    x: Vec<isize>,
}

impl Frontier {
    fn new(bound: usize) -> Self {
        Self {
            offset: bound as isize,
            x: vec![0; 2 * bound + 1],
        }
    }

    fn get(&self, k: isize) -> isize {
        self.x[(k + self.offset) as usize]
    }

    fn set(&mut self, k: isize, x: isize) {
        self.x[(k + self.offset) as usize] = x;
    }
}

/// Rounds needed before the forward and backward searches must overlap
fn max_d(n: usize, m: usize) -> usize {
    (n + m + 1) / 2 + 1
}

fn conquer(
    a: &[&str],
    mut a_range: Range<usize>,
    b: &[&str],
    mut b_range: Range<usize>,
    forward: &mut Frontier,
    backward: &mut Frontier,
    edits: &mut Vec<Edit>,
) {
    while !a_range.is_empty() && !b_range.is_empty() && a[a_range.start] == b[b_range.start] {
        edits.push(Edit::Equal(a_range.start));
        a_range.start += 1;
        b_range.start += 1;
    }
    let mut suffix = 0;
    while !a_range.is_empty() && !b_range.is_empty() && a[a_range.end - 1] == b[b_range.end - 1] {
        a_range.end -= 1;
        b_range.end -= 1;
        suffix += 1;
    }

    if a_range.is_empty() {
        edits.extend(b_range.map(Edit::Insert));
    } else if b_range.is_empty() {
        edits.extend(a_range.clone().map(Edit::Delete));
    } else if a_range.len() == 1 {
        let line = a[a_range.start];
        match b_range.clone().find(|&j| b[j] == line) {
            Some(hit) => {
                edits.extend((b_range.start..hit).map(Edit::Insert));
                edits.push(Edit::Equal(a_range.start));
                edits.extend((hit + 1..b_range.end).map(Edit::Insert));
            }
            None => {
                edits.push(Edit::Delete(a_range.start));
                edits.extend(b_range.map(Edit::Insert));
            }
        }
    } else if b_range.len() == 1 {
        let line = b[b_range.start];
        match a_range.clone().find(|&i| a[i] == line) {
            Some(hit) => {
                edits.extend((a_range.start..hit).map(Edit::Delete));
                edits.push(Edit::Equal(hit));
                edits.extend((hit + 1..a_range.end).map(Edit::Delete));
            }
            None => {
                edits.extend(a_range.clone().map(Edit::Delete));
                edits.push(Edit::Insert(b_range.start));
            }
        }
    } else {
        match middle_snake(a, a_range.clone(), b, b_range.clone(), forward, backward) {
            Some((x, y)) => {
                conquer(a, a_range.start..x, b, b_range.start..y, forward, backward, edits);
                conquer(a, x..a_range.end, b, y..b_range.end, forward, backward, edits);
            }
            None => {
                edits.extend(a_range.clone().map(Edit::Delete));
                edits.extend(b_range.map(Edit::Insert));
            }
        }
    }

    edits.extend((a_range.end..a_range.end + suffix).map(Edit::Equal));
}

/// Start of a snake on some optimal path, in absolute coordinates
fn middle_snake(
    a: &[&str],
    a_range: Range<usize>,
    b: &[&str],
    b_range: Range<usize>,
    forward: &mut Frontier,
    backward: &mut Frontier,
) -> Option<(usize, usize)> {
    let n = a_range.len() as isize;
    let m = b_range.len() as isize;
    let delta = n - m;
    let odd = delta & 1 == 1;
    forward.set(1, 0);
    backward.set(1, 0);

    for d in 0..max_d(a_range.len(), b_range.len()) as isize {
        let mut k = d;
        while k >= -d {
            let mut x = if k == -d || (k != d && forward.get(k - 1) < forward.get(k + 1)) {
                forward.get(k + 1)
            } else {
                forward.get(k - 1) + 1
            };
            let mut y = x - k;
            let (x0, y0) = (x, y);
            while x < n && y < m && a[a_range.start + x as usize] == b[b_range.start + y as usize] {
                x += 1;
                y += 1;
            }
            forward.set(k, x);
            if odd && (k - delta).abs() < d && x + backward.get(delta - k) >= n {
                return Some((a_range.start + x0 as usize, b_range.start + y0 as usize));
            }
            k -= 2;
        }

        let mut k = d;
        while k >= -d {
            let mut x = if k == -d || (k != d && backward.get(k - 1) < backward.get(k + 1)) {
                backward.get(k + 1)
            } else {
                backward.get(k - 1) + 1
            };
            let mut y = x - k;
            while x < n
                && y < m
                && a[a_range.end - 1 - x as usize] == b[b_range.end - 1 - y as usize]
            {
                x += 1;
                y += 1;
            }
            backward.set(k, x);
            if !odd && (k - delta).abs() <= d && x + forward.get(delta - k) >= n {
                return Some((a_range.end - x as usize, b_range.end - y as usize));
            }
            k -= 2;
        }
    }
    None
}

fn deletions_first(edits: Vec<Edit>) -> Vec<Edit> {
    let mut ordered = Vec::with_capacity(edits.len());
    let mut inserts = Vec::new();
    for edit in edits {
        match edit {
            Edit::Insert(_) => inserts.push(edit),
            Edit::Delete(_) => ordered.push(edit),
            Edit::Equal(_) => {
                ordered.append(&mut inserts);
                ordered.push(edit);
            }
        }
    }
    ordered.append(&mut inserts);
    ordered
}

/// Key-aware diff; array elements are compared by index
pub fn diff_structure(before: &Value, after: &Value) -> Vec<StructuralChange> {
    let mut changes = Vec::new();
    walk("", before, after, &mut changes);
    changes
}

fn walk(path: &str, before: &Value, after: &Value, changes: &mut Vec<StructuralChange>) {
    match (before, after) {
        (Value::Object(old), Value::Object(new)) => {
            let keys: BTreeSet<&String> = old.keys().chain(new.keys()).collect();
            for key in keys {
                let child = format!("{}/{}", path, escape_pointer(key));
                compare_slot(child, old.get(key.as_str()), new.get(key.as_str()), changes);
            }
        }
        (Value::Array(old), Value::Array(new)) => {
            for i in 0..old.len().max(new.len()) {
                compare_slot(format!("{}/{}", path, i), old.get(i), new.get(i), changes);
            }
        }
        _ if before != after => changes.push(StructuralChange {
            path: path.to_string(),
            kind: StructuralKind::Modified,
            before: Some(before.clone()),
            after: Some(after.clone()),
        }),
        _ => {}
    }
}

fn compare_slot(
    path: String,
    before: Option<&Value>,
    after: Option<&Value>,
    changes: &mut Vec<StructuralChange>,
) {
    match (before, after) {
        (Some(old), Some(new)) => walk(&path, old, new, changes),
        (Some(old), None) => changes.push(StructuralChange {
            path,
            kind: StructuralKind::Removed,
            before: Some(old.clone()),
            after: None,
        }),
        (None, Some(new)) => changes.push(StructuralChange {
            path,
            kind: StructuralKind::Added,
            before: None,
            after: Some(new.clone()),
        }),
        (None, None) => {}
    }
}

/// RFC 6901 escaping of one reference token
fn escape_pointer(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn kinds(runs: &[DiffRun]) -> Vec<(LineChange, usize)> {
        runs.iter().map(|r| (r.kind, r.lines.len())).collect()
    }

    #[test]
    fn test_diff_lines_identical() {
        let runs = diff_lines("a\nb\nc", "a\nb\nc");
        assert_eq!(kinds(&runs), vec![(LineChange::Unchanged, 3)]);
    }

    #[test]
    fn test_diff_lines_insert_and_delete() {
        let runs = diff_lines("a\nb\nc", "a\nx\nc\nd");
        assert_eq!(
            kinds(&runs),
            vec![
                (LineChange::Unchanged, 1),
                (LineChange::Removed, 1),
                (LineChange::Added, 1),
                (LineChange::Unchanged, 1),
                (LineChange::Added, 1),
            ]
        );
        assert_eq!(runs[1].lines, vec!["b"]);
        assert_eq!(runs[2].lines, vec!["x"]);
        assert_eq!(runs[4].lines, vec!["d"]);
    }

    #[test]
    fn test_diff_lines_empty_sides() {
        assert!(diff_lines("", "").is_empty());
        assert_eq!(kinds(&diff_lines("", "a\nb")), vec![(LineChange::Added, 2)]);
        assert_eq!(kinds(&diff_lines("a\nb", "")), vec![(LineChange::Removed, 2)]);
    }

    #[test]
    fn test_diff_lines_deletions_lead_each_block() {
        let runs = diff_lines("a\nb\nc\nd\ne", "a\nx\ny\nz\ne");
        assert_eq!(
            kinds(&runs),
            vec![
                (LineChange::Unchanged, 1),
                (LineChange::Removed, 3),
                (LineChange::Added, 3),
                (LineChange::Unchanged, 1),
            ]
        );
    }

    #[test]
    fn test_diff_lines_one_line_side() {
        let runs = diff_lines("p\nq\nr\ns", "r");
        assert_eq!(
            kinds(&runs),
            vec![
                (LineChange::Removed, 2),
                (LineChange::Unchanged, 1),
                (LineChange::Removed, 1),
            ]
        );
    }

    #[test]
    fn test_diff_lines_is_minimal() {
        let before = "a\nb\nc\na\nb\nb\na";
        let after = "c\nb\na\nb\na\nc";
        let runs = diff_lines(before, after);
        let edits: usize = runs
            .iter()
            .filter(|r| r.kind != LineChange::Unchanged)
            .map(|r| r.lines.len())
            .sum();
        assert_eq!(edits, 5);
    }

    #[test]
    fn test_canonicalize_sorts_nested_keys() {
        let value = json!({"b": 1, "a": {"d": 2, "c": [{"z": 0, "y": 1}]}});
        let stable = stable_json(&value);
        let a = stable.find("\"a\"").unwrap();
        let b = stable.find("\"b\"").unwrap();
        let y = stable.find("\"y\"").unwrap();
        let z = stable.find("\"z\"").unwrap();
        assert!(a < b);
        assert!(y < z);
    }

    #[test]
    fn test_structural_diff() {
        let before = json!({"components": [{"name": "Button", "props": []}], "tokens": {"a/b": 1}});
        let after = json!({"components": [{"name": "Button", "props": [{"name": "size"}]}], "tokens": {}});
        let changes = diff_structure(&before, &after);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].path, "/components/0/props/0");
        assert_eq!(changes[0].kind, StructuralKind::Added);
        assert_eq!(changes[1].path, "/tokens/a~1b");
        assert_eq!(changes[1].kind, StructuralKind::Removed);
    }

    #[test]
    fn test_structural_diff_modified_scalar() {
        let changes = diff_structure(&json!({"v": "8px"}), &json!({"v": "12px"}));
        assert_eq!(
            changes,
            vec![StructuralChange {
                path: "/v".into(),
                kind: StructuralKind::Modified,
                before: Some(json!("8px")),
                after: Some(json!("12px")),
            }]
        );
    }

    #[test]
    fn test_diff_documents_stats() {
        let before = json!({"a": 1, "b": 2});
        let after = json!({"b": 2, "a": 3});
        let diff = diff_documents(&before, &after);
        assert_eq!(diff.stats.added, 1);
        assert_eq!(diff.stats.removed, 1);
        assert_eq!(diff.stats.unchanged, 3);
        assert!(diff.has_changes());
        let changed: Vec<_> = diff.changed_lines().collect();
        assert_eq!(changed, vec![(LineChange::Removed, "  \"a\": 1,"), (LineChange::Added, "  \"a\": 3,")]);
    }

    #[test]
    fn test_key_order_is_not_a_change() {
        let diff = diff_documents(&json!({"a": 1, "b": 2}), &json!({"b": 2, "a": 1}));
        assert!(!diff.has_changes());
        assert_eq!(diff.stats.added + diff.stats.removed, 0);
    }
}
