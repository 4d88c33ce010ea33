//! Shared types for the filter compiler: the parsed expression tree, the
//! per-compile state, and the SQL render step.

use std::net::{IpAddr, Ipv6Addr};

/// Comparison operators shared by the numeric and string condition kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompOp { Eq, Ne, Lt, Le, Gt, Ge }

impl CompOp {
    pub fn sql(self) -> &'static str {
        match self {
            CompOp::Eq => "=",
            CompOp::Ne => "!=",
            CompOp::Lt => "<",
            CompOp::Le => "<=",
            CompOp::Gt => ">",
            CompOp::Ge => ">=",
        }
    }

    pub fn is_equality(self) -> bool { matches!(self, CompOp::Eq | CompOp::Ne) }
}

/// Pattern-match operators for string columns (case-sensitive/insensitive
/// match and their negations).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOp { Like, ILike, NotLike, NotILike }

impl MatchOp {
    pub fn sql(self) -> &'static str {
        match self {
            MatchOp::Like => "LIKE",
            MatchOp::ILike => "ILIKE",
            MatchOp::NotLike => "NOT LIKE",
            MatchOp::NotILike => "NOT ILIKE",
        }
    }
}

/// One validated condition. The column name stored here is the output name:
/// direction rewriting has already been applied, casing is the catalog's
/// canonical casing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// IP equality against a normalized address: `{col} = toIPv6('…')`
    IpCompare { column: String, op: CompOp, addr: IpAddr },
    /// Subnet membership over an inclusive address range:
    /// `{col} [NOT] BETWEEN toIPv6('…') AND toIPv6('…')`
    IpRange { column: String, negated: bool, first: Ipv6Addr, last: Ipv6Addr },
    /// String equality (also carries normalized boundary keywords).
    StrCompare { column: String, op: CompOp, value: String },
    StrMatch { column: String, op: MatchOp, value: String },
    StrIn { column: String, negated: bool, values: Vec<String> },
    /// Plain numeric comparison. `lhs` is a column name, or a derived
    /// expression for ratio columns (`Bytes/Packets`).
    NumCompare { lhs: String, op: CompOp, value: u64 },
    AsIn { column: String, negated: bool, values: Vec<u32> },
    /// Set membership over an array-backed column: `[NOT] has({col}, {n})`.
    /// Used for AS paths and for (large) communities; the packed value fits
    /// u128 in all cases.
    Membership { column: String, negated: bool, value: u128 },
    /// Protocol referenced by name; the name-to-number lookup runs in the
    /// query engine, not here.
    ProtoName { column: String, op: CompOp, name: String },
}

/// The parsed filter program. Combinators mirror the input text's explicit
/// structure: no rebalancing, no precedence reordering, parentheses only
/// where the user wrote them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterExpr {
    Condition(Condition),
    And(Box<FilterExpr>, Box<FilterExpr>),
    Or(Box<FilterExpr>, Box<FilterExpr>),
    Not(Box<FilterExpr>),
    Group(Box<FilterExpr>),
}

/// Mutable state scoped to a single compile call. `reverse_direction` is
/// fixed by the caller for the whole compile; `main_table_required` starts
/// false and only ever flips to true.
#[derive(Debug, Clone)]
pub struct CompileState {
    pub reverse_direction: bool,
    pub main_table_required: bool,
}

impl CompileState {
    pub fn new(reverse_direction: bool) -> Self {
        CompileState { reverse_direction, main_table_required: false }
    }
}

/// Quote a string value for the target SQL dialect: single quotes, with
/// backslash and quote escaped.
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

fn render_condition(cond: &Condition) -> String {
    match cond {
        Condition::IpCompare { column, op, addr } => {
            format!("{} {} toIPv6('{}')", column, op.sql(), addr)
        }
        Condition::IpRange { column, negated, first, last } => {
            let kw = if *negated { "NOT BETWEEN" } else { "BETWEEN" };
            format!("{} {} toIPv6('{}') AND toIPv6('{}')", column, kw, first, last)
        }
        Condition::StrCompare { column, op, value } => {
            format!("{} {} {}", column, op.sql(), quote_string(value))
        }
        Condition::StrMatch { column, op, value } => {
            format!("{} {} {}", column, op.sql(), quote_string(value))
        }
        Condition::StrIn { column, negated, values } => {
            let kw = if *negated { "NOT IN" } else { "IN" };
            let items: Vec<String> = values.iter().map(|v| quote_string(v)).collect();
            format!("{} {} ({})", column, kw, items.join(", "))
        }
        Condition::NumCompare { lhs, op, value } => {
            format!("{} {} {}", lhs, op.sql(), value)
        }
        Condition::AsIn { column, negated, values } => {
            let kw = if *negated { "NOT IN" } else { "IN" };
            let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
            format!("{} {} ({})", column, kw, items.join(", "))
        }
        Condition::Membership { column, negated, value } => {
            if *negated {
                format!("NOT has({}, {})", column, value)
            } else {
                format!("has({}, {})", column, value)
            }
        }
        Condition::ProtoName { column, op, name } => {
            format!("{} {} dictGetOrDefault('protocols', 'number', {}, 0)", column, op.sql(), quote_string(name))
        }
    }
}

/// Render the expression tree back to a SQL boolean fragment. Grouping in
/// the output comes only from explicit `Group` nodes; AND/OR chains are
/// concatenated as written and rely on the target dialect's own precedence.
pub fn render(expr: &FilterExpr) -> String {
    match expr {
        FilterExpr::Condition(c) => render_condition(c),
        FilterExpr::And(l, r) => format!("{} AND {}", render(l), render(r)),
        FilterExpr::Or(l, r) => format!("{} OR {}", render(l), render(r)),
        FilterExpr::Not(inner) => format!("NOT {}", render(inner)),
        FilterExpr::Group(inner) => format!("({})", render(inner)),
    }
}
