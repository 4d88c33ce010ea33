//! Condition grammar: one production per semantic category. Each resolves
//! the column, checks the operator is legal for the column's kind, scans and
//! validates the value, and yields a typed condition node.

use crate::error::{FilterError, FilterResult};
use crate::filter::filter_catalog::{self, ColumnDef, ColumnKind};
use crate::filter::filter_common::{CompOp, CompileState, Condition, MatchOp};
use crate::filter::filter_lex::Scan;
use crate::filter::filter_values::{self, CommunityLit};

const ETHERTYPE_IPV4: u64 = 0x0800;
const ETHERTYPE_IPV6: u64 = 0x86DD;

/// Operator as written in the filter text, before kind validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Comp(CompOp),
    InSubnet,
    NotInSubnet,
    Like,
    ILike,
    Unlike,
    IUnlike,
    In,
    NotIn,
}

impl Operator {
    fn display(self) -> &'static str {
        match self {
            Operator::Comp(op) => op.sql(),
            Operator::InSubnet => "<<",
            Operator::NotInSubnet => "!<<",
            Operator::Like => "LIKE",
            Operator::ILike => "ILIKE",
            Operator::Unlike => "UNLIKE",
            Operator::IUnlike => "IUNLIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOTIN",
        }
    }
}

fn scan_operator(scan: &mut Scan) -> FilterResult<(Operator, usize)> {
    let offset = scan.pos;
    // Symbolic operators, longest first so `!<<` wins over `!=` and `<<`/`<=` over `<`.
    let symbolic: &[(&str, Operator)] = &[
        ("!<<", Operator::NotInSubnet),
        ("!=", Operator::Comp(CompOp::Ne)),
        ("<<", Operator::InSubnet),
        ("<=", Operator::Comp(CompOp::Le)),
        (">=", Operator::Comp(CompOp::Ge)),
        ("=", Operator::Comp(CompOp::Eq)),
        ("<", Operator::Comp(CompOp::Lt)),
        (">", Operator::Comp(CompOp::Gt)),
    ];
    for (text, op) in symbolic {
        if scan.src[scan.pos..].starts_with(text) {
            scan.pos += text.len();
            return Ok((*op, offset));
        }
    }
    let words: &[(&str, Operator)] = &[
        ("ILIKE", Operator::ILike),
        ("IUNLIKE", Operator::IUnlike),
        ("LIKE", Operator::Like),
        ("UNLIKE", Operator::Unlike),
        ("NOTIN", Operator::NotIn),
        ("IN", Operator::In),
    ];
    for (kw, op) in words {
        if scan.eat_keyword(kw) {
            return Ok((*op, offset));
        }
    }
    Err(scan.syntax_here("expecting an operator"))
}

fn unsupported(scan: &Scan, offset: usize, op: Operator, def: &ColumnDef) -> FilterError {
    FilterError::operator_not_supported(
        scan.src, offset,
        format!("operator {} not supported for column {}", op.display(), def.name))
}

fn expect_string(scan: &mut Scan) -> FilterResult<String> {
    match scan.scan_string()? {
        Some(v) => Ok(v),
        None => Err(scan.syntax_here("expecting a string literal")),
    }
}

/// A value that may be written bare (identifier) or quoted, for keyword-like
/// kinds (boundary, ethertype).
fn scan_keyword_value(scan: &mut Scan) -> FilterResult<(String, usize)> {
    let offset = scan.pos;
    if let Some(v) = scan.scan_string()? {
        return Ok((v, offset));
    }
    if let Some((ident, off)) = scan.scan_ident() {
        return Ok((ident.to_string(), off));
    }
    Err(scan.syntax_here("expecting a value"))
}

/// Comma-separated list of one kind of literal, parenthesized, one or more
/// items.
fn parse_list<T>(
    scan: &mut Scan,
    item: impl Fn(&mut Scan) -> FilterResult<T>,
) -> FilterResult<Vec<T>> {
    let open = scan.pos;
    if !scan.eat_char('(') {
        return Err(scan.syntax_here("expecting '('"));
    }
    scan.skip_space()?;
    if scan.eat_char(')') {
        return Err(FilterError::empty_list(scan.src, open, "expecting at least one list element"));
    }
    let mut items = vec![item(scan)?];
    loop {
        scan.skip_space()?;
        if scan.eat_char(',') {
            scan.skip_space()?;
            items.push(item(scan)?);
            continue;
        }
        if scan.eat_char(')') {
            break;
        }
        return Err(scan.syntax_here("expecting ',' or ')'"));
    }
    Ok(items)
}

/// Parse one condition: column, operator, value.
pub fn parse_condition(scan: &mut Scan, state: &mut CompileState) -> FilterResult<Condition> {
    let (ident, offset) = match scan.scan_ident() {
        Some(t) => t,
        None => return Err(scan.syntax_here("expecting a column name")),
    };
    let def = filter_catalog::lookup(ident).ok_or_else(|| {
        FilterError::unknown_column(scan.src, offset, format!("unknown column \"{}\"", ident))
    })?;
    if def.main_table {
        state.main_table_required = true;
    }
    // Validation keys off the resolved column; emission uses the
    // direction-rewritten name.
    let column = if state.reverse_direction { filter_catalog::reversed(def).name } else { def.name };
    scan.skip_space()?;
    let (op, op_offset) = scan_operator(scan)?;
    scan.skip_space()?;
    match def.kind {
        ColumnKind::Ip => ip_condition(scan, column, def, op, op_offset),
        ColumnKind::Str => string_condition(scan, column, def, op, op_offset),
        ColumnKind::Boundary => boundary_condition(scan, column, def, op, op_offset),
        ColumnKind::Speed => numeric_condition(scan, column, def, op, op_offset, 32, "an unsigned 32-bit integer"),
        ColumnKind::Port => numeric_condition(scan, column, def, op, op_offset, 16, "an unsigned 16-bit integer"),
        ColumnKind::ForwardingStatus => numeric_condition(scan, column, def, op, op_offset, 8, "an unsigned 8-bit integer"),
        // PacketSize is derived from raw counters rather than stored.
        ColumnKind::PacketSize => numeric_condition(scan, "Bytes/Packets", def, op, op_offset, 64, "an unsigned 64-bit integer"),
        ColumnKind::AsNumber => as_condition(scan, column, def, op, op_offset),
        ColumnKind::AsPath => aspath_condition(scan, column, def, op, op_offset),
        ColumnKind::Communities => communities_condition(scan, column, def, op, op_offset),
        ColumnKind::EtherType => ethertype_condition(scan, column, def, op, op_offset),
        ColumnKind::Protocol => protocol_condition(scan, column, def, op, op_offset),
    }
}

fn ip_condition(scan: &mut Scan, column: &str, def: &ColumnDef, op: Operator, op_offset: usize) -> FilterResult<Condition> {
    match op {
        Operator::Comp(cmp) if cmp.is_equality() => {
            let addr = filter_values::scan_ip(scan)?;
            Ok(Condition::IpCompare { column: column.to_string(), op: cmp, addr })
        }
        Operator::InSubnet | Operator::NotInSubnet => {
            let (first, last) = filter_values::scan_subnet(scan)?;
            Ok(Condition::IpRange {
                column: column.to_string(),
                negated: op == Operator::NotInSubnet,
                first,
                last,
            })
        }
        _ => Err(unsupported(scan, op_offset, op, def)),
    }
}

fn string_condition(scan: &mut Scan, column: &str, def: &ColumnDef, op: Operator, op_offset: usize) -> FilterResult<Condition> {
    let column = column.to_string();
    match op {
        Operator::Comp(cmp) if cmp.is_equality() => {
            let value = expect_string(scan)?;
            Ok(Condition::StrCompare { column, op: cmp, value })
        }
        Operator::Like | Operator::ILike | Operator::Unlike | Operator::IUnlike => {
            let value = expect_string(scan)?;
            let op = match op {
                Operator::Like => MatchOp::Like,
                Operator::ILike => MatchOp::ILike,
                Operator::Unlike => MatchOp::NotLike,
                _ => MatchOp::NotILike,
            };
            Ok(Condition::StrMatch { column, op, value })
        }
        Operator::In | Operator::NotIn => {
            let values = parse_list(scan, expect_string)?;
            Ok(Condition::StrIn { column, negated: op == Operator::NotIn, values })
        }
        _ => Err(unsupported(scan, op_offset, op, def)),
    }
}

fn boundary_condition(scan: &mut Scan, column: &str, def: &ColumnDef, op: Operator, op_offset: usize) -> FilterResult<Condition> {
    let cmp = match op {
        Operator::Comp(cmp) if cmp.is_equality() => cmp,
        _ => return Err(unsupported(scan, op_offset, op, def)),
    };
    let (value, offset) = scan_keyword_value(scan)?;
    let normalized = value.to_ascii_lowercase();
    match normalized.as_str() {
        "external" | "internal" | "undefined" => {
            Ok(Condition::StrCompare { column: column.to_string(), op: cmp, value: normalized })
        }
        _ => Err(FilterError::syntax(scan.src, offset, "expecting 'external', 'internal' or 'undefined'")),
    }
}

fn numeric_condition(
    scan: &mut Scan,
    lhs: &str,
    def: &ColumnDef,
    op: Operator,
    op_offset: usize,
    bits: u32,
    what: &str,
) -> FilterResult<Condition> {
    let cmp = match op {
        Operator::Comp(cmp) => cmp,
        _ => return Err(unsupported(scan, op_offset, op, def)),
    };
    let value = filter_values::scan_uint(scan, bits, what)?;
    Ok(Condition::NumCompare { lhs: lhs.to_string(), op: cmp, value })
}

fn as_condition(scan: &mut Scan, column: &str, def: &ColumnDef, op: Operator, op_offset: usize) -> FilterResult<Condition> {
    match op {
        Operator::Comp(cmp) if cmp.is_equality() => {
            let value = filter_values::scan_as_number(scan)?;
            Ok(Condition::NumCompare { lhs: column.to_string(), op: cmp, value: value as u64 })
        }
        Operator::In | Operator::NotIn => {
            let values = parse_list(scan, filter_values::scan_as_number)?;
            Ok(Condition::AsIn { column: column.to_string(), negated: op == Operator::NotIn, values })
        }
        _ => Err(unsupported(scan, op_offset, op, def)),
    }
}

fn aspath_condition(scan: &mut Scan, column: &str, def: &ColumnDef, op: Operator, op_offset: usize) -> FilterResult<Condition> {
    // AS paths only support membership tests, not ordering.
    let cmp = match op {
        Operator::Comp(cmp) if cmp.is_equality() => cmp,
        _ => return Err(unsupported(scan, op_offset, op, def)),
    };
    let asn = filter_values::scan_as_number(scan)?;
    Ok(Condition::Membership {
        column: column.to_string(),
        negated: cmp == CompOp::Ne,
        value: asn as u128,
    })
}

fn communities_condition(scan: &mut Scan, column: &str, def: &ColumnDef, op: Operator, op_offset: usize) -> FilterResult<Condition> {
    let cmp = match op {
        Operator::Comp(cmp) if cmp.is_equality() => cmp,
        _ => return Err(unsupported(scan, op_offset, op, def)),
    };
    let negated = cmp == CompOp::Ne;
    match filter_values::scan_community(scan)? {
        CommunityLit::Regular(packed) => Ok(Condition::Membership {
            column: column.to_string(),
            negated,
            value: packed as u128,
        }),
        // Large communities live in their own backing collection.
        CommunityLit::Large(packed) => Ok(Condition::Membership {
            column: column.replace("Communities", "LargeCommunities"),
            negated,
            value: packed,
        }),
    }
}

fn ethertype_condition(scan: &mut Scan, column: &str, def: &ColumnDef, op: Operator, op_offset: usize) -> FilterResult<Condition> {
    let cmp = match op {
        Operator::Comp(cmp) if cmp.is_equality() => cmp,
        _ => return Err(unsupported(scan, op_offset, op, def)),
    };
    let (value, offset) = scan_keyword_value(scan)?;
    let constant = match value.to_ascii_lowercase().as_str() {
        "ipv4" => ETHERTYPE_IPV4,
        "ipv6" => ETHERTYPE_IPV6,
        _ => return Err(FilterError::syntax(scan.src, offset, "expecting 'ipv4' or 'ipv6'")),
    };
    Ok(Condition::NumCompare { lhs: column.to_string(), op: cmp, value: constant })
}

fn protocol_condition(scan: &mut Scan, column: &str, def: &ColumnDef, op: Operator, op_offset: usize) -> FilterResult<Condition> {
    let cmp = match op {
        Operator::Comp(cmp) => cmp,
        _ => return Err(unsupported(scan, op_offset, op, def)),
    };
    if matches!(scan.peek(), Some('\'' | '"')) {
        // Name form: the name-to-number lookup runs in the query engine.
        if !cmp.is_equality() {
            return Err(unsupported(scan, op_offset, op, def));
        }
        let name = expect_string(scan)?;
        return Ok(Condition::ProtoName { column: column.to_string(), op: cmp, name });
    }
    let value = filter_values::scan_uint(scan, 8, "an unsigned 8-bit integer")?;
    Ok(Condition::NumCompare { lhs: column.to_string(), op: cmp, value })
}
