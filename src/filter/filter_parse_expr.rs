//! Boolean combinator grammar. AND and OR chain right-associated with no
//! relative precedence between them; the rendered fragment keeps the user's
//! ordering and lets the target SQL dialect apply its own precedence.
//! Parentheses are the only way to force grouping.

use crate::error::FilterResult;
use crate::filter::filter_common::{CompileState, FilterExpr};
use crate::filter::filter_lex::Scan;
use crate::filter::filter_parse_condition::parse_condition;

pub fn parse_expr(scan: &mut Scan, state: &mut CompileState) -> FilterResult<FilterExpr> {
    let left = parse_term(scan, state)?;
    scan.skip_space()?;
    if scan.eat_keyword("AND") {
        let right = parse_expr(scan, state)?;
        return Ok(FilterExpr::And(Box::new(left), Box::new(right)));
    }
    if scan.eat_keyword("OR") {
        let right = parse_expr(scan, state)?;
        return Ok(FilterExpr::Or(Box::new(left), Box::new(right)));
    }
    Ok(left)
}

fn parse_term(scan: &mut Scan, state: &mut CompileState) -> FilterResult<FilterExpr> {
    scan.skip_space()?;
    if scan.eat_char('(') {
        let inner = parse_expr(scan, state)?;
        scan.skip_space()?;
        if !scan.eat_char(')') {
            return Err(scan.syntax_here("expecting ')'"));
        }
        return Ok(FilterExpr::Group(Box::new(inner)));
    }
    // NOT binds to the whole expression that follows it; callers wanting a
    // tighter binding must parenthesize.
    if scan.eat_keyword("NOT") {
        let inner = parse_expr(scan, state)?;
        return Ok(FilterExpr::Not(Box::new(inner)));
    }
    Ok(FilterExpr::Condition(parse_condition(scan, state)?))
}
