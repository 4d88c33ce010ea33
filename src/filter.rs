//! Filter expression compiler: parses the operator-facing filter language
//! and emits a SQL boolean fragment plus a hint telling the query planner
//! whether the unaggregated main table is required.

use tracing::debug;

pub mod filter_catalog;
pub mod filter_common;
pub mod filter_lex;
pub mod filter_parse_condition;
pub mod filter_parse_expr;
pub mod filter_values;

// Re-export common filter types and helpers so callers can use
// `filter::Compiled`, `filter::CompileState`, etc. directly.
pub use filter_catalog::*;
pub use filter_common::*;
pub use filter_values::*;

use crate::error::FilterResult;
use crate::filter::filter_lex::Scan;
use crate::filter::filter_parse_expr::parse_expr;

/// Result of a successful compile: the SQL fragment and the final value of
/// the main-table routing hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiled {
    pub sql: String,
    pub main_table_required: bool,
}

/// Parse a filter into its expression tree. The whole input must be
/// consumed, up to trailing whitespace and comments.
pub fn parse_filter(input: &str, state: &mut CompileState) -> FilterResult<FilterExpr> {
    let mut scan = Scan::new(input);
    let expr = parse_expr(&mut scan, state)?;
    scan.skip_space()?;
    if !scan.at_end() {
        return Err(scan.syntax_here("expecting AND, OR or end of input"));
    }
    Ok(expr)
}

/// Compile a filter expression. State is allocated fresh per call, so
/// independent compiles can run concurrently.
pub fn compile(input: &str, reverse_direction: bool) -> FilterResult<Compiled> {
    let mut state = CompileState::new(reverse_direction);
    let expr = parse_filter(input, &mut state)?;
    let sql = render(&expr);
    debug!("[FILTER COMPILE] emitted '{}' (main table: {})", sql, state.main_table_required);
    Ok(Compiled { sql, main_table_required: state.main_table_required })
}

/// Parse-only check, used by frontends to vet a filter before saving it.
pub fn validate(input: &str) -> FilterResult<()> {
    compile(input, false).map(|_| ())
}
