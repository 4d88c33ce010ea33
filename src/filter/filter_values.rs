//! Typed literal scanners: each reads one contiguous token of filter text
//! and yields a validated value. Failures abort the enclosing parse.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::error::{FilterError, FilterResult};
use crate::filter::filter_lex::{is_ident_start, Scan};

/// A BGP community literal. Which form parsed decides the backing collection
/// the condition is emitted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommunityLit {
    /// `<u16>:<u16>` packed as `(hi << 16) | lo`.
    Regular(u32),
    /// `<u32>:<u32>:<u32>` packed as `(p1 << 64) | (p2 << 32) | p3`.
    Large(u128),
}

fn is_ip_char(c: char) -> bool { c.is_ascii_hexdigit() || c == ':' || c == '.' }

fn next_is_ident_start(scan: &Scan) -> bool {
    scan.peek().map(is_ident_start).unwrap_or(false)
}

/// Bound-check a run of decimal digits against an inclusive maximum.
fn decimal_value(src: &str, text: &str, offset: usize, max: u64, what: &str) -> FilterResult<u64> {
    let parsed: u128 = if text.len() > 39 {
        u128::MAX
    } else {
        text.parse().unwrap_or(u128::MAX)
    };
    if parsed > max as u128 {
        return Err(FilterError::out_of_range(src, offset, format!("{} does not fit {}", text, what)));
    }
    Ok(parsed as u64)
}

/// Unsigned integer of a given width (8/16/32/64 bits).
pub fn scan_uint(scan: &mut Scan, bits: u32, what: &str) -> FilterResult<u64> {
    let (text, offset) = match scan.scan_digits() {
        Some(t) => t,
        None => return Err(scan.syntax_here(format!("expecting {}", what))),
    };
    if next_is_ident_start(scan) {
        return Err(FilterError::syntax(scan.src, offset, format!("expecting {}", what)));
    }
    let max = if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 };
    decimal_value(scan.src, text, offset, max, what)
}

/// IP address, v4 or v6, normalized by the address parser.
pub fn scan_ip(scan: &mut Scan) -> FilterResult<IpAddr> {
    let start = scan.pos;
    while let Some(c) = scan.peek() {
        if is_ip_char(c) { scan.advance(c) } else { break }
    }
    let text = &scan.src[start..scan.pos];
    if text.is_empty() || next_is_ident_start(scan) {
        return Err(FilterError::invalid_ip(scan.src, start, "expecting an IP address"));
    }
    text.parse::<IpAddr>()
        .map_err(|_| FilterError::invalid_ip(scan.src, start, "expecting an IP address"))
}

/// CIDR subnet. Returns the inclusive [first, last] range of the prefix,
/// with v4 ranges mapped into IPv4-in-IPv6 form for uniform comparison.
pub fn scan_subnet(scan: &mut Scan) -> FilterResult<(Ipv6Addr, Ipv6Addr)> {
    let start = scan.pos;
    while let Some(c) = scan.peek() {
        if is_ip_char(c) { scan.advance(c) } else { break }
    }
    let addr_text = &scan.src[start..scan.pos];
    let invalid = |s: &Scan| FilterError::invalid_subnet(s.src, start, "expecting a subnet");
    if addr_text.is_empty() || !scan.eat_char('/') {
        return Err(invalid(scan));
    }
    let prefix_text = match scan.scan_digits() {
        Some((t, _)) => t,
        None => return Err(invalid(scan)),
    };
    if next_is_ident_start(scan) {
        return Err(invalid(scan));
    }
    let addr: IpAddr = addr_text.parse().map_err(|_| invalid(scan))?;
    let prefix: u32 = prefix_text.parse().map_err(|_| invalid(scan))?;
    match addr {
        IpAddr::V4(v4) => {
            if prefix > 32 {
                return Err(invalid(scan));
            }
            let base = u32::from(v4);
            let mask = if prefix == 0 { 0 } else { u32::MAX << (32 - prefix) };
            let first = Ipv4Addr::from(base & mask);
            let last = Ipv4Addr::from(base | !mask);
            Ok((first.to_ipv6_mapped(), last.to_ipv6_mapped()))
        }
        IpAddr::V6(v6) => {
            if prefix > 128 {
                return Err(invalid(scan));
            }
            let base = u128::from(v6);
            let mask = if prefix == 0 { 0 } else { u128::MAX << (128 - prefix) };
            Ok((Ipv6Addr::from(base & mask), Ipv6Addr::from(base | !mask)))
        }
    }
}

/// 32-bit AS number with an optional case-insensitive `AS` prefix.
pub fn scan_as_number(scan: &mut Scan) -> FilterResult<u32> {
    let rest = &scan.src[scan.pos..];
    if rest.len() >= 3
        && rest.is_char_boundary(2)
        && rest[..2].eq_ignore_ascii_case("as")
        && rest[2..].chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false)
    {
        scan.pos += 2;
    }
    let value = scan_uint(scan, 32, "an AS number")?;
    Ok(value as u32)
}

/// Community (`u16:u16`) or large community (`u32:u32:u32`), distinguished
/// by the number of parts. The token must not run into an identifier or a
/// further `:`.
pub fn scan_community(scan: &mut Scan) -> FilterResult<CommunityLit> {
    let expecting = "expecting a community or large community";
    let start = scan.pos;
    let (p1, p1_off) = match scan.scan_digits() {
        Some(t) => t,
        None => return Err(scan.syntax_here(expecting)),
    };
    if !scan.eat_char(':') {
        return Err(FilterError::syntax(scan.src, start, expecting));
    }
    let (p2, p2_off) = match scan.scan_digits() {
        Some(t) => t,
        None => return Err(scan.syntax_here(expecting)),
    };
    if scan.eat_char(':') {
        let (p3, p3_off) = match scan.scan_digits() {
            Some(t) => t,
            None => return Err(scan.syntax_here(expecting)),
        };
        if next_is_ident_start(scan) || scan.peek() == Some(':') {
            return Err(FilterError::syntax(scan.src, start, expecting));
        }
        let what = "an unsigned 32-bit integer";
        let a = decimal_value(scan.src, p1, p1_off, u32::MAX as u64, what)? as u128;
        let b = decimal_value(scan.src, p2, p2_off, u32::MAX as u64, what)? as u128;
        let c = decimal_value(scan.src, p3, p3_off, u32::MAX as u64, what)? as u128;
        Ok(CommunityLit::Large((a << 64) | (b << 32) | c))
    } else {
        if next_is_ident_start(scan) {
            return Err(FilterError::syntax(scan.src, start, expecting));
        }
        let what = "an unsigned 16-bit integer";
        let hi = decimal_value(scan.src, p1, p1_off, u16::MAX as u64, what)? as u32;
        let lo = decimal_value(scan.src, p2, p2_off, u16::MAX as u64, what)? as u32;
        Ok(CommunityLit::Regular((hi << 16) | lo))
    }
}
