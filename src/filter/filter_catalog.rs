//! Static column catalog. Maps case-insensitive column names to a
//! descriptor used by the condition grammar to decide which operators and
//! value kinds are legal, whether the column forces the unaggregated main
//! table, and how direction reversal rewrites the name.

use once_cell::sync::OnceCell;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Ip,
    Str,
    Boundary,
    Speed,
    ForwardingStatus,
    Port,
    AsNumber,
    AsPath,
    Communities,
    EtherType,
    Protocol,
    PacketSize,
}

/// Directional naming pattern of a column, used for direction reversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectionClass {
    None,
    SrcDst,
    InOut,
}

#[derive(Clone, Copy, Debug)]
pub struct ColumnDef {
    pub name: &'static str,
    pub kind: ColumnKind,
    /// Column only exists in the unaggregated per-flow dataset.
    pub main_table: bool,
    pub direction: DirectionClass,
}

const fn col(name: &'static str, kind: ColumnKind, main_table: bool, direction: DirectionClass) -> ColumnDef {
    ColumnDef { name, kind, main_table, direction }
}

use ColumnKind::*;
use DirectionClass::{InOut, SrcDst};

pub static COLUMNS: &[ColumnDef] = &[
    col("ExporterAddress", Ip, false, DirectionClass::None),
    col("ExporterName", Str, false, DirectionClass::None),
    col("ExporterGroup", Str, false, DirectionClass::None),
    col("ExporterRole", Str, false, DirectionClass::None),
    col("ExporterSite", Str, false, DirectionClass::None),
    col("ExporterRegion", Str, false, DirectionClass::None),
    col("ExporterTenant", Str, false, DirectionClass::None),
    col("SrcAddr", Ip, true, SrcDst),
    col("DstAddr", Ip, true, SrcDst),
    col("SrcNetName", Str, false, SrcDst),
    col("DstNetName", Str, false, SrcDst),
    col("SrcNetRole", Str, false, SrcDst),
    col("DstNetRole", Str, false, SrcDst),
    col("SrcNetSite", Str, false, SrcDst),
    col("DstNetSite", Str, false, SrcDst),
    col("SrcNetRegion", Str, false, SrcDst),
    col("DstNetRegion", Str, false, SrcDst),
    col("SrcNetTenant", Str, false, SrcDst),
    col("DstNetTenant", Str, false, SrcDst),
    col("SrcAS", AsNumber, false, SrcDst),
    col("DstAS", AsNumber, false, SrcDst),
    col("SrcCountry", Str, false, SrcDst),
    col("DstCountry", Str, false, SrcDst),
    col("InIfName", Str, false, InOut),
    col("OutIfName", Str, false, InOut),
    col("InIfDescription", Str, false, InOut),
    col("OutIfDescription", Str, false, InOut),
    col("InIfSpeed", Speed, false, InOut),
    col("OutIfSpeed", Speed, false, InOut),
    col("InIfConnectivity", Str, false, InOut),
    col("OutIfConnectivity", Str, false, InOut),
    col("InIfProvider", Str, false, InOut),
    col("OutIfProvider", Str, false, InOut),
    col("InIfBoundary", Boundary, false, InOut),
    col("OutIfBoundary", Boundary, false, InOut),
    col("EtherType", EtherType, false, DirectionClass::None),
    col("Proto", Protocol, false, DirectionClass::None),
    col("SrcPort", Port, true, SrcDst),
    col("DstPort", Port, true, SrcDst),
    col("PacketSize", PacketSize, false, DirectionClass::None),
    col("ForwardingStatus", ForwardingStatus, false, DirectionClass::None),
    col("DstASPath", AsPath, true, DirectionClass::None),
    col("DstCommunities", Communities, true, DirectionClass::None),
];

static INDEX: OnceCell<HashMap<String, &'static ColumnDef>> = OnceCell::new();

fn index() -> &'static HashMap<String, &'static ColumnDef> {
    INDEX.get_or_init(|| {
        COLUMNS.iter().map(|c| (c.name.to_ascii_lowercase(), c)).collect()
    })
}

/// Case-insensitive exact-match lookup.
pub fn lookup(name: &str) -> Option<&'static ColumnDef> {
    index().get(&name.to_ascii_lowercase()).copied()
}

/// The fixed list of recognized column names, for operator-facing listings
/// and completion.
pub fn column_names() -> Vec<&'static str> {
    COLUMNS.iter().map(|c| c.name).collect()
}

/// The catalog entry for the opposite traffic direction: `Src*`/`Dst*` and
/// `In*`/`Out*` prefixes swap, everything else maps to itself.
pub fn reversed(def: &'static ColumnDef) -> &'static ColumnDef {
    let swapped = match def.direction {
        DirectionClass::None => return def,
        SrcDst => {
            if let Some(rest) = def.name.strip_prefix("Src") {
                format!("Dst{}", rest)
            } else if let Some(rest) = def.name.strip_prefix("Dst") {
                format!("Src{}", rest)
            } else {
                return def;
            }
        }
        InOut => {
            if let Some(rest) = def.name.strip_prefix("In") {
                format!("Out{}", rest)
            } else if let Some(rest) = def.name.strip_prefix("Out") {
                format!("In{}", rest)
            } else {
                return def;
            }
        }
    };
    lookup(&swapped).unwrap_or(def)
}
