use flowsieve::error::FilterErrorKind;
use flowsieve::filter::{column_names, compile, validate};

// Opt-in compile logging for test debugging: RUST_LOG=debug cargo test
fn init_logs() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

#[test]
fn compile_is_deterministic() {
    init_logs();
    let input = "SrcAddr << 192.0.2.0/24 AND (Proto = 6 OR Proto = 17)";
    let a = compile(input, false).expect("compile failed");
    let b = compile(input, false).expect("compile failed");
    assert_eq!(a, b);
}

#[test]
fn string_equality() {
    let out = compile("ExporterName = 'edge-1'", false).expect("compile failed");
    assert_eq!(out.sql, "ExporterName = 'edge-1'");
    assert!(!out.main_table_required);
}

#[test]
fn ip_equality_normalizes_the_address() {
    let out = compile("DstAddr = 2001:DB8:0:0:0:0:0:1", false).expect("compile failed");
    assert_eq!(out.sql, "DstAddr = toIPv6('2001:db8::1')");
    assert!(out.main_table_required);
}

#[test]
fn subnet_condition_covers_the_mapped_range() {
    let out = compile("SrcAddr << 192.0.2.0/24", false).expect("compile failed");
    assert_eq!(
        out.sql,
        "SrcAddr BETWEEN toIPv6('::ffff:192.0.2.0') AND toIPv6('::ffff:192.0.2.255')"
    );
    assert!(out.main_table_required);
}

#[test]
fn negated_subnet_condition() {
    let out = compile("ExporterAddress !<< 10.0.0.0/8", false).expect("compile failed");
    assert_eq!(
        out.sql,
        "ExporterAddress NOT BETWEEN toIPv6('::ffff:10.0.0.0') AND toIPv6('::ffff:10.255.255.255')"
    );
    assert!(!out.main_table_required);
}

#[test]
fn like_family() {
    let out = compile("InIfDescription ILIKE '%transit%'", false).expect("compile failed");
    assert_eq!(out.sql, "InIfDescription ILIKE '%transit%'");
    let out = compile("InIfName UNLIKE 'Gi0/%'", false).expect("compile failed");
    assert_eq!(out.sql, "InIfName NOT LIKE 'Gi0/%'");
    let out = compile("ExporterGroup iunlike '%lab%'", false).expect("compile failed");
    assert_eq!(out.sql, "ExporterGroup NOT ILIKE '%lab%'");
}

#[test]
fn string_lists() {
    let out = compile("ExporterRole IN ('edge', 'core')", false).expect("compile failed");
    assert_eq!(out.sql, "ExporterRole IN ('edge', 'core')");
    let out = compile("SrcCountry NOTIN ('US')", false).expect("compile failed");
    assert_eq!(out.sql, "SrcCountry NOT IN ('US')");
}

#[test]
fn as_number_conditions() {
    let out = compile("SrcAS = AS64500", false).expect("compile failed");
    assert_eq!(out.sql, "SrcAS = 64500");
    let out = compile("DstAS IN (AS64500, 64501)", false).expect("compile failed");
    assert_eq!(out.sql, "DstAS IN (64500, 64501)");
    assert!(!out.main_table_required);
}

#[test]
fn as_path_membership_only() {
    let out = compile("DstASPath = AS174", false).expect("compile failed");
    assert_eq!(out.sql, "has(DstASPath, 174)");
    assert!(out.main_table_required);
    let out = compile("DstASPath != 174", false).expect("compile failed");
    assert_eq!(out.sql, "NOT has(DstASPath, 174)");
    let err = compile("DstASPath < 174", false).unwrap_err();
    assert_eq!(err.kind, FilterErrorKind::OperatorNotSupported);
}

#[test]
fn communities_pick_their_backing_collection() {
    let out = compile("DstCommunities = 100:200", false).expect("compile failed");
    assert_eq!(out.sql, "has(DstCommunities, 6553800)");
    assert!(out.main_table_required);
    let out = compile("DstCommunities = 1:2:3", false).expect("compile failed");
    assert_eq!(out.sql, "has(DstLargeCommunities, 18446744082299486211)");
    let out = compile("DstCommunities != 65000:100", false).expect("compile failed");
    assert_eq!(out.sql, "NOT has(DstCommunities, 4259840100)");
}

#[test]
fn ethertype_maps_to_constants() {
    let out = compile("EtherType = ipv4", false).expect("compile failed");
    assert_eq!(out.sql, "EtherType = 2048");
    let out = compile("EtherType != 'IPv6'", false).expect("compile failed");
    assert_eq!(out.sql, "EtherType != 34525");
    let err = compile("EtherType = arp", false).unwrap_err();
    assert_eq!(err.kind, FilterErrorKind::Syntax);
}

#[test]
fn protocol_numeric_and_by_name() {
    let out = compile("Proto = 6", false).expect("compile failed");
    assert_eq!(out.sql, "Proto = 6");
    let out = compile("Proto >= 6", false).expect("compile failed");
    assert_eq!(out.sql, "Proto >= 6");
    let out = compile("Proto = 'tcp'", false).expect("compile failed");
    assert_eq!(out.sql, "Proto = dictGetOrDefault('protocols', 'number', 'tcp', 0)");
    let err = compile("Proto > 'tcp'", false).unwrap_err();
    assert_eq!(err.kind, FilterErrorKind::OperatorNotSupported);
}

#[test]
fn proto_out_of_range() {
    let err = compile("Proto = 9999", false).unwrap_err();
    assert_eq!(err.kind, FilterErrorKind::IntegerOutOfRange);
}

#[test]
fn boundary_accepts_only_the_three_states() {
    let out = compile("InIfBoundary = external", false).expect("compile failed");
    assert_eq!(out.sql, "InIfBoundary = 'external'");
    let out = compile("OutIfBoundary != 'UNDEFINED'", false).expect("compile failed");
    assert_eq!(out.sql, "OutIfBoundary != 'undefined'");
    let err = compile("InIfBoundary = \"unknown\"", false).unwrap_err();
    assert_eq!(err.kind, FilterErrorKind::Syntax);
}

#[test]
fn packet_size_is_a_ratio() {
    let out = compile("PacketSize >= 1400", false).expect("compile failed");
    assert_eq!(out.sql, "Bytes/Packets >= 1400");
    assert!(!out.main_table_required);
}

#[test]
fn forwarding_status_full_relational() {
    let out = compile("ForwardingStatus >= 128", false).expect("compile failed");
    assert_eq!(out.sql, "ForwardingStatus >= 128");
    let err = compile("ForwardingStatus = 300", false).unwrap_err();
    assert_eq!(err.kind, FilterErrorKind::IntegerOutOfRange);
}

#[test]
fn and_or_chain_passes_through_without_grouping() {
    let out = compile("Proto = 6 AND SrcPort = 443 OR DstPort = 443", false).expect("compile failed");
    assert_eq!(out.sql, "Proto = 6 AND SrcPort = 443 OR DstPort = 443");
    assert!(out.main_table_required);
}

#[test]
fn not_binds_to_the_unparenthesized_tail() {
    let plain = compile("NOT SrcCountry = 'US' AND DstCountry = 'FR'", false).expect("compile failed");
    let grouped = compile("NOT (SrcCountry = 'US' AND DstCountry = 'FR')", false).expect("compile failed");
    assert_eq!(plain.sql, "NOT SrcCountry = 'US' AND DstCountry = 'FR'");
    assert_eq!(grouped.sql, "NOT (SrcCountry = 'US' AND DstCountry = 'FR')");
    assert_ne!(plain.sql, grouped.sql);
}

#[test]
fn operators_must_match_the_column_kind() {
    let err = compile("ExporterName << 'edge'", false).unwrap_err();
    assert_eq!(err.kind, FilterErrorKind::OperatorNotSupported);
    let err = compile("SrcAddr > 10.0.0.0", false).unwrap_err();
    assert_eq!(err.kind, FilterErrorKind::OperatorNotSupported);
    let err = compile("InIfBoundary LIKE 'ext%'", false).unwrap_err();
    assert_eq!(err.kind, FilterErrorKind::OperatorNotSupported);
}

#[test]
fn unknown_column_is_reported_at_its_offset() {
    let err = compile("Proto = 6 AND Wat = 1", false).unwrap_err();
    assert_eq!(err.kind, FilterErrorKind::UnknownColumn);
    assert_eq!(err.offset, 14);
    assert!(err.message.contains("Wat"), "message: {}", err.message);
}

#[test]
fn empty_lists_are_rejected() {
    let err = compile("SrcAS IN ()", false).unwrap_err();
    assert_eq!(err.kind, FilterErrorKind::EmptyList);
    let err = compile("ExporterRole NOTIN ( )", false).unwrap_err();
    assert_eq!(err.kind, FilterErrorKind::EmptyList);
}

#[test]
fn unterminated_string_points_at_the_opening_quote() {
    let err = compile("ExporterName = \"abc", false).unwrap_err();
    assert_eq!(err.kind, FilterErrorKind::UnterminatedString);
    assert_eq!(err.offset, 15);
}

#[test]
fn trailing_garbage_is_a_syntax_error() {
    let err = compile("Proto = 6 6", false).unwrap_err();
    assert_eq!(err.kind, FilterErrorKind::Syntax);
    assert_eq!(err.offset, 10);
}

#[test]
fn no_partial_result_on_late_failure() {
    // The first condition is fine; the second fails and the whole compile
    // fails with it.
    let err = compile("Proto = 6 AND SrcAddr = 999.0.0.1", false).unwrap_err();
    assert_eq!(err.kind, FilterErrorKind::InvalidIp);
}

#[test]
fn validate_mirrors_compile() {
    assert!(validate("SrcAddr << 192.0.2.0/24 AND Proto = 6").is_ok());
    assert_eq!(
        validate("SrcAddr << 192.0.2.0/33").unwrap_err().kind,
        FilterErrorKind::InvalidSubnet
    );
}

#[test]
fn catalog_listing_is_fixed() {
    let names = column_names();
    assert_eq!(names.len(), 43);
    for expected in ["ExporterAddress", "SrcAddr", "DstCommunities", "PacketSize", "ForwardingStatus"] {
        assert!(names.contains(&expected), "missing {}", expected);
    }
}
