use proptest::prelude::*;
use rsl::{
    property, qualified, Category, Condition, Pattern, PropertyTree, Quantity, Timestamp,
    UnitPrefix, Value, Version,
};

// --- Fixed property schema ---
// cpu.count : plain quantity (0..=64)
// cpu.clock : quantity in Hz with a prefix
// kernel    : version
// booted    : timestamp
// label     : text, may hold quotes and backslashes
// os        : container { name : text, one of NAMES }
// kind      : category
// disks     : array of { size : quantity in B }

const NAMES: &[&str] = &["GNU/Linux", "FreeBSD", "Windows", "Solaris"];
const PREFIXES: &[Option<UnitPrefix>] = &[
    None,
    Some(UnitPrefix::Kilo),
    Some(UnitPrefix::Mega),
    Some(UnitPrefix::Giga),
];

/// 1970-01-01 up to 2100-01-01, in epoch milliseconds.
const TIMESTAMP_RANGE: std::ops::Range<i64> = 0..4_102_444_800_000;

fn arb_prefix() -> impl Strategy<Value = Option<UnitPrefix>> {
    prop::sample::select(PREFIXES)
}

fn arb_category() -> impl Strategy<Value = Category> {
    prop::sample::select(Category::ALL.to_vec())
}

fn arb_quantity(unit: &'static str) -> impl Strategy<Value = Quantity> {
    (0_i64..4096, arb_prefix()).prop_map(move |(magnitude, prefix)| {
        Quantity::new(magnitude, prefix, Some(unit)).unwrap()
    })
}

fn arb_version() -> impl Strategy<Value = Version> {
    prop::collection::vec("[0-9]{1,3}|[0-9][a-z_-]{0,3}", 1..4)
        .prop_map(|parts| parts.join(".").parse::<Version>().unwrap())
}

fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
    TIMESTAMP_RANGE.prop_map(|millis| Timestamp::from_epoch_millis(millis).unwrap())
}

fn arb_text() -> impl Strategy<Value = String> {
    "[a-z\"\\\\ ]{0,8}"
}

fn arb_disk() -> impl Strategy<Value = PropertyTree> {
    arb_quantity("B").prop_map(|size| PropertyTree::new().with_value("size", size))
}

/// Generate a host that fits the fixed schema.
pub fn arb_host() -> impl Strategy<Value = PropertyTree> {
    (
        (0_i64..=64, arb_quantity("Hz")),
        (arb_version(), arb_timestamp(), arb_text()),
        prop::sample::select(NAMES),
        arb_category(),
        prop::collection::vec(arb_disk(), 0..4),
    )
        .prop_map(|((count, clock), (kernel, booted, label), name, kind, disks)| {
            PropertyTree::new()
                .with_value("cpu.count", count)
                .with_value("cpu.clock", clock)
                .with_value("kernel", kernel)
                .with_value("booted", booted)
                .with_value("label", label)
                .with_container("os", PropertyTree::new().with_value("name", name))
                .with_value("kind", kind)
                .with_array("disks", disks)
        })
}

fn ordering_compare(name: &'static str, value: impl Into<Value>, op: u8) -> Condition {
    let p = property(name);
    match op {
        0 => p.eq(value),
        1 => p.ne(value),
        2 => p.lt(value),
        3 => p.le(value),
        4 => p.gt(value),
        _ => p.ge(value),
    }
}

fn equality(name: &'static str, value: impl Into<Value>, eq: bool) -> Condition {
    if eq {
        property(name).eq(value)
    } else {
        property(name).ne(value)
    }
}

/// Generate a leaf comparison that is well-typed against the schema.
fn arb_leaf() -> impl Strategy<Value = Condition> {
    prop_oneof![
        (-8_i64..=64, 0_u8..6).prop_map(|(v, op)| ordering_compare("cpu.count", v, op)),
        (arb_quantity("Hz"), 0_u8..6).prop_map(|(v, op)| ordering_compare("cpu.clock", v, op)),
        (arb_version(), 0_u8..6).prop_map(|(v, op)| ordering_compare("kernel", v, op)),
        (arb_timestamp(), 0_u8..6).prop_map(|(v, op)| ordering_compare("booted", v, op)),
        (arb_text(), any::<bool>()).prop_map(|(v, eq)| equality("label", v, eq)),
        (prop::sample::select(NAMES), any::<bool>())
            .prop_map(|(name, eq)| qualified("os", equality("name", name, eq))),
        (prop::sample::select(vec!["linux", "bsd", "^win", "s$", "a/b"]), any::<bool>())
            .prop_map(|(src, ci)| {
                qualified("os", property("name").matches(Pattern::new(src, ci).unwrap()))
            }),
        (arb_category(), any::<bool>()).prop_map(|(c, eq)| equality("kind", c, eq)),
        (arb_quantity("B"), 0_u8..6)
            .prop_map(|(v, op)| qualified("disks", ordering_compare("size", v, op))),
        Just(Condition::AlwaysTrue),
    ]
}

/// Generate a condition tree of conjunctions and disjunctions, bounded depth.
/// Every And/Or node has at least two children so the tree survives a round
/// trip through its canonical text.
pub fn arb_condition(max_depth: u32) -> impl Strategy<Value = Condition> {
    arb_leaf().prop_recursive(max_depth, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 2..4).prop_map(Condition::And),
            prop::collection::vec(inner, 2..4).prop_map(Condition::Or),
        ]
    })
}
