//! Boundary-value registry for the JMS message types.
//!
//! Values are curated by hand. Integral literals are hex text so both sign
//! extremes are spelled exactly; floating point literals are IEEE-754 bit
//! patterns so that no implementation has to round a decimal string.

use jmsit_model::{
    DomainEntry, HeaderDomain, HeaderName, MessageKind, TestValues, TypeDomain,
    ValueType,
};

use crate::skip::SkipRules;

const FOX: &str = "The quick brown fox jumped over the lazy dog 0123456789.";

const PROTON_1149: &str = "PROTON-1149: fails on RHEL7";
const PROTON_1288: &str = "PROTON-1288";

/// Registry of body, header and property domains plus broker skip rules.
#[derive(Debug, Clone)]
pub struct TypeDomainTable {
    bodies: Vec<(MessageKind, TypeDomain)>,
    headers: Vec<HeaderDomain>,
    properties: TypeDomain,
    skips: SkipRules,
}

impl TypeDomainTable {
    /// The JMS message type table.
    pub fn jms() -> Self {
        let typed = common_submap().merged(&typed_additions());
        let text = TypeDomain::new(vec![DomainEntry::new(
            ValueType::Text,
            text_values(&[""], true),
        )]);

        Self {
            bodies: vec![
                (
                    MessageKind::Message,
                    TypeDomain::new(vec![DomainEntry::null(ValueType::None)]),
                ),
                (MessageKind::Bytes, typed.clone()),
                (MessageKind::Map, typed.clone()),
                (MessageKind::Stream, typed),
                (MessageKind::Text, text),
                (MessageKind::Object, object_submap()),
            ],
            headers: header_domains(),
            properties: common_submap(),
            skips: SkipRules::default(),
        }
    }

    pub fn with_skip_rules(mut self, rules: SkipRules) -> Self {
        self.skips.extend(rules.iter().cloned());
        self
    }

    /// Kinds that are scheduled, in a stable order.
    pub fn kinds(&self) -> Vec<MessageKind> {
        let mut kinds: Vec<_> = self
            .bodies
            .iter()
            .map(|(kind, _)| *kind)
            .filter(MessageKind::is_active)
            .collect();
        kinds.sort_by_key(|kind| kind.wire_name());
        kinds
    }

    pub fn domain_for(&self, kind: MessageKind) -> Option<&TypeDomain> {
        self.bodies
            .iter()
            .find(|(candidate, _)| *candidate == kind)
            .map(|(_, domain)| domain)
    }

    /// Body payload for `kind`; empty for kinds missing from the table.
    pub fn values_for(&self, kind: MessageKind) -> TestValues {
        match (kind, self.domain_for(kind)) {
            (MessageKind::Text, Some(domain)) => {
                let values = domain
                    .get(ValueType::Text)
                    .map(|entry| entry.values().to_vec())
                    .unwrap_or_default();
                TestValues::flat(ValueType::Text, values)
            }
            (_, Some(domain)) => domain.to_test_values(),
            (_, None) => TestValues::default(),
        }
    }

    pub fn header_domains(&self) -> &[HeaderDomain] {
        &self.headers
    }

    /// Domain used for property variants once they are enabled.
    pub fn property_domain(&self) -> &TypeDomain {
        &self.properties
    }

    pub fn should_skip(&self, kind: MessageKind, broker: &str) -> Option<&str> {
        self.skips.reason_for(kind, broker)
    }
}

fn common_submap() -> TypeDomain {
    TypeDomain::new(vec![
        DomainEntry::new(ValueType::Boolean, ["True", "False"]),
        DomainEntry::new(ValueType::Byte, ["-0x80", "-0x1", "0x0", "0x7f"]),
        DomainEntry::new(
            ValueType::Double,
            [
                "0x0000000000000000", // 0.0
                "0x8000000000000000", // -0.0
                "0x400921fb54442eea", // pi
                "0xc005bf0a8b145fcf", // -e
                "0x0000000000000001", // smallest positive denormal
                "0x8000000000000001", // smallest negative denormal
                "0x000fffffffffffff", // largest positive denormal
                "0x8010000000000000", // largest negative denormal
                "0x7fefffffffffffff", // largest positive normal
                "0xffefffffffffffff", // largest negative normal
                "0x7ff0000000000000", // +Infinity
                "0xfff0000000000000", // -Infinity
                "0x7ff8000000000000", // +NaN
            ],
        ),
        DomainEntry::new(
            ValueType::Float,
            [
                "0x00000000", // 0.0
                "0x80000000", // -0.0
                "0x40490fdb", // pi
                "0xc02df854", // -e
                "0x00000001", // smallest positive denormal
                "0x80000001", // smallest negative denormal
                "0x007fffff", // largest positive denormal
                "0x807fffff", // largest negative denormal
                "0x00800000", // smallest positive normal
                "0x80800000", // smallest negative normal
                "0x7f7fffff", // largest positive normal
                "0xff7fffff", // largest negative normal
                "0x7fc00000", // +NaN
            ],
        )
        .disable("0x7f800000", PROTON_1149)
        .disable("0xff800000", PROTON_1149),
        DomainEntry::new(
            ValueType::Int,
            [
                "-0x80000000",
                "-0x81",
                "-0x80",
                "-0x1",
                "0x0",
                "0x7f",
                "0x80",
                "0x7fffffff",
            ],
        ),
        DomainEntry::new(
            ValueType::Long,
            [
                "-0x8000000000000000",
                "-0x81",
                "-0x80",
                "-0x1",
                "0x0",
                "0x7f",
                "0x80",
                "0x7fffffffffffffff",
            ],
        ),
        DomainEntry::new(ValueType::Short, ["-0x8000", "-0x1", "0x0", "0x7fff"]),
        DomainEntry::new(ValueType::String, text_values(&[""], false)),
    ])
}

/// Types only allowed in typed-content bodies.
fn typed_additions() -> TypeDomain {
    TypeDomain::new(vec![
        DomainEntry::new(
            ValueType::Bytes,
            [
                "",
                "12345",
                "Hello, world",
                r"\x01\x02\x03\x04\x05abcde\x80\x81\xfe\xff",
                FOX,
            ],
        ),
        DomainEntry::new(ValueType::Char, ["a", "Z", "\x01", "\x7f"]),
    ])
}

fn header_domains() -> Vec<HeaderDomain> {
    let long_fox = FOX.repeat(10);
    vec![
        HeaderDomain::new(
            HeaderName::CorrelationId,
            vec![
                DomainEntry::new(ValueType::String, text_values(&[], true))
                    .disable("", PROTON_1288),
                DomainEntry::new(
                    ValueType::Bytes,
                    [
                        r"12345\x006789",
                        "Hello, world",
                        "\"Hello, world\"",
                        r"\x01\x02\x03\x04\x05abcde\x80\x81\xfe\xff",
                        long_fox.as_str(),
                    ],
                )
                .disable("", PROTON_1288),
            ],
        ),
        HeaderDomain::new(
            HeaderName::ReplyTo,
            vec![
                DomainEntry::new(ValueType::Queue, ["q_aaa", "q_bbb"]),
                DomainEntry::new(ValueType::Topic, ["t_aaa", "t_bbb"]),
            ],
        ),
        HeaderDomain::new(
            HeaderName::Type,
            vec![
                DomainEntry::new(ValueType::String, text_values(&[], true))
                    .disable("", PROTON_1288),
            ],
        ),
    ]
}

/// Listed for completeness; the object kind is never scheduled.
fn object_submap() -> TypeDomain {
    TypeDomain::new(vec![
        DomainEntry::new(ValueType::JavaBoolean, ["true", "false"]),
        DomainEntry::new(ValueType::JavaByte, ["-128", "0", "127"]),
        DomainEntry::new(ValueType::JavaCharacter, ["a", "Z"]),
        DomainEntry::new(
            ValueType::JavaDouble,
            ["0.0", "3.141592654", "-2.71828182846"],
        ),
        DomainEntry::new(ValueType::JavaFloat, ["0.0", "3.14159", "-2.71828"]),
        DomainEntry::new(
            ValueType::JavaInteger,
            [
                "-2147483648",
                "-129",
                "-128",
                "-1",
                "0",
                "127",
                "128",
                "2147483647",
            ],
        ),
        DomainEntry::new(
            ValueType::JavaLong,
            [
                "-9223372036854775808",
                "-129",
                "-128",
                "-1",
                "0",
                "127",
                "128",
                "9223372036854775807",
            ],
        ),
        DomainEntry::new(
            ValueType::JavaShort,
            ["-32768", "-129", "-128", "-1", "0", "127", "128", "32767"],
        ),
        DomainEntry::new(
            ValueType::JavaString,
            [
                "",
                "Hello, world",
                "\"Hello, world\"",
                "Charlie's \"peach\"",
                "Charlie's \"peach\"",
            ],
        ),
    ])
}

/// The quoting probes shared by strings, text bodies and string headers.
/// Both quote styles of the apostrophe probe are kept even though they spell
/// the same text.
fn text_values(prefix: &[&str], long_fox: bool) -> Vec<String> {
    let mut values: Vec<String> =
        prefix.iter().map(|value| value.to_string()).collect();
    values.extend(
        [
            "Hello, world",
            "\"Hello, world\"",
            "Charlie's \"peach\"",
            "Charlie's \"peach\"",
        ]
        .map(String::from),
    );
    values.push(if long_fox { FOX.repeat(10) } else { FOX.to_string() });
    values
}
