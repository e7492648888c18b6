//! Expansion of the domain table into concrete test cases.
//!
//! Each ordered shim pair gets three independent strata: a baseline case,
//! one case per individual header literal, and one aggregate case carrying
//! every header at once. The matrix stays linear in the number of header
//! literals. Property variants follow the same policy when enabled.

use std::sync::Arc;

use jmsit_model::{
    HeaderDomain, MessageHeaders, MessageKind, MessageProperties, TypeDomain,
    TypedValue,
};

use crate::case::{HeaderVariant, PropertyVariant, TestCase};
use crate::shim::ShimHandle;
use crate::table::TypeDomainTable;

/// An ordered (sender, receiver) pair.
pub type ShimPair = (Arc<dyn ShimHandle>, Arc<dyn ShimHandle>);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuilderOptions {
    /// Generate property cases. Off until client libraries agree on
    /// application property encoding (PROTON-1284).
    pub property_variants: bool,
}

/// Full N x N product of `shims` with itself, self-pairs included, in
/// configured order.
pub fn shim_pairs(shims: &[Arc<dyn ShimHandle>]) -> Vec<ShimPair> {
    shims
        .iter()
        .flat_map(|sender| {
            shims
                .iter()
                .map(move |receiver| (Arc::clone(sender), Arc::clone(receiver)))
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct TestCaseBuilder<'a> {
    table: &'a TypeDomainTable,
    options: BuilderOptions,
}

impl<'a> TestCaseBuilder<'a> {
    pub fn new(table: &'a TypeDomainTable) -> Self {
        Self {
            table,
            options: BuilderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: BuilderOptions) -> Self {
        self.options = options;
        self
    }

    /// Cases for `kind` against the table's own header domains.
    pub fn build_kind(
        &self,
        kind: MessageKind,
        pairs: &[ShimPair],
    ) -> Vec<TestCase> {
        self.build(kind, self.table.header_domains(), pairs)
    }

    pub fn build(
        &self,
        kind: MessageKind,
        header_domains: &[HeaderDomain],
        pairs: &[ShimPair],
    ) -> Vec<TestCase> {
        let body = Arc::new(self.table.values_for(kind));
        let variants = self.variants(header_domains);

        let mut cases = Vec::with_capacity(variants.len() * pairs.len());
        for (sender, receiver) in pairs {
            for (headers, properties) in &variants {
                cases.push(TestCase::new(
                    kind,
                    headers.clone(),
                    properties.clone(),
                    Arc::clone(sender),
                    Arc::clone(receiver),
                    Arc::clone(&body),
                ));
            }
        }
        cases
    }

    /// Header/property combinations generated for every shim pair.
    fn variants(
        &self,
        header_domains: &[HeaderDomain],
    ) -> Vec<(HeaderVariant, PropertyVariant)> {
        let mut variants = vec![(HeaderVariant::none(), PropertyVariant::none())];

        variants.extend(
            header_variants(header_domains)
                .into_iter()
                .map(|headers| (headers, PropertyVariant::none())),
        );
        let all_headers = aggregate_headers(header_domains);
        if let Some(headers) = &all_headers {
            variants.push((headers.clone(), PropertyVariant::none()));
        }

        if self.options.property_variants {
            let domain = self.table.property_domain();
            variants.extend(
                property_variants(domain)
                    .into_iter()
                    .map(|properties| (HeaderVariant::none(), properties)),
            );
            if let Some(properties) = aggregate_properties(domain) {
                variants.push((HeaderVariant::none(), properties.clone()));
                if let Some(headers) = all_headers {
                    variants.push((headers, properties));
                }
            }
        }

        variants
    }
}

/// One variant per literal of every type of every header.
fn header_variants(domains: &[HeaderDomain]) -> Vec<HeaderVariant> {
    let mut variants = Vec::new();
    for HeaderDomain { header, domain } in domains {
        for entry in domain.entries() {
            for (index, literal) in entry.values().iter().enumerate() {
                let label = format!(
                    "_hdr.{}.{}.{:02}",
                    header.short_name(),
                    entry.value_type(),
                    index + 1
                );
                let fields = MessageHeaders::single(
                    *header,
                    TypedValue::new(entry.value_type(), literal.clone()),
                );
                variants.push(HeaderVariant::new(label, fields));
            }
        }
    }
    variants
}

/// Every header set to the first value of its first declared type.
fn aggregate_headers(domains: &[HeaderDomain]) -> Option<HeaderVariant> {
    let mut fields = MessageHeaders::default();
    for HeaderDomain { header, domain } in domains {
        if let Some((value_type, literal)) = domain.first() {
            fields.insert(*header, TypedValue::new(value_type, literal.clone()));
        }
    }
    (!fields.is_empty()).then(|| HeaderVariant::new("_hdrs", fields))
}

/// Named `<type>_<NN>`, one property per literal.
fn property_fields(domain: &TypeDomain) -> Vec<(String, TypedValue)> {
    domain
        .entries()
        .iter()
        .flat_map(|entry| {
            entry.values().iter().enumerate().map(move |(index, literal)| {
                (
                    format!("{}_{:02}", entry.value_type(), index + 1),
                    TypedValue::new(entry.value_type(), literal.clone()),
                )
            })
        })
        .collect()
}

fn property_variants(domain: &TypeDomain) -> Vec<PropertyVariant> {
    property_fields(domain)
        .into_iter()
        .map(|(name, value)| {
            let label = format!("_prop.{name}");
            PropertyVariant::new(label, MessageProperties::single(name, value))
        })
        .collect()
}

fn aggregate_properties(domain: &TypeDomain) -> Option<PropertyVariant> {
    let mut fields = MessageProperties::default();
    for (name, value) in property_fields(domain) {
        fields.insert(name, value);
    }
    (!fields.is_empty()).then(|| PropertyVariant::new("_props", fields))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::io;

    use jmsit_model::{DecodeHints, HeaderName, Literal, ValueType};

    use super::*;
    use crate::error::LaunchError;
    use crate::shim::{LaunchRequest, Role, RunningShim};

    #[derive(Debug)]
    struct Named(&'static str);

    impl ShimHandle for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn launch(
            &self,
            role: Role,
            _request: &LaunchRequest<'_>,
        ) -> Result<Box<dyn RunningShim>, LaunchError> {
            Err(LaunchError::Spawn {
                shim: self.0.to_string(),
                role,
                program: "none".to_string(),
                source: io::Error::other("not launchable"),
            })
        }
    }

    fn shims(names: &[&'static str]) -> Vec<Arc<dyn ShimHandle>> {
        names
            .iter()
            .map(|name| Arc::new(Named(*name)) as Arc<dyn ShimHandle>)
            .collect()
    }

    fn header_literal_count(table: &TypeDomainTable) -> usize {
        table
            .header_domains()
            .iter()
            .map(|header| header.domain.literal_count())
            .sum()
    }

    #[test]
    fn pairs_cover_full_matrix_in_order() {
        let pairs = shim_pairs(&shims(&["A", "B", "C"]));
        let names: Vec<_> = pairs
            .iter()
            .map(|(s, r)| format!("{}{}", s.name(), r.name()))
            .collect();

        assert_eq!(
            names,
            ["AA", "AB", "AC", "BA", "BB", "BC", "CA", "CB", "CC"]
        );
    }

    #[test]
    fn case_count_is_baseline_plus_headers_plus_aggregate() {
        let table = TypeDomainTable::jms();
        let pairs = shim_pairs(&shims(&["A", "B"]));
        let per_pair = 1 + header_literal_count(&table) + 1;
        assert_eq!(per_pair, 21);

        for kind in table.kinds() {
            let cases = TestCaseBuilder::new(&table).build_kind(kind, &pairs);
            assert_eq!(cases.len(), per_pair * pairs.len(), "{kind}");
        }
    }

    #[test]
    fn identifiers_are_unique_across_the_suite() {
        let table = TypeDomainTable::jms();
        let pairs = shim_pairs(&shims(&["ProtonCpp", "ProtonPython", "QpidJms"]));
        let builder = TestCaseBuilder::new(&table).with_options(BuilderOptions {
            property_variants: true,
        });

        let mut seen = HashSet::new();
        for kind in table.kinds() {
            for case in builder.build_kind(kind, &pairs) {
                assert!(seen.insert(case.id().clone()), "{}", case.id());
            }
        }
    }

    #[test]
    fn identifiers_follow_label_scheme() {
        let table = TypeDomainTable::jms();
        let pairs = shim_pairs(&shims(&["A", "B"]));
        let cases = TestCaseBuilder::new(&table).build_kind(MessageKind::Map, &pairs);
        let ids: Vec<_> = cases.iter().map(|c| c.id().as_str()).collect();

        assert_eq!(ids[0], "test_MAPMESSAGE_A->A");
        assert_eq!(ids[1], "test_MAPMESSAGE_hdr.CORRELATIONID.string.01_A->A");
        assert!(ids.contains(&"test_MAPMESSAGE_hdr.REPLYTO.topic.02_B->A"));
        assert!(ids.contains(&"test_MAPMESSAGE_hdrs_A->B"));
    }

    #[test]
    fn single_header_cases_carry_exactly_one_header() {
        let table = TypeDomainTable::jms();
        let pairs = shim_pairs(&shims(&["A"]));
        let cases = TestCaseBuilder::new(&table).build_kind(MessageKind::Text, &pairs);

        for case in cases.iter().filter(|c| c.headers().label.starts_with("_hdr.")) {
            assert_eq!(case.headers().fields.len(), 1, "{}", case.id());
            assert!(case.properties().fields.is_empty());
        }
        assert!(cases[0].headers().fields.is_empty());
    }

    #[test]
    fn aggregate_headers_need_no_decode_hints() {
        let table = TypeDomainTable::jms();
        let pairs = shim_pairs(&shims(&["A"]));
        let cases = TestCaseBuilder::new(&table).build_kind(MessageKind::Map, &pairs);
        let aggregate = cases
            .iter()
            .find(|c| c.headers().label == "_hdrs")
            .expect("aggregate case");

        assert!(DecodeHints::for_headers(&aggregate.headers().fields).is_empty());
    }

    #[test]
    fn aggregate_uses_first_value_of_first_type() {
        let table = TypeDomainTable::jms();
        let pairs = shim_pairs(&shims(&["A"]));
        let cases = TestCaseBuilder::new(&table).build_kind(MessageKind::Bytes, &pairs);
        let aggregate = cases
            .iter()
            .find(|c| c.headers().label == "_hdrs")
            .expect("aggregate case");
        let fields = &aggregate.headers().fields;

        assert_eq!(fields.len(), HeaderName::ALL.len());
        for domain in table.header_domains() {
            let (value_type, literal) = domain.domain.first().expect("first");
            assert_eq!(
                fields.get(&domain.header),
                Some(&TypedValue::new(value_type, literal.clone()))
            );
        }
        assert_eq!(
            fields.get(&HeaderName::ReplyTo),
            Some(&TypedValue::new(ValueType::Queue, "q_aaa"))
        );
    }

    #[test]
    fn empty_header_domains_yield_only_baseline() {
        let table = TypeDomainTable::jms();
        let pairs = shim_pairs(&shims(&["A", "B"]));
        let cases = TestCaseBuilder::new(&table).build(MessageKind::Message, &[], &pairs);

        assert_eq!(cases.len(), pairs.len());
        assert_eq!(cases[0].body().get(ValueType::None), Some(&[Literal::null()][..]));
    }

    #[test]
    fn property_strata_mirror_headers() {
        let table = TypeDomainTable::jms();
        let pairs = shim_pairs(&shims(&["A"]));
        let cases = TestCaseBuilder::new(&table)
            .with_options(BuilderOptions {
                property_variants: true,
            })
            .build_kind(MessageKind::Stream, &pairs);

        let property_count = table.property_domain().literal_count();
        let singles = cases
            .iter()
            .filter(|c| c.properties().label.starts_with("_prop."))
            .count();
        assert_eq!(singles, property_count);
        assert_eq!(cases.len(), 21 + property_count + 2);

        let combined = cases.last().expect("combined case");
        assert_eq!(combined.id().as_str(), "test_STREAMMESSAGE_hdrs_props_A->A");
        assert_eq!(combined.properties().fields.len(), property_count);
        assert!(
            combined
                .properties()
                .fields
                .get(&"float_13".to_string())
                .is_some()
        );
    }
}
