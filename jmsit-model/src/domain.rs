//! Boundary-value domains.
//!
//! A [`TypeDomain`] is an ordered list of [`DomainEntry`] values, one per
//! scalar type. Literals that are known to break a dependency stay in the
//! entry as [`DisabledValue`]s so they can be re-enabled once the upstream
//! defect is fixed; only the active literals ever reach a test case.

use crate::headers::HeaderName;
use crate::value_type::{Literal, ValueType};
use crate::values::TestValues;

/// A literal excluded from generation, together with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisabledValue {
    pub literal: Literal,
    pub reason: String,
}

/// Literals for a single value type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEntry {
    value_type: ValueType,
    values: Vec<Literal>,
    disabled: Vec<DisabledValue>,
}

impl DomainEntry {
    pub fn new<I, L>(value_type: ValueType, values: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Literal>,
    {
        Self {
            value_type,
            values: values.into_iter().map(Into::into).collect(),
            disabled: Vec::new(),
        }
    }

    /// Entry holding a single JSON `null`.
    pub fn null(value_type: ValueType) -> Self {
        Self {
            value_type,
            values: vec![Literal::null()],
            disabled: Vec::new(),
        }
    }

    pub fn disable(
        mut self,
        literal: impl Into<Literal>,
        reason: impl Into<String>,
    ) -> Self {
        self.disabled.push(DisabledValue {
            literal: literal.into(),
            reason: reason.into(),
        });
        self
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn values(&self) -> &[Literal] {
        &self.values
    }

    pub fn disabled(&self) -> &[DisabledValue] {
        &self.disabled
    }
}

/// Ordered mapping from value type to its boundary literals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDomain {
    entries: Vec<DomainEntry>,
}

impl TypeDomain {
    pub fn new(entries: Vec<DomainEntry>) -> Self {
        let mut domain = Self::default();
        for entry in entries {
            domain.insert(entry);
        }
        domain
    }

    /// Insert or replace the entry for `entry.value_type()`, keeping the
    /// original position on replacement.
    pub fn insert(&mut self, entry: DomainEntry) {
        match self
            .entries
            .iter_mut()
            .find(|existing| existing.value_type == entry.value_type)
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Union of two domains; entries of `other` win on conflict.
    pub fn merged(&self, other: &TypeDomain) -> TypeDomain {
        let mut merged = self.clone();
        for entry in &other.entries {
            merged.insert(entry.clone());
        }
        merged
    }

    pub fn entries(&self) -> &[DomainEntry] {
        &self.entries
    }

    pub fn get(&self, value_type: ValueType) -> Option<&DomainEntry> {
        self.entries
            .iter()
            .find(|entry| entry.value_type == value_type)
    }

    /// First literal of the first declared type that has any literal.
    pub fn first(&self) -> Option<(ValueType, &Literal)> {
        self.entries.iter().find_map(|entry| {
            entry.values.first().map(|value| (entry.value_type, value))
        })
    }

    /// Number of active literals across all types.
    pub fn literal_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.values.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.literal_count() == 0
    }

    pub fn to_test_values(&self) -> TestValues {
        let mut values = TestValues::default();
        for entry in &self.entries {
            values.push(entry.value_type, entry.values.clone());
        }
        values
    }
}

/// The value types a single header slot may carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderDomain {
    pub header: HeaderName,
    pub domain: TypeDomain,
}

impl HeaderDomain {
    pub fn new(header: HeaderName, entries: Vec<DomainEntry>) -> Self {
        Self {
            header,
            domain: TypeDomain::new(entries),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_literals_are_not_counted() {
        let entry = DomainEntry::new(ValueType::Float, ["0x00000000"])
            .disable("0x7f800000", "PROTON-1149");
        let domain = TypeDomain::new(vec![entry]);

        assert_eq!(domain.literal_count(), 1);
        assert_eq!(
            domain.get(ValueType::Float).map(|e| e.disabled().len()),
            Some(1)
        );
    }

    #[test]
    fn merge_keeps_order_and_replaces() {
        let base = TypeDomain::new(vec![
            DomainEntry::new(ValueType::Boolean, ["True"]),
            DomainEntry::new(ValueType::Byte, ["0x0"]),
        ]);
        let extra = TypeDomain::new(vec![
            DomainEntry::new(ValueType::Byte, ["0x7f", "-0x80"]),
            DomainEntry::new(ValueType::Char, ["a"]),
        ]);

        let merged = base.merged(&extra);
        let types: Vec<_> =
            merged.entries().iter().map(DomainEntry::value_type).collect();

        assert_eq!(
            types,
            vec![ValueType::Boolean, ValueType::Byte, ValueType::Char]
        );
        assert_eq!(merged.literal_count(), 4);
    }

    #[test]
    fn first_skips_empty_entries() {
        let domain = TypeDomain::new(vec![
            DomainEntry::new(ValueType::String, Vec::<&str>::new()),
            DomainEntry::new(ValueType::Bytes, ["12345"]),
        ]);

        assert_eq!(
            domain.first(),
            Some((ValueType::Bytes, &Literal::from("12345")))
        );
    }
}
