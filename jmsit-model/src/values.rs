use crate::value_type::{Literal, ValueType};

/// Body payload for one message kind, grouped by value type.
///
/// Serializes as a JSON object `{type: [literal, ...]}` in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestValues {
    groups: Vec<(ValueType, Vec<Literal>)>,
}

impl TestValues {
    /// Flat sequence for scalar-bodied kinds such as text messages.
    pub fn flat(value_type: ValueType, values: Vec<Literal>) -> Self {
        Self {
            groups: vec![(value_type, values)],
        }
    }

    pub fn push(&mut self, value_type: ValueType, values: Vec<Literal>) {
        match self.groups.iter_mut().find(|(ty, _)| *ty == value_type) {
            Some((_, existing)) => existing.extend(values),
            None => self.groups.push((value_type, values)),
        }
    }

    pub fn groups(&self) -> &[(ValueType, Vec<Literal>)] {
        &self.groups
    }

    pub fn get(&self, value_type: ValueType) -> Option<&[Literal]> {
        self.groups
            .iter()
            .find(|(ty, _)| *ty == value_type)
            .map(|(_, values)| values.as_slice())
    }

    /// Total number of messages a sender will emit.
    pub fn message_count(&self) -> usize {
        self.groups.iter().map(|(_, values)| values.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Expected number of messages per value type, as sent to receivers.
    pub fn counts(&self) -> ValueCounts {
        ValueCounts(
            self.groups
                .iter()
                .map(|(ty, values)| (*ty, values.len()))
                .collect(),
        )
    }
}

/// Per-type message counts a receiver should wait for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueCounts(Vec<(ValueType, usize)>);

impl ValueCounts {
    pub fn iter(&self) -> impl Iterator<Item = (ValueType, usize)> + '_ {
        self.0.iter().copied()
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::{TestValues, ValueCounts};
    use serde::ser::{Serialize, SerializeMap, Serializer};

    impl Serialize for TestValues {
        fn serialize<S: Serializer>(
            &self,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.groups.len()))?;
            for (ty, values) in &self.groups {
                map.serialize_entry(ty.as_str(), values)?;
            }
            map.end()
        }
    }

    impl Serialize for ValueCounts {
        fn serialize<S: Serializer>(
            &self,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.0.len()))?;
            for (ty, count) in &self.0 {
                map.serialize_entry(ty.as_str(), count)?;
            }
            map.end()
        }
    }
}
