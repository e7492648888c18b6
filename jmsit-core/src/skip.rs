use jmsit_model::MessageKind;

/// Declared exclusion of a message kind on a given broker product.
///
/// Rules gate execution only; the generated case is left untouched so the
/// report still lists it as skipped with the documented reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipRule {
    pub kind: MessageKind,
    pub broker: String,
    pub reason: String,
}

impl SkipRule {
    pub fn new(
        kind: MessageKind,
        broker: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            broker: broker.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipRules(Vec<SkipRule>);

impl SkipRules {
    pub fn new(rules: Vec<SkipRule>) -> Self {
        Self(rules)
    }

    pub fn extend(&mut self, rules: impl IntoIterator<Item = SkipRule>) {
        self.0.extend(rules);
    }

    /// Reason to skip `kind` on `broker`, if any rule matches.
    pub fn reason_for(&self, kind: MessageKind, broker: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|rule| rule.kind == kind && rule.broker == broker)
            .map(|rule| rule.reason.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkipRule> {
        self.0.iter()
    }
}
