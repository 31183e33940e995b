use std::{collections::HashSet, sync::Arc};

use kvmeter_common::error::{KvmeterError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Gauge,
}

impl MetricType {
    pub fn as_prometheus_type(&self) -> &'static str {
        match self {
            Self::Counter => "counter",
            Self::Gauge => "gauge",
        }
    }
}

/// Immutable name, help text and constant labels of one exported metric.
///
/// Labels are kept sorted by key, so two descriptors built from the same label
/// set in different orders compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricDescriptor {
    name: String,
    help: String,
    const_labels: Vec<(String, String)>,
}

impl MetricDescriptor {
    pub fn new(name: &str, help: &str, const_labels: &[(&str, &str)]) -> Result<Self> {
        if !is_valid_metric_name(name) {
            return Err(KvmeterError::InvalidName(name.to_string()));
        }

        let mut seen = HashSet::with_capacity(const_labels.len());
        for (label, _) in const_labels {
            if !is_valid_label_name(label) {
                return Err(KvmeterError::InvalidLabelName((*label).to_string()));
            }
            if !seen.insert(*label) {
                return Err(KvmeterError::DuplicateLabel((*label).to_string()));
            }
        }

        let mut labels = const_labels
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect::<Vec<_>>();
        labels.sort();

        Ok(Self {
            name: name.to_string(),
            help: help.to_string(),
            const_labels: labels,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn const_labels(&self) -> &[(String, String)] {
        &self.const_labels
    }

    /// Registry identity: name plus label set, help text excluded.
    pub(crate) fn identity(&self) -> DescriptorId {
        DescriptorId {
            name: self.name.clone(),
            labels: self.const_labels.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct DescriptorId {
    name: String,
    labels: Vec<(String, String)>,
}

impl std::fmt::Display for DescriptorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)?;
        if !self.labels.is_empty() {
            f.write_str("{")?;
            for (index, (key, value)) in self.labels.iter().enumerate() {
                if index > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{key}={value:?}")?;
            }
            f.write_str("}")?;
        }
        Ok(())
    }
}

/// One collected point, produced fresh on every scrape.
#[derive(Debug, Clone)]
pub struct Sample {
    pub descriptor: Arc<MetricDescriptor>,
    pub value: f64,
    pub kind: MetricType,
}

fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == ':' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == ':')
}

fn is_valid_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
