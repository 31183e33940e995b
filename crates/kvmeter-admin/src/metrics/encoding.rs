use std::collections::HashMap;

use crate::metrics::types::Sample;

pub const TEXT_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Renders samples in the Prometheus text exposition format.
///
/// Families appear in the order their first sample does, and every sample of a
/// family is written under that family's single HELP/TYPE header.
pub fn encode_text(samples: &[Sample]) -> String {
    let mut family_index: HashMap<&str, usize> = HashMap::new();
    let mut families: Vec<Vec<&Sample>> = Vec::new();
    for sample in samples {
        let index = *family_index
            .entry(sample.descriptor.name())
            .or_insert_with(|| {
                families.push(Vec::new());
                families.len() - 1
            });
        families[index].push(sample);
    }

    let mut output = String::new();
    for family in families {
        let head = family[0];
        let name = head.descriptor.name();

        output.push_str("# HELP ");
        output.push_str(name);
        output.push(' ');
        output.push_str(&escape_help(head.descriptor.help()));
        output.push('\n');

        output.push_str("# TYPE ");
        output.push_str(name);
        output.push(' ');
        output.push_str(head.kind.as_prometheus_type());
        output.push('\n');

        for sample in family {
            output.push_str(&render_sample_line(
                name,
                sample.descriptor.const_labels(),
                sample.value,
            ));
        }
    }

    output
}

fn render_sample_line(name: &str, labels: &[(String, String)], value: f64) -> String {
    let mut rendered = String::new();
    rendered.push_str(name);

    if !labels.is_empty() {
        rendered.push('{');
        for (index, (key, label_value)) in labels.iter().enumerate() {
            if index > 0 {
                rendered.push(',');
            }
            rendered.push_str(key);
            rendered.push_str("=\"");
            rendered.push_str(&escape_label_value(label_value));
            rendered.push('"');
        }
        rendered.push('}');
    }

    rendered.push(' ');
    rendered.push_str(&format_metric_value(value));
    rendered.push('\n');
    rendered
}

fn format_metric_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let sign = if value.is_sign_positive() { "+" } else { "-" };
        format!("{sign}Inf")
    } else if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

fn escape_help(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\n', "\\n")
}

fn escape_label_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('"', "\\\"")
}
