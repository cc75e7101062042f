use serde_json::{Map, Value};

use crate::error::{CalcError, CalcResult, FieldViolation};

pub trait Choice: Copy + PartialEq + 'static {
    const DOMAIN: &'static [(&'static str, Self)];

    fn key(self) -> &'static str {
        Self::DOMAIN
            .iter()
            .find(|(_, variant)| *variant == self)
            .map(|(key, _)| *key)
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberField {
    pub name: &'static str,
    default: Option<f64>,
    min: Option<f64>,
    above: Option<f64>,
    max: Option<f64>,
    integer: bool,
}

impl NumberField {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            default: None,
            min: None,
            above: None,
            max: None,
            integer: false,
        }
    }

    pub const fn optional(name: &'static str, default: f64) -> Self {
        Self::required(name).with_default(default)
    }

    pub const fn with_default(self, default: f64) -> Self {
        Self {
            default: Some(default),
            ..self
        }
    }

    /// Inclusive lower bound.
    pub const fn min(self, min: f64) -> Self {
        Self {
            min: Some(min),
            ..self
        }
    }

    pub const fn above(self, above: f64) -> Self {
        Self {
            above: Some(above),
            ..self
        }
    }

    pub const fn max(self, max: f64) -> Self {
        Self {
            max: Some(max),
            ..self
        }
    }

    pub const fn integer(self) -> Self {
        Self {
            integer: true,
            ..self
        }
    }

    fn check(&self, value: f64) -> Result<f64, String> {
        if self.integer && value.fract() != 0.0 {
            return Err("must be an integer".to_string());
        }
        if let Some(min) = self.min {
            if value < min {
                return Err(format!("must be at least {min}"));
            }
        }
        if let Some(above) = self.above {
            if value <= above {
                return Err(format!("must be greater than {above}"));
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return Err(format!("must be at most {max}"));
            }
        }
        Ok(value)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Params<'a> {
    raw: &'a Map<String, Value>,
}

impl<'a> Params<'a> {
    pub fn new(raw: &'a Map<String, Value>) -> Self {
        Self { raw }
    }

    pub fn form(self) -> Form<'a> {
        Form {
            params: self,
            violations: Vec::new(),
        }
    }

    /// Null and blank values count as omitted.
    fn lookup(&self, name: &str) -> Option<&'a Value> {
        match self.raw.get(name) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(value) => Some(value),
        }
    }
}

/// Nothing read from a form may be used before [`Form::finish`] returns `Ok`.
#[derive(Debug)]
pub struct Form<'a> {
    params: Params<'a>,
    violations: Vec<FieldViolation>,
}

impl Form<'_> {
    pub fn number(&mut self, field: &NumberField) -> f64 {
        let Some(raw) = self.params.lookup(field.name) else {
            return match field.default {
                Some(default) => default,
                None => self.reject(field.name, "is required"),
            };
        };

        let Some(value) = coerce_number(raw) else {
            return self.reject(field.name, "must be a number");
        };

        match field.check(value) {
            Ok(value) => value,
            Err(reason) => self.reject(field.name, reason),
        }
    }

    pub fn count(&mut self, field: &NumberField) -> u32 {
        let value = self.number(&field.integer());
        if value < 0.0 || value > f64::from(u32::MAX) {
            return self.reject(field.name, "is out of range");
        }
        value as u32
    }

    pub fn choice<T: Choice>(&mut self, name: &'static str, default: Option<T>) -> T {
        let fallback = default.unwrap_or(T::DOMAIN[0].1);
        let Some(raw) = self.params.lookup(name) else {
            return match default {
                Some(default) => default,
                None => self.reject_with(name, "is required", fallback),
            };
        };

        let found = raw.as_str().map(str::trim).and_then(|text| {
            T::DOMAIN
                .iter()
                .find(|(key, _)| *key == text)
                .map(|(_, variant)| *variant)
        });

        match found {
            Some(variant) => variant,
            None => {
                let domain = T::DOMAIN
                    .iter()
                    .map(|(key, _)| *key)
                    .collect::<Vec<_>>()
                    .join(", ");
                self.reject_with(name, format!("must be one of: {domain}"), fallback)
            }
        }
    }

    /// A JSON array of numbers, or a comma-separated query-string value.
    pub fn number_list(&mut self, name: &'static str) -> Vec<f64> {
        let Some(raw) = self.params.lookup(name) else {
            return self.reject_with(name, "is required", Vec::new());
        };

        let parsed = match raw {
            Value::Array(items) => items.iter().map(coerce_number).collect::<Option<Vec<_>>>(),
            Value::String(text) => text
                .split(',')
                .map(|item| item.trim().parse::<f64>().ok().filter(|v| v.is_finite()))
                .collect::<Option<Vec<_>>>(),
            _ => None,
        };

        match parsed {
            Some(values) if values.is_empty() => {
                self.reject_with(name, "must contain at least one value", Vec::new())
            }
            Some(values) => values,
            None => self.reject_with(name, "must be a list of numbers", Vec::new()),
        }
    }

    pub fn flag(&mut self, name: &'static str, default: bool) -> bool {
        let Some(raw) = self.params.lookup(name) else {
            return default;
        };

        let parsed = match raw {
            Value::Bool(flag) => Some(*flag),
            Value::Number(n) => match n.as_f64() {
                Some(v) if v == 0.0 => Some(false),
                Some(v) if v == 1.0 => Some(true),
                _ => None,
            },
            Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Some(true),
                "false" | "0" | "no" => Some(false),
                _ => None,
            },
            _ => None,
        };

        parsed.unwrap_or_else(|| self.reject_with(name, "must be true or false", default))
    }

    /// Records a cross-field rule that no single field declaration covers.
    pub fn add_violation(&mut self, name: &str, reason: impl Into<String>) {
        self.violations.push(FieldViolation::new(name, reason));
    }

    pub fn finish(self) -> CalcResult<()> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(CalcError::Validation(self.violations))
        }
    }

    fn reject<T: Default>(&mut self, name: &str, reason: impl Into<String>) -> T {
        self.reject_with(name, reason, T::default())
    }

    fn reject_with<T>(&mut self, name: &str, reason: impl Into<String>, placeholder: T) -> T {
        self.violations.push(FieldViolation::new(name, reason));
        placeholder
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Frequency;
    use serde_json::json;

    const PRINCIPAL: NumberField = NumberField::required("principal").min(1000.0);
    const EXTRA: NumberField = NumberField::optional("extra_payment", 0.0).min(0.0);
    const YEARS: NumberField = NumberField::required("years").integer().min(1.0);

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn reasons(err: CalcError) -> Vec<String> {
        err.violations().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn numbers_coerce_from_strings_and_apply_defaults() {
        let raw = map(json!({ "principal": "2500.5" }));
        let mut form = Params::new(&raw).form();
        let principal = form.number(&PRINCIPAL);
        let extra = form.number(&EXTRA);
        form.finish().expect("valid form");

        assert_eq!(principal, 2500.5);
        assert_eq!(extra, 0.0);
    }

    #[test]
    fn blank_and_null_values_fall_back_to_defaults() {
        let raw = map(json!({ "extra_payment": "  ", "other": null }));
        let mut form = Params::new(&raw).form();
        assert_eq!(form.number(&EXTRA), 0.0);
        form.finish().expect("blank optional field is accepted");
    }

    #[test]
    fn form_reports_every_failing_field() {
        let raw = map(json!({ "principal": 10, "extra_payment": "abc", "years": 2.5 }));
        let mut form = Params::new(&raw).form();
        form.number(&PRINCIPAL);
        form.number(&EXTRA);
        form.count(&YEARS);
        let err = form.finish().expect_err("three violations");

        assert_eq!(
            reasons(err),
            vec![
                "principal must be at least 1000",
                "extra_payment must be a number",
                "years must be an integer",
            ]
        );
    }

    #[test]
    fn missing_required_field_is_reported() {
        let raw = Map::new();
        let mut form = Params::new(&raw).form();
        form.number(&PRINCIPAL);
        let err = form.finish().expect_err("missing field");
        assert_eq!(reasons(err), vec!["principal is required"]);
    }

    #[test]
    fn exclusive_and_upper_bounds_are_enforced() {
        let rate = NumberField::required("rate").above(0.0).max(100.0);
        let raw = map(json!({ "rate": 0 }));
        let mut form = Params::new(&raw).form();
        form.number(&rate);
        assert_eq!(
            reasons(form.finish().expect_err("zero rejected")),
            vec!["rate must be greater than 0"]
        );

        let raw = map(json!({ "rate": 100.5 }));
        let mut form = Params::new(&raw).form();
        form.number(&rate);
        assert_eq!(
            reasons(form.finish().expect_err("too large")),
            vec!["rate must be at most 100"]
        );
    }

    #[test]
    fn non_finite_strings_are_not_numbers() {
        let raw = map(json!({ "principal": "inf" }));
        let mut form = Params::new(&raw).form();
        form.number(&PRINCIPAL);
        assert_eq!(
            reasons(form.finish().expect_err("inf rejected")),
            vec!["principal must be a number"]
        );
    }

    #[test]
    fn choices_use_default_and_reject_unknown_values() {
        let raw = Map::new();
        let mut form = Params::new(&raw).form();
        assert_eq!(
            form.choice("compounding_frequency", Some(Frequency::Quarterly)),
            Frequency::Quarterly
        );
        form.finish().expect("default used");

        let raw = map(json!({ "payout_frequency": "weekly" }));
        let mut form = Params::new(&raw).form();
        form.choice::<Frequency>("payout_frequency", Some(Frequency::Monthly));
        assert_eq!(
            reasons(form.finish().expect_err("unknown frequency")),
            vec!["payout_frequency must be one of: monthly, quarterly, annually"]
        );
    }

    #[test]
    fn choice_key_round_trips_domain_spelling() {
        assert_eq!(Frequency::Quarterly.key(), "quarterly");
    }

    #[test]
    fn number_lists_accept_arrays_and_comma_strings() {
        let raw = map(json!({ "contributions": [1000, "2000", 3000.5] }));
        let mut form = Params::new(&raw).form();
        assert_eq!(form.number_list("contributions"), vec![1000.0, 2000.0, 3000.5]);
        form.finish().expect("array accepted");

        let raw = map(json!({ "contributions": "500, 600" }));
        let mut form = Params::new(&raw).form();
        assert_eq!(form.number_list("contributions"), vec![500.0, 600.0]);
        form.finish().expect("comma list accepted");
    }

    #[test]
    fn malformed_number_lists_are_rejected() {
        for bad in [json!({ "contributions": 12 }), json!({ "contributions": [1, "x"] })] {
            let raw = map(bad);
            let mut form = Params::new(&raw).form();
            form.number_list("contributions");
            assert_eq!(
                reasons(form.finish().expect_err("not a list")),
                vec!["contributions must be a list of numbers"]
            );
        }
    }

    #[test]
    fn flags_parse_common_spellings() {
        let raw = map(json!({ "a": "yes", "b": 0, "c": true, "d": "maybe" }));
        let mut form = Params::new(&raw).form();
        assert!(form.flag("a", false));
        assert!(!form.flag("b", true));
        assert!(form.flag("c", false));
        assert!(!form.flag("missing", false));
        form.flag("d", false);
        assert_eq!(
            reasons(form.finish().expect_err("bad flag")),
            vec!["d must be true or false"]
        );
    }
}
