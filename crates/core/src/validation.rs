//! Connection-parameter validation
//!
//! Each field is checked on its own and produces a [`ValidationResult`];
//! results never influence each other. The same rules run on every edit
//! (live feedback) and at connect time, where all three must pass.
//!
//! Host rules are permissive: `localhost`, dotted-quad IPv4 and domain
//! names are recognised, but any other non-empty text is accepted too.
//! Only an empty host is rejected.

use serde::{Deserialize, Serialize};

use crate::types::{ConnectForm, ConnectionParams, Field, Secret};

pub const HOST_EMPTY: &str = "Host cannot be empty";
pub const PORT_EMPTY: &str = "Port cannot be empty";
pub const PORT_NOT_A_NUMBER: &str = "Port must be a valid number";
pub const PORT_OUT_OF_RANGE: &str = "Port must be between 1 and 65535";
pub const SECRET_EMPTY: &str = "Password cannot be empty";

/// Outcome of validating one field
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    /// One message per violated rule, in rule order
    pub messages: Vec<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            messages: Vec::new(),
        }
    }

    pub fn fail(message: &str) -> Self {
        Self {
            valid: false,
            messages: vec![message.to_string()],
        }
    }
}

/// Per-field results for a whole form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub host: ValidationResult,
    pub port: ValidationResult,
    pub secret: ValidationResult,
}

impl ValidationReport {
    pub fn get(&self, field: Field) -> &ValidationResult {
        match field {
            Field::Host => &self.host,
            Field::Port => &self.port,
            Field::Secret => &self.secret,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.host.valid && self.port.valid && self.secret.valid
    }

    /// Every violated rule across all fields, in host, port, secret order
    pub fn messages(&self) -> Vec<String> {
        Field::ALL
            .iter()
            .flat_map(|field| self.get(*field).messages.iter().cloned())
            .collect()
    }

    pub fn failing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| !self.get(*field).valid)
            .collect()
    }
}

/// Recognised shape of a host string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    Localhost,
    Ipv4,
    DomainName,
    /// Non-empty text matching no known syntax (still accepted)
    Other,
}

/// Classify a trimmed, non-empty host
pub fn classify_host(host: &str) -> HostKind {
    if host.eq_ignore_ascii_case("localhost") {
        HostKind::Localhost
    } else if is_ipv4(host) {
        HostKind::Ipv4
    } else if is_domain_name(host) {
        HostKind::DomainName
    } else {
        HostKind::Other
    }
}

/// Dotted quad, each octet 0-255 written with 1-3 digits
fn is_ipv4(host: &str) -> bool {
    let octets: Vec<&str> = host.split('.').collect();
    octets.len() == 4
        && octets.iter().all(|octet| {
            (1..=3).contains(&octet.len())
                && octet.bytes().all(|b| b.is_ascii_digit())
                && octet.parse::<u16>().map(|v| v <= 255).unwrap_or(false)
        })
}

fn is_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) => {
            first.is_ascii_alphanumeric()
                && last.is_ascii_alphanumeric()
                && bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'-')
        }
        _ => false,
    }
}

fn is_alpha_suffix(label: &str) -> bool {
    label.len() >= 2 && label.bytes().all(|b| b.is_ascii_alphabetic())
}

/// Dot-separated labels ending in an alphabetic TLD or a two-part suffix
fn is_domain_name(host: &str) -> bool {
    let labels: Vec<&str> = host.split('.').collect();
    let Some((last, rest)) = labels.split_last() else {
        return false;
    };
    if rest.is_empty() || !is_alpha_suffix(last) {
        return false;
    }
    if rest.iter().all(|label| is_label(label)) {
        return true;
    }
    // Multi-part suffix such as `co.uk`, whose first part may carry hyphens
    // at either end.
    let Some((suffix_head, prefix)) = rest.split_last() else {
        return false;
    };
    !prefix.is_empty()
        && suffix_head.len() >= 2
        && suffix_head.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        && prefix.iter().all(|label| is_label(label))
}

pub fn validate_host(host: &str) -> ValidationResult {
    let host = host.trim();
    if host.is_empty() {
        return ValidationResult::fail(HOST_EMPTY);
    }
    tracing::trace!("host classified as {:?}", classify_host(host));
    ValidationResult::ok()
}

/// Parse a port the way the validation rules read it
fn parse_port(port: &str) -> Result<u16, &'static str> {
    let port = port.trim();
    if port.is_empty() {
        return Err(PORT_EMPTY);
    }
    let value: i32 = port.parse().map_err(|_| PORT_NOT_A_NUMBER)?;
    if !(1..=65535).contains(&value) {
        return Err(PORT_OUT_OF_RANGE);
    }
    u16::try_from(value).map_err(|_| PORT_OUT_OF_RANGE)
}

pub fn validate_port(port: &str) -> ValidationResult {
    match parse_port(port) {
        Ok(_) => ValidationResult::ok(),
        Err(message) => ValidationResult::fail(message),
    }
}

/// Secret must be non-empty after trimming, while typing and at connect time
pub fn validate_secret(secret: &str) -> ValidationResult {
    if secret.trim().is_empty() {
        ValidationResult::fail(SECRET_EMPTY)
    } else {
        ValidationResult::ok()
    }
}

pub fn validate_field(field: Field, value: &str) -> ValidationResult {
    match field {
        Field::Host => validate_host(value),
        Field::Port => validate_port(value),
        Field::Secret => validate_secret(value),
    }
}

/// Validate all three fields independently, never stopping at the first failure
pub fn validate_form(form: &ConnectForm) -> ValidationReport {
    ValidationReport {
        host: validate_host(&form.host),
        port: validate_port(&form.port),
        secret: validate_secret(&form.secret),
    }
}

/// Build connect parameters from a form, or return the full report on failure
///
/// The host is trimmed; the secret is passed through byte for byte.
pub fn params_from_form(form: &ConnectForm) -> Result<ConnectionParams, ValidationReport> {
    let report = validate_form(form);
    if !report.is_valid() {
        return Err(report);
    }
    let port = parse_port(&form.port).map_err(|_| report.clone())?;
    Ok(ConnectionParams {
        host: form.host.trim().to_string(),
        port,
        secret: Secret::new(form.secret.as_bytes().to_vec()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_empty_rejected() {
        assert_eq!(validate_host(""), ValidationResult::fail(HOST_EMPTY));
        assert_eq!(validate_host("   "), ValidationResult::fail(HOST_EMPTY));
    }

    #[test]
    fn test_host_any_non_empty_accepted() {
        for host in ["localhost", "LocalHost", "127.0.0.1", "mc.example.com", "my_server!", "300.1.1.1"] {
            assert!(validate_host(host).valid, "{host} should be accepted");
        }
    }

    #[test]
    fn test_classify_host() {
        assert_eq!(classify_host("LOCALHOST"), HostKind::Localhost);
        assert_eq!(classify_host("192.168.0.10"), HostKind::Ipv4);
        assert_eq!(classify_host("010.0.0.1"), HostKind::Ipv4);
        assert_eq!(classify_host("256.0.0.1"), HostKind::Other);
        assert_eq!(classify_host("play.example.org"), HostKind::DomainName);
        assert_eq!(classify_host("shop.example.co.uk"), HostKind::DomainName);
        assert_eq!(classify_host("a.-b-.uk"), HostKind::DomainName);
        assert_eq!(classify_host("example"), HostKind::Other);
        assert_eq!(classify_host("bad-.com"), HostKind::Other);
        assert_eq!(classify_host("host.c0m"), HostKind::Other);
    }

    #[test]
    fn test_port_rules() {
        assert_eq!(validate_port(""), ValidationResult::fail(PORT_EMPTY));
        assert_eq!(validate_port(" "), ValidationResult::fail(PORT_EMPTY));
        assert_eq!(validate_port("abc"), ValidationResult::fail(PORT_NOT_A_NUMBER));
        assert_eq!(validate_port("99999999999"), ValidationResult::fail(PORT_NOT_A_NUMBER));
        assert_eq!(validate_port("0"), ValidationResult::fail(PORT_OUT_OF_RANGE));
        assert_eq!(validate_port("-1"), ValidationResult::fail(PORT_OUT_OF_RANGE));
        assert_eq!(validate_port("70000"), ValidationResult::fail(PORT_OUT_OF_RANGE));
        assert!(validate_port("1").valid);
        assert!(validate_port(" 25575 ").valid);
        assert!(validate_port("65535").valid);
    }

    #[test]
    fn test_secret_single_rule() {
        assert_eq!(validate_secret(""), ValidationResult::fail(SECRET_EMPTY));
        assert_eq!(validate_secret("   "), ValidationResult::fail(SECRET_EMPTY));
        // Short secrets pass both while typing and at connect time.
        assert!(validate_secret("ab").valid);
        assert!(validate_field(Field::Secret, "ab").valid);
        let form = ConnectForm::new("localhost", "25575", "ab");
        assert!(validate_form(&form).is_valid());
    }

    #[test]
    fn test_form_reports_only_invalid_fields() {
        let form = ConnectForm::new("localhost", "70000", "abc");
        let report = validate_form(&form);
        assert!(!report.is_valid());
        assert_eq!(report.failing_fields(), vec![Field::Port]);
        assert_eq!(report.messages(), vec![PORT_OUT_OF_RANGE.to_string()]);
        assert!(report.host.valid);
        assert!(report.secret.valid);
    }

    #[test]
    fn test_form_reports_every_failure() {
        let form = ConnectForm::new(" ", "x", "");
        let report = validate_form(&form);
        assert_eq!(report.failing_fields(), Field::ALL.to_vec());
        assert_eq!(
            report.messages(),
            vec![
                HOST_EMPTY.to_string(),
                PORT_NOT_A_NUMBER.to_string(),
                SECRET_EMPTY.to_string()
            ]
        );
    }

    #[test]
    fn test_params_from_valid_form() {
        let form = ConnectForm::new(" localhost ", "25575", "abc");
        let params = params_from_form(&form).unwrap();
        assert_eq!(params.host, "localhost");
        assert_eq!(params.port, 25575);
        assert_eq!(params.secret.as_bytes(), b"abc");
    }

    #[test]
    fn test_params_from_invalid_form() {
        let form = ConnectForm::new("", "25575", "abc");
        let report = params_from_form(&form).unwrap_err();
        assert_eq!(report.failing_fields(), vec![Field::Host]);
    }
}
