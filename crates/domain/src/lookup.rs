use super::RecordType;
use serde::Serialize;
use std::fmt;
use std::net::IpAddr;

/// Which record types a lookup batch asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupSelection {
    pub a: bool,
    pub aaaa: bool,
    pub mx: bool,
    pub cname: bool,
}

impl LookupSelection {
    pub fn record_types(&self) -> Vec<RecordType> {
        let mut types = Vec::with_capacity(4);
        if self.a {
            types.push(RecordType::A);
        }
        if self.aaaa {
            types.push(RecordType::AAAA);
        }
        if self.mx {
            types.push(RecordType::MX);
        }
        if self.cname {
            types.push(RecordType::CNAME);
        }
        types
    }

    pub fn is_empty(&self) -> bool {
        !(self.a || self.aaaa || self.mx || self.cname)
    }
}

impl Default for LookupSelection {
    fn default() -> Self {
        Self {
            a: true,
            aaaa: false,
            mx: false,
            cname: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MxRecord {
    pub host: String,
    pub preference: u16,
}

/// Result of looking up one host. Errors are collected per record type and
/// never abort the rest of the batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LookupReport {
    pub host: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ips: Vec<IpAddr>,
    #[serde(rename = "mx_records", skip_serializing_if = "Vec::is_empty")]
    pub mx_records: Vec<MxRecord>,
    #[serde(rename = "cname_record", skip_serializing_if = "Option::is_none")]
    pub cname: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl LookupReport {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl fmt::Display for LookupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "values for {}:", self.host)?;

        if !self.ips.is_empty() {
            write!(f, "\tip(s):")?;
            for ip in &self.ips {
                write!(f, " {}", ip)?;
            }
            writeln!(f)?;
        }

        for mx in &self.mx_records {
            writeln!(f, "\tMXrecords: host->{}, pref->{}", mx.host, mx.preference)?;
        }

        if let Some(cname) = &self.cname {
            writeln!(f, "\tCNAME: {}", cname)?;
        }

        if !self.errors.is_empty() {
            writeln!(f, "some errors occurred during process:")?;
            for err in &self.errors {
                writeln!(f, "\tErr: {}", err)?;
            }
        }

        Ok(())
    }
}
