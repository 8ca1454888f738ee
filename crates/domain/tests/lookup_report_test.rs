use reflector_dns_domain::{LookupReport, LookupSelection, MxRecord, RecordType};

#[test]
fn test_default_selection_is_a_only() {
    let selection = LookupSelection::default();
    assert_eq!(selection.record_types(), vec![RecordType::A]);
    assert!(!selection.is_empty());
}

#[test]
fn test_selection_order() {
    let selection = LookupSelection {
        a: true,
        aaaa: true,
        mx: true,
        cname: true,
    };
    assert_eq!(
        selection.record_types(),
        vec![RecordType::A, RecordType::AAAA, RecordType::MX, RecordType::CNAME]
    );
}

#[test]
fn test_report_text_rendering() {
    let mut report = LookupReport::new("example.com");
    report.ips.push("93.184.216.34".parse().unwrap());
    report.mx_records.push(MxRecord {
        host: "mail.example.com.".to_string(),
        preference: 10,
    });
    report.cname = Some("alias.example.com.".to_string());

    let text = report.to_string();
    assert!(text.starts_with("values for example.com:\n"));
    assert!(text.contains("\tip(s): 93.184.216.34\n"));
    assert!(text.contains("\tMXrecords: host->mail.example.com., pref->10\n"));
    assert!(text.contains("\tCNAME: alias.example.com.\n"));
    assert!(!text.contains("errors"));
}

#[test]
fn test_report_lists_errors() {
    let mut report = LookupReport::new("broken.example");
    report.errors.push("get A record: request timed out".to_string());

    assert!(report.has_errors());
    let text = report.to_string();
    assert!(text.contains("some errors occurred during process:"));
    assert!(text.contains("\tErr: get A record: request timed out"));
}

#[test]
fn test_report_json_skips_empty_fields() {
    let mut report = LookupReport::new("example.com");
    report.ips.push("10.0.0.1".parse().unwrap());
    report.cname = Some("alias.example.com.".to_string());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["host"], "example.com");
    assert_eq!(json["ips"][0], "10.0.0.1");
    assert_eq!(json["cname_record"], "alias.example.com.");
    assert!(json.get("mx_records").is_none());
    assert!(json.get("errors").is_none());
}
