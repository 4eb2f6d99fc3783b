//! CSV encoding of audit rows

use crate::error::ExportError;
use crate::report::AuditRow;
use csv::Writer;

/// Column titles, in row field order.
pub const AUDIT_HEADERS: [&str; 7] = [
    "Profile",
    "Account ID",
    "Untagged Resources",
    "Stopped EC2 Instances",
    "Unused Volumes",
    "Unused EIPs",
    "Budget Alerts",
];

/// Encode audit rows as CSV, header line first.
pub fn encode_audit_csv(rows: &[AuditRow]) -> Result<Vec<u8>, ExportError> {
    let mut writer = Writer::from_writer(vec![]);

    writer.write_record(AUDIT_HEADERS)?;
    for row in rows {
        writer.write_record(row.fields())?;
    }

    writer
        .into_inner()
        .map_err(|err| ExportError::Encode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_back(bytes: &[u8]) -> Vec<Vec<String>> {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(bytes)
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_header_and_row_count() {
        let rows = vec![AuditRow::new("dev", "111"), AuditRow::new("prod", "222")];
        let bytes = encode_audit_csv(&rows).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(text.lines().count(), rows.len() + 1);
        let header: Vec<&str> = text.lines().next().unwrap().split(',').collect();
        assert_eq!(header, AUDIT_HEADERS);
    }

    #[test]
    fn test_empty_input_has_only_header() {
        let text = String::from_utf8(encode_audit_csv(&[]).unwrap()).unwrap();
        assert_eq!(text, "Profile,Account ID,Untagged Resources,Stopped EC2 Instances,Unused Volumes,Unused EIPs,Budget Alerts\n");
    }

    #[test]
    fn test_fields_with_delimiters_are_quoted() {
        let mut row = AuditRow::new("dev", "111");
        row.untagged_resources = "i-1, i-2".to_string();
        row.budget_alerts = "say \"hi\"".to_string();

        let bytes = encode_audit_csv(&[row]).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.contains("\"i-1, i-2\""));
        assert!(text.contains("\"say \"\"hi\"\"\""));

        let records = read_back(&bytes);
        assert_eq!(records[1][2], "i-1, i-2");
        assert_eq!(records[1][6], "say \"hi\"");
        assert_eq!(records[1][3], "");
    }
}
