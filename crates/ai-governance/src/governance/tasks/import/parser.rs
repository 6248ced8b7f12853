use super::normalizer::{is_completed_status, normalize_name};
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug)]
pub(crate) struct TrackerRecord {
    pub(crate) name: String,
    pub(crate) normalized_name: String,
    pub(crate) completed: bool,
    pub(crate) evidence: Option<String>,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<TrackerRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<TrackerRow>() {
        let row = record?;
        records.push(TrackerRecord {
            normalized_name: normalize_name(&row.task),
            completed: row.status.as_deref().is_some_and(is_completed_status),
            evidence: row.evidence,
            name: row.task,
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct TrackerRow {
    #[serde(rename = "Task")]
    task: String,
    #[serde(rename = "Status", default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    #[serde(rename = "Evidence", default, deserialize_with = "empty_string_as_none")]
    evidence: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn rows_detect_completion_and_evidence() {
        let records = parse_records(Cursor::new(
            "Task,Status,Evidence\n\
             Name an accountable owner,Done,https://wiki.example.com/owner\n\
             Run fairness testing,In progress,\n",
        ))
        .expect("parse");

        assert_eq!(records.len(), 2);
        assert!(records[0].completed);
        assert_eq!(
            records[0].evidence.as_deref(),
            Some("https://wiki.example.com/owner")
        );
        assert!(!records[1].completed);
        assert!(records[1].evidence.is_none());
    }

    #[test]
    fn evidence_column_is_optional() {
        let records = parse_records(Cursor::new("Task,Status\nRun fairness testing,Completed\n"))
            .expect("parse");
        assert!(records[0].completed);
        assert!(records[0].evidence.is_none());
    }
}
