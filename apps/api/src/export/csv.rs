//! CSV export of post rows: comma-delimited, every value quoted.

use chrono::SecondsFormat;

use crate::models::plan::PostRow;

/// Returned for an empty export.
pub const EMPTY_EXPORT: &str = "platform,scheduled_at,caption,hashtags\n";

/// A row that can be written as named CSV fields, in column order.
pub trait CsvRecord {
    fn csv_fields(&self) -> Vec<(&'static str, Option<String>)>;
}

impl CsvRecord for PostRow {
    fn csv_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("id", Some(self.id.to_string())),
            ("plan_id", Some(self.plan_id.to_string())),
            ("platform", Some(self.platform.clone())),
            (
                "scheduled_at",
                Some(self.scheduled_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ),
            ("caption", Some(self.caption.clone())),
            ("hashtags", Some(self.hashtags.clone())),
            ("image_prompt", Some(self.image_prompt.clone())),
            ("status", Some(self.status.clone())),
        ]
    }
}

/// Header from the first row's field names, then one quoted line per row.
/// Rows are assumed to share the first row's shape.
pub fn to_csv<R: CsvRecord>(rows: &[R]) -> String {
    let Some(first) = rows.first() else {
        return EMPTY_EXPORT.to_string();
    };

    let header = first
        .csv_fields()
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(",");
    let lines = rows
        .iter()
        .map(|row| {
            row.csv_fields()
                .into_iter()
                .map(|(_, value)| quote(value.as_deref().unwrap_or_default()))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("{header}\n{lines}")
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;

    struct Pair {
        key: &'static str,
        value: Option<&'static str>,
    }

    impl CsvRecord for Pair {
        fn csv_fields(&self) -> Vec<(&'static str, Option<String>)> {
            vec![
                ("key", Some(self.key.to_string())),
                ("value", self.value.map(String::from)),
            ]
        }
    }

    /// Reads a header line plus quoted records, honouring doubled quotes and
    /// newlines inside quotes.
    fn parse_quoted(csv: &str) -> (Vec<String>, Vec<Vec<String>>) {
        let (header, body) = csv.split_once('\n').unwrap();
        let header = header.split(',').map(String::from).collect();

        let mut records = Vec::new();
        let mut record = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;
        let mut chars = body.chars().peekable();
        while let Some(c) = chars.next() {
            match (c, in_quotes) {
                ('"', true) if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                ('"', _) => in_quotes = !in_quotes,
                (',', false) => record.push(std::mem::take(&mut field)),
                ('\n', false) => {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                }
                (c, _) => field.push(c),
            }
        }
        record.push(field);
        records.push(record);
        (header, records)
    }

    #[test]
    fn test_empty_rows_give_fixed_header() {
        assert_eq!(to_csv::<PostRow>(&[]), "platform,scheduled_at,caption,hashtags\n");
    }

    #[test]
    fn test_every_field_quoted_and_null_empty() {
        let rows = [
            Pair {
                key: "a",
                value: Some("1"),
            },
            Pair {
                key: "b",
                value: None,
            },
        ];
        assert_eq!(to_csv(&rows), "key,value\n\"a\",\"1\"\n\"b\",\"\"");
    }

    #[test]
    fn test_quotes_commas_and_newlines_reconstruct() {
        let rows = [
            Pair {
                key: "quote",
                value: Some(r#"She said "fast", twice"#),
            },
            Pair {
                key: "multi",
                value: Some("line one\nline two"),
            },
        ];
        let (header, records) = parse_quoted(&to_csv(&rows));
        assert_eq!(header, vec!["key", "value"]);
        assert_eq!(
            records,
            vec![
                vec!["quote".to_string(), r#"She said "fast", twice"#.to_string()],
                vec!["multi".to_string(), "line one\nline two".to_string()],
            ]
        );
    }

    #[test]
    fn test_post_rows_export_all_columns() {
        let post = PostRow {
            id: Uuid::nil(),
            plan_id: Uuid::nil(),
            platform: "x".to_string(),
            scheduled_at: Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap(),
            caption: "Fibre 100 — fast\nChat to us".to_string(),
            hashtags: "#Vinet #fibre".to_string(),
            image_prompt: "Minimal ad tile".to_string(),
            status: "draft".to_string(),
        };
        let csv = to_csv(&[post]);
        let (header, records) = parse_quoted(&csv);
        assert_eq!(
            header,
            vec![
                "id",
                "plan_id",
                "platform",
                "scheduled_at",
                "caption",
                "hashtags",
                "image_prompt",
                "status"
            ]
        );
        assert_eq!(records[0][3], "2026-10-16T09:00:00Z");
        assert_eq!(records[0][4], "Fibre 100 — fast\nChat to us");
    }
}
