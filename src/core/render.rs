//! Turns upstream response text into display output.
//!
//! Nothing here touches the network, so every function can be tested on
//! plain strings.

use crate::domain::model::{DisplayRecord, OutputFormat, RenderedOutput};

pub fn render(format: OutputFormat, body: &str) -> RenderedOutput {
    match format {
        OutputFormat::Json => RenderedOutput::Json(body.to_string()),
        OutputFormat::Csv => RenderedOutput::Csv(render_csv(body)),
    }
}

/// One record per physical line, in body order.
///
/// A final `\n` terminates the last line rather than starting an empty one,
/// and `\r\n` endings are accepted.
pub fn render_csv(body: &str) -> Vec<DisplayRecord> {
    if body.is_empty() {
        return Vec::new();
    }

    let body = body.strip_suffix('\n').unwrap_or(body);

    body.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .map(parse_line)
        .collect()
}

/// Text shown for a line: a single quoted field loses its quotes, anything
/// else is kept as sent.
fn display_text(line: &str, fields: &[String]) -> String {
    match fields {
        [only] if line.starts_with('"') => only.clone(),
        _ => line.to_string(),
    }
}

fn parse_line(line: &str) -> DisplayRecord {
    if line.is_empty() {
        return DisplayRecord::default();
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    let mut record = csv::StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => {
            let fields: Vec<String> = record.iter().map(str::to_string).collect();
            DisplayRecord::new(display_text(line, &fields), fields)
        }
        Ok(false) => DisplayRecord::new(line, Vec::new()),
        Err(e) => {
            tracing::debug!("Keeping unparsable CSV line as-is: {}", e);
            DisplayRecord::new(line, vec![line.to_string()])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(records: &[DisplayRecord]) -> Vec<String> {
        records.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_json_is_passed_through_unchanged() {
        let body = "[{\"open_time\": \"Sun 1/1 00:00\"}]\n";
        assert_eq!(
            render(OutputFormat::Json, body),
            RenderedOutput::Json(body.to_string())
        );
    }

    #[test]
    fn test_two_line_csv() {
        let records = render_csv("a,b\nc,d");
        assert_eq!(lines(&records), vec!["a,b", "c,d"]);
    }

    #[test]
    fn test_trailing_newline_does_not_add_record() {
        let body = "open_time, close_time\n2017-01-01T00:00, 2017-01-01T01:00\n";
        let records = render_csv(body);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fields, vec!["open_time", " close_time"]);
        assert_eq!(records[1].to_string(), "2017-01-01T00:00, 2017-01-01T01:00");
    }

    #[test]
    fn test_record_count_matches_line_count() {
        let body = "open_time\nx\ny\nz";
        assert_eq!(render_csv(body).len(), body.split('\n').count());
    }

    #[test]
    fn test_crlf_line_endings() {
        let records = render_csv("a,b\r\nc,d\r\n");
        assert_eq!(lines(&records), vec!["a,b", "c,d"]);
    }

    #[test]
    fn test_quoted_fields_are_parsed_but_line_is_shown_as_sent() {
        let records = render_csv("\"Mon 1/2, 10:00\",x\na,\"b,c\"\na,b,c");

        assert_eq!(records[0].fields, vec!["Mon 1/2, 10:00", "x"]);
        assert_eq!(records[0].to_string(), "\"Mon 1/2, 10:00\",x");
        assert_eq!(records[1].fields, vec!["a", "b,c"]);
        assert_eq!(records[1].to_string(), "a,\"b,c\"");
        assert_eq!(records[2].to_string(), "a,b,c");
    }

    #[test]
    fn test_single_quoted_line_is_unquoted() {
        let records = render_csv("\"open_time, close_time\"\n");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].to_string(), "open_time, close_time");
    }

    #[test]
    fn test_blank_interior_line_keeps_its_place() {
        let records = render_csv("a\n\nb");
        assert_eq!(records.len(), 3);
        assert!(records[1].fields.is_empty());
        assert_eq!(records[2].to_string(), "b");
    }

    #[test]
    fn test_empty_body_has_no_records() {
        assert!(render_csv("").is_empty());
        assert_eq!(
            render(OutputFormat::Csv, ""),
            RenderedOutput::Csv(Vec::new())
        );
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let body = "open_time\n2017-01-01T00:00\n";
        assert_eq!(
            render(OutputFormat::Csv, body),
            render(OutputFormat::Csv, body)
        );
    }
}
