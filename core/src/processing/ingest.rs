use crate::model::{MetricRegistry, Observation, ObservationSeries, TimestampSource};
use crate::prelude::IngestOptions;
use crate::telemetry::log::LogManager;

/// What a CSV column feeds into.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ColumnBinding {
    Timestamp,
    Metric(String),
}

/// Best-effort CSV reader: malformed rows and fields are dropped, never
/// reported as errors. An empty series means nothing usable was found.
pub struct CsvIngestor {
    options: IngestOptions,
    logger: LogManager,
}

impl CsvIngestor {
    pub fn new(options: IngestOptions) -> Self {
        Self {
            options,
            logger: LogManager::new("ingest"),
        }
    }

    pub fn ingest(&self, raw: &str, registry: &MetricRegistry) -> ObservationSeries {
        let delimiter = if self.options.delimiter.is_ascii() {
            self.options.delimiter as u8
        } else {
            b','
        };
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .quoting(false)
            .delimiter(delimiter)
            .from_reader(raw.as_bytes());
        let mut records = reader.records().filter_map(Result::ok);

        // Leading blank or whitespace-only lines are not the header.
        let header = match records.find(|r| r.iter().any(|field| !field.is_empty())) {
            Some(header) => header,
            None => {
                self.logger.record("no header row; nothing ingested");
                return ObservationSeries::new(Vec::new(), TimestampSource::RowIndex);
            }
        };
        let header_line = header.position().map(|p| p.line()).unwrap_or(1);

        let bindings: Vec<Option<ColumnBinding>> = header
            .iter()
            .map(|cell| self.bind_column(cell, registry))
            .collect();
        let ignored = bindings.iter().filter(|b| b.is_none()).count();
        if ignored > 0 {
            self.logger
                .trace_detail(&format!("{} header column(s) matched no metric", ignored));
        }

        let has_time_column = bindings.contains(&Some(ColumnBinding::Timestamp));
        // Single-column files carry one field per row.
        let min_fields = header.len().min(2);

        let mut observations = Vec::new();
        let mut dropped = 0usize;
        for (offset, record) in records.enumerate() {
            let row_index = record
                .position()
                .map(|p| p.line().saturating_sub(header_line))
                .unwrap_or(offset as u64 + 1);

            if record.len() < min_fields {
                dropped += 1;
                continue;
            }

            let mut observation = Observation::default();
            let mut timestamp = None;
            for (column, field) in record.iter().enumerate() {
                let Some(Some(binding)) = bindings.get(column) else {
                    continue;
                };
                let Some(value) = parse_reading(field) else {
                    continue;
                };
                match binding {
                    ColumnBinding::Timestamp => timestamp = Some(value),
                    ColumnBinding::Metric(id) => observation.insert(id.clone(), value),
                }
            }

            if !observation.has_readings() {
                dropped += 1;
                continue;
            }
            observation.timestamp = timestamp.unwrap_or(row_index as f64);
            observations.push(observation);
        }

        self.logger.record(&format!(
            "ingested {} observations ({} rows dropped)",
            observations.len(),
            dropped
        ));

        let source = if has_time_column {
            TimestampSource::Column
        } else {
            TimestampSource::RowIndex
        };
        ObservationSeries::new(observations, source)
    }

    fn bind_column(&self, cell: &str, registry: &MetricRegistry) -> Option<ColumnBinding> {
        let header = cell.to_lowercase();
        if self
            .options
            .time_tokens
            .iter()
            .any(|token| !token.is_empty() && header.contains(&token.to_lowercase()))
        {
            return Some(ColumnBinding::Timestamp);
        }

        let mentions = |needle: &str| {
            let needle = needle.trim().to_lowercase();
            !needle.is_empty() && header.contains(&needle)
        };
        registry
            .iter()
            .find(|metric| mentions(&metric.id) || mentions(&metric.display_name))
            .map(|metric| ColumnBinding::Metric(metric.id.clone()))
    }
}

impl Default for CsvIngestor {
    fn default() -> Self {
        Self::new(IngestOptions::default())
    }
}

/// Parses the leading decimal number of a field, so `150 m` reads as 150.
fn parse_reading(field: &str) -> Option<f64> {
    let bytes = field.as_bytes();
    let digits_from = |mut idx: usize| {
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        idx
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        has_digits |= frac_end > end + 1;
        end = frac_end;
    }
    if !has_digits {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + sign);
        if exp_end > end + 1 + sign {
            end = exp_end;
        }
    }

    field[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Ingests comma-separated text with the default options.
pub fn ingest(raw: &str, registry: &MetricRegistry) -> ObservationSeries {
    CsvIngestor::default().ingest(raw, registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MetricDescriptor;

    fn altitude_registry() -> MetricRegistry {
        MetricRegistry::new(vec![MetricDescriptor::new(
            "altitude", "Altitude", "m", "#3b82f6", true,
        )])
        .unwrap()
    }

    #[test]
    fn ingest_drops_rows_without_readings() {
        let series = ingest("time,altitude\n0,100\n1,150\n2,abc\n", &altitude_registry());

        assert_eq!(series.len(), 2);
        assert_eq!(series.timestamp_source, TimestampSource::Column);
        assert_eq!(series[0], Observation::new(0.0).with("altitude", 100.0));
        assert_eq!(series[1], Observation::new(1.0).with("altitude", 150.0));
    }

    #[test]
    fn ingest_synthesizes_row_index_timestamps() {
        let series = ingest("altitude\n5\n10\n", &altitude_registry());

        assert_eq!(series.timestamp_source, TimestampSource::RowIndex);
        let stamps: Vec<f64> = series.iter().map(|o| o.timestamp).collect();
        assert_eq!(stamps, vec![1.0, 2.0]);
        assert_eq!(series[1].value("altitude"), Some(10.0));
    }

    #[test]
    fn ingest_matches_headers_case_insensitively() {
        let registry = MetricRegistry::flight_defaults();
        let raw = "Mission Time (s),ALTITUDE (m),Engine Temp (C),Notes\n\
                   0.5,10,800,ok\n\
                   1.0,20,805,ok\n";
        let series = ingest(raw, &registry);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].timestamp, 0.5);
        assert_eq!(series[1].value("temp_engine"), Some(805.0));
        assert_eq!(series[1].values.len(), 2);
    }

    #[test]
    fn ingest_skips_short_rows_and_bad_fields() {
        let raw = "time,altitude,velocity\n\
                   0,1,2\n\
                   7\n\
                   1,,3\n\
                   2,NaN,inf\n";
        let series = ingest(raw, &MetricRegistry::flight_defaults());

        assert_eq!(series.len(), 2);
        assert_eq!(series[1].timestamp, 1.0);
        assert_eq!(series[1].value("altitude"), None);
        assert_eq!(series[1].value("velocity"), Some(3.0));
    }

    #[test]
    fn unparseable_timestamp_falls_back_to_row_index() {
        let series = ingest("time,altitude\nT0,5\n", &altitude_registry());
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].timestamp, 1.0);
    }

    #[test]
    fn ingest_degrades_to_empty_series() {
        let registry = altitude_registry();
        assert!(ingest("", &registry).is_empty());
        assert!(ingest("time,unknown\n0,1\n1,2\n", &registry).is_empty());
    }

    #[test]
    fn stray_quote_only_loses_its_own_row() {
        let series = ingest("time,altitude\n0,\"100\n1,150\n2,200\n", &altitude_registry());

        let stamps: Vec<f64> = series.iter().map(|o| o.timestamp).collect();
        assert_eq!(stamps, vec![1.0, 2.0]);
        assert_eq!(series[1].value("altitude"), Some(200.0));
    }

    #[test]
    fn leading_blank_lines_do_not_shadow_the_header() {
        let series = ingest("  \n\ntime,altitude\n0,100\n1,150\n", &altitude_registry());

        assert_eq!(series.timestamp_source, TimestampSource::Column);
        assert_eq!(series.len(), 2);
        assert_eq!(series[1], Observation::new(1.0).with("altitude", 150.0));
    }

    #[test]
    fn readings_with_unit_suffixes_keep_their_number() {
        let raw = "time,altitude\n0,100m\n1,150 m\n2,-1.5e2ft\n3,m100\n";
        let series = ingest(raw, &altitude_registry());

        let readings: Vec<Option<f64>> = series.iter().map(|o| o.value("altitude")).collect();
        assert_eq!(readings, vec![Some(100.0), Some(150.0), Some(-150.0)]);
    }

    #[test]
    fn leading_number_parser_rejects_non_numbers() {
        assert_eq!(parse_reading("3."), Some(3.0));
        assert_eq!(parse_reading(".5s"), Some(0.5));
        assert_eq!(parse_reading("7e"), Some(7.0));
        assert_eq!(parse_reading("-"), None);
        assert_eq!(parse_reading("."), None);
        assert_eq!(parse_reading("NaN"), None);
        assert_eq!(parse_reading("inf"), None);
        assert_eq!(parse_reading(""), None);
    }

    #[test]
    fn ingest_honours_custom_delimiter() {
        let ingestor = CsvIngestor::new(IngestOptions {
            delimiter: ';',
            ..Default::default()
        });
        let series = ingestor.ingest("sec;altitude\n0;1.5\n", &altitude_registry());
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].value("altitude"), Some(1.5));
    }
}
