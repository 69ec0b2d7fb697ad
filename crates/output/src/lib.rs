use std::collections::BTreeSet;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Response body exactly as received
    #[default]
    Raw,
    Json,
    Yaml,
    Table,
    Csv,
}

pub struct OutputRenderer {
    format: OutputFormat,
}

impl OutputRenderer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Prints a raw API response body in the selected format.
    pub fn render_body(&self, body: &str) -> Result<()> {
        println!("{}", self.format_body(body)?);
        Ok(())
    }

    /// Prints a locally built value (e.g. a profile listing).
    pub fn render<T: Serialize>(&self, value: &T) -> Result<()> {
        let json_value = serde_json::to_value(value)?;
        println!("{}", self.format_value(&json_value)?);
        Ok(())
    }

    /// Formats a response body. Bodies that are not JSON are returned
    /// unchanged whatever the format.
    pub fn format_body(&self, body: &str) -> Result<String> {
        if self.format == OutputFormat::Raw {
            return Ok(body.to_string());
        }

        match serde_json::from_str::<Value>(body) {
            Ok(value) => self.format_value(&value),
            Err(_) => Ok(body.to_string()),
        }
    }

    fn format_value(&self, value: &Value) -> Result<String> {
        let pretty = || serde_json::to_string_pretty(value);

        Ok(match self.format {
            OutputFormat::Raw => serde_json::to_string(value)?,
            OutputFormat::Json => pretty()?,
            OutputFormat::Yaml => serde_yaml::to_string(value)?,
            OutputFormat::Table => match Self::coerce_rows(Self::rows_of(value)) {
                Some((headers, rows)) => Self::table(headers, rows),
                None => pretty()?,
            },
            OutputFormat::Csv => match Self::coerce_rows(Self::rows_of(value)) {
                Some((headers, rows)) => Self::csv(&headers, &rows)?,
                None => pretty()?,
            },
        })
    }

    /// List endpoints wrap their items as `{"data": [...], "paging": {...}}`.
    fn rows_of(value: &Value) -> &Value {
        match value {
            Value::Object(obj) => match obj.get("data") {
                Some(data @ Value::Array(_)) => data,
                _ => value,
            },
            _ => value,
        }
    }

    fn table(headers: Vec<String>, rows: Vec<Vec<String>>) -> String {
        let mut builder = Builder::default();
        builder.push_record(headers);
        for row in rows {
            builder.push_record(row);
        }
        builder.build().with(Style::rounded()).to_string()
    }

    fn csv(headers: &[String], rows: &[Vec<String>]) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(headers)?;
        for row in rows {
            writer.write_record(row)?;
        }

        let bytes = writer.into_inner().map_err(|err| err.into_error())?;
        let mut out = String::from_utf8(bytes)?;
        if out.ends_with('\n') {
            out.pop();
        }
        Ok(out)
    }

    fn coerce_rows(value: &Value) -> Option<(Vec<String>, Vec<Vec<String>>)> {
        let rows = match value {
            Value::Array(rows) if !rows.is_empty() => rows,
            _ => return None,
        };

        let mut headers = BTreeSet::new();
        for row in rows {
            if let Value::Object(obj) = row {
                headers.extend(obj.keys().cloned());
            }
        }

        if headers.is_empty() {
            return None;
        }

        let headers_vec: Vec<String> = headers.into_iter().collect();
        let mut data = Vec::with_capacity(rows.len());
        for row in rows {
            let obj = row.as_object();
            let record = headers_vec
                .iter()
                .map(|header| {
                    obj.and_then(|obj| obj.get(header))
                        .map(Self::value_to_string)
                        .unwrap_or_default()
                })
                .collect();
            data.push(record);
        }

        Some((headers_vec, data))
    }

    fn value_to_string(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => String::new(),
            other => serde_json::to_string(other).unwrap_or_default(),
        }
    }
}
